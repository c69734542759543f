//! The single pending driver tick.
//!
//! A tick is a spawned task that sleeps and then posts a [`DriverEvent::Tick`]
//! back to the app. Only one may be pending: scheduling a new tick or
//! cancelling aborts the previous task, and every tick carries a generation
//! number so one that was already in flight when superseded is rejected by
//! [`TickScheduler::accept`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use ghostline_providers::Insight;

/// What a tick does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// End of the start delay: position 0.
    Begin,
    /// Regular scan interval: position + 1.
    Step,
    /// End of the post-sequence delay: closing messages and insight request.
    Finish,
}

#[derive(Debug)]
pub(crate) enum DriverEvent {
    Tick { generation: u64, kind: TickKind },
    Insight(Insight),
}

/// Aborts its task on drop.
#[derive(Debug)]
struct PendingTick {
    generation: u64,
    kind: TickKind,
    handle: JoinHandle<()>,
}

impl Drop for PendingTick {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Default)]
pub(crate) struct TickScheduler {
    generation: u64,
    pending: Option<PendingTick>,
}

impl TickScheduler {
    /// Replace any pending tick with a new one firing after `delay`.
    pub(crate) fn schedule(
        &mut self,
        kind: TickKind,
        delay: Duration,
        tx: &mpsc::Sender<DriverEvent>,
    ) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let tx = tx.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(DriverEvent::Tick { generation, kind }).await;
        });

        // Dropping the previous tick aborts it.
        self.pending = Some(PendingTick {
            generation,
            kind,
            handle,
        });
        generation
    }

    pub(crate) fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(pending) = self.pending.take() {
            tracing::debug!(kind = ?pending.kind, "Cancelled pending tick");
        }
    }

    /// Claim a fired tick. Returns false for ticks that were superseded or
    /// cancelled after they fired.
    pub(crate) fn accept(&mut self, generation: u64) -> bool {
        match &self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn pending_kind(&self) -> Option<TickKind> {
        self.pending.as_ref().map(|pending| pending.kind)
    }
}
