//! Ordering and progress properties of the decoding sequence, for many lengths.

use std::time::Duration;

use ghostline_config::Timing;
use ghostline_core::script::{SOLVE_THE_BINARY, SEQUENCE_COMPLETE, UPLINK_ESTABLISHED};
use ghostline_types::{EntryKind, LogEntry, RunState};

use crate::common::{Canned, app_with, run_to_completion};

fn numbered(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{i:08b}")).collect()
}

/// Entries appended by the driver: everything between the uplink line and
/// the completion line.
fn driver_entries(entries: &[LogEntry]) -> &[LogEntry] {
    assert_eq!(entries[0].content(), UPLINK_ESTABLISHED);
    let end = entries
        .iter()
        .position(|e| e.content() == SEQUENCE_COMPLETE)
        .expect("completion line present");
    &entries[1..end]
}

#[tokio::test(start_paused = true)]
async fn binary_entries_and_interjections_for_all_lengths() {
    for n in 0..=10 {
        let tokens = numbered(n);
        let mut app = app_with(tokens.clone(), Timing::default(), Canned::ok("X"));
        app.start();

        let mut seen_binary = 0;
        loop {
            let before = app.log().len();
            app.wait_for_event().await;
            if app.log().of_kind(EntryKind::Binary).count() > seen_binary {
                seen_binary += 1;
                let expected = (seen_binary * 100 / n) as u8;
                assert_eq!(app.progress().whole_percent(), expected, "n={n} i={seen_binary}");
            }
            if app.run_state() == RunState::Finished {
                assert_eq!(app.log().len(), before, "completion appends nothing itself");
                break;
            }
        }
        run_to_completion(&mut app, Duration::from_secs(60)).await;

        let entries = app.log().entries();
        let driven = driver_entries(entries);

        let binaries: Vec<&str> = driven
            .iter()
            .filter(|e| e.kind() == EntryKind::Binary)
            .map(LogEntry::content)
            .collect();
        assert_eq!(binaries, tokens.iter().map(String::as_str).collect::<Vec<_>>());

        let mut index = 0;
        for (i, entry) in driven.iter().enumerate() {
            if entry.kind() != EntryKind::Binary {
                continue;
            }
            index += 1;
            let after = &driven[i + 1..];
            if index % 3 == 0 && index < n {
                assert_eq!(after[0].kind(), EntryKind::Warning, "n={n} i={index}");
                assert!(after[0].content().starts_with("!! "));
                assert_eq!(after[1].kind(), EntryKind::Hacker);
                assert_eq!(after[1].content(), SOLVE_THE_BINARY);
            } else if let Some(next) = after.first() {
                assert_eq!(next.kind(), EntryKind::Binary, "n={n} i={index}");
            }
        }

        let full = app.log().len();
        assert_eq!(
            full,
            1 + driven.len() + 4,
            "uplink, driver output, then exactly four closing entries"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn progress_is_zero_before_the_first_token() {
    let mut app = app_with(numbered(4), Timing::default(), Canned::ok("X"));
    assert_eq!(app.progress().whole_percent(), 0);
    app.start();
    assert_eq!(app.progress().whole_percent(), 0);
    app.wait_for_event().await;
    assert_eq!(app.progress().whole_percent(), 25);
}

#[tokio::test(start_paused = true)]
async fn failing_source_still_closes_the_session() {
    let source = Canned::failing();
    let mut app = app_with(numbered(2), Timing::default(), source.clone());
    app.start();
    run_to_completion(&mut app, Duration::from_secs(60)).await;

    assert_eq!(source.calls(), 1);
    assert_eq!(app.log().of_kind(EntryKind::Ai).count(), 1);
}
