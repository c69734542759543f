//! TUI rendering for Ghostline using ratatui.
//!
//! The screen is four bands top to bottom: the HUD line, the scrolling log,
//! the progress label and the progress bar. Before the session starts, the
//! `START_DECODING` gate covers everything.

mod input;
mod theme;

pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use ghostline_engine::App;
use ghostline_types::ui::RevealTracker;
use ghostline_types::{EntryKind, LogEntry, Progress, RunState, sanitize_terminal_text};

pub const START_LABEL: &str = "START_DECODING";
pub const START_HINT: &str = "[ENTER] ENGAGE  [Q] ABORT";
pub const SIGNAL_LOST: &str = "SIGNAL_LOST";
pub const RATIO_LOCK: &str = "RATIO_16:9_LOCK";
pub const SYNC_LABEL: &str = "DATA_STREAM_SYNC";
pub const COMPLETE_LABEL: &str = "ENCRYPTION_COMPLETE";

const INSIGHT_INDENT: &str = "    ";

/// Renders an [`App`] and owns the only view-local state: per-entry reveal
/// progress.
#[derive(Debug)]
pub struct TerminalView {
    reveal: RevealTracker,
}

impl TerminalView {
    #[must_use]
    pub fn new(app: &App) -> Self {
        let reveal = if app.ui_options().reduced_motion {
            RevealTracker::instant()
        } else {
            RevealTracker::new(app.timing().reveal_interval)
        };
        Self { reveal }
    }

    /// True while a binary entry is still typing out at `now`.
    #[must_use]
    pub fn is_animating(&self, app: &App, now: Instant) -> bool {
        self.reveal.is_animating(app.log(), now)
    }

    pub fn draw(&mut self, frame: &mut Frame, app: &App, now: Instant) {
        let options = app.ui_options();
        let palette = palette(options);
        let glyphs = glyphs(options);

        let bg_block = Block::default().style(Style::default().bg(palette.bg));
        frame.render_widget(bg_block, frame.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // HUD
                Constraint::Min(1),    // Log
                Constraint::Length(1), // Progress label
                Constraint::Length(1), // Progress bar
            ])
            .split(frame.area());

        draw_hud(frame, app.run_state(), chunks[0], &palette);
        self.draw_log(frame, app, chunks[1], now, &palette, &glyphs);
        draw_progress(
            frame,
            app.run_state(),
            app.progress(),
            chunks[2],
            chunks[3],
            &palette,
            &glyphs,
        );

        if !app.run_state().is_started() {
            draw_start_gate(frame, &palette, &glyphs);
        }
    }

    fn draw_log(
        &mut self,
        frame: &mut Frame,
        app: &App,
        area: Rect,
        now: Instant,
        palette: &Palette,
        glyphs: &Glyphs,
    ) {
        let mut lines: Vec<Line> = Vec::new();
        for entry in app.log() {
            let visible = self.reveal.visible_graphemes(entry, now);
            entry_lines(entry, visible, &mut lines, palette, glyphs);
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        let total = paragraph.line_count(area.width);
        let offset = scroll_to_bottom(total, area.height);
        frame.render_widget(paragraph.scroll((offset, 0)), area);
    }
}

/// Scroll offset that keeps the last row visible.
fn scroll_to_bottom(total_rows: usize, height: u16) -> u16 {
    let overflow = total_rows.saturating_sub(height as usize);
    u16::try_from(overflow).unwrap_or(u16::MAX)
}

fn entry_lines(
    entry: &LogEntry,
    visible: usize,
    lines: &mut Vec<Line<'static>>,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    match entry.kind() {
        EntryKind::Binary => {
            let shown = sanitize_terminal_text(entry.content_prefix(visible)).into_owned();
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", glyphs.binary_marker), styles::binary_marker(palette)),
                Span::styled(shown, styles::binary(palette)),
            ]));
        }
        EntryKind::Ai => {
            let content = sanitize_terminal_text(entry.content());
            for text in content.lines() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{INSIGHT_INDENT}{} ", glyphs.insight_rule),
                        styles::insight_rule(palette),
                    ),
                    Span::styled(text.to_string(), styles::insight(palette)),
                ]));
            }
        }
        kind => {
            let style = match kind {
                EntryKind::Hacker => styles::hacker(palette),
                EntryKind::Warning => styles::warning(palette),
                _ => styles::system(palette),
            };
            let content = sanitize_terminal_text(entry.content());
            let content = if kind == EntryKind::Warning {
                content.to_uppercase()
            } else {
                content.into_owned()
            };
            for text in content.lines() {
                lines.push(Line::from(Span::styled(text.to_string(), style)));
            }
        }
    }
}

fn hud_status(state: RunState) -> String {
    if state.is_started() {
        format!("ACCESS_NODE_{}", state.label())
    } else {
        SIGNAL_LOST.to_string()
    }
}

fn draw_hud(frame: &mut Frame, state: RunState, area: Rect, palette: &Palette) {
    let left = Paragraph::new(Line::from(Span::styled(
        hud_status(state),
        styles::hud_status(palette),
    )));
    let right = Paragraph::new(Line::from(Span::styled(RATIO_LOCK, styles::hud_dim(palette))))
        .alignment(Alignment::Right);
    frame.render_widget(left, area);
    frame.render_widget(right, area);
}

fn draw_progress(
    frame: &mut Frame,
    state: RunState,
    progress: Progress,
    label_area: Rect,
    bar_area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let label = if state == RunState::Finished {
        COMPLETE_LABEL
    } else {
        SYNC_LABEL
    };
    let style = styles::hud_dim(palette);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(label, style))),
        label_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("{}%", progress.whole_percent()),
            style,
        )))
        .alignment(Alignment::Right),
        label_area,
    );

    let filled = filled_cells(progress, bar_area.width);
    let empty = bar_area.width.saturating_sub(filled);
    let bar = Line::from(vec![
        Span::styled(
            glyphs.bar_filled.repeat(filled as usize),
            Style::default().fg(palette.green),
        ),
        Span::styled(
            glyphs.bar_empty.repeat(empty as usize),
            Style::default().fg(palette.green_track),
        ),
    ]);
    frame.render_widget(Paragraph::new(bar), bar_area);
}

/// Cells of a `width`-wide bar covered by `progress`, rounded down.
fn filled_cells(progress: Progress, width: u16) -> u16 {
    let cells = (progress.ratio() * f64::from(width)).floor();
    (cells as u16).min(width)
}

fn draw_start_gate(frame: &mut Frame, palette: &Palette, glyphs: &Glyphs) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(palette.bg)), area);

    let padding = 4;
    let inner_width = START_LABEL.width() + padding * 2;
    let box_width = (inner_width + 2) as u16;
    let box_height = 3;

    let [tl, tr, bl, br] = glyphs.frame_corners;
    let rule = glyphs.frame_horizontal.repeat(inner_width);
    let side = glyphs.frame_vertical;
    let pad = " ".repeat(padding);
    let style = styles::gate(palette);

    let gate = vec![
        Line::from(Span::styled(format!("{tl}{rule}{tr}"), style)),
        Line::from(Span::styled(format!("{side}{pad}{START_LABEL}{pad}{side}"), style)),
        Line::from(Span::styled(format!("{bl}{rule}{br}"), style)),
    ];

    let gate_area = centered(area, box_width, box_height);
    frame.render_widget(Paragraph::new(gate), gate_area);

    let hint_y = gate_area.y + gate_area.height + 1;
    if hint_y < area.y + area.height {
        let hint_area = Rect {
            x: area.x,
            y: hint_y,
            width: area.width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(START_HINT, styles::key_hint(palette))))
                .alignment(Alignment::Center),
            hint_area,
        );
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
