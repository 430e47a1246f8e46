use ratatui::layout::{Constraint, Layout, Rect};

pub const HEADER_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 1;
pub const HISTORY_PERCENT: u16 = 32;
pub const TOPIC_HEIGHT: u16 = 3;
pub const GAUGE_HEIGHT: u16 = 3;

/// Screen regions: a title bar, the active view, the history panel and a key hint line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub history: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn split(area: Rect) -> Self {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .areas(area);
        let [main, history] = Layout::horizontal([
            Constraint::Percentage(100 - HISTORY_PERCENT),
            Constraint::Percentage(HISTORY_PERCENT),
        ])
        .areas(body);
        Self {
            header,
            main,
            history,
            footer,
        }
    }
}

/// Topic input on top, questions below.
pub fn form_areas(area: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Length(TOPIC_HEIGHT), Constraint::Min(0)]).areas(area)
}

/// Gauge on top, job details below.
pub fn progress_areas(area: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Length(GAUGE_HEIGHT), Constraint::Min(0)]).areas(area)
}
