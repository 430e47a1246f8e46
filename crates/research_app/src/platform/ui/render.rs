use chrono::{DateTime, Local, NaiveDateTime};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;
use research_core::{
    AppViewModel, FormField, HistoryRowView, HistoryView, ScreenView, StatusClass,
    EMPTY_HISTORY_TEXT,
};

use super::layout::{form_areas, progress_areas, AppLayout};

const TITLE: &str = "Research Agent";
const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn render(frame: &mut Frame, view: &AppViewModel) {
    let layout = AppLayout::split(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(TITLE.bold())).block(Block::default().borders(Borders::ALL)),
        layout.header,
    );

    match &view.screen {
        ScreenView::Form {
            topic,
            questions,
            focus,
        } => render_form(frame, layout.main, topic, questions, *focus),
        ScreenView::Progress {
            topic,
            questions,
            status_text,
        } => render_progress(
            frame,
            layout.main,
            topic,
            questions,
            status_text,
            view.progress_percent,
        ),
        ScreenView::Results { report, saved_to } => {
            render_results(frame, layout.main, report, saved_to.as_deref())
        }
        ScreenView::Error { message } => render_error(frame, layout.main, message),
    }

    render_history(frame, layout.history, &view.history);
    frame.render_widget(
        Paragraph::new(footer_hint(view)).style(Style::default().fg(Color::DarkGray)),
        layout.footer,
    );
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn render_form(frame: &mut Frame, area: Rect, topic: &str, questions: &str, focus: FormField) {
    let [topic_area, questions_area] = form_areas(area);
    let cursor = |field: FormField| if focus == field { "_" } else { "" };

    frame.render_widget(
        Paragraph::new(format!("{topic}{}", cursor(FormField::Topic)))
            .block(field_block("Topic", focus == FormField::Topic)),
        topic_area,
    );
    frame.render_widget(
        Paragraph::new(format!("{questions}{}", cursor(FormField::Questions)))
            .wrap(Wrap { trim: false })
            .block(field_block(
                "Research questions (one per line)",
                focus == FormField::Questions,
            )),
        questions_area,
    );
}

fn render_progress(
    frame: &mut Frame,
    area: Rect,
    topic: &str,
    questions: &[String],
    status_text: &str,
    percent: u8,
) {
    let [gauge_area, details_area] = progress_areas(area);

    frame.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(status_text))
            .gauge_style(Style::default().fg(Color::Cyan))
            .percent(u16::from(percent.min(100))),
        gauge_area,
    );

    let mut lines = vec![
        Line::from(vec![Span::raw("Topic: ").bold(), Span::raw(topic)]),
        Line::default(),
        Line::from("Questions:".bold()),
    ];
    lines.extend(questions.iter().map(|q| Line::from(format!("  \u{2022} {q}"))));

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Current job")),
        details_area,
    );
}

fn render_results(frame: &mut Frame, area: Rect, report: &str, saved_to: Option<&str>) {
    let mut text = Text::from(report.to_string());
    if let Some(path) = saved_to {
        text.lines.push(Line::default());
        text.lines.push(Line::from(Span::styled(
            format!("Saved to {path}"),
            Style::default().fg(Color::Green),
        )));
    }
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Report")),
        area,
    );
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    frame.render_widget(
        Paragraph::new(message.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title("Error"),
            ),
        area,
    );
}

fn render_history(frame: &mut Frame, area: Rect, history: &HistoryView) {
    let block = Block::default().borders(Borders::ALL).title("History");
    match history {
        HistoryView::Empty => frame.render_widget(
            Paragraph::new(EMPTY_HISTORY_TEXT)
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(block),
            area,
        ),
        HistoryView::Entries(rows) => {
            let items: Vec<ListItem> = rows.iter().map(history_item).collect();
            frame.render_widget(List::new(items).block(block), area);
        }
    }
}

fn history_item(row: &HistoryRowView) -> ListItem<'static> {
    let status_color = match row.class {
        StatusClass::Completed => Color::Green,
        StatusClass::Failed => Color::Red,
        StatusClass::Running => Color::Yellow,
    };
    let mut lines = vec![
        Line::from(Span::styled(
            row.topic.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(row.status.clone(), Style::default().fg(status_color)),
        ]),
        Line::from(format!("Started: {}", format_timestamp(&row.started_at))).dim(),
    ];
    if let Some(completed_at) = &row.completed_at {
        lines.push(Line::from(format!("Completed: {}", format_timestamp(completed_at))).dim());
    }
    ListItem::new(lines)
}

fn footer_hint(view: &AppViewModel) -> &'static str {
    match view.screen {
        ScreenView::Form { .. } => "Tab: switch field  Ctrl+S: start research  Ctrl+C: quit",
        ScreenView::Progress { .. } => "n: new research  r: refresh history  q: quit",
        ScreenView::Results { .. } if view.can_download => {
            "d: download report  n: new research  r: refresh history  q: quit"
        }
        ScreenView::Results { .. } => "n: new research  r: refresh history  q: quit",
        ScreenView::Error { .. } => "Esc: back to form  n: new research  q: quit",
    }
}

/// Backend timestamps in local display form. RFC 3339 values are converted
/// to local time; offset-less ISO values are already local. Anything else
/// is shown as sent.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return at.with_timezone(&Local).format(DISPLAY_TIME_FORMAT).to_string();
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return at.format(DISPLAY_TIME_FORMAT).to_string();
    }
    raw.to_string()
}
