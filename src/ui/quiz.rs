use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::client::{AnswerStatus, DataSource};

use super::selector::render_radio_group;

pub fn render<S: DataSource>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);

    let session = app.session();
    match session.question() {
        Some(question) => {
            render_stem(frame, chunks[1], &question.stem);
            render_radio_group(frame, chunks[2], app.group(), " Options ");
        }
        None if session.is_loading() => render_stem(frame, chunks[1], "Loading..."),
        None => render_stem(frame, chunks[1], "No question available."),
    }

    render_feedback(frame, chunks[3], app);
    render_controls(frame, chunks[4]);
}

fn render_header<S: DataSource>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let (correct, answered) = app.score();
    let mut spans = vec![Span::styled("QUIZ", Style::default().fg(Color::Cyan).bold())];
    if app.is_mock() {
        spans.push(Span::styled("  [MOCK]", Style::default().fg(Color::Magenta)));
    }
    spans.push(Span::styled(
        format!("  {correct}/{answered} correct"),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_stem(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_feedback<S: DataSource>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let session = app.session();
    let mut lines: Vec<Line> = Vec::new();

    match session.status() {
        AnswerStatus::Idle => {}
        AnswerStatus::Correct => {
            lines.push(Line::styled("Correct!", Style::default().fg(Color::Green).bold()));
        }
        AnswerStatus::Wrong => {
            lines.push(Line::styled("Wrong.", Style::default().fg(Color::Red).bold()));
        }
    }

    if session.status() != AnswerStatus::Idle {
        let correct_text = session.feedback().and_then(|f| f.correct_option_id).and_then(|id| {
            session
                .question()
                .and_then(|q| q.options.iter().find(|o| o.id == id))
                .map(|o| o.text.clone())
        });
        if let Some(text) = correct_text {
            lines.push(Line::from(format!("Correct answer: {text}")));
        }
        if let Some(explanation) = session.feedback().and_then(|f| f.explanation.as_deref()) {
            lines.push(Line::styled(explanation, Style::default().fg(Color::Gray)));
        }
    }

    if let Some(error) = session.error() {
        lines.push(Line::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k move  ·  enter answer  ·  n next  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
