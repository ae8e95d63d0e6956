pub mod keyboard;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::ui::keyboard::Keyboard;
use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const KEYBOARD_HEIGHT: u16 = 12;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold = bold.add_modifier(Modifier::DIM);
    let underlined_dim_bold = dim_bold.add_modifier(Modifier::UNDERLINED);
    let green_bold = bold.fg(Color::Green);
    let red_bold = bold.fg(Color::Red);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let passage_width = session.target.width();
    let single_line = passage_width <= max_chars_per_line as usize;
    let passage_lines = if single_line {
        1
    } else {
        (passage_width as f64 / max_chars_per_line as f64).ceil() as u16 + 1
    };

    // The keyboard only fits on tall terminals
    let keyboard_height = if area.height >= passage_lines + KEYBOARD_HEIGHT + 12 {
        KEYBOARD_HEIGHT
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // stats
            Constraint::Length(1), // tip
            Constraint::Length(1), // padding
            Constraint::Length(passage_lines + 2),
            Constraint::Length(3), // progress
            Constraint::Length(keyboard_height),
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let title = Paragraph::new(Span::styled("typerate", bold)).alignment(Alignment::Center);
    title.render(chunks[0], buf);

    if session.running || session.finished {
        let wpm = session
            .wpm()
            .map_or_else(|| String::from("--"), |wpm| wpm.to_string());
        let stats = Paragraph::new(Span::styled(
            format!(
                "WPM: {}   Accuracy: {}%   Time: {}s / {}s",
                wpm,
                session.accuracy(),
                session.elapsed_secs,
                session.limit_secs
            ),
            bold,
        ))
        .alignment(Alignment::Center);
        stats.render(chunks[1], buf);
    }

    let tip_line = match &app.tip {
        Some(tip) => format!("Tip: {tip}"),
        None => String::from("Loading tip..."),
    };
    let tip = Paragraph::new(Span::styled(tip_line, dim_bold.patch(italic)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    tip.render(chunks[2], buf);

    let passage_block = Block::default().borders(Borders::ALL);
    if !session.loaded {
        let loading = Paragraph::new(Span::styled("Loading text...", dim_bold))
            .block(passage_block)
            .alignment(Alignment::Center);
        loading.render(chunks[4], buf);
    } else {
        let input_chars: Vec<char> = session.input.chars().collect();
        let cursor_pos = input_chars.len();

        let spans = session
            .target
            .chars()
            .enumerate()
            .map(|(idx, expected)| match input_chars.get(idx) {
                Some(&typed) if typed == expected => {
                    Span::styled(expected.to_string(), green_bold)
                }
                Some(&typed) => Span::styled(
                    match typed {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    red_bold,
                ),
                None if idx == cursor_pos && !session.finished => {
                    Span::styled(expected.to_string(), underlined_dim_bold)
                }
                None => Span::styled(expected.to_string(), dim_bold),
            })
            .collect::<Vec<Span>>();

        let passage = Paragraph::new(Line::from(spans))
            .block(passage_block)
            .alignment(if single_line {
                // when the passage fits on one line centering gives a nice
                // zen feeling
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true });
        passage.render(chunks[4], buf);
    }

    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("progress"))
        .gauge_style(Style::default().fg(Color::Blue))
        .percent(session.progress());
    progress.render(chunks[5], buf);

    if keyboard_height > 0 {
        Keyboard {
            active: app.active_key,
        }
        .render(chunks[6], buf);
    }

    let legend = Paragraph::new(Span::styled(
        "(esc) quit / (←) restart / (enter) submit",
        italic,
    ))
    .alignment(Alignment::Center);
    legend.render(chunks[8], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // summary
            Constraint::Length(1), // settings
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let wpm = session
        .wpm()
        .map_or_else(|| String::from("--"), |wpm| wpm.to_string());
    let summary = Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {}s elapsed",
            wpm,
            session.accuracy(),
            session.elapsed_secs
        ),
        bold,
    ))
    .alignment(Alignment::Center);
    summary.render(chunks[1], buf);

    let settings = Paragraph::new(Span::styled(
        format!(
            "words: {} | limit: {}m",
            app.settings.word_count,
            app.settings.limit_secs / 60
        ),
        Style::default().fg(Color::Gray).patch(italic),
    ))
    .alignment(Alignment::Center);
    settings.render(chunks[2], buf);

    let legend = Paragraph::new(Span::styled(
        "(r)estart / (w)ord count / (t)imer / (esc)ape",
        italic,
    ))
    .alignment(Alignment::Center);
    legend.render(chunks[4], buf);
}
