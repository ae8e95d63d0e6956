use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Widget},
};

const ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];
const KEY_WIDTH: u16 = 4;
const KEY_HEIGHT: u16 = 3;
const SPACE_KEYS: u16 = 6;

/// On-screen keyboard with the most recently pressed key highlighted.
/// Skips rendering entirely when the area cannot fit the widest row.
pub struct Keyboard {
    pub active: Option<char>,
}

impl Widget for Keyboard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let widest = ROWS.iter().map(|row| row.len()).max().unwrap_or(0) as u16 * KEY_WIDTH;
        let total_height = KEY_HEIGHT * (ROWS.len() as u16 + 1);
        if area.width < widest || area.height < total_height {
            return;
        }

        for (row_idx, row) in ROWS.iter().enumerate() {
            let row_width = row.len() as u16 * KEY_WIDTH;
            let x0 = area.x + (area.width - row_width) / 2;
            let y = area.y + row_idx as u16 * KEY_HEIGHT;

            for (key_idx, key) in row.chars().enumerate() {
                let rect = Rect::new(x0 + key_idx as u16 * KEY_WIDTH, y, KEY_WIDTH, KEY_HEIGHT);
                render_key(
                    &key.to_ascii_uppercase().to_string(),
                    self.active == Some(key),
                    rect,
                    buf,
                );
            }
        }

        let space_width = SPACE_KEYS * KEY_WIDTH;
        let rect = Rect::new(
            area.x + (area.width - space_width) / 2,
            area.y + ROWS.len() as u16 * KEY_HEIGHT,
            space_width,
            KEY_HEIGHT,
        );
        render_key("SPACE", self.active == Some(' '), rect, buf);
    }
}

fn render_key(label: &str, pressed: bool, rect: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(rect);
    block.render(rect, buf);

    let style = if pressed {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let key = Paragraph::new(Span::styled(label.to_owned(), style)).alignment(Alignment::Center);
    key.render(inner, buf);
}
