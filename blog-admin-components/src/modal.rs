//! Modal overlay with a dimmed background

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier},
    widgets::{Clear, Widget},
    Frame,
};

/// Configuration for modal appearance
pub struct ModalStyle {
    /// Dim factor for background (0.0 = no dim, 1.0 = black)
    pub dim_factor: f32,
    /// Background color for the modal area (None = cleared)
    pub bg_color: Option<Color>,
}

impl Default for ModalStyle {
    fn default() -> Self {
        Self {
            dim_factor: 0.5,
            bg_color: None,
        }
    }
}

impl ModalStyle {
    pub fn with_bg(bg_color: Color) -> Self {
        Self {
            bg_color: Some(bg_color),
            ..Default::default()
        }
    }
}

/// Dim everything rendered so far and clear `area` for the modal body.
///
/// Call after rendering the background view, then render the modal
/// content into `area`.
pub fn render_modal(frame: &mut Frame, area: Rect, style: &ModalStyle) {
    dim_buffer(frame.buffer_mut(), style.dim_factor);
    frame.render_widget(Clear, area);
    if let Some(bg) = style.bg_color {
        frame.render_widget(BgFill(bg), area);
    }
}

/// Darken every cell of `buffer` by `factor`.
///
/// RGB colors are scaled; named colors fall back to the DIM modifier.
pub fn dim_buffer(buffer: &mut Buffer, factor: f32) {
    let factor = factor.clamp(0.0, 1.0);
    if factor == 0.0 {
        return;
    }
    for cell in buffer.content.iter_mut() {
        match (dim_color(cell.fg, factor), dim_color(cell.bg, factor)) {
            (Some(fg), Some(bg)) => {
                cell.set_fg(fg);
                cell.set_bg(bg);
            }
            (fg, bg) => {
                if let Some(fg) = fg {
                    cell.set_fg(fg);
                }
                if let Some(bg) = bg {
                    cell.set_bg(bg);
                }
                cell.modifier.insert(Modifier::DIM);
            }
        }
    }
}

fn dim_color(color: Color, factor: f32) -> Option<Color> {
    let scale = |c: u8| (f32::from(c) * (1.0 - factor)).round() as u8;
    match color {
        Color::Rgb(r, g, b) => Some(Color::Rgb(scale(r), scale(g), scale(b))),
        _ => None,
    }
}

struct BgFill(Color);

impl Widget for BgFill {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, ratatui::style::Style::default().bg(self.0));
    }
}

/// A `width` x `height` rectangle centred in `area`, shrunk to leave a
/// one-cell margin when `area` is too small.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
