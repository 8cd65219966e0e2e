//! Drawable surface handle passed to `draw` calls.
//!
//! Widgets only ever write to a surface. `StyledFrameBuffer` is the stock
//! implementation; a frame driver can supply its own backend.

use crate::{Color, Rect, StyledChar, StyledFrameBuffer};

/// Opacity at or above which cells are drawn at full intensity.
pub const FULL_INTENSITY: u8 = 192;

pub trait Surface {
    /// Copy `src` into `dst` (clipped to `dst`'s size). Blank cells are skipped
    /// and cells without a background keep the one already on the surface.
    /// `tint` overrides the foreground of glyph cells.
    fn blit(&mut self, src: &StyledFrameBuffer, dst: Rect, opacity: u8, tint: Option<Color>);

    /// Rectangle border; `heavy` selects the thick focus style.
    fn outline(&mut self, rect: Rect, color: Color, heavy: bool);

    fn fill(&mut self, rect: Rect, ch: char, color: Color);
}

/// Apply opacity to a cell: invisible at 0, dimmed below [`FULL_INTENSITY`].
pub fn fade_cell(cell: StyledChar, opacity: u8) -> Option<StyledChar> {
    match opacity {
        0 => None,
        o if o < FULL_INTENSITY => Some(StyledChar {
            ch: cell.ch,
            fg_color: Some(cell.fg_color.map_or(Color::Gray, |c| c.dimmed())),
            bg_color: cell.bg_color.map(|c| c.dimmed()),
        }),
        _ => Some(cell),
    }
}

impl Surface for StyledFrameBuffer {
    fn blit(&mut self, src: &StyledFrameBuffer, dst: Rect, opacity: u8, tint: Option<Color>) {
        for y in 0..src.height.min(dst.height) {
            for x in 0..src.width.min(dst.width) {
                let mut cell = src.get(x, y);
                if cell.is_blank() {
                    continue;
                }
                if let Some(color) = tint {
                    if cell.ch != ' ' {
                        cell.fg_color = Some(color);
                    }
                }
                if let Some(mut cell) = fade_cell(cell, opacity) {
                    // I glifi senza sfondo ereditano quello sottostante
                    if cell.bg_color.is_none() {
                        cell.bg_color = self.get(dst.x + x, dst.y + y).bg_color;
                    }
                    self.set(dst.x + x, dst.y + y, cell);
                }
            }
        }
    }

    fn outline(&mut self, rect: Rect, color: Color, heavy: bool) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }

        let (corner, horizontal, vertical) = if heavy { ('#', '=', '#') } else { ('+', '-', '|') };
        let right = rect.right() - 1;
        let bottom = rect.bottom() - 1;

        for x in rect.x..=right {
            let ch = if x == rect.x || x == right { corner } else { horizontal };
            self.set(x, rect.y, StyledChar::new(ch).with_fg(color));
            self.set(x, bottom, StyledChar::new(ch).with_fg(color));
        }
        for y in (rect.y + 1)..bottom {
            self.set(rect.x, y, StyledChar::new(vertical).with_fg(color));
            self.set(right, y, StyledChar::new(vertical).with_fg(color));
        }
    }

    fn fill(&mut self, rect: Rect, ch: char, color: Color) {
        self.draw_rect(rect, ch, Some(color), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(text: &str, color: Color) -> StyledFrameBuffer {
        let mut fb = StyledFrameBuffer::new(text.chars().count(), 1);
        fb.draw_text(0, 0, text, Some(color), None);
        fb
    }

    #[test]
    fn test_blit_full_opacity() {
        let mut target = StyledFrameBuffer::new(8, 2);
        target.blit(&glyphs("ok", Color::Red), Rect::new(3, 1, 2, 1), 255, None);
        assert_eq!(target.row_text(1), "   ok   ");
        assert_eq!(target.get(3, 1).fg_color, Some(Color::Red));
    }

    #[test]
    fn test_blit_zero_opacity_draws_nothing() {
        let mut target = StyledFrameBuffer::new(4, 1);
        target.blit(&glyphs("ok", Color::Red), Rect::new(0, 0, 2, 1), 0, None);
        assert_eq!(target.row_text(0), "    ");
    }

    #[test]
    fn test_blit_low_opacity_dims() {
        let mut target = StyledFrameBuffer::new(4, 1);
        target.blit(&glyphs("ok", Color::Red), Rect::new(0, 0, 2, 1), 128, None);
        assert_eq!(target.get(0, 0).ch, 'o');
        assert_eq!(target.get(0, 0).fg_color, Some(Color::Gray));
    }

    #[test]
    fn test_blit_tint_and_clip() {
        let mut target = StyledFrameBuffer::new(4, 1);
        target.blit(&glyphs("long", Color::Red), Rect::new(0, 0, 2, 1), 255, Some(Color::Cyan));
        assert_eq!(target.row_text(0), "lo  ");
        assert_eq!(target.get(1, 0).fg_color, Some(Color::Cyan));
    }

    #[test]
    fn test_outline_styles() {
        let mut target = StyledFrameBuffer::new(4, 3);
        target.outline(Rect::new(0, 0, 4, 3), Color::White, false);
        assert_eq!(target.row_text(0), "+--+");
        assert_eq!(target.row_text(1), "|  |");

        target.outline(Rect::new(0, 0, 4, 3), Color::White, true);
        assert_eq!(target.row_text(2), "#==#");
    }
}
