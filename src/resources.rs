//! Resource handles consumed by widgets: pre-rendered sprites, fonts and
//! the rendered label payload built from them.
//!
//! Sprites and fonts are shared, read-only handles owned by whatever loads
//! resources; widgets clone the handle and never mutate it.

use crate::surface::Surface;
use crate::{image_to_braille_fb, Color, ConversionError, Rect, StyledFrameBuffer};
use image::DynamicImage;
use std::sync::Arc;

/// Where a widget's `(x, y)` lands on its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Center,
    TopLeft,
}

impl Anchor {
    pub fn place(&self, x: usize, y: usize, width: usize, height: usize) -> Rect {
        match self {
            Anchor::Center => Rect::from_center(x, y, width, height),
            Anchor::TopLeft => Rect::new(x, y, width, height),
        }
    }
}

/// Pre-rendered image handle.
#[derive(Debug, Clone)]
pub struct Sprite {
    cells: Arc<StyledFrameBuffer>,
}

impl Sprite {
    pub fn new(cells: StyledFrameBuffer) -> Self {
        Self { cells: Arc::new(cells) }
    }

    /// Solid panel, the usual background for boxes and buttons.
    pub fn panel(width: usize, height: usize, background: Color) -> Self {
        let mut cells = StyledFrameBuffer::new(width, height);
        cells.draw_rect(Rect::new(0, 0, width, height), ' ', None, Some(background));
        Self::new(cells)
    }

    pub fn from_image(img: &DynamicImage, max_width: usize, max_height: usize, fg: Color) -> Result<Self, ConversionError> {
        let fb = image_to_braille_fb(img, max_width, max_height)?;
        Ok(Self::new(fb.to_styled(Some(fg))))
    }

    /// Nearest-neighbour resample; a factor of 1.0 shares the same cells.
    pub fn scaled(&self, factor: f32) -> Sprite {
        if (factor - 1.0).abs() < f32::EPSILON {
            return self.clone();
        }

        let width = ((self.width() as f32 * factor).round() as usize).max(1);
        let height = ((self.height() as f32 * factor).round() as usize).max(1);
        let mut cells = StyledFrameBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let src_x = ((x as f32 / factor) as usize).min(self.width().saturating_sub(1));
                let src_y = ((y as f32 / factor) as usize).min(self.height().saturating_sub(1));
                cells.set(x, y, self.cells.get(src_x, src_y));
            }
        }
        Self::new(cells)
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn cells(&self) -> &StyledFrameBuffer {
        &self.cells
    }
}

/// Glyph renderer handle. Text is laid out on a single row.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: String,
    pub letter_spacing: usize,
    pub uppercase: bool,
}

impl Font {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            letter_spacing: 0,
            uppercase: false,
        }
    }

    pub fn with_letter_spacing(mut self, spacing: usize) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn with_uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn measure(&self, text: &str) -> usize {
        let count = text.chars().count();
        count + count.saturating_sub(1) * self.letter_spacing
    }

    pub fn render(&self, text: &str, color: Color) -> StyledFrameBuffer {
        let mut glyphs = StyledFrameBuffer::new_pooled(self.measure(text), 1);
        let step = 1 + self.letter_spacing;
        for (i, ch) in text.chars().enumerate() {
            let ch = if self.uppercase { ch.to_uppercase().next().unwrap_or(ch) } else { ch };
            glyphs.draw_text(i * step, 0, &ch.to_string(), Some(color), None);
        }
        glyphs
    }
}

/// Rendered text payload: the glyphs plus where they sit on screen.
///
/// The glyph surface is recomputed whenever the text, color or position
/// changes; the anchor chosen at construction is kept across re-renders.
#[derive(Debug)]
pub struct Label {
    text: String,
    font: Arc<Font>,
    color: Color,
    anchor: Anchor,
    origin: (usize, usize),
    glyphs: StyledFrameBuffer,
    rect: Rect,
}

impl Label {
    pub fn new(text: impl Into<String>, font: Arc<Font>, color: Color, x: usize, y: usize, anchor: Anchor) -> Self {
        let text = text.into();
        let glyphs = font.render(&text, color);
        let rect = anchor.place(x, y, glyphs.width, glyphs.height);
        Self {
            text,
            font,
            color,
            anchor,
            origin: (x, y),
            glyphs,
            rect,
        }
    }

    /// Label centered inside `frame`.
    pub fn centered_in(text: impl Into<String>, font: Arc<Font>, color: Color, frame: Rect) -> Self {
        let (cx, cy) = frame.center();
        Self::new(text, font, color, cx, cy, Anchor::Center)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.rerender();
    }

    pub fn set_color(&mut self, color: Color) {
        if self.color != color {
            self.color = color;
            self.rerender();
        }
    }

    /// Set text and color in one render pass.
    pub fn set_content(&mut self, text: impl Into<String>, color: Color) {
        self.text = text.into();
        self.color = color;
        self.rerender();
    }

    pub fn set_position(&mut self, x: usize, y: usize) {
        self.origin = (x, y);
        self.rect = self.anchor.place(x, y, self.glyphs.width, self.glyphs.height);
    }

    pub fn center_on(&mut self, frame: Rect) {
        let (cx, cy) = frame.center();
        self.anchor = Anchor::Center;
        self.set_position(cx, cy);
    }

    pub fn draw(&self, surface: &mut dyn Surface, opacity: u8, tint: Option<Color>) {
        surface.blit(&self.glyphs, self.rect, opacity, tint);
    }

    fn rerender(&mut self) {
        let glyphs = self.font.render(&self.text, self.color);
        std::mem::replace(&mut self.glyphs, glyphs).release_to_pool();
        let (x, y) = self.origin;
        self.set_position(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> Arc<Font> {
        Arc::new(Font::new("mono"))
    }

    #[test]
    fn test_font_measure_and_render() {
        let spaced = Font::new("wide").with_letter_spacing(1);
        assert_eq!(spaced.measure("abc"), 5);
        assert_eq!(spaced.measure(""), 0);
        assert_eq!(spaced.render("abc", Color::White).row_text(0), "a b c");

        let loud = Font::new("caps").with_uppercase();
        assert_eq!(loud.render("go", Color::White).row_text(0), "GO");
    }

    #[test]
    fn test_label_keeps_center_anchor() {
        let mut label = Label::new("ab", font(), Color::White, 10, 5, Anchor::Center);
        assert_eq!(label.rect(), Rect::new(9, 5, 2, 1));

        label.set_text("abcdef");
        assert_eq!(label.rect(), Rect::new(7, 5, 6, 1));
        assert_eq!(label.rect().center().0, 10);
    }

    #[test]
    fn test_label_keeps_top_left_anchor() {
        let mut label = Label::new("ab", font(), Color::White, 3, 2, Anchor::TopLeft);
        label.set_text("abcdef");
        assert_eq!(label.rect(), Rect::new(3, 2, 6, 1));

        label.set_position(0, 0);
        assert_eq!(label.rect(), Rect::new(0, 0, 6, 1));
    }

    #[test]
    fn test_label_centered_in_frame() {
        let label = Label::centered_in("hi", font(), Color::White, Rect::new(0, 0, 10, 3));
        assert_eq!(label.rect(), Rect::new(4, 1, 2, 1));
    }

    #[test]
    fn test_sprite_scaled() {
        let sprite = Sprite::panel(4, 2, Color::Blue);
        let doubled = sprite.scaled(2.0);
        assert_eq!((doubled.width(), doubled.height()), (8, 4));
        assert_eq!(doubled.cells().get(7, 3).bg_color, Some(Color::Blue));

        let same = sprite.scaled(1.0);
        assert_eq!((same.width(), same.height()), (4, 2));
    }

    #[test]
    fn test_sprite_from_image() {
        let img = DynamicImage::new_luma8(8, 8);
        let sprite = Sprite::from_image(&img, 4, 2, Color::Green).unwrap();
        assert_eq!((sprite.width(), sprite.height()), (4, 2));
        assert!(Sprite::from_image(&img, 0, 2, Color::Green).is_err());
    }
}
