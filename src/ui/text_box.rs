use super::element::{Element, ElementCore};
use crate::input::InputEvent;
use crate::resources::{Anchor, Font, Label, Sprite};
use crate::surface::Surface;
use crate::Color;
use std::sync::Arc;

/// Text drawn over a background image; the label stays centered on the image.
pub struct TextBox {
    core: ElementCore,
    image: Sprite,
    label: Label,
    anchor: Anchor,
}

impl TextBox {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        image: &Sprite,
        x: usize,
        y: usize,
        text: impl Into<String>,
        font: Arc<Font>,
        scale: f32,
        color: Color,
        anchor: Anchor,
    ) -> Self {
        let image = image.scaled(scale);
        let rect = anchor.place(x, y, image.width(), image.height());
        Self {
            core: ElementCore::new(rect),
            label: Label::centered_in(text, font, color, rect),
            image,
            anchor,
        }
    }

    pub fn text(&self) -> &str {
        self.label.text()
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn update_text(&mut self, text: impl Into<String>) {
        self.label.set_text(text);
        self.label.center_on(self.core.rect());
    }

    pub fn set_position(&mut self, x: usize, y: usize) {
        let rect = self.anchor.place(x, y, self.image.width(), self.image.height());
        self.core.set_rect(rect);
        self.label.center_on(rect);
    }
}

impl Element for TextBox {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn handle_event(&mut self, _event: &InputEvent) -> bool {
        false
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        if !self.core.is_visible() {
            return;
        }
        // Sfondo e testo sfumano insieme
        let opacity = self.core.opacity();
        surface.blit(self.image.cells(), self.core.rect(), opacity, None);
        self.label.draw(surface, opacity, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rect, StyledFrameBuffer};

    fn text_box() -> TextBox {
        TextBox::new(&Sprite::panel(8, 3, Color::Magenta), 0, 0, "Lv 3", Arc::new(Font::new("mono")), 1.0, Color::White, Anchor::TopLeft)
    }

    #[test]
    fn test_label_centered_on_image() {
        let mut text_box = text_box();
        assert_eq!(text_box.label().rect(), Rect::new(2, 1, 4, 1));

        text_box.update_text("Lv 10");
        assert_eq!(text_box.label().rect().center().0, 4);
        assert_eq!(text_box.text(), "Lv 10");

        text_box.set_position(10, 0);
        assert_eq!(text_box.core().rect(), Rect::new(10, 0, 8, 3));
        assert_eq!(text_box.label().rect().y, 1);
    }

    #[test]
    fn test_never_handles_events() {
        let mut text_box = text_box();
        assert!(!text_box.handle_event(&InputEvent::click(1, 1)));
    }

    #[test]
    fn test_background_and_label_fade_together() {
        let mut text_box = text_box();
        text_box.core_mut().show();
        let mut fb = StyledFrameBuffer::new(8, 3);
        text_box.draw(&mut fb);
        assert_eq!(fb.row_text(1), "        ");

        for _ in 0..10 {
            text_box.update(0.016, &Default::default());
        }
        assert_eq!(text_box.core().opacity(), 50);
        text_box.draw(&mut fb);
        assert_eq!(fb.get(0, 0).bg_color, Some(Color::Gray));
        assert_eq!(fb.get(2, 1).ch, 'L');
        assert_eq!(fb.get(2, 1).fg_color, Some(Color::Gray));
    }
}
