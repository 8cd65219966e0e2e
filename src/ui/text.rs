use super::element::{Element, ElementCore};
use crate::input::InputEvent;
use crate::resources::{Anchor, Font, Label};
use crate::surface::Surface;
use crate::Color;
use std::sync::Arc;

/// Display-only text label. Its bounds follow the rendered glyphs.
pub struct Text {
    core: ElementCore,
    label: Label,
}

impl Text {
    pub fn new(x: usize, y: usize, text: impl Into<String>, font: Arc<Font>, color: Color, anchor: Anchor) -> Self {
        let label = Label::new(text, font, color, x, y, anchor);
        Self {
            core: ElementCore::new(label.rect()),
            label,
        }
    }

    pub fn text(&self) -> &str {
        self.label.text()
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Re-render with `text`, keeping the construction-time anchor.
    pub fn update_text(&mut self, text: impl Into<String>) {
        self.label.set_text(text);
        self.core.set_rect(self.label.rect());
    }

    pub fn set_color(&mut self, color: Color) {
        self.label.set_color(color);
    }

    pub fn set_position(&mut self, x: usize, y: usize) {
        self.label.set_position(x, y);
        self.core.set_rect(self.label.rect());
    }
}

impl Element for Text {
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
        if self.core.is_visible() {
            self.label.draw(surface, self.core.opacity(), None);
        }
    }
}
