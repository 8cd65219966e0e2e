use super::element::{Element, ElementCore};
use super::state::UIState;
use crate::config::UiConfig;
use crate::input::{InputEvent, PointerState};
use crate::resources::{Anchor, Font, Label, Sprite};
use crate::surface::Surface;
use crate::Color;
use std::sync::Arc;

/// Image with a centered text label.
///
/// Clicks come from the event path only. [`Button::draw_polled`] exposes
/// them as a one-shot "pressed" flag for callers that poll at draw time.
/// The flag only survives until the next `update` without a fresh click,
/// and is re-armed once the primary button is fully released.
pub struct Button {
    core: ElementCore,
    image: Sprite,
    label: Label,
    anchor: Anchor,
    text_color: Color,
    hover_color: Option<Color>,
    active_color: Option<Color>,
    disabled_label_opacity: u8,
    clicked: bool,
    pressed: bool,
    pressed_this_frame: bool,
}

impl Button {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: usize,
        y: usize,
        image: &Sprite,
        scale: f32,
        text: impl Into<String>,
        font: Arc<Font>,
        text_color: Color,
        anchor: Anchor,
    ) -> Self {
        let image = image.scaled(scale);
        let rect = anchor.place(x, y, image.width(), image.height());
        let label = Label::centered_in(text, font, text_color, rect);

        Self {
            core: ElementCore::new(rect),
            image,
            label,
            anchor,
            text_color,
            hover_color: None,
            active_color: None,
            disabled_label_opacity: UiConfig::default().disabled_label_opacity,
            clicked: false,
            pressed: false,
            pressed_this_frame: false,
        }
    }

    pub fn with_hover_color(mut self, color: Color) -> Self {
        self.hover_color = Some(color);
        self
    }

    pub fn with_active_color(mut self, color: Color) -> Self {
        self.active_color = Some(color);
        self
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

    /// Draw, then report whether a click landed this frame.
    pub fn draw_polled(&mut self, surface: &mut dyn Surface) -> bool {
        self.draw(surface);
        std::mem::take(&mut self.pressed)
    }
}

impl Element for Button {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn handle_event(&mut self, event: &InputEvent) -> bool {
        let handled = self.core.handle_pointer(event);
        if handled && !self.clicked {
            self.clicked = true;
            self.pressed = true;
            self.pressed_this_frame = true;
        }
        handled
    }

    fn update(&mut self, dt: f32, pointer: &PointerState) {
        if !pointer.primary_down {
            self.clicked = false;
        }
        // Un click non letto scade col frame in cui è arrivato
        if !std::mem::take(&mut self.pressed_this_frame) {
            self.pressed = false;
        }
        self.core.update(dt, pointer);
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        if !self.core.is_visible() {
            return;
        }

        let opacity = self.core.opacity();
        surface.blit(self.image.cells(), self.core.rect(), opacity, None);

        if self.core.state() == UIState::Disabled {
            self.label.draw(surface, self.disabled_label_opacity, None);
        } else {
            let tint = self.core.state_color(self.text_color, self.hover_color, self.active_color, None);
            self.label.draw(surface, opacity, Some(tint));
        }
    }

    fn configure(&mut self, config: &UiConfig) {
        self.core.set_fade_speed(config.fade_speed);
        self.disabled_label_opacity = config.disabled_label_opacity;
    }
}
