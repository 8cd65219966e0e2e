//! Single-line text input drawn over a frame image.
//!
//! Keyboard editing is gated by focus. A primary press inside the box focuses
//! it and makes it `Active`; a press anywhere else drops focus. While focused:
//!
//! - Backspace removes the last code point,
//! - Enter fires `on_submit` without clearing or unfocusing,
//! - Escape unfocuses and returns to `Normal`,
//! - printable characters are appended up to `max_length` code points.

use super::element::{Element, ElementCore};
use super::state::UIState;
use crate::animation::{Animation, Blink};
use crate::config::UiConfig;
use crate::input::{InputEvent, Key, PointerState};
use crate::resources::{Anchor, Font, Label, Sprite};
use crate::surface::Surface;
use crate::{Color, Rect};
use std::sync::Arc;

pub type SubmitCallback = Box<dyn FnMut(&ElementCore, &str)>;
pub type TextChangeCallback = Box<dyn FnMut(&ElementCore, &str)>;

pub struct InputBox {
    core: ElementCore,
    image: Sprite,
    anchor: Anchor,
    label: Label,
    text: String,
    placeholder: String,
    text_color: Color,
    placeholder_color: Color,
    max_length: usize,
    blink: Blink,
    pub on_submit: Option<SubmitCallback>,
    pub on_text_change: Option<TextChangeCallback>,
}

impl InputBox {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        image: &Sprite,
        x: usize,
        y: usize,
        font: Arc<Font>,
        scale: f32,
        text_color: Color,
        placeholder: impl Into<String>,
        anchor: Anchor,
        max_length: usize,
    ) -> Self {
        let image = image.scaled(scale);
        let rect = anchor.place(x, y, image.width(), image.height());
        let placeholder = placeholder.into();
        let placeholder_color = text_color.dimmed();
        let label = Label::centered_in(placeholder.clone(), font, placeholder_color, rect);

        Self {
            core: ElementCore::new(rect),
            image,
            anchor,
            label,
            text: String::new(),
            placeholder,
            text_color,
            placeholder_color,
            max_length,
            blink: Blink::new(UiConfig::default().cursor_blink_interval),
            on_submit: None,
            on_text_change: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn is_focused(&self) -> bool {
        self.core.is_focused()
    }

    pub fn cursor_visible(&self) -> bool {
        self.core.is_focused() && self.blink.visible()
    }

    pub fn focus(&mut self) {
        self.core.focus();
        self.blink.reset();
    }

    pub fn unfocus(&mut self) {
        self.core.unfocus();
    }

    /// Empty the buffer. Programmatic edits do not fire `on_text_change`.
    pub fn clear(&mut self) {
        self.text.clear();
        self.refresh_label();
    }

    /// Replace the buffer, truncated to `max_length` code points.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().take(self.max_length).collect();
        self.refresh_label();
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
        self.refresh_label();
    }

    pub fn set_position(&mut self, x: usize, y: usize) {
        let rect = self.anchor.place(x, y, self.image.width(), self.image.height());
        self.core.set_rect(rect);
        self.label.center_on(rect);
    }

    fn refresh_label(&mut self) {
        if self.text.is_empty() {
            self.label.set_content(self.placeholder.as_str(), self.placeholder_color);
        } else {
            self.label.set_content(self.text.as_str(), self.text_color);
        }
        self.label.center_on(self.core.rect());
    }

    fn text_changed(&mut self) {
        self.refresh_label();
        if let Some(callback) = self.on_text_change.as_mut() {
            callback(&self.core, &self.text);
        }
    }

    fn handle_key(&mut self, key: Key, ch: Option<char>) -> bool {
        match key {
            Key::Backspace => {
                if self.text.pop().is_some() {
                    self.text_changed();
                }
                true
            }
            Key::Enter => {
                tracing::debug!("input box {}: submit ({} chars)", self.core.id(), self.text.chars().count());
                if let Some(callback) = self.on_submit.as_mut() {
                    callback(&self.core, &self.text);
                }
                true
            }
            Key::Escape => {
                self.unfocus();
                self.core.set_state(UIState::Normal);
                true
            }
            _ => match ch {
                Some(c) if !c.is_control() => {
                    if self.text.chars().count() < self.max_length {
                        self.text.push(c);
                        self.text_changed();
                    } else {
                        tracing::trace!("input box {}: dropped {:?}, buffer full", self.core.id(), c);
                    }
                    true
                }
                _ => false,
            },
        }
    }

    fn cursor_rect(&self) -> Rect {
        let text_rect = self.label.rect();
        let x = if self.text.is_empty() { self.core.rect().center().0 } else { text_rect.right() };
        Rect::new(x, text_rect.y, 1, 1)
    }
}

impl Element for InputBox {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn handle_event(&mut self, event: &InputEvent) -> bool {
        if !self.core.is_visible() || !self.core.is_enabled() {
            return false;
        }

        match *event {
            InputEvent::PointerDown { x, y, .. } => {
                if !self.core.rect().contains(x, y) {
                    self.unfocus();
                    if self.core.state() == UIState::Active {
                        self.core.set_state(UIState::Normal);
                    }
                    false
                } else if event.is_primary_down() {
                    self.focus();
                    self.core.set_state(UIState::Active);
                    self.core.fire_click();
                    true
                } else {
                    // Altri pulsanti dentro il riquadro: nessun effetto
                    false
                }
            }
            InputEvent::PointerUp { .. } => self.core.handle_pointer(event),
            InputEvent::KeyDown { key, ch } if self.core.is_focused() => self.handle_key(key, ch),
            _ => false,
        }
    }

    fn update(&mut self, dt: f32, pointer: &PointerState) {
        self.core.update(dt, pointer);
        if self.core.is_focused() {
            self.blink.update(dt);
        }
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        if !self.core.is_visible() {
            return;
        }

        let opacity = self.core.opacity();
        let rect = self.core.rect();
        surface.blit(self.image.cells(), rect, opacity, None);
        self.label.draw(surface, opacity, None);

        if self.core.is_focused() || self.core.state() == UIState::Active {
            surface.outline(rect, self.text_color, true);
        } else if self.core.state() == UIState::Hover {
            surface.outline(rect, self.text_color, false);
        }

        if self.cursor_visible() {
            surface.fill(self.cursor_rect(), '|', self.text_color);
        }
    }

    fn configure(&mut self, config: &UiConfig) {
        self.core.set_fade_speed(config.fade_speed);
        self.blink.set_interval(config.cursor_blink_interval);
    }
}
