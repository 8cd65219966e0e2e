//! Shared element state and the capability trait every widget implements.

use super::state::UIState;
use crate::animation::{Animation, Fade};
use crate::config::UiConfig;
use crate::input::{InputEvent, PointerState};
use crate::surface::Surface;
use crate::{Color, Rect};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub type ElementCallback = Box<dyn FnMut(&ElementCore)>;
pub type StateChangeCallback = Box<dyn FnMut(&ElementCore, UIState, UIState)>;

/// Default opacity step per `update` call.
pub const DEFAULT_FADE_SPEED: u8 = 5;

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Geometry, flags, state machine, fade and callback slots shared by all widgets.
///
/// `state` is coupled to `enabled` and `visible`: every write goes through
/// [`ElementCore::set_state`], which fires `on_state_change` only when the
/// value actually changes.
pub struct ElementCore {
    id: u64,
    rect: Rect,
    state: UIState,
    enabled: bool,
    visible: bool,
    focused: bool,
    fade: Fade,
    pub on_click: Option<ElementCallback>,
    pub on_hover_enter: Option<ElementCallback>,
    pub on_hover_exit: Option<ElementCallback>,
    pub on_state_change: Option<StateChangeCallback>,
}

impl ElementCore {
    pub fn new(rect: Rect) -> Self {
        Self {
            id: NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed),
            rect,
            state: UIState::Normal,
            enabled: true,
            visible: true,
            focused: false,
            fade: Fade::new(DEFAULT_FADE_SPEED),
            on_click: None,
            on_hover_enter: None,
            on_hover_exit: None,
            on_state_change: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn state(&self) -> UIState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn opacity(&self) -> u8 {
        self.fade.opacity()
    }

    pub fn target_opacity(&self) -> u8 {
        self.fade.target()
    }

    pub fn fade_speed(&self) -> u8 {
        self.fade.speed()
    }

    pub fn set_fade_speed(&mut self, speed: u8) {
        self.fade.set_speed(speed);
    }

    pub fn set_state(&mut self, new_state: UIState) {
        if self.state == new_state {
            return;
        }
        let old_state = self.state;
        self.state = new_state;
        tracing::trace!("element {}: {:?} -> {:?}", self.id, old_state, new_state);

        if let Some(mut callback) = self.on_state_change.take() {
            callback(self, old_state, new_state);
            // La callback potrebbe averne installata una nuova
            if self.on_state_change.is_none() {
                self.on_state_change = Some(callback);
            }
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.set_state(if enabled { UIState::Normal } else { UIState::Disabled });
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.set_state(UIState::Hidden);
        }
    }

    pub fn enable(&mut self) {
        self.set_enabled(true);
    }

    pub fn disable(&mut self) {
        self.set_enabled(false);
    }

    /// Make visible and fade in from transparent on the following updates.
    pub fn show(&mut self) {
        self.visible = true;
        self.set_state(UIState::Normal);
        self.fade.restart_in();
    }

    /// Start fading out. The element keeps drawing until fully transparent,
    /// then `update` hides it.
    pub fn hide(&mut self) {
        self.fade.fade_out();
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn unfocus(&mut self) {
        self.focused = false;
    }

    pub fn set_position(&mut self, x: usize, y: usize) {
        self.rect.x = x;
        self.rect.y = y;
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.rect.width = width;
        self.rect.height = height;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn is_hovered(&self, pointer: &PointerState) -> bool {
        if !self.visible || !self.enabled {
            return false;
        }
        pointer.position.is_some_and(|(x, y)| self.rect.contains(x, y))
    }

    /// Pick a color for the current state, falling back to `normal`.
    pub fn state_color(&self, normal: Color, hover: Option<Color>, active: Option<Color>, disabled: Option<Color>) -> Color {
        let picked = match self.state {
            UIState::Disabled => disabled,
            UIState::Active => active,
            UIState::Hover => hover,
            UIState::Normal | UIState::Hidden => None,
        };
        picked.unwrap_or(normal)
    }

    /// Base pointer handling: primary press inside the bounds activates the
    /// element and fires `on_click` (handled); primary release ends an
    /// activation (never handled, so every element sees it).
    pub fn handle_pointer(&mut self, event: &InputEvent) -> bool {
        if !self.visible || !self.enabled {
            return false;
        }

        match *event {
            InputEvent::PointerDown { x, y, .. } if event.is_primary_down() && self.rect.contains(x, y) => {
                self.set_state(UIState::Active);
                self.fire_click();
                true
            }
            InputEvent::PointerUp { x, y, .. } if event.is_primary_up() => {
                if self.state == UIState::Active {
                    let next = if self.rect.contains(x, y) { UIState::Hover } else { UIState::Normal };
                    self.set_state(next);
                }
                false
            }
            _ => false,
        }
    }

    /// Hover transitions, fade step and self-hide. Hidden elements are frozen.
    pub fn update(&mut self, dt: f32, pointer: &PointerState) {
        if !self.visible {
            return;
        }

        if self.enabled {
            let hovered = self.is_hovered(pointer);
            if hovered && self.state == UIState::Normal {
                self.set_state(UIState::Hover);
                self.fire(Hook::HoverEnter);
            } else if !hovered && self.state == UIState::Hover {
                self.set_state(UIState::Normal);
                self.fire(Hook::HoverExit);
            }
        }

        self.fade.update(dt);
        if self.fade.is_gone() {
            tracing::trace!("element {}: faded out", self.id);
            self.set_visible(false);
        }
    }

    pub(crate) fn fire_click(&mut self) {
        self.fire(Hook::Click);
    }

    fn hook_mut(&mut self, hook: Hook) -> &mut Option<ElementCallback> {
        match hook {
            Hook::Click => &mut self.on_click,
            Hook::HoverEnter => &mut self.on_hover_enter,
            Hook::HoverExit => &mut self.on_hover_exit,
        }
    }

    // La callback viene tolta dallo slot durante la chiamata, poi rimessa
    fn fire(&mut self, hook: Hook) {
        if let Some(mut callback) = self.hook_mut(hook).take() {
            callback(self);
            let slot = self.hook_mut(hook);
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Hook {
    Click,
    HoverEnter,
    HoverExit,
}

impl fmt::Debug for ElementCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementCore")
            .field("id", &self.id)
            .field("rect", &self.rect)
            .field("state", &self.state)
            .field("enabled", &self.enabled)
            .field("visible", &self.visible)
            .field("focused", &self.focused)
            .field("fade", &self.fade)
            .finish_non_exhaustive()
    }
}

/// Capability every widget implements.
///
/// Widgets expose their [`ElementCore`]; the provided methods forward the
/// shared operations to it so the side effects of the state setters cannot
/// be bypassed.
pub trait Element {
    fn core(&self) -> &ElementCore;
    fn core_mut(&mut self) -> &mut ElementCore;

    /// Returns true when the event was consumed; dispatch stops there.
    fn handle_event(&mut self, event: &InputEvent) -> bool {
        self.core_mut().handle_pointer(event)
    }

    fn update(&mut self, dt: f32, pointer: &PointerState) {
        self.core_mut().update(dt, pointer);
    }

    fn draw(&mut self, surface: &mut dyn Surface);

    /// Apply manager-wide defaults when first registered.
    fn configure(&mut self, config: &UiConfig) {
        self.core_mut().set_fade_speed(config.fade_speed);
    }

    fn show(&mut self) {
        self.core_mut().show();
    }

    fn hide(&mut self) {
        self.core_mut().hide();
    }

    fn enable(&mut self) {
        self.core_mut().enable();
    }

    fn disable(&mut self) {
        self.core_mut().disable();
    }
}
