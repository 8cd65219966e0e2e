//! User interface components and widgets

mod button;
mod element;
mod input_box;
mod state;
mod text;
mod text_box;

pub use button::Button;
pub use element::{Element, ElementCallback, ElementCore, StateChangeCallback, DEFAULT_FADE_SPEED};
pub use input_box::{InputBox, SubmitCallback, TextChangeCallback};
pub use state::UIState;
pub use text::Text;
pub use text_box::TextBox;

use crate::config::UiConfig;
use crate::input::{InputEvent, PointerState};
use crate::surface::Surface;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a registered element. Identity is the allocation.
pub type ElementRef = Rc<RefCell<dyn Element>>;

/// Wrap a widget so it can be registered while the caller keeps a typed handle.
pub fn shared<W: Element + 'static>(widget: W) -> Rc<RefCell<W>> {
    Rc::new(RefCell::new(widget))
}

fn same_element(a: &ElementRef, b: &ElementRef) -> bool {
    // Confronta solo l'indirizzo dati, non la vtable
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

/// UI manager: ordered element registry plus named, non-exclusive groups.
///
/// Callbacks run while the element is mutably borrowed and while the manager
/// is in the middle of a frame call, so they must not re-enter either one;
/// record the intent and act on it after the frame call returns.
#[derive(Default)]
pub struct UIManager {
    elements: Vec<ElementRef>,
    groups: HashMap<String, Vec<ElementRef>>,
    pointer: PointerState,
    config: UiConfig,
}

impl UIManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UiConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Pointer state rebuilt from every event seen by `handle_events`.
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, element: &ElementRef) -> bool {
        self.elements.iter().any(|e| same_element(e, element))
    }

    pub fn elements(&self) -> &[ElementRef] {
        &self.elements
    }

    /// Register `element` (once) and optionally add it to `group`.
    /// An element may belong to several groups.
    pub fn add(&mut self, element: ElementRef, group: Option<&str>) {
        if !self.contains(&element) {
            element.borrow_mut().configure(&self.config);
            tracing::debug!("UIManager: added element {}", element.borrow().core().id());
            self.elements.push(element.clone());
        }

        if let Some(name) = group {
            let members = self.groups.entry(name.to_string()).or_default();
            if !members.iter().any(|e| same_element(e, &element)) {
                members.push(element);
            }
        }
    }

    /// Unregister `element` and scrub it from every group. Unknown elements are ignored.
    pub fn remove(&mut self, element: &ElementRef) {
        let before = self.elements.len();
        self.elements.retain(|e| !same_element(e, element));
        for members in self.groups.values_mut() {
            members.retain(|e| !same_element(e, element));
        }
        if self.elements.len() != before {
            tracing::debug!("UIManager: removed element {}", element.borrow().core().id());
        }
    }

    /// Members of `name`, or an empty slice for unknown groups.
    pub fn get_group(&self, name: &str) -> &[ElementRef] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn show_group(&mut self, name: &str) {
        self.for_group(name, "show", |e| e.show());
    }

    pub fn hide_group(&mut self, name: &str) {
        self.for_group(name, "hide", |e| e.hide());
    }

    pub fn enable_group(&mut self, name: &str) {
        self.for_group(name, "enable", |e| e.enable());
    }

    pub fn disable_group(&mut self, name: &str) {
        self.for_group(name, "disable", |e| e.disable());
    }

    fn for_group(&self, name: &str, action: &str, mut apply: impl FnMut(&mut dyn Element)) {
        let members = self.get_group(name);
        tracing::debug!("UIManager: {} group '{}' ({} elements)", action, name, members.len());
        for element in members {
            apply(&mut *element.borrow_mut());
        }
    }

    /// Dispatch each event in registration order until an element handles it.
    pub fn handle_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.pointer.observe(event);
            for element in &self.elements {
                let mut element = element.borrow_mut();
                if element.handle_event(event) {
                    tracing::trace!("event {:?} handled by element {}", event, element.core().id());
                    break;
                }
            }
        }
    }

    /// Update every element, in registration order.
    pub fn update(&mut self, dt: f32) {
        for element in &self.elements {
            element.borrow_mut().update(dt, &self.pointer);
        }
    }

    /// Draw every element; later registrations end up on top.
    pub fn draw(&mut self, surface: &mut dyn Surface) {
        for element in &self.elements {
            element.borrow_mut().draw(surface);
        }
    }

    pub fn clear(&mut self) {
        tracing::debug!("UIManager: cleared {} elements", self.elements.len());
        self.elements.clear();
        self.groups.clear();
    }

    /// Unregister every member of `name` and drop the group.
    /// Removed elements also leave any other group they were in.
    pub fn clear_group(&mut self, name: &str) {
        let Some(members) = self.groups.remove(name) else {
            return;
        };
        tracing::debug!("UIManager: clearing group '{}' ({} elements)", name, members.len());
        for element in &members {
            self.remove(element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Font;
    use crate::{Color, Rect, StyledFrameBuffer};
    use std::cell::Cell;
    use std::sync::Arc;

    /// Minimal element drawing a single marker character.
    struct Marker {
        core: ElementCore,
        marker: char,
    }

    impl Marker {
        fn new(rect: Rect, marker: char) -> Rc<RefCell<Self>> {
            shared(Self {
                core: ElementCore::new(rect),
                marker,
            })
        }
    }

    impl Element for Marker {
        fn core(&self) -> &ElementCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ElementCore {
            &mut self.core
        }

        fn draw(&mut self, surface: &mut dyn Surface) {
            if self.core.is_visible() {
                surface.fill(self.core.rect(), self.marker, Color::White);
            }
        }
    }

    fn counter(marker: &Rc<RefCell<Marker>>) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let sink = count.clone();
        marker.borrow_mut().core.on_click = Some(Box::new(move |_| sink.set(sink.get() + 1)));
        count
    }

    #[test]
    fn test_add_is_unique() {
        let mut ui = UIManager::new();
        let marker = Marker::new(Rect::new(0, 0, 2, 2), 'a');
        ui.add(marker.clone(), None);
        ui.add(marker.clone(), Some("one"));
        ui.add(marker.clone(), Some("one"));
        ui.add(marker.clone(), Some("two"));

        assert_eq!(ui.len(), 1);
        assert_eq!(ui.get_group("one").len(), 1);
        assert_eq!(ui.get_group("two").len(), 1);
    }

    #[test]
    fn test_same_group_twice_keeps_one_entry() {
        let mut ui = UIManager::new();
        let marker: ElementRef = Marker::new(Rect::new(0, 0, 2, 2), 'a');
        let other: ElementRef = Marker::new(Rect::new(4, 0, 2, 2), 'b');

        ui.add(marker.clone(), Some("hud"));
        ui.add(other.clone(), Some("hud"));
        ui.add(marker.clone(), Some("hud"));

        // La seconda aggiunta non crea un duplicato né cambia l'ordine
        let hud = ui.get_group("hud");
        assert_eq!(hud.len(), 2);
        assert!(same_element(&hud[0], &marker));
        assert!(same_element(&hud[1], &other));

        ui.remove(&marker);
        assert_eq!(ui.get_group("hud").len(), 1);
    }

    #[test]
    fn test_remove_scrubs_groups() {
        let mut ui = UIManager::new();
        let marker: ElementRef = Marker::new(Rect::new(0, 0, 2, 2), 'a');
        let other: ElementRef = Marker::new(Rect::new(0, 0, 2, 2), 'b');
        ui.add(marker.clone(), Some("one"));
        ui.add(marker.clone(), Some("two"));
        ui.add(other.clone(), Some("two"));

        ui.remove(&marker);
        assert_eq!(ui.len(), 1);
        assert!(ui.get_group("one").is_empty());
        assert_eq!(ui.get_group("two").len(), 1);
        assert!(!ui.contains(&marker));

        // Elemento assente: nessun effetto
        ui.remove(&marker);
        assert_eq!(ui.len(), 1);
    }

    #[test]
    fn test_unknown_group_is_noop() {
        let mut ui = UIManager::new();
        let marker = Marker::new(Rect::new(0, 0, 2, 2), 'a');
        ui.add(marker.clone(), Some("real"));

        ui.show_group("doesNotExist");
        ui.hide_group("doesNotExist");
        ui.disable_group("doesNotExist");
        ui.clear_group("doesNotExist");
        assert!(ui.get_group("doesNotExist").is_empty());

        let marker = marker.borrow();
        assert_eq!(marker.core.state(), UIState::Normal);
        assert_eq!(marker.core.opacity(), 255);
        assert_eq!(marker.core.target_opacity(), 255);
        assert_eq!(ui.len(), 1);
    }

    #[test]
    fn test_dispatch_short_circuits_per_event() {
        let mut ui = UIManager::new();
        let first = Marker::new(Rect::new(0, 0, 10, 10), 'a');
        let second = Marker::new(Rect::new(5, 5, 10, 10), 'b');
        let first_clicks = counter(&first);
        let second_clicks = counter(&second);
        ui.add(first.clone(), None);
        ui.add(second.clone(), None);

        ui.handle_events(&[InputEvent::click(6, 6), InputEvent::click(12, 12)]);
        assert_eq!(first_clicks.get(), 1);
        assert_eq!(second_clicks.get(), 1);
        assert_eq!(ui.pointer().position, Some((12, 12)));
    }

    #[test]
    fn test_update_reaches_every_element() {
        let mut ui = UIManager::new();
        let a = Marker::new(Rect::new(0, 0, 2, 2), 'a');
        let b = Marker::new(Rect::new(0, 0, 2, 2), 'b');
        ui.add(a.clone(), Some("g"));
        ui.add(b.clone(), Some("g"));
        ui.hide_group("g");
        ui.update(0.016);

        assert_eq!(a.borrow().core.opacity(), 250);
        assert_eq!(b.borrow().core.opacity(), 250);
    }

    #[test]
    fn test_draw_order_later_on_top() {
        let mut ui = UIManager::new();
        ui.add(Marker::new(Rect::new(0, 0, 3, 1), 'a'), None);
        ui.add(Marker::new(Rect::new(1, 0, 3, 1), 'b'), None);

        let mut fb = StyledFrameBuffer::new(4, 1);
        ui.draw(&mut fb);
        assert_eq!(fb.row_text(0), "abbb");
    }

    #[test]
    fn test_clear_group_removes_from_master_and_other_groups() {
        let mut ui = UIManager::new();
        let shared_marker = Marker::new(Rect::new(0, 0, 2, 2), 'a');
        let loose = Marker::new(Rect::new(0, 0, 2, 2), 'b');
        ui.add(shared_marker.clone(), Some("menu"));
        ui.add(shared_marker.clone(), Some("all"));
        ui.add(loose.clone(), None);

        ui.clear_group("menu");
        assert_eq!(ui.len(), 1);
        assert!(ui.get_group("menu").is_empty());
        assert!(ui.get_group("all").is_empty());

        ui.clear();
        assert!(ui.is_empty());
    }

    #[test]
    fn test_config_applied_on_registration() {
        let config = UiConfig {
            fade_speed: 17,
            ..UiConfig::default()
        };
        let mut ui = UIManager::with_config(config);
        let text = shared(Text::new(0, 0, "hp", Arc::new(Font::new("mono")), Color::White, crate::Anchor::TopLeft));
        ui.add(text.clone(), None);
        assert_eq!(text.borrow().core().fade_speed(), 17);

        // Le modifiche successive restano
        text.borrow_mut().core_mut().set_fade_speed(3);
        ui.add(text.clone(), Some("labels"));
        assert_eq!(text.borrow().core().fade_speed(), 3);
    }
}
