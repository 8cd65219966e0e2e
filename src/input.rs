//! Input handling: decoded events consumed by the UI, live pointer tracking,
//! and the terminal front end that produces them.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind},
    terminal, ExecutableCommand,
};
use std::io::{self, stdout};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Keycodes the widgets care about; everything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Enter,
    Escape,
    Tab,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Char(char),
    F(u8),
    Other,
}

/// Input event types, already decoded by the frame driver
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMove { x: usize, y: usize },
    PointerDown { x: usize, y: usize, button: PointerButton },
    PointerUp { x: usize, y: usize, button: PointerButton },
    /// `ch` carries the printable character produced by the key, if any.
    KeyDown { key: Key, ch: Option<char> },
}

impl InputEvent {
    pub fn pointer_move(x: usize, y: usize) -> Self {
        Self::PointerMove { x, y }
    }

    /// Primary button press
    pub fn click(x: usize, y: usize) -> Self {
        Self::PointerDown { x, y, button: PointerButton::Primary }
    }

    /// Primary button release
    pub fn release(x: usize, y: usize) -> Self {
        Self::PointerUp { x, y, button: PointerButton::Primary }
    }

    pub fn key(key: Key) -> Self {
        Self::KeyDown { key, ch: None }
    }

    /// Key press producing a printable character
    pub fn char(ch: char) -> Self {
        Self::KeyDown { key: Key::Char(ch), ch: Some(ch) }
    }

    pub fn position(&self) -> Option<(usize, usize)> {
        match *self {
            Self::PointerMove { x, y } | Self::PointerDown { x, y, .. } | Self::PointerUp { x, y, .. } => Some((x, y)),
            Self::KeyDown { .. } => None,
        }
    }

    pub fn is_primary_down(&self) -> bool {
        matches!(self, Self::PointerDown { button: PointerButton::Primary, .. })
    }

    pub fn is_primary_up(&self) -> bool {
        matches!(self, Self::PointerUp { button: PointerButton::Primary, .. })
    }

    /// Decode a crossterm event. Key releases and non-UI events yield `None`.
    pub fn from_crossterm(event: &Event) -> Option<Self> {
        match event {
            Event::Key(KeyEvent { code, modifiers, kind, .. }) => {
                if *kind == KeyEventKind::Release {
                    return None;
                }
                let key = match code {
                    KeyCode::Backspace => Key::Backspace,
                    KeyCode::Enter => Key::Enter,
                    KeyCode::Esc => Key::Escape,
                    KeyCode::Tab => Key::Tab,
                    KeyCode::Delete => Key::Delete,
                    KeyCode::Left => Key::Left,
                    KeyCode::Right => Key::Right,
                    KeyCode::Up => Key::Up,
                    KeyCode::Down => Key::Down,
                    KeyCode::Home => Key::Home,
                    KeyCode::End => Key::End,
                    KeyCode::Char(c) => Key::Char(*c),
                    KeyCode::F(n) => Key::F(*n),
                    _ => Key::Other,
                };
                // Le combinazioni con Ctrl non producono testo
                let ch = match code {
                    KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => Some(*c),
                    _ => None,
                };
                Some(Self::KeyDown { key, ch })
            }
            Event::Mouse(MouseEvent { column, row, kind, .. }) => {
                let (x, y) = (*column as usize, *row as usize);
                match kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(Self::PointerMove { x, y }),
                    MouseEventKind::Down(b) => Some(Self::PointerDown { x, y, button: map_button(*b) }),
                    MouseEventKind::Up(b) => Some(Self::PointerUp { x, y, button: map_button(*b) }),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

fn map_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    }
}

/// Live pointer state, rebuilt from the event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    pub position: Option<(usize, usize)>,
    pub primary_down: bool,
}

impl PointerState {
    pub fn observe(&mut self, event: &InputEvent) {
        if let Some(position) = event.position() {
            self.position = Some(position);
        }
        if event.is_primary_down() {
            self.primary_down = true;
        } else if event.is_primary_up() {
            self.primary_down = false;
        }
    }
}

/// Events coming out of the terminal: UI input plus driver-level signals.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalEvent {
    Ui(InputEvent),
    Resize { width: u16, height: u16 },
    Quit,
}

/// Input manager for handling terminal events
pub struct InputManager {
    last_terminal_size: (u16, u16),
}

impl InputManager {
    /// Enter raw mode and the alternate screen with mouse capture.
    /// Restored on drop.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;

        Ok(Self {
            last_terminal_size: terminal::size().unwrap_or((80, 24)),
        })
    }

    pub fn terminal_size(&self) -> (u16, u16) {
        self.last_terminal_size
    }

    pub fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TerminalEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let event = event::read()?;
        match &event {
            Event::Key(KeyEvent { code: KeyCode::Char('c'), modifiers, .. })
                if modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Ok(Some(TerminalEvent::Quit))
            }
            Event::Resize(width, height) => {
                self.last_terminal_size = (*width, *height);
                Ok(Some(TerminalEvent::Resize { width: *width, height: *height }))
            }
            _ => Ok(InputEvent::from_crossterm(&event).map(TerminalEvent::Ui)),
        }
    }

    /// Drain everything already queued without blocking.
    pub fn drain(&mut self) -> io::Result<Vec<TerminalEvent>> {
        let mut events = Vec::new();
        while let Some(event) = self.poll_event(Duration::ZERO)? {
            events.push(event);
        }
        Ok(events)
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        stdout().execute(terminal::Clear(terminal::ClearType::All))?;
        stdout().execute(cursor::MoveTo(0, 0))?;
        Ok(())
    }
}

impl Drop for InputManager {
    fn drop(&mut self) {
        let _ = crossterm::execute!(
            stdout(),
            cursor::Show,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key_event(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_decode_printable_key() {
        let decoded = InputEvent::from_crossterm(&key_event(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(decoded, Some(InputEvent::char('x')));
    }

    #[test]
    fn test_decode_control_key_has_no_text() {
        let decoded = InputEvent::from_crossterm(&key_event(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(decoded, Some(InputEvent::KeyDown { key: Key::Char('a'), ch: None }));

        let enter = InputEvent::from_crossterm(&key_event(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(enter, Some(InputEvent::key(Key::Enter)));
    }

    #[test]
    fn test_decode_mouse() {
        let down = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(InputEvent::from_crossterm(&down), Some(InputEvent::click(4, 7)));

        let scroll = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(InputEvent::from_crossterm(&scroll), None);
    }

    #[test]
    fn test_pointer_state_tracks_events() {
        let mut pointer = PointerState::default();
        assert_eq!(pointer.position, None);

        pointer.observe(&InputEvent::pointer_move(3, 4));
        assert_eq!(pointer.position, Some((3, 4)));

        pointer.observe(&InputEvent::click(5, 6));
        assert!(pointer.primary_down);

        pointer.observe(&InputEvent::char('q'));
        assert_eq!(pointer.position, Some((5, 6)));

        pointer.observe(&InputEvent::release(1, 1));
        assert!(!pointer.primary_down);
        assert_eq!(pointer.position, Some((1, 1)));
    }
}
