//! Menu demo: drives the widget framework from a terminal frame loop.
//!
//! - Main menu with buttons grouped as "main"
//! - Name form (input box + preview box) grouped as "form"
//! - Groups fade in and out on navigation
//!
//! Logs go to `fw-demo.log`; set `RUST_LOG=trace` for state changes.

use anyhow::{Context, Result};
use frame_widgets::input::{InputManager, TerminalEvent};
use frame_widgets::ui::{shared, ElementCallback};
use frame_widgets::{
    Anchor, Button, Color, Element, Font, FrameTimer, InputBox, Sprite, StyledFrameBuffer, Text, TextBox, UIManager,
    UiConfig,
};
use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::{stdout, Write};
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    None,
    OpenForm,
    BackToMenu,
    Quit,
}

fn on_click(action: &Rc<Cell<Action>>, value: Action) -> ElementCallback {
    let action = action.clone();
    Box::new(move |_| action.set(value))
}

struct MenuDemo {
    ui: UIManager,
    action: Rc<Cell<Action>>,
    submitted: Rc<RefCell<Option<String>>>,
    preview: Rc<RefCell<TextBox>>,
    name_input: Rc<RefCell<InputBox>>,
    width: usize,
    height: usize,
}

impl MenuDemo {
    fn new(config: UiConfig, width: usize, height: usize) -> Self {
        let mut ui = UIManager::with_config(config.clone());
        let font = Arc::new(Font::new("mono"));
        let title_font = Arc::new(Font::new("title").with_uppercase().with_letter_spacing(1));
        let button_img = Sprite::panel(16, 3, Color::Blue);
        let frame_img = Sprite::panel(24, 3, Color::Black);
        let action = Rc::new(Cell::new(Action::None));
        let submitted = Rc::new(RefCell::new(None));
        let cx = width / 2;

        let title = shared(Text::new(cx, 2, "Clan of cats", title_font, Color::Yellow, Anchor::Center));
        ui.add(title, None);

        for (row, (text, value)) in [("New name", Action::OpenForm), ("Quit", Action::Quit)].into_iter().enumerate() {
            let button = shared(
                Button::new(cx, 7 + row * 4, &button_img, 1.0, text, font.clone(), Color::White, Anchor::Center)
                    .with_hover_color(Color::Yellow)
                    .with_active_color(Color::Red),
            );
            button.borrow_mut().core_mut().on_click = Some(on_click(&action, value));
            ui.add(button, Some("main"));
        }

        let name_input = shared(InputBox::new(
            &frame_img,
            cx,
            7,
            font.clone(),
            1.0,
            Color::White,
            "Type a name",
            Anchor::Center,
            config.input_max_length,
        ));
        {
            let sink = submitted.clone();
            name_input.borrow_mut().on_submit = Some(Box::new(move |_, text| {
                *sink.borrow_mut() = Some(text.to_string());
            }));
        }
        ui.add(name_input.clone(), Some("form"));

        let preview = shared(TextBox::new(&frame_img, cx, 11, "-", font.clone(), 1.0, Color::Green, Anchor::Center));
        ui.add(preview.clone(), Some("form"));

        let back = shared(Button::new(cx, 15, &button_img, 1.0, "Back", font, Color::White, Anchor::Center));
        back.borrow_mut().core_mut().on_click = Some(on_click(&action, Action::BackToMenu));
        ui.add(back, Some("form"));

        // Il form parte nascosto
        for element in ui.get_group("form") {
            element.borrow_mut().core_mut().set_visible(false);
        }

        Self {
            ui,
            action,
            submitted,
            preview,
            name_input,
            width,
            height,
        }
    }

    /// Apply whatever the callbacks recorded during the frame.
    /// Returns false when the demo should stop.
    fn apply_actions(&mut self) -> bool {
        if let Some(name) = self.submitted.borrow_mut().take() {
            tracing::info!("name submitted: {}", name);
            self.preview.borrow_mut().update_text(format!("Hello, {}!", name));
            self.name_input.borrow_mut().clear();
        }

        match self.action.replace(Action::None) {
            Action::None => true,
            Action::OpenForm => {
                self.ui.hide_group("main");
                self.ui.show_group("form");
                self.name_input.borrow_mut().focus();
                true
            }
            Action::BackToMenu => {
                self.name_input.borrow_mut().unfocus();
                self.ui.hide_group("form");
                self.ui.show_group("main");
                true
            }
            Action::Quit => false,
        }
    }

    fn run(&mut self, input: &mut InputManager) -> Result<()> {
        let mut timer = FrameTimer::new(60);
        let mut frame = StyledFrameBuffer::new(self.width, self.height);
        let mut last_frame = StyledFrameBuffer::new(0, 0);
        input.clear_screen()?;

        loop {
            let mut events = Vec::new();
            for event in input.drain()? {
                match event {
                    TerminalEvent::Ui(event) => events.push(event),
                    TerminalEvent::Quit => return Ok(()),
                    TerminalEvent::Resize { width, height } => {
                        tracing::debug!("terminal resized to {}x{}", width, height);
                        last_frame = StyledFrameBuffer::new(0, 0);
                    }
                }
            }

            let dt = timer.wait_for_next_frame();
            self.ui.handle_events(&events);
            self.ui.update(dt);
            if !self.apply_actions() {
                return Ok(());
            }

            frame.clear();
            self.ui.draw(&mut frame);
            let mut out = stdout();
            write!(out, "{}", frame.render_partial(&last_frame)).context("failed to write frame")?;
            out.flush().context("failed to flush frame")?;
            last_frame = frame.clone();
        }
    }
}

fn main() -> Result<()> {
    let log_file = File::create("fw-demo.log").context("failed to create log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let config = UiConfig::load("fw-demo.toml").context("failed to load UI config")?;
    let mut input = InputManager::new().context("failed to set up terminal")?;
    let (cols, rows) = input.terminal_size();
    let mut demo = MenuDemo::new(config, cols as usize, rows as usize);
    demo.run(&mut input)
}
