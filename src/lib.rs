//! Framework di widget UI guidato dal frame, disegnato su framebuffer di caratteri.
//! Fornisce:
//! - Geometria (`Rect`), colori e celle stilizzate
//! - `StyledFrameBuffer` come superficie di disegno, con pool di memoria
//! - Conversione immagini in sprite Braille
//! - Elementi UI con macchina a stati, fade e callback
//! - Manager UI con gruppi e dispatch degli eventi
//! - Widget: pulsante, testo, riquadro di testo, campo di input
//!
//! The frame driver owns the loop: each frame it collects decoded
//! [`input::InputEvent`]s and a time delta, then calls
//! [`ui::UIManager::handle_events`], [`ui::UIManager::update`] and
//! [`ui::UIManager::draw`] in that order.

use image::{DynamicImage, GrayImage};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fmt;
use std::time::{Duration, Instant};

pub mod animation;
pub mod config;
pub mod error;
pub mod input;
pub mod resources;
pub mod surface;
pub mod ui;

pub use config::UiConfig;
pub use error::{ConfigError, ConversionError};
pub use input::{InputEvent, Key, PointerButton, PointerState};
pub use resources::{Anchor, Font, Label, Sprite};
pub use surface::Surface;
pub use ui::{
    Button, Element, ElementCore, ElementRef, InputBox, Text, TextBox, UIManager, UIState,
};

/// FrameBuffer: matrice di caratteri Unicode (es. Braille), senza stile
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<char>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![' '; width * height],
        }
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = ch;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> char {
        if x < self.width && y < self.height {
            self.data[y * self.width + x]
        } else {
            ' '
        }
    }

    /// Converte in StyledFrameBuffer applicando un colore di primo piano
    pub fn to_styled(&self, fg: Option<Color>) -> StyledFrameBuffer {
        let mut styled = StyledFrameBuffer::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                styled.set(x, y, StyledChar { ch: self.get(x, y), fg_color: fg, bg_color: None });
            }
        }
        styled
    }
}

/// Rappresenta un'area rettangolare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    /// Rect of the given size whose center lands on `(cx, cy)`.
    /// Clamped at the origin, so a rect that would start off-screen is pushed in.
    pub fn from_center(cx: usize, cy: usize, width: usize, height: usize) -> Self {
        Self::new(cx.saturating_sub(width / 2), cy.saturating_sub(height / 2), width, height)
    }

    pub fn center(&self) -> (usize, usize) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn right(&self) -> usize {
        self.x + self.width
    }

    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Colore per elementi UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    Reset,
}

impl Color {
    pub fn to_ansi_fg(&self) -> &'static str {
        match self {
            Color::Black => "\x1b[30m",
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Magenta => "\x1b[35m",
            Color::Cyan => "\x1b[36m",
            Color::White => "\x1b[37m",
            Color::Gray => "\x1b[90m",
            Color::Reset => "\x1b[39m",
        }
    }

    pub fn to_ansi_bg(&self) -> &'static str {
        match self {
            Color::Black => "\x1b[40m",
            Color::Red => "\x1b[41m",
            Color::Green => "\x1b[42m",
            Color::Yellow => "\x1b[43m",
            Color::Blue => "\x1b[44m",
            Color::Magenta => "\x1b[45m",
            Color::Cyan => "\x1b[46m",
            Color::White => "\x1b[47m",
            Color::Gray => "\x1b[100m",
            Color::Reset => "\x1b[49m",
        }
    }

    /// Half-intensity variant, used for placeholders and faded cells.
    pub fn dimmed(&self) -> Color {
        match self {
            Color::Black | Color::Gray => Color::Black,
            _ => Color::Gray,
        }
    }
}

/// Carattere con attributi di colore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledChar {
    pub ch: char,
    pub fg_color: Option<Color>,
    pub bg_color: Option<Color>,
}

impl StyledChar {
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            fg_color: None,
            bg_color: None,
        }
    }

    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg_color = Some(color);
        self
    }

    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg_color = Some(color);
        self
    }

    /// A blank cell with no colors; blits skip these so sprites keep their holes.
    pub fn is_blank(&self) -> bool {
        self.ch == ' ' && self.bg_color.is_none()
    }
}

impl Default for StyledChar {
    fn default() -> Self {
        Self::new(' ')
    }
}

/// FrameBuffer avanzato con supporto colori e stili
#[derive(Debug, Clone)]
pub struct StyledFrameBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<StyledChar>,
}

impl StyledFrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![StyledChar::default(); width * height],
        }
    }

    /// Crea un nuovo styled framebuffer utilizzando il pool
    pub fn new_pooled(width: usize, height: usize) -> Self {
        let size = width * height;

        let data = {
            let mut pool = STYLED_BUFFER_POOL.lock();
            if let Some(mut reused) = pool.pop() {
                reused.clear();
                reused.resize(size, StyledChar::default());
                reused
            } else {
                vec![StyledChar::default(); size]
            }
        };

        Self { width, height, data }
    }

    /// Rilascia il buffer al pool per il riutilizzo
    pub fn release_to_pool(mut self) {
        if self.data.capacity() <= MAX_POOLED_CELLS {
            let mut pool = STYLED_BUFFER_POOL.lock();
            if pool.len() < MAX_POOLED_BUFFERS {
                self.data.clear();
                pool.push(self.data);
            }
        }
    }

    pub fn set(&mut self, x: usize, y: usize, styled_char: StyledChar) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = styled_char;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> StyledChar {
        if x < self.width && y < self.height {
            self.data[y * self.width + x]
        } else {
            StyledChar::default()
        }
    }

    pub fn clear(&mut self) {
        self.data.fill(StyledChar::default());
    }

    /// Testo della riga `y` senza stile, utile per verifiche e log
    pub fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }

    /// Disegna testo con controllo rigoroso delle dimensioni
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str, fg_color: Option<Color>, bg_color: Option<Color>) {
        if y >= self.height || x >= self.width {
            return;
        }

        for (offset, ch) in text.chars().enumerate().take(self.width - x) {
            // Evita caratteri di controllo che possono causare disallineamenti
            let safe_char = if ch.is_control() { '?' } else { ch };
            self.set(x + offset, y, StyledChar { ch: safe_char, fg_color, bg_color });
        }
    }

    /// Riempie un rettangolo con bounds checking
    pub fn draw_rect(&mut self, rect: Rect, ch: char, fg_color: Option<Color>, bg_color: Option<Color>) {
        let styled_char = StyledChar { ch, fg_color, bg_color };
        let end_x = rect.right().min(self.width);
        let end_y = rect.bottom().min(self.height);

        for y in rect.y.min(self.height)..end_y {
            for x in rect.x.min(self.width)..end_x {
                self.set(x, y, styled_char);
            }
        }
    }

    /// Renderizza solo le righe cambiate rispetto al frame precedente
    pub fn render_partial(&self, last_buffer: &StyledFrameBuffer) -> String {
        if self.width != last_buffer.width || self.height != last_buffer.height {
            return self.to_string();
        }

        let mut result = String::with_capacity(512);
        for y in 0..self.height {
            let row = y * self.width..(y + 1) * self.width;
            if self.data[row.clone()] == last_buffer.data[row] {
                continue;
            }
            result.push_str(&format!("\x1b[{};1H", y + 1));
            self.push_row(&mut result, y);
            result.push_str("\x1b[0K\x1b[0m");
        }
        result
    }

    // Cambia i colori solo quando necessario
    fn push_row(&self, out: &mut String, y: usize) {
        let mut current_fg: Option<Color> = None;
        let mut current_bg: Option<Color> = None;

        for x in 0..self.width {
            let cell = self.get(x, y);
            if cell.fg_color != current_fg {
                current_fg = cell.fg_color;
                out.push_str(current_fg.unwrap_or(Color::Reset).to_ansi_fg());
            }
            if cell.bg_color != current_bg {
                current_bg = cell.bg_color;
                out.push_str(current_bg.unwrap_or(Color::Reset).to_ansi_bg());
            }
            out.push(cell.ch);
        }
    }
}

impl fmt::Display for StyledFrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(self.width * self.height * 4);
        for y in 0..self.height {
            self.push_row(&mut out, y);
            out.push_str("\x1b[0m");
            if y + 1 < self.height {
                out.push('\n');
            }
        }
        f.write_str(&out)
    }
}

/// Converte un blocco 2x4 pixel in Braille con soglia personalizzabile
fn pixels_to_braille(block: &[u8], threshold: u8) -> char {
    // Mappa dei punti Braille: [1, 2, 3, 7, 4, 5, 6, 8]
    let mapping = [0, 1, 2, 6, 3, 4, 5, 7];
    let mut code = 0x2800;
    for (i, &px) in block.iter().enumerate() {
        if px > threshold {
            code |= 1 << mapping[i];
        }
    }
    char::from_u32(code).unwrap_or(' ')
}

/// Ridimensiona e converte un'immagine in scala di grigi
fn load_and_resize_image(img: &DynamicImage, max_width: u32, max_height: u32) -> GrayImage {
    let img = img.to_luma8();
    let (w, h) = img.dimensions();

    if w == 0 || h == 0 {
        return GrayImage::new(1, 1);
    }

    let scale = (max_width as f32 / w as f32).min(max_height as f32 / h as f32).min(1.0);
    let new_w = ((w as f32 * scale) as u32).max(1);
    let new_h = ((h as f32 * scale) as u32).max(1);

    image::imageops::resize(&img, new_w, new_h, image::imageops::FilterType::Triangle)
}

/// Converte un'immagine in un framebuffer Braille
pub fn image_to_braille_fb(img: &DynamicImage, max_width: usize, max_height: usize) -> Result<FrameBuffer, ConversionError> {
    image_to_braille_fb_with_threshold(img, max_width, max_height, 128)
}

/// Converte un'immagine in framebuffer Braille con soglia personalizzabile
pub fn image_to_braille_fb_with_threshold(
    img: &DynamicImage,
    max_width: usize,
    max_height: usize,
    threshold: u8,
) -> Result<FrameBuffer, ConversionError> {
    if max_width == 0 || max_height == 0 {
        return Err(ConversionError::InvalidDimensions { width: max_width, height: max_height });
    }

    // Ogni carattere Braille rappresenta 2x4 pixel
    let img = load_and_resize_image(img, (max_width * 2) as u32, (max_height * 4) as u32);
    let (w, h) = img.dimensions();
    let fb_w = (w as usize + 1) / 2;
    let fb_h = (h as usize + 3) / 4;
    let mut fb = FrameBuffer::new(fb_w, fb_h);

    for by in 0..fb_h {
        for bx in 0..fb_w {
            let mut block = [0u8; 8];
            for dy in 0..4 {
                for dx in 0..2 {
                    let (px, py) = (bx * 2 + dx, by * 4 + dy);
                    if px < w as usize && py < h as usize {
                        block[dx + dy * 2] = img.get_pixel(px as u32, py as u32).0[0];
                    }
                }
            }
            fb.set(bx, by, pixels_to_braille(&block, threshold));
        }
    }
    Ok(fb)
}

/// Gestione del frame rate; fornisce il delta tempo per frame al driver
pub struct FrameTimer {
    target_fps: u32,
    frame_duration: Duration,
    last_frame: Instant,
    frame_count: u64,
}

impl FrameTimer {
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.clamp(1, 120);
        Self {
            target_fps,
            frame_duration: Duration::from_nanos(1_000_000_000 / target_fps as u64),
            last_frame: Instant::now(),
            frame_count: 0,
        }
    }

    /// Sleeps until the next frame slot and returns the elapsed seconds
    /// since the previous call, i.e. the `dt` handed to `UIManager::update`.
    pub fn wait_for_next_frame(&mut self) -> f32 {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_duration {
            std::thread::sleep(self.frame_duration - elapsed);
        }

        let dt = self.last_frame.elapsed().as_secs_f32();
        self.last_frame = Instant::now();
        self.frame_count += 1;
        dt
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

const MAX_POOLED_BUFFERS: usize = 16;
const MAX_POOLED_CELLS: usize = 1024 * 1024;

// Pool globale per il riuso dei buffer delle etichette
static STYLED_BUFFER_POOL: Lazy<Mutex<Vec<Vec<StyledChar>>>> = Lazy::new(|| Mutex::new(Vec::new()));
