//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌─────────────────────────────────────────────┬──────────────┐
//! │                                             │ keypoint     │
//! │                                             │ inset 320×240│
//! │                                             ├──────────────┘
//! │              pulsating orb ring             │
//! │          (fading trail background)          │
//! │                                             │
//! │  status bar                                 │
//! │  key legend                                 │
//! └─────────────────────────────────────────────┴──────────────┘
//! ```
//!
//! The orb is drawn exactly from the reactor's `RenderFrame` — a ring of
//! small filled discs — over a background that fades toward black a little
//! each frame, leaving motion trails.

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use std::sync::mpsc::Sender;

use orb_core::RenderFrame;
use pose_stream::Observation;

use crate::source::SimCommand;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 800;
pub const WIN_H: usize = 800;

const INSET_W:     usize = 320;
const INSET_H:     usize = 240;
const INSET_X:     usize = WIN_W - INSET_W;
const INSET_BG:    u32   = 0xFF10_1018;
const INSET_DOT:   u32   = 0xFFFF_3030;
/// Background decay per frame, out of 255 (the trail length).
const FADE:        u32   = 20;
const DISC_RADIUS: i32   = 2;
const STATUS_Y:    usize = WIN_H - 40;
const TEXT_BG:     u32   = 0xFF14_1420;
const TEXT_FG:     u32   = 0xFFEE_EEEE;
const LEGEND_FG:   u32   = 0xFF88_8888;

/// Capture-frame → inset scale (the simulated model frame is 640×480).
const INSET_SCALE: f32 = 0.5;

/// How far one arrow-key poll moves the simulated figure.
const MOVE_STEP: f32 = 6.0;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    sim_tx: Sender<SimCommand>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimCommand>) -> Result<Self, String> {
        let mut window = Window::new(
            "Pose Orb — pulsating pose-reactive ring",
            WIN_W,
            WIN_H,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![0xFF00_0000; WIN_W * WIN_H],
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard input, forwarding steering to the simulated figure.
    /// Returns false when the app should quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }

        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) {
            return false;
        }
        if one_shot(&self.window, Key::Space) {
            let _ = self.sim_tx.send(SimCommand::Jolt);
        }
        if one_shot(&self.window, Key::H) {
            let _ = self.sim_tx.send(SimCommand::ToggleFigure);
        }

        // Held keys repeat every poll for continuous steering.
        let mut step = (0.0f32, 0.0f32);
        if self.window.is_key_down(Key::Left)  { step.0 -= MOVE_STEP; }
        if self.window.is_key_down(Key::Right) { step.0 += MOVE_STEP; }
        if self.window.is_key_down(Key::Up)    { step.1 -= MOVE_STEP; }
        if self.window.is_key_down(Key::Down)  { step.1 += MOVE_STEP; }
        if step != (0.0, 0.0) {
            let _ = self.sim_tx.send(SimCommand::Move(step.0, step.1));
        }
        if self.window.is_key_down(Key::W) {
            let _ = self.sim_tx.send(SimCommand::Grow);
        }
        if self.window.is_key_down(Key::S) {
            let _ = self.sim_tx.send(SimCommand::Shrink);
        }

        true
    }

    /// Render one frame.
    pub fn render(&mut self, frame: &RenderFrame, obs: &Observation, status: &str) {
        self.fade();

        // ── orb ring ──────────────────────────────────────────────────────
        let color = frame.color.to_argb();
        for &(x, y) in &frame.points {
            self.draw_disc(x as i32, y as i32, DISC_RADIUS, color);
        }

        // ── keypoint inset ────────────────────────────────────────────────
        self.fill_rect(INSET_X, 0, INSET_W, INSET_H, INSET_BG);
        self.draw_border(INSET_X, 0, INSET_W, INSET_H, 0xFF30_3040);
        for figure in &obs.figures {
            for (_, kp) in figure.keypoints() {
                let px = INSET_X as i32 + (kp.x * INSET_SCALE) as i32;
                let py = (kp.y * INSET_SCALE) as i32;
                self.draw_disc(px, py, 1, INSET_DOT);
            }
        }

        // ── status + legend ───────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_label(status, 10, STATUS_Y + 8, TEXT_FG);
        self.draw_label(
            "arrows=move  w/s=closer/away  space=jolt  h=hide  q=quit",
            10,
            WIN_H - 14,
            LEGEND_FG,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── primitives ────────────────────────────────────────────────────────

    /// Decay every pixel toward black, leaving a motion trail.
    fn fade(&mut self) {
        let keep = 255 - FADE;
        for px in self.buf.iter_mut() {
            let r = ((*px >> 16) & 0xFF) * keep / 255;
            let g = ((*px >> 8) & 0xFF) * keep / 255;
            let b = (*px & 0xFF) * keep / 255;
            *px = 0xFF00_0000 | (r << 16) | (g << 8) | b;
        }
    }

    fn draw_disc(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(WIN_W) {
            if y < WIN_H { self.buf[y * WIN_W + col] = color; }
            if y + h - 1 < WIN_H { self.buf[(y + h - 1) * WIN_W + col] = color; }
        }
        for row in y..(y + h).min(WIN_H) {
            if x < WIN_W { self.buf[row * WIN_W + x] = color; }
            if x + w - 1 < WIN_W { self.buf[row * WIN_W + x + w - 1] = color; }
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < WIN_W && (y as usize) < WIN_H {
            self.buf[y as usize * WIN_W + x as usize] = color;
        }
    }

    /// Minimal 3×5 bitmap font for the status line.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel((cx + col) as i32, (y + row) as i32, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_lowercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_cover_the_status_alphabet() {
        // Every character the app's status/legend lines can produce must
        // render as something other than the fallback dot.
        let fallback = char_glyph('\u{7f}');
        for ch in "abcdefghijklmnopqrstuvwxyz0123456789-=./,:".chars() {
            assert_ne!(char_glyph(ch), fallback, "missing glyph for {:?}", ch);
        }
    }

    #[test]
    fn glyphs_are_case_insensitive() {
        assert_eq!(char_glyph('A'), char_glyph('a'));
        assert_eq!(char_glyph('Z'), char_glyph('z'));
    }
}
