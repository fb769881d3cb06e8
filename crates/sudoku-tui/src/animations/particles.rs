use crossterm::style::Color;
use rand::Rng;

/// Downward acceleration per frame
pub const GRAVITY: f32 = 0.15;

/// Lifetime consumed per frame, in seconds
pub const FRAME_SECS: f32 = 0.016;

/// A single confetti particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub char: char,
    pub color: Color,
    pub lifetime: f32,
}

impl Particle {
    pub fn is_visible(&self, width: u16, height: u16) -> bool {
        self.x >= 0.0
            && self.x < width as f32
            && self.y >= 0.0
            && self.y < height as f32
            && self.lifetime > 0.0
    }

    /// Advance one frame; returns false once the particle is spent
    pub fn step(&mut self, floor: f32) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;
        self.lifetime -= FRAME_SECS;
        self.lifetime > 0.0 && self.y < floor
    }
}

/// Generate a random bright color
pub fn random_bright_color() -> Color {
    let mut rng = rand::thread_rng();
    match rng.gen_range(0..7) {
        0 => Color::Red,
        1 => Color::Green,
        2 => Color::Yellow,
        3 => Color::Blue,
        4 => Color::Magenta,
        5 => Color::Cyan,
        _ => Color::White,
    }
}

/// Confetti characters
pub const CONFETTI_CHARS: &[char] = &['*', '✦', '✧', '◆', '◇', '○', '●', '■', '□', '▲', '▽'];
