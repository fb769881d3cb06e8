use rand::prelude::SliceRandom;
use rand::Rng;

use super::particles::{random_bright_color, Particle, CONFETTI_CHARS};

/// Particles spawned per frame while celebrating
const SPAWN_PER_FRAME: usize = 3;

/// Falling confetti drawn over the board while the celebration lasts.
///
/// Spawning follows the board's celebration flag; particles already in the
/// air keep falling after it ends.
#[derive(Debug, Clone)]
pub struct Confetti {
    particles: Vec<Particle>,
    pub width: u16,
    pub height: u16,
}

impl Default for Confetti {
    fn default() -> Self {
        Self::new()
    }
}

impl Confetti {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            width: 80,
            height: 24,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Advance one frame, spawning new pieces when `celebrating`
    pub fn update(&mut self, celebrating: bool) {
        let floor = self.height as f32 + 5.0;
        self.particles.retain_mut(|p| p.step(floor));

        if celebrating {
            self.spawn();
        }
    }

    fn spawn(&mut self) {
        let mut rng = rand::thread_rng();
        let width = self.width.max(1) as f32;
        for _ in 0..SPAWN_PER_FRAME {
            self.particles.push(Particle {
                x: rng.gen_range(0.0..width),
                y: -2.0,
                vx: rng.gen_range(-0.5..0.5),
                vy: rng.gen_range(0.3..1.0),
                char: CONFETTI_CHARS.choose(&mut rng).copied().unwrap_or('*'),
                color: random_bright_color(),
                lifetime: rng.gen_range(3.0..6.0),
            });
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }
}
