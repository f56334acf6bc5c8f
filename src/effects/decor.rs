use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

pub const HEART_GLYPHS: [&str; 6] = ["❤️", "💕", "💖", "💗", "💝", "💞"];
pub const SPARKLE_GLYPHS: [&str; 5] = ["💖", "✨", "💫", "⭐", "🌟"];
pub const CONFETTI_COLORS: [[u8; 3]; 5] = [
    [255, 107, 157],
    [255, 20, 147],
    [255, 105, 180],
    [255, 192, 203],
    [255, 182, 193],
];

#[derive(Debug, Clone, PartialEq)]
pub enum DecorKind {
    Glyph(String),
    Dot([u8; 3]),
    Message(String),
    /// Pill in the top-right corner
    Toast(String),
    /// Large card in the middle of the screen
    Banner(String),
}

/// A short-lived decorative element. Screen space, logical pixels, y down.
///
/// The entity carrying it is despawned once `delay + ttl` has elapsed, so
/// its removal can never outlive or double up on the element itself.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Decoration {
    pub kind: DecorKind,
    pub origin: Vec2,
    /// Pixels per second
    pub velocity: Vec2,
    pub size: f32,
    /// Radians per second
    pub spin: f32,
    /// Scale reached at the end of the lifetime
    pub grow: f32,
    pub delay: f32,
    pub ttl: f32,
    pub fade: f32,
    age: f32,
}

impl Decoration {
    pub fn new(kind: DecorKind, origin: Vec2, ttl: f32) -> Self {
        Self {
            kind,
            origin,
            velocity: Vec2::ZERO,
            size: 16.0,
            spin: 0.0,
            grow: 1.0,
            delay: 0.0,
            ttl,
            fade: (ttl * 0.25).min(0.6),
            age: 0.0,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_grow(mut self, grow: f32) -> Self {
        self.grow = grow;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_fade(mut self, fade: f32) -> Self {
        self.fade = fade;
        self
    }

    pub fn tick(&mut self, dt: f32) {
        self.age += dt;
    }

    pub fn is_visible(&self) -> bool {
        self.age >= self.delay && !self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.delay + self.ttl
    }

    fn local_time(&self) -> f32 {
        (self.age - self.delay).clamp(0.0, self.ttl)
    }

    pub fn position(&self) -> Vec2 {
        self.origin + self.velocity * self.local_time()
    }

    pub fn rotation(&self) -> f32 {
        self.spin * self.local_time()
    }

    pub fn scale(&self) -> f32 {
        let t = if self.ttl > 0.0 {
            self.local_time() / self.ttl
        } else {
            1.0
        };
        1.0 + (self.grow - 1.0) * t
    }

    /// Fades in over `fade`, holds, then fades out over the last `fade`.
    pub fn alpha(&self) -> f32 {
        if !self.is_visible() {
            return 0.0;
        }
        if self.fade <= 0.0 {
            return 1.0;
        }
        let t = self.local_time();
        let fade_in = t / self.fade;
        let fade_out = (self.ttl - t) / self.fade;
        fade_in.min(fade_out).clamp(0.0, 1.0)
    }
}

fn pick<'a>(glyphs: &[&'a str], rng: &mut impl Rng) -> &'a str {
    glyphs.choose(rng).copied().unwrap_or("💖")
}

/// A heart drifting up from below the bottom edge.
pub fn floating_heart(viewport: Vec2, delay: f32, rng: &mut impl Rng) -> Decoration {
    let duration: f32 = rng.gen_range(8.0..13.0);
    let travel = viewport.y + 80.0;
    Decoration::new(
        DecorKind::Glyph(pick(&HEART_GLYPHS, rng).into()),
        Vec2::new(rng.gen_range(0.0..viewport.x.max(1.0)), viewport.y + 40.0),
        duration,
    )
    .with_velocity(Vec2::new(rng.gen_range(-8.0..8.0), -travel / duration))
    .with_size(rng.gen_range(15.0..35.0))
    .with_delay(delay)
    .with_fade(1.0)
}

/// Ring of glyphs around `center`, revealed one after another.
pub fn sparkle_ring(center: Vec2, count: usize, rng: &mut impl Rng) -> Vec<Decoration> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            let distance: f32 = rng.gen_range(60.0..180.0);
            Decoration::new(
                DecorKind::Glyph(pick(&SPARKLE_GLYPHS, rng).into()),
                center + Vec2::from_angle(angle) * distance,
                2.5,
            )
            .with_velocity(Vec2::new(0.0, -40.0))
            .with_size(rng.gen_range(15.0..35.0))
            .with_grow(2.0)
            .with_delay(i as f32 * 0.015)
        })
        .collect()
}

/// Small twinkles where the card was tapped.
pub fn tap_sparkles(center: Vec2, rng: &mut impl Rng) -> Vec<Decoration> {
    const COUNT: usize = 20;
    (0..COUNT)
        .map(|i| {
            let angle = TAU * i as f32 / COUNT as f32;
            let distance: f32 = rng.gen_range(40.0..120.0);
            Decoration::new(
                DecorKind::Glyph("✨".into()),
                center + Vec2::from_angle(angle) * distance,
                1.5,
            )
            .with_size(14.0)
            .with_delay(i as f32 * 0.02)
        })
        .collect()
}

/// Dots falling from the top edge, staggered 20 ms apart.
pub fn confetti(viewport: Vec2, count: usize, delay: f32, rng: &mut impl Rng) -> Vec<Decoration> {
    (0..count)
        .map(|i| {
            let duration: f32 = rng.gen_range(3.0..5.0);
            let color = CONFETTI_COLORS.choose(rng).copied().unwrap_or([255, 107, 157]);
            Decoration::new(
                DecorKind::Dot(color),
                Vec2::new(rng.gen_range(0.0..viewport.x.max(1.0)), -10.0),
                duration,
            )
            .with_velocity(Vec2::new(0.0, (viewport.y + 100.0) / duration))
            .with_size(5.0)
            .with_spin(2.0 * TAU / duration)
            .with_delay(delay + i as f32 * 0.02)
            .with_fade(duration * 0.5)
        })
        .collect()
}

/// A big heart popping in somewhere on screen.
pub fn heart_pop(viewport: Vec2, rng: &mut impl Rng) -> Decoration {
    let position = Vec2::new(
        rng.gen_range(50.0..(viewport.x - 50.0).max(51.0)),
        rng.gen_range(50.0..(viewport.y - 50.0).max(51.0)),
    );
    Decoration::new(DecorKind::Glyph("💖".into()), position, 2.5)
        .with_size(40.0)
        .with_grow(2.0)
        .with_spin(TAU / 2.5 * 2.0)
        .with_velocity(Vec2::new(0.0, -40.0))
}

pub fn floating_message(text: &str, viewport: Vec2, delay: f32, rng: &mut impl Rng) -> Decoration {
    let position = Vec2::new(
        rng.gen_range(100.0..(viewport.x - 100.0).max(101.0)),
        rng.gen_range(50.0..(viewport.y - 50.0).max(51.0)),
    );
    Decoration::new(DecorKind::Message(text.into()), position, 4.0)
        .with_velocity(Vec2::new(0.0, -15.0))
        .with_size(20.0)
        .with_delay(delay)
}

/// Three hearts bursting around the story card.
pub fn story_hearts(center: Vec2, rng: &mut impl Rng) -> Vec<Decoration> {
    (0..3)
        .map(|i| {
            let angle = rng.gen_range(0.0..TAU);
            let distance: f32 = rng.gen_range(100.0..150.0);
            Decoration::new(
                DecorKind::Glyph("💕".into()),
                center + Vec2::from_angle(angle) * distance,
                2.0,
            )
            .with_size(20.0)
            .with_grow(1.5)
            .with_delay(i as f32 * 0.2)
            .with_fade(0.8)
        })
        .collect()
}

pub fn counter_toast(text: String, viewport: Vec2) -> Decoration {
    Decoration::new(DecorKind::Toast(text), Vec2::new(viewport.x - 20.0, 20.0), 3.0)
        .with_size(16.0)
        .with_fade(0.6)
}

pub fn banner(text: String, viewport: Vec2, delay: f32) -> Decoration {
    Decoration::new(DecorKind::Banner(text), viewport * 0.5, 4.5)
        .with_size(24.0)
        .with_delay(delay)
        .with_fade(0.5)
}
