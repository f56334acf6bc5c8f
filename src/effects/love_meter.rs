use bevy::prelude::*;

#[derive(Debug, PartialEq, Eq)]
pub struct LoveLevel {
    /// Minimum progress, in percent
    pub threshold: u8,
    pub text: &'static str,
    pub emoji: &'static str,
}

pub const LOVE_LEVELS: [LoveLevel; 5] = [
    LoveLevel {
        threshold: 0,
        text: "Start exploring our memories!",
        emoji: "💕",
    },
    LoveLevel {
        threshold: 25,
        text: "Getting warmer! 💖",
        emoji: "💖",
    },
    LoveLevel {
        threshold: 50,
        text: "Halfway to forever! 💕",
        emoji: "💕",
    },
    LoveLevel {
        threshold: 75,
        text: "Almost there! 💖",
        emoji: "💖",
    },
    LoveLevel {
        threshold: 100,
        text: "INFINITE LOVE! 💕💖💕",
        emoji: "💕",
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterReading {
    /// 0..=100
    pub progress: f32,
    pub level: &'static LoveLevel,
    pub hearts: usize,
}

impl MeterReading {
    /// Progress through the gallery; a single photo counts as complete.
    pub fn for_photo(index: usize, photo_count: usize) -> Self {
        let progress = if photo_count <= 1 {
            100.0
        } else {
            (index.min(photo_count - 1) as f32 / (photo_count - 1) as f32) * 100.0
        };
        let level = LOVE_LEVELS
            .iter()
            .rev()
            .find(|level| progress >= f32::from(level.threshold))
            .unwrap_or(&LOVE_LEVELS[0]);
        Self {
            progress,
            level,
            hearts: (progress / 20.0).floor() as usize,
        }
    }
}

/// Fills as the gallery is explored; shown after the first move past photo one.
#[derive(Resource, Debug, Clone, Copy)]
pub struct LoveMeter {
    reading: MeterReading,
    visible: bool,
}

impl LoveMeter {
    pub fn new(photo_count: usize) -> Self {
        Self {
            reading: MeterReading::for_photo(0, photo_count),
            visible: false,
        }
    }

    pub fn reading(&self) -> &MeterReading {
        &self.reading
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn update(&mut self, index: usize, photo_count: usize) {
        self.reading = MeterReading::for_photo(index, photo_count);
        if index > 0 {
            self.visible = true;
        }
    }
}
