// Shared defaults for the backdrop, the gallery and the decorations.
// Anything the config file can override lives in `Tuning`; these are its defaults.

/// Number of drifting particles in the backdrop
pub const PARTICLE_COUNT: usize = 80;

/// Maximum distance at which two particles are joined by a line
pub const CONNECTION_THRESHOLD: f32 = 100.0;

/// Line alpha at zero distance; falls off linearly to 0 at the threshold
pub const LINE_ALPHA: f32 = 0.15;

/// Per-axis particle speed, in units per tick
pub const PARTICLE_SPEED: f32 = 0.25;

pub const PARTICLE_RADIUS_MIN: f32 = 0.5;
pub const PARTICLE_RADIUS_MAX: f32 = 2.5;

pub const PARTICLE_OPACITY_MIN: f32 = 0.2;
pub const PARTICLE_OPACITY_MAX: f32 = 0.7;

/// Viewport used until a window reports its size
pub const FALLBACK_VIEWPORT: [f32; 2] = [1280.0, 720.0];

/// Horizontal swipe distance needed to change photos
pub const DRAG_THRESHOLD: f32 = 50.0;

/// Minimum time between two accepted taps
pub const TAP_DEBOUNCE_MS: u64 = 300;

/// Delay between an accepted tap and the note overlay opening
pub const NOTE_REVEAL_MS: u64 = 100;

/// Fade-out before the next photo is swapped in
pub const FADE_OUT_MS: u64 = 200;

/// Entrance animation length, slightly longer than the longest animation
pub const ENTRANCE_MS: u64 = 1600;

/// Chance that a photo change spawns a floating message
pub const FLOATING_MESSAGE_CHANCE: f64 = 0.2;

/// Drag progress above which visual feedback kicks in
pub const DRAG_FEEDBACK_START: f32 = 0.3;

/// Photo card size in logical pixels
pub const CARD_SIZE: [f32; 2] = [360.0, 440.0];

/// Background clear colour (deep night pink)
pub const CLEAR_COLOR: [f32; 3] = [0.09, 0.03, 0.10];
