use bevy::prelude::*;
use rand::Rng;

use crate::constants::{
    CONNECTION_THRESHOLD, FALLBACK_VIEWPORT, LINE_ALPHA, PARTICLE_COUNT, PARTICLE_OPACITY_MAX, PARTICLE_OPACITY_MIN,
    PARTICLE_RADIUS_MAX, PARTICLE_RADIUS_MIN, PARTICLE_SPEED,
};

/// A single drifting point. Only `position` changes after creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub opacity: f32,
}

impl Particle {
    pub fn random(bounds: Vec2, params: &FieldParams, rng: &mut impl Rng) -> Self {
        Self {
            position: Vec2::new(rng.gen_range(0.0..bounds.x), rng.gen_range(0.0..bounds.y)),
            velocity: Vec2::new(
                rng.gen_range(-params.speed..params.speed),
                rng.gen_range(-params.speed..params.speed),
            ),
            radius: rng.gen_range(params.radius_range.0..params.radius_range.1),
            opacity: rng.gen_range(params.opacity_range.0..params.opacity_range.1),
        }
    }

    fn step(&mut self, bounds: Vec2) {
        self.position += self.velocity;
        self.position.x = wrap(self.position.x, bounds.x);
        self.position.y = wrap(self.position.y, bounds.y);
    }
}

/// Toroidal wrap into `[0, extent)`.
fn wrap(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round a tiny negative up to `extent` itself
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldParams {
    pub count: usize,
    pub connection_threshold: f32,
    pub line_alpha: f32,
    pub speed: f32,
    pub radius_range: (f32, f32),
    pub opacity_range: (f32, f32),
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            connection_threshold: CONNECTION_THRESHOLD,
            line_alpha: LINE_ALPHA,
            speed: PARTICLE_SPEED,
            radius_range: (PARTICLE_RADIUS_MIN, PARTICLE_RADIUS_MAX),
            opacity_range: (PARTICLE_OPACITY_MIN, PARTICLE_OPACITY_MAX),
        }
    }
}

/// Line between two particles closer than the connection threshold
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub alpha: f32,
}
fn is_usable(bounds: Vec2) -> bool {
    bounds.x > 0.0 && bounds.y > 0.0
}

/// The backdrop simulation. Coordinates are screen space: origin top-left, y down.
#[derive(Resource, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Vec2,
    params: FieldParams,
}

impl ParticleField {
    /// A window can report 0x0 before it is first laid out; such bounds fall
    /// back to [`FALLBACK_VIEWPORT`] until the next resize.
    pub fn new(params: FieldParams, bounds: Vec2, rng: &mut impl Rng) -> Self {
        let bounds = if is_usable(bounds) {
            bounds
        } else {
            warn!(
                "Viewport {}x{} is empty, seeding particles in the fallback size",
                bounds.x, bounds.y
            );
            Vec2::from(FALLBACK_VIEWPORT)
        };
        let mut field = Self {
            particles: Vec::with_capacity(params.count),
            bounds,
            params,
        };
        field.reinitialize(rng);
        field
    }

    /// Rebuilds the whole particle set inside the current bounds.
    pub fn reinitialize(&mut self, rng: &mut impl Rng) {
        let bounds = self.bounds;
        let params = &self.params;
        self.particles = (0..params.count)
            .map(|_| Particle::random(bounds, params, rng))
            .collect();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    /// Advances every particle by one tick.
    pub fn step(&mut self) {
        let bounds = self.bounds;
        for particle in &mut self.particles {
            particle.step(bounds);
        }
    }

    /// New bounds apply immediately. Particles are left where they are and
    /// wrap back in on their next step. Degenerate sizes are ignored.
    pub fn resize(&mut self, bounds: Vec2) -> bool {
        if !is_usable(bounds) {
            debug!("Ignoring degenerate viewport {}x{}", bounds.x, bounds.y);
            return false;
        }
        self.bounds = bounds;
        true
    }

    /// Alpha of a line at `distance`, or `None` when too far apart to connect.
    pub fn connection_alpha(&self, distance: f32) -> Option<f32> {
        let threshold = self.params.connection_threshold;
        (distance < threshold).then(|| self.params.line_alpha * (1.0 - distance / threshold))
    }

    /// Every unordered pair closer than the threshold. O(n²), n is small.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.particles.iter().enumerate().flat_map(move |(a, first)| {
            self.particles[a + 1..]
                .iter()
                .enumerate()
                .filter_map(move |(offset, second)| {
                    let distance = first.position.distance(second.position);
                    self.connection_alpha(distance).map(|alpha| Connection {
                        a,
                        b: a + 1 + offset,
                        distance,
                        alpha,
                    })
                })
        })
    }
}
