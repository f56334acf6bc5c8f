pub mod camera;
pub mod field;

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::config::GreetingConfig;
use crate::constants::CLEAR_COLOR;
use camera::{field_to_world, spawn_backdrop_camera, viewport_size};
pub use field::{Connection, FieldParams, Particle, ParticleField};

pub struct BackdropPlugin;

impl Plugin for BackdropPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(
            CLEAR_COLOR[0],
            CLEAR_COLOR[1],
            CLEAR_COLOR[2],
        )))
        .add_systems(
            Startup,
            (spawn_backdrop_camera, setup_field, configure_line_gizmos),
        )
        .add_systems(
            Update,
            (
                handle_resize,
                step_field,
                sync_particle_meshes,
                draw_connections,
            )
                .chain(),
        );
    }
}

/// Links a mesh entity to the particle at the same index
#[derive(Component)]
pub struct ParticleMesh(pub usize);

fn setup_field(
    mut commands: Commands,
    config: Res<GreetingConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let params = FieldParams {
        count: config.tuning.particle_count,
        connection_threshold: config.tuning.connection_threshold,
        line_alpha: config.tuning.line_alpha,
        ..FieldParams::default()
    };
    let bounds = viewport_size(&windows);
    let field = ParticleField::new(params, bounds, &mut rand::thread_rng());

    // Unit circle scaled per particle
    let circle_mesh = meshes.add(Circle::new(1.0));

    for (index, particle) in field.particles().iter().enumerate() {
        let material = materials.add(Color::srgba(1.0, 1.0, 1.0, particle.opacity));
        commands.spawn((
            Mesh2d(circle_mesh.clone()),
            MeshMaterial2d(material),
            Transform::from_translation(field_to_world(particle.position, bounds).extend(0.0))
                .with_scale(Vec3::splat(particle.radius)),
            ParticleMesh(index),
        ));
    }

    info!(
        "Backdrop ready: {} particles in {}x{}",
        field.particles().len(),
        bounds.x,
        bounds.y
    );
    commands.insert_resource(field);
}

fn configure_line_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    config.line.width = 1.0;
}

fn handle_resize(mut resized: EventReader<WindowResized>, field: Option<ResMut<ParticleField>>) {
    let Some(mut field) = field else {
        resized.clear();
        return;
    };
    // Only the latest size matters
    if let Some(event) = resized.read().last() {
        field.resize(Vec2::new(event.width, event.height));
    }
}

fn step_field(field: Option<ResMut<ParticleField>>) {
    if let Some(mut field) = field {
        field.step();
    }
}

fn sync_particle_meshes(
    field: Option<Res<ParticleField>>,
    mut query: Query<(&ParticleMesh, &mut Transform)>,
) {
    let Some(field) = field else {
        return;
    };
    let bounds = field.bounds();
    let particles = field.particles();
    for (mesh, mut transform) in query.iter_mut() {
        if let Some(particle) = particles.get(mesh.0) {
            transform.translation = field_to_world(particle.position, bounds).extend(0.0);
        }
    }
}

fn draw_connections(field: Option<Res<ParticleField>>, mut gizmos: Gizmos) {
    let Some(field) = field else {
        return;
    };
    let bounds = field.bounds();
    let particles = field.particles();
    for connection in field.connections() {
        gizmos.line_2d(
            field_to_world(particles[connection.a].position, bounds),
            field_to_world(particles[connection.b].position, bounds),
            Color::srgba(1.0, 1.0, 1.0, connection.alpha),
        );
    }
}
