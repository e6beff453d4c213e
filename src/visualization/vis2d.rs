use bevy::app::AppExit;
use bevy::math::primitives::Circle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};

use crate::simulation::particle::{ColorTag, NVec2};
use crate::simulation::scenario::Scenario;

/// Component tagging each circle with its index into the world's particle list
#[derive(Component)]
struct BodyIndex(pub usize);

/// Marker for the overlay text showing object count and sim time
#[derive(Component)]
struct StatsText;

/// Accumulated wall time driving the spawner, reset on every spawn
#[derive(Resource, Default)]
struct SpawnClock(f32);

pub fn run_2d(scenario: Scenario) {
    println!(
        "run_2d: starting Bevy 2D viewer, constraint radius {}",
        scenario.world.constraint().1
    );

    App::new()
        .insert_resource(scenario)
        .init_resource::<SpawnClock>()
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_system)
        .add_systems(
            Update,
            (
                input_system,
                spawn_system,
                physics_step_system,
                sync_transforms_system,
                stats_text_system,
            )
                .chain(),
        )
        .run();
}

/// Startup system: camera, boundary disc, and the stats overlay
fn setup_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn(Camera2dBundle::default());

    // The camera sits at the constraint center, so the disc lives at the origin
    let (_, radius) = scenario.world.constraint();
    commands.spawn(MaterialMesh2dBundle {
        mesh: Mesh2dHandle(meshes.add(Circle::new(radius))),
        material: materials.add(ColorMaterial::from(Color::srgb(0.05, 0.05, 0.08))),
        transform: Transform::from_xyz(0.0, 0.0, 0.0),
        ..Default::default()
    });

    commands.spawn((
        TextBundle::from_section(
            "objects: 0",
            TextStyle {
                font_size: 20.0,
                color: Color::WHITE,
                ..Default::default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..Default::default()
        }),
        StatsText,
    ));
}

/// Escape quits, C clears all particles
fn input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: EventWriter<AppExit>,
    mut scenario: ResMut<Scenario>,
    mut commands: Commands,
    bodies: Query<Entity, With<BodyIndex>>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.send(AppExit::Success);
    }
    if keys.just_pressed(KeyCode::KeyC) {
        scenario.world.clear_objects();
        for entity in &bodies {
            commands.entity(entity).despawn();
        }
    }
}

/// Emit particles on a fixed wall-clock interval until the cap is reached.
/// Radius, launch angle, and color all cycle with sim time so the streams
/// interleave instead of stacking.
fn spawn_system(
    mut scenario: ResMut<Scenario>,
    mut clock: ResMut<SpawnClock>,
    time: Res<Time>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let Scenario { world, spawner } = &mut *scenario;
    if world.object_count() >= spawner.max_objects {
        return;
    }

    clock.0 += time.delta_seconds();
    while clock.0 >= spawner.interval && world.object_count() < spawner.max_objects {
        clock.0 -= spawner.interval;

        let t = world.elapsed_time();
        let span = spawner.radius_max - spawner.radius_min;
        let radius = spawner.radius_min + span * (0.5 + 0.5 * (t * 3.7).sin());
        // Sweep the launch direction around straight-down by up to a radian
        let angle = std::f32::consts::FRAC_PI_2 + (t * 1.5).sin();
        let direction = NVec2::new(angle.cos(), angle.sin());
        let color = rainbow(t);

        let id = match world.add_object(spawner.position, radius) {
            Ok(id) => id,
            Err(err) => {
                eprintln!("spawn_system: {err}");
                return;
            }
        };
        if world.set_object_velocity(id, direction * spawner.speed).is_err()
            || world.set_object_color(id, color).is_err()
        {
            return;
        }

        let index = world.object_count() - 1;
        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(radius))),
                material: materials.add(ColorMaterial::from(Color::srgb(
                    color[0], color[1], color[2],
                ))),
                transform: Transform::from_xyz(0.0, 0.0, 1.0),
                ..Default::default()
            },
            BodyIndex(index),
        ));
    }
}

fn physics_step_system(mut scenario: ResMut<Scenario>) {
    scenario.world.update();
}

/// Copy solver positions into entity transforms. The solver uses screen-style
/// y-down coordinates centered on the constraint; Bevy is y-up with the
/// camera at the origin, so y flips here.
fn sync_transforms_system(scenario: Res<Scenario>, mut query: Query<(&BodyIndex, &mut Transform)>) {
    let (center, _) = scenario.world.constraint();
    for (BodyIndex(i), mut transform) in &mut query {
        if let Some(p) = scenario.world.objects().get(*i) {
            transform.translation.x = p.pos_now.x - center.x;
            transform.translation.y = center.y - p.pos_now.y;
        }
    }
}

fn stats_text_system(scenario: Res<Scenario>, mut query: Query<&mut Text, With<StatsText>>) {
    for mut text in &mut query {
        text.sections[0].value = format!(
            "objects: {}  t: {:.1}s",
            scenario.world.object_count(),
            scenario.world.elapsed_time()
        );
    }
}

/// Smoothly cycling spawn color derived from sim time
fn rainbow(t: f32) -> ColorTag {
    const THIRD: f32 = std::f32::consts::TAU / 3.0;
    let r = t.sin();
    let g = (t + THIRD).sin();
    let b = (t + 2.0 * THIRD).sin();
    [r * r, g * g, b * b]
}
