//! Scene setup
//!
//! Builds the aquarium once at startup: offscreen render target, orbit
//! camera, lights, tank shell, decor, the fish school and the bubble field.

use bevy::{
    camera::RenderTarget,
    core_pipeline::tonemapping::Tonemapping,
    math::primitives::{Cone, Cuboid, Sphere, Torus},
    pbr::{DistanceFog, FogFalloff},
    prelude::*,
    render::{
        render_resource::{Extent3d, TextureFormat, TextureUsages},
        renderer::RenderDevice,
    },
};
use rand::Rng;

use crate::config::{bubbles, seaweed, tank, RENDER_HEIGHT, RENDER_WIDTH};
use crate::engine::components::{
    Bubble, CameraController, Fish, FishTail, Obstacle, OffscreenCamera, PickBounds, PulsingLight,
    Seaweed, TankWall,
};
use crate::engine::plugins::FrameCapturer;
use crate::engine::resources::{BubbleAssets, RenderTargetHandle, TankBounds};

/// Coral palette shared by rocks and coral for a cohesive seabed look
const CORAL_COLORS: [Color; 6] = [
    Color::srgb(1.0, 0.4, 0.4),
    Color::srgb(1.0, 0.6, 0.4),
    Color::srgb(0.8, 0.4, 1.0),
    Color::srgb(1.0, 0.8, 0.4),
    Color::srgb(1.0, 0.5, 0.31),
    Color::srgb(0.96, 0.64, 0.38),
];

fn random_coral_color(rng: &mut impl Rng) -> Color {
    CORAL_COLORS[rng.gen_range(0..CORAL_COLORS.len())]
}

/// Initial placement and look of one fish
struct FishSpec {
    name: &'static str,
    color: Color,
    scale: f32,
    position: Vec3,
}

const FISH_SPECS: [FishSpec; 3] = [
    FishSpec {
        name: "Azure",
        color: Color::srgb(0.30, 0.65, 1.0),
        scale: 1.0,
        position: Vec3::new(0.0, 0.0, 0.0),
    },
    FishSpec {
        name: "Goldie",
        color: Color::srgb(1.0, 0.8, 0.0),
        scale: 0.8,
        position: Vec3::new(2.0, 1.0, -1.0),
    },
    FishSpec {
        name: "Minty",
        color: Color::srgb(0.4, 1.0, 0.6),
        scale: 0.9,
        position: Vec3::new(-2.0, -1.0, 1.0),
    },
];

/// Setup the aquarium scene
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    render_device: Res<RenderDevice>,
    bounds: Res<TankBounds>,
) {
    println!("[Engine] Setting up scene...");

    let mut rng = rand::thread_rng();

    let size = Extent3d {
        width: RENDER_WIDTH,
        height: RENDER_HEIGHT,
        depth_or_array_layers: 1,
    };

    // Create render target texture
    let mut render_target_image =
        Image::new_target_texture(size.width, size.height, TextureFormat::bevy_default());
    render_target_image.texture_descriptor.usage |= TextureUsages::COPY_SRC;
    let render_target_handle = images.add(render_target_image);

    commands.insert_resource(RenderTargetHandle(render_target_handle.clone()));

    // Spawn frame capturer for GPU-to-CPU transfer
    commands.spawn(FrameCapturer::new(
        render_target_handle.clone(),
        size,
        &render_device,
    ));

    // Camera with orbit controller, underwater fog and a deep-water clear color
    commands.spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Image(render_target_handle.into()),
            clear_color: ClearColorConfig::Custom(Color::srgb(0.03, 0.07, 0.11)),
            ..default()
        },
        Tonemapping::None,
        DistanceFog {
            color: Color::srgb(0.04, 0.10, 0.16),
            falloff: FogFalloff::Linear {
                start: 5.0,
                end: 25.0,
            },
            ..default()
        },
        Transform::from_xyz(0.0, 3.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
        OffscreenCamera,
        CameraController,
    ));

    spawn_lights(&mut commands);
    spawn_tank_shell(&mut commands, &mut meshes, &mut materials, &bounds);
    spawn_decor(&mut commands, &mut meshes, &mut materials, &bounds, &mut rng);
    spawn_fish_school(&mut commands, &mut meshes, &mut materials, &mut rng);
    spawn_bubble_field(&mut commands, &mut meshes, &mut materials, &bounds, &mut rng);

    println!("[Engine] Scene setup complete!");
}

fn spawn_lights(commands: &mut Commands) {
    // Dim blue ambient so shadowed sides stay readable
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.12, 0.23, 0.37),
        brightness: 120.0,
        ..default()
    });

    // Top light, pulsed slowly by the animation system
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(0.53, 0.8, 0.93),
            illuminance: 3000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, 10.0, 0.1).looking_at(Vec3::ZERO, Vec3::Y),
        PulsingLight {
            base_illuminance: 3000.0,
        },
    ));

    // Side fill
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(0.2, 0.4, 0.6),
            illuminance: 1000.0,
            ..default()
        },
        Transform::from_xyz(-5.0, 3.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Floor and four translucent glass walls
fn spawn_tank_shell(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    bounds: &TankBounds,
) {
    let floor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.18, 0.55, 0.34),
        perceptual_roughness: 0.9,
        metallic: 0.0,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(bounds.width, tank::WALL_THICKNESS, bounds.depth))),
        MeshMaterial3d(floor_material),
        Transform::from_xyz(0.0, bounds.floor_y() - tank::WALL_THICKNESS / 2.0, 0.0),
        TankWall,
    ));

    let glass = materials.add(StandardMaterial {
        base_color: Color::srgba(0.12, 0.56, 1.0, 0.3),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.1,
        metallic: 0.0,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    let t = tank::WALL_THICKNESS;
    let front_back = meshes.add(Cuboid::new(bounds.width, bounds.height, t));
    let left_right = meshes.add(Cuboid::new(t, bounds.height, bounds.depth));

    let wall_transforms = [
        (front_back.clone(), Vec3::new(0.0, 0.0, bounds.half_depth())),
        (front_back, Vec3::new(0.0, 0.0, -bounds.half_depth())),
        (left_right.clone(), Vec3::new(-bounds.half_width(), 0.0, 0.0)),
        (left_right, Vec3::new(bounds.half_width(), 0.0, 0.0)),
    ];

    for (mesh, position) in wall_transforms {
        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(glass.clone()),
            Transform::from_translation(position),
            TankWall,
        ));
    }
}

/// Rocks, coral and seaweed on the tank floor
fn spawn_decor(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    bounds: &TankBounds,
    rng: &mut impl Rng,
) {
    let rock_mesh = meshes.add(
        Sphere::new(0.5)
            .mesh()
            .ico(1)
            .expect("ico sphere subdivision"),
    );

    for position in [Vec3::new(-3.0, -2.8, 1.0), Vec3::new(3.0, -2.8, -2.0)] {
        commands.spawn((
            Mesh3d(rock_mesh.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: random_coral_color(rng),
                perceptual_roughness: 0.85,
                metallic: 0.1,
                ..default()
            })),
            Transform::from_translation(position),
            Obstacle {
                half_extents: Vec3::splat(0.5),
            },
        ));
    }

    commands.spawn((
        Mesh3d(meshes.add(Torus {
            minor_radius: 0.1,
            major_radius: 0.3,
        })),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: random_coral_color(rng),
            perceptual_roughness: 0.9,
            metallic: 0.05,
            ..default()
        })),
        Transform::from_xyz(0.0, -2.8, -3.0),
        Obstacle {
            half_extents: Vec3::new(0.4, 0.2, 0.4),
        },
    ));

    let blade_mesh = meshes.add(Cuboid::new(0.08, 1.2, 0.02));
    let blade_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.1, 0.6, 0.25),
        perceptual_roughness: 0.8,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    for _ in 0..seaweed::BLADE_COUNT {
        let x = (rng.gen::<f32>() - 0.5) * bounds.width * 0.8;
        let z = (rng.gen::<f32>() - 0.5) * bounds.depth * 0.8;
        commands.spawn((
            Mesh3d(blade_mesh.clone()),
            MeshMaterial3d(blade_material.clone()),
            Transform::from_xyz(x, bounds.floor_y() + 0.6, z),
            Seaweed {
                phase: rng.gen::<f32>() * std::f32::consts::TAU,
                sway_speed: rng.gen_range(seaweed::SWAY_SPEED_MIN..seaweed::SWAY_SPEED_MAX),
            },
        ));
    }
}

/// The fish: a root entity per fish carrying the behavioral state, with
/// body and tail child meshes that share one material per fish
fn spawn_fish_school(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    rng: &mut impl Rng,
) {
    let body_mesh = meshes.add(Sphere::new(0.4));
    let tail_mesh = meshes.add(Cone {
        radius: 0.2,
        height: 0.5,
    });

    for spec in &FISH_SPECS {
        let material = materials.add(StandardMaterial {
            base_color: spec.color,
            perceptual_roughness: 0.6,
            ..default()
        });

        let velocity = Vec3::new(
            rng.gen_range(-0.02..0.02_f32),
            rng.gen_range(-0.01..0.01_f32),
            rng.gen_range(-0.02..0.02_f32),
        );

        // Tail points backward along -X; the cone's apex faces +Y by
        // default so it is rolled a quarter turn first
        let tail_rest = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);

        commands
            .spawn((
                Name::new(spec.name),
                Fish {
                    velocity,
                    yaw: 0.0,
                    speed: velocity.length(),
                    phase: rng.gen::<f32>() * std::f32::consts::TAU,
                    base_color: spec.color,
                },
                Transform {
                    translation: spec.position,
                    scale: Vec3::splat(spec.scale),
                    ..default()
                },
                Visibility::default(),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(body_mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    Transform::from_scale(Vec3::new(1.2, 0.8, 0.6)),
                    PickBounds {
                        half_extents: Vec3::splat(0.4),
                    },
                ));
                parent.spawn((
                    Mesh3d(tail_mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    Transform {
                        translation: Vec3::new(-0.6, 0.0, 0.0),
                        rotation: tail_rest,
                        ..default()
                    },
                    PickBounds {
                        half_extents: Vec3::new(0.2, 0.25, 0.2),
                    },
                    FishTail {
                        rest_rotation: tail_rest,
                    },
                ));
            });
    }
}

/// Bubbles start scattered across the floor and recycle forever
fn spawn_bubble_field(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    bounds: &TankBounds,
    rng: &mut impl Rng,
) {
    let bubble_mesh = meshes.add(Sphere::new(bubbles::RADIUS));
    let bubble_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.53, 0.8, 1.0, 0.4),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.0,
        ..default()
    });

    commands.insert_resource(BubbleAssets {
        mesh: bubble_mesh.clone(),
        material: bubble_material.clone(),
    });

    for _ in 0..bubbles::INITIAL_COUNT {
        let position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * bounds.width * bubbles::SPAWN_AREA,
            bounds.floor_y() + tank::MARGIN,
            (rng.gen::<f32>() - 0.5) * bounds.depth * bubbles::SPAWN_AREA,
        );

        commands.spawn((
            Mesh3d(bubble_mesh.clone()),
            MeshMaterial3d(bubble_material.clone()),
            Transform::from_translation(position),
            Bubble {
                rise_speed: rng.gen_range(bubbles::RISE_MIN..bubbles::RISE_MAX),
                drift: Vec2::new(
                    (rng.gen::<f32>() - 0.5) * 2.0 * bubbles::DRIFT_MAX,
                    (rng.gen::<f32>() - 0.5) * 2.0 * bubbles::DRIFT_MAX,
                ),
            },
        ));
    }
}
