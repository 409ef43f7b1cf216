//! Bubble simulation
//!
//! Bubbles rise with a gentle horizontal wobble and recycle to the tank
//! floor when they cross the surface; fish occasionally release trail
//! bubbles behind them, capped by a fixed total count.

use bevy::prelude::*;
use rand::Rng;

use crate::config::{bubbles, tank};
use crate::engine::components::{Bubble, Fish};
use crate::engine::resources::{BubbleAssets, TankBounds};

/// Advance every bubble; recycle the ones that crossed the surface
pub fn rise_bubbles(
    time: Res<Time>,
    bounds: Res<TankBounds>,
    mut query: Query<(&mut Transform, &Bubble)>,
) {
    let dt = time.delta_secs();
    let mut rng = rand::thread_rng();

    for (mut transform, bubble) in query.iter_mut() {
        transform.translation.y += bubble.rise_speed * dt;
        transform.translation.x += bubble.drift.x * dt;
        transform.translation.z += bubble.drift.y * dt;

        if transform.translation.y > bounds.half_height() {
            transform.translation = respawn_position(&bounds, &mut rng);
        }
    }
}

/// Occasionally release a bubble behind a swimming fish
pub fn spawn_trail_bubbles(
    mut commands: Commands,
    assets: Option<Res<BubbleAssets>>,
    fish: Query<(&Transform, &Fish)>,
    existing: Query<&Bubble>,
) {
    let Some(assets) = assets else { return };

    let mut alive = existing.iter().count();
    let mut rng = rand::thread_rng();

    for (transform, fish) in fish.iter() {
        if alive >= bubbles::MAX_COUNT {
            break;
        }
        if rng.gen::<f32>() >= bubbles::TRAIL_CHANCE {
            continue;
        }

        // Release just behind the tail
        let heading = Vec3::new(fish.yaw.cos(), 0.0, -fish.yaw.sin());
        let position = transform.translation - heading * 0.6;

        commands.spawn((
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(assets.material.clone()),
            Transform::from_translation(position),
            Bubble {
                rise_speed: rng.gen_range(bubbles::RISE_MIN..bubbles::RISE_MAX),
                drift: Vec2::new(
                    (rng.gen::<f32>() - 0.5) * 2.0 * bubbles::DRIFT_MAX,
                    (rng.gen::<f32>() - 0.5) * 2.0 * bubbles::DRIFT_MAX,
                ),
            },
        ));
        alive += 1;
    }
}

/// Fresh floor position with randomized (x, z) inside the spawn area
pub(crate) fn respawn_position(bounds: &TankBounds, rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * bounds.width * bubbles::SPAWN_AREA,
        bounds.floor_y() + tank::MARGIN,
        (rng.gen::<f32>() - 0.5) * bounds.depth * bubbles::SPAWN_AREA,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn respawn_lands_on_the_floor_inside_the_spawn_area() {
        let bounds = TankBounds::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let position = respawn_position(&bounds, &mut rng);
            assert_eq!(position.y, bounds.floor_y() + tank::MARGIN);
            assert!(position.x.abs() <= bounds.width * bubbles::SPAWN_AREA / 2.0);
            assert!(position.z.abs() <= bounds.depth * bubbles::SPAWN_AREA / 2.0);
        }
    }

    #[test]
    fn respawn_positions_vary_horizontally() {
        let bounds = TankBounds::default();
        let mut rng = StdRng::seed_from_u64(7);

        let first = respawn_position(&bounds, &mut rng);
        let second = respawn_position(&bounds, &mut rng);
        assert_ne!((first.x, first.z), (second.x, second.z));
    }
}
