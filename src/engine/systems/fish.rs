//! Fish simulation
//!
//! Per-frame systems advancing the school: velocity integration with
//! boundary reflection, yaw smoothing toward the travel direction, pairwise
//! separation, obstacle avoidance and the tail flutter.

use bevy::prelude::*;

use crate::config::{fish, tank};
use crate::engine::components::{Fish, FishTail, Obstacle};
use crate::engine::resources::TankBounds;

/// Integrate fish velocity, reflect off the tank walls and smooth the yaw
pub fn swim_fish(
    time: Res<Time>,
    bounds: Res<TankBounds>,
    mut query: Query<(&mut Transform, &mut Fish)>,
) {
    let dt = time.delta_secs();

    for (mut transform, mut fish) in query.iter_mut() {
        let step = fish.velocity * dt * fish::SPEED_MULTIPLIER;
        transform.translation += step;

        let limits = [
            (bounds.half_width(), 0usize),
            (bounds.half_height(), 1usize),
            (bounds.half_depth(), 2usize),
        ];
        for (half_extent, axis) in limits {
            let max = half_extent - tank::MARGIN;
            let mut position = transform.translation[axis];
            let mut velocity = fish.velocity[axis];
            reflect_axis(&mut position, &mut velocity, -max, max);
            transform.translation[axis] = position;
            fish.velocity[axis] = velocity;
        }

        fish.yaw = smooth_yaw(fish.yaw, fish.velocity, fish::YAW_SMOOTHING);
        transform.rotation = Quat::from_rotation_y(fish.yaw);
    }
}

/// Push every too-close pair of fish apart by a small velocity nudge
pub fn school_separation(mut query: Query<(&Transform, &mut Fish)>) {
    let mut pairs = query.iter_combinations_mut();
    while let Some([(transform_a, mut fish_a), (transform_b, mut fish_b)]) = pairs.fetch_next() {
        let a = transform_a.translation;
        let b = transform_b.translation;
        if a.distance_squared(b) >= fish::MIN_SEPARATION * fish::MIN_SEPARATION {
            continue;
        }

        let (delta_a, delta_b) = separation_deltas(a, b, fish::SEPARATION_NUDGE);
        fish_a.velocity += delta_a;
        fish_b.velocity += delta_b;
    }
}

/// Steer fish out of overlapping decor, preserving their speed
pub fn avoid_obstacles(
    mut fish_query: Query<(&mut Transform, &mut Fish)>,
    obstacles: Query<(&Transform, &Obstacle), Without<Fish>>,
) {
    for (mut transform, mut fish) in fish_query.iter_mut() {
        let fish_half = Vec3::splat(fish::HALF_SIZE) * transform.scale;

        for (obstacle_transform, obstacle) in obstacles.iter() {
            let obstacle_center = obstacle_transform.translation;
            if !aabbs_overlap(
                transform.translation,
                fish_half,
                obstacle_center,
                obstacle.half_extents,
            ) {
                continue;
            }

            let away = deflect_from_obstacle(fish.velocity, transform.translation, obstacle_center);
            fish.velocity = away;
            // Best-effort separation, reduces the overlap next frame
            if let Some(dir) = away.try_normalize() {
                transform.translation += dir * fish::OBSTACLE_NUDGE;
            }
        }
    }
}

/// Tail flutter, a pure function of time and the owning fish's phase
pub fn animate_fish_tails(
    time: Res<Time>,
    mut tails: Query<(&mut Transform, &FishTail, &ChildOf)>,
    fish: Query<&Fish>,
) {
    let t = time.elapsed_secs();

    for (mut transform, tail, child_of) in tails.iter_mut() {
        let Ok(owner) = fish.get(child_of.parent()) else {
            continue;
        };
        let flutter =
            (t * fish::TAIL_FLUTTER_SPEED + owner.phase).sin() * fish::TAIL_FLUTTER_AMPLITUDE;
        transform.rotation = Quat::from_rotation_y(flutter) * tail.rest_rotation;
    }
}

/// Clamp `position` into [min, max]; on contact the velocity sign flips
/// (elastic reflection). Returns whether a wall was hit.
pub(crate) fn reflect_axis(position: &mut f32, velocity: &mut f32, min: f32, max: f32) -> bool {
    if *position < min {
        *position = min;
        *velocity = -*velocity;
        true
    } else if *position > max {
        *position = max;
        *velocity = -*velocity;
        true
    } else {
        false
    }
}

/// Blend the current yaw toward atan2(-v.z, v.x), the heading that points
/// the fish nose along its travel direction
pub(crate) fn smooth_yaw(current: f32, velocity: Vec3, blend: f32) -> f32 {
    if velocity.length_squared() < f32::EPSILON {
        return current;
    }
    let target = (-velocity.z).atan2(velocity.x);
    current + (target - current) * blend
}

/// Velocity nudges pushing two fish apart along the line between them
pub(crate) fn separation_deltas(a: Vec3, b: Vec3, nudge: f32) -> (Vec3, Vec3) {
    let away = (a - b).try_normalize().unwrap_or(Vec3::X);
    (away * nudge, -away * nudge)
}

/// Axis-aligned bounding box overlap test
pub(crate) fn aabbs_overlap(center_a: Vec3, half_a: Vec3, center_b: Vec3, half_b: Vec3) -> bool {
    (center_a.x - center_b.x).abs() <= half_a.x + half_b.x
        && (center_a.y - center_b.y).abs() <= half_a.y + half_b.y
        && (center_a.z - center_b.z).abs() <= half_a.z + half_b.z
}

/// Redirect a velocity to point away from an obstacle center while
/// preserving its magnitude
pub(crate) fn deflect_from_obstacle(velocity: Vec3, fish_pos: Vec3, obstacle_pos: Vec3) -> Vec3 {
    let speed = velocity.length();
    let away = (fish_pos - obstacle_pos).try_normalize().unwrap_or(Vec3::Y);
    away * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_clamps_and_flips_at_upper_bound() {
        let mut position = 5.2;
        let mut velocity = 0.8;
        assert!(reflect_axis(&mut position, &mut velocity, -4.5, 4.5));
        assert_eq!(position, 4.5);
        assert_eq!(velocity, -0.8);
    }

    #[test]
    fn reflect_clamps_and_flips_at_lower_bound() {
        let mut position = -3.1;
        let mut velocity = -0.4;
        assert!(reflect_axis(&mut position, &mut velocity, -2.5, 2.5));
        assert_eq!(position, -2.5);
        assert_eq!(velocity, 0.4);
    }

    #[test]
    fn reflect_leaves_interior_positions_alone() {
        let mut position = 1.0;
        let mut velocity = 0.3;
        assert!(!reflect_axis(&mut position, &mut velocity, -4.5, 4.5));
        assert_eq!(position, 1.0);
        assert_eq!(velocity, 0.3);
    }

    #[test]
    fn separation_deltas_point_apart() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(0.5, 0.2, 0.0);
        let (delta_a, delta_b) = separation_deltas(a, b, 0.004);

        // Each fish accelerates away from the other: the change dotted
        // with the vector toward the neighbor is negative
        assert!(delta_a.dot(b - a) < 0.0);
        assert!(delta_b.dot(a - b) < 0.0);
    }

    #[test]
    fn coincident_fish_still_separate() {
        let p = Vec3::splat(1.0);
        let (delta_a, delta_b) = separation_deltas(p, p, 0.004);
        assert!(delta_a.length() > 0.0);
        assert_eq!(delta_a, -delta_b);
    }

    #[test]
    fn deflection_preserves_speed() {
        let velocity = Vec3::new(0.03, -0.01, 0.02);
        let deflected =
            deflect_from_obstacle(velocity, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0));
        assert!((deflected.length() - velocity.length()).abs() < 1e-6);
        // Pointing away from the obstacle
        assert!(deflected.dot(Vec3::X) > 0.0);
    }

    #[test]
    fn overlap_respects_combined_extents() {
        let half = Vec3::splat(0.5);
        assert!(aabbs_overlap(Vec3::ZERO, half, Vec3::new(0.9, 0.0, 0.0), half));
        assert!(!aabbs_overlap(Vec3::ZERO, half, Vec3::new(1.1, 0.0, 0.0), half));
    }

    #[test]
    fn yaw_blends_toward_travel_direction() {
        // Traveling along +X, target yaw is 0
        let yaw = smooth_yaw(1.0, Vec3::X, 0.1);
        assert!((yaw - 0.9).abs() < 1e-6);

        // A stationary fish keeps its heading
        assert_eq!(smooth_yaw(0.7, Vec3::ZERO, 0.1), 0.7);
    }
}
