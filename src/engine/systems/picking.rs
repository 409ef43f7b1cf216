//! Pick/selection handling
//!
//! Clicks queued by the frontend are turned into camera rays and tested
//! against the world bounding boxes of every fish part; the nearest hit
//! selects the owning fish. Selection is single-slot: picking a new fish
//! deselects the previous one, clicking open water clears everything.

use bevy::prelude::*;

use crate::engine::components::{Fish, OffscreenCamera, PickBounds, Selected};
use crate::engine::resources::{PointerInputRes, SelectionRes};
use crate::tauri_bridge::shared_state::FishInfo;

/// Emissive tint applied to every part of the selected fish
const HIGHLIGHT: LinearRgba = LinearRgba {
    red: 0.2,
    green: 0.2,
    blue: 0.2,
    alpha: 1.0,
};

pub fn handle_clicks(
    mut commands: Commands,
    pointer: Option<Res<PointerInputRes>>,
    selection_out: Option<Res<SelectionRes>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<OffscreenCamera>>,
    parts: Query<(&GlobalTransform, &PickBounds, &ChildOf)>,
    part_materials: Query<(&MeshMaterial3d<StandardMaterial>, &ChildOf)>,
    fish: Query<(&Transform, &Fish, &Name)>,
    selected: Query<Entity, With<Selected>>,
) {
    let Some(pointer) = pointer else { return };

    let clicks = {
        let Ok(mut guard) = pointer.0 .0.lock() else {
            return;
        };
        std::mem::take(&mut guard.clicks)
    };
    if clicks.is_empty() {
        return;
    }

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    // `Selected` markers move through deferred commands, so the query
    // stays frozen while this system runs; track the slot locally across
    // every click drained this frame
    let mut current = selected.single().ok();

    for click in clicks {
        let Ok(ray) = camera.viewport_to_world(camera_transform, Vec2::new(click[0], click[1]))
        else {
            continue;
        };

        // Nearest intersected part wins; its parent is the fish root
        let mut hit: Option<(Entity, f32)> = None;
        for (global, bounds, child_of) in parts.iter() {
            let (min, max) = world_aabb(global, bounds.half_extents);
            let Some(distance) = ray_aabb_intersection(ray.origin, *ray.direction, min, max)
            else {
                continue;
            };
            if hit.map_or(true, |(_, best)| distance < best) {
                hit = Some((child_of.parent(), distance));
            }
        }

        let (deselect, select) = apply_transition(&mut current, hit.map(|(entity, _)| entity));

        if let Some(entity) = deselect {
            commands.entity(entity).remove::<Selected>();
            tint_fish(entity, LinearRgba::BLACK, &part_materials, &mut materials);
        }

        match select {
            Some(entity) => {
                commands.entity(entity).insert(Selected);
                tint_fish(entity, HIGHLIGHT, &part_materials, &mut materials);

                if let (Some(out), Ok((transform, fish, name))) =
                    (&selection_out, fish.get(entity))
                {
                    if let Ok(mut slot) = out.0 .0.lock() {
                        *slot = Some(FishInfo {
                            name: name.as_str().to_string(),
                            color: color_to_hex(fish.base_color),
                            speed: fish.speed,
                            position: transform.translation.to_array(),
                        });
                    }
                }
            }
            None => {
                if let Some(out) = &selection_out {
                    if let Ok(mut slot) = out.0 .0.lock() {
                        *slot = None;
                    }
                }
            }
        }
    }
}

/// Apply an emissive tint to every part material of one fish
fn tint_fish(
    fish_entity: Entity,
    emissive: LinearRgba,
    part_materials: &Query<(&MeshMaterial3d<StandardMaterial>, &ChildOf)>,
    materials: &mut Assets<StandardMaterial>,
) {
    for (handle, child_of) in part_materials.iter() {
        if child_of.parent() != fish_entity {
            continue;
        }
        if let Some(material) = materials.get_mut(&handle.0) {
            material.emissive = emissive;
        }
    }
}

/// Fold one click into the tracked selection slot, returning the
/// transition to apply. The slot must advance between clicks of the same
/// frame, otherwise a later click would deselect against stale state.
pub(crate) fn apply_transition(
    current: &mut Option<Entity>,
    hit: Option<Entity>,
) -> (Option<Entity>, Option<Entity>) {
    let (deselect, select) = selection_transition(*current, hit);
    *current = select;
    (deselect, select)
}

/// Single-slot selection transition: returns (fish to deselect, fish to
/// select). Clicking open water keeps the slot empty; clicking a fish
/// always clears the previous holder first.
pub(crate) fn selection_transition(
    current: Option<Entity>,
    hit: Option<Entity>,
) -> (Option<Entity>, Option<Entity>) {
    match hit {
        Some(fish) => (current.filter(|&c| c != fish), Some(fish)),
        None => (current, None),
    }
}

/// World-space AABB of an oriented box: transform the center and project
/// the half extents through the absolute rotation/scale axes
pub(crate) fn world_aabb(global: &GlobalTransform, half_extents: Vec3) -> (Vec3, Vec3) {
    let affine = global.affine();
    let center = Vec3::from(affine.translation);
    let half_world = Vec3::from(
        affine.matrix3.x_axis.abs() * half_extents.x
            + affine.matrix3.y_axis.abs() * half_extents.y
            + affine.matrix3.z_axis.abs() * half_extents.z,
    );
    (center - half_world, center + half_world)
}

/// Slab test returning the distance along the ray to the nearest
/// intersection, or `None` when the ray misses the box
pub(crate) fn ray_aabb_intersection(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        if direction[axis].abs() < f32::EPSILON {
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction[axis];
        let mut t0 = (min[axis] - origin[axis]) * inv;
        let mut t1 = (max[axis] - origin[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far || t_far < 0.0 {
            return None;
        }
    }

    Some(if t_near >= 0.0 { t_near } else { t_far })
}

/// Base color as the lowercase hex string shown in the info panel
pub(crate) fn color_to_hex(color: Color) -> String {
    let srgba = color.to_srgba();
    format!(
        "{:02x}{:02x}{:02x}",
        (srgba.red * 255.0).round() as u8,
        (srgba.green * 255.0).round() as u8,
        (srgba.blue * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_box_straight_on() {
        let hit = ray_aabb_intersection(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::splat(-0.5),
            Vec3::splat(0.5),
        );
        assert_eq!(hit, Some(4.5));
    }

    #[test]
    fn ray_misses_offset_box() {
        let hit = ray_aabb_intersection(
            Vec3::new(3.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::splat(-0.5),
            Vec3::splat(0.5),
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn ray_parallel_to_slab_outside_misses() {
        let hit = ray_aabb_intersection(
            Vec3::new(0.0, 2.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::splat(-0.5),
            Vec3::splat(0.5),
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn ray_starting_inside_reports_exit_distance() {
        let hit = ray_aabb_intersection(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::splat(-0.5),
            Vec3::splat(0.5),
        )
        .expect("inside ray must hit");
        assert!(hit > 0.0);
    }

    #[test]
    fn world_aabb_accounts_for_scale() {
        let global = GlobalTransform::from(Transform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            scale: Vec3::new(2.0, 1.0, 0.5),
            ..Default::default()
        });
        let (min, max) = world_aabb(&global, Vec3::splat(0.4));
        assert!((min - Vec3::new(0.2, 1.6, 2.8)).length() < 1e-5);
        assert!((max - Vec3::new(1.8, 2.4, 3.2)).length() < 1e-5);
    }

    fn two_entities() -> (Entity, Entity) {
        let mut world = World::new();
        (world.spawn_empty().id(), world.spawn_empty().id())
    }

    #[test]
    fn selecting_another_fish_swaps_the_slot() {
        let (a, b) = two_entities();
        assert_eq!(selection_transition(Some(a), Some(b)), (Some(a), Some(b)));
    }

    #[test]
    fn clicking_open_water_clears_the_selection() {
        let (a, _) = two_entities();
        assert_eq!(selection_transition(Some(a), None), (Some(a), None));
        assert_eq!(selection_transition(None, None), (None, None));
    }

    #[test]
    fn reselecting_the_same_fish_keeps_it_highlighted() {
        let (a, _) = two_entities();
        assert_eq!(selection_transition(Some(a), Some(a)), (None, Some(a)));
    }

    #[test]
    fn two_clicks_in_one_drain_leave_exactly_the_last_fish() {
        // Two queued clicks processed in the same frame, first on fish A
        // then on fish B; the slot must advance between them so A's
        // highlight is removed
        let (a, b) = two_entities();
        let mut current = None;
        let mut highlighted = std::collections::HashSet::new();

        for hit in [Some(a), Some(b)] {
            let (deselect, select) = apply_transition(&mut current, hit);
            if let Some(entity) = deselect {
                highlighted.remove(&entity);
            }
            if let Some(entity) = select {
                highlighted.insert(entity);
            }
        }

        assert_eq!(current, Some(b));
        assert_eq!(highlighted.into_iter().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn click_then_open_water_in_one_drain_clears_everything() {
        let (a, _) = two_entities();
        let mut current = None;

        assert_eq!(apply_transition(&mut current, Some(a)), (None, Some(a)));
        assert_eq!(apply_transition(&mut current, None), (Some(a), None));
        assert_eq!(current, None);
    }

    #[test]
    fn hex_formatting_matches_the_source_color() {
        assert_eq!(color_to_hex(Color::srgb(1.0, 0.8, 0.0)), "ffcc00");
        assert_eq!(color_to_hex(Color::BLACK), "000000");
    }
}
