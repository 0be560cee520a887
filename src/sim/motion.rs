//! Motion system
//!
//! `pos += vel` once per tick for every live entity. The gravity player also
//! accumulates acceleration into its velocity before moving. Each entity's new
//! state depends only on its own start-of-tick state, so iteration order never
//! matters.

use glam::Vec2;

use super::entity::{Entity, EntityKind, EntityStore};
use crate::clamp_span;
use crate::config::{EdgePolicy, EngineConfig, PlayerMotion};

/// Advance the player one tick
pub fn step_player(player: &Entity, motion: &PlayerMotion) -> Entity {
    match *motion {
        PlayerMotion::Slide { .. } => player.with_pos(player.pos + player.vel),
        PlayerMotion::Gravity { gravity, .. } => {
            let vel = player.vel + Vec2::new(0.0, gravity);
            player.with_vel(vel).with_pos(player.pos + vel)
        }
    }
}

/// Apply discrete left/right steps (negative = left), clamped to the field
pub fn slide_player(player: &Entity, steps: i32, step: f32, field_width: f32) -> Entity {
    if steps == 0 {
        return *player;
    }
    let x = clamp_span(
        player.pos.x + steps as f32 * step,
        player.size.x,
        field_width,
    );
    player.with_pos(Vec2::new(x, player.pos.y))
}

/// Reset vertical velocity to the jump impulse
pub fn jump_player(player: &Entity, jump_velocity: f32) -> Entity {
    player.with_vel(Vec2::new(player.vel.x, jump_velocity))
}

/// Move one entity by its velocity, wrapping horizontally if requested
pub fn step_entity(entity: &Entity, field: Vec2, edges: EdgePolicy) -> Entity {
    let mut pos = entity.pos + entity.vel;
    if edges == EdgePolicy::Wrap {
        let dir = entity.direction();
        if dir > 0.0 && pos.x > field.x {
            pos.x = -entity.size.x;
        } else if dir < 0.0 && pos.x + entity.size.x < 0.0 {
            pos.x = field.x;
        }
    }
    entity.with_pos(pos)
}

/// Move every entity in a store
pub fn step_store(store: &EntityStore, config: &EngineConfig) -> EntityStore {
    let field = config.field_size();
    store.map(|e| step_entity(e, field, edge_policy(config, e.kind)))
}

fn edge_policy(config: &EngineConfig, kind: EntityKind) -> EdgePolicy {
    config
        .hazard(kind)
        .map(|h| h.edges)
        .unwrap_or(EdgePolicy::Cull)
}

/// Whether an entity is entirely past the edge it is travelling toward.
///
/// Entities spawn just outside their entry edge, so only the edge ahead counts.
/// Under [`EdgePolicy::Wrap`] the side edges never count: the entity reappears
/// at the opposite edge instead.
pub fn has_exited(entity: &Entity, field: Vec2, edges: EdgePolicy) -> bool {
    let r = entity.rect();
    let vertical = (entity.vel.y > 0.0 && r.top() >= field.y)
        || (entity.vel.y < 0.0 && r.bottom() <= 0.0);
    let dir = entity.direction();
    let horizontal = edges == EdgePolicy::Cull
        && ((dir > 0.0 && r.left() >= field.x) || (dir < 0.0 && r.right() <= 0.0));
    vertical || horizontal
}

/// Drop entities that have left the field, honoring each category's edge policy.
///
/// With `keep_falling`, hazards heading down are kept so a bottom-boundary
/// loss is never missed.
pub fn cull_exited(store: &EntityStore, config: &EngineConfig, keep_falling: bool) -> EntityStore {
    let field = config.field_size();
    store.filter(|e| {
        if keep_falling && e.kind.is_hazard() && e.vel.y > 0.0 {
            return true;
        }
        match e.kind {
            EntityKind::Player => true,
            _ => !has_exited(e, field, edge_policy(config, e.kind)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIELD: Vec2 = Vec2::new(400.0, 600.0);

    fn enemy(x: f32, vx: f32) -> Entity {
        Entity::new(
            EntityKind::Enemy,
            Vec2::new(x, 100.0),
            Vec2::new(40.0, 20.0),
            Vec2::new(vx, 0.0),
        )
    }

    #[test]
    fn test_gravity_accumulates_before_moving() {
        let motion = PlayerMotion::Gravity {
            gravity: 0.5,
            jump_velocity: -8.0,
        };
        let p = Entity::new(
            EntityKind::Player,
            Vec2::new(100.0, 300.0),
            Vec2::splat(24.0),
            Vec2::ZERO,
        );

        let p1 = step_player(&p, &motion);
        assert_eq!(p1.vel.y, 0.5);
        assert_eq!(p1.pos.y, 300.5);

        let p2 = step_player(&p1, &motion);
        assert_eq!(p2.vel.y, 1.0);
        assert_eq!(p2.pos.y, 301.5);

        // Jump resets velocity, gravity still applies that tick
        let p3 = step_player(&jump_player(&p2, -8.0), &motion);
        assert_eq!(p3.vel.y, -7.5);
        assert_eq!(p3.pos.y, 294.0);
    }

    #[test]
    fn test_slide_clamps_to_field() {
        let p = Entity::new(
            EntityKind::Player,
            Vec2::new(180.0, 580.0),
            Vec2::new(40.0, 20.0),
            Vec2::ZERO,
        );
        assert_eq!(slide_player(&p, -1, 5.0, 400.0).pos.x, 175.0);
        assert_eq!(slide_player(&p, 3, 5.0, 400.0).pos.x, 195.0);
        assert_eq!(slide_player(&p, -100, 5.0, 400.0).pos.x, 0.0);
        assert_eq!(slide_player(&p, 100, 5.0, 400.0).pos.x, 360.0);
        assert_eq!(slide_player(&p, 0, 5.0, 400.0).pos.y, 580.0);
    }

    #[test]
    fn test_wrap_reappears_at_opposite_edge() {
        let right = step_entity(&enemy(399.0, 2.0), FIELD, EdgePolicy::Wrap);
        assert_eq!(right.pos.x, -40.0);

        // Exactly at the edge does not wrap yet
        let edge = step_entity(&enemy(398.0, 2.0), FIELD, EdgePolicy::Wrap);
        assert_eq!(edge.pos.x, 400.0);

        let left = step_entity(&enemy(-39.0, -2.0), FIELD, EdgePolicy::Wrap);
        assert_eq!(left.pos.x, 400.0);

        let culled_kind = step_entity(&enemy(399.0, 2.0), FIELD, EdgePolicy::Cull);
        assert_eq!(culled_kind.pos.x, 401.0);
    }

    #[test]
    fn test_exit_is_direction_aware() {
        let falling = Entity::new(
            EntityKind::Obstacle,
            Vec2::new(10.0, -20.0),
            Vec2::new(40.0, 20.0),
            Vec2::new(0.0, 2.0),
        );
        // Waiting above the top edge is not an exit
        assert!(!has_exited(&falling, FIELD, EdgePolicy::Cull));
        assert!(!has_exited(&falling.with_pos(Vec2::new(10.0, 599.0)), FIELD, EdgePolicy::Cull));
        assert!(has_exited(&falling.with_pos(Vec2::new(10.0, 600.0)), FIELD, EdgePolicy::Cull));

        let bullet = Entity::new(
            EntityKind::Projectile,
            Vec2::new(10.0, 0.0),
            Vec2::new(4.0, 10.0),
            Vec2::new(0.0, -7.0),
        );
        assert!(!has_exited(&bullet, FIELD, EdgePolicy::Cull));
        assert!(has_exited(&bullet.with_pos(Vec2::new(10.0, -10.0)), FIELD, EdgePolicy::Cull));

        assert!(!has_exited(&enemy(-40.0, 2.0), FIELD, EdgePolicy::Cull));
        assert!(has_exited(&enemy(400.0, 2.0), FIELD, EdgePolicy::Cull));
        assert!(has_exited(&enemy(-40.0, -2.0), FIELD, EdgePolicy::Cull));
    }

    #[test]
    fn test_wrapping_entities_never_exit_sideways() {
        assert!(!has_exited(&enemy(400.0, 2.0), FIELD, EdgePolicy::Wrap));
        assert!(!has_exited(&enemy(-40.0, -2.0), FIELD, EdgePolicy::Wrap));
        // Vertical edges still apply
        let sinking = enemy(100.0, 0.0).with_pos(Vec2::new(100.0, 600.0)).with_vel(Vec2::new(2.0, 1.0));
        assert!(has_exited(&sinking, FIELD, EdgePolicy::Wrap));
    }

    #[test]
    fn test_cull_can_keep_falling_hazards() {
        let gone = Entity::new(
            EntityKind::Obstacle,
            Vec2::new(10.0, 650.0),
            Vec2::new(40.0, 20.0),
            Vec2::new(0.0, 2.0),
        );
        let config = EngineConfig::shooter();
        let store: EntityStore = [gone, enemy(100.0, 2.0)].into_iter().collect();
        assert_eq!(cull_exited(&store, &config, false).len(), 1);
        assert_eq!(cull_exited(&store, &config, true).len(), 2);
    }

    #[test]
    fn test_cull_keeps_wrapping_category_at_edge() {
        // Shooter enemies wrap, shooter blocks do not
        let config = EngineConfig::shooter();
        let block = Entity::new(
            EntityKind::Obstacle,
            Vec2::new(400.0, 100.0),
            Vec2::new(40.0, 20.0),
            Vec2::new(2.0, 0.0),
        );
        let store: EntityStore = [enemy(400.0, 2.0), enemy(-40.0, -2.0), block]
            .into_iter()
            .collect();
        let kept = cull_exited(&store, &config, false);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.kind == EntityKind::Enemy));
    }

    #[test]
    fn test_step_store_uses_category_edge_policy() {
        let config = EngineConfig::shooter();
        let block = Entity::new(
            EntityKind::Obstacle,
            Vec2::new(399.0, 10.0),
            Vec2::new(40.0, 20.0),
            Vec2::new(2.0, 0.0),
        );
        let store: EntityStore = [enemy(399.0, 2.0), block].into_iter().collect();
        let moved = step_store(&store, &config);
        assert_eq!(moved.get(0).unwrap().pos.x, -40.0);
        assert_eq!(moved.get(1).unwrap().pos.x, 401.0);
    }

    proptest! {
        #[test]
        fn prop_position_advances_by_velocity(
            x in -100.0f32..500.0,
            y in -100.0f32..700.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
        ) {
            let e = Entity::new(EntityKind::Obstacle, Vec2::new(x, y), Vec2::new(40.0, 20.0), Vec2::new(vx, vy));
            let moved = step_entity(&e, FIELD, EdgePolicy::Cull);
            prop_assert_eq!(moved.pos, e.pos + e.vel);
            prop_assert_eq!(moved.vel, e.vel);
            prop_assert_eq!(moved.size, e.size);
        }
    }
}
