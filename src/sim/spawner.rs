//! Timer-gated hazard spawning
//!
//! Each hazard category keeps its own last-spawn timestamp. The random source
//! is passed in so placement is reproducible from a seed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind, EntityStore};
use crate::config::{HazardConfig, Placement};

/// Last-spawn timestamps per hazard category (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    obstacle_last_ms: f64,
    enemy_last_ms: f64,
}

impl Spawner {
    /// Timers start at `start_ms`: nothing spawns until one interval has passed
    pub fn new(start_ms: f64) -> Self {
        Self {
            obstacle_last_ms: start_ms,
            enemy_last_ms: start_ms,
        }
    }

    pub fn reset(&mut self, start_ms: f64) {
        *self = Self::new(start_ms);
    }

    pub fn last_spawn_ms(&self, kind: EntityKind) -> Option<f64> {
        match kind {
            EntityKind::Obstacle => Some(self.obstacle_last_ms),
            EntityKind::Enemy => Some(self.enemy_last_ms),
            EntityKind::Player | EntityKind::Projectile => None,
        }
    }

    fn last_mut(&mut self, kind: EntityKind) -> Option<&mut f64> {
        match kind {
            EntityKind::Obstacle => Some(&mut self.obstacle_last_ms),
            EntityKind::Enemy => Some(&mut self.enemy_last_ms),
            EntityKind::Player | EntityKind::Projectile => None,
        }
    }

    /// Spawn one `kind` (a pillar pair counts as one) if its interval has
    /// elapsed. Returns the number of entities appended to `store`.
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        kind: EntityKind,
        hazard: &HazardConfig,
        field: Vec2,
        store: &mut EntityStore,
        rng: &mut R,
    ) -> usize {
        let Some(last) = self.last_mut(kind) else {
            return 0;
        };
        if now_ms - *last < hazard.spawn_interval_ms {
            return 0;
        }
        *last = now_ms;

        let spawned = spawn_hazards(kind, hazard, field, rng);
        let count = spawned.len();
        for entity in spawned {
            log::debug!(
                "spawn {} at ({:.1}, {:.1})",
                kind,
                entity.pos.x,
                entity.pos.y
            );
            store.add(entity);
        }
        count
    }
}

/// Build the entities for one spawn of `kind`, placed just outside the
/// entry edge with a uniformly random offset along that edge
pub fn spawn_hazards<R: Rng + ?Sized>(
    kind: EntityKind,
    hazard: &HazardConfig,
    field: Vec2,
    rng: &mut R,
) -> Vec<Entity> {
    let size = hazard.size;
    let speed = hazard.speed;

    match hazard.placement {
        Placement::Top => {
            let x = rng.random_range(0.0..=field.x - size.x);
            vec![Entity::new(
                kind,
                Vec2::new(x, -size.y),
                size,
                Vec2::new(0.0, speed),
            )]
        }
        Placement::Sides { min_y, max_y } => {
            let y = rng.random_range(min_y..=max_y);
            let from_left = rng.random_bool(0.5);
            let (x, vx) = if from_left {
                (-size.x, speed)
            } else {
                (field.x, -speed)
            };
            vec![Entity::new(kind, Vec2::new(x, y), size, Vec2::new(vx, 0.0))]
        }
        Placement::GapPair { gap, margin } => {
            let gap_top = rng.random_range(margin..=field.y - margin - gap);
            let vel = Vec2::new(-speed, 0.0);
            // The upper pillar never scores; its partner carries the pair's point
            let upper = Entity::new(kind, Vec2::new(field.x, gap_top - size.y), size, vel)
                .mark_scored();
            let lower = Entity::new(kind, Vec2::new(field.x, gap_top + gap), size, vel);
            vec![upper, lower]
        }
    }
}
