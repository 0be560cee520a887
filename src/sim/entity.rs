//! Entities and the ordered store they live in
//!
//! Entities are plain values. Once created they are only ever replaced: the
//! store's `map` and `filter` build a new store and leave the old one intact,
//! so a tick can always be replayed from its start-of-tick snapshot.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Projectile,
    Obstacle,
    Enemy,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Projectile => "projectile",
            EntityKind::Obstacle => "obstacle",
            EntityKind::Enemy => "enemy",
        }
    }

    /// Obstacles and enemies: spawned on timers, shot, dodged or clicked
    pub fn is_hazard(&self) -> bool {
        matches!(self, EntityKind::Obstacle | EntityKind::Enemy)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A simulated rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Fixed per category for the session
    pub size: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Already counted by pass scoring
    pub scored: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, pos: Vec2, size: Vec2, vel: Vec2) -> Self {
        Self {
            kind,
            pos,
            size,
            vel,
            scored: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Horizontal patrol direction: -1, 0 or 1
    pub fn direction(&self) -> f32 {
        if self.vel.x > 0.0 {
            1.0
        } else if self.vel.x < 0.0 {
            -1.0
        } else {
            0.0
        }
    }

    pub fn with_pos(self, pos: Vec2) -> Self {
        Self { pos, ..self }
    }

    pub fn with_vel(self, vel: Vec2) -> Self {
        Self { vel, ..self }
    }

    pub fn mark_scored(self) -> Self {
        Self {
            scored: true,
            ..self
        }
    }
}

/// Ordered entity collection (order is draw order)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    entities: Vec<Entity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append in arrival order
    pub fn add(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// New store with every entity replaced by `transform(entity)`
    pub fn map<F>(&self, transform: F) -> Self
    where
        F: FnMut(&Entity) -> Entity,
    {
        Self {
            entities: self.entities.iter().map(transform).collect(),
        }
    }

    /// New store holding only the entities that satisfy `keep`
    pub fn filter<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Entity) -> bool,
    {
        Self {
            entities: self.entities.iter().filter(|e| keep(e)).copied().collect(),
        }
    }

    /// New store without the entities whose index is flagged in `marked`
    pub fn without(&self, marked: &[bool]) -> Self {
        Self {
            entities: self
                .entities
                .iter()
                .enumerate()
                .filter(|(i, _)| !marked.get(*i).copied().unwrap_or(false))
                .map(|(_, e)| *e)
                .collect(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a EntityStore {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

impl FromIterator<Entity> for EntityStore {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}
