//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host timestamps only drive spawn timers; motion is per tick
//! - Seeded RNG only
//! - Stable iteration order (store insertion order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod motion;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Hit, HitSource, Resolution, resolve};
pub use entity::{Entity, EntityKind, EntityStore};
pub use geometry::{Rect, intersects};
pub use snapshot::{HazardRect, Overlay, RenderSnapshot};
pub use spawner::Spawner;
pub use state::{GameOverCause, GameState, Session, SessionPhase};
pub use tick::{InputEvent, TickInput, TickReport, tick};
