//! Render snapshot
//!
//! Everything a renderer needs for one frame, detached from the simulation so
//! drawing can never mutate game state.

use glam::Vec2;
use serde::Serialize;

use super::entity::EntityKind;
use super::geometry::Rect;
use super::state::{GameOverCause, GameState};
use crate::config::Variant;

/// A hazard rectangle plus its category (for color selection)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HazardRect {
    pub kind: EntityKind,
    pub rect: Rect,
}

/// One frame of render output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub variant: Variant,
    pub field: Vec2,
    pub tick: u64,
    pub player: Rect,
    pub projectiles: Vec<Rect>,
    pub hazards: Vec<HazardRect>,
    pub score: u64,
    pub is_over: bool,
    /// Set once the session is over
    pub final_score: Option<u64>,
    pub cause: Option<GameOverCause>,
}

/// Text lines drawn over the play field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// Always-visible score line
    pub hud: String,
    /// Title and final score, only when the session is over
    pub game_over: Option<(String, String)>,
}

impl RenderSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let is_over = state.is_over();
        Self {
            variant: state.config.variant,
            field: state.config.field_size(),
            tick: state.time_ticks,
            player: state.player.rect(),
            projectiles: state.projectiles.iter().map(|p| p.rect()).collect(),
            hazards: state
                .hazards
                .iter()
                .map(|h| HazardRect {
                    kind: h.kind,
                    rect: h.rect(),
                })
                .collect(),
            score: state.score(),
            is_over,
            final_score: is_over.then(|| state.score()),
            cause: state.session.cause(),
        }
    }

    pub fn overlay(&self) -> Overlay {
        Overlay {
            hud: format!("Score: {}", self.score),
            game_over: self.final_score.map(|score| {
                ("Game Over".to_string(), format!("Final Score: {score}"))
            }),
        }
    }
}
