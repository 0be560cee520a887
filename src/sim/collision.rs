//! Collision resolution
//!
//! One pass over the post-motion snapshot produces surviving projectiles,
//! surviving hazards and the score delta, plus an optional terminal cause.
//! Nothing is spliced out while iterating; matches are marked and removed by
//! a single filter at the end.

use glam::Vec2;

use super::entity::{Entity, EntityKind, EntityStore};
use super::state::GameOverCause;
use crate::config::Rules;

/// What removed a hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    Projectile,
    Click,
}

/// A hazard destroyed this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub source: HitSource,
    pub target: EntityKind,
    /// Center of the destroyed hazard
    pub at: Vec2,
}

/// Output of one resolver pass
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub projectiles: EntityStore,
    pub hazards: EntityStore,
    pub score_delta: u64,
    pub terminal: Option<GameOverCause>,
    pub hits: Vec<Hit>,
}

/// Resolve one tick's collisions.
///
/// Each projectile takes the first unmarked hazard it overlaps, in store
/// order, so every entity is matched at most once. Ties go to iteration order,
/// not to the closest hazard. Terminal checks look at every hazard in the
/// snapshot, including ones destroyed in this same pass.
pub fn resolve(
    rules: &Rules,
    field: Vec2,
    player: &Entity,
    projectiles: &EntityStore,
    hazards: &EntityStore,
    clicks: &[Vec2],
) -> Resolution {
    let mut shot = vec![false; projectiles.len()];
    let mut destroyed = vec![false; hazards.len()];
    let mut hits = Vec::new();
    let mut score_delta = 0;

    for (pi, projectile) in projectiles.iter().enumerate() {
        let rect = projectile.rect();
        let target = hazards
            .iter()
            .enumerate()
            .find(|(hi, h)| !destroyed[*hi] && rect.intersects(&h.rect()));
        if let Some((hi, hazard)) = target {
            shot[pi] = true;
            destroyed[hi] = true;
            score_delta += 1;
            hits.push(Hit {
                source: HitSource::Projectile,
                target: hazard.kind,
                at: hazard.rect().center(),
            });
        }
    }

    if rules.score_on_click {
        for &point in clicks {
            let target = hazards
                .iter()
                .enumerate()
                .find(|(hi, h)| !destroyed[*hi] && h.rect().contains_point(point));
            if let Some((hi, hazard)) = target {
                destroyed[hi] = true;
                score_delta += 1;
                hits.push(Hit {
                    source: HitSource::Click,
                    target: hazard.kind,
                    at: hazard.rect().center(),
                });
            }
        }
    }

    let terminal = terminal_cause(rules, field, player, hazards);

    let mut passed = 0;
    let hazards: EntityStore = hazards
        .iter()
        .enumerate()
        .map(|(hi, h)| {
            if rules.score_on_pass && !destroyed[hi] && !h.scored && has_passed(h, player) {
                passed += 1;
                h.mark_scored()
            } else {
                *h
            }
        })
        .collect();
    score_delta += passed;

    if !hits.is_empty() || passed > 0 {
        log::debug!(
            "{} hit(s), {} passed, +{} points",
            hits.len(),
            passed,
            score_delta
        );
    }

    Resolution {
        projectiles: projectiles.without(&shot),
        hazards: hazards.without(&destroyed),
        score_delta,
        terminal,
        hits,
    }
}

/// First terminal condition that holds, if any
pub fn terminal_cause(
    rules: &Rules,
    field: Vec2,
    player: &Entity,
    hazards: &EntityStore,
) -> Option<GameOverCause> {
    let player_rect = player.rect();

    if rules.lose_on_player_contact && hazards.iter().any(|h| h.rect().intersects(&player_rect)) {
        return Some(GameOverCause::PlayerHit);
    }
    if rules.lose_on_player_leaving_field
        && (player_rect.top() < 0.0 || player_rect.bottom() > field.y)
    {
        return Some(GameOverCause::PlayerLeftField);
    }
    if rules.lose_on_reach_bottom
        && hazards
            .iter()
            .any(|h| h.vel.y > 0.0 && h.rect().bottom() >= field.y)
    {
        return Some(GameOverCause::ReachedBottom);
    }
    None
}

/// Whether a hazard's trailing edge has reached or passed the player's
/// leading edge along the hazard's direction of travel
pub fn has_passed(hazard: &Entity, player: &Entity) -> bool {
    let h = hazard.rect();
    let p = player.rect();
    let dir = hazard.direction();
    if dir < 0.0 {
        h.right() <= p.left()
    } else if dir > 0.0 {
        h.left() >= p.right()
    } else if hazard.vel.y > 0.0 {
        h.top() >= p.bottom()
    } else if hazard.vel.y < 0.0 {
        h.bottom() <= p.top()
    } else {
        false
    }
}
