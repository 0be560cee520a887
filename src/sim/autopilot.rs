//! Demo mode: the game plays itself
//!
//! Produces one tick's worth of input from the current state. Purely a
//! function of the state, so demo runs stay deterministic.

use super::entity::Entity;
use super::state::GameState;
use super::tick::TickInput;
use crate::config::{Placement, PlayerMotion};

/// Projectiles allowed in flight before the shooter holds fire
const MAX_IN_FLIGHT: usize = 3;
/// How far above the player a falling hazard counts as a threat
const DODGE_LOOKAHEAD: f32 = 160.0;
/// Extra clearance kept either side when dodging
const DODGE_MARGIN: f32 = 6.0;

/// Input for the next tick
pub fn plan(state: &GameState) -> TickInput {
    if state.is_over() {
        return TickInput::default();
    }
    match state.config.player.motion {
        PlayerMotion::Gravity { .. } => flap(state),
        PlayerMotion::Slide { step } => {
            if state.config.rules.score_on_click {
                click(state)
            } else if state.config.projectile.is_some() {
                hunt(state, step)
            } else {
                dodge(state, step)
            }
        }
    }
}

/// Hazard closest to the bottom of the field
fn lowest_hazard(state: &GameState) -> Option<&Entity> {
    state.hazards.iter().max_by(|a, b| {
        a.rect()
            .bottom()
            .partial_cmp(&b.rect().bottom())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// One step toward `target_x` (player center), or none when close enough
fn steer(player: &Entity, target_x: f32, step: f32) -> i32 {
    let dx = target_x - player.rect().center().x;
    if dx > step / 2.0 {
        1
    } else if dx < -step / 2.0 {
        -1
    } else {
        0
    }
}

/// Line up under the most urgent hazard and shoot
fn hunt(state: &GameState, step: f32) -> TickInput {
    let mut input = TickInput::default();
    let Some(target) = lowest_hazard(state) else {
        return input;
    };
    let Some(projectile) = &state.config.projectile else {
        return input;
    };

    // Lead the target by the time a shot needs to climb to it
    let player = &state.player;
    let climb = (player.rect().top() - target.rect().bottom()).max(0.0);
    let ticks = climb / (projectile.speed + target.vel.y.max(0.0));
    let aim_x = target.rect().center().x + target.vel.x * ticks;

    input.move_steps = steer(player, aim_x, step);
    let aligned = (aim_x - player.rect().center().x).abs() < target.size.x / 2.0;
    if aligned && state.projectiles.len() < MAX_IN_FLIGHT {
        input.fire = 1;
    }
    input
}

/// Step out from under falling hazards
fn dodge(state: &GameState, step: f32) -> TickInput {
    let mut input = TickInput::default();
    let player = state.player.rect();
    let field_width = state.config.field_size().x;

    let threat = state
        .hazards
        .iter()
        .filter(|h| h.vel.y > 0.0)
        .filter(|h| {
            let r = h.rect();
            r.bottom() >= player.top() - DODGE_LOOKAHEAD
                && r.top() < player.bottom()
                && r.right() + DODGE_MARGIN > player.left()
                && r.left() - DODGE_MARGIN < player.right()
        })
        .max_by(|a, b| {
            a.rect()
                .bottom()
                .partial_cmp(&b.rect().bottom())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(threat) = threat {
        let away_right = threat.rect().center().x <= player.center().x;
        let room_right = field_width - player.right();
        let room_left = player.left();
        input.move_steps = match (away_right, room_right >= step, room_left >= step) {
            (true, true, _) | (false, true, false) => 1,
            _ => -1,
        };
    }
    input
}

/// Keep the player level with the middle of the next gap
fn flap(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let player = &state.player;
    let field = state.config.field_size();

    let gap = match state.config.obstacle.map(|o| o.placement) {
        Some(Placement::GapPair { gap, .. }) => Some(gap),
        _ => None,
    };

    // The lower pillar of each pair is the one still waiting to score
    let target_y = gap
        .and_then(|gap| {
            state
                .hazards
                .iter()
                .filter(|h| !h.scored && h.rect().right() >= player.rect().left())
                .min_by(|a, b| {
                    a.pos
                        .x
                        .partial_cmp(&b.pos.x)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|lower| lower.rect().top() - gap / 2.0)
        })
        .unwrap_or(field.y / 2.0);

    input.jump = player.vel.y >= 0.0 && player.rect().center().y > target_y;
    input
}

/// Click the target closest to the bottom
fn click(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    if let Some(target) = lowest_hazard(state) {
        // Aim where the center will be after this tick's motion
        input.clicks.push(target.rect().center() + target.vel);
    }
    input
}
