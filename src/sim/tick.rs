//! One simulation tick
//!
//! Fixed order: input → motion → spawner → collision resolver → session →
//! exit culling. Collisions see post-motion positions only.

use glam::Vec2;

use super::collision::{Hit, resolve};
use super::entity::{Entity, EntityKind};
use super::motion::{cull_exited, jump_player, slide_player, step_player, step_store};
use super::state::{GameOverCause, GameState};
use crate::config::PlayerMotion;

/// A raw input event forwarded by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    Fire,
    Jump,
    /// Pointer click in field coordinates
    Click(Vec2),
}

/// Input accumulated between two ticks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Net horizontal steps (negative = left)
    pub move_steps: i32,
    /// Fire presses; one projectile each
    pub fire: u32,
    pub jump: bool,
    pub clicks: Vec<Vec2>,
}

impl TickInput {
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveLeft => self.move_steps -= 1,
            InputEvent::MoveRight => self.move_steps += 1,
            InputEvent::Fire => self.fire += 1,
            InputEvent::Jump => self.jump = true,
            InputEvent::Click(p) => self.clicks.push(p),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.move_steps == 0 && self.fire == 0 && !self.jump && self.clicks.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl FromIterator<InputEvent> for TickInput {
    fn from_iter<I: IntoIterator<Item = InputEvent>>(iter: I) -> Self {
        let mut input = Self::default();
        for event in iter {
            input.push(event);
        }
        input
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// False when the session was already over and nothing ran
    pub ticked: bool,
    pub fired: usize,
    pub spawned: usize,
    pub hits: Vec<Hit>,
    pub score_delta: u64,
    /// Set on the tick the session ended
    pub game_over: Option<GameOverCause>,
}

/// Advance the game state by one tick at host time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> TickReport {
    if state.is_over() {
        return TickReport::default();
    }

    state.time_ticks += 1;
    state.now_ms = now_ms;

    let GameState {
        config,
        session,
        player,
        projectiles,
        hazards,
        spawner,
        rng,
        ..
    } = state;
    let field = config.field_size();
    let mut report = TickReport {
        ticked: true,
        ..Default::default()
    };

    // Input
    match config.player.motion {
        PlayerMotion::Slide { step } => {
            *player = slide_player(player, input.move_steps, step, field.x);
        }
        PlayerMotion::Gravity { jump_velocity, .. } => {
            if input.jump {
                *player = jump_player(player, jump_velocity);
            }
        }
    }
    if let Some(projectile) = &config.projectile {
        let p = player.rect();
        let pos = Vec2::new(
            p.left() + p.size.x / 2.0 - projectile.size.x / 2.0,
            p.top() - projectile.size.y,
        );
        for _ in 0..input.fire {
            projectiles.add(Entity::new(
                EntityKind::Projectile,
                pos,
                projectile.size,
                Vec2::new(0.0, -projectile.speed),
            ));
            report.fired += 1;
        }
    }

    // Motion, every entity from its start-of-tick state
    *player = step_player(player, &config.player.motion);
    *projectiles = step_store(projectiles, config);
    *hazards = step_store(hazards, config);

    // Spawner
    for kind in [EntityKind::Obstacle, EntityKind::Enemy] {
        if let Some(hazard) = config.hazard(kind) {
            report.spawned += spawner.maybe_spawn(now_ms, kind, hazard, field, hazards, rng);
        }
    }

    // Collisions
    let resolution = resolve(
        &config.rules,
        field,
        player,
        projectiles,
        hazards,
        &input.clicks,
    );

    // Session: points from this tick land before the terminal transition
    report.score_delta = session.award(resolution.score_delta);
    if let Some(cause) = resolution.terminal {
        if session.end(cause) {
            log::info!(
                "game over: {} (final score {})",
                cause.as_str(),
                session.score()
            );
            report.game_over = Some(cause);
        }
    }

    *projectiles = cull_exited(&resolution.projectiles, config, false);
    *hazards = cull_exited(&resolution.hazards, config, config.rules.lose_on_reach_bottom);
    report.hits = resolution.hits;

    log::trace!(
        "tick {}: {} projectiles, {} obstacles, {} enemies, score {}",
        state.time_ticks,
        state.projectiles.len(),
        state.hazards.count_kind(EntityKind::Obstacle),
        state.hazards.count_kind(EntityKind::Enemy),
        state.session.score()
    );

    report
}
