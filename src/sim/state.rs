//! Session state machine and the complete simulation state
//!
//! A session is `Active` until a terminal condition moves it to `Over`. Only
//! an explicit reset brings it back.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind, EntityStore};
use super::spawner::Spawner;
use crate::config::{ConfigError, EngineConfig};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Ticks advance, input is accepted
    Active,
    /// Run ended; only reset is accepted
    Over,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// A hazard touched the player
    PlayerHit,
    /// A hazard's bottom edge reached the bottom of the field
    ReachedBottom,
    /// The player left the field vertically
    PlayerLeftField,
}

impl GameOverCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverCause::PlayerHit => "player hit",
            GameOverCause::ReachedBottom => "hazard reached the bottom",
            GameOverCause::PlayerLeftField => "player left the field",
        }
    }
}

/// Score plus running/over flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    score: u64,
    phase: SessionPhase,
    cause: Option<GameOverCause>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            score: 0,
            phase: SessionPhase::Active,
            cause: None,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::Over
    }

    pub fn cause(&self) -> Option<GameOverCause> {
        self.cause
    }

    /// Add points while active. Returns the points actually applied.
    pub fn award(&mut self, points: u64) -> u64 {
        if self.is_over() {
            return 0;
        }
        self.score = self.score.saturating_add(points);
        points
    }

    /// One-way transition to `Over`. Returns false if already over.
    pub fn end(&mut self, cause: GameOverCause) -> bool {
        if self.is_over() {
            return false;
        }
        self.phase = SessionPhase::Over;
        self.cause = Some(cause);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Complete simulation state (deterministic given config, seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Fixed for the lifetime of the state
    pub config: EngineConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub session: Session,
    /// The single player entity
    pub player: Entity,
    /// Player-fired projectiles
    pub projectiles: EntityStore,
    /// Obstacles and enemies in spawn order
    pub hazards: EntityStore,
    pub spawner: Spawner,
    /// Ticks simulated since start/reset
    pub time_ticks: u64,
    /// Timestamp of the last tick (or of start/reset)
    pub now_ms: f64,
    /// Placement randomness, seeded from `seed`
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Validate `config` and start a session at `now_ms`
    pub fn new(config: EngineConfig, seed: u64, now_ms: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        let player = home_player(&config);
        log::info!(
            "session start: variant={} seed={}",
            config.variant.as_str(),
            seed
        );
        Ok(Self {
            config,
            seed,
            session: Session::new(),
            player,
            projectiles: EntityStore::new(),
            hazards: EntityStore::new(),
            spawner: Spawner::new(now_ms),
            time_ticks: 0,
            now_ms,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Back to a fresh active session: score 0, no projectiles or hazards,
    /// player recentered, spawn timers restarted at `now_ms`. The RNG stream
    /// continues. Always succeeds and is idempotent.
    pub fn reset(&mut self, now_ms: f64) {
        self.session.reset();
        self.player = home_player(&self.config);
        self.projectiles = EntityStore::new();
        self.hazards = EntityStore::new();
        self.spawner.reset(now_ms);
        self.time_ticks = 0;
        self.now_ms = now_ms;
        log::info!("session reset");
    }

    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    pub fn score(&self) -> u64 {
        self.session.score()
    }
}

fn home_player(config: &EngineConfig) -> Entity {
    Entity::new(
        EntityKind::Player,
        config.player_home(),
        config.player.size,
        glam::Vec2::ZERO,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use glam::Vec2;

    #[test]
    fn test_session_over_is_one_way() {
        let mut session = Session::new();
        assert_eq!(session.award(2), 2);
        assert!(session.end(GameOverCause::PlayerHit));
        assert!(!session.end(GameOverCause::ReachedBottom));
        assert_eq!(session.cause(), Some(GameOverCause::PlayerHit));

        // Score is frozen once over
        assert_eq!(session.award(5), 0);
        assert_eq!(session.score(), 2);
        assert_eq!(session.phase(), SessionPhase::Over);

        session.reset();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_new_state_validates_config() {
        let mut config = EngineConfig::shooter();
        config.field.width = 0.0;
        assert!(GameState::new(config, 1, 0.0).is_err());
    }

    #[test]
    fn test_new_state_starts_active_and_centered() {
        let state = GameState::new(EngineConfig::shooter(), 1, 500.0).unwrap();
        assert!(!state.is_over());
        assert_eq!(state.score(), 0);
        assert_eq!(state.player.pos, Vec2::new(180.0, 580.0));
        assert!(state.projectiles.is_empty() && state.hazards.is_empty());
        assert_eq!(state.spawner.last_spawn_ms(EntityKind::Obstacle), Some(500.0));
    }

    #[test]
    fn test_reset_restores_fresh_session() {
        for variant in Variant::ALL {
            let config = EngineConfig::preset(variant);
            let home = config.player_home();
            let mut state = GameState::new(config, 5, 0.0).unwrap();

            state.session.award(7);
            state.session.end(GameOverCause::PlayerHit);
            state.player = state.player.with_pos(Vec2::new(3.0, 4.0));
            state.hazards.add(state.player);
            state.projectiles.add(state.player);
            state.time_ticks = 99;

            state.reset(2000.0);
            state.reset(2000.0);

            assert_eq!(state.score(), 0);
            assert!(!state.is_over());
            assert_eq!(state.session.cause(), None);
            assert!(state.projectiles.is_empty());
            assert!(state.hazards.is_empty());
            assert_eq!(state.player.pos, home);
            assert_eq!(state.player.vel, Vec2::ZERO);
            assert_eq!(state.time_ticks, 0);
            assert_eq!(state.spawner.last_spawn_ms(EntityKind::Enemy), Some(2000.0));
        }
    }
}
