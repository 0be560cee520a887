//! Engine configuration and variant presets
//!
//! Fixed at engine construction. The four shipped variants are presets over
//! the same structure; custom layouts can be loaded from JSON. Everything that
//! could make spawning or placement impossible is rejected by [`EngineConfig::validate`]
//! so the simulation itself never fails.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::EntityKind;

/// Shipped game variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Vertical shooter: blocks fall, enemies patrol, the player shoots
    #[default]
    Shooter,
    /// Dodge falling blocks, score for every block that gets past
    Dodger,
    /// Gravity/jump through gaps between pillar pairs
    Flapper,
    /// Tap falling targets before they reach the bottom
    Clicker,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Shooter,
        Variant::Dodger,
        Variant::Flapper,
        Variant::Clicker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Shooter => "shooter",
            Variant::Dodger => "dodger",
            Variant::Flapper => "flapper",
            Variant::Clicker => "clicker",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shooter" | "shoot" => Some(Variant::Shooter),
            "dodger" | "dodge" => Some(Variant::Dodger),
            "flapper" | "flap" => Some(Variant::Flapper),
            "clicker" | "click" | "tap" => Some(Variant::Clicker),
            _ => None,
        }
    }

    /// Like [`Variant::from_str`], keeping the rejected name in the error
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        Self::from_str(s).ok_or_else(|| ConfigError::UnknownVariant(s.to_string()))
    }
}

/// Play field size in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: f32,
    pub height: f32,
}

impl FieldSize {
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for FieldSize {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

/// How the player moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerMotion {
    /// Discrete left/right steps along the bottom row
    Slide { step: f32 },
    /// Constant downward acceleration, jump resets vertical velocity
    Gravity { gravity: f32, jump_velocity: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub size: Vec2,
    pub motion: PlayerMotion,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileConfig {
    pub size: Vec2,
    /// Upward speed in pixels per tick
    pub speed: f32,
}

/// Where a hazard category enters the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Just above the top edge at a uniformly random x, falling
    Top,
    /// Just outside a random side at a uniformly random y in `[min_y, max_y]`,
    /// travelling toward the opposite side
    Sides { min_y: f32, max_y: f32 },
    /// A pillar pair entering from the right edge, with a vertical gap of
    /// `gap` whose top lies uniformly in `[margin, height - margin - gap]`
    GapPair { gap: f32, margin: f32 },
}

/// What happens when a hazard reaches the edge it travels toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Removed once fully past the edge
    #[default]
    Cull,
    /// Reappears at the opposite horizontal edge
    Wrap,
}

/// One spawnable hazard category (obstacles or enemies)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardConfig {
    pub size: Vec2,
    /// Pixels per tick along the travel direction
    pub speed: f32,
    pub spawn_interval_ms: f64,
    pub placement: Placement,
    #[serde(default)]
    pub edges: EdgePolicy,
}

/// Win/lose and scoring rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Rules {
    /// Any hazard touching the player ends the session
    pub lose_on_player_contact: bool,
    /// A hazard whose bottom edge reaches the field bottom ends the session
    pub lose_on_reach_bottom: bool,
    /// The player leaving the field vertically ends the session
    pub lose_on_player_leaving_field: bool,
    /// One point per hazard that gets past the player
    pub score_on_pass: bool,
    /// Clicking inside a hazard removes it for one point
    pub score_on_click: bool,
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub field: FieldSize,
    pub player: PlayerConfig,
    #[serde(default)]
    pub projectile: Option<ProjectileConfig>,
    #[serde(default)]
    pub obstacle: Option<HazardConfig>,
    #[serde(default)]
    pub enemy: Option<HazardConfig>,
    #[serde(default)]
    pub rules: Rules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::shooter()
    }
}

impl EngineConfig {
    /// Preset for a shipped variant
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Shooter => Self::shooter(),
            Variant::Dodger => Self::dodger(),
            Variant::Flapper => Self::flapper(),
            Variant::Clicker => Self::clicker(),
        }
    }

    fn slide_player() -> PlayerConfig {
        PlayerConfig {
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            motion: PlayerMotion::Slide { step: PLAYER_STEP },
        }
    }

    fn falling_blocks(speed: f32, interval_ms: f64) -> HazardConfig {
        HazardConfig {
            size: Vec2::new(BLOCK_WIDTH, BLOCK_HEIGHT),
            speed,
            spawn_interval_ms: interval_ms,
            placement: Placement::Top,
            edges: EdgePolicy::Cull,
        }
    }

    pub fn shooter() -> Self {
        Self {
            variant: Variant::Shooter,
            field: FieldSize::default(),
            player: Self::slide_player(),
            projectile: Some(ProjectileConfig {
                size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
                speed: BULLET_SPEED,
            }),
            obstacle: Some(Self::falling_blocks(BLOCK_SPEED, BLOCK_SPAWN_INTERVAL_MS)),
            enemy: Some(HazardConfig {
                size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
                speed: ENEMY_SPEED,
                spawn_interval_ms: ENEMY_SPAWN_INTERVAL_MS,
                placement: Placement::Sides {
                    min_y: ENEMY_BAND_MIN_Y,
                    max_y: ENEMY_BAND_MAX_Y,
                },
                edges: EdgePolicy::Wrap,
            }),
            rules: Rules {
                lose_on_reach_bottom: true,
                ..Default::default()
            },
        }
    }

    pub fn dodger() -> Self {
        Self {
            variant: Variant::Dodger,
            field: FieldSize::default(),
            player: Self::slide_player(),
            projectile: None,
            obstacle: Some(Self::falling_blocks(
                DODGE_BLOCK_SPEED,
                DODGE_SPAWN_INTERVAL_MS,
            )),
            enemy: None,
            rules: Rules {
                lose_on_player_contact: true,
                score_on_pass: true,
                ..Default::default()
            },
        }
    }

    pub fn flapper() -> Self {
        Self {
            variant: Variant::Flapper,
            field: FieldSize::default(),
            player: PlayerConfig {
                size: Vec2::splat(FLAPPER_SIZE),
                motion: PlayerMotion::Gravity {
                    gravity: GRAVITY,
                    jump_velocity: JUMP_VELOCITY,
                },
            },
            projectile: None,
            obstacle: Some(HazardConfig {
                size: Vec2::new(PILLAR_WIDTH, FIELD_HEIGHT),
                speed: PILLAR_SPEED,
                spawn_interval_ms: PILLAR_SPAWN_INTERVAL_MS,
                placement: Placement::GapPair {
                    gap: PILLAR_GAP,
                    margin: PILLAR_MARGIN,
                },
                edges: EdgePolicy::Cull,
            }),
            enemy: None,
            rules: Rules {
                lose_on_player_contact: true,
                lose_on_player_leaving_field: true,
                score_on_pass: true,
                ..Default::default()
            },
        }
    }

    pub fn clicker() -> Self {
        Self {
            variant: Variant::Clicker,
            field: FieldSize::default(),
            player: Self::slide_player(),
            projectile: None,
            obstacle: None,
            enemy: Some(HazardConfig {
                size: Vec2::splat(TARGET_SIZE),
                speed: TARGET_SPEED,
                spawn_interval_ms: TARGET_SPAWN_INTERVAL_MS,
                placement: Placement::Top,
                edges: EdgePolicy::Cull,
            }),
            rules: Rules {
                lose_on_reach_bottom: true,
                score_on_click: true,
                ..Default::default()
            },
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn field_size(&self) -> Vec2 {
        self.field.as_vec2()
    }

    /// Config for a spawnable category (obstacles or enemies)
    pub fn hazard(&self, kind: EntityKind) -> Option<&HazardConfig> {
        match kind {
            EntityKind::Obstacle => self.obstacle.as_ref(),
            EntityKind::Enemy => self.enemy.as_ref(),
            EntityKind::Player | EntityKind::Projectile => None,
        }
    }

    /// Player start/reset position: horizontally centered, on the bottom row
    /// when sliding, vertically centered under gravity
    pub fn player_home(&self) -> Vec2 {
        let field = self.field_size();
        let size = self.player.size;
        let x = crate::centered(size, field).x;
        let y = match self.player.motion {
            PlayerMotion::Slide { .. } => field.y - size.y,
            PlayerMotion::Gravity { .. } => crate::centered(size, field).y,
        };
        Vec2::new(x, y)
    }

    /// Reject any configuration the simulation could not honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = self.field_size();
        if !(field.x > 0.0 && field.y > 0.0) {
            return Err(ConfigError::NonPositiveField {
                width: field.x,
                height: field.y,
            });
        }

        check_size(EntityKind::Player, self.player.size, field)?;
        match self.player.motion {
            PlayerMotion::Slide { step } => {
                if !(step > 0.0) {
                    return Err(ConfigError::NonPositiveSpeed {
                        kind: EntityKind::Player,
                    });
                }
            }
            PlayerMotion::Gravity {
                gravity,
                jump_velocity,
            } => {
                if !(gravity > 0.0 && jump_velocity < 0.0) {
                    return Err(ConfigError::InvalidGravity {
                        gravity,
                        jump_velocity,
                    });
                }
            }
        }

        if let Some(projectile) = &self.projectile {
            check_size(EntityKind::Projectile, projectile.size, field)?;
            if !(projectile.speed > 0.0) {
                return Err(ConfigError::NonPositiveSpeed {
                    kind: EntityKind::Projectile,
                });
            }
        }

        for kind in [EntityKind::Obstacle, EntityKind::Enemy] {
            if let Some(hazard) = self.hazard(kind) {
                validate_hazard(kind, hazard, field)?;
            }
        }

        Ok(())
    }
}

fn check_size(kind: EntityKind, size: Vec2, field: Vec2) -> Result<(), ConfigError> {
    if !(size.x > 0.0 && size.y > 0.0) {
        return Err(ConfigError::NonPositiveSize { kind });
    }
    if size.x > field.x {
        return Err(ConfigError::EntityWiderThanField { kind });
    }
    Ok(())
}

fn validate_hazard(kind: EntityKind, hazard: &HazardConfig, field: Vec2) -> Result<(), ConfigError> {
    check_size(kind, hazard.size, field)?;
    if !(hazard.speed > 0.0) {
        return Err(ConfigError::NonPositiveSpeed { kind });
    }
    if !(hazard.spawn_interval_ms > 0.0) {
        return Err(ConfigError::NonPositiveInterval { kind });
    }

    match hazard.placement {
        Placement::Top => {}
        Placement::Sides { min_y, max_y } => {
            if min_y < 0.0 || min_y > max_y || max_y + hazard.size.y > field.y {
                return Err(ConfigError::NoVerticalRange { kind, min_y, max_y });
            }
        }
        Placement::GapPair { gap, margin } => {
            if !(gap > 0.0) || margin < 0.0 || gap + 2.0 * margin > field.y {
                return Err(ConfigError::GapTooLarge {
                    gap,
                    margin,
                    field_height: field.y,
                });
            }
            // Each pillar must reach past its field edge wherever the gap lands
            if hazard.size.y < field.y - margin - gap {
                return Err(ConfigError::PillarTooShort {
                    height: hazard.size.y,
                    field_height: field.y,
                });
            }
        }
    }
    Ok(())
}

/// Configuration rejected at construction time
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveField { width: f32, height: f32 },
    NonPositiveSize { kind: EntityKind },
    NonPositiveSpeed { kind: EntityKind },
    NonPositiveInterval { kind: EntityKind },
    EntityWiderThanField { kind: EntityKind },
    InvalidGravity { gravity: f32, jump_velocity: f32 },
    NoVerticalRange { kind: EntityKind, min_y: f32, max_y: f32 },
    GapTooLarge { gap: f32, margin: f32, field_height: f32 },
    PillarTooShort { height: f32, field_height: f32 },
    Json(String),
    UnknownVariant(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveField { width, height } => {
                write!(f, "field must have positive size, got {width}x{height}")
            }
            Self::NonPositiveSize { kind } => write!(f, "{kind} size must be positive"),
            Self::NonPositiveSpeed { kind } => write!(f, "{kind} speed must be positive"),
            Self::NonPositiveInterval { kind } => {
                write!(f, "{kind} spawn interval must be positive")
            }
            Self::EntityWiderThanField { kind } => write!(f, "{kind} is wider than the field"),
            Self::InvalidGravity {
                gravity,
                jump_velocity,
            } => write!(
                f,
                "gravity must pull down and jumps must go up (gravity={gravity}, jump={jump_velocity})"
            ),
            Self::NoVerticalRange { kind, min_y, max_y } => write!(
                f,
                "{kind} has no valid spawn row in [{min_y}, {max_y}]"
            ),
            Self::GapTooLarge {
                gap,
                margin,
                field_height,
            } => write!(
                f,
                "gap {gap} with margin {margin} does not fit a field of height {field_height}"
            ),
            Self::PillarTooShort {
                height,
                field_height,
            } => write!(
                f,
                "pillar height {height} cannot close the gap edges in a field of height {field_height}"
            ),
            Self::Json(msg) => write!(f, "invalid config JSON: {msg}"),
            Self::UnknownVariant(name) => write!(f, "unknown variant '{name}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for variant in Variant::ALL {
            let config = EngineConfig::preset(variant);
            assert_eq!(config.variant, variant);
            assert_eq!(config.validate(), Ok(()), "{} preset", variant.as_str());
        }
    }

    #[test]
    fn test_variant_names_round_trip() {
        for variant in Variant::ALL {
            assert_eq!(Variant::from_str(variant.as_str()), Some(variant));
        }
        assert_eq!(Variant::from_str("TAP"), Some(Variant::Clicker));
        assert_eq!(Variant::from_str("pinball"), None);
        assert_eq!(
            Variant::parse("pinball"),
            Err(ConfigError::UnknownVariant("pinball".to_string()))
        );
        assert_eq!(Variant::parse("Flap"), Ok(Variant::Flapper));
    }

    #[test]
    fn test_gap_larger_than_field_is_rejected() {
        let mut config = EngineConfig::flapper();
        config.obstacle = Some(HazardConfig {
            placement: Placement::GapPair {
                gap: 700.0,
                margin: 0.0,
            },
            ..config.obstacle.unwrap()
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GapTooLarge { .. })
        ));
    }

    #[test]
    fn test_short_pillar_is_rejected() {
        let mut config = EngineConfig::flapper();
        let mut pillars = config.obstacle.unwrap();
        pillars.size.y = 100.0;
        config.obstacle = Some(pillars);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PillarTooShort { .. })
        ));
    }

    #[test]
    fn test_hazard_wider_than_field_is_rejected() {
        let mut config = EngineConfig::shooter();
        let mut blocks = config.obstacle.unwrap();
        blocks.size.x = 401.0;
        config.obstacle = Some(blocks);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EntityWiderThanField {
                kind: EntityKind::Obstacle
            })
        );
    }

    #[test]
    fn test_side_band_outside_field_is_rejected() {
        let mut config = EngineConfig::shooter();
        let mut enemies = config.enemy.unwrap();
        enemies.placement = Placement::Sides {
            min_y: 100.0,
            max_y: 590.0,
        };
        config.enemy = Some(enemies);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoVerticalRange { .. })
        ));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut config = EngineConfig::clicker();
        let mut targets = config.enemy.unwrap();
        targets.spawn_interval_ms = 0.0;
        config.enemy = Some(targets);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveInterval {
                kind: EntityKind::Enemy
            })
        );
    }

    #[test]
    fn test_upward_gravity_is_rejected() {
        let mut config = EngineConfig::flapper();
        config.player.motion = PlayerMotion::Gravity {
            gravity: -0.5,
            jump_velocity: -8.0,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidGravity { .. })
        ));
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::to_string(&EngineConfig::dodger()).unwrap();
        let config = EngineConfig::from_json(&json).unwrap();
        assert_eq!(config, EngineConfig::dodger());

        let err = EngineConfig::from_json("{ \"player\": 3 }").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_from_json_defaults_and_validation() {
        let json = r#"{
            "player": { "size": [40.0, 20.0], "motion": { "kind": "slide", "step": 5.0 } },
            "obstacle": {
                "size": [40.0, 20.0],
                "speed": 2.0,
                "spawn_interval_ms": 1500.0,
                "placement": { "kind": "top" }
            },
            "rules": { "lose_on_reach_bottom": true }
        }"#;
        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.field, FieldSize::default());
        assert_eq!(config.obstacle.unwrap().edges, EdgePolicy::Cull);
        assert!(config.rules.lose_on_reach_bottom);
        assert!(!config.rules.score_on_click);

        let bad = json.replace("\"speed\": 2.0", "\"speed\": 0.0");
        assert_eq!(
            EngineConfig::from_json(&bad),
            Err(ConfigError::NonPositiveSpeed {
                kind: EntityKind::Obstacle
            })
        );
    }

    #[test]
    fn test_player_home() {
        let shooter = EngineConfig::shooter();
        assert_eq!(shooter.player_home(), Vec2::new(180.0, 580.0));

        let flapper = EngineConfig::flapper();
        assert_eq!(flapper.player_home(), Vec2::new(188.0, 288.0));
    }
}
