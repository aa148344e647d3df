//! Runtime movement configuration loaded from `assets/movement.toml`.
//!
//! [`MovementConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_movement_config`] reads
//! `assets/movement.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about:
//!
//! ```toml
//! coyote_duration = 0.15
//!
//! [profiles.large]
//! scale = 2.0
//! move_speed = 10.0
//! jump_force = 14.0
//! capsule_radius = 1.0
//! capsule_height = 4.0
//! ```
//!
//! ## Usage in systems
//!
//! Add `config: Res<MovementConfig>` to any system parameter list.  The
//! movement core takes `&MovementConfig` directly so it stays usable outside
//! an `App`.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `MovementConfig::default()`.

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::constants::*;
use crate::error::{
    validate_finite, validate_negative, validate_non_negative, validate_positive, ConfigError,
    ConfigResult,
};
use crate::size::{SizeProfile, SizeProfiles};

/// Path read by [`load_movement_config`].
pub const MOVEMENT_CONFIG_PATH: &str = "assets/movement.toml";

/// Runtime-tunable movement configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ── Timing Windows ────────────────────────────────────────────────────────
    pub coyote_duration: f32,
    pub jump_buffer_duration: f32,
    pub landing_lock_duration: f32,
    pub recent_jump_window: f32,

    // ── Horizontal Movement ───────────────────────────────────────────────────
    pub ground_acceleration: f32,
    pub ground_deceleration: f32,
    pub air_control: f32,

    // ── Jumping ───────────────────────────────────────────────────────────────
    pub double_jump_multiplier: f32,
    pub player_mass: f32,
    pub gravity: f32,

    // ── Ground Sensor ─────────────────────────────────────────────────────────
    pub ground_clearance: f32,

    // ── Footsteps ─────────────────────────────────────────────────────────────
    pub footstep_min_speed: f32,
    pub footstep_stride: f32,

    // ── Session Flow ──────────────────────────────────────────────────────────
    pub respawn_fade_secs: f32,
    pub chapter_fade_secs: f32,
    pub kill_plane_y: f32,

    // ── Input ─────────────────────────────────────────────────────────────────
    pub gamepad_left_deadzone: f32,
    pub camera_turn_speed: f32,

    // ── Size Profiles ─────────────────────────────────────────────────────────
    pub profiles: SizeProfiles,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            // Timing Windows
            coyote_duration: COYOTE_DURATION,
            jump_buffer_duration: JUMP_BUFFER_DURATION,
            landing_lock_duration: LANDING_LOCK_DURATION,
            recent_jump_window: RECENT_JUMP_WINDOW,
            // Horizontal Movement
            ground_acceleration: GROUND_ACCELERATION,
            ground_deceleration: GROUND_DECELERATION,
            air_control: AIR_CONTROL,
            // Jumping
            double_jump_multiplier: DOUBLE_JUMP_MULTIPLIER,
            player_mass: PLAYER_MASS,
            gravity: GRAVITY,
            // Ground Sensor
            ground_clearance: GROUND_CLEARANCE,
            // Footsteps
            footstep_min_speed: FOOTSTEP_MIN_SPEED,
            footstep_stride: FOOTSTEP_STRIDE,
            // Session Flow
            respawn_fade_secs: RESPAWN_FADE_SECS,
            chapter_fade_secs: CHAPTER_FADE_SECS,
            kill_plane_y: KILL_PLANE_Y,
            // Input
            gamepad_left_deadzone: GAMEPAD_LEFT_DEADZONE,
            camera_turn_speed: CAMERA_TURN_SPEED,
            // Size Profiles
            profiles: SizeProfiles::default(),
        }
    }
}

impl MovementConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check every value the movement core relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_negative("gravity", self.gravity)?;
        validate_finite("kill_plane_y", self.kill_plane_y)?;
        validate_non_negative("coyote_duration", self.coyote_duration)?;
        validate_non_negative("jump_buffer_duration", self.jump_buffer_duration)?;
        validate_non_negative("landing_lock_duration", self.landing_lock_duration)?;
        validate_non_negative("recent_jump_window", self.recent_jump_window)?;
        validate_positive("ground_acceleration", self.ground_acceleration)?;
        validate_positive("ground_deceleration", self.ground_deceleration)?;
        validate_non_negative("air_control", self.air_control)?;
        validate_positive("double_jump_multiplier", self.double_jump_multiplier)?;
        validate_positive("player_mass", self.player_mass)?;
        validate_non_negative("ground_clearance", self.ground_clearance)?;
        validate_non_negative("footstep_min_speed", self.footstep_min_speed)?;
        validate_positive("footstep_stride", self.footstep_stride)?;
        validate_non_negative("respawn_fade_secs", self.respawn_fade_secs)?;
        validate_non_negative("chapter_fade_secs", self.chapter_fade_secs)?;

        if self.landing_lock_duration > self.jump_buffer_duration {
            return Err(ConfigError::LockOutlivesBuffer {
                lock: self.landing_lock_duration,
                buffer: self.jump_buffer_duration,
            });
        }

        let p = &self.profiles;
        validate_profile("small", &p.small)?;
        validate_profile("normal", &p.normal)?;
        validate_profile("large", &p.large)?;
        if !(p.small.scale < p.normal.scale && p.normal.scale < p.large.scale) {
            return Err(ConfigError::TierOrder);
        }
        Ok(())
    }
}

fn validate_profile(tier: &'static str, profile: &SizeProfile) -> ConfigResult<()> {
    validate_positive("profile.scale", profile.scale)?;
    validate_positive("profile.move_speed", profile.move_speed)?;
    validate_positive("profile.jump_force", profile.jump_force)?;
    validate_positive("profile.capsule_radius", profile.capsule_radius)?;
    validate_positive("profile.capsule_height", profile.capsule_height)?;
    let diameter = profile.capsule_radius * 2.0;
    if profile.capsule_height < diameter {
        return Err(ConfigError::DegenerateCapsule {
            tier,
            height: profile.capsule_height,
            diameter,
        });
    }
    Ok(())
}

/// Startup system: attempt to load `assets/movement.toml` and overwrite the
/// `MovementConfig` resource with the values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse and validation errors
/// are logged but do not abort the game.  A missing file is not an error.
pub fn load_movement_config(mut config: ResMut<MovementConfig>) {
    let path = Path::new(MOVEMENT_CONFIG_PATH);
    if !path.exists() {
        info!("No {MOVEMENT_CONFIG_PATH} found; using compiled defaults");
        return;
    }
    match MovementConfig::from_path(path) {
        Ok(loaded) => {
            *config = loaded;
            info!("Loaded movement config from {MOVEMENT_CONFIG_PATH}");
        }
        Err(e) => warn!("{e}; using defaults"),
    }
}
