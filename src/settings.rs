//! Game configuration
//!
//! Tuning knobs for a session, persisted as JSON next to the scores.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Which runs can eliminate which when two opposite-direction runs touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EliminationPolicy {
    /// Any opposite pair collides; echoes die, the live run is immune
    #[default]
    AnyOpposing,
    /// Only the live run is a threat; echoes it touches die
    LiveThreatOnly,
    /// Like `AnyOpposing`, but the live run dies too (legacy rules)
    LiveKillable,
}

impl EliminationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EliminationPolicy::AnyOpposing => "any-opposing",
            EliminationPolicy::LiveThreatOnly => "live-threat-only",
            EliminationPolicy::LiveKillable => "live-killable",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "any-opposing" | "any" => Some(EliminationPolicy::AnyOpposing),
            "live-threat-only" | "live" => Some(EliminationPolicy::LiveThreatOnly),
            "live-killable" | "legacy" => Some(EliminationPolicy::LiveKillable),
            _ => None,
        }
    }

    /// Whether `live` (the run's liveness) is allowed to threaten others
    pub fn is_threat(&self, live: bool) -> bool {
        match self {
            EliminationPolicy::LiveThreatOnly => live,
            EliminationPolicy::AnyOpposing | EliminationPolicy::LiveKillable => true,
        }
    }

    /// Whether a run with the given liveness can be eliminated
    pub fn is_vulnerable(&self, live: bool) -> bool {
        match self {
            EliminationPolicy::LiveKillable => true,
            EliminationPolicy::AnyOpposing | EliminationPolicy::LiveThreatOnly => !live,
        }
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Session tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Runs per session (the tenth finish ends the session)
    pub runs_per_session: u32,
    /// Base runner speed (u/s)
    pub speed_const: f32,
    /// Extra speed per already spawned run
    pub speed_coeff: f32,
    /// Coins laid along the corridor
    pub coins_per_course: usize,
    /// Points per coin before multipliers
    pub coin_base_value: u64,
    /// Seconds a run is immune to elimination after starting
    pub elimination_grace: f32,
    /// Upper bound of the random idle before an echo restarts
    pub echo_restart_delay: f32,
    /// Who can kill whom
    pub elimination_policy: EliminationPolicy,
    /// Name submitted with scores
    pub player_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            runs_per_session: RUNS_PER_SESSION,
            speed_const: crate::speed_for_session_duration(RUNS_PER_SESSION, SESSION_DURATION),
            speed_coeff: 0.0,
            coins_per_course: COINS_PER_COURSE,
            coin_base_value: COIN_BASE_VALUE,
            elimination_grace: ELIMINATION_GRACE,
            echo_restart_delay: ECHO_RESTART_DELAY,
            elimination_policy: EliminationPolicy::default(),
            player_name: "me".to_string(),
        }
    }
}

impl GameConfig {
    /// Speed magnitude of the run spawned at `index`
    pub fn speed_for_run(&self, index: u32) -> f32 {
        self.speed_const + self.speed_coeff * index as f32
    }

    /// Most coins a legitimate session can bank (every coin, every run)
    pub fn max_plausible_currency(&self) -> u32 {
        (self.coins_per_course as u32).saturating_mul(self.runs_per_session)
    }

    /// Reject values a session can't be played with
    pub fn validate(&self) -> Result<()> {
        if self.runs_per_session == 0 {
            return Err(Error::InvalidConfig("runs_per_session must be at least 1".into()));
        }
        if !positive(self.speed_const) {
            return Err(Error::InvalidConfig(format!(
                "speed_const must be positive, got {}",
                self.speed_const
            )));
        }
        let last_speed = self.speed_for_run(self.runs_per_session - 1);
        if !positive(last_speed) {
            return Err(Error::InvalidConfig(format!(
                "speed_coeff {} stalls run {}",
                self.speed_coeff, self.runs_per_session
            )));
        }
        if !non_negative(self.elimination_grace) {
            return Err(Error::InvalidConfig(format!(
                "elimination_grace must not be negative, got {}",
                self.elimination_grace
            )));
        }
        if !non_negative(self.echo_restart_delay) {
            return Err(Error::InvalidConfig(format!(
                "echo_restart_delay must not be negative, got {}",
                self.echo_restart_delay
            )));
        }
        Ok(())
    }

    /// Read and validate a config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = serde_json::from_str(&json).map_err(|e| Error::json(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config, falling back to defaults when missing or broken
    pub fn load(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Using default config: {e}");
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::json(path, e))?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}
