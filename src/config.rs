use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::layout::{MarkerStyle, OverlapResolver};
use crate::provider::ProviderConfig;

/// Layout tuning. Missing fields in a config file fall back to these defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub padding: f32,
    pub relax_steps: usize,
    pub restore_strength: f32,
    pub repulsion_strength: f32,
    pub collision_strength: f32,
    pub marker_gap: f32,
    pub max_step: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let resolver = OverlapResolver::default();
        Self {
            padding: 40.0,
            relax_steps: resolver.steps,
            restore_strength: resolver.restore_strength,
            repulsion_strength: resolver.repulsion_strength,
            collision_strength: resolver.collision_strength,
            marker_gap: resolver.gap,
            max_step: resolver.max_step,
        }
    }
}

impl LayoutConfig {
    pub fn resolver(&self) -> OverlapResolver {
        OverlapResolver {
            steps: self.relax_steps,
            restore_strength: self.restore_strength,
            repulsion_strength: self.repulsion_strength,
            collision_strength: self.collision_strength,
            gap: self.marker_gap,
            max_step: self.max_step,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 860.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub transition_secs: f32,
    pub window: WindowConfig,
    pub layout: LayoutConfig,
    pub marker: MarkerStyle,
    pub providers: ProviderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            transition_secs: 0.6,
            window: WindowConfig::default(),
            layout: LayoutConfig::default(),
            marker: MarkerStyle::default(),
            providers: ProviderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads a JSON config file, or returns the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config JSON in {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        if !layout.padding.is_finite() || layout.padding < 0.0 {
            bail!("layout.padding must be a non-negative number");
        }
        if layout.relax_steps == 0 {
            bail!("layout.relax_steps must be at least 1");
        }
        if !(0.0..1.0).contains(&layout.restore_strength) || layout.restore_strength == 0.0 {
            bail!("layout.restore_strength must lie strictly between 0 and 1");
        }
        for (name, value) in [
            ("layout.repulsion_strength", layout.repulsion_strength),
            ("layout.collision_strength", layout.collision_strength),
            ("layout.marker_gap", layout.marker_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{name} must be a non-negative number");
            }
        }
        if !layout.max_step.is_finite() || layout.max_step <= 0.0 {
            bail!("layout.max_step must be positive");
        }
        if self.marker.height.is_nan()
            || self.marker.font_size.is_nan()
            || self.marker.height <= 0.0
            || self.marker.font_size <= 0.0
        {
            bail!("marker.height and marker.font_size must be positive");
        }
        if !self.transition_secs.is_finite() || self.transition_secs < 0.0 {
            bail!("transition_secs must be a non-negative number");
        }
        self.providers.validate()?;
        Ok(())
    }
}
