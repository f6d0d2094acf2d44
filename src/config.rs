use anyhow::Context;

use crate::foundation::error::{BitmapError, BitmapResult};

/// Engine-wide settings shared by every bitmap.
///
/// All fields have defaults, so a partial JSON document is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Create a hi-res twin for every blank bitmap.
    pub enable_hires: bool,
    /// Resolution ratio between a hi-res twin and its low-res bitmap.
    pub texture_scaling_factor: f64,
    /// Width of the consumer-visible screen, used by child viewports.
    pub screen_width: i32,
    /// Height of the consumer-visible screen, used by child viewports.
    pub screen_height: i32,
    /// Playback rate assigned to animations that carry no usable timing.
    pub frame_rate: f64,
    /// Always route CPU-surface uploads through the intermediate texture.
    pub sub_image_fix: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enable_hires: false,
            texture_scaling_factor: 1.0,
            screen_width: 640,
            screen_height: 480,
            frame_rate: 60.0,
            sub_image_fix: false,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json_str(s: &str) -> BitmapResult<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse engine config json")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make scaling or timing meaningless.
    pub fn validate(&self) -> BitmapResult<()> {
        if !self.texture_scaling_factor.is_finite() || self.texture_scaling_factor <= 0.0 {
            return Err(BitmapError::invalid(
                "texture_scaling_factor must be finite and > 0",
            ));
        }
        if self.screen_width <= 0 || self.screen_height <= 0 {
            return Err(BitmapError::invalid("screen size must be positive"));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(BitmapError::invalid("frame_rate must be finite and > 0"));
        }
        Ok(())
    }

    /// Return a config with hi-res twins enabled at `factor`.
    pub fn with_hires(mut self, factor: f64) -> Self {
        self.enable_hires = true;
        self.texture_scaling_factor = factor;
        self
    }

    /// Return a config with the given screen size.
    pub fn with_screen(mut self, width: i32, height: i32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    /// Return a config with the given default frame rate.
    pub fn with_frame_rate(mut self, fps: f64) -> Self {
        self.frame_rate = fps;
        self
    }

    /// Return a config with the sub-image upload workaround toggled.
    pub fn with_sub_image_fix(mut self, on: bool) -> Self {
        self.sub_image_fix = on;
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
