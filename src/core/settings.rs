// Copyright @yucwang 2026

use crate::core::error::ConfigError;

use std::thread;

/// Everything a render run needs besides the scene and the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    pub samples_per_pixel: u32,
    /// Maximum path depth.
    pub bounces: u32,
    /// Maximum direct-light samples per shading point.
    pub direct: u32,
    /// Branching factor at the primary hit.
    pub branch: u32,
    pub workers: usize,
    /// Base seed; `None` seeds every worker from the clock.
    pub seed: Option<u64>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            samples_per_pixel: 16,
            bounces: 8,
            direct: 1,
            branch: 8,
            workers: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            seed: None,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyImage { width: self.width, height: self.height });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::SamplesPerPixel);
        }
        if self.bounces == 0 {
            return Err(ConfigError::Bounces(self.bounces));
        }
        if self.branch == 0 {
            return Err(ConfigError::Branch(self.branch));
        }
        if self.workers == 0 {
            return Err(ConfigError::Workers);
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.workers >= 1);
        assert_eq!(settings.pixel_count(), 800 * 600);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut settings = RenderSettings::default();
        settings.bounces = 0;
        assert_eq!(settings.validate(), Err(ConfigError::Bounces(0)));

        let mut settings = RenderSettings::default();
        settings.width = 0;
        assert_eq!(settings.validate(), Err(ConfigError::EmptyImage { width: 0, height: 600 }));

        let mut settings = RenderSettings::default();
        settings.workers = 0;
        assert_eq!(settings.validate(), Err(ConfigError::Workers));
    }
}
