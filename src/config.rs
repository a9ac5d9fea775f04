use crate::color::Rgb;
use crate::error::AppError;
use clap::Parser;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Command line options
#[derive(Debug, Clone, Parser)]
#[command(name = "particle-quiz", version, about = "A timed quiz over an animated particle field")]
pub struct Cli {
    /// Identifier of the quiz to load
    #[arg(long, default_value = "Uw5CrX")]
    pub quiz_id: String,

    /// Directory holding `<quiz-id>.json`
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// JSON file with particle field settings
    #[arg(long)]
    pub field_config: Option<PathBuf>,

    /// Override the particle count
    #[arg(long)]
    pub particles: Option<usize>,

    /// Do not draw connections between nearby particles
    #[arg(long)]
    pub no_connections: bool,

    /// Frames per second of the backdrop
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Seed for particle layout and question shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with the debug overlay visible
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Field settings from the optional JSON file with CLI overrides applied
    pub fn field_config(&self) -> Result<FieldConfig, AppError> {
        let mut config = match &self.field_config {
            Some(path) => FieldConfig::from_file(path)?,
            None => FieldConfig::default(),
        };
        if let Some(count) = self.particles {
            config.particle_count = count;
        }
        if self.no_connections {
            config.show_connections = false;
        }
        Ok(config)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

/// Particle field settings; every field is optional in JSON
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    /// Particle radius in world units
    pub particle_size: f64,
    pub particle_color: Rgb,
    pub particle_opacity: f64,
    /// Radians per frame around X; Y turns at half this rate
    pub rotation_speed: f64,
    /// Maximum velocity per axis in world units per frame
    pub particle_speed: f64,
    /// Extent of the bounce box along X and Y
    pub spread: f64,
    /// Extent of the bounce box along Z
    pub depth: f64,
    pub show_connections: bool,
    pub connection_distance: f64,
    pub connection_color: Rgb,
    pub connection_opacity: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            particle_count: 250,
            particle_size: 0.14,
            particle_color: Rgb::from_rgb8(0x4a, 0x90, 0xe2),
            particle_opacity: 1.0,
            rotation_speed: 0.001,
            particle_speed: 0.001,
            spread: 20.0,
            depth: 20.0,
            show_connections: true,
            connection_distance: 2.5,
            connection_color: Rgb::from_rgb8(0x4a, 0x90, 0xe2),
            connection_opacity: 0.5,
        }
    }
}

impl FieldConfig {
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|source| AppError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| AppError::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Half extents of the bounce box per axis
    pub fn bounds(&self) -> [f64; 3] {
        [self.spread / 2.0, self.spread / 2.0, self.depth / 2.0]
    }
}

/// Colors the quiz sends to the particle field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub neutral: Rgb,
    pub success: Rgb,
    pub failure: Rgb,
    pub duration: Duration,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            neutral: Rgb::from_rgb8(0x4a, 0x90, 0xe2),
            success: Rgb::from_rgb8(0x4a, 0xde, 0x80),
            failure: Rgb::from_rgb8(0xff, 0x00, 0x00),
            duration: Duration::from_secs(1),
        }
    }
}
