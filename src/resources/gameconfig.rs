//! Game configuration resource.
//!
//! Gameplay tuning loaded from an INI configuration file. Every value has a
//! default so the simulation starts without a file; keys present in the file
//! override their defaults one by one. A value that does not parse fails the
//! whole load and nothing is applied.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! frame_ms = 16.0
//! max_frame_ms = 50.0
//! quadtree_depth = 8
//!
//! [player]
//! normal_max_run = 0.09
//! hurt_max_run = 0.0225
//! run_lerp_weight = 0.2
//! max_fall = 0.27
//! normal_gravity = 0.000533
//! heavy_gravity = 0.001066
//! jump_velocity = -0.233
//! hurt_ms = 500
//! invincible_ms = 1000
//!
//! [goblin]
//! max_run = 0.017
//! max_fall = 0.27
//! gravity = 0.000533
//! idle_ms = 2000
//! run_ms = 4000
//! aggro_width = 80
//! aggro_height = 31
//! hit_width = 40
//! hit_height = 31
//! hit_frames = 2,3
//! ```
//!
//! Velocities are pixels per millisecond, accelerations pixels per ms².

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use smallvec::{SmallVec, smallvec};

use crate::error::LoadError;
use crate::resources::quadtree::DEFAULT_MAX_DEPTH;

const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Frame pacing and spatial index settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Fixed frame delta used by the headless runner.
    pub frame_ms: f32,
    /// Upper bound for a single frame delta.
    pub max_frame_ms: f32,
    pub quadtree_depth: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16.0,
            max_frame_ms: 50.0,
            quadtree_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTuning {
    pub normal_max_run: f32,
    pub hurt_max_run: f32,
    pub run_lerp_weight: f32,
    pub max_fall: f32,
    pub normal_gravity: f32,
    pub heavy_gravity: f32,
    pub jump_velocity: f32,
    pub hurt_ms: f32,
    pub invincible_ms: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            normal_max_run: 0.09,
            hurt_max_run: 0.0225,
            run_lerp_weight: 0.2,
            max_fall: 0.27,
            normal_gravity: 0.000533,
            heavy_gravity: 0.001066,
            jump_velocity: -0.233,
            hurt_ms: 500.0,
            invincible_ms: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoblinTuning {
    pub max_run: f32,
    pub max_fall: f32,
    pub gravity: f32,
    pub idle_ms: f32,
    pub run_ms: f32,
    pub aggro_width: f32,
    pub aggro_height: f32,
    pub hit_width: f32,
    pub hit_height: f32,
    /// Attack frame indices during which the hit box is live.
    pub hit_frames: SmallVec<[usize; 4]>,
}

impl Default for GoblinTuning {
    fn default() -> Self {
        Self {
            max_run: 0.017,
            max_fall: 0.27,
            gravity: 0.000533,
            idle_ms: 2000.0,
            run_ms: 4000.0,
            aggro_width: 80.0,
            aggro_height: 31.0,
            hit_width: 40.0,
            hit_height: 31.0,
            hit_frames: smallvec![2, 3],
        }
    }
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub simulation: SimulationConfig,
    pub player: PlayerTuning,
    pub goblin: GoblinTuning,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_f32(config: &Ini, section: &str, key: &str, slot: &mut f32) -> Result<(), LoadError> {
    let value = config
        .getfloat(section, key)
        .map_err(|e| LoadError::Ini(format!("{section}.{key}: {e}")))?;
    if let Some(value) = value {
        *slot = value as f32;
    }
    Ok(())
}

fn read_usize(config: &Ini, section: &str, key: &str, slot: &mut usize) -> Result<(), LoadError> {
    let value = config
        .getuint(section, key)
        .map_err(|e| LoadError::Ini(format!("{section}.{key}: {e}")))?;
    if let Some(value) = value {
        *slot = value as usize;
    }
    Ok(())
}

impl GameConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            player: PlayerTuning::default(),
            goblin: GoblinTuning::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Apply the values found in INI text. Missing keys keep their values.
    ///
    /// Either every key is applied or, on error, none is.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), LoadError> {
        let mut config = Ini::new();
        config.read(text.to_string()).map_err(LoadError::Ini)?;
        let mut next = self.clone();
        next.apply(&config)?;
        *self = next;
        Ok(())
    }

    /// Load configuration from the INI file at `config_path`.
    pub fn load_from_file(&mut self) -> Result<(), LoadError> {
        let text = std::fs::read_to_string(&self.config_path)
            .map_err(|e| LoadError::io(&self.config_path, e))?;
        self.load_from_str(&text)?;
        info!(
            "Loaded config from {:?}: frame={}ms depth={} jump={} goblin_run={}",
            self.config_path,
            self.simulation.frame_ms,
            self.simulation.quadtree_depth,
            self.player.jump_velocity,
            self.goblin.max_run
        );
        Ok(())
    }

    fn apply(&mut self, config: &Ini) -> Result<(), LoadError> {
        // [simulation] section
        let sim = &mut self.simulation;
        read_f32(config, "simulation", "frame_ms", &mut sim.frame_ms)?;
        read_f32(config, "simulation", "max_frame_ms", &mut sim.max_frame_ms)?;
        read_usize(config, "simulation", "quadtree_depth", &mut sim.quadtree_depth)?;

        // [player] section
        let p = &mut self.player;
        read_f32(config, "player", "normal_max_run", &mut p.normal_max_run)?;
        read_f32(config, "player", "hurt_max_run", &mut p.hurt_max_run)?;
        read_f32(config, "player", "run_lerp_weight", &mut p.run_lerp_weight)?;
        read_f32(config, "player", "max_fall", &mut p.max_fall)?;
        read_f32(config, "player", "normal_gravity", &mut p.normal_gravity)?;
        read_f32(config, "player", "heavy_gravity", &mut p.heavy_gravity)?;
        read_f32(config, "player", "jump_velocity", &mut p.jump_velocity)?;
        read_f32(config, "player", "hurt_ms", &mut p.hurt_ms)?;
        read_f32(config, "player", "invincible_ms", &mut p.invincible_ms)?;

        // [goblin] section
        let g = &mut self.goblin;
        read_f32(config, "goblin", "max_run", &mut g.max_run)?;
        read_f32(config, "goblin", "max_fall", &mut g.max_fall)?;
        read_f32(config, "goblin", "gravity", &mut g.gravity)?;
        read_f32(config, "goblin", "idle_ms", &mut g.idle_ms)?;
        read_f32(config, "goblin", "run_ms", &mut g.run_ms)?;
        read_f32(config, "goblin", "aggro_width", &mut g.aggro_width)?;
        read_f32(config, "goblin", "aggro_height", &mut g.aggro_height)?;
        read_f32(config, "goblin", "hit_width", &mut g.hit_width)?;
        read_f32(config, "goblin", "hit_height", &mut g.hit_height)?;
        if let Some(frames) = config.get("goblin", "hit_frames") {
            g.hit_frames = frames
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<usize>()
                        .map_err(|e| LoadError::Ini(format!("goblin.hit_frames '{s}': {e}")))
                })
                .collect::<Result<_, _>>()?;
        }

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), LoadError> {
        let mut config = Ini::new();
        let mut set = |section: &str, key: &str, value: String| {
            config.set(section, key, Some(value));
        };

        // [simulation] section
        let sim = &self.simulation;
        set("simulation", "frame_ms", sim.frame_ms.to_string());
        set("simulation", "max_frame_ms", sim.max_frame_ms.to_string());
        set("simulation", "quadtree_depth", sim.quadtree_depth.to_string());

        // [player] section
        let p = &self.player;
        set("player", "normal_max_run", p.normal_max_run.to_string());
        set("player", "hurt_max_run", p.hurt_max_run.to_string());
        set("player", "run_lerp_weight", p.run_lerp_weight.to_string());
        set("player", "max_fall", p.max_fall.to_string());
        set("player", "normal_gravity", p.normal_gravity.to_string());
        set("player", "heavy_gravity", p.heavy_gravity.to_string());
        set("player", "jump_velocity", p.jump_velocity.to_string());
        set("player", "hurt_ms", p.hurt_ms.to_string());
        set("player", "invincible_ms", p.invincible_ms.to_string());

        // [goblin] section
        let g = &self.goblin;
        set("goblin", "max_run", g.max_run.to_string());
        set("goblin", "max_fall", g.max_fall.to_string());
        set("goblin", "gravity", g.gravity.to_string());
        set("goblin", "idle_ms", g.idle_ms.to_string());
        set("goblin", "run_ms", g.run_ms.to_string());
        set("goblin", "aggro_width", g.aggro_width.to_string());
        set("goblin", "aggro_height", g.aggro_height.to_string());
        set("goblin", "hit_width", g.hit_width.to_string());
        set("goblin", "hit_height", g.hit_height.to_string());
        let frames: Vec<String> = g.hit_frames.iter().map(usize::to_string).collect();
        set("goblin", "hit_frames", frames.join(","));

        config
            .write(&self.config_path)
            .map_err(|e| LoadError::io(&self.config_path, e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
