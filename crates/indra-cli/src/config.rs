//! TOML configuration for the `indra` binary.
//!
//! Every table is optional; missing values fall back to the library
//! defaults. Command-line flags are applied on top by the caller.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indra_core::{
    GeneratorSet, TileConfig, TraversalConfig, grandmas_recipe, jorgensen, kissing_schottky,
};
use num_complex::Complex64;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "INDRA_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndraConfig {
    pub traversal: TraversalConfig,
    pub tiles: TileConfig,
    pub group: GroupConfig,
}

/// Recipe and its parameters. Complex traces are written `[re, im]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "recipe", rename_all = "lowercase")]
pub enum GroupConfig {
    Kissing { y: f64, v: f64 },
    Grandma { ta: [f64; 2], tb: [f64; 2] },
    Jorgensen { ta: [f64; 2], tb: [f64; 2] },
}

impl Default for GroupConfig {
    fn default() -> Self {
        GroupConfig::Kissing { y: 1.0, v: 0.5 }
    }
}

fn complex([re, im]: [f64; 2]) -> Complex64 {
    Complex64::new(re, im)
}

impl GroupConfig {
    pub fn build(&self) -> indra_core::Result<GeneratorSet> {
        match *self {
            GroupConfig::Kissing { y, v } => kissing_schottky(y, v),
            GroupConfig::Grandma { ta, tb } => grandmas_recipe(complex(ta), complex(tb)),
            GroupConfig::Jorgensen { ta, tb } => jorgensen(complex(ta), complex(tb)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GroupConfig::Kissing { .. } => "kissing",
            GroupConfig::Grandma { .. } => "grandma",
            GroupConfig::Jorgensen { .. } => "jorgensen",
        }
    }
}

impl IndraConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config")
    }

    /// Load from `path`, else from `$INDRA_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("in config {}", path.display()))?;
        tracing::debug!(path = %path.display(), recipe = config.group.name(), "loaded config");
        Ok(config)
    }
}
