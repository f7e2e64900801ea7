//! Command-line options and configuration file loading.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use thor_arena_core::{ArenaConfig, MAX_ARENA_CELLS};
use thor_arena_system_decision::StrategyKind;

/// Turn-based agent guiding Thor through the giants.
///
/// Reads referee input on stdin and answers each turn on stdout. Logs go to
/// stderr and honour `RUST_LOG`.
#[derive(Debug, Parser)]
#[command(name = "thor-arena", version)]
pub(crate) struct Cli {
    /// TOML file providing `[arena]` parameters and the default strategy.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of arena columns. Overrides the configuration file.
    #[arg(long)]
    width: Option<u32>,

    /// Number of arena rows. Overrides the configuration file.
    #[arg(long)]
    height: Option<u32>,

    /// Chebyshev radius of a hammer strike. Overrides the configuration file.
    #[arg(long)]
    strike_radius: Option<u32>,

    /// Decision policy. Overrides the configuration file.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
}

/// Decision policies selectable from the command line or configuration file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum StrategyArg {
    /// Safety-aware pursuit of the most distant giant.
    #[default]
    FollowMostDistant,
    /// Straight-line pursuit that ignores safe paths.
    DirectApproach,
}

impl From<StrategyArg> for StrategyKind {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::FollowMostDistant => StrategyKind::FollowMostDistant,
            StrategyArg::DirectApproach => StrategyKind::DirectApproach,
        }
    }
}

/// Fully resolved settings for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) arena: ArenaConfig,
    pub(crate) strategy: StrategyKind,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    arena: ArenaConfig,
    strategy: StrategyArg,
}

impl Cli {
    /// Resolves defaults, the optional configuration file and flag overrides.
    pub(crate) fn settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => load_config_file(path)?,
            None => ConfigFile::default(),
        };

        let mut arena = file.arena;
        if let Some(width) = self.width {
            arena.width = width;
        }
        if let Some(height) = self.height {
            arena.height = height;
        }
        if let Some(strike_radius) = self.strike_radius {
            arena.strike_radius = strike_radius;
        }
        validate(&arena)?;

        Ok(Settings {
            arena,
            strategy: self.strategy.unwrap_or(file.strategy).into(),
        })
    }
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("invalid configuration at {}", path.display()))
}

fn parse_config(contents: &str) -> Result<ConfigFile> {
    toml::from_str(contents).context("failed to parse configuration toml contents")
}

fn validate(arena: &ArenaConfig) -> Result<()> {
    if arena.width == 0 || arena.height == 0 {
        bail!(
            "arena dimensions must be positive (received {}x{})",
            arena.width,
            arena.height
        );
    }
    if arena.cell_count() > MAX_ARENA_CELLS {
        bail!(
            "arena of {}x{} cells exceeds the limit of {MAX_ARENA_CELLS} cells",
            arena.width,
            arena.height
        );
    }
    Ok(())
}
