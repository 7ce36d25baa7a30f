//! Session configuration

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::matching::ranking::{DateProximityRanker, DescriptionSimilarityRanker};
use crate::traits::CandidateRanker;
use crate::types::*;

/// Tie-break used by the automatic pass when several counterparts share an amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Nearest booking date
    #[default]
    DateProximity,
    /// Most similar description (trigram Jaccard)
    DescriptionSimilarity,
}

impl TieBreak {
    pub fn ranker(&self) -> Box<dyn CandidateRanker> {
        match self {
            TieBreak::DateProximity => Box::new(DateProximityRanker),
            TieBreak::DescriptionSimilarity => Box::new(DescriptionSimilarityRanker),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub tie_break: TieBreak,
    /// Run the automatic pass right after both ledgers are loaded
    pub auto_match_on_load: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            auto_match_on_load: true,
        }
    }
}

impl ReconcileConfig {
    pub fn from_toml_str(contents: &str) -> ReconcileResult<Self> {
        toml::from_str(contents)
            .map_err(|e| ReconcileError::Config(format!("Failed to parse TOML configuration: {}", e)))
    }
}

/// Load a configuration file
pub fn load_config<P: AsRef<Path>>(path: P) -> ReconcileResult<ReconcileConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref).map_err(|e| {
        ReconcileError::Config(format!("Failed to read config file {:?}: {}", path_ref, e))
    })?;
    ReconcileConfig::from_toml_str(&contents)
}
