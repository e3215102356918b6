//! Seeded generation campaigns.
//!
//! A campaign plays `count` random games from one seed and feeds them, in
//! order, to the library builder. Re-running a campaign with the same
//! config reproduces the same games and therefore the same libraries.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use chron_core::{Chronicle, LibraryCollection, build_libraries};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::rng::DeterministicRng;
use crate::tictactoe::play_game;

/// How many games to play, and from which seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    pub seed: u64,
    pub count: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            count: Self::DEFAULT_COUNT,
        }
    }
}

impl GenerateConfig {
    pub const DEFAULT_SEED: u64 = 21;
    pub const DEFAULT_COUNT: usize = 2000;

    /// Validate configuration before running.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            bail!("count must be > 0");
        }
        Ok(())
    }
}

/// Summary of a library-building campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryReport {
    pub seed: u64,
    pub games: usize,
    pub duplicates: usize,
    pub library_count: usize,
    /// Library length → number of libraries with that length.
    pub length_histogram: BTreeMap<usize, usize>,
    pub max_library_len: usize,
    /// Every library of maximal length, as label lists.
    pub longest: Vec<Vec<Vec<String>>>,
    #[serde(skip)]
    pub collection: LibraryCollection,
}

impl LibraryReport {
    fn from_collection(config: &GenerateConfig, collection: LibraryCollection) -> Self {
        let longest = collection
            .longest()
            .map(|library| {
                library
                    .members()
                    .iter()
                    .map(|chronicle| chronicle.iter().map(ToString::to_string).collect())
                    .collect()
            })
            .collect();

        Self {
            seed: config.seed,
            games: config.count,
            duplicates: collection.duplicates(),
            library_count: collection.len(),
            length_histogram: collection.length_histogram(),
            max_library_len: collection.max_library_len(),
            longest,
            collection,
        }
    }
}

/// Play `config.count` games from `config.seed`.
///
/// # Errors
///
/// Returns an error if the config is invalid or a generated game fails
/// chronicle validation.
pub fn generate_games(config: &GenerateConfig) -> Result<Vec<Chronicle>> {
    config.validate()?;

    let mut rng = DeterministicRng::new(config.seed);
    (0..config.count)
        .map(|game| play_game(&mut rng).with_context(|| format!("game {game} is not a chronicle")))
        .collect()
}

/// Generate games and build libraries from them.
///
/// # Errors
///
/// Propagates [`generate_games`] failures.
#[instrument(skip(config), fields(seed = config.seed, count = config.count))]
pub fn run_library_campaign(config: &GenerateConfig) -> Result<LibraryReport> {
    let games = generate_games(config)?;
    let collection = build_libraries(games);
    let report = LibraryReport::from_collection(config, collection);

    info!(
        libraries = report.library_count,
        duplicates = report.duplicates,
        max_library_len = report.max_library_len,
        "library campaign complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GenerateConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_count_rejected() {
        let config = GenerateConfig {
            count: 0,
            ..GenerateConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(run_library_campaign(&config).is_err());
    }

    #[test]
    fn games_are_reproducible() {
        let config = GenerateConfig { seed: 9, count: 50 };
        let first = generate_games(&config).expect("games");
        let second = generate_games(&config).expect("games");
        assert_eq!(first.len(), 50);
        assert_eq!(first, second);
    }

    #[test]
    fn report_is_consistent_with_collection() {
        let config = GenerateConfig { seed: 21, count: 400 };
        let report = run_library_campaign(&config).expect("campaign");

        assert_eq!(report.games, 400);
        assert_eq!(report.library_count, report.collection.len());
        assert_eq!(report.duplicates, report.collection.duplicates());
        assert_eq!(
            report.length_histogram.values().sum::<usize>(),
            report.library_count
        );
        assert!(!report.longest.is_empty());
        assert!(
            report
                .longest
                .iter()
                .all(|library| library.len() == report.max_library_len)
        );
    }

    #[test]
    fn every_game_is_placed_somewhere() {
        let config = GenerateConfig { seed: 3, count: 300 };
        let games = generate_games(&config).expect("games");
        let report = run_library_campaign(&config).expect("campaign");
        for game in &games {
            assert!(
                report
                    .collection
                    .libraries()
                    .iter()
                    .any(|library| library.contains(game))
            );
        }
    }

    #[test]
    fn report_serializes_without_collection() {
        let report = run_library_campaign(&GenerateConfig { seed: 1, count: 20 }).expect("run");
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["games"], 20);
        assert!(json.get("collection").is_none());
        assert!(json["length_histogram"].is_object());
    }
}
