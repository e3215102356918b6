#![forbid(unsafe_code)]
//! chron-bnet library.
//!
//! Fits an empirical, Bayesian-network-shaped model over a binary dataset:
//! a fixed arrow set fixes each node's parents, and each node gets a
//! conditional probability table (CPT) estimated by counting rows.
//!
//! ## Pipeline
//!
//! ```text
//! Library (chron-core)
//!        ↓  dag::look_back_arrows() per chronicle
//! arrows ─→ dag::ArrowFrequencies ─→ high_frequency_arrows(min_freq)
//!        ↓                                   ↓
//! dataset::Dataset::presence()        structure::Structure::from_arrows()
//!        └──────────────┬────────────────────┘
//!                       ↓  network::BayesNet::fit()
//!              node → cpt::Cpt   (+ Display report)
//! ```
//!
//! # Conventions
//!
//! - **Errors**: [`BnetError`] for everything that can fail here.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod cpt;
pub mod dag;
pub mod dataset;
pub mod error;
pub mod network;
pub mod structure;

pub use cpt::{Cpt, CptEntry, CptRow, ParentState, Probability, estimate_cpt, fit};
pub use dag::{ArrowFrequencies, chronicle_dot, library_dot, look_back_arrows};
pub use dataset::Dataset;
pub use error::BnetError;
pub use network::BayesNet;
pub use structure::{Arrow, Structure};
