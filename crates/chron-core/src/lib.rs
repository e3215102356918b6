#![forbid(unsafe_code)]
//! chron-core library.
//!
//! A *chronicle* is one completed process instance written down as the
//! ordered list of its frames (for tic-tac-toe, one game as its list of
//! moves). This crate defines chronicles, the order relation `a < b`
//! between them, and the incremental builder that groups a stream of
//! chronicles into time-compatible libraries.
//!
//! # Conventions
//!
//! - **Errors**: Use `thiserror` enums per module; see [`error::ErrorCode`]
//!   for the stable machine-readable codes.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod chronicle;
pub mod error;
pub mod library;

pub use chronicle::{Chronicle, ChronicleError, Frame, is_smaller};
pub use error::ErrorCode;
pub use library::{
    Classification, Library, LibraryCollection, build_libraries, build_libraries_from_labels,
};
