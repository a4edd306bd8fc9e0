//! Core domain types for the preloader.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod asset;
mod playlist;
mod progress;
mod timing;
pub mod ui;

pub use asset::{AssetLocator, AssetManifest, LocatorKind, SettleOutcome, Settlement};
pub use playlist::{EmptyPlaylistError, WordPlaylist, graphemes};
pub use progress::{Percent, ProgressWeights, WeightsError, combined_progress, ratio_percent};
pub use timing::{DwellPolicy, ExitTimings};
