//! Async orchestration for the preloader.
//!
//! Spawns asset retrievals, drives the sequencer, and invokes the completion
//! callback exactly once. The state machine itself lives in `preloader-core`.

mod app;
mod fetch;
mod loader;

pub use app::{CompletionCallback, PreloadApp, clock_now};
pub use fetch::{AssetFetcher, DefaultFetcher, FetchError, FetchFut, FileFetcher, HttpFetcher};
pub use loader::AssetLoader;

pub use preloader_config::{PreloadSettings, PreloaderConfig};
pub use preloader_core::{
    LoadReport, PreloadEvent, PreloadPhase, PreloadSnapshot, PreloadView, WordStage,
};
