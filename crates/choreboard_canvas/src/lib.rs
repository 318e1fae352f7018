//! # Choreboard Canvas
//!
//! Hosts for the confetti engine.
//!
//! - [`HeadlessHost`]: software [`Raster`] surfaces, a programmable viewport
//!   and a shared [`HostLog`] for assertions. Drives tests and the
//!   `confetti_replay` tool.
//! - `web` (wasm32 only): a full-page `<canvas>` overlay driven by
//!   `requestAnimationFrame`, exported to JavaScript as `celebrate()`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod headless;
pub mod raster;
pub mod replay;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::ReplayConfig;
pub use error::{CanvasError, CanvasResult};
pub use headless::{HeadlessHandle, HeadlessHost, HostLog};
pub use raster::{Raster, Rgba8};
pub use replay::{run_replay, ReplayReport};
