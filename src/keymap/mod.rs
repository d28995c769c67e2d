//! Keyboard state sampling.
//!
//! - [`Snapshot`]: one bit per hardware key code
//! - [`KeymapSampler`]: rising-edge detection between consecutive snapshots
//! - [`KeyboardState`] / [`SymbolTable`]: platform capabilities
//! - [`x11`]: Xlib implementation of both capabilities

pub mod backend;
pub mod sampler;
pub mod snapshot;
#[cfg(all(unix, not(target_os = "macos")))]
pub mod x11;

pub use backend::{KeyboardState, SymbolTable};
pub use sampler::{diff, EdgePolicy, KeymapSampler};
pub use snapshot::{KeyCode, Snapshot, SNAPSHOT_BYTES};
