#![forbid(unsafe_code)]

//! Multi-surface layout for signvar.
//!
//! - [`surface`]: surface handles, the [`SurfaceBackend`] collaborator and
//!   [`LinkedSurface`] chains.
//! - [`layout`]: splitting a styled value over a chain (padding, wraparound,
//!   prefix/postfix anchoring).
//! - [`fragments`]: extracting the literal prefix/postfix around a marker.
//! - [`lines`]: per-viewer change-only line delivery.
//! - [`viewer`]: viewer filters.

pub mod config;
pub mod fragments;
pub mod layout;
pub mod lines;
pub mod surface;
pub mod viewer;

pub use config::LayoutConfig;
pub use fragments::{Fragments, boundary_fragments};
pub use layout::{LayoutInput, encode_lines, layout_lines};
pub use lines::LineCache;
pub use surface::{ChainDirection, LinkedSurface, Side, SurfaceBackend, SurfaceId, walk_chain};
pub use viewer::ViewerFilter;
