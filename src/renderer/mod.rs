//! Draw sinks producing textual output
//!
//! [`OutlineSvg`] draws every node as a rectangle outline with its text and
//! `id` label; [`Listing`] writes one line per draw call.

pub mod config;
pub mod outline;

pub use config::OutlineConfig;
pub use outline::{Listing, OutlineSvg};
