//! Terminal rendering module
//!
//! Half-block pixel output through crossterm. Consumes snapshots only.

pub mod pixels;
pub mod scene;

pub use pixels::{PixelBuf, Rgb};
pub use scene::{SKY_TOP, draw};
