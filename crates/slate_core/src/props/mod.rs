//! Prop bitmap storage and the catalog that populates it.

pub mod bitmap;
pub mod catalog;

pub use bitmap::{PropBitmap, PropBufferExport};
pub use catalog::{build_props, prop_player_name};
