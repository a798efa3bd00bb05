//! A library for classifying raster images into tile grids of fixed-palette map codes.
//!
//! `tilecode` partitions an image into fixed-size square tiles, matches every pixel to its
//! nearest color in a fixed, ordered [`Palette`], aggregates a per-tile histogram of matches,
//! and reduces each tile to a single palette index using a priority-override rule.
//! The resulting [`TileGrid`] is emitted in row-major order and is intended for downstream
//! map consumers (games, visualization tools) that interpret indices against the same
//! palette ordering.
//!
//! # Features
//! To reduce dependencies and compile times, `tilecode` has several `cargo` features
//! that can be turned off or on:
//! - `pipelines`: exposes a builder struct that serves as the high-level API (more details below).
//! - `threads`: exposes parallel versions of the classification functions via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//!
//! # High-Level API
//! To get started with the high-level API, see [`TilePipeline`].
//! Here is a short example:
//! ```no_run
//! # use tilecode::{TilePipeline, TileSize, Palette};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some map")?.into_rgb8();
//!
//! let grid = TilePipeline::try_from(&img)?
//!     .tile_size(TileSize::try_from(16)?) // tiles of 16x16 pixels
//!     .palette(Palette::classic()) // the built-in 20-color catalog
//!     .tile_grid();
//!
//! for row in grid.rows() {
//!     println!("{row:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Output contract
//! A [`TileGrid`] encodes each tile's winning color as its *position* in the palette's
//! fixed ordering, not its name. Changing the palette order silently changes the meaning
//! of previously emitted indices, so treat the entry ordering as part of your wire contract
//! and version it alongside your consumer.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal
)]

mod classify;
mod histogram;
mod palette;
mod types;

#[cfg(feature = "pipelines")]
mod api;

pub use classify::*;
pub use histogram::TileHistogram;
pub use palette::*;
pub use types::*;

#[cfg(feature = "pipelines")]
pub use api::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;

/// The maximum supported number of palette entries is `255`.
///
/// The remaining `u8` value, `u8::MAX`, is reserved for the [`EMPTY_TILE`] sentinel.
pub const MAX_COLORS: u16 = u8::MAX as u16;

/// The sentinel index emitted for a tile that contained zero in-bounds pixels.
///
/// The tiling rule only produces tiles anchored at in-bounds coordinates, so every tile
/// samples at least one pixel and this sentinel should never appear in practice.
/// It exists so that a degenerate tile yields a well-defined value instead of an
/// out-of-range palette index.
pub const EMPTY_TILE: u8 = u8::MAX;
