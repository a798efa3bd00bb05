//! Contains various types needed across the crate.

use crate::MAX_PIXELS;
use std::{
    error::Error,
    fmt::{Debug, Display},
};
use palette::Srgb;
#[cfg(feature = "image")]
use {image::RgbImage, palette::cast::ComponentsAs};

/// An error type for when the length of an input (e.g., `Vec` or slice)
/// is above the maximum supported value.
///
/// The inner value is the maximum supported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AboveMaxLen<T>(pub T);

impl<T: Display> Display for AboveMaxLen<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "above the maximum length of {}", self.0)
    }
}

impl<T: Debug + Display> Error for AboveMaxLen<T> {}

/// A read-only view of an image as a flat, row-major slice of pixels plus its dimensions.
///
/// The invariants are that the slice length equals `width * height` and is not greater
/// than [`MAX_PIXELS`]. Decoding the image bytes into pixels is the concern of an
/// external collaborator (e.g., the [`image`] crate behind the `image` feature);
/// the classifier only ever reads the view.
///
/// # Examples
/// From a raw pixel slice:
/// ```
/// # use tilecode::ImageRef;
/// # use palette::Srgb;
/// let pixels = vec![Srgb::new(0u8, 0, 0); 6];
/// let image = ImageRef::new(&pixels, 3, 2).unwrap();
/// assert_eq!(image.pixel(2, 1), Srgb::new(0, 0, 0));
/// ```
///
/// From an image (needs the `image` feature to be enabled):
/// ```no_run
/// # use tilecode::ImageRef;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some map")?.into_rgb8();
/// let image = ImageRef::try_from(&img)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRef<'a> {
    /// The pixels of the image in row-major order.
    pixels: &'a [Srgb<u8>],
    /// The width of the image in pixels.
    width: u32,
    /// The height of the image in pixels.
    height: u32,
}

impl<'a> ImageRef<'a> {
    /// Creates an [`ImageRef`] without validating the invariants.
    pub(crate) const fn new_unchecked(pixels: &'a [Srgb<u8>], width: u32, height: u32) -> Self {
        Self { pixels, width, height }
    }

    /// Creates a new [`ImageRef`] over the given row-major pixel slice.
    ///
    /// Returns `None` if the length of `pixels` is not equal to `width * height`
    /// or is greater than [`MAX_PIXELS`].
    #[must_use]
    pub fn new(pixels: &'a [Srgb<u8>], width: u32, height: u32) -> Option<Self> {
        let len = u64::from(width) * u64::from(height);
        if pixels.len() as u64 == len && len <= u64::from(MAX_PIXELS) {
            Some(Self::new_unchecked(pixels, width, height))
        } else {
            None
        }
    }

    /// The width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The total number of pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn num_pixels(&self) -> u32 {
        self.pixels.len() as u32
    }

    /// The pixel at the given in-bounds coordinates.
    ///
    /// # Panics
    /// Panics if `x >= width` or `y >= height`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Srgb<u8> {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// The pixels of the image as a flat, row-major slice.
    #[must_use]
    pub const fn as_slice(&self) -> &'a [Srgb<u8>] {
        self.pixels
    }

    /// The row of pixels at the given `y` coordinate.
    pub(crate) fn row(&self, y: u32) -> &'a [Srgb<u8>] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for ImageRef<'a> {
    type Error = AboveMaxLen<u32>;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        let pixels = image.pixels().len();
        if pixels <= MAX_PIXELS as usize {
            let buf = &image.as_raw()[..(pixels * 3)];
            Ok(Self::new_unchecked(
                buf.components_as(),
                image.width(),
                image.height(),
            ))
        } else {
            Err(AboveMaxLen(MAX_PIXELS))
        }
    }
}

/// An error type for when a [`TileSize`] of zero is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroTileSize;

impl Display for ZeroTileSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tile size must be a positive number of pixels")
    }
}

impl Error for ZeroTileSize {}

/// The side length in pixels of the square tiles an image is partitioned into.
///
/// This is a simple new type wrapper around `u32` with the invariant that it must be
/// positive.
///
/// # Examples
/// Use `try_into` to create [`TileSize`]s from `u32`s,
/// or use the [`TileSize::DEFAULT`] constant:
/// ```
/// # use tilecode::{TileSize, ZeroTileSize};
/// # fn main() -> Result<(), ZeroTileSize> {
/// let size = TileSize::try_from(16)?;
/// let size: TileSize = 16.try_into()?;
/// assert!(TileSize::try_from(0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TileSize(u32);

impl TileSize {
    /// The default tile size of `32` pixels.
    pub const DEFAULT: Self = Self(32);

    /// Gets the inner `u32` value.
    #[must_use]
    pub const fn into_inner(self) -> u32 {
        self.0
    }

    /// Creates a [`TileSize`] directly from the given `u32`
    /// without ensuring that it is positive.
    #[allow(unused)]
    pub(crate) const fn new_unchecked(value: u32) -> Self {
        Self(value)
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<TileSize> for u32 {
    fn from(val: TileSize) -> Self {
        val.into_inner()
    }
}

impl TryFrom<u32> for TileSize {
    type Error = ZeroTileSize;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(ZeroTileSize)
        } else {
            Ok(TileSize(value))
        }
    }
}

impl Display for TileSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// The output grid returned by the classification functions.
///
/// It contains one palette index per tile in row-major order
/// (all tiles of row 0 left to right, then row 1, and so on),
/// alongside the grid dimensions in tiles.
/// This ordering is part of the wire contract consumed by downstream map renderers:
/// parallel implementations must reassemble tiles into this order before emitting them.
///
/// All fields will be empty if the classified image had zero width or height.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileGrid {
    /// The number of tile columns.
    tiles_x: u32,
    /// The number of tile rows.
    tiles_y: u32,
    /// The winning palette index of each tile, row-major.
    indices: Vec<u8>,
}

impl TileGrid {
    /// Creates a [`TileGrid`] from its parts.
    ///
    /// The length of `indices` must equal `tiles_x * tiles_y`.
    pub(crate) fn new(tiles_x: u32, tiles_y: u32, indices: Vec<u8>) -> Self {
        debug_assert_eq!(indices.len() as u64, u64::from(tiles_x) * u64::from(tiles_y));
        Self { tiles_x, tiles_y, indices }
    }

    /// The number of tile columns.
    #[must_use]
    pub const fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    /// The number of tile rows.
    #[must_use]
    pub const fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    /// The total number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether or not the grid contains zero tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The winning palette index of each tile as a flat, row-major slice.
    #[must_use]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Consumes the grid and returns the flat, row-major index buffer.
    #[must_use]
    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }

    /// The winning palette index of the tile at the given column and row,
    /// or `None` if the coordinates are out of bounds.
    #[must_use]
    pub fn get(&self, col: u32, row: u32) -> Option<u8> {
        if col < self.tiles_x && row < self.tiles_y {
            Some(self.indices[row as usize * self.tiles_x as usize + col as usize])
        } else {
            None
        }
    }

    /// An iterator over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // max(1) keeps `chunks` well-defined for zero-width grids (the buffer is empty then)
        self.indices.chunks(self.tiles_x.max(1) as usize)
    }
}
