//! Contains the [`TilePipeline`] builder struct for the high level API.

use crate::{
    classify, tiles, ClassifyOptions, FilterMode, ImageRef, Palette, TileGrid, TileSize, Tiles,
};
#[cfg(feature = "threads")]
use crate::classify_par;
#[cfg(feature = "image")]
use {crate::AboveMaxLen, image::RgbImage};

/// A builder struct to specify options to classify an image into a tile grid.
///
/// # Examples
/// To start, create a [`TilePipeline`] from a [`RgbImage`]
/// (note that the `image` feature is needed):
/// ```no_run
/// # use tilecode::TilePipeline;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some map")?.into_rgb8();
/// let mut pipeline = TilePipeline::try_from(&img)?;
/// # Ok(())
/// # }
/// ```
///
/// Then, you can change different options like the tile size or the palette:
/// ```
/// # use tilecode::{TilePipeline, ImageRef, TileSize, Palette, FilterMode};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let pixels = vec![Srgb::new(0u8, 0, 0); 64];
/// # let image = ImageRef::new(&pixels, 8, 8).ok_or("bad dimensions")?;
/// # let mut pipeline = TilePipeline::new(image);
/// let pipeline = pipeline
///     .tile_size(TileSize::try_from(16)?)
///     .palette(Palette::classic())
///     .filter_mode(FilterMode::Disabled);
/// # Ok(())
/// # }
/// ```
///
/// Finally, run the pipeline:
/// ```
/// # use tilecode::{TilePipeline, ImageRef};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let pixels = vec![Srgb::new(0u8, 0, 0); 64];
/// # let image = ImageRef::new(&pixels, 8, 8).ok_or("bad dimensions")?;
/// # let pipeline = TilePipeline::new(image);
/// let grid = pipeline.tile_grid();
/// # Ok(())
/// # }
/// ```
///
/// Or, in parallel across multiple threads (needs the `threads` feature):
/// ```
/// # use tilecode::{TilePipeline, ImageRef};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let pixels = vec![Srgb::new(0u8, 0, 0); 64];
/// # let image = ImageRef::new(&pixels, 8, 8).ok_or("bad dimensions")?;
/// # let pipeline = TilePipeline::new(image);
/// let grid = pipeline.tile_grid_par();
/// # Ok(())
/// # }
/// ```
///
/// Instead of palette indices you can also get the winning color names,
/// resolved through the same catalog ordering:
/// ```
/// # use tilecode::{TilePipeline, ImageRef};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let pixels = vec![Srgb::new(0u8, 0, 0); 64];
/// # let image = ImageRef::new(&pixels, 8, 8).ok_or("bad dimensions")?;
/// # let pipeline = TilePipeline::new(image);
/// let names = pipeline.tile_names();
/// assert_eq!(names, vec!["black"]);
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct TilePipeline<'a> {
    /// The input image.
    pub(crate) image: ImageRef<'a>,
    /// The side length of the square tiles.
    pub(crate) tile_size: TileSize,
    /// The catalog of reference colors to classify against.
    pub(crate) palette: Palette,
    /// The classification options.
    pub(crate) options: ClassifyOptions,
}

impl<'a> TilePipeline<'a> {
    /// Creates a new [`TilePipeline`] with the default tile size of `32`,
    /// the built-in [`Palette::classic`] catalog, and default options.
    pub fn new(image: ImageRef<'a>) -> Self {
        Self {
            image,
            tile_size: TileSize::DEFAULT,
            palette: Palette::classic(),
            options: ClassifyOptions::new(),
        }
    }

    /// Sets the side length of the square tiles the image is partitioned into.
    ///
    /// The default tile size is [`TileSize::DEFAULT`] (`32` pixels).
    pub fn tile_size(&mut self, tile_size: TileSize) -> &mut Self {
        self.tile_size = tile_size;
        self
    }

    /// Sets the palette to classify against.
    ///
    /// The entry ordering of the palette determines the meaning of the emitted
    /// indices, so it is part of the contract with the downstream consumer.
    ///
    /// The default palette is [`Palette::classic`].
    pub fn palette(&mut self, palette: Palette) -> &mut Self {
        self.palette = palette;
        self
    }

    /// Sets the scope of the acceptance filter.
    ///
    /// See [`FilterMode`] for more details.
    ///
    /// The default is [`FilterMode::TileScoped`].
    pub fn filter_mode(&mut self, filter: FilterMode) -> &mut Self {
        self.options = self.options.filter_mode(filter);
        self
    }

    /// Sets whether matches beyond an entry's distance threshold are excluded
    /// from the tile histograms.
    ///
    /// The default is `false`.
    pub fn enforce_distance_thresholds(&mut self, enforce: bool) -> &mut Self {
        self.options = self.options.enforce_distance_thresholds(enforce);
        self
    }

    /// The palette the pipeline classifies against.
    #[must_use]
    pub fn palette_ref(&self) -> &Palette {
        &self.palette
    }

    /// Runs the pipeline and returns the tile grid of winning palette indices.
    #[must_use]
    pub fn tile_grid(&self) -> TileGrid {
        classify(self.image, self.tile_size, &self.palette, self.options)
    }

    /// Returns a lazy, row-major iterator over the winning palette index of each
    /// tile, so classification of a large image can be stopped between tiles.
    pub fn tile_iter(&self) -> Tiles<'_> {
        tiles(self.image, self.tile_size, &self.palette, self.options)
    }

    /// Runs the pipeline and returns the winning color name of each tile in
    /// row-major order.
    ///
    /// A degenerate tile with zero accepted pixels yields an empty name.
    #[must_use]
    pub fn tile_names(&self) -> Vec<&str> {
        self.tile_grid()
            .indices()
            .iter()
            .map(|&i| self.palette.name_of(i).unwrap_or(""))
            .collect()
    }
}

#[cfg(feature = "threads")]
impl TilePipeline<'_> {
    /// Runs the pipeline in parallel and returns the tile grid of winning
    /// palette indices.
    ///
    /// Tiles are reassembled in row-major order before returning, so the output is
    /// identical to [`TilePipeline::tile_grid`].
    #[must_use]
    pub fn tile_grid_par(&self) -> TileGrid {
        classify_par(self.image, self.tile_size, &self.palette, self.options)
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for TilePipeline<'a> {
    type Error = AboveMaxLen<u32>;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        Ok(Self::new(image.try_into()?))
    }
}
