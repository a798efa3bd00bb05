//! Contains the tile classification functions and their supporting types.
//!
//! Classification partitions an image into square tiles of side [`TileSize`],
//! matches every in-bounds pixel of a tile against the [`Palette`], aggregates the
//! matches into a [`TileHistogram`], and reduces each tile to one palette index
//! (priority override first, raw majority otherwise). Tiles are emitted in
//! row-major order.
//!
//! The entry points are [`classify`] for the common case, [`tiles`] for a lazy
//! iterator that allows stopping between tiles, [`classify_par`] for a parallel
//! version (feature `threads`), and [`classify_with_tracker`] for the legacy
//! shared-tracker behavior.

use crate::{ImageRef, Palette, TileGrid, TileHistogram, TileSize, EMPTY_TILE};
#[cfg(feature = "threads")]
use rayon::prelude::*;
use std::iter::FusedIterator;

/// Per-palette-entry record of the best (smallest) match distance accepted so far.
///
/// The tracker implements the acceptance filter: a match is counted in the histogram
/// only the first time its entry is seen by this tracker, or when its distance is
/// strictly smaller than the entry's best recorded distance.
///
/// The scope of a tracker determines the filter's semantics. With
/// [`FilterMode::TileScoped`] (the default) a fresh tracker is used per tile and
/// classification is a pure function. The legacy behavior kept one tracker alive for
/// the whole process, which couples tiles, images, and even concurrent callers
/// through shared mutable state; [`classify_with_tracker`] reproduces that behavior
/// with the state as an explicit parameter instead of a hidden global.
#[derive(Debug, Clone)]
pub struct DistanceTracker {
    /// The best accepted distance per palette index, `None` until first match.
    best: Vec<Option<u32>>,
}

impl DistanceTracker {
    /// Creates a tracker with one empty slot per entry of the given palette.
    #[must_use]
    pub fn new(palette: &Palette) -> Self {
        Self { best: vec![None; palette.len()] }
    }

    /// Records a match and reports whether it passes the acceptance filter.
    ///
    /// Accepts when the entry has no recorded distance yet or when `distance` is
    /// strictly smaller than the recorded one; the record is updated on acceptance.
    pub fn accept(&mut self, index: u8, distance: u32) -> bool {
        match &mut self.best[usize::from(index)] {
            Some(best) if distance >= *best => false,
            slot => {
                *slot = Some(distance);
                true
            }
        }
    }

    /// The best accepted distance for the given palette index so far.
    #[must_use]
    pub fn best_distance(&self, index: u8) -> Option<u32> {
        self.best.get(usize::from(index)).copied().flatten()
    }

    /// Clears all recorded distances.
    pub fn reset(&mut self) {
        self.best.fill(None);
    }
}

/// The scope of the acceptance filter applied while building tile histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// A fresh [`DistanceTracker`] per tile.
    ///
    /// This is the default: filter state never leaks between tiles or images, so
    /// classification is referentially transparent and safe to run in parallel.
    #[default]
    TileScoped,
    /// No acceptance filter; every nearest-color match counts.
    ///
    /// This makes the histogram a plain per-pixel tally and is the mode to use when
    /// priority thresholds should be compared against raw pixel counts.
    Disabled,
}

/// Options for the classification functions.
///
/// # Examples
/// ```
/// # use tilecode::{ClassifyOptions, FilterMode};
/// let options = ClassifyOptions::new()
///     .filter_mode(FilterMode::Disabled)
///     .enforce_distance_thresholds(true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassifyOptions {
    /// The scope of the acceptance filter.
    filter: FilterMode,
    /// Whether matches beyond an entry's distance threshold are dropped.
    enforce_distance_thresholds: bool,
}

impl ClassifyOptions {
    /// Creates a new [`ClassifyOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filter: FilterMode::TileScoped,
            enforce_distance_thresholds: false,
        }
    }

    /// Sets the scope of the acceptance filter.
    ///
    /// The default is [`FilterMode::TileScoped`].
    #[must_use]
    pub const fn filter_mode(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Sets whether matches whose distance exceeds the matched entry's
    /// `distance_threshold` are excluded from the histogram.
    ///
    /// The default is `false`: thresholds are carried per entry but not read during
    /// classification. Enabling enforcement can leave a tile with zero accepted
    /// pixels, in which case the tile emits [`EMPTY_TILE`].
    #[must_use]
    pub const fn enforce_distance_thresholds(mut self, enforce: bool) -> Self {
        self.enforce_distance_thresholds = enforce;
        self
    }

    /// The configured filter scope.
    #[must_use]
    pub const fn filter(&self) -> FilterMode {
        self.filter
    }
}

/// The number of tile columns and rows produced for an image of the given size.
///
/// Tiles step from 0 by `tile_size` while inside the image, so edge tiles are
/// emitted even when the dimensions are not multiples of `tile_size`:
/// the counts are `ceil(width / tile_size)` by `ceil(height / tile_size)`.
#[must_use]
pub fn tile_counts(width: u32, height: u32, tile_size: TileSize) -> (u32, u32) {
    let tile_size = tile_size.into_inner();
    (width.div_ceil(tile_size), height.div_ceil(tile_size))
}

/// Classifies the single tile anchored at `(x0, y0)`, returning its winning index.
fn classify_tile(
    image: ImageRef<'_>,
    palette: &Palette,
    enforce_thresholds: bool,
    mut tracker: Option<&mut DistanceTracker>,
    x0: u32,
    y0: u32,
    tile_size: u32,
) -> u8 {
    let mut histogram = TileHistogram::new();

    // out-of-bounds pixels of edge tiles are skipped, not zero-filled
    let x_end = x0.saturating_add(tile_size).min(image.width());
    let y_end = y0.saturating_add(tile_size).min(image.height());

    for y in y0..y_end {
        let row = image.row(y);
        for x in x0..x_end {
            let matched = palette.nearest(row[x as usize]);

            if enforce_thresholds {
                let out_of_threshold = palette
                    .get(matched.index)
                    .is_some_and(|entry| matched.distance > entry.distance_threshold);
                if out_of_threshold {
                    continue;
                }
            }

            let accepted = match tracker.as_mut() {
                Some(tracker) => tracker.accept(matched.index, matched.distance),
                None => true,
            };
            if accepted {
                histogram.record(matched.index);
            }
        }
    }

    histogram.winner(palette).unwrap_or_else(|| {
        log::warn!("tile at ({x0}, {y0}) has no accepted pixels, emitting the empty-tile sentinel");
        EMPTY_TILE
    })
}

/// A lazy, row-major iterator over tile winners.
///
/// Yields one palette index per tile in the same order [`classify`] emits them.
/// Because each tile is classified on demand, a caller can stop consuming the
/// iterator to cancel classification of a large image between tiles.
///
/// Created by the [`tiles`] function.
#[must_use]
#[derive(Debug, Clone)]
pub struct Tiles<'a> {
    /// The image being classified.
    image: ImageRef<'a>,
    /// The palette to match against.
    palette: &'a Palette,
    /// The classification options.
    options: ClassifyOptions,
    /// The tile side length in pixels.
    tile_size: u32,
    /// The number of tile columns.
    tiles_x: u32,
    /// The number of tile rows.
    tiles_y: u32,
    /// The next tile's column.
    col: u32,
    /// The next tile's row.
    row: u32,
    /// The per-tile tracker, `None` when the filter is disabled.
    tracker: Option<DistanceTracker>,
}

impl Iterator for Tiles<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.row >= self.tiles_y {
            return None;
        }

        let (x0, y0) = (self.col * self.tile_size, self.row * self.tile_size);
        self.col += 1;
        if self.col >= self.tiles_x {
            self.col = 0;
            self.row += 1;
        }

        if let Some(tracker) = self.tracker.as_mut() {
            tracker.reset();
        }
        Some(classify_tile(
            self.image,
            self.palette,
            self.options.enforce_distance_thresholds,
            self.tracker.as_mut(),
            x0,
            y0,
            self.tile_size,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.row >= self.tiles_y {
            0
        } else {
            let emitted = u64::from(self.row) * u64::from(self.tiles_x) + u64::from(self.col);
            let total = u64::from(self.tiles_y) * u64::from(self.tiles_x);
            usize::try_from(total - emitted).unwrap_or(usize::MAX)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tiles<'_> {}

impl FusedIterator for Tiles<'_> {}

/// Returns a lazy, row-major iterator over the winning palette index of each tile.
///
/// See [`classify`] for the semantics of a single tile; this function exists so that
/// callers can interleave other work or stop early (e.g., on cancellation) between
/// tiles of a large image.
pub fn tiles<'a>(
    image: ImageRef<'a>,
    tile_size: TileSize,
    palette: &'a Palette,
    options: ClassifyOptions,
) -> Tiles<'a> {
    let (tiles_x, tiles_y) = tile_counts(image.width(), image.height(), tile_size);
    let tracker = match options.filter {
        FilterMode::TileScoped => Some(DistanceTracker::new(palette)),
        FilterMode::Disabled => None,
    };
    Tiles {
        image,
        palette,
        options,
        tile_size: tile_size.into_inner(),
        tiles_x,
        tiles_y,
        col: 0,
        // a zero-width image has no tile columns, so start exhausted
        row: if tiles_x == 0 { tiles_y } else { 0 },
        tracker,
    }
}

/// Classifies an image into a row-major [`TileGrid`] of palette indices.
///
/// Each tile's winner is chosen from its match histogram: an entry whose count meets
/// its positive priority threshold wins over the raw majority, ties go to the entry
/// matched earliest in the tile. Images smaller than the tile size still emit their
/// edge tiles; zero-sized images produce an empty grid.
///
/// # Examples
/// ```
/// # use tilecode::{classify, ClassifyOptions, ImageRef, Palette, PaletteEntry, TileSize};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let palette = Palette::new(vec![
///     PaletteEntry::new("black", Srgb::new(0, 0, 0)),
///     PaletteEntry::new("white", Srgb::new(255, 255, 255)),
/// ])?;
///
/// let pixels = vec![Srgb::new(0u8, 0, 0); 4];
/// let image = ImageRef::new(&pixels, 2, 2).ok_or("bad dimensions")?;
/// let grid = classify(image, TileSize::try_from(2)?, &palette, ClassifyOptions::new());
///
/// assert_eq!(grid.indices(), [0]); // the index of "black"
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn classify(
    image: ImageRef<'_>,
    tile_size: TileSize,
    palette: &Palette,
    options: ClassifyOptions,
) -> TileGrid {
    let (tiles_x, tiles_y) = tile_counts(image.width(), image.height(), tile_size);
    let indices = tiles(image, tile_size, palette, options).collect();
    TileGrid::new(tiles_x, tiles_y, indices)
}

/// Classifies an image using an explicit, caller-owned [`DistanceTracker`] that is
/// carried across all tiles without resetting.
///
/// This reproduces the legacy acceptance-filter behavior, where the best-distance
/// record persisted for the lifetime of the process: reusing one tracker across calls
/// couples tiles, images, and requests, and the filter admits fewer and fewer matches
/// as the recorded distances shrink. A tile whose every match is filtered out emits
/// [`EMPTY_TILE`]. Prefer [`classify`] unless you need compatibility with the legacy
/// output.
///
/// `options.filter_mode` is ignored; the given tracker defines the filter scope.
pub fn classify_with_tracker(
    image: ImageRef<'_>,
    tile_size: TileSize,
    palette: &Palette,
    options: ClassifyOptions,
    tracker: &mut DistanceTracker,
) -> TileGrid {
    let (tiles_x, tiles_y) = tile_counts(image.width(), image.height(), tile_size);
    let tile_size = tile_size.into_inner();

    let mut indices = Vec::with_capacity(tiles_x as usize * tiles_y as usize);
    for row in 0..tiles_y {
        for col in 0..tiles_x {
            indices.push(classify_tile(
                image,
                palette,
                options.enforce_distance_thresholds,
                Some(&mut *tracker),
                col * tile_size,
                row * tile_size,
                tile_size,
            ));
        }
    }

    TileGrid::new(tiles_x, tiles_y, indices)
}

/// Classifies an image in parallel across tiles.
///
/// Tile histograms are independent, so tiles are classified by a worker pool and the
/// results are reassembled in row-major order before returning; the output is
/// identical to [`classify`] with the same options.
#[cfg(feature = "threads")]
#[must_use]
pub fn classify_par(
    image: ImageRef<'_>,
    tile_size: TileSize,
    palette: &Palette,
    options: ClassifyOptions,
) -> TileGrid {
    let (tiles_x, tiles_y) = tile_counts(image.width(), image.height(), tile_size);
    let tile_size = tile_size.into_inner();

    let indices = (0..tiles_y)
        .into_par_iter()
        .flat_map_iter(|row| {
            let mut tracker = match options.filter {
                FilterMode::TileScoped => Some(DistanceTracker::new(palette)),
                FilterMode::Disabled => None,
            };
            (0..tiles_x).map(move |col| {
                if let Some(tracker) = tracker.as_mut() {
                    tracker.reset();
                }
                classify_tile(
                    image,
                    palette,
                    options.enforce_distance_thresholds,
                    tracker.as_mut(),
                    col * tile_size,
                    row * tile_size,
                    tile_size,
                )
            })
        })
        .collect();

    TileGrid::new(tiles_x, tiles_y, indices)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, PaletteEntry};
    use palette::Srgb;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    fn random_image(width: u32, height: u32, seed: u64) -> Vec<Srgb<u8>> {
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
        (0..width as usize * height as usize)
            .map(|_| Srgb::new(rng.gen(), rng.gen(), rng.gen()))
            .collect()
    }

    #[test]
    fn tile_count_matches_ceil_formula() {
        for (width, height, tile_size) in
            [(64, 64, 32), (65, 64, 32), (64, 33, 32), (5, 3, 2), (1, 1, 7), (100, 1, 3)]
        {
            let pixels = solid_image(width, height, Srgb::new(0, 0, 0));
            let image = ImageRef::new(&pixels, width, height).unwrap();
            let grid = classify(
                image,
                TileSize::try_from(tile_size).unwrap(),
                &bw_palette(),
                ClassifyOptions::new(),
            );
            assert_eq!(grid.tiles_x(), width.div_ceil(tile_size));
            assert_eq!(grid.tiles_y(), height.div_ceil(tile_size));
            assert_eq!(
                grid.len() as u32,
                width.div_ceil(tile_size) * height.div_ceil(tile_size)
            );
        }
    }

    #[test]
    fn empty_image_yields_empty_grid() {
        let image = ImageRef::new(&[], 0, 0).unwrap();
        let grid = classify(
            image,
            TileSize::DEFAULT,
            &bw_palette(),
            ClassifyOptions::new(),
        );
        assert!(grid.is_empty());
        assert_eq!(grid.tiles_x(), 0);
        assert_eq!(grid.tiles_y(), 0);
    }

    #[test]
    fn zero_width_image_yields_no_tiles() {
        let image = ImageRef::new(&[], 0, 64).unwrap();
        let grid = classify(
            image,
            TileSize::DEFAULT,
            &bw_palette(),
            ClassifyOptions::new(),
        );
        assert!(grid.is_empty());
        assert_eq!((grid.tiles_x(), grid.tiles_y()), (0, 2));
    }

    #[test]
    fn image_smaller_than_tile_emits_one_tile() {
        let pixels = solid_image(3, 3, Srgb::new(255, 255, 255));
        let image = ImageRef::new(&pixels, 3, 3).unwrap();
        let grid = classify(
            image,
            TileSize::try_from(5).unwrap(),
            &bw_palette(),
            ClassifyOptions::new(),
        );
        assert_eq!(grid.indices(), [1]);
    }

    #[test]
    fn all_indices_within_palette() {
        let palette = crate::Palette::classic();
        let pixels = random_image(70, 41, 42);
        let image = ImageRef::new(&pixels, 70, 41).unwrap();
        for options in [
            ClassifyOptions::new(),
            ClassifyOptions::new().filter_mode(FilterMode::Disabled),
        ] {
            let grid = classify(image, TileSize::try_from(16).unwrap(), &palette, options);
            assert!(grid
                .indices()
                .iter()
                .all(|&i| usize::from(i) < palette.len()));
        }
    }

    #[test]
    fn uniform_image_classifies_to_that_color() {
        let palette = crate::Palette::classic();
        for (i, entry) in palette.entries().iter().enumerate() {
            let pixels = solid_image(48, 48, entry.color);
            let image = ImageRef::new(&pixels, 48, 48).unwrap();
            let grid = classify(
                image,
                TileSize::try_from(16).unwrap(),
                &palette,
                ClassifyOptions::new(),
            );
            assert_eq!(grid.len(), 9);
            assert!(grid.indices().iter().all(|&w| usize::from(w) == i));
        }
    }

    #[test]
    fn spec_example_two_by_two_black() {
        let pixels = solid_image(2, 2, Srgb::new(0, 0, 0));
        let image = ImageRef::new(&pixels, 2, 2).unwrap();
        let grid = classify(
            image,
            TileSize::try_from(2).unwrap(),
            &bw_palette(),
            ClassifyOptions::new(),
        );
        assert_eq!(grid.indices(), [0]);
    }

    #[test]
    fn tie_break_is_deterministic_across_runs() {
        // every pixel is equidistant from both palette entries
        let palette = crate::Palette::new(vec![
            PaletteEntry::new("first", Srgb::new(0, 0, 0)),
            PaletteEntry::new("second", Srgb::new(200, 0, 0)),
        ])
        .unwrap();
        let pixels = solid_image(8, 8, Srgb::new(100, 0, 0));
        let image = ImageRef::new(&pixels, 8, 8).unwrap();

        for _ in 0..5 {
            let grid = classify(
                image,
                TileSize::try_from(4).unwrap(),
                &palette,
                ClassifyOptions::new(),
            );
            assert!(grid.indices().iter().all(|&i| i == 0));
        }
    }

    #[test]
    fn priority_threshold_overrides_majority() {
        let palette = crate::Palette::new(vec![
            PaletteEntry::new("plain", Srgb::new(0, 0, 0)),
            PaletteEntry::new("marker", Srgb::new(255, 255, 255)).with_priority_threshold(3),
        ])
        .unwrap();

        // 12 plain pixels, 4 marker pixels in a single 4x4 tile
        let pixels = image_from_fn(4, 4, |_, y| {
            if y == 0 {
                Srgb::new(255, 255, 255)
            } else {
                Srgb::new(0, 0, 0)
            }
        });
        let image = ImageRef::new(&pixels, 4, 4).unwrap();

        // raw counts require the filter to be off
        let options = ClassifyOptions::new().filter_mode(FilterMode::Disabled);
        let grid = classify(image, TileSize::try_from(4).unwrap(), &palette, options);
        assert_eq!(grid.indices(), [1]);

        // without the threshold the raw majority wins
        let palette = crate::Palette::new(vec![
            PaletteEntry::new("plain", Srgb::new(0, 0, 0)),
            PaletteEntry::new("marker", Srgb::new(255, 255, 255)),
        ])
        .unwrap();
        let grid = classify(image, TileSize::try_from(4).unwrap(), &palette, options);
        assert_eq!(grid.indices(), [0]);
    }

    #[test]
    fn edge_tiles_sample_only_in_bounds_pixels() {
        // 5x3 image: the rightmost column is white, everything else black
        let pixels = image_from_fn(5, 3, |x, _| {
            if x == 4 {
                Srgb::new(255, 255, 255)
            } else {
                Srgb::new(0, 0, 0)
            }
        });
        let image = ImageRef::new(&pixels, 5, 3).unwrap();
        let grid = classify(
            image,
            TileSize::try_from(2).unwrap(),
            &bw_palette(),
            ClassifyOptions::new(),
        );

        // 3 columns x 2 rows of tiles; the single-pixel-wide edge column is all white
        assert_eq!((grid.tiles_x(), grid.tiles_y()), (3, 2));
        assert_eq!(grid.indices(), [0, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn classification_is_idempotent() {
        let palette = crate::Palette::classic();
        let pixels = random_image(50, 37, 7);
        let image = ImageRef::new(&pixels, 50, 37).unwrap();
        let tile_size = TileSize::try_from(8).unwrap();

        let first = classify(image, tile_size, &palette, ClassifyOptions::new());
        let second = classify(image, tile_size, &palette, ClassifyOptions::new());
        assert_eq!(first, second);

        // the legacy mode is idempotent only when the tracker is reset between runs
        let mut tracker = DistanceTracker::new(&palette);
        let first =
            classify_with_tracker(image, tile_size, &palette, ClassifyOptions::new(), &mut tracker);
        tracker.reset();
        let second =
            classify_with_tracker(image, tile_size, &palette, ClassifyOptions::new(), &mut tracker);
        assert_eq!(first, second);
    }

    #[test]
    fn tile_scoped_filter_does_not_leak_between_tiles() {
        // two tiles of the same solid color: both classify identically
        let pixels = solid_image(4, 2, Srgb::new(0, 0, 0));
        let image = ImageRef::new(&pixels, 4, 2).unwrap();
        let grid = classify(
            image,
            TileSize::try_from(2).unwrap(),
            &bw_palette(),
            ClassifyOptions::new(),
        );
        assert_eq!(grid.indices(), [0, 0]);
    }

    #[test]
    fn shared_tracker_couples_tiles() {
        // the first tile records black at distance 0; every later black match is
        // rejected because its distance is not strictly smaller, so the second
        // tile's histogram stays empty
        let pixels = solid_image(4, 2, Srgb::new(0, 0, 0));
        let image = ImageRef::new(&pixels, 4, 2).unwrap();
        let palette = bw_palette();
        let mut tracker = DistanceTracker::new(&palette);
        let grid = classify_with_tracker(
            image,
            TileSize::try_from(2).unwrap(),
            &palette,
            ClassifyOptions::new(),
            &mut tracker,
        );
        assert_eq!(grid.indices(), [0, crate::EMPTY_TILE]);
        assert_eq!(tracker.best_distance(0), Some(0));
    }

    #[test]
    fn shared_tracker_persists_across_images() {
        let palette = bw_palette();
        let pixels = solid_image(2, 2, Srgb::new(0, 0, 0));
        let image = ImageRef::new(&pixels, 2, 2).unwrap();
        let tile_size = TileSize::try_from(2).unwrap();
        let mut tracker = DistanceTracker::new(&palette);

        let first =
            classify_with_tracker(image, tile_size, &palette, ClassifyOptions::new(), &mut tracker);
        assert_eq!(first.indices(), [0]);

        // same image again: the tracker still remembers distance 0 for black
        let second =
            classify_with_tracker(image, tile_size, &palette, ClassifyOptions::new(), &mut tracker);
        assert_eq!(second.indices(), [crate::EMPTY_TILE]);
    }

    #[test]
    fn threshold_enforcement_drops_far_matches() {
        let palette = crate::Palette::new(vec![
            PaletteEntry::new("black", Srgb::new(0, 0, 0)).with_distance_threshold(100),
            PaletteEntry::new("white", Srgb::new(255, 255, 255)).with_distance_threshold(100),
        ])
        .unwrap();

        // mid-gray is far outside both thresholds
        let pixels = solid_image(2, 2, Srgb::new(127, 127, 127));
        let image = ImageRef::new(&pixels, 2, 2).unwrap();
        let tile_size = TileSize::try_from(2).unwrap();

        let enforced = ClassifyOptions::new().enforce_distance_thresholds(true);
        let grid = classify(image, tile_size, &palette, enforced);
        assert_eq!(grid.indices(), [crate::EMPTY_TILE]);

        // the default ignores the thresholds entirely
        let grid = classify(image, tile_size, &palette, ClassifyOptions::new());
        assert_eq!(grid.indices(), [0]);
    }

    #[test]
    fn tiles_iterator_is_lazy_and_exact() {
        let pixels = solid_image(8, 8, Srgb::new(255, 255, 255));
        let image = ImageRef::new(&pixels, 8, 8).unwrap();
        let palette = bw_palette();
        let tile_size = TileSize::try_from(2).unwrap();

        let mut iter = tiles(image, tile_size, &palette, ClassifyOptions::new());
        assert_eq!(iter.len(), 16);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.len(), 15);

        // stopping early is the cancellation path
        let partial = tiles(image, tile_size, &palette, ClassifyOptions::new())
            .take(5)
            .collect::<Vec<_>>();
        assert_eq!(partial, vec![1; 5]);

        let full = tiles(image, tile_size, &palette, ClassifyOptions::new()).collect::<Vec<_>>();
        assert_eq!(
            full,
            classify(image, tile_size, &palette, ClassifyOptions::new()).into_indices()
        );
    }

    #[cfg(feature = "threads")]
    #[test]
    fn parallel_matches_serial() {
        let palette = crate::Palette::classic();
        let pixels = random_image(100, 67, 123);
        let image = ImageRef::new(&pixels, 100, 67).unwrap();
        let tile_size = TileSize::try_from(9).unwrap();

        for options in [
            ClassifyOptions::new(),
            ClassifyOptions::new().filter_mode(FilterMode::Disabled),
            ClassifyOptions::new().enforce_distance_thresholds(true),
        ] {
            let serial = classify(image, tile_size, &palette, options);
            let parallel = classify_par(image, tile_size, &palette, options);
            assert_eq!(serial, parallel);
        }
    }
}
