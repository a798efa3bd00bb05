//! Contains the transient per-tile histogram and the winner selection rules.

use crate::Palette;

/// A transient, insertion-ordered count of nearest-color matches within one tile.
///
/// A histogram is created empty at the start of a tile's scan, populated while the
/// tile's pixels are matched, consumed to pick the tile's winning palette index,
/// and then dropped.
///
/// Entries are kept in first-insertion order so that the "first seen wins on tie"
/// rule of [`TileHistogram::most_used`] is reproducible without relying on any
/// particular map iteration order. Palettes are small (at most
/// [`MAX_COLORS`](crate::MAX_COLORS) entries), so a linear scan over the bins is
/// cheaper than hashing.
#[derive(Debug, Clone, Default)]
pub struct TileHistogram {
    /// `(palette index, count)` pairs in first-insertion order.
    bins: Vec<(u8, u32)>,
}

impl TileHistogram {
    /// Creates a new, empty histogram.
    #[must_use]
    pub const fn new() -> Self {
        Self { bins: Vec::new() }
    }

    /// Records one match for the given palette index.
    pub fn record(&mut self, index: u8) {
        if let Some((_, count)) = self.bins.iter_mut().find(|(i, _)| *i == index) {
            *count += 1;
        } else {
            self.bins.push((index, 1));
        }
    }

    /// The number of matches recorded for the given palette index.
    #[must_use]
    pub fn count(&self, index: u8) -> u32 {
        self.bins
            .iter()
            .find(|(i, _)| *i == index)
            .map_or(0, |(_, count)| *count)
    }

    /// The number of distinct palette indices recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Whether or not the histogram has zero recorded matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// The palette index with the highest count, or `None` if the histogram is empty.
    ///
    /// Ties are broken by first insertion: the scan keeps the earlier bin and only
    /// replaces it on a strictly greater count.
    #[must_use]
    pub fn most_used(&self) -> Option<u8> {
        let mut best: Option<(u8, u32)> = None;
        for &(index, count) in &self.bins {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((index, count)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Among entries with a positive priority threshold whose count meets that
    /// threshold, the palette index with the highest count, or `None` if no entry
    /// qualifies. Ties are broken by first insertion, as in
    /// [`TileHistogram::most_used`].
    #[must_use]
    pub fn priority_winner(&self, palette: &Palette) -> Option<u8> {
        let mut best: Option<(u8, u32)> = None;
        for &(index, count) in &self.bins {
            let Some(entry) = palette.get(index) else {
                continue;
            };
            if entry.priority_threshold == 0 || count < entry.priority_threshold {
                continue;
            }
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((index, count)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// The tile's winning palette index: the priority winner if any entry qualifies,
    /// otherwise the most used entry. `None` only for an empty histogram.
    #[must_use]
    pub fn winner(&self, palette: &Palette) -> Option<u8> {
        self.priority_winner(palette).or_else(|| self.most_used())
    }
}
