//! Contains the fixed, ordered catalog of named reference colors and nearest-color matching.

use crate::MAX_COLORS;
use palette::Srgb;
use std::{collections::HashSet, error::Error, fmt::Display};

/// A single named reference color in a [`Palette`].
///
/// Besides its reference color, an entry carries two per-entry tuning values:
/// - `distance_threshold`: the largest squared RGB distance considered an acceptable
///   match for this entry. Ignored by default; see
///   [`ClassifyOptions::enforce_distance_thresholds`](crate::ClassifyOptions::enforce_distance_thresholds).
/// - `priority_threshold`: if positive, the entry wins a tile once its histogram count
///   reaches this value, even when another entry has a higher raw count. This models
///   features that should be shown even when sparse (e.g., rare resource markers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    /// The unique name of the entry.
    pub name: String,
    /// The reference color classified pixels are compared against.
    pub color: Srgb<u8>,
    /// The largest squared RGB distance accepted as a match when threshold
    /// enforcement is enabled.
    pub distance_threshold: u32,
    /// The histogram count at which this entry overrides the raw majority.
    /// Zero disables the override for this entry.
    pub priority_threshold: u32,
}

impl PaletteEntry {
    /// Creates a new entry with the given name and reference color and both
    /// thresholds set to zero.
    pub fn new(name: impl Into<String>, color: Srgb<u8>) -> Self {
        Self {
            name: name.into(),
            color,
            distance_threshold: 0,
            priority_threshold: 0,
        }
    }

    /// Sets the distance threshold for this entry.
    #[must_use]
    pub fn with_distance_threshold(mut self, threshold: u32) -> Self {
        self.distance_threshold = threshold;
        self
    }

    /// Sets the priority threshold for this entry.
    #[must_use]
    pub fn with_priority_threshold(mut self, threshold: u32) -> Self {
        self.priority_threshold = threshold;
        self
    }
}

/// An error type for invalid [`Palette`] configurations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// The palette was given zero entries.
    Empty,
    /// Two entries share the same name. The inner value is the duplicated name.
    DuplicateName(String),
    /// The palette was given more than [`MAX_COLORS`] entries.
    TooManyEntries,
}

impl Display for PaletteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteError::Empty => write!(f, "palette must have at least one entry"),
            PaletteError::DuplicateName(name) => {
                write!(f, "palette entry name \"{name}\" is not unique")
            }
            PaletteError::TooManyEntries => {
                write!(f, "palette must have at most {MAX_COLORS} entries")
            }
        }
    }
}

impl Error for PaletteError {}

/// The result of matching a pixel against a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearestMatch {
    /// The position of the winning entry in the palette's fixed ordering.
    pub index: u8,
    /// The squared Euclidean RGB distance between the pixel and the winning entry.
    pub distance: u32,
}

/// A fixed, ordered catalog of named reference colors used as classification targets.
///
/// The ordering of entries is significant: classification output encodes a color as its
/// *position* in the catalog, so the ordering is part of the contract with downstream
/// consumers. A palette is immutable once constructed.
///
/// # Examples
/// ```
/// # use tilecode::{Palette, PaletteEntry};
/// # use palette::Srgb;
/// let palette = Palette::new(vec![
///     PaletteEntry::new("water", Srgb::new(0, 162, 232)),
///     PaletteEntry::new("grass", Srgb::new(34, 177, 76)),
///     PaletteEntry::new("ore", Srgb::new(127, 127, 127)).with_priority_threshold(8),
/// ])?;
///
/// let matched = palette.nearest(Srgb::new(30, 170, 80));
/// assert_eq!(palette.name_of(matched.index), Some("grass"));
/// # Ok::<_, tilecode::PaletteError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// The entries of the palette in declaration order.
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Creates a new [`Palette`] from the given entries, preserving their order.
    ///
    /// # Errors
    /// Returns an error if `entries` is empty, contains more than [`MAX_COLORS`]
    /// entries, or contains two entries with the same name.
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        if entries.is_empty() {
            return Err(PaletteError::Empty);
        }
        if entries.len() > usize::from(MAX_COLORS) {
            return Err(PaletteError::TooManyEntries);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(PaletteError::DuplicateName(entry.name.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// The entries of the palette in their fixed ordering.
    #[must_use]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// The number of entries in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether or not the palette has zero entries. Always `false` for a
    /// successfully constructed palette.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at the given position, or `None` if out of range.
    #[must_use]
    pub fn get(&self, index: u8) -> Option<&PaletteEntry> {
        self.entries.get(usize::from(index))
    }

    /// The name of the entry at the given position, or `None` if out of range.
    #[must_use]
    pub fn name_of(&self, index: u8) -> Option<&str> {
        self.get(index).map(|entry| entry.name.as_str())
    }

    /// The 0-based position of the entry with the given name in the fixed catalog
    /// ordering, or `None` if no entry has that name.
    ///
    /// This is used for encoding output only; matching always goes through
    /// [`Palette::nearest`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn index_of(&self, name: &str) -> Option<u8> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .map(|i| i as u8)
    }

    /// Returns the entry whose reference color is closest to `pixel` under squared
    /// Euclidean distance in RGB space, along with the computed distance.
    ///
    /// Ties (equal minimal distance to two entries) are broken by earliest declaration
    /// order: the scan keeps the first entry and only replaces it on a strictly smaller
    /// distance, so the result is deterministic across runs.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn nearest(&self, pixel: Srgb<u8>) -> NearestMatch {
        let mut best = NearestMatch {
            index: 0,
            distance: squared_distance(pixel, self.entries[0].color),
        };

        for (i, entry) in self.entries.iter().enumerate().skip(1) {
            let distance = squared_distance(pixel, entry.color);
            if distance < best.distance {
                best = NearestMatch { index: i as u8, distance };
            }
        }

        best
    }

    /// The built-in 20-color map catalog.
    ///
    /// This is the classic paint-program palette historically used for hand-drawn map
    /// images: black, grays, primaries, and the pastel secondaries. All thresholds are
    /// zero; use [`Palette::new`] with your own entries to tune them.
    #[must_use]
    pub fn classic() -> Self {
        let entries = [
            ("black", (0, 0, 0)),
            ("gray", (127, 127, 127)),
            ("darkRed", (136, 0, 21)),
            ("red", (237, 28, 36)),
            ("orange", (255, 127, 39)),
            ("yellow", (255, 242, 0)),
            ("green", (34, 177, 76)),
            ("blue", (0, 162, 232)),
            ("darkBlue", (63, 72, 204)),
            ("purple", (163, 73, 164)),
            ("white", (255, 255, 255)),
            ("lightGray", (195, 195, 195)),
            ("brown", (185, 122, 87)),
            ("lightPink", (255, 174, 201)),
            ("darkYellow", (255, 201, 14)),
            ("beige", (239, 228, 176)),
            ("lime", (181, 230, 29)),
            ("skyBlue", (153, 217, 234)),
            ("steelBlue", (112, 146, 190)),
            ("lavender", (200, 191, 231)),
        ]
        .into_iter()
        .map(|(name, (r, g, b))| PaletteEntry::new(name, Srgb::new(r, g, b)))
        .collect();

        // the catalog is nonempty with unique names
        Self { entries }
    }
}

/// The squared Euclidean distance between two colors in RGB space.
///
/// Squared distance preserves relative ordering, which is all nearest-color
/// matching needs. The maximum value is `3 * 255^2`, well within `u32`.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn squared_distance(a: Srgb<u8>, b: Srgb<u8>) -> u32 {
    let dr = i32::from(a.red) - i32::from(b.red);
    let dg = i32::from(a.green) - i32::from(b.green);
    let db = i32::from(a.blue) - i32::from(b.blue);
    (dr * dr + dg * dg + db * db) as u32
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn rejects_empty() {
        assert_eq!(Palette::new(Vec::new()), Err(PaletteError::Empty));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = Palette::new(vec![
            PaletteEntry::new("sea", Srgb::new(0, 0, 255)),
            PaletteEntry::new("land", Srgb::new(0, 255, 0)),
            PaletteEntry::new("sea", Srgb::new(0, 0, 200)),
        ]);
        assert_eq!(result, Err(PaletteError::DuplicateName("sea".to_owned())));
    }

    #[test]
    fn rejects_too_many_entries() {
        let entries = (0..=u32::from(MAX_COLORS))
            .map(|i| PaletteEntry::new(format!("c{i}"), Srgb::new(0, 0, 0)))
            .collect();
        assert_eq!(Palette::new(entries), Err(PaletteError::TooManyEntries));
    }

    #[test]
    fn exact_match_has_zero_distance() {
        let palette = Palette::classic();
        for (i, entry) in palette.entries().iter().enumerate() {
            let matched = palette.nearest(entry.color);
            assert_eq!(usize::from(matched.index), i);
            assert_eq!(matched.distance, 0);
        }
    }

    #[test]
    fn ties_break_by_declaration_order() {
        // both entries are at distance 100^2 from the probe
        let palette = Palette::new(vec![
            PaletteEntry::new("low", Srgb::new(0, 0, 0)),
            PaletteEntry::new("high", Srgb::new(200, 0, 0)),
        ])
        .unwrap();

        for _ in 0..10 {
            let matched = palette.nearest(Srgb::new(100, 0, 0));
            assert_eq!(matched.index, 0);
            assert_eq!(matched.distance, 100 * 100);
        }
    }

    #[test]
    fn index_of_reflects_declaration_order() {
        let palette = Palette::classic();
        assert_eq!(palette.index_of("black"), Some(0));
        assert_eq!(palette.index_of("white"), Some(10));
        assert_eq!(palette.index_of("lavender"), Some(19));
        assert_eq!(palette.index_of("mauve"), None);

        for (i, entry) in palette.entries().iter().enumerate() {
            assert_eq!(palette.index_of(&entry.name), Some(u8::try_from(i).unwrap()));
            assert_eq!(palette.name_of(u8::try_from(i).unwrap()), Some(entry.name.as_str()));
        }
    }

    #[test]
    fn classic_has_twenty_entries() {
        let palette = Palette::classic();
        assert_eq!(palette.len(), 20);
    }

    #[test]
    fn bw_palette_splits_at_midpoint() {
        let palette = bw_palette();
        assert_eq!(palette.nearest(Srgb::new(10, 10, 10)).index, 0);
        assert_eq!(palette.nearest(Srgb::new(250, 250, 250)).index, 1);
    }
}
