// Sinusoid - Synthetic sine-wave south plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Fixed sine lookup table and cursor arithmetic.
//!
//! One full period is sampled at 6° steps, giving 60 points. Traversal is
//! an explicit pure function over the table, so a cursor can be stored,
//! inspected and resumed anywhere.

/// Number of points in one period.
pub const TABLE_LEN: usize = 60;

/// Angular step between consecutive points, in degrees.
pub const STEP_DEGREES: f64 = 6.0;

/// The table shipped with the plugin.
pub static SINE_TABLE: WaveformTable = WaveformTable::new([
    0.0,
    0.104528463,
    0.207911691,
    0.309016994,
    0.406736643,
    0.5,
    0.587785252,
    0.669130606,
    0.743144825,
    0.809016994,
    0.866025404,
    0.913545458,
    0.951056516,
    0.978147601,
    0.994521895,
    1.0,
    0.994521895,
    0.978147601,
    0.951056516,
    0.913545458,
    0.866025404,
    0.809016994,
    0.743144825,
    0.669130606,
    0.587785252,
    0.5,
    0.406736643,
    0.309016994,
    0.207911691,
    0.104528463,
    1.22515e-16,
    -0.104528463,
    -0.207911691,
    -0.309016994,
    -0.406736643,
    -0.5,
    -0.587785252,
    -0.669130606,
    -0.743144825,
    -0.809016994,
    -0.866025404,
    -0.913545458,
    -0.951056516,
    -0.978147601,
    -0.994521895,
    -1.0,
    -0.994521895,
    -0.978147601,
    -0.951056516,
    -0.913545458,
    -0.866025404,
    -0.809016994,
    -0.743144825,
    -0.669130606,
    -0.587785252,
    -0.5,
    -0.406736643,
    -0.309016994,
    -0.207911691,
    -0.104528463,
]);

/// Position in a [`WaveformTable`]. Always `< TABLE_LEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor(usize);

impl Cursor {
    /// Cursor at the start of the period
    pub const START: Cursor = Cursor(0);

    /// Create a cursor, wrapping `index` into range
    pub fn new(index: usize) -> Self {
        Cursor(index % TABLE_LEN)
    }

    /// Index into the table
    pub fn index(self) -> usize {
        self.0
    }

    /// The following position, wrapping from the last point back to 0
    pub fn next(self) -> Self {
        Cursor((self.0 + 1) % TABLE_LEN)
    }
}

/// Immutable 60-point amplitude table.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformTable {
    points: [f64; TABLE_LEN],
}

impl WaveformTable {
    /// Wrap a fixed set of points
    pub const fn new(points: [f64; TABLE_LEN]) -> Self {
        Self { points }
    }

    /// Amplitude at `cursor` and the cursor that follows it.
    pub fn advance(&self, cursor: Cursor) -> (f64, Cursor) {
        (self.points[cursor.index()], cursor.next())
    }

    /// Amplitude at a raw index, if in range
    pub fn get(&self, index: usize) -> Option<f64> {
        self.points.get(index).copied()
    }

    /// Number of points (always [`TABLE_LEN`])
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate the points in table order
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().copied()
    }
}

/// Advance over [`SINE_TABLE`].
pub fn advance(cursor: Cursor) -> (f64, Cursor) {
    SINE_TABLE.advance(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_table_matches_sine() {
        assert_eq!(SINE_TABLE.len(), TABLE_LEN);
        for (i, value) in SINE_TABLE.iter().enumerate() {
            let expected = (i as f64 * STEP_DEGREES).to_radians().sin();
            assert_abs_diff_eq!(value, expected, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_table_extrema() {
        assert_eq!(SINE_TABLE.get(15), Some(1.0));
        assert_eq!(SINE_TABLE.get(45), Some(-1.0));
        assert_eq!(SINE_TABLE.get(60), None);
    }

    #[test]
    fn test_advance_sequence() {
        let mut cursor = Cursor::new(57);
        let mut seen = Vec::new();
        for _ in 0..5 {
            let (value, next) = advance(cursor);
            seen.push((cursor.index(), value));
            cursor = next;
        }
        let indices: Vec<usize> = seen.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![57, 58, 59, 0, 1]);
        assert_eq!(seen[3].1, 0.0);
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn test_cursor_wraps() {
        assert_eq!(Cursor::new(60), Cursor::START);
        assert_eq!(Cursor::new(61).index(), 1);
        assert_eq!(Cursor::new(59).next(), Cursor::START);
    }

    #[test]
    fn test_full_period_returns_to_start() {
        let mut cursor = Cursor::new(23);
        for _ in 0..TABLE_LEN {
            cursor = advance(cursor).1;
        }
        assert_eq!(cursor.index(), 23);
    }
}
