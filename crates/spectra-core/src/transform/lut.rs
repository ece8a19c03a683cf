//! 33³ color grids and trilinear sampling.

use crate::error::{LutError, LutResult};

/// Grid points per axis.
pub const GRID_SIZE: usize = 33;
/// Largest valid index on any axis.
pub const GRID_MAX_INDEX: usize = GRID_SIZE - 1;
/// Number of RGB entries in a grid.
pub const GRID_ENTRIES: usize = GRID_SIZE * GRID_SIZE * GRID_SIZE;

/// An immutable 3D lookup table mapping normalized RGB to graded RGB.
///
/// Entries are stored flat with blue as the outermost and red as the
/// innermost axis, so entry `(r, g, b)` lives at `(b * 33 + g) * 33 + r`.
/// This is also the row order of `.cube` files. Every component is finite
/// and within [0, 1]; the constructors enforce it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGrid {
    entries: Vec<[f32; 3]>,
}

impl ColorGrid {
    /// A grid whose every entry equals its own coordinate.
    pub fn identity() -> Self {
        Self::from_fn(|rgb| rgb)
    }

    /// Build a grid by evaluating `f` at every grid point.
    ///
    /// `f` receives the normalized coordinate of the point; its output is
    /// clamped to [0, 1] (NaN becomes 0).
    pub fn from_fn(mut f: impl FnMut([f32; 3]) -> [f32; 3]) -> Self {
        let step = GRID_MAX_INDEX as f32;
        let mut entries = Vec::with_capacity(GRID_ENTRIES);
        for b in 0..GRID_SIZE {
            for g in 0..GRID_SIZE {
                for r in 0..GRID_SIZE {
                    let out = f([r as f32 / step, g as f32 / step, b as f32 / step]);
                    entries.push(out.map(|c| c.max(0.0).min(1.0)));
                }
            }
        }
        Self { entries }
    }

    /// Wrap a flat list of RGB entries in blue-green-red major order.
    pub fn from_entries(entries: Vec<[f32; 3]>) -> LutResult<Self> {
        if entries.len() != GRID_ENTRIES {
            return Err(LutError::EntryCount {
                expected: GRID_ENTRIES,
                found: entries.len(),
            });
        }
        for (index, value) in entries.iter().flatten().enumerate() {
            if !(0.0..=1.0).contains(value) {
                return Err(LutError::ValueOutOfRange {
                    index: index / 3,
                    value: *value,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Build a grid from interleaved `r, g, b` floats.
    pub fn from_flat(values: &[f32]) -> LutResult<Self> {
        if values.len() != GRID_ENTRIES * 3 {
            return Err(LutError::EntryCount {
                expected: GRID_ENTRIES * 3,
                found: values.len(),
            });
        }
        let entries: &[[f32; 3]] = bytemuck::cast_slice(values);
        Self::from_entries(entries.to_vec())
    }

    /// Build a grid from a raw little-endian `f32` blob.
    ///
    /// This is the compiled asset form: 33×33×33 triples, no header.
    pub fn from_le_bytes(bytes: &[u8]) -> LutResult<Self> {
        let expected = GRID_ENTRIES * 3 * size_of::<f32>();
        if bytes.len() != expected {
            return Err(LutError::ByteLength {
                expected,
                found: bytes.len(),
            });
        }
        let values: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Self::from_flat(&values)
    }

    /// The entries in storage order.
    pub fn entries(&self) -> &[[f32; 3]] {
        &self.entries
    }

    /// The entries as interleaved floats.
    pub fn as_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.entries)
    }

    /// Entry at integer grid coordinates. Panics if any index exceeds 32.
    #[inline(always)]
    pub fn entry(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.entries[(b * GRID_SIZE + g) * GRID_SIZE + r]
    }

    /// Map an RGB triple through this grid using trilinear interpolation.
    ///
    /// Inputs are clamped to [0, 1] before indexing, so values at or past
    /// either end sample the edge cells. Blending runs along red, then
    /// green, then blue, per output channel, and the result is clamped.
    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let (x0, x1, dx) = axis(rgb[0]);
        let (y0, y1, dy) = axis(rgb[1]);
        let (z0, z1, dz) = axis(rgb[2]);

        let p000 = self.entry(x0, y0, z0);
        let p100 = self.entry(x1, y0, z0);
        let p010 = self.entry(x0, y1, z0);
        let p110 = self.entry(x1, y1, z0);
        let p001 = self.entry(x0, y0, z1);
        let p101 = self.entry(x1, y0, z1);
        let p011 = self.entry(x0, y1, z1);
        let p111 = self.entry(x1, y1, z1);

        let mut out = [0.0; 3];
        for c in 0..3 {
            let c00 = p000[c] * (1.0 - dx) + p100[c] * dx;
            let c10 = p010[c] * (1.0 - dx) + p110[c] * dx;
            let c01 = p001[c] * (1.0 - dx) + p101[c] * dx;
            let c11 = p011[c] * (1.0 - dx) + p111[c] * dx;

            let c0 = c00 * (1.0 - dy) + c10 * dy;
            let c1 = c01 * (1.0 - dy) + c11 * dy;

            out[c] = (c0 * (1.0 - dz) + c1 * dz).max(0.0).min(1.0);
        }
        out
    }
}

/// Sample `grid`, or pass `rgb` through untouched when no grid is active.
#[inline(always)]
pub fn sample(grid: Option<&ColorGrid>, rgb: [f32; 3]) -> [f32; 3] {
    match grid {
        Some(grid) => grid.apply(rgb),
        None => rgb,
    }
}

/// Base index, opposite index and fractional weight for one axis.
#[inline(always)]
fn axis(v: f32) -> (usize, usize, f32) {
    let pos = v.max(0.0).min(1.0) * GRID_MAX_INDEX as f32;
    let base = (pos as usize).min(GRID_MAX_INDEX);
    let frac = pos - base as f32;
    (base, (base + 1).min(GRID_MAX_INDEX), frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    /// A non-separable grid so axis mix-ups show up in results.
    fn swizzle_grid() -> ColorGrid {
        ColorGrid::from_fn(|[r, g, b]| [b, r * 0.5 + g * 0.5, g * g])
    }

    #[test]
    fn test_bypass_is_exact_identity() {
        for rgb in [[0.0, 0.0, 0.0], [0.1234, 0.5, 0.999], [1.0, 1.0, 1.0]] {
            assert_eq!(sample(None, rgb), rgb);
        }
    }

    #[test]
    fn test_corners_are_exact() {
        let grid = swizzle_grid();
        let step = GRID_MAX_INDEX as f32;
        for b in 0..GRID_SIZE {
            for g in 0..GRID_SIZE {
                for r in 0..GRID_SIZE {
                    let rgb = [r as f32 / step, g as f32 / step, b as f32 / step];
                    assert_eq!(grid.apply(rgb), grid.entry(r, g, b), "corner ({r}, {g}, {b})");
                }
            }
        }
    }

    #[test]
    fn test_identity_grid_reproduces_input() {
        let grid = ColorGrid::identity();
        for rgb in [[0.3, 0.6, 0.9], [0.01, 0.99, 0.5], [0.77, 0.0, 0.23]] {
            let out = grid.apply(rgb);
            for c in 0..3 {
                assert!((out[c] - rgb[c]).abs() < EPSILON, "{rgb:?} -> {out:?}");
            }
        }
    }

    #[test]
    fn test_axis_order_blue_outer_red_inner() {
        let grid = ColorGrid::from_fn(|[r, g, b]| [r, g, b]);
        let step = GRID_MAX_INDEX as f32;
        assert_eq!(grid.entries()[1], [1.0 / step, 0.0, 0.0]);
        assert_eq!(grid.entries()[GRID_SIZE], [0.0, 1.0 / step, 0.0]);
        assert_eq!(grid.entries()[GRID_SIZE * GRID_SIZE], [0.0, 0.0, 1.0 / step]);
    }

    #[test]
    fn test_midpoint_interpolates_linearly() {
        let grid = swizzle_grid();
        let half = 0.5 / GRID_MAX_INDEX as f32;
        // Halfway between red index 0 and 1, everything else on a grid point.
        let out = grid.apply([half, 0.0, 0.0]);
        let a = grid.entry(0, 0, 0);
        let b = grid.entry(1, 0, 0);
        for c in 0..3 {
            assert!((out[c] - (a[c] + b[c]) * 0.5).abs() < EPSILON);
        }
    }

    #[test]
    fn test_edge_clamping() {
        assert_eq!(axis(1.0), (GRID_MAX_INDEX, GRID_MAX_INDEX, 0.0));
        assert_eq!(axis(7.5), (GRID_MAX_INDEX, GRID_MAX_INDEX, 0.0));
        assert_eq!(axis(0.0), (0, 1, 0.0));
        assert_eq!(axis(-3.0), (0, 1, 0.0));
        assert_eq!(axis(f32::NAN), (0, 1, 0.0));

        let grid = swizzle_grid();
        assert_eq!(grid.apply([2.0, 5.0, 1.5]), grid.entry(32, 32, 32));
        assert_eq!(grid.apply([-1.0, -0.5, -9.0]), grid.entry(0, 0, 0));
    }

    #[test]
    fn test_output_is_clamped() {
        let grid = ColorGrid::from_fn(|_| [1.0, 1.0, 1.0]);
        let out = grid.apply([0.37, 0.61, 0.83]);
        assert!(out.iter().all(|c| *c <= 1.0));
    }

    #[test]
    fn test_from_entries_rejects_wrong_count() {
        let err = ColorGrid::from_entries(vec![[0.0; 3]; 17 * 17 * 17]).unwrap_err();
        assert!(matches!(err, LutError::EntryCount { found: 4913, .. }));
    }

    #[test]
    fn test_from_entries_rejects_out_of_range() {
        let mut entries = ColorGrid::identity().entries().to_vec();
        entries[42][1] = 1.5;
        let err = ColorGrid::from_entries(entries).unwrap_err();
        assert!(matches!(err, LutError::ValueOutOfRange { index: 42, .. }));

        let mut entries = ColorGrid::identity().entries().to_vec();
        entries[7][0] = f32::NAN;
        assert!(ColorGrid::from_entries(entries).is_err());
    }

    #[test]
    fn test_flat_and_byte_forms_agree() {
        let grid = swizzle_grid();
        let flat = grid.as_flat();
        assert_eq!(flat.len(), GRID_ENTRIES * 3);
        assert_eq!(ColorGrid::from_flat(flat).unwrap(), grid);

        let bytes: Vec<u8> = flat.iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(ColorGrid::from_le_bytes(&bytes).unwrap(), grid);
        let err = ColorGrid::from_le_bytes(&bytes[..bytes.len() - 4]).unwrap_err();
        assert!(matches!(
            err,
            LutError::ByteLength { expected: 431_244, found: 431_240 }
        ));
        assert_eq!(err.to_string(), "expected 431244 bytes, found 431240");
    }
}
