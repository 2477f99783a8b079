//! Discrete search over the categorical part of the space.
//!
//! The combination space treats every boolean and every category of every
//! categorical group as an independent bit. Rows of the grid are therefore
//! corners of the relaxed hypercube, most of which are not legal one-hot
//! assignments; callers repair merged candidates with
//! [`ConstraintHelper::valid_config`] before treating them as real
//! configurations.

use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::scaling::Scaler;

use super::ConstraintHelper;

impl<S: Scaler, E: Encoding> ConstraintHelper<S, E> {
    /// Build a grid of categorical bit assignments in scaled units.
    ///
    /// If the combination space holds at most `max_size` rows it is
    /// enumerated in full, first column most significant. Otherwise
    /// `max_size` rows of independent fair coin flips are drawn from `rng`.
    /// Columns follow the order of the `false` entries of
    /// [`numerical_mask`](Self::numerical_mask) and are scaled by a
    /// sub-scaler restricted to those dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCategoricalParameters`] for an all-numeric space,
    /// or propagates scaler errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use tunespace::prelude::*;
    ///
    /// let params = vec![Param::float(), Param::boolean(), Param::categorical()];
    /// let encoding = OneHotEncoding::new(&params, vec![2]).unwrap();
    /// let helper = ConstraintHelper::new(params, IdentityScaler::new(4), encoding).unwrap();
    ///
    /// let mut rng = fastrand::Rng::with_seed(0);
    /// let grid = helper.categorical_grid(100, &mut rng).unwrap();
    /// assert_eq!(grid.len(), 8);
    /// assert_eq!(grid[5], vec![1.0, 0.0, 1.0]);
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    pub fn categorical_grid(
        &self,
        max_size: usize,
        rng: &mut fastrand::Rng,
    ) -> Result<Vec<Vec<f64>>> {
        let bits = self.combination_bit_width()?;
        let size = self.combination_space_size()?;

        let grid: Vec<Vec<f64>> = if should_enumerate(bits, size, max_size) {
            trace_debug!(rows = size, bits, "enumerating full combination grid");
            (0..size)
                .map(|row| {
                    (0..bits)
                        .map(|col| {
                            let shift = (bits - 1 - col) as u32;
                            if (row >> shift) & 1 == 1 { 1.0 } else { 0.0 }
                        })
                        .collect()
                })
                .collect()
        } else {
            trace_debug!(
                rows = max_size,
                bits,
                "combination space too large, sampling hypercube corners"
            );
            (0..max_size)
                .map(|_| {
                    (0..bits)
                        .map(|_| if rng.bool() { 1.0 } else { 0.0 })
                        .collect()
                })
                .collect()
        };

        let cat_mask: Vec<bool> = self.numerical_mask()?.iter().map(|&n| !n).collect();
        let cat_scaler = self.scaler.restrict(&cat_mask)?;
        cat_scaler.transform_rows(&grid)
    }

    /// [`categorical_grid`](Self::categorical_grid) capped at the configured
    /// [`max_grid_size`](Self::max_grid_size).
    ///
    /// # Errors
    ///
    /// As for [`categorical_grid`](Self::categorical_grid).
    pub fn categorical_grid_default(&self, rng: &mut fastrand::Rng) -> Result<Vec<Vec<f64>>> {
        self.categorical_grid(self.max_grid_size, rng)
    }

    /// Interleave a combination grid with a fixed numeric assignment.
    ///
    /// Each output row has full width: positions where the numerical mask is
    /// `true` take the next value of `numeric`, the rest take the next column
    /// of the grid row. Both inputs are expected in scaled units.
    ///
    /// # Errors
    ///
    /// - [`Error::ShapeMismatch`] if grid columns plus `numeric.len()` differ
    ///   from the full width.
    /// - [`Error::NonFiniteValue`] if any merged cell is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use tunespace::prelude::*;
    ///
    /// let params = vec![Param::float(), Param::categorical(), Param::int()];
    /// let encoding = OneHotEncoding::new(&params, vec![3]).unwrap();
    /// let helper = ConstraintHelper::new(params, IdentityScaler::new(5), encoding).unwrap();
    ///
    /// let merged = helper.merge_grid(&[vec![1.0, 2.0, 3.0]], &[-1.0, -2.0]).unwrap();
    /// assert_eq!(merged, vec![vec![-1.0, 1.0, 2.0, 3.0, -2.0]]);
    /// ```
    pub fn merge_grid(&self, combo_grid: &[Vec<f64>], numeric: &[f64]) -> Result<Vec<Vec<f64>>> {
        let mask = self.numerical_mask()?;
        let n_numeric = mask.iter().filter(|&&n| n).count();

        if combo_grid.is_empty() && numeric.len() != n_numeric {
            return Err(Error::ShapeMismatch {
                expected: mask.len(),
                got: mask.len() - n_numeric + numeric.len(),
            });
        }

        let mut data_grid = Vec::with_capacity(combo_grid.len());
        for (row_idx, combo_row) in combo_grid.iter().enumerate() {
            let ncols = combo_row.len() + numeric.len();
            if ncols != mask.len() {
                return Err(Error::ShapeMismatch {
                    expected: mask.len(),
                    got: ncols,
                });
            }
            if numeric.len() != n_numeric {
                return Err(Error::ShapeMismatch {
                    expected: n_numeric,
                    got: numeric.len(),
                });
            }

            let mut row = Vec::with_capacity(ncols);
            let (mut combo_idx, mut conf_idx) = (0, 0);
            for &is_numeric in &mask {
                if is_numeric {
                    row.push(numeric[conf_idx]);
                    conf_idx += 1;
                } else {
                    row.push(combo_row[combo_idx]);
                    combo_idx += 1;
                }
            }

            if let Some(column) = row.iter().position(|v| !v.is_finite()) {
                return Err(Error::NonFiniteValue {
                    row: row_idx,
                    column,
                });
            }
            data_grid.push(row);
        }
        Ok(data_grid)
    }

    /// Build a categorical grid and merge it with `numeric` in one step.
    ///
    /// # Errors
    ///
    /// As for [`categorical_grid`](Self::categorical_grid) and
    /// [`merge_grid`](Self::merge_grid).
    pub fn candidate_grid(
        &self,
        numeric: &[f64],
        max_size: usize,
        rng: &mut fastrand::Rng,
    ) -> Result<Vec<Vec<f64>>> {
        let combo_grid = self.categorical_grid(max_size, rng)?;
        self.merge_grid(&combo_grid, numeric)
    }
}

/// Whether a `bits`-wide space of `size` rows fits under `max_size`.
///
/// `size` saturates at `u64::MAX` from 64 bits on, and row indices are
/// shifted as `u64`, so such spaces are always sampled.
fn should_enumerate(bits: usize, size: u64, max_size: usize) -> bool {
    bits < 64 && u64::try_from(max_size).is_ok_and(|max| size <= max)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::should_enumerate;
    use crate::encoding::OneHotEncoding;
    use crate::error::Error;
    use crate::helper::ConstraintHelper;
    use crate::parameter::Param;
    use crate::scaling::{IdentityScaler, Scaler, StandardScaler};

    fn helper() -> ConstraintHelper<IdentityScaler, OneHotEncoding> {
        let params = vec![Param::float(), Param::boolean(), Param::categorical()];
        let encoding = OneHotEncoding::new(&params, vec![3]).unwrap();
        ConstraintHelper::new(params, IdentityScaler::new(5), encoding).unwrap()
    }

    fn bits_key(row: &[f64]) -> Vec<u8> {
        row.iter().map(|&v| u8::from(v > 0.5)).collect()
    }

    #[test]
    fn test_full_enumeration() {
        let h = helper();
        let mut rng = fastrand::Rng::with_seed(0);
        let grid = h.categorical_grid(100, &mut rng).unwrap();
        assert_eq!(grid.len(), 16);
        assert_eq!(grid[0], vec![0.0; 4]);
        assert_eq!(grid[1], vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(grid[15], vec![1.0; 4]);
        let distinct: HashSet<_> = grid.iter().map(|r| bits_key(r)).collect();
        assert_eq!(distinct.len(), 16);
    }

    #[test]
    fn test_exact_fit_enumerates() {
        let h = helper();
        let mut rng = fastrand::Rng::with_seed(0);
        assert_eq!(h.categorical_grid(16, &mut rng).unwrap().len(), 16);
    }

    #[test]
    fn test_sampled_grid() {
        let h = helper();
        let mut rng = fastrand::Rng::with_seed(0);
        let grid = h.categorical_grid(8, &mut rng).unwrap();
        assert_eq!(grid.len(), 8);
        for row in &grid {
            assert_eq!(row.len(), 4);
            assert!(row.iter().all(|&v| v == 0.0 || v == 1.0));
        }
    }

    #[test]
    fn test_sampled_grid_is_reproducible() {
        let h = helper();
        let a = h
            .categorical_grid(5, &mut fastrand::Rng::with_seed(17))
            .unwrap();
        let b = h
            .categorical_grid(5, &mut fastrand::Rng::with_seed(17))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_should_enumerate() {
        assert!(should_enumerate(4, 16, 16));
        assert!(!should_enumerate(4, 16, 15));
        assert!(!should_enumerate(64, u64::MAX, usize::MAX));
        assert!(!should_enumerate(80, u64::MAX, usize::MAX));
    }

    #[test]
    fn test_saturated_space_is_sampled() {
        let params = vec![Param::categorical(), Param::categorical()];
        let encoding = OneHotEncoding::new(&params, vec![40, 30]).unwrap();
        let h = ConstraintHelper::new(params, IdentityScaler::new(70), encoding).unwrap();
        assert_eq!(h.combination_space_size().unwrap(), u64::MAX);

        let mut rng = fastrand::Rng::with_seed(9);
        let grid = h.categorical_grid(3, &mut rng).unwrap();
        assert_eq!(grid.len(), 3);
        assert!(grid.iter().all(|row| row.len() == 70));
    }

    #[test]
    fn test_grid_uses_restricted_scaler() {
        let params = vec![Param::float(), Param::boolean(), Param::categorical()];
        let encoding = OneHotEncoding::new(&params, vec![2]).unwrap();
        let scaler = StandardScaler::from_parts(
            vec![100.0, 0.5, 0.25, 0.75],
            vec![10.0, 0.5, 0.25, 0.25],
        )
        .unwrap();
        let h = ConstraintHelper::new(params, scaler.clone(), encoding).unwrap();
        let mut rng = fastrand::Rng::with_seed(0);

        let grid = h.categorical_grid(1000, &mut rng).unwrap();
        assert_eq!(grid.len(), 8);
        // row 0b011: bool 0, block [1, 1]
        assert_eq!(grid[3], vec![-1.0, 3.0, 1.0]);
        // shared scaler untouched
        assert_eq!(h.scaler(), &scaler);
        assert_eq!(h.scaler().n_features(), 4);
    }

    #[test]
    fn test_grid_requires_categoricals() {
        let params = vec![Param::float()];
        let encoding = OneHotEncoding::new(&params, vec![]).unwrap();
        let h = ConstraintHelper::new(params, IdentityScaler::new(1), encoding).unwrap();
        let mut rng = fastrand::Rng::with_seed(0);
        assert!(matches!(
            h.categorical_grid(10, &mut rng),
            Err(Error::NoCategoricalParameters)
        ));
    }

    #[test]
    fn test_merge_interleaves() {
        let params = vec![Param::float(), Param::categorical(), Param::int()];
        let encoding = OneHotEncoding::new(&params, vec![3]).unwrap();
        let h = ConstraintHelper::new(params, IdentityScaler::new(5), encoding).unwrap();
        assert_eq!(
            h.numerical_mask().unwrap(),
            vec![true, false, false, false, true]
        );

        let combo = vec![vec![0.0, 1.0, 0.0], vec![1.0, 1.0, 0.0]];
        let merged = h.merge_grid(&combo, &[7.0, 9.0]).unwrap();
        assert_eq!(merged[0], vec![7.0, 0.0, 1.0, 0.0, 9.0]);
        assert_eq!(merged[1], vec![7.0, 1.0, 1.0, 0.0, 9.0]);
    }

    #[test]
    fn test_merge_shape_mismatch() {
        let h = helper();
        assert!(matches!(
            h.merge_grid(&[vec![0.0; 4]], &[1.0, 2.0]),
            Err(Error::ShapeMismatch {
                expected: 5,
                got: 6
            })
        ));
        assert!(matches!(
            h.merge_grid(&[vec![0.0; 3]], &[1.0]),
            Err(Error::ShapeMismatch {
                expected: 5,
                got: 4
            })
        ));
        assert!(matches!(
            h.merge_grid(&[], &[]),
            Err(Error::ShapeMismatch {
                expected: 5,
                got: 4
            })
        ));
        assert!(h.merge_grid(&[], &[1.0]).unwrap().is_empty());
    }

    #[test]
    fn test_merge_rejects_non_finite() {
        let h = helper();
        assert!(matches!(
            h.merge_grid(&[vec![0.0, 1.0, f64::NAN, 0.0]], &[1.0]),
            Err(Error::NonFiniteValue { row: 0, column: 3 })
        ));
    }

    #[test]
    fn test_candidate_grid() {
        let h = helper();
        let mut rng = fastrand::Rng::with_seed(3);
        let grid = h.candidate_grid(&[0.42], 4, &mut rng).unwrap();
        assert_eq!(grid.len(), 4);
        for row in &grid {
            assert_eq!(row.len(), 5);
            assert!((row[0] - 0.42).abs() < f64::EPSILON);
        }
    }
}
