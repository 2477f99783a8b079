//! One-hot layout of categorical parameters inside the full sample vector.
//!
//! Every non-boolean categorical parameter occupies a contiguous block of
//! dimensions, one per category. An [`Encoding`] reports the cardinality and
//! start offset of each block, in catalog order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parameter::Param;

/// Block layout of the non-boolean categorical parameters.
pub trait Encoding {
    /// Cardinality of each categorical group, in catalog order.
    fn n_values(&self) -> &[usize];

    /// Start offset of each group's block within the full vector.
    fn start_indices(&self) -> &[usize];

    /// Collapse one-hot blocks back to compact category indices.
    ///
    /// Returns `None` when no decoder is configured, in which case repaired
    /// samples stay in one-hot form.
    fn decode(&self, sample: &[f64]) -> Option<Vec<f64>> {
        let _ = sample;
        None
    }
}

/// Index of the largest value in `values`, first occurrence on ties.
///
/// `NaN` entries never win; an all-`NaN` block resolves to index `0`.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map_or(0, |(i, _)| i)
}

/// Check that `start_indices` describes ordered, non-overlapping blocks.
///
/// A trailing sentinel entry marking the end of the last block is accepted
/// and stripped.
fn validate_blocks(n_values: &[usize], mut start_indices: Vec<usize>) -> Result<Vec<usize>> {
    if start_indices.len() == n_values.len() + 1 {
        let end = start_indices.pop().unwrap_or_default();
        if let (Some(&last_start), Some(&last_n)) = (start_indices.last(), n_values.last()) {
            if end < last_start + last_n {
                return Err(Error::InvalidEncoding(format!(
                    "end offset {end} falls inside the last block"
                )));
            }
        }
    }
    if start_indices.len() != n_values.len() {
        return Err(Error::InvalidEncoding(format!(
            "{} cardinalities but {} start offsets",
            n_values.len(),
            start_indices.len()
        )));
    }
    if let Some(k) = n_values.iter().position(|&n| n == 0) {
        return Err(Error::InvalidEncoding(format!(
            "categorical {k} has no categories"
        )));
    }
    for (k, (pair, &prev_n)) in start_indices.windows(2).zip(n_values).enumerate() {
        let prev_end = pair[0] + prev_n;
        if pair[1] < prev_end {
            return Err(Error::InvalidEncoding(format!(
                "categorical {} starts at {} inside the previous block ending at {prev_end}",
                k + 1,
                pair[1]
            )));
        }
    }
    Ok(start_indices)
}

/// The standard one-hot layout: each categorical block sits where the
/// catalog places it, and booleans keep a single dimension.
///
/// # Examples
///
/// ```
/// use tunespace::encoding::{Encoding, OneHotEncoding};
/// use tunespace::parameter::Param;
///
/// let params = [Param::float(), Param::categorical(), Param::boolean(), Param::categorical()];
/// let encoding = OneHotEncoding::new(&params, vec![3, 2]).unwrap();
///
/// assert_eq!(encoding.n_values(), &[3, 2]);
/// assert_eq!(encoding.start_indices(), &[1, 5]);
/// assert_eq!(
///     encoding.encode(&[0.5, 2.0, 1.0, 0.0]).unwrap(),
///     vec![0.5, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0]
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OneHotEncoding {
    n_values: Vec<usize>,
    start_indices: Vec<usize>,
    decoder: bool,
}

impl OneHotEncoding {
    /// Derive block offsets by walking `params` in order.
    ///
    /// `n_values` lists the cardinality of each non-boolean categorical
    /// parameter in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEncoding`] if `n_values` does not have one
    /// entry per non-boolean categorical parameter, or if any is zero.
    pub fn new(params: &[Param], n_values: Vec<usize>) -> Result<Self> {
        let n_groups = params
            .iter()
            .filter(|p| p.is_categorical() && !p.is_boolean())
            .count();
        if n_groups != n_values.len() {
            return Err(Error::InvalidEncoding(format!(
                "catalog has {n_groups} categorical parameters but {} cardinalities were given",
                n_values.len()
            )));
        }

        let mut start_indices = Vec::with_capacity(n_groups);
        let mut offset = 0;
        let mut cat_idx = 0;
        for param in params {
            if param.is_categorical() && !param.is_boolean() {
                start_indices.push(offset);
                offset += n_values[cat_idx];
                cat_idx += 1;
            } else {
                offset += 1;
            }
        }

        let start_indices = validate_blocks(&n_values, start_indices)?;
        Ok(Self {
            n_values,
            start_indices,
            decoder: false,
        })
    }

    /// Accept block offsets verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEncoding`] if the lengths disagree, a
    /// cardinality is zero, or blocks overlap or run backwards.
    pub fn from_parts(n_values: Vec<usize>, start_indices: Vec<usize>) -> Result<Self> {
        let start_indices = validate_blocks(&n_values, start_indices)?;
        Ok(Self {
            n_values,
            start_indices,
            decoder: false,
        })
    }

    /// Enable [`decode`](Encoding::decode), so repaired configurations are
    /// returned with compact category indices instead of one-hot blocks.
    #[must_use]
    pub fn with_decoder(mut self) -> Self {
        self.decoder = true;
        self
    }

    /// Total number of dimensions taken by all one-hot blocks.
    #[must_use]
    pub fn categorical_width(&self) -> usize {
        self.n_values.iter().sum()
    }

    /// Expand compact category indices into one-hot blocks.
    ///
    /// `compact` holds one entry per parameter; each categorical entry is a
    /// category index in `0..n_values[k]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `compact` is too short to hold
    /// every categorical group and [`Error::IllegalCategoricalState`] if a
    /// categorical entry is not a valid index.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn encode(&self, compact: &[f64]) -> Result<Vec<f64>> {
        let mut compact_starts = Vec::with_capacity(self.n_values.len());
        let mut shrink = 0;
        for (&start, &n) in self.start_indices.iter().zip(&self.n_values) {
            compact_starts.push(start - shrink);
            shrink += n - 1;
        }
        if let Some(&last) = compact_starts.last() {
            if compact.len() <= last {
                return Err(Error::DimensionMismatch {
                    expected: last + 1,
                    got: compact.len(),
                });
            }
        }

        let mut out = Vec::with_capacity(compact.len() + shrink);
        let mut group = 0;
        for (i, &v) in compact.iter().enumerate() {
            if compact_starts.get(group) == Some(&i) {
                let n = self.n_values[group];
                if !(v.is_finite() && v >= 0.0 && v.fract() == 0.0 && (v as usize) < n) {
                    return Err(Error::IllegalCategoricalState {
                        group,
                        values: vec![v],
                    });
                }
                let hot = v as usize;
                out.extend((0..n).map(|c| if c == hot { 1.0 } else { 0.0 }));
                group += 1;
            } else {
                out.push(v);
            }
        }
        Ok(out)
    }
}

impl Encoding for OneHotEncoding {
    fn n_values(&self) -> &[usize] {
        &self.n_values
    }

    fn start_indices(&self) -> &[usize] {
        &self.start_indices
    }

    #[allow(clippy::cast_precision_loss)]
    fn decode(&self, sample: &[f64]) -> Option<Vec<f64>> {
        if !self.decoder {
            return None;
        }
        let mut out = Vec::with_capacity(sample.len());
        let mut group = 0;
        let mut i = 0;
        while i < sample.len() {
            if self.start_indices.get(group) == Some(&i) {
                let n = self.n_values[group];
                let end = (i + n).min(sample.len());
                out.push(argmax(&sample[i..end]) as f64);
                i += n;
                group += 1;
            } else {
                out.push(sample[i]);
                i += 1;
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_occurrence() {
        assert_eq!(argmax(&[0.2, 0.7, 0.7, 0.1]), 1);
        assert_eq!(argmax(&[-1.0, -3.0]), 0);
        assert_eq!(argmax(&[f64::NAN, 0.1, 0.3]), 2);
        assert_eq!(argmax(&[f64::NAN, f64::NAN]), 0);
    }

    #[test]
    fn test_new_walks_catalog() {
        let params = [
            Param::categorical(),
            Param::int(),
            Param::boolean(),
            Param::categorical(),
            Param::float(),
        ];
        let encoding = OneHotEncoding::new(&params, vec![2, 4]).unwrap();
        assert_eq!(encoding.start_indices(), &[0, 4]);
        assert_eq!(encoding.categorical_width(), 6);
    }

    #[test]
    fn test_new_rejects_wrong_group_count() {
        let params = [Param::categorical(), Param::boolean()];
        assert!(matches!(
            OneHotEncoding::new(&params, vec![3, 2]),
            Err(Error::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_from_parts_validation() {
        assert!(OneHotEncoding::from_parts(vec![2, 3], vec![1, 3]).is_ok());
        // trailing end offset is accepted
        let enc = OneHotEncoding::from_parts(vec![2, 3], vec![1, 3, 6]).unwrap();
        assert_eq!(enc.start_indices(), &[1, 3]);
        // overlapping blocks
        assert!(OneHotEncoding::from_parts(vec![2, 3], vec![1, 2]).is_err());
        // zero cardinality
        assert!(OneHotEncoding::from_parts(vec![0], vec![0]).is_err());
        // length mismatch
        assert!(OneHotEncoding::from_parts(vec![2], vec![0, 2, 4]).is_err());
    }

    #[test]
    fn test_decode_requires_decoder() {
        let enc = OneHotEncoding::from_parts(vec![3], vec![1]).unwrap();
        assert_eq!(enc.decode(&[0.5, 0.0, 1.0, 0.0]), None);

        let enc = enc.with_decoder();
        assert_eq!(enc.decode(&[0.5, 0.0, 1.0, 0.0, 7.0]), Some(vec![0.5, 1.0, 7.0]));
    }

    #[test]
    fn test_encode_decode_inverse() {
        let params = [Param::float(), Param::categorical(), Param::categorical()];
        let enc = OneHotEncoding::new(&params, vec![3, 2]).unwrap().with_decoder();
        let compact = [0.25, 2.0, 0.0];
        let one_hot = enc.encode(&compact).unwrap();
        assert_eq!(one_hot, vec![0.25, 0.0, 0.0, 1.0, 1.0, 0.0]);
        assert_eq!(enc.decode(&one_hot).unwrap(), compact.to_vec());
    }

    #[test]
    fn test_encode_rejects_bad_index() {
        let enc = OneHotEncoding::from_parts(vec![3], vec![0]).unwrap();
        assert!(matches!(
            enc.encode(&[3.0]),
            Err(Error::IllegalCategoricalState { group: 0, .. })
        ));
        assert!(enc.encode(&[0.5]).is_err());
        assert!(matches!(
            enc.encode(&[]),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
