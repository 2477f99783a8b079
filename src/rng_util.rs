/// Draw `true` with probability `p`.
///
/// `p == 0.0` never hits and `p == 1.0` always does.
#[inline]
pub(crate) fn bernoulli(rng: &mut fastrand::Rng, p: f64) -> bool {
    rng.f64() < p
}

/// Pick an index in `0..n` uniformly, never returning `excluded`.
///
/// Callers guarantee `n >= 2` and `excluded < n`.
#[inline]
pub(crate) fn usize_excluding(rng: &mut fastrand::Rng, n: usize, excluded: usize) -> usize {
    let k = rng.usize(0..n - 1);
    if k >= excluded { k + 1 } else { k }
}
