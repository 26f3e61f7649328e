/// Upper bound (exclusive) on the height of a tree holding `len` items for it to count as
/// balanced: `2 * ln(len + 1) - 1`. Uses the natural logarithm.
pub(crate) fn balance_bound(len: usize) -> f64 {
    2.0 * ((len + 1) as f64).ln() - 1.0
}
