//! Constant-time byte comparison for digest checks.

/// Returns true iff `a` and `b` are byte-for-byte equal.
///
/// Every byte pair is visited regardless of where the first difference
/// sits, so timing does not reveal the mismatch position. Length mismatch
/// returns early; digest lengths are fixed, so the length is not secret.
#[inline(never)]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let diff = a
        .iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));

    std::hint::black_box(diff) == 0
}
