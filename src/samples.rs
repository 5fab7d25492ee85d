//! Pure helpers for sample-sequence arithmetic.
//!
//! These functions are the building blocks the [`Sound`](crate::Sound)
//! effects are composed from. They never touch a `Sound` directly: each one
//! takes slices and returns a fresh vector, so they are also usable on any
//! numeric sequence.

use rand::Rng;
use std::fmt;
use std::ops::{Add, Mul};

/// Error returned when a circular rotation is requested on an empty
/// sequence.
///
/// An empty sequence has no well-defined effective rotation (the shift is
/// reduced modulo the length), so the degenerate case is rejected instead
/// of wrapping around a zero-length buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyRotation;

impl fmt::Display for EmptyRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot rotate an empty sequence")
    }
}

impl std::error::Error for EmptyRotation {}

/// Multiplies every element of `seq` by `factor`.
///
/// # Examples
///
/// ```
/// use ditty::samples::scale;
///
/// assert_eq!(scale(&[1.0, -2.0, 3.0], 2.0), vec![2.0, -4.0, 6.0]);
/// ```
pub fn scale<T>(seq: &[T], factor: T) -> Vec<T>
where
    T: Mul<Output = T> + Copy,
{
    seq.iter().map(|&x| factor * x).collect()
}

/// Circularly rotates `seq` to the right by `n` positions.
///
/// `n` may exceed the sequence length; the effective rotation is
/// `n % seq.len()`. Elements shifted past the end wrap around to the
/// beginning, so the length is always preserved.
///
/// # Errors
///
/// Returns [`EmptyRotation`] when `seq` is empty.
///
/// # Examples
///
/// ```
/// use ditty::samples::shift_right;
///
/// assert_eq!(shift_right(&[1, 2, 3, 4, 5], 2).unwrap(), vec![4, 5, 1, 2, 3]);
/// // a full revolution plus two
/// assert_eq!(shift_right(&[1, 2, 3, 4, 5], 7).unwrap(), vec![4, 5, 1, 2, 3]);
/// ```
pub fn shift_right<T: Clone>(seq: &[T], n: usize) -> Result<Vec<T>, EmptyRotation> {
    if seq.is_empty() {
        return Err(EmptyRotation);
    }
    let mut out = seq.to_vec();
    out.rotate_right(n % seq.len());
    Ok(out)
}

/// Rotates `seq` to the right by a single position.
///
/// Convenience form of [`shift_right`] with `n = 1`.
pub fn shift_right_one<T: Clone>(seq: &[T]) -> Result<Vec<T>, EmptyRotation> {
    shift_right(seq, 1)
}

/// Adds two sequences pairwise.
///
/// The result is truncated to the shorter input; the extra tail of the
/// longer sequence is silently dropped.
///
/// # Examples
///
/// ```
/// use ditty::samples::elementwise_add;
///
/// assert_eq!(elementwise_add(&[1, 2, 3, 4, 5], &[10, 20, 30]), vec![11, 22, 33]);
/// ```
pub fn elementwise_add<T>(a: &[T], b: &[T]) -> Vec<T>
where
    T: Add<Output = T> + Copy,
{
    a.iter().zip(b.iter()).map(|(&x, &y)| x + y).collect()
}

/// Scales each sequence by its factor, then adds them pairwise.
///
/// Truncates to the shorter input, like [`elementwise_add`].
pub fn scaled_add<T>(a: &[T], b: &[T], factor_a: T, factor_b: T) -> Vec<T>
where
    T: Add<Output = T> + Mul<Output = T> + Copy,
{
    elementwise_add(&scale(a, factor_a), &scale(b, factor_b))
}

/// Sums a collection of sequences elementwise.
///
/// The result is truncated to the shortest sequence; an empty collection
/// sums to an empty vector.
///
/// # Examples
///
/// ```
/// use ditty::samples::elementwise_add_n;
///
/// let sums = elementwise_add_n(&[&[1, 2, 3][..], &[10, 20][..], &[100, 200, 300][..]]);
/// assert_eq!(sums, vec![111, 222]);
/// ```
pub fn elementwise_add_n<T>(seqs: &[&[T]]) -> Vec<T>
where
    T: Add<Output = T> + Copy,
{
    let Some(shortest) = seqs.iter().map(|s| s.len()).min() else {
        return Vec::new();
    };
    (0..shortest)
        .map(|i| seqs[1..].iter().fold(seqs[0][i], |acc, s| acc + s[i]))
        .collect()
}

/// Scales each sequence by its paired factor, then sums them elementwise.
///
/// Sequences and factors are paired up zip-style: an unpaired sequence or
/// factor is ignored. The sum truncates to the shortest scaled sequence.
pub fn scaled_add_n<T>(seqs: &[&[T]], factors: &[T]) -> Vec<T>
where
    T: Add<Output = T> + Mul<Output = T> + Copy,
{
    let scaled: Vec<Vec<T>> = seqs
        .iter()
        .zip(factors)
        .map(|(s, &f)| scale(s, f))
        .collect();
    let views: Vec<&[T]> = scaled.iter().map(Vec::as_slice).collect();
    elementwise_add_n(&views)
}

/// Replaces each element, with independent probability `p`, by a uniform
/// random value in [-32768.0, 32767.0], keeping it unchanged otherwise.
///
/// Uses the thread-local generator, so results are not reproducible; use
/// [`jitter_with_rng`] with a seeded generator when they need to be.
pub fn jitter(seq: &[f64], p: f64) -> Vec<f64> {
    jitter_with_rng(seq, p, &mut rand::thread_rng())
}

/// Like [`jitter`], with a caller-supplied random number generator.
///
/// # Examples
///
/// ```
/// use ditty::samples::jitter_with_rng;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let out = jitter_with_rng(&[1.0, 2.0, 3.0], 0.0, &mut rng);
/// assert_eq!(out, vec![1.0, 2.0, 3.0]);
/// ```
pub fn jitter_with_rng<R: Rng>(seq: &[f64], p: f64, rng: &mut R) -> Vec<f64> {
    let p = p.clamp(0.0, 1.0);
    seq.iter()
        .map(|&x| {
            if rng.gen_bool(p) {
                rng.gen_range(-32768.0..=32767.0)
            } else {
                x
            }
        })
        .collect()
}
