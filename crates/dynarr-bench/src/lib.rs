//! Workload generators and drivers for benchmarking dynarr.
//!
//! Provides deterministic operation sequences:
//!
//! - [`fill_then_drain`]: `n` pushes followed by `n` front removals
//! - [`boundary_churn`]: alternating push/remove straddling a growth boundary
//! - [`scattered_removals`]: `n` pushes then removals at seeded indices
//!
//! [`run_dynarr`] and [`run_vec`] replay a sequence against [`DynArray`]
//! and `Vec` so the two can be compared on identical input.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use dynarr::DynArray;

/// One step of a benchmark workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Append a value.
    Push(u64),
    /// Remove the element at this index (ignored if out of range).
    Remove(usize),
}

/// `n` pushes, then `n` removals from index 0.
pub fn fill_then_drain(n: usize) -> Vec<Op> {
    let mut ops = Vec::with_capacity(n * 2);
    ops.extend((0..n as u64).map(Op::Push));
    ops.extend(std::iter::repeat(Op::Remove(0)).take(n));
    ops
}

/// Fill to exactly `boundary` elements, then alternate one push and one
/// tail removal `rounds` times.
///
/// With the default policy and a power-of-two `boundary >= 8`, the first
/// extra push grows storage once and nothing afterwards reallocates.
pub fn boundary_churn(boundary: usize, rounds: usize) -> Vec<Op> {
    let mut ops = Vec::with_capacity(boundary + rounds * 2);
    ops.extend((0..boundary as u64).map(Op::Push));
    for r in 0..rounds {
        ops.push(Op::Push(r as u64));
        ops.push(Op::Remove(boundary));
    }
    ops
}

/// `n` pushes, then `n` removals at pseudo-random in-range indices.
pub fn scattered_removals(n: usize, seed: u64) -> Vec<Op> {
    let mut ops = Vec::with_capacity(n * 2);
    ops.extend((0..n as u64).map(Op::Push));
    let mut state = seed;
    for remaining in (1..=n).rev() {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ops.push(Op::Remove(((state >> 33) % remaining as u64) as usize));
    }
    ops
}

/// Replay `ops` against a fresh [`DynArray`] and return it.
pub fn run_dynarr(ops: &[Op]) -> DynArray<u64> {
    let mut arr = match DynArray::with_capacity(0) {
        Ok(arr) => arr,
        Err(e) => panic!("benchmark array allocation failed: {e}"),
    };
    for &op in ops {
        match op {
            Op::Push(v) => {
                if let Err(rejected) = arr.push(v) {
                    panic!("benchmark push failed: {rejected}");
                }
            }
            Op::Remove(i) => {
                arr.remove(i);
            }
        }
    }
    arr
}

/// Replay `ops` against a fresh `Vec` and return it.
pub fn run_vec(ops: &[Op]) -> Vec<u64> {
    let mut v = Vec::new();
    for &op in ops {
        match op {
            Op::Push(x) => v.push(x),
            Op::Remove(i) => {
                if i < v.len() {
                    v.remove(i);
                }
            }
        }
    }
    v
}
