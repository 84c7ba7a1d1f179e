//! chess-tree-util - helpers for exercising move trees with random data.
//!
//! The [`Fuzzer`] produces reproducible sequences when seeded, so a failing
//! randomized test can be replayed from the seed it prints.

pub mod fuzzer;

pub use fuzzer::{Fuzzer, SAMPLE_MOVES};
