pub mod dj_homomorphic;

pub use dj_homomorphic::{add, multiply_by_constant, rerandomize, rerandomize_with_rng};
