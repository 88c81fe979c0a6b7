pub mod dj_encrypt;

pub use dj_encrypt::{encrypt, encrypt_with_rng};
