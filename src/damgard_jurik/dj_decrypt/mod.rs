pub mod dj_decrypt;

pub use dj_decrypt::{decrypt, extract_exponent};
