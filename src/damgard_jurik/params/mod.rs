mod params;

pub use params::{KeyGenParams, MAX_KEYGEN_ATTEMPTS, MAX_RANDOMIZER_ATTEMPTS, MAX_S};
