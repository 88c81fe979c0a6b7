pub mod dj_keygen;

pub use dj_keygen::{
    generate_keypair, generate_keypair_with, CrtFactors, KeyGenParams, KeyPair, PrivateKey,
    PublicKey, MAX_KEYGEN_ATTEMPTS, MAX_S,
};
