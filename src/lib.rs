// Déclaration des modules
pub mod crypto_error;
pub mod damgard_jurik;
pub mod key_management;

pub use crate::damgard_jurik::math;
pub use crate::damgard_jurik::dj_keygen;
pub use crate::damgard_jurik::dj_encrypt;
pub use crate::damgard_jurik::dj_decrypt;
pub use crate::damgard_jurik::dj_homomorphic;

// Fonctions mathématiques principales
pub use crate::damgard_jurik::math::{l_function, gcd, lcm, mod_inverse, mod_pow, n_adic_digits};

// Types et génération de clés
pub use crate::damgard_jurik::dj_keygen::{
    generate_keypair, generate_keypair_with, KeyPair, PrivateKey, PublicKey,
};
pub use crate::damgard_jurik::params::{KeyGenParams, MAX_S};
pub use crate::damgard_jurik::primes::{OsPrimeSource, PrimeSource, RandomPrimeSource};

// Opérations
pub use crate::damgard_jurik::dj_encrypt::{encrypt, encrypt_with_rng};
pub use crate::damgard_jurik::dj_decrypt::decrypt;
pub use crate::damgard_jurik::dj_homomorphic::{
    add, multiply_by_constant, rerandomize, rerandomize_with_rng,
};
pub use crate::damgard_jurik::engine::Engine;

// Erreur centralisée
pub use crypto_error::{CryptoError, Result};
