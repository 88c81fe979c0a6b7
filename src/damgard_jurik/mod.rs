// Cryptosystème de Damgård-Jurik (Paillier généralisé, Paillier pour s = 1)

pub mod math;
pub mod params;
pub mod primes;
pub mod dj_keygen;
pub mod dj_encrypt;
pub mod dj_decrypt;
pub mod dj_homomorphic;
pub mod engine;
