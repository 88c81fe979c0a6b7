use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand_core::{CryptoRng, OsRng, RngCore};
use tracing::{debug, warn};
use crate::crypto_error::{CryptoError, Result};
use crate::damgard_jurik::dj_keygen::PublicKey;
use crate::damgard_jurik::math::{gcd, mod_pow};
use crate::damgard_jurik::params::MAX_RANDOMIZER_ATTEMPTS;

// ---------------------------------------------------------------------------
// Chiffrement Damgård-Jurik : c = g^m · r^(n^s)  mod n^(s+1)
//
// Retourne Err(CryptoError::InvalidPlaintext) si m >= n^s.
// ---------------------------------------------------------------------------
pub fn encrypt(m: &BigUint, pk: &PublicKey) -> Result<BigUint> {
    encrypt_with_rng(m, pk, &mut OsRng)
}

/// Comme [`encrypt`], avec une source d'aléa propre à l'appelant.
pub fn encrypt_with_rng<R>(m: &BigUint, pk: &PublicKey, rng: &mut R) -> Result<BigUint>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if m >= pk.plaintext_modulus() {
        return Err(CryptoError::InvalidPlaintext);
    }

    let r = sample_randomizer(pk, rng)?;
    let n_s1 = pk.ciphertext_modulus();

    let g_m = mod_pow(pk.g(), m, n_s1)?;
    let r_ns = mod_pow(&r, pk.plaintext_modulus(), n_s1)?;
    Ok((g_m * r_ns) % n_s1)
}

// ---------------------------------------------------------------------------
// r uniforme dans Z*_n
//
// Tirage dans [0, n) puis rejet si gcd(r, n) != 1 (ce qui écarte aussi 0).
// Budget borné : un n légitime ne rejette qu'avec probabilité ~ 2/sqrt(n).
// ---------------------------------------------------------------------------
fn sample_randomizer<R>(pk: &PublicKey, rng: &mut R) -> Result<BigUint>
where
    R: RngCore + CryptoRng + ?Sized,
{
    for attempt in 1..=MAX_RANDOMIZER_ATTEMPTS {
        let candidate = rng.gen_biguint_below(pk.n());
        if gcd(&candidate, pk.n()).is_one() {
            return Ok(candidate);
        }
        debug!(attempt, "aléa r non inversible, nouveau tirage");
    }

    warn!(max_attempts = MAX_RANDOMIZER_ATTEMPTS, "budget d'aléa épuisé : n malformé ?");
    Err(CryptoError::Encryption(format!(
        "aucun r inversible mod n après {MAX_RANDOMIZER_ATTEMPTS} tirages"
    )))
}
