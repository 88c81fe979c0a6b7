use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, OsRng, RngCore};
use crate::crypto_error::{CryptoError, Result};
use crate::damgard_jurik::dj_encrypt::encrypt_with_rng;
use crate::damgard_jurik::dj_keygen::PublicKey;
use crate::damgard_jurik::math::mod_pow;

fn check_ciphertext(c: &BigUint, pk: &PublicKey) -> Result<()> {
    if c >= pk.ciphertext_modulus() {
        return Err(CryptoError::InvalidCiphertext);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Addition homomorphe : E(m1) · E(m2) mod n^(s+1) = E((m1 + m2) mod n^s)
// ---------------------------------------------------------------------------
pub fn add(c1: &BigUint, c2: &BigUint, pk: &PublicKey) -> Result<BigUint> {
    check_ciphertext(c1, pk)?;
    check_ciphertext(c2, pk)?;

    Ok((c1 * c2) % pk.ciphertext_modulus())
}

// ---------------------------------------------------------------------------
// Multiplication par une constante claire : E(m)^k mod n^(s+1) = E(m·k mod n^s)
//
// k >= n^s est refusé : la réduction implicite modulo n^s ne serait pas celle
// que l'appelant attend.
// ---------------------------------------------------------------------------
pub fn multiply_by_constant(c: &BigUint, k: &BigUint, pk: &PublicKey) -> Result<BigUint> {
    check_ciphertext(c, pk)?;
    if k >= pk.plaintext_modulus() {
        return Err(CryptoError::InvalidScalar);
    }

    mod_pow(c, k, pk.ciphertext_modulus())
}

// ---------------------------------------------------------------------------
// Re-randomisation : c · E(0). Même clair, représentation non reliable à c
// sans la clé privée. Seul l'aléa de encrypt est consommé.
// ---------------------------------------------------------------------------
pub fn rerandomize(c: &BigUint, pk: &PublicKey) -> Result<BigUint> {
    rerandomize_with_rng(c, pk, &mut OsRng)
}

pub fn rerandomize_with_rng<R>(c: &BigUint, pk: &PublicKey, rng: &mut R) -> Result<BigUint>
where
    R: RngCore + CryptoRng + ?Sized,
{
    check_ciphertext(c, pk)?;
    let zero = encrypt_with_rng(&BigUint::zero(), pk, rng)?;
    add(c, &zero, pk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damgard_jurik::dj_decrypt::decrypt;
    use crate::damgard_jurik::dj_keygen::KeyPair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn big(x: u64) -> BigUint {
        BigUint::from(x)
    }

    fn toy_keypair(s: u32) -> KeyPair {
        KeyPair::from_primes(&big(11), &big(17), s, false).unwrap()
    }

    #[test]
    fn test_toy_scenario_add_and_scale() {
        // p = 11, q = 17 → n = 187, λ = 80
        let kp = toy_keypair(1);
        let pk = kp.public_key();
        let mut rng = StdRng::seed_from_u64(10);

        let c10 = encrypt_with_rng(&big(10), pk, &mut rng).unwrap();
        let c5 = encrypt_with_rng(&big(5), pk, &mut rng).unwrap();

        let sum = add(&c10, &c5, pk).unwrap();
        assert_eq!(decrypt(&sum, &kp).unwrap(), big(15));

        let doubled = multiply_by_constant(&c10, &big(2), pk).unwrap();
        assert_eq!(decrypt(&doubled, &kp).unwrap(), big(20));
    }

    #[test]
    fn test_add_wraps_modulo_n_s() {
        let kp = toy_keypair(2);
        let pk = kp.public_key();
        let mut rng = StdRng::seed_from_u64(11);

        // 30 000 + 10 000 = 40 000 ≡ 5 031 (mod 34 969)
        let c1 = encrypt_with_rng(&big(30_000), pk, &mut rng).unwrap();
        let c2 = encrypt_with_rng(&big(10_000), pk, &mut rng).unwrap();
        let sum = add(&c1, &c2, pk).unwrap();
        assert_eq!(decrypt(&sum, &kp).unwrap(), big(5_031));
    }

    #[test]
    fn test_multiply_by_zero_and_by_max_scalar() {
        let kp = toy_keypair(2);
        let pk = kp.public_key();
        let mut rng = StdRng::seed_from_u64(12);
        let n_s = pk.plaintext_modulus().clone();

        let c = encrypt_with_rng(&big(7), pk, &mut rng).unwrap();
        let zero = multiply_by_constant(&c, &big(0), pk).unwrap();
        assert_eq!(decrypt(&zero, &kp).unwrap(), big(0));

        // 7 · (n^s - 1) ≡ -7 (mod n^s)
        let k = &n_s - 1u32;
        let scaled = multiply_by_constant(&c, &k, pk).unwrap();
        assert_eq!(decrypt(&scaled, &kp).unwrap(), &n_s - 7u32);
    }

    #[test]
    fn test_scalar_out_of_range() {
        let kp = toy_keypair(1);
        let pk = kp.public_key();
        let c = encrypt_with_rng(&big(3), pk, &mut StdRng::seed_from_u64(13)).unwrap();
        assert_eq!(
            multiply_by_constant(&c, pk.plaintext_modulus(), pk),
            Err(CryptoError::InvalidScalar)
        );
    }

    #[test]
    fn test_operations_reject_out_of_range_ciphertexts() {
        let kp = toy_keypair(1);
        let pk = kp.public_key();
        let too_big = pk.ciphertext_modulus().clone();
        let ok = encrypt_with_rng(&big(3), pk, &mut StdRng::seed_from_u64(14)).unwrap();

        assert_eq!(add(&too_big, &ok, pk), Err(CryptoError::InvalidCiphertext));
        assert_eq!(add(&ok, &too_big, pk), Err(CryptoError::InvalidCiphertext));
        assert_eq!(multiply_by_constant(&too_big, &big(2), pk), Err(CryptoError::InvalidCiphertext));
        assert_eq!(rerandomize(&too_big, pk), Err(CryptoError::InvalidCiphertext));
    }

    #[test]
    fn test_rerandomize_keeps_plaintext() {
        let kp = toy_keypair(2);
        let pk = kp.public_key();
        let mut rng = StdRng::seed_from_u64(15);

        let c = encrypt_with_rng(&big(20_000), pk, &mut rng).unwrap();
        let fresh: Vec<BigUint> = (0..4)
            .map(|_| rerandomize_with_rng(&c, pk, &mut rng).unwrap())
            .collect();

        // r = 1 redonne c : probabilité 1/160 par tirage avec n = 187
        assert!(fresh.iter().any(|f| f != &c));
        for f in &fresh {
            assert_eq!(decrypt(f, &kp).unwrap(), big(20_000));
        }
    }
}
