use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use crate::crypto_error::Result;
use crate::damgard_jurik::dj_decrypt::decrypt;
use crate::damgard_jurik::dj_encrypt::{encrypt, encrypt_with_rng};
use crate::damgard_jurik::dj_homomorphic::{add, multiply_by_constant, rerandomize, rerandomize_with_rng};
use crate::damgard_jurik::dj_keygen::{KeyPair, PublicKey};

// ============================================================================
// Engine — API orientée objet au-dessus des fonctions libres
//
// L'engine emprunte la paire de clés pour toute sa durée de vie et ne possède
// aucun état mutable : Copy, partageable entre threads tant que la KeyPair
// l'est. Chaque appel randomisé prend l'aléa de l'appelant ou OsRng.
//
// Usage typique :
//   let engine = Engine::new(&keypair);
//   let c = engine.add(&engine.encrypt(&m1)?, &engine.encrypt(&m2)?)?;
//   let m = engine.decrypt(&c)?;
// ============================================================================
#[derive(Clone, Copy, Debug)]
pub struct Engine<'k> {
    keys: &'k KeyPair,
}

impl<'k> Engine<'k> {
    pub fn new(keys: &'k KeyPair) -> Self {
        Engine { keys }
    }

    pub fn keypair(&self) -> &'k KeyPair {
        self.keys
    }

    pub fn public_key(&self) -> &'k PublicKey {
        self.keys.public_key()
    }

    pub fn encrypt(&self, m: &BigUint) -> Result<BigUint> {
        encrypt(m, self.public_key())
    }

    pub fn encrypt_with_rng<R>(&self, m: &BigUint, rng: &mut R) -> Result<BigUint>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        encrypt_with_rng(m, self.public_key(), rng)
    }

    pub fn decrypt(&self, c: &BigUint) -> Result<BigUint> {
        decrypt(c, self.keys)
    }

    pub fn add(&self, c1: &BigUint, c2: &BigUint) -> Result<BigUint> {
        add(c1, c2, self.public_key())
    }

    pub fn multiply_by_constant(&self, c: &BigUint, k: &BigUint) -> Result<BigUint> {
        multiply_by_constant(c, k, self.public_key())
    }

    pub fn rerandomize(&self, c: &BigUint) -> Result<BigUint> {
        rerandomize(c, self.public_key())
    }

    pub fn rerandomize_with_rng<R>(&self, c: &BigUint, rng: &mut R) -> Result<BigUint>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        rerandomize_with_rng(c, self.public_key(), rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;
    use std::thread;

    fn toy_keypair(s: u32) -> KeyPair {
        KeyPair::from_primes(&BigUint::from(11u32), &BigUint::from(17u32), s, true).unwrap()
    }

    #[test]
    fn test_engine_delegates_to_key() {
        let kp = toy_keypair(2);
        let engine = Engine::new(&kp);
        assert_eq!(engine.public_key().s(), 2);

        let c = engine.encrypt(&BigUint::from(30_000u32)).unwrap();
        let c = engine.rerandomize(&c).unwrap();
        let c = engine.multiply_by_constant(&c, &BigUint::from(2u32)).unwrap();
        // 60 000 mod 34 969
        assert_eq!(engine.decrypt(&c).unwrap(), BigUint::from(25_031u32));
    }

    #[test]
    fn test_shared_keypair_across_threads() {
        // KeyPair en lecture seule, un aléa par thread, aucune synchronisation
        let kp = Arc::new(toy_keypair(1));

        let handles: Vec<_> = (0..8u64).map(|t| {
            let kp = Arc::clone(&kp);
            thread::spawn(move || {
                let engine = Engine::new(&kp);
                let mut rng = StdRng::seed_from_u64(t);
                for m in 0..50u32 {
                    let m = BigUint::from(m);
                    let c = engine.encrypt_with_rng(&m, &mut rng).unwrap();
                    let c = engine.rerandomize_with_rng(&c, &mut rng).unwrap();
                    assert_eq!(engine.decrypt(&c).unwrap(), m);
                }
            })
        }).collect();

        for h in handles { h.join().unwrap(); }
    }
}
