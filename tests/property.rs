// Propriétés aléatoires sur clés jouets (p = 11, q = 17), s de 1 à 3

use damgard_jurik::{
    add, decrypt, encrypt_with_rng, multiply_by_constant, rerandomize_with_rng, KeyPair,
};
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn toy_keypair(s: u32) -> KeyPair {
    KeyPair::from_primes(&BigUint::from(11u32), &BigUint::from(17u32), s, false).unwrap()
}

// Ramène une graine u64 dans [0, n^s)
fn plaintext(kp: &KeyPair, raw: u64) -> BigUint {
    BigUint::from(raw) % kp.public_key().plaintext_modulus()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_roundtrip(s in 1u32..=3, raw in any::<u64>(), seed in any::<u64>()) {
        let kp = toy_keypair(s);
        let m = plaintext(&kp, raw);
        let mut rng = StdRng::seed_from_u64(seed);

        let c = encrypt_with_rng(&m, kp.public_key(), &mut rng).unwrap();
        prop_assert!(&c < kp.public_key().ciphertext_modulus());
        prop_assert_eq!(decrypt(&c, &kp).unwrap(), m);
    }

    #[test]
    fn prop_add_is_plaintext_sum(s in 1u32..=3, a in any::<u64>(), b in any::<u64>(), seed in any::<u64>()) {
        let kp = toy_keypair(s);
        let pk = kp.public_key();
        let (m1, m2) = (plaintext(&kp, a), plaintext(&kp, b));
        let mut rng = StdRng::seed_from_u64(seed);

        let c1 = encrypt_with_rng(&m1, pk, &mut rng).unwrap();
        let c2 = encrypt_with_rng(&m2, pk, &mut rng).unwrap();
        let expected = (m1 + m2) % pk.plaintext_modulus();
        prop_assert_eq!(decrypt(&add(&c1, &c2, pk).unwrap(), &kp).unwrap(), expected);
    }

    #[test]
    fn prop_scalar_is_plaintext_product(s in 1u32..=3, a in any::<u64>(), k in any::<u64>(), seed in any::<u64>()) {
        let kp = toy_keypair(s);
        let pk = kp.public_key();
        let (m, k) = (plaintext(&kp, a), plaintext(&kp, k));
        let mut rng = StdRng::seed_from_u64(seed);

        let c = encrypt_with_rng(&m, pk, &mut rng).unwrap();
        let expected = (m * &k) % pk.plaintext_modulus();
        prop_assert_eq!(decrypt(&multiply_by_constant(&c, &k, pk).unwrap(), &kp).unwrap(), expected);
    }

    #[test]
    fn prop_rerandomize_keeps_plaintext(s in 1u32..=3, a in any::<u64>(), seed in any::<u64>()) {
        let kp = toy_keypair(s);
        let pk = kp.public_key();
        let m = plaintext(&kp, a);
        let mut rng = StdRng::seed_from_u64(seed);

        let c = encrypt_with_rng(&m, pk, &mut rng).unwrap();
        let fresh = rerandomize_with_rng(&c, pk, &mut rng).unwrap();
        prop_assert!(&fresh < pk.ciphertext_modulus());
        prop_assert_eq!(decrypt(&fresh, &kp).unwrap(), m);
    }
}
