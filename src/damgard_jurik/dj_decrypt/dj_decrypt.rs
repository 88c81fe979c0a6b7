use num_bigint::BigUint;
use num_traits::{One, Zero};
use crate::crypto_error::{CryptoError, Result};
use crate::damgard_jurik::dj_keygen::{KeyPair, PublicKey};
use crate::damgard_jurik::math::{crt_combine, l_function, mod_inverse, mod_pow};

// ---------------------------------------------------------------------------
// Déchiffrement Damgård-Jurik
//
//   c^d mod n^(s+1) = (1+n)^m mod n^(s+1)      (d ≡ 1 mod n^s, d ≡ 0 mod λ)
//   m = extract_exponent((1+n)^m)               (reconstruction couche par couche)
//
// Pas de raccourci L(c^λ)·μ : il n'est valable que pour s = 1.
// ---------------------------------------------------------------------------
pub fn decrypt(c: &BigUint, keypair: &KeyPair) -> Result<BigUint> {
    let pk = keypair.public_key();
    let n_s1 = pk.ciphertext_modulus();

    if c >= n_s1 {
        return Err(CryptoError::InvalidCiphertext);
    }

    let c_d = raise_to_private_exponent(c, keypair)?;
    let m = extract_exponent(&c_d, pk)?;

    // Auto-vérification hors release : (1+n)^m doit redonner c^d exactement
    if cfg!(debug_assertions) && mod_pow(pk.g(), &m, n_s1)? != c_d {
        return Err(CryptoError::Decryption(
            "(1+n)^m != c^d : reconstruction incohérente".into(),
        ));
    }

    Ok(m)
}

// c^d mod n^(s+1), par CRT si la clé a conservé p et q
fn raise_to_private_exponent(c: &BigUint, keypair: &KeyPair) -> Result<BigUint> {
    let sk = keypair.private_key();

    match sk.crt() {
        Some(crt) => {
            let a_p = mod_pow(&(c % &crt.p_s1), &crt.d_p, &crt.p_s1)?;
            let a_q = mod_pow(&(c % &crt.q_s1), &crt.d_q, &crt.q_s1)?;
            crt_combine(&a_p, &crt.p_s1, &a_q, &crt.q_s1, &crt.q_s1_inv)
        }
        None => mod_pow(c, sk.d(), keypair.public_key().ciphertext_modulus()),
    }
}

// ---------------------------------------------------------------------------
// Retrouve i ∈ [0, n^s) à partir de a = (1+n)^i mod n^(s+1)
//
// Couche j (1 <= j <= s) : i_j = i mod n^j. Par le binôme,
//   L(a mod n^(j+1)) = Σ_{k=1..j} C(i_j, k)·n^(k-1)   (mod n^j)
// Les termes k >= 2 ne dépendent que de i_(j-1), connu à la couche
// précédente : on les retranche et il reste i_j.
// ---------------------------------------------------------------------------
pub fn extract_exponent(a: &BigUint, pk: &PublicKey) -> Result<BigUint> {
    let n = pk.n();

    let mut i = BigUint::zero();
    let mut n_j = n.clone();
    let mut n_j1 = n * n;

    for j in 1..=pk.s() {
        let mut t1 = l_function(&(a % &n_j1), n)?;

        // t2 = i·(i-1)···(i-k+1) mod n^j, i_k = i - (k-1) mod n^j
        let mut t2 = i.clone();
        let mut i_k = i;
        // n^(k-1) et k!
        let mut n_k = n.clone();
        let mut k_fact = BigUint::one();

        for k in 2..=j {
            i_k = (i_k + &n_j - 1u32) % &n_j;
            t2 = (t2 * &i_k) % &n_j;
            k_fact *= k;

            let k_fact_inv = mod_inverse(&k_fact, &n_j)?;
            let term = ((&t2 * &n_k) % &n_j * k_fact_inv) % &n_j;
            t1 = (t1 + &n_j - term) % &n_j;

            n_k *= n;
        }

        i = t1;
        n_j *= n;
        n_j1 *= n;
    }

    Ok(i)
}
