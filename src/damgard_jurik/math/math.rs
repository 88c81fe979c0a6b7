use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use crate::crypto_error::{CryptoError, Result};

// ---------------------------------------------------------------------------
// Exponentiation modulaire rapide : base^exposant mod module
//
// BigUint::modpow (square-and-multiply / fenêtres) et jamais base.pow(e) % m :
// avec un exposant de la taille de n^s, la forme naïve est inutilisable.
// ---------------------------------------------------------------------------
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(CryptoError::Domain("module nul pour mod_pow".into()));
    }
    Ok(base.modpow(exponent, modulus))
}

// ---------------------------------------------------------------------------
// Inverse modulaire de a mod n par Euclide étendu.
// Retourne Err(CryptoError::NotInvertible) si gcd(a, n) != 1.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(CryptoError::Domain("module nul pour mod_inverse".into()));
    }

    let (g, x) = extended_gcd(&(a % modulus), modulus);
    if !g.is_one() {
        return Err(CryptoError::NotInvertible);
    }

    let n_big = BigInt::from(modulus.clone());
    // mod_floor : résultat toujours dans [0, n) même si x < 0
    let x_mod = x.mod_floor(&n_big);
    x_mod
        .to_biguint()
        .ok_or_else(|| CryptoError::Domain("inverse modulaire négatif".into()))
}

// Retourne (gcd(a, b), x) avec a·x ≡ gcd (mod b)
fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    // old_r >= 0 : les entrées sont positives
    let (_, magnitude) = old_r.into_parts();
    (magnitude, old_s)
}

// Calcule le pgcd de deux nombres
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

pub fn lcm(a: &BigUint, b: &BigUint) -> Result<BigUint> {
    if a.is_zero() || b.is_zero() {
        return Err(CryptoError::Domain("lcm d'une entrée nulle".into()));
    }
    Ok((a / gcd(a, b)) * b)
}

// ---------------------------------------------------------------------------
// Fonction L(x) = (x - 1) / diviseur
//
// Division exacte obligatoire : un reste non nul signale un chiffré corrompu
// ou une clé qui ne correspond pas. On échoue au lieu de tronquer.
// ---------------------------------------------------------------------------
pub fn l_function(x: &BigUint, divisor: &BigUint) -> Result<BigUint> {
    if divisor.is_zero() {
        return Err(CryptoError::Domain("diviseur nul pour L".into()));
    }
    if x.is_zero() {
        return Err(CryptoError::Decryption("L(0) : x - 1 est négatif".into()));
    }

    let (quotient, remainder) = (x - BigUint::one()).div_rem(divisor);
    if !remainder.is_zero() {
        return Err(CryptoError::Decryption(
            "division non exacte dans L : clé et chiffré incohérents".into(),
        ));
    }
    Ok(quotient)
}

// ---------------------------------------------------------------------------
// Chiffres de value en base `base`, poids faible en premier.
// 0 donne un vecteur vide.
// ---------------------------------------------------------------------------
pub fn n_adic_digits(value: &BigUint, base: &BigUint) -> Result<Vec<BigUint>> {
    if base <= &BigUint::one() {
        return Err(CryptoError::Domain("base < 2 pour la décomposition".into()));
    }

    let mut digits = Vec::new();
    let mut rest = value.clone();
    while !rest.is_zero() {
        let (q, r) = rest.div_rem(base);
        digits.push(r);
        rest = q;
    }
    Ok(digits)
}

// ---------------------------------------------------------------------------
// Recombinaison CRT (Garner) de x ≡ a_p (mod m_p), x ≡ a_q (mod m_q).
// m_q_inv = m_q^-1 mod m_p, précalculé. Résultat dans [0, m_p·m_q)
// dès que a_q < m_q.
// ---------------------------------------------------------------------------
pub fn crt_combine(
    a_p: &BigUint,
    m_p: &BigUint,
    a_q: &BigUint,
    m_q: &BigUint,
    m_q_inv: &BigUint,
) -> Result<BigUint> {
    if m_p.is_zero() || m_q.is_zero() {
        return Err(CryptoError::Domain("module nul pour la recombinaison CRT".into()));
    }

    let a_q_mod_p = a_q % m_p;
    let diff = (a_p % m_p + m_p - a_q_mod_p) % m_p;
    let h = (diff * m_q_inv) % m_p;
    Ok(a_q + m_q * h)
}
