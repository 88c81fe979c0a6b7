use std::fmt;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use tracing::{debug, warn};
use zeroize::Zeroize;
use crate::crypto_error::{CryptoError, Result};
use crate::damgard_jurik::math::{gcd, lcm, mod_inverse};
pub use crate::damgard_jurik::params::KeyGenParams;
use crate::damgard_jurik::primes::{OsPrimeSource, PrimeSource};

pub use crate::damgard_jurik::params::{MAX_KEYGEN_ATTEMPTS, MAX_S};

// ============================================================================
// Clé publique Damgård-Jurik — pas de données secrètes, pas de zeroize nécessaire
//
// n^s et n^(s+1) sont calculés une fois ici : toutes les opérations en ont besoin.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    n:    BigUint,
    g:    BigUint,
    s:    u32,
    n_s:  BigUint,
    n_s1: BigUint,
}

impl PublicKey {
    /// Clé publique de module n et d'exposant s, avec le générateur g = n + 1.
    ///
    /// s est borné par MAX_S avant tout calcul de puissance. n doit être
    /// impair et premier avec s! : le déchiffrement inverse k! mod n^j pour
    /// tout k <= s.
    pub fn new(n: BigUint, s: u32) -> Result<Self> {
        if n <= BigUint::one() {
            return Err(CryptoError::Domain("le module n doit être > 1".into()));
        }
        if s == 0 {
            return Err(CryptoError::Domain("l'exposant s doit être >= 1".into()));
        }
        if s > MAX_S {
            return Err(CryptoError::Domain(format!("l'exposant s = {s} dépasse {MAX_S}")));
        }
        if n.is_even() {
            return Err(CryptoError::Domain("n est pair".into()));
        }
        let s_fact = (2..=s).fold(BigUint::one(), |acc, k| acc * k);
        if !gcd(&n, &s_fact).is_one() {
            return Err(CryptoError::Domain(format!("n a un facteur premier <= s = {s}")));
        }

        let g    = &n + BigUint::one();
        let n_s  = n.pow(s);
        let n_s1 = &n_s * &n;
        Ok(PublicKey { n, g, s, n_s, n_s1 })
    }

    /// Reconstruit une clé publique reçue de l'extérieur (fichier, réseau).
    /// Seul g = n + 1 est accepté.
    pub fn from_parts(n: BigUint, g: BigUint, s: u32) -> Result<Self> {
        if g != &n + BigUint::one() {
            return Err(CryptoError::KeyCoherence("g != n + 1".into()));
        }
        Self::new(n, s).map_err(|e| match e {
            CryptoError::Domain(reason) => CryptoError::KeyCoherence(reason),
            other => other,
        })
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    pub fn s(&self) -> u32 {
        self.s
    }

    /// n^s : les clairs vivent dans [0, n^s)
    pub fn plaintext_modulus(&self) -> &BigUint {
        &self.n_s
    }

    /// n^(s+1) : les chiffrés vivent dans [0, n^(s+1))
    pub fn ciphertext_modulus(&self) -> &BigUint {
        &self.n_s1
    }
}

// Écrase les limbs en place avant de rendre le buffer
fn zeroize_biguint(n: &mut BigUint) {
    for bit in 0..n.bits() {
        n.set_bit(bit, false);
    }
    *n = BigUint::default();
}

// ============================================================================
// Facteurs conservés pour le déchiffrement CRT
//
// c^d mod n^(s+1) se calcule comme deux exponentiations modulo p^(s+1) et
// q^(s+1) avec des exposants réduits modulo φ(p^(s+1)) = p^s·(p-1).
// ============================================================================
#[derive(Clone, PartialEq, Eq)]
pub struct CrtFactors {
    pub(crate) p:       BigUint,
    pub(crate) q:       BigUint,
    pub(crate) p_s1:    BigUint,
    pub(crate) q_s1:    BigUint,
    pub(crate) d_p:     BigUint,
    pub(crate) d_q:     BigUint,
    /// (q^(s+1))^-1 mod p^(s+1)
    pub(crate) q_s1_inv: BigUint,
}

impl CrtFactors {
    fn new(p: &BigUint, q: &BigUint, s: u32, d: &BigUint) -> Result<Self> {
        let p_s  = p.pow(s);
        let q_s  = q.pow(s);
        let p_s1 = &p_s * p;
        let q_s1 = &q_s * q;

        let phi_p = &p_s * (p - BigUint::one());
        let phi_q = &q_s * (q - BigUint::one());

        let q_s1_inv = mod_inverse(&q_s1, &p_s1)?;

        Ok(CrtFactors {
            p: p.clone(),
            q: q.clone(),
            d_p: d % &phi_p,
            d_q: d % &phi_q,
            p_s1,
            q_s1,
            q_s1_inv,
        })
    }
}

impl Zeroize for CrtFactors {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.p);
        zeroize_biguint(&mut self.q);
        zeroize_biguint(&mut self.p_s1);
        zeroize_biguint(&mut self.q_s1);
        zeroize_biguint(&mut self.d_p);
        zeroize_biguint(&mut self.d_q);
        zeroize_biguint(&mut self.q_s1_inv);
    }
}

impl Drop for CrtFactors {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for CrtFactors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrtFactors")
            .field("p_bits", &self.p.bits())
            .field("q_bits", &self.q.bits())
            .finish()
    }
}

// ============================================================================
// Clé privée Damgård-Jurik — ZEROISÉE À LA DESTRUCTION
//
// d ≡ 1 (mod n^s) et d ≡ 0 (mod λ) : c^d = (1+n)^m mod n^(s+1) pour tout
// chiffré valide, ce qui rend μ inutile quel que soit s.
// ============================================================================
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    d:   BigUint,
    crt: Option<CrtFactors>,
}

impl PrivateKey {
    /// Clé privée réduite à l'exposant d (sans chemin CRT).
    pub fn from_exponent(d: BigUint) -> Self {
        PrivateKey { d, crt: None }
    }

    pub fn d(&self) -> &BigUint {
        &self.d
    }

    pub fn has_crt(&self) -> bool {
        self.crt.is_some()
    }

    pub(crate) fn crt(&self) -> Option<&CrtFactors> {
        self.crt.as_ref()
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.d);
        self.crt.zeroize();
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("d_bits", &self.d.bits())
            .field("crt", &self.crt)
            .finish()
    }
}

// ============================================================================
// Paire de clés — immuable après construction, partageable entre threads
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    public_key:  PublicKey,
    private_key: PrivateKey,
}

impl KeyPair {
    // ------------------------------------------------------------------------
    // Dérivation de la paire de clés à partir de p et q (étapes 2 à 6)
    //
    // La primalité de p et q n'est PAS vérifiée ici : c'est le contrat de la
    // PrimeSource. On vérifie seulement ce qui casserait l'algèbre :
    //   - p != q
    //   - p, q > s      (k! doit être inversible mod n^j pour k <= s)
    //   - gcd(n, λ) = 1 (λ inversible mod n^s)
    // ------------------------------------------------------------------------
    pub fn from_primes(p: &BigUint, q: &BigUint, s: u32, retain_factors: bool) -> Result<Self> {
        if s == 0 {
            return Err(CryptoError::KeyGeneration("l'exposant s doit être >= 1".into()));
        }
        if s > MAX_S {
            return Err(CryptoError::KeyGeneration(format!("l'exposant s = {s} dépasse {MAX_S}")));
        }
        if p == q {
            return Err(CryptoError::KeyGeneration("p == q".into()));
        }
        let floor = BigUint::from(s);
        if p <= &floor || q <= &floor {
            return Err(CryptoError::KeyGeneration(format!(
                "les facteurs doivent être > s = {s}"
            )));
        }

        let n = p * q;
        let lambda = lcm(&(p - BigUint::one()), &(q - BigUint::one()))?;

        if !gcd(&n, &lambda).is_one() {
            return Err(CryptoError::KeyGeneration("gcd(n, λ) != 1".into()));
        }

        let public_key = PublicKey::new(n, s)?;

        // d = λ · (λ^-1 mod n^s) : d ≡ 0 (mod λ), d ≡ 1 (mod n^s), d ∈ [0, λ·n^s)
        let lambda_inv = mod_inverse(&lambda, public_key.plaintext_modulus())
            .map_err(|_| CryptoError::KeyGeneration("λ non inversible mod n^s".into()))?;
        let d = &lambda * lambda_inv;

        let crt = if retain_factors {
            Some(CrtFactors::new(p, q, s, &d)?)
        } else {
            None
        };

        Ok(KeyPair {
            public_key,
            private_key: PrivateKey { d, crt },
        })
    }

    // ------------------------------------------------------------------------
    // Assemblage de clés reçues de l'extérieur.
    // d ≡ 1 (mod n^s) est vérifiable sans les facteurs : on le vérifie.
    // ------------------------------------------------------------------------
    pub fn from_keys(public_key: PublicKey, private_key: PrivateKey) -> Result<Self> {
        if private_key.d <= BigUint::one() {
            return Err(CryptoError::KeyCoherence("d doit être > 1".into()));
        }
        if !(&private_key.d % public_key.plaintext_modulus()).is_one() {
            return Err(CryptoError::KeyCoherence("d ≢ 1 (mod n^s)".into()));
        }
        if let Some(crt) = private_key.crt() {
            if &crt.p * &crt.q != *public_key.n() {
                return Err(CryptoError::KeyCoherence("p·q != n".into()));
            }
        }
        Ok(KeyPair { public_key, private_key })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}

// ============================================================================
// Génération de clés Damgård-Jurik
//
// Premiers de `bits` bits via OsPrimeSource, q ré-échantillonné tant que
// (p, q) est inutilisable, dans la limite de MAX_KEYGEN_ATTEMPTS.
// ============================================================================
pub fn generate_keypair(bits: u64, s: u32) -> Result<KeyPair> {
    let params = KeyGenParams {
        prime_bits: bits,
        s,
        ..KeyGenParams::default()
    };
    generate_keypair_with(&params, &mut OsPrimeSource::default())
}

pub fn generate_keypair_with<P>(params: &KeyGenParams, source: &mut P) -> Result<KeyPair>
where
    P: PrimeSource + ?Sized,
{
    if params.s == 0 {
        return Err(CryptoError::KeyGeneration("l'exposant s doit être >= 1".into()));
    }
    if params.s > MAX_S {
        return Err(CryptoError::KeyGeneration(format!(
            "l'exposant s = {} dépasse {MAX_S}",
            params.s
        )));
    }
    if params.max_attempts == 0 {
        return Err(CryptoError::KeyGeneration("budget de tentatives nul".into()));
    }

    debug!(bits = params.prime_bits, s = params.s, "génération de clés");

    let p = source.next_prime(params.prime_bits)?;

    for attempt in 1..=params.max_attempts {
        let q = source.next_prime(params.prime_bits)?;

        match KeyPair::from_primes(&p, &q, params.s, params.retain_factors) {
            Ok(keypair) => {
                debug!(
                    attempt,
                    n_bits = keypair.public_key.n.bits(),
                    crt = params.retain_factors,
                    "paire de clés générée"
                );
                return Ok(keypair);
            }
            Err(CryptoError::KeyGeneration(reason)) => {
                debug!(attempt, %reason, "q rejeté, nouveau tirage");
            }
            Err(other) => return Err(other),
        }
    }

    warn!(max_attempts = params.max_attempts, "budget de génération de clés épuisé");
    Err(CryptoError::KeyGeneration(format!(
        "aucune paire (p, q) valide après {} tentatives",
        params.max_attempts
    )))
}
