use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, OsRng, RngCore};
use tracing::{debug, warn};
use crate::crypto_error::{CryptoError, Result};

// Taille minimale d'un premier accepté par la source intégrée
pub const MIN_PRIME_BITS: u64 = 128;

// Nombre de candidats tirés par bit avant d'abandonner.
// La densité des premiers autour de 2^b est ~ 1/(b·ln 2) : 64·b laisse une marge énorme.
const CANDIDATES_PER_BIT: u64 = 64;

// ---------------------------------------------------------------------------
// Table de petits premiers (crible préliminaire)
// ---------------------------------------------------------------------------
const SMALL_PRIMES: &[u32] = &[
      3,   5,   7,  11,  13,  17,  19,  23,  29,  31,  37,  41,  43,  47,
     53,  59,  61,  67,  71,  73,  79,  83,  89,  97, 101, 103, 107, 109,
    113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269,
    271, 277, 281, 283, 293, 307, 311, 313, 317, 331, 337, 347, 349, 353,
];

// ============================================================================
// Source de premiers
//
// La génération de clés ne fabrique pas ses premiers elle-même : elle les
// demande à une PrimeSource. La qualité cryptographique des premiers est
// la responsabilité de la source (et donc de l'appelant qui la choisit).
// ============================================================================
pub trait PrimeSource {
    /// Retourne un premier de exactement `bits` bits.
    fn next_prime(&mut self, bits: u64) -> Result<BigUint>;
}

/// Source intégrée : candidats aléatoires + crible + Miller-Rabin.
#[derive(Debug, Clone)]
pub struct RandomPrimeSource<R> {
    rng: R,
}

/// Source intégrée sur l'entropie système.
pub type OsPrimeSource = RandomPrimeSource<OsRng>;

impl<R: RngCore + CryptoRng> RandomPrimeSource<R> {
    pub fn new(rng: R) -> Self {
        RandomPrimeSource { rng }
    }
}

impl Default for RandomPrimeSource<OsRng> {
    fn default() -> Self {
        RandomPrimeSource::new(OsRng)
    }
}

impl<R: RngCore + CryptoRng> PrimeSource for RandomPrimeSource<R> {
    fn next_prime(&mut self, bits: u64) -> Result<BigUint> {
        if bits < MIN_PRIME_BITS {
            return Err(CryptoError::KeyGeneration(format!(
                "premiers de {bits} bits insuffisants, minimum requis : {MIN_PRIME_BITS} bits"
            )));
        }

        let rounds = miller_rabin_rounds(bits);
        let max_candidates = CANDIDATES_PER_BIT * bits;

        for tried in 1..=max_candidates {
            // Deux bits hauts forcés : n = p·q a exactement 2·bits bits
            let mut candidate = self.rng.gen_biguint(bits);
            candidate.set_bit(bits - 1, true);
            candidate.set_bit(bits - 2, true);
            candidate.set_bit(0, true);

            if is_divisible_by_small_prime(&candidate) {
                continue;
            }
            if is_probable_prime(&candidate, rounds, &mut self.rng) {
                debug!(bits, tried, "premier trouvé");
                return Ok(candidate);
            }
        }

        warn!(bits, max_candidates, "aucun premier trouvé dans le budget");
        Err(CryptoError::KeyGeneration(format!(
            "aucun premier de {bits} bits après {max_candidates} candidats"
        )))
    }
}

// ---------------------------------------------------------------------------
// Nombre de rounds Miller-Rabin (FIPS 186-4, table C.2, erreur < 2^-100)
// ---------------------------------------------------------------------------
fn miller_rabin_rounds(bits: u64) -> u32 {
    match bits {
        b if b >= 1536 => 4,
        b if b >= 1024 => 5,
        b if b >= 512 => 8,
        _ => 40,
    }
}

fn is_divisible_by_small_prime(n: &BigUint) -> bool {
    SMALL_PRIMES.iter().any(|&sp| {
        let bp = BigUint::from(sp);
        n != &bp && (n % &bp).is_zero()
    })
}

pub fn is_probable_prime<R: RngCore + ?Sized>(n: &BigUint, rounds: u32, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if n < &two { return false; }
    if n == &two || n == &BigUint::from(3u32) { return true; }
    if n.is_even() { return false; }
    if SMALL_PRIMES.iter().any(|&sp| n == &BigUint::from(sp)) { return true; }
    if is_divisible_by_small_prime(n) { return false; }

    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 0..r.saturating_sub(1) {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
