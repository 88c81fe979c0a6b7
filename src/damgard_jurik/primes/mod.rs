// Source de nombres premiers : frontière de confiance de la génération de clés

mod primes;

pub use primes::{is_probable_prime, OsPrimeSource, PrimeSource, RandomPrimeSource, MIN_PRIME_BITS};
