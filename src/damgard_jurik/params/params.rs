use serde::{Deserialize, Serialize};

// ============================================================================
// Budgets de tentatives des boucles aléatoires
//
// Aucune boucle de ré-échantillonnage n'est infinie : un n dégénéré (beaucoup
// de petits facteurs) ou une source de premiers défaillante remonte une
// erreur typée au lieu de bloquer l'appelant.
// ============================================================================

/// Nombre maximal de q tirés pour trouver (p, q) avec p != q et gcd(n, λ) = 1.
pub const MAX_KEYGEN_ATTEMPTS: u32 = 64;

/// Nombre maximal d'aléas r tirés pour trouver gcd(r, n) = 1.
pub const MAX_RANDOMIZER_ATTEMPTS: u32 = 128;

/// Exposant s maximal accepté. n^(s+1) est calculé dès la construction d'une
/// clé publique : un s non borné venu d'un fichier ferait exploser la mémoire.
pub const MAX_S: u32 = 8;

/// Paramètres de génération de clés.
///
/// Sérialisable pour être intégré tel quel dans le fichier de configuration
/// de l'application appelante ; les champs absents prennent la valeur par défaut.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyGenParams {
    /// Taille de chacun des premiers p et q
    pub prime_bits: u64,
    /// Exposant de généralisation : le système travaille modulo n^(s+1)
    pub s: u32,
    /// Budget de tentatives pour (p, q)
    pub max_attempts: u32,
    /// Conserve p et q pour le déchiffrement accéléré par CRT
    pub retain_factors: bool,
}

impl Default for KeyGenParams {
    fn default() -> Self {
        KeyGenParams {
            prime_bits:     1024,
            s:              1,
            max_attempts:   MAX_KEYGEN_ATTEMPTS,
            retain_factors: false,
        }
    }
}
