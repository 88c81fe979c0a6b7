// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// Chaque variante nomme la précondition ou l'invariant interne violé.
// ===========================================================================

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CryptoError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    // --- Erreurs des primitives arithmétiques ---
    /// Module nul, entrée nulle pour lcm, base < 2…
    #[error("Domaine invalide : {0}")]
    Domain(String),
    /// L'inverse modulaire n'existe pas (gcd != 1)
    #[error("Impossible de calculer l'inverse modulaire (gcd != 1)")]
    NotInvertible,

    // --- Erreurs de génération / d'aléa ---
    /// Budget de tentatives épuisé ou premiers inutilisables
    #[error("Génération de clés impossible : {0}")]
    KeyGeneration(String),
    /// Aucun aléa r inversible trouvé dans le budget (n malformé)
    #[error("Chiffrement impossible : {0}")]
    Encryption(String),

    // --- Erreurs de domaine des opérations ---
    /// Le message m est >= n^s
    #[error("Le message doit être dans [0, n^s)")]
    InvalidPlaintext,
    /// Le chiffré c est >= n^(s+1)
    #[error("Le chiffré doit être dans [0, n^(s+1))")]
    InvalidCiphertext,
    /// La constante k est >= n^s
    #[error("La constante doit être dans [0, n^s)")]
    InvalidScalar,

    // --- Incohérence interne au déchiffrement ---
    /// Division non exacte dans L, vérification de cohérence échouée…
    #[error("Déchiffrement incohérent : {0}")]
    Decryption(String),

    // --- Erreurs de la frontière d'échange des clés ---
    /// Champ décimal invalide dans un fichier de clés
    #[error("Champ de clé invalide : {0}")]
    KeyParse(String),
    /// Champ décimal trop long : vecteur DoS potentiel (conversion BigUint coûteuse)
    #[error("Champ décimal trop long : {actual} caractères (maximum autorisé : {maximum})")]
    KeyFieldTooLong { actual: usize, maximum: usize },
    /// g != n+1, s = 0… : fichier corrompu ou falsifié
    #[error("Clé incohérente : {0}")]
    KeyCoherence(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_violation() {
        assert_eq!(
            CryptoError::InvalidPlaintext.to_string(),
            "Le message doit être dans [0, n^s)"
        );
        let e = CryptoError::KeyFieldTooLong { actual: 9000, maximum: 4096 };
        assert!(e.to_string().contains("9000"));
        assert!(CryptoError::Decryption("L".into()).to_string().contains("L"));
    }
}
