use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;
use std::io;
use num_bigint::BigUint;
use num_traits::{Num, One};
use crate::damgard_jurik::dj_keygen::{PublicKey, PrivateKey, KeyPair};
use crate::damgard_jurik::params::MAX_S;
use crate::crypto_error::CryptoError;

// ============================================================================
// Protection DoS parsing — limites de taille des entrées
//
// BigUint::from_str_radix est quadratique en la longueur de l'entrée : un
// champ de plusieurs Mo sature le CPU. Un fichier de plusieurs Go est lu
// en mémoire d'un bloc. Les deux bornes sont vérifiées AVANT tout travail.
//
// Dimensionnées pour n de 4096 bits avec s jusqu'à MAX_S = 8 :
//   d < λ·n^s < n^(s+1) → 9·4096 bits ≈ 11 100 chiffres décimaux.
// s est lui-même borné AVANT tout calcul de n^s.
// ============================================================================

/// Taille maximale d'un fichier de clés JSON en octets (64 Ko)
const MAX_KEY_FILE_BYTES: u64 = 65_536;

/// Longueur maximale d'un champ décimal en caractères.
const MAX_DECIMAL_FIELD_LEN: usize = 16_384;

// ============================================================================
// Structures JSON pour l'échange des clés
//
// Entiers en décimal (taille arbitraire), s en nombre JSON.
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyJson {
    pub n: String,
    pub g: String,
    pub s: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PrivateKeyJson {
    pub d: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyPairJson {
    pub public_key:  PublicKeyJson,
    pub private_key: PrivateKeyJson,
}

// ============================================================================
// Conversion BigUint ↔ décimal
// ============================================================================

pub fn biguint_to_decimal(value: &BigUint) -> String {
    value.to_str_radix(10)
}

/// Convertit une chaîne décimale en BigUint.
///
/// Seuls les chiffres ASCII sont acceptés (pas de signe, pas de séparateur).
/// La longueur est vérifiée AVANT la conversion.
pub fn decimal_to_biguint(text: &str) -> Result<BigUint, CryptoError> {
    if text.len() > MAX_DECIMAL_FIELD_LEN {
        return Err(CryptoError::KeyFieldTooLong {
            actual:  text.len(),
            maximum: MAX_DECIMAL_FIELD_LEN,
        });
    }
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CryptoError::KeyParse(format!("entier décimal attendu, reçu {text:?}")));
    }
    BigUint::from_str_radix(text, 10)
        .map_err(|e| CryptoError::KeyParse(e.to_string()))
}

// ============================================================================
// Conversion structures Rust → JSON
// ============================================================================

pub fn public_key_to_json(pk: &PublicKey) -> PublicKeyJson {
    PublicKeyJson {
        n: biguint_to_decimal(pk.n()),
        g: biguint_to_decimal(pk.g()),
        s: pk.s(),
    }
}

/// Seul d est exporté : les facteurs CRT ne quittent jamais la mémoire.
pub fn private_key_to_json(sk: &PrivateKey) -> PrivateKeyJson {
    PrivateKeyJson {
        d: biguint_to_decimal(sk.d()),
    }
}

pub fn keypair_to_json(kp: &KeyPair) -> KeyPairJson {
    KeyPairJson {
        public_key:  public_key_to_json(kp.public_key()),
        private_key: private_key_to_json(kp.private_key()),
    }
}

// ============================================================================
// Conversion JSON → structures Rust
// Validation de cohérence : g = n+1, 1 <= s <= MAX_S, d > 1, d ≡ 1 (mod n^s).
// ============================================================================

pub fn json_to_public_key(json: &PublicKeyJson) -> Result<PublicKey, CryptoError> {
    if json.s == 0 || json.s > MAX_S {
        return Err(CryptoError::KeyCoherence(format!(
            "s = {} hors de [1, {MAX_S}]",
            json.s
        )));
    }
    let n = decimal_to_biguint(&json.n)?;
    let g = decimal_to_biguint(&json.g)?;
    PublicKey::from_parts(n, g, json.s)
}

pub fn json_to_private_key(json: &PrivateKeyJson) -> Result<PrivateKey, CryptoError> {
    let d = decimal_to_biguint(&json.d)?;
    if d <= BigUint::one() {
        return Err(CryptoError::KeyCoherence("d doit être > 1".into()));
    }
    Ok(PrivateKey::from_exponent(d))
}

pub fn json_to_keypair(json: &KeyPairJson) -> Result<KeyPair, CryptoError> {
    KeyPair::from_keys(
        json_to_public_key(&json.public_key)?,
        json_to_private_key(&json.private_key)?,
    )
}

// ============================================================================
// Vérification de taille de fichier (DoS protection)
//
// Appelée avant fs::read_to_string : la métadonnée est lue sans ouvrir le contenu.
// ============================================================================

fn check_file_size(filepath: &Path) -> io::Result<()> {
    let meta = fs::metadata(filepath)?;
    if meta.len() > MAX_KEY_FILE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Fichier de clés trop grand : {} octets (maximum autorisé : {} octets)",
                meta.len(),
                MAX_KEY_FILE_BYTES
            ),
        ));
    }
    Ok(())
}

fn invalid_data(e: CryptoError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

fn read_json<T: for<'de> Deserialize<'de>>(filepath: &Path) -> io::Result<T> {
    check_file_size(filepath)?;
    let raw = fs::read_to_string(filepath)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json<T: Serialize>(value: &T, filepath: &Path) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(filepath, json)
}

// ============================================================================
// Sauvegarde JSON sur disque
// ============================================================================

pub fn save_keypair_json(kp: &KeyPair, filepath: impl AsRef<Path>) -> io::Result<()> {
    write_json(&keypair_to_json(kp), filepath.as_ref())
}

pub fn save_public_key_json(pk: &PublicKey, filepath: impl AsRef<Path>) -> io::Result<()> {
    write_json(&public_key_to_json(pk), filepath.as_ref())
}

pub fn save_private_key_json(sk: &PrivateKey, filepath: impl AsRef<Path>) -> io::Result<()> {
    write_json(&private_key_to_json(sk), filepath.as_ref())
}

// ============================================================================
// Chargement JSON depuis disque
// Vérification de la taille du fichier AVANT la lecture (protection DoS).
// ============================================================================

pub fn load_keypair_json(filepath: impl AsRef<Path>) -> io::Result<KeyPair> {
    let json: KeyPairJson = read_json(filepath.as_ref())?;
    json_to_keypair(&json).map_err(invalid_data)
}

pub fn load_public_key_json(filepath: impl AsRef<Path>) -> io::Result<PublicKey> {
    let json: PublicKeyJson = read_json(filepath.as_ref())?;
    json_to_public_key(&json).map_err(invalid_data)
}

pub fn load_private_key_json(filepath: impl AsRef<Path>) -> io::Result<PrivateKey> {
    let json: PrivateKeyJson = read_json(filepath.as_ref())?;
    json_to_private_key(&json).map_err(invalid_data)
}

// ============================================================================
// Utilitaires
// ============================================================================

pub fn key_file_exists(filepath: impl AsRef<Path>) -> bool {
    filepath.as_ref().exists()
}

pub fn ensure_keys_directory(dir_path: impl AsRef<Path>) -> io::Result<()> {
    let dir = dir_path.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
