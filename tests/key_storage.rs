// Sauvegarde et rechargement des clés au format JSON

use damgard_jurik::key_management::{
    ensure_keys_directory, key_file_exists, load_keypair_json, load_private_key_json,
    load_public_key_json, save_keypair_json, save_private_key_json, save_public_key_json,
};
use damgard_jurik::{decrypt, encrypt_with_rng, generate_keypair, KeyPair};
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::io;
use tempfile::tempdir;

#[test]
fn test_saved_keypair_decrypts_after_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keypair.json");

    let kp = generate_keypair(128, 2).unwrap();
    save_keypair_json(&kp, &path).unwrap();
    assert!(key_file_exists(&path));

    let loaded = load_keypair_json(&path).unwrap();
    assert_eq!(loaded, kp);

    let mut rng = StdRng::seed_from_u64(9);
    let m = kp.public_key().plaintext_modulus() - 12_345u32;
    let c = encrypt_with_rng(&m, kp.public_key(), &mut rng).unwrap();
    assert_eq!(decrypt(&c, &loaded).unwrap(), m);
}

#[test]
fn test_public_and_private_files_recombine() {
    let dir = tempdir().unwrap();
    let keys = dir.path().join("nested").join("keys");
    ensure_keys_directory(&keys).unwrap();

    let kp = KeyPair::from_primes(&BigUint::from(11u32), &BigUint::from(17u32), 2, true).unwrap();
    save_public_key_json(kp.public_key(), keys.join("public_key.json")).unwrap();
    save_private_key_json(kp.private_key(), keys.join("private_key.json")).unwrap();

    let pk = load_public_key_json(keys.join("public_key.json")).unwrap();
    let sk = load_private_key_json(keys.join("private_key.json")).unwrap();
    assert_eq!(&pk, kp.public_key());
    assert_eq!(sk.d(), kp.private_key().d());
    // p et q ne sont pas persistés
    assert!(!sk.has_crt());

    let text = fs::read_to_string(keys.join("private_key.json")).unwrap();
    assert!(!text.contains("\"p\""));

    let rebuilt = KeyPair::from_keys(pk, sk).unwrap();
    let mut rng = StdRng::seed_from_u64(10);
    let c = encrypt_with_rng(&BigUint::from(20_000u32), rebuilt.public_key(), &mut rng).unwrap();
    assert_eq!(decrypt(&c, &rebuilt).unwrap(), BigUint::from(20_000u32));
}

#[test]
fn test_oversized_file_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keypair.json");
    fs::write(&path, vec![b' '; 70_000]).unwrap();

    let err = load_keypair_json(&path).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn test_malformed_files_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keypair.json");

    fs::write(&path, "{ pas du json").unwrap();
    assert_eq!(load_keypair_json(&path).unwrap_err().kind(), io::ErrorKind::InvalidData);

    // Structure valide, clé incohérente (g != n + 1)
    fs::write(
        &path,
        r#"{"public_key":{"n":"187","g":"2","s":1},"private_key":{"d":"81"}}"#,
    )
    .unwrap();
    assert_eq!(load_keypair_json(&path).unwrap_err().kind(), io::ErrorKind::InvalidData);

    // Champ non décimal
    fs::write(&path, r#"{"n":"0x10","g":"17","s":1}"#).unwrap();
    assert_eq!(load_public_key_json(&path).unwrap_err().kind(), io::ErrorKind::InvalidData);
}

#[test]
fn test_unbounded_s_rejected_before_any_power() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("public_key.json");

    for s in [9u64, 3_000_000, 4_294_967_295] {
        fs::write(&path, format!(r#"{{"n":"187","g":"188","s":{s}}}"#)).unwrap();
        assert_eq!(load_public_key_json(&path).unwrap_err().kind(), io::ErrorKind::InvalidData, "s = {s}");
    }

    // n = 561 a le facteur 3 <= s : clé inutilisable au déchiffrement
    fs::write(&path, r#"{"n":"561","g":"562","s":3}"#).unwrap();
    assert_eq!(load_public_key_json(&path).unwrap_err().kind(), io::ErrorKind::InvalidData);
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    assert!(!key_file_exists(&path));
    assert_eq!(load_keypair_json(&path).unwrap_err().kind(), io::ErrorKind::NotFound);
}
