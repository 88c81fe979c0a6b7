// =========================================================
// Démonstration — Cryptosystème de Damgård-Jurik
// Génération / chargement des clés, chiffrement,
// opérations homomorphes et mesures de durée
// =========================================================

use damgard_jurik::key_management::{
    ensure_keys_directory, key_file_exists, load_keypair_json, save_keypair_json,
    save_public_key_json,
};
use damgard_jurik::{
    generate_keypair_with, n_adic_digits, CryptoError, Engine, KeyGenParams, KeyPair,
    OsPrimeSource,
};

use clap::Parser;
use num_bigint::{BigUint, RandBigInt};
use rand_core::OsRng;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ─────────────────────────────────────────────────────────
// Arguments
// ─────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "damgard_jurik", about = "Démonstration du cryptosystème de Damgård-Jurik")]
struct Args {
    /// Taille de chacun des premiers p et q
    #[arg(long, default_value_t = 1024)]
    bits: u64,

    /// Exposant de généralisation (s = 1 : Paillier)
    #[arg(long, default_value_t = 1)]
    s: u32,

    /// Répertoire des fichiers de clés
    #[arg(long, default_value = "keys")]
    keys: PathBuf,

    /// Conserve p et q pour le déchiffrement CRT (clés fraîches uniquement)
    #[arg(long)]
    crt: bool,

    /// Ignore les clés existantes et en génère de nouvelles
    #[arg(long)]
    fresh: bool,
}

// ─────────────────────────────────────────────────────────
// Erreur applicative centrale
//
// Unifie CryptoError et io::Error pour propager toutes les
// erreurs via ? sans conversion manuelle.
// ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum AppError {
    #[error("Erreur cryptographique : {0}")]
    Crypto(#[from] CryptoError),
    #[error("Erreur I/O : {0}")]
    Io(#[from] std::io::Error),
    #[error("Vérification échouée : {0}")]
    Verification(String),
}

// ─────────────────────────────────────────────────────────
// Point d'entrée
// ─────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(e) = demonstration(&args) {
        eprintln!("\n[ERREUR] {}\n", e);
        std::process::exit(1);
    }
}

// ─────────────────────────────────────────────────────────
// Gestion des clés : chargement ou génération + sauvegarde
// ─────────────────────────────────────────────────────────

fn charger_ou_generer_cles(args: &Args) -> Result<(KeyPair, Option<Duration>), AppError> {
    ensure_keys_directory(&args.keys)?;
    let keypair_path = args.keys.join("keypair.json");

    if !args.fresh && key_file_exists(&keypair_path) {
        let t = Instant::now();
        match load_keypair_json(&keypair_path) {
            Ok(kp) => {
                info!(path = %keypair_path.display(), elapsed = ?t.elapsed(), "clés chargées");
                if kp.public_key().s() != args.s {
                    warn!(
                        stored = kp.public_key().s(),
                        requested = args.s,
                        "s des clés chargées différent de --s"
                    );
                }
                return Ok((kp, None));
            }
            Err(e) => warn!(error = %e, "chargement impossible, régénération"),
        }
    }

    let (kp, duree) = generer_et_sauvegarder(args, &keypair_path)?;
    Ok((kp, Some(duree)))
}

fn generer_et_sauvegarder(args: &Args, keypair_path: &Path) -> Result<(KeyPair, Duration), AppError> {
    let params = KeyGenParams {
        prime_bits:     args.bits,
        s:              args.s,
        retain_factors: args.crt,
        ..KeyGenParams::default()
    };

    info!(bits = args.bits, s = args.s, "génération des clés");
    let t       = Instant::now();
    let keypair = generate_keypair_with(&params, &mut OsPrimeSource::default())?;
    let duree   = t.elapsed();

    save_keypair_json(&keypair, keypair_path)?;
    save_public_key_json(keypair.public_key(), args.keys.join("public_key.json"))?;
    info!(dir = %args.keys.display(), elapsed = ?duree, "clés générées et sauvegardées");

    Ok((keypair, duree))
}

fn afficher_cles(kp: &KeyPair) {
    let pk = kp.public_key();
    println!("--- CLÉ PUBLIQUE ---");
    println!("  |n|         = {} bits", pk.n().bits());
    println!("  s           = {}", pk.s());
    println!("  |n^s|       = {} bits", pk.plaintext_modulus().bits());
    println!("  |n^(s+1)|   = {} bits", pk.ciphertext_modulus().bits());
    println!("--- CLÉ PRIVÉE ---");
    println!("  |d|         = {} bits", kp.private_key().d().bits());
    println!("  CRT         = {}", if kp.private_key().has_crt() { "oui" } else { "non" });
}

fn verifier(label: &str, obtenu: &BigUint, attendu: &BigUint) -> Result<(), AppError> {
    if obtenu != attendu {
        return Err(AppError::Verification(format!("{label} : {obtenu} != {attendu}")));
    }
    println!("  {label} vérifié");
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Démonstration — homomorphisme additif, constante, re-randomisation
// ─────────────────────────────────────────────────────────

fn demonstration(args: &Args) -> Result<(), AppError> {
    println!("\n==============================================");
    println!("   Cryptosystème de Damgård-Jurik — Démonstration");
    println!("==============================================");

    let (kp, duree_keygen) = charger_ou_generer_cles(args)?;
    afficher_cles(&kp);

    let engine = Engine::new(&kp);
    let m1 = BigUint::from(10u32);
    let m2 = BigUint::from(5u32);

    let t            = Instant::now();
    let c1           = engine.encrypt(&m1)?;
    let duree_enc    = t.elapsed();
    let c2           = engine.encrypt(&m2)?;

    println!("\n  Message m1      : {}", m1);
    println!("  |E(m1)|         : {} bits", c1.bits());

    // Addition homomorphique : E(m1)·E(m2) mod n^(s+1) = E(m1 + m2)
    let t            = Instant::now();
    let c_somme      = engine.add(&c1, &c2)?;
    let duree_add    = t.elapsed();

    let t            = Instant::now();
    let somme        = engine.decrypt(&c_somme)?;
    let duree_dec    = t.elapsed();
    println!("\n  D(E(10)·E(5))   : {}", somme);
    verifier("Addition homomorphe", &somme, &BigUint::from(15u32))?;

    // Multiplication par constante : E(m1)^2 = E(2·m1)
    let t            = Instant::now();
    let c_double     = engine.multiply_by_constant(&c1, &BigUint::from(2u32))?;
    let duree_mul    = t.elapsed();
    verifier("Multiplication par constante", &engine.decrypt(&c_double)?, &BigUint::from(20u32))?;

    // Re-randomisation : nouveau chiffré, même clair
    let t            = Instant::now();
    let c_frais      = engine.rerandomize(&c1)?;
    let duree_rerand = t.elapsed();
    println!("  Chiffré re-randomisé différent : {}", c_frais != c1);
    verifier("Re-randomisation", &engine.decrypt(&c_frais)?, &m1)?;

    // Clair multi-couches : tiré dans [0, n^s), décomposé en base n
    let pk = engine.public_key();
    let mut rng = OsRng;
    let m_large = rng.gen_biguint_below(pk.plaintext_modulus());
    let chiffres = n_adic_digits(&m_large, pk.n())?;
    println!("\n  Clair aléatoire : {} bits, {} chiffre(s) en base n", m_large.bits(), chiffres.len());
    let dec_large = engine.decrypt(&engine.encrypt(&m_large)?)?;
    verifier("Aller-retour multi-couches", &dec_large, &m_large)?;

    println!("\n==============================================");
    println!("    RÉSUMÉ DES TEMPS — Damgård-Jurik (s = {})", pk.s());
    println!("==============================================");
    match duree_keygen {
        Some(d) => println!("  Génération des clés    : {:.3?}  (nouvelle génération)", d),
        None    => println!("  Génération des clés    : —  (chargées depuis le disque)"),
    }
    println!("  Chiffrement            : {:.3?}", duree_enc);
    println!("  Addition homomorphique : {:.3?}", duree_add);
    println!("  Produit par constante  : {:.3?}", duree_mul);
    println!("  Re-randomisation       : {:.3?}", duree_rerand);
    println!("  Déchiffrement          : {:.3?}", duree_dec);
    println!("==============================================");

    Ok(())
}
