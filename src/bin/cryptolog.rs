// src/bin/cryptolog.rs
//! cryptolog: encrypt and decrypt files with keys kept in a local keystore

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rpassword::prompt_password;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

use cryptolog::workflow::is_encrypted_name;
use cryptolog::{
    load_config, Config, CoreError, CryptoRequest, CryptoWorkflow, KeyStoreManager,
    StorePassword,
};

#[derive(Parser)]
#[command(
    name = "cryptolog",
    about = "Encrypt files with AES keys kept in a password-protected keystore",
    version
)]
struct Cli {
    /// Keystore file (overrides config and CRYPTOLOG_KEYSTORE)
    #[arg(long, global = true)]
    keystore: Option<PathBuf>,

    /// Config file (overrides CRYPTOLOG_CONFIG)
    #[arg(long, global = true, env = "CRYPTOLOG_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a key, store it under ALIAS and encrypt FILE to FILE.encrypted
    Encrypt {
        file: PathBuf,
        #[arg(short, long)]
        alias: String,
    },

    /// Decrypt FILE.encrypted with the key stored under ALIAS
    Decrypt {
        file: PathBuf,
        #[arg(short, long)]
        alias: String,
    },

    /// Decrypt every *.encrypted file below DIR with one key
    DecryptDir {
        dir: PathBuf,
        #[arg(short, long)]
        alias: String,
    },

    /// List aliases, fingerprints and creation dates
    List,

    /// Remove the key stored under ALIAS
    Remove {
        #[arg(short, long)]
        alias: String,
    },

    /// Change the keystore password
    Passwd,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("CRYPTOLOG_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("cryptolog=debug")
        } else {
            EnvFilter::new("cryptolog=warn")
        }
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            if let Some(core) = e.downcast_ref::<CoreError>() {
                if core.is_password_error() {
                    eprintln!("hint: check the password and try again");
                } else if core.is_environment_error() {
                    eprintln!("hint: this build or platform cannot perform the operation");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => load_config()?,
    };
    if let Some(keystore) = cli.keystore {
        config.paths.keystore = keystore;
    }
    let manager = KeyStoreManager::from_config(&config);

    match cli.command {
        Command::Encrypt { file, alias } => {
            let store = prompt("Keystore password: ")?;
            let key = prompt("Key password: ")?;
            let request = CryptoRequest::encrypt(file, &alias, &store, &key);
            let outcome = CryptoWorkflow::new(manager).encrypt(&request)?;
            println!("encrypted → {}", outcome.output.display());
        }
        Command::Decrypt { file, alias } => {
            let store = prompt("Keystore password: ")?;
            let key = prompt("Key password: ")?;
            let request = CryptoRequest::decrypt(file, &alias, &store, &key);
            let outcome = CryptoWorkflow::new(manager).decrypt(&request)?;
            println!("decrypted → {}", outcome.output.display());
        }
        Command::DecryptDir { dir, alias } => decrypt_dir(manager, &dir, &alias)?,
        Command::List => {
            require_keystore(&manager)?;
            let store = StorePassword::new(prompt("Keystore password: ")?);
            let keystore = manager.open(&store)?;
            if keystore.is_empty() {
                println!("keystore {} is empty", manager.path().display());
            }
            for info in keystore.entries() {
                println!(
                    "{:<24} {}  {}",
                    info.alias,
                    info.fingerprint,
                    info.created_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
        }
        Command::Remove { alias } => {
            require_keystore(&manager)?;
            let store = StorePassword::new(prompt("Keystore password: ")?);
            let mut keystore = manager.open(&store)?;
            if !keystore.remove(&alias) {
                return Err(CoreError::AliasNotFound(alias).into());
            }
            manager.persist(&keystore, &store)?;
            println!("removed {alias}");
        }
        Command::Passwd => {
            require_keystore(&manager)?;
            let old = StorePassword::new(prompt("Current keystore password: ")?);
            let new = prompt("New keystore password: ")?;
            if prompt("Repeat new password: ")? != new {
                bail!("passwords do not match");
            }
            manager.change_password(&old, &StorePassword::new(new))?;
            println!("keystore password changed");
        }
    }
    Ok(())
}

fn decrypt_dir(manager: KeyStoreManager, dir: &Path, alias: &str) -> Result<()> {
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_encrypted_name(e.path()))
        .map(|e| e.into_path())
        .collect();

    if files.is_empty() {
        println!("no *.encrypted files under {}", dir.display());
        return Ok(());
    }
    info!("found {} encrypted file(s)", files.len());

    let store = prompt("Keystore password: ")?;
    let key = prompt("Key password: ")?;
    let mut workflow = CryptoWorkflow::new(manager);
    let results = workflow.decrypt_many(files.iter().map(PathBuf::as_path), alias, &store, &key)?;

    let mut failed = 0usize;
    for (path, result) in &results {
        match result {
            Ok(outcome) => println!("decrypted → {}", outcome.output.display()),
            Err(e) => {
                failed += 1;
                warn!("FAILED {}: {e}", path.display());
            }
        }
    }

    println!("\n=== BATCH COMPLETE ===");
    println!("Decrypted: {}", results.len() - failed);
    println!("Failed: {failed}");
    if failed > 0 {
        bail!("{failed} file(s) could not be decrypted");
    }
    Ok(())
}

/// Refuse to go further before prompting when the keystore path is wrong
fn require_keystore(manager: &KeyStoreManager) -> Result<()> {
    if !manager.exists() {
        bail!("no keystore at {}", manager.path().display());
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    prompt_password(label).context("failed to read password")
}
