// src/bin/cryptolab.rs
//! cryptolab — command-line front end for the three crypto-labs workflows

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crypto_labs::aliases::{ExposeSecret, Passphrase};
use crypto_labs::config::{self, Config};
use crypto_labs::file_ops::{
    decrypt_file_at, decrypt_file_with_passphrase, decrypted_file_name, encrypt_file_at,
    encrypt_file_with_passphrase, encrypted_file_name, kdf_sidecar_path,
};
use crypto_labs::{
    decrypt_text, derive_key, encrypt_text, generate_key, generate_key_pair, hex_to_bytes,
    import_key, import_private_key, import_public_key, sign, verify_base64, DerivationParameters,
    KeyUsages,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cryptolab", version, about = "AES-CBC, PBKDF2 and RSA signature labs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a random AES-256 key and print it as hex
    GenKey,
    /// Encrypt text; prints the IV (hex) and ciphertext (base64) as JSON
    EncryptText {
        #[arg(long)]
        key: String,
        text: String,
    },
    /// Decrypt base64 ciphertext produced by encrypt-text
    DecryptText {
        #[arg(long)]
        key: String,
        #[arg(long)]
        iv: String,
        ciphertext: String,
    },
    /// Encrypt a file into an IV || ciphertext envelope
    EncryptFile(FileArgs),
    /// Decrypt an envelope produced by encrypt-file
    DecryptFile(FileArgs),
    /// Generate an RSA-2048 signing key pair; prints base64 PKCS#8 and SPKI as JSON
    GenKeypair,
    /// Sign a file and print the base64 signature
    Sign {
        file: PathBuf,
        /// Base64 PKCS#8 private key
        #[arg(long, env = "CRYPTOLAB_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },
    /// Verify a file signature; exits 1 when the signature does not match
    Verify {
        file: PathBuf,
        /// Base64 SubjectPublicKeyInfo public key
        #[arg(long)]
        public_key: String,
        /// Base64 signature
        #[arg(long)]
        signature: String,
    },
}

#[derive(Args)]
struct FileArgs {
    input: PathBuf,
    /// Defaults to `encrypted-<name>` / `decrypted-<name>` next to the input
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Raw AES-256 key as hex; without it a passphrase is used
    #[arg(long, conflicts_with = "passphrase")]
    key: Option<String>,
    #[arg(long, env = "CRYPTOLAB_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,
    /// PBKDF2 salt as hex; defaults to a fresh salt (encrypt) or the sidecar (decrypt)
    #[arg(long, conflicts_with = "key")]
    salt: Option<String>,
    /// PBKDF2 iterations; defaults to the configured value (encrypt) or the sidecar (decrypt)
    #[arg(long, conflicts_with = "key")]
    iterations: Option<u32>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // a broken config is reported, never replaced by defaults
    let config = match config::try_load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };
    init_logging(&config.logging.filter);

    match run(cli, &config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, config: &Config) -> Result<ExitCode> {
    match cli.command {
        Command::GenKey => {
            let (_key, hex) = generate_key();
            println!("{hex}");
        }
        Command::EncryptText { key, text } => {
            let key = import_key(&key, KeyUsages::ENCRYPT).context("invalid key")?;
            let encoded = encrypt_text(&key, &text)?;
            println!("{}", serde_json::to_string_pretty(&encoded)?);
        }
        Command::DecryptText {
            key,
            iv,
            ciphertext,
        } => {
            let key = import_key(&key, KeyUsages::DECRYPT).context("invalid key")?;
            println!("{}", decrypt_text(&key, &iv, &ciphertext)?);
        }
        Command::EncryptFile(args) => encrypt_file_cmd(args, config)?,
        Command::DecryptFile(args) => decrypt_file_cmd(args, config)?,
        Command::GenKeypair => {
            let generated = generate_key_pair()?;
            let out = serde_json::json!({
                "private_pkcs8_base64": generated.private_pkcs8_base64,
                "public_spki_base64": generated.public_spki_base64,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Sign { file, private_key } => {
            let private_key = import_private_key(&private_key).context("invalid private key")?;
            let document = read_document(&file)?;
            println!("{}", sign(&private_key, &document)?.to_base64());
        }
        Command::Verify {
            file,
            public_key,
            signature,
        } => {
            let public_key = import_public_key(&public_key).context("invalid public key")?;
            let document = read_document(&file)?;
            if verify_base64(&public_key, &document, &signature)? {
                println!("valid");
            } else {
                println!("invalid");
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn encrypt_file_cmd(args: FileArgs, config: &Config) -> Result<()> {
    let output = match &args.output {
        Some(path) => path.clone(),
        None => encrypted_file_name(&args.input)?,
    };

    if let Some(hex) = &args.key {
        let key = import_key(hex, KeyUsages::ENCRYPT).context("invalid key")?;
        let size = encrypt_file_at(&args.input, &output, &key)?;
        info!(bytes = size, "file encrypted with raw key");
        return Ok(());
    }

    let mut params = match &args.salt {
        Some(hex) => DerivationParameters::new(hex_to_bytes(hex)?, config.kdf.iterations),
        None => config.kdf.fresh_parameters(),
    };
    if let Some(iterations) = args.iterations {
        params.iterations = iterations;
    }

    let passphrase = read_passphrase(args.passphrase)?;
    info!(iterations = params.iterations, "deriving key from passphrase");
    encrypt_file_with_passphrase(&args.input, &output, passphrase.expose_secret(), &params)?;
    Ok(())
}

fn decrypt_file_cmd(args: FileArgs, config: &Config) -> Result<()> {
    let output = match &args.output {
        Some(path) => path.clone(),
        None => decrypted_file_name(&args.input)?,
    };

    let result = match (&args.key, &args.salt) {
        (Some(hex), _) => {
            let key = import_key(hex, KeyUsages::DECRYPT).context("invalid key")?;
            decrypt_file_at(&args.input, &output, &key)
        }
        (None, Some(hex)) => {
            let iterations = args.iterations.unwrap_or(config.kdf.iterations);
            let params = DerivationParameters::new(hex_to_bytes(hex)?, iterations);
            let passphrase = read_passphrase(args.passphrase)?;
            info!(iterations, "deriving key from passphrase");
            let key = derive_key(passphrase.expose_secret(), &params)?;
            decrypt_file_at(&args.input, &output, &key)
        }
        (None, None) => {
            let sidecar = kdf_sidecar_path(&args.input);
            if !sidecar.exists() {
                bail!("no --salt given and no KDF sidecar at {}", sidecar.display());
            }
            let passphrase = read_passphrase(args.passphrase)?;
            decrypt_file_with_passphrase(
                &args.input,
                &output,
                passphrase.expose_secret(),
                args.iterations,
            )
        }
    };

    match result {
        Ok(size) => {
            info!(bytes = size, output = %output.display(), "file decrypted");
            Ok(())
        }
        Err(err) => {
            warn!("FAILED {} — wrong key or passphrase?", args.input.display());
            Err(err.into())
        }
    }
}

fn read_passphrase(given: Option<String>) -> Result<Passphrase> {
    let passphrase = match given {
        Some(p) => Passphrase::from(p),
        None => Passphrase::from(rpassword::prompt_password("Passphrase: ")?),
    };
    if passphrase.expose_secret().is_empty() {
        bail!("passphrase must not be empty");
    }
    Ok(passphrase)
}

fn read_document(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}
