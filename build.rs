//! Build script for the Spotify link & lyrics web front end.
//!
//! Copies the `.env.example` configuration template into the user's local
//! data directory (`spotlyrics/.env.example`), next to where
//! `config::load_env` looks for the real `.env` file.

use std::{env, fs, path::PathBuf};

/// Copies the configuration template, warning instead of failing when the
/// template is missing from the crate root.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotlyrics");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    // A read-only home (CI sandboxes) must not break the build.
    if let Err(e) = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")).map(|_| ()))
    {
        println!(
            "cargo:warning=could not copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
