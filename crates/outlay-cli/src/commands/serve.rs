//! Server command implementation

use std::path::Path;

use anyhow::{bail, Result};
use outlay_core::ai::{mask_api_key, MIN_API_KEY_LEN};
use outlay_core::storage::GcsConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Outlay web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Validate the Gemini key up front when the gemini backend is selected;
    // failing on the first upload is a worse experience than failing here.
    let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());
    if backend.eq_ignore_ascii_case("gemini") {
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if key.len() >= MIN_API_KEY_LEN => {
                println!("   🤖 Gemini API key: {}", mask_api_key(&key));
            }
            Ok(_) => bail!("GEMINI_API_KEY is too short"),
            Err(_) => bail!(
                "GEMINI_API_KEY environment variable is not set. \
                 Set it, or use AI_BACKEND=mock for development."
            ),
        }
    }

    if GcsConfig::is_configured() {
        println!("   ☁️  Storage: Google Cloud Storage");
    } else {
        println!("   📁 Storage: local directory (set GCS_BUCKET_NAME for GCS)");
    }

    let api_keys = outlay_server::ServerConfig::api_keys_from_env();

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        println!("   🔒 Authentication: enabled, but no keys set (OUTLAY_API_KEYS)");
    } else {
        println!("   🔑 API keys: {} configured (OUTLAY_API_KEYS)", api_keys.len());
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let config = outlay_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins: vec![],
        api_keys,
    };

    let static_dir_str = static_dir.and_then(|p| p.to_str());
    outlay_server::serve(db, host, port, static_dir_str, config).await?;

    Ok(())
}
