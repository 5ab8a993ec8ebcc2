//! AI-related command implementations

use std::path::Path;

use anyhow::Result;
use outlay_core::ai::{AiBackend, AiClient};
use outlay_core::category::categorize;
use outlay_core::extract::parse;

use super::process::mime_for_path;

/// Test the AI backend connection and optionally run a live extraction
pub async fn cmd_ai_test(file: Option<&Path>) -> Result<()> {
    println!("🔍 Testing AI backend...\n");

    let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());
    println!("  AI_BACKEND: {}", backend);

    let Some(client) = AiClient::from_env() else {
        println!("  ❌ No AI backend configured");
        println!();
        println!("To set up Gemini:");
        println!("  1. Create an API key at https://aistudio.google.com/apikey");
        println!("  2. Set environment variable: export GEMINI_API_KEY=<key>");
        println!("  3. Optionally pick a model: export GEMINI_MODEL=gemini-1.5-flash-002");
        return Ok(());
    };

    println!("  Host:  {}", client.host());
    println!("  Model: {}\n", client.model());

    print!("Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach the AI backend at {}", client.host());
        return Ok(());
    }

    let Some(file) = file else {
        println!("\n💡 Pass --file receipt.jpg to test a live extraction");
        return Ok(());
    };

    println!("\n📋 Extracting from {}...\n", file.display());
    let data = std::fs::read(file)?;
    let reply = client.extract_receipt(&data, mime_for_path(file)).await?;

    println!("Raw reply:");
    for line in reply.lines() {
        println!("  | {}", line);
    }

    let record = parse(&reply);
    let category = categorize(&record);
    println!();
    println!("Parsed:");
    println!("  Description: {}", record.description);
    println!("  Date:        {}", record.date);
    println!("  Amount:      {:.2}", record.amount);
    println!("  Category:    {}", category);

    Ok(())
}
