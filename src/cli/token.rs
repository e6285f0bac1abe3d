//! Token commands (mint, inspect, derive)

use anyhow::{bail, Result};

use super::output::Output;
use crate::domain;

/// Mint a fresh token
pub fn mint(
    output: &Output,
    doc_type: &str,
    generation: char,
    timestamp: Option<i64>,
    entropy: usize,
) -> Result<()> {
    let token = domain::generate_with(doc_type, generation, timestamp, entropy);
    output.verbose_ctx("mint", &format!("minted token for type '{}'", doc_type));

    if output.is_json() {
        output.data(&serde_json::json!({ "token": token }));
    } else {
        println!("{}", token);
    }
    Ok(())
}

/// Show the fields encoded in a token
pub fn inspect(output: &Output, token: &str) -> Result<()> {
    let Some(parsed) = domain::parse(token) else {
        bail!("not a well-formed token: {token}");
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "prefix": parsed.prefix,
            "generation": parsed.generation.to_string(),
            "timestamp": parsed.timestamp,
            "entropy": parsed.entropy,
        }));
    } else {
        println!("prefix:     {}", parsed.prefix);
        println!("generation: {}", parsed.generation);
        println!("timestamp:  {}", parsed.timestamp);
        println!("entropy:    {}", parsed.entropy);
    }
    Ok(())
}

/// Derive a companion token that shares the original's suffix
pub fn derive(output: &Output, token: &str, new_type: &str) -> Result<()> {
    if !domain::is_valid(token) {
        bail!("not a well-formed token: {token}");
    }
    let companion = domain::swap_prefix(token, new_type);
    output.verbose_ctx("derive", &format!("rebound token to type '{}'", new_type));

    if output.is_json() {
        output.data(&serde_json::json!({ "token": companion }));
    } else {
        println!("{}", companion);
    }
    Ok(())
}
