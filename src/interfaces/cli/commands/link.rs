//! Link commands
//!
//! Results go to stdout undecorated so they can be piped; status lines go
//! to stderr.

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::ShortenerService;
use crate::utils::fingerprint::{Fingerprinter, HashidsFingerprinter};

pub async fn shorten_url(
    service: &ShortenerService,
    url: &str,
    ttl_minutes: i64,
) -> Result<(), CliError> {
    let token = service.shorten(url, ttl_minutes).await?;

    eprintln!(
        "{} {} -> {} (ttl: {} min)",
        "✓".bold().green(),
        token.cyan(),
        url.blue().underline(),
        ttl_minutes.to_string().yellow()
    );
    println!("{}", token);
    Ok(())
}

pub async fn resolve_token(service: &ShortenerService, token: &str) -> Result<(), CliError> {
    let url = service.resolve(token).await?;
    println!("{}", url);
    Ok(())
}

pub async fn show_info(service: &ShortenerService, token: &str) -> Result<(), CliError> {
    let detail = service.info(token).await?;
    let json = serde_json::to_string_pretty(&detail)
        .map_err(|e| CliError::CommandError(format!("Failed to render detail: {}", e)))?;
    println!("{}", json);
    Ok(())
}

pub fn fingerprint_url(url: &str) {
    println!("{}", HashidsFingerprinter.fingerprint(url));
}
