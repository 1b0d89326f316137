use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct UnauthedPingResponse {
    message: String,
}

pub async fn ping(server: &str) -> Result<()> {
    let url = format!("{}/api/test/unauthed-ping", server.trim_end_matches('/'));

    let response: UnauthedPingResponse = reqwest::get(&url)
        .await
        .with_context(|| format!("Failed to reach {}", url))?
        .error_for_status()?
        .json()
        .await
        .context("Unexpected ping response")?;

    println!("{}", response.message);

    Ok(())
}
