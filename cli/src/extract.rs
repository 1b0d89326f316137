use anyhow::{bail, Context, Result};
use potluck_core::{extract_article, BrowserClientBuilder, HttpClient};
use std::path::Path;

/// Print the readable article extracted from a page or a local HTML file.
pub async fn extract(url: Option<&str>, file: Option<&Path>) -> Result<()> {
    let html = match (url, file) {
        (_, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (Some(url), None) => {
            let client = BrowserClientBuilder::from_env()
                .context("Invalid page fetch configuration")?
                .build()
                .context("Failed to build HTTP client")?;
            client
                .fetch_html(url)
                .await
                .with_context(|| format!("Failed to fetch {}", url))?
        }
        (None, None) => bail!("Either a URL or --file is required"),
    };

    let extracted = extract_article(&html, url);

    if let Some(title) = &extracted.page_title {
        eprintln!("Title: {}", title);
    }
    if extracted.is_empty() {
        eprintln!("No article content found");
        return Ok(());
    }

    println!("{}", extracted.content);
    Ok(())
}
