mod extract;
mod import;
mod ping;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "potluck")]
#[command(about = "Potluck recipe importer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a recipe from a URL and print the draft as JSON
    Import {
        /// Recipe page URL
        url: String,
        /// Fail instead of prompting the model when the page has no article body
        #[arg(long)]
        reject_empty: bool,
        /// Renumber instruction steps 1..n before printing
        #[arg(long)]
        resequence: bool,
    },
    /// Fetch a page (or read a local file) and print the extracted article
    Extract {
        /// Page URL
        #[arg(required_unless_present = "file")]
        url: Option<String>,
        /// Read HTML from a local file instead of fetching
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,
    },
    /// Ping the server (unauthenticated)
    Ping {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            url,
            reject_empty,
            resequence,
        } => {
            import::import(&url, reject_empty, resequence).await?;
        }
        Commands::Extract { url, file } => {
            extract::extract(url.as_deref(), file.as_deref()).await?;
        }
        Commands::Ping { server } => {
            ping::ping(&server).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extract_needs_url_or_file() {
        assert!(Cli::try_parse_from(["potluck", "extract"]).is_err());
        assert!(Cli::try_parse_from(["potluck", "extract", "https://example.com"]).is_ok());
        assert!(Cli::try_parse_from(["potluck", "extract", "--file", "page.html"]).is_ok());
        assert!(Cli::try_parse_from([
            "potluck",
            "extract",
            "https://example.com",
            "--file",
            "p.html"
        ])
        .is_err());
    }

    #[test]
    fn import_flags() {
        let cli = Cli::try_parse_from([
            "potluck",
            "import",
            "https://example.com",
            "--reject-empty",
        ])
        .unwrap();
        match cli.command {
            Commands::Import {
                url,
                reject_empty,
                resequence,
            } => {
                assert_eq!(url, "https://example.com");
                assert!(reject_empty);
                assert!(!resequence);
            }
            _ => panic!("expected import command"),
        }
    }
}
