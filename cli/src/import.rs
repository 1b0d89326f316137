use anyhow::{Context, Result};
use potluck_core::ai::AiConfig;
use potluck_core::{BrowserClientBuilder, EmptyContentPolicy, RecipeImporter};
use std::sync::Arc;

/// Run the full import pipeline locally and print the draft.
pub async fn import(url: &str, reject_empty: bool, resequence: bool) -> Result<()> {
    let ai = AiConfig::from_env().context("Invalid completion service configuration")?;
    let http = BrowserClientBuilder::from_env()
        .context("Invalid page fetch configuration")?
        .build()
        .context("Failed to build HTTP client")?;

    let policy = if reject_empty {
        EmptyContentPolicy::Reject
    } else {
        EmptyContentPolicy::from_env()
    };

    tracing::debug!(provider = ai.provider.as_str(), model = %ai.model, ?policy, "importing {}", url);

    let importer = RecipeImporter::new(Arc::new(http), ai.build_client())
        .with_completion_params(ai.params)
        .with_empty_content_policy(policy);

    match importer.import(url).await {
        Ok(mut draft) => {
            if resequence {
                draft.resequence_instructions();
            }
            println!("{}", serde_json::to_string_pretty(&draft)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.to_payload())?);
            Err(anyhow::Error::new(e).context(format!("Import of {} failed", url)))
        }
    }
}
