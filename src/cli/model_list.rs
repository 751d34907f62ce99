//! Model listing.

use std::error::Error;
use std::io::Write;

use crate::api::gateway::ChatBackend;

pub async fn list_models(
    backend: &dyn ChatBackend,
    default_model: &str,
    out: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    let models = backend.list_models().await?;

    writeln!(out, "🤖 Available Models")?;
    writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    if models.is_empty() {
        writeln!(out, "No models found.")?;
        return Ok(());
    }

    for model in models {
        let marker = if model.id == default_model { "🎯" } else { "  " };
        let vision = if model.vision { " [vision]" } else { "" };
        writeln!(out, "{marker} {} ({}){vision}", model.name, model.id)?;
    }
    Ok(())
}
