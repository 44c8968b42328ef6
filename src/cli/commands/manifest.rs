//! Manifest command - print the precache manifest

use crate::cli::args::{ManifestArgs, OutputFormat};
use crate::config::Config;
use crate::error::SwBuildResult;
use crate::manifest::{get_manifest, GetManifestResult, TransformChain};
use crate::ui::{self, UiContext};
use console::style;

/// Execute the manifest command
pub async fn execute(args: ManifestArgs, config: &Config) -> SwBuildResult<()> {
    let result = get_manifest(&config.manifest, TransformChain::new()).await?;

    match args.format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => print_table(&result),
    }

    Ok(())
}

fn print_table(result: &GetManifestResult) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Precache manifest");

    if result.manifest_entries.is_empty() {
        ui::step_info(&ctx, "No files matched");
    } else {
        println!("{:<50} {:<34}", style("URL").bold(), style("REVISION").bold());
        println!("{}", "-".repeat(84));

        for entry in &result.manifest_entries {
            let revision = match entry.revision {
                Some(ref r) => style(r.as_str()).dim(),
                None => style("(none)").yellow(),
            };
            println!("{:<50} {:<34}", entry.url, revision);
        }
        println!();
    }

    for warning in &result.warnings {
        ui::step_warn(&ctx, warning);
    }

    ui::outro_success(
        &ctx,
        &format!("{} entries, {} bytes", result.count, result.size),
    );
}

fn print_json(result: &GetManifestResult) -> SwBuildResult<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{}", json);
    Ok(())
}
