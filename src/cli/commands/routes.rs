//! Routes command - compile runtime caching rules

use crate::cli::args::{OutputFormat, RoutesArgs};
use crate::config::Config;
use crate::error::SwBuildResult;
use crate::routing::{compile_config, RouteSummary};
use crate::ui::{self, UiContext};
use console::style;

/// Execute the routes command
pub async fn execute(args: RoutesArgs, config: &Config) -> SwBuildResult<()> {
    let router = compile_config(&config.runtime_caching)?;
    let summaries = router.summaries();

    match args.format {
        OutputFormat::Json => print_json(&summaries)?,
        OutputFormat::Table => print_table(&summaries),
    }

    Ok(())
}

fn print_table(summaries: &[RouteSummary]) {
    let ctx = UiContext::detect();

    if summaries.is_empty() {
        ui::step_info(&ctx, "No runtime caching rules configured");
        return;
    }

    ui::intro(&ctx, "Runtime caching routes");

    println!(
        "{:<4} {:<8} {:<40} {:<22} {}",
        style("#").bold(),
        style("METHOD").bold(),
        style("PATTERN").bold(),
        style("HANDLER").bold(),
        style("PLUGINS").bold()
    );
    println!("{}", "-".repeat(90));

    for summary in summaries {
        let plugins = summary
            .strategy
            .as_ref()
            .map(|s| {
                s.plugins
                    .iter()
                    .map(|p| p.kind())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default();

        println!(
            "{:<4} {:<8} {:<40} {:<22} {}",
            summary.index,
            summary.method,
            summary.url_pattern,
            style(&summary.handler).cyan(),
            style(plugins).dim()
        );
    }

    println!();
    println!("{} route(s)", summaries.len());
}

fn print_json(summaries: &[RouteSummary]) -> SwBuildResult<()> {
    let json = serde_json::to_string_pretty(summaries)?;
    println!("{}", json);
    Ok(())
}
