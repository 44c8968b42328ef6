//! Inject command - write the manifest into the service worker

use crate::config::Config;
use crate::error::SwBuildResult;
use crate::manifest::{inject_manifest, TransformChain};
use crate::ui::{self, UiContext};

/// Execute the inject command
pub async fn execute(config: &Config) -> SwBuildResult<()> {
    let ctx = UiContext::detect();

    let result = inject_manifest(&config.manifest, &config.inject, TransformChain::new()).await?;

    for warning in &result.warnings {
        ui::step_warn(&ctx, warning);
    }

    for path in &result.file_paths {
        ui::step_ok_detail(
            &ctx,
            &format!("Injected {} entries ({} bytes)", result.count, result.size),
            &path.display().to_string(),
        );
    }

    Ok(())
}
