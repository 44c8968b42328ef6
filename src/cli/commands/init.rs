//! Init command - create a project swbuild.toml

use crate::cli::args::InitArgs;
use crate::config::LOCAL_CONFIG_FILE;
use crate::error::{SwBuildError, SwBuildResult};
use crate::ui::{self, UiContext};
use std::path::Path;
use tokio::fs;

/// Template for the project config
const INIT_TEMPLATE: &str = r#"# swbuild project configuration
# Relative paths are resolved against the directory of this file.

[general]
# log_format = "text"                 # text, json

[manifest]
glob_directory = "dist"
glob_patterns = ["**/*.{js,css,html}"]
# glob_ignores = ["**/node_modules/**/*"]
# maximum_file_size_to_cache_in_bytes = 2097152
# dont_cache_bust_urls_matching = '\.[0-9a-f]{8}\.'
# integrity = false

# [manifest.modify_url_prefix]
# "" = "/static/"

# [manifest.templated_urls]
# "/app-shell" = ["app-shell.html", "app.css"]

# [[manifest.additional_manifest_entries]]
# url = "/offline.html"
# revision = "1"

[inject]
sw_src = "src/sw.js"
sw_dest = "dist/sw.js"
# injection_point = "self.__WB_MANIFEST"

# [[runtime_caching]]
# url_regex = '\.(?:png|jpg|svg)$'
# handler = "CacheFirst"
#
# [runtime_caching.options]
# cache_name = "images"
#
# [runtime_caching.options.expiration]
# max_entries = 60
# max_age_seconds = 2592000
"#;

/// Execute the init command
pub async fn execute(args: InitArgs) -> SwBuildResult<()> {
    let ctx = UiContext::detect();

    let target_dir = match args.path {
        Some(ref p) => p.clone(),
        None => std::env::current_dir()
            .map_err(|e| SwBuildError::io("getting current directory", e))?,
    };

    let config_path = target_dir.join(LOCAL_CONFIG_FILE);

    if config_path.exists() && !args.force {
        return Err(SwBuildError::User(format!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        )));
    }

    ensure_dir(&target_dir).await?;

    fs::write(&config_path, INIT_TEMPLATE)
        .await
        .map_err(|e| SwBuildError::io(format!("writing {}", config_path.display()), e))?;

    ui::step_ok_detail(
        &ctx,
        "Created project config",
        &config_path.display().to_string(),
    );

    Ok(())
}

async fn ensure_dir(dir: &Path) -> SwBuildResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| SwBuildError::io(format!("creating directory {}", dir.display()), e))?;
    }
    Ok(())
}
