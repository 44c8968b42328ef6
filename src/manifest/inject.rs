//! Writing the precache manifest into a service worker

use crate::config::{InjectConfig, ManifestConfig};
use crate::error::{SwBuildError, SwBuildResult};
use crate::manifest::{get_manifest, producer, TransformChain};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output of [`inject_manifest`]
#[derive(Debug, Clone, Serialize)]
pub struct InjectManifestResult {
    pub count: usize,
    pub size: u64,
    pub warnings: Vec<String>,
    /// Files written
    pub file_paths: Vec<PathBuf>,
}

/// Generate the manifest and replace the injection point in `sw_src` with
/// it, writing the result to `sw_dest`.
pub async fn inject_manifest(
    manifest_config: &ManifestConfig,
    inject_config: &InjectConfig,
    chain: TransformChain,
) -> SwBuildResult<InjectManifestResult> {
    let src = absolute(&inject_config.sw_src)?;
    let dest = absolute(&inject_config.sw_dest)?;
    if src == dest {
        return Err(SwBuildError::SameSrcAndDest(inject_config.sw_src.clone()));
    }

    let source = tokio::fs::read_to_string(&src)
        .await
        .map_err(|e| SwBuildError::io(format!("reading {}", src.display()), e))?;

    let point = inject_config.injection_point.as_str();
    let count = source.matches(point).count();
    match count {
        0 => {
            return Err(SwBuildError::InjectionPointMissing {
                point: point.to_string(),
                path: inject_config.sw_src.clone(),
            })
        }
        1 => {}
        _ => {
            return Err(SwBuildError::InjectionPointAmbiguous {
                point: point.to_string(),
                path: inject_config.sw_src.clone(),
                count,
            })
        }
    }

    let mut config = manifest_config.clone();
    let glob_root = absolute(&config.glob_directory)?;
    if let Some(relative) = producer::relative_url(&glob_root, &dest) {
        debug!("Ignoring {} while scanning", relative);
        config.glob_ignores.push(globset::escape(&relative));
    }

    let result = get_manifest(&config, chain).await?;
    let json = serde_json::to_string(&result.manifest_entries)?;
    let output = source.replacen(point, &json, 1);

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SwBuildError::io(format!("creating {}", parent.display()), e))?;
    }
    tokio::fs::write(&dest, output)
        .await
        .map_err(|e| SwBuildError::io(format!("writing {}", dest.display()), e))?;

    info!(
        "Injected {} entries into {}",
        result.count,
        inject_config.sw_dest.display()
    );

    Ok(InjectManifestResult {
        count: result.count,
        size: result.size,
        warnings: result.warnings,
        file_paths: vec![inject_config.sw_dest.clone()],
    })
}

fn absolute(path: &Path) -> SwBuildResult<PathBuf> {
    std::path::absolute(path)
        .map_err(|e| SwBuildError::io(format!("resolving {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestEntry;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        manifest: ManifestConfig,
        inject: InjectConfig,
    }

    fn fixture(sw_source: &str) -> Fixture {
        let dir = TempDir::new().unwrap();
        let dist = dir.path().join("dist");
        std::fs::create_dir_all(&dist).unwrap();
        std::fs::write(dist.join("app.js"), "console.log(1)").unwrap();
        std::fs::write(dist.join("index.html"), "<html>").unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/sw.js"), sw_source).unwrap();

        Fixture {
            manifest: ManifestConfig {
                glob_directory: dist.clone(),
                ..Default::default()
            },
            inject: InjectConfig {
                sw_src: dir.path().join("src/sw.js"),
                sw_dest: dist.join("sw.js"),
                ..Default::default()
            },
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn replaces_single_injection_point() {
        let fx = fixture("precacheAndRoute(self.__WB_MANIFEST);\n");

        let result = inject_manifest(&fx.manifest, &fx.inject, TransformChain::new())
            .await
            .unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result.file_paths, vec![fx.inject.sw_dest.clone()]);

        let written = std::fs::read_to_string(&fx.inject.sw_dest).unwrap();
        assert!(!written.contains("self.__WB_MANIFEST"));
        let start = written.find('[').unwrap();
        let end = written.rfind(']').unwrap();
        let entries: Vec<ManifestEntry> =
            serde_json::from_str(&written[start..=end]).unwrap();
        let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["app.js", "index.html"]);
        assert!(entries.iter().all(|e| e.integrity.is_none()));
    }

    #[tokio::test]
    async fn destination_is_not_precached_on_rerun() {
        let fx = fixture("precacheAndRoute(self.__WB_MANIFEST);\n");

        inject_manifest(&fx.manifest, &fx.inject, TransformChain::new())
            .await
            .unwrap();
        let again = inject_manifest(&fx.manifest, &fx.inject, TransformChain::new())
            .await
            .unwrap();

        assert_eq!(again.count, 2);
    }

    #[tokio::test]
    async fn destination_with_glob_characters_is_ignored_literally() {
        let mut fx = fixture("precacheAndRoute(self.__WB_MANIFEST);\n");
        std::fs::write(fx.manifest.glob_directory.join("sw1.js"), "other").unwrap();
        fx.inject.sw_dest = fx.manifest.glob_directory.join("sw[1].js");

        let first = inject_manifest(&fx.manifest, &fx.inject, TransformChain::new())
            .await
            .unwrap();
        let again = inject_manifest(&fx.manifest, &fx.inject, TransformChain::new())
            .await
            .unwrap();

        assert_eq!(first.count, 3);
        assert_eq!(again.count, 3);
        let written = std::fs::read_to_string(&fx.inject.sw_dest).unwrap();
        assert!(written.contains("\"url\":\"sw1.js\""));
        assert!(!written.contains("sw[1].js"));
    }

    #[tokio::test]
    async fn missing_injection_point() {
        let fx = fixture("precacheAndRoute([]);\n");

        let err = inject_manifest(&fx.manifest, &fx.inject, TransformChain::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SwBuildError::InjectionPointMissing { .. }));
        assert!(err.hint().is_some());
        assert!(!fx.inject.sw_dest.exists());
    }

    #[tokio::test]
    async fn repeated_injection_point() {
        let fx = fixture("a(self.__WB_MANIFEST);\nb(self.__WB_MANIFEST);\n");

        let err = inject_manifest(&fx.manifest, &fx.inject, TransformChain::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SwBuildError::InjectionPointAmbiguous { count: 2, .. }
        ));
    }

    #[tokio::test]
    async fn same_src_and_dest() {
        let fx = fixture("self.__WB_MANIFEST");
        let inject = InjectConfig {
            sw_dest: fx.inject.sw_src.clone(),
            ..fx.inject.clone()
        };

        let err = inject_manifest(&fx.manifest, &inject, TransformChain::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SwBuildError::SameSrcAndDest(_)));
    }

    #[tokio::test]
    async fn custom_injection_point_and_nested_dest() {
        let mut fx = fixture("const MANIFEST = __PRECACHE__;\n");
        fx.inject.injection_point = "__PRECACHE__".to_string();
        fx.inject.sw_dest = fx._dir.path().join("out/nested/sw.js");

        inject_manifest(&fx.manifest, &fx.inject, TransformChain::new())
            .await
            .unwrap();

        let written = std::fs::read_to_string(&fx.inject.sw_dest).unwrap();
        assert!(written.starts_with("const MANIFEST = [{\"url\":\"app.js\""));
    }
}
