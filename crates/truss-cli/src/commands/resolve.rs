//! The `truss resolve` command.
//!
//! Builds the repository set from truss.toml, runs one resolution session
//! and prints the resolved metadata as JSON. Repositories are tried in
//! configuration order; only absence falls through to the next one.

use std::sync::Arc;

use anyhow::{bail, Context};
use camino::Utf8Path;
use tracing::info;

use truss_config::TrussConfig;
use truss_core::types::{ModuleCoordinate, ResolveOverrides};
use truss_metadata::{resolve_module, Repository, ResolutionContext};
use truss_registry::{
    ArtifactCache, ArtifactResolver, AuthConfig, DirRepository, HttpRepository, OutcomeSink,
    RemoteRepository,
};

pub async fn execute(
    coordinate: &str,
    config_path: &Utf8Path,
    force_version: Option<String>,
) -> anyhow::Result<()> {
    let coordinate: ModuleCoordinate = coordinate
        .parse()
        .context("Invalid module coordinate")?;
    let config = TrussConfig::load(config_path)
        .await
        .with_context(|| format!("Failed to load configuration from {config_path}"))?;
    if config.repositories.is_empty() {
        bail!("No repositories configured in {config_path}");
    }

    let ctx = ResolutionContext::new(build_repositories(&config)?);
    let outcomes = OutcomeSink::new();
    let overrides = match force_version {
        Some(version) => ResolveOverrides::with_forced_version(version),
        None => ResolveOverrides::none(),
    };

    let resolved = match resolve_module(&ctx, &coordinate, &overrides, &outcomes).await {
        Ok(resolved) => resolved,
        Err(error) => {
            if let Some(suggestion) = error.suggestion() {
                eprintln!("hint: {suggestion}");
            }
            return Err(error.into());
        }
    };

    match resolved {
        Some(resolved) => {
            info!(
                "Resolved '{}' from repository '{}'",
                resolved.metadata.id, resolved.repository
            );
            let rendered = serde_json::to_string_pretty(&resolved.metadata)
                .context("Failed to render metadata")?;
            println!("{rendered}");
            Ok(())
        }
        None => {
            eprintln!(
                "Module '{}' was not found in any configured repository ({})",
                coordinate,
                outcomes.summary()
            );
            for attempt in outcomes.attempts() {
                eprintln!("  {}: {}", attempt.repository, attempt.location);
            }
            std::process::exit(1);
        }
    }
}

fn build_repositories(config: &TrussConfig) -> anyhow::Result<Vec<Repository>> {
    let cache = Arc::new(ArtifactCache::new(config.cache_dir.clone()));
    let mut repositories = Vec::new();
    for repository in &config.repositories {
        let url = repository.parsed_url()?;
        let remote: Arc<dyn RemoteRepository> = if url.scheme() == "file" {
            Arc::new(DirRepository::from_file_url(&url)?)
        } else {
            let auth = repository
                .auth
                .as_ref()
                .map(|auth| AuthConfig {
                    token: auth.token.clone(),
                    username: auth.username.clone(),
                    password: auth.password.clone(),
                })
                .unwrap_or_default();
            Arc::new(HttpRepository::with_auth(&url, auth)?)
        };
        let resolver = ArtifactResolver::new(repository.name.clone(), remote, Arc::clone(&cache));
        repositories.push(Repository::new(
            repository.name.clone(),
            repository.format,
            resolver,
        ));
    }
    Ok(repositories)
}
