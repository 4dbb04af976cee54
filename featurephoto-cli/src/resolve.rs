//! Resolve command implementation.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use featurephoto_core::{Feature, JsonFetcher, Resolution};
use featurephoto_data::{HttpJsonFetcher, HttpJsonFetcherConfig};
use featurephoto_resolver::{FeaturePhotoResolver, ResolverConfig};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::document::{load_feature, load_skeleton, require_file};
use crate::{
    ARG_CACHE_TTL_SECS, ARG_FEATURE, ARG_HTTP_TIMEOUT_SECS, ARG_MAPILLARY_CLIENT_ID,
    ARG_SKELETON, ARG_SOURCE_TIMEOUT_SECS, CliError, ENV_FEATURE,
};

/// CLI arguments for the `resolve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve a photo for a feature described by a JSON document. \
                 Wiki images linked from the feature's tags win over the Fody \
                 photo database, which wins over Mapillary street imagery. \
                 Options can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Resolve a photo for a feature document"
)]
#[ortho_config(prefix = "FEATUREPHOTO")]
pub(crate) struct ResolveArgs {
    /// Path to a JSON document holding the full feature observation.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) feature_path: Option<Utf8PathBuf>,
    /// Path to a skeleton observation resolved before the full feature.
    #[arg(long = ARG_SKELETON, value_name = "path")]
    #[serde(default)]
    pub(crate) skeleton: Option<Utf8PathBuf>,
    /// Mapillary application client id.
    #[arg(long = ARG_MAPILLARY_CLIENT_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) mapillary_client_id: Option<String>,
    /// Upper bound on each source lookup, in seconds.
    #[arg(long = ARG_SOURCE_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) source_timeout_secs: Option<u64>,
    /// HTTP connect and request timeout, in seconds.
    #[arg(long = ARG_HTTP_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) http_timeout_secs: Option<u64>,
    /// Lifetime of cached provider responses, in seconds; 0 disables caching.
    #[arg(long = ARG_CACHE_TTL_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) cache_ttl_secs: Option<u64>,
}

impl ResolveArgs {
    pub(crate) fn into_config(self) -> Result<ResolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ResolveConfig::try_from(merged)
    }
}

/// Resolved `resolve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolveConfig {
    /// Full feature document.
    pub(crate) feature_path: Utf8PathBuf,
    /// Optional skeleton document.
    pub(crate) skeleton_path: Option<Utf8PathBuf>,
    /// Source endpoints and timeout.
    pub(crate) resolver: ResolverConfig,
    /// HTTP client settings.
    pub(crate) fetcher: HttpJsonFetcherConfig,
}

impl ResolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_file(&self.feature_path, ARG_FEATURE)?;
        if let Some(skeleton) = &self.skeleton_path {
            require_file(skeleton, ARG_SKELETON)?;
        }
        Ok(())
    }
}

impl TryFrom<ResolveArgs> for ResolveConfig {
    type Error = CliError;

    fn try_from(args: ResolveArgs) -> Result<Self, Self::Error> {
        let feature_path = args.feature_path.ok_or(CliError::MissingArgument {
            field: ARG_FEATURE,
            env: ENV_FEATURE,
        })?;

        let mut resolver = ResolverConfig::default();
        if let Some(client_id) = args.mapillary_client_id {
            resolver.mapillary = resolver.mapillary.with_client_id(client_id);
        }
        if let Some(secs) = args.source_timeout_secs {
            resolver = resolver.with_source_timeout(Duration::from_secs(secs));
        }

        let mut fetcher = HttpJsonFetcherConfig::default();
        if let Some(secs) = args.http_timeout_secs {
            fetcher = fetcher.with_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = args.cache_ttl_secs {
            fetcher = fetcher.with_cache_ttl(Duration::from_secs(secs));
        }

        Ok(Self {
            feature_path,
            skeleton_path: args.skeleton,
            resolver,
            fetcher,
        })
    }
}

/// Builds the JSON fetcher shared by every source.
pub(crate) trait FetcherBuilder {
    fn build(&self, config: &ResolveConfig) -> Result<Arc<dyn JsonFetcher>, CliError>;
}

pub(crate) struct HttpFetcherBuilder;

impl FetcherBuilder for HttpFetcherBuilder {
    fn build(&self, config: &ResolveConfig) -> Result<Arc<dyn JsonFetcher>, CliError> {
        let fetcher = HttpJsonFetcher::with_config(config.fetcher.clone())?;
        Ok(Arc::new(fetcher))
    }
}

pub(crate) fn run_resolve(args: ResolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_resolve_with(args, &HttpFetcherBuilder, &mut stdout)
}

pub(crate) fn run_resolve_with(
    args: ResolveArgs,
    builder: &dyn FetcherBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let resolution = execute_resolve(&config, builder)?;
    write_resolution(writer, &resolution)
}

fn execute_resolve(
    config: &ResolveConfig,
    builder: &dyn FetcherBuilder,
) -> Result<Resolution, CliError> {
    let skeleton = config
        .skeleton_path
        .as_deref()
        .map(load_skeleton)
        .transpose()?;
    let feature = load_feature(&config.feature_path)?;
    let fetcher = builder.build(config)?;
    let resolver = FeaturePhotoResolver::with_config(fetcher, config.resolver.clone());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let resolution = runtime.block_on(observe(&resolver, skeleton.as_ref(), &feature))?;
    info!("resolved {}", config.feature_path);
    Ok(resolution)
}

async fn observe(
    resolver: &FeaturePhotoResolver,
    skeleton: Option<&Feature>,
    feature: &Feature,
) -> Result<Resolution, CliError> {
    if let Some(skeleton) = skeleton {
        resolver.resolve(skeleton).await?;
    }
    Ok(resolver.resolve(feature).await?)
}

pub(crate) fn write_resolution(
    writer: &mut dyn Write,
    resolution: &Resolution,
) -> Result<(), CliError> {
    let payload =
        serde_json::to_string_pretty(resolution).map_err(CliError::SerialiseResolution)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
