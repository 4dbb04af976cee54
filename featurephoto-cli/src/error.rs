//! Error types emitted by the feature photo CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use featurephoto_data::FetcherBuildError;
use featurephoto_resolver::ResolveError;
use thiserror::Error;

/// Errors emitted by the feature photo CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass it as an argument or set {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced document does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced document path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced document could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening a feature document failed.
    #[error("failed to open feature document at {path:?}: {source}")]
    OpenFeature {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A feature document could not be decoded.
    #[error("failed to parse feature JSON at {path:?}: {source}")]
    ParseFeature {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The document passed as a skeleton carries a full observation.
    #[error("{path:?} is not a skeleton observation")]
    NotASkeleton { path: Utf8PathBuf },
    /// Constructing the HTTP fetcher failed.
    #[error(transparent)]
    BuildFetcher(#[from] FetcherBuildError),
    /// Starting the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Photo resolution failed.
    #[error("photo resolution failed: {0}")]
    Resolve(#[from] ResolveError),
    /// Serialising the resolution failed.
    #[error("failed to serialise resolution: {0}")]
    SerialiseResolution(#[source] serde_json::Error),
    /// Writing the resolution failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
