//! Focused unit tests covering resolve configuration and document loading.

use super::helpers::{Workspace, full_feature, skeleton_feature, write_feature, write_utf8};
use super::*;
use crate::document::{load_feature, load_skeleton};
use featurephoto_core::Resolution;
use featurephoto_data::HttpJsonFetcherConfig;
use featurephoto_resolver::ResolverConfig;
use rstest::rstest;
use std::time::Duration;

#[rstest]
fn converting_without_feature_path_errors() {
    let err = ResolveConfig::try_from(ResolveArgs::default()).expect_err("missing path");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_FEATURE);
            assert_eq!(env, ENV_FEATURE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn conversion_keeps_library_defaults() {
    let args = ResolveArgs {
        feature_path: Some("feature.json".into()),
        ..ResolveArgs::default()
    };

    let config = ResolveConfig::try_from(args).expect("config should build");

    assert_eq!(config.skeleton_path, None);
    assert_eq!(config.resolver, ResolverConfig::default());
    assert_eq!(config.fetcher, HttpJsonFetcherConfig::default());
}

#[rstest]
fn conversion_applies_overrides() {
    let args = ResolveArgs {
        feature_path: Some("feature.json".into()),
        skeleton: Some("skeleton.json".into()),
        mapillary_client_id: Some("client".to_owned()),
        source_timeout_secs: Some(3),
        http_timeout_secs: Some(7),
        cache_ttl_secs: Some(0),
    };

    let config = ResolveConfig::try_from(args).expect("config should build");

    assert_eq!(config.skeleton_path.as_deref().map(|p| p.as_str()), Some("skeleton.json"));
    assert_eq!(config.resolver.mapillary.client_id, "client");
    assert_eq!(config.resolver.source_timeout, Duration::from_secs(3));
    assert_eq!(config.fetcher.timeout, Duration::from_secs(7));
    assert_eq!(config.fetcher.cache_ttl, Duration::ZERO);
}

#[rstest]
fn validate_sources_reports_missing_feature() {
    let workspace = Workspace::new();
    let config = ResolveConfig {
        feature_path: workspace.path("missing.json"),
        skeleton_path: None,
        resolver: ResolverConfig::default(),
        fetcher: HttpJsonFetcherConfig::default(),
    };

    match config.validate_sources().expect_err("expected failure") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_FEATURE),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_skeleton_directory() {
    let workspace = Workspace::new();
    let feature_path = workspace.path("feature.json");
    write_feature(&feature_path, &full_feature(1));
    let skeleton_path = workspace.path("skeleton");
    std::fs::create_dir(&skeleton_path).expect("skeleton directory");
    let config = ResolveConfig {
        feature_path,
        skeleton_path: Some(skeleton_path),
        resolver: ResolverConfig::default(),
        fetcher: HttpJsonFetcherConfig::default(),
    };

    match config.validate_sources().expect_err("expected failure") {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_SKELETON),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn feature_documents_round_trip_from_disk() {
    let workspace = Workspace::new();
    let path = workspace.path("feature.json");
    write_feature(&path, &full_feature(5));

    assert_eq!(load_feature(&path).expect("load feature"), full_feature(5));
}

#[rstest]
fn invalid_feature_json_is_reported() {
    let workspace = Workspace::new();
    let path = workspace.path("feature.json");
    write_utf8(&path, b"{ \"origin\": ");

    match load_feature(&path).expect_err("expected parse failure") {
        CliError::ParseFeature { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseFeature, found {other:?}"),
    }
}

#[rstest]
fn full_document_is_not_a_skeleton() {
    let workspace = Workspace::new();
    let path = workspace.path("skeleton.json");
    write_feature(&path, &full_feature(1));

    assert!(matches!(
        load_skeleton(&path),
        Err(CliError::NotASkeleton { .. })
    ));

    write_feature(&path, &skeleton_feature(1));
    assert_eq!(load_skeleton(&path).expect("skeleton"), skeleton_feature(1));
}

#[rstest]
#[case(0, LevelFilter::Warn)]
#[case(1, LevelFilter::Info)]
#[case(2, LevelFilter::Debug)]
#[case(5, LevelFilter::Trace)]
fn verbosity_maps_to_log_level(#[case] verbose: u8, #[case] expected: LevelFilter) {
    assert_eq!(level_for(verbose), expected);
}

#[rstest]
fn verbose_flag_is_global() {
    let cli = Cli::try_parse_from(["featurephoto", "resolve", "feature.json", "-vv"])
        .expect("arguments should parse");
    assert_eq!(cli.verbose, 2);
}

#[rstest]
fn empty_resolution_prints_status_only() {
    let mut buffer = Vec::new();
    crate::resolve::write_resolution(&mut buffer, &Resolution::Empty)
        .expect("write resolution");
    let printed: serde_json::Value =
        serde_json::from_slice(&buffer).expect("output should be JSON");
    assert_eq!(printed, serde_json::json!({ "status": "empty" }));
}
