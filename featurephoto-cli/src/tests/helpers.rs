//! Test helpers for writing feature documents and stubbing providers.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use featurephoto_core::test_support::{TOWER_CENTER, node, tags};
use featurephoto_core::{Feature, JsonFetcher};
use featurephoto_data::test_support::StubFetcher;
use std::sync::Arc;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test file");
}

pub(super) fn write_feature(path: &Utf8Path, feature: &Feature) {
    let payload = serde_json::to_string_pretty(feature).expect("serialise feature");
    write_utf8(path, payload.as_bytes());
}

pub(super) fn full_feature(id: i64) -> Feature {
    Feature::full(node(id), TOWER_CENTER, tags(&[("amenity", "bench")]))
}

pub(super) fn skeleton_feature(id: i64) -> Feature {
    Feature::skeleton(node(id), TOWER_CENTER)
}

/// Temporary directory holding feature documents.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

/// Hands every resolver the same stub fetcher.
pub(super) struct StubFetcherBuilder {
    pub(super) stub: Arc<StubFetcher>,
}

impl FetcherBuilder for StubFetcherBuilder {
    fn build(&self, _config: &ResolveConfig) -> Result<Arc<dyn JsonFetcher>, CliError> {
        Ok(self.stub.clone())
    }
}
