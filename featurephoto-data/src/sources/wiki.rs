//! Wikidata, Wikimedia Commons and Wikipedia images.
//!
//! A Wikidata reply only names an image file, so it is dereferenced once
//! through the Commons image info API. The second reply is never followed
//! further, which bounds the chain at two requests.

use std::sync::Arc;

use featurephoto_core::{
    JsonFetcher, PhotoRecord, Tags, WikiEndpoints, WikiTarget, wiki_target,
};
use log::debug;

use super::SourceError;
use super::wire::{ImageInfo, WikiPage, WikiReply, WikiResponse};

const PROVIDER: &str = "wiki";

/// Resolves tag-linked wiki images.
#[derive(Clone)]
pub struct WikiSource {
    fetcher: Arc<dyn JsonFetcher>,
    endpoints: WikiEndpoints,
}

impl std::fmt::Debug for WikiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WikiSource")
            .field("fetcher", &"<dyn JsonFetcher>")
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl WikiSource {
    /// Create a source querying through `fetcher`.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, endpoints: WikiEndpoints) -> Self {
        Self { fetcher, endpoints }
    }

    /// Wiki request selected for `tags`, if any.
    #[must_use]
    pub fn target(&self, tags: &Tags) -> Option<WikiTarget> {
        wiki_target(tags, &self.endpoints)
    }

    /// Resolve the image linked from `tags`.
    ///
    /// Returns `Ok(None)` when no wiki tag is present or the linked entry
    /// carries no usable image.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when a request fails or a reply is not a JSON
    /// object.
    pub async fn lookup(&self, tags: &Tags) -> Result<Option<PhotoRecord>, SourceError> {
        let Some(target) = self.target(tags) else {
            return Ok(None);
        };
        let first = self.fetch(&target).await?;
        match first.classify() {
            WikiReply::Wikidata(Some(file)) => {
                let commons = WikiTarget::commons(&self.endpoints, &format!("File:{file}"));
                let second = self.fetch(&commons).await?;
                Ok(self.normalise(second.classify()))
            }
            reply => Ok(self.normalise(reply)),
        }
    }

    async fn fetch(&self, target: &WikiTarget) -> Result<WikiResponse, SourceError> {
        let body = self.fetcher.fetch_json(&target.url).await?;
        let response: WikiResponse = serde_json::from_value(body)
            .map_err(|err| SourceError::shape(PROVIDER, &target.url, &err))?;
        debug!("{:?} reply from {}", target.kind, target.url);
        Ok(response)
    }

    fn normalise(&self, reply: WikiReply<'_>) -> Option<PhotoRecord> {
        match reply {
            WikiReply::Wikimedia(images) => images.first().and_then(commons_record),
            WikiReply::Wikipedia(page) => self.wikipedia_record(page),
            WikiReply::Wikidata(_) | WikiReply::Unknown => None,
        }
    }

    fn wikipedia_record(&self, page: &WikiPage) -> Option<PhotoRecord> {
        let file = page.pageimage.as_deref()?;
        let thumbnail = page.thumbnail.as_ref()?;
        Some(
            PhotoRecord::new(
                "Wikipedia",
                self.endpoints.commons_file_page(file),
                thumbnail.source.clone(),
            )
            .with_portrait(thumbnail.width < thumbnail.height),
        )
    }
}

fn commons_record(image: &ImageInfo) -> Option<PhotoRecord> {
    let thumb = image.thumburl.clone()?;
    let link = image.descriptionshorturl.clone().unwrap_or_default();
    let record = PhotoRecord::new("Wikimedia", link, thumb);
    Some(match (image.thumbwidth, image.thumbheight) {
        (Some(width), Some(height)) => record.with_portrait(width < height),
        _ => record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubFetcher, block_on_for_tests};
    use featurephoto_core::test_support::tags;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    const WIKIDATA: &str = "https://www.wikidata.org/";
    const COMMONS: &str = "https://commons.wikimedia.org/";

    #[fixture]
    fn stub() -> Arc<StubFetcher> {
        Arc::new(StubFetcher::new())
    }

    fn source(stub: &Arc<StubFetcher>) -> WikiSource {
        WikiSource::new(stub.clone(), WikiEndpoints::default())
    }

    fn commons_reply() -> Value {
        json!({ "query": { "pages": { "1": {
            "title": "File:Tour Eiffel.jpg",
            "imageinfo": [{
                "thumburl": "https://upload.wikimedia.org/640px-Tour_Eiffel.jpg",
                "thumbwidth": 640,
                "thumbheight": 960,
                "descriptionshorturl": "https://commons.wikimedia.org/w/index.php?curid=1"
            }]
        }}}})
    }

    #[rstest]
    fn wikidata_is_dereferenced_through_commons(stub: Arc<StubFetcher>) {
        stub.respond(
            WIKIDATA,
            json!({ "claims": { "P18": [{
                "mainsnak": { "datavalue": { "value": "Tour Eiffel.jpg", "type": "string" } }
            }]}}),
        );
        stub.respond(COMMONS, commons_reply());

        let record = block_on_for_tests(source(&stub).lookup(&tags(&[("wikidata", "Q243")])))
            .expect("lookup should succeed")
            .expect("image expected");

        assert_eq!(record.source, "Wikimedia");
        assert_eq!(
            record.thumb,
            "https://upload.wikimedia.org/640px-Tour_Eiffel.jpg"
        );
        assert_eq!(
            record.link,
            "https://commons.wikimedia.org/w/index.php?curid=1"
        );
        assert_eq!(record.portrait, Some(true));
        let requests = stub.requests();
        assert_eq!(requests.len(), 2);
        assert!(
            requests[1].contains("titles=File%3ATour+Eiffel.jpg"),
            "unexpected second request {}",
            requests[1]
        );
    }

    #[rstest]
    fn wikidata_without_image_stops_after_one_request(stub: Arc<StubFetcher>) {
        stub.respond(WIKIDATA, json!({ "claims": {} }));

        let outcome = block_on_for_tests(source(&stub).lookup(&tags(&[("wikidata", "Q1")])))
            .expect("lookup should succeed");

        assert!(outcome.is_none());
        assert_eq!(stub.requests().len(), 1);
    }

    #[rstest]
    fn empty_imageinfo_is_a_soft_miss(stub: Arc<StubFetcher>) {
        stub.respond(
            COMMONS,
            json!({ "query": { "pages": { "1": { "imageinfo": [] } } } }),
        );

        let outcome = block_on_for_tests(
            source(&stub).lookup(&tags(&[("wikimedia_commons", "File:Gone.jpg")])),
        )
        .expect("lookup should succeed");

        assert!(outcome.is_none());
    }

    #[rstest]
    fn wikipedia_links_to_commons_file_page(stub: Arc<StubFetcher>) {
        stub.respond(
            "https://fr.wikipedia.org/",
            json!({ "query": { "pages": { "1359783": {
                "pageimage": "Tour_Eiffel_Wikimedia_Commons.jpg",
                "thumbnail": {
                    "source": "https://upload.wikimedia.org/fr-thumb.jpg",
                    "width": 640,
                    "height": 480
                }
            }}}}),
        );

        let record = block_on_for_tests(
            source(&stub).lookup(&tags(&[("wikipedia", "fr:Tour_Eiffel")])),
        )
        .expect("lookup should succeed")
        .expect("image expected");

        assert_eq!(record.source, "Wikipedia");
        assert_eq!(
            record.link,
            "https://commons.wikimedia.org/wiki/File:Tour_Eiffel_Wikimedia_Commons.jpg"
        );
        assert_eq!(record.thumb, "https://upload.wikimedia.org/fr-thumb.jpg");
        assert_eq!(record.portrait, Some(false));
    }

    #[rstest]
    fn wikipedia_page_without_thumbnail_is_a_soft_miss(stub: Arc<StubFetcher>) {
        stub.respond(
            "https://en.wikipedia.org/",
            json!({ "query": { "pages": { "1": { "pageimage": "Orphan.jpg" } } } }),
        );

        let outcome =
            block_on_for_tests(source(&stub).lookup(&tags(&[("wikipedia", "Orphan")])))
                .expect("lookup should succeed");

        assert!(outcome.is_none());
    }

    #[rstest]
    fn untagged_features_issue_no_request(stub: Arc<StubFetcher>) {
        let outcome =
            block_on_for_tests(source(&stub).lookup(&tags(&[("amenity", "bench")])))
                .expect("lookup should succeed");

        assert!(outcome.is_none());
        assert!(stub.requests().is_empty());
    }

    #[rstest]
    fn transport_failures_propagate(stub: Arc<StubFetcher>) {
        let err = block_on_for_tests(source(&stub).lookup(&tags(&[("wikidata", "Q243")])))
            .expect_err("should fail");
        assert!(matches!(err, SourceError::Fetch(_)));
    }
}
