//! Provider response types.
//!
//! Mapillary and Fody answer with GeoJSON feature collections; the wiki
//! APIs answer with MediaWiki action API documents whose shape depends on
//! the endpoint. Unknown fields are ignored throughout.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::Value;

/// GeoJSON feature collection with typed properties.
#[derive(Debug, Deserialize)]
pub(super) struct FeatureCollection<P> {
    pub(super) features: Vec<GeoFeature<P>>,
}

impl<P> FeatureCollection<P> {
    pub(super) fn into_first(self) -> Option<P> {
        self.features
            .into_iter()
            .next()
            .map(|feature| feature.properties)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GeoFeature<P> {
    pub(super) properties: P,
}

/// Properties of a Mapillary v3 image feature.
#[derive(Debug, Deserialize)]
pub(super) struct MapillaryImage {
    pub(super) key: String,
    #[serde(default)]
    pub(super) username: Option<String>,
}

/// Properties of a Fody photo database entry.
#[derive(Debug, Deserialize)]
pub(super) struct FodyPhoto {
    pub(super) id: u64,
    #[serde(default)]
    pub(super) author: Option<String>,
    #[serde(default)]
    pub(super) created: Option<String>,
}

/// Any reply from a MediaWiki action API.
#[derive(Debug, Default, Deserialize)]
pub(super) struct WikiResponse {
    #[serde(default)]
    claims: Option<HashMap<String, Vec<Claim>>>,
    #[serde(default)]
    query: Option<WikiQuery>,
}

#[derive(Debug, Deserialize)]
struct Claim {
    mainsnak: Snak,
}

#[derive(Debug, Deserialize)]
struct Snak {
    #[serde(default)]
    datavalue: Option<DataValue>,
}

#[derive(Debug, Deserialize)]
struct DataValue {
    value: Value,
}

#[derive(Debug, Deserialize)]
struct WikiQuery {
    #[serde(default, deserialize_with = "pages_in_document_order")]
    pages: Vec<WikiPage>,
}

// Page ids are object keys; keep the order the API sent them in.
fn pages_in_document_order<'de, D>(deserializer: D) -> Result<Vec<WikiPage>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PagesVisitor;

    impl<'de> Visitor<'de> for PagesVisitor {
        type Value = Vec<WikiPage>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("an object of pages keyed by page id")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pages = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((IgnoredAny, page)) = map.next_entry::<IgnoredAny, WikiPage>()? {
                pages.push(page);
            }
            Ok(pages)
        }
    }

    deserializer.deserialize_map(PagesVisitor)
}

#[derive(Debug, Deserialize)]
pub(super) struct WikiPage {
    #[serde(default)]
    imageinfo: Option<Vec<ImageInfo>>,
    #[serde(default)]
    pub(super) pageimage: Option<String>,
    #[serde(default)]
    pub(super) thumbnail: Option<Thumbnail>,
}

/// One `imageinfo` entry returned by Commons with `iiurlwidth` set.
#[derive(Debug, Deserialize)]
pub(super) struct ImageInfo {
    #[serde(default)]
    pub(super) descriptionshorturl: Option<String>,
    #[serde(default)]
    pub(super) thumburl: Option<String>,
    #[serde(default)]
    pub(super) thumbwidth: Option<u32>,
    #[serde(default)]
    pub(super) thumbheight: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Thumbnail {
    pub(super) source: String,
    pub(super) width: u32,
    pub(super) height: u32,
}

/// Shape of a wiki reply, decided from the fields it carries.
#[derive(Debug)]
pub(super) enum WikiReply<'a> {
    /// Wikidata claims; carries the P18 image file name when present.
    Wikidata(Option<&'a str>),
    /// Commons image info entries.
    Wikimedia(&'a [ImageInfo]),
    /// Wikipedia page with a page image.
    Wikipedia(&'a WikiPage),
    /// Nothing recognisable, including API error documents.
    Unknown,
}

impl WikiResponse {
    /// Classify the reply. Page data wins over claims.
    pub(super) fn classify(&self) -> WikiReply<'_> {
        if let Some(page) = self.first_page() {
            if let Some(images) = &page.imageinfo {
                return WikiReply::Wikimedia(images);
            }
            if page.pageimage.is_some() {
                return WikiReply::Wikipedia(page);
            }
        }
        match &self.claims {
            Some(claims) => WikiReply::Wikidata(image_claim(claims)),
            None => WikiReply::Unknown,
        }
    }

    fn first_page(&self) -> Option<&WikiPage> {
        self.query.as_ref()?.pages.first()
    }
}

fn image_claim(claims: &HashMap<String, Vec<Claim>>) -> Option<&str> {
    claims
        .get("P18")?
        .first()?
        .mainsnak
        .datavalue
        .as_ref()?
        .value
        .as_str()
}
