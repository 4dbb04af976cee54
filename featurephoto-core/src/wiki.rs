//! Select a wiki-family API request from a feature's tags.
//!
//! A `wikidata` tag outranks a `wikimedia_commons` tag, which outranks any
//! key starting with `wikipedia`. Features without any of these tags skip
//! the wiki sources entirely.

use log::debug;
use url::form_urlencoded::byte_serialize;

use crate::Tags;

const WIKIDATA_KEY: &str = "wikidata";
const COMMONS_KEY: &str = "wikimedia_commons";
const WIKIPEDIA_PREFIX: &str = "wikipedia";
const DEFAULT_LANGUAGE: &str = "en";
const LANG_PLACEHOLDER: &str = "{lang}";
const THUMB_WIDTH: u32 = 640;

/// Base URLs of the wiki-family APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiEndpoints {
    /// Wikidata action API.
    pub wikidata_api: String,
    /// Wikimedia Commons action API.
    pub commons_api: String,
    /// Wikimedia Commons site root, used for file page links.
    pub commons_site: String,
    /// Wikipedia action API with a `{lang}` placeholder for the language.
    pub wikipedia_api: String,
}

impl Default for WikiEndpoints {
    fn default() -> Self {
        Self {
            wikidata_api: "https://www.wikidata.org/w/api.php".to_owned(),
            commons_api: "https://commons.wikimedia.org/w/api.php".to_owned(),
            commons_site: "https://commons.wikimedia.org".to_owned(),
            wikipedia_api: "https://{lang}.wikipedia.org/w/api.php".to_owned(),
        }
    }
}

impl WikiEndpoints {
    /// Link to the Commons file page of `file_name` (without `File:`).
    #[must_use]
    pub fn commons_file_page(&self, file_name: &str) -> String {
        format!(
            "{}/wiki/File:{file_name}",
            self.commons_site.trim_end_matches('/')
        )
    }

    fn wikipedia_api_for(&self, lang: &str) -> String {
        self.wikipedia_api.replace(LANG_PLACEHOLDER, lang)
    }
}

/// Which wiki API a [`WikiTarget`] addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WikiKind {
    /// Wikidata claims API, property P18.
    Wikidata,
    /// Wikimedia Commons image info API.
    Commons,
    /// Wikipedia page images API.
    Wikipedia,
}

/// A fully built wiki API request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiTarget {
    /// API family addressed by the URL.
    pub kind: WikiKind,
    /// Request URL, including `format=json` and `origin=*`.
    pub url: String,
}

impl WikiTarget {
    /// Claims request for the image property of a Wikidata entity.
    #[must_use]
    pub fn wikidata(endpoints: &WikiEndpoints, entity: &str) -> Self {
        Self {
            kind: WikiKind::Wikidata,
            url: format!(
                "{}?action=wbgetclaims&property=P18&format=json&entity={}&origin=*",
                endpoints.wikidata_api,
                encode(entity)
            ),
        }
    }

    /// Image info request for a Commons title such as `File:Tower.jpg`.
    #[must_use]
    pub fn commons(endpoints: &WikiEndpoints, title: &str) -> Self {
        Self {
            kind: WikiKind::Commons,
            url: format!(
                "{}?action=query&prop=imageinfo&iiprop=url&iiurlwidth={THUMB_WIDTH}&format=json&titles={}&origin=*",
                endpoints.commons_api,
                encode(title)
            ),
        }
    }

    /// Page image request for a `lang:title` or bare title tag value.
    #[must_use]
    pub fn wikipedia(endpoints: &WikiEndpoints, value: &str) -> Self {
        let (lang, title) = split_language(value);
        Self {
            kind: WikiKind::Wikipedia,
            url: format!(
                "{}?action=query&prop=pageimages&pithumbsize={THUMB_WIDTH}&format=json&titles={}&origin=*",
                endpoints.wikipedia_api_for(lang),
                encode(title)
            ),
        }
    }
}

/// Choose the wiki API request for `tags`, if any wiki tag is present.
///
/// # Examples
///
/// ```
/// use featurephoto_core::{Tags, WikiEndpoints, WikiKind, wiki_target};
///
/// let mut tags = Tags::new();
/// tags.insert("wikipedia".into(), "Eiffel_Tower".into());
/// let target = wiki_target(&tags, &WikiEndpoints::default()).expect("wiki tag present");
/// assert_eq!(target.kind, WikiKind::Wikipedia);
/// assert!(target.url.starts_with("https://en.wikipedia.org/"));
/// ```
#[must_use]
pub fn wiki_target(tags: &Tags, endpoints: &WikiEndpoints) -> Option<WikiTarget> {
    let target = if let Some(entity) = tags.get(WIKIDATA_KEY) {
        WikiTarget::wikidata(endpoints, entity)
    } else if let Some(title) = tags.get(COMMONS_KEY) {
        WikiTarget::commons(endpoints, title)
    } else {
        let (_, value) = tags
            .iter()
            .find(|(key, _)| key.starts_with(WIKIPEDIA_PREFIX))?;
        WikiTarget::wikipedia(endpoints, value)
    };
    debug!("selected {:?} wiki request {}", target.kind, target.url);
    Some(target)
}

/// Split `de:Eiffelturm` into `("de", "Eiffelturm")`.
///
/// Values whose prefix does not look like a language code keep the whole
/// value as the title and default to English.
fn split_language(value: &str) -> (&str, &str) {
    match value.split_once(':') {
        Some((lang, title)) if is_language_code(lang) => (lang, title),
        _ => (DEFAULT_LANGUAGE, value),
    }
}

fn is_language_code(candidate: &str) -> bool {
    (2..=12).contains(&candidate.len())
        && candidate
            .bytes()
            .all(|byte| byte.is_ascii_lowercase() || byte == b'-')
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn endpoints() -> WikiEndpoints {
        WikiEndpoints::default()
    }

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[rstest]
    fn wikidata_outranks_other_wiki_tags(endpoints: WikiEndpoints) {
        let tags = tags(&[
            ("wikipedia", "en:Eiffel_Tower"),
            ("wikimedia_commons", "File:Tower.jpg"),
            ("wikidata", "Q243"),
        ]);
        let target = wiki_target(&tags, &endpoints).expect("target expected");
        assert_eq!(target.kind, WikiKind::Wikidata);
        assert_eq!(
            target.url,
            "https://www.wikidata.org/w/api.php?action=wbgetclaims&property=P18&format=json&entity=Q243&origin=*"
        );
    }

    #[rstest]
    fn commons_outranks_wikipedia(endpoints: WikiEndpoints) {
        let tags = tags(&[
            ("wikipedia", "en:Eiffel_Tower"),
            ("wikimedia_commons", "File:Tour Eiffel.jpg"),
        ]);
        let target = wiki_target(&tags, &endpoints).expect("target expected");
        assert_eq!(target.kind, WikiKind::Commons);
        assert!(
            target.url.contains("titles=File%3ATour+Eiffel.jpg"),
            "unexpected url {}",
            target.url
        );
        assert!(target.url.contains("iiurlwidth=640"));
    }

    #[rstest]
    #[case("en:Eiffel_Tower", "https://en.wikipedia.org/", "titles=Eiffel_Tower&")]
    #[case("Eiffel_Tower", "https://en.wikipedia.org/", "titles=Eiffel_Tower&")]
    #[case("de:Eiffelturm", "https://de.wikipedia.org/", "titles=Eiffelturm&")]
    #[case(
        "zh-yue:巴黎鐵塔",
        "https://zh-yue.wikipedia.org/",
        "titles=%E5%B7%B4%E9%BB%8E%E9%90%B5%E5%A1%94&"
    )]
    #[case(
        "Star Wars: Episode IV",
        "https://en.wikipedia.org/",
        "titles=Star+Wars%3A+Episode+IV&"
    )]
    fn wikipedia_language_comes_from_value_prefix(
        endpoints: WikiEndpoints,
        #[case] value: &str,
        #[case] host: &str,
        #[case] title: &str,
    ) {
        let tags = tags(&[("wikipedia", value)]);
        let target = wiki_target(&tags, &endpoints).expect("target expected");
        assert_eq!(target.kind, WikiKind::Wikipedia);
        assert!(target.url.starts_with(host), "unexpected url {}", target.url);
        assert!(target.url.contains(title), "unexpected url {}", target.url);
        assert!(target.url.contains("pithumbsize=640"));
    }

    #[rstest]
    fn prefixed_wikipedia_keys_are_recognised(endpoints: WikiEndpoints) {
        let tags = tags(&[("name", "Tower"), ("wikipedia:cs", "cs:Eiffelova_věž")]);
        let target = wiki_target(&tags, &endpoints).expect("target expected");
        assert!(target.url.starts_with("https://cs.wikipedia.org/"));
    }

    #[rstest]
    fn no_wiki_tags_yield_no_target(endpoints: WikiEndpoints) {
        let tags = tags(&[("name", "Bench"), ("amenity", "bench")]);
        assert!(wiki_target(&tags, &endpoints).is_none());
    }

    #[rstest]
    fn commons_file_page_trims_trailing_slash() {
        let endpoints = WikiEndpoints {
            commons_site: "https://commons.example.org/".to_owned(),
            ..WikiEndpoints::default()
        };
        assert_eq!(
            endpoints.commons_file_page("Tower.jpg"),
            "https://commons.example.org/wiki/File:Tower.jpg"
        );
    }
}
