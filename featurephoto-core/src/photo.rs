//! Photo records returned by the resolver.

use serde::{Deserialize, Serialize};

/// A representative photograph normalised from one provider.
///
/// # Examples
///
/// ```
/// use featurephoto_core::PhotoRecord;
///
/// let record = PhotoRecord::new(
///     "Wikimedia",
///     "https://commons.wikimedia.org/w/index.php?curid=1",
///     "https://upload.wikimedia.org/thumb.jpg",
/// )
/// .with_portrait(true);
/// assert!(record.has_thumb());
/// assert_eq!(record.portrait, Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Human-readable provider name.
    pub source: String,
    /// Provider page for the photo.
    pub link: String,
    /// Displayable image URL.
    pub thumb: String,
    /// Author of the photo, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Orientation hint: `true` when the image is taller than wide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<bool>,
    /// Capture or upload time as reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl PhotoRecord {
    /// Construct a record with the mandatory fields.
    pub fn new(
        source: impl Into<String>,
        link: impl Into<String>,
        thumb: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            link: link.into(),
            thumb: thumb.into(),
            username: None,
            portrait: None,
            timestamp: None,
        }
    }

    /// Attach the author name.
    #[must_use]
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    /// Attach the orientation hint.
    #[must_use]
    pub const fn with_portrait(mut self, portrait: bool) -> Self {
        self.portrait = Some(portrait);
        self
    }

    /// Attach the capture time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Option<String>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether the record carries a displayable thumbnail.
    #[must_use]
    pub fn has_thumb(&self) -> bool {
        !self.thumb.is_empty()
    }
}

/// Outcome of resolving one feature observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "photo", rename_all = "snake_case")]
pub enum Resolution {
    /// A usable photo was found.
    Photo(PhotoRecord),
    /// Resolution is still in progress; observe the feature again later.
    Loading,
    /// No source produced a usable photo.
    Empty,
}

impl Resolution {
    /// The photo, if one was found.
    #[must_use]
    pub const fn photo(&self) -> Option<&PhotoRecord> {
        match self {
            Self::Photo(record) => Some(record),
            Self::Loading | Self::Empty => None,
        }
    }

    /// Whether this is the loading sentinel.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl From<Option<PhotoRecord>> for Resolution {
    fn from(record: Option<PhotoRecord>) -> Self {
        match record {
            Some(record) if record.has_thumb() => Self::Photo(record),
            Some(_) | None => Self::Empty,
        }
    }
}
