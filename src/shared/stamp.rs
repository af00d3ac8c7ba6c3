//! Page entries: recorded stamps and seeded placeholders
//!
//! A page bucket holds an ordered list of [`PageEntry`] values. On the wire
//! the two kinds are told apart structurally: a placeholder only carries a
//! `location`, a stamp carries the photo, sticker and placement fields too.

use serde::{Deserialize, Serialize};

use crate::shared::error::{require_text, SharedError};
use crate::shared::geo::{Location, Size, Transform};

/// A recorded visit to a location
///
/// Created once when the visitor stamps the page and never modified
/// afterwards. `date` is assigned by the HTTP boundary at request time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamp {
    /// Public URL of the visitor's photo
    pub photo_url: String,
    /// Public URL of the decorative sticker
    pub stamp_url: String,
    pub stamp_transformation: Transform,
    pub stamp_size: Size,
    /// Locale-formatted creation time
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub location: Location,
}

impl Stamp {
    /// Validate everything a stamp needs before it touches the store
    pub fn validate(&self) -> Result<(), SharedError> {
        require_text("photo_url", &self.photo_url)?;
        require_text("stamp_url", &self.stamp_url)?;
        self.location.validate("location")
    }
}

/// A seeded attraction the user has not stamped yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    pub location: Location,
}

/// One entry in a page bucket
///
/// `Stamp` must stay first: serde tries untagged variants in order and a
/// stamp object would otherwise also satisfy the placeholder shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageEntry {
    Stamped(Stamp),
    Placeholder(Placeholder),
}

impl PageEntry {
    pub fn location(&self) -> &Location {
        match self {
            Self::Stamped(stamp) => &stamp.location,
            Self::Placeholder(placeholder) => &placeholder.location,
        }
    }

    pub fn is_stamped(&self) -> bool {
        matches!(self, Self::Stamped(_))
    }
}

impl From<Stamp> for PageEntry {
    fn from(stamp: Stamp) -> Self {
        Self::Stamped(stamp)
    }
}

impl From<Location> for PageEntry {
    fn from(location: Location) -> Self {
        Self::Placeholder(Placeholder { location })
    }
}
