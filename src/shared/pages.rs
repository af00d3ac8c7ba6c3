//! Page Index
//!
//! Every book partitions its entries into alphabetic pages. A location named
//! "Zilker Park" lives on page `Z`, "Alamo" on page `A`. This module owns
//! the name → page mapping and the shape of a materialized index.
//!
//! # Buckets
//!
//! - `A`..`Z` - one bucket per ASCII letter, always present once an index is
//!   materialized, even when empty
//! - `#` - fallback for names starting with anything else (digits, symbols,
//!   accented or non-Latin letters); created on first use only
//!
//! # Seeding
//!
//! New books may be created with a list of suggested attractions. Each one
//! becomes a [`Placeholder`](crate::shared::stamp::Placeholder) entry in its
//! bucket. When two seeds share a first letter the [`SeedPolicy`] decides
//! whether both survive (`Append`) or the later one replaces the earlier
//! (`Overwrite`, the legacy behavior).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::geo::Location;
use crate::shared::stamp::PageEntry;

/// Number of letter buckets in a materialized index
pub const LETTER_BUCKETS: usize = 26;

/// Key of a single page bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageKey(char);

impl PageKey {
    /// Bucket for names that do not start with an ASCII letter
    pub const OTHER: PageKey = PageKey('#');

    /// Letter bucket for `c`, if `c` is an ASCII letter
    pub fn letter(c: char) -> Option<Self> {
        c.is_ascii_alphabetic().then(|| Self(c.to_ascii_uppercase()))
    }

    /// All 26 letter buckets, in order
    pub fn letters() -> impl Iterator<Item = PageKey> {
        ('A'..='Z').map(PageKey)
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageKey {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some('#'), None) => Ok(Self::OTHER),
            (Some(c), None) if c.is_ascii_uppercase() => Ok(Self(c)),
            _ => Err(SharedError::validation(
                "page",
                format!("'{s}' is not a page key (expected A-Z or #)"),
            )),
        }
    }
}

impl TryFrom<String> for PageKey {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PageKey> for String {
    fn from(key: PageKey) -> Self {
        key.0.to_string()
    }
}

/// Assign a location name to its page bucket
///
/// Leading whitespace is ignored so that names like `" Alamo"` (common in
/// comma-separated model output) land on `A`.
///
/// # Errors
///
/// Returns a validation error if `name` is empty or only whitespace.
pub fn bucket_for(name: &str) -> Result<PageKey, SharedError> {
    let first = name
        .chars()
        .find(|c| !c.is_whitespace())
        .ok_or_else(|| SharedError::validation("location.name", "must not be empty"))?;
    Ok(PageKey::letter(first).unwrap_or(PageKey::OTHER))
}

/// How seed locations sharing a bucket are combined at book creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedPolicy {
    /// Every seed is kept, in the order given
    #[default]
    Append,
    /// Each seed replaces the bucket contents; the last seed per letter wins
    Overwrite,
}

impl FromStr for SeedPolicy {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(SharedError::validation(
                "seed_policy",
                format!("unknown policy '{other}' (expected append or overwrite)"),
            )),
        }
    }
}

/// A book's pages: bucket key → ordered entries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageIndex(BTreeMap<PageKey, Vec<PageEntry>>);

impl PageIndex {
    /// Index with all 26 letter buckets present and empty
    pub fn empty() -> Self {
        Self(PageKey::letters().map(|key| (key, Vec::new())).collect())
    }

    /// Materialize an index from seed locations
    ///
    /// Seeds must already be validated; a blank name is reported rather
    /// than silently dropped.
    pub fn seeded(seeds: &[Location], policy: SeedPolicy) -> Result<Self, SharedError> {
        let mut index = Self::empty();
        for seed in seeds {
            let key = bucket_for(&seed.name)?;
            let entry = PageEntry::from(seed.clone());
            match policy {
                SeedPolicy::Append => index.push(key, entry),
                SeedPolicy::Overwrite => {
                    index.0.insert(key, vec![entry]);
                }
            }
        }
        Ok(index)
    }

    /// Append `entry` at the end of bucket `key`, creating the bucket if needed
    pub fn push(&mut self, key: PageKey, entry: PageEntry) {
        self.0.entry(key).or_default().push(entry);
    }

    /// Entries of one bucket; empty for buckets that were never created
    pub fn bucket(&self, key: PageKey) -> &[PageEntry] {
        self.0.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_bucket(&self, key: PageKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Number of buckets, including empty ones
    pub fn bucket_count(&self) -> usize {
        self.0.len()
    }

    /// Total number of entries across all buckets
    pub fn entry_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PageKey, &Vec<PageEntry>)> {
        self.0.iter()
    }
}

/// Convenience for [`PageIndex::empty`]
pub fn empty_index() -> PageIndex {
    PageIndex::empty()
}
