//! Profile identifiers and display snapshots
//!
//! QR codes carry a stored profile's primary key as a decimal string. The
//! registry keys overlays by that id and holds an immutable copy of the
//! profile's displayable fields, taken at the moment of resolution.

use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier of a stored profile (the store's primary key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileId(pub i64);

impl ProfileId {
    /// Create a new profile id
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl From<i64> for ProfileId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for ProfileId {
    type Err = ParseIntError;

    /// Parse a decoded QR payload as a profile id
    ///
    /// Accepts exactly what a decimal integer parse accepts; anything else
    /// is an error and gets ignored upstream.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable copy of a profile's displayable fields
///
/// Captured when the resolver looks the profile up; the overlay keeps this
/// copy so the render pass never touches the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSnapshot {
    /// Profile id (matches the registry key)
    pub id: ProfileId,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Optional phone number
    pub phone_number: Option<String>,
    /// Optional profile picture reference (URL or local path)
    pub picture_url: Option<String>,
}

impl ProfileSnapshot {
    /// Create a snapshot with the required fields
    pub fn new(id: ProfileId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone_number: None,
            picture_url: None,
        }
    }

    /// Set the phone number
    pub fn phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    /// Set the picture reference
    pub fn picture_url(mut self, url: impl Into<String>) -> Self {
        self.picture_url = Some(url.into());
        self
    }
}
