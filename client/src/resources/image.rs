//! Docker image reference tags
//!
//! Only references of the shape `registry[:port][/repo-path]/image:tag` are
//! understood. Anything else is rejected rather than left untouched, so a
//! tag change can never silently be a no-op.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::ClientError;

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<registry>[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)+(?::\d+)?)(?P<repo>[a-zA-Z0-9/-]*)/(?P<name>[a-zA-Z0-9_-]+):(?P<tag>.*)$",
    )
    .expect("image pattern is valid")
});

/// A parsed image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef<'a> {
    /// Registry host with optional port, e.g. `registry.local:5000`
    pub registry: &'a str,
    /// Repository path between registry and image name, with its leading `/`
    pub repo: &'a str,
    pub name: &'a str,
    pub tag: &'a str,
}

impl<'a> ImageRef<'a> {
    pub fn parse(image: &'a str) -> Result<Self, ClientError> {
        let caps = IMAGE_RE
            .captures(image)
            .ok_or_else(|| ClientError::MalformedImageReference(image.to_string()))?;
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());

        Ok(Self {
            registry: group("registry"),
            repo: group("repo"),
            name: group("name"),
            tag: group("tag"),
        })
    }

    /// Rebuild the full reference with another tag
    pub fn with_tag(&self, tag: &str) -> String {
        format!("{}{}/{}:{}", self.registry, self.repo, self.name, tag)
    }
}

/// Extract the trailing tag of an image reference
pub fn tag_of(image: &str) -> Result<&str, ClientError> {
    ImageRef::parse(image).map(|r| r.tag)
}

/// Rewrite the trailing tag of an image reference
pub fn retag(image: &str, tag: &str) -> Result<String, ClientError> {
    ImageRef::parse(image).map(|r| r.with_tag(tag))
}
