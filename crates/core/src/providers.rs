//! Image-hosting provider registry.
//!
//! Each provider is a data entry: the hosts it serves, the first path segments
//! that are not single images, and a template for the direct image link.
//! Adding a provider means adding an entry, built in or loaded from JSON.

use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::domain::{ChatEvent, LinkRecord};
use crate::error::{Result, ScanError};

/// Placeholder for the resource ID in `raw_template`
const ID_PLACEHOLDER: &str = "{id}";

/// Provider definition as written in a registry file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderSpec {
    /// Tag written to `LinkRecord::link_type`
    pub tag: String,
    /// Host names, matched case-insensitively, with or without a scheme
    pub hosts: Vec<String>,
    /// First path segments that point at pages rather than images
    #[serde(default)]
    pub excluded_ids: Vec<String>,
    /// Direct link template, `{id}` is replaced with the specific ID
    #[serde(default)]
    pub raw_template: Option<String>,
}

impl ProviderSpec {
    fn new(tag: &str, hosts: &[&str], excluded_ids: &[&str], raw_template: &str) -> Self {
        Self {
            tag: tag.to_string(),
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
            excluded_ids: excluded_ids.iter().map(|s| s.to_string()).collect(),
            raw_template: Some(raw_template.to_string()),
        }
    }
}

/// The providers known out of the box
pub fn builtin_specs() -> Vec<ProviderSpec> {
    vec![
        // "a", "gallery" and "upload" are albums, galleries and the upload page
        ProviderSpec::new(
            "imgur.com",
            &["i.imgur.com", "imgur.com"],
            &["a", "gallery", "upload"],
            "https://i.imgur.com/{id}.png",
        ),
        // "thumb" links are resized copies, e.g. i.gyazo.com/thumb/1200/ID-png.jpg
        ProviderSpec::new(
            "gyazo.com",
            &["i.gyazo.com", "gyazo.com"],
            &["thumb"],
            "https://i.gyazo.com/{id}.png",
        ),
        ProviderSpec::new("nuuls.com", &["i.nuuls.com"], &[], "https://i.nuuls.com/{id}.png"),
    ]
}

#[derive(Debug, Clone)]
struct Provider {
    spec: ProviderSpec,
    pattern: Regex,
}

impl Provider {
    fn compile(spec: ProviderSpec) -> Result<Self> {
        if spec.hosts.is_empty() {
            return Err(ScanError::EmptyProvider(spec.tag));
        }

        let hosts = spec
            .hosts
            .iter()
            .map(|h| regex::escape(h))
            .collect::<Vec<_>>()
            .join("|");
        // Any subdomain of a listed host counts (www., m.), lookalikes such as
        // "notimgur.com" don't since the prefix must end in a dot
        let pattern = Regex::new(&format!(
            r"^(?i:(?:https?://)?(?:[a-z0-9-]+\.)*(?:{hosts}))/([\w\-]*)(\.\w*)?"
        ))
        .map_err(|source| ScanError::InvalidProvider {
            tag: spec.tag.clone(),
            source,
        })?;

        Ok(Self { spec, pattern })
    }

    fn classify(&self, candidate: &str) -> Option<Classification> {
        let captures = self.pattern.captures(candidate)?;
        let link = captures.get(0)?.as_str();
        let id = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

        if self.spec.excluded_ids.iter().any(|excluded| excluded == id) {
            return None;
        }

        let specific_id = (!id.is_empty()).then(|| id.to_string());
        let raw_link = match (&self.spec.raw_template, &specific_id) {
            (Some(template), Some(id)) => template.replace(ID_PLACEHOLDER, id),
            _ => link.to_string(),
        };

        Some(Classification {
            link: link.to_string(),
            link_type: self.spec.tag.clone(),
            specific_id,
            raw_link,
        })
    }
}

/// A link a provider recognised, before it is tied to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub link: String,
    pub link_type: String,
    pub specific_id: Option<String>,
    pub raw_link: String,
}

impl Classification {
    pub fn into_record(self, event: &ChatEvent) -> LinkRecord {
        LinkRecord {
            link: self.link,
            user: event.username.clone(),
            date: event.timestamp,
            channel: event.channel.clone(),
            specific_id: self.specific_id,
            message: event.message.clone(),
            link_type: self.link_type,
            raw_link: self.raw_link,
        }
    }
}

/// Ordered set of providers, first match wins
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    pub fn builtin() -> Self {
        Self::empty()
            .with_providers(builtin_specs())
            .expect("built-in providers compile")
    }

    pub fn empty() -> Self {
        Self { providers: Vec::new() }
    }

    /// Appends providers after the existing ones
    pub fn with_providers(mut self, specs: impl IntoIterator<Item = ProviderSpec>) -> Result<Self> {
        for spec in specs {
            self.providers.push(Provider::compile(spec)?);
        }
        Ok(self)
    }

    /// Reads extra provider definitions from a JSON array
    pub fn load_specs(path: &Path) -> Result<Vec<ProviderSpec>> {
        let content = fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ScanError::ProviderFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the classification of `candidate`, or `None` when no provider
    /// claims it or it points at a non-image page.
    pub fn classify(&self, candidate: &str) -> Option<Classification> {
        self.classify_at_start(candidate).or_else(|| {
            // Redirectors wrap the real link, e.g. href.li/?https://i.imgur.com/ID.png
            candidate
                .to_ascii_lowercase()
                .match_indices("http")
                .filter(|(at, _)| *at > 0)
                .find_map(|(at, _)| self.classify_at_start(&candidate[at..]))
        })
    }

    fn classify_at_start(&self, candidate: &str) -> Option<Classification> {
        self.providers
            .iter()
            .find(|p| p.pattern.is_match(candidate))
            .and_then(|p| p.classify(candidate))
    }

    pub fn tags(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.spec.tag.as_str()).collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
