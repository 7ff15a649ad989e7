//! Section records as seen by the metadata extension.
//!
//! The host owns sections; this crate only reads and writes a few named
//! settings on them. A [`Section`] is therefore just a key plus a bag of
//! string settings, which is the shape the host persists additional fields in.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vocabulary::Vocabulary;

/// Identifies a section within its owning journal (context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionKey {
    pub section_id: u64,
    /// Owning journal. `None` for sections addressed without a context.
    pub context_id: Option<u64>,
}

impl SectionKey {
    pub fn new(section_id: u64, context_id: Option<u64>) -> Self {
        Self {
            section_id,
            context_id,
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.context_id {
            Some(ctx) => write!(f, "section {} (context {ctx})", self.section_id),
            None => write!(f, "section {}", self.section_id),
        }
    }
}

/// A section's persisted record: its key and named additional settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    key: SectionKey,
    data: BTreeMap<String, String>,
}

impl Section {
    /// A section with no stored settings.
    pub fn new(key: SectionKey) -> Self {
        Self {
            key,
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(key: SectionKey, data: BTreeMap<String, String>) -> Self {
        Self { key, data }
    }

    pub fn key(&self) -> SectionKey {
        self.key
    }

    pub fn data(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }

    pub fn set_data(&mut self, name: &str, value: impl Into<String>) {
        self.data.insert(name.to_string(), value.into());
    }

    /// All stored settings, ordered by name.
    pub fn settings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Whether a section has been classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataState {
    /// No resource type stored.
    Unset,
    /// A resource type is stored; the audience may still be empty.
    Set,
}

/// The resource type and audience pair attached to a section.
///
/// Both fields are plain strings; `""` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionMetadata {
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub audience: String,
}

impl SectionMetadata {
    pub fn new(resource_type: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            audience: audience.into(),
        }
    }

    /// The `("", "")` pair.
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MetadataState {
        if self.resource_type.is_empty() {
            MetadataState::Unset
        } else {
            MetadataState::Set
        }
    }

    /// The value selected from `vocabulary`.
    pub fn get(&self, vocabulary: Vocabulary) -> &str {
        match vocabulary {
            Vocabulary::ResourceType => &self.resource_type,
            Vocabulary::Audience => &self.audience,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_section_has_no_settings() {
        let section = Section::new(SectionKey::new(3, Some(1)));
        assert_eq!(section.settings().count(), 0);
        assert_eq!(section.data("resourceType"), None);
    }

    #[test]
    fn set_data_overwrites() {
        let mut section = Section::new(SectionKey::new(3, None));
        section.set_data("audience", "Students");
        section.set_data("audience", "Teachers");
        assert_eq!(section.data("audience"), Some("Teachers"));
        assert_eq!(section.settings().count(), 1);
    }

    #[test]
    fn state_follows_resource_type() {
        assert_eq!(SectionMetadata::unset().state(), MetadataState::Unset);
        assert_eq!(
            SectionMetadata::new("", "Students").state(),
            MetadataState::Unset
        );
        assert_eq!(
            SectionMetadata::new("http://purl.org/coar/resource_type/c_6501", "").state(),
            MetadataState::Set
        );
    }

    #[test]
    fn metadata_json_uses_setting_names() {
        let meta = SectionMetadata::new("http://purl.org/coar/resource_type/c_6501", "Researchers");
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "resourceType": "http://purl.org/coar/resource_type/c_6501",
                "audience": "Researchers",
            })
        );
    }

    #[test]
    fn metadata_json_missing_fields_are_unset() {
        let meta: SectionMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(meta, SectionMetadata::unset());
    }

    #[test]
    fn key_display() {
        assert_eq!(SectionKey::new(7, Some(2)).to_string(), "section 7 (context 2)");
        assert_eq!(SectionKey::new(7, None).to_string(), "section 7");
    }
}
