//! Resolving stored section metadata for metadata export.
//!
//! The OAI-PMH crosswalk and the harvesting gateway emit the canonical COAR
//! URI and label for a section's resource type, plus its audience.

use serde::Serialize;
use thiserror::Error;

use crate::section::SectionMetadata;
use crate::vocabulary::{Vocabulary, VocabularyCatalog};

/// A stored value that is not a key of its vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no {vocabulary} vocabulary entry for {key:?}")]
pub struct UnknownVocabularyKey {
    pub vocabulary: Vocabulary,
    pub key: String,
}

/// A section's classification, resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportClassification {
    pub resource_type_uri: String,
    pub resource_type_label: String,
    pub audience: Option<String>,
}

impl ExportClassification {
    /// `Ok(None)` for an unclassified section.
    ///
    /// Values saved through the extension always resolve; an error means the
    /// settings were written by something else.
    pub fn resolve(
        catalog: &VocabularyCatalog,
        metadata: &SectionMetadata,
    ) -> Result<Option<Self>, UnknownVocabularyKey> {
        if metadata.resource_type.is_empty() {
            return Ok(None);
        }

        let resource_type_label = catalog
            .lookup_resource_type(&metadata.resource_type)
            .ok_or_else(|| UnknownVocabularyKey {
                vocabulary: Vocabulary::ResourceType,
                key: metadata.resource_type.clone(),
            })?;

        let audience = match metadata.audience.as_str() {
            "" => None,
            code => {
                let label = catalog.lookup_audience(code).ok_or_else(|| UnknownVocabularyKey {
                    vocabulary: Vocabulary::Audience,
                    key: code.to_string(),
                })?;
                Some(label.to_string())
            }
        };

        Ok(Some(Self {
            resource_type_uri: metadata.resource_type.clone(),
            resource_type_label: resource_type_label.to_string(),
            audience,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C_8042: &str = "http://purl.org/coar/resource_type/c_8042";

    fn resolve(meta: &SectionMetadata) -> Result<Option<ExportClassification>, UnknownVocabularyKey> {
        ExportClassification::resolve(VocabularyCatalog::global(), meta)
    }

    #[test]
    fn unset_resolves_to_none() {
        assert_eq!(resolve(&SectionMetadata::unset()), Ok(None));
        // An audience alone is never exported.
        assert_eq!(resolve(&SectionMetadata::new("", "Students")), Ok(None));
    }

    #[test]
    fn resolves_uri_label_and_audience() {
        let resolved = resolve(&SectionMetadata::new(C_8042, "Policymakers"))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.resource_type_uri, C_8042);
        assert_eq!(resolved.resource_type_label, "working paper");
        assert_eq!(resolved.audience.as_deref(), Some("Policymakers"));
    }

    #[test]
    fn empty_audience_is_omitted() {
        let resolved = resolve(&SectionMetadata::new(C_8042, "")).unwrap().unwrap();
        assert_eq!(resolved.audience, None);
    }

    #[test]
    fn unknown_stored_value_is_an_error() {
        let err = resolve(&SectionMetadata::new("legacy-type", "")).unwrap_err();
        assert_eq!(err.vocabulary, Vocabulary::ResourceType);
        assert_eq!(
            err.to_string(),
            "no resource type vocabulary entry for \"legacy-type\""
        );

        let err = resolve(&SectionMetadata::new(C_8042, "Aliens")).unwrap_err();
        assert_eq!(err.vocabulary, Vocabulary::Audience);
    }
}
