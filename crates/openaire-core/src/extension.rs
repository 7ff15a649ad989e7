//! Attaching a resource type and audience to a section.
//!
//! [`SectionMetadataExtension`] is the narrow interface a host calls from its
//! own section edit/save flow: read the stored pair, validate a candidate, and
//! apply it. Persistence goes through [`SectionRepository`], implemented by the
//! host's section store.
//!
//! Write policy: a candidate with an empty resource type writes nothing at
//! all, not even its audience. Once a resource type is stored it can be
//! replaced by another one but never cleared through this interface.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::section::{Section, SectionKey, SectionMetadata};
use crate::vocabulary::{Vocabulary, VocabularyCatalog};

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The value is not a key of the field's vocabulary.
    UnknownVocabularyKey,
}

/// A field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: Vocabulary,
    pub value: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::UnknownVocabularyKey => write!(
                f,
                "{}: {:?} is not in the {} vocabulary",
                self.field.setting_name(),
                self.value,
                self.field
            ),
        }
    }
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A candidate was rejected by [`SectionMetadataExtension::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("section metadata rejected: {}", describe(.violations))]
pub struct ValidationFailed {
    pub violations: Vec<Violation>,
}

/// What [`SectionMetadataExtension::apply`] did to the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// Both settings were written.
    Written,
    /// No resource type was selected; the section was left untouched.
    Skipped,
}

/// Load/store access to section records, provided by the host.
pub trait SectionRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a section. A section with no stored settings loads with empty data.
    fn load(&self, key: SectionKey) -> Result<Section, Self::Error>;

    /// Persist every setting carried by `section`.
    fn update(&mut self, section: &Section) -> Result<(), Self::Error>;
}

/// Failure of [`SectionMetadataExtension::save`].
#[derive(Debug, Error)]
pub enum SaveError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Invalid(#[from] ValidationFailed),

    #[error("section store error: {0}")]
    Store(#[source] E),
}

/// The get/validate/apply contract binding [`SectionMetadata`] to a section.
#[derive(Debug, Clone, Copy)]
pub struct SectionMetadataExtension {
    catalog: &'static VocabularyCatalog,
}

impl Default for SectionMetadataExtension {
    fn default() -> Self {
        Self::new(VocabularyCatalog::global())
    }
}

impl SectionMetadataExtension {
    pub fn new(catalog: &'static VocabularyCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'static VocabularyCatalog {
        self.catalog
    }

    /// Additional setting names the host must persist for sections.
    pub fn field_names() -> [&'static str; 2] {
        [
            Vocabulary::ResourceType.setting_name(),
            Vocabulary::Audience.setting_name(),
        ]
    }

    /// The stored pair; `("", "")` if nothing was ever stored.
    pub fn read(&self, section: &Section) -> SectionMetadata {
        let get = |v: Vocabulary| section.data(v.setting_name()).unwrap_or_default();
        SectionMetadata::new(get(Vocabulary::ResourceType), get(Vocabulary::Audience))
    }

    /// Field violations of `candidate`. Empty values are always valid.
    pub fn validate(&self, candidate: &SectionMetadata) -> Vec<Violation> {
        Vocabulary::ALL
            .into_iter()
            .filter_map(|field| {
                let value = candidate.get(field);
                if value.is_empty() || self.catalog.contains(field, value) {
                    return None;
                }
                Some(Violation {
                    field,
                    value: value.to_string(),
                    kind: ViolationKind::UnknownVocabularyKey,
                })
            })
            .collect()
    }

    /// Write `candidate` onto `section`.
    ///
    /// Invalid candidates are rejected without touching the section. An empty
    /// resource type skips the write entirely, audience included.
    pub fn apply(
        &self,
        section: &mut Section,
        candidate: &SectionMetadata,
    ) -> Result<ApplyOutcome, ValidationFailed> {
        let violations = self.validate(candidate);
        if !violations.is_empty() {
            debug!(key = %section.key(), count = violations.len(), "rejected section metadata");
            return Err(ValidationFailed { violations });
        }

        if candidate.resource_type.is_empty() {
            info!(key = %section.key(), "no resource type selected, section metadata unchanged");
            return Ok(ApplyOutcome::Skipped);
        }

        section.set_data(
            Vocabulary::ResourceType.setting_name(),
            candidate.resource_type.as_str(),
        );
        section.set_data(Vocabulary::Audience.setting_name(), candidate.audience.as_str());
        Ok(ApplyOutcome::Written)
    }

    // ── Persisted flow ──

    /// Read the stored pair of the section at `key`.
    pub fn load<R: SectionRepository>(
        &self,
        repo: &R,
        key: SectionKey,
    ) -> Result<SectionMetadata, R::Error> {
        let section = repo.load(key)?;
        Ok(self.read(&section))
    }

    /// Load, apply and persist. Issues at most one `update`, and none when the
    /// write is skipped or rejected.
    pub fn save<R: SectionRepository>(
        &self,
        repo: &mut R,
        key: SectionKey,
        candidate: &SectionMetadata,
    ) -> Result<ApplyOutcome, SaveError<R::Error>> {
        let mut section = repo.load(key).map_err(SaveError::Store)?;
        let outcome = self.apply(&mut section, candidate)?;
        if outcome == ApplyOutcome::Written {
            repo.update(&section).map_err(SaveError::Store)?;
            info!(
                key = %key,
                resource_type = %candidate.resource_type,
                audience = %candidate.audience,
                "saved section metadata"
            );
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::convert::Infallible;

    use super::*;

    const C_6501: &str = "http://purl.org/coar/resource_type/c_6501";
    const C_5794: &str = "http://purl.org/coar/resource_type/c_5794";

    fn ext() -> SectionMetadataExtension {
        SectionMetadataExtension::default()
    }

    fn key() -> SectionKey {
        SectionKey::new(12, Some(1))
    }

    /// Counts updates so tests can assert on write behaviour.
    #[derive(Default)]
    struct CountingRepo {
        sections: HashMap<SectionKey, Section>,
        updates: usize,
    }

    impl SectionRepository for CountingRepo {
        type Error = Infallible;

        fn load(&self, key: SectionKey) -> Result<Section, Infallible> {
            Ok(self
                .sections
                .get(&key)
                .cloned()
                .unwrap_or_else(|| Section::new(key)))
        }

        fn update(&mut self, section: &Section) -> Result<(), Infallible> {
            self.updates += 1;
            self.sections.insert(section.key(), section.clone());
            Ok(())
        }
    }

    #[test]
    fn field_names_match_settings() {
        assert_eq!(
            SectionMetadataExtension::field_names(),
            ["resourceType", "audience"]
        );
    }

    #[test]
    fn read_never_stored_is_unset() {
        let section = Section::new(key());
        assert_eq!(ext().read(&section), SectionMetadata::unset());
    }

    #[test]
    fn read_ignores_unrelated_settings() {
        let mut section = Section::new(key());
        section.set_data("abbrev", "ART");
        section.set_data("audience", "Librarians");
        assert_eq!(ext().read(&section), SectionMetadata::new("", "Librarians"));
    }

    #[test]
    fn validate_unset_is_valid() {
        assert!(ext().validate(&SectionMetadata::unset()).is_empty());
    }

    #[test]
    fn validate_known_pair_is_valid() {
        let candidate = SectionMetadata::new(C_6501, "Researchers");
        assert!(ext().validate(&candidate).is_empty());
    }

    #[test]
    fn validate_unknown_resource_type() {
        let violations = ext().validate(&SectionMetadata::new("not-a-real-uri", ""));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, Vocabulary::ResourceType);
        assert_eq!(violations[0].value, "not-a-real-uri");
        assert_eq!(violations[0].kind, ViolationKind::UnknownVocabularyKey);
    }

    #[test]
    fn validate_reports_both_fields() {
        let violations = ext().validate(&SectionMetadata::new("bogus", "Aliens"));
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec![Vocabulary::ResourceType, Vocabulary::Audience]);
    }

    #[test]
    fn validate_audience_without_resource_type() {
        assert!(ext().validate(&SectionMetadata::new("", "Students")).is_empty());
        let violations = ext().validate(&SectionMetadata::new("", "students"));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, Vocabulary::Audience);
    }

    #[test]
    fn apply_empty_resource_type_leaves_section_untouched() {
        let mut section = Section::new(key());
        ext()
            .apply(&mut section, &SectionMetadata::new(C_6501, "Researchers"))
            .unwrap();
        let before = section.clone();

        let outcome = ext()
            .apply(&mut section, &SectionMetadata::new("", "Students"))
            .unwrap();

        assert_eq!(outcome, ApplyOutcome::Skipped);
        assert_eq!(section, before);
        assert_eq!(
            ext().read(&section),
            SectionMetadata::new(C_6501, "Researchers")
        );
    }

    #[test]
    fn apply_then_read() {
        let mut section = Section::new(key());
        let outcome = ext()
            .apply(&mut section, &SectionMetadata::new(C_5794, "Teachers"))
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Written);
        assert_eq!(ext().read(&section), SectionMetadata::new(C_5794, "Teachers"));
    }

    #[test]
    fn apply_round_trips_every_valid_candidate() {
        let catalog = VocabularyCatalog::global();
        let audiences = std::iter::once("").chain(catalog.list_audiences().iter().map(|a| a.code));
        let audiences: Vec<_> = audiences.collect();

        for rt in catalog.list_resource_types() {
            for audience in &audiences {
                let candidate = SectionMetadata::new(rt.uri, *audience);
                let mut section = Section::new(key());
                ext().apply(&mut section, &candidate).unwrap();
                assert_eq!(ext().read(&section), candidate);
            }
        }
    }

    #[test]
    fn apply_overwrites_audience_with_empty() {
        let mut section = Section::new(key());
        ext()
            .apply(&mut section, &SectionMetadata::new(C_6501, "Students"))
            .unwrap();
        ext()
            .apply(&mut section, &SectionMetadata::new(C_5794, ""))
            .unwrap();
        assert_eq!(ext().read(&section), SectionMetadata::new(C_5794, ""));
    }

    #[test]
    fn apply_rejects_invalid_without_writing() {
        let mut section = Section::new(key());
        ext()
            .apply(&mut section, &SectionMetadata::new(C_6501, "Researchers"))
            .unwrap();
        let before = section.clone();

        let err = ext()
            .apply(&mut section, &SectionMetadata::new(C_5794, "Aliens"))
            .unwrap_err();

        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, Vocabulary::Audience);
        assert_eq!(section, before);
    }

    #[test]
    fn validation_failed_message_names_fields() {
        let err = ValidationFailed {
            violations: ext().validate(&SectionMetadata::new("bogus", "")),
        };
        assert_eq!(
            err.to_string(),
            "section metadata rejected: resourceType: \"bogus\" is not in the resource type vocabulary"
        );
    }

    #[test]
    fn save_writes_once() {
        let mut repo = CountingRepo::default();
        let outcome = ext()
            .save(&mut repo, key(), &SectionMetadata::new(C_5794, "Teachers"))
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Written);
        assert_eq!(repo.updates, 1);
        assert_eq!(
            ext().load(&repo, key()).unwrap(),
            SectionMetadata::new(C_5794, "Teachers")
        );
    }

    #[test]
    fn save_skip_issues_no_update() {
        let mut repo = CountingRepo::default();
        let outcome = ext()
            .save(&mut repo, key(), &SectionMetadata::new("", "Students"))
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped);
        assert_eq!(repo.updates, 0);
        assert_eq!(ext().load(&repo, key()).unwrap(), SectionMetadata::unset());
    }

    #[test]
    fn save_invalid_issues_no_update() {
        let mut repo = CountingRepo::default();
        let err = ext()
            .save(&mut repo, key(), &SectionMetadata::new("not-a-real-uri", ""))
            .unwrap_err();
        assert!(matches!(err, SaveError::Invalid(ref e) if e.violations.len() == 1));
        assert_eq!(repo.updates, 0);
    }

    #[test]
    fn save_keeps_other_settings() {
        let mut repo = CountingRepo::default();
        let mut section = Section::new(key());
        section.set_data("abbrev", "ART");
        repo.sections.insert(key(), section);

        ext()
            .save(&mut repo, key(), &SectionMetadata::new(C_6501, ""))
            .unwrap();

        assert_eq!(repo.sections[&key()].data("abbrev"), Some("ART"));
    }

    #[test]
    fn sections_are_isolated() {
        let mut repo = CountingRepo::default();
        let other = SectionKey::new(13, Some(1));
        ext()
            .save(&mut repo, key(), &SectionMetadata::new(C_6501, "Students"))
            .unwrap();
        assert_eq!(ext().load(&repo, other).unwrap(), SectionMetadata::unset());
    }
}
