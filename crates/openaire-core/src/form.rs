//! Section edit form glue.
//!
//! Maps the host's form lifecycle onto [`SectionMetadataExtension`]:
//! prefill from storage, read submitted values, hand option lists to the
//! template, and save on submit.

use serde::Serialize;
use serde_json::Value;

use crate::extension::{
    ApplyOutcome, SaveError, SectionMetadataExtension, SectionRepository, Violation,
};
use crate::section::{SectionKey, SectionMetadata};
use crate::vocabulary::{Localizer, SelectOption, Vocabulary, VocabularyCatalog};

/// Option lists for the section form template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOptions {
    pub resource_type_options: Vec<SelectOption>,
    pub audience_options: Vec<SelectOption>,
}

impl TemplateOptions {
    pub fn new(catalog: &VocabularyCatalog, localizer: &dyn Localizer) -> Self {
        Self {
            resource_type_options: catalog
                .options_with_localizer(Vocabulary::ResourceType, localizer),
            audience_options: catalog.options_with_localizer(Vocabulary::Audience, localizer),
        }
    }
}

/// Form state for one section's vocabulary fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionForm {
    key: SectionKey,
    data: SectionMetadata,
}

impl SectionForm {
    /// A blank form for `key`.
    pub fn new(key: SectionKey) -> Self {
        Self {
            key,
            data: SectionMetadata::unset(),
        }
    }

    /// A form prefilled with the stored values of the section.
    pub fn init_data<R: SectionRepository>(
        ext: &SectionMetadataExtension,
        repo: &R,
        key: SectionKey,
    ) -> Result<Self, R::Error> {
        let data = ext.load(repo, key)?;
        Ok(Self { key, data })
    }

    pub fn key(&self) -> SectionKey {
        self.key
    }

    pub fn data(&self) -> &SectionMetadata {
        &self.data
    }

    /// Take the submitted values from a request's user vars.
    ///
    /// Strings are kept verbatim. Missing and null vars become `""`; other
    /// scalars keep their JSON text so validation can reject them.
    pub fn read_user_vars(&mut self, vars: &Value) {
        self.data = SectionMetadata::new(
            user_var(vars, Vocabulary::ResourceType.setting_name()),
            user_var(vars, Vocabulary::Audience.setting_name()),
        );
    }

    pub fn validate(&self, ext: &SectionMetadataExtension) -> Vec<Violation> {
        ext.validate(&self.data)
    }

    /// Persist the submitted values.
    pub fn execute<R: SectionRepository>(
        &self,
        ext: &SectionMetadataExtension,
        repo: &mut R,
    ) -> Result<ApplyOutcome, SaveError<R::Error>> {
        ext.save(repo, self.key, &self.data)
    }
}

fn user_var(vars: &Value, name: &str) -> String {
    match vars.get(name) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
