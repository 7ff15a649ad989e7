pub mod export;
pub mod extension;
pub mod form;
pub mod schema;
pub mod section;
pub mod vocabulary;

pub use export::{ExportClassification, UnknownVocabularyKey};
pub use extension::{
    ApplyOutcome, SaveError, SectionMetadataExtension, SectionRepository, ValidationFailed,
    Violation, ViolationKind,
};
pub use form::{SectionForm, TemplateOptions};
pub use schema::settings;
pub use section::{MetadataState, Section, SectionKey, SectionMetadata};
pub use vocabulary::{
    Audience, CHOOSE_ONE_KEY, CHOOSE_ONE_PLACEHOLDER, Localizer, NoLocalizer, ResourceType,
    SelectOption, Vocabulary, VocabularyCatalog,
};
