//! Plain-text rendering of vocabularies, options and section cards.

use std::fmt::Write;

use openaire_core::{
    ExportClassification, SectionKey, SectionMetadata, SelectOption, UnknownVocabularyKey,
    Violation, VocabularyCatalog,
};

// ── Vocabulary tables ──

pub fn print_resource_types(catalog: &VocabularyCatalog) {
    println!("COAR resource types ({})", catalog.list_resource_types().len());
    for rt in catalog.list_resource_types() {
        println!("  {:<26} {}", rt.label, rt.uri);
    }
}

pub fn print_audiences(catalog: &VocabularyCatalog) {
    println!("Audiences ({})", catalog.list_audiences().len());
    for a in catalog.list_audiences() {
        println!("  {}", a.label);
    }
}

pub fn print_options(options: &[SelectOption]) {
    for option in options {
        let value = if option.value.is_empty() {
            "\"\""
        } else {
            option.value.as_str()
        };
        println!("  {:<48} {}", value, option.label);
    }
}

// ── Validation ──

pub fn print_violations(violations: &[Violation]) {
    if violations.is_empty() {
        println!("valid");
        return;
    }
    println!("{} violation(s)", violations.len());
    for v in violations {
        println!("  {v}");
    }
}

// ── Section card ──

/// Print the stored pair of one section and how it exports.
pub fn print_section_card(
    key: SectionKey,
    metadata: &SectionMetadata,
    export: &Result<Option<ExportClassification>, UnknownVocabularyKey>,
) {
    print!("{}", section_card(key, metadata, export));
}

/// The stored pair is always rendered, even when it does not resolve.
fn section_card(
    key: SectionKey,
    metadata: &SectionMetadata,
    export: &Result<Option<ExportClassification>, UnknownVocabularyKey>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {key} ===");
    let _ = writeln!(out);
    let _ = writeln!(out, "Stored");
    let _ = writeln!(out, "  {:<26} {}", "resourceType", or_unset(&metadata.resource_type));
    let _ = writeln!(out, "  {:<26} {}", "audience", or_unset(&metadata.audience));
    let _ = writeln!(out);

    match export {
        Err(err) => {
            let _ = writeln!(out, "Export failed: {err}");
        }
        Ok(None) => {
            let _ = writeln!(out, "Not classified; nothing is exported.");
        }
        Ok(Some(export)) => {
            let _ = writeln!(out, "Export");
            let _ = writeln!(out, "  {:<26} {}", "resource type uri", export.resource_type_uri);
            let _ = writeln!(out, "  {:<26} {}", "resource type label", export.resource_type_label);
            if let Some(audience) = &export.audience {
                let _ = writeln!(out, "  {:<26} {}", "audience", audience);
            }
        }
    }
    out
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() { "(unset)" } else { value }
}
