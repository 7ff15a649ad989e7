//! Controlled vocabularies for section classification.
//!
//! Two fixed tables: the COAR Resource Type Genres a journal section can be
//! mapped to, and the audience classes offered alongside them. Both tables are
//! `'static` data behind [`VocabularyCatalog`]; nothing in the process can
//! mutate them, so the catalog is freely shareable across threads.
//!
//! Table order is part of the contract: selection controls and listings
//! present entries in exactly the order declared here.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Localisation key for the "no selection" entry of a select control.
pub const CHOOSE_ONE_KEY: &str = "common.chooseOne";

/// Label used for the "no selection" entry when no localisation is available.
pub const CHOOSE_ONE_PLACEHOLDER: &str = "<choose one>";

/// A COAR Resource Type Genre entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceType {
    /// Stable COAR PURL, the table key.
    pub uri: &'static str,
    pub label: &'static str,
}

/// An audience class. The code doubles as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Audience {
    pub code: &'static str,
    pub label: &'static str,
}

const fn resource_type(uri: &'static str, label: &'static str) -> ResourceType {
    ResourceType { uri, label }
}

const fn audience(code: &'static str) -> Audience {
    Audience { code, label: code }
}

static RESOURCE_TYPES: [ResourceType; 17] = [
    resource_type("http://purl.org/coar/resource_type/c_6501", "journal article"),
    resource_type("http://purl.org/coar/resource_type/c_2df8fbb1", "research article"),
    resource_type("http://purl.org/coar/resource_type/c_dcae04bc", "review article"),
    resource_type("http://purl.org/coar/resource_type/c_beb9", "data paper"),
    resource_type("http://purl.org/coar/resource_type/c_7bab", "software paper"),
    resource_type("http://purl.org/coar/resource_type/c_b239", "editorial"),
    resource_type("http://purl.org/coar/resource_type/c_545b", "letter to the editor"),
    resource_type("http://purl.org/coar/resource_type/c_93fc", "report"),
    resource_type("http://purl.org/coar/resource_type/c_efa0", "review"),
    resource_type("http://purl.org/coar/resource_type/c_ba08", "book review"),
    resource_type("http://purl.org/coar/resource_type/c_26e4", "interview"),
    resource_type("http://purl.org/coar/resource_type/c_8544", "lecture"),
    resource_type("http://purl.org/coar/resource_type/c_5794", "conference paper"),
    resource_type("http://purl.org/coar/resource_type/c_46ec", "thesis"),
    resource_type("http://purl.org/coar/resource_type/c_8042", "working paper"),
    resource_type("http://purl.org/coar/resource_type/c_816b", "preprint"),
    resource_type("http://purl.org/coar/resource_type/c_1843", "other"),
];

static AUDIENCES: [Audience; 14] = [
    audience("Administrators"),
    audience("Community Groups"),
    audience("Counsellors"),
    audience("Federal Funds Recipients and Applicants"),
    audience("Librarians"),
    audience("News Media"),
    audience("Other"),
    audience("Parents and Families"),
    audience("Policymakers"),
    audience("Researchers"),
    audience("School Support Staff"),
    audience("Student Financial Aid Providers"),
    audience("Students"),
    audience("Teachers"),
];

static CATALOG: VocabularyCatalog = VocabularyCatalog {
    resource_types: &RESOURCE_TYPES,
    audiences: &AUDIENCES,
};

/// Selects one of the two tables.
///
/// Serialises as the section setting name the vocabulary is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Vocabulary {
    ResourceType,
    Audience,
}

impl Vocabulary {
    pub const ALL: [Vocabulary; 2] = [Vocabulary::ResourceType, Vocabulary::Audience];

    /// Name of the section setting holding a selection from this vocabulary.
    pub fn setting_name(self) -> &'static str {
        match self {
            Vocabulary::ResourceType => "resourceType",
            Vocabulary::Audience => "audience",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vocabulary::ResourceType => f.write_str("resource type"),
            Vocabulary::Audience => f.write_str("audience"),
        }
    }
}

/// One entry of a select control. An empty `value` means "no selection".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Resolves localisation keys to display strings for the current locale.
///
/// The catalog only needs [`CHOOSE_ONE_KEY`]; string catalogs themselves
/// live with the host.
pub trait Localizer {
    fn translate(&self, key: &str) -> Option<String>;
}

impl Localizer for HashMap<String, String> {
    fn translate(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// A [`Localizer`] that knows no keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalizer;

impl Localizer for NoLocalizer {
    fn translate(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Read-only access to the resource type and audience tables.
#[derive(Debug)]
pub struct VocabularyCatalog {
    resource_types: &'static [ResourceType],
    audiences: &'static [Audience],
}

impl VocabularyCatalog {
    /// The process-wide catalog.
    pub fn global() -> &'static VocabularyCatalog {
        &CATALOG
    }

    // ── Resource types ──

    /// All resource types in presentation order.
    pub fn list_resource_types(&self) -> &'static [ResourceType] {
        self.resource_types
    }

    /// Label for an exact URI match, or `None` if the URI is not in the table.
    pub fn lookup_resource_type(&self, uri: &str) -> Option<&'static str> {
        self.resource_types
            .iter()
            .find(|rt| rt.uri == uri)
            .map(|rt| rt.label)
    }

    // ── Audiences ──

    /// All audiences in presentation order.
    pub fn list_audiences(&self) -> &'static [Audience] {
        self.audiences
    }

    pub fn lookup_audience(&self, code: &str) -> Option<&'static str> {
        self.audiences
            .iter()
            .find(|a| a.code == code)
            .map(|a| a.label)
    }

    // ── Either table ──

    /// `(key, label)` pairs of one table, in presentation order.
    pub fn entries(&self, vocabulary: Vocabulary) -> Vec<(&'static str, &'static str)> {
        match vocabulary {
            Vocabulary::ResourceType => self
                .resource_types
                .iter()
                .map(|rt| (rt.uri, rt.label))
                .collect(),
            Vocabulary::Audience => self.audiences.iter().map(|a| (a.code, a.label)).collect(),
        }
    }

    pub fn lookup(&self, vocabulary: Vocabulary, key: &str) -> Option<&'static str> {
        match vocabulary {
            Vocabulary::ResourceType => self.lookup_resource_type(key),
            Vocabulary::Audience => self.lookup_audience(key),
        }
    }

    /// Whether `key` is a member of the table. The empty string never is.
    pub fn contains(&self, vocabulary: Vocabulary, key: &str) -> bool {
        self.lookup(vocabulary, key).is_some()
    }

    // ── Selection options ──

    /// Entries of one table prefixed with a single `("", choose_one_label)`
    /// "no selection" entry.
    pub fn options_for_selection(
        &self,
        vocabulary: Vocabulary,
        choose_one_label: &str,
    ) -> Vec<SelectOption> {
        let entries = self.entries(vocabulary);
        let mut options = Vec::with_capacity(entries.len() + 1);
        options.push(SelectOption::new("", choose_one_label));
        options.extend(
            entries
                .into_iter()
                .map(|(key, label)| SelectOption::new(key, label)),
        );
        options
    }

    /// [`options_for_selection`](Self::options_for_selection) labelled with
    /// [`CHOOSE_ONE_PLACEHOLDER`].
    pub fn options_for_selection_default(&self, vocabulary: Vocabulary) -> Vec<SelectOption> {
        self.options_for_selection(vocabulary, CHOOSE_ONE_PLACEHOLDER)
    }

    /// Selection options with the "no selection" label resolved through
    /// `localizer`, falling back to [`CHOOSE_ONE_PLACEHOLDER`].
    pub fn options_with_localizer(
        &self,
        vocabulary: Vocabulary,
        localizer: &dyn Localizer,
    ) -> Vec<SelectOption> {
        let label = localizer
            .translate(CHOOSE_ONE_KEY)
            .unwrap_or_else(|| CHOOSE_ONE_PLACEHOLDER.to_string());
        self.options_for_selection(vocabulary, &label)
    }
}
