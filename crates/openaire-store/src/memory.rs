//! In-memory section store.

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;

use openaire_core::{Section, SectionKey, SectionRepository};
use tracing::debug;

/// Section settings held in a map, for hosts without a database and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sections: HashMap<SectionKey, BTreeMap<String, String>>,
    updates: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `update` calls served so far.
    pub fn update_count(&self) -> usize {
        self.updates
    }

    /// Number of sections with at least one stored setting.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl SectionRepository for MemoryStore {
    type Error = Infallible;

    fn load(&self, key: SectionKey) -> Result<Section, Infallible> {
        let data = self.sections.get(&key).cloned().unwrap_or_default();
        Ok(Section::with_data(key, data))
    }

    fn update(&mut self, section: &Section) -> Result<(), Infallible> {
        self.updates += 1;
        if section.settings().next().is_none() {
            return Ok(());
        }
        let stored = self.sections.entry(section.key()).or_default();
        for (name, value) in section.settings() {
            stored.insert(name.to_string(), value.to_string());
        }
        debug!(key = %section.key(), "updated section settings");
        Ok(())
    }
}
