use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::form::ListingForm;
use crate::storage::KeyValueStore;
use crate::wire::{ListingOutputs, OutputField};

pub const HISTORY_CAPACITY: usize = 50;
pub const HISTORY_KEY: &str = "listing-history";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub form: ListingForm,
    pub outputs: ListingOutputs,
    #[serde(default)]
    pub favorite: bool,
}

/// Newest-first, bounded list of entries. Pure in-memory; persistence lives
/// in [`HistoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut HistoryEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Prepends and drops whatever falls past capacity.
    pub fn push_front(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        match self.get_mut(id) {
            Some(e) => {
                e.favorite = !e.favorite;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<HistoryEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub fn update_output_field(&mut self, id: &str, field: OutputField, text: String) -> bool {
        match self.get_mut(id) {
            Some(e) => {
                e.outputs.set(field, text);
                true
            }
            None => false,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let parsed: Vec<HistoryEntry> = serde_json::from_str(raw)?;
        let mut seen = HashSet::new();
        let mut entries: Vec<HistoryEntry> =
            parsed.into_iter().filter(|e| seen.insert(e.id.clone())).collect();
        entries.truncate(HISTORY_CAPACITY);
        Ok(Self { entries })
    }

    /// Like [`HistoryLog::from_json`] but any malformed payload yields an
    /// empty log.
    pub fn from_json_lossy(raw: &str) -> Self {
        Self::from_json(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unreadable history");
            Self::default()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    NotFound,
    Removed,
    /// The removed entry was the selected one; selection is now cleared.
    RemovedSelected,
}

pub struct HistoryStore<S> {
    log: HistoryLog,
    selected: Option<String>,
    storage: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Loads the persisted log. Never fails: missing or corrupt data starts
    /// an empty history.
    pub fn load(storage: S) -> Self {
        let log = match storage.get(HISTORY_KEY) {
            Ok(Some(raw)) => HistoryLog::from_json_lossy(&raw),
            Ok(None) => HistoryLog::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read history; starting empty");
                HistoryLog::new()
            }
        };
        tracing::debug!(entries = log.len(), "history loaded");
        Self { log, selected: None, storage }
    }

    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        self.log.entries()
    }

    pub fn favorites(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.log.entries().iter().filter(|e| e.favorite)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    fn persist(&self) {
        let result = self
            .log
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|raw| self.storage.set(HISTORY_KEY, &raw).map_err(|e| e.to_string()));
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist history");
        }
    }

    pub fn add(&mut self, form: ListingForm, outputs: ListingOutputs) -> String {
        let mut id = Uuid::new_v4().to_string();
        while self.log.contains(&id) {
            id = Uuid::new_v4().to_string();
        }
        self.log.push_front(HistoryEntry {
            id: id.clone(),
            created_at: Utc::now(),
            form,
            outputs,
            favorite: false,
        });
        self.selected = Some(id.clone());
        self.persist();
        id
    }

    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let changed = self.log.toggle_favorite(id);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn remove(&mut self, id: &str) -> RemoveOutcome {
        if self.log.remove(id).is_none() {
            return RemoveOutcome::NotFound;
        }
        self.persist();
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            RemoveOutcome::RemovedSelected
        } else {
            RemoveOutcome::Removed
        }
    }

    pub fn select(&mut self, id: &str) -> Option<&HistoryEntry> {
        let entry = self.log.get(id)?;
        self.selected = Some(entry.id.clone());
        Some(entry)
    }

    pub fn update_output_field(&mut self, id: &str, field: OutputField, text: String) -> bool {
        let changed = self.log.update_output_field(id, field, text);
        if changed {
            self.persist();
        }
        changed
    }
}
