use parking_lot::Mutex;

use crate::errors::{ListingError, Result};
use crate::form::{self, ListingForm};
use crate::history::{HistoryEntry, HistoryStore, RemoveOutcome};
use crate::prompt;
use crate::provider::CompletionClient;
use crate::storage::KeyValueStore;
use crate::wire::{ListingOutputs, OutputField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Generating,
    Ready(ListingOutputs),
    RewritingField {
        outputs: ListingOutputs,
        field: OutputField,
        instruction: String,
    },
    Error(String),
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Generating | Phase::RewritingField { .. })
    }

    pub fn outputs(&self) -> Option<&ListingOutputs> {
        match self {
            Phase::Ready(o) | Phase::RewritingField { outputs: o, .. } => Some(o),
            _ => None,
        }
    }
}

struct Inner<S> {
    form: ListingForm,
    phase: Phase,
    /// Validation and rewrite failures that do not leave the current phase.
    notice: Option<String>,
    history: HistoryStore<S>,
    /// Bumped whenever an operation starts; a response is applied only if
    /// its ticket is still current.
    ticket: u64,
}

impl<S> Inner<S> {
    fn begin(&mut self, phase: Phase) -> u64 {
        self.phase = phase;
        self.notice = None;
        self.ticket += 1;
        self.ticket
    }
}

/// Drives validate → prompt → completion → history for one user session.
///
/// Methods take `&self`; at most one generation or rewrite is in flight, and
/// overlapping requests fail with [`ListingError::Busy`] instead of queueing.
pub struct Session<C, S> {
    client: C,
    inner: Mutex<Inner<S>>,
}

impl<C: CompletionClient, S: KeyValueStore> Session<C, S> {
    pub fn new(client: C, history: HistoryStore<S>) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner {
                form: ListingForm::default(),
                phase: Phase::Idle,
                notice: None,
                history,
                ticket: 0,
            }),
        }
    }

    pub fn form(&self) -> ListingForm {
        self.inner.lock().form.clone()
    }

    /// Replaces the form wholesale, as every field edit does.
    pub fn set_form(&self, form: ListingForm) {
        self.inner.lock().form = form;
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.lock().phase.is_busy()
    }

    pub fn output(&self) -> Option<ListingOutputs> {
        self.inner.lock().phase.outputs().cloned()
    }

    /// The single error currently on display, if any.
    pub fn error(&self) -> Option<String> {
        let inner = self.inner.lock();
        match &inner.phase {
            Phase::Error(msg) => Some(msg.clone()),
            _ => inner.notice.clone(),
        }
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.lock().history.entries().to_vec()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.inner.lock().history.selected_id().map(str::to_string)
    }

    pub async fn submit(&self) -> Result<ListingOutputs> {
        let (ticket, snapshot, prompt_text) = {
            let mut inner = self.inner.lock();
            if inner.phase.is_busy() {
                return Err(ListingError::Busy);
            }
            let validated = match form::validate(&inner.form) {
                Ok(v) => v,
                Err(e) => {
                    // Only one error is on display: an Error phase takes the new message.
                    if matches!(inner.phase, Phase::Error(_)) {
                        inner.phase = Phase::Error(e.to_string());
                        inner.notice = None;
                    } else {
                        inner.notice = Some(e.to_string());
                    }
                    return Err(e);
                }
            };
            let prompt_text = prompt::build_generation_prompt(&validated);
            let snapshot = inner.form.clone();
            let ticket = inner.begin(Phase::Generating);
            (ticket, snapshot, prompt_text)
        };

        tracing::info!(property_type = %snapshot.property_type, "generating listing copy");
        let result = self.client.generate(&prompt_text).await;

        let mut inner = self.inner.lock();
        if inner.ticket != ticket {
            tracing::warn!("discarding stale generation response");
            return Err(ListingError::Busy);
        }
        match result {
            Ok(outputs) => {
                let id = inner.history.add(snapshot, outputs.clone());
                tracing::info!(%id, "generation stored in history");
                inner.phase = Phase::Ready(outputs.clone());
                Ok(outputs)
            }
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                inner.phase = Phase::Error(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn rewrite(&self, field: OutputField, instruction: &str) -> Result<String> {
        let (ticket, prompt_text) = {
            let mut inner = self.inner.lock();
            let outputs = match &inner.phase {
                p if p.is_busy() => return Err(ListingError::Busy),
                Phase::Ready(o) => o.clone(),
                _ => return Err(ListingError::NoOutput),
            };
            if instruction.trim().is_empty() {
                let e = ListingError::Validation("Please enter a rewrite instruction.".into());
                inner.notice = Some(e.to_string());
                return Err(e);
            }
            let prompt_text = prompt::build_rewrite_prompt(field, outputs.get(field), instruction);
            let ticket = inner.begin(Phase::RewritingField {
                outputs,
                field,
                instruction: instruction.to_string(),
            });
            (ticket, prompt_text)
        };

        tracing::info!(field = field.as_str(), %instruction, "rewriting field");
        let result = self.client.rewrite(field, &prompt_text).await;

        let mut inner = self.inner.lock();
        if inner.ticket != ticket {
            tracing::warn!("discarding stale rewrite response");
            return Err(ListingError::Busy);
        }
        let mut outputs = match std::mem::replace(&mut inner.phase, Phase::Idle) {
            Phase::RewritingField { outputs, .. } => outputs,
            other => {
                inner.phase = other;
                return Err(ListingError::NoOutput);
            }
        };
        match result {
            Ok(text) => {
                outputs.set(field, text.clone());
                if let Some(id) = inner.history.selected_id().map(str::to_string) {
                    inner.history.update_output_field(&id, field, text.clone());
                }
                inner.phase = Phase::Ready(outputs);
                Ok(text)
            }
            Err(e) => {
                tracing::warn!(error = %e, field = field.as_str(), "rewrite failed");
                inner.notice = Some(format!("Rewrite failed: {e}"));
                inner.phase = Phase::Ready(outputs);
                Err(e)
            }
        }
    }

    /// Loads a history entry's form and outputs into the session. Returns
    /// `false` when the id is unknown.
    pub fn select_history(&self, id: &str) -> Result<bool> {
        let mut inner = self.inner.lock();
        if inner.phase.is_busy() {
            return Err(ListingError::Busy);
        }
        let (form, outputs) = match inner.history.select(id) {
            Some(entry) => (entry.form.clone(), entry.outputs.clone()),
            None => return Ok(false),
        };
        inner.form = form;
        inner.phase = Phase::Ready(outputs);
        inner.notice = None;
        Ok(true)
    }

    pub fn delete_history(&self, id: &str) -> Result<RemoveOutcome> {
        let mut inner = self.inner.lock();
        if inner.phase.is_busy() {
            return Err(ListingError::Busy);
        }
        let outcome = inner.history.remove(id);
        if outcome == RemoveOutcome::RemovedSelected {
            inner.phase = Phase::Idle;
            inner.notice = None;
        }
        Ok(outcome)
    }

    pub fn toggle_favorite(&self, id: &str) -> bool {
        self.inner.lock().history.toggle_favorite(id)
    }
}
