//! The event workspace: draft state, selection, and save/delete flows.

use thiserror::Error;
use tracing::{debug, info};

use content_core::{
    generate_unique_id, validate_for_save, EventId, GameEvent, IndustryId, SaveError,
};
use content_schema::ImportError;
use content_store::{CacheKey, EntityKind, EventStore, ListCache, StoreError};

use crate::draft::{ChoiceDraft, ConsequenceDraft, EventDraft};

/// Network activity currently in flight, surfaced to the UI layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Operation {
    #[default]
    Idle,
    Saving,
    Deleting,
}

/// Failures surfaced by workspace operations. Validation failures never
/// reach the store; store failures never corrupt the cache.
#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("select an industry before creating events")]
    MissingIndustry,
    #[error("no event is selected")]
    NoEventSelected,
    #[error("no choice is selected")]
    NoChoiceSelected,
    #[error("unknown {entity} id: {id}")]
    UnknownId { entity: &'static str, id: String },
    #[error(transparent)]
    Invalid(#[from] SaveError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// In-memory editing surface for one industry's events.
///
/// The unit of editing is a single choice or consequence; the unit of
/// persistence is always the whole event tree. Selection changes never
/// auto-save.
pub struct EventWorkspace<S: EventStore> {
    industry: IndustryId,
    store: S,
    cache: ListCache<GameEvent>,
    draft: Option<EventDraft>,
    creating: bool,
    selected: Option<EventId>,
    choice_draft: Option<ChoiceDraft>,
    consequence_draft: Option<ConsequenceDraft>,
    /// Choice the consequence sub-editor is nested under.
    selected_choice: Option<String>,
    operation: Operation,
    status: Option<String>,
}

impl<S: EventStore> EventWorkspace<S> {
    pub fn new(industry: IndustryId, store: S) -> Self {
        Self {
            industry,
            store,
            cache: ListCache::new(),
            draft: None,
            creating: false,
            selected: None,
            choice_draft: None,
            consequence_draft: None,
            selected_choice: None,
            operation: Operation::Idle,
            status: None,
        }
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.industry.clone(), EntityKind::Events)
    }

    /// Fetch this industry's events into the cache.
    pub fn load(&mut self) -> Result<(), EditError> {
        let events = self.store.fetch_events(&self.industry)?;
        self.cache.set(self.cache_key(), events);
        Ok(())
    }

    /// Best-effort warm-up, e.g. on hover before the tab is opened.
    /// Failures are discarded on purpose; the real load reports them.
    pub fn prefetch(&mut self) {
        if let Err(e) = self.load() {
            debug!(error = %e, "prefetch failed");
        }
    }

    /// The cached event list; empty until [`EventWorkspace::load`] runs.
    pub fn events(&self) -> &[GameEvent] {
        self.cache.get(&self.cache_key()).unwrap_or_default()
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Message from the most recent failed operation, cleared on success.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn selected(&self) -> Option<&EventId> {
        self.selected.as_ref()
    }

    pub fn creating(&self) -> bool {
        self.creating
    }

    pub fn draft(&self) -> Option<&EventDraft> {
        self.draft.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn draft_mut(&mut self) -> Option<&mut EventDraft> {
        self.draft.as_mut()
    }

    pub fn choice_draft(&self) -> Option<&ChoiceDraft> {
        self.choice_draft.as_ref()
    }

    pub fn choice_draft_mut(&mut self) -> Option<&mut ChoiceDraft> {
        self.choice_draft.as_mut()
    }

    pub fn consequence_draft_mut(&mut self) -> Option<&mut ConsequenceDraft> {
        self.consequence_draft.as_mut()
    }

    /// Load an event from the cache into the draft and clear any choice or
    /// consequence sub-selection.
    pub fn select_event(&mut self, id: &str) -> Result<(), EditError> {
        let event = self
            .events()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| EditError::UnknownId {
                entity: "event",
                id: id.to_string(),
            })?;
        self.draft = Some(EventDraft::from_event(&event));
        self.selected = Some(EventId(event.id));
        self.creating = false;
        self.reset_choice();
        Ok(())
    }

    /// Start a fresh draft. Refuses to do anything when no industry is
    /// selected.
    pub fn create_event(&mut self) -> Result<(), EditError> {
        if self.industry.0.trim().is_empty() {
            return self.fail(EditError::MissingIndustry);
        }
        self.draft = Some(EventDraft::default());
        self.creating = true;
        self.selected = None;
        self.reset_choice();
        self.status = None;
        Ok(())
    }

    /// Validate and persist the whole draft tree as one write.
    ///
    /// A blank id is synthesized from the title. The cached list is updated
    /// optimistically and restored if the backend rejects the write. On
    /// success the workspace leaves creating mode and selects the saved id.
    pub fn save_event(&mut self) -> Result<EventId, EditError> {
        let result = self.save_event_inner();
        self.record(&result);
        result
    }

    fn save_event_inner(&mut self) -> Result<EventId, EditError> {
        let draft = self.draft.as_mut().ok_or(EditError::NoEventSelected)?;
        let mut event = draft.to_event();
        validate_for_save(&event)?;

        if event.id.trim().is_empty() {
            let existing: Vec<String> = self
                .cache
                .get(&CacheKey::new(self.industry.clone(), EntityKind::Events))
                .unwrap_or_default()
                .iter()
                .map(|e| e.id.clone())
                .collect();
            event.id = generate_unique_id("event", &existing, Some(&event.title));
        }

        self.operation = Operation::Saving;
        let key = CacheKey::new(self.industry.clone(), EntityKind::Events);
        let mut tx = self.cache.transaction(key);
        let staged = event.clone();
        tx.stage(|events| match events.iter_mut().find(|e| e.id == staged.id) {
            Some(existing) => *existing = staged.clone(),
            None => events.push(staged.clone()),
        });

        let outcome = self.store.upsert_event(&self.industry, &event);
        self.operation = Operation::Idle;
        match outcome {
            Ok(()) => {
                tx.commit();
                let id = EventId(event.id.clone());
                if let Some(draft) = self.draft.as_mut() {
                    draft.id = event.id.clone();
                }
                self.creating = false;
                self.selected = Some(id.clone());
                info!(industry = %self.industry, event = %id, "event saved");
                Ok(id)
            }
            Err(e) => {
                tx.roll_back();
                Err(e.into())
            }
        }
    }

    /// Delete the whole tree. Clears the selection and draft when they
    /// pointed at the deleted event.
    pub fn delete_event(&mut self, id: &EventId) -> Result<(), EditError> {
        let result = self.delete_event_inner(id);
        self.record(&result);
        result
    }

    fn delete_event_inner(&mut self, id: &EventId) -> Result<(), EditError> {
        self.operation = Operation::Deleting;
        let key = self.cache_key();
        let mut tx = self.cache.transaction(key);
        let target = id.0.clone();
        tx.stage(|events| events.retain(|e| e.id != target));

        let outcome = self.store.delete_event(id);
        self.operation = Operation::Idle;
        match outcome {
            Ok(()) => {
                tx.commit();
                if self.selected.as_ref() == Some(id) {
                    self.selected = None;
                    self.draft = None;
                    self.reset_choice();
                }
                info!(event = %id, "event deleted");
                Ok(())
            }
            Err(e) => {
                tx.roll_back();
                Err(e.into())
            }
        }
    }

    /// Overwrite the draft header and replace the whole choices array with
    /// a pasted event. Destructive by design; it does not merge.
    pub fn autofill(&mut self, text: &str) -> Result<(), EditError> {
        let result = self.autofill_inner(text);
        self.record(&result);
        result
    }

    fn autofill_inner(&mut self, text: &str) -> Result<(), EditError> {
        let event = content_schema::autofill_event(text)?;
        self.draft = Some(EventDraft::from_event(&event));
        self.reset_choice();
        Ok(())
    }

    // ----- choice sub-editor -----

    /// Begin a blank choice draft under the selected event.
    pub fn create_choice(&mut self) -> Result<(), EditError> {
        if self.draft.is_none() {
            return self.fail(EditError::NoEventSelected);
        }
        self.choice_draft = Some(ChoiceDraft::default());
        self.selected_choice = None;
        self.consequence_draft = None;
        Ok(())
    }

    /// Load one of the draft's choices into the choice sub-editor.
    pub fn select_choice(&mut self, id: &str) -> Result<(), EditError> {
        let draft = self.draft.as_ref().ok_or(EditError::NoEventSelected)?;
        let choice = draft
            .choices
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| EditError::UnknownId {
                entity: "choice",
                id: id.to_string(),
            })?;
        self.choice_draft = Some(ChoiceDraft::from_choice(choice));
        self.selected_choice = Some(id.to_string());
        self.consequence_draft = None;
        Ok(())
    }

    /// Normalize the choice draft into the event tree and re-save the whole
    /// parent event; choices have no persistence endpoint of their own.
    pub fn save_choice(&mut self) -> Result<EventId, EditError> {
        let result = self.save_choice_inner();
        self.record(&result);
        result
    }

    fn save_choice_inner(&mut self) -> Result<EventId, EditError> {
        let form = self
            .choice_draft
            .as_ref()
            .ok_or(EditError::NoChoiceSelected)?;
        let draft = self.draft.as_mut().ok_or(EditError::NoEventSelected)?;
        let mut choice = form.normalize();
        if choice.id.trim().is_empty() {
            let siblings: Vec<String> = draft.choices.iter().map(|c| c.id.clone()).collect();
            choice.id = generate_unique_id("choice", &siblings, Some(&choice.label));
        }
        match draft.choices.iter_mut().find(|c| c.id == choice.id) {
            Some(existing) => *existing = choice.clone(),
            None => draft.choices.push(choice.clone()),
        }
        self.selected_choice = Some(choice.id.clone());
        if let Some(form) = self.choice_draft.as_mut() {
            form.id = choice.id.clone();
        }
        self.save_event_inner()
    }

    /// Remove a choice from the draft and re-save the parent event.
    pub fn delete_choice(&mut self, id: &str) -> Result<EventId, EditError> {
        let result = self.delete_choice_inner(id);
        self.record(&result);
        result
    }

    fn delete_choice_inner(&mut self, id: &str) -> Result<EventId, EditError> {
        let draft = self.draft.as_mut().ok_or(EditError::NoEventSelected)?;
        let before = draft.choices.len();
        draft.choices.retain(|c| c.id != id);
        if draft.choices.len() == before {
            return Err(EditError::UnknownId {
                entity: "choice",
                id: id.to_string(),
            });
        }
        if self.selected_choice.as_deref() == Some(id) {
            self.reset_choice();
        }
        self.save_event_inner()
    }

    /// Drop the choice sub-editor state without saving anything.
    pub fn reset_choice(&mut self) {
        self.choice_draft = None;
        self.selected_choice = None;
        self.consequence_draft = None;
    }

    // ----- consequence sub-editor -----

    /// Begin a blank consequence draft under the selected choice.
    pub fn create_consequence(&mut self) -> Result<(), EditError> {
        if self.selected_choice.is_none() {
            return self.fail(EditError::NoChoiceSelected);
        }
        self.consequence_draft = Some(ConsequenceDraft {
            weight: "1".to_string(),
            ..Default::default()
        });
        Ok(())
    }

    /// Load one of the selected choice's consequences into the sub-editor.
    pub fn select_consequence(&mut self, id: &str) -> Result<(), EditError> {
        let choice_id = self
            .selected_choice
            .clone()
            .ok_or(EditError::NoChoiceSelected)?;
        let draft = self.draft.as_ref().ok_or(EditError::NoEventSelected)?;
        let consequence = draft
            .choices
            .iter()
            .find(|c| c.id == choice_id)
            .and_then(|c| c.consequences.iter().find(|k| k.id == id))
            .ok_or_else(|| EditError::UnknownId {
                entity: "consequence",
                id: id.to_string(),
            })?;
        self.consequence_draft = Some(ConsequenceDraft::from_consequence(consequence));
        Ok(())
    }

    /// Normalize the consequence draft into the selected choice and re-save
    /// the whole parent event.
    pub fn save_consequence(&mut self) -> Result<EventId, EditError> {
        let result = self.save_consequence_inner();
        self.record(&result);
        result
    }

    fn save_consequence_inner(&mut self) -> Result<EventId, EditError> {
        let choice_id = self
            .selected_choice
            .clone()
            .ok_or(EditError::NoChoiceSelected)?;
        let form = self
            .consequence_draft
            .as_ref()
            .ok_or(EditError::NoChoiceSelected)?;
        let mut consequence = form.normalize();

        let draft = self.draft.as_mut().ok_or(EditError::NoEventSelected)?;
        let choice = draft
            .choices
            .iter_mut()
            .find(|c| c.id == choice_id)
            .ok_or(EditError::UnknownId {
                entity: "choice",
                id: choice_id.clone(),
            })?;

        if consequence.id.trim().is_empty() {
            let siblings: Vec<String> =
                choice.consequences.iter().map(|k| k.id.clone()).collect();
            let base_name = consequence.label.clone();
            consequence.id =
                generate_unique_id("consequence", &siblings, base_name.as_deref());
        }
        match choice
            .consequences
            .iter_mut()
            .find(|k| k.id == consequence.id)
        {
            Some(existing) => *existing = consequence.clone(),
            None => choice.consequences.push(consequence.clone()),
        }
        if let Some(form) = self.consequence_draft.as_mut() {
            form.id = consequence.id.clone();
        }
        self.save_event_inner()
    }

    /// Remove a consequence from the selected choice and re-save the parent
    /// event.
    pub fn delete_consequence(&mut self, id: &str) -> Result<EventId, EditError> {
        let result = self.delete_consequence_inner(id);
        self.record(&result);
        result
    }

    fn delete_consequence_inner(&mut self, id: &str) -> Result<EventId, EditError> {
        let choice_id = self
            .selected_choice
            .clone()
            .ok_or(EditError::NoChoiceSelected)?;
        let draft = self.draft.as_mut().ok_or(EditError::NoEventSelected)?;
        let choice = draft
            .choices
            .iter_mut()
            .find(|c| c.id == choice_id)
            .ok_or(EditError::UnknownId {
                entity: "choice",
                id: choice_id.clone(),
            })?;
        let before = choice.consequences.len();
        choice.consequences.retain(|k| k.id != id);
        if choice.consequences.len() == before {
            return Err(EditError::UnknownId {
                entity: "consequence",
                id: id.to_string(),
            });
        }
        self.consequence_draft = None;
        self.save_event_inner()
    }

    // ----- bookkeeping -----

    fn record<T>(&mut self, result: &Result<T, EditError>) {
        match result {
            Ok(_) => self.status = None,
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn fail<T>(&mut self, error: EditError) -> Result<T, EditError> {
        self.status = Some(error.to_string());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_core::{Choice, Consequence, Effect, EventCategory};
    use content_store::MemoryStore;

    fn workspace(industry: &str) -> EventWorkspace<MemoryStore> {
        let mut ws = EventWorkspace::new(IndustryId(industry.to_string()), MemoryStore::new());
        ws.load().unwrap();
        ws
    }

    fn draft_with_choice(ws: &mut EventWorkspace<MemoryStore>, title: &str) {
        ws.create_event().unwrap();
        let draft = ws.draft_mut().unwrap();
        draft.title = title.to_string();
        draft.category = Some(EventCategory::Opportunity);
        draft.summary = "S".to_string();
        draft.choices.push(Choice {
            id: "c1".to_string(),
            label: "Do it".to_string(),
            description: None,
            cost: None,
            time_cost: None,
            sets_flag: None,
            requirements: vec![],
            consequences: vec![Consequence {
                id: "k1".to_string(),
                label: None,
                description: None,
                weight: 1,
                effects: vec![Effect::Cash {
                    amount: 100.0,
                    label: None,
                }],
                delayed_consequence: None,
            }],
        });
    }

    #[test]
    fn create_without_industry_changes_nothing() {
        let mut ws = workspace("  ");
        let err = ws.create_event().unwrap_err();
        assert_eq!(err, EditError::MissingIndustry);
        assert!(ws.draft().is_none());
        assert!(!ws.creating());
        assert!(ws.status().is_some());
    }

    #[test]
    fn save_synthesizes_id_and_selects_it() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Grand Opening");
        assert!(ws.creating());
        let id = ws.save_event().unwrap();
        assert_eq!(id.0, "event-grand-opening");
        assert!(!ws.creating());
        assert_eq!(ws.selected(), Some(&id));
        assert_eq!(ws.status(), None);
        assert_eq!(ws.events().len(), 1);
        let persisted = ws
            .store()
            .fetch_events(&IndustryId("coffee".to_string()))
            .unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id, "event-grand-opening");
    }

    #[test]
    fn colliding_titles_get_suffixed_ids() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Grand Opening");
        ws.save_event().unwrap();
        draft_with_choice(&mut ws, "Grand Opening");
        let id = ws.save_event().unwrap();
        assert_eq!(id.0, "event-grand-opening-2");
    }

    #[test]
    fn goodbad_shape_failure_never_reaches_the_store() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Mixed Blessing");
        let draft = ws.draft_mut().unwrap();
        draft.category = Some(EventCategory::GoodBad);
        let extra = Choice {
            id: "c2".to_string(),
            ..draft.choices[0].clone()
        };
        draft.choices.push(extra);

        let err = ws.save_event().unwrap_err();
        assert_eq!(err, EditError::Invalid(SaveError::GoodBadChoiceCount(2)));
        assert_eq!(
            ws.status(),
            Some("good/bad events must have exactly one choice, found 2")
        );
        assert_eq!(ws.store().write_ops(), 0);
        assert!(ws.events().is_empty());
    }

    #[test]
    fn empty_title_failure_never_reaches_the_store() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "  ");
        let err = ws.save_event().unwrap_err();
        assert_eq!(err, EditError::Invalid(SaveError::EmptyTitle));
        assert_eq!(ws.store().write_ops(), 0);
    }

    #[test]
    fn rejected_write_rolls_the_cache_back_and_keeps_the_draft() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Grand Opening");
        ws.store_mut().fail_next_write("backend down");

        let err = ws.save_event().unwrap_err();
        assert_eq!(
            err,
            EditError::Store(StoreError::Rejected("backend down".to_string()))
        );
        // optimistic insert was rolled back
        assert!(ws.events().is_empty());
        assert!(ws.creating());
        assert_eq!(ws.draft().unwrap().title, "Grand Opening");

        // the same action can be retried and now succeeds
        ws.save_event().unwrap();
        assert_eq!(ws.events().len(), 1);
    }

    #[test]
    fn delete_clears_selection_and_cache() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Grand Opening");
        let id = ws.save_event().unwrap();
        ws.delete_event(&id).unwrap();
        assert_eq!(ws.selected(), None);
        assert!(ws.draft().is_none());
        assert!(ws.events().is_empty());
    }

    #[test]
    fn rejected_delete_restores_the_cached_list() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Grand Opening");
        let id = ws.save_event().unwrap();
        ws.store_mut().fail_next_write("nope");
        ws.delete_event(&id).unwrap_err();
        assert_eq!(ws.events().len(), 1);
        assert_eq!(ws.selected(), Some(&id));
    }

    #[test]
    fn choice_save_persists_through_the_parent_event() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Grand Opening");
        ws.save_event().unwrap();
        let writes_before = ws.store().write_ops();

        ws.create_choice().unwrap();
        let form = ws.choice_draft_mut().unwrap();
        form.label = "Hire a Barista".to_string();
        form.cost = "1200".to_string();
        ws.save_choice().unwrap();

        assert_eq!(ws.store().write_ops(), writes_before + 1);
        let persisted = ws
            .store()
            .fetch_events(&IndustryId("coffee".to_string()))
            .unwrap();
        assert_eq!(persisted[0].choices.len(), 2);
        let added = &persisted[0].choices[1];
        assert_eq!(added.id, "choice-hire-a-barista");
        assert_eq!(added.cost, Some(1200.0));
    }

    #[test]
    fn consequence_with_zero_weight_fails_before_persisting() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Grand Opening");
        ws.save_event().unwrap();
        let writes_before = ws.store().write_ops();

        ws.select_choice("c1").unwrap();
        ws.create_consequence().unwrap();
        let form = ws.consequence_draft_mut().unwrap();
        form.label = "Backfire".to_string();
        form.weight = "oops".to_string();

        let err = ws.save_consequence().unwrap_err();
        assert!(matches!(
            err,
            EditError::Invalid(SaveError::NonPositiveWeight { .. })
        ));
        assert_eq!(ws.store().write_ops(), writes_before);
    }

    #[test]
    fn consequence_save_lands_under_the_selected_choice() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Grand Opening");
        ws.save_event().unwrap();

        ws.select_choice("c1").unwrap();
        ws.create_consequence().unwrap();
        let form = ws.consequence_draft_mut().unwrap();
        form.label = "Backfire".to_string();
        form.weight = "2".to_string();
        ws.save_consequence().unwrap();

        let persisted = ws
            .store()
            .fetch_events(&IndustryId("coffee".to_string()))
            .unwrap();
        let consequences = &persisted[0].choices[0].consequences;
        assert_eq!(consequences.len(), 2);
        assert_eq!(consequences[1].id, "consequence-backfire");
        assert_eq!(consequences[1].weight, 2);
    }

    #[test]
    fn selecting_an_event_clears_sub_selection() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Grand Opening");
        let id = ws.save_event().unwrap();
        ws.select_choice("c1").unwrap();
        assert!(ws.choice_draft().is_some());
        ws.select_event(&id.0).unwrap();
        assert!(ws.choice_draft().is_none());
    }

    #[test]
    fn autofill_overwrites_the_whole_draft() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Old Title");
        ws.autofill(
            r#"{
                "id": "e9", "title": "Pasted", "category": "risk", "summary": "S",
                "choices": [{"id": "c9", "label": "L", "consequences": [
                    {"id": "k9", "weight": 1, "effects": [{"type": "exp", "amount": 5}]}
                ]}]
            }"#,
        )
        .unwrap();
        let draft = ws.draft().unwrap();
        assert_eq!(draft.title, "Pasted");
        assert_eq!(draft.id, "e9");
        assert_eq!(draft.choices.len(), 1);
        assert_eq!(draft.choices[0].id, "c9");
    }

    #[test]
    fn autofill_schema_failure_keeps_the_draft() {
        let mut ws = workspace("coffee");
        draft_with_choice(&mut ws, "Old Title");
        let err = ws.autofill(r#"{"title": "broken"}"#).unwrap_err();
        assert!(matches!(err, EditError::Import(ImportError::Schema(_))));
        assert_eq!(ws.draft().unwrap().title, "Old Title");
    }
}
