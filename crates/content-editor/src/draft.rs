//! Draft types for the editing layer.
//!
//! Numeric fields stay as raw strings while a designer is typing and only
//! become numbers at save time, with the `form_number` leniency: empty or
//! unparseable input collapses to 0 rather than erroring. Optional numeric
//! fields treat the empty string as "not set".

use content_core::{
    form_number, optional_form_number, Choice, Consequence, DelayedConsequence, EffectForm,
    EventCategory, GameEvent, Requirement,
};

/// Draft of the event header plus its already-normalized choice tree.
#[derive(Clone, Debug, Default)]
pub struct EventDraft {
    /// Blank until first save; the save path synthesizes one from the title.
    pub id: String,
    pub title: String,
    pub category: Option<EventCategory>,
    pub summary: String,
    pub requirements: Vec<Requirement>,
    pub choices: Vec<Choice>,
}

impl EventDraft {
    pub fn from_event(event: &GameEvent) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            category: Some(event.category),
            summary: event.summary.clone(),
            requirements: event.requirements.clone(),
            choices: event.choices.clone(),
        }
    }

    /// Assemble the persistence shape. A draft that never picked a category
    /// defaults to opportunity.
    pub fn to_event(&self) -> GameEvent {
        GameEvent {
            id: self.id.clone(),
            title: self.title.clone(),
            category: self.category.unwrap_or(EventCategory::Opportunity),
            summary: self.summary.clone(),
            requirements: self.requirements.clone(),
            choices: self.choices.clone(),
        }
    }
}

/// Draft of one choice, edited in isolation from its siblings.
#[derive(Clone, Debug, Default)]
pub struct ChoiceDraft {
    pub id: String,
    pub label: String,
    pub description: String,
    /// Optional numeric form fields; empty means unset.
    pub cost: String,
    pub time_cost: String,
    pub sets_flag: String,
    pub requirements: Vec<Requirement>,
    pub consequences: Vec<Consequence>,
}

impl ChoiceDraft {
    pub fn from_choice(choice: &Choice) -> Self {
        Self {
            id: choice.id.clone(),
            label: choice.label.clone(),
            description: choice.description.clone().unwrap_or_default(),
            cost: choice.cost.map(|c| c.to_string()).unwrap_or_default(),
            time_cost: choice.time_cost.map(|c| c.to_string()).unwrap_or_default(),
            sets_flag: choice.sets_flag.clone().unwrap_or_default(),
            requirements: choice.requirements.clone(),
            consequences: choice.consequences.clone(),
        }
    }

    pub fn normalize(&self) -> Choice {
        Choice {
            id: self.id.clone(),
            label: self.label.clone(),
            description: none_if_empty(&self.description),
            cost: optional_form_number(&self.cost),
            time_cost: optional_form_number(&self.time_cost),
            sets_flag: none_if_empty(&self.sets_flag),
            requirements: self.requirements.clone(),
            consequences: self.consequences.clone(),
        }
    }
}

/// Draft of one weighted consequence and its optional delayed follow-up.
#[derive(Clone, Debug, Default)]
pub struct ConsequenceDraft {
    pub id: String,
    pub label: String,
    pub description: String,
    /// Selection weight as typed; unparseable input normalizes to 0 and is
    /// then rejected by save-time validation.
    pub weight: String,
    pub effects: Vec<EffectForm>,
    pub delayed: Option<DelayedDraft>,
}

impl ConsequenceDraft {
    pub fn from_consequence(consequence: &Consequence) -> Self {
        Self {
            id: consequence.id.clone(),
            label: consequence.label.clone().unwrap_or_default(),
            description: consequence.description.clone().unwrap_or_default(),
            weight: consequence.weight.to_string(),
            effects: consequence.effects.iter().map(EffectForm::from_effect).collect(),
            delayed: consequence
                .delayed_consequence
                .as_ref()
                .map(DelayedDraft::from_delayed),
        }
    }

    pub fn normalize(&self) -> Consequence {
        Consequence {
            id: self.id.clone(),
            label: none_if_empty(&self.label),
            description: none_if_empty(&self.description),
            weight: form_number(&self.weight).max(0.0) as u32,
            effects: self.effects.iter().map(EffectForm::normalize).collect(),
            delayed_consequence: self.delayed.as_ref().map(DelayedDraft::normalize),
        }
    }
}

/// Draft of a delayed consequence.
#[derive(Clone, Debug, Default)]
pub struct DelayedDraft {
    pub id: String,
    pub delay_seconds: String,
    pub success_requirements: Vec<Requirement>,
    pub success_effects: Vec<EffectForm>,
    pub failure_effects: Vec<EffectForm>,
    pub label: String,
    pub success_description: String,
    pub failure_description: String,
}

impl DelayedDraft {
    pub fn from_delayed(delayed: &DelayedConsequence) -> Self {
        Self {
            id: delayed.id.clone(),
            delay_seconds: delayed.delay_seconds.to_string(),
            success_requirements: delayed.success_requirements.clone(),
            success_effects: delayed
                .success_effects
                .iter()
                .map(EffectForm::from_effect)
                .collect(),
            failure_effects: delayed
                .failure_effects
                .iter()
                .map(EffectForm::from_effect)
                .collect(),
            label: delayed.label.clone().unwrap_or_default(),
            success_description: delayed.success_description.clone().unwrap_or_default(),
            failure_description: delayed.failure_description.clone().unwrap_or_default(),
        }
    }

    pub fn normalize(&self) -> DelayedConsequence {
        DelayedConsequence {
            id: self.id.clone(),
            delay_seconds: form_number(&self.delay_seconds),
            success_requirements: self.success_requirements.clone(),
            success_effects: self.success_effects.iter().map(EffectForm::normalize).collect(),
            failure_effects: self.failure_effects.iter().map(EffectForm::normalize).collect(),
            label: none_if_empty(&self.label),
            success_description: none_if_empty(&self.success_description),
            failure_description: none_if_empty(&self.failure_description),
        }
    }
}

fn none_if_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_core::{Effect, MetricEffectKind, MetricKind};

    #[test]
    fn choice_draft_roundtrip() {
        let choice = Choice {
            id: "c1".to_string(),
            label: "Hire a barista".to_string(),
            description: Some("Costs money".to_string()),
            cost: Some(1200.0),
            time_cost: None,
            sets_flag: None,
            requirements: vec![],
            consequences: vec![],
        };
        let back = ChoiceDraft::from_choice(&choice).normalize();
        assert_eq!(back, choice);
    }

    #[test]
    fn consequence_weight_string_normalizes() {
        let draft = ConsequenceDraft {
            id: "k1".to_string(),
            weight: "3".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.normalize().weight, 3);

        let draft = ConsequenceDraft {
            id: "k1".to_string(),
            weight: "lots".to_string(),
            ..Default::default()
        };
        // garbage collapses to 0 here and is rejected at save time
        assert_eq!(draft.normalize().weight, 0);
    }

    #[test]
    fn negative_weight_clamps_instead_of_wrapping() {
        let draft = ConsequenceDraft {
            id: "k1".to_string(),
            weight: "-4".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.normalize().weight, 0);
    }

    #[test]
    fn effect_forms_roundtrip_through_drafts() {
        let consequence = Consequence {
            id: "k1".to_string(),
            label: None,
            description: None,
            weight: 2,
            effects: vec![
                Effect::Cash {
                    amount: 75.5,
                    label: None,
                },
                Effect::Metric {
                    metric: MetricKind::Efficiency,
                    effect_type: MetricEffectKind::Add,
                    value: -2.0,
                    duration_seconds: None,
                    priority: None,
                },
            ],
            delayed_consequence: None,
        };
        let back = ConsequenceDraft::from_consequence(&consequence).normalize();
        assert_eq!(back, consequence);
    }

    #[test]
    fn delayed_draft_roundtrip() {
        let delayed = DelayedConsequence {
            id: "d1".to_string(),
            delay_seconds: 3600.0,
            success_requirements: vec![Requirement::Flag {
                flag: "insured".to_string(),
            }],
            success_effects: vec![Effect::Exp { amount: 25.0 }],
            failure_effects: vec![],
            label: None,
            success_description: Some("Covered".to_string()),
            failure_description: None,
        };
        let back = DelayedDraft::from_delayed(&delayed).normalize();
        assert_eq!(back, delayed);
    }
}
