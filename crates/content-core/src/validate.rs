//! Save-time validation for the event tree.
//!
//! Runs before any write leaves the editor; a failure aborts the save with a
//! message the designer can act on, and nothing is persisted. The structural
//! JSON validator in `content-schema` covers the import path; this one
//! covers drafts built inside the editor.

use thiserror::Error;

use crate::effect::Effect;
use crate::model::{EventCategory, GameEvent};

/// Reasons a draft event cannot be saved.
#[derive(Debug, Error, PartialEq)]
pub enum SaveError {
    #[error("event title must not be empty")]
    EmptyTitle,
    #[error("good/bad events must have exactly one choice, found {0}")]
    GoodBadChoiceCount(usize),
    #[error("good/bad events need at least one consequence on their choice")]
    GoodBadNoConsequences,
    #[error("{location} has a blank id")]
    BlankId { location: &'static str },
    #[error("duplicate {location} id \"{id}\"")]
    DuplicateId { location: &'static str, id: String },
    #[error("consequence \"{id}\" weight must be at least 1")]
    NonPositiveWeight { id: String },
    #[error("delayed consequence \"{id}\" delay must be greater than zero")]
    NonPositiveDelay { id: String },
    #[error("choice \"{id}\" {field} must not be negative")]
    NegativeNumber { id: String, field: &'static str },
    #[error("dynamic cash effect must have a non-empty expression")]
    EmptyExpression,
}

/// Validate a draft before it is handed to the persistence adapter.
///
/// The event id itself may still be blank here; the save path synthesizes
/// one from the title after validation passes.
pub fn validate_for_save(event: &GameEvent) -> Result<(), SaveError> {
    if event.title.trim().is_empty() {
        return Err(SaveError::EmptyTitle);
    }

    if event.category == EventCategory::GoodBad {
        if event.choices.len() != 1 {
            return Err(SaveError::GoodBadChoiceCount(event.choices.len()));
        }
        if event.choices[0].consequences.is_empty() {
            return Err(SaveError::GoodBadNoConsequences);
        }
    }

    let mut choice_ids: Vec<&str> = Vec::with_capacity(event.choices.len());
    for choice in &event.choices {
        let cid = choice.id.trim();
        if cid.is_empty() {
            return Err(SaveError::BlankId { location: "choice" });
        }
        if choice_ids.contains(&cid) {
            return Err(SaveError::DuplicateId {
                location: "choice",
                id: cid.to_string(),
            });
        }
        choice_ids.push(cid);

        for (field, value) in [("cost", choice.cost), ("time cost", choice.time_cost)] {
            if let Some(v) = value {
                if v < 0.0 {
                    return Err(SaveError::NegativeNumber {
                        id: cid.to_string(),
                        field,
                    });
                }
            }
        }

        let mut consequence_ids: Vec<&str> = Vec::with_capacity(choice.consequences.len());
        for consequence in &choice.consequences {
            let kid = consequence.id.trim();
            if kid.is_empty() {
                return Err(SaveError::BlankId {
                    location: "consequence",
                });
            }
            if consequence_ids.contains(&kid) {
                return Err(SaveError::DuplicateId {
                    location: "consequence",
                    id: kid.to_string(),
                });
            }
            consequence_ids.push(kid);

            if consequence.weight < 1 {
                return Err(SaveError::NonPositiveWeight {
                    id: kid.to_string(),
                });
            }
            validate_effects(&consequence.effects)?;

            if let Some(delayed) = &consequence.delayed_consequence {
                if delayed.id.trim().is_empty() {
                    return Err(SaveError::BlankId {
                        location: "delayed consequence",
                    });
                }
                if delayed.delay_seconds <= 0.0 {
                    return Err(SaveError::NonPositiveDelay {
                        id: delayed.id.clone(),
                    });
                }
                validate_effects(&delayed.success_effects)?;
                validate_effects(&delayed.failure_effects)?;
            }
        }
    }

    Ok(())
}

fn validate_effects(effects: &[Effect]) -> Result<(), SaveError> {
    for effect in effects {
        if let Effect::DynamicCash { expression, .. } = effect {
            if expression.trim().is_empty() {
                return Err(SaveError::EmptyExpression);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::sample_event;
    use crate::model::{Choice, Consequence};

    #[test]
    fn sample_event_is_saveable() {
        assert_eq!(validate_for_save(&sample_event()), Ok(()));
    }

    #[test]
    fn empty_title_rejected() {
        let mut event = sample_event();
        event.title = "   ".to_string();
        assert_eq!(validate_for_save(&event), Err(SaveError::EmptyTitle));
    }

    #[test]
    fn goodbad_needs_exactly_one_choice() {
        let mut event = sample_event();
        event.category = EventCategory::GoodBad;
        let extra = Choice {
            id: "other".to_string(),
            ..event.choices[0].clone()
        };
        event.choices.push(extra);
        let err = validate_for_save(&event).unwrap_err();
        assert_eq!(err, SaveError::GoodBadChoiceCount(2));
        assert_eq!(
            err.to_string(),
            "good/bad events must have exactly one choice, found 2"
        );
    }

    #[test]
    fn goodbad_needs_a_consequence() {
        let mut event = sample_event();
        event.category = EventCategory::GoodBad;
        event.choices[0].consequences.clear();
        assert_eq!(
            validate_for_save(&event),
            Err(SaveError::GoodBadNoConsequences)
        );
    }

    #[test]
    fn duplicate_sibling_consequence_ids_rejected() {
        let mut event = sample_event();
        let dup = Consequence {
            ..event.choices[0].consequences[0].clone()
        };
        event.choices[0].consequences.push(dup);
        assert_eq!(
            validate_for_save(&event),
            Err(SaveError::DuplicateId {
                location: "consequence",
                id: "win".to_string()
            })
        );
    }

    #[test]
    fn zero_weight_rejected() {
        let mut event = sample_event();
        event.choices[0].consequences[0].weight = 0;
        assert_eq!(
            validate_for_save(&event),
            Err(SaveError::NonPositiveWeight {
                id: "win".to_string()
            })
        );
    }

    #[test]
    fn zero_delay_rejected() {
        let mut event = sample_event();
        event.choices[0].consequences[0]
            .delayed_consequence
            .as_mut()
            .unwrap()
            .delay_seconds = 0.0;
        assert_eq!(
            validate_for_save(&event),
            Err(SaveError::NonPositiveDelay {
                id: "aftermath".to_string()
            })
        );
    }

    #[test]
    fn negative_choice_cost_rejected() {
        let mut event = sample_event();
        event.choices[0].cost = Some(-1.0);
        assert_eq!(
            validate_for_save(&event),
            Err(SaveError::NegativeNumber {
                id: "undercut".to_string(),
                field: "cost"
            })
        );
    }
}
