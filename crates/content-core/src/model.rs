//! The event/choice/consequence entity graph.
//!
//! One event owns many choices; a choice owns many weighted consequences; a
//! consequence may carry one delayed consequence with its own success and
//! failure effect sets. The whole tree is persisted as a single record, so
//! choices and consequences have no standalone lifecycle.

use serde::{Deserialize, Serialize};

use crate::effect::Effect;

/// Broad classification shown to designers and used by the game's event
/// scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventCategory {
    Opportunity,
    Risk,
    /// Legacy category from before events had categories; still present in
    /// old content. Save-time validation pins these to exactly one choice.
    GoodBad,
}

impl EventCategory {
    pub const ALL: [EventCategory; 3] = [
        EventCategory::Opportunity,
        EventCategory::Risk,
        EventCategory::GoodBad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Opportunity => "opportunity",
            EventCategory::Risk => "risk",
            EventCategory::GoodBad => "goodBad",
        }
    }
}

/// Gating condition attached to events, choices and delayed-consequence
/// success. Evaluated by the game engine; the editor only carries them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Requirement {
    /// A persistent game-state flag must be set.
    Flag { flag: String },
    /// The player must own an upgrade.
    Upgrade { upgrade: String },
    /// The player must employ a staff role, optionally at least `count` of them.
    #[serde(rename_all = "camelCase")]
    Staff {
        role: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "crate::wire::optional_integral_u32"
        )]
        count: Option<u32>,
    },
}

/// A random event offered to the player, with its full choice tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    /// Slug-like id, unique per industry. May be blank on an unsaved draft;
    /// the save path synthesizes one from the title.
    pub id: String,
    pub title: String,
    pub category: EventCategory,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Requirement>,
    pub choices: Vec<Choice>,
}

/// One option the player can pick when the event fires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Unique among its sibling choices only.
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Upfront cash cost of picking this choice, if any. Never negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// In-game seconds the choice occupies the player, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<f64>,
    /// Flag set when this choice is taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets_flag: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Requirement>,
    pub consequences: Vec<Consequence>,
}

/// One weighted possible outcome of a choice. The engine rolls among sibling
/// consequences proportionally to `weight`; weights are relative, not
/// normalized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consequence {
    /// Unique among its sibling consequences only.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Selection weight, a positive integer. The wire format accepts the
    /// `3` and `3.0` spellings interchangeably.
    #[serde(deserialize_with = "crate::wire::integral_u32")]
    pub weight: u32,
    pub effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delayed_consequence: Option<DelayedConsequence>,
}

/// Follow-up outcome resolved after an in-game delay. Resolves as success
/// when `success_requirements` is empty or met at resolution time; only then
/// are requirements re-checked, so failure effects need requirements to
/// exist at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayedConsequence {
    pub id: String,
    /// Strictly positive; a zero delay would be an immediate consequence.
    pub delay_seconds: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub success_requirements: Vec<Requirement>,
    pub success_effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failure_effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_description: Option<String>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::effect::{MetricEffectKind, MetricKind};

    pub(crate) fn sample_event() -> GameEvent {
        GameEvent {
            id: "event-rival-opens-shop".to_string(),
            title: "Rival Opens Shop".to_string(),
            category: EventCategory::Risk,
            summary: "A competitor opens across the street.".to_string(),
            requirements: vec![Requirement::Flag {
                flag: "tutorial-complete".to_string(),
            }],
            choices: vec![Choice {
                id: "undercut".to_string(),
                label: "Undercut their prices".to_string(),
                description: None,
                cost: Some(500.0),
                time_cost: Some(3600.0),
                sets_flag: Some("price-war".to_string()),
                requirements: vec![],
                consequences: vec![Consequence {
                    id: "win".to_string(),
                    label: Some("They back off".to_string()),
                    description: None,
                    weight: 3,
                    effects: vec![
                        Effect::Cash {
                            amount: -500.0,
                            label: None,
                        },
                        Effect::Metric {
                            metric: MetricKind::Demand,
                            effect_type: MetricEffectKind::Multiply,
                            value: 1.2,
                            duration_seconds: Some(86_400.0),
                            priority: None,
                        },
                    ],
                    delayed_consequence: Some(DelayedConsequence {
                        id: "aftermath".to_string(),
                        delay_seconds: 172_800.0,
                        success_requirements: vec![Requirement::Staff {
                            role: "manager".to_string(),
                            count: Some(1),
                        }],
                        success_effects: vec![Effect::Exp { amount: 50.0 }],
                        failure_effects: vec![Effect::Cash {
                            amount: -200.0,
                            label: Some("cleanup".to_string()),
                        }],
                        label: None,
                        success_description: None,
                        failure_description: None,
                    }),
                }],
            }],
        }
    }

    #[test]
    fn serde_roundtrip_event_tree() {
        let event = sample_event();
        let json = serde_json::to_string_pretty(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let event = sample_event();
        let json = serde_json::to_value(&event).unwrap();
        let choice = &json["choices"][0];
        assert_eq!(choice["timeCost"], 3600.0);
        assert_eq!(choice["setsFlag"], "price-war");
        let delayed = &choice["consequences"][0]["delayedConsequence"];
        assert_eq!(delayed["delaySeconds"], 172_800.0);
        assert!(delayed["successEffects"].is_array());
    }

    #[test]
    fn category_wire_names() {
        assert_eq!(
            serde_json::to_value(EventCategory::GoodBad).unwrap(),
            "goodBad"
        );
        assert_eq!(
            serde_json::to_value(EventCategory::Opportunity).unwrap(),
            "opportunity"
        );
    }

    #[test]
    fn integral_floats_accepted_for_integer_fields() {
        let json = serde_json::json!({
            "id": "k1",
            "weight": 3.0,
            "effects": [{
                "type": "metric",
                "metric": "morale",
                "effectType": "add",
                "value": 1,
                "priority": 2.0
            }]
        });
        let consequence: Consequence = serde_json::from_value(json).unwrap();
        assert_eq!(consequence.weight, 3);
        match &consequence.effects[0] {
            Effect::Metric { priority, .. } => assert_eq!(*priority, Some(2)),
            other => panic!("unexpected variant: {other:?}"),
        }

        let staff: Requirement =
            serde_json::from_value(serde_json::json!({"type": "staff", "role": "barista", "count": 2.0}))
                .unwrap();
        assert_eq!(
            staff,
            Requirement::Staff {
                role: "barista".to_string(),
                count: Some(2)
            }
        );
    }

    #[test]
    fn fractional_weight_fails_deserialization() {
        let json = serde_json::json!({"id": "k1", "weight": 1.5, "effects": []});
        assert!(serde_json::from_value::<Consequence>(json).is_err());
    }

    #[test]
    fn empty_collections_are_omitted() {
        let mut event = sample_event();
        event.requirements.clear();
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("requirements").is_none());
    }
}
