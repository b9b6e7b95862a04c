//! Tagged effect variants attachable to consequences, plus their form-layer
//! mirror where numeric fields stay as raw strings until save.

use serde::{Deserialize, Serialize};

/// Metric a timed modifier applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    Reputation,
    Demand,
    Morale,
    Efficiency,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Reputation,
        MetricKind::Demand,
        MetricKind::Morale,
        MetricKind::Efficiency,
    ];

    /// Wire name of the metric, as it appears in exported JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Reputation => "reputation",
            MetricKind::Demand => "demand",
            MetricKind::Morale => "morale",
            MetricKind::Efficiency => "efficiency",
        }
    }
}

/// How a metric modifier combines with the metric's current value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricEffectKind {
    Add,
    Multiply,
    Set,
}

impl MetricEffectKind {
    pub const ALL: [MetricEffectKind; 3] = [
        MetricEffectKind::Add,
        MetricEffectKind::Multiply,
        MetricEffectKind::Set,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricEffectKind::Add => "add",
            MetricEffectKind::Multiply => "multiply",
            MetricEffectKind::Set => "set",
        }
    }
}

/// One concrete outcome applied when a consequence fires.
///
/// The `type` field discriminates the variant on the wire; unknown tags are
/// rejected by the schema validator before deserialization is attempted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    /// Flat cash delta, positive or negative.
    #[serde(rename_all = "camelCase")]
    Cash {
        amount: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Cash delta computed by the game engine from an expression string.
    /// The expression is opaque here beyond being non-empty.
    #[serde(rename_all = "camelCase")]
    DynamicCash {
        expression: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Experience points for the player.
    #[serde(rename_all = "camelCase")]
    Exp { amount: f64 },
    /// Timed (or permanent) modifier on a business metric.
    /// `duration_seconds: None` means permanent, which is distinct from a
    /// zero-second modifier.
    #[serde(rename_all = "camelCase")]
    Metric {
        metric: MetricKind,
        effect_type: MetricEffectKind,
        value: f64,
        #[serde(default)]
        duration_seconds: Option<f64>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "crate::wire::optional_integral_i32"
        )]
        priority: Option<i32>,
    },
}

/// Form-layer mirror of [`Effect`] with numeric fields as editable strings,
/// so intermediate keystrokes like "-" or "1e" never have to be rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectForm {
    Cash {
        amount: String,
        label: Option<String>,
    },
    DynamicCash {
        expression: String,
        label: Option<String>,
    },
    Exp {
        amount: String,
    },
    Metric {
        metric: MetricKind,
        effect_type: MetricEffectKind,
        value: String,
        duration_seconds: String,
        priority: String,
    },
}

/// Parse a form field into a number; empty, unparseable and NaN input all
/// collapse to 0 rather than erroring. This leniency is deliberate and
/// shared by every required numeric form field.
pub fn form_number(s: &str) -> f64 {
    match s.trim().parse::<f64>() {
        Ok(v) if !v.is_nan() => v,
        _ => 0.0,
    }
}

/// Variant of [`form_number`] for optional numeric fields: the empty string
/// means "not set" rather than 0.
pub fn optional_form_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| form_number(trimmed))
}

impl EffectForm {
    /// Convert the form strings into the persisted numeric representation.
    ///
    /// `duration_seconds` is the one field where the empty string maps to
    /// `None` (permanent) instead of 0: an instant modifier and a permanent
    /// one are different things.
    pub fn normalize(&self) -> Effect {
        match self {
            EffectForm::Cash { amount, label } => Effect::Cash {
                amount: form_number(amount),
                label: label.clone(),
            },
            EffectForm::DynamicCash { expression, label } => Effect::DynamicCash {
                expression: expression.clone(),
                label: label.clone(),
            },
            EffectForm::Exp { amount } => Effect::Exp {
                amount: form_number(amount),
            },
            EffectForm::Metric {
                metric,
                effect_type,
                value,
                duration_seconds,
                priority,
            } => Effect::Metric {
                metric: *metric,
                effect_type: *effect_type,
                value: form_number(value),
                duration_seconds: if duration_seconds.trim().is_empty() {
                    None
                } else {
                    Some(form_number(duration_seconds))
                },
                priority: if priority.trim().is_empty() {
                    None
                } else {
                    Some(form_number(priority) as i32)
                },
            },
        }
    }

    /// Read a persisted effect back into the editable representation.
    pub fn from_effect(effect: &Effect) -> EffectForm {
        match effect {
            Effect::Cash { amount, label } => EffectForm::Cash {
                amount: amount.to_string(),
                label: label.clone(),
            },
            Effect::DynamicCash { expression, label } => EffectForm::DynamicCash {
                expression: expression.clone(),
                label: label.clone(),
            },
            Effect::Exp { amount } => EffectForm::Exp {
                amount: amount.to_string(),
            },
            Effect::Metric {
                metric,
                effect_type,
                value,
                duration_seconds,
                priority,
            } => EffectForm::Metric {
                metric: *metric,
                effect_type: *effect_type,
                value: value.to_string(),
                duration_seconds: duration_seconds.map(|d| d.to_string()).unwrap_or_default(),
                priority: priority.map(|p| p.to_string()).unwrap_or_default(),
            },
        }
    }
}
