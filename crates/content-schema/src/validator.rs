//! Recursive structural validator for the event wire shape.
//!
//! The walk never short-circuits: every violation in the document is
//! reported in one pass, each as `"<path>.<field>: <expected shape>"`.
//! Global id uniqueness is out of scope here; uniqueness among immediate
//! siblings (choices within an event, consequences within a choice) is
//! checked.

use serde_json::Value;

use content_core::{EventCategory, MetricEffectKind, MetricKind};

/// True when `value` satisfies the event shape. Used to gate deserialization.
pub fn validate_game_event(value: &Value) -> bool {
    validate_and_get_errors(value).is_empty()
}

/// Validate one event object and return every violation, path-qualified
/// relative to the root `event`. Empty means the document is importable.
pub fn validate_and_get_errors(value: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    check_event("event", value, &mut errors);
    errors
}

/// Validate `value` with an explicit path prefix; the bulk importer roots
/// each array item at `events[i]`.
pub(crate) fn check_event(path: &str, value: &Value, errors: &mut Vec<String>) {
    let Some(obj) = value.as_object() else {
        errors.push(format!("{path}: must be an object"));
        return;
    };

    require_id(path, obj, "id", errors);
    require_nonempty_string(path, obj, "title", errors);
    require_string(path, obj, "summary", errors);

    match obj.get("category").and_then(Value::as_str) {
        Some(s) if EventCategory::ALL.iter().any(|c| c.as_str() == s) => {}
        _ => errors.push(format!(
            "{path}.category: must be one of {}",
            known_names(&EventCategory::ALL.map(|c| c.as_str()))
        )),
    }

    if let Some(reqs) = obj.get("requirements") {
        check_requirements(&format!("{path}.requirements"), reqs, errors);
    }

    let Some(choices) = obj.get("choices").and_then(Value::as_array) else {
        errors.push(format!("{path}.choices: must be an array"));
        return;
    };

    if obj.get("category").and_then(Value::as_str) == Some(EventCategory::GoodBad.as_str()) {
        let shape_ok = choices.len() == 1
            && choices[0]
                .get("consequences")
                .and_then(Value::as_array)
                .is_some_and(|c| !c.is_empty());
        if !shape_ok {
            errors.push(format!(
                "{path}.choices: goodBad events must have exactly one choice with at least one consequence"
            ));
        }
    }

    let mut seen_ids: Vec<&str> = Vec::with_capacity(choices.len());
    for (i, choice) in choices.iter().enumerate() {
        let choice_path = format!("{path}.choices[{i}]");
        check_choice(&choice_path, choice, errors);
        if let Some(id) = trimmed_id(choice) {
            if seen_ids.contains(&id) {
                errors.push(format!("{choice_path}.id: duplicates a sibling choice id"));
            } else {
                seen_ids.push(id);
            }
        }
    }
}

fn check_choice(path: &str, value: &Value, errors: &mut Vec<String>) {
    let Some(obj) = value.as_object() else {
        errors.push(format!("{path}: must be an object"));
        return;
    };

    require_id(path, obj, "id", errors);
    require_string(path, obj, "label", errors);
    optional_string(path, obj, "description", errors);
    optional_string(path, obj, "setsFlag", errors);
    optional_nonnegative_number(path, obj, "cost", errors);
    optional_nonnegative_number(path, obj, "timeCost", errors);

    if let Some(reqs) = obj.get("requirements") {
        check_requirements(&format!("{path}.requirements"), reqs, errors);
    }

    let Some(consequences) = obj.get("consequences").and_then(Value::as_array) else {
        errors.push(format!("{path}.consequences: must be an array"));
        return;
    };

    let mut seen_ids: Vec<&str> = Vec::with_capacity(consequences.len());
    for (i, consequence) in consequences.iter().enumerate() {
        let consequence_path = format!("{path}.consequences[{i}]");
        check_consequence(&consequence_path, consequence, errors);
        if let Some(id) = trimmed_id(consequence) {
            if seen_ids.contains(&id) {
                errors.push(format!(
                    "{consequence_path}.id: duplicates a sibling consequence id"
                ));
            } else {
                seen_ids.push(id);
            }
        }
    }
}

fn check_consequence(path: &str, value: &Value, errors: &mut Vec<String>) {
    let Some(obj) = value.as_object() else {
        errors.push(format!("{path}: must be an object"));
        return;
    };

    require_id(path, obj, "id", errors);
    optional_string(path, obj, "label", errors);
    optional_string(path, obj, "description", errors);

    // Integral floats (`3.0`) count as integers, matching the deserializer.
    let weight_ok = obj
        .get("weight")
        .and_then(Value::as_f64)
        .is_some_and(|w| (1.0..=u32::MAX as f64).contains(&w) && w.fract() == 0.0);
    if !weight_ok {
        errors.push(format!("{path}.weight: must be a positive integer"));
    }

    check_effect_list(path, obj.get("effects"), "effects", true, errors);

    if let Some(delayed) = obj.get("delayedConsequence") {
        check_delayed(&format!("{path}.delayedConsequence"), delayed, errors);
    }
}

fn check_delayed(path: &str, value: &Value, errors: &mut Vec<String>) {
    let Some(obj) = value.as_object() else {
        errors.push(format!("{path}: must be an object"));
        return;
    };

    require_id(path, obj, "id", errors);
    optional_string(path, obj, "label", errors);
    optional_string(path, obj, "successDescription", errors);
    optional_string(path, obj, "failureDescription", errors);

    let delay_ok = obj
        .get("delaySeconds")
        .and_then(Value::as_f64)
        .is_some_and(|d| d > 0.0);
    if !delay_ok {
        errors.push(format!("{path}.delaySeconds: must be a positive number"));
    }

    if let Some(reqs) = obj.get("successRequirements") {
        check_requirements(&format!("{path}.successRequirements"), reqs, errors);
    }

    check_effect_list(path, obj.get("successEffects"), "successEffects", true, errors);
    check_effect_list(path, obj.get("failureEffects"), "failureEffects", false, errors);
}

fn check_effect_list(
    path: &str,
    value: Option<&Value>,
    field: &str,
    required: bool,
    errors: &mut Vec<String>,
) {
    let list = match value {
        Some(v) => match v.as_array() {
            Some(list) => list,
            None => {
                errors.push(format!("{path}.{field}: must be an array"));
                return;
            }
        },
        None if required => {
            errors.push(format!("{path}.{field}: must be an array"));
            return;
        }
        None => return,
    };
    for (i, effect) in list.iter().enumerate() {
        check_effect(&format!("{path}.{field}[{i}]"), effect, errors);
    }
}

fn check_effect(path: &str, value: &Value, errors: &mut Vec<String>) {
    let Some(obj) = value.as_object() else {
        errors.push(format!("{path}: must be an object"));
        return;
    };

    match obj.get("type").and_then(Value::as_str) {
        Some("cash") => {
            require_number(path, obj, "amount", errors);
            optional_string(path, obj, "label", errors);
        }
        Some("dynamicCash") => {
            require_nonempty_string(path, obj, "expression", errors);
            optional_string(path, obj, "label", errors);
        }
        Some("exp") => {
            require_number(path, obj, "amount", errors);
        }
        Some("metric") => {
            match obj.get("metric").and_then(Value::as_str) {
                Some(s) if MetricKind::ALL.iter().any(|m| m.as_str() == s) => {}
                _ => errors.push(format!(
                    "{path}.metric: must be one of {}",
                    known_names(&MetricKind::ALL.map(|m| m.as_str()))
                )),
            }
            match obj.get("effectType").and_then(Value::as_str) {
                Some(s) if MetricEffectKind::ALL.iter().any(|k| k.as_str() == s) => {}
                _ => errors.push(format!(
                    "{path}.effectType: must be one of {}",
                    known_names(&MetricEffectKind::ALL.map(|k| k.as_str()))
                )),
            }
            require_number(path, obj, "value", errors);
            // durationSeconds is nullable (null/absent both mean permanent),
            // unlike every other numeric field.
            match obj.get("durationSeconds") {
                None => {}
                Some(Value::Null) => {}
                Some(v) if v.is_f64() || v.is_i64() || v.is_u64() => {}
                Some(_) => {
                    errors.push(format!("{path}.durationSeconds: must be a number or null"))
                }
            }
            if let Some(priority) = obj.get("priority") {
                let ok = priority.as_f64().is_some_and(|p| {
                    (i32::MIN as f64..=i32::MAX as f64).contains(&p) && p.fract() == 0.0
                });
                if !ok {
                    errors.push(format!("{path}.priority: must be an integer"));
                }
            }
        }
        _ => errors.push(format!(
            "{path}.type: must be one of cash, dynamicCash, exp, metric"
        )),
    }
}

fn check_requirements(path: &str, value: &Value, errors: &mut Vec<String>) {
    let Some(list) = value.as_array() else {
        errors.push(format!("{path}: must be an array"));
        return;
    };
    for (i, req) in list.iter().enumerate() {
        let req_path = format!("{path}[{i}]");
        let Some(obj) = req.as_object() else {
            errors.push(format!("{req_path}: must be an object"));
            continue;
        };
        match obj.get("type").and_then(Value::as_str) {
            Some("flag") => require_nonempty_string(&req_path, obj, "flag", errors),
            Some("upgrade") => require_nonempty_string(&req_path, obj, "upgrade", errors),
            Some("staff") => {
                require_nonempty_string(&req_path, obj, "role", errors);
                if let Some(count) = obj.get("count") {
                    let ok = count.as_f64().is_some_and(|c| {
                        (0.0..=u32::MAX as f64).contains(&c) && c.fract() == 0.0
                    });
                    if !ok {
                        errors.push(format!(
                            "{req_path}.count: must be a non-negative integer"
                        ));
                    }
                }
            }
            _ => errors.push(format!(
                "{req_path}.type: must be one of flag, upgrade, staff"
            )),
        }
    }
}

fn trimmed_id(value: &Value) -> Option<&str> {
    let id = value.get("id")?.as_str()?.trim();
    (!id.is_empty()).then_some(id)
}

fn require_id(
    path: &str,
    obj: &serde_json::Map<String, Value>,
    field: &str,
    errors: &mut Vec<String>,
) {
    require_nonempty_string(path, obj, field, errors);
}

fn require_string(
    path: &str,
    obj: &serde_json::Map<String, Value>,
    field: &str,
    errors: &mut Vec<String>,
) {
    if !obj.get(field).is_some_and(Value::is_string) {
        errors.push(format!("{path}.{field}: must be a string"));
    }
}

fn require_nonempty_string(
    path: &str,
    obj: &serde_json::Map<String, Value>,
    field: &str,
    errors: &mut Vec<String>,
) {
    let ok = obj
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty());
    if !ok {
        errors.push(format!("{path}.{field}: must be a non-empty string"));
    }
}

fn require_number(
    path: &str,
    obj: &serde_json::Map<String, Value>,
    field: &str,
    errors: &mut Vec<String>,
) {
    if obj.get(field).and_then(Value::as_f64).is_none() {
        errors.push(format!("{path}.{field}: must be a number"));
    }
}

fn optional_string(
    path: &str,
    obj: &serde_json::Map<String, Value>,
    field: &str,
    errors: &mut Vec<String>,
) {
    if let Some(v) = obj.get(field) {
        if !v.is_string() {
            errors.push(format!("{path}.{field}: must be a string"));
        }
    }
}

fn optional_nonnegative_number(
    path: &str,
    obj: &serde_json::Map<String, Value>,
    field: &str,
    errors: &mut Vec<String>,
) {
    if let Some(v) = obj.get(field) {
        if !v.as_f64().is_some_and(|n| n >= 0.0) {
            errors.push(format!("{path}.{field}: must be a non-negative number"));
        }
    }
}

fn known_names(names: &[&str]) -> String {
    names.join(", ")
}
