#![forbid(unsafe_code)]

//! Shape normalization and the untrusted-input parse step.
//!
//! [`normalize`] never fails: whatever it is handed, the result has an even
//! length of at least [`MIN_SLOTS`]. Persisted JSON goes through
//! [`parse_slots_or_default`] first, which classifies every element before
//! trusting it.

use serde_json::Value;

use crate::logging::debug;
use crate::model::{
    FULL_WIDTH_SPAN, GRID_COLUMNS, LayoutDefaults, MIN_SLOTS, ModuleKey, Slot, SpanMap,
};

/// Coerce `input` into a valid slot sequence.
///
/// An empty input yields the configured default layout. Otherwise the input
/// is padded with empty cells to [`MIN_SLOTS`], then to an even length.
#[must_use]
pub fn normalize(input: &[Slot], defaults: &LayoutDefaults) -> Vec<Slot> {
    if input.is_empty() {
        return default_slots(defaults);
    }
    let mut slots = input.to_vec();
    pad_to_grid(&mut slots);
    slots
}

/// Owned variant of `normalize` that reuses the allocation.
#[must_use]
pub(crate) fn normalize_owned(mut input: Vec<Slot>, defaults: &LayoutDefaults) -> Vec<Slot> {
    if input.is_empty() {
        return default_slots(defaults);
    }
    pad_to_grid(&mut input);
    input
}

fn default_slots(defaults: &LayoutDefaults) -> Vec<Slot> {
    let mut slots = defaults.default_layout.clone();
    // A misconfigured default still has to satisfy the shape invariant.
    pad_to_grid(&mut slots);
    slots
}

fn pad_to_grid(slots: &mut Vec<Slot>) {
    if slots.len() < MIN_SLOTS {
        slots.resize(MIN_SLOTS, None);
    }
    if slots.len() % GRID_COLUMNS != 0 {
        slots.push(None);
    }
}

/// Classification of one persisted layout element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSlot {
    Key(ModuleKey),
    Empty,
    Invalid,
}

impl RawSlot {
    /// Classify a JSON element: non-empty strings are keys, `null` and the
    /// empty string are empty, anything else is invalid.
    #[must_use]
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(s) => ModuleKey::parse(s).map_or(Self::Empty, Self::Key),
            _ => Self::Invalid,
        }
    }

    #[must_use]
    pub fn into_slot(self) -> Slot {
        match self {
            Self::Key(key) => Some(key),
            Self::Empty | Self::Invalid => None,
        }
    }
}

/// Parse a persisted layout value, falling back to the default layout when
/// it is not an array or is empty. Invalid elements become empty slots.
#[must_use]
pub fn parse_slots_or_default(value: &Value, defaults: &LayoutDefaults) -> Vec<Slot> {
    let Value::Array(items) = value else {
        debug!(
            kind = value_kind(value),
            "persisted layout is not an array; using default"
        );
        return default_slots(defaults);
    };
    let mut invalid = 0usize;
    let slots: Vec<Slot> = items
        .iter()
        .map(|item| {
            let raw = RawSlot::classify(item);
            if raw == RawSlot::Invalid {
                invalid += 1;
            }
            raw.into_slot()
        })
        .collect();
    if invalid > 0 {
        debug!(invalid, "coerced invalid layout elements to empty");
    }
    normalize_owned(slots, defaults)
}

/// Parse a persisted span object. Entries survive only if the key is a
/// non-empty string and the value is an integer in `u8` range; anything that
/// is not an object yields an empty map.
#[must_use]
pub fn parse_spans(value: &Value) -> SpanMap {
    let Value::Object(entries) = value else {
        return SpanMap::new();
    };
    entries
        .iter()
        .filter_map(|(key, span)| {
            let key = ModuleKey::parse(key)?;
            let span = span_value(span)?;
            Some((key, span))
        })
        .collect()
}

fn span_value(value: &Value) -> Option<u8> {
    if let Some(n) = value.as_u64() {
        return u8::try_from(n).ok();
    }
    // JSON numbers written as `2.0` still mean full width.
    match value.as_f64() {
        Some(f) if f == f64::from(FULL_WIDTH_SPAN) => Some(FULL_WIDTH_SPAN),
        _ => None,
    }
}

#[cfg(feature = "tracing")]
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(s: &str) -> Slot {
        Some(ModuleKey::new(s))
    }

    #[test]
    fn empty_input_yields_default_layout() {
        let defaults = LayoutDefaults::default();
        let slots = normalize(&[], &defaults);
        assert_eq!(
            slots,
            vec![key("nutrition"), key("productivity"), key("fitness"), None]
        );
    }

    #[test]
    fn short_odd_input_pads_to_four() {
        let defaults = LayoutDefaults::default();
        let slots = normalize(&[key("a"), key("b"), key("c")], &defaults);
        assert_eq!(slots, vec![key("a"), key("b"), key("c"), None]);
    }

    #[test]
    fn long_odd_input_gains_one_cell() {
        let defaults = LayoutDefaults::default();
        let input = vec![key("a"), None, key("b"), None, key("c")];
        let slots = normalize(&input, &defaults);
        assert_eq!(slots.len(), 6);
        assert_eq!(slots[5], None);
    }

    #[test]
    fn even_input_is_untouched() {
        let defaults = LayoutDefaults::default();
        let input = vec![None, key("a"), None, None, key("b"), None];
        assert_eq!(normalize(&input, &defaults), input);
    }

    #[test]
    fn injected_default_is_used() {
        let defaults = LayoutDefaults::new(vec![key("sleep")], vec![ModuleKey::new("sleep")]);
        assert_eq!(normalize(&[], &defaults), vec![key("sleep"), None, None, None]);
    }

    #[test]
    fn classify_elements() {
        assert_eq!(RawSlot::classify(&json!(null)), RawSlot::Empty);
        assert_eq!(RawSlot::classify(&json!("")), RawSlot::Empty);
        assert_eq!(
            RawSlot::classify(&json!("sleep")),
            RawSlot::Key(ModuleKey::new("sleep"))
        );
        assert_eq!(RawSlot::classify(&json!(7)), RawSlot::Invalid);
        assert_eq!(RawSlot::classify(&json!({"a": 1})), RawSlot::Invalid);
    }

    #[test]
    fn parse_non_array_falls_back() {
        let defaults = LayoutDefaults::default();
        for value in [json!(null), json!("nutrition"), json!({"0": "a"}), json!(3), json!([])] {
            assert_eq!(
                parse_slots_or_default(&value, &defaults),
                defaults.default_layout,
                "value {value}"
            );
        }
    }

    #[test]
    fn parse_coerces_invalid_elements() {
        let defaults = LayoutDefaults::default();
        let value = json!(["fitness", 12, true, null, ["x"], "sleep"]);
        assert_eq!(
            parse_slots_or_default(&value, &defaults),
            vec![key("fitness"), None, None, None, None, key("sleep")]
        );
    }

    #[test]
    fn parse_spans_keeps_integer_values() {
        let spans = parse_spans(&json!({
            "fitness": 2,
            "sleep": 2.0,
            "pomodoro": 1,
            "nutrition": "2",
            "productivity": -1,
            "": 2,
            "huge": 4096
        }));
        assert_eq!(spans.len(), 3);
        assert_eq!(spans.get("fitness"), Some(&2));
        assert_eq!(spans.get("sleep"), Some(&2));
        assert_eq!(spans.get("pomodoro"), Some(&1));
    }

    #[test]
    fn parse_spans_non_object_is_empty() {
        assert!(parse_spans(&json!(["fitness"])).is_empty());
        assert!(parse_spans(&json!(null)).is_empty());
    }
}
