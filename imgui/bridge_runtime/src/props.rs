use serde_json::{Map, Value};

use crate::native::Vec2;

/// A node's prop bag. JSON `null` means the prop is absent.
pub type Props = Map<String, Value>;

/// Reads a JSON value the way the reconciler's host language converts to a number:
/// numbers as-is, numeric strings parsed, booleans as `0`/`1`. The result may be
/// non-finite.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// String form of a prop value. Whole numbers print without a fraction.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{}", float as i64)
            }
            _ => number.to_string(),
        },
        Value::Bool(flag) => flag.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub trait PropsExt {
    fn prop(&self, key: &str) -> Option<&Value>;

    fn has(&self, key: &str) -> bool {
        self.prop(key).is_some()
    }

    fn flag(&self, key: &str) -> bool {
        self.prop(key).is_some_and(truthy)
    }

    fn text(&self, key: &str) -> Option<String> {
        self.prop(key).map(coerce_string)
    }

    /// A finite number, or `fallback` with a warning when the prop is present but
    /// not a finite number.
    fn number(&self, key: &str, fallback: f64) -> f64 {
        self.prop(key)
            .map_or(fallback, |value| finite_or(value, fallback, key))
    }

    /// Present props validated like `number`; absent props stay `None`.
    fn number_opt(&self, key: &str, fallback: f64) -> Option<f64> {
        self.prop(key).map(|value| finite_or(value, fallback, key))
    }

    fn integer(&self, key: &str, fallback: i32) -> i32 {
        self.number(key, f64::from(fallback)).round() as i32
    }

    fn integer_opt(&self, key: &str, fallback: i32) -> Option<i32> {
        self.number_opt(key, f64::from(fallback))
            .map(|value| value.round() as i32)
    }

    /// Bit flags, truncated to 32 bits. Anything non-numeric is no flags.
    fn bits(&self, key: &str) -> i32 {
        self.prop(key)
            .and_then(coerce_number)
            .filter(|value| value.is_finite())
            .map_or(0, |value| value.trunc() as i64 as i32)
    }

    /// `{x, y}` objects; missing components keep their default.
    fn point(&self, key: &str, default: Vec2) -> Vec2 {
        let Some(Value::Object(point)) = self.prop(key) else {
            return default;
        };

        let [x, y] = default;
        let component = |axis: &str, fallback: f32| {
            point.prop(axis).map_or(fallback, |value| {
                finite_or(value, f64::from(fallback), key) as f32
            })
        };
        [component("x", x), component("y", y)]
    }

    fn strings(&self, key: &str) -> Vec<String> {
        match self.prop(key) {
            Some(Value::Array(items)) => items.iter().map(coerce_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Every entry of a numeric array; entries that are not finite numbers become 0.
    fn floats(&self, key: &str) -> Vec<f32> {
        match self.prop(key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    coerce_number(item)
                        .filter(|value| value.is_finite())
                        .map_or(0.0, |value| value as f32)
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn style(&self) -> Option<&Props> {
        self.prop("style").and_then(Value::as_object)
    }

    /// A style number, ignored unless finite.
    fn style_number(&self, key: &str) -> Option<f32> {
        self.style()?
            .prop(key)
            .and_then(coerce_number)
            .filter(|value| value.is_finite())
            .map(|value| value as f32)
    }

    fn style_color(&self, key: &str) -> Option<&Value> {
        self.style()?.prop(key)
    }
}

impl PropsExt for Props {
    fn prop(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|value| !value.is_null())
    }
}

fn finite_or(value: &Value, fallback: f64, what: &str) -> f64 {
    match coerce_number(value) {
        Some(number) if number.is_finite() => number,
        _ => {
            tracing::warn!(prop = what, %value, "invalid number (NaN or Infinity); using {fallback}");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        value.as_object().cloned().expect("props fixture is an object")
    }

    #[test]
    fn null_props_are_absent() {
        let props = props(json!({ "value": null, "label": "Go" }));
        assert!(!props.has("value"));
        assert_eq!(props.text("label").as_deref(), Some("Go"));
    }

    #[test]
    fn numbers_coerce_like_the_host_language() {
        let props = props(json!({ "a": "12.5", "b": true, "c": "", "d": [1] }));
        assert_eq!(props.number("a", 0.0), 12.5);
        assert_eq!(props.number("b", 0.0), 1.0);
        assert_eq!(props.number("c", 7.0), 0.0);
        assert_eq!(props.number("d", 7.0), 7.0);
        assert_eq!(props.number("missing", 3.0), 3.0);
    }

    #[test]
    fn non_finite_numbers_use_the_fallback() {
        let props = props(json!({ "value": "NaN", "max": "Infinity" }));
        assert_eq!(props.number_opt("value", 0.0), Some(0.0));
        assert_eq!(props.number("max", 1.0), 1.0);
        assert_eq!(props.integer("value", 5), 5);
    }

    #[test]
    fn integers_round_and_flags_truncate() {
        let props = props(json!({ "count": 2.6, "flags": 70.9, "bad": "x" }));
        assert_eq!(props.integer("count", 0), 3);
        assert_eq!(props.bits("flags"), 70);
        assert_eq!(props.bits("bad"), 0);
    }

    #[test]
    fn truthiness_matches_host_semantics() {
        let props = props(json!({ "zero": 0, "one": 1, "empty": "", "word": "no", "obj": {} }));
        assert!(!props.flag("zero"));
        assert!(props.flag("one"));
        assert!(!props.flag("empty"));
        assert!(props.flag("word"));
        assert!(props.flag("obj"));
        assert!(!props.flag("missing"));
    }

    #[test]
    fn strings_print_whole_numbers_without_fraction() {
        let props = props(json!({ "items": ["a", 2, 2.5, false] }));
        assert_eq!(props.strings("items"), vec!["a", "2", "2.5", "false"]);
    }

    #[test]
    fn points_and_float_lists() {
        let props = props(json!({
            "uv0": { "x": 0.25 },
            "values": [1, "2", "NaN", null, 3.5],
        }));
        assert_eq!(props.point("uv0", [0.0, 0.0]), [0.25, 0.0]);
        assert_eq!(props.point("missing", [1.0, 1.0]), [1.0, 1.0]);
        assert_eq!(props.floats("values"), vec![1.0, 2.0, 0.0, 0.0, 3.5]);
    }

    #[test]
    fn style_numbers_ignore_invalid_values() {
        let props = props(json!({ "style": { "width": "120", "height": "tall" } }));
        assert_eq!(props.style_number("width"), Some(120.0));
        assert_eq!(props.style_number("height"), None);
        assert_eq!(props.style_color("color"), None);
    }
}
