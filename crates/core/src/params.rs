//! Pure helper functions for extracting typed parameters from a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. If the key is
//! missing or the value is not the expected type, the default is returned.
//! These never fail; they always produce a usable value.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts an `f64` from `params[name]`, or `None` if missing or wrong type.
pub fn param_f64_opt(params: &Value, name: &str) -> Option<f64> {
    params.get(name).and_then(Value::as_f64)
}

/// Checks whether `value` lies outside the `[min, max]` range advertised
/// for `name` in a parameter schema.
///
/// Returns `false` when the schema has no entry or no bounds for `name`.
pub fn out_of_schema_range(schema: &Value, name: &str, value: f64) -> bool {
    let entry = match schema.get(name) {
        Some(e) => e,
        None => return false,
    };
    let below = entry
        .get("min")
        .and_then(Value::as_f64)
        .is_some_and(|min| value < min);
    let above = entry
        .get("max")
        .and_then(Value::as_f64)
        .is_some_and(|max| value > max);
    below || above
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f64 --

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"frequency": 2.5});
        assert!((param_f64(&params, "frequency", 1.0) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"frequency": 4});
        assert!((param_f64(&params, "frequency", 0.0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_key_missing() {
        let params = json!({"other": 1.0});
        assert!((param_f64(&params, "gravity", 0.5) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_wrong_type() {
        let params = json!({"gravity": "strong"});
        assert!((param_f64(&params, "gravity", 0.5) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!("not an object");
        assert!((param_f64(&params, "dt", 0.1) - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_opt_distinguishes_missing_from_present() {
        let params = json!({"damping": 0.9, "dt": null});
        assert_eq!(param_f64_opt(&params, "damping"), Some(0.9));
        assert_eq!(param_f64_opt(&params, "dt"), None);
        assert_eq!(param_f64_opt(&params, "gravity"), None);
    }

    // -- out_of_schema_range --

    #[test]
    fn out_of_schema_range_detects_values_outside_bounds() {
        let schema = json!({"frequency": {"min": 1.0, "max": 8.0}});
        assert!(out_of_schema_range(&schema, "frequency", 0.5));
        assert!(out_of_schema_range(&schema, "frequency", 9.0));
        assert!(!out_of_schema_range(&schema, "frequency", 1.0));
        assert!(!out_of_schema_range(&schema, "frequency", 8.0));
    }

    #[test]
    fn out_of_schema_range_ignores_unknown_or_unbounded_names() {
        let schema = json!({"gravity": {"type": "number"}});
        assert!(!out_of_schema_range(&schema, "gravity", 1e9));
        assert!(!out_of_schema_range(&schema, "missing", -1.0));
    }
}
