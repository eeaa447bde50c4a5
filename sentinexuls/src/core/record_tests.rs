//! Tests for the record accessors.

#[cfg(test)]
mod tests {
    use crate::core::{record_from, Record, RecordExt};
    use serde_json::json;

    fn sample() -> Record {
        record_from(json!({
            "name": "grid",
            "score": 92.5,
            "active": true,
            "zones": ["Grid A", 7, "Grid B"],
            "meta": {"region": "Florida-East"}
        }))
    }

    #[test]
    fn test_str_or_present() {
        assert_eq!(sample().str_or("name", "unknown"), "grid");
    }

    #[test]
    fn test_str_or_missing_and_wrong_type() {
        let record = sample();
        assert_eq!(record.str_or("absent", "unknown"), "unknown");
        assert_eq!(record.str_or("score", "unknown"), "unknown");
    }

    #[test]
    fn test_f64_or() {
        let record = sample();
        assert!((record.f64_or("score", 0.0) - 92.5).abs() < f64::EPSILON);
        assert!((record.f64_or("name", 1.5) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bool_or() {
        let record = sample();
        assert!(record.bool_or("active", false));
        assert!(!record.bool_or("absent", false));
    }

    #[test]
    fn test_strings_or_drops_non_strings() {
        assert_eq!(sample().strings_or("zones", &[]), vec!["Grid A", "Grid B"]);
    }

    #[test]
    fn test_strings_or_default() {
        assert_eq!(sample().strings_or("absent", &["x", "y"]), vec!["x", "y"]);
    }

    #[test]
    fn test_array_or() {
        let record = sample();
        assert_eq!(record.array_or("zones", vec![]).len(), 3);
        assert_eq!(record.array_or("meta", vec![json!(1)]), vec![json!(1)]);
    }

    #[test]
    fn test_object_or_empty() {
        let record = sample();
        assert_eq!(record.object_or_empty("meta").str_or("region", ""), "Florida-East");
        assert!(record.object_or_empty("zones").is_empty());
    }

    #[test]
    fn test_record_from_non_object() {
        assert!(record_from(json!([1, 2])).is_empty());
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut record = Record::new();
        record.insert("z".into(), json!(1));
        record.insert("a".into(), json!(2));
        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
