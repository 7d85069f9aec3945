use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// A canonical field value. `Missing` is published as JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Missing,
}

static MISSING: FieldValue = FieldValue::Missing;

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    // Missing renders as `None` to match rows already published.
    pub fn identifier_text(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Missing => "None".to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Text(value) => serializer.serialize_str(value),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Missing => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CanonicalRecord {
    fields: BTreeMap<&'static str, FieldValue>,
}

impl CanonicalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, value: impl Into<FieldValue>) {
        self.fields.insert(name, value.into());
    }

    pub fn insert_missing(&mut self, name: &'static str) {
        self.fields.insert(name, FieldValue::Missing);
    }

    pub fn get(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&MISSING)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CanonicalRecord, FieldValue};

    #[test]
    fn serializes_missing_as_null_and_integers_as_numbers() {
        let mut record = CanonicalRecord::new();
        record.insert("fund", "8000");
        record.insert("fiscal_year", 2024_i64);
        record.insert_missing("unobligated");

        let value = serde_json::to_value(&record);
        assert!(value.is_ok());
        if let Ok(value) = value {
            assert_eq!(
                value,
                json!({
                    "fiscal_year": 2024,
                    "fund": "8000",
                    "unobligated": null,
                })
            );
        }
    }

    #[test]
    fn absent_fields_read_as_missing() {
        let record = CanonicalRecord::new();
        assert!(record.get("unit").is_missing());
        assert_eq!(record, CanonicalRecord::new());
    }

    #[test]
    fn identifier_text_renders_each_variant() {
        assert_eq!(FieldValue::from("2400").identifier_text(), "2400");
        assert_eq!(FieldValue::Integer(6).identifier_text(), "6");
        assert_eq!(FieldValue::Missing.identifier_text(), "None");
    }
}
