// src/models/destination.rs
// DOCUMENTATION: Destination records from the CSV dataset

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::ReviewResponse;

/// Column holding the destination identifier
pub const ID_FIELD: &str = "ID";

/// One CSV row, kept as ordered `(header, value)` pairs
/// Serializes as a JSON object in dataset column order
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationRecord {
    fields: Vec<(String, String)>,
}

impl DestinationRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Value of the exact header `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn id(&self) -> &str {
        self.get(ID_FIELD).unwrap_or_default()
    }

    /// Set `key`, appending it when absent
    pub fn set(&mut self, key: &str, value: String) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }
}

impl Serialize for DestinationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Response of GET /api/destinations/{id}/coordinates
#[derive(Debug, Serialize, PartialEq)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Stored aggregate for a reviewed destination
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct DestinationRating {
    pub average_rating: f64,
    pub review_count: i32,
}

/// Response of POST /api/destinations/{id}/reviews
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationReviewsResponse {
    pub destination: DestinationRecord,
    pub average_rating: f64,
    pub review_count: i32,
    pub reviews: Vec<ReviewResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_in_column_order() {
        let record = DestinationRecord::new(vec![
            ("Destination".to_string(), "Rome".to_string()),
            ("Country".to_string(), "Italy".to_string()),
            ("ID".to_string(), "1".to_string()),
        ]);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Destination":"Rome","Country":"Italy","ID":"1"}"#);
    }

    #[test]
    fn test_set_replaces_or_appends() {
        let mut record = DestinationRecord::new(vec![("ID".to_string(), String::new())]);
        record.set("ID", "7".to_string());
        record.set("Country", "Spain".to_string());

        assert_eq!(record.id(), "7");
        assert_eq!(record.get("Country"), Some("Spain"));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"ID":"7","Country":"Spain"}"#
        );
    }
}
