use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A catalogued book, keyed by call number while live. `person_id` is
/// foreign-key-shaped only; it may point at a missing or deleted person.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "CallNumber")]
    pub call_number: i32,
    #[serde(rename = "PersonID")]
    pub person_id: i32,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "DeletedAt")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Create payload. Absent fields take their zero values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewBook {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "CallNumber")]
    pub call_number: i32,
    #[serde(rename = "PersonID")]
    pub person_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn wire_keys_are_pinned() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0).unwrap();
        let book = Book {
            id: 3,
            title: "The Worlds of Then".to_string(),
            author: "V. Surlee".to_string(),
            call_number: 5678,
            person_id: 7,
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        };

        let value = serde_json::to_value(book).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "ID",
            "Title",
            "Author",
            "CallNumber",
            "PersonID",
            "CreatedAt",
            "UpdatedAt",
            "DeletedAt",
        ] {
            assert!(object.contains_key(key), "missing wire key {}", key);
        }
        assert_eq!(object.len(), 8);
        assert_eq!(value["CallNumber"], 5678);
        assert_eq!(value["PersonID"], 7);
    }

    #[test]
    fn create_payload_fields_default_to_zero_values() {
        let new: NewBook = serde_json::from_str(r#"{"Title":"T"}"#).unwrap();
        assert_eq!(new.title, "T");
        assert_eq!(new.author, "");
        assert_eq!(new.call_number, 0);
        assert_eq!(new.person_id, 0);
    }
}
