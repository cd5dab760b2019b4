use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One previously created short link, as served by the list endpoint.
/// Records are immutable; the store replaces the whole collection on refresh.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LinkRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "shortUrl")]
    pub short_url: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>, // absent = permanent
}

/// The endpoint serves either a bare array or an `{"items": [...]}` wrapper
/// (the wrapper also carries `count`/`next`, which the client ignores).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload {
    Wrapped { items: Vec<LinkRecord> },
    Bare(Vec<LinkRecord>),
}

impl ListPayload {
    pub fn into_records(self) -> Vec<LinkRecord> {
        match self {
            ListPayload::Wrapped { items } => items,
            ListPayload::Bare(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bare_array() {
        let body = r#"[
            {"_id":"a1","shortUrl":"https://go.shortl.ist/a1","alias":"docs",
             "createdAt":"2024-05-01T10:00:00.000Z","expiresAt":"2024-05-02T10:00:00.000Z"}
        ]"#;
        let payload: ListPayload = serde_json::from_str(body).unwrap();
        let records = payload.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a1");
        assert_eq!(records[0].alias.as_deref(), Some("docs"));
        assert!(records[0].created_at.is_some());
        assert!(records[0].expires_at.is_some());
    }

    #[test]
    fn decodes_wrapped_items() {
        let body = r#"{"items":[{"_id":"b2","shortUrl":"/b2"}],"count":1,"next":null}"#;
        let payload: ListPayload = serde_json::from_str(body).unwrap();
        let records = payload.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].short_url, "/b2");
    }

    #[test]
    fn optional_fields_default_to_none() {
        let body = r#"[{"_id":"c3","shortUrl":"/c3"}]"#;
        let records: Vec<LinkRecord> = serde_json::from_str::<ListPayload>(body)
            .unwrap()
            .into_records();
        assert!(records[0].alias.is_none());
        assert!(records[0].created_at.is_none());
        assert!(records[0].expires_at.is_none());
    }
}
