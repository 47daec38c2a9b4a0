//! Card kinds and their payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a card holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    #[default]
    Note,
    Link,
    Checklist,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Note => "note",
            CardKind::Link => "link",
            CardKind::Checklist => "checklist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "note" => Some(CardKind::Note),
            "link" => Some(CardKind::Link),
            "checklist" => Some(CardKind::Checklist),
            _ => None,
        }
    }

    /// Empty payload for a freshly created card of this kind
    pub fn empty_payload(&self) -> Value {
        match self {
            CardKind::Note | CardKind::Link => serde_json::json!({}),
            CardKind::Checklist => serde_json::json!({ "items": [] }),
        }
    }

    /// Check a payload against this kind, returning the normalized form.
    ///
    /// Link payloads need a parseable absolute URL and checklist items need
    /// non-empty text. Unknown fields are dropped.
    pub fn validate_payload(&self, payload: &Value) -> Result<Value, String> {
        match self {
            CardKind::Note => {
                let note: NotePayload =
                    serde_json::from_value(payload.clone()).map_err(|e| e.to_string())?;
                serde_json::to_value(note).map_err(|e| e.to_string())
            }
            CardKind::Link => {
                let link: LinkPayload =
                    serde_json::from_value(payload.clone()).map_err(|e| e.to_string())?;
                url::Url::parse(&link.url).map_err(|e| format!("invalid url: {e}"))?;
                serde_json::to_value(link).map_err(|e| e.to_string())
            }
            CardKind::Checklist => {
                let checklist: ChecklistPayload =
                    serde_json::from_value(payload.clone()).map_err(|e| e.to_string())?;
                if let Some(item) = checklist.items.iter().find(|i| i.text.trim().is_empty()) {
                    return Err(format!("checklist item '{}' has no text", item.id));
                }
                serde_json::to_value(checklist).map_err(|e| e.to_string())
            }
        }
    }
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPayload {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistPayload {
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_requires_valid_url() {
        assert!(CardKind::Link
            .validate_payload(&json!({"url": "https://example.com/watch"}))
            .is_ok());
        assert!(CardKind::Link
            .validate_payload(&json!({"url": "not a url"}))
            .is_err());
        assert!(CardKind::Link.validate_payload(&json!({})).is_err());
    }

    #[test]
    fn test_checklist_items_need_text() {
        let ok = json!({"items": [{"id": "a", "text": "milk", "order": 0}]});
        let normalized = CardKind::Checklist.validate_payload(&ok).unwrap();
        assert_eq!(normalized["items"][0]["done"], false);

        let bad = json!({"items": [{"id": "a", "text": "  ", "order": 0}]});
        assert!(CardKind::Checklist.validate_payload(&bad).is_err());
    }

    #[test]
    fn test_note_drops_unknown_fields() {
        let normalized = CardKind::Note
            .validate_payload(&json!({"content": "hi", "color": "red"}))
            .unwrap();
        assert_eq!(normalized, json!({"content": "hi"}));
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [CardKind::Note, CardKind::Link, CardKind::Checklist] {
            assert_eq!(CardKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(CardKind::parse("video"), None);
    }
}
