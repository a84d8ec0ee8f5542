use serde::{Deserialize, Serialize};

use crate::models::{CardItem, Label, Message};

/// Sort order accepted by the filter endpoints. The backend sorts
/// descending by the chosen column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Score,
    Views,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(SortBy::Score),
            "views" => Ok(SortBy::Views),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Filter criteria as POSTed to the filter endpoints.
///
/// Serialized field names are the wire names. An empty string means
/// "no constraint" for that field; dates are `YYYY-MM-DD` strings and the
/// score bounds are decimal strings, exactly as the form submits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub date_start: String,
    pub date_end: String,
    pub channel: String,
    pub score_min: String,
    pub score_max: String,
    pub media_type: String,
    pub sort_by: SortBy,

    /// 1-based page, defaults server-side to 1.
    #[serde(rename = "page", skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size, defaults server-side to 24 and is capped at 100.
    #[serde(rename = "per_page", skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Envelope for the authenticated list endpoint and both filter endpoints:
/// `{success, messages, total_messages}` on the happy path, `{success: false,
/// error}` otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub total_messages: Option<u64>,
}

/// Envelope for the unauthenticated `/api/cards` list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CardsEnvelope {
    #[serde(default)]
    pub items: Option<Vec<CardItem>>,
}

/// Body POSTed to `/label`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRequest {
    pub message_id: i64,
    pub label: Label,
}

/// Minimal ack returned by mutation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_criteria_match_the_documented_reset_state() {
        let criteria = FilterCriteria::default();
        let body = serde_json::to_value(&criteria).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "dateStart": "",
                "dateEnd": "",
                "channel": "",
                "scoreMin": "",
                "scoreMax": "",
                "mediaType": "",
                "sortBy": "score"
            })
        );
    }

    #[test]
    fn pagination_fields_keep_their_snake_case_wire_names() {
        let criteria = FilterCriteria {
            page: Some(2),
            per_page: Some(24),
            ..FilterCriteria::default()
        };
        let body = serde_json::to_value(&criteria).unwrap();
        assert_eq!(body["page"], 2);
        assert_eq!(body["per_page"], 24);
    }

    #[test]
    fn sort_by_parses_wire_values_only() {
        assert_eq!("score".parse::<SortBy>().unwrap(), SortBy::Score);
        assert_eq!("views".parse::<SortBy>().unwrap(), SortBy::Views);
        assert!("likes".parse::<SortBy>().is_err());
    }

    #[test]
    fn label_request_serializes_label_as_integer() {
        let req = LabelRequest {
            message_id: 9,
            label: crate::models::Label::Relevant,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, serde_json::json!({"message_id": 9, "label": 1}));
    }

    #[test]
    fn messages_envelope_tolerates_error_shape() {
        let raw = r#"{"success": false, "error": "No hay datos disponibles"}"#;
        let env: MessagesEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(env.success, Some(false));
        assert!(env.messages.is_none());
        assert_eq!(env.error.as_deref(), Some("No hay datos disponibles"));
    }
}
