use serde::{Deserialize, Deserializer, Serialize};

/// The backend emits explicit `null` for any column missing upstream, so
/// scalar fields must treat null and absent alike.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reviewer-assigned relevance flag on a message.
///
/// The wire format is a bare integer (0 = not relevant, 1 = relevant);
/// an absent/null label means the message has not been reviewed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Label {
    NotRelevant,
    Relevant,
}

impl TryFrom<i64> for Label {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::NotRelevant),
            1 => Ok(Label::Relevant),
            other => Err(format!("label must be 0 or 1, got {}", other)),
        }
    }
}

impl From<Label> for i64 {
    fn from(label: Label) -> Self {
        match label {
            Label::NotRelevant => 0,
            Label::Relevant => 1,
        }
    }
}

/// One reviewable message card.
///
/// The authenticated backend serves these under display-name keys
/// ("Message ID", "Score", ...). Those names exist only at the serde
/// boundary; everything in memory uses this stable schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "Message ID")]
    pub id: i64,

    /// Overperforming score: engagement relative to the channel's expected
    /// average. 1.0 = average, above 1.0 = above expectations.
    #[serde(rename = "Score", default, deserialize_with = "null_default")]
    pub score: f64,

    #[serde(rename = "URL", default, deserialize_with = "null_default")]
    pub url: String,

    #[serde(rename = "Label", default)]
    pub label: Option<Label>,

    /// Pre-rendered embed snippet for the card body.
    #[serde(rename = "Embed", default, deserialize_with = "null_default")]
    pub embed_html: String,

    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(
        rename = "Message Text",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(rename = "Views", default, skip_serializing_if = "Option::is_none")]
    pub views: Option<i64>,

    #[serde(
        rename = "Average Views",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub average_views: Option<f64>,
}

/// Canonical item shape served by the unauthenticated `/api/cards` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardItem {
    #[serde(default, deserialize_with = "null_default")]
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_uses_display_keys_on_the_wire() {
        let raw = r#"{
            "Message ID": 42,
            "Score": 1.7,
            "URL": "https://t.me/c/42",
            "Label": 1,
            "Embed": "<p>hola</p>",
            "Title": "canal",
            "Message Text": "texto",
            "Views": 900,
            "Average Views": 450.0
        }"#;

        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.id, 42);
        assert_eq!(msg.score, 1.7);
        assert_eq!(msg.label, Some(Label::Relevant));
        assert_eq!(msg.embed_html, "<p>hola</p>");
        assert_eq!(msg.title.as_deref(), Some("canal"));
        assert_eq!(msg.views, Some(900));

        let out = serde_json::to_value(&msg).unwrap();
        assert_eq!(out["Message ID"], 42);
        assert_eq!(out["Label"], 1);
        assert_eq!(out["Message Text"], "texto");
    }

    #[test]
    fn message_defaults_missing_fields() {
        // The authenticated list endpoint omits Score/URL/Embed entirely.
        let raw = r#"{"Message ID": 7, "Label": null}"#;
        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.score, 0.0);
        assert_eq!(msg.url, "");
        assert_eq!(msg.label, None);
        assert_eq!(msg.embed_html, "");
    }

    #[test]
    fn message_treats_explicit_nulls_like_absent_columns() {
        // The backend serializes missing cells as null, not by omission.
        let raw = r#"{"Message ID": 8, "Score": null, "URL": null, "Embed": null, "Label": null}"#;
        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.score, 0.0);
        assert_eq!(msg.url, "");
        assert_eq!(msg.embed_html, "");
        assert_eq!(msg.label, None);
    }

    #[test]
    fn label_rejects_out_of_range_values() {
        assert!(Label::try_from(2).is_err());
        assert!(Label::try_from(-1).is_err());
        let bad: Result<Message, _> = serde_json::from_str(r#"{"Message ID": 1, "Label": 3}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn card_item_tolerates_sparse_input() {
        let item: CardItem = serde_json::from_str(r#"{"id": 5}"#).unwrap();
        assert_eq!(item.id, 5);
        assert_eq!(item.score, 0.0);
        assert!(item.description.is_none());
        assert!(item.tags.is_empty());
    }
}
