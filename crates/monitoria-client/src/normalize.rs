//! Response normalization.
//!
//! The two backend families disagree on shape: the authenticated endpoints
//! serve card records directly, while `/api/cards` serves canonical items
//! (`id`, `description`, ...). Everything funnels through here so the store
//! only ever sees one shape.

use monitoria_types::models::{CardItem, Message};

/// Placeholder body when an item carries no description.
pub const MISSING_DESCRIPTION: &str = "Sin descripción";

/// Map a no-auth card item onto the card shape the store holds.
///
/// Total and deterministic: a missing or empty description falls back to
/// [`MISSING_DESCRIPTION`], the label always starts unset, and the score
/// defaults to 0 upstream of this call.
pub fn card_to_message(item: CardItem) -> Message {
    let body = item
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(MISSING_DESCRIPTION);

    Message {
        id: item.id,
        score: item.score,
        url: item.url,
        label: None,
        embed_html: format!("<p>{}</p>", body),
        title: item.title,
        description: item.description,
        views: None,
        average_views: None,
    }
}
