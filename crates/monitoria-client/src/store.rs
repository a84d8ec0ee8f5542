//! In-memory message store synchronized against the backend.
//!
//! One store instance is shared by whatever drives it (CLI, UI bindings,
//! tests); clones are cheap handles onto the same state. List-replacing
//! operations (`load`, `apply_filters`) are guarded by a monotonically
//! increasing request ticket: only the response matching the latest
//! outstanding request may commit records or clear the loading flag, so an
//! early slow load can never clobber a later filter result.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use monitoria_types::api::{
    CardsEnvelope, FilterCriteria, LabelRequest, MessagesEnvelope, StatusEnvelope,
};
use monitoria_types::models::{Label, Message};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::normalize::card_to_message;
use crate::session::{ResolvedSession, TokenStore, resolve_mode};

const LABEL_PATH: &str = "/label";
const CHANNELS_PATH: &str = "/api/channels";
const DATA_PATH: &str = "/api/data";

#[derive(Default)]
struct StoreState {
    records: Vec<Message>,
    loading: bool,
    last_error: Option<String>,
    total_messages: Option<u64>,
    /// Ticket of the latest issued list-replacing request.
    epoch: u64,
}

/// Shared message store. Clone freely; all clones see the same state.
#[derive(Clone)]
pub struct MessageStore {
    client: ApiClient,
    tokens: Arc<dyn TokenStore>,
    state: Arc<Mutex<StoreState>>,
}

impl MessageStore {
    pub fn new(client: ApiClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            tokens,
            state: Arc::new(Mutex::new(StoreState::default())),
        }
    }

    /// Snapshot of the current record list, in backend order.
    pub fn records(&self) -> Vec<Message> {
        self.state().records.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Human-readable message of the last failed operation, if any.
    pub fn error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    /// Total match count reported by the last filter response (the list
    /// itself may be one page of it).
    pub fn total_messages(&self) -> Option<u64> {
        self.state().total_messages
    }

    /// Fetch the full record list for the current session mode.
    ///
    /// Authenticated responses are used as-is; no-auth card items pass
    /// through the normalizer. Non-OK statuses become [`ApiError::Fetch`]
    /// with the status and raw body text; `success: false` becomes
    /// [`ApiError::Shape`].
    pub async fn load(&self) -> Result<(), ApiError> {
        let session = resolve_mode(self.tokens.as_ref());
        let ticket = self.begin_list_request();
        debug!(ticket, authenticated = session.is_authenticated(), "load");

        let outcome = self.fetch_list(&session).await;
        self.commit_list(ticket, outcome)
    }

    /// POST the criteria verbatim to the mode's filter endpoint and replace
    /// the whole record list with the response, preserving its order.
    pub async fn apply_filters(&self, criteria: &FilterCriteria) -> Result<(), ApiError> {
        let session = resolve_mode(self.tokens.as_ref());
        let ticket = self.begin_list_request();
        debug!(
            ticket,
            authenticated = session.is_authenticated(),
            "apply filters"
        );

        let outcome = self.fetch_filtered(&session, criteria).await;
        self.commit_list(ticket, outcome)
    }

    /// Set the relevance label on one record.
    ///
    /// No-auth mode rejects immediately with [`ApiError::AuthRequired`]: no
    /// network call is made and the list is untouched. In authenticated
    /// mode the matching record's label is patched in place on success;
    /// everything else in the list keeps its value and position.
    pub async fn set_label(&self, id: i64, label: Label) -> Result<(), ApiError> {
        let session = resolve_mode(self.tokens.as_ref());
        let Some(token) = session.token else {
            return Err(ApiError::AuthRequired);
        };

        let request = LabelRequest {
            message_id: id,
            label,
        };
        let ack: StatusEnvelope = self
            .client
            .post_json(LABEL_PATH, Some(&token), &request)
            .await?;
        if ack.success == Some(false) {
            return Err(ApiError::Shape(
                ack.error.unwrap_or_else(|| "label rejected".into()),
            ));
        }

        let mut state = self.state();
        for record in state.records.iter_mut().filter(|r| r.id == id) {
            record.label = Some(label);
        }
        Ok(())
    }

    /// Channel names for the filter form, sorted server-side.
    pub async fn list_channels(&self) -> Result<Vec<String>, ApiError> {
        let session = resolve_mode(self.tokens.as_ref());
        self.client
            .get_json(CHANNELS_PATH, session.token.as_deref())
            .await
    }

    /// Create a record and append the server's copy to the list.
    pub async fn create(&self, record: &Message) -> Result<Message, ApiError> {
        let session = resolve_mode(self.tokens.as_ref());
        let created: Message = self
            .client
            .post_json(DATA_PATH, session.token.as_deref(), record)
            .await
            .inspect_err(|e| self.note_failure(e))?;
        self.state().records.push(created.clone());
        Ok(created)
    }

    /// Update a record and replace the matching list entry in place.
    pub async fn update(&self, id: i64, record: &Message) -> Result<Message, ApiError> {
        let session = resolve_mode(self.tokens.as_ref());
        let path = format!("{}/{}", DATA_PATH, id);
        let updated: Message = self
            .client
            .put_json(&path, session.token.as_deref(), record)
            .await
            .inspect_err(|e| self.note_failure(e))?;

        let mut state = self.state();
        for entry in state.records.iter_mut().filter(|r| r.id == id) {
            *entry = updated.clone();
        }
        Ok(updated)
    }

    /// Delete a record and drop it from the list.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let session = resolve_mode(self.tokens.as_ref());
        let path = format!("{}/{}", DATA_PATH, id);
        self.client
            .delete(&path, session.token.as_deref())
            .await
            .inspect_err(|e| self.note_failure(e))?;

        self.state().records.retain(|r| r.id != id);
        Ok(())
    }

    async fn fetch_list(
        &self,
        session: &ResolvedSession,
    ) -> Result<(Vec<Message>, Option<u64>), ApiError> {
        match session.token.as_deref() {
            Some(token) => {
                let envelope: MessagesEnvelope = self
                    .client
                    .get_json(session.endpoints.list, Some(token))
                    .await?;
                unwrap_envelope(envelope)
            }
            None => {
                let cards: CardsEnvelope = self.client.get_json(session.endpoints.list, None).await?;
                let items = cards
                    .items
                    .ok_or_else(|| ApiError::Shape("response missing `items` array".into()))?;
                Ok((items.into_iter().map(card_to_message).collect(), None))
            }
        }
    }

    async fn fetch_filtered(
        &self,
        session: &ResolvedSession,
        criteria: &FilterCriteria,
    ) -> Result<(Vec<Message>, Option<u64>), ApiError> {
        let envelope: MessagesEnvelope = self
            .client
            .post_json(session.endpoints.filter, session.token.as_deref(), criteria)
            .await?;
        unwrap_envelope(envelope)
    }

    /// Issue a new list-replacing request ticket and raise the loading flag.
    fn begin_list_request(&self) -> u64 {
        let mut state = self.state();
        state.epoch += 1;
        state.loading = true;
        state.last_error = None;
        state.epoch
    }

    /// Commit a list outcome if its ticket is still the latest.
    ///
    /// Stale outcomes — success or failure — are dropped whole: they may
    /// not replace records, set the error state, or clear the loading flag
    /// of a request that is still outstanding.
    fn commit_list(
        &self,
        ticket: u64,
        outcome: Result<(Vec<Message>, Option<u64>), ApiError>,
    ) -> Result<(), ApiError> {
        let mut state = self.state();
        if state.epoch != ticket {
            warn!(
                ticket,
                current = state.epoch,
                "dropping stale list response"
            );
            return Ok(());
        }

        state.loading = false;
        match outcome {
            Ok((records, total)) => {
                state.total_messages = total;
                state.records = records;
                Ok(())
            }
            Err(err) => {
                state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn note_failure(&self, err: &ApiError) {
        self.state().last_error = Some(err.to_string());
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn unwrap_envelope(
    envelope: MessagesEnvelope,
) -> Result<(Vec<Message>, Option<u64>), ApiError> {
    if envelope.success == Some(false) {
        return Err(ApiError::Shape(
            envelope
                .error
                .unwrap_or_else(|| "server reported failure".into()),
        ));
    }
    let messages = envelope
        .messages
        .ok_or_else(|| ApiError::Shape("response missing `messages` array".into()))?;
    Ok((messages, envelope.total_messages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_with_success_false_is_a_shape_error() {
        let envelope = MessagesEnvelope {
            success: Some(false),
            messages: None,
            error: Some("No hay datos disponibles".into()),
            total_messages: None,
        };
        let err = unwrap_envelope(envelope).unwrap_err();
        assert!(err.to_string().contains("No hay datos disponibles"));
    }

    #[test]
    fn envelope_without_messages_is_a_shape_error() {
        let envelope = MessagesEnvelope {
            success: Some(true),
            messages: None,
            error: None,
            total_messages: None,
        };
        let err = unwrap_envelope(envelope).unwrap_err();
        assert!(err.to_string().contains("messages"));
    }

    #[test]
    fn envelope_without_success_flag_is_accepted() {
        let envelope = MessagesEnvelope {
            success: None,
            messages: Some(vec![]),
            error: None,
            total_messages: Some(0),
        };
        let (messages, total) = unwrap_envelope(envelope).unwrap();
        assert!(messages.is_empty());
        assert_eq!(total, Some(0));
    }
}
