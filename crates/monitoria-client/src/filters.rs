//! Filter criteria coordination.
//!
//! Owns the current criteria object. Every single-field update and every
//! reset produces a fresh snapshot and triggers exactly one re-apply
//! through the store.

use monitoria_types::api::FilterCriteria;

use crate::error::ApiError;
use crate::store::MessageStore;

/// One settable criteria field. Wire names double as the parse format so
/// callers can address fields the way the form does (`dateStart=...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    DateStart,
    DateEnd,
    Channel,
    ScoreMin,
    ScoreMax,
    MediaType,
    SortBy,
}

impl std::str::FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dateStart" => Ok(FilterField::DateStart),
            "dateEnd" => Ok(FilterField::DateEnd),
            "channel" => Ok(FilterField::Channel),
            "scoreMin" => Ok(FilterField::ScoreMin),
            "scoreMax" => Ok(FilterField::ScoreMax),
            "mediaType" => Ok(FilterField::MediaType),
            "sortBy" => Ok(FilterField::SortBy),
            other => Err(format!("unknown filter field: {}", other)),
        }
    }
}

#[derive(Debug, Default)]
pub struct FilterCoordinator {
    criteria: FilterCriteria,
}

impl FilterCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_criteria(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace exactly one field and re-apply through the store.
    ///
    /// An unparseable sort order falls back to the default (`score`), the
    /// same way the form only ever submits known values.
    pub async fn update(
        &mut self,
        store: &MessageStore,
        field: FilterField,
        value: &str,
    ) -> Result<(), ApiError> {
        let mut next = self.criteria.clone();
        match field {
            FilterField::DateStart => next.date_start = value.to_string(),
            FilterField::DateEnd => next.date_end = value.to_string(),
            FilterField::Channel => next.channel = value.to_string(),
            FilterField::ScoreMin => next.score_min = value.to_string(),
            FilterField::ScoreMax => next.score_max = value.to_string(),
            FilterField::MediaType => next.media_type = value.to_string(),
            FilterField::SortBy => next.sort_by = value.parse().unwrap_or_default(),
        }
        self.criteria = next;
        store.apply_filters(&self.criteria).await
    }

    /// Restore the documented defaults and re-apply exactly once.
    pub async fn reset(&mut self, store: &MessageStore) -> Result<(), ApiError> {
        self.criteria = FilterCriteria::default();
        store.apply_filters(&self.criteria).await
    }
}
