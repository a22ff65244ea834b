//! Records browser: bulk list plus point search by transaction hash.
//!
//! The two sub-flows have independent loading flags. A search never clears
//! or filters the table; its hit lands in a separate slot. Viewing a table
//! row fills that slot straight from the [`RecordCache`].

use super::{RecordCache, Transition};
use crate::api::{ApiError, StegoGateway};
use crate::record::SteganographyRecord;

pub const SEARCH_INPUT_REQUIRED: &str = "Please enter a transaction hash";
pub const SEARCH_NOT_FOUND: &str = "No record found for this transaction hash";
pub const SEARCH_FAILED: &str = "Failed to search record";
pub const LOAD_FAILED: &str = "Failed to load records";

/// Message for a loaded but empty list. Not an error.
pub const EMPTY_RECORDS: &str = "No records found. Start by hiding some text in images!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkLoad {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
}

#[derive(Debug, Clone)]
pub enum RecordsAction {
    /// Fetch the full list (on start and on refresh).
    Load,
    Loaded(Result<Vec<SteganographyRecord>, ApiError>),
    SetSearchInput(String),
    Search,
    SearchResolved(Result<SteganographyRecord, ApiError>),
    /// Show an already loaded record, by transaction hash.
    View(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordsEffect {
    FetchAll,
    FetchByTransactionHash(String),
}

impl RecordsEffect {
    pub async fn perform(self, gateway: &dyn StegoGateway) -> RecordsAction {
        match self {
            RecordsEffect::FetchAll => RecordsAction::Loaded(gateway.get_all_records().await),
            RecordsEffect::FetchByTransactionHash(hash) => RecordsAction::SearchResolved(
                gateway.get_record_by_transaction_hash(&hash).await,
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordsBrowser {
    records: Vec<SteganographyRecord>,
    bulk: BulkLoad,
    search_input: String,
    search: SearchStatus,
    search_result: Option<SteganographyRecord>,
    error: Option<String>,
    cache: RecordCache,
}

impl RecordsBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table rows in backend order.
    pub fn records(&self) -> &[SteganographyRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.bulk == BulkLoad::Loading
    }

    pub fn is_searching(&self) -> bool {
        self.search == SearchStatus::Searching
    }

    /// True when a load finished with no rows; rendered as an empty state.
    pub fn is_empty(&self) -> bool {
        self.bulk == BulkLoad::Loaded && self.records.is_empty()
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn search_result(&self) -> Option<&SteganographyRecord> {
        self.search_result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    pub fn reduce(self, action: RecordsAction) -> Transition<Self, RecordsEffect> {
        match action {
            RecordsAction::Load if self.is_loading() => Transition::to(self),
            RecordsAction::Load => Transition::with_effect(
                Self {
                    bulk: BulkLoad::Loading,
                    error: None,
                    ..self
                },
                RecordsEffect::FetchAll,
            ),
            RecordsAction::Loaded(Ok(records)) => {
                let mut cache = self.cache;
                cache.extend(records.iter().cloned());
                Transition::to(Self {
                    records,
                    bulk: BulkLoad::Loaded,
                    cache,
                    ..self
                })
            }
            RecordsAction::Loaded(Err(err)) => Transition::to(Self {
                bulk: BulkLoad::Loaded,
                error: Some(err.user_message(LOAD_FAILED)),
                ..self
            }),
            RecordsAction::SetSearchInput(search_input) => Transition::to(Self {
                search_input,
                ..self
            }),
            RecordsAction::Search => self.search(),
            RecordsAction::SearchResolved(Ok(record)) => {
                let mut cache = self.cache;
                cache.insert(record.clone());
                Transition::to(Self {
                    search: SearchStatus::Idle,
                    search_result: Some(record),
                    cache,
                    ..self
                })
            }
            RecordsAction::SearchResolved(Err(err)) => {
                let message = match err {
                    ApiError::NotFound(_) => SEARCH_NOT_FOUND,
                    _ => SEARCH_FAILED,
                };
                Transition::to(Self {
                    search: SearchStatus::Idle,
                    search_result: None,
                    error: Some(message.to_string()),
                    ..self
                })
            }
            RecordsAction::View(transaction_hash) => self.view(transaction_hash),
        }
    }

    fn search(self) -> Transition<Self, RecordsEffect> {
        if self.is_searching() {
            return Transition::to(self);
        }
        let hash = self.search_input.trim().to_string();
        if hash.is_empty() {
            return Transition::to(Self {
                error: Some(SEARCH_INPUT_REQUIRED.to_string()),
                ..self
            });
        }
        Transition::with_effect(
            Self {
                search: SearchStatus::Searching,
                error: None,
                ..self
            },
            RecordsEffect::FetchByTransactionHash(hash),
        )
    }

    fn view(self, transaction_hash: String) -> Transition<Self, RecordsEffect> {
        match self.cache.get(&transaction_hash).cloned() {
            Some(record) => Transition::to(Self {
                search_input: transaction_hash,
                search_result: Some(record),
                ..self
            }),
            None => {
                tracing::debug!(%transaction_hash, "view requested for a record not in cache");
                Transition::to(self)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordStatus;

    fn record(id: &str, tx: &str) -> SteganographyRecord {
        SteganographyRecord {
            id: id.into(),
            file_name: format!("stego_{id}.png"),
            original_file_name: format!("{id}.png"),
            text_hash: "2cf24d".into(),
            transaction_hash: tx.into(),
            blockchain_address: "0x1111".into(),
            status: RecordStatus::Completed,
            created_at: "2024-03-01T10:15:30".into(),
        }
    }

    fn loaded(records: Vec<SteganographyRecord>) -> RecordsBrowser {
        let t = RecordsBrowser::new().reduce(RecordsAction::Load);
        assert_eq!(t.effect, Some(RecordsEffect::FetchAll));
        assert!(t.state.is_loading());
        t.state.reduce(RecordsAction::Loaded(Ok(records))).state
    }

    #[test]
    fn test_bulk_load_populates_table_and_cache() {
        let browser = loaded(vec![record("1", "0xa"), record("2", "0xb")]);
        assert_eq!(browser.records().len(), 2);
        assert!(browser.cache().contains("0xb"));
        assert!(!browser.is_loading());
    }

    #[test]
    fn test_empty_list_is_not_an_error() {
        let browser = loaded(vec![]);
        assert!(browser.is_empty());
        assert!(browser.error().is_none());
    }

    #[test]
    fn test_load_failure_uses_backend_message() {
        let t = RecordsBrowser::new().reduce(RecordsAction::Load).state.reduce(
            RecordsAction::Loaded(Err(ApiError::Backend {
                status: Some(500),
                message: "Failed to fetch records".into(),
                verified: None,
            })),
        );
        assert_eq!(t.state.error(), Some("Failed to fetch records"));
        assert!(!t.state.is_empty());
    }

    #[test]
    fn test_view_promotes_row_without_request() {
        let rows = vec![record("1", "0xa"), record("2", "0xb")];
        let browser = loaded(rows.clone());
        let t = browser.reduce(RecordsAction::View("0xb".into()));
        assert!(t.effect.is_none());
        assert_eq!(t.state.search_result(), Some(&rows[1]));
        assert_eq!(t.state.search_input(), "0xb");
        assert_eq!(t.state.records(), rows.as_slice());
    }

    #[test]
    fn test_view_unknown_hash_changes_nothing() {
        let browser = loaded(vec![record("1", "0xa")]);
        let t = browser.clone().reduce(RecordsAction::View("0xzz".into()));
        assert!(t.effect.is_none());
        assert_eq!(t.state, browser);
    }

    #[test]
    fn test_blank_search_issues_no_request() {
        let t = loaded(vec![])
            .reduce(RecordsAction::SetSearchInput("   ".into()))
            .state
            .reduce(RecordsAction::Search);
        assert!(t.effect.is_none());
        assert_eq!(t.state.error(), Some(SEARCH_INPUT_REQUIRED));
    }

    #[test]
    fn test_search_keeps_table_and_fills_slot() {
        let rows = vec![record("1", "0xa")];
        let t = loaded(rows.clone())
            .reduce(RecordsAction::SetSearchInput(" 0xc ".into()))
            .state
            .reduce(RecordsAction::Search);
        assert_eq!(
            t.effect,
            Some(RecordsEffect::FetchByTransactionHash("0xc".into()))
        );
        assert!(t.state.is_searching());
        assert!(!t.state.is_loading());

        let found = record("3", "0xc");
        let done = t
            .state
            .reduce(RecordsAction::SearchResolved(Ok(found.clone())))
            .state;
        assert_eq!(done.search_result(), Some(&found));
        assert_eq!(done.records(), rows.as_slice());
        assert!(done.cache().contains("0xc"));
    }

    #[test]
    fn test_search_miss_and_transport_failure_messages() {
        let searching = loaded(vec![])
            .reduce(RecordsAction::SetSearchInput("0xc".into()))
            .state
            .reduce(RecordsAction::Search)
            .state;

        let miss = searching
            .clone()
            .reduce(RecordsAction::SearchResolved(Err(ApiError::NotFound(
                "Record not found for transaction hash".into(),
            ))))
            .state;
        assert_eq!(miss.error(), Some(SEARCH_NOT_FOUND));
        assert!(miss.search_result().is_none());

        let down = searching
            .reduce(RecordsAction::SearchResolved(Err(ApiError::Transport(
                "refused".into(),
            ))))
            .state;
        assert_eq!(down.error(), Some(SEARCH_FAILED));
    }

    #[test]
    fn test_search_backend_failure_is_not_a_miss() {
        let t = loaded(vec![])
            .reduce(RecordsAction::SetSearchInput("0xc".into()))
            .state
            .reduce(RecordsAction::Search)
            .state
            .reduce(RecordsAction::SearchResolved(Err(ApiError::Backend {
                status: Some(500),
                message: "Failed to fetch record".into(),
                verified: None,
            })));
        assert_eq!(t.state.error(), Some(SEARCH_FAILED));
        assert!(t.state.search_result().is_none());
        assert!(!t.state.is_searching());
    }

    #[test]
    fn test_search_and_load_are_independent() {
        let searching = loaded(vec![record("1", "0xa")])
            .reduce(RecordsAction::SetSearchInput("0xa".into()))
            .state
            .reduce(RecordsAction::Search)
            .state;
        let t = searching.reduce(RecordsAction::Load);
        assert_eq!(t.effect, Some(RecordsEffect::FetchAll));
        assert!(t.state.is_loading());
        assert!(t.state.is_searching());
    }

    #[test]
    fn test_refresh_while_loading_is_ignored() {
        let loading = RecordsBrowser::new().reduce(RecordsAction::Load).state;
        assert!(loading.reduce(RecordsAction::Load).effect.is_none());
    }
}
