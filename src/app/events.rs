use crate::api::error::ApiError;
use crate::api::models::{
    ExtractionResult, StoreResponse, StoredBusinessCard, StoredVisitorLog,
};
use crate::app::workflow::RequestTicket;

/// Both record collections fetched together, applied as one snapshot.
#[derive(Debug, Clone)]
pub struct RecordsSnapshot {
    pub cards: Vec<StoredBusinessCard>,
    pub logs: Vec<StoredVisitorLog>,
}

/// Completions delivered from worker threads to the UI event pump.
#[derive(Debug)]
pub enum TaskEvent {
    ExtractFinished(RequestTicket, Result<ExtractionResult, ApiError>),
    SaveFinished(RequestTicket, Result<StoreResponse, ApiError>),
    RecordsFetched(u64, Result<RecordsSnapshot, ApiError>),
}
