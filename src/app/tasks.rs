use std::sync::mpsc::Sender;
use std::thread;

use crate::api::client::ApiClient;
use crate::api::models::ExtractionResult;
use crate::app::events::{RecordsSnapshot, TaskEvent};
use crate::app::workflow::{RequestTicket, SelectedFile};

/// Run the extraction request on a worker thread and report back.
pub fn spawn_extract(
    client: ApiClient,
    file: SelectedFile,
    ticket: RequestTicket,
    events: Sender<TaskEvent>,
) {
    thread::spawn(move || {
        let outcome = client.extract_validate(&file.name, &file.mime, file.bytes);
        if events
            .send(TaskEvent::ExtractFinished(ticket, outcome))
            .is_err()
        {
            tracing::debug!("extraction finished after the UI went away");
        }
    });
}

/// Run the confirmed store request on a worker thread and report back.
pub fn spawn_save(
    client: ApiClient,
    payload: ExtractionResult,
    ticket: RequestTicket,
    events: Sender<TaskEvent>,
) {
    thread::spawn(move || {
        let outcome = client.store_data(&payload);
        if events.send(TaskEvent::SaveFinished(ticket, outcome)).is_err() {
            tracing::debug!("save finished after the UI went away");
        }
    });
}

/// Fetch both record collections and deliver them as one snapshot.
pub fn spawn_fetch_records(client: ApiClient, generation: u64, events: Sender<TaskEvent>) {
    thread::spawn(move || {
        let outcome = client.get_business_cards().and_then(|cards| {
            client
                .get_visitor_logs()
                .map(|logs| RecordsSnapshot { cards, logs })
        });
        if events
            .send(TaskEvent::RecordsFetched(generation, outcome))
            .is_err()
        {
            tracing::debug!("record fetch finished after the UI went away");
        }
    });
}
