use std::time::{Duration, Instant};

use crate::api::error::ApiError;
use crate::api::models::{ExtractionResult, StoreResponse};

/// Where a single upload cycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Landing,
    FileSelected,
    Extracting,
    Validating,
    UnknownResult,
    Saving,
}

/// Issued when a request leaves the workflow; a completion is applied only if
/// its ticket still matches the current generation, so responses that arrive
/// after the user moved on are discarded instead of resurrecting old state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SuccessNotice {
    pub message: String,
    pub expires_at: Instant,
}

/// The upload → extract → validate → confirm state machine. Performs no I/O
/// itself; the UI shell issues the requests and feeds completions back in.
///
/// Generic over the preview-resource type `P`: the GUI stores the preview
/// texture handle here so exactly one preview is alive at a time — replaced
/// handles drop (and free) on supersession, cancel and successful save.
pub struct UploadWorkflow<P> {
    stage: Stage,
    file: Option<SelectedFile>,
    preview: Option<P>,
    result: Option<ExtractionResult>,
    error: Option<String>,
    notice: Option<SuccessNotice>,
    generation: u64,
    notice_duration: Duration,
}

impl<P> UploadWorkflow<P> {
    pub fn new(notice_duration: Duration) -> Self {
        Self {
            stage: Stage::Landing,
            file: None,
            preview: None,
            result: None,
            error: None,
            notice: None,
            generation: 0,
            notice_duration,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&P> {
        self.preview.as_ref()
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&SuccessNotice> {
        self.notice.as_ref()
    }

    /// True while a request is in flight; the UI disables the triggering
    /// controls so at most one request is outstanding per workflow.
    pub fn is_busy(&self) -> bool {
        matches!(self.stage, Stage::Extracting | Stage::Saving)
    }

    /// Surface a locally-detected problem (unreadable file, bad extension).
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Replace the selection. Any prior extraction result, messages and
    /// preview resource are discarded; `None` returns to the landing view.
    pub fn select_file(&mut self, selection: Option<(SelectedFile, P)>) {
        self.generation += 1;
        self.result = None;
        self.error = None;
        self.notice = None;
        match selection {
            Some((file, preview)) => {
                self.preview = Some(preview);
                self.file = Some(file);
                self.stage = Stage::FileSelected;
            }
            None => {
                self.preview = None;
                self.file = None;
                self.stage = Stage::Landing;
            }
        }
    }

    /// Start an extraction. Valid only with a selected, not-yet-extracted
    /// file; otherwise surfaces a validation message and changes nothing.
    pub fn begin_extract(&mut self) -> Result<RequestTicket, ApiError> {
        if self.stage != Stage::FileSelected || self.file.is_none() {
            let error = ApiError::Validation("Please select an image file first.".to_string());
            self.error = Some(error.to_string());
            return Err(error);
        }
        self.error = None;
        self.notice = None;
        self.result = None;
        self.generation += 1;
        self.stage = Stage::Extracting;
        Ok(RequestTicket {
            generation: self.generation,
        })
    }

    pub fn extract_finished(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<ExtractionResult, ApiError>,
    ) {
        if ticket.generation != self.generation || self.stage != Stage::Extracting {
            tracing::debug!("discarding stale extraction response");
            return;
        }
        match outcome {
            Ok(result) => {
                self.stage = if result.is_storable() {
                    Stage::Validating
                } else {
                    Stage::UnknownResult
                };
                self.result = Some(result);
            }
            Err(error) => {
                // Selection and preview stay put so the user can retry.
                self.error = Some(format!("Extraction failed: {error}"));
                self.stage = Stage::FileSelected;
            }
        }
    }

    /// Start the confirmed save. Valid only while validating a known result
    /// type; otherwise surfaces a validation message and changes nothing.
    pub fn begin_save(&mut self) -> Result<RequestTicket, ApiError> {
        let storable = self.stage == Stage::Validating
            && self
                .result
                .as_ref()
                .is_some_and(ExtractionResult::is_storable);
        if !storable {
            let error = ApiError::Validation("No valid data available to save.".to_string());
            self.error = Some(error.to_string());
            return Err(error);
        }
        self.error = None;
        self.generation += 1;
        self.stage = Stage::Saving;
        Ok(RequestTicket {
            generation: self.generation,
        })
    }

    pub fn save_finished(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<StoreResponse, ApiError>,
        now: Instant,
    ) {
        if ticket.generation != self.generation || self.stage != Stage::Saving {
            tracing::debug!("discarding stale save response");
            return;
        }
        match outcome {
            Ok(response) => {
                let table = self
                    .result
                    .as_ref()
                    .and_then(ExtractionResult::table_name)
                    .unwrap_or_default();
                let mut message = format!("Data successfully saved to '{table}' table.");
                if !response.message.is_empty() {
                    message = format!("{message} {}", response.message);
                }
                self.file = None;
                self.preview = None;
                self.result = None;
                self.error = None;
                self.notice = Some(SuccessNotice {
                    message,
                    expires_at: now + self.notice_duration,
                });
                self.stage = Stage::Landing;
            }
            Err(error) => {
                // The extraction result is untouched; Confirm can be retried.
                self.error = Some(format!("Save failed: {error}"));
                self.stage = Stage::Validating;
            }
        }
    }

    /// Abandon the reviewed (or unidentified) result and return to landing.
    pub fn cancel(&mut self) {
        if !matches!(self.stage, Stage::Validating | Stage::UnknownResult) {
            return;
        }
        self.generation += 1;
        self.file = None;
        self.preview = None;
        self.result = None;
        self.error = None;
        self.notice = None;
        self.stage = Stage::Landing;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Expire the success notice once its display window has passed.
    pub fn tick(&mut self, now: Instant) {
        if self
            .notice
            .as_ref()
            .is_some_and(|notice| notice.expires_at <= now)
        {
            self.notice = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{BusinessCard, FieldValue};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Preview stand-in that counts how many handles are alive.
    struct PreviewStub {
        alive: Rc<Cell<usize>>,
    }

    impl PreviewStub {
        fn new(counter: &Rc<Cell<usize>>) -> Self {
            counter.set(counter.get() + 1);
            Self {
                alive: Rc::clone(counter),
            }
        }
    }

    impl Drop for PreviewStub {
        fn drop(&mut self) {
            self.alive.set(self.alive.get() - 1);
        }
    }

    fn workflow() -> UploadWorkflow<PreviewStub> {
        UploadWorkflow::new(Duration::from_secs(3))
    }

    fn sample_file(name: &str) -> SelectedFile {
        SelectedFile {
            name: name.to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8],
        }
    }

    fn jane_doe() -> ExtractionResult {
        ExtractionResult::BusinessCard(BusinessCard {
            name: Some("Jane Doe".to_string()),
            phone: Some(FieldValue::Many(vec!["555-1111".to_string()])),
            ..BusinessCard::default()
        })
    }

    #[test]
    fn exactly_one_preview_resource_is_alive_at_a_time() {
        let alive = Rc::new(Cell::new(0));
        let mut workflow = workflow();

        workflow.select_file(Some((sample_file("a.jpg"), PreviewStub::new(&alive))));
        assert_eq!(alive.get(), 1);

        workflow.select_file(Some((sample_file("b.jpg"), PreviewStub::new(&alive))));
        assert_eq!(alive.get(), 1);

        workflow.select_file(None);
        assert_eq!(alive.get(), 0);
        assert_eq!(workflow.stage(), Stage::Landing);
    }

    #[test]
    fn extract_without_a_file_is_a_local_validation_failure() {
        let mut workflow = workflow();

        let error = workflow
            .begin_extract()
            .expect_err("extract must require a selected file");
        assert_eq!(
            error,
            ApiError::Validation("Please select an image file first.".to_string())
        );
        assert_eq!(workflow.stage(), Stage::Landing);
        assert_eq!(workflow.error(), Some("Please select an image file first."));
    }

    #[test]
    fn business_card_flow_validates_saves_and_returns_to_landing() {
        let alive = Rc::new(Cell::new(0));
        let mut workflow = workflow();
        let start = Instant::now();

        workflow.select_file(Some((sample_file("card.jpg"), PreviewStub::new(&alive))));
        let ticket = workflow.begin_extract().expect("extract should start");
        assert!(workflow.is_busy());

        workflow.extract_finished(ticket, Ok(jane_doe()));
        assert_eq!(workflow.stage(), Stage::Validating);
        assert!(!workflow.is_busy());

        let ticket = workflow.begin_save().expect("save should start");
        assert_eq!(workflow.stage(), Stage::Saving);
        workflow.save_finished(
            ticket,
            Ok(StoreResponse {
                message: "ok".to_string(),
            }),
            start,
        );

        assert_eq!(workflow.stage(), Stage::Landing);
        assert!(workflow.file().is_none());
        assert!(workflow.result().is_none());
        assert_eq!(alive.get(), 0);

        let notice = workflow.notice().expect("success notice should be shown");
        assert!(notice.message.contains("business_visting_cards"));
        assert!(notice.message.contains("ok"));

        workflow.tick(start + Duration::from_secs(2));
        assert!(workflow.notice().is_some());
        workflow.tick(start + Duration::from_secs(4));
        assert!(workflow.notice().is_none());
    }

    #[test]
    fn unknown_results_cannot_be_saved_and_cancel_clears_them() {
        let alive = Rc::new(Cell::new(0));
        let mut workflow = workflow();

        workflow.select_file(Some((sample_file("page.png"), PreviewStub::new(&alive))));
        let ticket = workflow.begin_extract().expect("extract should start");
        workflow.extract_finished(ticket, Ok(ExtractionResult::Unknown));
        assert_eq!(workflow.stage(), Stage::UnknownResult);

        let error = workflow
            .begin_save()
            .expect_err("unknown result must not be storable");
        assert_eq!(
            error,
            ApiError::Validation("No valid data available to save.".to_string())
        );
        assert_eq!(workflow.stage(), Stage::UnknownResult);

        workflow.cancel();
        assert_eq!(workflow.stage(), Stage::Landing);
        assert!(workflow.result().is_none());
        assert_eq!(alive.get(), 0);
    }

    #[test]
    fn extraction_failure_keeps_the_selection_for_retry() {
        let alive = Rc::new(Cell::new(0));
        let mut workflow = workflow();

        workflow.select_file(Some((sample_file("card.jpg"), PreviewStub::new(&alive))));
        let ticket = workflow.begin_extract().expect("extract should start");
        workflow.extract_finished(
            ticket,
            Err(ApiError::Server {
                status: 500,
                message: "model unavailable".to_string(),
            }),
        );

        assert_eq!(workflow.stage(), Stage::FileSelected);
        assert_eq!(
            workflow.error(),
            Some("Extraction failed: model unavailable")
        );
        assert!(workflow.file().is_some());
        assert_eq!(alive.get(), 1);
    }

    #[test]
    fn stale_extraction_responses_are_discarded() {
        let alive = Rc::new(Cell::new(0));
        let mut workflow = workflow();

        workflow.select_file(Some((sample_file("a.jpg"), PreviewStub::new(&alive))));
        let stale = workflow.begin_extract().expect("extract should start");

        // The user picks another file while the request is in flight.
        workflow.select_file(Some((sample_file("b.jpg"), PreviewStub::new(&alive))));
        assert_eq!(workflow.stage(), Stage::FileSelected);

        workflow.extract_finished(stale, Ok(jane_doe()));
        assert_eq!(workflow.stage(), Stage::FileSelected);
        assert!(workflow.result().is_none());
    }

    #[test]
    fn save_failure_stays_in_validation_with_the_result_intact() {
        let alive = Rc::new(Cell::new(0));
        let mut workflow = workflow();
        let start = Instant::now();

        workflow.select_file(Some((sample_file("card.jpg"), PreviewStub::new(&alive))));
        let ticket = workflow.begin_extract().expect("extract should start");
        workflow.extract_finished(ticket, Ok(jane_doe()));

        let ticket = workflow.begin_save().expect("save should start");
        workflow.save_finished(
            ticket,
            Err(ApiError::Network("http://127.0.0.1:8000".to_string())),
            start,
        );

        assert_eq!(workflow.stage(), Stage::Validating);
        assert_eq!(workflow.result(), Some(&jane_doe()));
        let error = workflow.error().expect("failure should be surfaced");
        assert!(error.starts_with("Save failed: No response from server."));
        assert_eq!(alive.get(), 1);
    }
}
