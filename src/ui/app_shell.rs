use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use eframe::egui;

use crate::api::client::ApiClient;
use crate::app::events::TaskEvent;
use crate::app::workflow::UploadWorkflow;
use crate::infra::config::AppConfig;
use crate::ui::records_tab::RecordsTab;
use crate::ui::upload_tab::{self, GuiWorkflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Upload,
    Records,
}

pub struct VisitdeskApp {
    client: ApiClient,
    tab: Tab,
    workflow: GuiWorkflow,
    records: RecordsTab,
    events_tx: Sender<TaskEvent>,
    events_rx: Receiver<TaskEvent>,
}

impl VisitdeskApp {
    fn new(config: &AppConfig, client: ApiClient) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            client,
            tab: Tab::Upload,
            workflow: UploadWorkflow::new(Duration::from_secs(config.success_notice_secs)),
            records: RecordsTab::new(),
            events_tx,
            events_rx,
        }
    }

    /// Route completed background work into the owning view, then let the
    /// workflow expire its notice.
    fn pump_events(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                TaskEvent::ExtractFinished(ticket, outcome) => {
                    self.workflow.extract_finished(ticket, outcome);
                }
                TaskEvent::SaveFinished(ticket, outcome) => {
                    self.workflow.save_finished(ticket, outcome, now);
                }
                TaskEvent::RecordsFetched(generation, outcome) => {
                    self.records.handle_fetch(generation, outcome);
                }
            }
        }
        self.workflow.tick(now);
    }
}

impl eframe::App for VisitdeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_events();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.heading("Visitor Data Management");
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Upload, "Upload & Validate");
                ui.selectable_value(&mut self.tab, Tab::Records, "Visualize Records");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.tab {
                Tab::Upload => {
                    upload_tab::show(ui, &mut self.workflow, &self.client, &self.events_tx);
                }
                Tab::Records => {
                    self.records.show(ui, &self.client, &self.events_tx);
                }
            });
        });

        // Keep repainting while background work or a timed notice is pending.
        if self.workflow.is_busy() || self.records.is_loading() || self.workflow.notice().is_some()
        {
            ctx.request_repaint_after(Duration::from_millis(150));
        }
    }
}

pub fn launch(config: AppConfig) -> Result<(), String> {
    let client = ApiClient::from_config(&config)
        .map_err(|error| format!("failed to build API client: {error}"))?;
    tracing::info!(backend_url = client.base_url(), "starting visitdesk UI");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1024.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "visitdesk",
        options,
        Box::new(move |_cc| Ok(Box::new(VisitdeskApp::new(&config, client)))),
    )
    .map_err(|error| format!("failed to start UI: {error}"))
}
