use std::sync::mpsc::Sender;

use chrono::{Local, NaiveDate};
use eframe::egui;
use egui_extras::{Column, DatePickerButton, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::models::{FieldValue, StoredBusinessCard, StoredVisitorLog};
use crate::app::events::{RecordsSnapshot, TaskEvent};
use crate::app::tasks;
use crate::engine::aggregate::{
    build_chart_series, count_by_day, ChartSeries, CARD_SERIES_NAME, LOG_SERIES_NAME,
};
use crate::engine::filter::{filter_by_date, DateRange};

/// Records view: fetched snapshots, date filters and chart state. Filtering
/// and aggregation are recomputed from the snapshots each frame; snapshots
/// only change when a fetch completes.
pub struct RecordsTab {
    cards: Vec<StoredBusinessCard>,
    logs: Vec<StoredVisitorLog>,
    loading: bool,
    error: Option<String>,
    fetch_generation: u64,
    fetched_once: bool,
    start_enabled: bool,
    start_date: NaiveDate,
    end_enabled: bool,
    end_date: NaiveDate,
}

impl RecordsTab {
    pub fn new() -> Self {
        let today = Local::now().date_naive();
        Self {
            cards: Vec::new(),
            logs: Vec::new(),
            loading: false,
            error: None,
            fetch_generation: 0,
            fetched_once: false,
            start_enabled: false,
            start_date: today,
            end_enabled: false,
            end_date: today,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Apply a completed fetch; snapshots from superseded requests are
    /// dropped so a slow response never overwrites a newer one.
    pub fn handle_fetch(&mut self, generation: u64, outcome: Result<RecordsSnapshot, ApiError>) {
        if generation != self.fetch_generation {
            tracing::debug!("discarding stale records snapshot");
            return;
        }
        self.loading = false;
        match outcome {
            Ok(snapshot) => {
                self.cards = snapshot.cards;
                self.logs = snapshot.logs;
                self.error = None;
            }
            Err(error) => {
                self.error = Some(format!("Failed to fetch data: {error}"));
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, client: &ApiClient, events: &Sender<TaskEvent>) {
        if !self.fetched_once {
            self.fetched_once = true;
            self.request_fetch(client, events);
        }

        ui.heading("Data Visualization & Records");
        self.filter_bar(ui, client, events);

        if self.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading data...");
            });
        }
        if let Some(error) = &self.error {
            ui.colored_label(egui::Color32::RED, error);
        }

        let range = self.selected_range();
        let cards = filter_by_date(&self.cards, &range);
        let logs = filter_by_date(&self.logs, &range);
        let series = build_chart_series(&count_by_day(&cards), &count_by_day(&logs));

        ui.add_space(8.0);
        if series.labels.is_empty() {
            ui.label("No data available for the selected period to display charts.");
        } else {
            chart(ui, &series);
        }

        ui.add_space(12.0);
        card_table(ui, &cards, !range.is_unbounded());
        ui.add_space(12.0);
        log_table(ui, &logs, !range.is_unbounded());
    }

    fn filter_bar(&mut self, ui: &mut egui::Ui, client: &ApiClient, events: &Sender<TaskEvent>) {
        let mut refresh = false;
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.start_enabled, "From");
            ui.add_enabled(
                self.start_enabled,
                DatePickerButton::new(&mut self.start_date).id_salt("start_date"),
            );
            ui.checkbox(&mut self.end_enabled, "To");
            ui.add_enabled(
                self.end_enabled,
                DatePickerButton::new(&mut self.end_date).id_salt("end_date"),
            );
            let label = if self.loading { "Refreshing..." } else { "Refresh Data" };
            if ui
                .add_enabled(!self.loading, egui::Button::new(label))
                .clicked()
            {
                refresh = true;
            }
        });
        if refresh {
            self.request_fetch(client, events);
        }
    }

    fn request_fetch(&mut self, client: &ApiClient, events: &Sender<TaskEvent>) {
        self.fetch_generation += 1;
        self.loading = true;
        self.error = None;
        tasks::spawn_fetch_records(client.clone(), self.fetch_generation, events.clone());
    }

    fn selected_range(&self) -> DateRange {
        DateRange {
            start: self.start_enabled.then_some(self.start_date),
            end: self.end_enabled.then_some(self.end_date),
        }
    }
}

fn chart(ui: &mut egui::Ui, series: &ChartSeries) {
    let labels = series.labels.clone();
    let bars: Vec<Bar> = series.series[0]
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| Bar::new(index as f64, *value as f64).width(0.6))
        .collect();
    let points: PlotPoints = series.series[1]
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| [index as f64, *value as f64])
        .collect();

    ui.strong("Entries Added Over Time");
    Plot::new("entries_per_day")
        .legend(Legend::default())
        .height(280.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let index = mark.value;
            if index < 0.0 || index.fract().abs() > 0.01 {
                return String::new();
            }
            labels.get(index as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(CARD_SERIES_NAME));
            plot_ui.line(Line::new(points).name(LOG_SERIES_NAME));
        });
}

fn card_table(ui: &mut egui::Ui, cards: &[StoredBusinessCard], filtered: bool) {
    ui.strong(format!("Business Card Records ({})", cards.len()));
    if cards.is_empty() {
        ui.label(empty_state("business card records", filtered));
        return;
    }

    TableBuilder::new(ui)
        .id_salt("cards_table")
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(40.0), 8)
        .header(20.0, |mut header| {
            for title in [
                "ID", "Name", "Title", "Phone", "Email", "Website", "Address", "Created At",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, cards.len(), |mut row| {
                let card = &cards[row.index()];
                row.col(|ui| {
                    ui.label(card.id.to_string());
                });
                row.col(|ui| {
                    ui.label(card.name.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    ui.label(card.title.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    ui.label(list_cell(card.phone.as_ref()));
                });
                row.col(|ui| {
                    ui.label(list_cell(card.email.as_ref()));
                });
                row.col(|ui| {
                    ui.label(list_cell(card.website.as_ref()));
                });
                row.col(|ui| {
                    ui.label(card.address.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    ui.label(display_timestamp(card.created_at.as_deref()));
                });
            });
        });
}

fn log_table(ui: &mut egui::Ui, logs: &[StoredVisitorLog], filtered: bool) {
    ui.strong(format!("Visitor Log Entries ({})", logs.len()));
    if logs.is_empty() {
        ui.label(empty_state("visitor log entries", filtered));
        return;
    }

    TableBuilder::new(ui)
        .id_salt("logs_table")
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(40.0), 8)
        .header(20.0, |mut header| {
            for title in [
                "ID",
                "Batch ID",
                "Date",
                "Visitor Name",
                "Address",
                "Time In",
                "Time Out",
                "Created At",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, logs.len(), |mut row| {
                let log = &logs[row.index()];
                row.col(|ui| {
                    ui.label(log.id.to_string());
                });
                row.col(|ui| {
                    ui.label(&log.batch_id);
                });
                row.col(|ui| {
                    ui.label(log.date_str.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    ui.label(log.visitor_name.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    ui.label(log.address.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    ui.label(log.time_in.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    ui.label(log.time_out.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    ui.label(display_timestamp(log.created_at.as_deref()));
                });
            });
        });
}

fn empty_state(what: &str, filtered: bool) -> String {
    if filtered {
        format!("No {what} found matching the selected date range.")
    } else {
        format!("No {what} found.")
    }
}

fn list_cell(value: Option<&FieldValue>) -> String {
    match value {
        Some(field) => {
            let items = field.items();
            if items.is_empty() {
                "empty list".to_string()
            } else {
                items.join(", ")
            }
        }
        None => "—".to_string(),
    }
}

fn display_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "—".to_string();
    };
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(parsed) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}
