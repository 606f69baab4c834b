use std::path::Path;
use std::sync::mpsc::Sender;

use eframe::egui;

use crate::api::client::ApiClient;
use crate::api::models::{BusinessCard, ExtractionResult, FieldValue, VisitorEntry};
use crate::app::events::TaskEvent;
use crate::app::tasks;
use crate::app::workflow::{SelectedFile, Stage, UploadWorkflow};
use crate::ui::preview;

pub type GuiWorkflow = UploadWorkflow<egui::TextureHandle>;

pub fn show(
    ui: &mut egui::Ui,
    workflow: &mut GuiWorkflow,
    client: &ApiClient,
    events: &Sender<TaskEvent>,
) {
    success_popup(ui.ctx(), workflow);

    if let Some(error) = workflow.error() {
        let error = error.to_string();
        ui.colored_label(egui::Color32::RED, error);
        ui.add_space(4.0);
    }

    match workflow.stage() {
        Stage::Landing => landing_section(ui, workflow),
        Stage::FileSelected => file_selected_section(ui, workflow, client, events),
        Stage::Extracting => in_flight_section(ui, workflow, "Processing... Please wait."),
        Stage::Validating | Stage::Saving => validation_section(ui, workflow, client, events),
        Stage::UnknownResult => unknown_section(ui, workflow),
    }
}

fn landing_section(ui: &mut egui::Ui, workflow: &mut GuiWorkflow) {
    ui.heading("Welcome!");
    ui.label(
        "Streamline your visitor and contact management. Upload an image of a \
         visitor register or a business card, let the backend extract the data, \
         review it next to the image, and store it with one click.",
    );
    ui.add_space(8.0);

    ui.horizontal_wrapped(|ui| {
        feature_blurb(ui, "AI Extraction", "The backend pulls the fields out of the image.");
        feature_blurb(ui, "User Validation", "Review extracted data side by side with the image.");
        feature_blurb(ui, "Database Storage", "Confirmed records land in the structured database.");
    });
    ui.add_space(12.0);

    pick_file_button(ui, workflow, true, "Get Started: Upload an Image");
}

fn feature_blurb(ui: &mut egui::Ui, title: &str, text: &str) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.strong(title);
            ui.label(text);
        });
    });
}

fn file_selected_section(
    ui: &mut egui::Ui,
    workflow: &mut GuiWorkflow,
    client: &ApiClient,
    events: &Sender<TaskEvent>,
) {
    ui.label("Selected image:");
    if let (Some(file), Some(texture)) = (workflow.file(), workflow.preview()) {
        ui.label(&file.name);
        ui.add(egui::Image::new(texture).max_height(220.0));
    }
    ui.add_space(8.0);

    let enabled = !workflow.is_busy();
    pick_file_button(ui, workflow, enabled, "Choose a different image");

    if ui
        .add_enabled(enabled, egui::Button::new("Extract Data from Image"))
        .clicked()
    {
        if let Ok(ticket) = workflow.begin_extract() {
            if let Some(file) = workflow.file().cloned() {
                tasks::spawn_extract(client.clone(), file, ticket, events.clone());
            }
        }
    }
}

fn in_flight_section(ui: &mut egui::Ui, workflow: &GuiWorkflow, message: &str) {
    if let Some(texture) = workflow.preview() {
        ui.add(egui::Image::new(texture).max_height(220.0));
    }
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(message);
    });
}

fn validation_section(
    ui: &mut egui::Ui,
    workflow: &mut GuiWorkflow,
    client: &ApiClient,
    events: &Sender<TaskEvent>,
) {
    ui.heading("Validation Step");
    ui.label("Review the extracted data and image. Confirm to save or cancel.");
    ui.add_space(8.0);

    ui.columns(2, |columns| {
        if let Some(texture) = workflow.preview() {
            columns[0].add(egui::Image::new(texture).shrink_to_fit());
        }
        match workflow.result() {
            Some(ExtractionResult::BusinessCard(card)) => {
                business_card_grid(&mut columns[1], card);
            }
            Some(ExtractionResult::VisitorRegister(entries)) => {
                visitor_entries_table(&mut columns[1], entries);
            }
            _ => {}
        }
    });
    ui.add_space(8.0);

    let busy = workflow.is_busy();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!busy, egui::Button::new("Confirm & Save"))
            .clicked()
        {
            if let Ok(ticket) = workflow.begin_save() {
                if let Some(payload) = workflow.result().cloned() {
                    tasks::spawn_save(client.clone(), payload, ticket, events.clone());
                }
            }
        }
        if ui.add_enabled(!busy, egui::Button::new("Cancel")).clicked() {
            workflow.cancel();
        }
        if busy {
            ui.spinner();
            ui.label("Saving...");
        }
    });
}

fn unknown_section(ui: &mut egui::Ui, workflow: &mut GuiWorkflow) {
    ui.heading("Extraction Result");
    ui.label(
        "The image could not be identified as a business card or a visitor \
         register, so there is nothing to store.",
    );
    if let Some(texture) = workflow.preview() {
        ui.add(egui::Image::new(texture).max_height(220.0));
    }
    if ui.button("Clear").clicked() {
        workflow.cancel();
    }
}

fn business_card_grid(ui: &mut egui::Ui, card: &BusinessCard) {
    egui::Grid::new("card_fields")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            text_row(ui, "Name", card.name.as_deref());
            text_row(ui, "Title", card.title.as_deref());
            list_row(ui, "Phone", card.phone.as_ref());
            list_row(ui, "Email", card.email.as_ref());
            list_row(ui, "Website", card.website.as_ref());
            text_row(ui, "Address", card.address.as_deref());
        });
}

fn visitor_entries_table(ui: &mut egui::Ui, entries: &[VisitorEntry]) {
    ui.strong(format!("Entries found: {}", entries.len()));
    egui::Grid::new("visitor_entries")
        .num_columns(5)
        .striped(true)
        .show(ui, |ui| {
            for header in ["Date", "Visitor Name", "Address", "Time In", "Time Out"] {
                ui.strong(header);
            }
            ui.end_row();
            for entry in entries {
                ui.label(entry.date.as_deref().unwrap_or("—"));
                ui.label(entry.visitor_name.as_deref().unwrap_or("—"));
                ui.label(entry.address.as_deref().unwrap_or("—"));
                ui.label(entry.time_in.as_deref().unwrap_or("—"));
                ui.label(entry.time_out.as_deref().unwrap_or("—"));
                ui.end_row();
            }
        });
}

fn text_row(ui: &mut egui::Ui, label: &str, value: Option<&str>) {
    ui.strong(label);
    ui.label(value.unwrap_or("—"));
    ui.end_row();
}

fn list_row(ui: &mut egui::Ui, label: &str, value: Option<&FieldValue>) {
    ui.strong(label);
    match value {
        Some(field) => ui.label(field.items().join(", ")),
        None => ui.label("—"),
    };
    ui.end_row();
}

fn success_popup(ctx: &egui::Context, workflow: &mut GuiWorkflow) {
    let message = match workflow.notice() {
        Some(notice) => notice.message.clone(),
        None => return,
    };

    let mut close = false;
    egui::Window::new("Success!")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            if ui.button("Close").clicked() {
                close = true;
            }
        });
    if close {
        workflow.dismiss_notice();
    }
}

fn pick_file_button(ui: &mut egui::Ui, workflow: &mut GuiWorkflow, enabled: bool, label: &str) {
    if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "webp"])
            .pick_file();
        if let Some(path) = picked {
            match load_selected_file(ui.ctx(), &path) {
                Ok((file, texture)) => workflow.select_file(Some((file, texture))),
                Err(message) => workflow.set_error(message),
            }
        }
    }
}

fn load_selected_file(
    ctx: &egui::Context,
    path: &Path,
) -> Result<(SelectedFile, egui::TextureHandle), String> {
    let mime = mime_for_path(path).ok_or_else(|| {
        format!(
            "Unsupported file type: {}. Use PNG, JPEG or WEBP.",
            path.display()
        )
    })?;
    let bytes = std::fs::read(path)
        .map_err(|error| format!("Failed to read {}: {error}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    let texture = preview::load_preview_texture(ctx, &name, &bytes)?;

    Ok((
        SelectedFile {
            name,
            mime: mime.to_string(),
            bytes,
        },
        texture,
    ))
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
