use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use personality_dashboard::data::model::{Record, REQUIRED_COLUMNS};
use personality_dashboard::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Raw rows of the loaded dataset (or just the filtered ones).
pub fn dataset_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let records = if state.preview_filtered {
        state.filtered.records()
    } else {
        dataset.records()
    };
    ui.label(format!("{} rows", records.len()));
    if records.is_empty() {
        ui.label("No data matches the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(40.0))
        .columns(Column::auto().at_least(90.0), REQUIRED_COLUMNS.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for name in REQUIRED_COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, records.len(), |mut row| {
                let i = row.index();
                row.col(|ui| {
                    ui.label(i.to_string());
                });
                for cell in cells(&records[i]) {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

/// Cell texts in `REQUIRED_COLUMNS` order.
fn cells(r: &Record) -> [String; 8] {
    [
        r.time_spent_alone.to_string(),
        r.stage_fear.clone(),
        r.social_event_attendance.to_string(),
        r.going_outside.to_string(),
        r.drained_after_socializing.clone(),
        r.friends_circle_size.to_string(),
        r.post_frequency.to_string(),
        r.personality.clone(),
    ]
}
