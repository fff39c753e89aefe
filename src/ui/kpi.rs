use eframe::egui::{self, RichText, Ui};

use personality_dashboard::data::summary::{format_stat, PLACEHOLDER};
use personality_dashboard::state::{AppState, KpiScope};

/// Four metric cards. Undefined statistics show the placeholder.
pub fn kpi_row(ui: &mut Ui, state: &AppState) {
    let summary = state.kpi_summary();
    let scope = match state.kpi_scope {
        KpiScope::Filtered => "filtered rows",
        KpiScope::FullDataset => "all rows",
    };
    ui.label(RichText::new(format!("Key Insights ({scope}, n = {})", summary.row_count)).strong());

    let cards = [
        (
            "Avg Time Alone",
            format_stat(summary.mean_time_alone, 2, "hrs"),
        ),
        (
            "Avg Post Frequency",
            format_stat(summary.mean_post_frequency, 2, ""),
        ),
        (
            "Avg Friends Circle",
            format_stat(summary.mean_friends_circle, 1, ""),
        ),
        (
            "Most Common Personality",
            summary
                .most_common_personality
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        ),
    ];

    ui.columns(cards.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.label(label);
                ui.label(RichText::new(value).size(22.0).strong());
            });
        }
    });

    if summary.is_insufficient() && state.dataset.is_some() {
        ui.label("No data matches the current filters.");
    }
}
