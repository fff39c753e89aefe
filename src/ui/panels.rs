use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use personality_dashboard::data::filter::Choice;
use personality_dashboard::data::loader::DataSource;
use personality_dashboard::data::model::NumericRange;
use personality_dashboard::state::{AppState, KpiScope, RangeFilter, View};

// ---------------------------------------------------------------------------
// Left side panel – navigation and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: view selector, then filters on the dashboard view.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Insight Menu");
    ui.separator();

    ui.strong("Select View");
    ui.radio_value(&mut state.view, View::Dashboard, "Dashboard");
    ui.radio_value(&mut state.view, View::DatasetPreview, "Full Dataset Preview");
    ui.separator();

    if state.view != View::Dashboard {
        ui.checkbox(&mut state.preview_filtered, "Only rows matching filters");
    }

    ui.heading("Filter the data");

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Personality multi-select ----
            let personalities = &dataset.personalities;
            let n_selected = state.criteria.personalities.len();
            let header_text = format!("Personality Type  ({n_selected}/{})", personalities.len());

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("personality")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_personalities();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_personalities();
                        }
                    });

                    for p in personalities {
                        let mut checked = state.criteria.personalities.contains(p);
                        let text = RichText::new(p.as_str()).color(state.color_map.color_for(p));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_personality(p);
                        }
                    }
                });
            ui.add_space(6.0);

            // ---- Single-choice categorical filters ----
            ui.strong("Stage Fear");
            if let Some(choice) = choice_combo(
                ui,
                "stage_fear",
                &dataset.stage_fear_values,
                &state.criteria.stage_fear,
            ) {
                state.set_stage_fear(choice);
            }

            ui.strong("Drained After Socializing");
            if let Some(choice) = choice_combo(
                ui,
                "drained",
                &dataset.drained_values,
                &state.criteria.drained,
            ) {
                state.set_drained(choice);
            }
            ui.separator();

            // ---- Numeric ranges ----
            for which in RangeFilter::ALL {
                let Some(bounds) = which.bounds(&dataset) else {
                    continue;
                };
                ui.strong(which.label());
                let current = which.current(&state.criteria);
                if let Some(range) = range_sliders(ui, which, bounds, current) {
                    state.set_range(which, range);
                }
                ui.add_space(4.0);
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

/// Combo box with an "All" entry followed by the observed values.
/// Returns the new choice when the user picked a different one.
fn choice_combo(ui: &mut Ui, id: &str, options: &[String], current: &Choice) -> Option<Choice> {
    let mut selected = current.clone();
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut selected, Choice::All, "All");
            for option in options {
                ui.selectable_value(&mut selected, Choice::Only(option.clone()), option.as_str());
            }
        });
    (selected != *current).then_some(selected)
}

/// Min and max sliders over the observed bounds; keeps `min <= max`.
fn range_sliders(
    ui: &mut Ui,
    which: RangeFilter,
    bounds: NumericRange,
    current: NumericRange,
) -> Option<NumericRange> {
    let mut lo = current.min.clamp(bounds.min, bounds.max);
    let mut hi = current.max.clamp(bounds.min, bounds.max);

    let slider = |ui: &mut Ui, value: &mut f64, label: &str| {
        let mut s = egui::Slider::new(value, bounds.min..=bounds.max).text(label);
        if which.is_integer() {
            s = s.integer();
        }
        ui.add(s).changed()
    };
    let lo_changed = slider(ui, &mut lo, "min");
    let hi_changed = slider(ui, &mut hi, "max");

    if lo_changed && lo > hi {
        hi = lo;
    }
    if hi_changed && hi < lo {
        lo = hi;
    }
    (lo_changed || hi_changed).then_some(NumericRange::new(lo, hi))
}

// ---------------------------------------------------------------------------
// Banner
// ---------------------------------------------------------------------------

/// Optional header image from the configuration.
pub fn banner(ui: &mut Ui, state: &AppState) {
    let Some(path) = &state.config.window.banner_image else {
        return;
    };
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(
            egui::Image::new(format!("file://{}", path.display()))
                .max_width(ui.available_width())
                .max_height(140.0),
        );
    });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("CSV URL:");
        ui.add(egui::TextEdit::singleline(&mut state.url_input).desired_width(320.0));
        if ui.button("Load").clicked() {
            let url = state.url_input.trim().to_string();
            if !url.is_empty() {
                state.load(DataSource::Url(url));
            }
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} match",
                ds.len(),
                state.filtered.len()
            ));
            ui.separator();
            ui.label("KPIs:");
            ui.selectable_value(&mut state.kpi_scope, KpiScope::Filtered, "Filtered");
            ui.selectable_value(&mut state.kpi_scope, KpiScope::FullDataset, "All rows");
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open personality data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(DataSource::File(path));
    }
}
