use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoints, Points,
};

use personality_dashboard::color::ColorMap;
use personality_dashboard::data::charts::{box_stats, cross_tab, histogram_by_group, CrossTab};
use personality_dashboard::data::model::Record;
use personality_dashboard::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Dashboard charts (central panel)
// ---------------------------------------------------------------------------

/// Render the chart grid for the current filtered view.
pub fn charts(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a dataset to view charts  (File → Open… or CSV URL → Load)");
        });
        return;
    }
    if state.filtered.is_empty() {
        ui.heading("No data matches the current filters.");
        return;
    }

    let records = state.filtered.records();
    let groups = state.personalities();
    let colors = &state.color_map;

    ui.heading("Visual Analysis");
    ui.columns(2, |cols| {
        mean_time_alone_chart(&mut cols[0], state, groups, colors);
        let bins = state.config.charts.histogram_bins;
        friends_histogram(&mut cols[1], records, groups, colors, bins);
    });
    ui.columns(2, |cols| {
        post_frequency_box_plot(&mut cols[0], records, groups, colors);
        grouped_counts(
            &mut cols[1],
            "stage_fear_chart",
            "Stage Fear Count by Personality",
            &cross_tab(records, groups, |r| r.stage_fear.as_str()),
            colors,
        );
    });

    ui.heading("Social Energy Levels");
    grouped_counts(
        ui,
        "drained_chart",
        "Feeling Drained After Socializing",
        &cross_tab(records, groups, |r| r.drained_after_socializing.as_str()),
        colors,
    );
}

/// Bar per personality: mean `Time_spent_Alone`.
fn mean_time_alone_chart(ui: &mut Ui, state: &AppState, groups: &[String], colors: &ColorMap) {
    ui.strong("Average Time Spent Alone by Personality");
    let means = &state.filtered_summary.group_mean_time_alone;

    Plot::new("mean_time_alone_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Hours")
        .x_axis_formatter(category_axis(groups.to_vec()))
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, group) in groups.iter().enumerate() {
                let Some(mean) = means.get(group) else {
                    continue;
                };
                let color = colors.color_for(group);
                let bar = Bar::new(i as f64, *mean).width(0.6).fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(group).color(color));
            }
        });
}

/// Overlaid histograms of `Friends_circle_size`, one series per personality.
fn friends_histogram(
    ui: &mut Ui,
    records: &[Record],
    groups: &[String],
    colors: &ColorMap,
    bins: usize,
) {
    ui.strong("Distribution of Friends Circle Size");
    let Some(hist) = histogram_by_group(records, groups, |r| r.friends_circle_size as f64, bins)
    else {
        return;
    };

    Plot::new("friends_histogram")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Friends_circle_size")
        .y_axis_label("Count")
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (group, counts) in &hist.series {
                let color = colors.color_for(group).gamma_multiply(0.6);
                let bars: Vec<Bar> = counts
                    .iter()
                    .enumerate()
                    .map(|(i, &n)| Bar::new(hist.bin_center(i), n as f64).width(hist.bin_width))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(group).color(color));
            }
        });
}

/// Box per personality for `Post_frequency`, with every observation drawn.
fn post_frequency_box_plot(ui: &mut Ui, records: &[Record], groups: &[String], colors: &ColorMap) {
    ui.strong("Post Frequency by Personality Type");

    Plot::new("post_frequency_box_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Post_frequency")
        .x_axis_formatter(category_axis(groups.to_vec()))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, group) in groups.iter().enumerate() {
                let values: Vec<f64> = records
                    .iter()
                    .filter(|r| r.personality == *group)
                    .map(|r| r.post_frequency)
                    .collect();
                let Some(stats) = box_stats(&values) else {
                    continue;
                };
                let color = colors.color_for(group);
                let x = i as f64;

                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(
                        stats.lower_whisker,
                        stats.q1,
                        stats.median,
                        stats.q3,
                        stats.upper_whisker,
                    ),
                )
                .box_width(0.5)
                .fill(color.gamma_multiply(0.4));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(group).color(color));

                // Deterministic jitter so overlapping points stay visible.
                let points: PlotPoints = values
                    .iter()
                    .enumerate()
                    .map(|(j, &v)| [x + 0.35 + ((j % 9) as f64 - 4.0) * 0.015, v])
                    .collect();
                plot_ui.points(Points::new(points).name(group).color(color).radius(1.5));
            }
        });
}

/// Side-by-side bars of row counts per (category, personality).
fn grouped_counts(ui: &mut Ui, id: &str, title: &str, table: &CrossTab, colors: &ColorMap) {
    ui.strong(title);
    let n_groups = table.series.len().max(1);
    let width = 0.8 / n_groups as f64;

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Count")
        .x_axis_formatter(category_axis(table.categories.clone()))
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (g, (group, counts)) in table.series.iter().enumerate() {
                let offset = (g as f64 - (n_groups as f64 - 1.0) / 2.0) * width;
                let color = colors.color_for(group);
                let bars: Vec<Bar> = counts
                    .iter()
                    .enumerate()
                    .map(|(c, &n)| Bar::new(c as f64 + offset, n as f64).width(width * 0.95))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(group).color(color));
            }
        });
}

/// Label integer x positions with category names.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value;
        if v < -0.5 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}
