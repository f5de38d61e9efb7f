use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::plot::{self, Axes};
use super::preview;
use super::widgets;
use crate::data::pipeline::{
    CUSTOMER_AGE, DashboardFrame, INCOME, PRODUCT_COLUMNS, PURCHASE_CHANNELS, RECENCY,
    SpendingPanel, YEARS_SINCE_ENROLLMENT,
};
use crate::state::AppState;

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

        if let Some(name) = state.source.as_deref().and_then(|p| p.file_name()) {
            ui.label(RichText::new(name.to_string_lossy()).strong());
        }

        if let Some(frame) = &state.frame {
            let s = frame.sizes;
            ui.label(format!(
                "{} customers · education {} · age {} · income {} · segment {} · enrollment {}",
                s.total, s.education, s.age, s.income, s.segment, s.enrollment
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Dashboard body
// ---------------------------------------------------------------------------

/// Render every section top to bottom. Returns `true` when any input
/// changed, meaning the pipeline must run again.
pub fn dashboard(ui: &mut Ui, state: &mut AppState, frame: &DashboardFrame) -> bool {
    let mut changed = false;
    let height = state.config.plot_height;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("Superstore Marketing Campaign Analysis").size(26.0));
            ui.label("Explore customer data and campaign performance");
            if let Some(msg) = &state.status_message {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            ui.add_space(8.0);

            changed |= demographics(ui, state, frame, height);
            ui.separator();
            changed |= spending(ui, state, frame, height);
            ui.separator();
            changed |= segmentation(ui, state, frame, height);
            ui.separator();
            changed |= responses(ui, state, frame, height);
            ui.separator();

            if let Some(table) = &state.table {
                egui::CollapsingHeader::new("Dataset preview")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        preview::data_preview(
                            ui,
                            table,
                            &frame.education_rows,
                            state.config.preview_rows,
                        );
                    });
            }
        });

    changed
}

fn demographics(ui: &mut Ui, state: &mut AppState, frame: &DashboardFrame, height: f32) -> bool {
    let mut changed = false;
    let AppState {
        selections,
        education_colors,
        marital_colors,
        ..
    } = state;

    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        ui.heading("Customer Demographics");
        changed |= widgets::category_multiselect(
            ui,
            "Select Education Levels (optional)",
            &frame.education_options,
            &mut selections.education,
            education_colors,
        );
        ui.strong("Education Distribution");
        plot::category_bar_chart(
            ui,
            "education_chart",
            Axes {
                x: "Education Level",
                y: "Number of Customers",
            },
            &frame.education_counts,
            education_colors,
            height,
        );

        let ui = &mut cols[1];
        ui.heading("Marital Status Distribution");
        plot::category_bar_chart(
            ui,
            "marital_chart",
            Axes {
                x: "Marital_Status",
                y: "count",
            },
            &frame.marital_counts,
            marital_colors,
            height,
        );
        changed |= widgets::range_control(
            ui,
            "Select age range",
            CUSTOMER_AGE,
            frame.age,
            &mut selections.age,
        );
    });

    changed
}

fn spending(ui: &mut Ui, state: &mut AppState, frame: &DashboardFrame, height: f32) -> bool {
    let mut changed = false;
    let selections = &mut state.selections;

    ui.heading("Spending Patterns");
    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        ui.strong("Average Spending per Product Category");
        changed |= widgets::select_box(ui, "Select Product", &PRODUCT_COLUMNS, &mut selections.product);
        match &frame.spending {
            SpendingPanel::Bars(bars) => {
                let x_label = format!("Product Category({})", selections.product);
                plot::value_bar_chart(
                    ui,
                    "spending_chart",
                    Axes {
                        x: &x_label,
                        y: "Average Spending",
                    },
                    bars,
                    height,
                );
            }
            SpendingPanel::MissingColumn(col) => {
                ui.label(
                    RichText::new(format!(
                        "The '{col}' column is not present in the filtered data. \
                         Average spending cannot be calculated."
                    ))
                    .color(Color32::YELLOW),
                );
            }
        }

        let ui = &mut cols[1];
        ui.strong("Explore overall purchase behavior across channels");
        changed |= widgets::ordered_multiselect(
            ui,
            "Select Purchase Channels to Plot",
            &PURCHASE_CHANNELS,
            &mut selections.channels,
        );
        plot::category_line_chart(
            ui,
            "purchase_chart",
            Axes {
                x: "Channel",
                y: "Average Number of Purchases",
            },
            "Average Purchases",
            &frame.purchase_means,
            height,
        );
    });

    changed
}

fn segmentation(ui: &mut Ui, state: &mut AppState, frame: &DashboardFrame, height: f32) -> bool {
    let mut changed = false;
    let selections = &mut state.selections;

    ui.heading("Customer Segmentation");
    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        changed |= widgets::range_control(
            ui,
            "Select income range",
            INCOME,
            frame.income,
            &mut selections.income,
        );
        ui.add_space(8.0);
        changed |= widgets::range_control(
            ui,
            "Select recency range",
            RECENCY,
            frame.recency,
            &mut selections.recency,
        );

        let ui = &mut cols[1];
        ui.strong("Interaction between Income and Recency (Filtered)");
        plot::scatter_plot(
            ui,
            "segment_chart",
            Axes {
                x: "Income",
                y: "Recency",
            },
            &frame.segment_points,
            height,
        );
    });

    changed
}

fn responses(ui: &mut Ui, state: &mut AppState, frame: &DashboardFrame, height: f32) -> bool {
    ui.heading("Explore responses, complaints, and enrollment duration");
    let changed = widgets::range_control(
        ui,
        "Select Enrollment Duration Range (Years)",
        YEARS_SINCE_ENROLLMENT,
        frame.enrollment,
        &mut state.selections.enrollment,
    );

    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        ui.strong("Distribution of Responses (Filtered by Enrollment)");
        ui.label(format!("{} customers", frame.response_hist.total()));
        plot::histogram_chart(
            ui,
            "response_chart",
            Axes {
                x: "Response Category",
                y: "Number of Customers",
            },
            &frame.response_hist,
            height,
        );

        let ui = &mut cols[1];
        ui.strong("Complaints vs. Enrollment Duration (Filtered by Enrollment)");
        ui.label(format!("{} customers", frame.complaint_hist.total()));
        plot::histogram_chart(
            ui,
            "complaint_chart",
            Axes {
                x: "Complaints",
                y: "Number of Customers",
            },
            &frame.complaint_hist,
            height,
        );
    });

    changed
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open customer data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
