use eframe::egui::{self, RichText, Ui};

use crate::color::ColorMap;
use crate::data::filter::{CategorySelection, RangeSelection};
use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Input widgets. Each returns `true` when the user changed its value.
// ---------------------------------------------------------------------------

/// Collapsible checkbox list over category values. Nothing ticked means
/// "no filter".
pub fn category_multiselect(
    ui: &mut Ui,
    label: &str,
    options: &[CellValue],
    selected: &mut CategorySelection,
    colors: &ColorMap,
) -> bool {
    let mut changed = false;
    let header = format!("{label}  ({}/{})", selected.len(), options.len());

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(label)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    selected.extend(options.iter().cloned());
                    changed = true;
                }
                if ui.small_button("Clear").clicked() {
                    selected.clear();
                    changed = true;
                }
            });

            for val in options {
                let mut checked = selected.contains(val);
                let text = RichText::new(val.to_string()).color(colors.color_for(val));
                if ui.checkbox(&mut checked, text).changed() {
                    if checked {
                        selected.insert(val.clone());
                    } else {
                        selected.remove(val);
                    }
                    changed = true;
                }
            }
        });

    changed
}

/// Checkbox list that keeps picked entries in the order they were picked.
pub fn ordered_multiselect(
    ui: &mut Ui,
    label: &str,
    options: &[&str],
    selected: &mut Vec<String>,
) -> bool {
    let mut changed = false;
    ui.strong(label);
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for &opt in options {
            let mut checked = selected.iter().any(|s| s == opt);
            if ui.checkbox(&mut checked, opt).changed() {
                if checked {
                    selected.push(opt.to_string());
                } else {
                    selected.retain(|s| s != opt);
                }
                changed = true;
            }
        }
    });
    changed
}

/// Single-select drop-down.
pub fn select_box(ui: &mut Ui, label: &str, options: &[&str], selected: &mut String) -> bool {
    let mut changed = false;
    ui.strong(label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(selected.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for &opt in options {
                let is_current = selected.as_str() == opt;
                if ui.selectable_label(is_current, opt).clicked() && !is_current {
                    *selected = opt.to_string();
                    changed = true;
                }
            }
        });
    changed
}

/// Two-ended range slider drawn as a pair of sliders over the same limits.
pub fn range_slider(ui: &mut Ui, label: &str, selection: &mut RangeSelection) -> bool {
    let bounds = selection.bounds();
    let mut lo = selection.lo();
    let mut hi = selection.hi();
    let integral = bounds.min.fract() == 0.0 && bounds.max.fract() == 0.0;

    ui.strong(label);
    let mut changed = false;
    for (name, value) in [("from", &mut lo), ("to", &mut hi)] {
        let mut slider = egui::Slider::new(value, bounds.as_range()).text(name);
        if integral {
            slider = slider.step_by(1.0);
        }
        changed |= ui.add(slider).changed();
    }

    if changed {
        selection.set(lo, hi);
    }
    changed
}

/// Range slider bound to a stored widget value. `effective` is the value
/// the last run actually used; `None` means there is nothing to slide over.
pub fn range_control(
    ui: &mut Ui,
    label: &str,
    column: &str,
    effective: Option<RangeSelection>,
    slot: &mut Option<RangeSelection>,
) -> bool {
    let Some(mut selection) = effective else {
        ui.strong(label);
        ui.label(format!("No numeric '{column}' values in the filtered data."));
        return false;
    };
    let changed = range_slider(ui, label, &mut selection);
    if changed {
        *slot = Some(selection);
    }
    changed
}
