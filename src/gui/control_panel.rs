//! Control Panel Widget
//! Left side panel with the section selector and per-section filter
//! controls.

use egui::{Color32, ComboBox, RichText, ScrollArea};
use polars::prelude::DataFrame;

use crate::data;
use crate::data::features::{feature_by_label, feature_options, Feature, FieldKind, FEATURES};
use crate::view::{FilterValue, Section, ViewRequest};

const NONE_OPTION: &str = "None";
const LABEL_WIDTH: f32 = 130.0;
const COMBO_WIDTH: f32 = 160.0;

/// Range slider state for one continuous field. Rebuilt whenever the
/// governing field changes; defaults to the full `[0, max]` span.
struct RangeState {
    label: String,
    lo: f64,
    hi: f64,
    max: f64,
}

/// Multiselect state for one categorical field. Rebuilt whenever the
/// governing field changes; defaults to every distinct value selected.
struct SelectState {
    label: String,
    options: Vec<String>,
    selected: Vec<bool>,
}

/// Left side control panel driving the view selection.
pub struct ControlPanel {
    section: Section,
    info_category: String,
    info_filter: Option<String>,
    purchasing_group: Option<String>,
    marketing_group: Option<String>,
    range: Option<RangeState>,
    members: Option<SelectState>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            section: Section::RawData,
            info_category: FEATURES[0].label.to_string(),
            info_filter: None,
            purchasing_group: None,
            marketing_group: None,
            range: None,
            members: None,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the sidebar and return the interaction state as a request.
    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame) -> ViewRequest {
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Customer Personality Analysis")
                    .size(17.0)
                    .strong(),
            );
            ui.label(
                RichText::new(format!("{} customers", df.height()))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        ui.label(RichText::new("Section").size(14.0).strong());
        ui.add_space(5.0);
        ComboBox::from_id_salt("section")
            .width(LABEL_WIDTH + COMBO_WIDTH)
            .selected_text(self.section.label())
            .show_ui(ui, |ui| {
                for section in Section::ALL {
                    if ui
                        .selectable_label(self.section == section, section.label())
                        .clicked()
                    {
                        self.section = section;
                    }
                }
            });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(8.0);

        match self.section {
            Section::RawData => ViewRequest::section(Section::RawData),
            Section::CustomerInfo => self.customer_info_controls(ui, df),
            Section::Purchasing => self.grouping_controls(ui, df, Section::Purchasing),
            Section::Marketing => self.grouping_controls(ui, df, Section::Marketing),
        }
    }

    fn customer_info_controls(&mut self, ui: &mut egui::Ui, df: &DataFrame) -> ViewRequest {
        Self::feature_combo(ui, "info_category", "Category:", &mut self.info_category);
        ui.add_space(5.0);
        Self::optional_feature_combo(ui, "info_filter", "Filter by:", &mut self.info_filter);

        let mut filter_value = None;
        if let Some(label) = self.info_filter.clone() {
            if let Ok(feature) = feature_by_label(&label) {
                ui.add_space(8.0);
                filter_value = match feature.kind {
                    FieldKind::Continuous => self.range_widget(ui, df, feature),
                    FieldKind::Categorical => self.member_widget(ui, df, feature),
                };
            }
        }

        ViewRequest {
            section: Section::CustomerInfo,
            category: Some(self.info_category.clone()),
            filter_field: self.info_filter.clone(),
            filter_value,
        }
    }

    /// Purchasing and Marketing share the grouping selector: a continuous
    /// choice gets a range widget, a categorical one splits the chart.
    fn grouping_controls(
        &mut self,
        ui: &mut egui::Ui,
        df: &DataFrame,
        section: Section,
    ) -> ViewRequest {
        let (id, mut group) = match section {
            Section::Purchasing => ("purchasing_group", self.purchasing_group.clone()),
            _ => ("marketing_group", self.marketing_group.clone()),
        };
        Self::optional_feature_combo(ui, id, "Group by Category:", &mut group);
        match section {
            Section::Purchasing => self.purchasing_group = group.clone(),
            _ => self.marketing_group = group.clone(),
        }

        let mut filter_value = None;
        if let Some(label) = &group {
            if let Ok(feature) = feature_by_label(label) {
                if feature.kind == FieldKind::Continuous {
                    ui.add_space(8.0);
                    filter_value = self.range_widget(ui, df, feature);
                }
            }
        }

        ViewRequest {
            section,
            category: group,
            filter_field: None,
            filter_value,
        }
    }

    fn range_widget(
        &mut self,
        ui: &mut egui::Ui,
        df: &DataFrame,
        feature: &Feature,
    ) -> Option<FilterValue> {
        if self.range.as_ref().map_or(true, |r| r.label != feature.label) {
            let max = data::column_max(df, feature.column).unwrap_or(0.0).ceil();
            self.range = Some(RangeState {
                label: feature.label.to_string(),
                lo: 0.0,
                hi: max,
                max,
            });
        }
        let range = self.range.as_mut()?;

        ui.label(RichText::new("Range").size(13.0));
        ui.add(egui::Slider::new(&mut range.lo, 0.0..=range.max).integer().text("Min"));
        ui.add(egui::Slider::new(&mut range.hi, 0.0..=range.max).integer().text("Max"));
        Some(FilterValue::Range {
            lo: range.lo,
            hi: range.hi,
        })
    }

    fn member_widget(
        &mut self,
        ui: &mut egui::Ui,
        df: &DataFrame,
        feature: &Feature,
    ) -> Option<FilterValue> {
        if self
            .members
            .as_ref()
            .map_or(true, |m| m.label != feature.label)
        {
            let options = match data::unique_values(df, feature.column) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("distinct values for {}: {e}", feature.column);
                    Vec::new()
                }
            };
            let selected = vec![true; options.len()];
            self.members = Some(SelectState {
                label: feature.label.to_string(),
                options,
                selected,
            });
        }
        let state = self.members.as_mut()?;

        ui.label(RichText::new(format!("Select the {}", feature.label)).size(13.0));
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(150.0).show(ui, |ui| {
                    for (option, selected) in
                        state.options.iter().zip(state.selected.iter_mut())
                    {
                        ui.checkbox(selected, option);
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                state.selected.iter_mut().for_each(|v| *v = true);
            }
            if ui.small_button("Clear All").clicked() {
                state.selected.iter_mut().for_each(|v| *v = false);
            }
        });

        Some(FilterValue::Members(
            state
                .options
                .iter()
                .zip(&state.selected)
                .filter(|(_, &selected)| selected)
                .map(|(option, _)| option.clone())
                .collect(),
        ))
    }

    fn feature_combo(ui: &mut egui::Ui, id: &str, text: &str, value: &mut String) {
        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(text));
            ComboBox::from_id_salt(id)
                .width(COMBO_WIDTH)
                .selected_text(value.clone())
                .show_ui(ui, |ui| {
                    for label in feature_options() {
                        if ui.selectable_label(value == label, label).clicked() {
                            *value = label.to_string();
                        }
                    }
                });
        });
    }

    fn optional_feature_combo(
        ui: &mut egui::Ui,
        id: &str,
        text: &str,
        value: &mut Option<String>,
    ) {
        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(text));
            ComboBox::from_id_salt(id)
                .width(COMBO_WIDTH)
                .selected_text(value.clone().unwrap_or_else(|| NONE_OPTION.to_string()))
                .show_ui(ui, |ui| {
                    if ui.selectable_label(value.is_none(), NONE_OPTION).clicked() {
                        *value = None;
                    }
                    for label in feature_options() {
                        if ui
                            .selectable_label(value.as_deref() == Some(label), label)
                            .clicked()
                        {
                            *value = Some(label.to_string());
                        }
                    }
                });
        });
    }
}
