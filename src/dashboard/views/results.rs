//! Results view - sortable table of detections

use egui::RichText;
use egui_extras::{Column, TableBuilder};

use crate::dashboard::theme::ThemeColors;
use crate::table::{ResultTable, SortField};

/// Header text for `field`, with an arrow on the sorted column
pub fn header_text(table: &ResultTable, field: SortField) -> String {
    match table.sorted_by() {
        Some(sorted) if sorted == field => format!("{} {}", field.title(), table.sort_direction().arrow()),
        _ => field.title().to_string(),
    }
}

fn format_coordinate(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Render the results view
pub fn render_results_view(ui: &mut egui::Ui, table: &mut ResultTable) {
    ui.label(
        RichText::new(format!("{} detections", table.len()))
            .size(13.0)
            .color(ThemeColors::TEXT_FAINT),
    );
    ui.add_space(6.0);

    if table.is_empty() {
        ui.label(RichText::new("Scan an image to list its labels").color(ThemeColors::TEXT_FAINT));
        return;
    }

    let mut clicked: Option<SortField> = None;
    let headers: Vec<(SortField, String)> = SortField::COLUMNS
        .iter()
        .map(|field| (*field, header_text(table, *field)))
        .collect();
    let rows = table.rows();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::remainder().at_least(100.0))
        .columns(Column::auto().at_least(56.0), SortField::COLUMNS.len() - 1)
        .header(24.0, |mut header| {
            for (field, text) in &headers {
                header.col(|ui| {
                    let button = egui::Button::new(RichText::new(text).strong()).frame(false);
                    if ui.add(button).clicked() {
                        clicked = Some(*field);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(22.0, rows.len(), |mut row| {
                let data = &rows[row.index()];
                row.col(|ui| {
                    ui.label(&data.label);
                });
                for value in [data.min_x, data.max_x, data.min_y, data.max_y] {
                    row.col(|ui| {
                        ui.label(
                            RichText::new(format_coordinate(value)).color(ThemeColors::TEXT_DIM),
                        );
                    });
                }
            });
        });

    if let Some(field) = clicked {
        table.click_header(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SortDirection;
    use crate::vision::{BoundingBox, Detection};

    #[test]
    fn test_header_arrow_follows_sort() {
        let mut table = ResultTable::new(SortDirection::Ascending);
        table.set_detections(&[Detection::new("A", 0.5, BoundingBox::new(1.0, 2.0, 3.0, 4.0))]);

        assert_eq!(header_text(&table, SortField::Label), "Label");

        table.click_header(SortField::Label);
        assert_eq!(header_text(&table, SortField::Label), format!("Label {}", SortDirection::Ascending.arrow()));
        assert_eq!(header_text(&table, SortField::MinX), SortField::MinX.title());

        table.click_header(SortField::Label);
        assert_eq!(header_text(&table, SortField::Label), format!("Label {}", SortDirection::Descending.arrow()));
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(10.0), "10");
        assert_eq!(format_coordinate(10.3), "10.3");
    }
}
