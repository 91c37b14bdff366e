//! Result table
//!
//! Flat row-per-detection projection of a scan, with stable sorting by any
//! column.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::vision::Detection;

/// One table row, derived from the detection at `index`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub index: usize,
    pub label: String,
    pub probability: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl TableRow {
    /// Value of `field` for comparison
    pub fn value(&self, field: SortField) -> SortValue<'_> {
        match field {
            SortField::Index => SortValue::Number(self.index as f64),
            SortField::Label => SortValue::Text(&self.label),
            SortField::Probability => SortValue::Number(self.probability as f64),
            SortField::MinX => SortValue::Number(self.min_x as f64),
            SortField::MaxX => SortValue::Number(self.max_x as f64),
            SortField::MinY => SortValue::Number(self.min_y as f64),
            SortField::MaxY => SortValue::Number(self.max_y as f64),
        }
    }
}

/// Extracted column value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl SortValue<'_> {
    /// Tri-state comparison: `(a > b) - (b > a)`. Incomparable values are equal.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Index,
    Label,
    Probability,
    MinX,
    MaxX,
    MinY,
    MaxY,
}

impl SortField {
    /// Columns shown in the table, in display order
    pub const COLUMNS: [SortField; 5] = [
        SortField::Label,
        SortField::MinX,
        SortField::MaxX,
        SortField::MinY,
        SortField::MaxY,
    ];

    /// Wire name of the field
    pub fn field_name(&self) -> &'static str {
        match self {
            SortField::Index => "index",
            SortField::Label => "label",
            SortField::Probability => "probability",
            SortField::MinX => "minX",
            SortField::MaxX => "maxX",
            SortField::MinY => "minY",
            SortField::MaxY => "maxY",
        }
    }

    /// Column header
    pub fn title(&self) -> &'static str {
        match self {
            SortField::Index => "#",
            SortField::Label => "Label",
            SortField::Probability => "Probability",
            SortField::MinX => "Min X",
            SortField::MaxX => "Max X",
            SortField::MinY => "Min Y",
            SortField::MaxY => "Max Y",
        }
    }

}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "index" => SortField::Index,
            "label" => SortField::Label,
            "probability" => SortField::Probability,
            "minx" => SortField::MinX,
            "maxx" => SortField::MaxX,
            "miny" => SortField::MinY,
            "maxy" => SortField::MaxY,
            _ => return Err(format!("unknown sort field: {}", s)),
        };
        Ok(field)
    }
}

/// Sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// +1 for ascending, -1 for descending
    pub fn multiplier(&self) -> i8 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header indicator
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Project detections to table rows, preserving order
pub fn project(detections: &[Detection]) -> Vec<TableRow> {
    detections
        .iter()
        .enumerate()
        .map(|(index, detection)| TableRow {
            index,
            label: detection.label.clone(),
            probability: detection.probability,
            min_x: detection.bounding_box.min_x,
            max_x: detection.bounding_box.max_x,
            min_y: detection.bounding_box.min_y,
            max_y: detection.bounding_box.max_y,
        })
        .collect()
}

/// Stable sort of a copy of `rows`. Equal keys keep their relative order.
pub fn sort_rows(rows: &[TableRow], field: SortField, direction: SortDirection) -> Vec<TableRow> {
    let mut sorted = rows.to_vec();
    let multiplier = direction.multiplier();
    sorted.sort_by(|a, b| {
        let ordering = a.value(field).compare(&b.value(field)) as i8;
        (ordering * multiplier).cmp(&0)
    });
    sorted
}

/// Table rows plus the remembered sort state
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    rows: Vec<TableRow>,
    sorted_by: Option<SortField>,
    sort_direction: SortDirection,
    default_direction: SortDirection,
}

impl ResultTable {
    pub fn new(default_direction: SortDirection) -> Self {
        Self {
            rows: Vec::new(),
            sorted_by: None,
            sort_direction: default_direction,
            default_direction,
        }
    }

    /// Regenerate all rows. A remembered sort is applied to the new rows.
    pub fn set_detections(&mut self, detections: &[Detection]) {
        self.rows = project(detections);
        if let Some(field) = self.sorted_by {
            self.rows = sort_rows(&self.rows, field, self.sort_direction);
        }
    }

    /// Re-sort the full row set and remember the choice
    pub fn sort(&mut self, field: SortField, direction: SortDirection) {
        self.rows = sort_rows(&self.rows, field, direction);
        self.sorted_by = Some(field);
        self.sort_direction = direction;
    }

    /// Header click: same column flips direction, another column starts at the default
    pub fn click_header(&mut self, field: SortField) {
        let direction = if self.sorted_by == Some(field) {
            self.sort_direction.toggled()
        } else {
            self.default_direction
        };
        self.sort(field, direction);
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn sorted_by(&self) -> Option<SortField> {
        self.sorted_by
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
