use benchview_protocol::ResultRecord;
use serde::{Deserialize, Serialize};

use crate::keypath::KeyPath;
use crate::views::table::build_rows;

/// Axis selection for a result chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// X axis path; `None` plots against the row's absolute position.
    pub x: Option<KeyPath>,
    pub y: KeyPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub order_index: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
    /// Records whose axes did not resolve to numbers.
    pub skipped: usize,
}

impl ChartSeries {
    /// `(min, max)` of the y values, `None` for an empty series.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.y).fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }
}

/// Build a chart series from a page of records.
///
/// Unresolvable or non-numeric values drop the record from the series and
/// are counted in `skipped`.
pub fn chart_series(records: &[ResultRecord], page_offset: usize, spec: &ChartSpec) -> ChartSeries {
    let mut points = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for row in build_rows(records, page_offset) {
        let y = spec.y.resolve(&row.json).as_f64();
        let x = match &spec.x {
            Some(path) => path.resolve(&row.json).as_f64(),
            None => Some(row.order_index as f64),
        };
        match (x, y) {
            (Some(x), Some(y)) => points.push(ChartPoint {
                order_index: row.order_index,
                x,
                y,
            }),
            _ => skipped += 1,
        }
    }

    ChartSeries {
        x_label: spec
            .x
            .as_ref()
            .map_or("#", KeyPath::final_segment)
            .to_owned(),
        y_label: spec.y.final_segment().to_owned(),
        points,
        skipped,
    }
}
