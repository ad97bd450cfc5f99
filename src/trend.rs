//! Measurement trend series for the progress chart

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::{MeasurementField, MeasurementRecord};

/// How many of the most recent measurements the chart shows
pub const TREND_WINDOW: usize = 5;

/// Fewer valid points than this cannot draw a trend line
pub const MIN_TREND_POINTS: usize = 2;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Records that actually carry a value for the charted field
    pub valid_point_count: usize,
}

impl Trend {
    /// Placeholder series rendered when there is nothing to chart
    pub fn fallback() -> Self {
        Self {
            labels: MONTH_LABELS[..TREND_WINDOW]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            values: vec![0.0; TREND_WINDOW],
            valid_point_count: 0,
        }
    }

    pub fn has_trend(&self) -> bool {
        self.valid_point_count >= MIN_TREND_POINTS
    }
}

/// Weight series for the given records.
pub fn extract_trend(records: &[MeasurementRecord]) -> Trend {
    extract_trend_for(records, MeasurementField::Weight)
}

/// Series for any numeric field. Records must already be ascending by date and
/// limited to the chart window. Two records in the same month both keep their
/// own point. A record missing the field is plotted at 0.
pub fn extract_trend_for(records: &[MeasurementRecord], field: MeasurementField) -> Trend {
    let valid_point_count = records
        .iter()
        .filter(|r| field.value_of(r).is_some())
        .count();

    if valid_point_count == 0 {
        return Trend::fallback();
    }

    let labels = records
        .iter()
        .map(|r| MONTH_LABELS[r.measured_on.month0() as usize].to_string())
        .collect();
    let values = records
        .iter()
        .map(|r| field.value_of(r).unwrap_or(0.0))
        .collect();

    Trend {
        labels,
        values,
        valid_point_count,
    }
}
