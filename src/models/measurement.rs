use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One body-measurement submission. Every numeric field is optional and an
/// absent value is never the same as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
  pub id: String,
  pub student_id: String,
  pub measured_on: NaiveDate,
  pub weight: Option<f64>,
  pub chest: Option<f64>,
  pub waist: Option<f64>,
  pub abdomen: Option<f64>,
  pub hips: Option<f64>,
  pub right_arm: Option<f64>,
  pub left_arm: Option<f64>,
  pub right_thigh: Option<f64>,
  pub left_thigh: Option<f64>,
  pub right_calf: Option<f64>,
  pub left_calf: Option<f64>,
  pub notes: Option<String>,
  pub next_measurement_on: Option<NaiveDate>,
}

/// Numeric fields of a measurement record that can be charted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
  #[default]
  Weight,
  Chest,
  Waist,
  Abdomen,
  Hips,
  RightArm,
  LeftArm,
  RightThigh,
  LeftThigh,
  RightCalf,
  LeftCalf,
}

impl MeasurementField {
  pub fn value_of(&self, record: &MeasurementRecord) -> Option<f64> {
    match self {
      Self::Weight => record.weight,
      Self::Chest => record.chest,
      Self::Waist => record.waist,
      Self::Abdomen => record.abdomen,
      Self::Hips => record.hips,
      Self::RightArm => record.right_arm,
      Self::LeftArm => record.left_arm,
      Self::RightThigh => record.right_thigh,
      Self::LeftThigh => record.left_thigh,
      Self::RightCalf => record.right_calf,
      Self::LeftCalf => record.left_calf,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Weight => "weight",
      Self::Chest => "chest",
      Self::Waist => "waist",
      Self::Abdomen => "abdomen",
      Self::Hips => "hips",
      Self::RightArm => "right_arm",
      Self::LeftArm => "left_arm",
      Self::RightThigh => "right_thigh",
      Self::LeftThigh => "left_thigh",
      Self::RightCalf => "right_calf",
      Self::LeftCalf => "left_calf",
    }
  }
}

impl std::fmt::Display for MeasurementField {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for MeasurementField {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "weight" => Ok(Self::Weight),
      "chest" => Ok(Self::Chest),
      "waist" => Ok(Self::Waist),
      "abdomen" => Ok(Self::Abdomen),
      "hips" => Ok(Self::Hips),
      "right_arm" => Ok(Self::RightArm),
      "left_arm" => Ok(Self::LeftArm),
      "right_thigh" => Ok(Self::RightThigh),
      "left_thigh" => Ok(Self::LeftThigh),
      "right_calf" => Ok(Self::RightCalf),
      "left_calf" => Ok(Self::LeftCalf),
      _ => Err(format!("Unknown measurement field: {}", s)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_absent_field_is_not_zero() {
    let record = MeasurementRecord {
      weight: Some(0.0),
      waist: None,
      ..Default::default()
    };
    assert_eq!(MeasurementField::Weight.value_of(&record), Some(0.0));
    assert_eq!(MeasurementField::Waist.value_of(&record), None);
  }

  #[test]
  fn test_field_name_parsing() {
    assert_eq!("left_thigh".parse::<MeasurementField>(), Ok(MeasurementField::LeftThigh));
    assert!("neck".parse::<MeasurementField>().is_err());
    assert_eq!(MeasurementField::RightCalf.to_string(), "right_calf");
  }

  #[test]
  fn test_deserializes_backend_row_with_nulls() {
    let json = r#"{
      "id": "m-1",
      "student_id": "s-1",
      "measured_on": "2024-03-10",
      "weight": 68.4,
      "chest": null,
      "waist": 71.0,
      "abdomen": null,
      "hips": null,
      "right_arm": null,
      "left_arm": null,
      "right_thigh": null,
      "left_thigh": null,
      "right_calf": null,
      "left_calf": null,
      "notes": null,
      "next_measurement_on": "2024-04-10"
    }"#;
    let record: MeasurementRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.weight, Some(68.4));
    assert_eq!(record.chest, None);
    assert_eq!(
      record.next_measurement_on,
      NaiveDate::from_ymd_opt(2024, 4, 10)
    );
  }
}
