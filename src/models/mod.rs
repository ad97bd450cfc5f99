pub mod checkin;
pub mod cycle;
pub mod measurement;

pub use checkin::CheckinEvent;
pub use cycle::CycleGoal;
pub use measurement::{MeasurementField, MeasurementRecord};
