pub mod observation;
pub mod timestamp;
