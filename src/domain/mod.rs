pub mod record;
pub mod tables;

pub use record::{FieldValue, Record};
pub use tables::{Region, REGIONS};
