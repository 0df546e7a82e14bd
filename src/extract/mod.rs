pub mod detail;
pub mod fields;

pub use detail::{classify, normalize_detail, ColumnKind};
