pub mod connection;
pub mod flats;
pub mod runs;

pub use connection::{init_db, Database};
pub use flats::{count_records, load_records, save_record};
