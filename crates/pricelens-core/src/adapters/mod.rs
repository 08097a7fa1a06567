//! Concrete data source adapters.

pub mod csv_file;
pub mod yahoo;

pub use csv_file::CsvSource;
pub use yahoo::YahooAdapter;
