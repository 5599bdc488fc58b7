pub mod read_csv;
pub use read_csv::{merge_keyed, parse_keyed_csv, read_csv_files};
