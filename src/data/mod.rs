pub mod dataset;
pub mod csv;
pub mod iterator;

pub use dataset::{Dataset, Example};
pub use csv::{LabelMode, load_csv, parse_csv};
pub use iterator::MiniBatchIterator;
