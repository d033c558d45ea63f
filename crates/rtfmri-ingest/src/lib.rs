//! Study dataset ingestion: tab-separated loading and the column policy.

pub mod error;
pub mod load;
pub mod table;

pub use error::{IngestError, Result};
pub use load::{
    DEFAULT_DATASET_PATH, DroppedColumn, LoadedDataset, drop_incomplete_columns, load_dataset,
    load_dataset_from_reader,
};
pub use table::{FIELD_DELIMITER, RawTable, read_raw_table, read_raw_table_from_path};
