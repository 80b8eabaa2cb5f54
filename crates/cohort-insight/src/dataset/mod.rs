mod loader;
mod mapping;
mod normalizer;
mod snapshot;
mod table;
mod value;

pub use loader::{DatasetLoadError, DatasetLoader};
pub use mapping::{ColumnCategory, RANK_PERIODS};
pub(crate) use mapping::is_percentage_column;
pub use snapshot::{DatasetSnapshot, SnapshotStore};
pub use table::{Column, DatasetError, RowRef, TabularDataset};
pub use value::CellValue;
