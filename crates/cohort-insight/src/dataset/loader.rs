use super::normalizer::normalize_column;
use super::table::{DatasetError, TabularDataset};
use super::value::CellValue;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum DatasetLoadError {
    #[error("failed to read cohort export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid cohort CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Reads CSV exports into [`TabularDataset`]s.
pub struct DatasetLoader;

impl DatasetLoader {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        id_column: &str,
    ) -> Result<TabularDataset, DatasetLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file, id_column)?;
        info!(path = %path.display(), rows = dataset.count(), "cohort dataset loaded");
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        id_column: &str,
    ) -> Result<TabularDataset, DatasetLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let wanted = normalize_column(id_column);
        let id_position = headers
            .iter()
            .position(|header| normalize_column(header) == wanted);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let cells = record
                .iter()
                .enumerate()
                .map(|(position, field)| {
                    if Some(position) == id_position {
                        CellValue::text(field)
                    } else {
                        CellValue::parse(field)
                    }
                })
                .collect::<Vec<_>>();
            rows.push(cells);
        }

        Ok(TabularDataset::from_rows(id_column, headers, rows)?)
    }
}
