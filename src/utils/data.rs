use crate::error::PipelineError;
use crate::models::{DebugRecord, GameRow};
use csv::{Reader, StringRecord, Writer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Column set built up in first-appearance order
#[derive(Debug, Default)]
struct Columns {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Columns {
    fn add(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), i);
        i
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// Save game rows to CSV. The header is the union of every row's columns;
/// cells a row doesn't have are left empty.
pub fn save_rows_to_csv(rows: &[GameRow], path: &Path) -> Result<(), PipelineError> {
    let row_cells: Vec<Vec<(String, String)>> = rows.iter().map(GameRow::cells).collect();

    let mut columns = Columns::default();
    for cells in &row_cells {
        for (name, _) in cells {
            columns.add(name);
        }
    }

    let mut writer = Writer::from_path(path).map_err(|e| PipelineError::csv(path, e))?;
    writer
        .write_record(&columns.names)
        .map_err(|e| PipelineError::csv(path, e))?;

    for cells in row_cells {
        let mut record = vec![String::new(); columns.len()];
        for (name, value) in cells {
            if let Some(i) = columns.position(&name) {
                record[i] = value;
            }
        }
        writer
            .write_record(&record)
            .map_err(|e| PipelineError::csv(path, e))?;
    }

    writer.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

/// Overwrite the debug side file with a pretty-printed record
pub fn write_debug(record: &DebugRecord, path: &Path) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json + "\n").map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

/// Save rows to `output_file` and the debug record next to it
pub fn save_rows(
    rows: &[GameRow],
    output_file: &Path,
    debug_file: &Path,
    debug: &DebugRecord,
) -> Result<(), PipelineError> {
    save_rows_to_csv(rows, output_file)?;
    write_debug(debug, debug_file)
}

/// Merge per-season CSV files into one. Headers are unioned in
/// first-appearance order and each record is realigned to the merged header.
/// Returns the number of data rows written.
pub fn concat_season_files(inputs: &[PathBuf], output: &Path) -> Result<usize, PipelineError> {
    let mut columns = Columns::default();
    let mut files: Vec<(Vec<usize>, Vec<StringRecord>)> = Vec::with_capacity(inputs.len());

    for input in inputs {
        let mut reader = Reader::from_path(input).map_err(|e| PipelineError::csv(input, e))?;
        let positions: Vec<usize> = reader
            .headers()
            .map_err(|e| PipelineError::csv(input, e))?
            .iter()
            .map(|name| columns.add(name))
            .collect();

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PipelineError::csv(input, e))?;

        files.push((positions, records));
    }

    let mut writer = Writer::from_path(output).map_err(|e| PipelineError::csv(output, e))?;
    writer
        .write_record(&columns.names)
        .map_err(|e| PipelineError::csv(output, e))?;

    let mut written = 0;
    for (positions, records) in files {
        for record in records {
            let mut merged = vec![""; columns.len()];
            for (field, &i) in record.iter().zip(&positions) {
                merged[i] = field;
            }
            writer
                .write_record(&merged)
                .map_err(|e| PipelineError::csv(output, e))?;
            written += 1;
        }
    }

    writer.flush().map_err(|e| PipelineError::io(output, e))?;
    Ok(written)
}
