use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::domain::TVError;
use crate::table::{Cell, Table};

#[derive(Debug, PartialEq)]
enum FileType {
    CSV,
    PARQUET,
    ARROW,
}

#[derive(Debug)]
struct FileInfo {
    path: PathBuf,
    file_size: u64,
    file_type: FileType,
}

/// Read a data file into a `Table`.
///
/// `path` is used as given, without any shell expansion. The file type
/// follows the extension; CSV files are read with a header row and the
/// reader's default dialect.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_table(path: impl AsRef<Path>) -> Result<Table, TVError> {
    let file_info = get_file_info(path.as_ref().to_path_buf())?;
    debug!(
        "Loading {:?} file of {} bytes",
        file_info.file_type, file_info.file_size
    );
    let frame = match file_info.file_type {
        FileType::CSV => load_csv(&file_info.path)?,
        FileType::PARQUET => load_parquet(&file_info.path)?,
        FileType::ARROW => load_arrow(&file_info.path)?,
    };

    let start_time = Instant::now();
    let table = table_from_frame(&frame.collect()?)?;
    let data_loading_duration = start_time.elapsed().as_millis();
    info!("Loading data took {data_loading_duration}ms ...");

    Ok(table)
}

/// Convert a collected frame into typed rows. Each column is converted on
/// its own rayon worker, then the columns are transposed into rows.
pub fn table_from_frame(df: &DataFrame) -> Result<Table, TVError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let c_: Result<Vec<Vec<Cell>>, PolarsError> = names
        .par_iter()
        .map(|name| load_column(df, name))
        .collect();
    let mut columns: Vec<std::vec::IntoIter<Cell>> =
        c_?.into_iter().map(|c| c.into_iter()).collect();

    for (name, column) in names.iter().zip(columns.iter()) {
        debug!("Column: \"{}\", # rows {}", name, column.len());
    }

    let nrows = df.height();
    let mut rows = Vec::with_capacity(nrows);
    for _ in 0..nrows {
        rows.push(
            columns
                .iter_mut()
                .map(|c| c.next().unwrap_or(Cell::Null))
                .collect(),
        );
    }
    Table::new(names, rows)
}

fn load_column(df: &DataFrame, col_name: &str) -> Result<Vec<Cell>, PolarsError> {
    let col = df.column(col_name)?;
    let dtype = col.dtype();

    let cells: Vec<Cell> = if is_integer_type(dtype) {
        let cast = col.cast(&DataType::Int64)?;
        cast.i64()?.into_iter().map(Cell::from).collect()
    } else if is_float_type(dtype) {
        let cast = col.cast(&DataType::Float64)?;
        cast.f64()?.into_iter().map(Cell::from).collect()
    } else if matches!(dtype, DataType::Boolean) {
        col.bool()?.into_iter().map(Cell::from).collect()
    } else {
        let cast = col.cast(&DataType::String)?;
        cast.str()?.into_iter().map(Cell::from).collect()
    };
    Ok(cells)
}

fn is_integer_type(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn is_float_type(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

fn detect_file_type(path: &Path) -> Result<FileType, TVError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::CSV),
        Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
        _ => Err(TVError::UnknownFileType(path.to_path_buf())),
    }
}

fn get_file_info(path: PathBuf) -> Result<FileInfo, TVError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TVError::FileNotFound(path.clone()),
        ErrorKind::PermissionDenied => TVError::PermissionDenied(path.clone()),
        _ => TVError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(TVError::LoadingFailed(format!(
            "{} is not a file!",
            path.display()
        )));
    }

    let file_size = metadata.len();
    let file_type = detect_file_type(&path)?;

    Ok(FileInfo {
        path,
        file_size,
        file_type,
    })
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn detects_file_types_by_extension() {
        assert_eq!(detect_file_type(Path::new("a.csv")).unwrap(), FileType::CSV);
        assert_eq!(detect_file_type(Path::new("a.PQ")).unwrap(), FileType::PARQUET);
        assert_eq!(
            detect_file_type(Path::new("a.feather")).unwrap(),
            FileType::ARROW
        );
        assert!(matches!(
            detect_file_type(Path::new("a.txt")),
            Err(TVError::UnknownFileType(_))
        ));
    }

    #[test]
    fn loads_typed_cells_from_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "name,age,score").unwrap();
        writeln!(file, "Ann,31,1.5").unwrap();
        writeln!(file, "Bob,,2.0").unwrap();
        drop(file);

        let table = load_table(&path).unwrap();
        assert_eq!(table.columns(), ["name", "age", "score"]);
        assert_eq!(
            table.rows()[0],
            vec![Cell::from("Ann"), Cell::Int(31), Cell::Float(1.5)]
        );
        assert_eq!(
            table.rows()[1],
            vec![Cell::from("Bob"), Cell::Null, Cell::Float(2.0)]
        );
    }

    #[test]
    fn header_only_csv_loads_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "a,b\n").unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.ncols(), 2);
        assert_eq!(table.nrows(), 0);
    }

    #[test]
    fn missing_file_and_directory_fail() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_table(dir.path().join("nope.csv")),
            Err(TVError::FileNotFound(_))
        ));
        assert!(matches!(
            load_table(dir.path()),
            Err(TVError::LoadingFailed(_))
        ));
    }
}
