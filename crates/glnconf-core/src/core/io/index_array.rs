//! Integer index arrays of shape `(copies, columns)`.
//!
//! Two on-disk formats are understood: NumPy `.npy` files as written by
//! `numpy.save`, and headerless comma-separated `.csv` files. Values are kept as
//! signed integers; range checks happen when the rows become index sets.

use ndarray::ArrayD;
use ndarray_npy::{ReadNpyError, ReadNpyExt, ReadableElement};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IndexArrayError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed NumPy file: {0}")]
    Npy(#[from] ReadNpyError),
    #[error("Unsupported NumPy dtype {0}: expected an integer array")]
    UnsupportedDtype(String),
    #[error("Expected a 1-D or 2-D array, found shape {0:?}")]
    UnsupportedShape(Vec<usize>),
    #[error("Row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid integer '{value}' in row {row}")]
    InvalidInteger { row: usize, value: String },
    #[error("Value {0} does not fit in a signed 64-bit integer")]
    Overflow(String),
    #[error("Unrecognised index file extension '{0}': expected 'npy' or 'csv'")]
    UnknownFormat(String),
}

/// A dense row-major matrix of integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexArray {
    rows: usize,
    columns: usize,
    data: Vec<i64>,
}

impl IndexArray {
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, IndexArrayError> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * columns);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns {
                return Err(IndexArrayError::RaggedRow {
                    row,
                    expected: columns,
                    found: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self {
            rows: rows.len(),
            columns,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row(&self, index: usize) -> Option<&[i64]> {
        (index < self.rows).then(|| &self.data[index * self.columns..(index + 1) * self.columns])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[i64]> {
        (0..self.rows).map(move |i| &self.data[i * self.columns..(i + 1) * self.columns])
    }
}

/// Reads an index array, choosing the format from the file extension.
pub fn read_index_array(path: &Path) -> Result<IndexArray, IndexArrayError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let array = match extension.as_str() {
        "npy" => NpyFormat::read_from(&fs::read(path)?)?,
        "csv" => CsvFormat::read_from(File::open(path)?)?,
        _ => return Err(IndexArrayError::UnknownFormat(extension)),
    };
    debug!(
        path = %path.display(),
        rows = array.rows(),
        columns = array.columns(),
        "Loaded index array."
    );
    Ok(array)
}

type NpyReader = fn(&[u8]) -> Result<IndexArray, IndexArrayError>;

struct NpyFormat;

impl NpyFormat {
    /// Element types tried in order; a file matches exactly one of them.
    const READERS: [NpyReader; 8] = [
        Self::read_as::<i64>,
        Self::read_as::<i32>,
        Self::read_as::<i16>,
        Self::read_as::<i8>,
        Self::read_as::<u64>,
        Self::read_as::<u32>,
        Self::read_as::<u16>,
        Self::read_as::<u8>,
    ];

    fn read_from(bytes: &[u8]) -> Result<IndexArray, IndexArrayError> {
        let mut unsupported = IndexArrayError::UnsupportedDtype(String::new());
        for read in Self::READERS {
            match read(bytes) {
                Err(err @ IndexArrayError::UnsupportedDtype(_)) => unsupported = err,
                result => return result,
            }
        }
        Err(unsupported)
    }

    fn read_as<T>(bytes: &[u8]) -> Result<IndexArray, IndexArrayError>
    where
        T: ReadableElement + Copy + TryInto<i64> + fmt::Display,
    {
        let array = match ArrayD::<T>::read_npy(bytes) {
            Ok(array) => array,
            Err(ReadNpyError::WrongDescriptor(descr)) => {
                return Err(IndexArrayError::UnsupportedDtype(format!("{:?}", descr)));
            }
            Err(err) => return Err(err.into()),
        };

        let (rows, columns) = match *array.shape() {
            [n] => (1, n),
            [r, c] => (r, c),
            _ => return Err(IndexArrayError::UnsupportedShape(array.shape().to_vec())),
        };
        // Logical (row-major) order, whatever the file's memory order.
        let data = array
            .iter()
            .map(|&value| {
                TryInto::<i64>::try_into(value)
                    .map_err(|_| IndexArrayError::Overflow(value.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(IndexArray {
            rows,
            columns,
            data,
        })
    }
}

struct CsvFormat;

impl CsvFormat {
    fn read_from(reader: impl Read) -> Result<IndexArray, IndexArrayError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let values = record
                .iter()
                .map(|field| {
                    field.parse::<i64>().map_err(|_| IndexArrayError::InvalidInteger {
                        row,
                        value: field.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(values);
        }
        IndexArray::from_rows(rows)
    }
}

#[cfg(test)]
pub(crate) fn encode_npy_i64(rows: &[Vec<i64>]) -> Vec<u8> {
    use ndarray::Array2;
    use ndarray_npy::WriteNpyExt;

    let columns = rows.first().map_or(0, Vec::len);
    let array = Array2::from_shape_vec((rows.len(), columns), rows.concat()).unwrap();
    let mut bytes = Vec::new();
    array.write_npy(&mut bytes).unwrap();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, ShapeBuilder, arr2};
    use ndarray_npy::WriteNpyExt;
    use tempfile::tempdir;

    fn to_npy<A, D>(array: &ndarray::Array<A, D>) -> Vec<u8>
    where
        A: ndarray_npy::WritableElement,
        D: ndarray::Dimension,
    {
        let mut bytes = Vec::new();
        array.write_npy(&mut bytes).unwrap();
        bytes
    }

    /// A version 1.0 file with a hand-written header and no payload.
    fn header_only(dict: &str) -> Vec<u8> {
        let mut header = format!("{}\n", dict);
        while (10 + header.len()) % 64 != 0 {
            header.insert(header.len() - 1, ' ');
        }
        let mut bytes = b"\x93NUMPY\x01\x00".to_vec();
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes
    }

    #[test]
    fn reads_int64_matrix() {
        let bytes = encode_npy_i64(&[vec![1, 2, 3, 4], vec![5, 6, 7, 8]]);
        let array = NpyFormat::read_from(&bytes).unwrap();

        assert_eq!(array.rows(), 2);
        assert_eq!(array.columns(), 4);
        assert_eq!(array.row(1).unwrap(), &[5, 6, 7, 8]);
        assert!(array.row(2).is_none());
    }

    #[test]
    fn narrower_integer_dtypes_and_negative_values_are_widened() {
        let array = NpyFormat::read_from(&to_npy(&arr2(&[[10i32, -1, 300]]))).unwrap();
        assert_eq!(array.row(0).unwrap(), &[10, -1, 300]);

        let array = NpyFormat::read_from(&to_npy(&arr2(&[[7u8, 8, 9]]))).unwrap();
        assert_eq!(array.row(0).unwrap(), &[7, 8, 9]);
    }

    #[test]
    fn one_dimensional_array_is_a_single_row() {
        let bytes = to_npy(&Array1::from(vec![4u16, 5, 6]));
        let array = NpyFormat::read_from(&bytes).unwrap();

        assert_eq!(array.rows(), 1);
        assert_eq!(array.row(0).unwrap(), &[4, 5, 6]);
    }

    #[test]
    fn fortran_ordered_array_keeps_logical_rows() {
        let column_major =
            Array2::from_shape_vec((2, 3).f(), vec![1i64, 4, 2, 5, 3, 6]).unwrap();
        let array = NpyFormat::read_from(&to_npy(&column_major)).unwrap();

        assert_eq!(array.row(0).unwrap(), &[1, 2, 3]);
        assert_eq!(array.row(1).unwrap(), &[4, 5, 6]);
    }

    #[test]
    fn float_arrays_are_rejected() {
        let bytes = to_npy(&arr2(&[[1.0f64]]));
        let result = NpyFormat::read_from(&bytes);
        assert!(matches!(result, Err(IndexArrayError::UnsupportedDtype(d)) if d.contains("<f8")));
    }

    #[test]
    fn unsigned_value_beyond_i64_is_an_overflow() {
        let bytes = to_npy(&arr2(&[[u64::MAX]]));
        let result = NpyFormat::read_from(&bytes);
        assert!(matches!(result, Err(IndexArrayError::Overflow(v)) if v == u64::MAX.to_string()));
    }

    #[test]
    fn three_dimensional_array_is_rejected() {
        let bytes = to_npy(&ndarray::Array3::<i64>::zeros((1, 2, 2)));
        let result = NpyFormat::read_from(&bytes);
        assert!(matches!(result, Err(IndexArrayError::UnsupportedShape(s)) if s == vec![1, 2, 2]));
    }

    #[test]
    fn short_payload_is_an_error() {
        let mut bytes = encode_npy_i64(&[vec![1, 2, 3, 4]]);
        bytes.truncate(bytes.len() - 3);
        let result = NpyFormat::read_from(&bytes);
        assert!(matches!(result, Err(IndexArrayError::Npy(_))));
    }

    #[test]
    fn overflowing_shape_is_an_error_not_a_panic() {
        let dict = format!(
            "{{'descr': '<i8', 'fortran_order': False, 'shape': ({}, 4), }}",
            usize::MAX / 2
        );
        let result = NpyFormat::read_from(&header_only(&dict));
        assert!(matches!(result, Err(IndexArrayError::Npy(_))));
    }

    #[test]
    fn missing_magic_is_an_error() {
        let result = NpyFormat::read_from(b"not a numpy file at all");
        assert!(matches!(result, Err(IndexArrayError::Npy(_))));
    }

    #[test]
    fn csv_skips_comments_and_trims_fields() {
        let content = "# donor, hydrogen, acceptor, pre-acceptor\n 1, 2 ,3,4\n5,6,7,8\n";
        let array = CsvFormat::read_from(content.as_bytes()).unwrap();

        assert_eq!(array.rows(), 2);
        assert_eq!(array.iter_rows().last().unwrap(), &[5, 6, 7, 8]);
    }

    #[test]
    fn csv_ragged_rows_are_rejected() {
        let result = CsvFormat::read_from("1,2,3,4\n5,6,7\n".as_bytes());
        assert!(matches!(
            result,
            Err(IndexArrayError::RaggedRow {
                row: 1,
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn csv_non_integer_is_rejected() {
        let result = CsvFormat::read_from("1,2,x,4\n".as_bytes());
        assert!(matches!(
            result,
            Err(IndexArrayError::InvalidInteger { row: 0, .. })
        ));
    }

    #[test]
    fn read_index_array_dispatches_on_extension() {
        let dir = tempdir().unwrap();

        let npy_path = dir.path().join("hbond.npy");
        std::fs::write(&npy_path, encode_npy_i64(&[vec![0, 1, 2, 3]])).unwrap();
        let csv_path = dir.path().join("gln.CSV");
        std::fs::write(&csv_path, "4,5,6\n").unwrap();
        let txt_path = dir.path().join("gln.txt");
        std::fs::write(&txt_path, "4 5 6\n").unwrap();

        assert_eq!(read_index_array(&npy_path).unwrap().columns(), 4);
        assert_eq!(read_index_array(&csv_path).unwrap().columns(), 3);
        assert!(matches!(
            read_index_array(&txt_path),
            Err(IndexArrayError::UnknownFormat(ext)) if ext == "txt"
        ));
    }
}
