//! Tests for the hand-written layouts.

use super::header::Header;
use super::mat5::{self, MatError};
use super::records::{read_record, write_record};
use crate::array::{Array, DType};
use crate::error::Error;
use std::io::{Cursor, ErrorKind};

// -------------------------------------------------------------------------
// Header line
// -------------------------------------------------------------------------

#[test]
fn test_header_line_format() {
    // Arrange
    let array = Array::new(4, 3, vec![0i32; 12]).unwrap();

    // Act
    let header = Header::of(&array);

    // Assert
    assert_eq!(header.line(), "int32 4 3");
    assert_eq!(header.payload_len().unwrap(), 48);
}

#[test]
fn test_header_read_stops_at_newline() {
    // Arrange
    let mut bytes = b"float32 2 5\n".to_vec();
    bytes.extend_from_slice(&[0xFF, 0x0A, 0x00]);
    let mut cursor = Cursor::new(bytes);

    // Act
    let header = Header::read_from(&mut cursor).unwrap();

    // Assert
    assert_eq!(header.dtype, DType::Float32);
    assert_eq!((header.rows, header.cols), (2, 5));
    assert_eq!(cursor.position(), 12);
}

#[test]
fn test_header_rejects_wrong_token_count() {
    for line in ["float64 4", "float64 4 3 2", ""] {
        let err = Header::parse(line).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)), "line {line:?}");
    }
}

#[test]
fn test_header_rejects_unknown_dtype_and_bad_dims() {
    assert!(matches!(
        Header::parse("complex128 1 1"),
        Err(Error::InvalidHeader(_))
    ));
    assert!(matches!(
        Header::parse("float64 -1 3"),
        Err(Error::InvalidHeader(_))
    ));
}

#[test]
fn test_header_rejects_overflowing_shape() {
    // Arrange
    let mut bytes = b"float64 4611686018427387904 4\n".to_vec();
    bytes.extend_from_slice(&[0u8; 8]);

    // Act
    let parsed = Header::parse("float64 4611686018427387904 4");
    let read = Header::read_from(&mut Cursor::new(bytes));

    // Assert
    assert!(matches!(parsed, Err(Error::InvalidHeader(_))));
    assert!(matches!(read, Err(Error::InvalidHeader(_))));
}

#[test]
fn test_header_payload_len_checks_public_fields() {
    let header = Header {
        dtype: DType::Int64,
        rows: usize::MAX,
        cols: 2,
    };
    assert!(matches!(header.payload_len(), Err(Error::InvalidHeader(_))));
}

#[test]
fn test_header_requires_newline() {
    let mut cursor = Cursor::new(b"float64 1 1".to_vec());
    assert!(matches!(
        Header::read_from(&mut cursor),
        Err(Error::InvalidHeader(_))
    ));
}

// -------------------------------------------------------------------------
// Sequential records
// -------------------------------------------------------------------------

#[test]
fn test_records_framing_and_clean_eof() {
    // Arrange
    let mut buf = Vec::new();
    write_record(&mut buf, &[1, 2, 3]).unwrap();
    write_record(&mut buf, &[]).unwrap();

    // Act
    let mut cursor = Cursor::new(buf.clone());
    let first = read_record(&mut cursor).unwrap();
    let second = read_record(&mut cursor).unwrap();
    let end = read_record(&mut cursor).unwrap();

    // Assert
    assert_eq!(buf.len(), (4 + 3 + 4) + (4 + 4));
    assert_eq!(&buf[..4], &3u32.to_le_bytes());
    assert_eq!(first, Some(vec![1, 2, 3]));
    assert_eq!(second, Some(vec![]));
    assert_eq!(end, None);
}

#[test]
fn test_records_truncated_payload_is_error() {
    let mut buf = Vec::new();
    write_record(&mut buf, &[9; 16]).unwrap();
    buf.truncate(10);

    let err = read_record(&mut Cursor::new(buf)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn test_records_partial_marker_is_error() {
    // Arrange - one whole record followed by two stray bytes
    let mut buf = Vec::new();
    write_record(&mut buf, &[5; 8]).unwrap();
    buf.extend_from_slice(&[1, 2]);
    let mut cursor = Cursor::new(buf);

    // Act
    let first = read_record(&mut cursor).unwrap();
    let err = read_record(&mut cursor).unwrap_err();

    // Assert
    assert_eq!(first, Some(vec![5; 8]));
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn test_records_oversized_marker_is_error() {
    let buf = u32::MAX.to_le_bytes().to_vec();

    let err = read_record(&mut Cursor::new(buf)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn test_records_mismatched_trailer_is_error() {
    let mut buf = Vec::new();
    write_record(&mut buf, &[7; 8]).unwrap();
    let last = buf.len() - 4;
    buf[last] = 99;

    let err = read_record(&mut Cursor::new(buf)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

// -------------------------------------------------------------------------
// MAT-file level 5
// -------------------------------------------------------------------------

#[test]
fn test_mat_header_fields() {
    // Arrange
    let array = Array::new(2, 2, vec![1.0f64, 2.0, 3.0, 4.0]).unwrap();

    // Act
    let bytes = mat5::encode("data", &array).unwrap();

    // Assert
    assert!(bytes.starts_with(b"MATLAB 5.0 MAT-file"));
    assert_eq!(&bytes[124..126], &0x0100u16.to_le_bytes());
    assert_eq!(&bytes[126..128], b"IM");
    assert_eq!(&bytes[128..132], &14u32.to_le_bytes());
    assert_eq!(bytes.len() % 8, 0);
}

#[test]
fn test_mat_stores_column_major() {
    // Arrange
    let array = Array::new(2, 3, vec![1u8, 2, 3, 4, 5, 6]).unwrap();

    // Act
    let bytes = mat5::encode("data", &array).unwrap();

    // Assert - real part is the last padded sub-element
    let needle = [1u8, 4, 2, 5, 3, 6];
    assert!(bytes.windows(6).any(|w| w == needle));
    assert_eq!(mat5::decode(&bytes, "data").unwrap(), array);
}

#[test]
fn test_mat_every_dtype_decodes() {
    let arrays = [
        Array::new(2, 3, vec![0.5f64, -1.0, 2.25, 1e300, -0.0, 7.0]).unwrap(),
        Array::new(3, 1, vec![1.5f32, f32::MAX, -3.0]).unwrap(),
        Array::new(1, 2, vec![i64::MIN, i64::MAX]).unwrap(),
        Array::new(2, 2, vec![-7i32, 0, 7, i32::MAX]).unwrap(),
        Array::new(1, 1, vec![255u8]).unwrap(),
    ];
    for array in arrays {
        let bytes = mat5::encode("data", &array).unwrap();
        assert_eq!(mat5::decode(&bytes, "data").unwrap(), array);
    }
}

#[test]
fn test_mat_missing_variable() {
    let array = Array::new(1, 1, vec![1.0f64]).unwrap();
    let bytes = mat5::encode("other", &array).unwrap();

    assert!(matches!(
        mat5::decode(&bytes, "data"),
        Err(MatError::VariableNotFound(name)) if name == "data"
    ));
}

#[test]
fn test_mat_rejects_truncated_and_big_endian() {
    let array = Array::new(1, 1, vec![1.0f64]).unwrap();
    let mut bytes = mat5::encode("data", &array).unwrap();

    assert!(matches!(
        mat5::decode(&bytes[..64], "data"),
        Err(MatError::Truncated(_))
    ));
    assert!(matches!(
        mat5::decode(&bytes[..bytes.len() - 8], "data"),
        Err(MatError::Truncated(_))
    ));

    bytes[126] = b'M';
    bytes[127] = b'I';
    assert!(matches!(mat5::decode(&bytes, "data"), Err(MatError::Endian(_))));
}

#[test]
fn test_mat_overflowing_dimensions_are_malformed() {
    // Arrange - dimensions sit after the file header, matrix tag and flags
    let array = Array::new(1, 1, vec![1.0f64]).unwrap();
    let mut bytes = mat5::encode("data", &array).unwrap();
    let dims = 128 + 8 + 16 + 8;
    assert_eq!(&bytes[dims..dims + 8], &[1, 0, 0, 0, 1, 0, 0, 0]);
    bytes[dims..dims + 4].copy_from_slice(&i32::MAX.to_le_bytes());
    bytes[dims + 4..dims + 8].copy_from_slice(&i32::MAX.to_le_bytes());

    // Act
    let result = mat5::decode(&bytes, "data");

    // Assert
    assert!(matches!(result, Err(MatError::Malformed(_))));
}
