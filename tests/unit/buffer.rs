use super::*;

#[test]
fn from_rgba8_checks_length() {
    assert!(ImageBuffer::from_rgba8(2, 2, vec![0; 16]).is_ok());
    let err = ImageBuffer::from_rgba8(2, 2, vec![0; 15]).unwrap_err();
    assert!(matches!(err, DuotoneError::Validation(_)));
}

#[test]
fn zero_sides_are_dimension_errors() {
    let err = ImageBuffer::from_rgba8(0, 4, Vec::new()).unwrap_err();
    assert!(matches!(err, DuotoneError::Dimension(_)));
    let err = ImageBuffer::filled(4, 0, [0, 0, 0, 255]).unwrap_err();
    assert!(matches!(err, DuotoneError::Dimension(_)));
}

#[test]
fn filled_and_pixel_lookup() {
    let buf = ImageBuffer::filled(3, 2, [1, 2, 3, 4]).unwrap();
    assert_eq!(buf.data().len(), 3 * 2 * 4);
    assert_eq!(buf.pixel(2, 1), Some([1, 2, 3, 4]));
    assert_eq!(buf.pixel(3, 0), None);
}
