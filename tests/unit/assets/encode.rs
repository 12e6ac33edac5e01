use super::*;

#[test]
fn encode_png_preserves_pixels_and_alpha() {
    let buf = ImageBuffer::from_rgba8(2, 1, vec![10, 20, 30, 40, 250, 240, 230, 255]).unwrap();
    let bytes = encode_png(&buf).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (2, 1));
    assert_eq!(back.into_raw(), buf.data());
}

#[test]
fn write_png_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.png");
    let buf = ImageBuffer::filled(3, 3, [1, 2, 3, 255]).unwrap();
    write_png(&path, &buf).unwrap();
    assert!(path.exists());
}
