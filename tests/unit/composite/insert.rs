use std::io::Cursor;

use image::Rgba;

use super::*;

#[test]
fn decodes_png_bytes() {
    let img = RgbaImage::from_pixel(3, 2, Rgba([9, 8, 7, 200]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let insert = InsertBitmap::decode(&buf).unwrap();
    assert_eq!((insert.width(), insert.height()), (3, 2));
    assert_eq!(insert.image().get_pixel(2, 1).0, [9, 8, 7, 200]);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = InsertBitmap::decode(b"definitely not an image").unwrap_err();
    assert!(matches!(err, BoilerError::Decode(_)));
}

#[test]
fn missing_file_is_a_decode_error() {
    let err = InsertBitmap::open(Path::new("/nonexistent/boiler/avatar.png")).unwrap_err();
    assert!(matches!(err, BoilerError::Decode(_)));
    assert!(err.to_string().contains("avatar.png"));
}

#[test]
fn clones_share_pixels() {
    let a = InsertBitmap::from_image(RgbaImage::new(4, 4)).unwrap();
    let b = a.clone();
    assert!(std::ptr::eq(a.image(), b.image()));
}

#[test]
fn rejects_empty_image() {
    assert!(InsertBitmap::from_image(RgbaImage::new(0, 5)).is_err());
}
