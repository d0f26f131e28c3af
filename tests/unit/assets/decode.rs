use std::io::Cursor;

use super::*;

fn png_bytes(img: DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_rgb_png_normalizes() {
    let src = RgbImage::from_raw(2, 1, vec![0, 255, 51, 255, 0, 102]).unwrap();
    let img = decode_image(&png_bytes(DynamicImage::ImageRgb8(src))).unwrap();
    assert_eq!(img.shape(), (1, 2, 3));
    assert_eq!(img.pixel(0, 0)[0], 0.0);
    assert_eq!(img.pixel(0, 0)[1], 1.0);
    assert!((img.pixel(0, 0)[2] - 0.2).abs() < 1e-6);
}

#[test]
fn decode_keeps_alpha_channel() {
    let src = RgbaImage::from_raw(1, 1, vec![10, 20, 30, 128]).unwrap();
    let img = decode_image(&png_bytes(DynamicImage::ImageRgba8(src))).unwrap();
    assert_eq!(img.channels(), Channels::Rgba);
}

#[test]
fn quantize_clamps_and_rounds() {
    assert_eq!(quantize(-0.5), 0);
    assert_eq!(quantize(0.5), 128);
    assert_eq!(quantize(2.0), 255);
}

#[test]
fn dynamic_round_trip_preserves_8bit_values() {
    let src = RgbImage::from_raw(2, 2, vec![0, 64, 128, 255, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    let img = image_from_dynamic(&DynamicImage::ImageRgb8(src.clone())).unwrap();
    let back = image_to_dynamic(&img).unwrap();
    assert_eq!(back.to_rgb8(), src);
}

#[test]
fn mask_becomes_grayscale() {
    let mask = Mask::from_raw(3, 1, vec![0.0, 0.5, 1.0]).unwrap();
    let gray = mask_to_gray(&mask).unwrap();
    assert_eq!(gray.into_raw(), vec![0, 128, 255]);
}

#[test]
fn decode_garbage_fails() {
    assert!(decode_image(b"not an image").is_err());
}
