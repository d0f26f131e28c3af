use super::*;

#[test]
fn from_raw_rejects_length_mismatch() {
    let err = ImageBuffer::from_raw(2, 2, Channels::Rgb, vec![0.0; 11]).unwrap_err();
    assert!(err.is_invalid_parameter());
    ImageBuffer::from_raw(2, 2, Channels::Rgb, vec![0.0; 12]).unwrap();
}

#[test]
fn zero_sized_buffers_are_representable() {
    let img = ImageBuffer::from_raw(0, 10, Channels::Rgba, vec![]).unwrap();
    assert!(img.is_empty());
    assert_eq!(img.shape(), (10, 0, 4));
}

#[test]
fn pixel_indexing_is_row_major_hwc() {
    let data: Vec<f32> = (0..2 * 3 * 3).map(|v| v as f32).collect();
    let img = ImageBuffer::from_raw(3, 2, Channels::Rgb, data).unwrap();
    assert_eq!(img.pixel(1, 2), &[15.0, 16.0, 17.0]);
    assert_eq!(img.get(0, 1, 2), 5.0);
    assert_eq!(img.row(1).len(), 9);
}

#[test]
fn mask_inversion_flips_polarity() {
    let mask = Mask::from_raw(2, 1, vec![1.0, 0.25]).unwrap();
    let inv = mask.inverted();
    assert_eq!(inv.as_slice(), &[0.0, 0.75]);
    assert_eq!(inv.shape(), (1, 2));
}

#[test]
fn zoom_factor_requires_greater_than_one() {
    assert!(ZoomFactor::new(1.0).is_err());
    assert!(ZoomFactor::new(0.5).is_err());
    assert!(ZoomFactor::new(f64::NAN).is_err());
    assert_eq!(ZoomFactor::new(1.5).unwrap().get(), 1.5);
}

#[test]
fn zoom_factor_parses_preset_labels() {
    assert_eq!("1.25x".parse::<ZoomFactor>().unwrap().get(), 1.25);
    assert_eq!(" 2.0X ".parse::<ZoomFactor>().unwrap().get(), 2.0);
    assert_eq!("1.5".parse::<ZoomFactor>().unwrap().get(), 1.5);
    assert!("x".parse::<ZoomFactor>().is_err());
    assert!("1x".parse::<ZoomFactor>().is_err());
}

#[test]
fn zoom_factor_serde_validates() {
    let z: ZoomFactor = serde_json::from_str("1.5").unwrap();
    assert_eq!(z.get(), 1.5);
    assert!(serde_json::from_str::<ZoomFactor>("0.9").is_err());
}

#[test]
fn channels_from_count() {
    assert_eq!(Channels::from_count(3).unwrap(), Channels::Rgb);
    assert_eq!(Channels::from_count(4).unwrap(), Channels::Rgba);
    assert!(Channels::from_count(1).is_err());
}
