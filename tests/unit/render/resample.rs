use super::*;

fn gradient(width: u32, height: u32) -> ImageBuffer {
    let mut data = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let v = (x + y) as f32 / (width + height) as f32;
            data.extend_from_slice(&[v, 1.0 - v, 0.5]);
        }
    }
    ImageBuffer::from_raw(width, height, Channels::Rgb, data).unwrap()
}

#[test]
fn resize_produces_requested_shape() {
    let img = gradient(8, 6);
    for filter in Resample::ALL {
        let out = resize_image(&img, 13, 4, filter).unwrap();
        assert_eq!(out.shape(), (4, 13, 3));
    }
}

#[test]
fn resize_constant_image_stays_constant() {
    let img = ImageBuffer::filled(10, 10, Channels::Rgba, 0.3).unwrap();
    let out = resize_image(&img, 23, 17, Resample::Bicubic).unwrap();
    assert!(out.as_slice().iter().all(|v| (v - 0.3).abs() < 1e-4));
}

#[test]
fn resize_clamps_cubic_overshoot() {
    let mut data = vec![0.0f32; 16];
    data[5] = 1.0;
    data[6] = 1.0;
    let mask = Mask::from_raw(4, 4, data).unwrap();
    let out = resize_mask(&mask, 15, 15, Resample::Bicubic).unwrap();
    assert!(out.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn resize_rejects_empty_source_and_target() {
    let empty = ImageBuffer::from_raw(0, 4, Channels::Rgb, vec![]).unwrap();
    assert!(resize_image(&empty, 4, 4, Resample::Bilinear).is_err());
    let img = gradient(4, 4);
    assert!(resize_image(&img, 0, 4, Resample::Bilinear).is_err());
}

#[test]
fn center_crop_takes_middle_window() {
    let img = gradient(6, 5);
    let out = center_crop(&img, 2, 2).unwrap();
    assert_eq!(out.shape(), (2, 2, 3));
    assert_eq!(out.pixel(0, 0), img.pixel(1, 2));
    assert_eq!(out.pixel(1, 1), img.pixel(2, 3));
}

#[test]
fn center_crop_rejects_larger_window() {
    let img = gradient(4, 4);
    assert!(center_crop(&img, 5, 4).is_err());
}

#[test]
fn scale_dims_rounds() {
    assert_eq!(
        scale_dims(Dimensions::new(64, 33), 1.5).unwrap(),
        Dimensions::new(96, 50)
    );
}

#[test]
fn scale_dims_rejects_out_of_range_results() {
    let dims = Dimensions::new(100, 100);
    assert!(scale_dims(dims, 1e12).unwrap_err().is_invalid_parameter());
    assert!(scale_dims(dims, f64::INFINITY).unwrap_err().is_invalid_parameter());
    assert!(scale_dims(dims, f64::NAN).unwrap_err().is_invalid_parameter());
    assert_eq!(
        scale_dims(Dimensions::new(1, 1), f64::from(u32::MAX)).unwrap(),
        Dimensions::new(u32::MAX, u32::MAX)
    );
}

#[test]
fn resize_rejects_targets_past_addressable_size() {
    let img = gradient(4, 4);
    let err = resize_image(&img, u32::MAX, u32::MAX, Resample::Nearest).unwrap_err();
    assert!(err.is_invalid_parameter());
}

#[test]
fn resample_names_parse() {
    for r in Resample::ALL {
        assert_eq!(r.name().parse::<Resample>().unwrap(), r);
    }
    assert_eq!(
        "nearest-exact".parse::<Resample>().unwrap(),
        Resample::Nearest
    );
    assert!("area".parse::<Resample>().unwrap_err().is_invalid_parameter());
}
