use super::*;
use crate::foundation::core::Channels;

fn zoom(v: f64) -> ZoomFactor {
    ZoomFactor::new(v).unwrap()
}

fn checker(size: u32, seed: u32) -> ImageBuffer {
    let mut data = Vec::new();
    for y in 0..size {
        for x in 0..size {
            let v = if (x / 4 + y / 4 + seed) % 2 == 0 { 0.9 } else { 0.1 };
            data.extend_from_slice(&[v, v * 0.5, 1.0 - v]);
        }
    }
    ImageBuffer::from_raw(size, size, Channels::Rgb, data).unwrap()
}

fn ramp(width: u32, height: u32, tint: f32) -> ImageBuffer {
    let mut data = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let u = x as f32 / (width - 1) as f32;
            let v = y as f32 / (height - 1) as f32;
            data.extend_from_slice(&[u, v, tint]);
        }
    }
    ImageBuffer::from_raw(width, height, Channels::Rgb, data).unwrap()
}

#[test]
fn plan_length_is_frames_times_transitions() {
    let plan = frame_plan(4, zoom(1.5), 7, Ease::InOutSine).unwrap();
    assert_eq!(plan.len(), 21);
}

#[test]
fn plan_starts_at_first_image_and_ends_fully_magnified() {
    let plan = frame_plan(3, zoom(2.0), 5, Ease::InOutSine).unwrap();
    let first = plan.first().unwrap();
    let last = plan.last().unwrap();
    assert_eq!(first.source_index, 0);
    assert!((first.local_zoom - 2.0).abs() < 1e-12);
    assert_eq!(last.source_index, 1);
    assert!((last.local_zoom - 4.0).abs() < 1e-9);
}

#[test]
fn plan_source_index_never_decreases() {
    let plan = frame_plan(5, zoom(1.3), 9, Ease::InOutSine).unwrap();
    for pair in plan.windows(2) {
        assert!(pair[0].source_index <= pair[1].source_index);
    }
    assert!(plan.iter().all(|s| s.source_index <= 3));
}

#[test]
fn single_frame_plan_uses_position_zero() {
    let plan = frame_plan(2, zoom(1.5), 1, Ease::InOutSine).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].source_index, 0);
    assert!((plan[0].local_zoom - 1.5).abs() < 1e-12);
}

#[test]
fn plan_rejects_bad_inputs() {
    assert!(frame_plan(1, zoom(1.5), 10, Ease::Linear).is_err());
    assert!(frame_plan(3, zoom(1.5), 0, Ease::Linear).is_err());
}

#[test]
fn modes_reorder_base_sequence() {
    let base = vec![1, 2, 3];
    assert_eq!(apply_mode(base.clone(), PlaybackMode::ZoomOut), vec![1, 2, 3]);
    assert_eq!(apply_mode(base.clone(), PlaybackMode::ZoomIn), vec![3, 2, 1]);
    assert_eq!(
        apply_mode(base.clone(), PlaybackMode::ZoomOutIn),
        vec![1, 2, 3, 3, 2, 1]
    );
    assert_eq!(
        apply_mode(base, PlaybackMode::ZoomInOut),
        vec![3, 2, 1, 1, 2, 3]
    );
}

#[test]
fn mode_names_parse_and_serialize() {
    for mode in PlaybackMode::ALL {
        assert_eq!(mode.name().parse::<PlaybackMode>().unwrap(), mode);
        assert_eq!(
            serde_json::to_string(&mode).unwrap(),
            format!("\"{}\"", mode.name())
        );
    }
    assert!("zoom-sideways".parse::<PlaybackMode>().is_err());
}

#[test]
fn rendered_frame_keeps_source_shape() {
    let images = vec![checker(24, 0), checker(24, 1)];
    let sample = FrameSample {
        source_index: 1,
        local_zoom: 1.7,
    };
    let frame = render_frame(&images, sample, Resample::Bicubic).unwrap();
    assert_eq!(frame.shape(), (24, 24, 3));
}

#[test]
fn rendered_frame_is_centered_magnification_of_selected_image() {
    let images = vec![ramp(30, 18, 0.0), ramp(30, 18, 0.5)];
    let sample = FrameSample {
        source_index: 1,
        local_zoom: 1.5,
    };
    let frame = render_frame(&images, sample, Resample::Bicubic).unwrap();

    let enlarged = resize_image(&images[1], 45, 27, Resample::Bicubic).unwrap();
    let expected = center_crop(&enlarged, 30, 18).unwrap();
    assert_eq!(frame, expected);

    let other = render_frame(
        &images,
        FrameSample {
            source_index: 0,
            ..sample
        },
        Resample::Bicubic,
    )
    .unwrap();
    assert_ne!(frame, other);
    assert_ne!(frame, resize_image(&images[1], 30, 18, Resample::Bicubic).unwrap());
}

#[test]
fn render_frame_rejects_unrepresentable_zoom() {
    let images = vec![checker(8, 0), checker(8, 1)];
    for local_zoom in [1e12, f64::INFINITY] {
        let sample = FrameSample {
            source_index: 0,
            local_zoom,
        };
        let err = render_frame(&images, sample, Resample::Bicubic).unwrap_err();
        assert!(err.is_invalid_parameter());
    }
}

#[test]
fn compose_rejects_mismatched_shapes() {
    let images = vec![checker(16, 0), checker(20, 0)];
    let err = compose(&images, zoom(1.5), 3, PlaybackMode::ZoomOut).unwrap_err();
    assert!(err.is_invalid_parameter());
}

#[test]
fn compose_rejects_empty_sequence_and_zero_frames() {
    assert!(compose(&[], zoom(1.5), 3, PlaybackMode::ZoomOut).is_err());
    let images = vec![checker(8, 0), checker(8, 1)];
    assert!(compose(&images, zoom(1.5), 0, PlaybackMode::ZoomOut).is_err());
}

#[test]
fn parallel_matches_sequential() {
    let images = vec![checker(20, 0), checker(20, 1), checker(20, 0)];
    let mut opts = ComposeOptions {
        zoom: zoom(1.4),
        frames_per_transition: 4,
        mode: PlaybackMode::ZoomInOut,
        ..ComposeOptions::default()
    };
    let sequential = compose_with(&images, &opts).unwrap();
    opts.threading = ComposeThreading {
        parallel: true,
        threads: Some(2),
    };
    let parallel = compose_with(&images, &opts).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn zero_threads_is_rejected() {
    let images = vec![checker(8, 0), checker(8, 1)];
    let opts = ComposeOptions {
        frames_per_transition: 2,
        threading: ComposeThreading {
            parallel: true,
            threads: Some(0),
        },
        ..ComposeOptions::default()
    };
    assert!(compose_with(&images, &opts).unwrap_err().is_invalid_parameter());
}

#[test]
fn output_size_fit_keeps_aspect() {
    let src = Dimensions::new(200, 100);
    let wide = OutputSize {
        width: 1000,
        height: 100,
        keep_aspect: true,
    };
    assert_eq!(wide.fit(src).unwrap(), Dimensions::new(200, 100));
    let tall = OutputSize {
        width: 100,
        height: 1000,
        keep_aspect: true,
    };
    assert_eq!(tall.fit(src).unwrap(), Dimensions::new(100, 50));
    let stretch = OutputSize {
        width: 30,
        height: 40,
        keep_aspect: false,
    };
    assert_eq!(stretch.fit(src).unwrap(), Dimensions::new(30, 40));
}

#[test]
fn output_size_is_applied_to_every_frame() {
    let images = vec![checker(16, 0), checker(16, 1)];
    let opts = ComposeOptions {
        frames_per_transition: 3,
        mode: PlaybackMode::ZoomOutIn,
        output_size: Some(OutputSize {
            width: 40,
            height: 20,
            keep_aspect: true,
        }),
        ..ComposeOptions::default()
    };
    let frames = compose_with(&images, &opts).unwrap();
    assert_eq!(frames.len(), 6);
    assert!(frames.iter().all(|f| f.shape() == (20, 20, 3)));
}

#[test]
fn options_deserialize_with_defaults() {
    let opts: ComposeOptions =
        serde_json::from_str(r#"{ "zoom": 2.0, "mode": "zoom-in-out" }"#).unwrap();
    assert_eq!(opts.zoom.get(), 2.0);
    assert_eq!(opts.mode, PlaybackMode::ZoomInOut);
    assert_eq!(opts.frames_per_transition, 24);
    assert_eq!(opts.ease, Ease::InOutSine);
    assert!(serde_json::from_str::<ComposeOptions>(r#"{ "zoom": 1.0 }"#).is_err());
}
