use framematch::analysis::image_dimensions;
use framematch::compose::{
    combine_horizontally, compose_frame, ElementPlacement, StoryboardLayout,
};
use framematch::FrameMatchError;
use image::{Rgba, RgbaImage};
use std::fs;

const RED: Rgba<u8> = Rgba([200, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 220, 255]);

fn close_to(pixel: &Rgba<u8>, expected: Rgba<u8>) -> bool {
    pixel
        .0
        .iter()
        .zip(expected.0.iter())
        .all(|(&a, &b)| (a as i32 - b as i32).abs() <= 3)
}

#[test]
fn elements_are_scaled_centred_and_drawn() {
    let dir = tempfile::tempdir().unwrap();
    let background = dir.path().join("background.png");
    let element = dir.path().join("logo.png");
    let output = dir.path().join("frame.png");
    RgbaImage::from_pixel(200, 120, RED).save(&background).unwrap();
    RgbaImage::from_pixel(50, 25, BLUE).save(&element).unwrap();
    let element_bytes = fs::read(&element).unwrap();

    let json = format!(
        r#"[{{"image_path": {:?}, "start_position_x": "10", "start_position_y": 10,
              "target_width": 100, "target_height": "100"}}]"#,
        element.to_string_lossy()
    );
    let elements = ElementPlacement::parse_list(&json).unwrap();
    let written = compose_frame(&background, &elements, &output).unwrap();
    assert_eq!(written, output);

    // 50x25 fits a 100x100 box as 100x50, centred at (10, 35).
    let frame = image::open(&output).unwrap().to_rgba8();
    assert_eq!(frame.dimensions(), (200, 120));
    assert!(close_to(frame.get_pixel(60, 60), BLUE));
    assert!(close_to(frame.get_pixel(60, 20), RED));
    assert!(close_to(frame.get_pixel(60, 100), RED));
    assert!(close_to(frame.get_pixel(150, 60), RED));

    // The element file is never rewritten.
    assert_eq!(fs::read(&element).unwrap(), element_bytes);
    assert_eq!(image_dimensions(&element).unwrap(), (50, 25));
}

#[test]
fn missing_element_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let background = dir.path().join("background.png");
    RgbaImage::from_pixel(20, 20, RED).save(&background).unwrap();

    let elements = vec![ElementPlacement {
        image_path: dir.path().join("absent.png"),
        start_position_x: 0,
        start_position_y: 0,
        target_width: 10,
        target_height: 10,
    }];
    let err = compose_frame(&background, &elements, dir.path().join("out.png")).unwrap_err();
    assert!(matches!(err, FrameMatchError::Io { .. }));
    assert!(!dir.path().join("out.png").exists());
}

#[test]
fn composed_frames_form_a_storyboard() {
    let dir = tempfile::tempdir().unwrap();
    let frames: Vec<_> = (0..3)
        .map(|i| {
            let path = dir.path().join(format!("frame_{i}.png"));
            RgbaImage::from_pixel(30 + 10 * i, 20, BLUE).save(&path).unwrap();
            path
        })
        .collect();

    let strip = combine_horizontally(&frames, StoryboardLayout::default()).unwrap();
    assert_eq!(strip.dimensions(), (30 + 40 + 50 + 2 * 100 + 2 * 200, 20 + 2 * 200));
    assert_eq!(*strip.get_pixel(200, 200), BLUE);
    assert_eq!(*strip.get_pixel(199, 200), Rgba([255, 255, 255, 255]));
    assert_eq!(*strip.get_pixel(200 + 30 + 100, 210), BLUE);
}
