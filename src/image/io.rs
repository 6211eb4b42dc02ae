//! Loading helpers built on the `image` crate.

use crate::image::{ColorMode, ImageView, OwnedImage, PlanarImage};
use crate::util::{FrameMatchError, FrameMatchResult};
use image::ImageError;
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> FrameMatchResult<ImageView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> FrameMatchResult<OwnedImage> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk and converts it to a grayscale owned image.
///
/// Filesystem failures map to [`FrameMatchError::Io`]; anything the decoder
/// rejects maps to [`FrameMatchError::ImageDecode`].
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> FrameMatchResult<OwnedImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| image_error(path, err))?;
    owned_from_dynamic_image(&img)
}

/// Splits a dynamic image into the planes `mode` asks for.
pub fn planar_from_dynamic_image(
    img: &image::DynamicImage,
    mode: ColorMode,
) -> FrameMatchResult<PlanarImage> {
    match mode {
        ColorMode::Luma => Ok(PlanarImage::from_gray(owned_from_dynamic_image(img)?)),
        ColorMode::Rgb => {
            let rgb = img.to_rgb8();
            let width = rgb.width() as usize;
            let height = rgb.height() as usize;
            let mut planes: Vec<Vec<u8>> = (0..3)
                .map(|_| Vec::with_capacity(width * height))
                .collect();
            for pixel in rgb.pixels() {
                for (plane, &value) in planes.iter_mut().zip(pixel.0.iter()) {
                    plane.push(value);
                }
            }
            let planes = planes
                .into_iter()
                .map(|data| OwnedImage::new(data, width, height))
                .collect::<FrameMatchResult<Vec<_>>>()?;
            PlanarImage::from_planes(planes)
        }
    }
}

/// Loads an image from disk into planes for matching.
pub fn load_planar_image<P: AsRef<Path>>(
    path: P,
    mode: ColorMode,
) -> FrameMatchResult<PlanarImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| image_error(path, err))?;
    planar_from_dynamic_image(&img, mode)
}

/// Loads an image from disk as RGBA.
pub fn load_rgba_image<P: AsRef<Path>>(path: P) -> FrameMatchResult<image::RgbaImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| image_error(path, err))?;
    Ok(img.to_rgba8())
}

pub(crate) fn image_error(path: &Path, err: ImageError) -> FrameMatchError {
    match err {
        ImageError::IoError(io) => FrameMatchError::io(path, &io),
        other => FrameMatchError::ImageDecode {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{load_gray_image, load_planar_image, view_from_gray_image};
    use crate::{ColorMode, FrameMatchError};
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn gray_image_view_keeps_pixels() {
        let mut img = GrayImage::new(3, 2);
        img.put_pixel(2, 1, Luma([200]));
        let view = view_from_gray_image(&img).unwrap();
        assert_eq!(view.width(), 3);
        assert_eq!(view.get(2, 1).copied(), Some(200));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = load_gray_image(&path).unwrap_err();
        assert!(
            matches!(err, FrameMatchError::ImageDecode { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_gray_image(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, FrameMatchError::Io { .. }), "unexpected error: {err:?}");
    }

    #[test]
    fn rgb_mode_splits_channels_into_planes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swatch.png");
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([200, 10, 30]));
        img.put_pixel(1, 0, Rgb([0, 59, 255]));
        img.save(&path).unwrap();

        let planes = load_planar_image(&path, ColorMode::Rgb).unwrap();
        assert_eq!(planes.channels(), 3);
        assert_eq!(planes.plane(0).unwrap().row(0).unwrap(), &[200, 0]);
        assert_eq!(planes.plane(1).unwrap().row(0).unwrap(), &[10, 59]);
        assert_eq!(planes.plane(2).unwrap().row(0).unwrap(), &[30, 255]);

        let luma = load_planar_image(&path, ColorMode::Luma).unwrap();
        assert_eq!(luma.channels(), 1);
        assert_eq!((luma.width(), luma.height()), (2, 1));
    }
}
