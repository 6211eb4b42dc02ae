//! Lightweight image inspection.

use crate::image::io::image_error;
use crate::util::FrameMatchResult;
use std::path::Path;

/// Returns `(width, height)` of an image, reading only its header.
pub fn image_dimensions<P: AsRef<Path>>(path: P) -> FrameMatchResult<(u32, u32)> {
    let path = path.as_ref();
    image::image_dimensions(path).map_err(|err| image_error(path, err))
}
