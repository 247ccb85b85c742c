//! Image normalization for the classification models.
//!
//! Both classifiers expect:
//! - Input size: 224×224 pixels
//! - Channel order: RGB, intensities scaled to [0, 1] via pixel/255
//! - Tensor layout: NHWC [batch, height, width, channels]

use image::DynamicImage;
use image::imageops::FilterType;
use ndarray::Array4;

use crate::error::InferenceError;

/// Side length both models were trained on.
pub const IMAGE_SIZE: u32 = 224;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// Decode arbitrary image bytes and normalize them for inference.
///
/// Malformed bytes fail here; no format validation happens beforehand.
pub fn preprocess(image_bytes: &[u8]) -> Result<Array4<f32>, InferenceError> {
    let decoded = image::load_from_memory(image_bytes)?;
    normalize(&decoded)
}

/// Resize to `IMAGE_SIZE`², convert to RGB (grayscale and alpha inputs
/// included), and emit a `(1, 224, 224, 3)` tensor with values in [0, 1].
pub fn normalize(image: &DynamicImage) -> Result<Array4<f32>, InferenceError> {
    let resized = image.resize_exact(IMAGE_SIZE, IMAGE_SIZE, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    // NHWC with standard layout is exactly the raw RGB byte order, so the
    // scaled buffer reshapes directly instead of per-pixel 4D indexing.
    let scaled: Vec<f32> = rgb.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();

    let size = IMAGE_SIZE as usize;
    let tensor = Array4::from_shape_vec((1, size, size, CHANNELS), scaled)?;
    Ok(tensor)
}
