//! Image format sniffing.
//!
//! Only the leading magic bytes are inspected; nothing is decoded.

use image::ImageFormat;

/// Detect the encoded image format of `data` from its signature.
pub fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    image::guess_format(data).ok()
}

/// Whether `data` is an image the cache can store (PNG or JPEG).
pub fn is_valid_image_format(data: &[u8]) -> bool {
    matches!(
        detect_format(data),
        Some(ImageFormat::Png) | Some(ImageFormat::Jpeg)
    )
}
