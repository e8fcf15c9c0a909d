//! Inline-data preparation for vision analysis
//!
//! Large statement scans blow up request size and vision token cost without
//! improving extraction. Images over the dimension cap are downscaled and
//! re-encoded as JPEG before transmission; PDFs and already-small images
//! pass through byte-identical.

use crate::intake::{MIME_JPEG, MIME_PDF};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Maximum image dimension (width or height) sent to the model
const MAX_DIMENSION: u32 = 1600;

/// Prepare document bytes for the inline request part.
///
/// Returns the MIME type and bytes actually transmitted. When an image is
/// re-encoded, the returned MIME type is `image/jpeg` regardless of the
/// upload's original type.
pub fn prepare_inline_data(mime_type: &'static str, bytes: &[u8]) -> (&'static str, Vec<u8>) {
    if mime_type == MIME_PDF {
        return (mime_type, bytes.to_vec());
    }

    let img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            // Undecodable image: transmit as-is and let the model judge it
            tracing::warn!("[Vision] Could not decode image for downscaling: {}", e);
            return (mime_type, bytes.to_vec());
        }
    };

    let (width, height) = (img.width(), img.height());
    if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
        return (mime_type, bytes.to_vec());
    }

    let resized = resize_to_cap(img);

    // JPEG cannot carry an alpha channel; flatten before encoding
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    if let Err(e) = rgb.write_to(&mut cursor, ImageFormat::Jpeg) {
        tracing::warn!("[Vision] JPEG re-encode failed, sending original: {}", e);
        return (mime_type, bytes.to_vec());
    }

    tracing::debug!(
        "[Vision] Downscaled {}x{} image to fit {} px, {} -> {} bytes",
        width,
        height,
        MAX_DIMENSION,
        bytes.len(),
        buffer.len()
    );

    (MIME_JPEG, buffer)
}

/// Scale the image so its longest side is `MAX_DIMENSION`
fn resize_to_cap(img: DynamicImage) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let scale = MAX_DIMENSION as f32 / width.max(height) as f32;
    let new_width = (width as f32 * scale) as u32;
    let new_height = (height as f32 * scale) as u32;

    img.resize(
        new_width.max(1),
        new_height.max(1),
        image::imageops::FilterType::Lanczos3,
    )
}
