//! Image file to data URL encoding.

use crate::domain::{Result, RosterError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::ImageFormat;

/// Encodes raw image bytes as a `data:<mime>;base64,<payload>` URL.
///
/// The format is sniffed from the magic bytes and the image is fully decoded
/// once, so a truncated or mislabelled file is rejected here rather than shown
/// broken later. The original bytes are embedded unchanged.
///
/// Supported formats: PNG, JPEG, GIF, WebP, BMP.
///
/// # Errors
///
/// Returns [`RosterError::ImageDecode`] for empty input, an unrecognized or
/// unsupported format, or bytes that do not decode.
pub fn encode_data_url(bytes: &[u8]) -> Result<String> {
    if bytes.is_empty() {
        return Err(RosterError::ImageDecode("image file is empty".to_string()));
    }

    let format = image::guess_format(bytes)
        .map_err(|e| RosterError::ImageDecode(format!("unrecognized image format: {e}")))?;

    let mime = match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        other => {
            return Err(RosterError::ImageDecode(format!(
                "unsupported image format: {other:?}"
            )))
        }
    };

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| RosterError::ImageDecode(format!("invalid {mime} data: {e}")))?;

    tracing::debug!(
        mime = mime,
        width = decoded.width(),
        height = decoded.height(),
        size = bytes.len(),
        "image encoded"
    );

    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
