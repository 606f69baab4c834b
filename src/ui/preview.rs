use eframe::egui;

/// Longest edge kept when converting a selected image into a texture.
pub const MAX_PREVIEW_EDGE: u32 = 1024;

/// Decode selected image bytes into RGBA pixels bounded to `max_edge`.
pub fn decode_preview_rgba(bytes: &[u8], max_edge: u32) -> Result<(Vec<u8>, [usize; 2]), String> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|error| format!("Failed to decode selected image: {error}"))?;

    let bounded = if decoded.width() > max_edge || decoded.height() > max_edge {
        decoded.thumbnail(max_edge, max_edge)
    } else {
        decoded
    };

    let rgba = bounded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok((rgba.into_raw(), size))
}

/// Build the preview texture for a selected file. The returned handle is the
/// workflow's preview resource; dropping it frees the texture.
pub fn load_preview_texture(
    ctx: &egui::Context,
    name: &str,
    bytes: &[u8],
) -> Result<egui::TextureHandle, String> {
    let (pixels, size) = decode_preview_rgba(bytes, MAX_PREVIEW_EDGE)?;
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
    Ok(ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |_x, _y| Rgb([120_u8, 40_u8, 200_u8]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Jpeg)
            .expect("jpeg should encode");
        buffer.into_inner()
    }

    #[test]
    fn decode_preserves_small_image_dimensions() {
        let bytes = jpeg_bytes(640, 360);
        let (pixels, size) = decode_preview_rgba(&bytes, 1024).expect("jpeg should decode");
        assert_eq!(size, [640, 360]);
        assert_eq!(pixels.len(), 640 * 360 * 4);
    }

    #[test]
    fn decode_bounds_oversized_images() {
        let bytes = jpeg_bytes(2048, 1024);
        let (_, size) = decode_preview_rgba(&bytes, 512).expect("jpeg should decode");
        assert!(size[0] <= 512 && size[1] <= 512);
        assert!(size[0] > 0 && size[1] > 0);
    }

    #[test]
    fn decode_rejects_non_image_bytes() {
        let error = decode_preview_rgba(b"not an image", 512)
            .expect_err("garbage bytes must not decode");
        assert!(error.starts_with("Failed to decode selected image"));
    }
}
