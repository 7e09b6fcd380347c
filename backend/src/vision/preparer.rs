use image::{DynamicImage, Rgb, RgbImage, imageops};

#[derive(Debug, thiserror::Error)]
#[error("snapshot could not be decoded: {0}")]
pub struct InvalidImageError(#[from] image::ImageError);

/// Scales the snapshot down to fit the target (never up) and centers it on a
/// white canvas of exactly the target dimensions.
pub fn prepare_snapshot(
    snapshot: &[u8],
    target: (u32, u32),
) -> Result<RgbImage, InvalidImageError> {
    let (target_w, target_h) = target;
    let rgb = image::load_from_memory(snapshot)?.to_rgb8();

    let scaled = if rgb.width() > target_w || rgb.height() > target_h {
        DynamicImage::ImageRgb8(rgb)
            .thumbnail(target_w, target_h)
            .to_rgb8()
    } else {
        rgb
    };

    let mut canvas = RgbImage::from_pixel(target_w, target_h, Rgb([255, 255, 255]));
    let offset_x = (target_w - scaled.width()) / 2;
    let offset_y = (target_h - scaled.height()) / 2;
    imageops::overlay(&mut canvas, &scaled, i64::from(offset_x), i64::from(offset_y));
    Ok(canvas)
}
