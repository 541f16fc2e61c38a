use image::{RgbaImage, imageops::FilterType};

use crate::{composite::insert::InsertBitmap, foundation::core::Region};

/// Resize `insert` to the region's size (Lanczos) and optionally soften it
/// with a Gaussian of standard deviation `blur_radius`.
///
/// The blur trims high-frequency detail that lossy GIF compression handles badly.
pub fn fit_insert(insert: &InsertBitmap, region: Region, blur_radius: f32) -> RgbaImage {
    let resized = image::imageops::resize(
        insert.image(),
        region.width,
        region.height,
        FilterType::Lanczos3,
    );
    if blur_radius > 0.0 {
        return image::imageops::blur(&resized, blur_radius);
    }
    resized
}

/// Blend `src` onto `dst` at `(x, y)` using `src`'s own alpha as the mask.
///
/// Every channel, alpha included, is interpolated between destination and
/// source by the mask. Pixels falling outside `dst` are skipped.
pub fn paste_masked(dst: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) {
    let (dw, dh) = dst.dimensions();
    for (sx, sy, spx) in src.enumerate_pixels() {
        let m = spx[3];
        if m == 0 {
            continue;
        }
        let (Some(dx), Some(dy)) = (x.checked_add(sx), y.checked_add(sy)) else {
            continue;
        };
        if dx >= dw || dy >= dh {
            continue;
        }
        let dpx = dst.get_pixel_mut(dx, dy);
        if m == 255 {
            *dpx = *spx;
            continue;
        }
        for c in 0..4 {
            dpx[c] = lerp_u8(dpx[c], spx[c], m);
        }
    }
}

/// Paste the fitted insert into a copy of `frame`. With no region the frame
/// comes back untouched.
pub fn composite(
    frame: &RgbaImage,
    insert: &InsertBitmap,
    region: Option<Region>,
    blur_radius: f32,
) -> RgbaImage {
    let mut out = frame.clone();
    composite_in_place(&mut out, insert, region, blur_radius);
    out
}

pub(crate) fn composite_in_place(
    frame: &mut RgbaImage,
    insert: &InsertBitmap,
    region: Option<Region>,
    blur_radius: f32,
) {
    let Some(region) = region else {
        return;
    };
    let fitted = fit_insert(insert, region, blur_radius);
    paste_masked(frame, &fitted, region.x, region.y);
}

fn lerp_u8(dst: u8, src: u8, m: u8) -> u8 {
    let m = u32::from(m);
    ((u32::from(src) * m + u32::from(dst) * (255 - m) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/composite/paste.rs"]
mod tests;
