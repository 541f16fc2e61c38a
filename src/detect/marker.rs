use image::{Rgba, RgbaImage};

use crate::foundation::core::Region;

/// Threshold test applied to a single color channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ChannelRule {
    /// Channel value must be strictly greater than the bound.
    Above(u8),
    /// Channel value must be strictly less than the bound.
    Below(u8),
}

impl ChannelRule {
    pub fn matches(self, v: u8) -> bool {
        match self {
            Self::Above(t) => v > t,
            Self::Below(t) => v < t,
        }
    }
}

/// A reserved template color, expressed as per-channel tolerance rules.
///
/// Alpha is ignored: only the RGB channels take part in the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MarkerColor {
    pub r: ChannelRule,
    pub g: ChannelRule,
    pub b: ChannelRule,
}

impl MarkerColor {
    /// `#00ff00`, tolerant of GIF palette drift.
    pub const GREEN: Self = Self {
        r: ChannelRule::Below(100),
        g: ChannelRule::Above(200),
        b: ChannelRule::Below(100),
    };

    /// `#ff00ff`.
    pub const MAGENTA: Self = Self {
        r: ChannelRule::Above(200),
        g: ChannelRule::Below(100),
        b: ChannelRule::Above(200),
    };

    /// Build a marker around an RGB target: bright channels must stay above
    /// `target - tolerance`, dark ones below `target + tolerance`.
    pub fn from_rgb(target: [u8; 3], tolerance: u8) -> Self {
        fn rule(v: u8, tol: u8) -> ChannelRule {
            if v >= 128 {
                ChannelRule::Above(v.saturating_sub(tol))
            } else {
                ChannelRule::Below(v.saturating_add(tol))
            }
        }
        Self {
            r: rule(target[0], tolerance),
            g: rule(target[1], tolerance),
            b: rule(target[2], tolerance),
        }
    }

    pub fn matches(&self, px: &Rgba<u8>) -> bool {
        let [r, g, b, _] = px.0;
        self.r.matches(r) && self.g.matches(g) && self.b.matches(b)
    }
}

/// Bounding box of every pixel in `frame` that matches `marker`.
///
/// Disjoint blobs of the same color are merged into a single box. Returns
/// `None` when nothing matches.
pub fn detect_region(frame: &RgbaImage, marker: &MarkerColor) -> Option<Region> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut any = false;

    for (x, y, px) in frame.enumerate_pixels() {
        if !marker.matches(px) {
            continue;
        }
        any = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    if !any {
        return None;
    }

    let region = Region {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    };
    debug_assert!(region.fits_within(frame.width(), frame.height()));
    Some(region)
}

/// Number of pixels in `frame` matching `marker`.
pub fn count_matches(frame: &RgbaImage, marker: &MarkerColor) -> u64 {
    frame.pixels().filter(|px| marker.matches(px)).count() as u64
}

#[cfg(test)]
#[path = "../../tests/unit/detect/marker.rs"]
mod tests;
