use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Width/height of the standard ID-1 card (85.60 x 53.98 mm).
pub const CARD_ASPECT_RATIO: f64 = 1.586;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (not laid out / not decoded yet).
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Positive, finite width/height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub fn new(ratio: f64) -> Result<Self, Error> {
        if ratio.is_finite() && ratio > 0.0 {
            Ok(Self(ratio))
        } else {
            Err(Error::InvalidAspectRatio(ratio))
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self(CARD_ASPECT_RATIO)
    }
}

impl<'de> Deserialize<'de> for AspectRatio {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        AspectRatio::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Signed translation to subtract from the media's top-left corner.
///
/// `i64` holds every offset reachable from `u32` sizes: the largest is
/// about `u32::MAX^2 / 2 < i64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Offset {
    pub x: i64,
    pub y: i64,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0, y: 0 };
}

/// Outer container height for a measured width.
///
/// Zero width means the container has not been laid out and yields zero.
pub fn compute_height(width: u32, ratio: AspectRatio) -> u32 {
    // Operands are non-negative, so round-half-away-from-zero == round-half-up.
    (f64::from(width) / ratio.get()).round() as u32
}

/// Result of scaling media to cover a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    /// Factor applied to the native media size.
    pub scale: f64,
    /// Unrounded rendered media width.
    pub scaled_width: f64,
    /// Unrounded rendered media height.
    pub scaled_height: f64,
    pub offset: Offset,
}

/// Scales `media` so it covers `container` with no gaps and crops the excess
/// symmetrically. Returns `None` while either size is unknown.
pub fn cover_fit(media: Dimensions, container: Dimensions) -> Option<CoverFit> {
    if media.is_empty() || container.is_empty() {
        return None;
    }
    let cw = f64::from(container.width);
    let ch = f64::from(container.height);
    let scale = if media.aspect() > container.aspect() {
        ch / f64::from(media.height)
    } else {
        cw / f64::from(media.width)
    };
    let scaled_width = f64::from(media.width) * scale;
    let scaled_height = f64::from(media.height) * scale;
    let offset = Offset {
        x: ((scaled_width - cw) / 2.0).round().max(0.0) as i64,
        y: ((scaled_height - ch) / 2.0).round().max(0.0) as i64,
    };
    Some(CoverFit {
        scale,
        scaled_width,
        scaled_height,
        offset,
    })
}

/// Center-crop offsets for media of (possibly unknown) native size inside a
/// container. Unknown or zero inputs give [`Offset::ZERO`].
pub fn compute_offsets(
    media_width: Option<u32>,
    media_height: Option<u32>,
    container_width: u32,
    container_height: u32,
) -> Offset {
    let (Some(width), Some(height)) = (media_width, media_height) else {
        return Offset::ZERO;
    };
    cover_fit(
        Dimensions::new(width, height),
        Dimensions::new(container_width, container_height),
    )
    .map(|fit| fit.offset)
    .unwrap_or(Offset::ZERO)
}

/// Rectangle in native media pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn fits_within(&self, frame: Dimensions) -> bool {
        self.width > 0
            && self.height > 0
            && u64::from(self.x) + u64::from(self.width) <= u64::from(frame.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(frame.height)
    }
}

/// The part of the native frame that is visible through the container,
/// i.e. the cover crop mapped back into media coordinates.
pub fn capture_region(media: Dimensions, container: Dimensions) -> Option<CaptureRegion> {
    let fit = cover_fit(media, container)?;
    let width = (f64::from(container.width) / fit.scale)
        .round()
        .clamp(1.0, f64::from(media.width)) as u32;
    let height = (f64::from(container.height) / fit.scale)
        .round()
        .clamp(1.0, f64::from(media.height)) as u32;
    // From the unrounded crop so large scales do not amplify rounding error.
    let x = ((fit.scaled_width - f64::from(container.width)).max(0.0) / 2.0 / fit.scale).round();
    let y = ((fit.scaled_height - f64::from(container.height)).max(0.0) / 2.0 / fit.scale).round();
    Some(CaptureRegion {
        x: (x as u32).min(media.width - width),
        y: (y as u32).min(media.height - height),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_media_in_square_container_has_no_offset() {
        let fit = cover_fit(Dimensions::new(500, 500), Dimensions::new(200, 200)).unwrap();
        assert_eq!(fit.offset, Offset::ZERO);
        assert!((fit.scale - 0.4).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_ratio() {
        assert!(AspectRatio::new(0.0).is_err());
        assert!(AspectRatio::new(-1.5).is_err());
        assert!(AspectRatio::new(f64::NAN).is_err());
        assert!(AspectRatio::new(f64::INFINITY).is_err());
        assert_eq!(AspectRatio::default().get(), CARD_ASPECT_RATIO);
    }

    #[test]
    fn capture_region_of_wide_media_is_centered() {
        let region = capture_region(Dimensions::new(1280, 720), Dimensions::new(640, 404)).unwrap();
        // scale = 404/720, visible width = 640 / scale ~= 1140.6
        assert_eq!(region.height, 720);
        assert_eq!(region.width, 1141);
        assert_eq!(region.y, 0);
        assert_eq!(region.x, 70);
        assert!(region.fits_within(Dimensions::new(1280, 720)));
    }

    #[test]
    fn extreme_mismatch_keeps_offsets_exact_and_region_centered() {
        // 1 x 1_000_000 media covering 10_000 x 1: scale 10_000, scaled height 1e10.
        assert_eq!(
            compute_offsets(Some(1), Some(1_000_000), 10_000, 1),
            Offset { x: 0, y: 5_000_000_000 }
        );
        let region =
            capture_region(Dimensions::new(1, 1_000_000), Dimensions::new(10_000, 1)).unwrap();
        assert_eq!(region.width, 1);
        assert_eq!(region.height, 1);
        assert_eq!(region.y, 500_000);
        assert!(region.fits_within(Dimensions::new(1, 1_000_000)));
    }

    #[test]
    fn largest_offsets_fit_in_i64() {
        let fit = cover_fit(Dimensions::new(1, u32::MAX), Dimensions::new(u32::MAX, 1)).unwrap();
        assert!(fit.offset.y > i64::from(u32::MAX));
        assert!(fit.offset.y < i64::MAX);
    }

    #[test]
    fn capture_region_unknown_media() {
        assert!(capture_region(Dimensions::ZERO, Dimensions::new(640, 404)).is_none());
        assert!(capture_region(Dimensions::new(640, 480), Dimensions::ZERO).is_none());
    }
}
