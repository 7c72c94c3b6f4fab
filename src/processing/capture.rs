//! Copies the visible viewfinder crop out of a native camera frame.
//!
//! The output is a raw RGBA buffer the size of the container; encoding it is
//! left to the caller.

use fast_image_resize as fir;
use image::{RgbaImage, imageops};
use tracing::debug;

use crate::config::CaptureOptions;
use crate::error::Error;
use crate::processing::layout::{CaptureRegion, Dimensions, capture_region};

/// Snapshot of what the viewfinder currently shows for `frame`.
pub fn snapshot(
    frame: &RgbaImage,
    container: Dimensions,
    options: &CaptureOptions,
) -> Result<RgbaImage, Error> {
    let media = Dimensions::new(frame.width(), frame.height());
    let region = capture_region(media, container).ok_or(Error::EmptyRegion)?;
    snapshot_region(frame, region, container, options)
}

/// Resamples `region` of `frame` into an image of `output` size.
pub fn snapshot_region(
    frame: &RgbaImage,
    region: CaptureRegion,
    output: Dimensions,
    options: &CaptureOptions,
) -> Result<RgbaImage, Error> {
    let media = Dimensions::new(frame.width(), frame.height());
    if output.is_empty() {
        return Err(Error::EmptyRegion);
    }
    if !region.fits_within(media) {
        return Err(Error::RegionOutOfBounds {
            region,
            frame: media,
        });
    }
    debug!(?region, ?output, filter = %options.filter, "capturing snapshot");

    let src_view = fir::images::ImageRef::new(
        frame.width(),
        frame.height(),
        frame.as_raw(),
        fir::PixelType::U8x4,
    )
    .map_err(|err| Error::Resize(err.to_string()))?;
    let mut dst_image = fir::images::Image::new(output.width, output.height, fir::PixelType::U8x4);
    let resize_options = fir::ResizeOptions::new()
        .resize_alg(options.filter.resize_alg())
        .crop(
            f64::from(region.x),
            f64::from(region.y),
            f64::from(region.width),
            f64::from(region.height),
        );
    let mut resizer = fir::Resizer::new();
    resizer
        .resize(&src_view, &mut dst_image, Some(&resize_options))
        .map_err(|err| Error::Resize(err.to_string()))?;

    let mut image = RgbaImage::from_raw(output.width, output.height, dst_image.into_vec())
        .ok_or_else(|| Error::Resize("output buffer size mismatch".into()))?;
    if options.mirror {
        imageops::flip_horizontal_in_place(&mut image);
    }
    Ok(image)
}
