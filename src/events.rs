use serde::Serialize;

use crate::processing::layout::{Dimensions, Offset};

/// Inputs delivered to the viewfinder by its external collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewfinderEvent {
    /// Resize observer: current measured container width (0 before layout).
    ContainerMeasured(u32),
    /// Media acquisition: a stream became available (`true`) or went away.
    StreamChanged(bool),
    /// Native frame size of the active stream, once frames decode.
    MediaResolved(Dimensions),
    /// The media element reported it can play.
    Playing,
    /// A still was captured into the canvas.
    Captured,
    /// The captured still was discarded.
    Cleared,
    /// The post-capture flash animation finished.
    FlashEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureAction {
    #[default]
    Take,
    Retake,
}

/// What the rendering layer should show after an event was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Presentation {
    /// Nothing is rendered without an active stream.
    pub stream_active: bool,
    pub container: Dimensions,
    /// Container clamp: never larger than the native media.
    pub max_size: Option<Dimensions>,
    pub offset: Offset,
    pub media_visible: bool,
    pub capture_enabled: bool,
    pub capture_action: CaptureAction,
    /// Set by a capture, cleared when the flash animation ends.
    pub flashing: bool,
}
