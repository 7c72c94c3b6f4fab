use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::Configuration;
use crate::events::{CaptureAction, Presentation, ViewfinderEvent};
use crate::processing::layout::{AspectRatio, Dimensions, compute_height, compute_offsets};

/// Binds the resize observer and the media collaborator to the layout math.
///
/// Every accepted event recomputes the container height and the crop offsets
/// from scratch; nothing is cached between input tuples.
#[derive(Debug, Clone)]
pub struct Viewfinder {
    ratio: AspectRatio,
    container: Dimensions,
    stream_active: bool,
    media: Option<Dimensions>,
    playing: bool,
    captured: bool,
    flashing: bool,
}

impl Viewfinder {
    pub fn new(ratio: AspectRatio) -> Self {
        Self {
            ratio,
            container: Dimensions::ZERO,
            stream_active: false,
            media: None,
            playing: false,
            captured: false,
            flashing: false,
        }
    }

    pub fn media(&self) -> Option<Dimensions> {
        self.media
    }

    pub fn apply(&mut self, event: ViewfinderEvent) -> Presentation {
        match event {
            ViewfinderEvent::ContainerMeasured(width) => {
                self.container = Dimensions::new(width, compute_height(width, self.ratio));
                debug!(
                    width = self.container.width,
                    height = self.container.height,
                    "container measured"
                );
            }
            ViewfinderEvent::StreamChanged(active) => {
                if active != self.stream_active {
                    info!(active, "stream changed");
                }
                if !active {
                    self.media = None;
                    self.playing = false;
                    self.captured = false;
                    self.flashing = false;
                }
                self.stream_active = active;
            }
            ViewfinderEvent::MediaResolved(dims) => self.resolve_media(dims),
            ViewfinderEvent::Playing => {
                if self.stream_active {
                    self.playing = true;
                } else {
                    debug!("playing signal without an active stream; ignoring");
                }
            }
            ViewfinderEvent::Captured => {
                if self.capture_enabled() {
                    self.captured = true;
                    self.flashing = true;
                } else {
                    warn!("capture requested before the viewfinder was ready");
                }
            }
            ViewfinderEvent::Cleared => self.captured = false,
            ViewfinderEvent::FlashEnded => self.flashing = false,
        }
        self.presentation()
    }

    fn resolve_media(&mut self, dims: Dimensions) {
        if !self.stream_active {
            debug!(?dims, "native size for inactive stream; ignoring");
            return;
        }
        if dims.is_empty() {
            debug!(?dims, "native size not decoded yet");
            return;
        }
        match self.media {
            None => {
                info!(width = dims.width, height = dims.height, "media resolved");
                self.media = Some(dims);
            }
            Some(known) if known == dims => {}
            Some(known) => {
                warn!(?known, ?dims, "native size is fixed per stream; ignoring change");
            }
        }
    }

    fn geometry_ready(&self) -> bool {
        !self.container.is_empty() && self.media.is_some_and(|m| !m.is_empty())
    }

    fn capture_enabled(&self) -> bool {
        self.stream_active && self.playing && self.geometry_ready()
    }

    /// Recompute everything the rendering layer needs from the current inputs.
    pub fn presentation(&self) -> Presentation {
        let offset = compute_offsets(
            self.media.map(|m| m.width),
            self.media.map(|m| m.height),
            self.container.width,
            self.container.height,
        );
        let capture_enabled = self.capture_enabled();
        Presentation {
            stream_active: self.stream_active,
            container: self.container,
            max_size: self.media,
            offset,
            media_visible: capture_enabled,
            capture_enabled,
            capture_action: if self.captured {
                CaptureAction::Retake
            } else {
                CaptureAction::Take
            },
            flashing: self.flashing,
        }
    }
}

/// Drives a [`Viewfinder`] from collaborator events and forwards one
/// [`Presentation`] per event until cancelled or the inputs close.
#[instrument(skip_all, fields(ratio = cfg.aspect_ratio.get()))]
pub async fn run(
    cfg: Configuration,
    mut events: Receiver<ViewfinderEvent>,
    to_view: Sender<Presentation>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut viewfinder = Viewfinder::new(cfg.aspect_ratio);
    loop {
        select! {
            _ = cancel.cancelled() => {
                debug!("cancel received; exiting viewfinder task");
                break;
            }
            maybe_ev = events.recv() => {
                let Some(ev) = maybe_ev else {
                    debug!("event producers closed");
                    break;
                };
                let presentation = viewfinder.apply(ev);
                if to_view.send(presentation).await.is_err() {
                    warn!("presentation channel closed");
                    break;
                }
            }
        }
    }
    Ok(())
}
