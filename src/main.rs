//! Replays a scripted viewfinder session and prints each presentation as JSON.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use card_camera::config::Configuration;
use card_camera::events::{Presentation, ViewfinderEvent};
use card_camera::processing::layout::{AspectRatio, Dimensions};
use card_camera::tasks::viewfinder;
use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "card-camera",
    version,
    about = "card-shaped camera viewfinder geometry"
)]
struct Args {
    /// Path to YAML config (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Override the configured container aspect ratio
    #[arg(long = "aspect-ratio", value_name = "RATIO")]
    aspect_ratio: Option<f64>,
    /// Native frame size reported by the camera, e.g. 1280x720
    #[arg(long, value_name = "WxH", value_parser = parse_dimensions)]
    media: Option<Dimensions>,
    /// Measured container widths, applied in order (repeatable)
    #[arg(short, long = "width", value_name = "PX")]
    widths: Vec<u32>,
    /// Deliver the native size before the first container measurement
    #[arg(long)]
    media_first: bool,
    /// Finish the session by capturing a still
    #[arg(long)]
    capture: bool,
}

fn parse_dimensions(raw: &str) -> Result<Dimensions, String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {raw:?}"))?;
    let width = w.trim().parse().map_err(|err| format!("bad width: {err}"))?;
    let height = h.trim().parse().map_err(|err| format!("bad height: {err}"))?;
    Ok(Dimensions::new(width, height))
}

fn script(args: &Args) -> Vec<ViewfinderEvent> {
    let mut events = vec![ViewfinderEvent::StreamChanged(true)];
    let mut widths = args.widths.iter().copied();
    let media = args.media.map(ViewfinderEvent::MediaResolved);
    if args.media_first {
        events.extend(media);
        events.extend(widths.next().map(ViewfinderEvent::ContainerMeasured));
    } else {
        events.extend(widths.next().map(ViewfinderEvent::ContainerMeasured));
        events.extend(media);
    }
    events.push(ViewfinderEvent::Playing);
    events.extend(widths.map(ViewfinderEvent::ContainerMeasured));
    if args.capture {
        events.push(ViewfinderEvent::Captured);
    }
    events
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // init tracing (RUST_LOG controls level, default = info); stdout is reserved for JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    };
    if let Some(ratio) = args.aspect_ratio {
        cfg.aspect_ratio = AspectRatio::new(ratio).context("invalid --aspect-ratio")?;
    }
    let cfg = cfg.validated().context("invalid configuration values")?;
    tracing::debug!("configuration: {cfg:#?}");

    let (event_tx, event_rx) = mpsc::channel::<ViewfinderEvent>(cfg.event_channel_capacity);
    let (view_tx, mut view_rx) = mpsc::channel::<Presentation>(cfg.event_channel_capacity);
    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    let task = tokio::spawn(viewfinder::run(cfg, event_rx, view_tx, cancel.clone()));

    let events = script(&args);
    let producer = tokio::spawn(async move {
        for ev in events {
            if event_tx.send(ev).await.is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout().lock();
    while let Some(presentation) = view_rx.recv().await {
        let line = serde_json::to_string(&presentation).context("serializing presentation")?;
        writeln!(stdout, "{line}").context("writing presentation")?;
    }

    producer.await.context("event producer panicked")?;
    task.await.context("viewfinder task panicked")??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dimensions() {
        assert_eq!(parse_dimensions("1280x720"), Ok(Dimensions::new(1280, 720)));
        assert_eq!(parse_dimensions("480X640"), Ok(Dimensions::new(480, 640)));
        assert!(parse_dimensions("1280").is_err());
        assert!(parse_dimensions("ax2").is_err());
    }

    #[test]
    fn script_orders_media_after_first_width_by_default() {
        let args = Args::parse_from(["card-camera", "--media", "1280x720", "-w", "640", "-w", "320"]);
        assert_eq!(
            script(&args),
            vec![
                ViewfinderEvent::StreamChanged(true),
                ViewfinderEvent::ContainerMeasured(640),
                ViewfinderEvent::MediaResolved(Dimensions::new(1280, 720)),
                ViewfinderEvent::Playing,
                ViewfinderEvent::ContainerMeasured(320),
            ]
        );
    }
}
