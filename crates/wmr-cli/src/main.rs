//! Watermark removal CLI.
//!
//! Submits a video to the inpainting service, follows the job to a
//! terminal phase, and saves the processed result.

use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wmr_client::{ClientConfig, JobController, MediaHandle, ServiceClient};
use wmr_models::{JobPhase, PixelRect, VideoType, WatermarkLocation, WatermarkSource};

const USAGE: &str = "Usage: wmr <input.mp4> [options]

Options:
  --video-type <renderforest|capcut>   Source of the watermark (default: capcut)
  --location <top_left|top_right|bottom_left|bottom_right>
                                       Preset corner (default: top_left)
  --region <x,y,w,h>                   Explicit region in source pixels;
                                       mutually exclusive with --location
  --output <path>                      Output file (default: inpainted_video.mp4)
";

struct CliArgs {
    input: PathBuf,
    video_type: VideoType,
    source: WatermarkSource,
    output: PathBuf,
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut input = None;
    let mut video_type = VideoType::default();
    let mut location = None;
    let mut region = None;
    let mut output = PathBuf::from("inpainted_video.mp4");

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--video-type" => {
                let value = iter.next().context("--video-type needs a value")?;
                video_type = value.parse()?;
            }
            "--location" => {
                let value = iter.next().context("--location needs a value")?;
                location = Some(value.parse::<WatermarkLocation>()?);
            }
            "--region" => {
                let value = iter.next().context("--region needs a value")?;
                region = Some(parse_region(value)?);
            }
            "--output" => {
                let value = iter.next().context("--output needs a value")?;
                output = PathBuf::from(value);
            }
            other if other.starts_with("--") => bail!("unknown option: {}", other),
            other => {
                if input.replace(PathBuf::from(other)).is_some() {
                    bail!("more than one input file given");
                }
            }
        }
    }

    if location.is_some() && region.is_some() {
        bail!("--location and --region are mutually exclusive");
    }

    let source = match region {
        Some(rect) => WatermarkSource::Region(rect),
        None => WatermarkSource::Preset(location.unwrap_or_default()),
    };

    Ok(CliArgs {
        input: input.context("missing input file")?,
        video_type,
        source,
        output,
    })
}

fn parse_region(value: &str) -> anyhow::Result<PixelRect> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 4 {
        bail!("--region expects x,y,w,h");
    }
    let mut numbers = [0u32; 4];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .with_context(|| format!("invalid region component: {}", part))?;
    }
    Ok(PixelRect::new(numbers[0], numbers[1], numbers[2], numbers[3]))
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = ClientConfig::from_env();
    let service = ServiceClient::new(config)?;
    let mut controller = JobController::new(service);

    let input = MediaHandle::import(&args.input).await?;
    let mut rx = controller.subscribe();

    let job_id = controller
        .submit(input, args.video_type, args.source)
        .await?;
    info!("Submitted job {}", job_id);

    loop {
        rx.changed().await.context("controller went away")?;
        let snap = rx.borrow_and_update().clone();

        match snap.phase {
            JobPhase::Polling => info!("Processing: {:.2}%", snap.progress),
            JobPhase::Downloading => info!("Processing finished, downloading result"),
            JobPhase::Completed => {
                let result = snap
                    .result
                    .as_ref()
                    .and_then(|handle| handle.path())
                    .context("result handle missing")?;
                tokio::fs::copy(result, &args.output).await?;
                info!("Saved {}", args.output.display());
                break;
            }
            JobPhase::Failed => {
                bail!(snap
                    .error_message
                    .unwrap_or_else(|| "processing failed".to_string()));
            }
            JobPhase::Idle | JobPhase::Uploading => {}
        }
    }

    // Drop server-side artifacts and local handles before exiting.
    controller.service().cleanup(&job_id).await;
    controller.reset();

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("wmr=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(parsed).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
