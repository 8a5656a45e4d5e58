//! Binary entrypoint: runs a viewer session against a headless, scripted host.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use rust_image_viewer::config::Configuration;
use rust_image_viewer::headless::{ScriptedHost, parse_script};
use rust_image_viewer::session::{self, Session};

#[derive(Debug, Parser)]
#[command(name = "image-viewer", version, about = "Directory image viewer core")]
struct Cli {
    /// Image to open; its directory becomes the catalog
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-tick input script, e.g. `right,-*10,up+y`
    #[arg(short, long, value_name = "SCRIPT")]
    input: Option<String>,

    /// Number of ticks to run (default: length of the input script, at least 1)
    #[arg(long, value_name = "N")]
    ticks: Option<u64>,

    /// Pace ticks at the configured fps instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Write the last presented frame to this PNG file
    #[arg(long, value_name = "FILE")]
    dump: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("rust_image_viewer={level}").parse()?)
        .add_directive(format!("image_viewer={level}").parse()?);
    fmt().with_env_filter(filter).with_target(false).compact().init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    }
    .validated()
    .context("invalid configuration values")?;

    let script = match cli.input.as_deref() {
        Some(raw) => parse_script(raw).context("invalid input script")?,
        None => Vec::new(),
    };
    let ticks = cli.ticks.unwrap_or(script.len().max(1) as u64);

    let info = session::system_info(&cfg);
    info!(
        library = info.library_name,
        version = info.library_version,
        extensions = %info.valid_extensions,
        "starting"
    );

    let host = ScriptedHost::new(script);
    let mut session = Session::start(host, &cli.image, &cfg)
        .with_context(|| format!("failed to start session at {}", cli.image.display()))?;
    info!(
        images = session.catalog().len(),
        index = session.index(),
        "session started"
    );

    let cancel = CancellationToken::new();
    if cli.realtime {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received; stopping");
                cancel.cancel();
            }
        });
    }

    let pace = cli.realtime.then(|| Duration::from_secs_f64(1.0 / cfg.fps));
    let ran = run(&mut session, ticks, pace, &cancel).await?;
    let host = session.host();
    info!(
        ticks = ran,
        index = session.index(),
        slideshow = session.slideshow_enabled(),
        uploads = host.uploads(),
        repeats = host.repeats(),
        "session finished"
    );

    if let Some(out) = &cli.dump {
        host.save_last_frame(out)
            .with_context(|| format!("failed to dump frame to {}", out.display()))?;
        info!(path = %out.display(), "frame written");
    }
    Ok(())
}

/// Tick `session` up to `ticks` times, optionally paced. Returns the ticks run.
async fn run(
    session: &mut Session<ScriptedHost>,
    ticks: u64,
    pace: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<u64> {
    let mut interval = pace.map(|period| {
        let mut iv = time::interval(period);
        iv.set_missed_tick_behavior(MissedTickBehavior::Skip);
        iv
    });

    for n in 0..ticks {
        if let Some(iv) = interval.as_mut() {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(n),
                _ = iv.tick() => {}
            }
        } else if cancel.is_cancelled() {
            return Ok(n);
        }

        if let Err(err) = session.tick() {
            warn!(tick = n, "session terminated");
            return Err(err).context("viewer session failed");
        }
    }
    Ok(ticks)
}
