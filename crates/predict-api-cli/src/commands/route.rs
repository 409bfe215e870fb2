//! Route command - send requests through the prediction router.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use predict_api_adapters::FsRequestSource;
use predict_api_core::{
    AudioConfig, AudioEventModel, DispatchMode, IrConfig, IrStatusModel, PredictionRouter,
    ProgressEvent, ProgressSink, RequestSource, ResponseOutput, RouterConfig, Slot,
    SourcedResponse,
};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for responses.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Hardcoded default values for thresholds.
mod defaults {
    pub const IR_THRESHOLD: f32 = 0.5;
    pub const AUDIO_THRESHOLD: f32 = 0.5;
}

/// Parse and validate a threshold value (0.0-1.0).
fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Parse a strictly positive integer.
fn parse_positive(s: &str) -> Result<u64, String> {
    match s.parse::<u64>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(value) => Ok(value),
        Err(_) => Err(format!("'{s}' is not a positive integer")),
    }
}

/// Shared arguments for routing requests.
#[derive(Args, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RouteArgs {
    /// Request files (.json, .jsonl, .ndjson), directories, or - for stdin
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Disable IR detection (inputs are treated as absent)
    #[arg(long)]
    pub no_ir: bool,

    /// Disable audio event detection (inputs are treated as absent)
    #[arg(long)]
    pub no_audio: bool,

    /// IR presence threshold (0.0-1.0)
    #[arg(long, value_parser = parse_threshold)]
    pub ir_threshold: Option<f32>,

    /// Audio event threshold (0.0-1.0)
    #[arg(long, value_parser = parse_threshold)]
    pub audio_threshold: Option<f32>,

    /// Required IR tensor length
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub ir_expected_len: Option<u64>,

    /// Required audio waveform length
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub audio_expected_len: Option<u64>,

    /// Invoke slot predictors concurrently
    #[arg(long)]
    pub concurrent: bool,

    /// Per-call predictor timeout in milliseconds (a predictor that never
    /// returns keeps one background thread alive per timed-out call)
    #[arg(long, value_name = "MS", value_parser = parse_positive)]
    pub timeout_ms: Option<u64>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl RouteArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    ///
    /// For boolean flags: CLI `--no-*` always wins. Config can enable/disable
    /// only when CLI flag wasn't explicitly set.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        // Slot enables: CLI --no-* takes precedence, then config, then default (enabled)
        if !args.no_ir {
            if let Some(enabled) = config.ir.enabled {
                args.no_ir = !enabled;
            }
        }
        if !args.no_audio {
            if let Some(enabled) = config.audio.enabled {
                args.no_audio = !enabled;
            }
        }

        args.ir_threshold = args.ir_threshold.or(config.ir.threshold);
        args.audio_threshold = args.audio_threshold.or(config.audio.threshold);
        args.ir_expected_len = args
            .ir_expected_len
            .or(config.ir.expected_len.map(|n| n as u64));
        args.audio_expected_len = args
            .audio_expected_len
            .or(config.audio.expected_len.map(|n| n as u64));

        if !args.concurrent {
            args.concurrent = config.router.concurrent.unwrap_or(false);
        }
        args.timeout_ms = args.timeout_ms.or(config.router.timeout_ms);

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args
    }

    /// Get IR threshold with fallback to hardcoded default.
    fn ir_threshold(&self) -> f32 {
        self.ir_threshold.unwrap_or(defaults::IR_THRESHOLD)
    }

    /// Get audio threshold with fallback to hardcoded default.
    fn audio_threshold(&self) -> f32 {
        self.audio_threshold.unwrap_or(defaults::AUDIO_THRESHOLD)
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jsonl)
    }

    /// Returns true if the slot was switched off by flag or config.
    pub const fn is_disabled(&self, slot: Slot) -> bool {
        match slot {
            Slot::Ir => self.no_ir,
            Slot::Audio => self.no_audio,
        }
    }

    fn router_config(&self) -> RouterConfig {
        RouterConfig {
            dispatch: if self.concurrent {
                DispatchMode::Concurrent
            } else {
                DispatchMode::Sequential
            },
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Result of running the route command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct RouteResult {
    /// Number of requests routed.
    pub routed: usize,
    /// Number of requests skipped.
    pub skipped: usize,
    /// Number of responses with at least one slot error.
    pub with_errors: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the route command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &RouteArgs) -> Result<RouteResult> {
    info!("Running route command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let router = build_router(args)?;

    let disabled: Vec<Slot> = Slot::ALL
        .into_iter()
        .filter(|slot| args.is_disabled(*slot))
        .collect();
    if disabled.len() == Slot::ALL.len() {
        warn!("All prediction slots disabled, responses will be empty");
    }

    let source = FsRequestSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let output = JsonOutput::stdout(args.format(), args.pretty);

    process_requests(&source, &router, &disabled, &output, &progress_bar)
}

/// Build the router from merged args (CLI + config).
///
/// # Errors
///
/// Returns an error if the predictor table is incomplete.
pub fn build_router(args: &RouteArgs) -> Result<PredictionRouter> {
    let ir = IrConfig {
        presence_threshold: args.ir_threshold(),
        expected_len: args.ir_expected_len.map(to_len).transpose()?,
    };
    let audio = AudioConfig {
        event_threshold: args.audio_threshold(),
        expected_len: args.audio_expected_len.map(to_len).transpose()?,
    };
    debug!("IR config: {:?}", ir);
    debug!("Audio config: {:?}", audio);

    PredictionRouter::builder()
        .predictor(IrStatusModel::new(ir))
        .predictor(AudioEventModel::new(audio))
        .config(args.router_config())
        .build()
        .context("Failed to register predictors")
}

fn to_len(n: u64) -> Result<usize> {
    usize::try_from(n).with_context(|| format!("Length {n} does not fit in memory"))
}

/// Route every request from the source and write the responses.
fn process_requests(
    source: &dyn RequestSource,
    router: &PredictionRouter,
    disabled: &[Slot],
    output: &dyn ResponseOutput,
    progress: &dyn ProgressSink,
) -> Result<RouteResult> {
    let total = source.count_hint();
    let mut routed = 0usize;
    let mut skipped = 0usize;
    let mut with_errors = 0usize;

    for (index, item) in source.requests().enumerate() {
        let mut sourced = match item {
            Ok(sourced) => sourced,
            Err(e) => {
                progress.on_event(ProgressEvent::Skipped {
                    source: format!("request {index}"),
                    reason: format!("{e:#}"),
                });
                skipped += 1;
                continue;
            }
        };

        progress.on_event(ProgressEvent::Started {
            source: sourced.source.clone(),
            index,
            total,
        });

        for slot in disabled {
            sourced.request.clear(*slot);
        }

        let response = SourcedResponse {
            source: sourced.source,
            response: router.route(&sourced.request),
        };

        if response.response.has_errors() {
            with_errors += 1;
        }

        progress.on_event(ProgressEvent::Completed {
            response: response.clone(),
        });

        output.write(&response)?;
        routed += 1;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished { routed, skipped });

    let exit_code = if with_errors > 0 {
        ExitCode::SlotErrors
    } else {
        ExitCode::Success
    };

    Ok(RouteResult {
        routed,
        skipped,
        with_errors,
        exit_code,
    })
}
