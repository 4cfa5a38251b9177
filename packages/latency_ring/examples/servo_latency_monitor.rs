//! Simulates a servo control loop feeding a shared latency buffer while a status reporter
//! periodically summarizes it, the way a device status node reports servo command latency.
//!
//! Run with `RUST_LOG=debug` to also see buffer lifecycle events.
//!
//! ```text
//! cargo run --example servo_latency_monitor -- --duration-secs 5 --window-extrema
//! ```

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use argh::FromArgs;
use latency_ring::{
    BufferConfig, DEFAULT_REPORT_INTERVAL, ExtremaTracking, LatencyStatsBuffer, Nanos,
    SharedLatencyStats, duration_to_nanos,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const MIN_REPORT_INTERVAL: Duration = Duration::from_millis(10);

/// Simulates a servo control loop and periodically reports its command latency.
#[derive(FromArgs)]
struct Args {
    /// path to a TOML file with the buffer configuration (capacity, sample_interval, extrema)
    #[argh(option)]
    config: Option<PathBuf>,

    /// number of samples to keep, overriding the configuration file
    #[argh(option)]
    capacity: Option<usize>,

    /// servo commands per recorded sample, overriding the configuration file
    #[argh(option)]
    sample_interval: Option<u32>,

    /// report the minimum and maximum of resident samples only
    #[argh(switch)]
    window_extrema: bool,

    /// discard all samples after each status report
    #[argh(switch)]
    clear_after_report: bool,

    /// how long to run the simulation, in seconds
    #[argh(option, default = "10")]
    duration_secs: u64,

    /// interval between status reports, in milliseconds
    #[argh(option)]
    report_interval_ms: Option<u64>,

    /// servo command frequency, in hertz
    #[argh(option, default = "100")]
    servo_hz: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Args = argh::from_env();
    let config = resolve_config(&args)?;

    let stats = SharedLatencyStats::new(LatencyStatsBuffer::from_config(&config));
    let stop = AtomicBool::new(false);

    let run_time = Duration::from_secs(args.duration_secs);
    let report_interval = resolve_report_interval(args.report_interval_ms);
    let servo_period = Duration::from_secs(1) / args.servo_hz.max(1);

    info!(
        capacity = config.capacity().get(),
        sample_interval = config.sample_interval().get(),
        extrema = %config.extrema(),
        servo_hz = args.servo_hz,
        "starting servo latency monitor"
    );

    let started = Instant::now();

    thread::scope(|s| {
        s.spawn(|| {
            run_servo_loop(
                &stats,
                &stop,
                started,
                servo_period,
                config.sample_interval().get(),
            );
        });

        while started.elapsed() < run_time {
            thread::sleep(report_interval.min(run_time.saturating_sub(started.elapsed())));
            report_status(&stats);

            if args.clear_after_report {
                stats.clear();
            }
        }

        stop.store(true, Ordering::Relaxed);
    });

    info!(final_summary = %stats.summary(), "servo latency monitor stopped");

    Ok(())
}

fn resolve_config(args: &Args) -> Result<BufferConfig, Box<dyn Error>> {
    let base = match &args.config {
        Some(path) => BufferConfig::from_toml_str(&fs::read_to_string(path)?)?,
        None => BufferConfig::default(),
    };

    let extrema = if args.window_extrema {
        ExtremaTracking::Window
    } else {
        base.extrema()
    };

    Ok(BufferConfig::new(
        args.capacity.unwrap_or(base.capacity().get()),
        args.sample_interval.unwrap_or(base.sample_interval().get()),
    )?
    .with_extrema(extrema))
}

/// The requested report interval, never shorter than `MIN_REPORT_INTERVAL`.
fn resolve_report_interval(report_interval_ms: Option<u64>) -> Duration {
    report_interval_ms
        .map_or(DEFAULT_REPORT_INTERVAL, Duration::from_millis)
        .max(MIN_REPORT_INTERVAL)
}

/// Issues simulated servo commands at a fixed period, recording every n-th command's latency.
fn run_servo_loop(
    stats: &SharedLatencyStats,
    stop: &AtomicBool,
    started: Instant,
    period: Duration,
    sample_interval: u32,
) {
    let mut jitter = Jitter::new(0x5EED);
    let mut command_index: u64 = 0;

    while !stop.load(Ordering::Relaxed) {
        let latency = jitter.next_latency(command_index);

        if command_index % u64::from(sample_interval) == 0 {
            stats.record(latency, duration_to_nanos(started.elapsed()));
        }

        command_index = command_index.wrapping_add(1);
        thread::sleep(period);
    }

    debug!(commands = command_index, "servo loop stopped");
}

fn report_status(stats: &SharedLatencyStats) {
    let summary = stats.summary();

    info!(
        samples = summary.samples(),
        mean_ms = summary.mean_ms(),
        min_ms = summary.min_ms(),
        max_ms = summary.max_ms(),
        p95_ms = summary.p95_ms(),
        fps = summary.rate_per_second(),
        "{summary}"
    );
}

/// Deterministic latency generator: about 1.2 ms with up to 0.8 ms of jitter and
/// an occasional scheduling hiccup.
struct Jitter {
    state: u64,
}

impl Jitter {
    const BASE: Nanos = 1_200_000;
    const SPREAD: Nanos = 800_000;
    const HICCUP: Nanos = 5_000_000;
    const HICCUP_EVERY: u64 = 97;

    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_latency(&mut self, command_index: u64) -> Nanos {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;

        let hiccup = if command_index % Self::HICCUP_EVERY == Self::HICCUP_EVERY - 1 {
            Self::HICCUP
        } else {
            0
        };

        Self::BASE + self.state % Self::SPREAD + hiccup
    }
}
