use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use guitar_tuner::audio::{CpalSource, SampleSource, WavSource};
use guitar_tuner::config::AppConfig;
use guitar_tuner::display::render_status_line;
use guitar_tuner::error::log_capture_error;
use guitar_tuner::http::{run_http_server, TunerHttpState};
use guitar_tuner::{TunerHandle, GUITAR_STRINGS};
use log::{error, info};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "tuner_cli",
    about = "Guitar tuner: live capture, WAV analysis, HTTP readout"
)]
struct Cli {
    /// Override path to the JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Capture from the default microphone and serve readings
    Listen {
        /// Bind address for the HTTP responder (overrides config)
        #[arg(long)]
        addr: Option<SocketAddr>,
        /// Run without the HTTP responder
        #[arg(long)]
        no_http: bool,
    },
    /// Run a WAV file through the pitch pipeline, one JSON line per block
    Analyze {
        #[arg(long)]
        wav: PathBuf,
    },
    /// Print the reference string table
    Strings,
}

/// One analyzed block, emitted as a JSON line
#[derive(Debug, Serialize)]
struct AnalyzeRecord {
    block: u64,
    frequency_hz: f32,
    note: String,
    string: &'static str,
    offset_hz: Option<f32>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };

    match cli.command {
        Commands::Listen { addr, no_http } => run_listen(config, addr, no_http),
        Commands::Analyze { wav } => run_analyze(config, &wav),
        Commands::Strings => run_strings(),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn run_listen(config: AppConfig, addr: Option<SocketAddr>, no_http: bool) -> Result<ExitCode> {
    let handle = Arc::new(TunerHandle::from_config(config.clone()));
    let stop = Arc::new(AtomicBool::new(false));

    // cpal streams are not Send, so the source is opened on the producer
    // thread that will consume it
    let producer = {
        let handle = Arc::clone(&handle);
        let stop = Arc::clone(&stop);
        let audio = config.audio.clone();
        thread::spawn(move || {
            let mut source = match CpalSource::open(&audio) {
                Ok(source) => source,
                Err(err) => {
                    log_capture_error(&err, "listen");
                    return;
                }
            };
            handle.run_until(&mut source, &stop);
        })
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async {
        if !no_http {
            let bind = match addr {
                Some(addr) => addr,
                None => config
                    .http
                    .bind_addr
                    .parse()
                    .context("parsing http.bind_addr")?,
            };
            let state = TunerHttpState::new(Arc::clone(&handle));
            tokio::spawn(async move {
                if let Err(err) = run_http_server(state, bind).await {
                    error!("HTTP server stopped: {err:#}");
                }
            });
            info!("Serving readings on http://{bind}");
        }

        let mut ticker = tokio::time::interval(Duration::from_millis(250));
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                _ = ticker.tick() => {
                    let reading = handle.snapshot();
                    print!("\r{:<80}", render_status_line(&reading, &config.display));
                    io::stdout().flush().ok();
                }
            }
        }
        anyhow::Ok(())
    })?;

    stop.store(true, Ordering::Relaxed);
    if producer.join().is_err() {
        error!("Capture thread panicked");
    }
    println!();

    Ok(ExitCode::SUCCESS)
}

fn run_analyze(mut config: AppConfig, wav: &PathBuf) -> Result<ExitCode> {
    let mut source =
        WavSource::open(wav).with_context(|| format!("opening {}", wav.display()))?;

    // The detector's lag ranges follow the file, not the live capture config
    config.audio.sample_rate = source.sample_rate();
    let handle = TunerHandle::from_config(config.clone());

    let mut block = vec![0i32; config.audio.block_size];
    let mut index = 0u64;
    loop {
        let n = source.read_block(&mut block).context("reading WAV block")?;
        if n == 0 {
            break;
        }

        let reading = handle.process_block(&block[..n]);
        let record = AnalyzeRecord {
            block: index,
            frequency_hz: reading.frequency_hz,
            note: reading.note.to_string(),
            string: reading.string_name(),
            offset_hz: reading.offset_hz(),
        };
        println!("{}", serde_json::to_string(&record)?);
        index += 1;
    }

    info!("Analyzed {} block(s) from {}", index, wav.display());
    Ok(ExitCode::SUCCESS)
}

fn run_strings() -> Result<ExitCode> {
    for string in &GUITAR_STRINGS {
        println!("{:<10} {:>7.2} Hz", string.name, string.frequency);
    }
    Ok(ExitCode::SUCCESS)
}
