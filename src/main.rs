extern crate anyhow;
extern crate chrono;
extern crate flexi_logger;
extern crate getopts;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod arrivals;
mod config;
mod display;
mod drawing;
mod fetcher;
mod frame_loop;
mod projection;
mod result;
mod rotation;
mod signals;

use anyhow::Context;

const DEFAULT_CONFIG: &str = "metroboard.json";

fn init_logging(spec: &str, log_dir: Option<String>) -> anyhow::Result<flexi_logger::LoggerHandle> {
    let logger = flexi_logger::Logger::try_with_env_or_str(spec)
        .with_context(|| format!("bad log spec '{}'", spec))?;

    let logger = match log_dir {
        Some(dir) => logger
            .log_to_file(flexi_logger::FileSpec::default().directory(dir))
            .duplicate_to_stderr(flexi_logger::Duplicate::Warn),
        None => logger.log_to_stderr(),
    };

    return Ok(logger.start()?);
}

fn print_usage(program: &str, opts: &getopts::Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = getopts::Options::new();
    opts.optopt("c", "config", "Station and display settings (JSON).", "FILENAME");
    opts.optopt("i", "save-image", "Write each new frame to this png.", "FILENAME");
    opts.optflag("o", "one-shot", "Fetch and draw once, print arrivals, then exit.");
    opts.optopt("", "log-level", "Log spec, overridden by RUST_LOG.", "SPEC");
    opts.optopt("", "log-dir", "Write logs to files in this directory.", "DIR");
    opts.optflag("h", "help", "Print this help.");

    let matches = opts.parse(&args[1..]).context("parsing command line")?;
    if matches.opt_present("help") {
        print_usage(&args[0], &opts);
        return Ok(());
    }

    let _logger = init_logging(
        &matches.opt_str("log-level").unwrap_or("info".to_string()),
        matches.opt_str("log-dir"))?;

    let config_path = matches.opt_str("config").unwrap_or(DEFAULT_CONFIG.to_string());
    let config = config::Config::from_file(&config_path)?;
    info!("Station {} from {}", config.station_code, config_path);

    let fonts = display::Fonts::from_config(&config)?;
    let surface = display::ImageSurface::new(
        &config.panel, fonts, matches.opt_str("save-image").map(std::path::PathBuf::from));

    let fetcher = fetcher::Fetcher::new(
        config.station_url(),
        config.poll_interval(),
        arrivals::Normalizer::new(
            config.excluded_destinations.clone(),
            config.excluded_destination_fragments.clone()),
        fetcher::real_fetch_fn(config.api_key.clone(), config.request_timeout())?);

    let mut frame_loop = frame_loop::FrameLoop::new(
        fetcher,
        rotation::RotationScheduler::new(config.rotation_interval(), chrono::Utc::now()),
        config.display_tables(),
        surface,
        config.frame_period());

    if matches.opt_present("one-shot") {
        frame_loop.one_iteration(chrono::Utc::now());
        match frame_loop.last_success() {
            Some(ts) => println!("--- Trains at {} as of {} ---", config.station_code, ts.format("%H:%M:%S UTC")),
            None => println!("--- No predictions for {} ---", config.station_code),
        }
        for arrival in frame_loop.arrivals() {
            println!("{}", arrival);
        }
        return Ok(());
    }

    let shutdown = signals::install_shutdown_handler()?;
    frame_loop.run(&shutdown);

    return Ok(());
}
