extern crate anyhow;
extern crate chrono;
extern crate serde;
extern crate serde_json;
extern crate std;

use anyhow::Context;
use std::collections::HashMap;

pub const API_KEY_ENV: &str = "METRO_API_KEY";
const MAX_REQUEST_TIMEOUT_SECS: i64 = 5;
const MIN_FRAME_PERIOD_MS: i64 = 50;
const MAX_FRAME_PERIOD_MS: i64 = 100;
// chrono::Duration::seconds panics above i64::MAX / 1000.
const MAX_INTERVAL_SECS: i64 = 24 * 60 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

pub const WHITE: Color = Color(255, 255, 255);
pub const GREY: Color = Color(180, 180, 180);
pub const RED: Color = Color(255, 50, 0);
pub const BLUE: Color = Color(0, 0, 255);

#[derive(Clone, Debug, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_cols")]
    pub cols: u32,
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_brightness")]
    pub brightness: u8,
}

impl Default for PanelConfig {
    fn default() -> PanelConfig {
        return PanelConfig {
            cols: default_cols(),
            rows: default_rows(),
            brightness: default_brightness(),
        };
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub station_code: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: i64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: i64,
    #[serde(default = "default_rotation_interval_secs")]
    pub rotation_interval_secs: i64,
    #[serde(default = "default_frame_period_ms")]
    pub frame_period_ms: i64,

    #[serde(default = "default_short_names")]
    pub short_names: HashMap<String, String>,
    #[serde(default = "default_line_colors")]
    pub line_colors: HashMap<String, Color>,
    #[serde(default = "default_line_color")]
    pub default_line_color: Color,

    #[serde(default = "default_excluded_destinations")]
    pub excluded_destinations: Vec<String>,
    #[serde(default = "default_excluded_destination_fragments")]
    pub excluded_destination_fragments: Vec<String>,

    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub font_thin: Option<std::path::PathBuf>,
    #[serde(default)]
    pub font_bold: Option<std::path::PathBuf>,
}

fn default_cols() -> u32 { 64 }
fn default_rows() -> u32 { 32 }
fn default_brightness() -> u8 { 50 }

fn default_endpoint() -> String {
    return "https://api.wmata.com/StationPrediction.svc/json/GetPrediction".to_string();
}

fn default_poll_interval_secs() -> i64 { 30 }
fn default_request_timeout_secs() -> i64 { MAX_REQUEST_TIMEOUT_SECS }
fn default_rotation_interval_secs() -> i64 { 4 }
fn default_frame_period_ms() -> i64 { 100 }

// Short names have to fit next to the countdown: 7 chars beside minutes,
// 6 beside a status token.
fn default_short_names() -> HashMap<String, String> {
    return vec![
        ("Greenbelt", "Grnblt"),
        ("Huntington", "Huntgtn"),
        ("Columbia Heights", "ColHgts"),
        ("Georgia Ave-Petworth", "Ga Ave"),
        ("U Street", "U St"),
        ("Mt Vernon Sq", "MtVern"),
        ("Branch Av", "BranchAv"),
        ("Fort Totten", "FtTottn"),
        ("No Passenger", "NoPsngr"),
    ].into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
}

fn default_line_colors() -> HashMap<String, Color> {
    return vec![
        ("GR", Color(0, 255, 0)),
        ("YL", Color(255, 255, 0)),
        ("RD", Color(255, 0, 0)),
        ("BL", Color(0, 0, 255)),
        ("OR", Color(255, 165, 0)),
        ("SV", Color(220, 220, 220)),
    ].into_iter().map(|(k, v)| (k.to_string(), v)).collect();
}

fn default_line_color() -> Color {
    return Color(100, 100, 100);
}

fn default_excluded_destinations() -> Vec<String> {
    return vec!["No Passenger".to_string(), "Train".to_string()];
}

fn default_excluded_destination_fragments() -> Vec<String> {
    return vec!["ssenge".to_string()];
}

impl Config {
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Config> {
        let debug_path = path.as_ref().display().to_string();
        let file = std::fs::File::open(path.as_ref())
            .with_context(|| format!("Opening config from '{}'", debug_path))?;
        let reader = std::io::BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("while parsing config '{}'", debug_path))?;

        if config.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                config.api_key = key;
            }
        }

        config.validate()?;
        return Ok(config);
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.station_code.trim().is_empty() {
            anyhow::bail!("station_code must not be empty");
        }
        if self.api_key.trim().is_empty() {
            anyhow::bail!("no api_key in config and {} is not set", API_KEY_ENV);
        }
        if self.request_timeout_secs <= 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            anyhow::bail!("request_timeout_secs must be in 1..={}, got {}",
                          MAX_REQUEST_TIMEOUT_SECS, self.request_timeout_secs);
        }
        if self.poll_interval_secs <= 0 || self.poll_interval_secs > MAX_INTERVAL_SECS {
            anyhow::bail!("poll_interval_secs must be in 1..={}, got {}",
                          MAX_INTERVAL_SECS, self.poll_interval_secs);
        }
        if self.rotation_interval_secs <= 0 || self.rotation_interval_secs > MAX_INTERVAL_SECS {
            anyhow::bail!("rotation_interval_secs must be in 1..={}, got {}",
                          MAX_INTERVAL_SECS, self.rotation_interval_secs);
        }
        if self.frame_period_ms < MIN_FRAME_PERIOD_MS || self.frame_period_ms > MAX_FRAME_PERIOD_MS {
            anyhow::bail!("frame_period_ms must be in {}..={}, got {}",
                          MIN_FRAME_PERIOD_MS, MAX_FRAME_PERIOD_MS, self.frame_period_ms);
        }
        if self.panel.cols == 0 || self.panel.rows == 0 {
            anyhow::bail!("panel must be at least 1x1, got {}x{}", self.panel.cols, self.panel.rows);
        }
        return Ok(());
    }

    pub fn station_url(&self) -> String {
        return format!("{}/{}", self.endpoint.trim_end_matches('/'), self.station_code);
    }

    pub fn poll_interval(&self) -> chrono::Duration {
        return chrono::Duration::seconds(self.poll_interval_secs);
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        return std::time::Duration::from_secs(self.request_timeout_secs as u64);
    }

    pub fn rotation_interval(&self) -> chrono::Duration {
        return chrono::Duration::seconds(self.rotation_interval_secs);
    }

    pub fn frame_period(&self) -> std::time::Duration {
        return std::time::Duration::from_millis(self.frame_period_ms as u64);
    }

    pub fn display_tables(&self) -> DisplayTables {
        return DisplayTables {
            short_names: self.short_names.clone(),
            line_colors: self.line_colors.clone(),
            default_color: self.default_line_color,
        };
    }
}

// Lookup tables for the renderer, fixed once the config is loaded.
#[derive(Clone, Debug)]
pub struct DisplayTables {
    short_names: HashMap<String, String>,
    line_colors: HashMap<String, Color>,
    default_color: Color,
}

impl DisplayTables {
    pub fn new(short_names: HashMap<String, String>,
               line_colors: HashMap<String, Color>,
               default_color: Color) -> DisplayTables {
        return DisplayTables {
            short_names: short_names,
            line_colors: line_colors,
            default_color: default_color,
        };
    }

    pub fn short_name<'a>(&'a self, destination: &'a str) -> &'a str {
        return self.short_names.get(destination).map(String::as_str).unwrap_or(destination);
    }

    pub fn line_color(&self, line_code: &str) -> Color {
        return *self.line_colors.get(line_code).unwrap_or(&self.default_color);
    }
}

impl Default for DisplayTables {
    fn default() -> DisplayTables {
        return DisplayTables::new(default_short_names(), default_line_colors(), default_line_color());
    }
}
