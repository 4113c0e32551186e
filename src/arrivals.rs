extern crate serde;
extern crate serde_json;

use crate::result;

const PLACEHOLDER_LINE: &str = "--";

// https://developer.wmata.com/docs/services/547636a6f9182302184cda78/operations/547636a6f918230da855363f
#[derive(Deserialize, Debug)]
struct StationPrediction {
    #[serde(rename = "Trains", default)]
    trains: Option<Vec<RawTrain>>,
}

// One prediction as the source sends it. Any field can be missing or null.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RawTrain {
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub min: Option<String>,
}

pub fn parse_response(response_body: &str) -> result::FetchResult<Vec<RawTrain>> {
    let prediction: StationPrediction = serde_json::from_str(response_body)?;
    return prediction.trains.ok_or(result::FetchError::MissingTrains);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtaKind {
    Minutes,
    Status,
}

impl EtaKind {
    pub fn of(eta: &str) -> EtaKind {
        if !eta.is_empty() && eta.chars().all(|c| c.is_ascii_digit()) {
            return EtaKind::Minutes;
        }
        return EtaKind::Status;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    line_code: String,
    destination: String,
    eta: String,
}

impl Arrival {
    pub fn line_code(&self) -> &str {
        return &self.line_code;
    }

    pub fn destination(&self) -> &str {
        return &self.destination;
    }

    pub fn eta(&self) -> &str {
        return &self.eta;
    }

    pub fn eta_kind(&self) -> EtaKind {
        return EtaKind::of(&self.eta);
    }

    /// Human readable countdown, e.g. "3 min" or "BOARDING".
    pub fn describe_eta(&self) -> String {
        return match self.eta.as_str() {
            "ARR" => "ARRIVING".to_string(),
            "BRD" => "BOARDING".to_string(),
            other => format!("{} min", other),
        };
    }
}

impl std::fmt::Display for Arrival {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        return write!(f, "[{}] to {}: {}", self.line_code, self.destination, self.describe_eta());
    }
}

/// Turns raw predictions into `Arrival`s, dropping placeholder lines and
/// non-revenue destinations.
///
/// The source mangles "No Passenger" unpredictably, so besides the exact
/// literals any destination containing one of `excluded_fragments` is
/// dropped as well.
#[derive(Debug, Clone)]
pub struct Normalizer {
    excluded_destinations: Vec<String>,
    excluded_fragments: Vec<String>,
}

impl Normalizer {
    pub fn new(excluded_destinations: Vec<String>, excluded_fragments: Vec<String>) -> Normalizer {
        return Normalizer {
            excluded_destinations: excluded_destinations,
            excluded_fragments: excluded_fragments.into_iter().filter(|f| !f.is_empty()).collect(),
        };
    }

    pub fn normalize(&self, raw: &RawTrain) -> Option<Arrival> {
        let line = raw.line.as_ref().map(|l| l.trim()).unwrap_or(PLACEHOLDER_LINE);
        let destination = raw.destination.as_ref().map(|d| d.trim()).unwrap_or("");

        if line.is_empty() || line == PLACEHOLDER_LINE {
            return None;
        }

        if self.is_excluded_destination(destination) {
            return None;
        }

        return Some(Arrival {
            line_code: line.to_string(),
            destination: destination.to_string(),
            eta: raw.min.clone().unwrap_or_default(),
        });
    }

    // Keeps source order.
    pub fn normalize_all(&self, raw_trains: &[RawTrain]) -> Vec<Arrival> {
        return raw_trains.iter().filter_map(|raw| self.normalize(raw)).collect();
    }

    fn is_excluded_destination(&self, destination: &str) -> bool {
        if destination.is_empty() {
            return true;
        }
        if self.excluded_destinations.iter().any(|d| d == destination) {
            return true;
        }
        return self.excluded_fragments.iter().any(|f| destination.contains(f.as_str()));
    }
}

#[cfg(test)]
pub fn arrival(line_code: &str, destination: &str, eta: &str) -> Arrival {
    return Arrival {
        line_code: line_code.to_string(),
        destination: destination.to_string(),
        eta: eta.to_string(),
    };
}
