extern crate anyhow;
extern crate chrono;
extern crate reqwest;

use anyhow::Context;

use crate::arrivals;
use crate::result;

pub type FetchFn = Box<dyn FnMut(&str) -> result::FetchResult<String>>;

const USER_AGENT: &str = "metroboard";
const API_KEY_HEADER: &str = "api_key";

#[derive(Debug)]
pub enum FetchOutcome {
    NotDue,
    Updated(usize),
    // The source answered but nothing survived normalization.
    Empty,
    Failed(result::FetchError),
}

struct FetchState {
    last_fetch: chrono::DateTime<chrono::Utc>,
    last_success: Option<chrono::DateTime<chrono::Utc>>,
    arrivals: Vec<arrivals::Arrival>,
}

/// Polls the prediction source and keeps the last good list of arrivals.
///
/// A failed or empty poll never clears what is already cached: stale
/// arrivals stay on screen until the next poll that yields something.
/// Failed polls still count against `poll_interval`, so an unreachable
/// source is hit at most once per interval.
pub struct Fetcher {
    url: String,
    poll_interval: chrono::Duration,
    normalizer: arrivals::Normalizer,
    fetch_fn: FetchFn,
    state: FetchState,
}

impl Fetcher {
    pub fn new(url: String,
               poll_interval: chrono::Duration,
               normalizer: arrivals::Normalizer,
               fetch_fn: FetchFn) -> Fetcher {
        return Fetcher {
            url: url,
            poll_interval: poll_interval,
            normalizer: normalizer,
            fetch_fn: fetch_fn,
            state: FetchState {
                last_fetch: chrono::DateTime::<chrono::Utc>::from(std::time::UNIX_EPOCH),
                last_success: None,
                arrivals: vec![],
            },
        };
    }

    pub fn arrivals(&self) -> &[arrivals::Arrival] {
        return &self.state.arrivals;
    }

    #[cfg(test)]
    pub fn last_fetch(&self) -> chrono::DateTime<chrono::Utc> {
        return self.state.last_fetch;
    }

    pub fn last_success(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        return self.state.last_success;
    }

    pub fn is_due(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        return now - self.state.last_fetch > self.poll_interval;
    }

    pub fn tick(&mut self, now: chrono::DateTime<chrono::Utc>) -> FetchOutcome {
        if !self.is_due(now) {
            return FetchOutcome::NotDue;
        }
        return self.refresh(now);
    }

    /// Polls immediately, regardless of when the last poll happened.
    pub fn refresh(&mut self, now: chrono::DateTime<chrono::Utc>) -> FetchOutcome {
        self.state.last_fetch = now;

        match self.fetch_and_normalize() {
            Err(err) => {
                warn!("Fetching {} failed, keeping {} cached arrivals ({}): {}",
                      self.url, self.state.arrivals.len(), self.staleness(now), err);
                return FetchOutcome::Failed(err);
            },
            Ok(fresh) => {
                if fresh.is_empty() {
                    info!("No arrivals in response, keeping {} cached arrivals ({})",
                          self.state.arrivals.len(), self.staleness(now));
                    return FetchOutcome::Empty;
                }

                let count = fresh.len();
                info!("Fetched {} arrivals", count);
                self.state.arrivals = fresh;
                self.state.last_success = Some(now);
                return FetchOutcome::Updated(count);
            },
        }
    }

    fn fetch_and_normalize(&mut self) -> result::FetchResult<Vec<arrivals::Arrival>> {
        let body = (self.fetch_fn)(&self.url)?;
        let raw_trains = arrivals::parse_response(&body)?;
        debug!("Source returned {} predictions", raw_trains.len());
        return Ok(self.normalizer.normalize_all(&raw_trains));
    }

    fn staleness(&self, now: chrono::DateTime<chrono::Utc>) -> String {
        return match self.state.last_success {
            Some(ts) => format!("last success {}s ago", (now - ts).num_seconds()),
            None => "never succeeded".to_string(),
        };
    }
}

pub fn real_fetch_fn(api_key: String, timeout: std::time::Duration) -> anyhow::Result<FetchFn> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("while building HTTP client")?;

    return Ok(Box::new(move |url: &str| -> result::FetchResult<String> {
        debug!("Fetching {}", url);
        let response = client.get(url)
            .header(API_KEY_HEADER, api_key.as_str())
            .send()?
            .error_for_status()?;
        return Ok(response.text()?);
    }));
}
