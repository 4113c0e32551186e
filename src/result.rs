extern crate reqwest;
extern crate serde_json;
extern crate std;

pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Everything that can go wrong while polling the prediction source. None of
// these escape the fetcher; they only decide whether the cache is replaced.
#[derive(Debug)]
pub enum FetchError {
    HttpError(reqwest::Error),
    JsonError(serde_json::Error),
    MissingTrains,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            FetchError::HttpError(ref err) => {
                if err.is_timeout() {
                    return write!(f, "HTTP Error (timed out): {}", err);
                }
                return write!(f, "HTTP Error: {}", err);
            },
            FetchError::JsonError(ref err) => {
                return write!(f, "JSON Error: {}", err);
            },
            FetchError::MissingTrains => {
                return write!(f, "Response had no 'Trains' list");
            },
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            FetchError::HttpError(ref err) => Some(err),
            FetchError::JsonError(ref err) => Some(err),
            FetchError::MissingTrains => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> FetchError {
        return FetchError::HttpError(err);
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> FetchError {
        return FetchError::JsonError(err);
    }
}
