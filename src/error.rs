use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the College Football Data API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("failed to decode {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("CFBD_API_KEY is not set")]
    MissingApiKey,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to serialize debug record")]
    Json(#[from] serde_json::Error),

    #[error("failed to flatten advanced season stats")]
    Flatten(#[source] serde_json::Error),
}

impl PipelineError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub(crate) fn csv(path: impl AsRef<std::path::Path>, source: csv::Error) -> Self {
        PipelineError::Csv {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
