use crate::entities::backtest_request::BacktestRequest;
use crate::entities::backtest_result::BacktestResult;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error: Unable to connect to the backend server.";
pub const SERVER_ERROR_MESSAGE: &str = "An error occurred on the server.";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// No response was received.
    Network(String),
    /// The service answered with a non-2xx status or an unreadable body.
    Server {
        status: Option<u16>,
        message: String,
    },
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Network(cause) => write!(f, "{NETWORK_ERROR_MESSAGE} ({cause})"),
            SubmitError::Server {
                status: Some(status),
                message,
            } => write!(f, "{message} (status {status})"),
            SubmitError::Server {
                status: None,
                message,
            } => f.write_str(message),
        }
    }
}

impl std::error::Error for SubmitError {}

pub trait BacktestService {
    fn submit(&self, request: &BacktestRequest) -> Result<BacktestResult, SubmitError>;
}
