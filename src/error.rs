/// Operator-facing failure with the process exit code it maps to.
///
/// Exit codes:
/// - `2` configuration, CLI or local I/O problems
/// - `4` delivery failures
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn delivery(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Why a snapshot could not be used for a report.
///
/// None of these are fatal: the run is skipped and the reason is logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// Transport-level failure (DNS, timeout, I/O, undecodable workbook).
    Fetch(String),
    /// The server answered but there is no file for that date yet (holiday,
    /// weekend, or not published).
    NotPublished,
    /// The table has no recognizable name/weight columns.
    SchemaMismatch(String),
    /// The table decoded fine but contains no holdings.
    Empty,
}

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unavailable::Fetch(msg) => write!(f, "fetch failed: {msg}"),
            Unavailable::NotPublished => write!(f, "no data published for this date"),
            Unavailable::SchemaMismatch(msg) => write!(f, "unrecognized layout: {msg}"),
            Unavailable::Empty => write!(f, "snapshot has no holdings"),
        }
    }
}

impl std::error::Error for Unavailable {}
