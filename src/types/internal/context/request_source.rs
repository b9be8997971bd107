use std::fmt;

/// Where a request entered the system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSource {
    /// HTTP API endpoint
    API,

    /// CLI command
    CLI,

    /// Automated operation started by the process itself
    System,
}

impl fmt::Display for RequestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestSource::API => f.write_str("api"),
            RequestSource::CLI => f.write_str("cli"),
            RequestSource::System => f.write_str("system"),
        }
    }
}
