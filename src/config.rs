use crate::asn::API_URL;
use crate::trace::TraceCommand;
use std::time::Duration;

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_TRACE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the registry lookup service.
    pub registry_url: String,
    /// Bound on each registry request.
    pub lookup_timeout: Duration,
    /// Bound on the whole trace utility run, `None` to wait forever.
    pub trace_timeout: Option<Duration>,
    pub trace_command: TraceCommand,
    /// Show the report in the interactive table.
    pub tui: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: API_URL.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            trace_timeout: Some(DEFAULT_TRACE_TIMEOUT),
            trace_command: TraceCommand::default(),
            tui: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.registry_url, "https://stat.ripe.net");
        assert_eq!(config.lookup_timeout, Duration::from_secs(5));
        assert_eq!(config.trace_timeout, Some(Duration::from_secs(300)));
        assert!(!config.tui);
    }
}
