use std::net::IpAddr;

/// Failures of the trace pipeline.
///
/// None of these abort a run: the caller prints the message and carries on
/// with an empty hop list or an empty [`AsnInfo`](crate::asn::AsnInfo).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target is neither an IP literal nor a resolvable hostname.
    #[error("Can't resolve domain name: {target}")]
    NotResolvable { target: String },

    /// The trace utility could not be launched or did not finish.
    #[error("Cannot trace: {reason}")]
    TraceUnavailable { reason: String },

    /// The registry lookup service failed or returned garbage.
    #[error("Can't receive info for {ip}: {reason}")]
    EnrichmentUnavailable { ip: IpAddr, reason: String },
}

impl Error {
    pub fn trace_unavailable(reason: impl ToString) -> Self {
        Self::TraceUnavailable {
            reason: reason.to_string(),
        }
    }

    pub fn enrichment_unavailable(ip: IpAddr, reason: impl ToString) -> Self {
        Self::EnrichmentUnavailable {
            ip,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
