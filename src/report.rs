use crate::asn::AsnInfo;
use crate::validation::is_private;
use std::fmt::{self, Display, Formatter};
use std::net::IpAddr;

const NOT_AVAILABLE: &str = "N/A";
const PRIVATE_NOTE: &str = "N/A (this IP is private)";

/// What is known about a hop beyond its address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// Reserved address; the registry was not asked.
    Private,
    Public(AsnInfo),
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub index: usize,
    pub addr: IpAddr,
    pub enrichment: Enrichment,
}

impl Row {
    pub fn asn(&self) -> String {
        match &self.enrichment {
            Enrichment::Private => PRIVATE_NOTE.to_string(),
            Enrichment::Public(info) => info
                .asn
                .as_ref()
                .map(|asn| format!("AS{asn}"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }

    pub fn provider(&self) -> &str {
        match &self.enrichment {
            Enrichment::Private => NOT_AVAILABLE,
            Enrichment::Public(info) => info.provider.as_deref().unwrap_or(NOT_AVAILABLE),
        }
    }

    pub fn country(&self) -> &str {
        match &self.enrichment {
            Enrichment::Private => NOT_AVAILABLE,
            Enrichment::Public(info) => info.country.as_deref().unwrap_or(NOT_AVAILABLE),
        }
    }

    /// Country code of a public hop, if the registry knew it.
    pub fn country_code(&self) -> Option<&str> {
        match &self.enrichment {
            Enrichment::Private => None,
            Enrichment::Public(info) => info.country.as_deref(),
        }
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "| {} | {} | {} | {} | {} |",
            self.index,
            self.addr,
            self.asn(),
            self.provider(),
            self.country()
        )
    }
}

/// Turns hops into report rows, one at a time and in order.
///
/// `enrich` is only called for public addresses, lazily, as rows are pulled.
pub fn rows<'a, F>(hops: &'a [IpAddr], mut enrich: F) -> impl Iterator<Item = Row> + 'a
where
    F: FnMut(IpAddr) -> AsnInfo + 'a,
{
    hops.iter().enumerate().map(move |(i, &addr)| {
        let enrichment = if is_private(addr) {
            Enrichment::Private
        } else {
            Enrichment::Public(enrich(addr))
        };
        Row {
            index: i + 1,
            addr,
            enrichment,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hops(addrs: &[&str]) -> Vec<IpAddr> {
        addrs.iter().map(|addr| addr.parse().unwrap()).collect()
    }

    #[test]
    fn test_private_hop_skips_enrichment() {
        let hops = hops(&["192.168.1.1"]);
        let mut calls = 0;
        let lines: Vec<String> = rows(&hops, |_| {
            calls += 1;
            AsnInfo::default()
        })
        .map(|row| row.to_string())
        .collect();
        assert_eq!(calls, 0);
        assert_eq!(
            lines,
            vec!["| 1 | 192.168.1.1 | N/A (this IP is private) | N/A | N/A |"]
        );
    }

    #[test]
    fn test_public_hop() {
        let hops = hops(&["10.0.0.1", "8.8.8.8"]);
        let mut asked = Vec::new();
        let rows: Vec<Row> = rows(&hops, |addr| {
            asked.push(addr);
            AsnInfo {
                asn: Some("15169".to_string()),
                country: Some("US".to_string()),
                provider: None,
            }
        })
        .collect();
        assert_eq!(asked, vec!["8.8.8.8".parse::<IpAddr>().unwrap()]);
        assert_eq!(rows[1].to_string(), "| 2 | 8.8.8.8 | AS15169 | N/A | US |");
        assert_eq!(rows[1].country_code(), Some("US"));
        assert_eq!(rows[0].country_code(), None);
    }

    #[test]
    fn test_unknown_fields() {
        let hops = hops(&["1.1.1.1"]);
        let row = rows(&hops, |_| AsnInfo::default()).next().unwrap();
        assert_eq!(row.to_string(), "| 1 | 1.1.1.1 | N/A | N/A | N/A |");
    }

    #[test]
    fn test_no_hops() {
        assert_eq!(rows(&[], |_| AsnInfo::default()).count(), 0);
    }
}
