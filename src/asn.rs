use crate::error::{Error, Result};
use crate::validation::is_private;
use serde::{de::DeserializeOwned, Deserialize};
use std::net::IpAddr;
use std::time::Duration;

pub const API_URL: &str = "https://stat.ripe.net";

/// Origin AS, country and provider of a public address.
///
/// Every field is optional: the registry often knows only part of it.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct AsnInfo {
    pub asn: Option<String>,
    pub country: Option<String>,
    pub provider: Option<String>,
}

impl AsnInfo {
    /// Folds whois attributes into a record. The first non-blank value seen
    /// for each field wins.
    pub fn from_records<'a, I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = &'a Attribute>,
    {
        attributes
            .into_iter()
            .fold(Self::default(), |mut info, attribute| {
                let value = || {
                    Some(attribute.value.trim())
                        .filter(|value| !value.is_empty())
                        .map(str::to_string)
                };
                match attribute.key.to_lowercase().as_str() {
                    "origin" if info.asn.is_none() => {
                        info.asn = attribute
                            .value
                            .split_whitespace()
                            .next()
                            .map(strip_as_prefix)
                            .filter(|asn| !asn.is_empty())
                            .map(str::to_string);
                    }
                    "country" if info.country.is_none() => info.country = value(),
                    "netname" | "descr" if info.provider.is_none() => info.provider = value(),
                    _ => {}
                }
                info
            })
    }
}

/// `AS3333` and `3333` name the same AS; the renderer adds the prefix back.
fn strip_as_prefix(asn: &str) -> &str {
    match asn.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("as") => &asn[2..],
        _ => asn,
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct WhoisResponse {
    #[serde(default)]
    pub data: WhoisData,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct WhoisData {
    #[serde(default)]
    pub records: Vec<Vec<Attribute>>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkInfoResponse {
    #[serde(default)]
    pub data: NetworkInfoData,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkInfoData {
    #[serde(default)]
    pub asns: Vec<AsNumber>,
}

/// The registry reports AS numbers as strings, but plain numbers show up too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AsNumber {
    Text(String),
    Number(u64),
}

impl std::fmt::Display for AsNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(asn) => write!(f, "{asn}"),
            Self::Number(asn) => write!(f, "{asn}"),
        }
    }
}

/// A source of registry data for a single address.
pub trait Registry {
    fn whois(&self, ip: IpAddr) -> Result<WhoisResponse>;
    fn network_info(&self, ip: IpAddr) -> Result<NetworkInfoResponse>;
}

/// Client for the RIPEstat data API.
pub struct RipeStat {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl RipeStat {
    pub fn new(base_url: &str, timeout: Duration) -> color_eyre::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str, ip: IpAddr) -> Result<T> {
        let url = format!("{}/data/{endpoint}/data.json?resource={ip}", self.base_url);
        log::debug!("GET {url}");
        self.client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json())
            .map_err(|e| Error::enrichment_unavailable(ip, e))
    }
}

impl Registry for RipeStat {
    fn whois(&self, ip: IpAddr) -> Result<WhoisResponse> {
        self.get("whois", ip)
    }

    fn network_info(&self, ip: IpAddr) -> Result<NetworkInfoResponse> {
        self.get("network-info", ip)
    }
}

/// Looks up the textual address `ip` in the registry.
///
/// Anything that is not an IP literal gets an empty record.
pub fn enrich<R: Registry>(registry: &R, ip: &str) -> AsnInfo {
    match ip.parse::<IpAddr>() {
        Ok(ip) => enrich_addr(registry, ip),
        Err(_) => AsnInfo::default(),
    }
}

/// Looks up `ip` in the registry.
///
/// Private addresses get an empty record without any request. Failures are
/// reported on stderr and also yield an empty record.
pub fn enrich_addr<R: Registry>(registry: &R, ip: IpAddr) -> AsnInfo {
    if is_private(ip) {
        return AsnInfo::default();
    }
    lookup(registry, ip).unwrap_or_else(|e| {
        eprintln!("{e}");
        AsnInfo::default()
    })
}

fn lookup<R: Registry>(registry: &R, ip: IpAddr) -> Result<AsnInfo> {
    let whois = registry.whois(ip)?;
    let mut info = AsnInfo::from_records(whois.data.records.iter().flatten());
    if info.asn.is_none() {
        let network_info = registry.network_info(ip)?;
        info.asn = network_info
            .data
            .asns
            .first()
            .map(|asn| strip_as_prefix(&asn.to_string()).to_string())
            .filter(|asn| !asn.is_empty());
    }
    Ok(info)
}
