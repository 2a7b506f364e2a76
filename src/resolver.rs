use crate::data::{RecordSet, ResolutionResult};
use crate::error::{LookupError, RoundtripError};
use crate::identifier::{normalize_name, Identifier};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};
use trust_dns_proto::op::ResponseCode;
use trust_dns_resolver::{
    config::LookupIpStrategy,
    error::{ResolveError, ResolveErrorKind},
    system_conf, TokioAsyncResolver,
};

/// The two questions a round trip asks of DNS.
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Forward lookup, hostname to addresses.
    async fn lookup_host(&self, name: &str) -> std::result::Result<Vec<IpAddr>, LookupError>;

    /// Reverse lookup, address to hostnames.
    async fn lookup_addr(&self, ip: IpAddr) -> std::result::Result<Vec<String>, LookupError>;
}

/// Lookups against whatever resolver the host is configured to use.
#[derive(Clone)]
pub struct SystemLookup {
    resolver: TokioAsyncResolver,
}

impl SystemLookup {
    /// Reads the system resolver configuration. Only the address family
    /// strategy is overridden so that forward lookups return both A and AAAA
    /// records; timeouts and attempts stay at the system defaults.
    pub fn from_system_conf() -> Result<Self> {
        let (config, mut options) =
            system_conf::read_system_conf().map_err(|e| RoundtripError::Resolver(e.to_string()))?;
        options.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
        Ok(Self {
            resolver: TokioAsyncResolver::tokio(config, options),
        })
    }
}

fn describe(query: &str, err: &ResolveError) -> LookupError {
    let reason = match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code == ResponseCode::NXDomain =>
        {
            "no such host".to_string()
        }
        ResolveErrorKind::NoRecordsFound { .. } => "no records found".to_string(),
        _ => err.to_string(),
    };
    LookupError::new(query, reason)
}

#[async_trait]
impl Lookup for SystemLookup {
    async fn lookup_host(&self, name: &str) -> std::result::Result<Vec<IpAddr>, LookupError> {
        // Fully qualified so search domains are never appended.
        match self.resolver.lookup_ip(format!("{}.", name)).await {
            Ok(response) => Ok(response.iter().collect()),
            Err(e) => {
                warn!("forward lookup of {} failed: {:?}", name, e);
                Err(describe(name, &e))
            }
        }
    }

    async fn lookup_addr(&self, ip: IpAddr) -> std::result::Result<Vec<String>, LookupError> {
        match self.resolver.reverse_lookup(ip).await {
            Ok(response) => Ok(response.iter().map(|name| name.to_string()).collect()),
            Err(e) => {
                warn!("reverse lookup of {} failed: {:?}", ip, e);
                Err(describe(&ip.to_string(), &e))
            }
        }
    }
}

/// In-memory lookup table. Anything not registered fails with "no such
/// host", which makes it suitable as a deterministic fixture.
#[derive(Debug, Default)]
pub struct StaticLookup {
    hosts: HashMap<String, Vec<IpAddr>>,
    addrs: HashMap<IpAddr, Vec<String>>,
    queries: AtomicUsize,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method that registers the forward records of `name`.
    pub fn host(mut self, name: &str, ips: &[&str]) -> Self {
        let ips = ips.iter().filter_map(|ip| ip.parse().ok()).collect();
        self.hosts.insert(name.to_string(), ips);
        self
    }

    /// Builder method that registers the PTR records of `ip`.
    pub fn addr(mut self, ip: &str, names: &[&str]) -> Self {
        if let Ok(ip) = ip.parse() {
            let names = names.iter().map(|name| name.to_string()).collect();
            self.addrs.insert(ip, names);
        }
        self
    }

    /// Number of lookups answered so far, successful or not.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Lookup for StaticLookup {
    async fn lookup_host(&self, name: &str) -> std::result::Result<Vec<IpAddr>, LookupError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.hosts
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::new(name, "no such host"))
    }

    async fn lookup_addr(&self, ip: IpAddr) -> std::result::Result<Vec<String>, LookupError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.addrs
            .get(&ip)
            .cloned()
            .ok_or_else(|| LookupError::new(ip.to_string(), "no such host"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    fn flip(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// The `Resolver` checks that forward and reverse DNS agree for a single
/// identifier. Lookup failures never escape as errors: they are folded into
/// the returned [`ResolutionResult`] as an error marker and a negative
/// verdict.
#[derive(Debug)]
pub struct Resolver<L> {
    lookup: L,
}

impl Resolver<SystemLookup> {
    /// A resolver backed by the system DNS configuration. Must be called from
    /// within a tokio runtime.
    pub fn system() -> Result<Self> {
        Ok(Self::new(SystemLookup::from_system_conf()?))
    }
}

impl<L: Lookup> Resolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub async fn resolve(&self, identifier: &Identifier) -> ResolutionResult {
        match identifier {
            Identifier::Ip(ip) => self.resolve_ip(*ip).await,
            Identifier::Name(name) => self.resolve_name(name).await,
        }
    }

    /// Reverse lookup of `ip`, then a forward lookup of every name found. The
    /// round trip holds when `ip` is among the addresses that come back.
    pub async fn resolve_ip(&self, ip: IpAddr) -> ResolutionResult {
        self.round_trip(Direction::Reverse, ip.to_string()).await
    }

    /// Forward lookup of `name`, then a reverse lookup of every address
    /// found. The round trip holds when the normalized `name` is among the
    /// hostnames that come back.
    pub async fn resolve_name(&self, name: &str) -> ResolutionResult {
        self.round_trip(Direction::Forward, normalize_name(name)).await
    }

    // Both resolutions have the same shape, only the direction of the first
    // hop and the value being looked for differ. A failure anywhere on the
    // second hop fails the whole identifier.
    async fn round_trip(&self, first: Direction, origin: String) -> ResolutionResult {
        let hop = match self.query(first, &origin).await {
            Ok(found) => found,
            Err(e) => return failed(first, e),
        };
        debug!("{} -> {}", origin, hop);

        let second = first.flip();
        let mut back = RecordSet::new();
        for value in hop.iter() {
            match self.query(second, value).await {
                Ok(found) => back.extend(found.iter().map(str::to_string)),
                Err(e) => return failed(second, e),
            }
        }

        let consistent = back.contains(&origin);
        info!("{} round trip ok: {}", origin, consistent);
        match first {
            Direction::Forward => ResolutionResult::resolved(hop, back, consistent),
            Direction::Reverse => ResolutionResult::resolved(back, hop, consistent),
        }
    }

    // Runs one lookup and returns its normalized answer set.
    async fn query(
        &self,
        direction: Direction,
        value: &str,
    ) -> std::result::Result<RecordSet, LookupError> {
        match direction {
            Direction::Forward => {
                let ips = self.lookup.lookup_host(value).await?;
                Ok(ips.iter().map(|ip| ip.to_string()).collect())
            }
            Direction::Reverse => {
                let ip: IpAddr = value
                    .parse()
                    .map_err(|_| LookupError::new(value, "not an IP address"))?;
                let names = self.lookup.lookup_addr(ip).await?;
                Ok(names.iter().map(|name| normalize_name(name)).collect())
            }
        }
    }
}

fn failed(direction: Direction, err: LookupError) -> ResolutionResult {
    match direction {
        Direction::Forward => ResolutionResult::forward_failed(err),
        Direction::Reverse => ResolutionResult::reverse_failed(err),
    }
}
