use regex::Regex;
use std::fmt;
use std::net::IpAddr;
use std::sync::LazyLock;

// Two or more dot separated labels of 1-63 characters, optional trailing dot.
static HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]{1,63}(?:\.[a-zA-Z0-9_-]{1,63})+\.?$")
        .expect("hostname pattern is valid")
});

/// A value taken from the input column that is worth resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Ip(IpAddr),
    Name(String),
}

impl Identifier {
    /// Classifies a raw input value. IP syntax wins over the hostname grammar,
    /// anything matching neither returns `None` and is discarded by the caller.
    pub fn classify(raw: &str) -> Option<Identifier> {
        let input = raw.trim();
        if let Ok(ip) = input.parse::<IpAddr>() {
            return Some(Identifier::Ip(ip.to_canonical()));
        }
        if HOSTNAME.is_match(input) {
            return Some(Identifier::Name(input.to_string()));
        }
        None
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Ip(ip) => fmt::Display::fmt(ip, f),
            Identifier::Name(name) => f.write_str(name),
        }
    }
}

/// Lowercases a hostname and strips a single trailing dot.
pub fn normalize_name(name: &str) -> String {
    let lower = name.to_lowercase();
    match lower.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}
