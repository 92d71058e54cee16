//! Vendor URL safety check
//!
//! Every URL the crawler lands on must be served over `https` from the
//! vendor's own host (`(sub.)*<vendor>.<tld>`). Anything else ends the run.

use crate::core::error::DomainError;
use regex::Regex;
use url::Url;

/// Host allow-list for one vendor locale
#[derive(Debug, Clone)]
pub struct UrlGuard {
    host: Regex,
}

impl UrlGuard {
    /// Build a guard accepting `<vendor>.<top_level>` and any of its subdomains
    pub fn new(vendor: &str, top_level: &str) -> Result<Self, DomainError> {
        let pattern = format!(
            r"^([^\.@]+\.)*{}\.{}$",
            regex::escape(vendor),
            regex::escape(top_level)
        );
        let host = Regex::new(&pattern).map_err(|e| DomainError::InvalidPattern {
            pattern,
            reason: e.to_string(),
        })?;
        Ok(Self { host })
    }

    /// Validate `raw`, returning the parsed URL when it is safe to use
    pub fn check(&self, raw: &str) -> Result<Url, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidUrl {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "https" {
            return Err(invalid("scheme is not https"));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(invalid("URL carries credentials"));
        }
        if url.port().is_some() {
            return Err(invalid("URL names an explicit port"));
        }
        match url.host_str() {
            Some(host) if self.host.is_match(host) => Ok(url),
            Some(_) => Err(invalid("host is not a vendor host")),
            None => Err(invalid("URL has no host")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard_de() -> UrlGuard {
        UrlGuard::new("amazon", "de").unwrap()
    }

    #[test]
    fn test_accepts_vendor_hosts() {
        let guard = guard_de();
        assert!(guard.check("https://www.amazon.de").is_ok());
        assert!(guard.check("https://amazon.de/gp/your-account").is_ok());
        assert!(
            guard
                .check("https://smile.www.amazon.de/gp/css/order-history?orderFilter=year-2020")
                .is_ok()
        );
    }

    #[test]
    fn test_rejects_lookalike_host_regardless_of_path() {
        let guard = guard_de();
        for url in [
            "https://amazon.de.evil.example",
            "https://amazon.de.evil.example/gp/css/order-history",
            "https://amazon.de.evil.example/?next=https://www.amazon.de",
            "https://evilamazon.de/",
            "https://www.amazon.com/",
        ] {
            let err = guard.check(url).unwrap_err();
            assert!(err.is_navigation(), "expected rejection for {url}");
        }
    }

    #[test]
    fn test_rejects_insecure_or_decorated_urls() {
        let guard = guard_de();
        assert!(guard.check("http://www.amazon.de").is_err());
        assert!(guard.check("https://user:pw@www.amazon.de").is_err());
        assert!(guard.check("https://www.amazon.de:8443/").is_err());
        assert!(guard.check("not a url").is_err());
    }

    #[test]
    fn test_multi_label_top_level_domain() {
        let guard = UrlGuard::new("amazon", "co.uk").unwrap();
        assert!(guard.check("https://www.amazon.co.uk/").is_ok());
        assert!(guard.check("https://www.amazon.coXuk/").is_err());
    }
}
