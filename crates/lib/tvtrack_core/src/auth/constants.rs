//! Identity-provider defaults compiled into the binary.
//!
//! Both values can be overridden through `AUTH0_DOMAIN` / `AUTH0_AUDIENCE`.

/// Tenant domain of the identity provider.
pub const AUTH0_DOMAIN: &str = "tvtrack.eu.auth0.com";

/// Audience every access token must carry.
pub const AUTH0_AUDIENCE: &str = "https://tvtrack.app/api";

/// Seconds allowed for key resolution plus signature verification.
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 10;

/// Seconds a fetched key set stays cached.
pub const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 600;

/// Minimum seconds between refetches forced by an unknown `kid`.
pub const DEFAULT_JWKS_REFETCH_INTERVAL_SECS: u64 = 30;

/// Issuer URL for a provider domain.
pub fn issuer(domain: &str) -> String {
    format!("https://{domain}/")
}

/// Key-set URL for a provider domain.
pub fn jwks_uri(domain: &str) -> String {
    format!("https://{domain}/.well-known/jwks.json")
}
