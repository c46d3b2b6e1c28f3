use clap::{Args, Parser, Subcommand};
use tvtrack_core::auth::constants::{
    AUTH0_AUDIENCE, AUTH0_DOMAIN, DEFAULT_JWKS_CACHE_TTL_SECS, DEFAULT_VERIFY_TIMEOUT_SECS,
};

#[derive(Parser, Debug)]
#[command(name = "tvtrack", version, about = "tvtrack operator tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version
    Version,
    /// Print the GraphQL type definitions
    Schema,
    /// Verify a bearer token and print the caller identity
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Token, with or without the `Bearer ` prefix
    pub token: String,

    /// Identity provider domain
    #[arg(long, env = "AUTH0_DOMAIN", default_value = AUTH0_DOMAIN)]
    pub domain: String,

    /// Expected audience
    #[arg(long, env = "AUTH0_AUDIENCE", default_value = AUTH0_AUDIENCE)]
    pub audience: String,

    /// Verification timeout in seconds
    #[arg(long, env = "AUTH_TIMEOUT_SECS", default_value_t = DEFAULT_VERIFY_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Key-set cache lifetime in seconds
    #[arg(long, env = "JWKS_CACHE_TTL_SECS", default_value_t = DEFAULT_JWKS_CACHE_TTL_SECS)]
    pub jwks_cache_ttl: u64,
}
