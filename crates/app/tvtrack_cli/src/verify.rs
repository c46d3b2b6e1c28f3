use std::sync::Arc;
use std::time::Duration;

use tvtrack_core::auth::{AuthSettings, JwksClient, TokenVerifier};
use tvtrack_core::models::AuthenticatedUser;

use crate::cli::VerifyArgs;
use crate::{Error, Result};

/// Fetch the provider key set and verify `args.token` against it.
pub fn run(args: &VerifyArgs) -> Result<AuthenticatedUser> {
    let settings = AuthSettings {
        domain: args.domain.clone(),
        audience: args.audience.clone(),
        timeout: Duration::from_secs(args.timeout),
    };
    log::info!("Verifying token against {}", settings.issuer());

    let keys = JwksClient::new(
        settings.jwks_uri(),
        Duration::from_secs(args.jwks_cache_ttl),
        settings.timeout,
    )?;
    let verifier = TokenVerifier::new(Arc::new(keys), &settings);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime
        .block_on(verifier.authenticate(Some(&args.token)))?
        .ok_or_else(|| Error::Custom("No token supplied".into()))
}
