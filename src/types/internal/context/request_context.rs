use std::net::IpAddr;

use poem::Request;

use crate::errors::InternalError;
use crate::errors::internal::AuthorizationError;
use crate::providers::TokenProvider;
use crate::types::internal::auth::Claims;
use crate::types::internal::principal::Principal;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through coordinators and providers
///
/// Carries what logging needs (request id, source, actor) and, for
/// authenticated API calls, the validated JWT claims.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Validated JWT claims if authenticated
    pub claims: Option<Claims>,

    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            claims: None,
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    /// Create a RequestContext for system operations
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            claims: None,
            source: RequestSource::System,
            actor_id: format!("system:{}", operation_name),
        }
    }

    /// Create an unauthenticated API context
    pub fn for_api(ip_address: Option<IpAddr>) -> Self {
        Self {
            ip_address,
            request_id: RequestId::new(),
            claims: None,
            source: RequestSource::API,
            actor_id: "anonymous".to_owned(),
        }
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    /// Build an authenticated context from a bearer token
    ///
    /// # Returns
    /// * `Ok(ctx)` - Token valid, claims attached
    /// * `Err(InternalError)` - Token invalid or expired
    pub fn authenticate(
        req: &Request,
        token: &str,
        token_provider: &TokenProvider,
    ) -> Result<Self, InternalError> {
        let claims = token_provider.validate_jwt(token)?;
        let ctx = Self::for_api(Self::extract_ip_address(req)).with_auth(claims);

        tracing::trace!("Request context created: {:?}", ctx);

        Ok(ctx)
    }

    /// Set authentication state with claims
    pub fn with_auth(mut self, claims: Claims) -> Self {
        self.actor_id = claims.sub.clone();
        self.claims = Some(claims);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }

    /// Principal carried by this context
    ///
    /// Unauthenticated contexts and malformed claims both resolve to
    /// `PrincipalUnresolved`.
    pub fn principal(&self) -> Result<Principal, InternalError> {
        let claims = self
            .claims
            .as_ref()
            .ok_or_else(|| AuthorizationError::principal_unresolved("request is not authenticated"))?;

        Ok(Principal::from_claims(claims)?)
    }
}
