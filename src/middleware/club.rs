// ABOUTME: Request middleware that resolves the club and the acting member for API routes
// ABOUTME: Club from the Host subdomain or x-club header, member from the x-user-id header
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! Club context middleware
//!
//! Authentication itself happens upstream; the proxy asserts the user's id in
//! the `x-user-id` header. This middleware turns that id into an
//! [`Actor`] scoped to the club named by the request and inserts it into the
//! request extensions. Handlers take `Extension<Actor>`.
//!
//! The club is taken from, in order:
//! 1. The `x-club` header (a club subdomain)
//! 2. The first label of the `Host` header when it is `<subdomain>.<BASE_DOMAIN>`

use crate::constants::headers;
use crate::errors::{AppError, AppResult};
use crate::server::ServerResources;
use crate::services::club_admin::{resolve_actor, resolve_club};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use courtside_core::permissions::Actor;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Resolve the actor for the request or reject it
///
/// # Errors
///
/// Rejects with 401 when the club or user header is absent, 404 for an
/// unknown club and 403 when the user is not a member
pub async fn club_context_middleware(
    State(resources): State<Arc<ServerResources>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let actor = resolve_request_actor(req.headers(), &resources).await?;
    debug!(club.id = %actor.club_id, user.id = %actor.user_id, role = actor.role.as_str(), "Club context resolved");
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

async fn resolve_request_actor(headers: &HeaderMap, resources: &ServerResources) -> AppResult<Actor> {
    let subdomain = club_subdomain(headers, &resources.config.base_domain)
        .ok_or_else(AppError::auth_required)?;
    let user_id = user_id(headers)?;

    let club = resolve_club(&resources.database, &subdomain).await?;
    resolve_actor(&resources.database, club.id, user_id).await
}

/// Club subdomain named by the request, if any
#[must_use]
pub fn club_subdomain(headers: &HeaderMap, base_domain: &str) -> Option<String> {
    if let Some(explicit) = header_str(headers, headers::CLUB) {
        let explicit = explicit.trim().to_ascii_lowercase();
        if !explicit.is_empty() {
            return Some(explicit);
        }
    }

    let base_domain = base_domain.trim().trim_start_matches('.').to_ascii_lowercase();
    let host = header_str(headers, "host")?.trim().to_ascii_lowercase();
    let host = host.split(':').next().unwrap_or_default();
    let label = host.strip_suffix(base_domain.as_str())?.strip_suffix('.')?;
    if label.is_empty() || label.contains('.') {
        return None;
    }
    Some(label.to_owned())
}

fn user_id(headers: &HeaderMap) -> AppResult<Uuid> {
    let raw = header_str(headers, headers::USER_ID).ok_or_else(AppError::auth_required)?;
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::invalid_format(format!("{} must be a UUID", headers::USER_ID)))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_subdomain_from_host() {
        let headers = headers_with(&[("host", "riverside.courtside.app:8081")]);
        assert_eq!(
            club_subdomain(&headers, "courtside.app").as_deref(),
            Some("riverside")
        );
    }

    #[test]
    fn test_base_domain_case_is_ignored() {
        let headers = headers_with(&[("host", "Riverside.Courtside.App")]);
        assert_eq!(
            club_subdomain(&headers, "Courtside.APP").as_deref(),
            Some("riverside")
        );
    }

    #[test]
    fn test_explicit_header_wins() {
        let headers = headers_with(&[("host", "riverside.courtside.app"), ("x-club", "Hilltop")]);
        assert_eq!(
            club_subdomain(&headers, "courtside.app").as_deref(),
            Some("hilltop")
        );
    }

    #[test]
    fn test_bare_or_nested_host_has_no_club() {
        assert!(club_subdomain(&headers_with(&[("host", "courtside.app")]), "courtside.app").is_none());
        assert!(
            club_subdomain(&headers_with(&[("host", "a.b.courtside.app")]), "courtside.app").is_none()
        );
        assert!(club_subdomain(&headers_with(&[("host", "evilcourtside.app")]), "courtside.app").is_none());
        assert!(club_subdomain(&HeaderMap::new(), "courtside.app").is_none());
    }

    #[test]
    fn test_user_id_header() {
        let id = Uuid::new_v4();
        let headers = headers_with(&[("x-user-id", &id.to_string())]);
        assert_eq!(user_id(&headers).unwrap(), id);

        let err = user_id(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.http_status(), 401);

        let err = user_id(&headers_with(&[("x-user-id", "not-a-uuid")])).unwrap_err();
        assert!(err.is_validation());
    }
}
