use super::gate::AccessGate;
use crate::error::ApiError;
use actix_web::dev::{Payload, ServiceRequest};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use actix_web_httpauth::extractors::basic::BasicAuth;
use futures::future::{ok, Ready};

/// Username that passed the gate for the current request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

/// Basic-auth validator for `HttpAuthentication::basic`. Every gated request
/// carries the session credentials and is checked against the gate again.
pub async fn validate_credentials(
    req: ServiceRequest,
    credentials: BasicAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let Some(gate) = req.app_data::<web::Data<AccessGate>>().cloned() else {
        log::error!("Access gate missing from app data for path: {}", req.path());
        return Err((ApiError::Internal.into(), req));
    };

    let username = credentials.user_id();
    let password = credentials.password().unwrap_or_default();

    match gate.authenticate(username, password) {
        Ok(()) => {
            log::debug!("Credentials accepted for {} on {}", username, req.path());
            req.extensions_mut()
                .insert(AuthenticatedUser(username.to_string()));
            Ok(req)
        }
        Err(e) => {
            log::warn!("Rejected credentials for {} on {}: {}", username, req.path(), e);
            Err((ApiError::InvalidCredentials.into(), req))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ok(user.clone()),
            None => {
                log::warn!(
                    "AuthenticatedUser extractor used on ungated path: {}",
                    req.path()
                );
                futures::future::err(ApiError::InvalidCredentials.into())
            }
        }
    }
}
