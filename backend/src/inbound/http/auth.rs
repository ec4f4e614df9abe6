//! Bearer-token request authentication.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::error::Error;
use crate::domain::user::UserId;
use crate::inbound::http::state::HttpState;

/// Identity of the authenticated caller, extracted from the
/// `Authorization: Bearer <token>` header.
///
/// Extraction fails with 401 when the header is missing, malformed, or the
/// token does not resolve to a stored user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub uid: String,
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| Error::unauthorized("Authentication required"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Authentication required"))?;
    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("Authentication required"))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let token = token?;
            let state =
                state.ok_or_else(|| Error::internal("application state not configured"))?;
            let user = state.accounts.resolve_token(&token).await?;
            Ok(AuthenticatedUser {
                id: user.id,
                uid: user.uid,
            })
        })
    }
}
