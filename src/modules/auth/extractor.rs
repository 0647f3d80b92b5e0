use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::shared::context::ServiceContext;

use super::domain::AuthContext;
use super::service::{self, RawCredentials};

impl FromRequest for AuthContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let ctx = req
                .app_data::<web::Data<ServiceContext>>()
                .cloned()
                .ok_or_else(|| actix_web::error::ErrorInternalServerError("ServiceContext not configured"))?;

            let creds = extract_credentials(&req);

            service::resolve(&ctx, creds)
                .await
                .map_err(actix_web::Error::from)
        })
    }
}

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name)?.to_str().ok()
}

fn query_param(req: &HttpRequest, name: &str) -> Option<String> {
    let query = req.query_string();
    web::Query::<std::collections::HashMap<String, String>>::from_query(query)
        .ok()
        .and_then(|q| q.get(name).cloned())
}

fn cookie_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.cookie(name).map(|c| c.value().to_string())
}

/// §6.1: extracts every credential the request carries, in priority order.
/// Resolution (picking the first that actually authenticates) happens in
/// `service::resolve`.
fn extract_credentials(req: &HttpRequest) -> RawCredentials {
    let share_key = header_str(req, "x-immich-share-key")
        .map(str::to_string)
        .or_else(|| query_param(req, "key"));

    let share_slug = header_str(req, "x-immich-share-slug")
        .map(str::to_string)
        .or_else(|| query_param(req, "slug"));

    let session_token = header_str(req, "x-immich-user-token")
        .or_else(|| header_str(req, "x-immich-session-token"))
        .map(str::to_string)
        .or_else(|| query_param(req, "sessionKey"))
        .or_else(|| {
            header_str(req, "Authorization")
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::to_string)
        })
        .or_else(|| cookie_value(req, "immich_access_token"));

    let api_key = header_str(req, "x-api-key")
        .map(str::to_string)
        .or_else(|| query_param(req, "apiKey"));

    RawCredentials {
        share_key,
        share_slug,
        session_token,
        api_key,
    }
}
