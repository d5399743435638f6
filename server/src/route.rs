mod phonebook;

use std::collections::HashSet;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method};
use axum::Router;
use kernel::interface::query::DependOnPhonebookQuery;
use kernel::interface::update::DependOnPhonebookModifier;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use self::phonebook::*;
use crate::handler::AppModule;

/// Echoes `Access-Control-Allow-Origin` only for allow-listed origins.
/// Origins are compared without a trailing slash.
pub fn cors(allowed_origins: impl IntoIterator<Item = String>) -> CorsLayer {
    let allowed = allowed_origins
        .into_iter()
        .map(|origin| origin.trim_end_matches('/').to_owned())
        .collect::<HashSet<_>>();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| {
                origin
                    .to_str()
                    .map(|origin| allowed.contains(origin.trim_end_matches('/')))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

pub fn router<D>(app: AppModule<D>, cors: CorsLayer) -> Router
where
    D: DependOnPhonebookQuery + DependOnPhonebookModifier,
{
    Router::<AppModule<D>>::new()
        .route_phonebook()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app)
}
