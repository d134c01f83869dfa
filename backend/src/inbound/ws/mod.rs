//! WebSocket inbound adapter broadcasting stock snapshots.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list)
//! - initialise the per-connection session loop
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
    rt,
};
use tracing::{error, warn};
use url::Url;

mod session;

pub mod messages;
pub mod state;

/// Handle WebSocket upgrade for the stock feed endpoint.
#[get("/ws/stock")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }

    validate_origin(origin_header)?;

    let (response, session, message_stream) = actix_ws::handle(&req, stream).map_err(|err| {
        error!(error = %err, "WebSocket upgrade failed");
        err
    })?;
    rt::spawn(session::handle_ws_session(
        state.catalog.clone(),
        state.feed.clone(),
        session,
        message_stream,
    ));
    Ok(response)
}

fn validate_origin(origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if is_allowed_origin(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

const PRIMARY_HOST: &str = "kiosk.example";
const LOCALHOST: &str = "localhost";
const ALLOWED_SUBDOMAIN_SUFFIX: &str = ".kiosk.example";

/// Returns true when a parsed Origin belongs to the static allow-list.
///
/// The allow-list currently accepts HTTPS requests from the kiosk root
/// domain and any of its subdomains, and HTTP requests from localhost with a
/// non-zero explicit port. Once configuration is available this should move
/// into a runtime-controlled allow-list.
fn is_allowed_origin(origin: &Url) -> bool {
    let host = match origin.host_str() {
        Some(value) => value,
        None => return false,
    };

    match origin.scheme() {
        "http" if host == LOCALHOST => matches!(origin.port(), Some(port) if port != 0),
        "https" if host == PRIMARY_HOST => true,
        "https" if host.strip_suffix(ALLOWED_SUBDOMAIN_SUFFIX).is_some() => true,
        _ => false,
    }
}
