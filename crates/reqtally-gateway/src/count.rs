//! The counting handler.
//!
//! Responsibilities:
//! - Derive a numeric key from the peer address
//! - Find-or-increment that key under the zone guard
//! - Render the ascending report (its own short lock scope) and answer 200
//! - Surface arena exhaustion as a 500 with a stable JSON error code
//!
//! Exactly one increment (or one node creation) happens per invocation; a
//! failed insertion changes nothing and still releases the guard.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use reqtally_core::TallyError;

use crate::app_state::AppState;

/// Numeric key for a client address: the IPv4 address bytes in network
/// order read as a big-endian u32. IPv4-mapped IPv6 unwraps to the embedded
/// v4 address; other IPv6 falls back to the low 32 bits.
pub fn client_key(addr: &SocketAddr) -> u32 {
    match addr.ip() {
        IpAddr::V4(v4) => u32::from(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => u32::from(v4),
            None => {
                let o = v6.octets();
                u32::from_be_bytes([o[12], o[13], o[14], o[15]])
            }
        },
    }
}

pub async fn count(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Response {
    let key = client_key(&addr);

    match state.zone().find_or_increment(key) {
        Ok(count) => {
            state.metrics().requests_total.inc(&[("outcome", "ok")]);
            tracing::debug!(%addr, key, count, "counted request");
        }
        Err(e) => {
            state.metrics().requests_total.inc(&[("outcome", "error")]);
            tracing::warn!(%addr, key, error = %e, "find-or-increment failed");
            return error_response(&e);
        }
    }

    let body = state
        .zone()
        .render_report(state.cfg().counter.max_report_bytes);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html")],
        body,
    )
        .into_response()
}

fn error_response(err: &TallyError) -> Response {
    let body = json!({
        "code": err.client_code().as_str(),
        "msg": err.to_string(),
    })
    .to_string();

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
