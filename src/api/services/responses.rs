//! Response builders
//!
//! Every response carries `Access-Control-Allow-Origin: *`; the front-end and third-party
//! pages call the JSON endpoints cross-origin.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, LOCATION};
use serde::Serialize;
use tracing::error;

use crate::services::geoip::HttpReply;

pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";
pub const NOT_FOUND_BODY: &str = "Error 404\nPage Not Found";
pub const INTERNAL_ERROR_PREFIX: &str = "edge router error";

fn json_text(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, JSON_CONTENT_TYPE))
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .body(body)
}

fn plain_text(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, TEXT_CONTENT_TYPE))
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .body(body)
}

pub fn json<T: Serialize>(value: &T) -> HttpResponse {
    match serde_json::to_string(value) {
        Ok(body) => json_text(body),
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            json_null()
        }
    }
}

/// Resolution produced no record.
pub fn json_null() -> HttpResponse {
    json_text("null".to_string())
}

/// Plain-text client address for scripts; curl also gets a newline.
pub fn client_ip(ip: Option<&str>, change_line: bool) -> HttpResponse {
    let mut body = ip.unwrap_or_default().to_string();
    if change_line {
        body.push('\n');
    }
    plain_text(StatusCode::OK, body)
}

pub fn robots() -> HttpResponse {
    plain_text(StatusCode::OK, String::new())
}

pub fn not_found() -> HttpResponse {
    plain_text(StatusCode::NOT_FOUND, NOT_FOUND_BODY.to_string())
}

/// 502 diagnostic, distinct from the "no data" responses.
pub fn internal_error(detail: &str, expose: bool) -> HttpResponse {
    let body = if expose {
        format!("{}: {}", INTERNAL_ERROR_PREFIX, detail)
    } else {
        INTERNAL_ERROR_PREFIX.to_string()
    };
    plain_text(StatusCode::BAD_GATEWAY, body)
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .finish()
}

/// Asset origin reply passed through: status, content type and body.
pub fn proxied(reply: HttpReply) -> HttpResponse {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = HttpResponse::build(status);
    if let Some(content_type) = reply.content_type {
        builder.insert_header((CONTENT_TYPE, content_type));
    }
    builder
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .body(reply.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(resp: HttpResponse) -> String {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn header<'a>(resp: &'a HttpResponse, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[actix_rt::test]
    async fn test_json_envelope() {
        let resp = json_null();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some(JSON_CONTENT_TYPE));
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
        assert_eq!(body_of(resp).await, "null");
    }

    #[actix_rt::test]
    async fn test_client_ip_newline() {
        assert_eq!(body_of(client_ip(Some("1.2.3.4"), true)).await, "1.2.3.4\n");
        assert_eq!(body_of(client_ip(Some("1.2.3.4"), false)).await, "1.2.3.4");
        assert_eq!(body_of(client_ip(None, false)).await, "");
    }

    #[actix_rt::test]
    async fn test_internal_error_hides_detail_by_default() {
        let hidden = internal_error("boom", false);
        assert_eq!(hidden.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_of(hidden).await, "edge router error");

        let exposed = internal_error("boom", true);
        assert_eq!(body_of(exposed).await, "edge router error: boom");
    }

    #[actix_rt::test]
    async fn test_proxied_passes_reply_through() {
        let resp = proxied(HttpReply {
            status: 404,
            content_type: Some("text/html".to_string()),
            body: b"<h1>missing</h1>".to_vec(),
        });
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(header(&resp, "content-type"), Some("text/html"));
        assert_eq!(body_of(resp).await, "<h1>missing</h1>");
    }

    #[actix_rt::test]
    async fn test_proxied_invalid_status() {
        let resp = proxied(HttpReply {
            status: 42,
            content_type: None,
            body: Vec::new(),
        });
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
