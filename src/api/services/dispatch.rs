//! 顶层请求分发
//!
//! 所有请求都进入 `DispatchService::handle`：
//! 路由表给出唯一的 `RouteDecision`，再交给对应的处理逻辑。
//! 处理过程中出现的 panic 在这里被捕获并转换为 502，不会影响其他请求。

use std::any::Any;
use std::panic::AssertUnwindSafe;

use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::FutureExt;
use tracing::{debug, error, warn};

use super::responses;
use super::state::AppState;
use crate::router::RouteDecision;
use crate::services::https_location;
use crate::services::{EdgeMetadata, ProviderKind};
use crate::utils::ip::header_str;

pub struct DispatchService;

impl DispatchService {
    pub async fn handle(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
        let outcome = AssertUnwindSafe(Self::route(&req, &state))
            .catch_unwind()
            .await;

        match outcome {
            Ok(response) => response,
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                error!("Handler panicked on {}: {}", req.path(), detail);
                responses::internal_error(&detail, state.expose_errors)
            }
        }
    }

    async fn route(req: &HttpRequest, state: &AppState) -> HttpResponse {
        let user_agent = header_str(req.headers(), "user-agent");
        let decision = state.routes.decide(req.path(), user_agent);
        let edge = EdgeMetadata::from_request(req, &state.edge.headers);

        match decision {
            RouteDecision::Query { provider, ip } => {
                Self::resolve(state, provider, Some(&ip), &edge).await
            }
            RouteDecision::Json(provider) => Self::resolve(state, provider, None, &edge).await,
            RouteDecision::EdgeRaw => responses::json(&edge),
            RouteDecision::Robots => responses::robots(),
            RouteDecision::HeadlessText { change_line } => {
                responses::client_ip(edge.client_ip.as_deref(), change_line)
            }
            RouteDecision::Page => Self::page(req, state, &edge).await,
            RouteDecision::NotFound => responses::not_found(),
        }
    }

    async fn resolve(
        state: &AppState,
        kind: ProviderKind,
        ip: Option<&str>,
        edge: &EdgeMetadata,
    ) -> HttpResponse {
        let Some(provider) = state.providers.get(kind) else {
            warn!("No provider registered for {}", kind);
            return responses::json_null();
        };

        match provider.resolve(ip, edge).await {
            Ok(record) => responses::json(&record),
            Err(e) if e.is_internal() => {
                error!("Provider {} broke: {}", kind, e);
                responses::internal_error(&e.to_string(), state.expose_errors)
            }
            // 上游失败已在 adapter 内记录
            Err(_) => responses::json_null(),
        }
    }

    async fn page(req: &HttpRequest, state: &AppState, edge: &EdgeMetadata) -> HttpResponse {
        if state.edge.enforce_https && !edge.has_tls() {
            let conn = req.connection_info();
            let location = https_location(conn.host(), req.path(), req.query_string());
            debug!("Upgrading {} to HTTPS", req.path());
            return responses::redirect(&location);
        }

        match state.assets.fetch(req.path()).await {
            None => responses::not_found(),
            Some(Ok(reply)) => responses::proxied(reply),
            Some(Err(e)) => {
                warn!("Asset fetch for {} failed: {}", req.path(), e);
                responses::internal_error(&e.to_string(), state.expose_errors)
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
