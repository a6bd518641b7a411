/*!
 * 速率限制中间件
 *
 * 固定窗口计数：同一客户端在一个窗口内超过上限后返回 429，
 * 直到窗口结束。已认证请求按用户计数，其余按客户端 IP。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 *
 * 预设：登录 5 次/分钟，OAuth 回调与刷新令牌 10 次/分钟，自动分班 6 次/分钟。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue, RETRY_AFTER},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

const LONGEST_WINDOW_SECS: u64 = 300;

// 键包含窗口序号，过期时间只需覆盖最长的窗口
static COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(LONGEST_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    scope: &'static str,
}

impl RateLimit {
    fn preset(scope: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, LONGEST_WINDOW_SECS),
            scope,
        }
    }

    pub fn login() -> Self {
        Self::preset("login", 5, 60)
    }

    /// 每次回调都会访问 Google 接口
    pub fn oauth() -> Self {
        Self::preset("oauth", 10, 60)
    }

    pub fn refresh_token() -> Self {
        Self::preset("refresh", 10, 60)
    }

    pub fn auto_assign() -> Self {
        Self::preset("auto_assign", 6, 60)
    }
}

/// 计数键与当前窗口剩余秒数
fn window_key(scope: &str, client: &str, now: u64, window_secs: u64) -> (String, u64) {
    let bucket = now / window_secs;
    let retry_after = window_secs - now % window_secs;
    (format!("{scope}:{client}:{bucket}"), retry_after)
}

/// 客户端 IP：连接信息优先，其次 X-Forwarded-For 的第一项，再次 X-Real-IP
///
/// 转发头可以伪造，部署在反向代理后面时应由代理覆盖这些头。
pub fn extract_client_ip(req: &HttpRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next());
    let real_ip = req
        .headers()
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok());

    [forwarded, real_ip]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|ip| is_valid_ip(ip))
        .map(str::to_string)
        .or(connection_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

fn client_key(req: &ServiceRequest) -> String {
    let user_key = req
        .extensions()
        .get::<User>()
        .map(|user| format!("user:{}", user.id));
    user_key.unwrap_or_else(|| format!("ip:{}", extract_client_ip(req.request())))
}

fn too_many_requests(limit: u32, retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header((RETRY_AFTER, retry_after.to_string()))
        .insert_header((LIMIT_HEADER, limit.to_string()))
        .insert_header((REMAINING_HEADER, "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let (key, retry_after) =
                window_key(limit.scope, &client_key(&req), now, limit.window_secs);

            let count = COUNTERS.get(&key).await.unwrap_or(0);
            if count >= limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    key, count, limit.max_requests
                );
                return Ok(req.into_response(
                    too_many_requests(limit.max_requests, retry_after).map_into_right_body(),
                ));
            }
            COUNTERS.insert(key, count + 1).await;

            let remaining = limit.max_requests.saturating_sub(count + 1);
            let mut res = srv.call(req).await?;
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static(LIMIT_HEADER),
                HeaderValue::from(limit.max_requests),
            );
            headers.insert(
                HeaderName::from_static(REMAINING_HEADER),
                HeaderValue::from(remaining),
            );
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(RateLimit::oauth().max_requests, 10);
        assert_eq!(RateLimit::auto_assign().scope, "auto_assign");
    }

    #[test]
    fn test_window_key_changes_at_window_boundary() {
        let (a, retry_a) = window_key("login", "ip:1.2.3.4", 120, 60);
        let (b, retry_b) = window_key("login", "ip:1.2.3.4", 179, 60);
        let (c, _) = window_key("login", "ip:1.2.3.4", 180, 60);

        assert_eq!(a, b);
        assert_ne!(b, c);
        assert_eq!(retry_a, 60);
        assert_eq!(retry_b, 1);
        assert_ne!(a, window_key("oauth", "ip:1.2.3.4", 120, 60).0);
    }

    #[test]
    fn test_client_ip_prefers_forwarded_header_when_peer_missing() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.1"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "203.0.113.9");

        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "garbage"))
            .insert_header(("X-Real-IP", "198.51.100.7"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "198.51.100.7");
    }

    #[test]
    fn test_client_ip_uses_peer_addr() {
        let req = TestRequest::default()
            .peer_addr("198.51.100.4:5555".parse().unwrap())
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "198.51.100.4");
    }

    #[actix_web::test]
    async fn test_requests_over_limit_get_429() {
        use actix_web::{App, test, web};

        let app = test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::preset("test_limited", 2, 300))
                    .route(web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let call = || {
            TestRequest::get()
                .uri("/limited")
                .insert_header(("X-Real-IP", "192.0.2.77"))
                .to_request()
        };

        let first = test::call_service(&app, call()).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers().get(REMAINING_HEADER).unwrap(), "1");
        assert_eq!(test::call_service(&app, call()).await.status(), StatusCode::OK);

        let blocked = test::call_service(&app, call()).await;
        assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(blocked.headers().contains_key(RETRY_AFTER));
    }
}
