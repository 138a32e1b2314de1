use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::{debug, error, trace};

use crate::analytics::ClientInfo;
use crate::api::identity::IdentityHeaders;
use crate::config::StaticConfig;
use crate::services::{Resolution, ResolverCore};
use crate::utils::ip::extract_client_ip;

/// Request-independent data the redirect handler needs.
pub struct RedirectContext {
    pub resolver: Arc<ResolverCore>,
    pub identity: IdentityHeaders,
    pub login_url: String,
    pub default_url: String,
    pub trusted_proxies: Vec<String>,
}

impl RedirectContext {
    pub fn new(resolver: Arc<ResolverCore>, config: &StaticConfig) -> Self {
        Self {
            resolver,
            identity: IdentityHeaders::from(&config.auth),
            login_url: config.auth.login_url.clone(),
            default_url: config.resolver.default_url.clone(),
            trusted_proxies: config.server.trusted_proxies.clone(),
        }
    }
}

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        ctx: web::Data<RedirectContext>,
    ) -> impl Responder {
        // 使用未解码的原始路径，`%2F` 由解析器按段解码
        let captured_path = req.path().trim_start_matches('/').to_string();

        if captured_path.trim_matches('/').is_empty() {
            return Self::landing_response(&ctx);
        }

        let identity = ctx.identity.extract(req.headers());
        let client = Self::client_info(&req, &ctx.trusted_proxies);

        match ctx
            .resolver
            .resolve(&captured_path, identity.as_ref(), &client)
            .await
        {
            Ok(Resolution::Redirect(url)) => Self::finish_redirect(&url),
            Ok(Resolution::NotFound) => {
                debug!("Redirect link not found: {}", &captured_path);
                Self::not_found_response()
            }
            Ok(Resolution::RequireLogin) => {
                trace!("Login required for: {}", &captured_path);
                Self::login_response(&req, &ctx.login_url)
            }
            Ok(Resolution::Forbidden) => Self::forbidden_response(),
            Err(e) => {
                error!("Resolver error for '{}': {}", &captured_path, e);
                Self::error_response()
            }
        }
    }

    pub async fn landing(ctx: web::Data<RedirectContext>) -> impl Responder {
        Self::landing_response(&ctx)
    }

    fn landing_response(ctx: &RedirectContext) -> HttpResponse {
        HttpResponse::TemporaryRedirect()
            .insert_header(("Location", ctx.default_url.as_str()))
            .finish()
    }

    fn client_info(req: &HttpRequest, trusted_proxies: &[String]) -> ClientInfo {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(String::from)
        };

        ClientInfo {
            ip: extract_client_ip(req, trusted_proxies),
            user_agent: header("user-agent"),
            referrer: header("referer"),
            head_request: req.method() == Method::HEAD,
        }
    }

    /// 不区分“链接不存在”与“模板参数不匹配”
    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "no-store"))
            .body("Not Found")
    }

    #[inline]
    fn forbidden_response() -> HttpResponse {
        HttpResponse::build(StatusCode::FORBIDDEN)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "no-store"))
            .body("Forbidden")
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Internal Server Error")
    }

    /// 跳转到登录入口，登录后通过 next 参数回到原路径
    fn login_response(req: &HttpRequest, login_url: &str) -> HttpResponse {
        let next = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| req.path());
        let separator = if login_url.contains('?') { '&' } else { '?' };
        let location = format!("{}{}next={}", login_url, separator, urlencoding::encode(next));

        HttpResponse::Found()
            .insert_header(("Location", location))
            .insert_header(("Cache-Control", "no-store"))
            .finish()
    }

    fn finish_redirect(target_url: &str) -> HttpResponse {
        HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
            .insert_header(("Location", target_url))
            .insert_header(("Cache-Control", "private, no-cache"))
            .finish()
    }
}

/// Redirect 路由配置（必须最后注册：兜底匹配所有路径）
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/", web::get().to(RedirectService::landing))
        .route("/", web::head().to(RedirectService::landing))
        .route("/{path:.*}", web::get().to(RedirectService::handle_redirect))
        .route("/{path:.*}", web::head().to(RedirectService::handle_redirect))
}
