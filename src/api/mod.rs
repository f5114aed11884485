mod comment;
mod query;
mod share;

use axum::Router;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::{
    state::AppState,
    storage::{CommentRow, PostDetail, PostListItem, TagInfo},
};

/// 设置应用的路由。
///
/// 将 `/api` 下的查询接口、评论接口和分享接口组合在一起，并绑定应用状态。
pub fn setup_route(app: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            query::setup_route()
                .merge(comment::setup_route())
                .merge(share::setup_route()),
        )
        .with_state(app)
}

/// 启动 HTTP 服务，并使用给定的路由处理请求。
///
/// 在 `0.0.0.0:3000` 上监听 TCP 连接，并打印启动日志。
#[instrument(name = "http server", skip_all)]
pub async fn run_server_with_router(router: Router) {
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind TCP listener on 0.0.0.0:3000");

    tracing::info!("listening on :3000");

    axum::serve(listener, router)
        .await
        .expect("Failed to start Axum server");
}

/// 启动 HTTP 服务，自动设置路由和中间件。
///
/// 1. 生成路由
/// 2. 添加日志和追踪中间件
/// 3. 启动服务器
pub async fn run_server(app: AppState) {
    let router = setup_route(app);
    let router = add_middlewares(router);
    run_server_with_router(router).await
}

/// 为路由添加中间件，包括请求追踪和失败日志记录。
///
/// 日志记录会在请求失败时输出错误信息。
fn add_middlewares(router: Router) -> Router {
    fn log_failure(
        err: tower_http::classify::ServerErrorsFailureClass,
        _latency: std::time::Duration,
        _span: &tracing::Span,
    ) {
        tracing::error!(error = %err, "request failed");
    }

    router.layer(
        TraceLayer::new_for_http()
            .on_failure(log_failure)
            .on_request(|_req: &_, _span: &tracing::Span| {
                // 空实现，关闭请求日志
            }),
    )
}

/// 文章元信息，用于列表类展示。
#[derive(Debug, Serialize)]
pub struct PostMeta {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub author: String,
    pub body: String,
    pub publish: i64,
    pub tags: Vec<String>,
}

/// 完整文章，包括元信息和创建/更新时间。
#[derive(Debug, Serialize)]
pub struct PostContent {
    #[serde(flatten)]
    meta: PostMeta,

    created: i64,
    updated: i64,
}

/// 评论展示信息。
#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
    pub created: i64,
    pub active: bool,
}

/// 标签展示信息。
#[derive(Debug, Serialize)]
pub struct TagView {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<PostListItem> for PostMeta {
    fn from(p: PostListItem) -> Self {
        Self {
            id: p.id,
            title: p.title,
            slug: p.slug,
            author: p.author,
            body: p.body,
            publish: p.publish.timestamp_millis(),
            tags: p.tags,
        }
    }
}

impl From<PostDetail> for PostMeta {
    fn from(p: PostDetail) -> Self {
        Self {
            id: p.id,
            title: p.title,
            slug: p.slug,
            author: p.author,
            body: p.body,
            publish: p.publish.timestamp_millis(),
            tags: p.tags,
        }
    }
}

impl From<PostDetail> for PostContent {
    fn from(p: PostDetail) -> Self {
        let created = p.created.timestamp_millis();
        let updated = p.updated.timestamp_millis();

        Self {
            meta: p.into(),
            created,
            updated,
        }
    }
}

impl From<CommentRow> for CommentView {
    fn from(c: CommentRow) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            body: c.body,
            created: c.created.timestamp_millis(),
            active: c.active,
        }
    }
}

impl From<TagInfo> for TagView {
    fn from(t: TagInfo) -> Self {
        Self {
            id: t.id,
            name: t.name,
            slug: t.slug,
        }
    }
}
