use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{CommentView, PostContent, PostMeta, TagView};

use crate::{
    error::{ApiError, Result},
    forms::SearchForm,
    pagination::{PageInfo, Paginator},
    state::AppState,
    storage::{DBPool, Querier, TagInfo},
};

/// 每页固定展示 3 篇文章
const PAGE_SIZE: i64 = 3;

/// 相似文章最多展示 4 篇
const SIMILAR_LIMIT: i64 = 4;

/// 配置文章相关路由。
///
/// 路由包括：
/// - `GET /posts`：文章列表
/// - `GET /posts/tag/{tag_slug}`：按标签过滤的文章列表
/// - `GET /posts/search`：全文搜索
/// - `GET /posts/{year}/{month}/{day}/{slug}`：获取单篇文章
/// - `GET /tags`：获取所有标签
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/posts", get(post_list))
        .route("/posts/tag/{tag_slug}", get(post_list_by_tag))
        .route("/posts/search", get(post_search))
        .route("/posts/{year}/{month}/{day}/{slug}", get(post_detail))
        .route("/tags", get(tag_list))
}

/// 列表查询参数。
///
/// 页码保持原始字符串，由 [`Paginator`] 负责解析和回退。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    page: Option<String>,
}

/// 文章列表上下文。
#[derive(Debug, Serialize)]
pub struct ListContext {
    pub tag: Option<TagView>,
    pub posts: Vec<PostMeta>,
    pub page: PageInfo,
}

/// 文章详情上下文，包括展示评论和相似文章。
#[derive(Debug, Serialize)]
pub struct DetailContext {
    pub post: PostContent,
    pub comments: Vec<CommentView>,
    pub similar_posts: Vec<PostMeta>,
}

/// 搜索上下文。
#[derive(Debug, Serialize)]
pub struct SearchContext {
    pub query: Option<String>,
    pub results: Vec<PostMeta>,
}

/// 获取已发布文章列表。
async fn post_list(
    Query(params): Query<ListParams>,
    State(pool): State<DBPool>,
) -> Result<Json<ListContext>> {
    list_page(&pool, None, params).await
}

/// 获取带指定标签的已发布文章列表。
///
/// 标签不存在时返回 [`ApiError::NotFound`]。
async fn post_list_by_tag(
    Path(tag_slug): Path<String>,
    Query(params): Query<ListParams>,
    State(pool): State<DBPool>,
) -> Result<Json<ListContext>> {
    let tag = pool
        .tag_by_slug(&tag_slug)
        .await?
        .ok_or(ApiError::NotFound)?;

    list_page(&pool, Some(tag), params).await
}

async fn list_page(
    pool: &DBPool,
    tag: Option<TagInfo>,
    params: ListParams,
) -> Result<Json<ListContext>> {
    let tag_id = tag.as_ref().map(|t| t.id);

    let count = pool.count_published(tag_id).await?;
    let paginator = Paginator::new(count, PAGE_SIZE);
    let number = paginator.resolve(params.page.as_deref());

    let posts = pool
        .published_page(tag_id, paginator.limit(), paginator.offset(number))
        .await?;

    Ok(Json(ListContext {
        tag: tag.map(Into::into),
        posts: posts.into_iter().map(Into::into).collect(),
        page: paginator.page_info(number),
    }))
}

/// 根据发布日期和 slug 获取单篇文章。
///
/// 返回 [`DetailContext`]，任一字段不匹配时返回 [`ApiError::NotFound`]。
async fn post_detail(
    Path((year, month, day, slug)): Path<(i32, i32, i32, String)>,
    State(pool): State<DBPool>,
) -> Result<Json<DetailContext>> {
    let post = pool
        .post_by_date_slug(year, month, day, &slug)
        .await?
        .ok_or(ApiError::NotFound)?;

    let comments = pool.active_comments(post.id).await?;
    let similar = pool.similar_posts(post.id, SIMILAR_LIMIT).await?;

    Ok(Json(DetailContext {
        post: post.into(),
        comments: comments.into_iter().map(Into::into).collect(),
        similar_posts: similar.into_iter().map(Into::into).collect(),
    }))
}

/// 全文搜索已发布文章。
///
/// 未携带 `query` 参数或参数校验失败时返回空结果，不报错。
async fn post_search(
    Query(params): Query<SearchParams>,
    State(pool): State<DBPool>,
) -> Result<Json<SearchContext>> {
    let Some(query) = params.query else {
        return Ok(Json(SearchContext {
            query: None,
            results: Vec::new(),
        }));
    };

    let form = SearchForm { query };
    if form.validate().is_err() {
        return Ok(Json(SearchContext {
            query: None,
            results: Vec::new(),
        }));
    }

    let results = pool.search(&form.query).await?;

    Ok(Json(SearchContext {
        query: Some(form.query),
        results: results.into_iter().map(Into::into).collect(),
    }))
}

/// 搜索查询参数。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    query: Option<String>,
}

/// 获取所有已发布文章使用的标签。
async fn tag_list(State(pool): State<DBPool>) -> Result<Json<Vec<TagView>>> {
    let tags = pool.tags().await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}
