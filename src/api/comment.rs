use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Form, Json, Router};
use serde::Serialize;
use validator::Validate;

use super::{CommentView, PostMeta};

use crate::{
    error::{ApiError, Result},
    forms::{CommentForm, FormErrors, form_errors},
    state::AppState,
    storage::{DBPool, Querier, Store},
};

/// 配置评论路由。
///
/// `POST /comment/{id}` 为文章提交评论，其他方法由路由层返回 405。
pub fn setup_route() -> Router<AppState> {
    Router::new().route("/comment/{id}", post(post_comment))
}

/// 评论提交上下文。
///
/// 校验失败时 `comment` 为空，`errors` 携带字段错误。
#[derive(Debug, Serialize)]
pub struct CommentContext {
    pub post: PostMeta,
    pub comment: Option<CommentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FormErrors>,
}

/// 为文章提交评论。
///
/// 校验通过时插入一条 `active = TRUE` 的评论并返回，
/// 校验失败时不产生任何写入。
/// 文章不存在或未发布时返回 [`ApiError::NotFound`]。
async fn post_comment(
    Path(id): Path<i64>,
    State(pool): State<DBPool>,
    Form(form): Form<CommentForm>,
) -> Result<Json<CommentContext>> {
    let post = pool.post_by_id(id).await?.ok_or(ApiError::NotFound)?;

    match form.validate() {
        Ok(()) => {
            let comment = pool
                .insert_comment(post.id, &form.name, &form.email, &form.body)
                .await?;

            Ok(Json(CommentContext {
                post: post.into(),
                comment: Some(comment.into()),
                errors: None,
            }))
        }
        Err(e) => Ok(Json(CommentContext {
            post: post.into(),
            comment: None,
            errors: Some(form_errors(&e)),
        })),
    }
}
