use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Form, Json, Router};
use chrono::Datelike;
use serde::Serialize;
use validator::Validate;

use super::PostMeta;

use crate::{
    error::{ApiError, Result},
    forms::{EmailPostForm, FormErrors, form_errors},
    mail::{Mailer, ShareEmail},
    state::AppState,
    storage::{DBPool, PostDetail, Querier},
};

/// 配置分享路由。
///
/// `GET /share/{id}` 返回分享表单上下文，`POST /share/{id}` 提交表单。
pub fn setup_route() -> Router<AppState> {
    Router::new().route("/share/{id}", get(share_form).post(share_submit))
}

/// 分享上下文。
///
/// `sent` 标记本次请求是否投递了邮件。
#[derive(Debug, Serialize)]
pub struct ShareContext {
    pub post: PostMeta,
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FormErrors>,
}

/// 展示分享表单。
///
/// 文章不存在或未发布时返回 [`ApiError::NotFound`]。
async fn share_form(Path(id): Path<i64>, State(pool): State<DBPool>) -> Result<Json<ShareContext>> {
    let post = pool.post_by_id(id).await?.ok_or(ApiError::NotFound)?;

    Ok(Json(ShareContext {
        post: post.into(),
        sent: false,
        errors: None,
    }))
}

/// 提交分享表单。
///
/// 校验通过时向收件人投递一封邮件并置 `sent = true`，
/// 校验失败时返回字段错误，不发送邮件。
async fn share_submit(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Form(form): Form<EmailPostForm>,
) -> Result<Json<ShareContext>> {
    let post = state
        .pool()
        .post_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    match form.validate() {
        Ok(()) => {
            let email = ShareEmail {
                to: form.to,
                sender_name: form.name,
                post_title: post.title.clone(),
                post_url: post_url(state.base_url(), &post),
                comments: form.comments,
            };
            state.mailer().send(&email).await?;

            Ok(Json(ShareContext {
                post: post.into(),
                sent: true,
                errors: None,
            }))
        }
        Err(e) => Ok(Json(ShareContext {
            post: post.into(),
            sent: false,
            errors: Some(form_errors(&e)),
        })),
    }
}

/// 文章的完整访问链接，用于邮件正文。
fn post_url(base_url: &str, post: &PostDetail) -> String {
    format!(
        "{}/api/posts/{}/{}/{}/{}",
        base_url,
        post.publish.year(),
        post.publish.month(),
        post.publish.day(),
        post.slug
    )
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;

    #[test]
    fn test_post_url() {
        let post = PostDetail {
            id: 1,
            title: "First Post".to_string(),
            slug: "first-post".to_string(),
            author: "ann".to_string(),
            body: String::new(),
            publish: Local.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
            created: Local.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
            updated: Local.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
            tags: vec![],
        };

        assert_eq!(
            post_url("http://blog.example.com", &post),
            "http://blog.example.com/api/posts/2026/8/1/first-post"
        );
    }
}
