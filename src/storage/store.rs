use super::{CommentRow, DBPool};

/// 提供评论的数据库写入接口
///
/// 评论是本服务唯一的写入路径，文章由外部流程发布。
pub trait Store: Send + Sync {
    type Error;

    /// 为指定文章插入一条评论
    ///
    /// `active` 使用数据库默认值 TRUE，返回插入后的 [`CommentRow`]。
    fn insert_comment(
        &self,
        post_id: i64,
        name: &str,
        email: &str,
        body: &str,
    ) -> impl std::future::Future<Output = Result<CommentRow, Self::Error>>;
}

impl Store for DBPool {
    type Error = sqlx::Error;

    async fn insert_comment(
        &self,
        post_id: i64,
        name: &str,
        email: &str,
        body: &str,
    ) -> Result<CommentRow, Self::Error> {
        sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (post_id, name, email, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, name, email, body, created, active
            "#,
        )
        .bind(post_id)
        .bind(name)
        .bind(email)
        .bind(body)
        .fetch_one(self)
        .await
    }
}
