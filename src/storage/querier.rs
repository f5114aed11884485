use super::{CommentRow, DBPool, PostDetail, PostListItem, TagInfo};

/// 用于查询文章相关数据
///
/// 提供已发布文章的列表、详情、评论、相似文章和全文搜索接口。
/// 所有查询只返回 `status = 'published'` 的文章。
pub trait Querier: Send + Sync {
    type Error;

    /// 根据 slug 查询标签
    ///
    /// 返回 [`TagInfo`]，如果标签不存在则返回 `None`。
    fn tag_by_slug(
        &self,
        slug: impl AsRef<str>,
    ) -> impl std::future::Future<Output = Result<Option<TagInfo>, Self::Error>>;

    /// 统计已发布文章总数
    ///
    /// 可选按标签过滤，作为分页的输入。
    fn count_published(
        &self,
        tag_id: Option<i64>,
    ) -> impl std::future::Future<Output = Result<i64, Self::Error>>;

    /// 分页查询已发布文章
    ///
    /// 按发布时间倒序，返回 [`PostListItem`] 的向量，可按标签过滤。
    fn published_page(
        &self,
        tag_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> impl std::future::Future<Output = Result<Vec<PostListItem>, Self::Error>>;

    /// 按发布日期和 slug 查询文章详情
    ///
    /// 年、月、日、slug 四个字段必须完全匹配，否则返回 `None`。
    fn post_by_date_slug(
        &self,
        year: i32,
        month: i32,
        day: i32,
        slug: impl AsRef<str>,
    ) -> impl std::future::Future<Output = Result<Option<PostDetail>, Self::Error>>;

    /// 按 ID 查询已发布文章
    fn post_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<PostDetail>, Self::Error>>;

    /// 查询文章的展示评论
    ///
    /// 只返回 `active = TRUE` 的评论，按创建时间升序。
    fn active_comments(
        &self,
        post_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<CommentRow>, Self::Error>>;

    /// 查询相似文章
    ///
    /// 返回与给定文章至少共享一个标签的已发布文章（不含其自身），
    /// 按共享标签数倒序，其次按发布时间倒序。
    fn similar_posts(
        &self,
        post_id: i64,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<PostListItem>, Self::Error>>;

    /// 全文搜索已发布文章
    ///
    /// 使用 PostgreSQL 的 `ts_rank` 对标题和正文做相关性排序。
    fn search(
        &self,
        query: impl AsRef<str>,
    ) -> impl std::future::Future<Output = Result<Vec<PostListItem>, Self::Error>>;

    /// 查询所有已发布文章使用的标签
    fn tags(&self) -> impl std::future::Future<Output = Result<Vec<TagInfo>, Self::Error>>;
}

impl Querier for DBPool {
    type Error = sqlx::Error;

    async fn tag_by_slug(&self, slug: impl AsRef<str>) -> Result<Option<TagInfo>, Self::Error> {
        sqlx::query_as::<_, TagInfo>(
            r#"
            SELECT id, name, slug
            FROM tags
            WHERE slug = $1
            "#,
        )
        .bind(slug.as_ref())
        .fetch_optional(self)
        .await
    }

    async fn count_published(&self, tag_id: Option<i64>) -> Result<i64, Self::Error> {
        let mut builder = sqlx::QueryBuilder::new(
            r#"
            SELECT COUNT(*)
            FROM posts p
            "#,
        );

        builder.push("WHERE p.status = 'published'");
        if let Some(tag) = tag_id {
            builder
                .push(" AND p.id IN (SELECT post_id FROM post_tags WHERE tag_id = ")
                .push_bind(tag)
                .push(")");
        }

        let query = builder.build_query_scalar::<i64>();
        query.fetch_one(self).await
    }

    async fn published_page(
        &self,
        tag_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostListItem>, Self::Error> {
        let mut builder = sqlx::QueryBuilder::new(
            r#"
            SELECT p.id, p.title, p.slug, p.author, p.body, p.publish,
                   COALESCE((SELECT array_agg(t.name ORDER BY t.name)
                             FROM post_tags pt
                             JOIN tags t ON t.id = pt.tag_id
                             WHERE pt.post_id = p.id), '{}') AS tags
            FROM posts p
            "#,
        );

        builder.push("WHERE p.status = 'published'");
        if let Some(tag) = tag_id {
            builder
                .push(" AND p.id IN (SELECT post_id FROM post_tags WHERE tag_id = ")
                .push_bind(tag)
                .push(")");
        }

        builder.push(" ORDER BY p.publish DESC ");
        builder.push(" LIMIT ").push_bind(limit);
        builder.push(" OFFSET ").push_bind(offset);

        let query = builder.build_query_as::<PostListItem>();
        query.fetch_all(self).await
    }

    async fn post_by_date_slug(
        &self,
        year: i32,
        month: i32,
        day: i32,
        slug: impl AsRef<str>,
    ) -> Result<Option<PostDetail>, Self::Error> {
        sqlx::query_as::<_, PostDetail>(
            r#"
            SELECT p.id, p.title, p.slug, p.author, p.body, p.publish, p.created, p.updated,
                   COALESCE((SELECT array_agg(t.name ORDER BY t.name)
                             FROM post_tags pt
                             JOIN tags t ON t.id = pt.tag_id
                             WHERE pt.post_id = p.id), '{}') AS tags
            FROM posts p
            WHERE p.status = 'published'
            AND p.slug = $1
            AND EXTRACT(YEAR FROM p.publish)::int = $2
            AND EXTRACT(MONTH FROM p.publish)::int = $3
            AND EXTRACT(DAY FROM p.publish)::int = $4
            LIMIT 1
            "#,
        )
        .bind(slug.as_ref())
        .bind(year)
        .bind(month)
        .bind(day)
        .fetch_optional(self)
        .await
    }

    async fn post_by_id(&self, id: i64) -> Result<Option<PostDetail>, Self::Error> {
        sqlx::query_as::<_, PostDetail>(
            r#"
            SELECT p.id, p.title, p.slug, p.author, p.body, p.publish, p.created, p.updated,
                   COALESCE((SELECT array_agg(t.name ORDER BY t.name)
                             FROM post_tags pt
                             JOIN tags t ON t.id = pt.tag_id
                             WHERE pt.post_id = p.id), '{}') AS tags
            FROM posts p
            WHERE p.status = 'published'
            AND p.id = $1
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(self)
        .await
    }

    async fn active_comments(&self, post_id: i64) -> Result<Vec<CommentRow>, Self::Error> {
        sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, name, email, body, created, active
            FROM comments
            WHERE post_id = $1
            AND active = TRUE
            ORDER BY created
            "#,
        )
        .bind(post_id)
        .fetch_all(self)
        .await
    }

    async fn similar_posts(
        &self,
        post_id: i64,
        limit: i64,
    ) -> Result<Vec<PostListItem>, Self::Error> {
        sqlx::query_as::<_, PostListItem>(
            r#"
            SELECT p.id, p.title, p.slug, p.author, p.body, p.publish,
                   COALESCE((SELECT array_agg(t.name ORDER BY t.name)
                             FROM post_tags pt
                             JOIN tags t ON t.id = pt.tag_id
                             WHERE pt.post_id = p.id), '{}') AS tags
            FROM posts p
            JOIN post_tags shared ON shared.post_id = p.id
            JOIN post_tags cur ON cur.tag_id = shared.tag_id AND cur.post_id = $1
            WHERE p.status = 'published'
            AND p.id <> $1
            GROUP BY p.id
            ORDER BY COUNT(*) DESC, p.publish DESC
            LIMIT $2
            "#,
        )
        .bind(post_id)
        .bind(limit)
        .fetch_all(self)
        .await
    }

    async fn search(&self, query: impl AsRef<str>) -> Result<Vec<PostListItem>, Self::Error> {
        sqlx::query_as::<_, PostListItem>(
            r#"
            SELECT p.id, p.title, p.slug, p.author, p.body, p.publish,
                   COALESCE((SELECT array_agg(t.name ORDER BY t.name)
                             FROM post_tags pt
                             JOIN tags t ON t.id = pt.tag_id
                             WHERE pt.post_id = p.id), '{}') AS tags,
                   ts_rank(to_tsvector('english', p.title || ' ' || p.body),
                           plainto_tsquery('english', $1)) AS rank
            FROM posts p
            WHERE p.status = 'published'
            AND to_tsvector('english', p.title || ' ' || p.body)
                @@ plainto_tsquery('english', $1)
            ORDER BY rank DESC
            "#,
        )
        .bind(query.as_ref())
        .fetch_all(self)
        .await
    }

    async fn tags(&self) -> Result<Vec<TagInfo>, Self::Error> {
        sqlx::query_as::<_, TagInfo>(
            r#"
            SELECT DISTINCT t.id, t.name, t.slug
            FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            JOIN posts p ON p.id = pt.post_id
            WHERE p.status = 'published'
            ORDER BY t.name
            "#,
        )
        .fetch_all(self)
        .await
    }
}
