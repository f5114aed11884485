use chrono::{DateTime, Local};

/// 文章详情行
///
/// 包含正文在内的完整字段，用于详情页、评论和分享接口。
#[derive(Debug, sqlx::FromRow)]
pub struct PostDetail {
    /// 文章 ID
    pub id: i64,
    /// 标题
    pub title: String,
    /// 同一发布日期内唯一的 slug
    pub slug: String,
    /// 作者名称
    pub author: String,
    /// 正文
    pub body: String,
    /// 发布时间
    pub publish: DateTime<Local>,
    /// 创建时间
    pub created: DateTime<Local>,
    /// 更新时间
    pub updated: DateTime<Local>,
    /// 标签名列表
    pub tags: Vec<String>,
}

/// 文章列表行
///
/// 用于列表、搜索和相似文章，不含创建/更新时间。
#[derive(Debug, sqlx::FromRow)]
pub struct PostListItem {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub author: String,
    pub body: String,
    pub publish: DateTime<Local>,
    pub tags: Vec<String>,
}

/// 评论行
#[derive(Debug, sqlx::FromRow)]
pub struct CommentRow {
    /// 评论 ID
    pub id: i64,
    /// 所属文章 ID
    pub post_id: i64,
    /// 评论者名称
    pub name: String,
    /// 评论者邮箱
    pub email: String,
    /// 评论内容
    pub body: String,
    /// 创建时间
    pub created: DateTime<Local>,
    /// 是否展示，入库时默认为 TRUE
    pub active: bool,
}

/// 标签信息
#[derive(Debug, sqlx::FromRow)]
pub struct TagInfo {
    /// 标签 ID
    pub id: i64,
    /// 标签名称
    pub name: String,
    /// 唯一 slug
    pub slug: String,
}
