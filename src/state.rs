use std::sync::Arc;

use axum::extract::FromRef;

use crate::{mail::SmtpMailer, storage::DBPool};

/// 应用程序上下文
///
/// [`AppState`] 封装了数据库连接池、邮件发送器和站点根地址，提供统一访问入口。
#[derive(Clone, FromRef)]
pub struct AppState {
    pool: DBPool,
    mailer: SmtpMailer,
    base_url: Arc<str>,
}

impl AppState {
    /// 创建一个新的 [`AppState`] 实例
    ///
    /// `base_url` 末尾的 `/` 会被去除。
    pub fn new(pool: DBPool, mailer: SmtpMailer, base_url: &str) -> Self {
        let base_url = Arc::<str>::from(base_url.trim_end_matches('/'));

        Self {
            pool,
            mailer,
            base_url,
        }
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &DBPool {
        &self.pool
    }

    /// 获取邮件发送器
    pub fn mailer(&self) -> &SmtpMailer {
        &self.mailer
    }

    /// 获取站点根地址
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
