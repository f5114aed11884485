use std::env;

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::error::Result;

/// 分享邮件的内容
///
/// 主题和正文的拼装与发送通道无关，便于单独测试。
#[derive(Debug)]
pub struct ShareEmail {
    /// 收件人地址
    pub to: String,
    /// 推荐人名称
    pub sender_name: String,
    /// 被推荐文章标题
    pub post_title: String,
    /// 被推荐文章的完整链接
    pub post_url: String,
    /// 推荐人附言，可为空
    pub comments: String,
}

impl ShareEmail {
    pub fn subject(&self) -> String {
        format!(
            "{} recommends you read {}",
            self.sender_name, self.post_title
        )
    }

    pub fn body(&self) -> String {
        format!(
            "Read {} at {}\n\n{}'s comments: {}",
            self.post_title, self.post_url, self.sender_name, self.comments
        )
    }
}

/// 外部邮件投递服务的接口
///
/// 每次调用投递一封邮件，失败向上传播。
pub trait Mailer: Send + Sync {
    fn send(&self, email: &ShareEmail) -> impl std::future::Future<Output = Result<()>>;
}

/// 基于 SMTP 中继的 [`Mailer`] 实现
#[derive(Clone)]
pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// 从环境变量创建邮件发送器
    ///
    /// 读取 `SMTP_HOST`、`SMTP_PORT`（默认 587）、`SMTP_USERNAME`、
    /// `SMTP_PASSWORD` 和 `MAIL_FROM`。
    ///
    /// - Panics
    ///
    /// 必需的环境变量未设置时会 panic
    pub fn from_env() -> Self {
        let host = env::var("SMTP_HOST").expect("SMTP_HOST not set");
        let port = env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);
        let username = env::var("SMTP_USERNAME").expect("SMTP_USERNAME not set");
        let password = env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD not set");
        let from = env::var("MAIL_FROM").expect("MAIL_FROM not set");

        Self::new(&host, port, &username, &password, &from)
    }

    /// 使用指定的中继参数创建邮件发送器
    ///
    /// 465 端口使用隐式 TLS，其余端口使用 STARTTLS。
    /// 连接在首次投递时才会建立。
    pub fn new(host: &str, port: u16, username: &str, password: &str, from: &str) -> Self {
        let from = from.parse::<Mailbox>().expect("invalid MAIL_FROM mailbox");
        let credentials = Credentials::new(username.to_string(), password.to_string());

        let builder = if port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .expect("invalid SMTP relay host");

        let transport = builder.port(port).credentials(credentials).build();

        Self { from, transport }
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, email: &ShareEmail) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject(email.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body())?;

        self.transport.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share_email(comments: &str) -> ShareEmail {
        ShareEmail {
            to: "bob@example.com".to_string(),
            sender_name: "Ann".to_string(),
            post_title: "First Post".to_string(),
            post_url: "http://blog.example.com/api/posts/2026/8/1/first-post".to_string(),
            comments: comments.to_string(),
        }
    }

    #[test]
    fn test_subject() {
        assert_eq!(
            share_email("").subject(),
            "Ann recommends you read First Post"
        );
    }

    #[test]
    fn test_body() {
        let body = share_email("worth your time").body();
        assert_eq!(
            body,
            "Read First Post at http://blog.example.com/api/posts/2026/8/1/first-post\n\n\
             Ann's comments: worth your time"
        );

        // 附言为空时保留空尾部
        assert!(share_email("").body().ends_with("Ann's comments: "));
    }
}
