use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

/// 字段名到错误消息的映射，校验失败时随上下文内联渲染。
pub type FormErrors = BTreeMap<String, Vec<String>>;

/// 将 [`ValidationErrors`] 展平为 [`FormErrors`]
pub fn form_errors(errors: &ValidationErrors) -> FormErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// 分享文章的表单
///
/// 所有字段缺失时按空值处理，交由校验报错，
/// 避免反序列化阶段直接拒绝请求。
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct EmailPostForm {
    /// 发送者名称
    #[validate(length(min = 1, max = 25, message = "required, at most 25 characters"))]
    pub name: String,
    /// 发送者邮箱
    #[validate(email(message = "enter a valid email address"))]
    pub email: String,
    /// 收件人邮箱
    #[validate(email(message = "enter a valid email address"))]
    pub to: String,
    /// 附言，可为空
    pub comments: String,
}

/// 评论表单
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(length(min = 1, max = 80, message = "required, at most 80 characters"))]
    pub name: String,
    #[validate(email(message = "enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "required"))]
    pub body: String,
}

/// 搜索表单
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SearchForm {
    #[validate(length(min = 1, max = 100, message = "required, at most 100 characters"))]
    pub query: String,
}
