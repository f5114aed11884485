use serde::Serialize;

/// 固定页大小的分页器
///
/// 页码解析规则：
///
/// - 缺失或非整数的页码回退到第 1 页
/// - 超出 `[1, num_pages]` 范围的页码回退到最后一页
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

/// 分页状态，随列表上下文一起渲染。
#[derive(Debug, Serialize, PartialEq)]
pub struct PageInfo {
    pub number: i64,
    pub num_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        assert!(per_page > 0);
        Self { count, per_page }
    }

    /// 总页数，空集合也算作 1 页
    pub fn num_pages(&self) -> i64 {
        ((self.count + self.per_page - 1) / self.per_page).max(1)
    }

    /// 将原始页码参数解析为有效页码
    pub fn resolve(&self, raw: Option<&str>) -> i64 {
        let Some(raw) = raw else {
            return 1;
        };

        match raw.trim().parse::<i64>() {
            Err(_) => 1,
            Ok(n) if n < 1 || n > self.num_pages() => self.num_pages(),
            Ok(n) => n,
        }
    }

    /// 页码对应的 OFFSET
    pub fn offset(&self, page: i64) -> i64 {
        (page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn page_info(&self, number: i64) -> PageInfo {
        PageInfo {
            number,
            num_pages: self.num_pages(),
            has_previous: number > 1,
            has_next: number < self.num_pages(),
        }
    }
}
