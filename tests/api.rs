#![cfg(feature = "db_tests")]

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{Response, StatusCode},
};

use blogd::{
    api,
    mail::SmtpMailer,
    state::AppState,
    storage::{DBPool, init_db_from_env, migrate},
};
use tower::util::ServiceExt;

struct TestApp {
    router: Router,
    pool: DBPool,
}

impl TestApp {
    async fn new() -> Self {
        let pool = init_db_from_env().await;

        migrate(&pool, "sql/01-CREATE_TABLE.sql")
            .await
            .expect("初始化sql失败");

        sqlx::query("TRUNCATE TABLE posts, tags, post_tags, comments")
            .execute(&pool)
            .await
            .expect("清空表失败");

        // 邮件发送器不会在构造时建立连接，测试里不触发真实投递
        let mailer = SmtpMailer::new("localhost", 587, "blogd", "secret", "Blog <noreply@example.com>");
        let app = AppState::new(pool.clone(), mailer, "http://blog.example.com");

        let router = api::setup_route(app);

        Self { router, pool }
    }

    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("oneshot fail")
    }

    /// 插入一篇文章并关联标签，返回文章 ID
    async fn seed_post(
        &self,
        title: &str,
        slug: &str,
        body: &str,
        publish: &str,
        status: &str,
        tags: &[&str],
    ) -> i64 {
        let post_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (title, slug, author, body, publish, status)
            VALUES ($1, $2, 'ann', $3, $4::timestamptz, $5)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(slug)
        .bind(body)
        .bind(publish)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .expect("插入文章失败");

        for tag in tags {
            let tag_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO tags (name, slug)
                VALUES ($1, $1)
                ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
            )
            .bind(tag)
            .fetch_one(&self.pool)
            .await
            .expect("插入标签失败");

            sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(tag_id)
                .execute(&self.pool)
                .await
                .expect("关联标签失败");
        }

        post_id
    }

    /// 插入固定的一组文章：四篇已发布、一篇草稿
    ///
    /// 返回 `(p1, p2, p3, p4, draft)` 的 ID，发布时间依次递增。
    async fn seed_fixture(&self) -> (i64, i64, i64, i64, i64) {
        let p1 = self
            .seed_post(
                "Ownership in Rust",
                "rust-ownership",
                "Ownership is the core idea. Ownership rules decide when values are dropped.",
                "2026-01-10T12:00:00Z",
                "published",
                &["rust", "systems"],
            )
            .await;
        let p2 = self
            .seed_post(
                "Async in practice",
                "async-rust",
                "Futures, executors and pinning in server code.",
                "2026-02-15T12:00:00Z",
                "published",
                &["rust", "async"],
            )
            .await;
        let p3 = self
            .seed_post(
                "Cooking with cast iron",
                "cast-iron",
                "Season the pan, keep it dry, cook on.",
                "2026-03-20T12:00:00Z",
                "published",
                &["cooking"],
            )
            .await;
        let p4 = self
            .seed_post(
                "Borrow checker tips",
                "borrow-checker",
                "Lifetimes follow from ownership, one borrow at a time.",
                "2026-04-25T12:00:00Z",
                "published",
                &["rust"],
            )
            .await;
        let draft = self
            .seed_post(
                "Unfinished notes",
                "unfinished-notes",
                "Ownership draft that nobody should see.",
                "2026-05-05T12:00:00Z",
                "draft",
                &["rust"],
            )
            .await;

        (p1, p2, p3, p4, draft)
    }

    async fn get_json(&self, uri: &str, msg: &str) -> serde_json::Value {
        let req = Request::get(uri).body(Body::empty()).expect("请求失败");
        let resp = self.request(req).await;
        assert_eq!(StatusCode::OK, resp.status(), "{}", msg);
        let data = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("读取数据失败");
        serde_json::from_slice(&data).expect("反序列化失败")
    }

    async fn get_status(&self, uri: &str, code: StatusCode, msg: &str) {
        let req = Request::get(uri).body(Body::empty()).expect("请求失败");
        let resp = self.request(req).await;
        assert_eq!(resp.status(), code, "{}", msg);
    }

    async fn post_form(&self, uri: &str, form: &str, msg: &str) -> serde_json::Value {
        let req = Request::post(uri)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("请求失败");
        let resp = self.request(req).await;
        assert_eq!(StatusCode::OK, resp.status(), "{}", msg);
        let data = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("读取数据失败");
        serde_json::from_slice(&data).expect("反序列化失败")
    }

    async fn comment_count(&self, post_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .expect("统计评论失败")
    }
}

fn slugs(posts: &serde_json::Value) -> Vec<&str> {
    posts
        .as_array()
        .expect("应为数组")
        .iter()
        .map(|p| p["slug"].as_str().expect("缺少slug"))
        .collect()
}

#[tokio::test]
#[ignore = "API测试 依赖真实数据库"]
async fn test_listing_and_detail() {
    let app = TestApp::new().await;
    let (p1, ..) = app.seed_fixture().await;

    // 列表：第一页固定 3 篇，按发布时间倒序，草稿不可见
    {
        let data = app.get_json("/api/posts", "获取文章列表").await;
        assert_eq!(
            slugs(&data["posts"]),
            ["borrow-checker", "cast-iron", "async-rust"]
        );
        assert_eq!(data["page"]["number"], 1);
        assert_eq!(data["page"]["num_pages"], 2);
        assert_eq!(data["page"]["has_next"], true);

        let data = app.get_json("/api/posts?page=2", "获取第二页").await;
        assert_eq!(slugs(&data["posts"]), ["rust-ownership"]);
        assert_eq!(data["page"]["has_previous"], true);
    }

    // 页码回退：非整数回到第一页，超出范围回到最后一页
    {
        let data = app.get_json("/api/posts?page=abc", "非整数页码").await;
        assert_eq!(data["page"]["number"], 1);

        let data = app.get_json("/api/posts?page=9999", "超出范围的页码").await;
        assert_eq!(data["page"]["number"], 2);
        assert_eq!(slugs(&data["posts"]), ["rust-ownership"]);
    }

    // 标签过滤：未知标签 404
    {
        let data = app.get_json("/api/posts/tag/rust", "按标签过滤").await;
        assert_eq!(
            slugs(&data["posts"]),
            ["borrow-checker", "async-rust", "rust-ownership"]
        );
        assert_eq!(data["tag"]["slug"], "rust");

        app.get_status(
            "/api/posts/tag/nope",
            StatusCode::NOT_FOUND,
            "未知标签应 404",
        )
        .await;
    }

    // 详情：四个字段完全匹配才命中
    {
        let data = app
            .get_json("/api/posts/2026/1/10/rust-ownership", "获取文章详情")
            .await;
        assert_eq!(data["post"]["id"], p1);

        // 相似文章：共享 rust 标签的两篇，较新的在前；不含自身和草稿
        assert_eq!(
            slugs(&data["similar_posts"]),
            ["borrow-checker", "async-rust"]
        );

        app.get_status(
            "/api/posts/2026/1/11/rust-ownership",
            StatusCode::NOT_FOUND,
            "日期不匹配应 404",
        )
        .await;
        app.get_status(
            "/api/posts/2026/5/5/unfinished-notes",
            StatusCode::NOT_FOUND,
            "草稿不可通过详情访问",
        )
        .await;
    }

    // 标签列表只包含已发布文章的标签
    {
        let data = app.get_json("/api/tags", "获取标签列表").await;
        let names: Vec<&str> = data
            .as_array()
            .expect("应为数组")
            .iter()
            .map(|t| t["name"].as_str().expect("缺少name"))
            .collect();
        assert_eq!(names, ["async", "cooking", "rust", "systems"]);
    }
}

#[tokio::test]
#[ignore = "API测试 依赖真实数据库"]
async fn test_comment_and_share() {
    let app = TestApp::new().await;
    let (p1, _, _, _, draft) = app.seed_fixture().await;

    // 合法评论：插入一条 active 评论并返回
    {
        let data = app
            .post_form(
                &format!("/api/comment/{}", p1),
                "name=Ann&email=ann%40example.com&body=Nice+post",
                "提交评论",
            )
            .await;
        assert_eq!(data["comment"]["name"], "Ann");
        assert_eq!(data["comment"]["active"], true);
        assert!(data.get("errors").is_none());
        assert_eq!(app.comment_count(p1).await, 1);
    }

    // 非法评论：返回字段错误且不写库
    {
        let data = app
            .post_form(
                &format!("/api/comment/{}", p1),
                "name=&email=bad&body=",
                "提交空评论",
            )
            .await;
        assert!(data["comment"].is_null());
        assert!(data["errors"]["name"].is_array());
        assert!(data["errors"]["body"].is_array());
        assert_eq!(app.comment_count(p1).await, 1);
    }

    // 评论接口仅接受 POST
    {
        app.get_status(
            &format!("/api/comment/{}", p1),
            StatusCode::METHOD_NOT_ALLOWED,
            "GET 评论接口应 405",
        )
        .await;
    }

    // 草稿不可评论
    {
        let req = Request::post(format!("/api/comment/{}", draft))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from("name=Ann&email=ann%40example.com&body=hi"))
            .expect("请求失败");
        let resp = app.request(req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "草稿评论应 404");
        assert_eq!(app.comment_count(draft).await, 0);
    }

    // 分享表单：GET 返回 sent=false，收件人非法时不发送
    {
        let data = app
            .get_json(&format!("/api/share/{}", p1), "获取分享表单")
            .await;
        assert_eq!(data["sent"], false);
        assert!(data.get("errors").is_none());

        let data = app
            .post_form(
                &format!("/api/share/{}", p1),
                "name=Ann&email=ann%40example.com&to=not-an-email",
                "提交非法收件人",
            )
            .await;
        assert_eq!(data["sent"], false);
        assert!(data["errors"]["to"].is_array());

        app.get_status("/api/share/987654", StatusCode::NOT_FOUND, "未知文章应 404")
            .await;
    }
}

#[tokio::test]
#[ignore = "API测试 依赖真实数据库"]
async fn test_search() {
    let app = TestApp::new().await;
    app.seed_fixture().await;

    // 无查询参数：空结果
    {
        let data = app.get_json("/api/posts/search", "无查询参数").await;
        assert!(data["query"].is_null());
        assert_eq!(data["results"].as_array().expect("应为数组").len(), 0);
    }

    // 空查询串：校验失败，仍为空结果
    {
        let data = app.get_json("/api/posts/search?query=", "空查询串").await;
        assert!(data["query"].is_null());
        assert_eq!(data["results"].as_array().expect("应为数组").len(), 0);
    }

    // 命中正文的文章排在只沾边的文章前面，草稿不出现
    {
        let data = app
            .get_json("/api/posts/search?query=ownership", "搜索 ownership")
            .await;
        assert_eq!(data["query"], "ownership");

        let found = slugs(&data["results"]);
        assert_eq!(found[0], "rust-ownership", "强相关的文章应排在最前");
        assert!(found.contains(&"borrow-checker"));
        assert!(!found.contains(&"unfinished-notes"));
    }

    // 无命中
    {
        let data = app
            .get_json("/api/posts/search?query=zeppelin", "搜索无命中")
            .await;
        assert_eq!(data["results"].as_array().expect("应为数组").len(), 0);
    }
}
