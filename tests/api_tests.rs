mod common;

use chrono::{Duration, Local};
use reqwest::StatusCode;
use serde_json::Value;

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

// ── Registration & Login ────────────────────────────────────────

#[tokio::test]
async fn register_then_login() {
    let app = common::spawn_app().await;

    let token = app.bootstrap().await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn register_rejects_invalid_input() {
    let app = common::spawn_app().await;

    let (status, location, body) = app.register("al", "not-an-email", "short").await;
    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(body.contains("Username must be 3-50 characters"));
    assert!(body.contains("valid email address"));
    assert!(body.contains("at least 8 characters"));

    // Nothing was stored
    let (_, status) = app.login("al", "short").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_duplicates() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (status, _, body) = app.register("alice", "other@test.com", "password123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Username is already taken"));

    let (status, _, body) = app.register("bob", "alice@test.com", "password123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Email is already registered"));
}

#[tokio::test]
async fn login_invalid_credentials() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (body, status) = app.login("alice", "wrongpassword").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (_, status) = app.login("nobody", "password123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_is_rate_limited_after_repeated_failures() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    for _ in 0..5 {
        let (_, status) = app.login("alice", "wrongpassword").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (body, status) = app.login("alice", "password123").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["error"],
        "Too many login attempts. Try again in 15 minute(s)."
    );
}

#[tokio::test]
async fn login_form_sets_session_cookie() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let resp = app
        .client
        .post(app.url("/login"))
        .form(&[("username", "alice"), ("password", "password123")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/todos");
    let cookie = resp.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(cookie.starts_with("access_token="));

    // The cookie alone is enough to see the board
    let session = cookie.split(';').next().unwrap().to_string();
    let resp = app
        .client
        .get(app.url("/todos"))
        .header("cookie", session)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("alice"));
}

#[tokio::test]
async fn login_form_failure_redirects_with_error_flag() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let resp = app
        .client
        .post(app.url("/login"))
        .form(&[("username", "alice"), ("password", "wrongpassword")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/login?error");

    let page = app
        .client
        .get(app.url("/login?error"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Invalid username or password"));
}

#[tokio::test]
async fn logout_clears_cookie() {
    let app = common::spawn_app().await;

    let resp = app.client.post(app.url("/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/login?logout");
    let cookie = resp.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("access_token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

// ── Auth boundary ───────────────────────────────────────────────

#[tokio::test]
async fn root_redirects_to_todos() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/todos");
}

#[tokio::test]
async fn pages_redirect_anonymous_users_to_login() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/todos")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/login");

    let resp = app
        .client
        .post(app.url("/todoNew"))
        .form(&[("todoItem", "sneaky"), ("status", "No")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/login");
}

#[tokio::test]
async fn api_rejects_anonymous_users() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/api/todos")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (_, status) = app.get_auth("/api/todos", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_pages_render() {
    let app = common::spawn_app().await;

    for path in ["/login", "/register", "/forgot-password"] {
        let resp = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }
}

// ── Password reset ──────────────────────────────────────────────

#[tokio::test]
async fn forgot_password_unknown_email_sends_nothing() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (body, status) = app
        .post_query("/api/auth/forgot-password", &[("email", "nobody@test.com")])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "If the email exists, a reset link has been sent");
    assert!(app.outbox.sent().is_empty());
}

#[tokio::test]
async fn forgot_password_known_email_sends_link() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (body, status) = app
        .post_query("/api/auth/forgot-password", &[("email", "alice@test.com")])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "If the email exists, a reset link has been sent");

    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@test.com");
    assert!(sent[0].body.contains("http://localhost:0/reset-password?token="));

    let token = app.reset_token_for("alice@test.com");
    assert_eq!(token.len(), 64);
}

#[tokio::test]
async fn forgot_password_trims_the_address() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (_, status) = app
        .post_query("/api/auth/forgot-password", &[("email", "  alice@test.com ")])
        .await;
    assert_eq!(status, StatusCode::OK);

    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@test.com");
}

#[tokio::test]
async fn validate_reset_token_reports_validity() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (body, status) = app
        .get_auth("/api/auth/validate-reset-token?token=deadbeef", "")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);

    let (body, _) = app.get_auth("/api/auth/validate-reset-token", "").await;
    assert_eq!(body["valid"], false);

    app.post_query("/api/auth/forgot-password", &[("email", "alice@test.com")])
        .await;
    let token = app.reset_token_for("alice@test.com");

    let (body, _) = app
        .get_auth(&format!("/api/auth/validate-reset-token?token={token}"), "")
        .await;
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn reset_password_is_single_use() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    app.post_query("/api/auth/forgot-password", &[("email", "alice@test.com")])
        .await;
    let token = app.reset_token_for("alice@test.com");

    let (body, status) = app
        .post_query(
            "/api/auth/reset-password",
            &[("token", &token), ("newPassword", "brandnew123")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset successfully");

    let (body, status) = app
        .post_query(
            "/api/auth/reset-password",
            &[("token", &token), ("newPassword", "another1234")],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or expired reset token");

    // First reset stuck, second did not
    let (_, status) = app.login("alice", "password123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, status) = app.login("alice", "another1234").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, status) = app.login("alice", "brandnew123").await;
    assert_eq!(status, StatusCode::OK);

    let (body, _) = app
        .get_auth(&format!("/api/auth/validate-reset-token?token={token}"), "")
        .await;
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn reset_password_rejects_short_password_without_consuming_token() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    app.post_query("/api/auth/forgot-password", &[("email", "alice@test.com")])
        .await;
    let token = app.reset_token_for("alice@test.com");

    let (body, status) = app
        .post_query(
            "/api/auth/reset-password",
            &[("token", &token), ("newPassword", "short")],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at least 8"));

    let (body, _) = app
        .get_auth(&format!("/api/auth/validate-reset-token?token={token}"), "")
        .await;
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn new_reset_request_replaces_pending_token() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    app.post_query("/api/auth/forgot-password", &[("email", "alice@test.com")])
        .await;
    let first = app.reset_token_for("alice@test.com");
    app.post_query("/api/auth/forgot-password", &[("email", "alice@test.com")])
        .await;
    let second = app.reset_token_for("alice@test.com");
    assert_ne!(first, second);

    let (body, _) = app
        .get_auth(&format!("/api/auth/validate-reset-token?token={first}"), "")
        .await;
    assert_eq!(body["valid"], false);
    let (body, _) = app
        .get_auth(&format!("/api/auth/validate-reset-token?token={second}"), "")
        .await;
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn reset_password_page_checks_token() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let resp = app
        .client
        .get(app.url("/reset-password?token=bogus"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Invalid or expired reset token"));

    app.post_query("/api/auth/forgot-password", &[("email", "alice@test.com")])
        .await;
    let token = app.reset_token_for("alice@test.com");

    let resp = app
        .client
        .get(app.url(&format!("/reset-password?token={token}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.unwrap();
    assert!(page.contains(&format!("value=\"{token}\"")));
    assert!(page.contains("newPassword"));
}

#[tokio::test]
async fn forgot_and_reset_through_the_pages() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let resp = app
        .client
        .post(app.url("/forgot-password"))
        .form(&[("email", "alice@test.com")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("a reset link has been sent"));
    let token = app.reset_token_for("alice@test.com");

    // Mismatched confirmation leaves the token alone
    let resp = app
        .client
        .post(app.url("/reset-password"))
        .form(&[
            ("token", token.as_str()),
            ("newPassword", "brandnew123"),
            ("confirmPassword", "different123"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Passwords do not match"));

    let resp = app
        .client
        .post(app.url("/reset-password"))
        .form(&[
            ("token", token.as_str()),
            ("newPassword", "brandnew123"),
            ("confirmPassword", "brandnew123"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/login?reset");

    let (_, status) = app.login("alice", "brandnew123").await;
    assert_eq!(status, StatusCode::OK);
}

// ── Todos ───────────────────────────────────────────────────────

async fn list(app: &common::TestApp, token: &str, query: &str) -> Vec<Value> {
    let (body, status) = app.get_auth(&format!("/api/todos{query}"), token).await;
    assert_eq!(status, StatusCode::OK, "list failed: {body}");
    body.as_array().unwrap().clone()
}

fn texts(todos: &[Value]) -> Vec<&str> {
    todos.iter().map(|t| t["text"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn create_todo_applies_defaults() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let status = app
        .create_todo(&token, &[("todoItem", "Buy milk"), ("status", "No")])
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let todos = list(&app, &token, "").await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["text"], "Buy milk");
    assert_eq!(todos[0]["completed"], "No");
    assert_eq!(todos[0]["priority"], "Medium");
    assert_eq!(todos[0]["category"], "General");
    assert!(todos[0]["due_date"].is_null());
    assert!(todos[0]["notes"].is_null());
}

#[tokio::test]
async fn create_todo_with_all_fields() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let status = app
        .create_todo(
            &token,
            &[
                ("todoItem", "Write report"),
                ("status", "Yes"),
                ("priority", "High"),
                ("category", "Work"),
                ("dueDate", "2030-05-17"),
                ("notes", "Send to manager"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let todos = list(&app, &token, "").await;
    assert_eq!(todos[0]["completed"], "Yes");
    assert_eq!(todos[0]["priority"], "High");
    assert_eq!(todos[0]["category"], "Work");
    assert_eq!(todos[0]["due_date"], "2030-05-17");
    assert_eq!(todos[0]["notes"], "Send to manager");
}

#[tokio::test]
async fn create_todo_rejects_bad_input() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let status = app
        .create_todo(&token, &[("todoItem", "x"), ("status", "Maybe")])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = app
        .create_todo(&token, &[("todoItem", "x"), ("status", "No"), ("priority", "Urgent")])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = app
        .create_todo(&token, &[("todoItem", "x"), ("status", "No"), ("dueDate", "17/05/2030")])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = app
        .create_todo(&token, &[("todoItem", "   "), ("status", "No")])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(list(&app, &token, "").await.is_empty());
}

#[tokio::test]
async fn list_filters_by_search_and_status() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_todo(&token, &[("todoItem", "foo one"), ("status", "No")]).await;
    app.create_todo(&token, &[("todoItem", "foo two"), ("status", "Yes")]).await;
    app.create_todo(&token, &[("todoItem", "bar"), ("status", "No")]).await;

    assert_eq!(texts(&list(&app, &token, "?search=foo&status=No").await), ["foo one"]);
    assert_eq!(texts(&list(&app, &token, "?search=foo").await), ["foo one", "foo two"]);
    assert_eq!(texts(&list(&app, &token, "?search=foo&status=all").await), ["foo one", "foo two"]);
    assert_eq!(texts(&list(&app, &token, "?status=No").await), ["foo one", "bar"]);
    assert_eq!(texts(&list(&app, &token, "?status=Yes").await), ["foo two"]);
    assert_eq!(texts(&list(&app, &token, "?search=&status=").await).len(), 3);
    assert_eq!(texts(&list(&app, &token, "").await), ["foo one", "foo two", "bar"]);
}

#[tokio::test]
async fn list_filters_by_priority_category_and_due_date() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let yesterday = (Local::now().date_naive() - Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    app.create_todo(
        &token,
        &[("todoItem", "rent"), ("status", "No"), ("priority", "High"), ("category", "Home"), ("dueDate", &yesterday)],
    )
    .await;
    app.create_todo(
        &token,
        &[("todoItem", "taxes"), ("status", "No"), ("priority", "High"), ("category", "Work"), ("dueDate", "2099-04-15")],
    )
    .await;
    app.create_todo(
        &token,
        &[("todoItem", "dishes"), ("status", "Yes"), ("priority", "Low"), ("category", "Home"), ("dueDate", &yesterday)],
    )
    .await;
    app.create_todo(&token, &[("todoItem", "call"), ("status", "No")]).await;

    assert_eq!(texts(&list(&app, &token, "?priority=High").await), ["rent", "taxes"]);
    assert_eq!(texts(&list(&app, &token, "?priority=all").await).len(), 4);
    assert_eq!(texts(&list(&app, &token, "?category=Home").await), ["rent", "dishes"]);
    assert_eq!(texts(&list(&app, &token, "?category=General").await), ["call"]);
    assert_eq!(texts(&list(&app, &token, "?overdue=true").await), ["rent"]);
    assert_eq!(
        texts(&list(&app, &token, "?overdue=on&category=Work").await),
        Vec::<&str>::new()
    );
    assert_eq!(
        texts(&list(&app, &token, "?dueFrom=2099-04-01&dueTo=2099-04-30").await),
        ["taxes"]
    );
    assert_eq!(
        texts(&list(&app, &token, "?priority=High&status=No&dueTo=2099-01-01").await),
        ["rent"]
    );

    let (_, status) = app.get_auth("/api/todos?priority=Urgent", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, status) = app.get_auth("/api/todos?dueFrom=tomorrow", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn board_page_keeps_filter_selection() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_todo(
        &token,
        &[("todoItem", "Plan trip"), ("status", "No"), ("priority", "Low"), ("category", "Travel")],
    )
    .await;
    app.create_todo(&token, &[("todoItem", "Fix bike"), ("status", "No"), ("priority", "High")]).await;

    let resp = app
        .client
        .get(app.url("/todos?priority=Low&category=Travel&overdue=&dueFrom=2020-01-01"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.unwrap();
    assert!(page.contains("Plan trip"));
    assert!(!page.contains("Fix bike"));
    assert!(page.contains("<option value=\"Low\" selected>"));
    assert!(page.contains("value=\"Travel\""));
    assert!(page.contains("value=\"2020-01-01\""));
}

#[tokio::test]
async fn search_is_case_sensitive() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_todo(&token, &[("todoItem", "Call Mom"), ("status", "No")]).await;

    assert_eq!(list(&app, &token, "?search=Mom").await.len(), 1);
    assert!(list(&app, &token, "?search=mom").await.is_empty());
}

#[tokio::test]
async fn list_rejects_unknown_status_filter() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (body, status) = app.get_auth("/api/todos?status=maybe", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("maybe"));
}

#[tokio::test]
async fn toggle_twice_restores_status() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_todo(&token, &[("todoItem", "Flip me"), ("status", "No")]).await;
    let id = list(&app, &token, "").await[0]["id"].as_i64().unwrap();

    let (status, location) = app.post_page(&format!("/todoUpdate/{id}"), &token).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/todos?success"));
    let (todo, _) = app.get_auth(&format!("/api/todos/{id}"), &token).await;
    assert_eq!(todo["completed"], "Yes");

    app.post_page(&format!("/todoUpdate/{id}"), &token).await;
    let (todo, _) = app.get_auth(&format!("/api/todos/{id}"), &token).await;
    assert_eq!(todo["completed"], "No");
}

#[tokio::test]
async fn toggle_missing_todo_is_not_found() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (status, _) = app.post_page("/todoUpdate/999", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_fetch_is_not_found() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_todo(&token, &[("todoItem", "Short lived"), ("status", "No")]).await;
    let id = list(&app, &token, "").await[0]["id"].as_i64().unwrap();

    let (status, location) = app.post_page(&format!("/todoDelete/{id}"), &token).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/todos?success"));

    let (body, status) = app.get_auth(&format!("/api/todos/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Todo not found");

    // Deleting again is a no-op
    let (status, _) = app.post_page(&format!("/todoDelete/{id}"), &token).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn notifications_track_overdue_todos() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let yesterday = (Local::now().date_naive() - Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();

    app.create_todo(
        &token,
        &[("todoItem", "Late"), ("status", "No"), ("dueDate", &yesterday)],
    )
    .await;
    app.create_todo(
        &token,
        &[("todoItem", "Due today"), ("status", "No"), ("dueDate", &today)],
    )
    .await;
    app.create_todo(&token, &[("todoItem", "Whenever"), ("status", "No")]).await;
    app.create_todo(
        &token,
        &[("todoItem", "Done late"), ("status", "Yes"), ("dueDate", &yesterday)],
    )
    .await;

    let (summary, status) = app.get_auth("/api/todos/notifications", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["pending_count"], 3);
    let overdue = summary["overdue_todos"].as_array().unwrap();
    assert_eq!(texts(overdue), ["Late"]);

    let id = overdue[0]["id"].as_i64().unwrap();
    app.post_page(&format!("/todoUpdate/{id}"), &token).await;

    let (summary, _) = app.get_auth("/api/todos/notifications", &token).await;
    assert_eq!(summary["pending_count"], 2);
    assert!(summary["overdue_todos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn todos_page_shows_board_and_summary() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let yesterday = (Local::now().date_naive() - Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();
    app.create_todo(
        &token,
        &[("todoItem", "Pay <rent>"), ("status", "No"), ("dueDate", &yesterday)],
    )
    .await;
    app.create_todo(&token, &[("todoItem", "Water plants"), ("status", "Yes")]).await;

    // Filtered view still reports the overall summary
    let resp = app
        .client
        .get(app.url("/todos?search=Water&success"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.unwrap();
    assert!(page.contains("Signed in as <strong>alice</strong>"));
    assert!(page.contains("1 pending"));
    assert!(page.contains("1 overdue"));
    assert!(page.contains("Pay &lt;rent&gt;"));
    assert!(page.contains("Water plants"));
    assert!(page.contains("value=\"Water\""));
    assert!(page.contains("Saved."));
}
