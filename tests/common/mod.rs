use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use teamtrack::config::Config;

pub const PASSWORD: &str = "password123";
pub const ADMIN_EMAIL: &str = "admin@test.com";

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: std::net::SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

/// A registered person: their employee id and a bearer token.
pub struct Member {
    pub employee_id: String,
    pub token: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a registration, optionally as an authenticated registrar.
    pub async fn register(&self, token: Option<&str>, body: &Value) -> (Value, StatusCode) {
        let mut req = self.client.post(self.url("/api/v1/auth/register")).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.expect("register request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Login and return the auth response body + status.
    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Register the first Admin and log in as them.
    pub async fn bootstrap(&self) -> Member {
        let (body, status) = self
            .register(None, &person(ADMIN_EMAIL, "Ada Admin", "Admin"))
            .await;
        assert_eq!(status, StatusCode::CREATED, "bootstrap register failed: {body}");
        self.member(ADMIN_EMAIL, &body).await
    }

    /// Register someone through `registrar` and log in as them.
    pub async fn add_member(&self, registrar: &str, email: &str, name: &str, designation: &str) -> Member {
        let (body, status) = self
            .register(Some(registrar), &person(email, name, designation))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {email} failed: {body}");
        self.member(email, &body).await
    }

    async fn member(&self, email: &str, registered: &Value) -> Member {
        let (login, status) = self.login(email, PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login {email} failed: {login}");
        Member {
            employee_id: registered["employee"]["id"].as_str().unwrap().to_string(),
            token: login["access_token"].as_str().unwrap().to_string(),
        }
    }

    /// Create a company, return its id.
    pub async fn create_company(&self, token: &str, name: &str) -> String {
        let (body, status) = self
            .post_auth("/api/v1/companies", token, &json!({ "company_name": name, "year": 1999 }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create company failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    /// Create a project, return its JSON.
    pub async fn create_project(
        &self,
        token: &str,
        company_id: &str,
        code: &str,
        leader: &str,
        members: &[impl AsRef<str>],
    ) -> Value {
        let members: Vec<&str> = members.iter().map(AsRef::as_ref).collect();
        let (body, status) = self
            .post_auth(
                "/api/v1/projects",
                token,
                &json!({
                    "company_id": company_id,
                    "project_code": code,
                    "project_name": format!("project {code}"),
                    "team_leader_id": leader,
                    "team_members": members,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create project failed: {body}");
        body
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated PUT request with JSON body.
    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated DELETE request.
    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// Registration payload with a valid password pair.
pub fn person(email: &str, name: &str, designation: &str) -> Value {
    json!({
        "email": email,
        "full_name": name,
        "designation": designation,
        "password": PASSWORD,
        "password_confirmation": PASSWORD,
    })
}

/// Does `body` carry a field failure of `kind` on `field`?
pub fn has_field_error(body: &Value, field: &str, kind: &str) -> bool {
    body["fields"][field]
        .as_array()
        .is_some_and(|errs| errs.iter().any(|e| e["kind"] == kind))
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let db_name = format!("teamtrack_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        token_ttl_minutes: 60,
        log_level: "warn".to_string(),
    };

    let app = teamtrack::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
