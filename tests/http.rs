use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Contact {
    id: i64,
    name: String,
    phone: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    outcome: String,
    title: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    deleted: bool,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_database_url() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("contact_book_http_{}_{}.sqlite", std::process::id(), nanos));
    format!("sqlite://{}", path.display())
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/contacts")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_contact_book"))
        .env("PORT", port.to_string())
        .env("APP_DATABASE_URL", unique_database_url())
        .env("APP_SEED_USERS", "admin:secret")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn login(client: &Client, base_url: &str, username: &str, password: &str) -> LoginResponse {
    client
        .post(format!("{base_url}/api/login"))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn list(client: &Client, base_url: &str, q: &str) -> Vec<Contact> {
    client
        .get(format!("{base_url}/api/contacts"))
        .query(&[("q", q)])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn create(client: &Client, base_url: &str, name: &str, phone: &str, email: &str) -> Contact {
    let response = client
        .post(format!("{base_url}/api/contacts"))
        .json(&serde_json::json!({ "name": name, "phone": phone, "email": email }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_login_outcomes() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let ok = login(&client, &server.base_url, "admin", "secret").await;
    assert_eq!(ok.outcome, "success");
    assert_eq!(ok.title, "Login Successful");
    assert_eq!(ok.message, "Welcome, admin!");

    let bad = login(&client, &server.base_url, "admin", "wrong").await;
    assert_eq!(bad.outcome, "failure");

    let empty = login(&client, &server.base_url, "admin", "").await;
    assert_eq!(empty.outcome, "invalid_input");
}

#[tokio::test]
async fn http_login_form_renders_dialog() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let page = client
        .post(format!("{}/login", server.base_url))
        .form(&[("username", "admin"), ("password", "nope")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Login Failed"));
    assert!(page.contains("Invalid username or password"));
}

#[tokio::test]
async fn http_contact_crud_via_api() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let before = list(&client, base, "").await.len();
    let ada = create(&client, base, "Ada", "555-1111", "ada@x.com").await;
    let all = list(&client, base, "").await;
    assert_eq!(all.len(), before + 1);
    assert_eq!(all.iter().filter(|c| c.id == ada.id).count(), 1);

    let updated: Contact = client
        .put(format!("{base}/api/contacts/{}", ada.id))
        .json(&serde_json::json!({ "name": "Ada", "phone": "555-2222", "email": "ada@x.com" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated.phone, "555-2222");
    let listed = list(&client, base, "").await;
    let row = listed.iter().find(|c| c.id == ada.id).expect("still listed");
    assert_eq!(row.name, "Ada");
    assert_eq!(row.email, "ada@x.com");
    assert_eq!(row.phone, "555-2222");

    let cancelled: DeleteResponse = client
        .delete(format!("{base}/api/contacts/{}", ada.id))
        .query(&[("confirm", "no")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!cancelled.deleted);
    assert!(list(&client, base, "").await.iter().any(|c| c.id == ada.id));

    let deleted: DeleteResponse = client
        .delete(format!("{base}/api/contacts/{}", ada.id))
        .query(&[("confirm", "yes")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(deleted.deleted);
    assert!(!list(&client, base, "").await.iter().any(|c| c.id == ada.id));

    let missing = client
        .get(format!("{base}/api/contacts/{}", ada.id))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_rejects_blank_name_and_unconfirmed_delete() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let before = list(&client, base, "").await;
    let response = client
        .post(format!("{base}/api/contacts"))
        .json(&serde_json::json!({ "name": "   ", "phone": "1", "email": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(list(&client, base, "").await, before);

    let response = client
        .delete(format!("{base}/api/contacts/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_search_returns_matching_subset() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let zed = create(&client, base, "Zebulon Quill", "", "").await;
    let zara = create(&client, base, "zara quinn", "", "").await;
    create(&client, base, "Bob", "", "").await;

    let found = list(&client, base, "Q").await;
    assert!(found.iter().all(|c| c.name.to_lowercase().contains('q')));
    assert!(found.contains(&zed));
    assert!(found.contains(&zara));
    assert!(!found.iter().any(|c| c.name == "Bob"));
}

#[tokio::test]
async fn http_form_flow_add_validation_and_delete_confirmation() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let page = client
        .post(format!("{base}/contacts"))
        .form(&[("name", " "), ("phone", "555-0000"), ("email", ""), ("q", "")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Name cannot be empty"));
    assert!(page.contains(r#"value="555-0000""#));

    let page = client
        .post(format!("{base}/contacts"))
        .form(&[("name", "Formy McForm"), ("phone", ""), ("email", ""), ("q", "Formy")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Formy McForm"));
    assert!(page.contains("No phone"));

    let formy = list(&client, base, "Formy").await.pop().expect("added via form");

    let page = client
        .post(format!("{base}/contacts/{}/edit", formy.id))
        .form(&[("name", "  "), ("phone", "555-7777"), ("email", ""), ("q", "Formy")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Edit Contact"));
    assert!(page.contains(&format!(r#"action="/contacts/{}/edit""#, formy.id)));
    assert!(page.contains(r#"<span class="field-error">Name cannot be empty</span>"#));
    assert!(page.contains(r#"value="555-7777""#));
    assert_eq!(list(&client, base, "Formy").await, vec![formy.clone()]);

    let response = client
        .post(format!("{base}/contacts/{}/edit", formy.id))
        .form(&[("name", "Formy McForm"), ("phone", "555-7777"), ("email", ""), ("q", "Formy")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let formy = list(&client, base, "Formy").await.pop().expect("still listed");
    assert_eq!(formy.phone, "555-7777");
    assert_eq!(formy.name, "Formy McForm");

    let blank_modal = client
        .get(format!("{base}/contacts?q=Formy&edit=&delete="))
        .send()
        .await
        .unwrap();
    assert_eq!(blank_modal.status(), StatusCode::OK);
    assert!(!blank_modal.text().await.unwrap().contains("role=\"dialog\""));

    let page = client
        .get(format!("{base}/contacts?q=Formy&delete={}", formy.id))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Are you sure you want to delete this contact?"));

    client
        .post(format!("{base}/contacts/{}/delete", formy.id))
        .form(&[("confirm", "no"), ("q", "Formy")])
        .send()
        .await
        .unwrap();
    assert_eq!(list(&client, base, "Formy").await, vec![formy.clone()]);

    client
        .post(format!("{base}/contacts/{}/delete", formy.id))
        .form(&[("confirm", "yes"), ("q", "Formy")])
        .send()
        .await
        .unwrap();
    assert!(list(&client, base, "Formy").await.is_empty());
}

#[tokio::test]
async fn http_theme_toggle_flips_page_theme() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let page = client
        .post(format!("{base}/theme"))
        .form(&[("q", "")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains(r#"<body data-theme="dark">"#));

    let page = client
        .post(format!("{base}/theme"))
        .form(&[("q", "")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains(r#"<body data-theme="light">"#));
}
