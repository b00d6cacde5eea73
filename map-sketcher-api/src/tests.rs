use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::json;

use map_sketcher_model::{Credentials, Marker, Registration, Route, ShapeDraft, Vertex};

use crate::*;

/// Scripted transport: hands out queued responses in order and records every
/// request for later inspection.
struct FakeTransport {
    requests: RefCell<Vec<HttpRequest>>,
    responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
}

impl FakeTransport {
    fn new(responses: Vec<Result<HttpResponse, ApiError>>) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            responses: RefCell::new(responses.into()),
        }
    }

    fn request(&self, idx: usize) -> HttpRequest {
        self.requests.borrow()[idx].clone()
    }
}

impl Transport for &FakeTransport {
    async fn dispatch(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(req);
        self.responses
            .borrow_mut()
            .pop_front()
            .expect("unexpected extra request")
    }
}

fn status(code: u16, body: &str) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse {
        status: code,
        body: body.to_string(),
    })
}

fn client(fake: &FakeTransport) -> ApiClient<&FakeTransport> {
    let config = ApiConfig {
        base_url: "http://backend.test".to_string(),
    };
    ApiClient::new(config, fake)
}

#[test]
fn create_route_sends_exact_wire_body() {
    let fake = FakeTransport::new(vec![status(201, r#"{"id": 9}"#)]);
    let api = client(&fake);

    let draft = ShapeDraft {
        name: "Jalur pantai".to_string(),
        description: "Uji".to_string(),
        points: vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(0.0, 1.0),
            Vertex::new(1.0, 0.0),
        ],
    };
    pollster::block_on(api.collection::<Route>().create(&draft)).unwrap();

    let req = fake.request(0);
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, "http://backend.test/routes");
    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({
            "name": "Jalur pantai",
            "description": "Uji",
            "points": [
                {"latitude": 0.0, "longitude": 0.0},
                {"latitude": 0.0, "longitude": 1.0},
                {"latitude": 1.0, "longitude": 0.0},
            ],
        })
    );
}

#[test]
fn rejected_create_surfaces_server_message() {
    let fake = FakeTransport::new(vec![status(400, r#"{"message":"Gagal menambahkan rute"}"#)]);
    let api = client(&fake);

    let draft = ShapeDraft {
        name: "x".to_string(),
        description: String::new(),
        points: vec![Vertex::new(0.0, 0.0), Vertex::new(1.0, 1.0)],
    };
    let err = pollster::block_on(api.collection::<Route>().create(&draft)).unwrap_err();
    assert_eq!(
        err,
        ApiError::Rejected {
            status: 400,
            message: "Gagal menambahkan rute".to_string(),
        }
    );
}

#[test]
fn rejection_without_message_body_uses_fallback() {
    let fake = FakeTransport::new(vec![status(500, "{}")]);
    let api = client(&fake);

    let draft = ShapeDraft {
        name: "x".to_string(),
        description: String::new(),
        points: vec![Vertex::new(0.0, 0.0), Vertex::new(1.0, 1.0)],
    };
    let err = pollster::block_on(api.collection::<Route>().create(&draft)).unwrap_err();
    assert_eq!(err.message(), "Gagal menambahkan rute");
}

#[test]
fn malformed_success_body_is_a_network_failure() {
    let fake = FakeTransport::new(vec![status(200, "<html>not json</html>")]);
    let api = client(&fake);

    let err = pollster::block_on(api.collection::<Marker>().list()).unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[test]
fn list_tolerates_extra_point_fields() {
    // The backend's stored points may carry a 1-based `position`; it must not
    // break parsing and never round-trips into outgoing bodies.
    let body = r#"[{"id":1,"name":"A","description":"","points":
        [{"latitude":-8.4,"longitude":115.1,"position":1},
         {"latitude":-8.5,"longitude":115.2,"position":2}]}]"#;
    let fake = FakeTransport::new(vec![status(200, body)]);
    let api = client(&fake);

    let routes = pollster::block_on(api.collection::<Route>().list()).unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].points.len(), 2);
    assert_eq!(routes[0].points[0], Vertex::new(-8.4, 115.1));
}

#[test]
fn remove_targets_the_item_url() {
    let fake = FakeTransport::new(vec![status(200, r#"{"message":"ok"}"#)]);
    let api = client(&fake);

    pollster::block_on(api.collection::<Marker>().remove(7)).unwrap();

    let req = fake.request(0);
    assert_eq!(req.method, Method::Delete);
    assert_eq!(req.url, "http://backend.test/markers/7");
    assert_eq!(req.body, None);
}

#[test]
fn login_fetches_token_then_user_with_bearer() {
    let fake = FakeTransport::new(vec![
        status(200, r#"{"token":"abc123"}"#),
        status(200, r#"{"id":4,"nama_lengkap":"Ni Putu","email":"np@example.com"}"#),
    ]);
    let api = client(&fake);

    let creds = Credentials {
        email: "np@example.com".to_string(),
        password: "rahasia".to_string(),
    };
    let session = pollster::block_on(api.login(&creds)).unwrap();

    assert_eq!(session.token, "abc123");
    assert_eq!(session.user.full_name.as_deref(), Some("Ni Putu"));

    assert_eq!(fake.request(0).url, "http://backend.test/login");
    let user_req = fake.request(1);
    assert_eq!(user_req.url, "http://backend.test/users");
    assert_eq!(user_req.bearer.as_deref(), Some("abc123"));
}

#[test]
fn login_rejection_keeps_server_message() {
    let fake = FakeTransport::new(vec![status(
        401,
        r#"{"message":"Email atau password salah"}"#,
    )]);
    let api = client(&fake);

    let creds = Credentials {
        email: "x@example.com".to_string(),
        password: "nope".to_string(),
    };
    let err = pollster::block_on(api.login(&creds)).unwrap_err();
    assert_eq!(err.message(), "Email atau password salah");
}

#[test]
fn endpoint_join_tolerates_trailing_slash() {
    let config = ApiConfig {
        base_url: "http://backend.test/".to_string(),
    };
    assert_eq!(config.endpoint("markers"), "http://backend.test/markers");
    assert_eq!(
        config.item_url(map_sketcher_model::EntityKind::Area, 3),
        "http://backend.test/polygons/3"
    );
}

#[test]
fn memory_store_roundtrip() {
    let store = MemoryStore::default();
    assert!(store.load().is_none());

    let session = map_sketcher_model::AuthSession {
        token: "t".to_string(),
        user: map_sketcher_model::User::default(),
    };
    store.save(&session);
    assert_eq!(store.load(), Some(session));

    store.clear();
    assert!(store.load().is_none());
}

#[test]
fn registration_requires_matching_passwords() {
    let registration = Registration {
        full_name: "Made".to_string(),
        email: "made@example.com".to_string(),
        password: "satu".to_string(),
    };
    assert!(validate_registration(&registration, "satu").is_ok());
    assert_eq!(
        validate_registration(&registration, "dua"),
        Err("Passwords do not match!")
    );
}

#[test]
fn registration_body_uses_backend_field_name() {
    let registration = Registration {
        full_name: "Made".to_string(),
        email: "made@example.com".to_string(),
        password: "satu".to_string(),
    };
    let body = serde_json::to_value(&registration).unwrap();
    assert_eq!(
        body,
        json!({"nama_lengkap": "Made", "email": "made@example.com", "password": "satu"})
    );
}
