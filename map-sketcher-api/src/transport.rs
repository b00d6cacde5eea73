use crate::ApiError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Bearer token for the `Authorization` header, when the endpoint wants one.
    pub bearer: Option<String>,
    /// Pre-serialized JSON body.
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: String) -> Self {
        Self {
            method,
            url,
            bearer: None,
            body: None,
        }
    }

    pub fn with_bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The one seam between the client and the network. The browser build fetches
/// for real; tests script responses. Implementations only ever fail with
/// [`ApiError::Network`]; status-code handling lives in the client.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn dispatch(&self, req: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Browser fetch via gloo. Non-blocking; the page stays responsive while a
/// request is in flight.
#[cfg(target_arch = "wasm32")]
pub struct FetchTransport;

#[cfg(target_arch = "wasm32")]
impl Transport for FetchTransport {
    async fn dispatch(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        use gloo_net::http::Request;

        let network = |err: gloo_net::Error| ApiError::Network(err.to_string());

        let mut builder = match req.method {
            Method::Get => Request::get(&req.url),
            Method::Post => Request::post(&req.url),
            Method::Put => Request::put(&req.url),
            Method::Delete => Request::delete(&req.url),
        };
        if let Some(token) = &req.bearer {
            builder = builder.header("Authorization", &format!("Bearer {token}"));
        }

        let response = match req.body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(body)
                .map_err(network)?
                .send()
                .await
                .map_err(network)?,
            None => builder.send().await.map_err(network)?,
        };

        let status = response.status();
        let body = response.text().await.map_err(network)?;
        Ok(HttpResponse { status, body })
    }
}
