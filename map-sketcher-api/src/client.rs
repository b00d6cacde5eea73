use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use map_sketcher_model::Entity;

use crate::{ApiConfig, ApiError, HttpRequest, HttpResponse, Method, Transport};

pub struct ApiClient<T> {
    config: ApiConfig,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// CRUD access to one entity collection.
    pub fn collection<E: Entity>(&self) -> Collection<'_, T, E> {
        Collection {
            client: self,
            _entity: PhantomData,
        }
    }

    /// Issues the request and folds non-2xx statuses into
    /// [`ApiError::Rejected`], preferring the server's own `message` field
    /// over `fallback`.
    pub(crate) async fn call(
        &self,
        req: HttpRequest,
        fallback: &str,
    ) -> Result<HttpResponse, ApiError> {
        let method = req.method;
        let url = req.url.clone();
        log::debug!("{} {url}", method.as_str());

        let response = self.transport.dispatch(req).await.inspect_err(|err| {
            log::warn!("{} {url} failed: {err}", method.as_str());
        })?;

        if response.is_success() {
            return Ok(response);
        }
        let message = server_message(&response.body).unwrap_or_else(|| fallback.to_string());
        log::warn!(
            "{} {url} rejected with {}: {message}",
            method.as_str(),
            response.status
        );
        Err(ApiError::Rejected {
            status: response.status,
            message,
        })
    }

    pub(crate) async fn call_json<R: DeserializeOwned>(
        &self,
        req: HttpRequest,
        fallback: &str,
    ) -> Result<R, ApiError> {
        let response = self.call(req, fallback).await?;
        serde_json::from_str(&response.body)
            .map_err(|err| ApiError::Network(format!("invalid response body: {err}")))
    }

    pub(crate) fn encode<B: serde::Serialize>(body: &B) -> Result<String, ApiError> {
        serde_json::to_string(body).map_err(|err| ApiError::Network(err.to_string()))
    }
}

/// A well-behaved error body is `{"message": "..."}`; anything else yields
/// nothing and the caller's fallback text is used.
fn server_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ServerMessage {
        message: Option<String>,
    }
    serde_json::from_str::<ServerMessage>(body).ok()?.message
}

pub struct Collection<'a, T, E> {
    client: &'a ApiClient<T>,
    _entity: PhantomData<E>,
}

impl<T: Transport, E: Entity + DeserializeOwned> Collection<'_, T, E> {
    pub async fn list(&self) -> Result<Vec<E>, ApiError> {
        let url = self.client.config.collection_url(E::KIND);
        self.client
            .call_json(
                HttpRequest::new(Method::Get, url),
                &format!("Gagal memuat {}", E::KIND.noun()),
            )
            .await
    }

    pub async fn get(&self, id: i64) -> Result<E, ApiError> {
        let url = self.client.config.item_url(E::KIND, id);
        self.client
            .call_json(
                HttpRequest::new(Method::Get, url),
                &format!("Gagal memuat {}", E::KIND.noun()),
            )
            .await
    }

    /// The server assigns the id; whatever else it echoes back is returned
    /// uninterpreted.
    pub async fn create(&self, draft: &E::Draft) -> Result<serde_json::Value, ApiError> {
        let url = self.client.config.collection_url(E::KIND);
        let body = ApiClient::<T>::encode(draft)?;
        self.client
            .call_json(
                HttpRequest::new(Method::Post, url).with_body(body),
                &format!("Gagal menambahkan {}", E::KIND.noun()),
            )
            .await
    }

    pub async fn update(&self, id: i64, draft: &E::Draft) -> Result<serde_json::Value, ApiError> {
        let url = self.client.config.item_url(E::KIND, id);
        let body = ApiClient::<T>::encode(draft)?;
        self.client
            .call_json(
                HttpRequest::new(Method::Put, url).with_body(body),
                &format!("Gagal memperbarui {}", E::KIND.noun()),
            )
            .await
    }

    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        let url = self.client.config.item_url(E::KIND, id);
        self.client
            .call(
                HttpRequest::new(Method::Delete, url),
                &format!("Gagal menghapus {}", E::KIND.noun()),
            )
            .await?;
        Ok(())
    }
}
