// API client module: a small async HTTP client for the image API. Each
// operation sends exactly one request and folds whatever comes back
// (record, remote error, transport failure) into a `ClientResponse`.

use crate::config::ClientConfig;
use crate::error::{ClientResponse, ErrorResponse, HttpMethod, StatusCode};
use crate::models::{DeleteResponse, ImageResponse, ListOptions, ListResponse, UploadOptions, UploadResponse};
use crate::multipart::FormBuilder;
use anyhow::{Context, Result};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

/// API client holding a reqwest client, the endpoints and the bearer
/// credential attached to every request. Cloning is cheap and clones share
/// the underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    authorization: HeaderValue,
}

impl ApiClient {
    /// Create a client from an explicit config. Fails if the token cannot
    /// be sent as a header value.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = config.normalized();
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .context("Access token contains characters not allowed in a header")?;
        authorization.set_sensitive(true);

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ApiClient {
            client,
            config,
            authorization,
        })
    }

    /// Client for the public service with default endpoints.
    pub fn with_token(access_token: &str) -> Result<Self> {
        Self::new(ClientConfig::new(access_token))
    }

    /// Create an ApiClient configured from the environment. See
    /// `ClientConfig::from_env`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn access_token(&self) -> &str {
        &self.config.access_token
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the upload request: multipart body with the image first.
    pub fn upload_request(&self, image: Vec<u8>, options: &UploadOptions) -> reqwest::Result<RequestBuilder> {
        let form = FormBuilder::for_upload(image, options).into_form()?;
        Ok(self
            .request(HttpMethod::Post, &self.config.upload_url)
            .multipart(form))
    }

    /// Build the list request. Without options no query string is sent.
    pub fn list_request(&self, options: Option<&ListOptions>) -> RequestBuilder {
        let request = self.request(HttpMethod::Get, &self.images_url());
        match options {
            Some(options) => request.query(options),
            None => request,
        }
    }

    pub fn get_request(&self, image_id: &str) -> RequestBuilder {
        self.request(HttpMethod::Get, &self.image_url(image_id))
    }

    pub fn delete_request(&self, image_id: &str) -> RequestBuilder {
        self.request(HttpMethod::Delete, &self.image_url(image_id))
    }

    /// Upload an image. Succeeds only on an exact 200.
    #[instrument(skip(self, image, options), fields(filename = %options.filename, bytes = image.len()))]
    pub async fn upload(&self, image: Vec<u8>, options: &UploadOptions) -> ClientResponse<UploadResponse> {
        let url = self.config.upload_url.clone();
        let request = self.upload_request(image, options).map_err(|e| {
            error!("Failed to build upload body: {}", e);
            ErrorResponse::no_response(HttpMethod::Post, &request_path(&url), e.to_string())
        })?;
        let uploaded: UploadResponse = self.send(HttpMethod::Post, &url, request).await?;
        info!("Uploaded image {}", uploaded.image_id);
        Ok(uploaded)
    }

    /// List the caller's images, optionally paginated.
    #[instrument(skip(self))]
    pub async fn list_images(&self, options: Option<&ListOptions>) -> ClientResponse<ListResponse> {
        let url = self.images_url();
        let images: ListResponse = self
            .send(HttpMethod::Get, &url, self.list_request(options))
            .await?;
        info!("Listed {} images", images.len());
        Ok(images)
    }

    /// Fetch a single image record by id.
    #[instrument(skip(self))]
    pub async fn get_image(&self, image_id: &str) -> ClientResponse<ImageResponse> {
        let url = self.image_url(image_id);
        self.send(HttpMethod::Get, &url, self.get_request(image_id))
            .await
    }

    /// Delete an image by id.
    #[instrument(skip(self))]
    pub async fn delete(&self, image_id: &str) -> ClientResponse<DeleteResponse> {
        let url = self.image_url(image_id);
        let deleted: DeleteResponse = self
            .send(HttpMethod::Delete, &url, self.delete_request(image_id))
            .await?;
        info!("Deleted image {}", deleted.image_id);
        Ok(deleted)
    }

    fn images_url(&self) -> String {
        format!("{}/images", self.config.api_url)
    }

    fn image_url(&self, image_id: &str) -> String {
        format!("{}/images/{}", self.config.api_url, urlencoding::encode(image_id))
    }

    /// Every request goes through here so the credential is never missed.
    fn request(&self, method: HttpMethod, url: &str) -> RequestBuilder {
        self.client
            .request(method.into(), url)
            .header(AUTHORIZATION, self.authorization.clone())
    }

    /// Dispatch one request and normalize the outcome. No retries.
    async fn send<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: &str,
        request: RequestBuilder,
    ) -> ClientResponse<T> {
        let path = request_path(url);
        debug!("{} {}", method, url);

        let response = request.send().await.map_err(|e| {
            error!("{} {} failed without a response: {}", method, url, e);
            ErrorResponse::no_response(method, &path, e.to_string())
        })?;

        let status = StatusCode::from(response.status());
        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read response body of {} {}: {}", method, url, e);
            ErrorResponse::undecodable(status, method, &path, &e)
        })?;

        if !status.is_success() {
            let err = ErrorResponse::from_remote(status, &body, method, &path);
            warn!("{} {} returned {}: {}", method, url, status, err.body.message);
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!("Could not decode {} {} response: {}", method, url, e);
            ErrorResponse::undecodable(status, method, &path, &e)
        })
    }
}

/// Path component used in locally built error bodies, e.g. `/api/images`.
fn request_path(url: &str) -> String {
    reqwest::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}
