// Library root
// -----------
// This crate exposes a typed client for the Gyazo image API plus the small
// interactive CLI built on top of it (`main.rs`).
//
// Module responsibilities:
// - `api`: the `ApiClient`; one request per operation (upload, list, get,
//   delete), each answered with a `ClientResponse`.
// - `error`: status codes, error bodies and the `ClientResponse` alias.
// - `models`: request options and the records the service returns.
// - `multipart`: ordered form builder used for the upload body.
// - `config`: endpoints and access token, from env or the token file.
// - `ui`: terminal menus that drive `api`.
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod multipart;
pub mod ui;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientResponse, ErrorBody, ErrorResponse, HttpMethod, StatusCode};
pub use models::{
    AccessPolicy, ContentType, DeleteResponse, ImageResponse, ListOptions, ListResponse,
    ListedImage, UploadOptions, UploadResponse,
};
