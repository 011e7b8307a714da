use gyazo_cli::{
    ApiClient, ClientConfig, ContentType, HttpMethod, ListOptions, StatusCode, UploadOptions,
};
use mockito::{Matcher, Server, ServerGuard};

const TOKEN: &str = "test-access-token";
const IMAGE_ID: &str = "8980c52421e452ac3355ca3e5cfe7a0c";

/// Client whose metadata base is `<server>/api` and upload URL `<server>/upload`.
fn client_for(server: &ServerGuard) -> ApiClient {
    let config = ClientConfig::new(TOKEN)
        .with_api_url(format!("{}/api", server.url()))
        .with_upload_url(format!("{}/upload", server.url()));
    ApiClient::new(config).unwrap()
}

fn image_json(id: &str) -> String {
    serde_json::json!({
        "image_id": id,
        "permalink_url": format!("https://gyazo.com/{}", id),
        "thumb_url": format!("https://thumb.gyazo.com/thumb/{}/l", id),
        "url": format!("https://i.gyazo.com/{}.png", id),
    })
    .to_string()
}

#[tokio::test]
async fn get_image_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("/api/images/{}", IMAGE_ID).as_str())
        .match_header("authorization", "Bearer test-access-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(image_json(IMAGE_ID))
        .create_async()
        .await;

    let image = client_for(&server).get_image(IMAGE_ID).await.unwrap();
    assert_eq!(image.image_id, IMAGE_ID);
    assert_eq!(
        image.permalink_url.as_deref(),
        Some("https://gyazo.com/8980c52421e452ac3355ca3e5cfe7a0c")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn get_image_not_found() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("/api/images/{}", IMAGE_ID).as_str())
        .match_header("authorization", "Bearer test-access-token")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let err = client_for(&server).get_image(IMAGE_ID).await.unwrap_err();
    assert_eq!(err.status_code, StatusCode::NotFound);
    assert_eq!(err.status_code.as_u16(), 404);
    assert_eq!(err.body.message, "Not Found");
    assert_eq!(err.body.method, HttpMethod::Get);
    assert_eq!(err.body.request, format!("/api/images/{}", IMAGE_ID));
    mock.assert_async().await;
}

#[tokio::test]
async fn list_images_without_options() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/images")
        .match_header("authorization", "Bearer test-access-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!("[{}]", image_json(IMAGE_ID)))
        .create_async()
        .await;

    let images = client_for(&server).list_images(None).await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].image_id, IMAGE_ID);
    assert_eq!(
        images[0].thumb_url.as_deref(),
        Some("https://thumb.gyazo.com/thumb/8980c52421e452ac3355ca3e5cfe7a0c/l")
    );
    assert_eq!(
        images[0].url.as_deref(),
        Some("https://i.gyazo.com/8980c52421e452ac3355ca3e5cfe7a0c.png")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn list_images_with_null_urls() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/images")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"image_id":"abc","permalink_url":null,"thumb_url":null,"url":null,"type":"png",
                "created_at":"2014-05-21 14:23:10+0900","metadata":null,
                "ocr":{"locale":"en","description":null}}]"#,
        )
        .create_async()
        .await;

    let images = client_for(&server).list_images(None).await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].image_id, "abc");
    assert_eq!(images[0].permalink_url, None);
    assert_eq!(images[0].thumb_url, None);
    assert_eq!(images[0].url, None);
    assert_eq!(images[0].metadata.title, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn list_images_with_pagination() {
    let mut server = Server::new_async().await;
    let other_id = "7980c52421e452ac3355ca3e5cfe7a0c";
    let mock = server
        .mock("GET", "/api/images")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("per_page".into(), "2".into()),
        ]))
        .match_header("authorization", "Bearer test-access-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!("[{},{}]", image_json(IMAGE_ID), image_json(other_id)))
        .create_async()
        .await;

    let images = client_for(&server)
        .list_images(Some(&ListOptions::new(2, 2)))
        .await
        .unwrap();
    let ids: Vec<&str> = images.iter().map(|i| i.image_id.as_str()).collect();
    assert_eq!(ids, vec![IMAGE_ID, other_id]);
    mock.assert_async().await;
}

#[tokio::test]
async fn list_images_unauthorized() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/images")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"This method requires authentication","request":"/api/images","method":"GET"}"#)
        .create_async()
        .await;

    let err = client_for(&server).list_images(None).await.unwrap_err();
    assert_eq!(err.status_code, StatusCode::Unauthorized);
    assert_eq!(err.body.message, "This method requires authentication");
    mock.assert_async().await;
}

#[tokio::test]
async fn upload_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .match_header("authorization", "Bearer test-access-token")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="imagedata"; filename="test\.png""#.into()),
            Matcher::Regex("test-image".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(image_json(IMAGE_ID))
        .create_async()
        .await;

    let options = UploadOptions::new("test.png", ContentType::Png);
    let uploaded = client_for(&server)
        .upload(b"test-image".to_vec(), &options)
        .await
        .unwrap();
    assert_eq!(uploaded.image_id, IMAGE_ID);
    assert_eq!(
        uploaded.permalink_url.as_deref(),
        Some("https://gyazo.com/8980c52421e452ac3355ca3e5cfe7a0c")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn upload_sends_optional_fields_by_name() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="access_policy"\r\n\r\nonly_me\r\n"#.into()),
            Matcher::Regex(r#"name="meta_data_is_public"\r\n\r\ntrue\r\n"#.into()),
            Matcher::Regex(r#"name="title"\r\n\r\nMy screenshot\r\n"#.into()),
        ]))
        .with_status(200)
        .with_body(image_json(IMAGE_ID))
        .create_async()
        .await;

    let mut options = UploadOptions::new("test.png", ContentType::Png);
    options.title = Some("My screenshot".into());
    options.access_policy = Some(gyazo_cli::AccessPolicy::OnlyMe);
    options.meta_data_is_public = Some(true);
    let result = client_for(&server).upload(b"test-image".to_vec(), &options).await;
    assert!(result.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn upload_bad_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Bad Request"}"#)
        .create_async()
        .await;

    let options = UploadOptions::new("test.png", ContentType::Png);
    let err = client_for(&server)
        .upload(b"test-image".to_vec(), &options)
        .await
        .unwrap_err();
    assert_eq!(err.status_code, StatusCode::BadRequest);
    assert_eq!(err.body.method, HttpMethod::Post);
    assert_eq!(err.body.request, "/upload");
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", format!("/api/images/{}", IMAGE_ID).as_str())
        .match_header("authorization", "Bearer test-access-token")
        .with_status(200)
        .with_body(format!(r#"{{"image_id":"{}","type":"png"}}"#, IMAGE_ID))
        .create_async()
        .await;

    let deleted = client_for(&server).delete(IMAGE_ID).await.unwrap();
    assert_eq!(deleted.image_id, IMAGE_ID);
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_not_found() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", format!("/api/images/{}", IMAGE_ID).as_str())
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let err = client_for(&server).delete(IMAGE_ID).await.unwrap_err();
    assert_eq!(err.status_code, StatusCode::NotFound);
    assert_eq!(err.body.method, HttpMethod::Delete);
    mock.assert_async().await;
}

#[tokio::test]
async fn non_200_success_codes_are_errors() {
    let mut server = Server::new_async().await;
    let created = server
        .mock("DELETE", "/api/images/abc")
        .with_status(201)
        .with_body(r#"{"image_id":"abc"}"#)
        .create_async()
        .await;

    let err = client_for(&server).delete("abc").await.unwrap_err();
    assert_eq!(err.status_code, StatusCode::Other(201));
    // The body was a record, not an error, so the message falls back to the reason.
    assert_eq!(err.body.message, "Created");
    created.assert_async().await;
}

#[tokio::test]
async fn unexpected_status_is_kept_numerically() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/images/abc")
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let err = client_for(&server).get_image("abc").await.unwrap_err();
    assert_eq!(err.status_code, StatusCode::Other(503));
    assert_eq!(err.body.message, "Service Unavailable");
    mock.assert_async().await;
}

#[tokio::test]
async fn malformed_success_body_is_an_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/images/abc")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client_for(&server).get_image("abc").await.unwrap_err();
    assert_eq!(err.status_code, StatusCode::Success);
    assert!(err.body.message.starts_with("invalid response body"));
    mock.assert_async().await;
}

#[tokio::test]
async fn transport_failure_is_folded_into_error() {
    // Nothing listens on port 1.
    let config = ClientConfig::new(TOKEN).with_api_url("http://127.0.0.1:1/api");
    let client = ApiClient::new(config).unwrap();

    let err = client.get_image("abc").await.unwrap_err();
    assert!(err.is_no_response());
    assert_eq!(err.status_code.as_u16(), 0);
    assert_eq!(err.body.method, HttpMethod::Get);
    assert_eq!(err.body.request, "/api/images/abc");
}
