mod common;
use common::{blog_fields, spawn_memory_app, ALLOWED_ORIGIN};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn blog_crud_over_http() -> anyhow::Result<()> {
    let (base, server_handle) = spawn_memory_app().await?;
    let client = reqwest::Client::new();

    // create
    let create = client.post(format!("{}/api/blogs", base))
        .json(&blog_fields("Hello World"))
        .send()
        .await?;
    let status = create.status();
    let body_text = create.text().await.unwrap_or_else(|_| "<failed to read body>".to_string());
    if status != StatusCode::CREATED {
        eprintln!("create failed: status={} body={} ", status, body_text);
        assert_eq!(status, StatusCode::CREATED);
    }
    let created: Value = serde_json::from_str(&body_text)?;
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["slug"], "hello-world");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // duplicate
    let dup = client.post(format!("{}/api/blogs", base)).json(&blog_fields("Hello World")).send().await?;
    assert_eq!(dup.status(), StatusCode::CONFLICT);
    let dup_body: Value = dup.json().await?;
    assert_eq!(dup_body["message"], "Already store this blog");

    // detail by id and slug
    let one = client.get(format!("{}/api/blogs/{}", base, id)).send().await?;
    assert_eq!(one.status(), StatusCode::OK);
    let by_slug = client.get(format!("{}/api/blogs/hello-world", base)).send().await?;
    assert_eq!(by_slug.status(), StatusCode::OK);

    // update through a urlencoded form
    let upd = client.patch(format!("{}/api/blogs", base))
        .form(&[
            ("id", id.as_str()),
            ("name", "Hello Again"),
            ("description", "updated"),
            ("category", "news"),
            ("image", "https://img.example/a.png"),
            ("status", "active"),
        ])
        .send()
        .await?;
    assert_eq!(upd.status(), StatusCode::OK);
    let updated: Value = upd.json().await?;
    assert_eq!(updated["data"]["slug"], "hello-again");

    // old slug is gone
    let old = client.get(format!("{}/api/blogs/hello-world", base)).send().await?;
    assert_eq!(old.status(), StatusCode::NOT_FOUND);

    // delete
    let del = client.delete(format!("{}/api/blogs/{}", base, id)).send().await?;
    assert_eq!(del.status(), StatusCode::OK);
    let gone = client.get(format!("{}/api/blogs/{}", base, id)).send().await?;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    server_handle.abort();
    let _ = server_handle.await;
    Ok(())
}

#[tokio::test]
async fn create_accepts_multipart_text_fields() -> anyhow::Result<()> {
    let (base, server_handle) = spawn_memory_app().await?;
    let client = reqwest::Client::new();

    let form = reqwest::multipart::Form::new()
        .text("name", "Multipart Story")
        .text("description", "from a form")
        .text("category", "stories")
        .text("image", "/uploads/cover.png")
        .text("status", "inactive");
    let resp = client.post(format!("{}/api/blogs", base)).multipart(form).send().await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["slug"], "multipart-story");
    assert_eq!(body["data"]["status"], "inactive");

    // files are not accepted
    let with_file = reqwest::multipart::Form::new()
        .text("name", "Has File")
        .part("image", reqwest::multipart::Part::bytes(b"binary".to_vec()).file_name("cover.png"));
    let resp = client.post(format!("{}/api/blogs", base)).multipart(with_file).send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // inactive blog is invisible publicly
    let public: Value = client.get(format!("{}/api/blogs", base)).send().await?.json().await?;
    assert_eq!(public["data"].as_array().map(|a| a.len()), Some(0));

    server_handle.abort();
    let _ = server_handle.await;
    Ok(())
}

#[tokio::test]
async fn health_and_cors() -> anyhow::Result<()> {
    let (base, server_handle) = spawn_memory_app().await?;
    let client = reqwest::Client::new();

    let root = client.get(format!("{}/", base)).send().await?;
    assert_eq!(root.status(), StatusCode::OK);
    assert_eq!(root.text().await?, "Server is Running");

    let health: Value = client.get(format!("{}/health", base)).send().await?.json().await?;
    assert_eq!(health["message"], "Server Running.");

    let preflight = client
        .request(reqwest::Method::OPTIONS, format!("{}/api/blogs", base))
        .header("Origin", ALLOWED_ORIGIN)
        .header("Access-Control-Request-Method", "PATCH")
        .send()
        .await?;
    assert_eq!(
        preflight.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some(ALLOWED_ORIGIN)
    );
    assert_eq!(
        preflight.headers().get("access-control-allow-credentials").and_then(|v| v.to_str().ok()),
        Some("true")
    );

    let missing = client.get(format!("{}/api/unknown", base)).send().await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = missing.json().await?;
    assert_eq!(body["success"], false);

    server_handle.abort();
    let _ = server_handle.await;
    Ok(())
}
