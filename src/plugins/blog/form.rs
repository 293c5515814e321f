use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::http_error::AppError;

/// Write-request body as a flat field map. Accepts `multipart/form-data`
/// (text fields only), urlencoded forms and JSON objects.
#[derive(Debug, Default, Clone)]
pub struct BlogForm {
    pub fields: Map<String, Value>,
}

impl BlogForm {
    /// Deserializes the fields into `T` and runs its validation rules.
    pub fn parse<T>(self) -> Result<T, AppError>
    where
        T: DeserializeOwned + Validate,
    {
        let value: T = serde_json::from_value(Value::Object(self.fields))
            .map_err(|e| AppError::validation(e.to_string()))?;
        value.validate()?;
        Ok(value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl From<HashMap<String, String>> for BlogForm {
    fn from(map: HashMap<String, String>) -> Self {
        Self { fields: map.into_iter().map(|(k, v)| (k, Value::String(v))).collect() }
    }
}

#[async_trait]
impl<S> FromRequest<S> for BlogForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::new(e.status(), e.body_text()).with_code("bad_request"))?;
            read_multipart(multipart).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(map) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::new(e.status(), e.body_text()).with_code("bad_request"))?;
            Ok(Self::from(map))
        } else {
            let Json(fields) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| AppError::new(e.status(), e.body_text()).with_code("bad_request"))?;
            Ok(Self { fields })
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<BlogForm, AppError> {
    let mut form = BlogForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            return Err(AppError::bad_request(format!("unexpected file field '{}'", name)));
        }
        if name.is_empty() {
            continue;
        }
        let text = field
            .text()
            .await
            .map_err(|e| AppError::bad_request(format!("multipart read error: {}", e)))?;
        form.fields.insert(name, Value::String(text));
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::blog::models::{BlogStatus, CreateBlog};
    use axum::body::Body;
    use axum::http::StatusCode;

    async fn extract(content_type: &str, body: impl Into<Body>) -> Result<BlogForm, AppError> {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap();
        BlogForm::from_request(req, &()).await
    }

    #[tokio::test]
    async fn reads_urlencoded_fields() {
        let form = extract(
            "application/x-www-form-urlencoded",
            "name=Hello+World&description=d&category=c&image=0123456789&status=inactive",
        )
        .await
        .unwrap();
        let input: CreateBlog = form.parse().unwrap();
        assert_eq!(input.name, "Hello World");
        assert_eq!(input.status, Some(BlogStatus::Inactive));
    }

    #[tokio::test]
    async fn reads_multipart_text_fields() {
        let body = "--XBOUND\r\n\
Content-Disposition: form-data; name=\"name\"\r\n\r\n\
Multipart Post\r\n\
--XBOUND\r\n\
Content-Disposition: form-data; name=\"category\"\r\n\r\n\
news\r\n\
--XBOUND--\r\n";
        let form = extract("multipart/form-data; boundary=XBOUND", body).await.unwrap();
        assert_eq!(form.get("name"), Some("Multipart Post"));
        assert_eq!(form.get("category"), Some("news"));
    }

    #[tokio::test]
    async fn rejects_multipart_files() {
        let body = "--XBOUND\r\n\
Content-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\n\
Content-Type: image/png\r\n\r\n\
PNGDATA\r\n\
--XBOUND--\r\n";
        let err = extract("multipart/form-data; boundary=XBOUND", body).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reads_json_objects() {
        let form = extract("application/json", r#"{"name":"J","description":"d"}"#).await.unwrap();
        assert_eq!(form.get("name"), Some("J"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_client_error() {
        let err = extract("application/json", "{not json").await.unwrap_err();
        assert!(err.status.is_client_error());
    }

    #[test]
    fn parse_reports_missing_and_invalid_fields() {
        let mut map = HashMap::new();
        map.insert("name".to_string(), "x".to_string());
        let err = BlogForm::from(map).parse::<CreateBlog>().unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.message.contains("missing field"));

        let mut map = HashMap::new();
        for (k, v) in [("name", "x"), ("description", "d"), ("category", "c"), ("image", "0123456789"), ("status", "draft")] {
            map.insert(k.to_string(), v.to_string());
        }
        let err = BlogForm::from(map).parse::<CreateBlog>().unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
