//! REST client for the remote employee service.
//!
//! Endpoints are resolved against the configured base URL:
//!
//! | Operation     | Request                           |
//! |---------------|-----------------------------------|
//! | `list`        | `GET employee/all`                |
//! | `fetch_by_id` | `GET employee/find/{id}`          |
//! | `create`      | `POST employee/add` (JSON body)   |
//! | `update`      | `PUT employee/update` (JSON body) |
//! | `delete`      | `DELETE employee/delete/{id}`     |
//!
//! Status 404 maps to `NotFound`, 400 and 422 to `Validation`, anything else
//! outside 2xx to `Transport`.

use crate::domain::{Employee, EmployeeId, Result, RosterError};
use crate::store::EmployeeStore;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// [`EmployeeStore`] backed by the remote REST service.
#[derive(Debug, Clone)]
pub struct HttpEmployeeStore {
    client: Client,
    base_url: Url,
}

impl HttpEmployeeStore {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// A path in `base_url` is kept: `http://host/api` resolves `employee/all`
    /// to `http://host/api/employee/all`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Config`] if `base_url` is not an http(s) URL, and
    /// [`RosterError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| RosterError::Config(format!("invalid api url {base_url:?}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(RosterError::Config(format!(
                "api url must use http or https, got {}",
                base_url.scheme()
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;
        tracing::debug!(base_url = %base_url, timeout_secs = timeout.as_secs(), "http store ready");

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RosterError::Config(format!("cannot build url for {path}: {e}")))
    }

    /// Maps a non-2xx response to the error taxonomy.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let detail = if text.trim().is_empty() {
            status.to_string()
        } else {
            text
        };

        tracing::debug!(status = status.as_u16(), detail = %detail, "store answered with an error");

        Err(match status {
            StatusCode::NOT_FOUND => RosterError::NotFound(detail),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => RosterError::Validation(detail),
            _ => RosterError::Transport(format!("HTTP {}: {detail}", status.as_u16())),
        })
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl EmployeeStore for HttpEmployeeStore {
    async fn list(&self) -> Result<Vec<Employee>> {
        let url = self.endpoint("employee/all")?;
        let response = self.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    async fn create(&self, employee: Employee) -> Result<Employee> {
        if employee.id.is_some() {
            return Err(RosterError::Validation("new employee must not carry an id".to_string()));
        }
        let url = self.endpoint("employee/add")?;
        let response = self.client.post(url).json(&employee).send().await?;
        Self::handle_response(response).await
    }

    async fn update(&self, employee: Employee) -> Result<Employee> {
        if employee.id.is_none() {
            return Err(RosterError::Validation("employee to update has no id".to_string()));
        }
        let url = self.endpoint("employee/update")?;
        let response = self.client.put(url).json(&employee).send().await?;
        Self::handle_response(response).await
    }

    async fn delete(&self, id: EmployeeId) -> Result<()> {
        let url = self.endpoint(&format!("employee/delete/{id}"))?;
        let response = self.client.delete(url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn fetch_by_id(&self, id: EmployeeId) -> Result<Employee> {
        let url = self.endpoint(&format!("employee/find/{id}"))?;
        let response = self.client.get(url).send().await?;
        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned response and returns the request head it received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0_u8; 4096];

            let head_end = loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break received.len();
                }
                received.extend_from_slice(&buf[..n]);
                if let Some(pos) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&received[..head_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            while received.len() < head_end + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&received).to_string()
        });

        (base, handle)
    }

    fn store(base: &str) -> HttpEmployeeStore {
        HttpEmployeeStore::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = HttpEmployeeStore::new("ftp://example.com", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, RosterError::Config(_)));
        assert!(HttpEmployeeStore::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn keeps_base_path_when_joining() {
        let store = store("http://localhost:8080/api");
        assert_eq!(
            store.endpoint("employee/all").unwrap().as_str(),
            "http://localhost:8080/api/employee/all"
        );
    }

    #[tokio::test]
    async fn list_decodes_camel_case_records() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"id":1,"name":"Ann Lee","email":"ann@corp.io","jobTitle":"Engineer","imageUrl":null,"employeeCode":"c-1"}]"#,
        )
        .await;

        let records = store(&base).list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].job_title, "Engineer");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/employee/all "));
    }

    #[tokio::test]
    async fn create_posts_json_body() {
        let (base, server) = serve_once("201 Created", r#"{"id":7,"name":"Cid","email":"","jobTitle":""}"#).await;

        let created = store(&base).create(Employee::new("Cid")).await.unwrap();
        assert_eq!(created.id, Some(7));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/employee/add "));
        assert!(request.contains(r#""name":"Cid""#));
        assert!(!request.contains(r#""id""#));
    }

    #[tokio::test]
    async fn delete_ignores_response_body() {
        let (base, server) = serve_once("200 OK", "").await;
        store(&base).delete(3).await.unwrap();
        assert!(server.await.unwrap().starts_with("DELETE /api/employee/delete/3 "));
    }

    #[tokio::test]
    async fn maps_status_codes_to_error_classes() {
        let (base, _server) = serve_once("404 Not Found", "no employee 9").await;
        let err = store(&base).fetch_by_id(9).await.unwrap_err();
        assert!(matches!(err, RosterError::NotFound(ref m) if m == "no employee 9"));

        let (base, _server) = serve_once("422 Unprocessable Entity", "").await;
        let err = store(&base).create(Employee::new("")).await.unwrap_err();
        assert!(matches!(err, RosterError::Validation(_)));

        let (base, _server) = serve_once("503 Service Unavailable", "down").await;
        let err = store(&base).list().await.unwrap_err();
        assert!(matches!(err, RosterError::Transport(ref m) if m.contains("503")));
    }

    #[tokio::test]
    async fn undecodable_body_is_transport_error() {
        let (base, _server) = serve_once("200 OK", "<html>oops</html>").await;
        let err = store(&base).list().await.unwrap_err();
        assert!(matches!(err, RosterError::Transport(_)));
    }

    #[tokio::test]
    async fn create_with_id_never_hits_the_network() {
        let err = store("http://127.0.0.1:9").create(Employee::new("X").with_id(1)).await.unwrap_err();
        assert!(matches!(err, RosterError::Validation(_)));
    }

    #[tokio::test]
    async fn update_without_id_never_hits_the_network() {
        let err = store("http://127.0.0.1:9").update(Employee::new("X")).await.unwrap_err();
        assert!(matches!(err, RosterError::Validation(_)));
    }
}
