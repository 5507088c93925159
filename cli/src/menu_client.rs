use std::future::Future;

use anyhow::{Context, Result};

use lemon_core::models::NewMenuItem;
use lemon_core::remote::parse_menu_document;
use lemon_core::service::MenuSource;

pub struct MenuClient {
    client: reqwest::Client,
    url: String,
}

impl MenuClient {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("lemon/{}", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    pub async fn fetch_menu_async(&self) -> Result<Vec<NewMenuItem>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to reach menu endpoint")?
            .error_for_status()
            .context("Menu endpoint returned an error")?;

        let body = resp
            .text()
            .await
            .context("Failed to read menu response")?;

        parse_menu_document(&body)
    }
}

impl MenuSource for MenuClient {
    fn fetch_menu(&self) -> impl Future<Output = Result<Vec<NewMenuItem>>> + Send {
        self.fetch_menu_async()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lemon_core::remote::MENU_URL;
    use lemon_core::service::fetch_remote_menu;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response on a local port, returning its URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/capstone.json")
    }

    /// Loopback requests must not be routed through an ambient HTTP proxy.
    fn local_client(url: &str) -> MenuClient {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        MenuClient::with_client(client, url)
    }

    #[tokio::test]
    async fn test_fetch_menu_parses_document() {
        let url = serve_once(
            "200 OK",
            r#"{"menu":[{"name":"Greek Salad","price":12.99,"description":"Crispy lettuce","image":"greekSalad.jpg","category":"starters"},{"name":"Lemon Dessert","price":5.99,"image":"lemonDessert.jpg","category":"desserts"}]}"#,
        )
        .await;
        let client = local_client(&url);

        let items = client.fetch_menu_async().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Greek Salad");
        assert_eq!(items[1].category, "desserts");
        assert!(items[1].description.is_none());
    }

    #[tokio::test]
    async fn test_fetch_menu_error_status() {
        let url = serve_once("404 Not Found", r#"{"error":"missing"}"#).await;
        let client = local_client(&url);

        assert!(client.fetch_menu_async().await.is_err());
        // Best-effort wrapper turns the failure into an empty menu
        let url = serve_once("404 Not Found", r#"{"error":"missing"}"#).await;
        let client = local_client(&url);
        assert!(fetch_remote_menu(&client).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_menu_malformed_body() {
        let url = serve_once("200 OK", "<html>oops</html>").await;
        let client = local_client(&url);
        assert!(client.fetch_menu_async().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_menu_unreachable() {
        // Nothing listens on the discard port on loopback
        let client = local_client("http://127.0.0.1:9/capstone.json");
        assert!(fetch_remote_menu(&client).await.is_empty());
    }

    // --- Integration tests (hit the real menu endpoint) ---

    #[tokio::test]
    #[ignore = "hits menu endpoint"]
    async fn test_fetch_real_menu() {
        let client = MenuClient::new(MENU_URL).unwrap();
        let items = client.fetch_menu_async().await.unwrap();
        assert!(!items.is_empty());
        for item in &items {
            assert!(!item.name.is_empty());
            assert!(!item.category.is_empty());
            assert!(item.price >= 0.0);
        }
    }
}
