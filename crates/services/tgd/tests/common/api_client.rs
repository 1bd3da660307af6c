use std::{borrow::Borrow, net::SocketAddr, str::FromStr};

use reqwest::{RequestBuilder, StatusCode, Url};
use serde_json::Value;

pub struct ApiClient {
    pub url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(address: SocketAddr) -> Self {
        Self {
            url: format!("http://{address}/v1"),
            client: reqwest::Client::new(),
        }
    }

    fn path(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.url)
    }

    async fn send(request: RequestBuilder) -> (StatusCode, Value) {
        let response = request.send().await.expect("Failed to send http request");
        let status = response.status();
        let text = response.text().await.expect("Failed to get response text");
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).expect("Couldn't Parse Value")
        };
        (status, body)
    }

    pub async fn get(&self, endpoint: &str, token: Option<&str>) -> (StatusCode, Value) {
        let url = Url::from_str(&self.path(endpoint)).unwrap();
        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::send(request).await
    }

    pub async fn get_with_header(
        &self,
        endpoint: &str,
        authorization: &str,
    ) -> (StatusCode, Value) {
        let url = Url::from_str(&self.path(endpoint)).unwrap();
        Self::send(self.client.get(url).header("Authorization", authorization)).await
    }

    pub async fn get_with_params<I, K, V>(&self, endpoint: &str, params: I) -> (StatusCode, Value)
    where
        I: IntoIterator,
        I::Item: Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = Url::parse_with_params(&self.path(endpoint), params)
            .expect("Couldn't create get request");
        Self::send(self.client.get(url)).await
    }

    pub async fn post(&self, endpoint: &str, body: &Value) -> (StatusCode, Value) {
        let url = Url::from_str(&self.path(endpoint)).unwrap();
        Self::send(self.client.post(url).json(body)).await
    }
}
