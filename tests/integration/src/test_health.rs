//! Health endpoint integration tests.

#[cfg(test)]
mod tests {
    use crate::{endpoint_url, http_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_running() {
        let client = http_client();
        for path in ["/_health", "/health"] {
            let resp = client
                .get(format!("{}{path}", endpoint_url()))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), reqwest::StatusCode::OK);
            let body: serde_json::Value = resp.json().await.unwrap();
            assert_eq!(body["status"], "running");
        }
    }
}
