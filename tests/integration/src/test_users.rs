//! Users resource integration tests.

#[cfg(test)]
mod tests {
    use crate::{API_CONTENT_TYPE, api_url, cleanup_user, create_user, http_client, test_username};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_and_get_user() {
        let client = http_client();
        let username = test_username("dieter");
        let id = create_user(&client, &username).await;

        let resp = client
            .get(api_url(&format!("users/{id}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            API_CONTENT_TYPE
        );
        assert!(resp.headers().get("x-request-id").is_some());

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(
            body,
            serde_json::json!({"data": {"id": id, "type": "users", "username": username}})
        );

        cleanup_user(&client, &id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_created_users() {
        let client = http_client();
        let first = create_user(&client, &test_username("list-a")).await;
        let second = create_user(&client, &test_username("list-b")).await;

        let body: serde_json::Value = client
            .get(api_url("users"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let ids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|u| u["id"].as_str())
            .collect();
        assert!(ids.contains(&first.as_str()));
        assert!(ids.contains(&second.as_str()));

        cleanup_user(&client, &first).await;
        cleanup_user(&client, &second).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_get_multiple_users() {
        let client = http_client();
        let first = create_user(&client, &test_username("multi-a")).await;
        let second = create_user(&client, &test_username("multi-b")).await;

        let body: serde_json::Value = client
            .get(api_url(&format!("users/{first},{second}")))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        cleanup_user(&client, &first).await;
        cleanup_user(&client, &second).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_update_user() {
        let client = http_client();
        let id = create_user(&client, &test_username("before")).await;
        let renamed = test_username("after");

        let resp = client
            .put(api_url(&format!("users/{id}")))
            .json(&serde_json::json!({"users": {"id": id, "username": renamed}}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);

        let body: serde_json::Value = client
            .get(api_url(&format!("users/{id}")))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"]["username"], renamed);

        cleanup_user(&client, &id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_delete_user() {
        let client = http_client();
        let id = create_user(&client, &test_username("gone")).await;

        let resp = client
            .delete(api_url(&format!("users/{id}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);

        let resp = client
            .get(api_url(&format!("users/{id}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(
            body,
            serde_json::json!({"errors": [{"status": "404", "title": "user not found"}]})
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_require_username() {
        let client = http_client();
        let resp = client
            .post(api_url("users"))
            .json(&serde_json::json!({"users": {"username": ""}}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(
            body,
            serde_json::json!({"errors": [{"id": "username-required", "path": "username"}]})
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_multiple_entities_on_create() {
        let client = http_client();
        let resp = client
            .post(api_url("users"))
            .json(&serde_json::json!({"users": [{"username": "a"}, {"username": "b"}]}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.bytes().await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_options() {
        let client = http_client();
        let resp = client
            .request(reqwest::Method::OPTIONS, api_url("users"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
        assert_eq!(resp.headers().get("allow").unwrap(), "GET,POST,OPTIONS");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_not_find_unknown_resource() {
        let client = http_client();
        let resp = client.get(api_url("unicorns")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
