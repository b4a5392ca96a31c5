//! # REST Flow
//!
//! Requests against a live node over TCP:
//!
//! 1. `POST /rooms/{room}` answers before commit, the post shows up once applied
//! 2. Reads are served from applied state only
//! 3. `/raft/{id}` forwards membership changes to the engine

#[cfg(test)]
mod tests {
    use super::super::fixtures::{eventually, memory_config, spawn_node};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_post_is_readable_after_commit() {
        let node = spawn_node(memory_config()).await;
        let client = reqwest::Client::new();

        let response = client
            .post(node.url("/rooms/general"))
            .json(&json!({"User": "alice", "Message": "hello"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);

        let store = node.store.clone();
        eventually("post to be applied", || store.post_count() == 1).await;

        let posts: Value = client
            .get(node.url("/rooms/general"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let posts = posts.as_array().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["User"], "alice");
        assert_eq!(posts[0]["Message"], "hello");
        assert!(posts[0]["PostedAt"].is_string());

        let rooms: Vec<String> = client
            .get(node.url("/rooms"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(rooms, vec!["general".to_string()]);

        node.stop().await.unwrap_err();
    }

    #[tokio::test]
    async fn test_posts_keep_commit_order_per_room() {
        let node = spawn_node(memory_config()).await;
        let client = reqwest::Client::new();

        for (room, message) in [("a", "1"), ("b", "2"), ("a", "3")] {
            let status = client
                .post(node.url(&format!("/rooms/{room}")))
                .json(&json!({"User": "bob", "Message": message}))
                .send()
                .await
                .unwrap()
                .status();
            assert_eq!(status, 201);
        }

        let store = node.store.clone();
        eventually("three posts", || store.post_count() == 3).await;

        let posts: Value = client
            .get(node.url("/rooms/a"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let messages: Vec<&str> = posts
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["Message"].as_str().unwrap())
            .collect();
        assert_eq!(messages, vec!["1", "3"]);
        assert_eq!(node.store.applied_index(), 3);

        node.stop().await.unwrap_err();
    }

    #[tokio::test]
    async fn test_fresh_node_has_no_rooms() {
        let node = spawn_node(memory_config()).await;
        let client = reqwest::Client::new();

        let rooms: Value = client
            .get(node.url("/rooms"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(rooms, json!([]));

        let posts: Value = client
            .get(node.url("/rooms/nowhere"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(posts, json!([]));

        node.stop().await.unwrap_err();
    }

    #[tokio::test]
    async fn test_malformed_post_is_not_replicated() {
        let node = spawn_node(memory_config()).await;
        let client = reqwest::Client::new();

        let response = client
            .post(node.url("/rooms/general"))
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("Invalid post body"));

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(node.engine.commit_index(), 0);
        assert_eq!(node.store.post_count(), 0);

        node.stop().await.unwrap_err();
    }

    #[tokio::test]
    async fn test_membership_changes_reach_engine() {
        let node = spawn_node(memory_config()).await;
        let client = reqwest::Client::new();

        let added = client
            .post(node.url("/raft/2"))
            .body("http://127.0.0.1:9022")
            .send()
            .await
            .unwrap();
        assert_eq!(added.status(), 204);

        let engine = node.engine.clone();
        eventually("node 2 to join", || {
            engine.members().get(&2).map(String::as_str) == Some("http://127.0.0.1:9022")
        })
        .await;

        let removed = client.delete(node.url("/raft/2")).send().await.unwrap();
        assert_eq!(removed.status(), 204);
        eventually("node 2 to leave", || !engine.members().contains_key(&2)).await;

        // Membership changes never reach the chat log.
        assert_eq!(node.store.applied_index(), 0);

        node.stop().await.unwrap_err();
    }

    #[tokio::test]
    async fn test_membership_rejects_bad_requests() {
        let node = spawn_node(memory_config()).await;
        let client = reqwest::Client::new();

        let bad_id = client
            .post(node.url("/raft/abc"))
            .body("http://127.0.0.1:9022")
            .send()
            .await
            .unwrap();
        assert_eq!(bad_id.status(), 400);

        let wrong_method = client.put(node.url("/raft/2")).send().await.unwrap();
        assert_eq!(wrong_method.status(), 405);
        assert_eq!(
            wrong_method.headers()["allow"].to_str().unwrap(),
            "POST, DELETE"
        );

        node.stop().await.unwrap_err();
    }

    #[tokio::test]
    async fn test_status_tracks_applied_state() {
        let node = spawn_node(memory_config()).await;
        let client = reqwest::Client::new();

        client
            .post(node.url("/rooms/ops"))
            .json(&json!({"User": "carol", "Message": "deploy"}))
            .send()
            .await
            .unwrap();
        let store = node.store.clone();
        eventually("post to be applied", || store.applied_index() == 1).await;

        let status: Value = client
            .get(node.url("/status"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(status["rooms"], 1);
        assert_eq!(status["posts"], 1);
        assert_eq!(status["applied_index"], 1);
        assert_eq!(status["caught_up"], true);

        let health = client.get(node.url("/health")).send().await.unwrap();
        assert_eq!(health.status(), 200);

        node.stop().await.unwrap_err();
    }
}
