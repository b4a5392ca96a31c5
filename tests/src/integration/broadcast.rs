//! # Push Fan-Out
//!
//! Commits applied by a node reach every registered subscriber:
//!
//! 1. Subscribers only see events applied after they registered
//! 2. A subscriber that stops draining is evicted without delaying others
//! 3. Real `/ws` sockets register on upgrade, leave the hub when the client
//!    goes away, and are closed on eviction and on the fatal signal

#[cfg(test)]
mod tests {
    use super::super::fixtures::{
        eventually, memory_config, post, spawn_node, RunningNode, WAIT,
    };
    use futures::StreamExt;
    use serde_json::{json, Value};
    use std::collections::BTreeSet;
    use tokio::net::TcpStream;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    /// Open `/ws` and wait until the hub has registered the connection.
    async fn connect(node: &RunningNode) -> Client {
        let url = node.url("/ws").replacen("http://", "ws://", 1);
        let (socket, response) = connect_async(url).await.unwrap();
        assert_eq!(response.status().as_u16(), 101);

        let hub = node.hub.clone();
        eventually("socket to register", || hub.connection_count() == 1).await;
        socket
    }

    async fn next_frame(socket: &mut Client) -> Option<Result<Message, String>> {
        tokio::time::timeout(WAIT, socket.next())
            .await
            .expect("socket stayed silent")
            .map(|frame| frame.map_err(|e| e.to_string()))
    }

    #[tokio::test]
    async fn test_subscriber_sees_only_later_commits() {
        let node = spawn_node(memory_config()).await;
        let client = reqwest::Client::new();

        node.store.propose("lobby", post("alice", "before")).await.unwrap();
        let store = node.store.clone();
        eventually("first post", || store.post_count() == 1).await;

        let mut subscriber = node.hub.register();

        client
            .post(node.url("/rooms/lobby"))
            .json(&json!({"User": "bob", "Message": "after"}))
            .send()
            .await
            .unwrap();

        let frame = tokio::time::timeout(WAIT, subscriber.messages.recv())
            .await
            .expect("no push received")
            .expect("subscriber evicted");
        let pushed: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(pushed["RoomName"], "lobby");
        assert_eq!(pushed["User"], "bob");
        assert_eq!(pushed["Message"], "after");
        assert!(pushed["PostedAt"].is_string());

        assert!(subscriber.messages.try_recv().is_err());

        node.stop().await.unwrap_err();
    }

    #[tokio::test]
    async fn test_stalled_subscriber_is_evicted_without_blocking_others() {
        let mut config = memory_config();
        config.gateway.websocket.queue_capacity = 4;
        let node = spawn_node(config).await;

        let stalled = node.hub.register();
        let mut live = node.hub.register();

        for i in 0..6 {
            node.store
                .propose("busy", post("dave", &format!("m{i}")))
                .await
                .unwrap();
            let frame = tokio::time::timeout(WAIT, live.messages.recv())
                .await
                .expect("live subscriber starved")
                .expect("live subscriber evicted");
            let pushed: Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(pushed["Message"], format!("m{i}"));
        }

        assert_eq!(node.store.post_count(), 6);
        assert_eq!(node.hub.evictions(), 1);
        assert_eq!(node.hub.connection_count(), 1);
        assert!(!node.hub.unregister(stalled.id));

        node.stop().await.unwrap_err();
    }

    #[tokio::test]
    async fn test_websocket_client_receives_committed_post() {
        let node = spawn_node(memory_config()).await;
        let mut socket = connect(&node).await;

        reqwest::Client::new()
            .post(node.url("/rooms/lobby"))
            .json(&json!({"User": "frank", "Message": "over the wire"}))
            .send()
            .await
            .unwrap();

        let text = match next_frame(&mut socket).await {
            Some(Ok(Message::Text(text))) => text,
            other => panic!("expected a text frame, got {other:?}"),
        };
        let pushed: Value = serde_json::from_str(text.as_str()).unwrap();
        let keys: BTreeSet<&str> = pushed
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            BTreeSet::from(["Message", "PostedAt", "RoomName", "User"])
        );
        assert_eq!(pushed["RoomName"], "lobby");
        assert_eq!(pushed["User"], "frank");
        assert_eq!(pushed["Message"], "over the wire");

        drop(socket);
        let hub = node.hub.clone();
        eventually("socket to unregister", || hub.connection_count() == 0).await;

        node.stop().await.unwrap_err();
    }

    #[tokio::test]
    async fn test_evicted_socket_is_closed() {
        let node = spawn_node(memory_config()).await;
        let mut socket = connect(&node).await;

        // First connection on a fresh hub.
        assert!(node.hub.unregister(1));

        match next_frame(&mut socket).await {
            Some(Ok(Message::Close(_))) => {}
            other => panic!("expected a close frame, got {other:?}"),
        }

        node.stop().await.unwrap_err();
    }

    #[tokio::test]
    async fn test_fatal_signal_closes_socket() {
        let node = spawn_node(memory_config()).await;
        let mut socket = connect(&node).await;

        node.fatal.trigger("replica diverged");

        match next_frame(&mut socket).await {
            None | Some(Ok(Message::Close(_))) | Some(Err(_)) => {}
            other => panic!("socket still open after fatal signal: {other:?}"),
        }
        let hub = node.hub.clone();
        eventually("socket to unregister", || hub.connection_count() == 0).await;

        let err = node.join().await.unwrap_err();
        assert!(err.contains("replica diverged"), "{err}");
    }
}
