//! MCP sessions against the full tool set over an in-memory runtime

use dockmcp::{CredentialStore, FakeRuntime, ToolSettings, docker_server};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

fn settings() -> ToolSettings {
    ToolSettings {
        exec_timeout_secs: 5,
        credentials: CredentialStore::empty(),
    }
}

/// Feed `requests` as one session and collect every response line
async fn session(runtime: FakeRuntime, requests: Vec<Value>) -> Vec<Value> {
    let server = docker_server(Arc::new(runtime), settings()).unwrap();
    let (mut client, server_io) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server_io);

    let serving = tokio::spawn(async move {
        server
            .serve(BufReader::new(server_read), server_write)
            .await
    });

    for request in requests {
        let mut line = request.to_string();
        line.push('\n');
        client.write_all(line.as_bytes()).await.unwrap();
    }
    client.shutdown().await.unwrap();

    let mut responses = Vec::new();
    let mut lines = BufReader::new(client).lines();
    while let Some(line) = lines.next_line().await.unwrap() {
        responses.push(serde_json::from_str(&line).unwrap());
    }
    serving.await.unwrap().unwrap();
    responses
}

fn response(responses: &[Value], id: i64) -> &Value {
    responses
        .iter()
        .find(|r| r["id"] == id)
        .unwrap_or_else(|| panic!("no response for id {}", id))
}

fn call(id: i64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments},
    })
}

#[tokio::test]
async fn test_initialize_and_list() {
    let responses = session(
        FakeRuntime::new(),
        vec![
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "ping"}),
        ],
    )
    .await;
    assert_eq!(responses.len(), 3);

    let init = &response(&responses, 1)["result"];
    assert_eq!(init["protocolVersion"], "2024-11-05");
    assert_eq!(init["capabilities"]["tools"]["listChanged"], false);
    assert_eq!(init["serverInfo"]["name"], "dockmcp");

    let tools = response(&responses, 2)["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 22);
    assert_eq!(tools[0]["name"], "build_image");

    let exec = tools.iter().find(|t| t["name"] == "exec_container").unwrap();
    let required = exec["inputSchema"]["required"].as_array().unwrap();
    assert!(required.contains(&json!("id")));
    assert!(required.contains(&json!("cmd")));
    assert_eq!(exec["inputSchema"]["properties"]["timeout"]["default"], 5);

    assert_eq!(response(&responses, 3)["result"], json!({}));
}

#[tokio::test]
async fn test_container_session() {
    let runtime = FakeRuntime::new().with_image("alpine:latest");
    let responses = session(
        runtime.clone(),
        vec![
            call(1, "create_container", json!({"image": "alpine:latest", "name": "t1"})),
        ],
    )
    .await;
    let created = &response(&responses, 1)["result"];
    assert_eq!(created["isError"], false);
    assert!(
        created["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Container created successfully.")
    );

    // Same runtime, new session
    let responses = session(
        runtime,
        vec![
            call(2, "start_container", json!({"id": "t1"})),
            call(3, "fetch_container_logs", json!({"id": "t1", "tail": "ten"})),
            call(4, "remove_container", json!({"id": "nope"})),
        ],
    )
    .await;
    assert_eq!(
        response(&responses, 2)["result"]["content"][0]["text"],
        "Container t1 started successfully"
    );

    let invalid = &response(&responses, 3)["result"];
    assert_eq!(invalid["isError"], true);
    assert!(
        invalid["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Validation failed:")
    );

    assert_eq!(
        response(&responses, 4)["result"]["content"][0]["text"],
        "Container nope not found"
    );
}

#[tokio::test]
async fn test_protocol_errors() {
    let responses = session(
        FakeRuntime::new(),
        vec![
            json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": {"arguments": {}}}),
            call(3, "format_disk", json!({})),
        ],
    )
    .await;

    assert_eq!(response(&responses, 1)["error"]["code"], -32601);
    assert_eq!(response(&responses, 2)["error"]["code"], -32602);

    let unknown = &response(&responses, 3)["result"];
    assert_eq!(unknown["isError"], true);
    assert_eq!(unknown["content"][0]["text"], "Tool 'format_disk' not found");
}
