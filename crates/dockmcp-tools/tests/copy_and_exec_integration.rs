//! Copying into containers and running commands in them

use dockmcp_core::tools::{ToolCall, ToolExecutor, ToolResult};
use dockmcp_tools::runtime::ExecOutput;
use dockmcp_tools::{CredentialStore, FakeRuntime, ToolSettings, docker_registry};
use serde_json::{Value, json};
use std::fs;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

async fn call(executor: &ToolExecutor, tool: &str, arguments: Value) -> ToolResult {
    executor
        .execute_tool(&ToolCall::from_json("it", tool, arguments))
        .await
}

async fn running_container(runtime: FakeRuntime, exec_timeout_secs: u64) -> ToolExecutor {
    let settings = ToolSettings {
        exec_timeout_secs,
        credentials: CredentialStore::empty(),
    };
    let executor = ToolExecutor::new(
        docker_registry(Arc::new(runtime.with_image("debian:12")), settings).unwrap(),
    );
    let result = call(
        &executor,
        "run_container",
        json!({"image": "debian:12", "name": "box"}),
    )
    .await;
    assert!(result.success, "{}", result.text());
    executor
}

#[cfg(unix)]
fn set_mode(path: &std::path::Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_directory_copy_preserves_tree() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("b")).unwrap();
    fs::write(src.join("a.txt"), "hello").unwrap();
    fs::write(src.join("b/c.txt"), "").unwrap();
    set_mode(&src.join("a.txt"), 0o644);
    set_mode(&src.join("b/c.txt"), 0o755);

    let runtime = FakeRuntime::new();
    let executor = running_container(runtime.clone(), 5).await;

    let result = call(
        &executor,
        "copy_to_container",
        json!({
            "id": "box",
            "source_path": src.to_string_lossy(),
            "destination_path": "/data",
        }),
    )
    .await;
    assert!(result.success, "{}", result.text());
    assert_eq!(
        result.text(),
        format!("Successfully copied directory from {} to box:/data", src.display())
    );

    let uploads = runtime.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].destination, "/data");

    let mut entries = Vec::new();
    let mut archive = tar::Archive::new(uploads[0].archive.as_ref());
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let path = entry.path().unwrap().to_string_lossy().into_owned();
        let mode = entry.header().mode().unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        entries.push((path, mode, content));
    }

    let files: Vec<(&str, u32, &str)> = entries
        .iter()
        .filter(|(path, _, _)| path.ends_with(".txt"))
        .map(|(path, mode, content)| (path.as_str(), *mode, content.as_str()))
        .collect();
    assert_eq!(
        files,
        vec![("src/a.txt", 0o644, "hello"), ("src/b/c.txt", 0o755, "")]
    );
    let paths: Vec<&str> = entries.iter().map(|(p, _, _)| p.trim_end_matches('/')).collect();
    assert_eq!(paths, vec!["src", "src/a.txt", "src/b", "src/b/c.txt"]);

    // Unpacking reproduces paths, sizes and modes
    let out = TempDir::new().unwrap();
    let mut archive = tar::Archive::new(uploads[0].archive.as_ref());
    archive.set_preserve_permissions(true);
    archive.unpack(out.path()).unwrap();

    let unpacked = |relative: &str| {
        use std::os::unix::fs::PermissionsExt;
        let metadata = fs::metadata(out.path().join(relative)).unwrap();
        (metadata.len(), metadata.permissions().mode() & 0o7777)
    };
    assert!(out.path().join("src/b").is_dir());
    assert_eq!(unpacked("src/a.txt"), (5, 0o644));
    assert_eq!(unpacked("src/b/c.txt"), (0, 0o755));
    assert_eq!(fs::read_to_string(out.path().join("src/a.txt")).unwrap(), "hello");
}

#[tokio::test]
async fn test_copy_with_owner_runs_chown() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("app.conf");
    fs::write(&file, "listen 80").unwrap();

    let runtime = FakeRuntime::new();
    let executor = running_container(runtime.clone(), 5).await;

    let result = call(
        &executor,
        "copy_to_container",
        json!({
            "id": "box",
            "source_path": file.to_string_lossy(),
            "destination_path": "/etc/",
            "owner": "1000:1000",
        }),
    )
    .await;
    assert!(result.success, "{}", result.text());
    assert!(result.text().starts_with("Successfully copied file from "));
    assert!(result.text().ends_with("\nOwnership changed to 1000:1000"));

    let execs = runtime.execs();
    assert_eq!(execs.len(), 1);
    assert_eq!(
        execs[0].spec.cmd,
        vec!["chown", "-R", "1000:1000", "/etc/app.conf"]
    );
}

#[tokio::test]
async fn test_failed_chown_keeps_the_copy() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("app.conf");
    fs::write(&file, "listen 80").unwrap();

    let runtime = FakeRuntime::new().with_exec_handler(|_| ExecOutput {
        stdout: vec![],
        stderr: vec!["chown: invalid user: 'nobody:nogroup'".into()],
        exit_code: Some(1),
    });
    let executor = running_container(runtime.clone(), 5).await;

    let result = call(
        &executor,
        "copy_to_container",
        json!({
            "id": "box",
            "source_path": file.to_string_lossy(),
            "destination_path": "/etc",
            "owner": "nobody:nogroup",
        }),
    )
    .await;
    assert!(result.success);
    assert!(
        result
            .text()
            .contains("\nWarning: failed to change ownership to nobody:nogroup: ")
    );
    assert_eq!(runtime.uploads().len(), 1);
}

#[tokio::test]
async fn test_missing_source_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nothing-here");
    let executor = running_container(FakeRuntime::new(), 5).await;

    let result = call(
        &executor,
        "copy_to_container",
        json!({
            "id": "box",
            "source_path": missing.to_string_lossy(),
            "destination_path": "/tmp",
        }),
    )
    .await;
    assert_eq!(result.error_kind(), Some("TOOL_RESOURCE_NOT_FOUND"));
    assert_eq!(
        result.text(),
        format!("Source path not found: {}", missing.display())
    );
}

#[tokio::test]
async fn test_exec_keeps_streams_apart() {
    let runtime = FakeRuntime::new().with_exec_handler(|spec| ExecOutput {
        stdout: vec![format!("{}\n", spec.cmd.join(" "))],
        stderr: vec!["warning: low disk\n".into()],
        exit_code: Some(3),
    });
    let executor = running_container(runtime.clone(), 5).await;

    let result = call(
        &executor,
        "exec_container",
        json!({
            "id": "box",
            "cmd": "sh -c 'df -h'",
            "working_dir": "/srv",
            "env": ["LANG=C"],
        }),
    )
    .await;

    assert!(result.success, "{}", result.text());
    assert_eq!(
        result.text(),
        "Command executed in container box\nExit code: 3\n\nSTDOUT:\nsh -c df -h\n\n\nSTDERR:\nwarning: low disk"
    );

    let execs = runtime.execs();
    assert_eq!(execs[0].spec.cmd, vec!["sh", "-c", "df -h"]);
    assert_eq!(execs[0].spec.working_dir.as_deref(), Some("/srv"));
    assert_eq!(execs[0].spec.env, Some(vec!["LANG=C".to_string()]));
}

#[tokio::test]
async fn test_exec_timeout() {
    let runtime = FakeRuntime::new().with_exec_delay(Duration::from_secs(3));
    let executor = running_container(runtime, 5).await;

    let result = call(
        &executor,
        "exec_container",
        json!({"id": "box", "cmd": "sleep 30", "timeout": 1}),
    )
    .await;
    assert_eq!(result.error_kind(), Some("TOOL_TIMEOUT"));
    assert_eq!(
        result.text(),
        "Command execution timed out after 1 seconds"
    );
}

#[tokio::test]
async fn test_exec_in_stopped_container() {
    let executor = running_container(FakeRuntime::new(), 5).await;
    call(&executor, "stop_container", json!({"id": "box"})).await;

    let result = call(&executor, "exec_container", json!({"id": "box", "cmd": "ls"})).await;
    assert!(!result.success);
    assert_eq!(result.error_kind(), Some("TOOL_CONFLICT"));
}

#[tokio::test]
async fn test_unbalanced_quotes_are_rejected() {
    let runtime = FakeRuntime::new();
    let executor = running_container(runtime.clone(), 5).await;

    let result = call(
        &executor,
        "exec_container",
        json!({"id": "box", "cmd": "echo \"oops"}),
    )
    .await;
    assert_eq!(result.error_kind(), Some("TOOL_VALIDATION_FAILED"));
    assert!(runtime.execs().is_empty());
}
