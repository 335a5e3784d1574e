/*!
 * Common test utilities for the transeval test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use transeval::EvaluationInput;

/// Chinese source paragraph used across tests
pub const SOURCE_TEXT: &str = "我们研究了纳米材料的力学性能。实验结果表明，合金的强度显著提高。";

/// Passive, terminologically correct translation of `SOURCE_TEXT`
pub const GOOD_TRANSLATION: &str = "The mechanical properties of nanomaterials were studied. \
     The experimental results show that the strength of the alloy was improved significantly.";

/// Active translation that misses the glossary terms
pub const WEAK_TRANSLATION: &str = "We look at small stuff. The metal mix got stronger.";

/// Human reference translation of `SOURCE_TEXT`
pub const REFERENCE_TEXT: &str = "The mechanical properties of nanomaterials were investigated. \
     The experimental results show that the strength of the alloy was increased significantly.";

/// Glossary in the simplified JSON form
pub const GLOSSARY_JSON: &str = r#"{
    "纳米材料": "nanomaterials",
    "合金": "alloy",
    "力学性能": "mechanical properties",
    "陶瓷": "ceramic"
}"#;

/// Initialize test logging once; later calls are no-ops
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Evaluation input for `SOURCE_TEXT` with the given translation and references
pub fn sample_input(translation: &str, references: &[&str]) -> EvaluationInput {
    EvaluationInput::new(
        SOURCE_TEXT,
        translation,
        references.iter().map(|r| r.to_string()).collect(),
        "zh",
        "en",
    )
}

/// Serve one canned HTTP response on a local port
///
/// Returns the base URL and a handle yielding the raw request received.
pub async fn serve_once(status_line: &'static str, body: String) -> Result<(String, JoinHandle<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return String::new();
        };
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
        request
    });

    Ok((format!("http://{}", address), handle))
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buffer.extend_from_slice(&chunk[..read]);

        if let Some(header_end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buffer[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buffer).to_string()
}

/// Chat completion response body carrying `content`
pub fn chat_completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
    .to_string()
}
