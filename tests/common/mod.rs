//! Test doubles for the engine: a scripted WebSocket server answering the
//! JSON-RPC methods the walker issues, and a minimal HTTP server handing
//! out artifact bytes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

// ============================================================================
// Tracing
// ============================================================================

/// Initializes test logging once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// MockSheet
// ============================================================================

/// One sheet the mock engine reports, with its child objects.
#[derive(Debug, Clone)]
pub struct MockSheet {
    pub id: String,
    pub title: Option<String>,
    pub children: Vec<String>,
}

impl MockSheet {
    pub fn new(id: &str, title: Option<&str>, children: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.map(str::to_string),
            children: children.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

// ============================================================================
// MockEngineOptions
// ============================================================================

/// Scripted behavior for one mock engine instance.
#[derive(Debug, Clone, Default)]
pub struct MockEngineOptions {
    pub sheets: Vec<MockSheet>,
    /// Additional non-sheet top-level infos returned by `GetAllInfos`.
    pub extra_infos: Vec<(String, String)>,
    /// Whether `OpenDoc` returns a document handle.
    pub open_without_handle: bool,
    /// Whether export responses carry a `qUrl`.
    pub export_without_url: bool,
    /// Methods that answer with an engine error payload.
    pub failing_methods: Vec<String>,
}

impl MockEngineOptions {
    pub fn with_sheets(sheets: Vec<MockSheet>) -> Self {
        Self {
            sheets,
            ..Self::default()
        }
    }
}

// ============================================================================
// MockEngine
// ============================================================================

/// A single-connection engine double.
///
/// Accepts one WebSocket client, pushes an `OnConnected` notification, then
/// answers each request from the scripted options while logging it.
pub struct MockEngine {
    endpoint: Url,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockEngine {
    /// Binds to a random localhost port and starts serving.
    pub async fn spawn(options: MockEngineOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock engine");
        let port = listener.local_addr().expect("local addr").port();
        let endpoint = Url::parse(&format!("ws://127.0.0.1:{port}/app/")).expect("valid url");

        let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(socket).await.expect("upgrade");

            // Engines announce the session before any reply.
            let hello = json!({
                "jsonrpc": "2.0",
                "method": "OnConnected",
                "params": {"qSessionState": "SESSION_CREATED"}
            });
            let _ = ws.send(Message::Text(hello.to_string().into())).await;

            let mut handles: HashMap<i64, String> = HashMap::new();
            let mut next_handle: i64 = 10;

            while let Some(frame) = ws.next().await {
                let text = match frame {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => continue,
                };

                let request: Value = serde_json::from_str(text.as_str()).expect("request JSON");
                log.lock().expect("log lock").push(request.clone());

                let reply = answer(&options, &request, &mut handles, &mut next_handle);
                if ws
                    .send(Message::Text(reply.to_string().into()))
                    .await
                    .is_err()
                {
                    break;
                }
            }
        });

        Self { endpoint, requests }
    }

    pub fn endpoint(&self) -> Url {
        self.endpoint.clone()
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().expect("log lock").clone()
    }

    /// Method names of all requests received so far, in order.
    pub fn methods(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r["method"].as_str().map(str::to_string))
            .collect()
    }

    /// The `qId` params of every `GetObject` request, in order.
    pub fn resolved_object_ids(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter(|r| r["method"] == "GetObject")
            .filter_map(|r| r["params"]["qId"].as_str().map(str::to_string))
            .collect()
    }
}

/// Builds the scripted reply for one request.
fn answer(
    options: &MockEngineOptions,
    request: &Value,
    handles: &mut HashMap<i64, String>,
    next_handle: &mut i64,
) -> Value {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default();

    if options.failing_methods.iter().any(|m| m == method) {
        return json!({"id": id, "error": {"code": 9999, "message": format!("{method} failed")}});
    }

    match method {
        "OpenDoc" => {
            if options.open_without_handle {
                json!({"id": id, "result": {"qReturn": {"qType": "Doc"}}})
            } else {
                json!({"id": id, "result": {"qReturn": {"qType": "Doc", "qHandle": 1}}})
            }
        }

        "GetAllInfos" => {
            let mut infos: Vec<Value> = options
                .sheets
                .iter()
                .map(|s| json!({"qId": s.id, "qType": "sheet"}))
                .collect();
            for (object_id, object_type) in &options.extra_infos {
                infos.push(json!({"qId": object_id, "qType": object_type}));
            }
            json!({"id": id, "result": {"qInfos": infos}})
        }

        "GetObject" => {
            let object_id = request["params"]["qId"].as_str().unwrap_or_default();
            let handle = *next_handle;
            *next_handle += 1;
            handles.insert(handle, object_id.to_string());
            json!({"id": id, "result": {"qReturn": {"qType": "GenericObject", "qHandle": handle}}})
        }

        "GetLayout" => {
            let handle = request["handle"].as_i64().unwrap_or_default();
            let sheet = handles
                .get(&handle)
                .and_then(|object_id| options.sheets.iter().find(|s| &s.id == object_id));
            match sheet.and_then(|s| s.title.as_ref()) {
                Some(title) => {
                    json!({"id": id, "result": {"qLayout": {"qMeta": {"title": title}}}})
                }
                None => json!({"id": id, "result": {"qLayout": {"qMeta": {}}}}),
            }
        }

        "GetChildInfos" => {
            let handle = request["handle"].as_i64().unwrap_or_default();
            let children: Vec<Value> = handles
                .get(&handle)
                .and_then(|object_id| options.sheets.iter().find(|s| &s.id == object_id))
                .map(|s| {
                    s.children
                        .iter()
                        .map(|c| json!({"qId": c, "qType": "barchart"}))
                        .collect()
                })
                .unwrap_or_default();
            json!({"id": id, "result": {"qInfos": children}})
        }

        "Export" | "ExportImg" => {
            if options.export_without_url {
                json!({"id": id, "result": {}})
            } else {
                let handle = request["handle"].as_i64().unwrap_or_default();
                let object_id = handles.get(&handle).cloned().unwrap_or_default();
                json!({"id": id, "result": {"qUrl": format!("/tempcontent/{object_id}.png")}})
            }
        }

        // DoReload, DoSave, SelectValues and anything unscripted.
        _ => json!({"id": id, "result": {}}),
    }
}

// ============================================================================
// ArtifactServer
// ============================================================================

/// Minimal HTTP/1.1 server answering every GET with a fixed status and body.
pub struct ArtifactServer {
    base: Url,
}

impl ArtifactServer {
    pub async fn spawn(status: u16, body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind artifact server");
        let port = listener.local_addr().expect("local addr").port();
        let base = Url::parse(&format!("http://127.0.0.1:{port}/")).expect("valid url");

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let body = body.clone();

                tokio::spawn(async move {
                    // Drain the request head; the path does not matter.
                    let mut buffer = [0u8; 2048];
                    let mut head = Vec::new();
                    loop {
                        let Ok(n) = socket.read(&mut buffer).await else {
                            return;
                        };
                        if n == 0 {
                            return;
                        }
                        head.extend_from_slice(&buffer[..n]);
                        if head.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let reason = if status == 200 { "OK" } else { "Error" };
                    let header = format!(
                        "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        body.len()
                    );
                    let _ = socket.write_all(header.as_bytes()).await;
                    let _ = socket.write_all(&body).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { base }
    }

    pub fn base(&self) -> Url {
        self.base.clone()
    }
}
