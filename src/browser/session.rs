use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FillerError;
use crate::field::field_model::{FieldRecord, RawElement};
use crate::traversal::controller::{InputDriver, PageSnapshot, PageSource};
use crate::traversal::traversal_model::PageSignals;

/// Default sidecar script, relative to the working directory. Overridable
/// with the FORM_AUTOFILL_SERVER environment variable.
const BROWSER_SERVER: &str = "node/browser_server.js";

/// Request sent to browser_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    Extract {
        cmd: &'static str,
    },
    Action {
        cmd: &'static str,
        action: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(rename = "optionIndex", skip_serializing_if = "Option::is_none")]
        option_index: Option<usize>,
        #[serde(rename = "durationMs", skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    Quit {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn extract() -> Self {
        BrowserRequest::Extract { cmd: "extract" }
    }

    pub fn fill(selector: &str, value: &str) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "fill".into(),
            selector: Some(selector.to_string()),
            value: Some(value.to_string()),
            option_index: None,
            duration_ms: None,
        }
    }

    pub fn click(selector: &str) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "click".into(),
            selector: Some(selector.to_string()),
            value: None,
            option_index: None,
            duration_ms: None,
        }
    }

    pub fn select(selector: &str, option_index: usize) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "select".into(),
            selector: Some(selector.to_string()),
            value: None,
            option_index: Some(option_index),
            duration_ms: None,
        }
    }

    pub fn wait(duration_ms: u64) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "wait".into(),
            selector: None,
            value: None,
            option_index: None,
            duration_ms: Some(duration_ms),
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response received from browser_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub ready: Option<bool>,
}

/// A persistent browser session backed by browser_server.js.
///
/// Launches a long-lived Node.js process that keeps a Chromium browser open.
/// Commands are sent as NDJSON over stdin, responses read from stdout.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
}

impl BrowserSession {
    /// Launch a new browser session by spawning browser_server.js.
    pub fn launch() -> Result<Self, FillerError> {
        let script = std::env::var("FORM_AUTOFILL_SERVER")
            .unwrap_or_else(|_| BROWSER_SERVER.to_string());

        let mut child = Command::new("node")
            .arg(&script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FillerError::SubprocessSpawn {
                script: script.clone(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            FillerError::SessionIO("Failed to capture stdin of browser_server.js".into())
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            FillerError::SessionIO("Failed to capture stdout of browser_server.js".into())
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader.read_line(&mut line).map_err(|e| {
            FillerError::SessionIO(format!("Failed to read ready signal: {}", e))
        })?;

        let response: BrowserResponse = serde_json::from_str(line.trim()).map_err(|e| {
            FillerError::JsonParse {
                context: "browser_server.js ready signal".into(),
                source: e,
            }
        })?;

        if !response.ok || response.ready != Some(true) {
            return Err(FillerError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from browser_server.js".into(),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, FillerError> {
        let json = serde_json::to_string(request).map_err(|e| FillerError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            FillerError::SessionIO(format!("Failed to write to browser_server.js stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            FillerError::SessionIO(format!("Failed to flush browser_server.js stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            FillerError::SessionIO(format!("Failed to read from browser_server.js stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(FillerError::SessionIO(
                "Empty response from browser_server.js (process may have died)".into(),
            ));
        }

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| FillerError::JsonParse {
                context: "browser_server.js response".into(),
                source: e,
            })?;

        Ok(response)
    }

    /// Send a request and verify it succeeded.
    fn send_ok(
        &mut self,
        request: &BrowserRequest,
        command_name: &str,
    ) -> Result<BrowserResponse, FillerError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(FillerError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Navigate to a URL. A failure here means the page is unreachable,
    /// which aborts a run before its first step.
    pub fn navigate(&mut self, url: &str) -> Result<(), FillerError> {
        let request = BrowserRequest::navigate(url);
        self.send_ok(&request, "navigate").map_err(|e| FillerError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Extract the DOM snapshot from the current page.
    pub fn extract(&mut self) -> Result<Value, FillerError> {
        let request = BrowserRequest::extract();
        let response = self.send_ok(&request, "extract")?;
        response.data.ok_or_else(|| FillerError::SessionProtocol {
            command: "extract".into(),
            error: "No data in extract response".into(),
        })
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), FillerError> {
        let request = BrowserRequest::quit();
        // Best-effort quit — don't fail hard if process is already gone
        let _ = self.send(&request);
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}

// ============================================================================
// Core collaborator impls
// ============================================================================

/// Parse an extraction payload (`{url, title, dom}`) into a `PageSnapshot`.
pub fn parse_snapshot(data: &Value) -> Result<PageSnapshot, FillerError> {
    let dom = data["dom"]
        .as_array()
        .ok_or_else(|| FillerError::SessionProtocol {
            command: "extract".into(),
            error: "DOM extraction returned no 'dom' array".into(),
        })?;

    let elements: Vec<RawElement> =
        serde_json::from_value(Value::Array(dom.clone())).map_err(|e| FillerError::JsonParse {
            context: "extracted DOM elements".into(),
            source: e,
        })?;

    let url = data["url"].as_str().unwrap_or("");
    let title = data["title"].as_str().unwrap_or("");

    Ok(PageSnapshot {
        signals: PageSignals::new(url, title),
        elements,
    })
}

impl PageSource for BrowserSession {
    fn scan(&mut self) -> Result<PageSnapshot, FillerError> {
        let data = self.extract()?;
        parse_snapshot(&data)
    }

    fn settle(&mut self, timeout_ms: u64) -> Result<(), FillerError> {
        let request = BrowserRequest::wait(timeout_ms);
        match self.send_ok(&request, "wait") {
            Ok(_) => Ok(()),
            Err(FillerError::SessionProtocol { error, .. })
                if error.to_lowercase().contains("timeout") =>
            {
                Err(FillerError::NavigationTimeout {
                    waited_ms: timeout_ms,
                })
            }
            Err(e) => Err(e),
        }
    }
}

impl InputDriver for BrowserSession {
    fn fill_text(&mut self, field: &FieldRecord, value: &str) -> Result<(), FillerError> {
        let request = BrowserRequest::fill(&field.selector, value);
        self.send_ok(&request, "fill")
            .map_err(|e| FillerError::FieldFill {
                field: field.element_id.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn select_option(
        &mut self,
        field: &FieldRecord,
        option_index: usize,
    ) -> Result<(), FillerError> {
        let request = BrowserRequest::select(&field.selector, option_index);
        self.send_ok(&request, "select")
            .map_err(|e| FillerError::FieldFill {
                field: field.element_id.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn click(&mut self, field: &FieldRecord) -> Result<(), FillerError> {
        let request = BrowserRequest::click(&field.selector);
        self.send_ok(&request, "click")
            .map_err(|e| FillerError::FieldFill {
                field: field.element_id.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}
