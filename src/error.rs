use std::fmt;

#[derive(Debug)]
pub enum FillerError {
    /// Node.js sidecar failed to spawn (browser_server.js)
    SubprocessSpawn { script: String, source: std::io::Error },

    /// JSON parsing failed (sidecar output or serde)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (command to the sidecar)
    JsonSerialize { context: String, source: serde_json::Error },

    /// Pipe-level I/O with the sidecar failed
    SessionIO(String),

    /// The sidecar answered a command with ok=false
    SessionProtocol { command: String, error: String },

    /// Initial navigation to the target page failed
    Navigation { url: String, reason: String },

    /// Page did not settle within the load-state timeout
    NavigationTimeout { waited_ms: u64 },

    /// Zero fields found on the very first scan
    NoFieldsFound,

    /// Input synthesis reported failure for one field
    FieldFill { field: String, reason: String },

    /// Data file could not be read or parsed
    DataFile { path: String, reason: String },
}

impl fmt::Display for FillerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillerError::SubprocessSpawn { script, source } => {
                write!(f, "Failed to spawn {} (is Node.js installed?): {}", script, source)
            }
            FillerError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            FillerError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            FillerError::SessionIO(msg) => {
                write!(f, "Browser session I/O error: {}", msg)
            }
            FillerError::SessionProtocol { command, error } => {
                write!(f, "Browser command '{}' failed: {}", command, error)
            }
            FillerError::Navigation { url, reason } => {
                write!(f, "Failed to reach '{}': {}", url, reason)
            }
            FillerError::NavigationTimeout { waited_ms } => {
                write!(f, "Page did not settle within {}ms", waited_ms)
            }
            FillerError::NoFieldsFound => {
                write!(f, "No form fields found on the page")
            }
            FillerError::FieldFill { field, reason } => {
                write!(f, "Failed to fill field '{}': {}", field, reason)
            }
            FillerError::DataFile { path, reason } => {
                write!(f, "Could not load data file '{}': {}", path, reason)
            }
        }
    }
}

impl std::error::Error for FillerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FillerError::SubprocessSpawn { source, .. } => Some(source),
            FillerError::JsonParse { source, .. } => Some(source),
            FillerError::JsonSerialize { source, .. } => Some(source),
            _ => None,
        }
    }
}
