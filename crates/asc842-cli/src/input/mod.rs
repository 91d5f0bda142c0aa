pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Syntax of a request document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    Json,
    Yaml,
}

/// Parse a request document into `T`, naming `source` in the error.
pub fn parse_request<T: DeserializeOwned>(
    text: &str,
    format: RequestFormat,
    source: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let parsed = match format {
        RequestFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        RequestFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    };
    parsed.map_err(|reason| format!("Invalid request in {source}: {reason}").into())
}

/// Load a request from `--input <file>` or piped stdin, whichever is present.
pub fn load_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => file::read_input(path).map(Some),
        None => stdin::read_stdin(),
    }
}
