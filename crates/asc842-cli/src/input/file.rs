use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use super::{parse_request, RequestFormat};

/// Read a request file; `.yaml` / `.yml` are YAML, everything else JSON.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let location = locate(path)?;
    let text = fs::read_to_string(&location)
        .map_err(|e| format!("Cannot read {}: {e}", location.display()))?;
    parse_request(&text, format_of(&location), &location.display().to_string())
}

fn format_of(path: &Path) -> RequestFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            RequestFormat::Yaml
        }
        _ => RequestFormat::Json,
    }
}

/// Relative paths resolve against the working directory; the target must be
/// an existing regular file.
fn locate(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let location = std::env::current_dir()?.join(path);
    if !location.is_file() {
        let problem = if location.exists() { "not a file" } else { "no such file" };
        return Err(format!("{}: {problem}", location.display()).into());
    }
    Ok(location)
}
