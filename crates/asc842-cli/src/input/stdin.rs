use serde::de::DeserializeOwned;
use std::io::{self, Read};

use super::{parse_request, RequestFormat};

/// Read a piped request. Nothing is read from an interactive terminal, and
/// empty input counts as no request.
///
/// Input starting with `{` is JSON; anything else is read as YAML.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut piped = String::new();
    io::stdin().read_to_string(&mut piped)?;
    let text = piped.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let format = if text.starts_with('{') {
        RequestFormat::Json
    } else {
        RequestFormat::Yaml
    };
    parse_request(text, format, "stdin").map(Some)
}
