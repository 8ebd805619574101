use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a form piped on stdin. JSON is tried first, then YAML.
/// Returns None if stdin is a TTY or nothing was piped.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map(Some)
            .map_err(|_| Box::<dyn std::error::Error>::from(format!("Failed to parse stdin: {}", json_err))),
    }
}
