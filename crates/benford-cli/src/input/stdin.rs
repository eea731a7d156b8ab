use benford_core::BenfordInput;
use std::io::{self, Read};

/// Request document piped on stdin, JSON or YAML.
/// Returns None if stdin is a TTY or empty.
pub fn read_stdin() -> Result<Option<BenfordInput>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let doc = match serde_json::from_str(trimmed) {
        Ok(doc) => doc,
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map_err(|_| format!("stdin is neither JSON nor YAML: {json_err}"))?,
    };
    Ok(Some(doc))
}
