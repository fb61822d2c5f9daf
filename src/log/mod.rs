use crate::wire::ChatRequest;
use fs_err as fs;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Installs the global subscriber. Logs go to stderr; `RUST_LOG` wins over
/// the default level.
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "listing_copy=debug" } else { "listing_copy=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join("tx").join(tx.to_string())
}

/// Saves one chat exchange as `request.json` / `response.json` under a fresh
/// transaction directory and returns that directory.
pub fn save_exchange(root: &Path, req: &ChatRequest, raw_response: &str) -> anyhow::Result<PathBuf> {
    let dir = tx_dir(root, Uuid::new_v4());
    fs::create_dir_all(&dir)?;

    fs::write(dir.join("request.json"), to_string_pretty(req)?)?;

    // Keep the body readable when it is JSON, verbatim otherwise.
    let response = match serde_json::from_str::<serde_json::Value>(raw_response) {
        Ok(v) => to_string_pretty(&v)?,
        Err(_) => raw_response.to_string(),
    };
    fs::write(dir.join("response.json"), response)?;

    tracing::debug!(dir = %dir.display(), "saved exchange artifacts");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{ChatMessage, ResponseFormat};

    #[test]
    fn writes_request_and_response() {
        let root = tempfile::tempdir().unwrap();
        let req = ChatRequest {
            model: "m".into(),
            messages: vec![ChatMessage::user("hi")],
            temperature: 0.0,
            response_format: ResponseFormat::json_object(),
        };
        let dir = save_exchange(root.path(), &req, "not json").unwrap();
        assert!(dir.starts_with(root.path().join("tx")));
        let saved = std::fs::read_to_string(dir.join("request.json")).unwrap();
        assert!(saved.contains("json_object"));
        assert_eq!(std::fs::read_to_string(dir.join("response.json")).unwrap(), "not json");
    }
}
