//! Scene files: a YAML stream with one window document each.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use visprobe_service::{ProbeService, WindowConfiguration};

pub async fn read_scene(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read scene file: {}", path.display()))
}

/// Splits a scene into window documents, re-serialized one per window.
/// Empty documents are skipped.
pub fn split_documents(raw: &str) -> Result<Vec<String>> {
    let mut documents = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_str(raw).enumerate() {
        let value = serde_yaml::Value::deserialize(document)
            .with_context(|| format!("Invalid YAML in scene document {index}"))?;
        if value.is_null() {
            continue;
        }
        documents.push(serde_yaml::to_string(&value)?);
    }
    Ok(documents)
}

/// Shows every window of the scene and returns their ids in order.
pub async fn load_scene(service: &ProbeService, raw: &str) -> Result<Vec<String>> {
    let mut window_ids = Vec::new();
    for (index, markup) in split_documents(raw)?.into_iter().enumerate() {
        let reply = service
            .create_window(WindowConfiguration { markup })
            .await
            .context("Service stopped while loading scene")?;
        match reply.window_id {
            Some(id) => window_ids.push(id),
            None => {
                for message in &reply.error_messages {
                    warn!(document = index, error = %message, "Window failed to load");
                }
                bail!(
                    "Scene document {index} did not load:\n{}",
                    reply.error_messages.join("\n")
                );
            }
        }
    }
    if window_ids.is_empty() {
        bail!("Scene contains no windows");
    }
    info!(windows = window_ids.len(), "Scene loaded");
    Ok(window_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use visprobe_service::ServiceOptions;

    #[test]
    fn test_split_documents() {
        let docs = split_documents("---\ntype: Window\n---\n\n---\ntype: Window\nname: B\n").unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[1].contains("name: B"));
    }

    #[test]
    fn test_single_document_without_separator() {
        assert_eq!(split_documents("type: Window\n").unwrap(), vec!["type: Window\n".to_string()]);
    }

    #[test]
    fn test_separator_with_trailing_comment() {
        let raw = "type: Window\nname: A\n--- # second window\ntype: Window\nname: B\n";
        let docs = split_documents(raw).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].contains("name: A"));
        assert!(docs[1].contains("name: B"));
        assert!(!docs[1].contains('#'));
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let err = split_documents("type: Window\n---\ntype: [\n").unwrap_err();
        assert!(err.to_string().contains("Invalid YAML in scene document"));
    }

    #[tokio::test]
    async fn test_load_scene_with_commented_separator() {
        let service = ProbeService::headless(ServiceOptions::default()).unwrap();
        let raw = "type: Window\nname: A\n--- # second window\ntype: Window\nname: B\n";
        let ids = load_scene(&service, raw).await.unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_load_scene_reports_bad_document() {
        let service = ProbeService::headless(ServiceOptions::default()).unwrap();
        let err = load_scene(&service, "type: Window\n---\ntype: Button\n")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Scene document 1 did not load"));
    }

    #[tokio::test]
    async fn test_empty_scene_is_error() {
        let service = ProbeService::headless(ServiceOptions::default()).unwrap();
        assert!(load_scene(&service, "\n").await.is_err());
    }
}
