//! One-shot query: load a scene into a private service, resolve a query and
//! describe the element it lands on.

use anyhow::{bail, Result};
use serde::Serialize;

use visprobe_service::{
    BackgroundQuery, ElementQuery, ElementRequest, ProbeService, PropertyQuery, ServiceOptions,
};

use crate::scene::load_scene;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryReport {
    pub query: String,
    pub window_id: String,
    pub element_id: Option<String>,
    /// `[left, top, right, bottom]` in screen units.
    pub bounds: Option<[f64; 4]>,
    /// Effective background as `#AARRGGBB`.
    pub background: Option<String>,
    pub properties: Vec<PropertyLine>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyLine {
    pub name: String,
    pub value: String,
    pub value_type: String,
}

impl QueryReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub async fn run_query(
    markup: &str,
    window_name: Option<&str>,
    query: &str,
    properties: &[String],
) -> Result<QueryReport> {
    let service = ProbeService::headless(ServiceOptions::default())?;
    let window_ids = load_scene(&service, markup).await?;
    let window_id = pick_window(&service, &window_ids, window_name).await?;

    let mut report = QueryReport {
        query: query.to_string(),
        window_id: window_id.clone(),
        ..Default::default()
    };

    let reply = service
        .get_element(ElementQuery {
            window_id: Some(window_id),
            parent_id: None,
            query: query.to_string(),
        })
        .await?;
    report.errors.extend(reply.error_messages);
    let Some(element_id) = reply.element_ids.into_iter().next() else {
        service.shutdown().await?;
        return Ok(report);
    };
    report.element_id = Some(element_id.clone());

    let coordinates = service
        .get_coordinates(ElementRequest {
            element_id: element_id.clone(),
        })
        .await?;
    if coordinates.error_messages.is_empty() {
        report.bounds = Some([
            coordinates.left,
            coordinates.top,
            coordinates.right,
            coordinates.bottom,
        ]);
    } else {
        report.warnings.extend(coordinates.error_messages);
    }

    let background = service
        .get_effective_background(BackgroundQuery {
            element_id: element_id.clone(),
            to_element_id: None,
        })
        .await?;
    if background.error_messages.is_empty() {
        report.background = Some(format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            background.alpha, background.red, background.green, background.blue
        ));
    } else {
        report.warnings.extend(background.error_messages);
    }

    for name in properties {
        let (owner_type, name) = match name.split_once('.') {
            Some((owner, name)) => (Some(owner.to_string()), name),
            None => (None, name.as_str()),
        };
        let reply = service
            .get_property(PropertyQuery {
                element_id: element_id.clone(),
                name: name.to_string(),
                owner_type,
            })
            .await?;
        if reply.error_messages.is_empty() {
            report.properties.push(PropertyLine {
                name: name.to_string(),
                value: reply.value,
                value_type: reply.value_type,
            });
        } else {
            report.errors.extend(reply.error_messages);
        }
    }

    service.shutdown().await?;
    Ok(report)
}

/// The named window, or the main window when no name is given.
async fn pick_window(
    service: &ProbeService,
    window_ids: &[String],
    window_name: Option<&str>,
) -> Result<String> {
    let Some(wanted) = window_name else {
        let main = service.get_main_window().await?;
        return match main.window_ids.into_iter().next() {
            Some(id) => Ok(id),
            None => bail!("Scene has no main window"),
        };
    };

    for id in window_ids {
        let name = service
            .get_property(PropertyQuery {
                element_id: id.clone(),
                name: "Name".into(),
                owner_type: None,
            })
            .await?;
        if name.error_messages.is_empty() && name.value == wanted {
            return Ok(id.clone());
        }
    }
    bail!("No window named '{wanted}' in scene")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r##"
type: Window
name: Main
properties:
  Left: 10
  Top: 20
  Width: 200
  Height: 100
  Background: "#FF0000FF"
children:
  - type: StackPanel
    children:
      - type: TextBox
        name: First
        properties:
          Width: 50
          Height: 10
---
type: Window
name: Tools
children:
  - type: Button
    name: Apply
"##;

    #[tokio::test]
    async fn test_query_main_window() {
        let report = run_query(SCENE, None, "~First", &["Width".to_string()])
            .await
            .unwrap();
        assert!(report.is_ok(), "{:?}", report.errors);
        assert!(report.element_id.is_some());
        assert_eq!(report.bounds, Some([10.0, 20.0, 60.0, 30.0]));
        assert_eq!(report.background.as_deref(), Some("#FF0000FF"));
        assert_eq!(report.properties[0].value, "50");
    }

    #[tokio::test]
    async fn test_query_named_window() {
        let report = run_query(SCENE, Some("Tools"), "~Apply", &[]).await.unwrap();
        assert!(report.is_ok(), "{:?}", report.errors);

        let missing = run_query(SCENE, None, "~Apply", &[]).await.unwrap();
        assert_eq!(missing.errors.len(), 2);
        assert_eq!(missing.errors[1], "Failed to find element named 'Apply'");
        assert!(missing.element_id.is_none());
    }

    #[tokio::test]
    async fn test_unknown_window_name() {
        let err = run_query(SCENE, Some("Nope"), "~Apply", &[]).await.unwrap_err();
        assert!(err.to_string().contains("No window named 'Nope'"));
    }
}
