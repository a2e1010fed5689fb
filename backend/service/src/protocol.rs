//! Request and reply types.
//!
//! Every reply carries `error_messages`: recoverable failures are reported
//! there instead of failing the call.

use serde::{Deserialize, Serialize};

/// Common view over replies, used for auditing.
pub trait Reply {
    fn error_messages(&self) -> &[String];

    fn is_ok(&self) -> bool {
        self.error_messages().is_empty()
    }
}

macro_rules! impl_reply {
    ($($ty:ty),+ $(,)?) => {
        $(impl Reply for $ty {
            fn error_messages(&self) -> &[String] {
                &self.error_messages
            }
        })+
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowsReply {
    pub window_ids: Vec<String>,
    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementQuery {
    pub window_id: Option<String>,
    pub parent_id: Option<String>,
    pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementReply {
    pub element_ids: Vec<String>,
    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyQuery {
    pub element_id: String,
    pub name: String,
    pub owner_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetPropertyRequest {
    pub element_id: String,
    pub name: String,
    pub value: String,
    /// Overrides the declared type used for conversion; `"markup"` parses
    /// `value` as an element document.
    pub value_type: Option<String>,
    pub owner_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyReply {
    pub value: String,
    /// Runtime type of the value, falling back to the declared type for null.
    pub value_type: String,
    /// Declared type of the property.
    pub property_type: String,
    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundQuery {
    pub element_id: String,
    pub to_element_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundReply {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceQuery {
    pub element_id: Option<String>,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReply {
    pub key: String,
    pub value: String,
    pub value_type: String,
    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementRequest {
    pub element_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatesReply {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationConfiguration {
    /// YAML mapping of resource keys to values.
    pub resource_markup: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowConfiguration {
    pub markup: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowReply {
    pub window_id: Option<String>,
    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReply {
    /// BMP-encoded bytes.
    pub data: Vec<u8>,
    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputRequest {
    /// Target element; the focused element when absent.
    pub element_id: Option<String>,
    pub text: String,
}

/// Reply for operations that only report errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReply {
    pub error_messages: Vec<String>,
}

impl_reply!(
    WindowsReply,
    ElementReply,
    PropertyReply,
    BackgroundReply,
    ResourceReply,
    CoordinatesReply,
    WindowReply,
    ImageReply,
    StatusReply,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_wire_names() {
        let json = serde_json::to_value(PropertyReply {
            value: "1".into(),
            value_type: "Double".into(),
            property_type: "Double".into(),
            error_messages: vec![],
        })
        .unwrap();
        assert!(json.get("valueType").is_some());
        assert!(json.get("errorMessages").is_some());
    }

    #[test]
    fn test_requests_default_missing_fields() {
        let query: ElementQuery = serde_json::from_str(r#"{"windowId":"w"}"#).unwrap();
        assert_eq!(query.window_id.as_deref(), Some("w"));
        assert!(query.query.is_empty());
        assert!(query.parent_id.is_none());
    }

    #[test]
    fn test_reply_is_ok() {
        let mut reply = StatusReply::default();
        assert!(reply.is_ok());
        reply.error_messages.push("boom".into());
        assert!(!reply.is_ok());
    }
}
