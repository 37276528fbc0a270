//! Wire types for the assistant endpoints

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub type NodeId = i64;
pub type OptionId = i64;
pub type UserId = i64;

/// Response of the start and node endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeEnvelope {
    #[serde(default)]
    pub node: Option<NodeRecord>,
    #[serde(default)]
    pub options: Option<Vec<OptionRecord>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub id: OptionId,
    #[serde(default)]
    pub option_text: Option<String>,
    #[serde(default)]
    pub next_node_id: Option<NodeId>,
    #[serde(default)]
    pub action_type: Option<String>,
    #[serde(default)]
    pub action_payload: Option<String>,
}

/// Body of the interaction log request. Every field is sent, `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionLog {
    pub node_id: Option<NodeId>,
    pub option_id: OptionId,
    pub user_id: Option<UserId>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub message: String,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryReply {
    #[serde(default)]
    pub reply: Option<String>,
}

impl QueryReply {
    /// Reply text, or `None` when missing or empty
    pub fn text(&self) -> Option<&str> {
        self.reply.as_deref().filter(|r| !r.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanList {
    #[serde(default)]
    pub plans: Vec<PlanSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: i64,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub minimum_amount: Option<Value>,
    #[serde(default)]
    pub profit_amount: Option<Value>,
    #[serde(default)]
    pub total_return: Option<Value>,
}

impl PlanSummary {
    /// Minimum amount as displayed, `0` when unset
    pub fn amount_text(&self) -> String {
        self.minimum_amount
            .as_ref()
            .filter(|v| is_truthy(v))
            .map_or_else(|| "0".to_string(), display_value)
    }

    /// Profit amount, falling back to total return, empty when neither is set
    pub fn benefit_text(&self) -> String {
        self.profit_amount
            .as_ref()
            .filter(|v| is_truthy(v))
            .or_else(|| self.total_return.as_ref().filter(|v| is_truthy(v)))
            .map(display_value)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestimonialList {
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramInfo {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
}

impl ContactDetails {
    /// Messaging-app URL, `None` when missing or empty
    pub fn whatsapp_url(&self) -> Option<&str> {
        self.whatsapp.as_deref().filter(|w| !w.is_empty())
    }
}

/// Widget configuration served by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub enabled: bool,
    #[serde(default = "default_button_label")]
    pub button_label: String,
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            button_label: default_button_label(),
            assistant_name: default_assistant_name(),
            avatar_url: None,
        }
    }
}

fn default_button_label() -> String {
    "Help".to_string()
}

fn default_assistant_name() -> String {
    "Assistant".to_string()
}

/// Accepts any JSON value and applies loose truthiness, so `1` and `"yes"`
/// enable the widget while `0`, `""` and `null` do not.
fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Scalar as a human would read it: whole floats lose their `.0`, strings
/// lose their quotes.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_ignores_unknown_fields() {
        let env: NodeEnvelope = serde_json::from_value(json!({
            "node": {"id": 3, "question": "Pick one", "is_root": 1, "created_at": "2024-01-01"},
            "options": [{"id": 9, "node_id": 3, "option_text": "Plans", "next_node_id": null, "display_order": 0}]
        }))
        .unwrap();
        assert_eq!(env.node.as_ref().unwrap().id, 3);
        let options = env.options.unwrap();
        assert_eq!(options[0].option_text.as_deref(), Some("Plans"));
        assert_eq!(options[0].next_node_id, None);
        assert!(env.error.is_none());
    }

    #[test]
    fn test_interaction_log_sends_nulls() {
        let body = serde_json::to_value(InteractionLog {
            node_id: Some(1),
            option_id: 2,
            user_id: None,
            metadata: None,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"node_id": 1, "option_id": 2, "user_id": null, "metadata": null})
        );
    }

    #[test]
    fn test_plan_display_values() {
        let plan: PlanSummary = serde_json::from_value(json!({
            "id": 1, "plan_name": "Starter", "minimum_amount": 100.0,
            "profit_amount": 0, "total_return": "12%"
        }))
        .unwrap();
        assert_eq!(plan.amount_text(), "100");
        assert_eq!(plan.benefit_text(), "12%");

        let bare: PlanSummary = serde_json::from_value(json!({"id": 2})).unwrap();
        assert_eq!(bare.amount_text(), "0");
        assert_eq!(bare.benefit_text(), "");

        let fractional: PlanSummary =
            serde_json::from_value(json!({"id": 3, "minimum_amount": 99.5, "profit_amount": 15}))
                .unwrap();
        assert_eq!(fractional.amount_text(), "99.5");
        assert_eq!(fractional.benefit_text(), "15");
    }

    #[test]
    fn test_config_truthiness() {
        let cfg: WidgetConfig = serde_json::from_value(json!({"enabled": true})).unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.button_label, "Help");
        assert_eq!(cfg.assistant_name, "Assistant");

        let cfg: WidgetConfig = serde_json::from_value(json!({"enabled": 0})).unwrap();
        assert!(!cfg.enabled);

        let cfg: WidgetConfig = serde_json::from_value(json!({})).unwrap();
        assert!(!cfg.enabled);

        let cfg: WidgetConfig =
            serde_json::from_value(json!({"enabled": 1, "assistant_name": "Ada"})).unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.assistant_name, "Ada");
    }

    #[test]
    fn test_reply_and_whatsapp_emptiness() {
        assert_eq!(QueryReply { reply: Some(String::new()) }.text(), None);
        assert_eq!(QueryReply { reply: Some("hi".into()) }.text(), Some("hi"));

        let missing = ContactDetails::default();
        assert_eq!(missing.whatsapp_url(), None);
        let empty = ContactDetails {
            whatsapp: Some(String::new()),
            ..ContactDetails::default()
        };
        assert_eq!(empty.whatsapp_url(), None);
        // Any non-empty value is passed through as-is
        let spaced = ContactDetails {
            whatsapp: Some(" https://wa.me/1 ".into()),
            ..ContactDetails::default()
        };
        assert_eq!(spaced.whatsapp_url(), Some(" https://wa.me/1 "));
    }
}
