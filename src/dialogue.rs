//! Dialogue graph model
//!
//! A dialogue is a graph of nodes, each with a question and a set of
//! options. Steps through the graph come from a [`DialogueSource`]: the
//! remote backend, or a locally scripted tree used when the backend is
//! unavailable. Rendering only ever sees [`DialogueStep`], so it cannot
//! tell which source produced a step.

mod fallback;
mod scripted;

pub use fallback::WithFallback;
pub use scripted::ScriptedDialogue;

use crate::backend::{BackendError, NodeEnvelope, NodeId, OptionId, OptionRecord};
use crate::widget::Card;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Anything that can produce dialogue steps
#[async_trait]
pub trait DialogueSource: Send + Sync {
    /// The entry point of the conversation
    async fn start(&self) -> Result<DialogueStep, BackendError>;

    /// The node an option leads to
    async fn node(&self, id: NodeId) -> Result<DialogueStep, BackendError>;
}

#[async_trait]
impl<T: DialogueSource + ?Sized> DialogueSource for Arc<T> {
    async fn start(&self) -> Result<DialogueStep, BackendError> {
        (**self).start().await
    }

    async fn node(&self, id: NodeId) -> Result<DialogueStep, BackendError> {
        (**self).node(id).await
    }
}

/// One question in the conversation graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueNode {
    pub id: NodeId,
    pub question: String,
}

/// A selectable answer attached to a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueOption {
    pub id: OptionId,
    pub label: String,
    pub next_node_id: Option<NodeId>,
    pub action: OptionAction,
}

impl From<OptionRecord> for DialogueOption {
    fn from(record: OptionRecord) -> Self {
        let action = OptionAction::parse(
            record.action_type.as_deref(),
            record.action_payload.as_deref(),
        );
        Self {
            id: record.id,
            label: record.option_text.unwrap_or_default(),
            next_node_id: record.next_node_id,
            action,
        }
    }
}

/// Side effect declared by an option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionAction {
    /// Open the URL in a new browsing context
    Link(String),
    /// Navigate the current context to the URL
    Goto(String),
    /// Show the static contact card
    Contact,
    None,
}

impl OptionAction {
    /// Link and goto need a payload; anything unrecognized does nothing.
    pub fn parse(action_type: Option<&str>, payload: Option<&str>) -> Self {
        let payload = payload.map(str::trim).filter(|p| !p.is_empty());
        match (action_type, payload) {
            (Some("link"), Some(url)) => Self::Link(url.to_string()),
            (Some("goto"), Some(url)) => Self::Goto(url.to_string()),
            (Some("contact"), _) => Self::Contact,
            _ => Self::None,
        }
    }

    /// Wire name, as carried in the `data-action-type` attribute
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            Self::Link(_) => Some("link"),
            Self::Goto(_) => Some("goto"),
            Self::Contact => Some("contact"),
            Self::None => None,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Link(url) | Self::Goto(url) => Some(url),
            Self::Contact | Self::None => None,
        }
    }
}

/// Fixed menu entries that bypass the dialogue graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickAction {
    ViewPlans,
    Stories,
    HowItWorks,
    Contact,
    WhatsApp,
}

impl QuickAction {
    pub const ALL: [QuickAction; 5] = [
        QuickAction::ViewPlans,
        QuickAction::Stories,
        QuickAction::HowItWorks,
        QuickAction::Contact,
        QuickAction::WhatsApp,
    ];

    /// Identifier carried in the `data-action` attribute
    pub fn key(self) -> &'static str {
        match self {
            Self::ViewPlans => "view-plans",
            Self::Stories => "stories",
            Self::HowItWorks => "how",
            Self::Contact => "contact",
            Self::WhatsApp => "whatsapp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ViewPlans => "📊 View Investment Plans",
            Self::Stories => "⭐ Success Stories",
            Self::HowItWorks => "ℹ️ How It Works",
            Self::Contact => "📞 Contact Admin",
            Self::WhatsApp => "💬 WhatsApp Support",
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for QuickAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.key() == s)
            .ok_or_else(|| format!("Unknown quick action: {s}"))
    }
}

/// Controls rendered under a step's card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Menu {
    Options {
        node_id: NodeId,
        options: Vec<DialogueOption>,
    },
    QuickActions(Vec<QuickAction>),
    None,
}

/// Everything one dialogue transition renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueStep {
    /// Source node; `None` for locally scripted steps
    pub node: Option<DialogueNode>,
    /// Question card; absent when the node has no question text
    pub card: Option<Card>,
    pub menu: Menu,
}

impl DialogueStep {
    /// Interpret a start/node response.
    ///
    /// An explicit error field, or a response without a node, is an
    /// application error.
    pub fn from_envelope(envelope: NodeEnvelope) -> Result<Self, BackendError> {
        if let Some(error) = envelope.error {
            return Err(BackendError::application(error));
        }
        let record = envelope
            .node
            .ok_or_else(|| BackendError::application("Response carried no dialogue node"))?;

        let node = DialogueNode {
            id: record.id,
            question: record.question.unwrap_or_default(),
        };
        let options: Vec<DialogueOption> = envelope
            .options
            .unwrap_or_default()
            .into_iter()
            .map(DialogueOption::from)
            .collect();
        let menu = if options.is_empty() {
            Menu::None
        } else {
            Menu::Options {
                node_id: node.id,
                options,
            }
        };

        Ok(Self {
            card: (!node.question.is_empty()).then(|| Card::titled(&node.question)),
            node: Some(node),
            menu,
        })
    }
}
