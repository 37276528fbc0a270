//! Locally scripted dialogue used when the backend cannot be reached

use super::{DialogueSource, DialogueStep, Menu, QuickAction};
use crate::backend::{BackendError, NodeId};
use crate::widget::Card;
use async_trait::async_trait;

/// Static greeting with the quick-action menu, plus a generic failure step
/// for any node.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedDialogue;

impl ScriptedDialogue {
    pub fn greeting() -> DialogueStep {
        DialogueStep {
            node: None,
            card: Some(Card::greeting()),
            menu: Menu::QuickActions(QuickAction::ALL.to_vec()),
        }
    }

    pub fn node_unavailable() -> DialogueStep {
        DialogueStep {
            node: None,
            card: Some(Card::node_unavailable()),
            menu: Menu::None,
        }
    }
}

#[async_trait]
impl DialogueSource for ScriptedDialogue {
    async fn start(&self) -> Result<DialogueStep, BackendError> {
        Ok(Self::greeting())
    }

    async fn node(&self, _id: NodeId) -> Result<DialogueStep, BackendError> {
        Ok(Self::node_unavailable())
    }
}
