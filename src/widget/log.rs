//! Conversation message log

use super::card::{escape_html, Card};
use crate::backend::NodeId;
use crate::dialogue::{DialogueOption, QuickAction};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    fn css_class(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    Text(String),
    Card(Card),
    /// One control per option of `node_id`
    Options {
        node_id: NodeId,
        options: Vec<DialogueOption>,
    },
    QuickActions(Vec<QuickAction>),
    /// Placeholder while a reply is outstanding
    Typing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub id: Uuid,
    pub role: Role,
    pub content: EntryContent,
    pub created_at: DateTime<Utc>,
}

impl ChatEntry {
    pub fn new(role: Role, content: EntryContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            created_at: Utc::now(),
        }
    }

    pub fn user(text: &str) -> Self {
        Self::new(Role::User, EntryContent::Text(text.to_string()))
    }

    pub fn bot_text(text: &str) -> Self {
        Self::new(Role::Bot, EntryContent::Text(text.to_string()))
    }

    pub fn card(card: Card) -> Self {
        Self::new(Role::Bot, EntryContent::Card(card))
    }

    pub fn typing() -> Self {
        Self::new(Role::Bot, EntryContent::Typing)
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.content, EntryContent::Typing)
    }

    pub fn to_html(&self) -> String {
        let role = self.role.css_class();
        match &self.content {
            EntryContent::Text(text) => {
                format!(r#"<div class="ai-msg {role}">{}</div>"#, escape_html(text))
            }
            EntryContent::Card(card) => {
                format!(r#"<div class="ai-msg {role}">{}</div>"#, card.to_html())
            }
            EntryContent::Options { options, .. } => {
                let mut buttons = String::new();
                for option in options {
                    let _ = write!(buttons, r#"<button class="qa" data-option-id="{}""#, option.id);
                    if let Some(next) = option.next_node_id {
                        let _ = write!(buttons, r#" data-next="{next}""#);
                    }
                    if let Some(kind) = option.action.kind() {
                        let _ = write!(buttons, r#" data-action-type="{kind}""#);
                    }
                    if let Some(payload) = option.action.payload() {
                        let _ = write!(buttons, r#" data-action-payload="{}""#, escape_html(payload));
                    }
                    let _ = write!(buttons, ">{}</button>", escape_html(&option.label));
                }
                button_card(role, &buttons)
            }
            EntryContent::QuickActions(actions) => {
                let mut buttons = String::new();
                for action in actions {
                    let _ = write!(
                        buttons,
                        r#"<button class="qa" data-action="{}">{}</button>"#,
                        action.key(),
                        escape_html(action.label())
                    );
                }
                button_card(role, &buttons)
            }
            EntryContent::Typing => format!(
                r#"<div class="ai-msg {role} typing"><span class="typing"><span class="typing-dot"></span><span class="typing-dot"></span><span class="typing-dot"></span></span></div>"#
            ),
        }
    }

    pub fn to_plain_text(&self) -> String {
        match &self.content {
            EntryContent::Text(text) => match self.role {
                Role::User => format!("> {text}"),
                Role::Bot => text.clone(),
            },
            EntryContent::Card(card) => card.to_plain_text(),
            EntryContent::Options { options, .. } => options
                .iter()
                .enumerate()
                .map(|(i, o)| format!("  {}. {}", i + 1, o.label))
                .collect::<Vec<_>>()
                .join("\n"),
            EntryContent::QuickActions(actions) => actions
                .iter()
                .map(|a| format!("  /{} {}", a.key(), a.label()))
                .collect::<Vec<_>>()
                .join("\n"),
            EntryContent::Typing => "…".to_string(),
        }
    }
}

fn button_card(role: &str, buttons: &str) -> String {
    format!(
        r#"<div class="ai-msg {role}"><div class="ai-card"><div style="display:flex;flex-wrap:wrap;gap:8px">{buttons}</div></div></div>"#
    )
}

/// Ordered, append-mostly list of rendered entries
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Vec<ChatEntry>,
}

impl MessageLog {
    pub fn push(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }

    /// Remove an entry by id. Returns `false` if it is already gone, e.g.
    /// because the log was cleared while a request was outstanding.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Most recent option menu, if any
    pub fn latest_options(&self) -> Option<(NodeId, &[DialogueOption])> {
        self.entries.iter().rev().find_map(|e| match &e.content {
            EntryContent::Options { node_id, options } => Some((*node_id, options.as_slice())),
            _ => None,
        })
    }

    pub fn render_html(&self) -> String {
        self.entries.iter().map(ChatEntry::to_html).collect()
    }
}
