//! Assistant widget driver
//!
//! Owns the conversation shown in the assistant panel and turns user
//! gestures (opening the panel, clicking options, typing, quick actions)
//! into backend calls and rendered entries. Every remote failure degrades
//! to a locally rendered card; nothing is propagated to the caller.
//!
//! State lives behind a mutex that is never held across an `.await`, so
//! each mutation is one short critical section. Overlapping operations
//! resolve independently, each touching only the entries it created.

mod auto_prompt;
mod card;
mod event;
mod log;
mod quick_actions;

#[cfg(test)]
mod proptests;

pub use auto_prompt::{AutoPrompt, Interaction, DEFAULT_AUTO_PROMPT_DELAY};
pub use card::{escape_html, Card};
pub use event::WidgetEvent;
pub use log::{ChatEntry, EntryContent, MessageLog, Role};

use crate::backend::{AssistantBackend, InteractionLog, NodeId, QueryRequest, UserId, WidgetConfig};
use crate::dialogue::{
    DialogueOption, DialogueSource, DialogueStep, Menu, OptionAction, ScriptedDialogue,
    WithFallback,
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

const NO_REPLY: &str = "No reply received.";
const QUERY_FAILED: &str = "Failed to contact assistant.";

/// Mutable widget state
#[derive(Debug, Default)]
pub struct ConversationState {
    pub log: MessageLog,
    /// Node whose options were rendered last; `None` before the first fetch
    pub current_node: Option<NodeId>,
    pub panel_open: bool,
    pub loading: bool,
    pub visible: bool,
    pub config: WidgetConfig,
}

/// Driver for one assistant widget
pub struct DialogueDriver<B>
where
    B: AssistantBackend + 'static,
{
    backend: Arc<B>,
    dialogue: WithFallback<Arc<B>, ScriptedDialogue>,
    user_id: Option<UserId>,
    state: Mutex<ConversationState>,
    auto_prompt: AutoPrompt,
    events: broadcast::Sender<WidgetEvent>,
}

impl<B> DialogueDriver<B>
where
    B: AssistantBackend + 'static,
{
    pub fn new(backend: Arc<B>, user_id: Option<UserId>, auto_prompt_delay: Duration) -> Self {
        let (events, _) = broadcast::channel(128);
        Self {
            dialogue: WithFallback::new(Arc::clone(&backend), ScriptedDialogue),
            backend,
            user_id,
            state: Mutex::new(ConversationState::default()),
            auto_prompt: AutoPrompt::new(auto_prompt_delay),
            events,
        }
    }

    /// Subscribe to rendering events
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    // ========================================================================
    // Panel
    // ========================================================================

    /// Open the panel, start a fresh conversation and focus the log
    pub async fn open(&self) {
        self.set_panel_open(true);
        self.emit(WidgetEvent::FocusLog);
        self.start_conversation().await;
    }

    /// Hide the panel. The log is kept.
    pub fn close(&self) {
        self.set_panel_open(false);
    }

    fn set_panel_open(&self, open: bool) {
        self.with_state(|state, events| {
            state.panel_open = open;
            let _ = events.send(WidgetEvent::PanelToggled { open });
        });
    }

    // ========================================================================
    // Dialogue
    // ========================================================================

    /// Clear the log and render the dialogue's entry step, or the scripted
    /// greeting if the backend cannot provide one.
    pub async fn start_conversation(&self) {
        self.with_state(|state, events| {
            state.log.clear();
            state.current_node = None;
            state.loading = true;
            let _ = events.send(WidgetEvent::LogCleared);
            let _ = events.send(WidgetEvent::Loading { active: true });
        });

        let step = self
            .dialogue
            .start()
            .await
            .unwrap_or_else(|_| ScriptedDialogue::greeting());

        self.with_state(|state, events| {
            state.loading = false;
            let _ = events.send(WidgetEvent::Loading { active: false });
        });
        self.render_step(step);
    }

    /// Replace the log with the scripted greeting and quick-action menu
    pub fn show_greeting(&self) {
        self.clear_log();
        self.render_step(ScriptedDialogue::greeting());
    }

    /// Handle a click on `option`, which was rendered for `node_id`
    pub async fn select_option(&self, node_id: NodeId, option: &DialogueOption) {
        self.append(ChatEntry::user(&option.label));
        self.log_interaction(node_id, option);

        match &option.action {
            OptionAction::Link(url) => self.emit(WidgetEvent::OpenExternal { url: url.clone() }),
            OptionAction::Goto(url) => self.emit(WidgetEvent::Navigate { url: url.clone() }),
            OptionAction::Contact => {
                self.append(ChatEntry::card(Card::contact_prompt()));
            }
            OptionAction::None => {}
        }

        if let Some(next) = option.next_node_id {
            let typing = self.append(ChatEntry::typing());
            let step = self
                .dialogue
                .node(next)
                .await
                .unwrap_or_else(|_| ScriptedDialogue::node_unavailable());
            self.remove(typing);
            self.render_step(step);
        }
    }

    /// Select by position (zero-based) in the most recent option menu.
    /// Returns `false` when there is no such option.
    pub async fn select_latest(&self, index: usize) -> bool {
        let picked = self.with_state(|state, _| {
            state
                .log
                .latest_options()
                .and_then(|(node_id, options)| options.get(index).map(|o| (node_id, o.clone())))
        });
        match picked {
            Some((node_id, option)) => {
                self.select_option(node_id, &option).await;
                true
            }
            None => false,
        }
    }

    /// Send free text to the assistant. Blank input is ignored.
    pub async fn send_free_text(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        self.append(ChatEntry::user(text));
        let typing = self.append(ChatEntry::typing());

        let request = QueryRequest {
            message: text.to_string(),
            user_id: self.user_id,
        };
        let reply = match self.backend.query(&request).await {
            Ok(reply) => reply.text().unwrap_or(NO_REPLY).to_string(),
            Err(e) => {
                tracing::warn!(kind = e.kind.as_str(), error = %e, "Assistant query failed");
                QUERY_FAILED.to_string()
            }
        };

        self.remove(typing);
        self.append(ChatEntry::bot_text(&reply));
    }

    fn log_interaction(&self, node_id: NodeId, option: &DialogueOption) {
        let entry = InteractionLog {
            node_id: Some(node_id),
            option_id: option.id,
            user_id: self.user_id,
            metadata: None,
        };
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(e) = backend.log_interaction(&entry).await {
                tracing::debug!(
                    node_id = entry.node_id,
                    option_id = entry.option_id,
                    error = %e,
                    "Interaction log dropped"
                );
            }
        });
    }

    fn render_step(&self, step: DialogueStep) {
        let DialogueStep { node, card, menu } = step;
        self.with_state(|state, events| {
            if let Some(node) = &node {
                state.current_node = Some(node.id);
            }
            if let Some(card) = card {
                push(state, events, ChatEntry::card(card));
            }
            let content = match menu {
                Menu::Options { node_id, options } => EntryContent::Options { node_id, options },
                Menu::QuickActions(actions) => EntryContent::QuickActions(actions),
                Menu::None => return,
            };
            push(state, events, ChatEntry::new(Role::Bot, content));
        });
    }

    // ========================================================================
    // Auto-prompt
    // ========================================================================

    /// (Re)start the inactivity timer. When it fires with the widget shown
    /// and the panel closed, the panel opens on the scripted greeting.
    pub fn schedule_auto_prompt(self: &Arc<Self>) {
        let driver = Arc::downgrade(self);
        self.auto_prompt.arm(move || {
            if let Some(driver) = driver.upgrade() {
                driver.auto_open();
            }
        });
    }

    /// Any qualifying interaction postpones the auto-prompt
    pub fn notice_interaction(self: &Arc<Self>, interaction: Interaction) {
        tracing::trace!(?interaction, "User interaction");
        self.schedule_auto_prompt();
    }

    fn auto_open(&self) {
        if self.is_panel_open() || !self.is_visible() {
            return;
        }
        tracing::info!("Opening assistant after inactivity");
        self.set_panel_open(true);
        self.show_greeting();
    }

    // ========================================================================
    // Configuration gate
    // ========================================================================

    /// Fetch the widget configuration; hide the widget unless it is
    /// enabled. Failures hide it too.
    pub async fn refresh_visibility(&self) {
        let config = match self.backend.config().await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Widget configuration unavailable, hiding widget");
                WidgetConfig::default()
            }
        };
        self.with_state(|state, events| {
            state.visible = config.enabled;
            state.config = config;
            let _ = events.send(WidgetEvent::VisibilityChanged {
                visible: state.visible,
            });
        });
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn entries(&self) -> Vec<ChatEntry> {
        self.with_state(|state, _| state.log.entries().to_vec())
    }

    pub fn render_html(&self) -> String {
        self.with_state(|state, _| state.log.render_html())
    }

    pub fn current_node(&self) -> Option<NodeId> {
        self.with_state(|state, _| state.current_node)
    }

    pub fn is_panel_open(&self) -> bool {
        self.with_state(|state, _| state.panel_open)
    }

    pub fn is_loading(&self) -> bool {
        self.with_state(|state, _| state.loading)
    }

    pub fn is_visible(&self) -> bool {
        self.with_state(|state, _| state.visible)
    }

    pub fn config(&self) -> WidgetConfig {
        self.with_state(|state, _| state.config.clone())
    }

    pub fn is_auto_prompt_armed(&self) -> bool {
        self.auto_prompt.is_armed()
    }

    // ========================================================================
    // Log helpers
    // ========================================================================

    fn with_state<R>(
        &self,
        f: impl FnOnce(&mut ConversationState, &broadcast::Sender<WidgetEvent>) -> R,
    ) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state, &self.events)
    }

    fn emit(&self, event: WidgetEvent) {
        let _ = self.events.send(event);
    }

    fn append(&self, entry: ChatEntry) -> Uuid {
        self.with_state(|state, events| push(state, events, entry))
    }

    fn remove(&self, id: Uuid) {
        self.with_state(|state, events| {
            if state.log.remove(id) {
                let _ = events.send(WidgetEvent::EntryRemoved { id });
            }
        });
    }

    fn clear_log(&self) {
        self.with_state(|state, events| {
            state.log.clear();
            let _ = events.send(WidgetEvent::LogCleared);
        });
    }
}

fn push(
    state: &mut ConversationState,
    events: &broadcast::Sender<WidgetEvent>,
    entry: ChatEntry,
) -> Uuid {
    let id = entry.id;
    state.log.push(entry.clone());
    let _ = events.send(WidgetEvent::EntryAppended { entry });
    id
}
