//! Events delivered to the front end drawing the widget

use super::log::ChatEntry;
use uuid::Uuid;

/// Events broadcast by the driver
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    EntryAppended { entry: ChatEntry },
    EntryRemoved { id: Uuid },
    LogCleared,
    /// Loading indicator shown while the conversation starts
    Loading { active: bool },
    PanelToggled { open: bool },
    VisibilityChanged { visible: bool },
    FocusLog,
    /// Open the URL in a new browsing context
    OpenExternal { url: String },
    /// Replace the current page
    Navigate { url: String },
}
