//! Line-oriented terminal host for the widget driver
//!
//! Stands in for the page: each stdin line is either a slash command
//! (panel toggles, option picks, quick actions) or free text for the
//! assistant. Rendering events are printed as plain text as they arrive.

use crate::backend::AssistantBackend;
use crate::dialogue::QuickAction;
use crate::widget::{DialogueDriver, Interaction, WidgetEvent};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};

const HELP: &str = "\
Commands:
  /open            open the assistant
  /close           close the assistant
  /<n>             pick option n of the latest menu
  /view-plans /stories /how /contact /whatsapp
  /html            print the log as markup
  /status          show widget state
  /quit            exit
Anything else is sent to the assistant.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    /// Zero-based position in the latest option menu
    Select(usize),
    Quick(QuickAction),
    Html,
    Status,
    Help,
    Quit,
    Say(String),
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(name) = line.trim().strip_prefix('/') else {
            return Command::Say(line.to_string());
        };
        match name {
            "open" => Command::Open,
            "close" => Command::Close,
            "html" => Command::Html,
            "status" => Command::Status,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => {
                if let Ok(n) = name.parse::<usize>() {
                    return match n.checked_sub(1) {
                        Some(index) => Command::Select(index),
                        None => Command::Unknown(name.to_string()),
                    };
                }
                name.parse::<QuickAction>()
                    .map_or_else(|_| Command::Unknown(name.to_string()), Command::Quick)
            }
        }
    }
}

/// Run the host until stdin closes or `/quit`
pub async fn run<B>(driver: Arc<DialogueDriver<B>>) -> std::io::Result<()>
where
    B: AssistantBackend + 'static,
{
    let printer = tokio::spawn(print_events(driver.subscribe()));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        driver.notice_interaction(Interaction::KeyPress);
        match Command::parse(&line) {
            Command::Open => {
                if driver.is_visible() {
                    driver.open().await;
                } else {
                    println!("[assistant is disabled]");
                }
            }
            Command::Close => driver.close(),
            Command::Select(index) => {
                if !driver.select_latest(index).await {
                    println!("[no option {}]", index + 1);
                }
            }
            Command::Quick(action) => driver.run_quick_action(action).await,
            Command::Html => println!("{}", driver.render_html()),
            Command::Status => println!("{}", status_line(&driver)),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Say(text) => driver.send_free_text(&text).await,
            Command::Unknown(name) => println!("[unknown command /{name}, try /help]"),
        }
    }

    printer.abort();
    Ok(())
}

fn status_line<B>(driver: &DialogueDriver<B>) -> String
where
    B: AssistantBackend + 'static,
{
    let config = driver.config();
    let node = driver
        .current_node()
        .map_or_else(|| "none".to_string(), |id| id.to_string());
    format!(
        "[{} | visible: {} | open: {} | loading: {} | node: {} | entries: {} | auto-prompt armed: {}]",
        config.assistant_name,
        driver.is_visible(),
        driver.is_panel_open(),
        driver.is_loading(),
        node,
        driver.entries().len(),
        driver.is_auto_prompt_armed(),
    )
}

async fn print_events(mut events: broadcast::Receiver<WidgetEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(text) = describe(&event) {
                    println!("{text}");
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Terminal fell behind widget events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Plain-text rendering of an event, `None` for events with no visible effect
fn describe(event: &WidgetEvent) -> Option<String> {
    match event {
        WidgetEvent::EntryAppended { entry } => Some(entry.to_plain_text()),
        WidgetEvent::LogCleared => Some("────────".to_string()),
        WidgetEvent::Loading { active: true } => Some("[loading]".to_string()),
        WidgetEvent::PanelToggled { open } => Some(
            if *open {
                "[assistant opened]"
            } else {
                "[assistant closed]"
            }
            .to_string(),
        ),
        WidgetEvent::VisibilityChanged { visible: false } => {
            Some("[assistant is disabled]".to_string())
        }
        WidgetEvent::OpenExternal { url } => Some(format!("[open in new tab: {url}]")),
        WidgetEvent::Navigate { url } => Some(format!("[navigate to {url}]")),
        WidgetEvent::EntryRemoved { .. }
        | WidgetEvent::Loading { active: false }
        | WidgetEvent::VisibilityChanged { visible: true }
        | WidgetEvent::FocusLog => None,
    }
}
