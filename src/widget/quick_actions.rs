//! Quick-action menu handlers
//!
//! Each action fetches one endpoint and replaces the log with the result,
//! or with that action's fixed fallback card when the fetch fails.

use super::{push, Card, ChatEntry, DialogueDriver, WidgetEvent};
use crate::backend::AssistantBackend;
use crate::dialogue::QuickAction;
use std::iter;

impl<B> DialogueDriver<B>
where
    B: AssistantBackend + 'static,
{
    pub async fn run_quick_action(&self, action: QuickAction) {
        tracing::debug!(action = action.key(), "Running quick action");
        match action {
            QuickAction::ViewPlans => self.show_plans().await,
            QuickAction::Stories => self.show_stories().await,
            QuickAction::HowItWorks => self.show_info().await,
            QuickAction::Contact => self.show_contact().await,
            QuickAction::WhatsApp => self.open_whatsapp().await,
        }
    }

    async fn show_plans(&self) {
        let cards = match self.backend.plans().await {
            Ok(list) if !list.plans.is_empty() => iter::once(Card::plans_header())
                .chain(list.plans.iter().map(Card::plan))
                .collect(),
            Ok(_) => vec![Card::no_plans()],
            Err(e) => {
                tracing::warn!(error = %e, "Could not load plans");
                vec![Card::plans_failed()]
            }
        };
        self.replace_with_cards(cards);
    }

    async fn show_stories(&self) {
        let cards = match self.backend.testimonials().await {
            Ok(list) => iter::once(Card::stories_header())
                .chain(list.testimonials.iter().map(Card::story))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load testimonials");
                vec![Card::stories_failed()]
            }
        };
        self.replace_with_cards(cards);
    }

    async fn show_info(&self) {
        let card = match self.backend.info().await {
            Ok(info) => Card::how_it_works(info.description.as_deref().unwrap_or_default()),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load program info");
                Card::how_it_works_fallback()
            }
        };
        self.replace_with_cards(vec![card]);
    }

    async fn show_contact(&self) {
        let card = match self.backend.contact().await {
            Ok(contact) => Card::admin_contact(&contact),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load contact");
                Card::contact_failed()
            }
        };
        self.replace_with_cards(vec![card]);
    }

    /// Opens the messaging app when a URL is configured; the log is left
    /// untouched in that case.
    async fn open_whatsapp(&self) {
        match self.backend.contact().await {
            Ok(contact) => match contact.whatsapp_url() {
                Some(url) => self.emit(WidgetEvent::OpenExternal {
                    url: url.to_string(),
                }),
                None => self.replace_with_cards(vec![Card::whatsapp_not_configured()]),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Could not load contact");
                self.replace_with_cards(vec![Card::whatsapp_failed()]);
            }
        }
    }

    fn replace_with_cards(&self, cards: Vec<Card>) {
        self.with_state(|state, events| {
            state.log.clear();
            let _ = events.send(WidgetEvent::LogCleared);
            for card in cards {
                push(state, events, ChatEntry::card(card));
            }
        });
    }
}
