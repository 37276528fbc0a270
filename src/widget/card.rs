//! Message cards and markup escaping

use crate::backend::{ContactDetails, PlanSummary, Testimonial};
use std::fmt::Write as _;

/// Escape text for insertion into markup, both as element content and
/// inside double- or single-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLink {
    pub href: String,
    pub label: String,
}

/// A bot message with a heading, body paragraphs and an optional link.
/// All fields hold raw text; escaping happens at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub body: Vec<String>,
    pub link: Option<CardLink>,
}

impl Card {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            body: Vec::new(),
            link: None,
        }
    }

    pub fn new(title: &str, body: &str) -> Self {
        Self::titled(title).line(body)
    }

    #[must_use]
    pub fn line(mut self, text: &str) -> Self {
        self.body.push(text.to_string());
        self
    }

    #[must_use]
    pub fn with_link(mut self, href: &str, label: &str) -> Self {
        self.link = Some(CardLink {
            href: href.to_string(),
            label: label.to_string(),
        });
        self
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<div class="ai-card">"#);
        let _ = write!(html, "<h4>{}</h4>", escape_html(&self.title));
        for line in &self.body {
            let _ = write!(html, "<p>{}</p>", escape_html(line));
        }
        if let Some(link) = &self.link {
            let _ = write!(
                html,
                r#"<p><a href="{}">{}</a></p>"#,
                escape_html(&link.href),
                escape_html(&link.label)
            );
        }
        html.push_str("</div>");
        html
    }

    pub fn to_plain_text(&self) -> String {
        let mut text = format!("[{}]", self.title);
        for line in &self.body {
            text.push('\n');
            text.push_str(line);
        }
        if let Some(link) = &self.link {
            let _ = write!(text, "\n{} -> {}", link.label, link.href);
        }
        text
    }

    // ------------------------------------------------------------------
    // Fixed cards
    // ------------------------------------------------------------------

    pub fn greeting() -> Self {
        Self::new(
            "Welcome 👋",
            "I'm the assistant for InvestPro. I can help you understand the program, show plans, share success stories, and guide you step-by-step.",
        )
    }

    /// Shown when an option declares the contact action
    pub fn contact_prompt() -> Self {
        Self::new("Contact", "Please reach out to the admin via the support page.")
    }

    pub fn node_unavailable() -> Self {
        Self::new("Oops", "Failed to load response.")
    }

    pub fn plans_header() -> Self {
        Self::titled("Available Plans")
    }

    pub fn plan(plan: &PlanSummary) -> Self {
        Self::new(
            plan.plan_name.as_deref().unwrap_or_default(),
            &format!(
                "Amount: ${} • Benefit: {}",
                plan.amount_text(),
                plan.benefit_text()
            ),
        )
        .with_link(&format!("/plans/{}", plan.id), "View plan")
    }

    pub fn no_plans() -> Self {
        Self::new("No Plans", "No plans are currently available.")
    }

    pub fn plans_failed() -> Self {
        Self::new("Error", "Could not load plans.")
    }

    pub fn stories_header() -> Self {
        Self::titled("Success Stories")
    }

    pub fn story(testimonial: &Testimonial) -> Self {
        Self::new(
            testimonial.title.as_deref().unwrap_or_default(),
            testimonial.body.as_deref().unwrap_or_default(),
        )
    }

    pub fn stories_failed() -> Self {
        Self::new("Error", "Could not load testimonials.")
    }

    pub fn how_it_works(description: &str) -> Self {
        Self::new("How It Works", description)
    }

    pub fn how_it_works_fallback() -> Self {
        Self::how_it_works("Choose a plan, activate your account, and monitor your dashboard.")
    }

    pub fn admin_contact(contact: &ContactDetails) -> Self {
        let name = contact
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Admin");
        Self::new("Admin Contact", &format!("Name: {name}")).line(&format!(
            "Phone: {}",
            contact.phone.as_deref().unwrap_or_default()
        ))
    }

    pub fn contact_failed() -> Self {
        Self::new("Contact", "Please contact the admin via the contact page.")
    }

    pub fn whatsapp_not_configured() -> Self {
        Self::new("WhatsApp", "WhatsApp contact is not configured.")
    }

    pub fn whatsapp_failed() -> Self {
        Self::new("WhatsApp", "Could not fetch contact.")
    }
}
