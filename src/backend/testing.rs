//! Mock backend for testing
//!
//! Responses are queued per endpoint and popped in order; every call is
//! recorded so tests can assert on exactly which requests were made.

use super::types::*;
use super::{AssistantBackend, BackendError};
use crate::dialogue::{DialogueNode, DialogueOption, DialogueSource, DialogueStep, Menu, OptionAction};
use crate::widget::Card;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Queue<T> = Mutex<VecDeque<Result<T, BackendError>>>;

/// A request the mock received
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Start,
    Node(NodeId),
    Log(InteractionLog),
    Query(QueryRequest),
    Plans,
    Testimonials,
    Info,
    Contact,
    Config,
}

#[derive(Default)]
pub struct MockBackend {
    starts: Queue<DialogueStep>,
    nodes: Queue<DialogueStep>,
    replies: Queue<QueryReply>,
    plans: Queue<PlanList>,
    testimonials: Queue<TestimonialList>,
    info: Queue<ProgramInfo>,
    contacts: Queue<ContactDetails>,
    configs: Queue<WidgetConfig>,
    fail_logs: AtomicBool,
    /// Replies to unqueued queries with `echo: <message>`
    echo_queries: AtomicBool,
    /// Per-message latency for queries
    query_delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<Call>>,
}

fn pop<T>(queue: &Queue<T>) -> Result<T, BackendError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(BackendError::network("No mock response queued")))
}

#[allow(dead_code)]
impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server step for `node_id` with the given options
    pub fn step(node_id: NodeId, question: &str, options: &[DialogueOption]) -> DialogueStep {
        DialogueStep {
            node: Some(DialogueNode {
                id: node_id,
                question: question.to_string(),
            }),
            card: (!question.is_empty()).then(|| Card::titled(question)),
            menu: if options.is_empty() {
                Menu::None
            } else {
                Menu::Options {
                    node_id,
                    options: options.to_vec(),
                }
            },
        }
    }

    pub fn option(id: OptionId, label: &str, next: Option<NodeId>, action: OptionAction) -> DialogueOption {
        DialogueOption {
            id,
            label: label.to_string(),
            next_node_id: next,
            action,
        }
    }

    pub fn queue_start(&self, response: Result<DialogueStep, BackendError>) {
        self.starts.lock().unwrap().push_back(response);
    }

    pub fn queue_node(&self, response: Result<DialogueStep, BackendError>) {
        self.nodes.lock().unwrap().push_back(response);
    }

    pub fn queue_reply(&self, response: Result<QueryReply, BackendError>) {
        self.replies.lock().unwrap().push_back(response);
    }

    pub fn queue_plans(&self, response: Result<PlanList, BackendError>) {
        self.plans.lock().unwrap().push_back(response);
    }

    pub fn queue_testimonials(&self, response: Result<TestimonialList, BackendError>) {
        self.testimonials.lock().unwrap().push_back(response);
    }

    pub fn queue_info(&self, response: Result<ProgramInfo, BackendError>) {
        self.info.lock().unwrap().push_back(response);
    }

    pub fn queue_contact(&self, response: Result<ContactDetails, BackendError>) {
        self.contacts.lock().unwrap().push_back(response);
    }

    pub fn queue_config(&self, response: Result<WidgetConfig, BackendError>) {
        self.configs.lock().unwrap().push_back(response);
    }

    pub fn fail_logs(&self) {
        self.fail_logs.store(true, Ordering::SeqCst);
    }

    pub fn echo_queries(&self) {
        self.echo_queries.store(true, Ordering::SeqCst);
    }

    pub fn delay_query(&self, message: &str, delay: Duration) {
        self.query_delays
            .lock()
            .unwrap()
            .insert(message.to_string(), delay);
    }

    /// Get recorded calls
    pub fn recorded_calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn log_calls(&self) -> Vec<InteractionLog> {
        self.recorded_calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Log(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    pub fn node_calls(&self) -> Vec<NodeId> {
        self.recorded_calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Node(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DialogueSource for MockBackend {
    async fn start(&self) -> Result<DialogueStep, BackendError> {
        self.record(Call::Start);
        pop(&self.starts)
    }

    async fn node(&self, id: NodeId) -> Result<DialogueStep, BackendError> {
        self.record(Call::Node(id));
        pop(&self.nodes)
    }
}

#[async_trait]
impl AssistantBackend for MockBackend {
    async fn log_interaction(&self, entry: &InteractionLog) -> Result<(), BackendError> {
        self.record(Call::Log(entry.clone()));
        if self.fail_logs.load(Ordering::SeqCst) {
            Err(BackendError::network("log endpoint down"))
        } else {
            Ok(())
        }
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryReply, BackendError> {
        self.record(Call::Query(request.clone()));
        let delay = self.query_delays.lock().unwrap().get(&request.message).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.echo_queries.load(Ordering::SeqCst) {
            return Ok(QueryReply {
                reply: Some(format!("echo: {}", request.message)),
            });
        }
        pop(&self.replies)
    }

    async fn plans(&self) -> Result<PlanList, BackendError> {
        self.record(Call::Plans);
        pop(&self.plans)
    }

    async fn testimonials(&self) -> Result<TestimonialList, BackendError> {
        self.record(Call::Testimonials);
        pop(&self.testimonials)
    }

    async fn info(&self) -> Result<ProgramInfo, BackendError> {
        self.record(Call::Info);
        pop(&self.info)
    }

    async fn contact(&self) -> Result<ContactDetails, BackendError> {
        self.record(Call::Contact);
        pop(&self.contacts)
    }

    async fn config(&self) -> Result<WidgetConfig, BackendError> {
        self.record(Call::Config);
        pop(&self.configs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_pops_in_order_then_fails() {
        let mock = MockBackend::new();
        mock.queue_start(Ok(MockBackend::step(1, "First", &[])));
        mock.queue_start(Err(BackendError::application("second")));

        assert!(mock.start().await.is_ok());
        assert_eq!(mock.start().await.unwrap_err().message, "second");
        assert_eq!(mock.start().await.unwrap_err().message, "No mock response queued");
        assert_eq!(mock.recorded_calls(), vec![Call::Start, Call::Start, Call::Start]);
    }

    #[tokio::test]
    async fn test_mock_echo_queries() {
        let mock = MockBackend::new();
        mock.echo_queries();
        let reply = mock
            .query(&QueryRequest {
                message: "ping".into(),
                user_id: None,
            })
            .await
            .unwrap();
        assert_eq!(reply.text(), Some("echo: ping"));
    }
}
