//! Chat session: an append-only message log driven by the agent route
//!
//! Each submission is numbered. Only the reply to the latest submission is
//! applied; replies that arrive for superseded submissions are dropped, so a
//! slow earlier request can never overwrite a newer answer.

use tracing::debug;

use crate::client::{AgentClient, AgentReply};
use crate::models::{AgentResponse, MarkerData, Message, Role};

const REJECTED_TEXT: &str = "Sorry, I could not process that request.";
const NETWORK_ERROR_TEXT: &str = "There was a network error contacting the agent.";
const DONE_TEXT: &str = "Done.";

/// Handle for a submission awaiting its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
    pub prompt: String,
}

/// Applied reply: the assistant message and the markers to show
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub message: Message,
    pub markers: Option<Vec<MarkerData>>,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<Message>,
    loading: bool,
    next_id: u64,
    next_seq: u64,
    latest_seq: Option<u64>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Session seeded with the introductory exchange
    pub fn new() -> Self {
        let mut session = Self::empty();
        session.push(
            Role::User,
            "Where is a good place to make a 100MW solar-powered data centre in Australia under $500M",
        );
        session.push(
            Role::Ai,
            "Top site: Dubbo, NSW — 123MW solar, ~$254M. Near grid, flat land, high UV year-round.",
        );
        session
    }

    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            loading: false,
            next_id: 1,
            next_seq: 1,
            latest_seq: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Append the user's message and start waiting for the reply
    pub fn begin(&mut self, text: &str) -> Ticket {
        self.push(Role::User, text);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_seq = Some(seq);
        self.loading = true;

        Ticket {
            seq,
            prompt: text.to_string(),
        }
    }

    /// Apply a reply. `None` when the ticket was superseded.
    pub fn resolve(&mut self, ticket: &Ticket, reply: AgentReply) -> Option<Resolution> {
        if self.latest_seq != Some(ticket.seq) {
            debug!("Dropping stale reply for submission {}", ticket.seq);
            return None;
        }

        let (text, markers) = match reply {
            AgentReply::Ok(body) => describe_reply(&body),
            AgentReply::Rejected(_) => (REJECTED_TEXT.to_string(), None),
            AgentReply::NetworkError(_) => (NETWORK_ERROR_TEXT.to_string(), None),
        };

        let message = self.push(Role::Ai, text).clone();
        self.latest_seq = None;
        self.loading = false;

        Some(Resolution { message, markers })
    }

    /// Submit and wait: `begin`, call the agent, `resolve`
    pub async fn submit(&mut self, client: &dyn AgentClient, text: &str) -> Option<Resolution> {
        let ticket = self.begin(text);
        let reply = client.ask(&ticket.prompt).await;
        self.resolve(&ticket, reply)
    }

    fn push(&mut self, role: Role, content: impl Into<String>) -> &Message {
        let id = self.next_id.to_string();
        self.next_id += 1;
        self.messages.push(Message::new(id, role, content));
        &self.messages[self.messages.len() - 1]
    }
}

fn describe_reply(body: &AgentResponse) -> (String, Option<Vec<MarkerData>>) {
    let Some(result) = &body.result else {
        let text = body.message.clone().unwrap_or_else(|| DONE_TEXT.to_string());
        return (text, None);
    };

    match (&result.coordinate, MarkerData::from_result(result)) {
        (Some(coordinate), Some(marker)) => (
            format!(
                "Using Google Maps, I found coordinates for {}: {}.",
                result.location_query,
                coordinate.format_coordinates()
            ),
            Some(vec![marker]),
        ),
        _ => (
            format!("I couldn't find coordinates for {}.", result.location_query),
            None,
        ),
    }
}
