//! Event bus: bounded in-memory event log plus scoped fan-out to
//! subscribers.
//!
//! Every mutating store command publishes exactly one event here, inside
//! the store's command lock, so subscribers never observe an event before
//! the mutation it describes is visible. The log keeps the last 50 events
//! for replay/debugging; it is not durable.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// How many events the replay buffer retains; older events are dropped.
pub const EVENT_LOG_CAP: usize = 50;

/// Closed set of event payloads, one variant per mutating command.
/// Serialized with a `type` tag so wire consumers can switch on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    GroupCreated { group_id: String, name: String },
    GroupUpdated { group_id: String },
    GroupDeleted { group_id: String },
    UserJoined {
        user_id: String,
        group_id: Option<String>,
        presentation_id: Option<String>,
    },
    UserLeft {
        user_id: String,
        group_id: Option<String>,
        presentation_id: Option<String>,
    },
    PresentationCreated { presentation_id: String, title: String },
    PresentationStarted { presentation_id: String, title: String },
    PresentationPaused { presentation_id: String },
    PresentationResumed { presentation_id: String },
    PresentationEnded { presentation_id: String },
    SlideChanged { presentation_id: String, slide: u32 },
    PollCreated {
        presentation_id: String,
        poll_id: String,
        question: String,
    },
    PollActivated { presentation_id: String, poll_id: String },
    PollDeactivated { presentation_id: String, poll_id: String },
    PollResponse {
        presentation_id: String,
        poll_id: String,
        response_id: String,
        user_id: String,
    },
    PerformanceUpdated { user_id: String, group_id: String },
    TemplateCreated { template_id: String },
    TemplateUsed { template_id: String, group_id: String },
}

/// A domain change notification. Scope fields are denormalized from the
/// payload so subscribers can filter without matching on every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealTimeEvent {
    pub payload: EventPayload,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    pub presentation_id: Option<String>,
}

impl RealTimeEvent {
    /// Build an event, deriving the scope fields from the payload.
    pub fn now(payload: EventPayload) -> Self {
        let (user_id, group_id, presentation_id) = scope_of(&payload);
        RealTimeEvent {
            payload,
            timestamp: Utc::now(),
            user_id,
            group_id,
            presentation_id,
        }
    }
}

fn scope_of(payload: &EventPayload) -> (Option<String>, Option<String>, Option<String>) {
    use EventPayload::*;
    match payload {
        GroupCreated { group_id, .. }
        | GroupUpdated { group_id }
        | GroupDeleted { group_id } => (None, Some(group_id.clone()), None),
        UserJoined { user_id, group_id, presentation_id }
        | UserLeft { user_id, group_id, presentation_id } => (
            Some(user_id.clone()),
            group_id.clone(),
            presentation_id.clone(),
        ),
        PresentationCreated { presentation_id, .. }
        | PresentationStarted { presentation_id, .. }
        | PresentationPaused { presentation_id }
        | PresentationResumed { presentation_id }
        | PresentationEnded { presentation_id }
        | SlideChanged { presentation_id, .. }
        | PollCreated { presentation_id, .. }
        | PollActivated { presentation_id, .. }
        | PollDeactivated { presentation_id, .. } => {
            (None, None, Some(presentation_id.clone()))
        }
        PollResponse { presentation_id, user_id, .. } => (
            Some(user_id.clone()),
            None,
            Some(presentation_id.clone()),
        ),
        PerformanceUpdated { user_id, group_id } => {
            (Some(user_id.clone()), Some(group_id.clone()), None)
        }
        TemplateCreated { .. } => (None, None, None),
        TemplateUsed { group_id, .. } => (None, Some(group_id.clone()), None),
    }
}

/// Subscription scope. Empty filter = global (all events). A set field must
/// match the event's corresponding scope field exactly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub presentation_id: Option<String>,
}

impl EventFilter {
    /// Empty ids arrive from query strings like `?group_id=`; treat them as
    /// unset rather than a scope that matches nothing.
    pub fn normalize(mut self) -> Self {
        if self.group_id.as_deref() == Some("") {
            self.group_id = None;
        }
        if self.presentation_id.as_deref() == Some("") {
            self.presentation_id = None;
        }
        self
    }

    fn matches(&self, event: &RealTimeEvent) -> bool {
        if let Some(gid) = &self.group_id {
            if event.group_id.as_deref() != Some(gid.as_str()) {
                return false;
            }
        }
        if let Some(pid) = &self.presentation_id {
            if event.presentation_id.as_deref() != Some(pid.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Opaque subscription handle, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

struct Subscriber {
    filter: EventFilter,
    tx: UnboundedSender<RealTimeEvent>,
}

struct BusState {
    log: VecDeque<RealTimeEvent>,
    subscribers: HashMap<u64, Subscriber>,
    next_handle: u64,
}

/// Fan-out notification mechanism for domain events.
pub struct EventBus {
    state: RwLock<BusState>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            state: RwLock::new(BusState {
                log: VecDeque::with_capacity(EVENT_LOG_CAP),
                subscribers: HashMap::new(),
                next_handle: 1,
            }),
        }
    }

    /// Append the event to the bounded log and deliver it to every
    /// subscriber whose filter matches. Subscribers whose receiver has been
    /// dropped are pruned here.
    pub fn publish(&self, event: RealTimeEvent) {
        let mut state = self.state.write().expect("event bus lock poisoned");

        if state.log.len() == EVENT_LOG_CAP {
            state.log.pop_front();
        }
        state.log.push_back(event.clone());

        let mut dead = Vec::new();
        for (handle, sub) in &state.subscribers {
            if sub.filter.matches(&event) && sub.tx.send(event.clone()).is_err() {
                dead.push(*handle);
            }
        }
        for handle in dead {
            state.subscribers.remove(&handle);
        }
    }

    /// Register a subscriber. Returns the handle and the receiving end of
    /// an unbounded channel that yields matching events in publish order.
    pub fn subscribe(
        &self,
        filter: EventFilter,
    ) -> (SubscriptionHandle, UnboundedReceiver<RealTimeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.write().expect("event bus lock poisoned");
        let handle = state.next_handle;
        state.next_handle += 1;
        state.subscribers.insert(handle, Subscriber { filter, tx });
        (SubscriptionHandle(handle), rx)
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        let mut state = self.state.write().expect("event bus lock poisoned");
        state.subscribers.remove(&handle.0);
    }

    /// Snapshot of the buffered event tail, oldest first.
    pub fn recent_events(&self) -> Vec<RealTimeEvent> {
        let state = self.state.read().expect("event bus lock poisoned");
        state.log.iter().cloned().collect()
    }

    pub fn subscriber_count(&self) -> usize {
        let state = self.state.read().expect("event bus lock poisoned");
        state.subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
