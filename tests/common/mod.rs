//! Shared test infrastructure: a fresh store/bus pair per test plus input
//! builders for the common entity shapes.

use std::sync::Arc;

use podium::engine::events::EventBus;
use podium::engine::store::DomainStore;
use podium::engine::types::{NewGroup, NewPoll, NewPresentation, NewTemplate, PollType};

pub const TRAINER: &str = "trainer_1";
pub const TENANT: &str = "tenant_1";

/// Fresh engine instance. The bus is returned separately so tests can
/// subscribe to it directly.
pub fn setup_store() -> (Arc<EventBus>, DomainStore) {
    let bus = Arc::new(EventBus::new());
    let store = DomainStore::new(bus.clone());
    (bus, store)
}

#[allow(dead_code)]
pub fn new_group(name: &str) -> NewGroup {
    NewGroup {
        name: name.to_string(),
        description: None,
        category: None,
        tags: Vec::new(),
        trainer_id: TRAINER.to_string(),
        tenant_id: TENANT.to_string(),
        max_size: None,
    }
}

#[allow(dead_code)]
pub fn new_group_sized(name: &str, max_size: u32) -> NewGroup {
    NewGroup {
        max_size: Some(max_size),
        ..new_group(name)
    }
}

#[allow(dead_code)]
pub fn new_presentation(title: &str, total_slides: u32) -> NewPresentation {
    NewPresentation {
        title: title.to_string(),
        description: None,
        trainer_id: TRAINER.to_string(),
        group_id: None,
        total_slides,
    }
}

#[allow(dead_code)]
pub fn new_poll(question: &str, poll_type: PollType) -> NewPoll {
    NewPoll {
        question: question.to_string(),
        poll_type,
        options: Vec::new(),
        time_limit_secs: None,
    }
}

#[allow(dead_code)]
pub fn new_template(name: &str, max_size: u32) -> NewTemplate {
    NewTemplate {
        name: name.to_string(),
        description: "Template for workshop groups".to_string(),
        max_size,
        category: "Workshop".to_string(),
        tags: vec!["onboarding".to_string()],
        trainer_id: TRAINER.to_string(),
        is_public: true,
    }
}
