//! Integration tests for publish-on-mutation: every store command emits
//! an event on the bus, scoped subscriptions filter correctly, and events
//! are only visible after the mutation they describe.

mod common;

use common::{new_group, new_poll, new_presentation, setup_store};
use podium::engine::events::{EventFilter, EventPayload, EVENT_LOG_CAP};
use podium::engine::types::{GroupUpdate, MetricsUpdate, PollType};

#[tokio::test]
async fn test_every_command_publishes_one_event() {
    let (bus, store) = setup_store();
    let (_handle, mut rx) = bus.subscribe(EventFilter::default());

    let group = store.create_group(new_group("Alpha")).unwrap();
    store.add_member(&group.id, "u1", None).unwrap();
    store.update_group(&group.id, GroupUpdate::default()).unwrap();
    store.remove_member(&group.id, "u1").unwrap();
    store
        .update_performance("u1", &group.id, MetricsUpdate {
            assessment_score: Some(90.0),
            ..Default::default()
        })
        .unwrap();
    store.delete_group(&group.id).unwrap();

    let mut received = Vec::new();
    while let Ok(event) = rx.try_recv() {
        received.push(event);
    }
    assert_eq!(received.len(), 6);
    assert!(matches!(received[0].payload, EventPayload::GroupCreated { .. }));
    assert!(matches!(received[1].payload, EventPayload::UserJoined { .. }));
    assert!(matches!(received[2].payload, EventPayload::GroupUpdated { .. }));
    assert!(matches!(received[3].payload, EventPayload::UserLeft { .. }));
    assert!(matches!(received[4].payload, EventPayload::PerformanceUpdated { .. }));
    assert!(matches!(received[5].payload, EventPayload::GroupDeleted { .. }));
}

#[tokio::test]
async fn test_failed_commands_publish_nothing() {
    let (bus, store) = setup_store();
    let (_handle, mut rx) = bus.subscribe(EventFilter::default());

    assert!(store.delete_group("grp_missing").is_err());
    assert!(store.create_group(new_group("  ")).is_err());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_event_follows_committed_state() {
    let (bus, store) = setup_store();
    let (_handle, mut rx) = bus.subscribe(EventFilter::default());

    let group = store.create_group(new_group("Alpha")).unwrap();
    let event = rx.try_recv().expect("event published");

    // By the time the event is observable, the mutation is committed.
    match &event.payload {
        EventPayload::GroupCreated { group_id, name } => {
            assert_eq!(group_id, &group.id);
            assert_eq!(name, "Alpha");
            assert!(store.group(group_id).is_some());
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[tokio::test]
async fn test_group_scoped_subscription_filters() {
    let (bus, store) = setup_store();
    let alpha = store.create_group(new_group("Alpha")).unwrap();
    let bravo = store.create_group(new_group("Bravo")).unwrap();

    let (_handle, mut rx) = bus.subscribe(EventFilter {
        group_id: Some(alpha.id.clone()),
        presentation_id: None,
    });

    store.add_member(&alpha.id, "u1", None).unwrap();
    store.add_member(&bravo.id, "u2", None).unwrap();
    store.add_member(&alpha.id, "u3", None).unwrap();

    let first = rx.try_recv().unwrap();
    let second = rx.try_recv().unwrap();
    assert!(rx.try_recv().is_err(), "bravo events must not be delivered");
    assert_eq!(first.group_id.as_deref(), Some(alpha.id.as_str()));
    assert_eq!(second.group_id.as_deref(), Some(alpha.id.as_str()));
}

#[tokio::test]
async fn test_presentation_scoped_subscription_filters() {
    let (bus, store) = setup_store();
    let p1 = store
        .create_presentation(new_presentation("Q1 Review", 5))
        .unwrap();
    let p2 = store
        .create_presentation(new_presentation("Q2 Preview", 3))
        .unwrap();

    let (_handle, mut rx) = bus.subscribe(EventFilter {
        group_id: None,
        presentation_id: Some(p1.id.clone()),
    });

    store.start_presentation(&p1.id).unwrap();
    store.start_presentation(&p2.id).unwrap();
    let poll = store
        .add_poll(&p1.id, new_poll("Ready?", PollType::TrueFalse))
        .unwrap();

    let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[0].payload,
        EventPayload::PresentationStarted { .. }
    ));
    match &events[1].payload {
        EventPayload::PollCreated { poll_id, .. } => assert_eq!(poll_id, &poll.id),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[tokio::test]
async fn test_unsubscribe_stops_delivery() {
    let (bus, store) = setup_store();
    let (handle, mut rx) = bus.subscribe(EventFilter::default());

    store.create_group(new_group("Alpha")).unwrap();
    assert!(rx.try_recv().is_ok());

    bus.unsubscribe(handle);
    store.create_group(new_group("Bravo")).unwrap();
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_replay_buffer_keeps_last_fifty() {
    let (bus, store) = setup_store();
    for i in 0..EVENT_LOG_CAP + 5 {
        store.create_group(new_group(&format!("Group {i}"))).unwrap();
    }

    let recent = bus.recent_events();
    assert_eq!(recent.len(), EVENT_LOG_CAP);
    // The five oldest were dropped.
    match &recent[0].payload {
        EventPayload::GroupCreated { name, .. } => assert_eq!(name, "Group 5"),
        other => panic!("unexpected payload {other:?}"),
    }
}
