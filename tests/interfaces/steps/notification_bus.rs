//! NotificationBus interface step definitions.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use courier::bus::{
    BusError, DispatchReport, FaultPolicy, NotificationBus, SubscriberEntry, SubscriberId,
};
use courier::notification::Notification;
use cucumber::{given, then, when, World};
use parking_lot::Mutex;

/// Test context for NotificationBus scenarios.
#[derive(World)]
#[world(init = Self::new)]
pub struct NotificationBusWorld {
    bus: Arc<NotificationBus>,
    subscribers: HashMap<String, SubscriberId>,
    log: Arc<Mutex<Vec<String>>>,
    last_report: Option<DispatchReport>,
    last_error: Option<BusError>,
}

impl std::fmt::Debug for NotificationBusWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBusWorld")
            .field("topics", &self.bus.topic_count())
            .field("subscribers", &self.subscribers.keys())
            .field("last_report", &self.last_report)
            .finish()
    }
}

impl NotificationBusWorld {
    fn new() -> Self {
        Self {
            bus: Arc::new(NotificationBus::new()),
            subscribers: HashMap::new(),
            log: Arc::new(Mutex::new(Vec::new())),
            last_report: None,
            last_error: None,
        }
    }

    fn recording_entry(&self, name: &str) -> SubscriberEntry {
        let log = Arc::clone(&self.log);
        let name = name.to_string();
        SubscriberEntry::new(move |_: &Notification| {
            log.lock().push(name.clone());
            Ok(())
        })
    }

    fn add(&mut self, name: &str, topic: &str, entry: SubscriberEntry) {
        let id = self.bus.subscribe(topic, entry).expect("subscribe failed");
        self.subscribers.insert(name.to_string(), id);
    }

    fn publish(&mut self, topic: &str) {
        match self.bus.publish(topic, &Notification::new(topic)) {
            Ok(report) => self.last_report = Some(report),
            Err(e) => self.last_error = Some(e),
        }
    }

    fn id_of(&self, name: &str) -> SubscriberId {
        *self
            .subscribers
            .get(name)
            .unwrap_or_else(|| panic!("Unknown subscriber {}", name))
    }
}

// ==========================================================================
// Background
// ==========================================================================

#[given("a notification bus")]
async fn given_bus(_world: &mut NotificationBusWorld) {
    // Bus is initialized via World::new
}

#[given("the bus isolates subscriber failures")]
async fn given_isolating_bus(world: &mut NotificationBusWorld) {
    world.bus = Arc::new(NotificationBus::with_fault_policy(FaultPolicy::Isolate));
}

// ==========================================================================
// Subscriptions
// ==========================================================================

#[given(expr = "subscriber {string} on topic {string}")]
async fn given_subscriber(world: &mut NotificationBusWorld, name: String, topic: String) {
    let entry = world.recording_entry(&name);
    world.add(&name, &topic, entry);
}

#[given(expr = "failing subscriber {string} on topic {string}")]
async fn given_failing_subscriber(world: &mut NotificationBusWorld, name: String, topic: String) {
    let message = format!("{} failed", name);
    let entry = SubscriberEntry::new(move |_: &Notification| {
        Err(BusError::SubscriberFailed(message.clone()))
    });
    world.add(&name, &topic, entry);
}

#[given(expr = "subscriber {string} on topic {string} that unsubscribes itself")]
async fn given_self_unsubscribing(world: &mut NotificationBusWorld, name: String, topic: String) {
    let id = SubscriberId::new();
    let bus: Weak<NotificationBus> = Arc::downgrade(&world.bus);
    let log = Arc::clone(&world.log);
    let label = name.clone();
    let own_topic = topic.clone();

    let entry = SubscriberEntry::with_id(id, move |_: &Notification| {
        log.lock().push(label.clone());
        if let Some(bus) = bus.upgrade() {
            bus.unsubscribe(&own_topic, id);
        }
        Ok(())
    });
    world.add(&name, &topic, entry);
}

#[when(expr = "I unsubscribe {string} from topic {string}")]
async fn when_unsubscribe(world: &mut NotificationBusWorld, name: String, topic: String) {
    let id = world.id_of(&name);
    world.bus.unsubscribe(&topic, id);
}

// ==========================================================================
// Publishing
// ==========================================================================

#[when(expr = "I publish {string}")]
async fn when_publish(world: &mut NotificationBusWorld, topic: String) {
    world.publish(&topic);
}

#[when("I publish to an empty topic")]
async fn when_publish_empty(world: &mut NotificationBusWorld) {
    world.publish("");
}

// ==========================================================================
// Assertions
// ==========================================================================

#[then(expr = "the delivery log should be {string}")]
async fn then_log_is(world: &mut NotificationBusWorld, expected: String) {
    assert_eq!(world.log.lock().join(","), expected);
}

#[then("the delivery log should be empty")]
async fn then_log_empty(world: &mut NotificationBusWorld) {
    assert!(world.log.lock().is_empty(), "Log: {:?}", world.log.lock());
}

#[then(expr = "{int} subscriber(s) should have been notified")]
async fn then_notified(world: &mut NotificationBusWorld, count: usize) {
    let report = world.last_report.expect("No publish report");
    assert_eq!(report.delivered, count);
}

#[then(expr = "{int} subscriber failure(s) should have been reported")]
async fn then_failures(world: &mut NotificationBusWorld, count: usize) {
    let report = world.last_report.expect("No publish report");
    assert_eq!(report.failed, count);
}

#[then("the publish should fail")]
async fn then_publish_failed(world: &mut NotificationBusWorld) {
    assert!(world.last_error.is_some(), "Expected publish to fail");
}

#[then(expr = "topic {string} should not exist")]
async fn then_topic_absent(world: &mut NotificationBusWorld, topic: String) {
    assert!(!world.bus.has_topic(&topic));
}

#[then(expr = "subscriber {string} should not be subscribed to {string}")]
async fn then_not_subscribed(world: &mut NotificationBusWorld, name: String, topic: String) {
    let id = world.id_of(&name);
    assert!(!world.bus.has_subscription(&topic, id));
}

#[then(expr = "subscriber {string} should be subscribed to {string}")]
async fn then_subscribed(world: &mut NotificationBusWorld, name: String, topic: String) {
    let id = world.id_of(&name);
    assert!(world.bus.has_subscription(&topic, id));
}
