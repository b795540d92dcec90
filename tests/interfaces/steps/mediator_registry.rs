//! MediatorRegistry interface step definitions.

use std::collections::HashMap;
use std::sync::Arc;

use courier::bus::NotificationBus;
use courier::mediators::{DuplicateMediatorPolicy, MediatorRegistry, RegistryError};
use courier::notification::Notification;
use courier::test_utils::{call_log, CallLog, RecordingMediator};
use cucumber::{given, then, when, World};

/// Test context for MediatorRegistry scenarios.
#[derive(World)]
#[world(init = Self::new)]
pub struct MediatorRegistryWorld {
    bus: Arc<NotificationBus>,
    registry: MediatorRegistry,
    mediators: HashMap<String, Arc<RecordingMediator>>,
    log: CallLog,
    last_result: Option<Result<(), RegistryError>>,
}

impl std::fmt::Debug for MediatorRegistryWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediatorRegistryWorld")
            .field("registered", &self.registry.mediator_count())
            .field("topics", &self.bus.topic_count())
            .field("last_result", &self.last_result)
            .finish()
    }
}

impl MediatorRegistryWorld {
    fn new() -> Self {
        Self::with_policy(DuplicateMediatorPolicy::Ignore)
    }

    fn with_policy(policy: DuplicateMediatorPolicy) -> Self {
        let bus = Arc::new(NotificationBus::new());
        Self {
            registry: MediatorRegistry::with_policy(Arc::clone(&bus), policy),
            bus,
            mediators: HashMap::new(),
            log: call_log(),
            last_result: None,
        }
    }

    fn register(&mut self, name: &str, interests: &str) -> Result<(), RegistryError> {
        let topics: Vec<&str> = interests.split(',').map(str::trim).collect();
        let mediator = Arc::new(RecordingMediator::new(name, &topics).with_log(&self.log));
        let result = self.registry.register_mediator(mediator.clone());
        // Keep the first instance for hook assertions
        self.mediators.entry(name.to_string()).or_insert(mediator);
        result
    }

    fn mediator(&self, name: &str) -> &Arc<RecordingMediator> {
        self.mediators
            .get(name)
            .unwrap_or_else(|| panic!("Unknown mediator {}", name))
    }
}

// ==========================================================================
// Background
// ==========================================================================

#[given("a mediator registry")]
async fn given_registry(_world: &mut MediatorRegistryWorld) {
    // Registry is initialized via World::new
}

#[given("the registry rejects duplicate names")]
async fn given_reject_policy(world: &mut MediatorRegistryWorld) {
    *world = MediatorRegistryWorld::with_policy(DuplicateMediatorPolicy::Reject);
}

// ==========================================================================
// Registration
// ==========================================================================

#[given(expr = "mediator {string} interested in {string}")]
async fn given_mediator(world: &mut MediatorRegistryWorld, name: String, interests: String) {
    world
        .register(&name, &interests)
        .expect("register_mediator failed");
}

#[when(expr = "I register mediator {string} interested in {string}")]
async fn when_register(world: &mut MediatorRegistryWorld, name: String, interests: String) {
    let result = world.register(&name, &interests);
    world.last_result = Some(result);
}

#[when(expr = "I remove mediator {string}")]
async fn when_remove(world: &mut MediatorRegistryWorld, name: String) {
    world.registry.remove_mediator(&name);
}

#[when(expr = "I publish {string}")]
async fn when_publish(world: &mut MediatorRegistryWorld, topic: String) {
    world
        .bus
        .publish(&topic, &Notification::new(topic.as_str()))
        .expect("publish failed");
}

// ==========================================================================
// Assertions
// ==========================================================================

#[then("the registration should succeed")]
async fn then_registration_ok(world: &mut MediatorRegistryWorld) {
    assert!(matches!(world.last_result, Some(Ok(()))));
}

#[then("the registration should be rejected")]
async fn then_registration_rejected(world: &mut MediatorRegistryWorld) {
    assert!(matches!(
        world.last_result,
        Some(Err(RegistryError::DuplicateMediator(_)))
    ));
}

#[then(expr = "mediator {string} should be registered")]
async fn then_registered(world: &mut MediatorRegistryWorld, name: String) {
    assert!(world.registry.has_mediator(&name));
}

#[then(expr = "mediator {string} should not be registered")]
async fn then_not_registered(world: &mut MediatorRegistryWorld, name: String) {
    assert!(!world.registry.has_mediator(&name));
}

#[then(expr = "mediator {string} should have been attached {int} time(s)")]
async fn then_attached(world: &mut MediatorRegistryWorld, name: String, count: usize) {
    assert_eq!(world.mediator(&name).attach_count(), count);
}

#[then(expr = "mediator {string} should have been detached {int} time(s)")]
async fn then_detached(world: &mut MediatorRegistryWorld, name: String, count: usize) {
    assert_eq!(world.mediator(&name).detach_count(), count);
}

#[then(expr = "the registry should hold {int} mediator(s)")]
async fn then_registry_size(world: &mut MediatorRegistryWorld, count: usize) {
    assert_eq!(world.registry.mediator_count(), count);
}

#[then(expr = "the delivery log should be {string}")]
async fn then_log_is(world: &mut MediatorRegistryWorld, expected: String) {
    assert_eq!(world.log.lock().join(","), expected);
}

#[then("the delivery log should be empty")]
async fn then_log_empty(world: &mut MediatorRegistryWorld) {
    assert!(world.log.lock().is_empty(), "Log: {:?}", world.log.lock());
}

#[then(expr = "topic {string} should not exist")]
async fn then_topic_absent(world: &mut MediatorRegistryWorld, topic: String) {
    assert!(!world.bus.has_topic(&topic));
}

#[then(expr = "topic {string} should have {int} subscriber(s)")]
async fn then_subscriber_count(world: &mut MediatorRegistryWorld, topic: String, count: usize) {
    assert_eq!(world.bus.subscriber_count(&topic), count);
}
