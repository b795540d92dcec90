//! Interface tests for the dispatch components using Cucumber.
//!
//! These tests pin down the observable contract of the bus, the command table
//! and the mediator registry independently of the facade.
//!
//! ```bash
//! cargo test --test interfaces --features test-utils
//! ```

mod steps;

use cucumber::World;
use steps::command_table::CommandTableWorld;
use steps::mediator_registry::MediatorRegistryWorld;
use steps::notification_bus::NotificationBusWorld;

#[tokio::main]
async fn main() {
    // Run NotificationBus tests
    println!("\n=== Running NotificationBus Interface Tests ===\n");
    NotificationBusWorld::cucumber()
        .fail_on_skipped()
        .run("tests/interfaces/features/notification_bus.feature")
        .await;

    // Run CommandTable tests
    println!("\n=== Running CommandTable Interface Tests ===\n");
    CommandTableWorld::cucumber()
        .fail_on_skipped()
        .run("tests/interfaces/features/command_table.feature")
        .await;

    // Run MediatorRegistry tests
    println!("\n=== Running MediatorRegistry Interface Tests ===\n");
    MediatorRegistryWorld::cucumber()
        .fail_on_skipped()
        .run("tests/interfaces/features/mediator_registry.feature")
        .await;
}
