//! courier-demo: minimal end-to-end walk through the facade
//!
//! Wires two printing mediators, a start-up command and a data proxy into a
//! facade, then publishes a short sequence of notifications.
//!
//! ## Configuration
//! - COURIER_CONFIG: optional path to a YAML config file
//! - COURIER__DISPATCH__FAULT_POLICY: propagate | isolate
//! - COURIER_LOG: tracing filter (default "info")

use std::sync::Arc;

use tracing::info;

use courier::config::Config;
use courier::facade::Facade;
use courier::interfaces::{command, mediator, Mediator};
use courier::notification::Notification;
use courier::proxies::DataProxy;
use courier::utils::bootstrap::init_tracing;

/// Mediator that prints whatever it is handed.
struct PrintingMediator {
    name: &'static str,
    interests: &'static [&'static str],
}

impl Mediator for PrintingMediator {
    fn name(&self) -> &str {
        self.name
    }

    fn interests(&self) -> Vec<String> {
        self.interests.iter().map(|s| s.to_string()).collect()
    }

    fn handle(&self, notification: &Notification) -> mediator::Result<()> {
        println!("[{}] {}", self.name, notification);
        Ok(())
    }

    fn on_attach(&self) {
        info!(mediator = self.name, "Attached");
    }

    fn on_detach(&self) {
        info!(mediator = self.name, "Detached");
    }
}

fn startup(notification: &Notification) -> command::Result<()> {
    println!("[Startup] {}", notification.name());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load(None)?;
    info!(
        fault_policy = ?config.dispatch.fault_policy,
        duplicate_mediator = ?config.dispatch.duplicate_mediator,
        "Starting courier demo"
    );

    let first: Arc<dyn Mediator> = Arc::new(PrintingMediator {
        name: "test",
        interests: &["walk", "talk", "say"],
    });
    let second: Arc<dyn Mediator> = Arc::new(PrintingMediator {
        name: "test2",
        interests: &["walk", "say"],
    });

    let facade = Facade::builder(config.dispatch)
        .with_proxy(Arc::new(DataProxy::new("MyProxy").with_data("demo data")))
        .with_command("Startup", Arc::new(startup))
        .with_mediator(Arc::clone(&first))
        .with_mediator(second)
        .build()?;

    match facade.retrieve_proxy("MyProxy") {
        Some(proxy) => info!(proxy = proxy.name(), "Retrieved proxy"),
        None => info!("Proxy MyProxy missing"),
    }

    facade.publish("Startup")?;
    facade.publish_name_to("walk", &[first])?;

    for topic in ["talk", "walk", "==="] {
        let report = facade.publish(topic)?;
        info!(topic, delivered = report.delivered, "Published");
    }

    Ok(())
}
