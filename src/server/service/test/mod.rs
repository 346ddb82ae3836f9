use std::sync::Arc;

use test_utils::context::TestContext;

use crate::server::{
    data::{bot::BotDirectory, port::PortRegistry},
    service::{backend::BackendClient, dispatch::FanOutDispatcher, domain::DomainResolver},
    util::{clock::SystemClock, limit::OutboundLimiter},
};


const INTERNAL_KEY: &str = "internal-key";

fn backend() -> BackendClient {
    backend_with(OutboundLimiter::default())
}

fn backend_with(limiter: OutboundLimiter) -> BackendClient {
    BackendClient::new(reqwest::Client::new(), "127.0.0.1", INTERNAL_KEY, limiter)
}

/// Waits until calls in flight leave exactly `free` process-wide slots.
async fn wait_for_free_slots(limiter: &OutboundLimiter, free: usize) {
    for _ in 0..200 {
        if limiter.available() == free {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    panic!("in-flight calls never settled at {} free slots", free);
}

fn dispatcher(test: &TestContext) -> FanOutDispatcher {
    let clock = Arc::new(SystemClock);
    FanOutDispatcher::new(
        backend(),
        BotDirectory::new(&test.bots_dir, clock.clone()),
        PortRegistry::new(&test.ports_file, clock),
    )
}

fn resolver(test: &TestContext) -> DomainResolver {
    DomainResolver::new(
        dispatcher(test),
        vec!["v2.noemt.dev".to_string(), "localhost".to_string()],
    )
}
