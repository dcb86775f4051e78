//! Shared helpers for command integration tests
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tickbook_core::ManualClock;
use tickbook_domain::Config;
use tickbook_infra::MemoryConnector;
use tickbook_lib::context::AppContext;
use tickbook_lib::LoginRequest;

/// Shared context for command tests.
pub struct TestContext {
    pub app: Arc<AppContext>,
    pub connector: Arc<MemoryConnector>,
    pub clock: Arc<ManualClock>,
}

/// 2024-05-06 09:00 UTC
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap()
}

/// Context over the seeded demo connector with a pinned clock.
pub fn setup_test_context() -> TestContext {
    let connector = Arc::new(MemoryConnector::demo());
    let clock = Arc::new(ManualClock::new(start_time()));
    let app = Arc::new(AppContext::with_parts(Config::default(), connector.clone(), clock.clone()));
    TestContext { app, connector, clock }
}

pub fn demo_login() -> LoginRequest {
    LoginRequest { identifier: "demo".into(), secret: "demo".into(), host: None }
}
