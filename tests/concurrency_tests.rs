// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

//! Concurrency tests for the session store and auth service.
//!
//! The session store is the only shared mutable state in the service, so
//! these tests hammer it from many tasks at once. They verify the store's
//! contract under contention — distinct tokens, per-token atomicity, no
//! panics when delete races validate — and are also useful under
//! ThreadSanitizer:
//!
//! ```bash
//! RUSTFLAGS="-Z sanitizer=thread" cargo +nightly test --target x86_64-unknown-linux-gnu --test concurrency_tests
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;

use echogate::clock::ManualClock;
use echogate::{AuthService, ServiceConfig, SessionStore};

// Test configuration
const CONCURRENCY_LEVEL: usize = 100;
const ITERATIONS_PER_TASK: usize = 50;
const TEST_TIMEOUT_SECS: u64 = 30;

fn auth_service() -> (Arc<ManualClock>, Arc<AuthService>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let auth = Arc::new(AuthService::new(&ServiceConfig::default(), clock.clone()));
    (clock, auth)
}

// =============================================================================
// SESSION STORE TESTS
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_yield_distinct_tokens() {
    let store = Arc::new(SessionStore::new(3600));
    let now = Utc::now();

    let mut handles = Vec::new();
    for _ in 0..CONCURRENCY_LEVEL {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let mut tokens = Vec::with_capacity(ITERATIONS_PER_TASK);
            for _ in 0..ITERATIONS_PER_TASK {
                tokens.push(store.create("v_shutenko", now).token);
            }
            tokens
        }));
    }

    let mut all_tokens = HashSet::new();
    for handle in handles {
        let tokens = timeout(Duration::from_secs(TEST_TIMEOUT_SECS), handle)
            .await
            .expect("task timed out")
            .expect("task panicked");
        for token in tokens {
            assert!(all_tokens.insert(token), "duplicate token issued");
        }
    }

    assert_eq!(all_tokens.len(), CONCURRENCY_LEVEL * ITERATIONS_PER_TASK);
    assert_eq!(store.len(), CONCURRENCY_LEVEL * ITERATIONS_PER_TASK);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_racing_get_never_corrupts() {
    let store = Arc::new(SessionStore::new(3600));
    let now = Utc::now();

    let tokens: Vec<String> = (0..CONCURRENCY_LEVEL)
        .map(|_| store.create("v_shutenko", now).token)
        .collect();

    let mut handles = Vec::new();
    for token in &tokens {
        // One task deletes while another looks up the same token;
        // either "found" or "not found" is acceptable, a panic is not.
        let store_a = store.clone();
        let token_a = token.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..ITERATIONS_PER_TASK {
                if let Some(session) = store_a.get(&token_a) {
                    assert_eq!(session.user_login, "v_shutenko");
                }
            }
        }));

        let store_b = store.clone();
        let token_b = token.clone();
        handles.push(tokio::spawn(async move {
            store_b.delete(&token_b);
            // Repeated deletes stay idempotent under the race
            store_b.delete(&token_b);
        }));
    }

    for handle in handles {
        timeout(Duration::from_secs(TEST_TIMEOUT_SECS), handle)
            .await
            .expect("task timed out")
            .expect("task panicked");
    }

    assert!(store.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn sweep_racing_create_keeps_live_sessions() {
    let store = Arc::new(SessionStore::new(3600));
    let now = Utc::now();

    let mut handles = Vec::new();
    for _ in 0..CONCURRENCY_LEVEL {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.create("v_shutenko", now)
        }));
    }

    let sweeper = {
        let store = store.clone();
        tokio::spawn(async move {
            for _ in 0..ITERATIONS_PER_TASK {
                // Nothing is expired yet, so the sweep must remove nothing
                assert_eq!(store.sweep_expired(now), 0);
            }
        })
    };

    for handle in handles {
        let session = timeout(Duration::from_secs(TEST_TIMEOUT_SECS), handle)
            .await
            .expect("task timed out")
            .expect("task panicked");
        assert!(store.get(&session.token).is_some());
    }
    sweeper.await.expect("sweeper panicked");

    assert_eq!(store.len(), CONCURRENCY_LEVEL);
}

// =============================================================================
// AUTH SERVICE TESTS
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_logins_are_independently_valid() {
    let (_, auth) = auth_service();

    let mut handles = Vec::new();
    for _ in 0..CONCURRENCY_LEVEL {
        let auth = auth.clone();
        handles.push(tokio::spawn(async move {
            auth.login("v_shutenko", "8nEThznM")
                .expect("login failed")
                .token
        }));
    }

    let mut tokens = HashSet::new();
    for handle in handles {
        let token = timeout(Duration::from_secs(TEST_TIMEOUT_SECS), handle)
            .await
            .expect("task timed out")
            .expect("task panicked");
        assert!(tokens.insert(token.clone()), "token reissued");

        // Each token validates independently of the others
        let info = auth.validate(&token).expect("token should be valid");
        assert_eq!(info.user_login, "v_shutenko");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_racing_validate_stays_well_behaved() {
    let (_, auth) = auth_service();

    let mut handles = Vec::new();
    for _ in 0..CONCURRENCY_LEVEL {
        let token = auth.login("v_shutenko", "8nEThznM").unwrap().token;

        let auth_a = auth.clone();
        let token_a = token.clone();
        handles.push(tokio::spawn(async move {
            // May see a live session or an already-revoked one; both are
            // acceptable outcomes of the race
            let _ = auth_a.validate(&token_a);
        }));

        let auth_b = auth.clone();
        handles.push(tokio::spawn(async move {
            auth_b.logout(&token);
        }));
    }

    for handle in handles {
        timeout(Duration::from_secs(TEST_TIMEOUT_SECS), handle)
            .await
            .expect("task timed out")
            .expect("task panicked");
    }

    // After every logout has landed, nothing validates
    assert!(auth.store().is_empty());
}
