//! Runtime tests on virtual time.
//!
//! The production [`agora_app::Runtime`] runs against [`SimDriver`] with
//! tokio's clock paused, so refresh ticks fire at exact instants.

use std::{sync::Arc, time::Duration};

use agora_app::{Mode, Runtime, SessionController, SessionEvent, TerminalInfo};
use agora_core::{ChatConfig, ChatService, Identity};
use agora_harness::{InvariantRegistry, SimDriver, SimEnv, SimHandle};
use tokio::task::JoinHandle;

type Service = Arc<ChatService<SimEnv>>;

fn service(config: ChatConfig) -> Service {
    Arc::new(ChatService::new(SimEnv::new(), config))
}

fn spawn_session(service: &Service, name: &str) -> (SimHandle, JoinHandle<()>) {
    let (driver, handle) = SimDriver::new();
    let driver = driver.with_invariants(InvariantRegistry::standard());
    let session =
        SessionController::connect(Arc::clone(service), Identity::new(name), TerminalInfo::default());
    let task = tokio::spawn(async move {
        Runtime::new(driver, session).run().await.unwrap();
    });
    (handle, task)
}

/// Let spawned tasks drain their queues without moving the clock.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn renders_once_on_start() {
    let service = service(ChatConfig::default());
    let (handle, _task) = spawn_session(&service, "alice");
    settle().await;

    let frame = handle.last_frame().unwrap();
    assert_eq!(handle.render_count(), 1);
    assert_eq!(frame.contents, ["Welcome to agora", "alice has joined"]);
    assert_eq!(frame.presence, 1);
    assert_eq!(frame.client.mode, Mode::Input);
}

#[tokio::test(start_paused = true)]
async fn refresh_tick_delivers_other_sessions_messages() {
    let service = service(ChatConfig::quiet());
    let (alice, _a) = spawn_session(&service, "alice");
    let (bob, _b) = spawn_session(&service, "bob");
    settle().await;

    alice.inject(SessionEvent::Submit("hello bob".into()));
    settle().await;
    assert!(bob.last_frame().unwrap().contents.is_empty());

    tokio::time::sleep(Duration::from_millis(1001)).await;
    settle().await;

    let frame = bob.last_frame().unwrap();
    assert_eq!(frame.contents, ["hello bob"]);
    assert_eq!(frame.client.last_seen_count, 1);
}

#[tokio::test(start_paused = true)]
async fn quiet_ticks_do_not_render() {
    let service = service(ChatConfig::quiet());
    let (alice, _a) = spawn_session(&service, "alice");
    settle().await;
    let before = alice.render_count();

    tokio::time::sleep(Duration::from_secs(5)).await;
    settle().await;

    assert_eq!(alice.render_count(), before);
}

#[tokio::test(start_paused = true)]
async fn busy_input_does_not_starve_refresh() {
    let service = service(ChatConfig::quiet());
    let (alice, _a) = spawn_session(&service, "alice");
    let (bob, _b) = spawn_session(&service, "bob");
    settle().await;
    alice.inject(SessionEvent::Submit("ping".into()));
    settle().await;

    // Bob resizes every 100ms for two seconds
    for i in 0..20 {
        bob.inject(SessionEvent::Resize(80 + i, 24));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    settle().await;

    assert_eq!(bob.last_frame().unwrap().contents, ["ping"]);
}

#[tokio::test(start_paused = true)]
async fn vote_through_runtime_reports_duplicate() {
    let service = service(ChatConfig::quiet());
    let (alice, _a) = spawn_session(&service, "alice");
    let (bob, _b) = spawn_session(&service, "bob");
    settle().await;
    alice.inject(SessionEvent::Submit("vote me".into()));
    tokio::time::sleep(Duration::from_millis(1001)).await;
    settle().await;

    bob.inject(SessionEvent::ToggleMode);
    bob.inject(SessionEvent::Upvote);
    bob.inject(SessionEvent::Upvote);
    settle().await;

    let frame = bob.last_frame().unwrap();
    assert_eq!(frame.selected.as_deref(), Some("vote me"));
    assert!(frame.notice.unwrap().contains("already voted up"));
    assert_eq!(service.store().snapshot()[0].upvotes, 1);
    assert!(bob.modes_polled().contains(&Mode::Selection));
}

#[tokio::test(start_paused = true)]
async fn disconnect_stops_runtime_and_releases_presence() {
    let service = service(ChatConfig::quiet());
    let (alice, task) = spawn_session(&service, "alice");
    let (_bob, _b) = spawn_session(&service, "bob");
    settle().await;
    assert_eq!(service.presence().value(), 2);

    alice.inject(SessionEvent::Disconnect);
    task.await.unwrap();

    assert!(alice.is_stopped());
    assert_eq!(service.presence().value(), 1);
}

#[tokio::test(start_paused = true)]
async fn closed_input_counts_as_disconnect() {
    let service = service(ChatConfig::quiet());
    let (alice, task) = spawn_session(&service, "alice");
    settle().await;

    drop(alice);
    task.await.unwrap();

    assert_eq!(service.presence().value(), 0);
}
