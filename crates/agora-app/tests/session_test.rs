//! Session controller scenarios.
//!
//! Several sessions share one service; each test drives them with events and
//! checks what the sessions observe.

use std::sync::Arc;

use agora_app::{Mode, SessionAction, SessionController, SessionEvent, TerminalInfo};
use agora_core::{ChatConfig, ChatService, Identity};
use agora_harness::StepEnv;

fn service(config: ChatConfig) -> Arc<ChatService<StepEnv>> {
    Arc::new(ChatService::new(StepEnv::new(), config))
}

fn connect(service: &Arc<ChatService<StepEnv>>, name: &str) -> SessionController<StepEnv> {
    SessionController::connect(Arc::clone(service), Identity::new(name), TerminalInfo::default())
}

fn selected_content(session: &SessionController<StepEnv>) -> Option<String> {
    session.view().selected().map(|m| m.content.clone())
}

#[test]
fn selection_skips_system_messages() {
    let service = service(ChatConfig::quiet());
    let mut alice = connect(&service, "alice");
    service.store().announce("sys1");
    alice.handle(SessionEvent::Submit("msgA".into()));
    service.store().announce("sys2");
    alice.handle(SessionEvent::Submit("msgB".into()));

    alice.handle(SessionEvent::ToggleMode);
    assert_eq!(alice.mode(), Mode::Selection);
    assert_eq!(alice.client().selected_index, Some(3));

    assert_eq!(alice.handle(SessionEvent::NavigateUp), vec![SessionAction::Render]);
    assert_eq!(alice.client().selected_index, Some(1));
    assert_eq!(selected_content(&alice).as_deref(), Some("msgA"));

    // Only sys1 lies above msgA
    assert!(alice.handle(SessionEvent::NavigateUp).is_empty());
    assert_eq!(alice.client().selected_index, Some(1));

    alice.handle(SessionEvent::NavigateDown);
    assert_eq!(selected_content(&alice).as_deref(), Some("msgB"));
    assert!(alice.handle(SessionEvent::NavigateDown).is_empty());
}

#[test]
fn toggle_without_votable_messages_selects_nothing() {
    let service = service(ChatConfig::default());
    let mut alice = connect(&service, "alice");

    alice.handle(SessionEvent::ToggleMode);

    assert_eq!(alice.mode(), Mode::Selection);
    assert_eq!(alice.client().selected_index, None);
    assert!(alice.handle(SessionEvent::NavigateUp).is_empty());
    assert!(alice.handle(SessionEvent::Upvote).is_empty());
}

#[test]
fn toggle_back_to_input_keeps_selection() {
    let service = service(ChatConfig::quiet());
    let mut alice = connect(&service, "alice");
    alice.handle(SessionEvent::Submit("one".into()));
    alice.handle(SessionEvent::Submit("two".into()));
    alice.handle(SessionEvent::ToggleMode);
    alice.handle(SessionEvent::NavigateUp);

    alice.handle(SessionEvent::ToggleMode);

    assert_eq!(alice.mode(), Mode::Input);
    assert_eq!(alice.client().selected_index, Some(0));
    assert_eq!(alice.view().selected(), None);
}

#[test]
fn refresh_picks_up_other_sessions_and_reanchors() {
    let service = service(ChatConfig::quiet());
    let mut alice = connect(&service, "alice");
    let mut bob = connect(&service, "bob");
    alice.handle(SessionEvent::Submit("first".into()));
    alice.handle(SessionEvent::Submit("second".into()));

    bob.handle(SessionEvent::RefreshTick);
    bob.handle(SessionEvent::ToggleMode);
    bob.handle(SessionEvent::NavigateUp);
    assert_eq!(selected_content(&bob).as_deref(), Some("first"));

    alice.handle(SessionEvent::Submit("third".into()));
    assert_eq!(bob.snapshot().len(), 2);

    assert_eq!(bob.handle(SessionEvent::RefreshTick), vec![SessionAction::Render]);
    assert_eq!(bob.client().last_seen_count, 3);
    assert_eq!(selected_content(&bob).as_deref(), Some("third"));

    // Nothing new: no render, selection stays
    bob.handle(SessionEvent::NavigateUp);
    assert!(bob.handle(SessionEvent::RefreshTick).is_empty());
    assert_eq!(selected_content(&bob).as_deref(), Some("second"));
}

#[test]
fn vote_flow_updates_counters_visible_to_voter() {
    let service = service(ChatConfig::quiet());
    let mut alice = connect(&service, "alice");
    let mut bob = connect(&service, "bob");
    alice.handle(SessionEvent::Submit("hello".into()));
    bob.handle(SessionEvent::RefreshTick);
    bob.handle(SessionEvent::ToggleMode);

    bob.handle(SessionEvent::Upvote);
    assert_eq!(bob.view().selected().map(|m| (m.upvotes, m.downvotes)), Some((1, 0)));

    bob.handle(SessionEvent::Upvote);
    assert!(bob.notice().is_some());
    assert_eq!(bob.view().selected().map(|m| (m.upvotes, m.downvotes)), Some((1, 0)));

    bob.handle(SessionEvent::Downvote);
    assert!(bob.notice().is_none());
    assert_eq!(bob.view().selected().map(|m| (m.upvotes, m.downvotes)), Some((0, 1)));

    // Alice sees the counters on her next refresh only if the log grew
    assert_eq!(alice.snapshot()[0].downvotes, 0);
    assert_eq!(service.store().snapshot()[0].downvotes, 1);
}

#[test]
fn vote_does_not_advance_last_seen_count() {
    let service = service(ChatConfig::quiet());
    let mut alice = connect(&service, "alice");
    let mut bob = connect(&service, "bob");
    alice.handle(SessionEvent::Submit("one".into()));
    bob.handle(SessionEvent::RefreshTick);
    bob.handle(SessionEvent::ToggleMode);

    alice.handle(SessionEvent::Submit("two".into()));
    bob.handle(SessionEvent::Upvote);

    // Vote refreshed bob's copy, but the next tick still re-anchors
    assert_eq!(bob.snapshot().len(), 2);
    assert_eq!(bob.client().last_seen_count, 1);
    assert_eq!(bob.handle(SessionEvent::RefreshTick), vec![SessionAction::Render]);
    assert_eq!(selected_content(&bob).as_deref(), Some("two"));
}

#[test]
fn join_announcements_are_not_selectable() {
    let service = service(ChatConfig::default());
    let mut alice = connect(&service, "alice");
    alice.handle(SessionEvent::Submit("hi".into()));
    let _bob = connect(&service, "bob");

    alice.handle(SessionEvent::RefreshTick);
    let contents: Vec<_> = alice.snapshot().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["Welcome to agora", "alice has joined", "hi", "bob has joined"]);

    alice.handle(SessionEvent::ToggleMode);
    assert_eq!(selected_content(&alice).as_deref(), Some("hi"));
    assert!(alice.handle(SessionEvent::NavigateDown).is_empty());
}

#[test]
fn starts_in_input_mode() {
    let service = service(ChatConfig::quiet());
    let s = connect(&service, "alice");

    assert_eq!(s.mode(), Mode::Input);
    assert_eq!(s.client().selected_index, None);
    assert!(s.is_connected());
    assert_eq!(service.presence().value(), 1);
}

#[test]
fn submit_trims_and_ignores_blank_text() {
    let service = service(ChatConfig::quiet());
    let mut s = connect(&service, "alice");

    assert!(s.handle(SessionEvent::Submit("   ".into())).is_empty());
    assert_eq!(service.store().len(), 0);

    let actions = s.handle(SessionEvent::Submit("  hi  ".into()));
    assert_eq!(actions, vec![SessionAction::Render]);
    assert_eq!(s.snapshot()[0].content, "hi");
    assert_eq!(s.client().last_seen_count, 1);
}

#[test]
fn submit_is_ignored_in_selection_mode() {
    let service = service(ChatConfig::quiet());
    let mut s = connect(&service, "alice");
    s.handle(SessionEvent::ToggleMode);

    assert!(s.handle(SessionEvent::Submit("hi".into())).is_empty());
    assert_eq!(service.store().len(), 0);
}

#[test]
fn over_length_submit_sets_notice() {
    let service = service(ChatConfig::quiet());
    let mut s = connect(&service, "alice");

    s.handle(SessionEvent::Submit("x".repeat(281)));

    assert!(s.notice().is_some_and(|n| n.contains("281")));
    assert_eq!(service.store().len(), 0);

    s.handle(SessionEvent::Submit("ok".into()));
    assert!(s.notice().is_none());
}

#[test]
fn navigation_and_votes_require_selection_mode() {
    let service = service(ChatConfig::quiet());
    let mut s = connect(&service, "alice");
    s.handle(SessionEvent::Submit("hi".into()));

    assert!(s.handle(SessionEvent::NavigateUp).is_empty());
    assert!(s.handle(SessionEvent::Upvote).is_empty());
    assert_eq!(s.snapshot()[0].upvotes, 0);
}

#[test]
fn duplicate_vote_is_a_notice_not_a_state_change() {
    let service = service(ChatConfig::quiet());
    let mut alice = connect(&service, "alice");
    let mut bob = connect(&service, "bob");
    alice.handle(SessionEvent::Submit("hello".into()));
    bob.handle(SessionEvent::RefreshTick);
    bob.handle(SessionEvent::ToggleMode);

    bob.handle(SessionEvent::Upvote);
    let before = bob.client().clone();
    bob.handle(SessionEvent::Upvote);

    assert_eq!(bob.client(), &before);
    assert!(bob.notice().is_some_and(|n| n.contains("already voted")));
    assert_eq!(bob.snapshot()[0].upvotes, 1);
}

#[test]
fn resize_only_touches_viewport() {
    let service = service(ChatConfig::quiet());
    let mut s = connect(&service, "alice");
    let before = s.client().clone();

    assert_eq!(s.handle(SessionEvent::Resize(120, 40)), vec![SessionAction::Render]);
    assert_eq!((s.terminal().width, s.terminal().height), (120, 40));
    assert_eq!(s.client(), &before);
}

#[test]
fn disconnect_is_terminal_and_releases_presence_once() {
    let service = service(ChatConfig::quiet());
    let mut s = connect(&service, "alice");
    let _other = connect(&service, "bob");
    assert_eq!(service.presence().value(), 2);

    assert_eq!(s.handle(SessionEvent::Disconnect), vec![SessionAction::Quit]);
    assert_eq!(service.presence().value(), 1);

    assert!(s.handle(SessionEvent::Submit("late".into())).is_empty());
    assert!(s.handle(SessionEvent::Disconnect).is_empty());
    drop(s);
    assert_eq!(service.presence().value(), 1);
}

#[test]
fn dropping_a_connected_session_releases_presence() {
    let service = service(ChatConfig::quiet());
    let s = connect(&service, "alice");
    drop(s);
    assert_eq!(service.presence().value(), 0);
}

#[test]
fn refresh_tick_renders_on_presence_change() {
    let service = service(ChatConfig::quiet());
    let mut alice = connect(&service, "alice");
    assert!(alice.handle(SessionEvent::RefreshTick).is_empty());

    let bob = connect(&service, "bob");
    assert_eq!(alice.handle(SessionEvent::RefreshTick), vec![SessionAction::Render]);
    assert_eq!(alice.view().presence, 2);

    drop(bob);
    assert_eq!(alice.handle(SessionEvent::RefreshTick), vec![SessionAction::Render]);
    assert!(alice.handle(SessionEvent::RefreshTick).is_empty());
}
