//! Property-based tests for sessions sharing one service.
//!
//! Random events are applied to random sessions; the standard invariants are
//! checked against the whole system after every event.

use std::sync::Arc;

use agora_app::{SessionController, SessionEvent, TerminalInfo};
use agora_core::{ChatConfig, ChatService, Identity};
use agora_harness::{InvariantRegistry, SimEnv, SystemSnapshot};
use proptest::prelude::*;

const SESSIONS: usize = 3;

/// Short message bodies, occasionally blank or over length.
fn content_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => "[a-z]{1,12}",
        1 => Just("   ".to_string()),
        1 => Just("x".repeat(281)),
    ]
}

/// Session events other than disconnect.
fn event_strategy() -> impl Strategy<Value = SessionEvent> {
    prop_oneof![
        3 => content_strategy().prop_map(SessionEvent::Submit),
        2 => Just(SessionEvent::ToggleMode),
        2 => Just(SessionEvent::NavigateUp),
        2 => Just(SessionEvent::NavigateDown),
        2 => Just(SessionEvent::Upvote),
        2 => Just(SessionEvent::Downvote),
        2 => Just(SessionEvent::RefreshTick),
        1 => (1u16..200, 1u16..100).prop_map(|(c, r)| SessionEvent::Resize(c, r)),
    ]
}

/// An event aimed at one session, or a system announcement.
#[derive(Debug, Clone)]
enum Step {
    Session(usize, SessionEvent),
    Announce,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        12 => (0..SESSIONS, event_strategy()).prop_map(|(i, e)| Step::Session(i, e)),
        1 => Just(Step::Announce),
    ]
}

fn connect_all(service: &Arc<ChatService<SimEnv>>) -> Vec<SessionController<SimEnv>> {
    let names = ["alice", "bob", "carol"];
    names[..SESSIONS]
        .iter()
        .map(|name| {
            SessionController::connect(
                Arc::clone(service),
                Identity::new(*name),
                TerminalInfo::default(),
            )
        })
        .collect()
}

proptest! {
    /// All invariants hold after every event on every session.
    #[test]
    fn prop_invariants_hold(steps in prop::collection::vec(step_strategy(), 0..80)) {
        let service = Arc::new(ChatService::new(SimEnv::new(), ChatConfig::default()));
        let mut sessions = connect_all(&service);
        let invariants = InvariantRegistry::standard();

        for step in steps {
            match &step {
                Step::Session(i, event) => {
                    let _ = sessions[*i].handle(event.clone());
                },
                Step::Announce => {
                    service.store().announce("notice");
                },
            }

            let snapshot = SystemSnapshot::capture(&service, &sessions);
            prop_assert!(
                invariants.check_all(&snapshot).is_ok(),
                "Invariant violated after {:?}: {:?}", step, invariants.check_all(&snapshot)
            );
        }
    }

    /// Disconnecting sessions in any order releases presence exactly once.
    #[test]
    fn prop_presence_tracks_disconnects(
        order in Just((0..SESSIONS).collect::<Vec<_>>()).prop_shuffle(),
        repeat in any::<bool>(),
    ) {
        let service = Arc::new(ChatService::new(SimEnv::new(), ChatConfig::quiet()));
        let mut sessions = connect_all(&service);
        prop_assert_eq!(service.presence().value(), SESSIONS);

        for (n, i) in order.iter().enumerate() {
            sessions[*i].handle(SessionEvent::Disconnect);
            if repeat {
                sessions[*i].handle(SessionEvent::Disconnect);
            }
            prop_assert_eq!(service.presence().value(), SESSIONS - n - 1);
            InvariantRegistry::standard()
                .assert_all(&SystemSnapshot::capture(&service, &sessions), "after disconnect");
        }

        drop(sessions);
        prop_assert_eq!(service.presence().value(), 0);
    }

    /// The log only grows and the service's length matches every fresh copy.
    #[test]
    fn prop_log_only_grows(steps in prop::collection::vec(step_strategy(), 0..60)) {
        let service = Arc::new(ChatService::new(SimEnv::new(), ChatConfig::quiet()));
        let mut sessions = connect_all(&service);
        let mut last_len = service.store().len();

        for step in steps {
            if let Step::Session(i, event) = step {
                let _ = sessions[i].handle(event);
            }
            let len = service.store().len();
            prop_assert!(len >= last_len);
            prop_assert_eq!(service.store().snapshot().len(), len);
            last_len = len;
        }
    }
}
