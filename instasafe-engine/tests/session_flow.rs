use std::time::Duration;

use instasafe_engine::{
    Action, ActionOutcome, CorrectAction, EngineEvent, FeedbackKind, SafetySession,
    ScenarioCatalog, ScenarioDefinition, ScenarioKind, SessionPhase, TimingConfig,
};

fn two_scenario_catalog() -> ScenarioCatalog {
    ScenarioCatalog::from_scenarios(vec![
        ScenarioDefinition {
            kind: ScenarioKind::Unsafe,
            sender: "stranger_user".to_string(),
            avatar: String::new(),
            message: "send me your photos".to_string(),
            masked_placeholder: Some("HARMFUL MESSAGE HIDDEN".to_string()),
            correct_action: CorrectAction::Reject,
        },
        ScenarioDefinition {
            kind: ScenarioKind::Benign,
            sender: "school_friend".to_string(),
            avatar: String::new(),
            message: "want to study together?".to_string(),
            masked_placeholder: None,
            correct_action: CorrectAction::Accept,
        },
    ])
}

fn instant_session() -> SafetySession {
    SafetySession::new(two_scenario_catalog(), TimingConfig::instant())
}

fn sole_notification_id(session: &SafetySession) -> u64 {
    assert_eq!(session.notifications().len(), 1);
    session.notifications()[0].id
}

#[test]
fn correct_play_reaches_finished_with_full_score() {
    let mut session = instant_session();
    session.start();

    let events = session.advance(Duration::ZERO);
    assert!(matches!(events[0], EngineEvent::NotificationArrived(_)));
    let id0 = sole_notification_id(&session);
    assert_eq!(session.notifications()[0].kind, ScenarioKind::Unsafe);

    let outcome = session.handle_action(id0, Action::Reject);
    assert_eq!(
        outcome,
        ActionOutcome::Resolved {
            kind: ScenarioKind::Unsafe,
            correct: true
        }
    );
    assert_eq!(session.state().correct_count, 1);
    assert_eq!(session.feedback().unwrap().kind, FeedbackKind::Success);
    assert!(session.notifications().is_empty());

    // Feedback window elapses, scenario 1 arrives.
    session.advance(Duration::ZERO);
    let id1 = sole_notification_id(&session);
    assert_eq!(session.notifications()[0].kind, ScenarioKind::Benign);

    session.handle_action(id1, Action::Accept);
    assert_eq!(session.state().correct_count, 2);

    let events = session.advance(Duration::ZERO);
    assert!(events.contains(&EngineEvent::Finished));
    assert!(session.state().finished);
    assert_eq!(session.phase(), SessionPhase::Finished);
    assert!(session.next_due().is_none());
}

#[test]
fn incorrect_decision_counts_error_and_still_progresses() {
    let mut session = instant_session();
    session.start();
    session.advance(Duration::ZERO);
    let id0 = sole_notification_id(&session);

    let outcome = session.handle_action(id0, Action::Accept);
    assert_eq!(
        outcome,
        ActionOutcome::Resolved {
            kind: ScenarioKind::Unsafe,
            correct: false
        }
    );
    assert_eq!(session.state().incorrect_count, 1);
    assert_eq!(session.state().correct_count, 0);
    assert_eq!(session.feedback().unwrap().kind, FeedbackKind::Error);

    session.advance(Duration::ZERO);
    assert_eq!(session.state().current_scenario_index, 1);
    assert_eq!(session.notifications()[0].scenario_index, 1);
}

#[test]
fn view_then_hide_restores_masking_without_side_effects() {
    let mut session = instant_session();
    session.start();
    session.advance(Duration::ZERO);
    let id = sole_notification_id(&session);
    let placeholder = session.notifications()[0].masked_placeholder.clone();

    assert_eq!(session.notifications()[0].display_body(), placeholder);
    assert_eq!(
        session.handle_action(id, Action::View),
        ActionOutcome::Toggled { revealed: true }
    );
    assert_eq!(
        session.notifications()[0].display_body(),
        "send me your photos"
    );
    assert_eq!(
        session.handle_action(id, Action::Hide),
        ActionOutcome::Toggled { revealed: false }
    );
    assert_eq!(session.notifications()[0].display_body(), placeholder);

    let state = session.state();
    assert_eq!(state.correct_count, 0);
    assert_eq!(state.incorrect_count, 0);
    assert_eq!(state.current_scenario_index, 0);
    assert!(session.feedback().is_none());
}

#[test]
fn duplicate_terminal_action_does_not_double_count() {
    let mut session = instant_session();
    session.start();
    session.advance(Duration::ZERO);
    let id = sole_notification_id(&session);

    session.handle_action(id, Action::Reject);
    assert_eq!(session.handle_action(id, Action::Reject), ActionOutcome::Ignored);
    assert_eq!(session.handle_action(id, Action::Accept), ActionOutcome::Ignored);
    assert_eq!(session.state().correct_count, 1);
    assert_eq!(session.state().incorrect_count, 0);
}

#[test]
fn actions_on_resolved_ids_after_progression_are_ignored() {
    let mut session = instant_session();
    session.start();
    session.advance(Duration::ZERO);
    let id0 = sole_notification_id(&session);
    session.handle_action(id0, Action::Reject);
    session.advance(Duration::ZERO);

    // Scenario 1 is live; the old id must stay inert.
    assert_eq!(session.handle_action(id0, Action::Accept), ActionOutcome::Ignored);
    assert_eq!(session.state().correct_count, 1);
    assert_eq!(session.state().incorrect_count, 0);
}

#[test]
fn production_delays_gate_arrival_feedback_and_completion() {
    let timing = TimingConfig {
        arrival_delay: Duration::from_millis(1_500),
        success_feedback: Duration::from_millis(2_500),
        error_feedback: Duration::from_millis(3_000),
        completion_delay: Duration::from_millis(1_000),
    };
    let mut session = SafetySession::new(two_scenario_catalog(), timing);
    session.start();

    // Nothing visible before the arrival delay elapses.
    assert!(session.advance(Duration::from_millis(1_499)).is_empty());
    assert!(session.notifications().is_empty());
    assert_eq!(session.advance(Duration::from_millis(1)).len(), 1);
    let id0 = sole_notification_id(&session);

    session.handle_action(id0, Action::Reject);
    assert!(session.feedback().is_some());

    // Success feedback holds for 2.5s, then the next arrival takes 1.5s.
    assert!(session.advance(Duration::from_millis(2_499)).is_empty());
    assert!(session.feedback().is_some());
    let events = session.advance(Duration::from_millis(1));
    assert_eq!(events, vec![EngineEvent::FeedbackElapsed]);
    assert!(session.feedback().is_none());
    assert!(session.notifications().is_empty());
    session.advance(Duration::from_millis(1_500));
    let id1 = sole_notification_id(&session);

    // Wrong decision holds the error window (3.0s) before completion (1.0s).
    session.handle_action(id1, Action::Reject);
    assert_eq!(session.state().incorrect_count, 1);
    assert!(session.advance(Duration::from_millis(2_999)).is_empty());
    session.advance(Duration::from_millis(1));
    assert!(!session.state().finished);
    assert!(session.advance(Duration::from_millis(999)).is_empty());
    let events = session.advance(Duration::from_millis(1));
    assert_eq!(events, vec![EngineEvent::Finished]);
    assert!(session.state().finished);
}

#[test]
fn restart_mid_run_drops_in_flight_deliveries() {
    let timing = TimingConfig {
        arrival_delay: Duration::from_millis(1_500),
        success_feedback: Duration::from_millis(2_500),
        error_feedback: Duration::from_millis(3_000),
        completion_delay: Duration::from_millis(1_000),
    };
    let mut session = SafetySession::new(two_scenario_catalog(), timing);
    session.start();
    session.advance(Duration::from_millis(1_500));
    let id0 = sole_notification_id(&session);
    session.handle_action(id0, Action::Reject);

    // Scenario 1's arrival is now pending behind the feedback window.
    session.restart();
    let state = session.state();
    assert_eq!(state.correct_count, 0);
    assert_eq!(state.current_scenario_index, 0);
    assert!(session.feedback().is_none());
    assert!(session.notifications().is_empty());

    // Run far past every abandoned delay: only the new run's scenario 0 may
    // appear, exactly once.
    session.advance(Duration::from_millis(10_000));
    assert_eq!(session.notifications().len(), 1);
    assert_eq!(session.notifications()[0].scenario_index, 0);
    assert_eq!(session.state().current_scenario_index, 0);
}

#[test]
fn restart_from_finished_reenters_running() {
    let mut session = instant_session();
    session.start();
    for _ in 0..2 {
        session.advance(Duration::ZERO);
        let id = session.notifications()[0].id;
        session.handle_action(id, Action::Reject);
    }
    session.advance(Duration::ZERO);
    assert_eq!(session.phase(), SessionPhase::Finished);

    session.restart();
    assert_eq!(session.phase(), SessionPhase::Running);
    session.advance(Duration::ZERO);
    assert_eq!(session.notifications()[0].scenario_index, 0);
}

#[test]
fn engine_correctness_agrees_with_catalog_labels() {
    let catalog = ScenarioCatalog::builtin();
    catalog.validate().unwrap();
    for (index, scenario) in catalog.scenarios.iter().enumerate() {
        let single = ScenarioCatalog::from_scenarios(vec![scenario.clone()]);
        let mut session = SafetySession::new(single, TimingConfig::instant());
        session.start();
        session.advance(Duration::ZERO);
        let id = session.notifications()[0].id;
        let action = match scenario.correct_action {
            CorrectAction::Accept => Action::Accept,
            CorrectAction::Reject => Action::Reject,
        };
        let outcome = session.handle_action(id, action);
        assert_eq!(
            outcome,
            ActionOutcome::Resolved {
                kind: scenario.kind,
                correct: true
            },
            "catalog entry {index} disagrees with the decision engine"
        );
    }
}
