use super::*;

#[test]
fn repeating_task_stays_armed_across_fires() {
    let state = TaskState::Armed;
    let state = state.transition(ScheduleKind::Repeating, TaskEvent::Fired);
    assert_eq!(state, TaskState::Armed);
    let state = state.transition(ScheduleKind::Repeating, TaskEvent::Fired);
    assert_eq!(state, TaskState::Armed);
    assert!(state.is_armed());
}

#[test]
fn one_shot_task_is_consumed_after_first_fire() {
    let state = TaskState::Armed.transition(ScheduleKind::OneShot, TaskEvent::Fired);
    assert_eq!(state, TaskState::OneShotConsumed);
    assert!(!state.is_armed());

    // Terminal: further events change nothing.
    let state = state.transition(ScheduleKind::OneShot, TaskEvent::Fired);
    assert_eq!(state, TaskState::OneShotConsumed);
    let state = state.transition(ScheduleKind::OneShot, TaskEvent::Disable);
    assert_eq!(state, TaskState::OneShotConsumed);
}

#[test]
fn disable_disarms_an_armed_task() {
    let state = TaskState::Armed.transition(ScheduleKind::Repeating, TaskEvent::Disable);
    assert_eq!(state, TaskState::Disarmed);
    assert!(!state.is_armed());
}

#[test]
fn disarmed_is_terminal() {
    let state = TaskState::Disarmed;
    assert_eq!(
        state.transition(ScheduleKind::Repeating, TaskEvent::Fired),
        TaskState::Disarmed
    );
    assert_eq!(
        state.transition(ScheduleKind::Repeating, TaskEvent::Disable),
        TaskState::Disarmed
    );
}

#[test]
fn manual_task_fires_without_consuming() {
    let state = TaskState::Armed.transition(ScheduleKind::None, TaskEvent::Fired);
    assert_eq!(state, TaskState::Armed);
}
