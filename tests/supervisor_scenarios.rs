//! Scenario tests for the channel supervisor and command router.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use camsup::channel::ChannelSupervisor;
use camsup::command::Mode;
use camsup::process::{
    LaunchError, ProcessControl, ProcessHandle, ProcessSpec, TerminationOutcome,
};
use camsup::router::CommandRouter;

#[derive(Debug, Clone, PartialEq)]
enum ControlCall {
    Launch(ProcessSpec),
    Terminate(ProcessHandle, Mode),
}

/// `ProcessControl` that records calls instead of touching the OS.
#[derive(Clone, Default)]
struct RecordingControl {
    calls: Rc<RefCell<Vec<ControlCall>>>,
    next_pid: Rc<Cell<u32>>,
    fail_launch: bool,
    fail_terminate: bool,
}

impl RecordingControl {
    fn new() -> Self {
        Self::default()
    }

    fn calls(&self) -> Vec<ControlCall> {
        self.calls.borrow().clone()
    }
}

impl ProcessControl for RecordingControl {
    fn launch(&mut self, spec: &ProcessSpec) -> Result<ProcessHandle, LaunchError> {
        if self.fail_launch {
            return Err(LaunchError::NotFound);
        }
        self.calls
            .borrow_mut()
            .push(ControlCall::Launch(spec.clone()));
        let pid = self.next_pid.get() + 1;
        self.next_pid.set(pid);
        Ok(ProcessHandle::new(pid))
    }

    fn terminate(&mut self, handle: ProcessHandle, mode: Mode) -> TerminationOutcome {
        self.calls
            .borrow_mut()
            .push(ControlCall::Terminate(handle, mode));
        if self.fail_terminate {
            TerminationOutcome::Failed
        } else {
            TerminationOutcome::Requested
        }
    }
}

fn supervisor(control: &RecordingControl) -> ChannelSupervisor<RecordingControl> {
    ChannelSupervisor::new("claw", control.clone())
}

#[test]
fn unrecognized_command_changes_nothing() {
    let control = RecordingControl::new();
    let mut sup = supervisor(&control);

    for bogus in ["bogus", "OFF", " view", "vision\n", ""] {
        sup.transition(bogus).unwrap();
    }

    assert_eq!(sup.mode(), Mode::Off);
    assert!(sup.handle().is_none());
    assert!(control.calls().is_empty());
}

#[test]
fn off_when_already_off_is_a_no_op() {
    let control = RecordingControl::new();
    let mut sup = supervisor(&control);

    sup.transition("off").unwrap();

    assert_eq!(sup.mode(), Mode::Off);
    assert!(control.calls().is_empty());
}

#[test]
fn repeated_command_is_idempotent() {
    let control = RecordingControl::new();
    let mut sup = supervisor(&control);

    sup.transition("vision").unwrap();
    sup.transition("vision").unwrap();

    assert_eq!(sup.mode(), Mode::VisionActive);
    assert_eq!(
        control.calls(),
        vec![ControlCall::Launch(ProcessSpec::vision().clone())]
    );
}

#[test]
fn handle_present_exactly_when_active() {
    let control = RecordingControl::new();
    let mut sup = supervisor(&control);

    assert!(sup.handle().is_none());

    sup.transition("view").unwrap();
    assert_eq!(sup.mode(), Mode::Viewing);
    assert!(sup.handle().is_some());

    sup.transition("vision").unwrap();
    assert_eq!(sup.mode(), Mode::VisionActive);
    assert!(sup.handle().is_some());

    sup.transition("off").unwrap();
    assert_eq!(sup.mode(), Mode::Off);
    assert!(sup.handle().is_none());
}

#[test]
fn mode_switch_terminates_before_launching() {
    let control = RecordingControl::new();
    let mut sup = supervisor(&control);

    sup.transition("view").unwrap();
    let viewing_pid = sup.handle().unwrap();
    sup.transition("vision").unwrap();

    assert_eq!(
        control.calls(),
        vec![
            ControlCall::Launch(ProcessSpec::viewing().clone()),
            ControlCall::Terminate(viewing_pid, Mode::Viewing),
            ControlCall::Launch(ProcessSpec::vision().clone()),
        ]
    );
    assert_eq!(sup.mode(), Mode::VisionActive);
    assert_ne!(sup.handle(), Some(viewing_pid));
}

#[test]
fn off_terminates_with_the_stopped_modes_strategy() {
    let control = RecordingControl::new();
    let mut sup = supervisor(&control);

    sup.transition("vision").unwrap();
    let pid = sup.handle().unwrap();
    sup.transition("off").unwrap();

    assert_eq!(
        control.calls(),
        vec![
            ControlCall::Launch(ProcessSpec::vision().clone()),
            ControlCall::Terminate(pid, Mode::VisionActive),
        ]
    );
    assert_eq!(sup.mode(), Mode::Off);
    assert!(sup.handle().is_none());
}

#[test]
fn failed_termination_still_clears_state_and_launches() {
    let control = RecordingControl {
        fail_terminate: true,
        ..RecordingControl::new()
    };
    let mut sup = supervisor(&control);

    sup.transition("view").unwrap();
    sup.transition("vision").unwrap();

    // The model is optimistic: the stop is assumed to have worked.
    assert_eq!(sup.mode(), Mode::VisionActive);
    assert!(sup.handle().is_some());
}

#[test]
fn launch_failure_is_surfaced_as_fatal_error() {
    let control = RecordingControl {
        fail_launch: true,
        ..RecordingControl::new()
    };
    let mut sup = supervisor(&control);

    let result = sup.transition("view");

    assert!(matches!(result, Err(LaunchError::NotFound)));
    assert_eq!(sup.mode(), Mode::Off);
    assert!(sup.handle().is_none());
}

#[test]
fn full_command_scenario() {
    let control = RecordingControl::new();
    let mut sup = supervisor(&control);

    // Off -> vision: one launch with the vision spec.
    sup.transition("vision").unwrap();
    assert_eq!(sup.mode(), Mode::VisionActive);
    assert_eq!(control.calls().len(), 1);

    // vision again: no new calls.
    sup.transition("vision").unwrap();
    assert_eq!(control.calls().len(), 1);

    // vision -> view: terminate with the vision strategy, then launch viewing.
    let vision_pid = sup.handle().unwrap();
    sup.transition("view").unwrap();
    assert_eq!(sup.mode(), Mode::Viewing);
    assert_eq!(
        control.calls()[1],
        ControlCall::Terminate(vision_pid, Mode::VisionActive)
    );
    assert_eq!(
        control.calls()[2],
        ControlCall::Launch(ProcessSpec::viewing().clone())
    );

    // view -> off: terminate with the viewing strategy, no launch.
    let viewing_pid = sup.handle().unwrap();
    sup.transition("off").unwrap();
    assert_eq!(sup.mode(), Mode::Off);
    assert_eq!(
        control.calls()[3],
        ControlCall::Terminate(viewing_pid, Mode::Viewing)
    );
    assert_eq!(control.calls().len(), 4);

    // bogus: nothing at all.
    sup.transition("bogus").unwrap();
    assert_eq!(sup.mode(), Mode::Off);
    assert_eq!(control.calls().len(), 4);
}

#[test]
fn router_drives_only_the_matching_channel() {
    let claw_control = RecordingControl::new();
    let cargo_control = RecordingControl::new();

    let mut router = CommandRouter::new();
    router.add_channel(ChannelSupervisor::new("claw", claw_control.clone()));
    router.add_channel(ChannelSupervisor::new("cargo", cargo_control.clone()));

    router
        .route("/camera/controls/claw/set", b"vision")
        .unwrap();

    let claw = router.channels().find(|c| c.name() == "claw").unwrap();
    let cargo = router.channels().find(|c| c.name() == "cargo").unwrap();
    assert_eq!(claw.mode(), Mode::VisionActive);
    assert_eq!(cargo.mode(), Mode::Off);
    assert_eq!(claw_control.calls().len(), 1);
    assert!(cargo_control.calls().is_empty());
}

#[test]
fn router_second_topic_segment_is_not_interpreted() {
    let control = RecordingControl::new();
    let mut router = CommandRouter::new();
    router.add_channel(ChannelSupervisor::new("claw", control.clone()));

    router
        .route("/camera/controls/claw/anything-at-all", b"view")
        .unwrap();

    let claw = router.channels().next().unwrap();
    assert_eq!(claw.mode(), Mode::Viewing);
}

#[test]
fn router_drops_unmatched_topics_and_bad_payloads() {
    let control = RecordingControl::new();
    let mut router = CommandRouter::new();
    router.add_channel(ChannelSupervisor::new("claw", control.clone()));

    router
        .route("/camera/controls/cargo/set", b"vision")
        .unwrap();
    router.route("/camera/status/claw/set", b"vision").unwrap();
    router
        .route("/camera/controls/claw/set", &[0xff, 0xfe])
        .unwrap();

    let claw = router.channels().next().unwrap();
    assert_eq!(claw.mode(), Mode::Off);
    assert!(control.calls().is_empty());
}
