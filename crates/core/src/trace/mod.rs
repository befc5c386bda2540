//! Operation-scoped animation traces.
//!
//! Every engine call that takes an `animate` flag builds a fresh [`EventLog`],
//! threads it by `&mut` through its recursion, and hands the recorded events
//! back in a [`Traced`] value. Logs are never shared between calls.

mod kind;

use serde::{Deserialize, Serialize};

pub use kind::{
    BalanceStep, DeleteStep, EventKind, ExtractStep, HeapInsertStep, HeapifyStep, InsertStep, RotationCase,
    RotationDirection, RotationStep, SearchStep, SiftDownStep, SiftUpStep, StackFrame, SwapStep,
    TraversalOrder, TraversalStep,
};

/// A single recorded micro-step together with its human-readable narration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationEvent {
    #[serde(flatten)]
    pub kind: EventKind,
    pub message: String,
}

impl AnimationEvent {
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn step_name(&self) -> Option<&'static str> {
        self.kind.step_name()
    }
}

/// Shorthand for [`AnimationEvent::new`], used at every recording site.
pub fn event(kind: EventKind, message: impl Into<String>) -> AnimationEvent {
    AnimationEvent::new(kind, message)
}

/// Append-only recorder for one operation.
///
/// A disabled log drops everything and never runs the closures passed to
/// [`EventLog::emit`], so snapshots and messages cost nothing when the caller
/// did not ask for animation.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    enabled: bool,
    events: Vec<AnimationEvent>,
}

impl EventLog {
    pub fn new(animate: bool) -> Self {
        Self {
            enabled: animate,
            events: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn push(&mut self, event: AnimationEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    /// Records the event built by `build` when the log is enabled.
    pub fn emit<F>(&mut self, build: F)
    where
        F: FnOnce() -> AnimationEvent,
    {
        if self.enabled {
            self.events.push(build());
        }
    }

    pub fn events(&self) -> &[AnimationEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<AnimationEvent> {
        self.events
    }
}

/// Result of an operation plus the complete trace that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Traced<T> {
    pub output: T,
    pub events: Vec<AnimationEvent>,
}

impl<T> Traced<T> {
    pub fn new(output: T, log: EventLog) -> Self {
        Self {
            output,
            events: log.into_events(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_log_skips_builders() {
        let mut log = EventLog::disabled();
        log.emit(|| panic!("builder must not run"));
        assert!(log.is_empty());
    }

    #[test]
    fn enabled_log_keeps_order() {
        let mut log = EventLog::new(true);
        log.emit(|| event(EventKind::Message, "first"));
        log.emit(|| event(EventKind::Complete, "second"));

        let traced = Traced::new(3, log);
        assert_eq!(traced.output, 3);
        let messages: Vec<_> = traced.events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);
    }

    #[test]
    fn events_serialize_with_type_and_step_tags() {
        let ev = event(
            EventKind::Swap {
                step: SwapStep::BeforeSwap,
                indices: [0, 1],
                values: [5, 3],
            },
            "Swapping 5 and 3",
        );

        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "swap");
        assert_eq!(json["step"], "beforeSwap");
        assert_eq!(json["message"], "Swapping 5 and 3");

        let back: AnimationEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, ev);
    }

    #[test]
    fn step_names_match_wire_tags() {
        let kind = EventKind::Balance {
            step: BalanceStep::Imbalance,
            node: crate::tree::NodeRef {
                id: crate::tree::NodeId(1),
                value: 30,
            },
            balance_factor: 2,
            case: Some(RotationCase::LL),
        };
        assert_eq!(kind.type_name(), "balance");
        assert_eq!(kind.step_name(), Some("imbalance"));
        assert_eq!(EventKind::ResetStack.step_name(), None);
    }
}
