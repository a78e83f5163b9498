//! Single-subscriber gesture channel.
//!
//! The pipeline owns exactly one consumer slot. Each camera frame is
//! classified once and the resulting event is delivered synchronously
//! before the next frame is accepted. Switching consumers stops and
//! detaches the previous one first, so a torn-down game never sees
//! another event or timer tick.

use tracing::{debug, info};

use super::classifier::{classify, GestureEvent};
use super::landmarks::HandFrame;

/// Something that reacts to per-frame gesture events.
pub trait GestureConsumer {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Called once when attached to the pipeline.
    fn start(&mut self) {}

    /// Handle one frame's event. Must not block.
    fn on_gesture(&mut self, event: &GestureEvent);

    /// Advance consumer-owned timers by `dt_ms`.
    fn tick(&mut self, _dt_ms: f64) {}

    /// Cancel pending timers and release per-game state.
    fn stop(&mut self) {}

    /// Plist describing the consumer's current state.
    fn status_sexp(&self) -> String {
        format!("(:consumer \"{}\")", self.name())
    }
}

/// Routes classified frames to the one active consumer.
#[derive(Default)]
pub struct GesturePipeline {
    consumer: Option<Box<dyn GestureConsumer>>,
    /// Frames classified since construction.
    frames: u64,
    /// Last event delivered (kept for read-only inspection).
    last_event: Option<GestureEvent>,
}

impl GesturePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active consumer. The previous consumer is stopped
    /// before the new one is attached and started, and is handed back to
    /// the caller.
    pub fn switch_to(
        &mut self,
        mut consumer: Box<dyn GestureConsumer>,
    ) -> Option<Box<dyn GestureConsumer>> {
        let previous = self.detach();
        info!("Gesture consumer attached: {}", consumer.name());
        consumer.start();
        self.consumer = Some(consumer);
        previous
    }

    /// Stop and remove the active consumer, if any.
    pub fn detach(&mut self) -> Option<Box<dyn GestureConsumer>> {
        let mut previous = self.consumer.take()?;
        previous.stop();
        info!("Gesture consumer detached: {}", previous.name());
        Some(previous)
    }

    /// Name of the active consumer.
    pub fn active(&self) -> Option<&'static str> {
        self.consumer.as_ref().map(|c| c.name())
    }

    /// Classify one frame and deliver the event. Returns the event so the
    /// caller can inspect it without subscribing.
    pub fn on_frame(&mut self, frame: &HandFrame) -> &GestureEvent {
        let event = classify(frame);
        self.frames += 1;
        match self.consumer.as_mut() {
            Some(consumer) => consumer.on_gesture(&event),
            None => debug!("Gesture {} dropped: no consumer", event.label),
        }
        self.last_event.insert(event)
    }

    /// Forward elapsed time to the active consumer.
    pub fn tick(&mut self, dt_ms: f64) {
        if let Some(consumer) = self.consumer.as_mut() {
            consumer.tick(dt_ms);
        }
    }

    /// Status plist of the active consumer, `nil` when none is attached.
    pub fn status_sexp(&self) -> String {
        self.consumer
            .as_ref()
            .map_or_else(|| "nil".to_string(), |c| c.status_sexp())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_event(&self) -> Option<&GestureEvent> {
        self.last_event.as_ref()
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::classifier::{make_pose, GestureLabel};
    use crate::hand::landmarks::Handedness;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records what it receives into a shared log.
    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl GestureConsumer for Probe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn start(&mut self) {
            self.log.borrow_mut().push(format!("{}:start", self.name));
        }

        fn on_gesture(&mut self, event: &GestureEvent) {
            self.log
                .borrow_mut()
                .push(format!("{}:{}", self.name, event.label));
        }

        fn tick(&mut self, dt_ms: f64) {
            self.log
                .borrow_mut()
                .push(format!("{}:tick {:.0}", self.name, dt_ms));
        }

        fn stop(&mut self) {
            self.log.borrow_mut().push(format!("{}:stop", self.name));
        }
    }

    fn probe(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn GestureConsumer> {
        Box::new(Probe {
            name,
            log: Rc::clone(log),
        })
    }

    #[test]
    fn test_no_consumer_still_classifies() {
        let mut pipeline = GesturePipeline::new();
        let event = pipeline.on_frame(&HandFrame::NoHand);
        assert_eq!(event.label, GestureLabel::Unknown);
        assert_eq!(pipeline.frames(), 1);
        assert!(pipeline.active().is_none());
    }

    #[test]
    fn test_single_delivery_per_frame() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = GesturePipeline::new();
        pipeline.switch_to(probe("a", &log));

        let fist = make_pose(Handedness::Right, false, 0.0, [false; 4]);
        pipeline.on_frame(&HandFrame::Hand(fist));
        pipeline.on_frame(&HandFrame::NoHand);

        assert_eq!(*log.borrow(), vec!["a:start", "a:fist", "a:unknown"]);
        assert_eq!(pipeline.last_event().map(|e| e.label), Some(GestureLabel::Unknown));
    }

    #[test]
    fn test_switch_stops_previous_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = GesturePipeline::new();
        assert!(pipeline.switch_to(probe("a", &log)).is_none());

        let previous = pipeline.switch_to(probe("b", &log));
        assert_eq!(previous.map(|c| c.name()), Some("a"));
        assert_eq!(pipeline.active(), Some("b"));

        pipeline.on_frame(&HandFrame::NoHand);
        pipeline.tick(16.0);
        assert_eq!(
            *log.borrow(),
            vec!["a:start", "a:stop", "b:start", "b:unknown", "b:tick 16"]
        );
        assert_eq!(pipeline.status_sexp(), "(:consumer \"b\")");
    }

    #[test]
    fn test_detach_silences_consumer() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = GesturePipeline::new();
        pipeline.switch_to(probe("a", &log));
        assert!(pipeline.detach().is_some());
        assert!(pipeline.detach().is_none());

        pipeline.on_frame(&HandFrame::NoHand);
        pipeline.tick(16.0);
        assert_eq!(*log.borrow(), vec!["a:start", "a:stop"]);
    }
}
