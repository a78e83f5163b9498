//! Consumer-side debouncing: hold-to-confirm and hover dwell.
//!
//! The classifier has no memory. Games that need a stable signal wrap
//! the per-frame value in one of these trackers, each with its own dwell.

use tracing::debug;

// ── Hold to confirm ────────────────────────────────────────

/// Accepts a value once it has stayed unchanged for `hold_ms`.
///
/// Fires once per continuous hold. Changing or losing the value re-arms
/// the tracker.
#[derive(Debug, Clone)]
pub struct HoldToConfirm<T> {
    hold_ms: f64,
    candidate: Option<T>,
    held_ms: f64,
    fired: bool,
}

impl<T: Copy + PartialEq + std::fmt::Debug> HoldToConfirm<T> {
    pub fn new(hold_ms: f64) -> Self {
        Self {
            hold_ms,
            candidate: None,
            held_ms: 0.0,
            fired: false,
        }
    }

    /// Feed this frame's value. Returns the value on the frame the hold
    /// completes.
    pub fn update(&mut self, value: Option<T>, dt_ms: f64) -> Option<T> {
        if value.is_none() || value != self.candidate {
            self.candidate = value;
            self.held_ms = 0.0;
            self.fired = false;
            return None;
        }

        self.held_ms += dt_ms;
        if !self.fired && self.held_ms > self.hold_ms {
            self.fired = true;
            debug!("Hold confirmed: {:?} after {:.0} ms", value, self.held_ms);
            return value;
        }
        None
    }

    /// How far through the hold the current candidate is, 0.0-1.0.
    pub fn progress(&self) -> f32 {
        if self.candidate.is_none() || self.hold_ms <= 0.0 {
            return 0.0;
        }
        (self.held_ms / self.hold_ms).min(1.0) as f32
    }

    pub fn reset(&mut self) {
        self.candidate = None;
        self.held_ms = 0.0;
        self.fired = false;
    }
}

// ── Hover dwell ────────────────────────────────────────────

/// A selectable spot on the interaction surface.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverTarget {
    pub id: u32,
    /// Centre in normalized surface coordinates.
    pub center: [f32; 2],
}

/// Selects a target once the cursor has hovered within `radius` of it
/// for more than `frames_required` consecutive frames.
#[derive(Debug, Clone)]
pub struct HoverDwell {
    radius: f32,
    frames_required: u32,
    targets: Vec<HoverTarget>,
    hover_frames: Vec<u32>,
}

impl HoverDwell {
    pub fn new(radius: f32, frames_required: u32) -> Self {
        Self {
            radius,
            frames_required,
            targets: Vec::new(),
            hover_frames: Vec::new(),
        }
    }

    /// Replace the target set and clear all counters.
    pub fn set_targets(&mut self, targets: Vec<HoverTarget>) {
        self.hover_frames = vec![0; targets.len()];
        self.targets = targets;
    }

    pub fn targets(&self) -> &[HoverTarget] {
        &self.targets
    }

    /// Feed this frame's cursor. `None` (no hand) leaves counters as they
    /// are. Returns the id of a target whose dwell completed.
    pub fn update(&mut self, cursor: Option<[f32; 2]>) -> Option<u32> {
        let cursor = cursor?;
        let mut selected = None;
        for (target, frames) in self.targets.iter().zip(self.hover_frames.iter_mut()) {
            let dx = cursor[0] - target.center[0];
            let dy = cursor[1] - target.center[1];
            if (dx * dx + dy * dy).sqrt() < self.radius {
                *frames += 1;
                if *frames > self.frames_required && selected.is_none() {
                    selected = Some(target.id);
                }
            } else {
                *frames = 0;
            }
        }
        if let Some(id) = selected {
            debug!("Hover dwell selected target {}", id);
        }
        selected
    }

    /// Frames the cursor has spent on a target.
    pub fn hover_frames(&self, id: u32) -> u32 {
        self.targets
            .iter()
            .position(|t| t.id == id)
            .map(|i| self.hover_frames[i])
            .unwrap_or(0)
    }

    /// Clear the counter for one target (after a wrong selection).
    pub fn clear(&mut self, id: u32) {
        if let Some(i) = self.targets.iter().position(|t| t.id == id) {
            self.hover_frames[i] = 0;
        }
    }

    pub fn reset(&mut self) {
        self.hover_frames.iter_mut().for_each(|f| *f = 0);
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_fires_after_duration() {
        let mut hold = HoldToConfirm::new(1000.0);
        assert_eq!(hold.update(Some(3u8), 33.0), None); // first sighting
        for _ in 0..30 {
            assert_eq!(hold.update(Some(3), 33.0), None);
        }
        // 30 * 33 = 990 ms held so far
        assert_eq!(hold.update(Some(3), 33.0), Some(3));
    }

    #[test]
    fn test_hold_fires_once_per_hold() {
        let mut hold = HoldToConfirm::new(100.0);
        hold.update(Some(2u8), 60.0);
        hold.update(Some(2), 60.0);
        assert_eq!(hold.update(Some(2), 60.0), Some(2));
        assert_eq!(hold.update(Some(2), 50.0), None);
        assert_eq!(hold.update(Some(2), 500.0), None);
    }

    #[test]
    fn test_hold_must_exceed_duration() {
        let mut hold = HoldToConfirm::new(100.0);
        hold.update(Some(5u8), 25.0);
        for _ in 0..4 {
            assert_eq!(hold.update(Some(5), 25.0), None);
        }
        // Exactly 100 ms held: not yet
        assert_eq!(hold.progress(), 1.0);
        assert_eq!(hold.update(Some(5), 1.0), Some(5));
    }

    #[test]
    fn test_hold_resets_on_change() {
        let mut hold = HoldToConfirm::new(100.0);
        hold.update(Some(2u8), 16.0);
        hold.update(Some(2), 90.0);
        assert!(hold.progress() > 0.8);

        assert_eq!(hold.update(Some(4), 16.0), None);
        assert_eq!(hold.progress(), 0.0);
        assert_eq!(hold.update(Some(4), 50.0), None);
        assert_eq!(hold.update(Some(4), 60.0), Some(4));
    }

    #[test]
    fn test_hold_resets_on_no_value() {
        let mut hold = HoldToConfirm::new(100.0);
        hold.update(Some(1u8), 16.0);
        hold.update(Some(1), 90.0);
        assert_eq!(hold.update(None, 16.0), None);
        assert_eq!(hold.update(Some(1), 16.0), None);
        assert_eq!(hold.update(Some(1), 50.0), None);
    }

    #[test]
    fn test_hover_selects_after_frames() {
        let mut hover = HoverDwell::new(0.1, 3);
        hover.set_targets(vec![
            HoverTarget { id: 7, center: [0.2, 0.5] },
            HoverTarget { id: 9, center: [0.8, 0.5] },
        ]);
        for _ in 0..3 {
            assert_eq!(hover.update(Some([0.21, 0.5])), None);
        }
        assert_eq!(hover.hover_frames(7), 3);
        assert_eq!(hover.update(Some([0.21, 0.5])), Some(7));
        assert_eq!(hover.hover_frames(9), 0);
    }

    #[test]
    fn test_hover_leaving_resets() {
        let mut hover = HoverDwell::new(0.1, 2);
        hover.set_targets(vec![HoverTarget { id: 1, center: [0.5, 0.5] }]);
        hover.update(Some([0.5, 0.5]));
        hover.update(Some([0.5, 0.5]));
        hover.update(Some([0.9, 0.9]));
        assert_eq!(hover.hover_frames(1), 0);
    }

    #[test]
    fn test_hover_no_hand_holds_counters() {
        let mut hover = HoverDwell::new(0.1, 2);
        hover.set_targets(vec![HoverTarget { id: 1, center: [0.5, 0.5] }]);
        hover.update(Some([0.5, 0.5]));
        assert_eq!(hover.update(None), None);
        assert_eq!(hover.hover_frames(1), 1);

        hover.clear(1);
        assert_eq!(hover.hover_frames(1), 0);
    }
}
