//! The simpler games: finger counting, thumbs-up/down choice and
//! hover-to-select.
//!
//! All three consume the same gesture events as the tracing game and run
//! their own rounds: present a puzzle, wait for an accepted answer, react,
//! then move on after a delay. Timers live on a per-game scheduler that
//! `stop` cancels. Time arrives through `tick`; the driver ticks before
//! delivering each frame, and the elapsed time is consumed by the next
//! `on_gesture`.

use tracing::{debug, info, warn};

use crate::hand::channel::GestureConsumer;
use crate::hand::classifier::{GestureEvent, GestureLabel};
use crate::hand::dwell::{HoldToConfirm, HoverDwell, HoverTarget};
use crate::playback::{PlaybackRequest, PlaybackSink};
use crate::scheduler::Scheduler;
use crate::sexp::format_plist;
use crate::trace::cursor::CursorConfig;

// ── Configuration ──────────────────────────────────────────

/// Dwell and pacing for the round-based games.
#[derive(Debug, Clone, PartialEq)]
pub struct DwellConfig {
    /// How long a matching finger count must be held.
    pub count_hold_ms: f64,
    /// Consecutive frames a hover must exceed to select.
    pub hover_frames: u32,
    /// Hover radius in normalized cursor units.
    pub hover_radius: f32,
    /// Pause after a correct answer before the next round.
    pub round_delay_ms: f64,
    /// Lockout after a wrong answer.
    pub retry_delay_ms: f64,
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            count_hold_ms: 1000.0,
            hover_frames: 15,
            hover_radius: 0.06,
            round_delay_ms: 3000.0,
            retry_delay_ms: 2000.0,
        }
    }
}

// ── Shared round bookkeeping ───────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Correct,
    Wrong,
}

impl RoundOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Wrong => "wrong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundTask {
    NextRound,
    Unlock,
}

#[derive(Debug)]
struct RoundCore {
    game: &'static str,
    timers: Scheduler<RoundTask>,
    pending_dt: f64,
    running: bool,
    /// No answers are accepted while locked.
    locked: bool,
    round: usize,
    score: u32,
    attempts: u32,
    last_outcome: Option<RoundOutcome>,
}

impl RoundCore {
    fn new(game: &'static str) -> Self {
        Self {
            game,
            timers: Scheduler::new(),
            pending_dt: 0.0,
            running: false,
            locked: false,
            round: 0,
            score: 0,
            attempts: 0,
            last_outcome: None,
        }
    }

    fn begin(&mut self) {
        self.timers.cancel_all();
        self.pending_dt = 0.0;
        self.running = true;
        self.locked = false;
        self.round = 0;
        self.score = 0;
        self.attempts = 0;
        self.last_outcome = None;
        info!("{}: started", self.game);
    }

    fn accepting(&self) -> bool {
        self.running && !self.locked
    }

    fn take_dt(&mut self) -> f64 {
        std::mem::take(&mut self.pending_dt)
    }

    fn tick(&mut self, dt_ms: f64) -> Vec<RoundTask> {
        if !self.running {
            return Vec::new();
        }
        self.pending_dt += dt_ms;
        self.timers.advance(dt_ms)
    }

    fn correct(&mut self, next_round_ms: f64) {
        self.attempts += 1;
        self.score += 1;
        self.locked = true;
        self.last_outcome = Some(RoundOutcome::Correct);
        info!("{}: round {} correct, score {}", self.game, self.round, self.score);
        self.timers.schedule(next_round_ms, RoundTask::NextRound);
    }

    fn wrong(&mut self, unlock_ms: f64) {
        self.attempts += 1;
        self.locked = true;
        self.last_outcome = Some(RoundOutcome::Wrong);
        info!("{}: round {} wrong answer", self.game, self.round);
        self.timers.schedule(unlock_ms, RoundTask::Unlock);
    }

    fn next_round(&mut self) {
        self.round += 1;
        self.locked = false;
        self.last_outcome = None;
        debug!("{}: round {}", self.game, self.round);
    }

    fn stop(&mut self) {
        self.timers.cancel_all();
        self.running = false;
        self.locked = false;
        info!("{}: stopped at round {}, score {}", self.game, self.round, self.score);
    }

    fn status_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("consumer", format!("\"{}\"", self.game)),
            ("round", self.round.to_string()),
            ("score", self.score.to_string()),
            ("attempts", self.attempts.to_string()),
            ("locked", if self.locked { "t" } else { "nil" }.to_string()),
            (
                "last",
                self.last_outcome
                    .map_or_else(|| "nil".to_string(), |o| format!(":{}", o.as_str())),
            ),
        ]
    }
}

/// Read-only view of a game's round state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundStatus {
    pub round: usize,
    pub score: u32,
    pub attempts: u32,
    pub locked: bool,
    pub last_outcome: Option<RoundOutcome>,
}

impl From<&RoundCore> for RoundStatus {
    fn from(core: &RoundCore) -> Self {
        Self {
            round: core.round,
            score: core.score,
            attempts: core.attempts,
            locked: core.locked,
            last_outcome: core.last_outcome,
        }
    }
}

// ── Counting ───────────────────────────────────────────────

/// Show as many fingers as the target. The count must match and be held
/// for `count_hold_ms`; other counts are simply not accepted.
pub struct CountingRound<P: PlaybackSink> {
    core: RoundCore,
    config: DwellConfig,
    targets: Vec<u8>,
    hold: HoldToConfirm<u8>,
    playback: P,
}

impl<P: PlaybackSink> CountingRound<P> {
    /// Targets are used in order and repeat. Out-of-range targets are
    /// dropped; an empty list falls back to 1 through 5.
    pub fn new(config: &DwellConfig, targets: Vec<u8>, playback: P) -> Self {
        let mut targets: Vec<u8> = targets.into_iter().filter(|t| *t <= 5).collect();
        if targets.is_empty() {
            warn!("counting: no usable targets, using 1-5");
            targets = vec![1, 2, 3, 4, 5];
        }
        Self {
            core: RoundCore::new("counting"),
            config: config.clone(),
            targets,
            hold: HoldToConfirm::new(config.count_hold_ms),
            playback,
        }
    }

    pub fn target(&self) -> u8 {
        self.targets[self.core.round % self.targets.len()]
    }

    pub fn start(&mut self) {
        self.core.begin();
        self.hold.reset();
        self.playback.play(PlaybackRequest::phrase(
            "Let's count! Show me with your fingers how many items you see.",
        ));
        self.announce();
    }

    fn announce(&mut self) {
        let text = format!("Show me {}!", self.target());
        self.playback.play(PlaybackRequest::phrase(text));
    }

    pub fn handle(&mut self, event: &GestureEvent) {
        let dt = self.core.take_dt();
        if !self.core.accepting() {
            self.hold.reset();
            return;
        }
        let target = self.target();
        let shown = (event.has_hand() && event.label.is_actionable())
            .then_some(event.extended_count)
            .filter(|n| *n == target);
        if self.hold.update(shown, dt).is_some() {
            self.hold.reset();
            self.core.correct(self.config.round_delay_ms);
            self.playback.play(PlaybackRequest::Positive);
        }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        for task in self.core.tick(dt_ms) {
            match task {
                RoundTask::NextRound => {
                    self.core.next_round();
                    self.announce();
                }
                RoundTask::Unlock => self.core.locked = false,
            }
        }
    }

    pub fn stop(&mut self) {
        self.core.stop();
        self.hold.reset();
    }

    pub fn hold_progress(&self) -> f32 {
        self.hold.progress()
    }

    pub fn status(&self) -> RoundStatus {
        RoundStatus::from(&self.core)
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }
}

impl<P: PlaybackSink> GestureConsumer for CountingRound<P> {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn start(&mut self) {
        CountingRound::start(self);
    }

    fn on_gesture(&mut self, event: &GestureEvent) {
        self.handle(event);
    }

    fn tick(&mut self, dt_ms: f64) {
        self.advance(dt_ms);
    }

    fn stop(&mut self) {
        CountingRound::stop(self);
    }

    fn status_sexp(&self) -> String {
        let mut fields = self.core.status_fields();
        fields.push(("target", self.target().to_string()));
        fields.push(("hold", format!("{:.2}", self.hold_progress())));
        format_plist(&fields)
    }
}

// ── Thumbs-up / thumbs-down choice ─────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceSide {
    Left,
    Right,
}

impl ChoiceSide {
    /// Thumbs up picks the left group, thumbs down the right.
    pub fn from_label(label: GestureLabel) -> Option<Self> {
        match label {
            GestureLabel::ThumbsUp => Some(Self::Left),
            GestureLabel::ThumbsDown => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Two groups of items; the child points out the bigger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoicePuzzle {
    pub left: u8,
    pub right: u8,
}

impl ChoicePuzzle {
    pub fn answer(&self) -> ChoiceSide {
        if self.left > self.right {
            ChoiceSide::Left
        } else {
            ChoiceSide::Right
        }
    }
}

/// Answers are taken on the first thumbs-up or thumbs-down frame; no hold.
pub struct ChoiceRound<P: PlaybackSink> {
    core: RoundCore,
    config: DwellConfig,
    puzzles: Vec<ChoicePuzzle>,
    playback: P,
}

impl<P: PlaybackSink> ChoiceRound<P> {
    /// Puzzles with equal groups have no answer and are dropped.
    pub fn new(config: &DwellConfig, puzzles: Vec<ChoicePuzzle>, playback: P) -> Self {
        let mut puzzles: Vec<ChoicePuzzle> =
            puzzles.into_iter().filter(|p| p.left != p.right).collect();
        if puzzles.is_empty() {
            warn!("choice: no usable puzzles, using built-in set");
            puzzles = vec![
                ChoicePuzzle { left: 7, right: 3 },
                ChoicePuzzle { left: 2, right: 6 },
                ChoicePuzzle { left: 9, right: 4 },
                ChoicePuzzle { left: 1, right: 5 },
            ];
        }
        Self {
            core: RoundCore::new("choice"),
            config: config.clone(),
            puzzles,
            playback,
        }
    }

    pub fn puzzle(&self) -> ChoicePuzzle {
        self.puzzles[self.core.round % self.puzzles.len()]
    }

    pub fn start(&mut self) {
        self.core.begin();
        self.announce();
    }

    fn announce(&mut self) {
        self.playback.play(PlaybackRequest::phrase(
            "Which group is bigger? Show thumbs up for Left, thumbs down for Right.",
        ));
    }

    pub fn handle(&mut self, event: &GestureEvent) {
        self.core.take_dt();
        if !self.core.accepting() {
            return;
        }
        let Some(choice) = ChoiceSide::from_label(event.label) else {
            return;
        };
        debug!("choice: picked {}", choice.as_str());
        if choice == self.puzzle().answer() {
            self.core.correct(self.config.round_delay_ms);
            self.playback.play(PlaybackRequest::Positive);
        } else {
            self.core.wrong(self.config.retry_delay_ms);
            self.playback
                .play(PlaybackRequest::phrase("Look carefully, which one has more?"));
        }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        for task in self.core.tick(dt_ms) {
            match task {
                RoundTask::NextRound => {
                    self.core.next_round();
                    self.announce();
                }
                RoundTask::Unlock => self.core.locked = false,
            }
        }
    }

    pub fn stop(&mut self) {
        self.core.stop();
    }

    pub fn status(&self) -> RoundStatus {
        RoundStatus::from(&self.core)
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }
}

impl<P: PlaybackSink> GestureConsumer for ChoiceRound<P> {
    fn name(&self) -> &'static str {
        "choice"
    }

    fn start(&mut self) {
        ChoiceRound::start(self);
    }

    fn on_gesture(&mut self, event: &GestureEvent) {
        self.handle(event);
    }

    fn tick(&mut self, dt_ms: f64) {
        self.advance(dt_ms);
    }

    fn stop(&mut self) {
        ChoiceRound::stop(self);
    }

    fn status_sexp(&self) -> String {
        let puzzle = self.puzzle();
        let mut fields = self.core.status_fields();
        fields.push(("left", puzzle.left.to_string()));
        fields.push(("right", puzzle.right.to_string()));
        format_plist(&fields)
    }
}

// ── Hover to select ────────────────────────────────────────

/// Answer bubbles on screen; the target id is the bubble's value.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverPuzzle {
    pub options: Vec<HoverTarget>,
    pub answer: u32,
}

impl HoverPuzzle {
    /// Options spread evenly along the horizontal middle of the screen.
    pub fn row(values: &[u32], answer: u32) -> Self {
        let n = values.len() as f32;
        let options = values
            .iter()
            .enumerate()
            .map(|(i, value)| HoverTarget {
                id: *value,
                center: [(i as f32 + 1.0) / (n + 1.0), 0.5],
            })
            .collect();
        Self { options, answer }
    }
}

/// Point at the right bubble with the index fingertip and hold still.
pub struct HoverRound<P: PlaybackSink> {
    core: RoundCore,
    config: DwellConfig,
    cursor: CursorConfig,
    puzzles: Vec<HoverPuzzle>,
    dwell: HoverDwell,
    playback: P,
}

impl<P: PlaybackSink> HoverRound<P> {
    pub fn new(
        config: &DwellConfig,
        cursor: CursorConfig,
        puzzles: Vec<HoverPuzzle>,
        playback: P,
    ) -> Self {
        let mut puzzles: Vec<HoverPuzzle> = puzzles
            .into_iter()
            .filter(|p| p.options.iter().any(|o| o.id == p.answer))
            .collect();
        if puzzles.is_empty() {
            warn!("hover: no usable puzzles, using built-in set");
            puzzles = vec![
                HoverPuzzle::row(&[3, 5, 4], 5),
                HoverPuzzle::row(&[2, 6, 7], 7),
                HoverPuzzle::row(&[4, 3, 8], 4),
            ];
        }
        Self {
            core: RoundCore::new("hover"),
            config: config.clone(),
            cursor,
            puzzles,
            dwell: HoverDwell::new(config.hover_radius, config.hover_frames),
            playback,
        }
    }

    pub fn puzzle(&self) -> &HoverPuzzle {
        &self.puzzles[self.core.round % self.puzzles.len()]
    }

    pub fn start(&mut self) {
        self.core.begin();
        self.playback.play(PlaybackRequest::phrase(
            "Use your finger to pop the correct bubble!",
        ));
        self.load_puzzle();
    }

    fn load_puzzle(&mut self) {
        let options = self.puzzle().options.clone();
        self.dwell.set_targets(options);
    }

    pub fn handle(&mut self, event: &GestureEvent) {
        self.core.take_dt();
        if !self.core.accepting() {
            return;
        }
        let cursor = event.pose.as_ref().map(|pose| {
            let tip = pose.get(self.cursor.landmark);
            self.cursor.project(tip.x, tip.y)
        });
        let Some(id) = self.dwell.update(cursor) else {
            return;
        };
        if id == self.puzzle().answer {
            self.core.correct(self.config.round_delay_ms);
            self.playback.play(PlaybackRequest::Positive);
        } else {
            self.dwell.clear(id);
            self.core.wrong(self.config.retry_delay_ms);
            self.playback.play(PlaybackRequest::phrase("Try again!"));
        }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        for task in self.core.tick(dt_ms) {
            match task {
                RoundTask::NextRound => {
                    self.core.next_round();
                    self.load_puzzle();
                }
                RoundTask::Unlock => self.core.locked = false,
            }
        }
    }

    pub fn stop(&mut self) {
        self.core.stop();
        self.dwell.reset();
    }

    pub fn hover_frames(&self, id: u32) -> u32 {
        self.dwell.hover_frames(id)
    }

    pub fn status(&self) -> RoundStatus {
        RoundStatus::from(&self.core)
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }
}

impl<P: PlaybackSink> GestureConsumer for HoverRound<P> {
    fn name(&self) -> &'static str {
        "hover"
    }

    fn start(&mut self) {
        HoverRound::start(self);
    }

    fn on_gesture(&mut self, event: &GestureEvent) {
        self.handle(event);
    }

    fn tick(&mut self, dt_ms: f64) {
        self.advance(dt_ms);
    }

    fn stop(&mut self) {
        HoverRound::stop(self);
    }

    fn status_sexp(&self) -> String {
        let mut fields = self.core.status_fields();
        fields.push(("answer", self.puzzle().answer.to_string()));
        format_plist(&fields)
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::classifier::{classify, make_pose};
    use crate::hand::landmarks::{HandFrame, HandPose, Handedness, Landmark, LANDMARK_COUNT};
    use crate::playback::RecordingPlayback;

    const FRAME_MS: f64 = 33.0;

    fn event(pose: HandPose) -> GestureEvent {
        classify(&HandFrame::Hand(pose))
    }

    fn three_fingers() -> GestureEvent {
        event(make_pose(Handedness::Right, false, 0.0, [true, true, true, false]))
    }

    fn two_fingers() -> GestureEvent {
        event(make_pose(Handedness::Right, false, 0.0, [true, true, false, false]))
    }

    fn thumbs_up() -> GestureEvent {
        event(make_pose(Handedness::Right, true, -0.1, [false; 4]))
    }

    fn thumbs_down() -> GestureEvent {
        event(make_pose(Handedness::Right, true, 0.1, [false; 4]))
    }

    /// Pose whose index fingertip projects onto `at` with the default
    /// mirrored cursor.
    fn pointing_at(at: [f32; 2]) -> GestureEvent {
        let raw = CursorConfig::default().unproject(at);
        let points = vec![Landmark::new(raw[0], raw[1], 0.0); LANDMARK_COUNT];
        event(HandPose::from_points(&points, Handedness::Right).unwrap())
    }

    fn frame<C: GestureConsumer>(game: &mut C, ev: &GestureEvent) {
        game.tick(FRAME_MS);
        game.on_gesture(ev);
    }

    // ── Counting ────────────────────────────────────────────

    #[test]
    fn test_counting_accepts_after_hold() {
        let mut game = CountingRound::new(&DwellConfig::default(), vec![3, 2], RecordingPlayback::new());
        game.start();
        assert_eq!(game.target(), 3);

        let ev = three_fingers();
        assert_eq!(ev.extended_count, 3);
        // First sighting plus 30 frames of 33 ms stays under one second
        for _ in 0..31 {
            frame(&mut game, &ev);
        }
        assert_eq!(game.status().score, 0);
        assert!(game.hold_progress() > 0.9 && game.hold_progress() < 1.0);
        frame(&mut game, &ev);
        assert_eq!(game.status().score, 1);
        assert_eq!(game.hold_progress(), 0.0);
        assert_eq!(game.status().last_outcome, Some(RoundOutcome::Correct));
        assert!(game.status().locked);
        assert!(game.playback().requests.contains(&PlaybackRequest::Positive));

        // Locked: holding longer scores nothing more
        for _ in 0..40 {
            frame(&mut game, &ev);
        }
        assert_eq!(game.status().score, 1);
    }

    #[test]
    fn test_counting_next_round_after_delay() {
        let mut game = CountingRound::new(&DwellConfig::default(), vec![3, 2], RecordingPlayback::new());
        game.start();
        let ev = three_fingers();
        for _ in 0..32 {
            frame(&mut game, &ev);
        }
        assert_eq!(game.status().score, 1);
        game.advance(2999.0);
        assert_eq!(game.status().round, 0);
        game.advance(1.0);
        assert_eq!(game.status().round, 1);
        assert_eq!(game.target(), 2);
        assert!(!game.status().locked);
        assert_eq!(game.playback().phrases().last(), Some(&"Show me 2!"));
    }

    #[test]
    fn test_counting_wrong_count_never_accepts() {
        let mut game = CountingRound::new(&DwellConfig::default(), vec![3], RecordingPlayback::new());
        game.start();
        let ev = two_fingers();
        for _ in 0..200 {
            frame(&mut game, &ev);
        }
        assert_eq!(game.status().score, 0);
        assert_eq!(game.status().attempts, 0);
    }

    #[test]
    fn test_counting_dropout_restarts_hold() {
        let mut game = CountingRound::new(&DwellConfig::default(), vec![3], RecordingPlayback::new());
        game.start();
        let ev = three_fingers();
        for i in 0..200 {
            if i % 20 == 19 {
                frame(&mut game, &GestureEvent::no_hand());
            } else {
                frame(&mut game, &ev);
            }
        }
        assert_eq!(game.status().score, 0);
    }

    #[test]
    fn test_counting_empty_targets_fall_back() {
        let game = CountingRound::new(&DwellConfig::default(), vec![9], RecordingPlayback::new());
        assert_eq!(game.target(), 1);
    }

    // ── Choice ──────────────────────────────────────────────

    #[test]
    fn test_choice_wrong_then_right() {
        let puzzles = vec![
            ChoicePuzzle { left: 7, right: 2 },
            ChoicePuzzle { left: 1, right: 4 },
        ];
        let mut game = ChoiceRound::new(&DwellConfig::default(), puzzles, RecordingPlayback::new());
        game.start();
        assert_eq!(game.puzzle().answer(), ChoiceSide::Left);

        frame(&mut game, &thumbs_down());
        assert_eq!(game.status().last_outcome, Some(RoundOutcome::Wrong));
        assert!(game.status().locked);
        assert_eq!(
            game.playback().phrases().last(),
            Some(&"Look carefully, which one has more?")
        );

        // Ignored while locked
        frame(&mut game, &thumbs_up());
        assert_eq!(game.status().score, 0);

        game.advance(2000.0);
        assert!(!game.status().locked);
        frame(&mut game, &thumbs_up());
        assert_eq!(game.status().score, 1);
        assert_eq!(game.status().attempts, 2);

        game.advance(3000.0);
        assert_eq!(game.status().round, 1);
        assert_eq!(game.puzzle().answer(), ChoiceSide::Right);
    }

    #[test]
    fn test_choice_ignores_other_labels() {
        let mut game = ChoiceRound::new(&DwellConfig::default(), vec![], RecordingPlayback::new());
        game.start();
        frame(&mut game, &three_fingers());
        frame(&mut game, &GestureEvent::no_hand());
        assert_eq!(game.status().attempts, 0);
    }

    #[test]
    fn test_choice_equal_groups_dropped() {
        let game = ChoiceRound::new(
            &DwellConfig::default(),
            vec![ChoicePuzzle { left: 4, right: 4 }, ChoicePuzzle { left: 2, right: 5 }],
            RecordingPlayback::new(),
        );
        assert_eq!(game.puzzle(), ChoicePuzzle { left: 2, right: 5 });
    }

    // ── Hover ───────────────────────────────────────────────

    #[test]
    fn test_hover_selects_after_frames() {
        let puzzle = HoverPuzzle::row(&[3, 5, 4], 5);
        let centre = puzzle.options[1].center;
        let mut game = HoverRound::new(
            &DwellConfig::default(),
            CursorConfig::default(),
            vec![puzzle],
            RecordingPlayback::new(),
        );
        game.start();

        let ev = pointing_at(centre);
        for _ in 0..15 {
            frame(&mut game, &ev);
        }
        assert_eq!(game.hover_frames(5), 15);
        assert_eq!(game.status().score, 0);
        frame(&mut game, &ev);
        assert_eq!(game.status().score, 1);
    }

    #[test]
    fn test_hover_wrong_bubble_locks_and_clears() {
        let puzzle = HoverPuzzle::row(&[3, 5, 4], 5);
        let wrong = puzzle.options[0].center;
        let mut game = HoverRound::new(
            &DwellConfig::default(),
            CursorConfig::default(),
            vec![puzzle],
            RecordingPlayback::new(),
        );
        game.start();

        let ev = pointing_at(wrong);
        for _ in 0..16 {
            frame(&mut game, &ev);
        }
        assert_eq!(game.status().last_outcome, Some(RoundOutcome::Wrong));
        assert_eq!(game.hover_frames(3), 0);
        assert_eq!(game.playback().phrases().last(), Some(&"Try again!"));

        game.advance(2000.0);
        assert!(!game.status().locked);
    }

    #[test]
    fn test_hover_leaving_resets_counter() {
        let puzzle = HoverPuzzle::row(&[3, 5, 4], 5);
        let centre = puzzle.options[1].center;
        let mut game = HoverRound::new(
            &DwellConfig::default(),
            CursorConfig::default(),
            vec![puzzle],
            RecordingPlayback::new(),
        );
        game.start();
        for _ in 0..10 {
            frame(&mut game, &pointing_at(centre));
        }
        frame(&mut game, &pointing_at([0.5, 0.95]));
        assert_eq!(game.hover_frames(5), 0);
    }

    // ── Lifecycle ───────────────────────────────────────────

    #[test]
    fn test_stop_cancels_round_timers() {
        let mut game = ChoiceRound::new(
            &DwellConfig::default(),
            vec![ChoicePuzzle { left: 7, right: 2 }],
            RecordingPlayback::new(),
        );
        game.start();
        frame(&mut game, &thumbs_up());
        assert_eq!(game.status().score, 1);
        game.stop();
        let before = game.playback().requests.len();
        game.advance(10_000.0);
        assert_eq!(game.status().round, 0);
        assert_eq!(game.playback().requests.len(), before);

        // Answers after stop are ignored
        frame(&mut game, &thumbs_up());
        assert_eq!(game.status().score, 1);
    }

    #[test]
    fn test_status_sexp_parses() {
        let mut game = CountingRound::new(&DwellConfig::default(), vec![4], RecordingPlayback::new());
        game.start();
        let status = GestureConsumer::status_sexp(&game);
        let value = crate::sexp::parse(&status).unwrap();
        assert_eq!(crate::sexp::get_int(&value, "target"), Some(4));
        assert_eq!(crate::sexp::get_keyword(&value, "consumer"), Some("counting".to_string()));
        assert_eq!(crate::sexp::get_bool(&value, "locked"), Some(false));
    }
}
