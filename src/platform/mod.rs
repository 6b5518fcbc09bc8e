//! Platform abstraction layer
//!
//! The frame driver exclusively owns one encounter's `GameState` and sits
//! between it and four external collaborators:
//! - `FrameScheduler`: one callback per display refresh
//! - `InputRegistration`: discrete key events, drained at frame start
//! - `RenderTarget` / `AudioSink`: per-frame output
//!
//! Exit tears all of it down in one call; a frame callback that still fires
//! afterwards is a no-op.

use std::collections::VecDeque;

use glam::Vec2;

use crate::audio::{AudioManager, AudioSink};
use crate::error::{Error, Result};
use crate::renderer::{RenderTarget, build_draw_list};
use crate::sim::{EncounterResult, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Source of display-refresh callbacks
pub trait FrameScheduler {
    /// Ask for `FrameDriver::frame` to be called on the next refresh
    fn request_frame(&mut self);
    /// Drop any outstanding request
    fn cancel_frame(&mut self);
}

/// Registered input listener
pub trait InputRegistration {
    /// Events received since the last poll, oldest first
    fn poll(&mut self) -> Vec<InputEvent>;
    /// Unregister the listener
    fn release(&mut self);
}

/// Logical keys the encounter reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fire,
    /// Inventory slot 1..=3
    Slot(u8),
    Pause,
    Restart,
    Exit,
    /// Toggle demo mode
    Autopilot,
}

impl Key {
    /// Map a DOM-style key name
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "ArrowLeft" | "a" | "A" => Key::Left,
            "ArrowRight" | "d" | "D" => Key::Right,
            "ArrowUp" | "w" | "W" => Key::Up,
            "ArrowDown" | "s" | "S" => Key::Down,
            " " => Key::Fire,
            "1" => Key::Slot(1),
            "2" => Key::Slot(2),
            "3" => Key::Slot(3),
            "p" | "P" => Key::Pause,
            "r" | "R" => Key::Restart,
            "Escape" => Key::Exit,
            "i" | "I" => Key::Autopilot,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Key),
    Released(Key),
}

/// Held-key state for continuous controls
#[derive(Debug, Clone, Copy, Default)]
struct HeldKeys {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    fire: bool,
}

impl HeldKeys {
    fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Up => self.up = down,
            Key::Down => self.down = down,
            Key::Fire => self.fire = down,
            _ => {}
        }
    }

    fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Builds a `FrameDriver`; every collaborator is required
#[derive(Default)]
pub struct FrameDriverBuilder {
    seed: u64,
    tuning: Tuning,
    autopilot: bool,
    render: Option<Box<dyn RenderTarget>>,
    audio: Option<Box<dyn AudioSink>>,
    scheduler: Option<Box<dyn FrameScheduler>>,
    input: Option<Box<dyn InputRegistration>>,
}

impl FrameDriverBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Start in demo mode
    pub fn autopilot(mut self, on: bool) -> Self {
        self.autopilot = on;
        self
    }

    pub fn render_target(mut self, target: Box<dyn RenderTarget>) -> Self {
        self.render = Some(target);
        self
    }

    pub fn audio_sink(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.audio = Some(sink);
        self
    }

    pub fn scheduler(mut self, scheduler: Box<dyn FrameScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn input(mut self, input: Box<dyn InputRegistration>) -> Self {
        self.input = Some(input);
        self
    }

    /// Fails before any simulation state exists if a surface is missing
    pub fn build(self) -> Result<FrameDriver> {
        let render = self.render.ok_or(Error::MissingCollaborator {
            surface: "render target",
        })?;
        let audio = self.audio.ok_or(Error::MissingCollaborator {
            surface: "audio sink",
        })?;
        let scheduler = self.scheduler.ok_or(Error::MissingCollaborator {
            surface: "frame scheduler",
        })?;
        let input = self.input.ok_or(Error::MissingCollaborator {
            surface: "input registration",
        })?;
        self.tuning.validate()?;

        Ok(FrameDriver {
            state: GameState::with_tuning(self.seed, self.tuning),
            render,
            audio: AudioManager::new(audio),
            scheduler,
            input_source: input,
            held: HeldKeys::default(),
            input: TickInput {
                autopilot: self.autopilot,
                ..Default::default()
            },
            exit_requested: false,
            frame_pending: false,
            running: false,
        })
    }
}

/// Exclusive owner of one encounter
pub struct FrameDriver {
    state: GameState,
    render: Box<dyn RenderTarget>,
    audio: AudioManager,
    scheduler: Box<dyn FrameScheduler>,
    input_source: Box<dyn InputRegistration>,
    held: HeldKeys,
    /// Edge-triggered commands collected since the last frame
    input: TickInput,
    exit_requested: bool,
    frame_pending: bool,
    running: bool,
}

impl FrameDriver {
    pub fn builder() -> FrameDriverBuilder {
        FrameDriverBuilder::default()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Set once the encounter has ended
    pub fn result(&self) -> Option<EncounterResult> {
        self.state.result
    }

    /// Begin the frame loop
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        log::info!("Encounter started (seed {})", self.state.seed);
        self.running = true;
        self.request_frame();
    }

    fn request_frame(&mut self) {
        self.frame_pending = true;
        self.scheduler.request_frame();
    }

    /// Record one input event; takes effect on the next frame
    pub fn on_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(key) => match key {
                Key::Slot(n) => self.input.use_slot = Some(n as usize),
                Key::Pause => self.input.pause = true,
                Key::Restart => self.input.restart = true,
                Key::Exit => self.exit_requested = true,
                Key::Fire => {
                    self.input.fire = true;
                    self.held.set(key, true);
                }
                Key::Autopilot => {
                    self.input.autopilot = !self.input.autopilot;
                    log::info!("Autopilot: {}", self.input.autopilot);
                }
                _ => self.held.set(key, true),
            },
            InputEvent::Released(key) => self.held.set(key, false),
        }
    }

    /// Frame callback: input, one tick, output, schedule the next frame
    pub fn frame(&mut self) {
        if !self.running {
            return;
        }
        self.frame_pending = false;

        for event in self.input_source.poll() {
            self.on_input(event);
        }
        if self.exit_requested {
            self.exit();
            return;
        }

        let was_over = self.state.result.is_some();
        self.input.move_dir = self.held.direction();
        self.input.fire_held = self.held.fire;
        tick(&mut self.state, &self.input);
        self.input.fire = false;
        self.input.use_slot = None;
        self.input.pause = false;
        self.input.restart = false;

        self.audio.route(&self.state.events);
        self.render.draw(&build_draw_list(&self.state));

        if let (false, Some(result)) = (was_over, self.state.result) {
            log::info!(
                "Encounter over: {} with {} points",
                if result.survived { "victory" } else { "defeat" },
                result.final_score
            );
        }

        // Keep refreshing after the end so restart still works
        self.request_frame();
    }

    /// Tear down the encounter: pending scheduled events, the frame loop and
    /// the input listener go together
    pub fn exit(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.frame_pending = false;
        self.state.schedule.clear();
        self.scheduler.cancel_frame();
        self.input_source.release();
        log::info!("Encounter exited at frame {}", self.state.frame);
    }

    /// Drive frames back to back (no display) until the encounter ends, the
    /// driver exits or `max_frames` have run
    pub fn run_headless(&mut self, max_frames: u64) -> Option<EncounterResult> {
        self.start();
        let mut frames = 0;
        while self.running && self.frame_pending && frames < max_frames {
            self.frame();
            frames += 1;
            if self.state.result.is_some() {
                break;
            }
        }
        self.state.result
    }
}

/// Scheduler with no display behind it; `FrameDriver::run_headless` pumps it
#[derive(Debug, Default)]
pub struct HeadlessScheduler {
    pub requested: u64,
    pub cancelled: bool,
}

impl FrameScheduler for HeadlessScheduler {
    fn request_frame(&mut self) {
        self.requested += 1;
    }

    fn cancel_frame(&mut self) {
        self.cancelled = true;
    }
}

/// Input replayed from a per-frame script
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
    released: bool,
}

impl ScriptedInput {
    /// One entry per frame
    pub fn new(frames: Vec<Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into(),
            released: false,
        }
    }
}

impl InputRegistration for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        if self.released {
            return Vec::new();
        }
        self.frames.pop_front().unwrap_or_default()
    }

    fn release(&mut self) {
        self.released = true;
        self.frames.clear();
    }
}

/// Render target that discards everything
#[derive(Debug, Default)]
pub struct NullRenderTarget;

impl RenderTarget for NullRenderTarget {
    fn draw(&mut self, _list: &crate::renderer::DrawList) {}
}

/// Audio sink that discards everything
#[derive(Debug, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn play(&mut self, _cue: crate::sim::AudioCue, _tone: crate::audio::Tone, _volume: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;
    use crate::sim::{AudioCue, GamePhase};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        requested: u32,
        cancelled: bool,
        released: bool,
        draws: u32,
        cues: Vec<AudioCue>,
        pending_events: Vec<InputEvent>,
    }

    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Log>>);

    impl FrameScheduler for Shared {
        fn request_frame(&mut self) {
            self.0.borrow_mut().requested += 1;
        }
        fn cancel_frame(&mut self) {
            self.0.borrow_mut().cancelled = true;
        }
    }

    impl InputRegistration for Shared {
        fn poll(&mut self) -> Vec<InputEvent> {
            std::mem::take(&mut self.0.borrow_mut().pending_events)
        }
        fn release(&mut self) {
            self.0.borrow_mut().released = true;
        }
    }

    impl RenderTarget for Shared {
        fn draw(&mut self, _list: &DrawList) {
            self.0.borrow_mut().draws += 1;
        }
    }

    impl AudioSink for Shared {
        fn play(&mut self, cue: AudioCue, _tone: crate::audio::Tone, _volume: f32) {
            self.0.borrow_mut().cues.push(cue);
        }
    }

    fn driver(shared: &Shared) -> FrameDriver {
        FrameDriver::builder()
            .seed(5)
            .render_target(Box::new(shared.clone()))
            .audio_sink(Box::new(shared.clone()))
            .scheduler(Box::new(shared.clone()))
            .input(Box::new(shared.clone()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_collaborator_aborts_build() {
        let err = FrameDriver::builder()
            .render_target(Box::new(NullRenderTarget))
            .scheduler(Box::new(HeadlessScheduler::default()))
            .input(Box::new(ScriptedInput::default()))
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::MissingCollaborator {
                surface: "audio sink"
            }
        ));
    }

    #[test]
    fn test_invalid_tuning_aborts_build() {
        let tuning = Tuning {
            powerup_drop_chance: 2.0,
            ..Default::default()
        };
        let result = FrameDriver::builder()
            .tuning(tuning)
            .render_target(Box::new(NullRenderTarget))
            .audio_sink(Box::new(NullAudioSink))
            .scheduler(Box::new(HeadlessScheduler::default()))
            .input(Box::new(ScriptedInput::default()))
            .build();
        assert!(matches!(result, Err(Error::InvalidTuning { .. })));
    }

    #[test]
    fn test_frame_ticks_draws_and_reschedules() {
        let shared = Shared::default();
        let mut driver = driver(&shared);
        driver.start();
        driver.frame();
        driver.frame();
        let log = shared.0.borrow();
        assert_eq!(driver.state().frame, 2);
        assert_eq!(log.draws, 2);
        assert_eq!(log.requested, 3);
    }

    #[test]
    fn test_held_keys_move_player() {
        let shared = Shared::default();
        let mut driver = driver(&shared);
        let start = driver.state().player.pos;
        driver.start();
        shared.0.borrow_mut().pending_events = vec![InputEvent::Pressed(Key::Left)];
        driver.frame();
        driver.frame();
        assert!(driver.state().player.pos.x < start.x - 9.0);

        let x = driver.state().player.pos.x;
        shared.0.borrow_mut().pending_events = vec![InputEvent::Released(Key::Left)];
        driver.frame();
        assert_eq!(driver.state().player.pos.x, x);
    }

    #[test]
    fn test_pause_key_is_edge_triggered() {
        let shared = Shared::default();
        let mut driver = driver(&shared);
        driver.start();
        shared.0.borrow_mut().pending_events = vec![InputEvent::Pressed(Key::Pause)];
        driver.frame();
        driver.frame();
        assert_eq!(driver.state().phase, GamePhase::Paused);
        assert_eq!(driver.state().frame, 0);
    }

    #[test]
    fn test_exit_tears_everything_down() {
        let shared = Shared::default();
        let mut driver = driver(&shared);
        driver.start();
        driver.frame();
        shared.0.borrow_mut().pending_events = vec![InputEvent::Pressed(Key::Exit)];
        driver.frame();
        {
            let log = shared.0.borrow();
            assert!(log.cancelled && log.released);
            assert_eq!(log.draws, 1);
        }
        assert!(!driver.is_running());
        assert!(driver.state().schedule.is_empty());

        // A stale callback does nothing
        driver.frame();
        assert_eq!(driver.state().frame, 1);
        assert_eq!(shared.0.borrow().draws, 1);
    }

    fn shots(shared: &Shared) -> usize {
        shared
            .0
            .borrow()
            .cues
            .iter()
            .filter(|&&c| c == AudioCue::Shoot)
            .count()
    }

    #[test]
    fn test_fire_key_is_edge_triggered() {
        let shared = Shared::default();
        let mut driver = driver(&shared);
        driver.start();
        shared.0.borrow_mut().pending_events = vec![InputEvent::Pressed(Key::Fire)];
        for _ in 0..60 {
            driver.frame();
        }
        assert_eq!(shots(&shared), 1);

        // Release and press again once the cooldown is over
        shared.0.borrow_mut().pending_events = vec![
            InputEvent::Released(Key::Fire),
            InputEvent::Pressed(Key::Fire),
        ];
        driver.frame();
        assert_eq!(shots(&shared), 2);
    }

    #[test]
    fn test_shot_cues_reach_the_sink_unless_muted() {
        let shared = Shared::default();
        let mut driver = driver(&shared);
        driver.start();
        shared.0.borrow_mut().pending_events = vec![InputEvent::Pressed(Key::Fire)];
        driver.frame();
        assert_eq!(shots(&shared), 1);

        driver.audio_mut().set_muted(true);
        for _ in 0..40 {
            shared.0.borrow_mut().pending_events = vec![InputEvent::Pressed(Key::Fire)];
            driver.frame();
        }
        assert_eq!(shots(&shared), 1);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_name("2"), Some(Key::Slot(2)));
        assert_eq!(Key::from_name("q"), None);
    }

    #[test]
    fn test_headless_autopilot_runs() {
        let mut driver = FrameDriver::builder()
            .seed(11)
            .autopilot(true)
            .render_target(Box::new(NullRenderTarget))
            .audio_sink(Box::new(NullAudioSink))
            .scheduler(Box::new(HeadlessScheduler::default()))
            .input(Box::new(ScriptedInput::default()))
            .build()
            .unwrap();
        driver.run_headless(600);
        assert!(driver.state().frame > 0);
        assert!(driver.state().frame <= 600);
    }
}
