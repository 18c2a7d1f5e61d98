//! A player's game session
//!
//! Owns the game state, the current road geometry and the two external
//! collaborators (high score store and audio sink). Presentation code talks to
//! the game only through this type.

use crate::audio::{AudioCue, AudioSink};
use crate::error::TuningError;
use crate::persistence::HighScoreStore;
use crate::sim::{self, GameEvent, GamePhase, GameState, Intent, LaneGeometry};
use crate::tuning::Tuning;
use crate::view::FrameView;

pub struct Session {
    state: GameState,
    geometry: LaneGeometry,
    store: Box<dyn HighScoreStore>,
    audio: Box<dyn AudioSink>,
    /// Events forwarded since the presentation layer last asked
    recent_events: Vec<GameEvent>,
}

impl Session {
    /// Build a session on the menu screen. Geometry starts at the headless
    /// size until the first [`Session::resize`].
    pub fn new(
        tuning: Tuning,
        seed: u64,
        store: Box<dyn HighScoreStore>,
        audio: Box<dyn AudioSink>,
    ) -> Result<Self, TuningError> {
        let tuning = tuning.validated()?;
        let geometry = LaneGeometry::headless(tuning.lane_count).ok_or(TuningError::ZeroLanes)?;
        let high_score = store.load();
        log::info!("Session ready (seed {}, best {})", seed, high_score);
        Ok(Self {
            state: GameState::new(tuning, seed, high_score),
            geometry,
            store,
            audio,
            recent_events: Vec::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn geometry(&self) -> &LaneGeometry {
        &self.geometry
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn high_score(&self) -> u64 {
        self.state.high_score
    }

    /// Start a new run (from the menu, after game over, or from pause)
    pub fn start(&mut self) -> bool {
        if self.state.phase == GamePhase::Paused {
            // Restart from pause: stop the old run's engine first
            self.state.phase = GamePhase::Menu;
            self.state.events.push(GameEvent::EngineStop);
        }
        let started = self.state.start();
        self.flush_events();
        started
    }

    /// Apply a player intent; false if it was rejected
    pub fn apply(&mut self, intent: Intent) -> bool {
        let accepted = sim::apply_intent(&mut self.state, &self.geometry, intent);
        if !accepted {
            log::debug!("Intent {:?} ignored in {:?}", intent, self.state.phase);
        }
        self.flush_events();
        accepted
    }

    /// Let the autopilot make its move, if it wants one
    pub fn autopilot(&mut self) -> Option<Intent> {
        let intent = sim::autopilot::suggest(&self.state, &self.geometry)?;
        self.apply(intent).then_some(intent)
    }

    /// Advance one tick
    pub fn step(&mut self) {
        sim::tick(&mut self.state, &self.geometry);
        self.audio.set_boosting(self.state.player.is_boosting());
        self.flush_events();
    }

    /// Recompute geometry for a new viewport. Degenerate sizes keep the old
    /// layout. Returns true if the layout changed.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        match LaneGeometry::new(width, height, self.state.tuning.lane_count) {
            Some(geometry) => {
                let changed = geometry != self.geometry;
                self.geometry = geometry;
                changed
            }
            None => {
                log::debug!("Ignoring degenerate viewport {}x{}", width, height);
                false
            }
        }
    }

    /// Snapshot for the renderer and HUD
    pub fn view(&self) -> FrameView {
        FrameView::capture(&self.state, &self.geometry)
    }

    /// Events forwarded since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.recent_events)
    }

    /// Swap the audio sink (e.g. once the browser allows audio)
    pub fn set_audio(&mut self, audio: Box<dyn AudioSink>) {
        self.audio = audio;
    }

    /// Route raised events to audio and persistence
    fn flush_events(&mut self) {
        for event in self.state.drain_events() {
            if let Some(cue) = AudioCue::from_event(&event) {
                self.audio.play(cue);
            }
            if let GameEvent::GameOver { high_score, .. } = event {
                let stored = self.store.load();
                if high_score > stored {
                    self.store.save(high_score);
                }
            }
            self.recent_events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Lane, Obstacle, Pickup, SpriteVariant};

    /// Sink that remembers every cue
    #[derive(Clone, Default)]
    struct RecordingAudio(Rc<RefCell<Vec<AudioCue>>>);

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: AudioCue) {
            self.0.borrow_mut().push(cue);
        }
    }

    fn quiet_tuning() -> Tuning {
        Tuning {
            obstacle_spawn_base: 0.0,
            obstacle_spawn_step: 0.0,
            obstacle_spawn_max: 0.0,
            pickup_spawn_chance: 0.0,
            ..Tuning::default()
        }
    }

    fn session(tuning: Tuning, best: u64) -> (Session, MemoryStore, RecordingAudio) {
        let store = MemoryStore::with_score(best);
        let audio = RecordingAudio::default();
        let session =
            Session::new(tuning, 77, Box::new(store.clone()), Box::new(audio.clone())).unwrap();
        (session, store, audio)
    }

    fn crash_into(session: &mut Session) {
        let lane = session.state.player.lane;
        let y = session.geometry.player_y;
        session.state.obstacles.push(Obstacle {
            lane,
            y,
            variant: SpriteVariant::A,
        });
        session.step();
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            lane_count: 0,
            ..Tuning::default()
        };
        let result = Session::new(
            tuning,
            1,
            Box::new(MemoryStore::default()),
            Box::new(crate::audio::SilentAudio),
        );
        assert!(matches!(result, Err(TuningError::ZeroLanes)));
    }

    #[test]
    fn test_loads_high_score_on_startup() {
        let (session, _, _) = session(quiet_tuning(), 321);
        assert_eq!(session.high_score(), 321);
        assert_eq!(session.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_new_best_is_persisted() {
        let (mut session, store, audio) = session(quiet_tuning(), 5);
        session.start();
        for _ in 0..20 {
            session.step();
        }
        crash_into(&mut session);

        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.high_score(), 20);
        assert_eq!(store.get(), 20);
        assert_eq!(
            *audio.0.borrow(),
            vec![AudioCue::EngineStart, AudioCue::EngineStop, AudioCue::Crash]
        );
    }

    #[test]
    fn test_worse_run_keeps_stored_best() {
        let (mut session, store, _) = session(quiet_tuning(), 1000);
        session.start();
        crash_into(&mut session);
        assert_eq!(session.high_score(), 1000);
        assert_eq!(store.get(), 1000);
    }

    #[test]
    fn test_pickup_plays_sound() {
        let (mut session, _, audio) = session(quiet_tuning(), 0);
        session.start();
        let y = session.geometry.player_y;
        session.state.pickups.push(Pickup {
            lane: Lane::new(1),
            y,
        });
        session.step();
        assert_eq!(session.state().player.boost_ticks, 120);
        assert!(audio.0.borrow().contains(&AudioCue::PickupCollected));
    }

    #[test]
    fn test_restart_after_game_over() {
        let (mut session, _, _) = session(quiet_tuning(), 0);
        session.start();
        assert!(session.apply(Intent::MoveLeft));
        for _ in 0..5 {
            session.step();
        }
        crash_into(&mut session);
        assert!(!session.apply(Intent::MoveRight));

        assert!(session.start());
        let state = session.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.player.lane, Lane::new(1));
        assert!(state.player.alive);
        assert!(state.obstacles.is_empty());
        assert!(state.pickups.is_empty());
        assert_eq!(session.high_score(), 5);
    }

    #[test]
    fn test_pause_stops_engine_and_freezes_run() {
        let (mut session, _, audio) = session(quiet_tuning(), 0);
        session.start();
        session.step();
        assert!(session.apply(Intent::PauseToggle));
        session.step();
        session.step();
        assert_eq!(session.score(), 1);
        assert!(session.apply(Intent::PauseToggle));
        assert_eq!(
            *audio.0.borrow(),
            vec![AudioCue::EngineStart, AudioCue::EngineStop, AudioCue::EngineStart]
        );
    }

    #[test]
    fn test_start_from_pause_restarts() {
        let (mut session, _, _) = session(quiet_tuning(), 0);
        session.start();
        session.step();
        session.apply(Intent::PauseToggle);
        assert!(session.start());
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_resize_keeps_entities() {
        let (mut session, _, _) = session(quiet_tuning(), 0);
        session.start();
        session.state.obstacles.push(Obstacle {
            lane: Lane::new(2),
            y: 100.0,
            variant: SpriteVariant::B,
        });

        assert!(session.resize(1280.0, 720.0));
        assert_eq!(session.geometry().margin, 400.0);
        assert!(!session.resize(0.0, 720.0));
        assert_eq!(session.geometry().viewport.x, 1280.0);

        assert_eq!(session.state().obstacles[0].y, 100.0);
        assert_eq!(session.state().obstacles[0].lane, Lane::new(2));
    }

    #[test]
    fn test_events_are_forwarded_once() {
        let (mut session, _, _) = session(quiet_tuning(), 0);
        session.start();
        assert_eq!(session.take_events(), vec![GameEvent::EngineStart]);
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_autopilot_leaves_blocked_lane() {
        let (mut session, _, _) = session(quiet_tuning(), 0);
        session.start();
        let y = session.geometry.player_y - session.geometry.car_height * 1.5;
        session.state.obstacles.push(Obstacle {
            lane: Lane::new(1),
            y,
            variant: SpriteVariant::A,
        });

        let intent = session.autopilot();
        assert!(matches!(intent, Some(Intent::MoveLeft | Intent::MoveRight)));
        assert_ne!(session.state().player.lane, Lane::new(1));
    }

    #[derive(Debug, Clone)]
    enum Action {
        Intent(Intent),
        Step(u8),
        Start,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            prop_oneof![
                Just(Intent::MoveLeft),
                Just(Intent::MoveRight),
                Just(Intent::Boost),
                Just(Intent::PauseToggle),
            ]
            .prop_map(Action::Intent),
            (1u8..40).prop_map(Action::Step),
            Just(Action::Start),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_input(
            seed in any::<u64>(),
            lanes in 1u8..6,
            actions in prop::collection::vec(action(), 1..120),
        ) {
            let tuning = Tuning {
                lane_count: lanes,
                obstacle_spawn_base: 0.2,
                obstacle_spawn_max: 0.3,
                pickup_spawn_chance: 0.1,
                ..Tuning::default()
            };
            let cap = tuning.boost_cap_ticks;
            let store = MemoryStore::default();
            let mut session = Session::new(
                tuning,
                seed,
                Box::new(store.clone()),
                Box::new(crate::audio::SilentAudio),
            )
            .unwrap();
            let mut runs = 0;
            let mut game_overs = 0;

            for action in actions {
                match action {
                    Action::Intent(intent) => { session.apply(intent); }
                    Action::Start => {
                        if session.start() {
                            runs += 1;
                        }
                    }
                    Action::Step(n) => {
                        for _ in 0..n {
                            let before = session.score();
                            let phase = session.phase();
                            session.step();
                            match (phase, session.phase()) {
                                (GamePhase::Playing, GamePhase::Playing) => {
                                    prop_assert_eq!(session.score(), before + 1)
                                }
                                _ => prop_assert_eq!(session.score(), before),
                            }
                        }
                    }
                }
                game_overs += session
                    .take_events()
                    .iter()
                    .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                    .count();

                let state = session.state();
                prop_assert!(state.player.lane.index() < lanes);
                prop_assert!(state.obstacles.iter().all(|o| o.lane.index() < lanes));
                prop_assert!(state.pickups.iter().all(|p| p.lane.index() < lanes));
                prop_assert!(state.player.boost_ticks <= cap);
                prop_assert!(state.obstacles.len() < 400);
                prop_assert_eq!(state.player.alive, state.phase != GamePhase::GameOver);
                prop_assert_eq!(store.get(), state.high_score);
            }
            // At most one game over per run
            prop_assert!(game_overs <= runs);
        }
    }
}
