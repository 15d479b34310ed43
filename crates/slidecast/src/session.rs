//! Navigation state machine.
//!
//! Every input (position events from the playback feed, key presses,
//! pointer hits) arrives as a [`Command`]; each transition returns the list
//! of [`Effect`]s the surrounding UI layer must apply. The machine itself
//! never touches the window or the audio backend.

use crate::error::Error;
use crate::timeline::Timeline;

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub osd_enabled: bool,
    pub progress_bar: bool,
    pub seek_step_secs: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            osd_enabled: true,
            progress_bar: true,
            seek_step_secs: 5.0,
        }
    }
}

/// Snapshot of the playback engine's state, updated from feed events and
/// pause commands. Read by the OSD painter.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackSnapshot {
    pub position_ms: u64,
    pub paused: bool,
    pub progress: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub current: Option<usize>,
    pub osd_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// The playback clock moved (forward tick or seek landing).
    ClockUpdate { position_secs: f64 },
    /// New progress fraction from the feed. Rendering hint only.
    Progress { fraction: f32 },
    StepForward,
    StepBackward,
    SeekBy { delta_secs: f64 },
    SeekTo { secs: f64 },
    TogglePause,
    ToggleOsd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekRequest {
    By(f64),
    To(f64),
}

/// Play/pause affordance to show in the OSD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Play,
    Pause,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    /// Display a different slide (`None` clears the canvas).
    ShowSlide(Option<usize>),
    /// Forward to the playback engine.
    SetPaused(bool),
    /// Forward to the playback engine.
    Seek(SeekRequest),
    /// Repaint the OSD overlay from current state.
    RefreshOsd,
    /// New progress-bar extent.
    SetProgress(f32),
    /// A recoverable condition to note on the console.
    Report(Error),
}

pub struct Session {
    timeline: Timeline,
    deck_len: usize,
    options: SessionOptions,
    nav: NavigationState,
    playback: PlaybackSnapshot,
}

impl Session {
    pub fn new(timeline: Timeline, deck_len: usize, options: SessionOptions) -> Self {
        Self {
            timeline,
            deck_len,
            options,
            nav: NavigationState {
                current: None,
                osd_visible: false,
            },
            playback: PlaybackSnapshot {
                position_ms: 0,
                paused: true,
                progress: 0.0,
            },
        }
    }

    pub fn handle(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::ClockUpdate { position_secs } => {
                self.playback.position_ms = (position_secs.max(0.0) * 1000.0) as u64;
                let target = self.timeline.resolve(self.playback.position_ms);
                self.apply_slide_target(target)
            }
            Command::Progress { fraction } => {
                self.playback.progress = fraction.clamp(0.0, 1.0);
                if self.nav.osd_visible && self.options.progress_bar {
                    vec![Effect::SetProgress(self.playback.progress)]
                } else {
                    Vec::new()
                }
            }
            Command::StepForward => self.step(1),
            Command::StepBackward => self.step(-1),
            Command::SeekBy { delta_secs } => vec![Effect::Seek(SeekRequest::By(delta_secs))],
            Command::SeekTo { secs } => vec![Effect::Seek(SeekRequest::To(secs))],
            Command::TogglePause => {
                self.playback.paused = !self.playback.paused;
                let mut effects = vec![Effect::SetPaused(self.playback.paused)];
                if self.nav.osd_visible {
                    effects.push(Effect::RefreshOsd);
                }
                effects
            }
            Command::ToggleOsd => {
                if !self.options.osd_enabled {
                    return Vec::new();
                }
                self.nav.osd_visible = !self.nav.osd_visible;
                vec![Effect::RefreshOsd]
            }
        }
    }

    /// Clock-driven navigation. Redraws only when the resolved slide differs
    /// from the one on screen; a matching target is a no-op.
    fn apply_slide_target(&mut self, target: Option<usize>) -> Vec<Effect> {
        if target == self.nav.current {
            return Vec::new();
        }
        if let Some(index) = target {
            if index >= self.deck_len {
                return vec![Effect::Report(Error::Range {
                    index: index as i64,
                    deck_len: self.deck_len,
                })];
            }
        }
        self.nav.current = target;
        vec![Effect::ShowSlide(target)]
    }

    /// Manual paging. From a blank screen any step lands on the first slide;
    /// past either end the request is reported and the state is unchanged.
    fn step(&mut self, direction: i64) -> Vec<Effect> {
        let requested = match self.current_slide() {
            None => 0,
            Some(current) => current as i64 + direction,
        };
        if requested < 0 || requested as usize >= self.deck_len {
            return vec![Effect::Report(Error::Range {
                index: requested,
                deck_len: self.deck_len,
            })];
        }
        self.nav.current = Some(requested as usize);
        vec![Effect::ShowSlide(self.nav.current)]
    }

    pub fn current_slide(&self) -> Option<usize> {
        self.nav.current
    }

    pub fn osd_visible(&self) -> bool {
        self.nav.osd_visible
    }

    pub fn paused(&self) -> bool {
        self.playback.paused
    }

    pub fn progress(&self) -> f32 {
        self.playback.progress
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The icon the OSD should show, `None` while the OSD is hidden.
    pub fn affordance(&self) -> Option<Affordance> {
        if !self.nav.osd_visible {
            None
        } else if self.paused() {
            Some(Affordance::Play)
        } else {
            Some(Affordance::Pause)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(deck_len: usize) -> Session {
        let timeline = Timeline::parse("00:01@1\n00:05@2\n").unwrap();
        Session::new(timeline, deck_len, SessionOptions::default())
    }

    fn session_with(options: SessionOptions) -> Session {
        let timeline = Timeline::parse("00:01@1\n00:05@2\n").unwrap();
        Session::new(timeline, 10, options)
    }

    #[test]
    fn test_initial_state() {
        let s = session(10);
        assert_eq!(s.current_slide(), None);
        assert!(s.paused());
        assert!(!s.osd_visible());
        assert_eq!(s.affordance(), None);
    }

    #[test]
    fn test_clock_update_changes_slide_once() {
        let mut s = session(10);
        let effects = s.handle(Command::ClockUpdate { position_secs: 1.5 });
        assert_eq!(effects, vec![Effect::ShowSlide(Some(0))]);
        assert_eq!(s.current_slide(), Some(0));
    }

    #[test]
    fn test_clock_update_same_target_is_noop() {
        // Redraws are requested only on change; per-tick no-ops avoid
        // flicker.
        let mut s = session(10);
        s.handle(Command::ClockUpdate { position_secs: 1.5 });
        assert!(s.handle(Command::ClockUpdate { position_secs: 2.0 }).is_empty());
        assert!(s.handle(Command::ClockUpdate { position_secs: 4.9 }).is_empty());
    }

    #[test]
    fn test_clock_update_before_first_boundary_clears() {
        let mut s = session(10);
        s.handle(Command::ClockUpdate { position_secs: 6.0 });
        assert_eq!(s.current_slide(), Some(1));
        let effects = s.handle(Command::ClockUpdate { position_secs: 0.5 });
        assert_eq!(effects, vec![Effect::ShowSlide(None)]);
        assert_eq!(s.current_slide(), None);
    }

    #[test]
    fn test_clock_target_beyond_deck_reports_and_keeps_slide() {
        let mut s = session(1);
        s.handle(Command::ClockUpdate { position_secs: 1.5 });
        assert_eq!(s.current_slide(), Some(0));
        // Second timeline entry points at page 2, but the deck has 1 page.
        let effects = s.handle(Command::ClockUpdate { position_secs: 6.0 });
        assert!(matches!(effects[..], [Effect::Report(Error::Range { .. })]));
        assert_eq!(s.current_slide(), Some(0));
    }

    #[test]
    fn test_manual_step_from_blank_lands_on_first_slide() {
        let mut s = session(10);
        assert_eq!(
            s.handle(Command::StepForward),
            vec![Effect::ShowSlide(Some(0))]
        );

        let mut s = session(10);
        assert_eq!(
            s.handle(Command::StepBackward),
            vec![Effect::ShowSlide(Some(0))]
        );
    }

    #[test]
    fn test_manual_step_moves_by_one() {
        let mut s = session(10);
        s.handle(Command::StepForward);
        assert_eq!(
            s.handle(Command::StepForward),
            vec![Effect::ShowSlide(Some(1))]
        );
        assert_eq!(
            s.handle(Command::StepBackward),
            vec![Effect::ShowSlide(Some(0))]
        );
    }

    #[test]
    fn test_manual_step_past_ends_is_reported_noop() {
        let mut s = session(2);
        s.handle(Command::StepForward);
        let effects = s.handle(Command::StepBackward);
        assert!(matches!(
            effects[..],
            [Effect::Report(Error::Range { index: -1, .. })]
        ));
        assert_eq!(s.current_slide(), Some(0));

        s.handle(Command::StepForward);
        let effects = s.handle(Command::StepForward);
        assert!(matches!(
            effects[..],
            [Effect::Report(Error::Range { index: 2, .. })]
        ));
        assert_eq!(s.current_slide(), Some(1));
    }

    #[test]
    fn test_manual_step_into_empty_deck_is_reported() {
        let mut s = session(0);
        let effects = s.handle(Command::StepForward);
        assert!(matches!(effects[..], [Effect::Report(Error::Range { .. })]));
        assert_eq!(s.current_slide(), None);
    }

    #[test]
    fn test_clock_overrides_manual_choice() {
        // Manual paging wins until the clock crosses the next boundary.
        let mut s = session(10);
        s.handle(Command::ClockUpdate { position_secs: 1.5 });
        s.handle(Command::StepForward);
        s.handle(Command::StepForward);
        assert_eq!(s.current_slide(), Some(2));
        // Still inside slide 0's interval, so the next tick snaps back.
        let effects = s.handle(Command::ClockUpdate { position_secs: 2.0 });
        assert_eq!(effects, vec![Effect::ShowSlide(Some(0))]);
    }

    #[test]
    fn test_seek_delegates_to_engine() {
        let mut s = session(10);
        assert_eq!(
            s.handle(Command::SeekBy { delta_secs: -5.0 }),
            vec![Effect::Seek(SeekRequest::By(-5.0))]
        );
        assert_eq!(
            s.handle(Command::SeekTo { secs: 42.0 }),
            vec![Effect::Seek(SeekRequest::To(42.0))]
        );
        // Seeking never sets the slide directly.
        assert_eq!(s.current_slide(), None);
    }

    #[test]
    fn test_pause_toggle_flips_and_updates_engine() {
        let mut s = session(10);
        assert_eq!(
            s.handle(Command::TogglePause),
            vec![Effect::SetPaused(false)]
        );
        assert!(!s.paused());
        assert_eq!(s.handle(Command::TogglePause), vec![Effect::SetPaused(true)]);
        assert!(s.paused());
    }

    #[test]
    fn test_pause_toggle_refreshes_visible_osd() {
        let mut s = session(10);
        s.handle(Command::ToggleOsd);
        let effects = s.handle(Command::TogglePause);
        assert_eq!(
            effects,
            vec![Effect::SetPaused(false), Effect::RefreshOsd]
        );
    }

    #[test]
    fn test_affordance_tracks_pause_state() {
        let mut s = session(10);
        s.handle(Command::ToggleOsd);
        assert_eq!(s.affordance(), Some(Affordance::Play));
        s.handle(Command::TogglePause);
        assert_eq!(s.affordance(), Some(Affordance::Pause));
    }

    #[test]
    fn test_osd_reflects_state_at_show_time() {
        // Hide while paused, unpause, show again: the affordance must match
        // the current state, not the state when it was hidden.
        let mut s = session(10);
        s.handle(Command::ToggleOsd);
        assert_eq!(s.affordance(), Some(Affordance::Play));
        s.handle(Command::ToggleOsd);
        s.handle(Command::TogglePause);
        s.handle(Command::ToggleOsd);
        assert_eq!(s.affordance(), Some(Affordance::Pause));
    }

    #[test]
    fn test_hidden_osd_has_no_affordance() {
        let mut s = session(10);
        s.handle(Command::TogglePause);
        assert_eq!(s.affordance(), None);
    }

    #[test]
    fn test_progress_is_rendering_hint_only() {
        let mut s = session(10);
        s.handle(Command::ClockUpdate { position_secs: 1.5 });
        s.handle(Command::ToggleOsd);
        let effects = s.handle(Command::Progress { fraction: 0.25 });
        assert_eq!(effects, vec![Effect::SetProgress(0.25)]);
        assert_eq!(s.current_slide(), Some(0));
    }

    #[test]
    fn test_progress_clamped_to_unit_interval() {
        let mut s = session(10);
        s.handle(Command::ToggleOsd);
        assert_eq!(
            s.handle(Command::Progress { fraction: 1.5 }),
            vec![Effect::SetProgress(1.0)]
        );
        assert_eq!(
            s.handle(Command::Progress { fraction: -0.5 }),
            vec![Effect::SetProgress(0.0)]
        );
    }

    #[test]
    fn test_progress_silent_while_osd_hidden() {
        let mut s = session(10);
        assert!(s.handle(Command::Progress { fraction: 0.5 }).is_empty());
        // Still recorded for the next time the OSD shows.
        assert_eq!(s.progress(), 0.5);
    }

    #[test]
    fn test_osd_toggle_noop_when_disabled() {
        let mut s = session_with(SessionOptions {
            osd_enabled: false,
            ..SessionOptions::default()
        });
        assert!(s.handle(Command::ToggleOsd).is_empty());
        assert!(!s.osd_visible());
    }

    #[test]
    fn test_progress_bar_flag_suppresses_extent_updates() {
        let mut s = session_with(SessionOptions {
            progress_bar: false,
            ..SessionOptions::default()
        });
        s.handle(Command::ToggleOsd);
        assert!(s.handle(Command::Progress { fraction: 0.5 }).is_empty());
    }
}
