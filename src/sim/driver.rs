//! Turn driver: runs the pipeline at a fixed cadence and applies control
//! events between turns.
//!
//! Control arrives over an [`mpsc`] channel, so input can come from any
//! thread (a terminal reader, a test, a signal handler). Events are only
//! ever applied at turn boundaries or during the inter-turn delay; a turn
//! that has started always runs to completion.

use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::GridError;
use crate::sim::{Ecosystem, TurnReport};

/// A control request from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Hold before the next turn.
    Pause,
    /// Continue after a pause.
    Resume,
    /// Stop the run.
    Stop,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A [`ControlEvent::Stop`] arrived.
    Requested,
    /// The configured turn limit was reached.
    TurnLimit,
    /// The control channel closed while paused, so nothing could resume.
    Disconnected,
}

/// Result of [`Driver::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Turns completed during this run.
    pub turns: u64,
    /// Why the run ended.
    pub reason: StopReason,
}

/// Receives each completed turn.
pub trait TurnObserver {
    /// Error type the observer can fail with.
    type Error;

    /// Called after every turn.
    ///
    /// # Errors
    ///
    /// An error aborts the run.
    fn on_turn(&mut self, eco: &Ecosystem, report: &TurnReport) -> Result<(), Self::Error>;

    /// Called when the run pauses.
    ///
    /// # Errors
    ///
    /// An error aborts the run.
    fn on_pause(&mut self, _eco: &Ecosystem) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when the run resumes.
    ///
    /// # Errors
    ///
    /// An error aborts the run.
    fn on_resume(&mut self, _eco: &Ecosystem) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Runs turns until stopped.
#[derive(Debug, Clone, Copy)]
pub struct Driver {
    delay: Duration,
    max_turns: Option<u64>,
    paused: bool,
}

impl Driver {
    /// Create a driver that waits `delay` between turns.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_turns: None,
            paused: false,
        }
    }

    /// Stop after `limit` turns of this run.
    #[must_use]
    pub const fn with_max_turns(mut self, limit: Option<u64>) -> Self {
        self.max_turns = limit;
        self
    }

    /// Begin in the paused state.
    #[must_use]
    pub const fn start_paused(mut self) -> Self {
        self.paused = true;
        self
    }

    /// Whether the driver is holding between turns.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Run turns until a stop event, the turn limit, or a closed channel
    /// while paused.
    ///
    /// If the channel closes while running, the run continues to its turn
    /// limit (or forever without one).
    ///
    /// # Errors
    ///
    /// Returns the observer's error, or a grid error from the pipeline
    /// converted into it.
    pub fn run<O>(
        &mut self,
        eco: &mut Ecosystem,
        events: &Receiver<ControlEvent>,
        observer: &mut O,
    ) -> Result<RunSummary, O::Error>
    where
        O: TurnObserver,
        O::Error: From<GridError>,
    {
        let mut turns = 0;
        let mut connected = true;

        loop {
            // Events queued at the boundary
            while connected {
                match events.try_recv() {
                    Ok(event) => {
                        if let Some(reason) = self.apply(event, eco, observer)? {
                            return Ok(RunSummary { turns, reason });
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => connected = false,
                }
            }

            // Hold while paused
            while self.paused {
                let Ok(event) = events.recv() else {
                    log::warn!("control channel closed while paused");
                    return Ok(RunSummary {
                        turns,
                        reason: StopReason::Disconnected,
                    });
                };
                if let Some(reason) = self.apply(event, eco, observer)? {
                    return Ok(RunSummary { turns, reason });
                }
            }

            if self.max_turns.is_some_and(|limit| turns >= limit) {
                return Ok(RunSummary {
                    turns,
                    reason: StopReason::TurnLimit,
                });
            }

            let report = eco.step()?;
            turns += 1;
            observer.on_turn(eco, &report)?;

            if self.max_turns.is_some_and(|limit| turns >= limit) {
                return Ok(RunSummary {
                    turns,
                    reason: StopReason::TurnLimit,
                });
            }

            // Inter-turn delay, still listening
            let deadline = Instant::now() + self.delay;
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() || self.paused {
                    break;
                }
                if !connected {
                    thread::sleep(remaining);
                    break;
                }
                match events.recv_timeout(remaining) {
                    Ok(event) => {
                        if let Some(reason) = self.apply(event, eco, observer)? {
                            return Ok(RunSummary { turns, reason });
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => connected = false,
                }
            }
        }
    }

    /// Apply one event. Returns a stop reason if the run should end.
    fn apply<O: TurnObserver>(
        &mut self,
        event: ControlEvent,
        eco: &Ecosystem,
        observer: &mut O,
    ) -> Result<Option<StopReason>, O::Error> {
        match event {
            ControlEvent::Stop => {
                log::info!("stop requested after turn {}", eco.turn());
                return Ok(Some(StopReason::Requested));
            }
            ControlEvent::Pause if !self.paused => {
                self.paused = true;
                log::info!("paused after turn {}", eco.turn());
                observer.on_pause(eco)?;
            }
            ControlEvent::Resume if self.paused => {
                self.paused = false;
                log::info!("resumed at turn {}", eco.turn());
                observer.on_resume(eco)?;
            }
            ControlEvent::Pause | ControlEvent::Resume => {}
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimConfig;
    use std::sync::mpsc;

    #[derive(Default)]
    struct Recorder {
        turns: Vec<u64>,
        pauses: u32,
        resumes: u32,
    }

    impl TurnObserver for Recorder {
        type Error = GridError;

        fn on_turn(&mut self, _eco: &Ecosystem, report: &TurnReport) -> Result<(), GridError> {
            self.turns.push(report.turn);
            Ok(())
        }

        fn on_pause(&mut self, _eco: &Ecosystem) -> Result<(), GridError> {
            self.pauses += 1;
            Ok(())
        }

        fn on_resume(&mut self, _eco: &Ecosystem) -> Result<(), GridError> {
            self.resumes += 1;
            Ok(())
        }
    }

    fn eco() -> Ecosystem {
        Ecosystem::new(SimConfig::empty(2, 2)).unwrap()
    }

    #[test]
    fn test_runs_to_turn_limit() {
        let mut eco = eco();
        let (_tx, rx) = mpsc::channel();
        let mut recorder = Recorder::default();

        let summary = Driver::new(Duration::ZERO)
            .with_max_turns(Some(3))
            .run(&mut eco, &rx, &mut recorder)
            .unwrap();

        assert_eq!(summary, RunSummary { turns: 3, reason: StopReason::TurnLimit });
        assert_eq!(recorder.turns, vec![1, 2, 3]);
    }

    #[test]
    fn test_stop_before_first_turn() {
        let mut eco = eco();
        let (tx, rx) = mpsc::channel();
        tx.send(ControlEvent::Stop).unwrap();
        let mut recorder = Recorder::default();

        let summary = Driver::new(Duration::ZERO)
            .with_max_turns(Some(10))
            .run(&mut eco, &rx, &mut recorder)
            .unwrap();

        assert_eq!(summary.reason, StopReason::Requested);
        assert_eq!(summary.turns, 0);
        assert!(recorder.turns.is_empty());
    }

    #[test]
    fn test_pause_resume_then_stop_in_order() {
        let mut eco = eco();
        let (tx, rx) = mpsc::channel();
        tx.send(ControlEvent::Pause).unwrap();
        tx.send(ControlEvent::Resume).unwrap();
        tx.send(ControlEvent::Pause).unwrap();
        tx.send(ControlEvent::Stop).unwrap();
        let mut recorder = Recorder::default();

        let summary = Driver::new(Duration::ZERO)
            .run(&mut eco, &rx, &mut recorder)
            .unwrap();

        // All events are applied at the first boundary, in order
        assert_eq!(summary.reason, StopReason::Requested);
        assert_eq!(recorder.pauses, 2);
        assert_eq!(recorder.resumes, 1);
        assert!(recorder.turns.is_empty());
    }

    #[test]
    fn test_disconnect_while_paused_stops() {
        let mut eco = eco();
        let (tx, rx) = mpsc::channel::<ControlEvent>();
        drop(tx);
        let mut recorder = Recorder::default();

        let mut driver = Driver::new(Duration::ZERO).start_paused();
        assert!(driver.is_paused());
        let summary = driver.run(&mut eco, &rx, &mut recorder).unwrap();

        assert_eq!(summary, RunSummary { turns: 0, reason: StopReason::Disconnected });
    }

    #[test]
    fn test_disconnect_while_running_continues() {
        let mut eco = eco();
        let (tx, rx) = mpsc::channel::<ControlEvent>();
        drop(tx);
        let mut recorder = Recorder::default();

        let summary = Driver::new(Duration::ZERO)
            .with_max_turns(Some(4))
            .run(&mut eco, &rx, &mut recorder)
            .unwrap();

        assert_eq!(summary, RunSummary { turns: 4, reason: StopReason::TurnLimit });
    }

    #[test]
    fn test_redundant_events_ignored() {
        let mut eco = eco();
        let (tx, rx) = mpsc::channel();
        tx.send(ControlEvent::Resume).unwrap();
        let mut recorder = Recorder::default();

        Driver::new(Duration::ZERO)
            .with_max_turns(Some(1))
            .run(&mut eco, &rx, &mut recorder)
            .unwrap();

        assert_eq!(recorder.resumes, 0);
        assert_eq!(recorder.turns, vec![1]);
    }
}
