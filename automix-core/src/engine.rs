//! Engine thread - owns the [`AutomationEngine`] and talks to the UI over channels

use crate::automation::{
    AutomationConfig, AutomationEngine, AutomationEvent, MixerSnapshot, PlaylistEntry,
};
use crate::scheduler::{Clock, SystemClock};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How long the thread waits for a command before ticking again
const IDLE_WAIT: Duration = Duration::from_millis(10);
/// Minimum spacing of state updates sent to the UI (~30fps)
const STATE_UPDATE_MS: u64 = 33;

/// Commands sent to the engine thread
#[derive(Debug, Clone)]
pub enum MixerCommand {
    Pause,
    Resume,
    TogglePause,
    /// New cycle period in milliseconds
    SetPeriod(u64),
    Reset,
    Shutdown,
}

/// Events sent back to the UI
#[derive(Debug, Clone)]
pub enum MixerEvent {
    StateUpdate(Box<MixerSnapshot>),
    Automation(AutomationEvent),
    /// Automation was paused (`true`) or resumed by a command
    PauseChanged(bool),
    Error(String),
}

/// UI-side handle to the engine thread
pub struct MixerEngine {
    command_tx: Sender<MixerCommand>,
    pub event_rx: Receiver<MixerEvent>,
    shutdown: Arc<AtomicBool>,
}

impl MixerEngine {
    /// Create channels for engine communication
    pub fn create_channels() -> (
        Sender<MixerCommand>,
        Receiver<MixerCommand>,
        Sender<MixerEvent>,
        Receiver<MixerEvent>,
    ) {
        let (cmd_tx, cmd_rx) = bounded(256);
        let (evt_tx, evt_rx) = bounded(1024);
        (cmd_tx, cmd_rx, evt_tx, evt_rx)
    }

    pub fn new(
        command_tx: Sender<MixerCommand>,
        event_rx: Receiver<MixerEvent>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            command_tx,
            event_rx,
            shutdown,
        }
    }

    /// Send a command to the engine thread
    pub fn send(&self, cmd: MixerCommand) {
        let _ = self.command_tx.try_send(cmd);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Request shutdown; the thread stops ticking on its next loop
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        let _ = self.command_tx.try_send(MixerCommand::Shutdown);
    }
}

/// Apply one command; returns false on shutdown
fn handle_command(engine: &mut AutomationEngine, cmd: MixerCommand, now_ms: u64) -> bool {
    match cmd {
        MixerCommand::Pause => engine.pause(),
        MixerCommand::Resume => engine.resume(now_ms),
        MixerCommand::TogglePause => engine.toggle_pause(now_ms),
        MixerCommand::SetPeriod(ms) => {
            if let Err(e) = engine.set_period(ms, now_ms) {
                warn!(error = %e, "rejected cycle period");
            }
        }
        MixerCommand::Reset => engine.reset(now_ms),
        MixerCommand::Shutdown => return false,
    }
    true
}

/// Engine thread body
///
/// Ticks the automation engine until shutdown, forwarding automation
/// events immediately and snapshots at a fixed rate. Returns once the
/// shutdown flag is set, the `Shutdown` command arrives or the command
/// channel closes.
pub fn run_engine_thread(
    cmd_rx: Receiver<MixerCommand>,
    evt_tx: Sender<MixerEvent>,
    shutdown: Arc<AtomicBool>,
    config: AutomationConfig,
    playlist: Vec<PlaylistEntry>,
) {
    run_engine_loop(cmd_rx, evt_tx, shutdown, config, playlist, &SystemClock::new());
}

/// Engine loop with an injected clock
pub fn run_engine_loop(
    cmd_rx: Receiver<MixerCommand>,
    evt_tx: Sender<MixerEvent>,
    shutdown: Arc<AtomicBool>,
    config: AutomationConfig,
    playlist: Vec<PlaylistEntry>,
    clock: &dyn Clock,
) {
    if let Err(e) = config.validate() {
        let _ = evt_tx.send(MixerEvent::Error(format!("Invalid automation config: {}", e)));
        return;
    }

    let mut engine = AutomationEngine::new(config, playlist, clock.now_ms());
    let mut last_state_update: Option<u64> = None;
    debug!("engine thread started");

    while !shutdown.load(Ordering::Relaxed) {
        match cmd_rx.recv_timeout(IDLE_WAIT) {
            Ok(cmd) => {
                let was_paused = engine.is_paused();
                if !handle_command(&mut engine, cmd, clock.now_ms()) {
                    break;
                }
                if engine.is_paused() != was_paused {
                    let _ = evt_tx.try_send(MixerEvent::PauseChanged(engine.is_paused()));
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let now = clock.now_ms();
        for event in engine.advance_to(now) {
            let _ = evt_tx.try_send(MixerEvent::Automation(event));
        }

        let due = last_state_update
            .map_or(true, |last| now.saturating_sub(last) >= STATE_UPDATE_MS);
        if due {
            let _ = evt_tx.try_send(MixerEvent::StateUpdate(Box::new(engine.snapshot())));
            last_state_update = Some(now);
        }
    }

    debug!("engine thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;
    use crate::scheduler::ManualClock;
    use std::thread;

    #[test]
    fn test_thread_emits_state_and_stops() {
        let (cmd_tx, cmd_rx, evt_tx, evt_rx) = MixerEngine::create_channels();
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = shutdown.clone();
        let handle = thread::spawn(move || {
            run_engine_thread(cmd_rx, evt_tx, flag, AutomationConfig::default(), Vec::new());
        });
        let engine = MixerEngine::new(cmd_tx, evt_rx, shutdown);

        let first = engine
            .event_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("engine should publish state");
        assert!(matches!(
            first,
            MixerEvent::StateUpdate(_) | MixerEvent::Automation(_)
        ));

        engine.shutdown();
        assert!(engine.is_shutdown());
        handle.join().expect("engine thread should exit cleanly");
    }

    #[test]
    fn test_commands_applied_in_order() {
        let (cmd_tx, cmd_rx, evt_tx, evt_rx) = MixerEngine::create_channels();
        let clock = ManualClock::new(13_500);

        cmd_tx.send(MixerCommand::Pause).unwrap();
        cmd_tx.send(MixerCommand::Shutdown).unwrap();
        run_engine_loop(
            cmd_rx,
            evt_tx,
            Arc::new(AtomicBool::new(false)),
            AutomationConfig::default(),
            Vec::new(),
            &clock,
        );

        // Paused before the first frame, so no automation ran
        let events: Vec<_> = evt_rx.try_iter().collect();
        assert!(!events.iter().any(|e| matches!(e, MixerEvent::Automation(_))));
        let snapshot = events
            .iter()
            .find_map(|e| match e {
                MixerEvent::StateUpdate(s) => Some(s),
                _ => None,
            })
            .expect("one state update before shutdown");
        assert!(snapshot.paused);
        assert_eq!(snapshot.phase, Phase::StableA);
    }

    #[test]
    fn test_each_toggle_reports_pause_state() {
        let (cmd_tx, cmd_rx, evt_tx, evt_rx) = MixerEngine::create_channels();
        let clock = ManualClock::new(0);

        cmd_tx.send(MixerCommand::TogglePause).unwrap();
        cmd_tx.send(MixerCommand::TogglePause).unwrap();
        // Already running: no change to report
        cmd_tx.send(MixerCommand::Resume).unwrap();
        cmd_tx.send(MixerCommand::Shutdown).unwrap();
        run_engine_loop(
            cmd_rx,
            evt_tx,
            Arc::new(AtomicBool::new(false)),
            AutomationConfig::default(),
            Vec::new(),
            &clock,
        );

        let changes: Vec<bool> = evt_rx
            .try_iter()
            .filter_map(|e| match e {
                MixerEvent::PauseChanged(paused) => Some(paused),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec![true, false]);
    }

    #[test]
    fn test_invalid_config_reports_error() {
        let (_cmd_tx, cmd_rx, evt_tx, evt_rx) = MixerEngine::create_channels();
        let config = AutomationConfig {
            cycle_period_ms: 0,
            ..Default::default()
        };
        run_engine_loop(
            cmd_rx,
            evt_tx,
            Arc::new(AtomicBool::new(false)),
            config,
            Vec::new(),
            &ManualClock::new(0),
        );
        assert!(matches!(evt_rx.try_recv(), Ok(MixerEvent::Error(_))));
    }
}
