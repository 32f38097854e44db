use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::app::layouts::layout_config::WinHandle;

/// Mouse and window-under-cursor queries used by the selector.
pub trait PointerProbe: Send + 'static {
    fn is_primary_button_down(&self) -> bool;
    /// Root ancestor of the window under the cursor.
    fn root_window_at_cursor(&self) -> Option<WinHandle>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionOutcome {
    Selected(WinHandle),
    Cancelled,
    TimedOut,
}

/// Waits in background for the user to click a window.
///
/// Clicks on `own_window` (the tool's window) are ignored, as well as a button already held down
/// when the selection starts.
pub struct WindowSelector {
    cancel: Arc<AtomicBool>,
    rx: Receiver<SelectionOutcome>,
    thread: Option<JoinHandle<()>>,
}

impl WindowSelector {
    pub fn start<P: PointerProbe>(
        probe: P,
        own_window: Option<WinHandle>,
        poll_interval: Duration,
        timeout: Option<Duration>,
    ) -> WindowSelector {
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = crossbeam_channel::bounded(1);

        let thread_cancel = cancel.clone();
        let thread = thread::spawn(move || {
            let outcome = listen(&probe, own_window, poll_interval, timeout, &thread_cancel);
            log::debug!("Window selection ended: {:?}", outcome);
            tx.send(outcome).ok();
        });

        WindowSelector {
            cancel,
            rx,
            thread: Some(thread),
        }
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Blocks until the selection ends.
    pub fn wait(mut self) -> SelectionOutcome {
        let outcome = self.rx.recv().unwrap_or(SelectionOutcome::Cancelled);
        self.join();
        outcome
    }

    /// Blocks at most `timeout`; `None` if the selection is still running.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<SelectionOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(SelectionOutcome::Cancelled),
        }
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .inspect_err(|_| log::error!("Window selector thread panicked"))
                .ok();
        }
    }
}

impl Drop for WindowSelector {
    fn drop(&mut self) {
        self.cancel();
        self.join();
    }
}

fn listen(
    probe: &impl PointerProbe,
    own_window: Option<WinHandle>,
    poll_interval: Duration,
    timeout: Option<Duration>,
    cancel: &AtomicBool,
) -> SelectionOutcome {
    let started = Instant::now();
    let mut armed = !probe.is_primary_button_down();

    loop {
        if cancel.load(Ordering::Acquire) {
            return SelectionOutcome::Cancelled;
        }

        if timeout.is_some_and(|t| started.elapsed() >= t) {
            return SelectionOutcome::TimedOut;
        }

        match (armed, probe.is_primary_button_down()) {
            (true, true) => match probe.root_window_at_cursor() {
                Some(handle) if Some(handle) != own_window => return SelectionOutcome::Selected(handle),
                _ => armed = false,
            },
            (false, false) => armed = true,
            _ => (),
        }

        thread::sleep(poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a sequence of (button down, window under cursor) samples, then keeps the last one.
    struct ScriptedProbe {
        samples: Mutex<Vec<(bool, Option<WinHandle>)>>,
        current: Mutex<(bool, Option<WinHandle>)>,
    }

    impl ScriptedProbe {
        fn new(mut samples: Vec<(bool, Option<WinHandle>)>) -> ScriptedProbe {
            samples.reverse();
            ScriptedProbe {
                samples: Mutex::new(samples),
                current: Mutex::new((false, None)),
            }
        }
    }

    impl PointerProbe for ScriptedProbe {
        fn is_primary_button_down(&self) -> bool {
            let mut current = self.current.lock().unwrap();
            if let Some(next) = self.samples.lock().unwrap().pop() {
                *current = next;
            }
            current.0
        }

        fn root_window_at_cursor(&self) -> Option<WinHandle> {
            self.current.lock().unwrap().1
        }
    }

    const POLL: Duration = Duration::from_millis(1);

    #[test]
    fn test_selects_clicked_window() {
        let probe = ScriptedProbe::new(vec![(false, None), (false, None), (true, Some(WinHandle(42)))]);
        let selector = WindowSelector::start(probe, None, POLL, Some(Duration::from_secs(5)));
        assert_eq!(selector.wait(), SelectionOutcome::Selected(WinHandle(42)));
    }

    #[test]
    fn test_ignores_own_window() {
        let own = WinHandle(1);
        let probe = ScriptedProbe::new(vec![
            (false, None),
            (true, Some(own)),
            (true, Some(own)),
            (false, None),
            (true, Some(WinHandle(2))),
        ]);
        let selector = WindowSelector::start(probe, Some(own), POLL, Some(Duration::from_secs(5)));
        assert_eq!(selector.wait(), SelectionOutcome::Selected(WinHandle(2)));
    }

    #[test]
    fn test_ignores_button_held_at_start() {
        let probe = ScriptedProbe::new(vec![
            (true, Some(WinHandle(3))),
            (true, Some(WinHandle(3))),
            (false, None),
            (true, Some(WinHandle(4))),
        ]);
        let selector = WindowSelector::start(probe, None, POLL, Some(Duration::from_secs(5)));
        assert_eq!(selector.wait(), SelectionOutcome::Selected(WinHandle(4)));
    }

    #[test]
    fn test_timeout() {
        let probe = ScriptedProbe::new(vec![]);
        let selector = WindowSelector::start(probe, None, POLL, Some(Duration::from_millis(20)));
        assert_eq!(selector.wait(), SelectionOutcome::TimedOut);
    }

    #[test]
    fn test_cancel() {
        let probe = ScriptedProbe::new(vec![]);
        let selector = WindowSelector::start(probe, None, POLL, None);
        assert_eq!(selector.wait_timeout(Duration::from_millis(10)), None);

        selector.cancel();
        assert!(selector.is_cancelled());
        assert_eq!(selector.wait(), SelectionOutcome::Cancelled);
    }
}
