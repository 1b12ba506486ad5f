use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use assert_tally::{
    CapturedNotifier, DetachedHost, ExecutionMode, HostFramework, Tally, TallyConfig, Verbosity,
};

/// A tally writing into a captured notifier, with a detached host.
pub fn tally_with(mode: ExecutionMode, verbosity: Verbosity) -> (Tally, CapturedNotifier) {
    let notifier = CapturedNotifier::new();
    let tally = Tally::with_parts(
        config(mode, verbosity),
        Box::new(DetachedHost::default()),
        Box::new(notifier.clone()),
    );
    (tally, notifier)
}

/// Like `tally_with`, but the host is observable from the test.
pub fn tally_with_host(
    mode: ExecutionMode,
    verbosity: Verbosity,
    debug: bool,
) -> (Tally, CapturedNotifier, SharedHost) {
    let notifier = CapturedNotifier::new();
    let host = SharedHost::new(debug);
    let tally = Tally::with_parts(
        config(mode, verbosity),
        Box::new(host.clone()),
        Box::new(notifier.clone()),
    );
    (tally, notifier, host)
}

pub fn config(mode: ExecutionMode, verbosity: Verbosity) -> TallyConfig {
    TallyConfig {
        verbosity,
        mode,
        trace_path: None,
    }
}

/// Host whose flag history is shared with the test.
#[derive(Debug, Clone, Default)]
pub struct SharedHost {
    pub flags: Rc<RefCell<Vec<bool>>>,
    pub debug: bool,
}

impl SharedHost {
    pub fn new(debug: bool) -> Self {
        Self {
            flags: Rc::default(),
            debug,
        }
    }

    /// Last value the tally wrote to the "current test failed" flag.
    pub fn current_test_failed(&self) -> bool {
        self.flags.borrow().last().copied().unwrap_or(false)
    }

    /// How many times the flag was set to `true`.
    pub fn times_flagged(&self) -> usize {
        self.flags.borrow().iter().filter(|f| **f).count()
    }
}

impl HostFramework for SharedHost {
    fn set_current_test_failed(&mut self, failed: bool) {
        self.flags.borrow_mut().push(failed);
    }

    fn debug_mode(&self) -> bool {
        self.debug
    }
}

/// Fresh path under the system temp dir, removed if it already exists.
pub fn temp_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("assert_tally_{}_{}", std::process::id(), name));
    if path.is_dir() {
        let _ = std::fs::remove_dir_all(&path);
    } else {
        let _ = std::fs::remove_file(&path);
    }
    path
}
