use std::cell::RefCell;
use std::rc::Rc;

/// Receives every human-readable diagnostic line.
pub trait Notifier {
    fn notify(&mut self, line: &str);
}

/// Prints each line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps lines in memory. Clones share the same buffer, so a test can hand
/// one clone to the tally and read the other.
#[derive(Debug, Clone, Default)]
pub struct CapturedNotifier {
    lines: Rc<RefCell<Vec<String>>>,
}

impl CapturedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Whether any captured line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }

    /// Number of captured lines containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.lines.borrow().iter().filter(|l| l.contains(needle)).count()
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl Notifier for CapturedNotifier {
    fn notify(&mut self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}
