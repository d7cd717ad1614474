//! User-visible notices.
//!
//! Commands report each operation's outcome here instead of printing directly,
//! so the shell and one-shot runs render them the same way.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
    Info,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NoticeKind::Success, message);
    }

    fn failure(&self, message: &str) {
        self.notify(NoticeKind::Failure, message);
    }

    fn info(&self, message: &str) {
        self.notify(NoticeKind::Info, message);
    }
}

/// Prints successes and info to stdout and failures to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => println!("✅ {}", message),
            NoticeKind::Failure => eprintln!("❌ {}", message),
            NoticeKind::Info => println!("{}", message),
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notices: std::sync::Mutex<Vec<(NoticeKind, String)>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn messages(&self, kind: NoticeKind) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices.lock().unwrap().push((kind, message.to_string()));
    }
}
