//! User facing notifications

/// Callback run once a notification is dismissed
pub type OnClose = Box<dyn FnOnce() + Send>;

/// Displays messages to the user
///
/// `key` identifies a message so that several identical notifications shown
/// at the same time collapse into one.
pub trait Notifier: Send + Sync {
    /// Show an error message
    fn error(&self, content: &str, key: Option<&str>);

    /// Show an informational message; `on_close` runs after it is dismissed
    fn info(&self, content: &str, key: Option<&str>, on_close: Option<OnClose>);
}

/// [`Notifier`] that writes every message to the tracing log
///
/// There is nothing to dismiss, so `on_close` runs right away.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, content: &str, key: Option<&str>) {
        tracing::error!(key = key.unwrap_or_default(), "{}", content);
    }

    fn info(&self, content: &str, key: Option<&str>, on_close: Option<OnClose>) {
        tracing::info!(key = key.unwrap_or_default(), "{}", content);
        if let Some(on_close) = on_close {
            on_close();
        }
    }
}
