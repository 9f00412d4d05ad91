/// Transient title + message notifications shown by the tray on the core's behalf
pub trait Notifier {
    /// Show a notification; failures are the implementation's problem
    fn notify(&self, title: &str, message: &str);
}

/// Notifier that only writes to the log (used before the tray exists and in headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        tracing::info!(title, message, "notification");
    }
}

/// Single-line form of a notification, `"{title}: {message}"`.
///
/// At most `max_chars` characters; longer text is cut and ends in `...`.
#[must_use]
pub fn notification_text(title: &str, message: &str, max_chars: usize) -> String {
    let text = if title.is_empty() {
        message.to_owned()
    } else {
        format!("{title}: {message}")
    };
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
