//! User-facing confirmation after a copy.

use dialoguer::Confirm;
use serde::{Deserialize, Serialize};
use std::io::{self, IsTerminal};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStyle {
    /// Print and carry on.
    #[default]
    Toast,
    /// Wait for the user to acknowledge the message.
    Modal,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ToastNotifier;

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str) {
        println!("✓ {}", message);
    }
}

/// Blocks until the message is acknowledged. Without an interactive
/// terminal there is nobody to acknowledge it, so it degrades to a toast.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModalNotifier;

impl Notifier for ModalNotifier {
    fn notify(&self, message: &str) {
        if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
            ToastNotifier.notify(message);
            return;
        }

        let acknowledged = Confirm::new()
            .with_prompt(format!("{} (press Enter)", message))
            .default(true)
            .show_default(false)
            .wait_for_newline(true)
            .interact();

        if let Err(e) = acknowledged {
            debug!(error = %e, "modal prompt failed, falling back to toast");
            ToastNotifier.notify(message);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QuietNotifier;

impl Notifier for QuietNotifier {
    fn notify(&self, message: &str) {
        debug!(suppressed = %message, "notification suppressed");
    }
}

pub fn from_style(style: NotificationStyle, quiet: bool) -> Box<dyn Notifier> {
    match (quiet, style) {
        (true, _) => Box::new(QuietNotifier),
        (false, NotificationStyle::Toast) => Box::new(ToastNotifier),
        (false, NotificationStyle::Modal) => Box::new(ModalNotifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            style: NotificationStyle,
        }

        let w: Wrapper = toml::from_str(r#"style = "modal""#).unwrap();
        assert_eq!(w.style, NotificationStyle::Modal);
        let w: Wrapper = toml::from_str(r#"style = "toast""#).unwrap();
        assert_eq!(w.style, NotificationStyle::Toast);
        assert!(toml::from_str::<Wrapper>(r#"style = "popup""#).is_err());
    }

    #[test]
    fn test_default_is_toast() {
        assert_eq!(NotificationStyle::default(), NotificationStyle::Toast);
    }

    #[test]
    fn test_quiet_notifier_prints_nothing() {
        // Only checks that it does not block or panic.
        from_style(NotificationStyle::Modal, true).notify("hidden");
    }
}
