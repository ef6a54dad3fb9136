use std::sync::{Mutex, PoisonError};

use tracing::{error, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: &'static str,
    pub description: &'static str,
}

impl Toast {
    pub fn success(description: &'static str) -> Self {
        Self {
            kind: ToastKind::Success,
            title: "Success",
            description,
        }
    }

    pub fn failure() -> Self {
        Self {
            kind: ToastKind::Error,
            title: "Error",
            description: "Operation failed. Please try again.",
        }
    }
}

/// Displays toasts.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}

/// Writes toasts to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Success => info!(title = toast.title, "{}", toast.description),
            ToastKind::Error => error!(title = toast.title, "{}", toast.description),
        }
    }
}

/// Keeps every toast it is given.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, toast: Toast) {
        (**self).notify(toast)
    }
}
