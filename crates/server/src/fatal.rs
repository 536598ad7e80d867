use log::error;
use tokio::sync::mpsc;

/// Reports unrecoverable failures to the supervisory task in `main`, which
/// drains open connections and exits with a failure code. Cheap to clone;
/// lives in the app state so any subsystem can report.
#[derive(Clone)]
pub struct FatalSender(mpsc::UnboundedSender<String>);

pub fn channel() -> (FatalSender, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (FatalSender(tx), rx)
}

impl FatalSender {
    pub fn report(&self, reason: impl Into<String>) {
        let reason = reason.into();
        error!("Fatal error: {reason}");
        // The receiver is gone once shutdown has already started; nothing
        // left to notify.
        let _ = self.0.send(reason);
    }
}
