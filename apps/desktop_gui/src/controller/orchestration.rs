//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker. Returns a status line when the queue
/// refused it.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Option<String> {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            None
        }
        Err(TrySendError::Full(_)) => Some("UI command queue is full; please retry".to_string()),
        Err(TrySendError::Disconnected(_)) => Some(
            "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn reports_full_queue() {
        let (tx, _rx) = bounded(1);
        assert_eq!(dispatch_backend_command(&tx, BackendCommand::Start), None);
        let status = dispatch_backend_command(&tx, BackendCommand::CheckHealth).expect("full");
        assert!(status.contains("queue is full"));
    }

    #[test]
    fn reports_disconnected_worker() {
        let (tx, rx) = bounded(4);
        drop(rx);
        let status = dispatch_backend_command(&tx, BackendCommand::ReloadPatents).expect("gone");
        assert!(status.contains("disconnected"));
    }
}
