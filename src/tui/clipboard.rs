//! Story link copying.
//!
//! An arboard handle has to outlive the write for a moment on X11/Wayland so
//! clipboard managers can take the selection, so writes run on a worker thread.

use anyhow::{anyhow, Context, Result};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::Duration;

const HOLD_AFTER_WRITE: Duration = Duration::from_secs(2);

static WORKER: OnceLock<Mutex<Option<Sender<String>>>> = OnceLock::new();

fn spawn_worker<F>(mut write: F) -> Result<Sender<String>>
where
    F: FnMut(&str) + Send + 'static,
{
    let (tx, rx) = channel::<String>();
    thread::Builder::new()
        .name("clipboard".into())
        .spawn(move || {
            for link in rx {
                write(&link);
            }
            tracing::debug!("clipboard worker stopped");
        })
        .context("spawn clipboard worker")?;
    Ok(tx)
}

fn write_with_arboard(link: &str) {
    let mut clipboard = match arboard::Clipboard::new() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "clipboard unavailable");
            return;
        }
    };
    match clipboard.set_text(link) {
        Ok(()) => thread::sleep(HOLD_AFTER_WRITE),
        Err(e) => tracing::warn!(error = %e, "clipboard write failed"),
    }
}

/// Hand `link` to the clipboard worker, restarting it if it has gone away.
pub fn copy_link(link: &str) -> Result<()> {
    let slot = WORKER.get_or_init(|| Mutex::new(None));
    let mut worker = slot.lock().map_err(|_| anyhow!("clipboard worker lock poisoned"))?;

    if let Some(tx) = worker.as_ref() {
        if tx.send(link.to_string()).is_ok() {
            return Ok(());
        }
    }

    let tx = spawn_worker(write_with_arboard)?;
    tx.send(link.to_string())
        .map_err(|_| anyhow!("clipboard worker exited"))?;
    *worker = Some(tx);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_writes_links_in_order() {
        let (seen_tx, seen_rx) = channel::<String>();
        let tx = spawn_worker(move |link| {
            let _ = seen_tx.send(link.to_uppercase());
        })
        .unwrap();

        tx.send("http://a".into()).unwrap();
        tx.send("http://b".into()).unwrap();
        drop(tx);

        let seen: Vec<String> = seen_rx.iter().collect();
        assert_eq!(seen, ["HTTP://A", "HTTP://B"]);
    }
}
