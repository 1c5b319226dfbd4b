use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use super::Event;

/// Forward stdin lines into the driver's channel until stdin closes or the
/// driver goes away
pub(crate) fn spawn_stdin(tx: Sender<Event>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Event::Line(line)).is_err() {
                return;
            }
        }
        debug!("stdin closed");
        let _ = tx.send(Event::InputClosed);
    });
}
