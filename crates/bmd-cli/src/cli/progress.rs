//! Terminal progress printer fed by the executor's tick channel.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use bmd_core::executor::ProgressUpdate;

/// Minimum gap between running-state lines; terminal lines always print.
const PRINT_EVERY: Duration = Duration::from_millis(500);

/// Consumes updates until the channel closes. Terminal transitions print
/// unconditionally; running ticks are throttled so a short poll interval
/// does not flood the terminal.
pub fn spawn_printer(mut rx: mpsc::Receiver<ProgressUpdate>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        while let Some(update) = rx.recv().await {
            if update.status.is_terminal() {
                println!("  {:<44} {}", update.name, update.status.as_str());
                continue;
            }
            let due = last_print.map_or(true, |t| t.elapsed() >= PRINT_EVERY);
            if due {
                println!("  {:<44} {}", update.name, render_amount(&update));
                last_print = Some(Instant::now());
            }
        }
    })
}

fn render_amount(update: &ProgressUpdate) -> String {
    match update.expected_bytes {
        Some(total) if total > 0 => format!(
            "{:>3.0}% ({} / {})",
            update.fraction() * 100.0,
            human_bytes(update.bytes_done),
            human_bytes(total)
        ),
        _ => human_bytes(update.bytes_done),
    }
}

fn human_bytes(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
    let b = bytes as f64;
    if b >= GIB {
        format!("{:.2} GiB", b / GIB)
    } else if b >= MIB {
        format!("{:.1} MiB", b / MIB)
    } else {
        format!("{bytes} B")
    }
}
