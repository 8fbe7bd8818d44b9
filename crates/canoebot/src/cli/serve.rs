//! Long-running `serve` command.

use canoebot::{BookingCache, CanoebotResult, CommandHandler, RefreshService, TableSource};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

/// Handle the `serve` command.
///
/// Prefills today's tables, starts the refresh scheduler and answers one
/// command per stdin line until EOF or Ctrl+C.
pub async fn serve<S: TableSource + 'static>(cache: BookingCache<S>) -> CanoebotResult<()> {
    let report = cache.prefill_today_for_all_facilities().await;
    if report.is_clean() {
        info!(facilities = report.refreshed(), "Cache prefilled");
    } else {
        warn!(
            failed = report.failures().len(),
            "Prefill incomplete, missing lines load on first lookup"
        );
    }

    let refresh = RefreshService::start(cache.clone(), cache.config().refresh_interval());
    let handler = CommandHandler::new(cache).with_refresher(refresh.trigger());

    info!("Serving commands from stdin. Press Ctrl+C to stop.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => println!("{}\n", handler.handle(&line).await),
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "Failed to read stdin");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    refresh.shutdown().await;
    info!("Stopped");
    Ok(())
}
