//! Daily digest tick: sleep until the configured UTC hour, run the sweep,
//! repeat. Spawned from `main` alongside the HTTP server.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tracing::{error, info};

use crate::state::AppState;
use crate::usecase::digest::SendDailyDigestUseCase;

/// Time from `now` until the next occurrence of `hour:00:00` UTC. If `now`
/// is already past today's tick, the next one is tomorrow.
pub fn duration_until_hour(now: DateTime<Utc>, hour: u32) -> std::time::Duration {
    let today = now
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| now.date_naive().and_hms_opt(0, 0, 0).expect("midnight"))
        .and_utc();
    let next = if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    };
    (next - now).to_std().unwrap_or_default()
}

pub async fn run_daily_digest(state: AppState, hour: u32) {
    loop {
        let wait = duration_until_hour(Utc::now(), hour);
        info!(seconds = wait.as_secs(), "next digest scheduled");
        tokio::time::sleep(wait).await;

        let usecase = SendDailyDigestUseCase {
            users: state.user_repo(),
            quote_lists: state.quote_list_repo(),
            mailer: state.mailer(),
        };
        match usecase.execute().await {
            Ok(sent) => info!(sent, "daily digest complete"),
            Err(e) => error!(error = %e, "daily digest failed"),
        }
    }
}
