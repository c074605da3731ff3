use rand::RngExt;
use tracing::warn;

use crate::domain::repository::{Mailer, QuoteListRepository, UserRepository};
use crate::domain::types::Quote;
use crate::error::ApiError;

const DIGEST_SUBJECT: &str = "Your Daily Quotes";

/// One pick from each of a user's pinned lists, composed into the daily
/// digest mail. Users with no pinned lists (or only empty ones) get nothing.
pub struct SendDailyDigestUseCase<U, Q, M>
where
    U: UserRepository,
    Q: QuoteListRepository,
    M: Mailer,
{
    pub users: U,
    pub quote_lists: Q,
    pub mailer: M,
}

impl<U, Q, M> SendDailyDigestUseCase<U, Q, M>
where
    U: UserRepository,
    Q: QuoteListRepository,
    M: Mailer,
{
    /// Returns the number of digest emails sent. A send failure for one user
    /// is logged and does not abort the sweep.
    pub async fn execute(&self) -> Result<u32, ApiError> {
        let users = self.users.list_all().await?;
        let mut sent = 0;

        for user in users {
            let pinned = self.quote_lists.find_pinned_by_user(user.id).await?;
            let picks: Vec<Quote> = pinned
                .iter()
                .filter(|list| !list.quotes.is_empty())
                .map(|list| {
                    let mut rng = rand::rng();
                    list.quotes[rng.random_range(0..list.quotes.len())].clone()
                })
                .collect();
            if picks.is_empty() {
                continue;
            }

            let body = compose_digest_body(&picks);
            match self.mailer.send(&user.email, DIGEST_SUBJECT, &body).await {
                Ok(()) => sent += 1,
                Err(e) => warn!(email = %user.email, error = %e, "digest mail failed"),
            }
        }

        Ok(sent)
    }
}

fn compose_digest_body(picks: &[Quote]) -> String {
    let items = picks
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let origin = if q.origin.is_empty() {
                "Unknown"
            } else {
                &q.origin
            };
            format!("{}. \"{}\"\n   - {}", i + 1, q.quote, origin)
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Here are your quotes for today:\n\n{items}")
}
