//! Fetch fan-out, table assembly and the read-only views built on top.

pub mod fetch;
pub mod table;
pub mod views;

use std::future::Future;
use std::time::Duration;

/// Join `tasks`, giving up on any still pending once `deadline` elapses.
///
/// Finished tasks yield `Some`; tasks cut off by the deadline yield `None`
/// at their position, so callers can report them individually.
pub async fn join_with_deadline<I, F, T>(tasks: I, deadline: Option<Duration>) -> Vec<Option<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T>,
{
    match deadline {
        None => futures::future::join_all(tasks.into_iter().map(|t| async move { Some(t.await) })).await,
        Some(d) => {
            let at = tokio::time::Instant::now() + d;
            futures::future::join_all(
                tasks
                    .into_iter()
                    .map(|t| async move { tokio::time::timeout_at(at, t).await.ok() }),
            )
            .await
        }
    }
}
