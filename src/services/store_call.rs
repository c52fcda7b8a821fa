use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreCallError<E> {
    #[error("store call timed out after {0:?}")]
    TimedOut(Duration),
    #[error(transparent)]
    Failed(E),
}

/// Runs one store call with an upper bound on its duration. An elapsed bound counts as a failure.
pub async fn bounded<T, E, F>(limit: Duration, call: F) -> Result<T, StoreCallError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(StoreCallError::Failed),
        Err(_) => Err(StoreCallError::TimedOut(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_results() {
        let ok: Result<u8, StoreCallError<String>> =
            bounded(Duration::from_millis(50), async { Ok(3) }).await;
        assert_eq!(ok.unwrap(), 3);

        let failed = bounded(Duration::from_millis(50), async { Err::<u8, _>("down") }).await;
        assert!(matches!(failed, Err(StoreCallError::Failed("down"))));
    }

    #[tokio::test]
    async fn times_out_slow_calls() {
        let res = bounded(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, String>(())
        })
        .await;
        assert!(matches!(res, Err(StoreCallError::TimedOut(_))));
    }
}
