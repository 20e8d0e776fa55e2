//! Bounded retry for structured LLM calls.
//!
//! A structured call can fail in two ways: the provider fails outright, or it
//! answers with something that is not the JSON we asked for. Only the second
//! is retried, and only with a larger token budget, since truncated output is
//! the usual cause of malformed JSON.

use std::future::Future;

use crate::error::LlmError;

/// Total attempts for one structured call (the first try plus one retry).
pub(crate) const MAX_ATTEMPTS: u32 = 2;

/// Returns `true` if `err` is worth another attempt with a bigger budget.
///
/// Retriable:
/// - [`LlmError::Decode`]: the answer did not parse or had the wrong shape.
///
/// Not retriable:
/// - [`LlmError::Provider`]: network, quota, or refusal; a bigger budget
///   would not change the outcome.
fn is_retriable(err: &LlmError) -> bool {
    matches!(err, LlmError::Decode { .. })
}

/// Budget for the attempt after one that used `budget` tokens: `budget * 1.5 + 500`.
pub(crate) fn next_budget(budget: u32) -> u32 {
    budget
        .saturating_add(budget / 2)
        .saturating_add(500)
}

/// Executes `operation` up to [`MAX_ATTEMPTS`] times, growing the token
/// budget between attempts.
///
/// `operation` receives the token budget for the current attempt. On a
/// retriable error the budget grows via [`next_budget`] and the operation
/// runs again; there is no sleep between attempts. Non-retriable errors and
/// the error of the final attempt are returned as-is.
pub(crate) async fn retry_with_budget<T, F, Fut>(
    initial_budget: u32,
    mut operation: F,
) -> Result<T, LlmError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut budget = initial_budget;
    let mut attempt = 1u32;

    loop {
        match operation(budget).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= MAX_ATTEMPTS {
                    return Err(err);
                }
                let next = next_budget(budget);
                tracing::warn!(
                    attempt,
                    budget,
                    next_budget = next,
                    error = %err,
                    "malformed structured response, retrying with a larger budget"
                );
                budget = next;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollaboratorError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn decode_error() -> LlmError {
        LlmError::Decode {
            step: "translate",
            reason: "expected value at line 1 column 1".to_owned(),
        }
    }

    #[test]
    fn next_budget_grows_by_half_plus_500() {
        assert_eq!(next_budget(1000), 2000);
        assert_eq!(next_budget(4000), 6500);
        assert_eq!(next_budget(u32::MAX), u32::MAX);
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_budget(1000, |_| {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, LlmError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_decode_error_with_larger_budget() {
        let budgets = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&budgets);
        let result = retry_with_budget(1000, |budget| {
            let seen = Arc::clone(&seen);
            async move {
                let mut seen = seen.lock().unwrap();
                seen.push(budget);
                if seen.len() == 1 {
                    Err(decode_error())
                } else {
                    Ok::<&str, LlmError>("ok")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(*budgets.lock().unwrap(), vec![1000, 2000]);
    }

    #[tokio::test]
    async fn gives_up_after_two_decode_failures() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_budget(1000, |_| {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, LlmError>(decode_error())
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
        assert!(matches!(result, Err(LlmError::Decode { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_provider_failure() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_budget(1000, |_| {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, LlmError>(LlmError::Provider {
                    step: "summarize",
                    source: CollaboratorError::new("quota exceeded"),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(LlmError::Provider { .. })));
    }
}
