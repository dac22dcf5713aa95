//! Shared utilities for use cases.
//!
//! Cancellation helpers and the bounded-attempt wrapper used by both the
//! coordinator and the pipeline.

use crate::ports::actor::{ActContext, ActError, ActOutput, Actor};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Whether cancellation has been requested.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(|t| t.is_cancelled())
}

/// Resolve when the token is cancelled; never resolves without a token.
pub(crate) async fn cancelled(token: Option<CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

/// Resolve after `limit`; never resolves without one.
pub(crate) async fn deadline(limit: Option<Duration>) {
    match limit {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}

/// One actor call with an optional timeout.
pub(crate) async fn act_once(
    actor: &dyn Actor,
    ctx: &ActContext,
    timeout: Option<Duration>,
) -> Result<ActOutput, ActError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, actor.act(ctx))
            .await
            .map_err(|_| ActError::Timeout(limit))?,
        None => actor.act(ctx).await,
    }
}

/// Call an actor up to `attempts` times until `accept` yields a value.
///
/// Errors and rejected outputs both consume an attempt. Returns the value
/// (if any) and the number of attempts used. A non-retryable error, such as
/// missing credentials, is returned as-is.
pub(crate) async fn act_with_retry<T>(
    actor: &dyn Actor,
    ctx: &ActContext,
    attempts: u8,
    timeout: Option<Duration>,
    accept: impl Fn(ActOutput) -> Option<T>,
) -> Result<(Option<T>, u8), ActError> {
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        match act_once(actor, ctx, timeout).await {
            Ok(output) => match accept(output) {
                Some(value) => return Ok((Some(value), attempt)),
                None => warn!(
                    actor = actor.name(),
                    phase = %ctx.phase,
                    attempt,
                    "Unusable response"
                ),
            },
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                warn!(actor = actor.name(), phase = %ctx.phase, attempt, "Call failed: {}", e);
            }
        }
    }
    Ok((None, attempts))
}
