// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bounded fan-out over an `ImageSource`.
//
// At most `concurrency` fetches are in flight at once.  Results come back in
// submission order whatever order they complete in, and each slot fails on
// its own: an error or a panicking task leaves that slot `None` and nothing
// else.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::source::ImageSource;

/// Fetch every reference and wait for the whole batch.
///
/// The returned vector has one entry per input reference, at the same index.
#[instrument(skip(source, refs), fields(count = refs.len()))]
pub async fn fetch_all<S>(source: Arc<S>, refs: Vec<String>, concurrency: usize) -> Vec<Option<Vec<u8>>>
where
    S: ImageSource + 'static,
{
    let total = refs.len();
    let limit = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, image_ref) in refs.into_iter().enumerate() {
        let permit = match Arc::clone(&limit).acquire_owned().await {
            Ok(permit) => permit,
            Err(err) => {
                warn!(%err, "fetch limiter closed, remaining images left blank");
                break;
            }
        };
        let source = Arc::clone(&source);
        tasks.spawn(async move {
            let result = source.fetch(&image_ref).await;
            drop(permit);
            (index, image_ref, result)
        });
    }

    let mut results: Vec<Option<Vec<u8>>> = vec![None; total];
    let mut failed = 0usize;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, _, Ok(bytes))) => {
                debug!(index, bytes = bytes.len(), "image fetched");
                results[index] = Some(bytes);
            }
            Ok((index, image_ref, Err(err))) => {
                warn!(index, image_ref = %image_ref, error = %err, "image fetch failed, cell left blank");
                failed += 1;
            }
            Err(err) => {
                warn!(%err, "image fetch task aborted, cell left blank");
                failed += 1;
            }
        }
    }

    info!(total, failed, "image batch resolved");
    results
}
