//! Bounded iteration
//!
//! Runs a sub-machine once per item of a collection taken from the context.
//! Each sub-run is spawned as its own task holding a semaphore permit, so at
//! most `max_concurrency` sub-runs are in flight. Results are collected in
//! item order regardless of completion order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::error::WorkflowError;
use crate::machine::{Completed, StateMachine};

/// Type-erased bounded iteration over a parent context `C`
#[async_trait]
pub trait Iterate<C>: Send + Sync {
    /// Runs every item and records the results in the returned context
    async fn iterate(&self, step: &'static str, context: C) -> Result<C, WorkflowError>;

    fn max_concurrency(&self) -> usize;
}

/// Bounded iteration from parent context `C` over items `T`, each processed
/// by a sub-machine over item context `I`
pub struct MapStep<C, T, I> {
    /// Reads the collection to iterate from the parent context
    items: fn(&C) -> Vec<T>,

    /// Builds the isolated context of one sub-run from the parent and the item
    item_context: fn(&C, T) -> I,

    /// Writes the ordered sub-run results into the parent context
    result: fn(&mut C, Vec<Completed<I>>),

    processor: Arc<StateMachine<I>>,
    max_concurrency: usize,
}

impl<C, T, I> MapStep<C, T, I> {
    /// Creates a fully sequential iteration
    pub fn new(
        items: fn(&C) -> Vec<T>,
        item_context: fn(&C, T) -> I,
        processor: StateMachine<I>,
        result: fn(&mut C, Vec<Completed<I>>),
    ) -> Self {
        Self {
            items,
            item_context,
            result,
            processor: Arc::new(processor),
            max_concurrency: 1,
        }
    }

    /// Sets how many sub-runs may be in flight at once
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}

#[async_trait]
impl<C, T, I> Iterate<C> for MapStep<C, T, I>
where
    C: Send + 'static,
    T: Send + 'static,
    I: Send + 'static,
{
    async fn iterate(&self, step: &'static str, mut context: C) -> Result<C, WorkflowError> {
        let items = (self.items)(&context);
        debug!(
            step,
            items = items.len(),
            max_concurrency = self.max_concurrency,
            "Starting iteration"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let failed = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            // Wait for a free slot before starting the next item
            let permit = Arc::clone(&semaphore).acquire_owned().await.map_err(|e| {
                WorkflowError::IterationAborted {
                    step: step.to_string(),
                    index,
                    message: e.to_string(),
                }
            })?;

            if failed.load(Ordering::SeqCst) {
                debug!(step, index, "Not starting remaining items after a failure");
                break;
            }

            let processor = Arc::clone(&self.processor);
            let failed = Arc::clone(&failed);
            let item_context = (self.item_context)(&context, item);

            handles.push(tokio::spawn(async move {
                let result = processor.run(item_context).await;
                if result.is_err() {
                    failed.store(true, Ordering::SeqCst);
                }
                drop(permit);
                result
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        let mut handles = handles.into_iter().enumerate();

        while let Some((index, handle)) = handles.next() {
            let error = match handle.await {
                Ok(Ok(completed)) => {
                    results.push(completed);
                    continue;
                }
                Ok(Err(source)) => WorkflowError::IterationFailed {
                    step: step.to_string(),
                    index,
                    source: Box::new(source),
                },
                Err(join_error) => WorkflowError::IterationAborted {
                    step: step.to_string(),
                    index,
                    message: join_error.to_string(),
                },
            };

            for (_, pending) in handles.by_ref() {
                pending.abort();
            }
            warn!(step, index, "Iteration failed: {}", error);
            return Err(error);
        }

        (self.result)(&mut context, results);
        Ok(context)
    }

    fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}
