use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::render::Keyed;

/// A mutation queued for the list owner to apply.
#[derive(Debug)]
pub enum ListCommand<R> {
    /// Replace every entry. `None` is treated as an empty sequence.
    Replace(Option<Vec<R>>),
    /// Remove the entries wrapping this exact record.
    Remove(Arc<Keyed<R>>),
}

/// Write handle onto a [`PaginatedList`](crate::PaginatedList).
///
/// Handles never mutate the list directly: they queue a [`ListCommand`] and
/// the owner applies it with `process_pending` or `apply_next`. This keeps all
/// mutations on one task no matter where the handle ends up.
pub struct ListHandle<R> {
    tx: UnboundedSender<ListCommand<R>>,
}

impl<R> ListHandle<R> {
    pub(crate) fn new(tx: UnboundedSender<ListCommand<R>>) -> Self {
        Self { tx }
    }

    /// Queue a full replacement of the list contents
    pub fn replace_all(&self, records: Option<Vec<R>>) {
        let count = records.as_ref().map_or(0, Vec::len);
        log::debug!("Queueing replace of {} records", count);
        self.send(ListCommand::Replace(records));
    }

    /// Queue removal of `record`. The same `Arc` is forwarded so identity is kept.
    pub fn remove(&self, record: &Arc<Keyed<R>>) {
        log::debug!("Queueing removal of record with key {}", record.key);
        self.send(ListCommand::Remove(Arc::clone(record)));
    }

    /// True once the owning list has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, command: ListCommand<R>) {
        if self.tx.send(command).is_err() {
            // List dropped, ignore
            log::debug!("List receiver dropped, discarding command");
        }
    }
}

// Manual impl: deriving would require `R: Clone`.
impl<R> Clone for ListHandle<R> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<R> std::fmt::Debug for ListHandle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListHandle")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}
