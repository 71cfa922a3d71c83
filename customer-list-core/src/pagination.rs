use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::error::ListError;
use crate::handle::{ListCommand, ListHandle};
use crate::loader::AsyncLoader;
use crate::render::{ItemRenderer, Keyed, ListEntry};

/// Whether a list has anything to show yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Populated,
}

/// Paged list of rendered entries.
///
/// Pages are 1-based. The "last page" flag only gates the next-page control;
/// the page number itself has no upper bound, so a page past the end simply
/// shows nothing.
///
/// All mutation goes through `&mut self`. Handles given out to loaders and
/// entries queue commands which the owner applies with
/// [`process_pending`](Self::process_pending) or [`apply_next`](Self::apply_next).
pub struct PaginatedList<R, W: ItemRenderer<R>> {
    entries: Vec<W::Entry>,
    page_size: usize,
    page_number: usize,
    is_last_page: bool,
    renderer: W,
    activated: bool,
    commands_tx: UnboundedSender<ListCommand<R>>,
    commands_rx: UnboundedReceiver<ListCommand<R>>,
}

// Page math is done signed so `len - 1` on an empty list is -1, not a wrap.
fn signed(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl<R, W: ItemRenderer<R>> PaginatedList<R, W> {
    pub fn new(page_size: usize, initial: Option<Vec<R>>, renderer: W) -> Result<Self, ListError> {
        if page_size == 0 {
            return Err(ListError::InvalidConfig(
                "page size must be greater than zero".to_string(),
            ));
        }

        let initial = initial.unwrap_or_default();
        let (commands_tx, commands_rx) = tokio::sync::mpsc::unbounded_channel();
        let mut list = Self {
            entries: Vec::new(),
            page_size,
            page_number: 1,
            is_last_page: page_size >= initial.len(),
            renderer,
            activated: false,
            commands_tx,
            commands_rx,
        };
        list.entries = list.wrap(initial);
        Ok(list)
    }

    /// Hand a loader its handle. Only the first call does anything.
    pub fn activate<L: AsyncLoader<R>>(&mut self, loader: L) -> bool {
        if self.activated {
            log::warn!("List already activated, ignoring loader");
            return false;
        }
        self.activated = true;
        log::debug!("Activating list with {} entries", self.entries.len());
        loader.load(self.handle());
        true
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// A new handle onto this list's command queue
    pub fn handle(&self) -> ListHandle<R> {
        ListHandle::new(self.commands_tx.clone())
    }

    /// Replace every entry. Keys are reassigned by position; the page number is kept.
    pub fn replace_all(&mut self, records: Option<Vec<R>>) {
        let records = records.unwrap_or_default();
        self.is_last_page = self.page_size >= records.len();
        self.entries = self.wrap(records);
        log::debug!(
            "Replaced list contents: {} entries, page {}",
            self.entries.len(),
            self.page_number
        );
    }

    /// Remove every entry wrapping exactly `record` (pointer identity).
    ///
    /// Steps back a page when the current one would start past the end. The
    /// page checks are made against the length before removal, even when
    /// nothing matched.
    pub fn remove_one(&mut self, record: &Arc<Keyed<R>>) {
        let before = signed(self.entries.len());
        self.entries
            .retain(|entry| !Arc::ptr_eq(entry.record(), record));

        let size = signed(self.page_size);
        let page = signed(self.page_number);
        if (page - 1).saturating_mul(size) >= before - 1 {
            self.page_number = self.page_number.saturating_sub(1).max(1);
        }
        self.is_last_page = signed(self.page_number).saturating_mul(size) >= before - 1;

        log::debug!(
            "Removed record with key {}: {} -> {} entries, page {}",
            record.key,
            before,
            self.entries.len(),
            self.page_number
        );
    }

    /// Jump to `target`, clamped to at least 1.
    ///
    /// The last-page flag is computed from the unclamped target.
    pub fn change_page(&mut self, target: i64) {
        self.page_number = usize::try_from(target.max(1)).unwrap_or(usize::MAX);
        self.is_last_page =
            target.saturating_mul(signed(self.page_size)) >= signed(self.entries.len());
    }

    pub fn previous_page(&mut self) {
        self.change_page(signed(self.page_number) - 1);
    }

    pub fn next_page(&mut self) {
        self.change_page(signed(self.page_number).saturating_add(1));
    }

    /// Entries on the current page
    pub fn visible_slice(&self) -> &[W::Entry] {
        let (start, end) = self.visible_range();
        &self.entries[start..end]
    }

    pub fn visible_slice_mut(&mut self) -> &mut [W::Entry] {
        let (start, end) = self.visible_range();
        &mut self.entries[start..end]
    }

    pub fn visible_range(&self) -> (usize, usize) {
        let len = self.entries.len();
        let start = (self.page_number - 1)
            .saturating_mul(self.page_size)
            .min(len);
        let end = self
            .page_number
            .saturating_mul(self.page_size)
            .max(self.page_size)
            .min(len);
        (start, end)
    }

    /// Apply every queued command without waiting. Returns how many ran.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.commands_rx.try_recv() {
            self.apply(command);
            applied += 1;
        }
        applied
    }

    /// Wait for the next queued command and apply it.
    ///
    /// Cancel safe, so it can sit in a `tokio::select!` next to other input.
    pub async fn apply_next(&mut self) {
        if let Some(command) = self.commands_rx.recv().await {
            self.apply(command);
        }
    }

    pub fn apply(&mut self, command: ListCommand<R>) {
        match command {
            ListCommand::Replace(records) => self.replace_all(records),
            ListCommand::Remove(record) => self.remove_one(&record),
        }
    }

    pub fn entries(&self) -> &[W::Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self) -> ListState {
        if self.entries.is_empty() {
            ListState::Loading
        } else {
            ListState::Populated
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn is_last_page(&self) -> bool {
        self.is_last_page
    }

    pub fn can_go_previous(&self) -> bool {
        self.page_number != 1
    }

    pub fn can_go_next(&self) -> bool {
        !self.is_last_page
    }

    fn wrap(&self, records: Vec<R>) -> Vec<W::Entry> {
        Keyed::sequence(records)
            .into_iter()
            .map(|record| self.renderer.render(record, self.handle()))
            .collect()
    }
}

impl<R, W: ItemRenderer<R>> std::fmt::Debug for PaginatedList<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedList")
            .field("len", &self.entries.len())
            .field("page_size", &self.page_size)
            .field("page_number", &self.page_number)
            .field("is_last_page", &self.is_last_page)
            .field("activated", &self.activated)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SourceLoader;
    use crate::source::StaticSource;

    struct TestEntry {
        record: Arc<Keyed<&'static str>>,
        list: ListHandle<&'static str>,
    }

    impl TestEntry {
        fn remove(&self) {
            self.list.remove(&self.record);
        }
    }

    impl ListEntry<&'static str> for TestEntry {
        fn record(&self) -> &Arc<Keyed<&'static str>> {
            &self.record
        }
    }

    type Wrap = fn(Arc<Keyed<&'static str>>, ListHandle<&'static str>) -> TestEntry;
    type TestList = PaginatedList<&'static str, Wrap>;

    fn wrap(record: Arc<Keyed<&'static str>>, list: ListHandle<&'static str>) -> TestEntry {
        TestEntry { record, list }
    }

    fn create_list(page_size: usize, records: &[&'static str]) -> TestList {
        let initial = if records.is_empty() {
            None
        } else {
            Some(records.to_vec())
        };
        PaginatedList::new(page_size, initial, wrap as Wrap).unwrap()
    }

    fn names(entries: &[TestEntry]) -> Vec<&'static str> {
        entries.iter().map(|e| e.record.record).collect()
    }

    #[test]
    fn test_new_empty_is_loading() {
        let list = create_list(4, &[]);
        assert_eq!(list.len(), 0);
        assert_eq!(list.page_number(), 1);
        assert!(list.is_last_page());
        assert_eq!(list.state(), ListState::Loading);
        assert!(!list.can_go_previous());
        assert!(!list.can_go_next());
    }

    #[test]
    fn test_new_zero_page_size_rejected() {
        let result = PaginatedList::new(0, Some(vec!["A"]), wrap as Wrap);
        assert!(matches!(result, Err(ListError::InvalidConfig(_))));
    }

    #[test]
    fn test_new_with_records_assigns_keys() {
        let list = create_list(4, &["A", "B", "C", "D", "E"]);
        assert_eq!(list.len(), 5);
        assert_eq!(list.state(), ListState::Populated);
        assert!(!list.is_last_page());
        for (position, entry) in list.entries().iter().enumerate() {
            assert_eq!(entry.record.key, position);
        }

        let exact = create_list(4, &["A", "B", "C", "D"]);
        assert!(exact.is_last_page());
    }

    #[test]
    fn test_replace_all_last_page_flag() {
        let mut list = create_list(3, &[]);
        for n in 0..8 {
            let records: Vec<&'static str> = std::iter::repeat("X").take(n).collect();
            list.replace_all(Some(records));
            assert_eq!(list.is_last_page(), 3 >= n, "n = {}", n);
            assert_eq!(list.len(), n);
        }
    }

    #[test]
    fn test_replace_all_none_matches_empty() {
        let mut from_none = create_list(4, &["A", "B", "C", "D", "E"]);
        let mut from_empty = create_list(4, &["A", "B", "C", "D", "E"]);
        from_none.next_page();
        from_empty.next_page();

        from_none.replace_all(None);
        from_empty.replace_all(Some(Vec::new()));

        for list in [&from_none, &from_empty] {
            assert!(list.is_empty());
            assert!(list.is_last_page());
            assert_eq!(list.state(), ListState::Loading);
            assert_eq!(list.page_number(), 2);
        }
    }

    #[test]
    fn test_replace_all_keeps_page_and_rekeys() {
        let mut list = create_list(2, &["A", "B", "C", "D", "E", "F"]);
        list.change_page(3);
        assert_eq!(names(list.visible_slice()), vec!["E", "F"]);

        list.replace_all(Some(vec!["X", "Y"]));
        assert_eq!(list.page_number(), 3);
        assert!(list.is_last_page());
        assert!(list.visible_slice().is_empty());

        let keys: Vec<usize> = list.entries().iter().map(|e| e.record.key).collect();
        assert_eq!(keys, vec![0, 1]);
    }

    #[test]
    fn test_navigation_scenario() {
        let mut list = create_list(4, &["A", "B", "C", "D", "E"]);
        assert_eq!(names(list.visible_slice()), vec!["A", "B", "C", "D"]);

        list.next_page();
        assert_eq!(list.page_number(), 2);
        assert_eq!(names(list.visible_slice()), vec!["E"]);
        assert!(list.is_last_page());
        assert!(list.can_go_previous());
        assert!(!list.can_go_next());

        list.previous_page();
        assert_eq!(list.page_number(), 1);
        assert!(!list.is_last_page());
        assert!(!list.can_go_previous());
    }

    #[test]
    fn test_change_page_clamps_low() {
        let mut list = create_list(4, &["A", "B", "C", "D", "E"]);
        for target in [0, -1, -1000, i64::MIN] {
            list.change_page(target);
            assert_eq!(list.page_number(), 1);
            assert!(!list.is_last_page(), "target = {}", target);
        }

        list.previous_page();
        assert_eq!(list.page_number(), 1);
    }

    #[test]
    fn test_change_page_has_no_upper_clamp() {
        let mut list = create_list(4, &["A", "B", "C", "D", "E"]);
        list.change_page(10);
        assert_eq!(list.page_number(), 10);
        assert!(list.is_last_page());
        assert!(list.visible_slice().is_empty());

        // Flag follows the raw target, even an empty list on page 0
        let mut empty = create_list(4, &[]);
        empty.change_page(0);
        assert_eq!(empty.page_number(), 1);
        assert!(empty.is_last_page());
    }

    #[test]
    fn test_remove_last_entry_on_page_steps_back() {
        let mut list = create_list(4, &["A", "B", "C", "D", "E"]);
        list.next_page();
        let e = Arc::clone(list.entries()[4].record());

        list.remove_one(&e);
        assert_eq!(names(list.entries()), vec!["A", "B", "C", "D"]);
        assert_eq!(list.page_number(), 1);
        assert!(list.is_last_page());
    }

    #[test]
    fn test_remove_keeps_page_when_items_remain() {
        let mut list = create_list(2, &["A", "B", "C", "D", "E"]);
        list.next_page();
        let c = Arc::clone(list.entries()[2].record());

        list.remove_one(&c);
        assert_eq!(names(list.entries()), vec!["A", "B", "D", "E"]);
        assert_eq!(list.page_number(), 2);
        // 2 * 2 >= 5 - 1
        assert!(list.is_last_page());
        assert_eq!(names(list.visible_slice()), vec!["D", "E"]);
    }

    #[test]
    fn test_remove_uses_identity_not_value() {
        let mut list = create_list(4, &["A", "A", "B"]);
        let first = Arc::clone(list.entries()[0].record());

        list.remove_one(&first);
        assert_eq!(list.len(), 2);
        assert_eq!(list.entries()[0].record.key, 1);

        // Equal value, different allocation: nothing matches
        let lookalike = Arc::new(Keyed { key: 1, record: "A" });
        list.remove_one(&lookalike);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_absent_record_still_recomputes_flag() {
        let mut list = create_list(4, &["A", "B", "C", "D", "E"]);
        assert!(!list.is_last_page());

        let stranger = Arc::new(Keyed { key: 0, record: "Z" });
        list.remove_one(&stranger);
        assert_eq!(list.len(), 5);
        assert_eq!(list.page_number(), 1);
        // Compared against len - 1 even though nothing was removed
        assert!(list.is_last_page());
    }

    #[test]
    fn test_remove_from_empty_list() {
        let mut list = create_list(4, &[]);
        list.change_page(3);

        let stranger = Arc::new(Keyed { key: 0, record: "Z" });
        list.remove_one(&stranger);
        assert_eq!(list.page_number(), 2);
        assert!(list.is_last_page());
    }

    #[test]
    fn test_visible_slice_is_stable() {
        let mut list = create_list(4, &["A", "B"]);
        assert_eq!(list.visible_range(), (0, 2));
        assert_eq!(names(list.visible_slice()), names(list.visible_slice()));

        list.next_page();
        assert_eq!(list.visible_range(), (2, 2));
    }

    #[test]
    fn test_entry_trigger_goes_through_queue() {
        let mut list = create_list(4, &["A", "B", "C"]);
        list.entries()[1].remove();

        // Nothing happens until the owner drains the queue
        assert_eq!(list.len(), 3);
        assert_eq!(list.process_pending(), 1);
        assert_eq!(names(list.entries()), vec!["A", "C"]);
        assert_eq!(list.process_pending(), 0);
    }

    #[test]
    fn test_activate_runs_loader_once() {
        let mut list = create_list(4, &[]);
        let mut calls = 0;

        assert!(list.activate(|handle: ListHandle<&'static str>| {
            calls += 1;
            handle.replace_all(Some(vec!["A", "B"]));
        }));
        assert!(!list.activate(|_handle: ListHandle<&'static str>| {
            panic!("second loader must not run");
        }));
        assert_eq!(calls, 1);
        assert!(list.is_activated());

        list.process_pending();
        assert_eq!(names(list.entries()), vec!["A", "B"]);
        assert!(list.is_last_page());
    }

    #[test]
    fn test_loader_that_never_replies_leaves_list_loading() {
        let mut list = create_list(4, &[]);
        list.activate(|_handle: ListHandle<&'static str>| {});

        assert_eq!(list.process_pending(), 0);
        assert_eq!(list.state(), ListState::Loading);
    }

    #[tokio::test]
    async fn test_activate_with_background_source() {
        let mut list = create_list(2, &[]);
        list.activate(SourceLoader::new(StaticSource::new(vec!["A", "B", "C"])));

        list.apply_next().await;
        assert_eq!(list.state(), ListState::Populated);
        assert_eq!(names(list.visible_slice()), vec!["A", "B"]);
        assert!(!list.is_last_page());
    }
}
