use std::sync::Arc;

use crate::business::Business;
use crate::format::{format_detail, summary_line};
use crate::handle::ListHandle;

/// A record together with its 0-based position key.
///
/// Lists hold records as `Arc<Keyed<R>>` and compare them with `Arc::ptr_eq`,
/// so two records with equal contents are still distinct entries.
#[derive(Debug, Clone)]
pub struct Keyed<R> {
    pub key: usize,
    pub record: R,
}

impl<R> Keyed<R> {
    /// Wrap `records` with keys matching their position in the input
    pub fn sequence(records: Vec<R>) -> Vec<Arc<Keyed<R>>> {
        records
            .into_iter()
            .enumerate()
            .map(|(key, record)| Arc::new(Keyed { key, record }))
            .collect()
    }
}

/// Something displayable that wraps exactly one record
pub trait ListEntry<R> {
    fn record(&self) -> &Arc<Keyed<R>>;
}

/// Turns a record into a displayable entry.
///
/// The entry's removal trigger must call `list.remove` with the same `Arc`
/// it was given, otherwise the list cannot find it again.
pub trait ItemRenderer<R> {
    type Entry: ListEntry<R>;

    fn render(&self, record: Arc<Keyed<R>>, list: ListHandle<R>) -> Self::Entry;
}

impl<R, E, F> ItemRenderer<R> for F
where
    F: Fn(Arc<Keyed<R>>, ListHandle<R>) -> E,
    E: ListEntry<R>,
{
    type Entry = E;

    fn render(&self, record: Arc<Keyed<R>>, list: ListHandle<R>) -> E {
        self(record, list)
    }
}

/// List entry for a [`Business`], with a remove button and a detail popup
#[derive(Debug, Clone)]
pub struct BusinessEntry {
    record: Arc<Keyed<Business>>,
    list: ListHandle<Business>,
    popup_visible: bool,
}

impl BusinessEntry {
    pub fn business(&self) -> &Business {
        &self.record.record
    }

    pub fn key(&self) -> usize {
        self.record.key
    }

    /// One-line text shown in the list
    pub fn summary(&self) -> String {
        summary_line(self.business())
    }

    /// Popup text, with order and sales lines labelled by `month`
    pub fn detail(&self, month: time::Month) -> String {
        format_detail(self.business(), month)
    }

    pub fn show_popup(&mut self) {
        self.popup_visible = true;
    }

    pub fn close_popup(&mut self) {
        self.popup_visible = false;
    }

    pub fn is_popup_visible(&self) -> bool {
        self.popup_visible
    }

    /// Ask the owning list to drop this entry
    pub fn remove(&self) {
        self.list.remove(&self.record);
    }
}

impl ListEntry<Business> for BusinessEntry {
    fn record(&self) -> &Arc<Keyed<Business>> {
        &self.record
    }
}

/// Default renderer for customer lists
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessRenderer;

impl ItemRenderer<Business> for BusinessRenderer {
    type Entry = BusinessEntry;

    fn render(&self, record: Arc<Keyed<Business>>, list: ListHandle<Business>) -> BusinessEntry {
        BusinessEntry {
            record,
            list,
            popup_visible: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::ListCommand;

    fn business(name: &str) -> Business {
        Business {
            business_name: name.to_string(),
            city: "Guelph".to_string(),
            province: "ON".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sequence_assigns_positional_keys() {
        let keyed = Keyed::sequence(vec!["a", "b", "a"]);
        let keys: Vec<usize> = keyed.iter().map(|k| k.key).collect();
        assert_eq!(keys, vec![0, 1, 2]);
        // Equal values still get separate allocations
        assert!(!Arc::ptr_eq(&keyed[0], &keyed[2]));
    }

    #[test]
    fn test_business_entry_remove_sends_own_record() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let record = Arc::new(Keyed {
            key: 0,
            record: business("Fresh Greens"),
        });
        let entry = BusinessRenderer.render(Arc::clone(&record), ListHandle::new(tx));

        entry.remove();

        match rx.try_recv() {
            Ok(ListCommand::Remove(sent)) => assert!(Arc::ptr_eq(&sent, &record)),
            other => panic!("Expected Remove, got {:?}", other),
        }
    }

    #[test]
    fn test_business_entry_popup_toggle() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let mut entry = BusinessRenderer.render(
            Arc::new(Keyed {
                key: 0,
                record: business("Fresh Greens"),
            }),
            ListHandle::new(tx),
        );

        assert!(!entry.is_popup_visible());
        entry.show_popup();
        assert!(entry.is_popup_visible());
        entry.close_popup();
        assert!(!entry.is_popup_visible());
        assert_eq!(entry.summary(), "Fresh Greens (Guelph, ON)");
    }
}
