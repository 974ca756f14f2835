// ── Reactive product list ──
//
// The ordered list the store displays. Order matters (new products go to
// the front, rollbacks return to their old slot), so this is a Vec behind
// a `watch` channel rather than a keyed map. Subscribers get a fresh
// `Arc` snapshot after every mutation.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{Product, ProductId};

/// One row of the displayed list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    /// A product the backend has acknowledged.
    Confirmed(Product),
    /// An optimistic create awaiting the backend. `temp_id` equals
    /// `product.id` until reconciliation replaces the entry.
    Pending { product: Product, temp_id: ProductId },
}

impl ListEntry {
    pub fn product(&self) -> &Product {
        match self {
            Self::Confirmed(product) | Self::Pending { product, .. } => product,
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.product().id
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn into_product(self) -> Product {
        match self {
            Self::Confirmed(product) | Self::Pending { product, .. } => product,
        }
    }
}

pub type Snapshot = Arc<Vec<ListEntry>>;

pub(crate) struct ProductList {
    entries: watch::Sender<Snapshot>,
}

impl ProductList {
    pub(crate) fn new() -> Self {
        let (entries, _) = watch::channel(Arc::new(Vec::new()));
        Self { entries }
    }

    /// Swap in a freshly fetched page.
    pub(crate) fn replace_all(&self, products: Vec<Product>) {
        let entries = products.into_iter().map(ListEntry::Confirmed).collect();
        self.entries.send_replace(Arc::new(entries));
    }

    /// Insert at the front.
    pub(crate) fn prepend(&self, entry: ListEntry) {
        self.entries
            .send_modify(|list| Arc::make_mut(list).insert(0, entry));
    }

    /// Replace the pending entry holding `temp_id` with the confirmed
    /// product. Returns `false` if the placeholder is already gone.
    pub(crate) fn reconcile(&self, temp_id: &ProductId, product: Product) -> bool {
        self.entries.send_if_modified(|list| {
            let Some(idx) = position(list, temp_id) else {
                return false;
            };
            Arc::make_mut(list)[idx] = ListEntry::Confirmed(product);
            true
        })
    }

    /// Replace the entry with the same id, if present.
    pub(crate) fn replace(&self, product: Product) -> bool {
        self.entries.send_if_modified(|list| {
            let Some(idx) = position(list, &product.id) else {
                return false;
            };
            Arc::make_mut(list)[idx] = ListEntry::Confirmed(product);
            true
        })
    }

    /// Replace in place when the id exists, otherwise prepend.
    pub(crate) fn upsert(&self, product: Product) {
        self.entries.send_modify(|list| {
            let list = Arc::make_mut(list);
            match list.iter().position(|e| *e.id() == product.id) {
                Some(idx) => list[idx] = ListEntry::Confirmed(product),
                None => list.insert(0, ListEntry::Confirmed(product)),
            }
        });
    }

    /// Remove the entry with `id`, returning its former index and value.
    pub(crate) fn remove(&self, id: &ProductId) -> Option<(usize, ListEntry)> {
        let mut removed = None;
        self.entries.send_if_modified(|list| {
            let Some(idx) = position(list, id) else {
                return false;
            };
            removed = Some((idx, Arc::make_mut(list).remove(idx)));
            true
        });
        removed
    }

    /// Put `entry` back at `index` (clamped to the current length).
    /// Skipped when an entry with the same id has reappeared meanwhile.
    pub(crate) fn restore(&self, index: usize, entry: ListEntry) -> bool {
        self.entries.send_if_modified(|list| {
            if position(list, entry.id()).is_some() {
                return false;
            }
            let list = Arc::make_mut(list);
            let index = index.min(list.len());
            list.insert(index, entry);
            true
        })
    }

    pub(crate) fn get(&self, id: &ProductId) -> Option<Product> {
        self.entries
            .borrow()
            .iter()
            .find(|e| e.id() == id)
            .map(|e| e.product().clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        self.entries.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.entries.subscribe()
    }
}

fn position(list: &[ListEntry], id: &ProductId) -> Option<usize> {
    list.iter().position(|e| e.id() == id)
}
