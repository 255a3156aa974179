//! Write transactions over the graph store
//!
//! Property writes are staged and applied together on commit. Each applied
//! write records the value it replaced; if any write fails, every write of
//! the batch is undone before the error is returned.

use super::property::PropertyValue;
use super::store::{GraphResult, GraphStore};
use super::types::NodeId;
use tracing::{debug, warn};

/// A staged node property write
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyWrite {
    pub node: NodeId,
    pub key: String,
    pub value: PropertyValue,
}

/// All-or-nothing batch of property writes against one store
///
/// Holding the transaction holds the exclusive borrow of the store, so the
/// reads that decide what to write and the writes themselves see the same
/// state.
pub struct Transaction<'a> {
    store: &'a mut GraphStore,
    staged: Vec<PropertyWrite>,
}

impl<'a> Transaction<'a> {
    pub fn begin(store: &'a mut GraphStore) -> Self {
        Self {
            store,
            staged: Vec::new(),
        }
    }

    /// Read access to the store inside the transaction
    pub fn store(&self) -> &GraphStore {
        &*self.store
    }

    /// Stage a property write
    pub fn set_node_property(
        &mut self,
        node: NodeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) {
        self.staged.push(PropertyWrite {
            node,
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn staged(&self) -> &[PropertyWrite] {
        &self.staged
    }

    /// Apply every staged write, or none of them
    ///
    /// Returns the number of writes applied.
    pub fn commit(self) -> GraphResult<usize> {
        let Transaction { store, staged } = self;
        let mut undo: Vec<(NodeId, String, Option<PropertyValue>)> = Vec::with_capacity(staged.len());

        for write in staged {
            match store.set_node_property(write.node, write.key.clone(), write.value) {
                Ok(previous) => undo.push((write.node, write.key, previous)),
                Err(e) => {
                    warn!(
                        "Transaction write to {} failed, rolling back {} applied writes: {}",
                        write.node,
                        undo.len(),
                        e
                    );
                    for (node, key, previous) in undo.into_iter().rev() {
                        store.restore_node_property(node, &key, previous);
                    }
                    return Err(e);
                }
            }
        }

        debug!("Transaction committed {} writes", undo.len());
        Ok(undo.len())
    }

    /// Drop every staged write
    pub fn rollback(self) {
        debug!("Transaction rolled back with {} staged writes", self.staged.len());
    }
}
