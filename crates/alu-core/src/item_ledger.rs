//! Ordered list of committed quote items.

use alu_domain::ConfiguredItem;

use crate::error::WizardError;

/// Where a commit landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Appended { index: usize },
    Replaced { index: usize },
}

impl CommitOutcome {
    pub fn index(self) -> usize {
        match self {
            CommitOutcome::Appended { index } | CommitOutcome::Replaced { index } => index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteTotals {
    pub item_count: usize,
    pub unit_count: u64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemLedger {
    items: Vec<ConfiguredItem>,
    editing_index: Option<usize>,
}

impl ItemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<ConfiguredItem>) -> Self {
        Self {
            items,
            editing_index: None,
        }
    }

    pub fn items(&self) -> &[ConfiguredItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ConfiguredItem> {
        self.items
    }

    pub fn get(&self, index: usize) -> Option<&ConfiguredItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.editing_index
    }

    /// Replaces the item being edited, or appends when none is.
    pub fn commit(&mut self, item: ConfiguredItem) -> CommitOutcome {
        match self.editing_index.take() {
            Some(index) if index < self.items.len() => {
                self.items[index] = item;
                CommitOutcome::Replaced { index }
            }
            _ => {
                self.items.push(item);
                CommitOutcome::Appended {
                    index: self.items.len() - 1,
                }
            }
        }
    }

    /// Marks `index` as being edited and hands back a copy of it.
    pub fn begin_edit(&mut self, index: usize) -> Result<ConfiguredItem, WizardError> {
        let item = self
            .items
            .get(index)
            .cloned()
            .ok_or(WizardError::ItemNotFound(index))?;
        self.editing_index = Some(index);
        Ok(item)
    }

    pub fn cancel_edit(&mut self) {
        self.editing_index = None;
    }

    pub fn remove(&mut self, index: usize) -> Result<ConfiguredItem, WizardError> {
        if index >= self.items.len() {
            return Err(WizardError::ItemNotFound(index));
        }
        let removed = self.items.remove(index);
        self.editing_index = match self.editing_index {
            Some(editing) if editing == index => None,
            Some(editing) if editing > index => Some(editing - 1),
            other => other,
        };
        Ok(removed)
    }

    /// Σ total_price × quantity, computed fresh on each call.
    pub fn aggregate_total(&self) -> f64 {
        self.items.iter().map(ConfiguredItem::line_total).sum()
    }

    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn totals(&self) -> QuoteTotals {
        QuoteTotals {
            item_count: self.len(),
            unit_count: self.unit_count(),
            total_price: self.aggregate_total(),
        }
    }

    pub fn can_finalize(&self) -> bool {
        !self.is_empty()
    }
}
