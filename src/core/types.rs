use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two kinds of stock that move through the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    Can,
    Bottle,
}

impl ItemKind {
    /// Index into per-kind tables
    pub fn index(self) -> usize {
        match self {
            ItemKind::Can => 0,
            ItemKind::Bottle => 1,
        }
    }

    /// Only cans get punctured on the way from the supplier.
    pub fn can_spoil(self) -> bool {
        matches!(self, ItemKind::Can)
    }

    pub fn plural(self) -> &'static str {
        match self {
            ItemKind::Can => "cans",
            ItemKind::Bottle => "bottles",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Can => write!(f, "can"),
            ItemKind::Bottle => write!(f, "bottle"),
        }
    }
}

/// What a consumer is willing to take out of a storage unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preference {
    Only(ItemKind),
    Either,
}

impl std::fmt::Display for Preference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Preference::Only(kind) => write!(f, "{}", kind),
            Preference::Either => write!(f, "any"),
        }
    }
}

/// Smallest unit of stock. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: Uuid,
    kind: ItemKind,
    spoiled: bool,
}

impl Item {
    pub fn new(kind: ItemKind, spoiled: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            spoiled,
        }
    }

    pub fn fresh(kind: ItemKind) -> Self {
        Self::new(kind, false)
    }

    pub fn spoiled(kind: ItemKind) -> Self {
        Self::new(kind, true)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn is_spoiled(&self) -> bool {
        self.spoiled
    }
}

/// Private, unsynchronized basket of items owned by a single thread.
///
/// The supplier fills one while producing and the restocker carries its
/// surplus in one. Handing a batch to a shared container drains it.
#[derive(Debug, Default)]
pub struct Batch {
    items: Vec<Item>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Removes the first item of `kind`, if any.
    pub fn take_kind(&mut self, kind: ItemKind) -> Option<Item> {
        let pos = self.items.iter().position(|item| item.kind == kind)?;
        Some(self.items.remove(pos))
    }

    pub fn count(&self, kind: ItemKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }

    pub fn spoiled_count(&self) -> usize {
        self.items.iter().filter(|item| item.spoiled).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Item> {
        self.items.drain(..)
    }
}

impl FromIterator<Item> for Batch {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
