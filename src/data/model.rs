//! Marchers, pages and positions
//!
//! These are the normalized records the position store hands out. Visual
//! state never lives here; the scene keeps its own proxies keyed by
//! `MarcherId`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable marcher identity. Never reused after deletion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MarcherId(pub u32);

/// Stable page identity. Independent of the page's position in the sequence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PageId(pub u32);

impl fmt::Display for MarcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A performer on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marcher {
    pub id: MarcherId,
    /// Section prefix of the drill number, e.g. "T" for trumpets
    pub drill_prefix: String,
    /// Order within the section, e.g. the 3 in "T3"
    pub drill_order: u32,
    pub name: String,
}

impl Marcher {
    pub fn new(id: MarcherId, drill_prefix: &str, drill_order: u32) -> Self {
        Self {
            id,
            drill_prefix: drill_prefix.to_string(),
            drill_order,
            name: String::new(),
        }
    }

    /// The drill number shown on the field
    pub fn label(&self) -> String {
        format!("{}{}", self.drill_prefix, self.drill_order)
    }
}

/// One timed step of the drill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    /// Position in the sequence. Unique and strictly ordered.
    pub order: u32,
    /// Duration in counts
    pub counts: u32,
    pub name: String,
}

/// A marcher's location on one page, in field pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub marcher_id: MarcherId,
    pub page_id: PageId,
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(marcher_id: MarcherId, page_id: PageId, x: f64, y: f64) -> Self {
        Self {
            marcher_id,
            page_id,
            x,
            y,
        }
    }

    pub fn point(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    /// The same marcher moved onto another page
    pub fn on_page(&self, page_id: PageId) -> Self {
        Self { page_id, ..*self }
    }
}

/// Batches sent to the store use the same shape as stored positions
pub type PositionPatch = Position;

/// Ordered view over the page sequence used for navigation and geometry
#[derive(Debug, Clone, Default)]
pub struct PageSequence {
    pages: Vec<Page>,
}

impl PageSequence {
    pub fn new(mut pages: Vec<Page>) -> Self {
        pages.sort_by_key(|page| page.order);
        Self { pages }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|page| page.id == id)
    }

    pub fn first(&self) -> Option<&Page> {
        self.pages.first()
    }

    pub fn last(&self) -> Option<&Page> {
        self.pages.last()
    }

    pub fn previous(&self, id: PageId) -> Option<&Page> {
        let index = self.index_of(id)?;
        index.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    pub fn next(&self, id: PageId) -> Option<&Page> {
        let index = self.index_of(id)?;
        self.pages.get(index + 1)
    }

    fn index_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|page| page.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: u32, order: u32) -> Page {
        Page {
            id: PageId(id),
            order,
            counts: 8,
            name: format!("{order}"),
        }
    }

    #[test]
    fn page_sequence_orders_by_order_not_id() {
        let pages = PageSequence::new(vec![page(7, 2), page(3, 0), page(5, 1)]);

        assert_eq!(pages.first().map(|p| p.id), Some(PageId(3)));
        assert_eq!(pages.last().map(|p| p.id), Some(PageId(7)));
        assert_eq!(pages.next(PageId(3)).map(|p| p.id), Some(PageId(5)));
        assert_eq!(pages.previous(PageId(5)).map(|p| p.id), Some(PageId(3)));
        assert!(pages.previous(PageId(3)).is_none());
        assert!(pages.next(PageId(7)).is_none());
        assert!(pages.next(PageId(99)).is_none());
    }

    #[test]
    fn marcher_label_joins_prefix_and_order() {
        let marcher = Marcher::new(MarcherId(1), "T", 12);
        assert_eq!(marcher.label(), "T12");
    }
}
