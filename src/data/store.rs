//! Position store
//!
//! The canonical marcher/page/position records. The editor only relies on the
//! `PositionStore` contract: fetch by page or marcher, and atomic batch
//! updates. There are no change notifications; after a successful update the
//! caller re-fetches whatever it displays.

use crate::core::errors::{DrillError, DrillResult};
use crate::data::model::{
    Marcher, MarcherId, Page, PageId, PageSequence, Position, PositionPatch,
};
use bevy::prelude::*;
use kurbo::Point;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionQuery {
    Page(PageId),
    Marcher(MarcherId),
}

pub trait PositionStore: Send + Sync {
    fn marchers(&self) -> DrillResult<Vec<Marcher>>;

    fn pages(&self) -> DrillResult<PageSequence>;

    fn fetch_positions(&self, query: PositionQuery) -> DrillResult<Vec<Position>>;

    /// Applies every patch or none of them
    fn update_positions(&self, patches: &[PositionPatch]) -> DrillResult<()>;
}

#[derive(Debug, Default)]
struct StoreTables {
    marchers: BTreeMap<MarcherId, Marcher>,
    pages: Vec<Page>,
    positions: HashMap<(MarcherId, PageId), Point>,
    next_marcher_id: u32,
    next_page_id: u32,
}

impl StoreTables {
    fn has_page(&self, id: PageId) -> bool {
        self.pages.iter().any(|page| page.id == id)
    }

    fn last_page(&self) -> Option<&Page> {
        self.pages.iter().max_by_key(|page| page.order)
    }
}

/// In-process store used by the application and the tests
#[derive(Debug)]
pub struct InMemoryPositionStore {
    tables: RwLock<StoreTables>,
    /// Where positions land when there is nothing to seed them from
    default_position: Point,
}

impl InMemoryPositionStore {
    pub fn new(default_position: Point) -> Self {
        Self {
            tables: RwLock::new(StoreTables::default()),
            default_position,
        }
    }

    /// Builds a store from existing records, e.g. an imported show.
    /// Marchers missing a position on some page are kept as data holes.
    pub fn from_records(
        marchers: Vec<Marcher>,
        pages: Vec<Page>,
        positions: Vec<Position>,
        default_position: Point,
    ) -> DrillResult<Self> {
        let mut tables = StoreTables::default();
        let mut orders = HashSet::new();
        for page in pages {
            if !orders.insert(page.order) {
                return Err(DrillError::Store(format!(
                    "page order {} is used twice",
                    page.order
                )));
            }
            tables.next_page_id = tables.next_page_id.max(page.id.0 + 1);
            tables.pages.push(page);
        }
        for marcher in marchers {
            tables.next_marcher_id = tables.next_marcher_id.max(marcher.id.0 + 1);
            tables.marchers.insert(marcher.id, marcher);
        }
        for position in positions {
            validate_patch(&tables, &position)?;
            let key = (position.marcher_id, position.page_id);
            if tables.positions.insert(key, position.point()).is_some() {
                return Err(DrillError::Store(format!(
                    "duplicate position for marcher {} on page {}",
                    position.marcher_id, position.page_id
                )));
            }
        }
        Ok(Self {
            tables: RwLock::new(tables),
            default_position,
        })
    }

    fn read(&self) -> DrillResult<RwLockReadGuard<'_, StoreTables>> {
        self.tables
            .read()
            .map_err(|_| DrillError::Store("store lock poisoned".to_string()))
    }

    fn write(&self) -> DrillResult<RwLockWriteGuard<'_, StoreTables>> {
        self.tables
            .write()
            .map_err(|_| DrillError::Store("store lock poisoned".to_string()))
    }

    /// Adds a marcher with a default position on every existing page
    pub fn add_marcher(&self, drill_prefix: &str, drill_order: u32) -> DrillResult<MarcherId> {
        let mut tables = self.write()?;
        let id = MarcherId(tables.next_marcher_id);
        tables.next_marcher_id += 1;
        tables
            .marchers
            .insert(id, Marcher::new(id, drill_prefix, drill_order));
        let page_ids: Vec<PageId> = tables.pages.iter().map(|page| page.id).collect();
        for page_id in page_ids {
            tables.positions.insert((id, page_id), self.default_position);
        }
        debug!("Added marcher {} ({}{})", id, drill_prefix, drill_order);
        Ok(id)
    }

    /// Appends a page, seeding every marcher from the current last page
    pub fn add_page(&self, counts: u32, name: &str) -> DrillResult<PageId> {
        let mut tables = self.write()?;
        let id = PageId(tables.next_page_id);
        tables.next_page_id += 1;
        let (order, previous) = match tables.last_page() {
            Some(page) => (page.order + 1, Some(page.id)),
            None => (0, None),
        };
        let marcher_ids: Vec<MarcherId> = tables.marchers.keys().copied().collect();
        for marcher_id in marcher_ids {
            let seed = previous
                .and_then(|prev| tables.positions.get(&(marcher_id, prev)).copied())
                .unwrap_or(self.default_position);
            tables.positions.insert((marcher_id, id), seed);
        }
        tables.pages.push(Page {
            id,
            order,
            counts,
            name: name.to_string(),
        });
        debug!("Added page {} '{}' with {} counts", id, name, counts);
        Ok(id)
    }

    pub fn set_marcher_label(
        &self,
        id: MarcherId,
        drill_prefix: &str,
        drill_order: u32,
    ) -> DrillResult<()> {
        let mut tables = self.write()?;
        let marcher = tables
            .marchers
            .get_mut(&id)
            .ok_or(DrillError::MissingPrecondition("no such marcher"))?;
        marcher.drill_prefix = drill_prefix.to_string();
        marcher.drill_order = drill_order;
        Ok(())
    }

    /// Deletes a marcher and all of its positions
    pub fn remove_marcher(&self, id: MarcherId) -> DrillResult<()> {
        let mut tables = self.write()?;
        if tables.marchers.remove(&id).is_none() {
            return Err(DrillError::MissingPrecondition("no such marcher"));
        }
        tables.positions.retain(|(marcher_id, _), _| *marcher_id != id);
        Ok(())
    }

    /// Deletes a page and all positions on it
    pub fn remove_page(&self, id: PageId) -> DrillResult<()> {
        let mut tables = self.write()?;
        let before = tables.pages.len();
        tables.pages.retain(|page| page.id != id);
        if tables.pages.len() == before {
            return Err(DrillError::MissingPrecondition("no such page"));
        }
        tables.positions.retain(|(_, page_id), _| *page_id != id);
        Ok(())
    }
}

fn validate_patch(tables: &StoreTables, patch: &PositionPatch) -> DrillResult<()> {
    let reject = |reason| DrillError::InvalidPatch {
        marcher_id: patch.marcher_id,
        page_id: patch.page_id,
        reason,
    };
    if !tables.marchers.contains_key(&patch.marcher_id) {
        return Err(reject("unknown marcher"));
    }
    if !tables.has_page(patch.page_id) {
        return Err(reject("unknown page"));
    }
    if !(patch.x.is_finite() && patch.y.is_finite()) {
        return Err(reject("coordinates must be finite"));
    }
    Ok(())
}

impl PositionStore for InMemoryPositionStore {
    fn marchers(&self) -> DrillResult<Vec<Marcher>> {
        Ok(self.read()?.marchers.values().cloned().collect())
    }

    fn pages(&self) -> DrillResult<PageSequence> {
        Ok(PageSequence::new(self.read()?.pages.clone()))
    }

    fn fetch_positions(&self, query: PositionQuery) -> DrillResult<Vec<Position>> {
        let tables = self.read()?;
        let mut positions: Vec<Position> = tables
            .positions
            .iter()
            .filter(|((marcher_id, page_id), _)| match query {
                PositionQuery::Page(id) => *page_id == id,
                PositionQuery::Marcher(id) => *marcher_id == id,
            })
            .map(|((marcher_id, page_id), point)| {
                Position::new(*marcher_id, *page_id, point.x, point.y)
            })
            .collect();
        positions.sort_by_key(|p| (p.marcher_id, p.page_id));
        Ok(positions)
    }

    fn update_positions(&self, patches: &[PositionPatch]) -> DrillResult<()> {
        let mut tables = self.write()?;
        // Validate the whole batch before touching anything
        for patch in patches {
            validate_patch(&tables, patch)?;
        }
        for patch in patches {
            tables
                .positions
                .insert((patch.marcher_id, patch.page_id), patch.point());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(marchers: u32, pages: u32) -> InMemoryPositionStore {
        let store = InMemoryPositionStore::new(Point::new(0.0, 0.0));
        for order in 1..=marchers {
            store.add_marcher("T", order).unwrap();
        }
        for index in 0..pages {
            store.add_page(8, &index.to_string()).unwrap();
        }
        store
    }

    #[test]
    fn update_then_fetch_round_trips() {
        let store = store_with(2, 1);
        let page = store.pages().unwrap().first().unwrap().id;
        let patches = vec![
            Position::new(MarcherId(0), page, 10.0, 20.0),
            Position::new(MarcherId(1), page, 30.0, 40.0),
        ];

        store.update_positions(&patches).unwrap();

        let mut fetched = store.fetch_positions(PositionQuery::Page(page)).unwrap();
        fetched.sort_by_key(|p| p.marcher_id);
        assert_eq!(fetched, patches);
    }

    #[test]
    fn invalid_patch_rejects_whole_batch() {
        let store = store_with(2, 1);
        let page = store.pages().unwrap().first().unwrap().id;
        let patches = vec![
            Position::new(MarcherId(0), page, 10.0, 20.0),
            Position::new(MarcherId(42), page, 30.0, 40.0),
        ];

        let result = store.update_positions(&patches);

        assert!(matches!(result, Err(DrillError::InvalidPatch { .. })));
        let fetched = store.fetch_positions(PositionQuery::Page(page)).unwrap();
        assert!(fetched.iter().all(|p| p.x == 0.0 && p.y == 0.0));
    }

    #[test]
    fn new_page_is_seeded_from_previous_page() {
        let store = store_with(1, 1);
        let first = store.pages().unwrap().first().unwrap().id;
        store
            .update_positions(&[Position::new(MarcherId(0), first, 55.0, 66.0)])
            .unwrap();

        let second = store.add_page(16, "2").unwrap();

        let seeded = store.fetch_positions(PositionQuery::Page(second)).unwrap();
        assert_eq!(seeded, vec![Position::new(MarcherId(0), second, 55.0, 66.0)]);
        assert_eq!(store.pages().unwrap().last().unwrap().order, 1);
    }

    #[test]
    fn removing_marcher_cascades_positions() {
        let store = store_with(2, 3);
        store.remove_marcher(MarcherId(0)).unwrap();

        let remaining = store
            .fetch_positions(PositionQuery::Marcher(MarcherId(0)))
            .unwrap();
        assert!(remaining.is_empty());
        assert_eq!(
            store
                .fetch_positions(PositionQuery::Marcher(MarcherId(1)))
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn removing_page_cascades_and_closes_the_sequence() {
        let store = store_with(2, 3);
        let ids: Vec<PageId> = store.pages().unwrap().iter().map(|p| p.id).collect();

        store.remove_page(ids[1]).unwrap();

        let pages = store.pages().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages.next(ids[0]).map(|p| p.id), Some(ids[2]));
        assert!(store
            .fetch_positions(PositionQuery::Page(ids[1]))
            .unwrap()
            .is_empty());
        assert!(matches!(
            store.update_positions(&[Position::new(MarcherId(0), ids[1], 1.0, 1.0)]),
            Err(DrillError::InvalidPatch { .. })
        ));
        assert!(store.remove_page(ids[1]).is_err());
    }

    #[test]
    fn relabeling_changes_only_the_drill_number() {
        let store = store_with(1, 1);
        store.set_marcher_label(MarcherId(0), "Tb", 3).unwrap();

        let marchers = store.marchers().unwrap();
        assert_eq!(marchers[0].label(), "Tb3");
        assert_eq!(marchers[0].id, MarcherId(0));
        assert!(store.set_marcher_label(MarcherId(9), "X", 1).is_err());
    }

    #[test]
    fn from_records_rejects_duplicate_positions() {
        let marchers = vec![Marcher::new(MarcherId(0), "T", 1)];
        let pages = vec![Page {
            id: PageId(0),
            order: 0,
            counts: 0,
            name: "0".to_string(),
        }];
        let positions = vec![
            Position::new(MarcherId(0), PageId(0), 1.0, 1.0),
            Position::new(MarcherId(0), PageId(0), 2.0, 2.0),
        ];

        let result = InMemoryPositionStore::from_records(
            marchers,
            pages,
            positions,
            Point::ZERO,
        );
        assert!(matches!(result, Err(DrillError::Store(_))));
    }
}
