//! Selected page and marchers
//!
//! Every change to the selection bumps a generation counter. Asynchronous
//! fetches for the selection carry the generation they started under, and a
//! result is only applied if the selection has not moved on since.

use crate::data::model::{MarcherId, PageId, Position};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    page: Option<PageId>,
    marchers: Vec<MarcherId>,
    generation: u64,
    /// Positions of the selected marchers on the selected page, as of the
    /// last fetch that was still current when it resolved
    selected_positions: Vec<Position>,
}

/// Identifies the selection a fetch was started for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub page: PageId,
    pub marchers: Vec<MarcherId>,
}

impl SelectionState {
    pub fn page(&self) -> Option<PageId> {
        self.page
    }

    pub fn marchers(&self) -> &[MarcherId] {
        &self.marchers
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected_positions(&self) -> &[Position] {
        &self.selected_positions
    }

    pub fn set_page(&mut self, page: Option<PageId>) {
        if self.page != page {
            self.page = page;
            self.bump();
        }
    }

    pub fn set_marchers(&mut self, marchers: Vec<MarcherId>) {
        if self.marchers != marchers {
            self.marchers = marchers;
            self.bump();
        }
    }

    /// Marks the selection as changed even though its ids did not, e.g.
    /// after the selected marchers were moved
    pub fn invalidate(&mut self) {
        self.bump();
    }

    fn bump(&mut self) {
        self.generation += 1;
        self.selected_positions.clear();
    }

    /// Starts a fetch for the current selection; `None` when there is no
    /// page or no marcher selected
    pub fn begin_fetch(&self) -> Option<FetchTicket> {
        let page = self.page?;
        if self.marchers.is_empty() {
            return None;
        }
        Some(FetchTicket {
            generation: self.generation,
            page,
            marchers: self.marchers.clone(),
        })
    }

    /// Applies a fetch result if its selection is still current.
    /// Returns false, leaving state untouched, for stale results.
    pub fn resolve_fetch(&mut self, ticket: &FetchTicket, positions: Vec<Position>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.selected_positions = positions
            .into_iter()
            .filter(|p| p.page_id == ticket.page && ticket.marchers.contains(&p.marcher_id))
            .collect();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_fetch_is_discarded() {
        let mut selection = SelectionState::default();
        selection.set_page(Some(PageId(1)));
        selection.set_marchers(vec![MarcherId(1)]);
        let ticket = selection.begin_fetch().unwrap();

        // The user selects someone else before the fetch resolves
        selection.set_marchers(vec![MarcherId(2)]);
        let applied = selection.resolve_fetch(
            &ticket,
            vec![Position::new(MarcherId(1), PageId(1), 5.0, 5.0)],
        );

        assert!(!applied);
        assert!(selection.selected_positions().is_empty());
    }

    #[test]
    fn current_fetch_keeps_only_selected_records() {
        let mut selection = SelectionState::default();
        selection.set_page(Some(PageId(1)));
        selection.set_marchers(vec![MarcherId(1)]);
        let ticket = selection.begin_fetch().unwrap();

        let applied = selection.resolve_fetch(
            &ticket,
            vec![
                Position::new(MarcherId(1), PageId(1), 5.0, 5.0),
                Position::new(MarcherId(2), PageId(1), 6.0, 6.0),
                Position::new(MarcherId(1), PageId(2), 7.0, 7.0),
            ],
        );

        assert!(applied);
        assert_eq!(
            selection.selected_positions(),
            &[Position::new(MarcherId(1), PageId(1), 5.0, 5.0)]
        );
    }

    #[test]
    fn setting_the_same_selection_keeps_generation() {
        let mut selection = SelectionState::default();
        selection.set_marchers(vec![MarcherId(3)]);
        let generation = selection.generation();
        selection.set_marchers(vec![MarcherId(3)]);
        assert_eq!(selection.generation(), generation);
    }

    #[test]
    fn no_ticket_without_page_or_marchers() {
        let mut selection = SelectionState::default();
        selection.set_marchers(vec![MarcherId(3)]);
        assert!(selection.begin_fetch().is_none());
        selection.set_page(Some(PageId(0)));
        selection.set_marchers(Vec::new());
        assert!(selection.begin_fetch().is_none());
    }
}
