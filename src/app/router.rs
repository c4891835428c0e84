// Dashboard view router
//
// Three mutually exclusive views. Only the graph view accepts node clicks;
// panels return to the graph through an explicit close. Every transition
// bumps a generation counter so results requested for an earlier view can be
// recognized and dropped.

use tracing::{debug, info};

use crate::graph::{parse_category_node_id, CENTER_NODE_ID};

/// Which panel the dashboard body shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardView {
    #[default]
    Graph,
    CategoryDetails {
        category_id: i64,
    },
    FinancialOverview,
}

/// A mutation that changed financial data on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataChange {
    CategoryCreated,
    CategoryUpdated,
    CategoryDeleted,
    EntryCreated,
    EntryUpdated,
    EntryDeleted,
}

#[derive(Debug, Default)]
pub struct ViewRouter {
    view: DashboardView,
    generation: u64,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> DashboardView {
        self.view
    }

    /// Counter bumped on every transition
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_graph(&self) -> bool {
        self.view == DashboardView::Graph
    }

    fn transition(&mut self, to: DashboardView) {
        info!(from = ?self.view, to = ?to, "Dashboard view changed");
        self.view = to;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Handle a node click reported by the graph
    ///
    /// Returns whether the view changed. Unknown ids and clicks outside the
    /// graph view are ignored.
    pub fn on_node_click(&mut self, node_id: &str) -> bool {
        if !self.is_graph() {
            debug!(node = %node_id, view = ?self.view, "Node click ignored outside graph view");
            return false;
        }
        if node_id == CENTER_NODE_ID {
            self.transition(DashboardView::FinancialOverview);
            return true;
        }
        match parse_category_node_id(node_id) {
            Some(category_id) => {
                self.transition(DashboardView::CategoryDetails { category_id });
                true
            }
            None => {
                debug!(node = %node_id, "Unrecognized node id");
                false
            }
        }
    }

    /// Close the active panel; a no-op in the graph view
    pub fn on_close(&mut self) -> bool {
        if self.is_graph() {
            return false;
        }
        self.transition(DashboardView::Graph);
        true
    }

    /// React to a server-side data change
    ///
    /// The summary is always re-fetched by the caller. Only a category
    /// deletion leaves the current panel, since its details no longer exist.
    /// Returns whether the view changed.
    pub fn on_data_changed(&mut self, change: DataChange) -> bool {
        debug!(?change, view = ?self.view, "Data changed");
        if change == DataChange::CategoryDeleted && !self.is_graph() {
            self.transition(DashboardView::Graph);
            return true;
        }
        false
    }

    /// Back to the graph, e.g. on logout
    pub fn reset(&mut self) {
        if !self.is_graph() {
            self.transition(DashboardView::Graph);
        } else {
            self.generation = self.generation.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    impl ViewRouter {
        fn selected_category(&self) -> Option<i64> {
            match self.view {
                DashboardView::CategoryDetails { category_id } => Some(category_id),
                _ => None,
            }
        }
    }

    #[test]
    fn test_starts_in_graph() {
        let router = ViewRouter::new();
        assert_eq!(router.view(), DashboardView::Graph);
        assert_eq!(router.selected_category(), None);
    }

    #[test]
    fn test_category_click_opens_details() {
        let mut router = ViewRouter::new();
        assert!(router.on_node_click("cat_2"));
        assert_eq!(router.view(), DashboardView::CategoryDetails { category_id: 2 });
        assert_eq!(router.selected_category(), Some(2));
    }

    #[test]
    fn test_center_click_opens_overview() {
        let mut router = ViewRouter::new();
        assert!(router.on_node_click("net_worth"));
        assert_eq!(router.view(), DashboardView::FinancialOverview);
    }

    #[test]
    fn test_unknown_click_is_ignored() {
        let mut router = ViewRouter::new();
        let generation = router.generation();
        assert!(!router.on_node_click("cat_abc"));
        assert!(!router.on_node_click("something"));
        assert_eq!(router.view(), DashboardView::Graph);
        assert_eq!(router.generation(), generation);
    }

    #[test]
    fn test_clicks_outside_graph_are_ignored() {
        let mut router = ViewRouter::new();
        router.on_node_click("cat_1");
        assert!(!router.on_node_click("net_worth"));
        assert_eq!(router.selected_category(), Some(1));
    }

    #[test]
    fn test_close_returns_to_graph() {
        let mut router = ViewRouter::new();
        router.on_node_click("cat_5");
        assert!(router.on_close());
        assert_eq!(router.view(), DashboardView::Graph);
        assert_eq!(router.selected_category(), None);
        assert!(!router.on_close());
    }

    #[test]
    fn test_category_deleted_forces_graph() {
        let mut router = ViewRouter::new();
        router.on_node_click("cat_9");
        assert!(router.on_data_changed(DataChange::CategoryDeleted));
        assert_eq!(router.view(), DashboardView::Graph);
        assert_eq!(router.selected_category(), None);
    }

    #[test]
    fn test_other_changes_keep_the_panel() {
        let mut router = ViewRouter::new();
        router.on_node_click("net_worth");
        for change in [
            DataChange::CategoryCreated,
            DataChange::CategoryUpdated,
            DataChange::EntryCreated,
            DataChange::EntryUpdated,
            DataChange::EntryDeleted,
        ] {
            assert!(!router.on_data_changed(change));
            assert_eq!(router.view(), DashboardView::FinancialOverview);
        }
    }

    #[test]
    fn test_generation_moves_on_transitions() {
        let mut router = ViewRouter::new();
        let g0 = router.generation();
        router.on_node_click("cat_1");
        let g1 = router.generation();
        router.on_close();
        assert!(g1 > g0);
        assert!(router.generation() > g1);
    }

    #[test]
    fn test_reset_from_panel() {
        let mut router = ViewRouter::new();
        router.on_node_click("cat_3");
        router.reset();
        assert!(router.is_graph());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any category id round-trips through a node click
        #[test]
        fn prop_category_click_selects_id(id in 0i64..i64::MAX) {
            let mut router = ViewRouter::new();
            let node_id = format!("cat_{}", id);
            prop_assert!(router.on_node_click(&node_id));
            prop_assert_eq!(router.selected_category(), Some(id));
        }

        /// Ids without the category prefix never leave the graph view
        #[test]
        fn prop_foreign_ids_leave_graph_unchanged(id in "[a-z_]{0,12}") {
            prop_assume!(id != CENTER_NODE_ID);
            let mut router = ViewRouter::new();
            router.on_node_click(&id);
            prop_assert_eq!(router.view(), DashboardView::Graph);
        }
    }
}
