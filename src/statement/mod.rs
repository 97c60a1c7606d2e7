//! Filtered statement tree: period discovery, cost-center selection, leaf
//! filters, roll-up totals, visible rows and the controller that ties them.

pub mod aggregate;
pub mod controller;
pub mod cost_centers;
pub mod filter;
pub mod period_index;
pub mod tree_view;

pub use aggregate::{forest_total, leaf_total, node_total};
pub use controller::{
    default_period, CostCenterToggle, InitOptions, NullRenderer, StatementController,
    StatementRenderer, StatementView,
};
pub use cost_centers::{discover_cost_centers, CostCenterSelection};
pub use filter::{leaf_passes, passes, FilterState, PeriodFilter};
pub use period_index::{option_label, sort_period_values, PeriodIndex};
pub use tree_view::{
    build_rows, collect_node_ids, kpi_boxes, result_summary, share, slugify, ExpansionState,
    KpiBox, NodeId, ResultMarkers, ResultSummary, TreeRow,
};
