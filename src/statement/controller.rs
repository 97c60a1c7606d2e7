//! Owned statement state and the operations that mutate it.
//!
//! Every mutating operation recomputes a full [`StatementView`] and hands it to
//! the controller's [`StatementRenderer`] before returning.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{PeriodDimension, RecordForest, RecordNode};
use crate::errors::{Result, StatementError};
use crate::storage::RecordSource;

use super::cost_centers::{discover_cost_centers, CostCenterSelection};
use super::filter::{FilterState, PeriodFilter};
use super::period_index::PeriodIndex;
use super::tree_view::{
    build_rows, collect_node_ids, kpi_boxes, result_summary, ExpansionState, KpiBox, NodeId,
    ResultMarkers, ResultSummary, TreeRow,
};

/// Consumer of rendered views. The controller calls it after every change.
pub trait StatementRenderer {
    fn render(&mut self, view: &StatementView);
}

/// Renderer that discards views; callers read [`StatementController::view`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl StatementRenderer for NullRenderer {
    fn render(&mut self, _view: &StatementView) {}
}

/// Optional inputs to [`StatementController::initialize_with`].
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Replaces the discovered cost-center universe when present and non-empty.
    pub cost_centers: Option<Vec<String>>,
    /// Skips the default period selection when present.
    pub period: Option<PeriodFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostCenterToggle {
    pub name: String,
    pub selected: bool,
}

/// Everything a rendering layer needs to draw the statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatementView {
    pub kpis: Vec<KpiBox>,
    pub rows: Vec<TreeRow>,
    pub result: ResultSummary,
    pub period_dimension: Option<PeriodDimension>,
    pub period_value: String,
    pub period_options: Vec<String>,
    pub cost_centers: Vec<CostCenterToggle>,
    pub tax_relevant_only: bool,
}

#[derive(Debug, Clone, Default)]
struct StatementState {
    forest: RecordForest,
    cost_centers: CostCenterSelection,
    filter: FilterState,
    expansion: ExpansionState,
    periods: PeriodIndex,
}

pub struct StatementController<R: StatementRenderer = NullRenderer> {
    state: StatementState,
    markers: ResultMarkers,
    renderer: R,
    view: StatementView,
}

impl Default for StatementController<NullRenderer> {
    fn default() -> Self {
        Self::new(NullRenderer)
    }
}

impl<R: StatementRenderer> StatementController<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            state: StatementState::default(),
            markers: ResultMarkers::default(),
            renderer,
            view: StatementView::default(),
        }
    }

    pub fn with_markers(mut self, markers: ResultMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn set_markers(&mut self, markers: ResultMarkers) {
        self.markers = markers;
        self.render();
    }

    /// Loads a new forest with the default period selection.
    pub fn initialize(&mut self, data: RecordForest, cost_center_override: Option<Vec<String>>) {
        self.initialize_with(
            data,
            InitOptions {
                cost_centers: cost_center_override,
                period: None,
            },
        );
    }

    pub fn initialize_with(&mut self, data: RecordForest, options: InitOptions) {
        let universe = match options.cost_centers {
            Some(list) if !list.is_empty() => list,
            _ => discover_cost_centers(&data),
        };
        let periods = PeriodIndex::build(&data);
        let period = options
            .period
            .unwrap_or_else(|| default_period(&periods));

        info!(
            natures = data.len(),
            cost_centers = universe.len(),
            dimension = ?period.dimension,
            value = %period.value,
            "Statement initialized"
        );

        self.state = StatementState {
            forest: data,
            cost_centers: CostCenterSelection::all_of(universe),
            filter: FilterState {
                period,
                tax_relevant_only: self.state.filter.tax_relevant_only,
            },
            expansion: ExpansionState::default(),
            periods,
        };
        self.render();
    }

    /// Fetches a forest from `source`. On failure the controller is left empty
    /// and the error is returned.
    pub fn load(&mut self, source: &dyn RecordSource) -> Result<()> {
        match source.load_forest() {
            Ok(forest) => {
                self.initialize(forest, None);
                Ok(())
            }
            Err(err) => {
                warn!(source = %source.describe(), error = %err, "Statement load failed");
                self.reset();
                Err(err)
            }
        }
    }

    /// Drops all data and renders the empty statement.
    pub fn reset(&mut self) {
        let tax_relevant_only = self.state.filter.tax_relevant_only;
        self.state = StatementState::default();
        self.state.filter.tax_relevant_only = tax_relevant_only;
        self.render();
    }

    pub fn set_period(&mut self, dimension: PeriodDimension, value: impl Into<String>) {
        self.state.filter.period = PeriodFilter::new(dimension, value);
        self.render();
    }

    /// Like [`set_period`](Self::set_period) with a raw dimension key. Unknown
    /// keys clear the period filter.
    pub fn set_period_key(&mut self, key: &str, value: impl Into<String>) {
        let filter = PeriodFilter::from_key(key, value);
        if filter.dimension.is_none() {
            warn!(key, "Unknown period dimension; period filter disabled");
        }
        self.state.filter.period = filter;
        self.render();
    }

    /// Switches the dimension, keeping the value when the new dimension offers
    /// it and otherwise falling back to the first option.
    pub fn set_period_dimension(&mut self, dimension: PeriodDimension) {
        let options = self.state.periods.options(dimension);
        let current = &self.state.filter.period.value;
        let value = if options.iter().any(|option| option == current) {
            current.clone()
        } else {
            options.first().cloned().unwrap_or_default()
        };
        self.state.filter.period = PeriodFilter::new(dimension, value);
        self.render();
    }

    pub fn set_tax_filter(&mut self, on: bool) {
        self.state.filter.tax_relevant_only = on;
        self.render();
    }

    pub fn expand_all(&mut self) {
        self.state.expansion.expand_all(&self.state.forest);
        self.render();
    }

    pub fn collapse_all(&mut self) {
        self.state.expansion.clear();
        self.render();
    }

    pub fn expand(&mut self, id: &NodeId) -> Result<()> {
        self.ensure_known(id)?;
        self.state.expansion.expand(id.clone());
        self.render();
        Ok(())
    }

    pub fn collapse(&mut self, id: &NodeId) -> Result<()> {
        self.ensure_known(id)?;
        self.state.expansion.collapse(id);
        self.render();
        Ok(())
    }

    /// Returns whether the node is expanded afterwards.
    pub fn toggle(&mut self, id: &NodeId) -> Result<bool> {
        self.ensure_known(id)?;
        let expanded = self.state.expansion.toggle(id.clone());
        self.render();
        Ok(expanded)
    }

    /// Returns false when `cost_center` is not part of the universe.
    pub fn select(&mut self, cost_center: &str) -> bool {
        let known = self.state.cost_centers.select(cost_center);
        if !known {
            warn!(cost_center, "Ignoring unknown cost center");
        }
        self.render();
        known
    }

    pub fn deselect(&mut self, cost_center: &str) -> bool {
        let removed = self.state.cost_centers.deselect(cost_center);
        self.render();
        removed
    }

    pub fn select_all(&mut self) {
        self.state.cost_centers.select_all();
        self.render();
    }

    pub fn select_none(&mut self) {
        self.state.cost_centers.select_none();
        self.render();
    }

    /// Last rendered view.
    pub fn view(&self) -> &StatementView {
        &self.view
    }

    pub fn forest(&self) -> &[RecordNode] {
        &self.state.forest
    }

    pub fn filter(&self) -> &FilterState {
        &self.state.filter
    }

    pub fn periods(&self) -> &PeriodIndex {
        &self.state.periods
    }

    pub fn cost_centers(&self) -> &CostCenterSelection {
        &self.state.cost_centers
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.state.expansion
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn ensure_known(&self, id: &NodeId) -> Result<()> {
        if collect_node_ids(&self.state.forest).contains(id) {
            Ok(())
        } else {
            Err(StatementError::UnknownNode(id.to_string()))
        }
    }

    fn render(&mut self) {
        let state = &self.state;
        let selected = state.cost_centers.selected();
        let kpis = kpi_boxes(&state.forest, selected, &state.filter);
        let result = result_summary(&kpis, &self.markers);
        let rows = build_rows(&state.forest, selected, &state.filter, &state.expansion);
        let period_options = state
            .filter
            .period
            .dimension
            .map(|dimension| state.periods.options(dimension).to_vec())
            .unwrap_or_default();
        let cost_centers = state
            .cost_centers
            .universe()
            .iter()
            .map(|name| CostCenterToggle {
                name: name.clone(),
                selected: state.cost_centers.contains(name),
            })
            .collect();

        debug!(rows = rows.len(), result = result.result, "Statement recomputed");

        self.view = StatementView {
            kpis,
            rows,
            result,
            period_dimension: state.filter.period.dimension,
            period_value: state.filter.period.value.clone(),
            period_options,
            cost_centers,
            tax_relevant_only: state.filter.tax_relevant_only,
        };
        self.renderer.render(&self.view);
    }
}

/// First dimension with values (season, then year, then month; season when
/// nothing was discovered) and its first value.
pub fn default_period(periods: &PeriodIndex) -> PeriodFilter {
    let dimension = periods.first_available().unwrap_or(PeriodDimension::Season);
    let value = periods
        .options(dimension)
        .first()
        .cloned()
        .unwrap_or_default();
    PeriodFilter::new(dimension, value)
}
