// Force-directed graph renderer
//
// Owns one layout simulation bound to a terminal surface. A new graph always
// replaces the previous simulation; disposing is idempotent and leaves
// nothing running. Positions are simulated in world units and mapped onto a
// 0..100 canvas through a view transform.

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use ratatui::layout::Rect;
use std::collections::HashMap;
use std::f32::consts::PI;
use tracing::{debug, info};

use super::{GraphData, CATEGORY_NODE_PREFIX};
use crate::app::config::{
    DAMPING_FACTOR, FIT_ANIMATION_SECS, FIT_MARGIN, FORCE_CHARGE, FORCE_MAX, FORCE_SPRING,
    INITIAL_RING_RADIUS, LIVE_STEP_BUDGET, NODE_GAP, NODE_MASS, NODE_RADIUS_SCALE, NODE_SPEED,
    SEPARATION_PASSES, SIMULATION_DT, STABILIZATION_ITERATIONS,
};

/// Side length of the canvas coordinate space
pub const CANVAS_SPAN: f64 = 100.0;

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// World-to-canvas mapping: `canvas = offset + world * k`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            x: CANVAS_SPAN / 2.0,
            y: CANVAS_SPAN / 2.0,
            k: 0.2,
        }
    }
}

impl ViewTransform {
    fn lerp(&self, to: &ViewTransform, t: f64) -> ViewTransform {
        ViewTransform {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            k: self.k + (to.k - self.k) * t,
        }
    }
}

#[derive(Clone, Debug)]
struct FitAnimation {
    from: ViewTransform,
    to: ViewTransform,
    elapsed: f64,
}

#[derive(Clone, Debug)]
struct NodeMeta {
    id: String,
    /// World-space radius
    radius: f64,
    /// Where the node started, used if the simulation ever yields NaN
    seed: (f32, f32),
}

struct Simulation {
    graph: ForceGraph<NodeMeta, ()>,
    ids: HashMap<String, DefaultNodeIdx>,
    live_steps_left: u32,
}

impl Simulation {
    fn build(data: &GraphData) -> Self {
        let mut graph = ForceGraph::new(SimulationParameters {
            force_charge: FORCE_CHARGE,
            force_spring: FORCE_SPRING,
            force_max: FORCE_MAX,
            node_speed: NODE_SPEED,
            damping_factor: DAMPING_FACTOR,
        });
        let mut ids = HashMap::new();

        let ring_count = data.nodes.iter().filter(|n| !n.fixed).count().max(1);
        let mut ring_index = 0usize;
        for node in &data.nodes {
            let (x, y) = if node.fixed {
                (0.0, 0.0)
            } else {
                let angle = ring_index as f32 * 2.0 * PI / ring_count as f32;
                ring_index += 1;
                (
                    INITIAL_RING_RADIUS * angle.cos(),
                    INITIAL_RING_RADIUS * angle.sin(),
                )
            };

            let idx = graph.add_node(NodeData {
                x,
                y,
                mass: NODE_MASS,
                is_anchor: node.fixed,
                user_data: NodeMeta {
                    id: node.id.clone(),
                    radius: node.size * NODE_RADIUS_SCALE,
                    seed: (x, y),
                },
            });
            ids.insert(node.id.clone(), idx);
        }

        for edge in &data.edges {
            if let (Some(&from), Some(&to)) = (ids.get(&edge.from), ids.get(&edge.to)) {
                graph.add_edge(from, to, EdgeData::default());
            }
        }

        Self {
            graph,
            ids,
            live_steps_left: LIVE_STEP_BUDGET,
        }
    }

    fn step(&mut self) {
        self.graph.update(SIMULATION_DT);
        self.separate_overlaps();
    }

    /// Push apart free nodes whose outlines come closer than `NODE_GAP`
    fn separate_overlaps(&mut self) {
        let mut bodies: Vec<(DefaultNodeIdx, f64, f64, f64, bool)> = Vec::new();
        self.graph.visit_nodes(|node| {
            let meta = &node.data.user_data;
            let (mut x, mut y) = (node.x() as f64, node.y() as f64);
            if !x.is_finite() || !y.is_finite() {
                x = meta.seed.0 as f64;
                y = meta.seed.1 as f64;
            }
            bodies.push((node.index(), x, y, meta.radius, node.data.is_anchor));
        });

        for _ in 0..SEPARATION_PASSES {
            let mut moved = false;
            for i in 0..bodies.len() {
                for j in (i + 1)..bodies.len() {
                    let (_, xi, yi, ri, anchor_i) = bodies[i];
                    let (_, xj, yj, rj, anchor_j) = bodies[j];
                    if anchor_i && anchor_j {
                        continue;
                    }
                    let (mut dx, mut dy) = (xj - xi, yj - yi);
                    let mut dist = (dx * dx + dy * dy).sqrt();
                    if dist < f64::EPSILON {
                        // Coincident nodes: split along a direction derived from the pair
                        let angle = (i * 7 + j * 13) as f64;
                        dx = angle.cos();
                        dy = angle.sin();
                        dist = 1.0;
                    }
                    let wanted = ri + rj + NODE_GAP;
                    if dist >= wanted {
                        continue;
                    }
                    let push = wanted - dist;
                    let (ux, uy) = (dx / dist, dy / dist);
                    // Anchored nodes never move; the free node takes the full push
                    let (share_i, share_j) = match (anchor_i, anchor_j) {
                        (true, false) => (0.0, 1.0),
                        (false, true) => (1.0, 0.0),
                        _ => (0.5, 0.5),
                    };
                    bodies[i].1 -= ux * push * share_i;
                    bodies[i].2 -= uy * push * share_i;
                    bodies[j].1 += ux * push * share_j;
                    bodies[j].2 += uy * push * share_j;
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }

        let positions: HashMap<DefaultNodeIdx, (f64, f64)> = bodies
            .iter()
            .map(|&(idx, x, y, _, _)| (idx, (x, y)))
            .collect();
        self.graph.visit_nodes_mut(|node| {
            if let Some(&(x, y)) = positions.get(&node.index()) {
                node.data.x = x as f32;
                node.data.y = y as f32;
            }
        });
    }

    /// World-space bounding box of every node outline
    fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        self.graph.visit_nodes(|node| {
            let r = node.data.user_data.radius;
            let (x, y) = (node.x() as f64, node.y() as f64);
            bounds = Some(match bounds {
                None => (x - r, y - r, x + r, y + r),
                Some((x0, y0, x1, y1)) => (x0.min(x - r), y0.min(y - r), x1.max(x + r), y1.max(y + r)),
            });
        });
        bounds
    }
}

/// A node as placed on the canvas for drawing
#[derive(Clone, Debug, PartialEq)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Canvas-space radius
    pub radius: f64,
}

/// Lifecycle owner of the layout simulation for one canvas surface
pub struct GraphRenderer {
    simulation: Option<Simulation>,
    transform: ViewTransform,
    fit: Option<FitAnimation>,
    surface: Rect,
}

impl Default for GraphRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRenderer {
    pub fn new() -> Self {
        Self {
            simulation: None,
            transform: ViewTransform::default(),
            fit: None,
            surface: Rect::default(),
        }
    }

    /// Replace whatever is mounted with a layout for `data`
    ///
    /// The previous simulation is disposed first. The new layout is
    /// stabilized synchronously and framed without animation.
    pub fn mount(&mut self, data: &GraphData) {
        self.dispose();

        let mut simulation = Simulation::build(data);
        for _ in 0..STABILIZATION_ITERATIONS {
            simulation.step();
        }
        self.simulation = Some(simulation);
        if let Some(target) = self.fit_target() {
            self.transform = target;
        }

        info!(
            nodes = data.nodes.len(),
            edges = data.edges.len(),
            "Graph renderer mounted"
        );
    }

    /// Tear down the simulation and any running animation
    ///
    /// Calling this with nothing mounted is a no-op.
    pub fn dispose(&mut self) {
        self.fit = None;
        if let Some(simulation) = self.simulation.take() {
            debug!(nodes = simulation.ids.len(), "Graph renderer disposed");
        }
    }

    /// Terminal area the canvas is drawn into, used for hit testing
    pub fn set_surface(&mut self, area: Rect) {
        self.surface = area;
    }

    /// Advance one frame: a bounded layout step plus the fit animation
    pub fn tick(&mut self, dt: f64) {
        let Some(simulation) = self.simulation.as_mut() else {
            return;
        };
        if simulation.live_steps_left > 0 {
            simulation.step();
            simulation.live_steps_left -= 1;
        }

        if let Some(fit) = self.fit.as_mut() {
            fit.elapsed += dt.max(0.0);
            let t = (fit.elapsed / FIT_ANIMATION_SECS).min(1.0);
            self.transform = fit.from.lerp(&fit.to, ease_out_cubic(t));
            if t >= 1.0 {
                self.fit = None;
            }
        }
    }

    /// Start animating the view so every node fits on the canvas
    pub fn fit_to_view(&mut self) {
        if let Some(to) = self.fit_target() {
            self.fit = Some(FitAnimation {
                from: self.transform,
                to,
                elapsed: 0.0,
            });
            debug!(k = to.k, "Fit-to-view started");
        }
    }

    fn fit_target(&self) -> Option<ViewTransform> {
        let (x0, y0, x1, y1) = self.simulation.as_ref()?.bounds()?;
        let span = CANVAS_SPAN - 2.0 * FIT_MARGIN;
        let width = (x1 - x0).max(1.0);
        let height = (y1 - y0).max(1.0);
        let k = (span / width).min(span / height).clamp(1e-4, 10.0);
        let (mid_x, mid_y) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
        Some(ViewTransform {
            x: CANVAS_SPAN / 2.0 - mid_x * k,
            y: CANVAS_SPAN / 2.0 - mid_y * k,
            k,
        })
    }

    /// Current canvas positions of every node, in insertion order
    pub fn node_positions(&self) -> Vec<NodePosition> {
        let Some(simulation) = &self.simulation else {
            return Vec::new();
        };
        let t = self.transform;
        let mut positions = Vec::with_capacity(simulation.ids.len());
        simulation.graph.visit_nodes(|node| {
            let meta = &node.data.user_data;
            positions.push(NodePosition {
                id: meta.id.clone(),
                x: t.x + node.x() as f64 * t.k,
                y: t.y + node.y() as f64 * t.k,
                radius: meta.radius * t.k,
            });
        });
        positions
    }

    /// Canvas point at the middle of a terminal cell, or `None` outside the surface
    pub fn cell_to_canvas(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.surface;
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let cx = (column - area.x) as f64 + 0.5;
        let cy = (row - area.y) as f64 + 0.5;
        Some((
            cx / area.width as f64 * CANVAS_SPAN,
            CANVAS_SPAN - cy / area.height as f64 * CANVAS_SPAN,
        ))
    }

    /// Identifiers of every node under a terminal cell
    ///
    /// A node is hit when the cell's center lies inside its outline grown by
    /// half a cell, since a terminal cell is much coarser than the canvas.
    pub fn hit_test(&self, column: u16, row: u16) -> Vec<String> {
        let Some((px, py)) = self.cell_to_canvas(column, row) else {
            return Vec::new();
        };
        let half_w = CANVAS_SPAN / self.surface.width as f64 / 2.0;
        let half_h = CANVAS_SPAN / self.surface.height as f64 / 2.0;

        self.node_positions()
            .into_iter()
            .filter(|node| {
                let rx = node.radius + half_w;
                let ry = node.radius + half_h;
                let (dx, dy) = ((px - node.x) / rx, (py - node.y) / ry);
                dx * dx + dy * dy <= 1.0
            })
            .map(|node| node.id)
            .collect()
    }

    /// Resolve a click and report it when it lands on exactly one category node
    ///
    /// Returns whether the callback ran.
    pub fn handle_click(&self, column: u16, row: u16, mut on_node_click: impl FnMut(&str)) -> bool {
        let hits = self.hit_test(column, row);
        match hits.as_slice() {
            [id] if id.starts_with(CATEGORY_NODE_PREFIX) => {
                debug!(node = %id, "Category node clicked");
                on_node_click(id);
                true
            }
            _ => false,
        }
    }
}

impl Drop for GraphRenderer {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Inspection helpers for tests
#[cfg(test)]
impl GraphRenderer {
    pub fn is_mounted(&self) -> bool {
        self.simulation.is_some()
    }

    /// Whether the layout has used up its live steps and no animation runs
    pub fn is_settled(&self) -> bool {
        self.fit.is_none()
            && self
                .simulation
                .as_ref()
                .map_or(true, |s| s.live_steps_left == 0)
    }

    pub fn surface(&self) -> Rect {
        self.surface
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn node_position(&self, id: &str) -> Option<NodePosition> {
        self.node_positions().into_iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::CategoryTotal;
    use crate::api::{Category, CategoryType, FinancialSummary};
    use crate::graph::{build_graph, CENTER_NODE_ID};

    fn summary_with(categories: usize) -> FinancialSummary {
        let mut summary = FinancialSummary::default();
        for i in 0..categories {
            let id = i as i64 + 1;
            let kind = if i % 2 == 0 {
                CategoryType::Profit
            } else {
                CategoryType::Expense
            };
            summary.all_categories.push(Category {
                id,
                name: format!("C{}", id),
                kind,
            });
            let total = CategoryTotal::new(id, 100.0 * id as f64);
            match kind {
                CategoryType::Profit => {
                    summary.total_profits += total.total_amount;
                    summary.profits_by_category.push(total);
                }
                CategoryType::Expense => {
                    summary.total_expenses += total.total_amount;
                    summary.expenses_by_category.push(total);
                }
            }
        }
        summary.net_worth = summary.total_profits - summary.total_expenses;
        summary
    }

    fn mounted(categories: usize) -> GraphRenderer {
        let mut renderer = GraphRenderer::new();
        renderer.set_surface(Rect::new(0, 0, 120, 40));
        renderer.mount(&build_graph(&summary_with(categories)));
        renderer
    }

    /// Terminal cell containing a canvas point
    fn cell_of(renderer: &GraphRenderer, x: f64, y: f64) -> (u16, u16) {
        let area = renderer.surface();
        let col = (x / CANVAS_SPAN * area.width as f64).floor() as u16;
        let row = ((CANVAS_SPAN - y) / CANVAS_SPAN * area.height as f64).floor() as u16;
        (
            area.x + col.min(area.width - 1),
            area.y + row.min(area.height - 1),
        )
    }

    #[test]
    fn test_mount_places_every_node_on_canvas() {
        let renderer = mounted(5);
        let positions = renderer.node_positions();
        assert_eq!(positions.len(), 6);
        for node in &positions {
            assert!(node.x.is_finite() && node.y.is_finite());
            assert!(node.x >= 0.0 && node.x <= CANVAS_SPAN, "{:?}", node);
            assert!(node.y >= 0.0 && node.y <= CANVAS_SPAN, "{:?}", node);
        }
    }

    #[test]
    fn test_layout_has_no_overlapping_nodes() {
        let renderer = mounted(8);
        let positions = renderer.node_positions();
        let k = renderer.transform().k;
        for (i, a) in positions.iter().enumerate() {
            for b in positions.iter().skip(i + 1) {
                let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                assert!(
                    dist + 1e-6 >= a.radius + b.radius + NODE_GAP * k * 0.5,
                    "{} overlaps {}",
                    a.id,
                    b.id
                );
            }
        }
    }

    #[test]
    fn test_center_node_stays_fixed() {
        let mut renderer = mounted(3);
        let before = renderer.node_position(CENTER_NODE_ID).unwrap();
        renderer.tick(SIMULATION_DT as f64);
        let after = renderer.node_position(CENTER_NODE_ID).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut renderer = GraphRenderer::new();
        renderer.dispose();
        assert!(!renderer.is_mounted());

        renderer.mount(&build_graph(&summary_with(2)));
        assert!(renderer.is_mounted());
        renderer.dispose();
        renderer.dispose();
        assert!(!renderer.is_mounted());
        assert!(renderer.node_positions().is_empty());
    }

    #[test]
    fn test_remount_replaces_previous_graph() {
        let mut renderer = mounted(4);
        renderer.mount(&build_graph(&summary_with(1)));
        let ids: Vec<String> = renderer.node_positions().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["net_worth".to_string(), "cat_1".to_string()]);
    }

    #[test]
    fn test_live_steps_are_bounded() {
        let mut renderer = mounted(3);
        assert!(!renderer.is_settled());
        for _ in 0..LIVE_STEP_BUDGET {
            renderer.tick(SIMULATION_DT as f64);
        }
        assert!(renderer.is_settled());

        let frozen = renderer.node_positions();
        renderer.tick(SIMULATION_DT as f64);
        assert_eq!(renderer.node_positions(), frozen);
    }

    #[test]
    fn test_tick_after_dispose_does_nothing() {
        let mut renderer = mounted(2);
        renderer.fit_to_view();
        renderer.dispose();
        renderer.tick(1.0);
        assert!(renderer.is_settled());
        assert!(!renderer.is_mounted());
    }

    #[test]
    fn test_fit_to_view_animates_to_target() {
        let mut renderer = mounted(4);
        let target = renderer.transform();
        // Knock the view off target, then fit back
        renderer.transform = ViewTransform {
            x: 10.0,
            y: 90.0,
            k: target.k * 3.0,
        };
        renderer.fit_to_view();
        renderer.tick(FIT_ANIMATION_SECS / 2.0);
        let midway = renderer.transform();
        assert!(midway != target);

        renderer.tick(FIT_ANIMATION_SECS);
        let done = renderer.transform();
        assert!((done.k - target.k).abs() < 1e-9);
        assert!((done.x - target.x).abs() < 1e-9);
        assert!((done.y - target.y).abs() < 1e-9);
    }

    #[test]
    fn test_click_on_category_node_reports_id() {
        let renderer = mounted(1);
        let node = renderer.node_position("cat_1").unwrap();
        let (col, row) = cell_of(&renderer, node.x, node.y);

        let mut clicked = Vec::new();
        let fired = renderer.handle_click(col, row, |id| clicked.push(id.to_string()));
        assert!(fired);
        assert_eq!(clicked, vec!["cat_1".to_string()]);
    }

    #[test]
    fn test_click_on_center_node_does_not_report() {
        let renderer = mounted(1);
        let node = renderer.node_position(CENTER_NODE_ID).unwrap();
        let (col, row) = cell_of(&renderer, node.x, node.y);

        assert_eq!(renderer.hit_test(col, row), vec![CENTER_NODE_ID.to_string()]);
        let fired = renderer.handle_click(col, row, |_| panic!("center must not report"));
        assert!(!fired);
    }

    #[test]
    fn test_click_on_empty_space_does_not_report() {
        let renderer = mounted(1);
        // Corners are inside the fit margin
        assert!(renderer.hit_test(0, 0).is_empty());
        assert!(!renderer.handle_click(0, 0, |_| panic!("nothing was hit")));
    }

    #[test]
    fn test_click_outside_surface_is_ignored() {
        let mut renderer = mounted(1);
        renderer.set_surface(Rect::new(10, 5, 50, 20));
        assert!(renderer.hit_test(0, 0).is_empty());
        assert!(renderer.hit_test(60, 25).is_empty());
    }
}
