// Summary-to-graph mapping
//
// A financial summary becomes a star: one fixed net-worth node in the middle
// and one physics-driven node per category, each linked to the center.

pub mod color;
pub mod renderer;

use crate::api::{CategoryType, FinancialSummary};
use crate::money::format_money;

use color::{interpolate_center_color, Rgb, EXPENSE_RGB, PROFIT_RGB};
pub use renderer::GraphRenderer;

/// Identifier of the net-worth node
pub const CENTER_NODE_ID: &str = "net_worth";

/// Prefix of every category node identifier (`cat_<id>`)
pub const CATEGORY_NODE_PREFIX: &str = "cat_";

/// Smallest category node, also used when a category has no activity
pub const MIN_NODE_SIZE: f64 = 30.0;

/// Largest category node
pub const MAX_NODE_SIZE: f64 = 60.0;

/// Size of the center node, kept above every category node
pub const CENTER_NODE_SIZE: f64 = 70.0;

/// Border tone of the center node, following the sign of net worth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderTone {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Center,
    Category {
        category_id: i64,
        category_type: CategoryType,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    /// Short text drawn next to the node
    pub label: String,
    /// Longer description shown when the node has focus
    pub title: String,
    pub size: f64,
    pub color: Rgb,
    pub border: Option<BorderTone>,
    /// Fixed nodes are not moved by the layout simulation
    pub fixed: bool,
    pub kind: NodeKind,
    /// Net worth for the center, category total otherwise
    pub amount: f64,
}

impl GraphNode {
    pub fn is_center(&self) -> bool {
        matches!(self.kind, NodeKind::Center)
    }
}

/// Edge from a category node to the center node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

pub fn category_node_id(category_id: i64) -> String {
    format!("{}{}", CATEGORY_NODE_PREFIX, category_id)
}

/// Extract the category id from a `cat_<id>` node identifier
pub fn parse_category_node_id(node_id: &str) -> Option<i64> {
    node_id
        .strip_prefix(CATEGORY_NODE_PREFIX)
        .and_then(|rest| rest.parse().ok())
}

/// Visual size of a category node
///
/// The divisor never drops below 1, so an empty summary yields the minimum
/// size instead of NaN.
pub fn category_node_size(category_total: f64, total_profits: f64, total_expenses: f64) -> f64 {
    let divisor = (total_profits + total_expenses).max(1.0);
    let size = MIN_NODE_SIZE + (category_total / divisor) * 100.0;
    if size.is_nan() {
        return MIN_NODE_SIZE;
    }
    size.clamp(MIN_NODE_SIZE, MAX_NODE_SIZE)
}

/// Build the star graph for a summary
///
/// The center node comes first, then one node per category in the order the
/// summary lists them. The input is not modified.
pub fn build_graph(summary: &FinancialSummary) -> GraphData {
    let mut nodes = Vec::with_capacity(summary.all_categories.len() + 1);
    let mut edges = Vec::with_capacity(summary.all_categories.len());

    let border = if summary.net_worth >= 0.0 {
        BorderTone::Positive
    } else {
        BorderTone::Negative
    };
    nodes.push(GraphNode {
        id: CENTER_NODE_ID.to_string(),
        label: format!("Net Worth {}", format_money(summary.net_worth)),
        title: format!(
            "Profits {} / Expenses {}",
            format_money(summary.total_profits),
            format_money(summary.total_expenses)
        ),
        size: CENTER_NODE_SIZE,
        color: interpolate_center_color(summary.total_profits, summary.total_expenses),
        border: Some(border),
        fixed: true,
        kind: NodeKind::Center,
        amount: summary.net_worth,
    });

    for category in &summary.all_categories {
        let total = summary.category_total(category);
        let id = category_node_id(category.id);
        let color = match category.kind {
            CategoryType::Profit => PROFIT_RGB,
            CategoryType::Expense => EXPENSE_RGB,
        };

        nodes.push(GraphNode {
            id: id.clone(),
            label: category.name.clone(),
            title: format!(
                "{} ({}): {}",
                category.name,
                category.kind.label(),
                format_money(total)
            ),
            size: category_node_size(total, summary.total_profits, summary.total_expenses),
            color,
            border: None,
            fixed: false,
            kind: NodeKind::Category {
                category_id: category.id,
                category_type: category.kind,
            },
            amount: total,
        });
        edges.push(GraphEdge {
            from: id,
            to: CENTER_NODE_ID.to_string(),
        });
    }

    GraphData { nodes, edges }
}
