// Graph view rendering module
//
// Renders the net-worth graph: edges from every category to the center,
// flowing particles along the edges, node circles and labels. The canvas
// area is handed to the renderer so mouse clicks can be mapped back to
// nodes.

use super::truncate_to_width;
use crate::app::{AppState, SummaryState};
use crate::graph::renderer::{NodePosition, CANVAS_SPAN};
use crate::graph::{BorderTone, GraphNode};
use crate::theme::{
    border_tone_color, interpolate_color, rgb, BLOOD_RED, BONE_WHITE, NEON_PURPLE, PUMPKIN_ORANGE,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, BorderType, Borders, Paragraph, Wrap,
    },
    Frame,
};
use unicode_width::UnicodeWidthStr;

// Offset positions for particles along an edge (0.0 to 1.0)
const PARTICLE_OFFSETS: [f32; 3] = [0.0, 0.33, 0.66];

// Symbol used to render particles on edges
const PARTICLE_SYMBOL: &str = "•";

/// Widest label in terminal columns before it is cut
const MAX_LABEL_WIDTH: usize = 24;

const EMPTY_GRAPH_HINT: &str = "Press c to create your first category";

/// Node as the canvas closure needs it
struct DrawNode {
    position: NodePosition,
    label: String,
    color: Color,
    border: Option<BorderTone>,
    is_center: bool,
    focused: bool,
}

/// Calculate particle position along an edge based on pulse phase
///
/// # Arguments
/// * `start` - Starting point (x, y) of the edge
/// * `end` - Ending point (x, y) of the edge
/// * `pulse_phase` - Current animation phase (0.0 to 1.0, cycles over time)
/// * `offset` - Particle offset along the edge
///
/// # Returns
/// (x, y) coordinates of the particle position in canvas space
pub fn particle_position(
    start: (f64, f64),
    end: (f64, f64),
    pulse_phase: f32,
    offset: f32,
) -> (f64, f64) {
    // Wrapping with modulo keeps the particles cycling
    let t = ((pulse_phase + offset) % 1.0) as f64;
    (
        start.0 + (end.0 - start.0) * t,
        start.1 + (end.1 - start.1) * t,
    )
}

/// Canvas x where a label of `label_width` columns starts so it is centered on `x`
pub fn label_anchor(x: f64, label_width: usize, canvas_columns: u16) -> f64 {
    if canvas_columns == 0 {
        return x;
    }
    let cell = CANVAS_SPAN / canvas_columns as f64;
    let start = x - label_width as f64 * cell / 2.0;
    let max_start = CANVAS_SPAN - label_width as f64 * cell;
    start.clamp(0.0, max_start.max(0.0))
}

fn draw_nodes(app: &AppState) -> Vec<DrawNode> {
    let Some(graph) = app.graph.as_ref() else {
        return Vec::new();
    };
    let focused_id = app
        .focused_node
        .and_then(|idx| graph.nodes.get(idx))
        .map(|node| node.id.as_str());

    app.renderer
        .node_positions()
        .into_iter()
        .filter_map(|position| {
            let node: &GraphNode = graph.node(&position.id)?;
            Some(DrawNode {
                label: truncate_to_width(&node.label, MAX_LABEL_WIDTH),
                color: rgb(node.color),
                border: node.border,
                is_center: node.is_center(),
                focused: focused_id == Some(node.id.as_str()),
                position,
            })
        })
        .collect()
}

fn render_message(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let message = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(NEON_PURPLE)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(message, area);
}

pub fn render_graph(f: &mut Frame, area: Rect, app: &mut AppState) {
    // Split: summary line + canvas
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let category_count = app
        .graph
        .as_ref()
        .map_or(0, |g| g.nodes.len().saturating_sub(1));
    let mut summary_spans = vec![
        Span::styled(" ◇ ", Style::default().fg(NEON_PURPLE)),
        Span::styled(
            format!("Categories: {}", category_count),
            Style::default().fg(BONE_WHITE),
        ),
    ];
    if let Some(title) = app.focused_node_title() {
        summary_spans.push(Span::styled(" │ ", Style::default().fg(BONE_WHITE)));
        summary_spans.push(Span::styled(
            title.to_string(),
            Style::default().fg(PUMPKIN_ORANGE),
        ));
    }
    let summary = Paragraph::new(Line::from(summary_spans)).block(
        Block::default()
            .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(NEON_PURPLE))
            .title(vec![Span::styled(
                "━ Net Worth Graph ━",
                Style::default()
                    .fg(NEON_PURPLE)
                    .add_modifier(Modifier::BOLD),
            )]),
    );
    f.render_widget(summary, chunks[0]);

    match &app.summary {
        SummaryState::Loading if app.graph.is_none() => {
            render_message(
                f,
                chunks[1],
                vec![Line::from(Span::styled(
                    "Loading your finances...",
                    Style::default().fg(BONE_WHITE),
                ))],
            );
            return;
        }
        SummaryState::Failed(message) => {
            render_message(
                f,
                chunks[1],
                vec![
                    Line::from(Span::styled(
                        format!("Could not load your summary: {}", message),
                        Style::default().fg(BLOOD_RED),
                    )),
                    Line::from(Span::styled(
                        "Press r to retry.",
                        Style::default().fg(BONE_WHITE),
                    )),
                ],
            );
            return;
        }
        _ => {}
    }

    let block = Block::default()
        .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(NEON_PURPLE));
    let inner = block.inner(chunks[1]);
    app.renderer.set_surface(inner);

    let nodes = draw_nodes(app);
    let center = nodes
        .iter()
        .find(|n| n.is_center)
        .map(|n| (n.position.x, n.position.y));
    let only_center = nodes.len() <= 1;

    // Pulsing color for animation
    let pulse_color = interpolate_color((138, 43, 226), (187, 154, 247), app.pulse_phase);

    // Capture values for closure
    let animations_enabled = app.settings.animations_enabled;
    let labels_enabled = app.settings.labels_enabled;
    let pulse_phase = app.pulse_phase;
    let canvas_columns = inner.width;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, CANVAS_SPAN])
        .y_bounds([0.0, CANVAS_SPAN])
        .paint(move |ctx| {
            // Edges first, so nodes draw over them
            if let Some((cx, cy)) = center {
                for node in nodes.iter().filter(|n| !n.is_center) {
                    let (x, y) = (node.position.x, node.position.y);
                    ctx.draw(&CanvasLine {
                        x1: x,
                        y1: y,
                        x2: cx,
                        y2: cy,
                        color: pulse_color,
                    });

                    if animations_enabled {
                        for &offset in &PARTICLE_OFFSETS {
                            let (px, py) = particle_position((x, y), (cx, cy), pulse_phase, offset);
                            ctx.print(
                                px,
                                py,
                                Span::styled(PARTICLE_SYMBOL, Style::default().fg(node.color)),
                            );
                        }
                    }
                }
            }

            ctx.layer();

            for node in &nodes {
                let NodePosition { x, y, radius, .. } = node.position;
                ctx.draw(&Circle {
                    x,
                    y,
                    radius,
                    color: node.color,
                });
                if let Some(tone) = node.border {
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius: radius + 1.0,
                        color: border_tone_color(tone),
                    });
                }
                if node.focused {
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius: radius + 2.0,
                        color: PUMPKIN_ORANGE,
                    });
                }
            }

            ctx.layer();

            for node in &nodes {
                if !labels_enabled && !node.focused && !node.is_center {
                    continue;
                }
                let start = label_anchor(node.position.x, node.label.width(), canvas_columns);
                let style = if node.focused {
                    Style::default()
                        .fg(PUMPKIN_ORANGE)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(node.color)
                };
                ctx.print(start, node.position.y, Span::styled(node.label.clone(), style));
            }

            if only_center {
                ctx.print(
                    label_anchor(50.0, EMPTY_GRAPH_HINT.width(), canvas_columns),
                    12.0,
                    Span::styled(EMPTY_GRAPH_HINT, Style::default().fg(BONE_WHITE)),
                );
            }
        });

    f.render_widget(canvas, chunks[1]);
}
