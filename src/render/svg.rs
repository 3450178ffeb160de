//! Static SVG rendering

use super::escape_xml;
use super::layout::{spring_layout, LayoutConfig, Point};
use crate::algo::Communities;
use crate::graph::{RuleGraph, UndirectedGraph};
use crate::types::ProductId;
use std::collections::HashMap;

const BACKGROUND: &str = "#0f172a";
const EDGE_COLOR: &str = "#64748b";
const NODE_COLOR: &str = "#6366f1";
const LABEL_COLOR: &str = "#e2e8f0";
const PALETTE: [&str; 10] = [
    "#6366f1", "#ec4899", "#10b981", "#f59e0b", "#0ea5e9", "#ef4444", "#a855f7", "#84cc16", "#14b8a6",
    "#f97316",
];

fn open_svg(config: &LayoutConfig, with_arrows: bool) -> String {
    let mut svg = format!(
        r#"<svg width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" xmlns="http://www.w3.org/2000/svg" style="background-color: {BACKGROUND};">"#,
        w = config.width,
        h = config.height,
    );
    svg.push('\n');
    if with_arrows {
        svg.push_str(&format!(
            r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{EDGE_COLOR}"/></marker></defs>"#
        ));
        svg.push('\n');
    }
    svg
}

fn push_label(svg: &mut String, at: Point, radius: f64, text: &str) {
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" fill="{LABEL_COLOR}">{}</text>"#,
        at.x + radius + 2.0,
        at.y + 4.0,
        escape_xml(text)
    ));
    svg.push('\n');
}

/// Shorten a line so it ends on the rim of the target circle
fn trim_to_rim(from: Point, to: Point, radius: f64) -> Point {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist <= radius {
        return to;
    }
    Point {
        x: to.x - dx / dist * radius,
        y: to.y - dy / dist * radius,
    }
}

/// Draw the directed rule graph.
///
/// Edge stroke width is the edge weight (scaled confidence); node radius
/// grows with `ranks` (PageRank, around 1.0 on average).
pub fn render_rule_graph(graph: &RuleGraph, ranks: &HashMap<ProductId, f64>, config: &LayoutConfig) -> String {
    let indexed = graph.indexed_edges();
    let pairs: Vec<(usize, usize)> = indexed.iter().map(|&(u, v, _)| (u, v)).collect();
    let positions = spring_layout(graph.node_count(), &pairs, config);
    let radii: Vec<f64> = graph
        .nodes()
        .map(|n| 4.0 + ranks.get(&n.id).copied().unwrap_or(1.0) * 4.0)
        .collect();

    let mut svg = open_svg(config, true);

    for (edge, &(u, v, weight)) in graph.edges().iter().zip(&indexed) {
        let end = trim_to_rim(positions[u], positions[v], radii[v]);
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{EDGE_COLOR}" stroke-width="{:.2}" opacity="0.6" marker-end="url(#arrow)"><title>{} → {}: {:.3}</title></line>"#,
            positions[u].x,
            positions[u].y,
            end.x,
            end.y,
            weight.max(0.5),
            edge.source,
            edge.target,
            edge.confidence
        ));
        svg.push('\n');
    }

    for (i, node) in graph.nodes().enumerate() {
        let label = node.display_label();
        svg.push_str(&format!(
            r##"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{NODE_COLOR}" stroke="#1e293b" stroke-width="1"><title>{}</title></circle>"##,
            positions[i].x,
            positions[i].y,
            radii[i],
            escape_xml(&label)
        ));
        svg.push('\n');
        push_label(&mut svg, positions[i], radii[i], &label);
    }

    svg.push_str("</svg>\n");
    svg
}

/// Draw the undirected graph with nodes coloured by community.
pub fn render_communities(graph: &UndirectedGraph, communities: &Communities, config: &LayoutConfig) -> String {
    let indexed = graph.indexed_edges();
    let pairs: Vec<(usize, usize)> = indexed.iter().map(|&(u, v, _)| (u, v)).collect();
    let positions = spring_layout(graph.node_count(), &pairs, config);

    let mut svg = open_svg(config, false);

    for &(u, v, weight) in &indexed {
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{EDGE_COLOR}" stroke-width="{:.2}" opacity="0.6"/>"#,
            positions[u].x,
            positions[u].y,
            positions[v].x,
            positions[v].y,
            weight.max(0.5)
        ));
        svg.push('\n');
    }

    const RADIUS: f64 = 7.0;
    for (i, node) in graph.nodes().enumerate() {
        let community = communities.community_of(node.id).unwrap_or(0);
        let label = node.display_label();
        svg.push_str(&format!(
            r##"<circle cx="{:.1}" cy="{:.1}" r="{RADIUS:.1}" fill="{}" stroke="#1e293b" stroke-width="1" data-community="{community}"><title>{} (community {community})</title></circle>"##,
            positions[i].x,
            positions[i].y,
            PALETTE[community % PALETTE.len()],
            escape_xml(&label)
        ));
        svg.push('\n');
        push_label(&mut svg, positions[i], RADIUS, &label);
    }

    svg.push_str("</svg>\n");
    svg
}
