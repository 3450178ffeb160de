//! Presentation: layout and rendering of rule graphs
//!
//! - [`layout`]: seeded force-directed node placement
//! - [`svg`]: static drawings of the directed graph and of the community partition
//! - [`html`]: interactive page driven by vis-network

pub mod html;
pub mod layout;
pub mod svg;

pub use html::render_interactive;
pub use layout::{spring_layout, LayoutConfig, Point};
pub use svg::{render_communities, render_rule_graph};

/// Escape text for XML/HTML attribute and element content
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
