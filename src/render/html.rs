//! Interactive HTML rendering (vis-network)

use super::escape_xml;
use crate::error::PipelineResult;
use crate::graph::RuleGraph;
use serde_json::json;

const VIS_NETWORK_URL: &str = "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

/// Render a self-contained page that draws the rule graph with vis-network.
///
/// Edge width is `confidence × weight_scale`; hovering an edge shows its
/// confidence, hovering a node its product id.
pub fn render_interactive(graph: &RuleGraph, weight_scale: f64, title: &str) -> PipelineResult<String> {
    let nodes: Vec<serde_json::Value> = graph
        .nodes()
        .map(|n| {
            json!({
                "id": n.id.as_u64(),
                "label": n.display_label(),
                "title": format!("product {}", n.id),
            })
        })
        .collect();

    let edges: Vec<serde_json::Value> = graph
        .edges()
        .iter()
        .map(|e| {
            json!({
                "from": e.source.as_u64(),
                "to": e.target.as_u64(),
                "width": e.confidence * weight_scale,
                "title": format!("confidence {:.3}", e.confidence),
                "arrows": "to",
            })
        })
        .collect();

    // `</` inside a script block would end it early
    let nodes_json = serde_json::to_string(&nodes)?.replace("</", "<\\/");
    let edges_json = serde_json::to_string(&edges)?.replace("</", "<\\/");

    Ok(format!(
        r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{VIS_NETWORK_URL}"></script>
<style>
  html, body {{ margin: 0; height: 100%; background: #0f172a; }}
  #graph {{ width: 100%; height: 100%; }}
</style>
</head>
<body>
<div id="graph"></div>
<script>
  const nodes = new vis.DataSet({nodes_json});
  const edges = new vis.DataSet({edges_json});
  const options = {{
    nodes: {{ shape: "dot", size: 12, font: {{ color: "#e2e8f0" }}, color: "#6366f1" }},
    edges: {{ color: {{ color: "#64748b" }}, smooth: {{ type: "dynamic" }} }},
    physics: {{ stabilization: true, barnesHut: {{ springLength: 150 }} }},
    interaction: {{ hover: true, tooltipDelay: 100 }}
  }};
  new vis.Network(document.getElementById("graph"), {{ nodes, edges }}, options);
</script>
</body>
</html>
"##,
        title = escape_xml(title),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Catalog;
    use crate::mining::AssociationRule;
    use crate::types::ProductId;

    #[test]
    fn test_embeds_nodes_and_scaled_edges() {
        let rules = vec![AssociationRule {
            antecedent: vec![ProductId(1)],
            consequent: vec![ProductId(2)],
            confidence: 0.5,
            lift: 1.0,
            support: 0.5,
        }];
        let catalog: Catalog = vec![(1u64, "</script>milk"), (2u64, "bread")].into_iter().collect();
        let graph = RuleGraph::from_rules(&rules, &catalog, 10.0);

        let html = render_interactive(&graph, 20.0, "Rules").unwrap();

        assert!(html.contains(r#""width":10.0"#));
        assert!(html.contains(r#""label":"bread""#));
        assert!(html.contains(r#""arrows":"to""#));
        assert!(html.contains("<title>Rules</title>"));
        // Only the real closing tag of the data script survives
        assert!(html.contains(r#"<\/script>milk"#));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_empty_graph() {
        let html = render_interactive(&RuleGraph::default(), 20.0, "empty").unwrap();
        assert!(html.contains("new vis.DataSet([])"));
        assert!(html.contains(r##"font: { color: "#e2e8f0" }"##));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
