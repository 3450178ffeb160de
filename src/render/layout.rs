//! Force-directed layout
//!
//! Repulsion between every node pair, spring attraction along edges, a pull
//! toward the canvas centre, and clamped per-step moves. Starting positions
//! come from a seeded RNG so the same graph always lays out the same way.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Layout and canvas settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub iterations: usize,
    pub width: f64,
    pub height: f64,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 200,
            width: 1000.0,
            height: 1000.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

const REPULSION: f64 = 5000.0;
const SPRING: f64 = 0.05;
const GRAVITY: f64 = 0.01;
const MAX_STEP: f64 = 10.0;

/// Place `node_count` nodes connected by `edges` (dense index pairs).
pub fn spring_layout(node_count: usize, edges: &[(usize, usize)], config: &LayoutConfig) -> Vec<Point> {
    if node_count == 0 {
        return Vec::new();
    }

    let center = Point {
        x: config.width / 2.0,
        y: config.height / 2.0,
    };
    if node_count == 1 {
        return vec![center];
    }

    let margin_x = config.width * 0.1;
    let margin_y = config.height * 0.1;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut positions: Vec<Point> = (0..node_count)
        .map(|_| Point {
            x: rng.gen_range(margin_x..config.width - margin_x),
            y: rng.gen_range(margin_y..config.height - margin_y),
        })
        .collect();

    // Ideal edge length shrinks as the canvas fills up
    let rest_length = (config.width.min(config.height) / (node_count as f64).sqrt()).clamp(30.0, 200.0);

    for _ in 0..config.iterations {
        let mut forces = vec![Point { x: 0.0, y: 0.0 }; node_count];

        // Repulsion
        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let dx = positions[i].x - positions[j].x;
                let dy = positions[i].y - positions[j].y;
                let dist_sq = dx * dx + dy * dy + 0.1;
                let force = REPULSION / dist_sq;
                forces[i].x += dx * force;
                forces[i].y += dy * force;
                forces[j].x -= dx * force;
                forces[j].y -= dy * force;
            }
        }

        // Attraction (edges)
        for &(src, tgt) in edges {
            if src == tgt || src >= node_count || tgt >= node_count {
                continue;
            }
            let dx = positions[tgt].x - positions[src].x;
            let dy = positions[tgt].y - positions[src].y;
            let dist = (dx * dx + dy * dy).sqrt().max(0.01);
            let force = (dist - rest_length) * SPRING;
            let fx = dx / dist * force;
            let fy = dy / dist * force;
            forces[src].x += fx;
            forces[src].y += fy;
            forces[tgt].x -= fx;
            forces[tgt].y -= fy;
        }

        for (pos, force) in positions.iter_mut().zip(&forces) {
            pos.x += force.x.clamp(-MAX_STEP, MAX_STEP);
            pos.y += force.y.clamp(-MAX_STEP, MAX_STEP);

            pos.x += (center.x - pos.x) * GRAVITY;
            pos.y += (center.y - pos.y) * GRAVITY;

            pos.x = pos.x.clamp(margin_x / 2.0, config.width - margin_x / 2.0);
            pos.y = pos.y.clamp(margin_y / 2.0, config.height - margin_y / 2.0);
        }
    }

    positions
}
