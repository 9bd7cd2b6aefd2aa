//! Edge traversal cost for safety-aware routing.
//!
//! The cost of walking an edge is its physical length inflated by a penalty
//! for poor lighting and for recorded incidents:
//!
//! ```text
//! lighting_deficit = (100 - avg_lighting) / 100
//! crime_density    = clamp(incident_count / incident_normalizer, 0, 1)
//! penalty          = w_light * lighting_deficit + w_crime * crime_density
//!                  + 5.0 when avoiding dark streets and avg_lighting < 50
//! cost             = length * (1 + penalty)
//! ```
//!
//! The penalty is never negative, so `cost >= length` holds for every edge
//! and every option combination.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{Edge, Graph};

/// Base weight applied to the lighting deficit.
pub const BASE_LIGHT_WEIGHT: f64 = 0.4;
/// Base weight applied to crime density.
pub const BASE_CRIME_WEIGHT: f64 = 0.6;
/// Multiplier for both weights when safety is prioritized.
pub const SAFETY_PRIORITY_FACTOR: f64 = 1.5;
/// Multiplier for the lighting weight after dark.
pub const NIGHT_LIGHT_FACTOR: f64 = 1.5;
/// Flat penalty added to dark edges when the walker avoids dark streets.
pub const DARK_STREET_SURCHARGE: f64 = 5.0;

/// Time of day the walk happens at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
}

impl TimeOfDay {
    /// Hours before 06:00 and from 20:00 onwards count as night.
    pub fn from_hour(hour: u32) -> Self {
        if !(6..20).contains(&hour) {
            TimeOfDay::Night
        } else {
            TimeOfDay::Day
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeOfDay::Day => "day",
            TimeOfDay::Night => "night",
        })
    }
}

/// Per-query routing preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteOptions {
    pub prioritize_safety: bool,
    pub avoid_dark_streets: bool,
    pub time_of_day: TimeOfDay,
}

/// Objective minimized by the path finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOptimization {
    /// Length inflated by lighting and crime penalties.
    #[default]
    Safety,
    /// Raw edge length.
    Distance,
}

impl fmt::Display for RouteOptimization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RouteOptimization::Safety => "safety",
            RouteOptimization::Distance => "distance",
        })
    }
}

/// Lighting and crime weights after applying the query options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostWeights {
    pub light: f64,
    pub crime: f64,
}

impl CostWeights {
    pub fn resolve(options: &RouteOptions) -> Self {
        let mut light = BASE_LIGHT_WEIGHT;
        let mut crime = BASE_CRIME_WEIGHT;
        if options.prioritize_safety {
            light *= SAFETY_PRIORITY_FACTOR;
            crime *= SAFETY_PRIORITY_FACTOR;
        }
        if options.time_of_day == TimeOfDay::Night {
            light *= NIGHT_LIGHT_FACTOR;
        }
        Self { light, crime }
    }
}

/// Fraction of full darkness on an edge, 0.0 for fully lit.
pub fn lighting_deficit(edge: &Edge) -> f64 {
    (100.0 - f64::from(edge.avg_lighting.min(100))) / 100.0
}

/// Cost evaluator resolved once per query.
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    weights: CostWeights,
    avoid_dark_streets: bool,
    incident_normalizer: f64,
    optimization: RouteOptimization,
}

impl CostModel {
    pub fn new(graph: &Graph, options: &RouteOptions, optimization: RouteOptimization) -> Self {
        let weights = CostWeights::resolve(options);
        debug!(
            light = weights.light,
            crime = weights.crime,
            avoid_dark = options.avoid_dark_streets,
            %optimization,
            "resolved cost model"
        );
        Self {
            weights,
            avoid_dark_streets: options.avoid_dark_streets,
            incident_normalizer: f64::from(graph.incident_normalizer().max(1)),
            optimization,
        }
    }

    pub fn weights(&self) -> CostWeights {
        self.weights
    }

    pub fn optimization(&self) -> RouteOptimization {
        self.optimization
    }

    /// Incident count scaled into `[0, 1]` by the graph-wide maximum.
    pub fn crime_density(&self, edge: &Edge) -> f64 {
        (f64::from(edge.incident_count) / self.incident_normalizer).clamp(0.0, 1.0)
    }

    /// Safety penalty multiplier for an edge, always non-negative.
    pub fn penalty(&self, edge: &Edge) -> f64 {
        let mut penalty = self.weights.light * lighting_deficit(edge)
            + self.weights.crime * self.crime_density(edge);
        if self.avoid_dark_streets && edge.is_dark() {
            penalty += DARK_STREET_SURCHARGE;
        }
        penalty
    }

    pub fn edge_cost(&self, edge: &Edge) -> f64 {
        match self.optimization {
            RouteOptimization::Safety => edge.length_m * (1.0 + self.penalty(edge)),
            RouteOptimization::Distance => edge.length_m,
        }
    }
}

/// Safety cost of traversing `edge` under `options`.
pub fn edge_cost(graph: &Graph, edge: &Edge, options: &RouteOptions) -> f64 {
    CostModel::new(graph, options, RouteOptimization::Safety).edge_cost(edge)
}
