use std::fmt::Write;

use serde::Serialize;
use serde_json::{json, Value};

use crate::assembly::SafetyLevel;
use crate::coords::Coordinate;
use crate::cost::{RouteOptimization, RouteOptions};
use crate::graph::{EdgeId, NodeId};
use crate::routing::{RouteAlgorithm, RoutePlan};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
}

/// Endpoint within a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteEndpoint {
    pub node: NodeId,
    pub query: Coordinate,
    pub snap_distance_m: f64,
}

/// Street segment walked during the route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub edge: EdgeId,
    pub street: String,
    pub to: NodeId,
    pub length_m: f64,
    pub avg_lighting: u8,
    pub dark: bool,
}

/// Structured representation of a planned route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub algorithm: RouteAlgorithm,
    pub optimization: RouteOptimization,
    pub options: RouteOptions,
    pub start: RouteEndpoint,
    pub goal: RouteEndpoint,
    pub distance_m: f64,
    pub estimated_time_min: u32,
    pub lighting_coverage: u8,
    pub safety_score: u8,
    pub safety_level: SafetyLevel,
    pub dark_distance_m: f64,
    pub districts: Vec<String>,
    pub steps: Vec<RouteStep>,
    pub coordinates: Vec<Coordinate>,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a structured summary.
    pub fn from_plan(plan: &RoutePlan) -> Self {
        let route = &plan.route;
        let steps = route
            .segments
            .iter()
            .enumerate()
            .map(|(index, segment)| RouteStep {
                index: index + 1,
                edge: segment.edge.clone(),
                street: segment.street.clone(),
                to: segment.to.clone(),
                length_m: segment.length_m,
                avg_lighting: segment.avg_lighting,
                dark: segment.dark,
            })
            .collect();

        Self {
            algorithm: plan.algorithm,
            optimization: plan.optimization,
            options: plan.options,
            start: RouteEndpoint {
                node: plan.start.node.clone(),
                query: plan.start.query,
                snap_distance_m: plan.start.snap_distance_m,
            },
            goal: RouteEndpoint {
                node: plan.goal.node.clone(),
                query: plan.goal.query,
                snap_distance_m: plan.goal.snap_distance_m,
            },
            distance_m: route.total_distance_m,
            estimated_time_min: route.estimated_time_min,
            lighting_coverage: route.lighting_coverage,
            safety_score: route.safety_score,
            safety_level: route.safety_level,
            dark_distance_m: route.dark_distance_m,
            districts: route.districts.clone(),
            steps,
            coordinates: route.coordinates.clone(),
        }
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
        }
    }

    /// GeoJSON `Feature` with a `LineString` in `[lng, lat]` order.
    pub fn to_geojson(&self) -> Value {
        let coordinates: Vec<[f64; 2]> = self
            .coordinates
            .iter()
            .map(|point| [point.lng, point.lat])
            .collect();
        json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            },
            "properties": {
                "start": self.start.node,
                "goal": self.goal.node,
                "algorithm": self.algorithm,
                "optimization": self.optimization,
                "distance_m": self.distance_m,
                "estimated_time_min": self.estimated_time_min,
                "lighting_coverage": self.lighting_coverage,
                "safety_score": self.safety_score,
                "safety_level": self.safety_level,
                "dark_distance_m": self.dark_distance_m,
                "districts": self.districts,
            },
        })
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({}, {}, algorithm: {})",
            self.start.node,
            self.goal.node,
            format_distance(self.distance_m),
            format_duration(self.estimated_time_min),
            self.algorithm
        );
        let _ = writeln!(
            buffer,
            "Safety: {}/100 ({}), lighting coverage {}%",
            self.safety_score, self.safety_level, self.lighting_coverage
        );
        if self.dark_distance_m > 0.0 {
            let _ = writeln!(
                buffer,
                "Dark streets: {}",
                format_distance(self.dark_distance_m)
            );
        }
        if !self.districts.is_empty() {
            let _ = writeln!(buffer, "Districts: {}", self.districts.join(" -> "));
        }
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "{:>3}: {} to {} ({}, lighting {}%){}",
                step.index,
                step.street,
                step.to,
                format_distance(step.length_m),
                step.avg_lighting,
                if step.dark { " [dark]" } else { "" }
            );
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Route** _{} → {}_ ({}, {}, algorithm: `{}`)",
            self.start.node,
            self.goal.node,
            format_distance(self.distance_m),
            format_duration(self.estimated_time_min),
            self.algorithm
        );
        let _ = writeln!(
            buffer,
            "**Safety** {}/100 _{}_ · lighting {}%",
            self.safety_score, self.safety_level, self.lighting_coverage
        );
        for step in &self.steps {
            let marker = if step.dark { " ⚠" } else { "" };
            let _ = writeln!(
                buffer,
                "* {:>2}. **{}** → `{}` ({}){}",
                step.index,
                step.street,
                step.to,
                format_distance(step.length_m),
                marker
            );
        }
        buffer
    }
}

/// `"850 m"` below a kilometer, `"1.2 km"` above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round())
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// `"25 min"` below an hour, `"1h 5min"` above.
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{}h {}min", minutes / 60, minutes % 60)
    }
}
