//! Deterministic synthetic street graphs for tests, benchmarks and demos.
//!
//! The generator lays a square grid over a bounding box (Plzeň by default),
//! scatters seeded incident hot spots, and derives node lighting and crime
//! risk from them. Everything random comes from one `StdRng` seeded by the
//! caller, so the same seed always yields the same graph.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::coords::{haversine_distance, Coordinate};
use crate::dataset::{mean_lighting, EdgeRecord, GraphDocument};
use crate::error::Result;
use crate::graph::{Graph, Node};

/// Plzeň city centre.
pub const PLZEN_CENTER: Coordinate = Coordinate {
    lat: 49.7477,
    lng: 13.3775,
};

pub const DEFAULT_GRID_SIZE: usize = 15;

/// Kilometers per degree used by the planar approximations below.
const KM_PER_DEGREE: f64 = 111.0;

/// Incidents closer than this raise a node's crime risk.
const CRIME_RADIUS_KM: f64 = 0.5;

const STREET_NAMES: [&str; 14] = [
    "Americká",
    "Klatovská",
    "Karlovarská",
    "Slovanská",
    "Borská",
    "Lochotínská",
    "Doubravecká",
    "Jiráskovo náměstí",
    "Bělohorská",
    "Malostranská",
    "Dlouhá",
    "Husova",
    "Nerudova",
    "Tylova",
];

/// Incident severity weights, one entry per incident type.
const INCIDENT_WEIGHTS: [u32; 6] = [3, 2, 1, 3, 2, 3];

struct Hotspot {
    center: Coordinate,
    incidents: usize,
    spread_km: f64,
}

const HOTSPOTS: [Hotspot; 4] = [
    Hotspot {
        center: PLZEN_CENTER,
        incidents: 40,
        spread_km: 0.015,
    },
    Hotspot {
        center: Coordinate {
            lat: 49.7391,
            lng: 13.3612,
        },
        incidents: 70,
        spread_km: 0.020,
    },
    Hotspot {
        center: Coordinate {
            lat: 49.7411,
            lng: 13.3983,
        },
        incidents: 150,
        spread_km: 0.025,
    },
    Hotspot {
        center: Coordinate {
            lat: 49.7623,
            lng: 13.3589,
        },
        incidents: 45,
        spread_km: 0.022,
    },
];

/// Geographic rectangle covered by the generated grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            north: 49.79,
            south: 49.70,
            east: 13.43,
            west: 13.32,
        }
    }
}

struct Incident {
    position: Coordinate,
    weight: u32,
}

/// Seeded builder for grid-shaped street graphs.
#[derive(Debug, Clone)]
pub struct FixtureBuilder {
    seed: u64,
    grid_size: usize,
    bounds: Bounds,
    center: Coordinate,
}

impl FixtureBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            grid_size: DEFAULT_GRID_SIZE,
            bounds: Bounds::default(),
            center: PLZEN_CENTER,
        }
    }

    /// Number of cells per side; the graph has `(n + 1)^2` nodes.
    pub fn grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size.max(1);
        self
    }

    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Point lighting falls off from.
    pub fn center(mut self, center: Coordinate) -> Self {
        self.center = center;
        self
    }

    pub fn build(&self) -> Result<Graph> {
        self.document().into_graph()
    }

    pub fn document(&self) -> GraphDocument {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let incidents = scatter_incidents(&mut rng);

        let side = self.grid_size + 1;
        let node_width = digits(side * side);
        let lat_step = (self.bounds.north - self.bounds.south) / self.grid_size as f64;
        let lng_step = (self.bounds.east - self.bounds.west) / self.grid_size as f64;

        let mut nodes = Vec::with_capacity(side * side);
        for row in 0..side {
            for col in 0..side {
                let lat = self.bounds.south + row as f64 * lat_step;
                let lng = self.bounds.west + col as f64 * lng_step;
                let position = Coordinate::new(lat, lng);

                let from_center = planar_km(position, self.center, true);
                let noise = (rng.random::<f64>() - 0.5) * 20.0;
                let lighting = (90.0 - from_center * 5.0 + noise).clamp(40.0, 95.0);

                let weight: u32 = incidents
                    .iter()
                    .filter(|incident| planar_km(incident.position, position, false) < CRIME_RADIUS_KM)
                    .map(|incident| incident.weight)
                    .sum();

                nodes.push(Node {
                    id: format!("n{:0width$}", nodes.len() + 1, width = node_width),
                    lat,
                    lng,
                    district: district_for(position).to_string(),
                    lighting_score: lighting.round() as u8,
                    crime_risk_score: (weight * 2).min(100) as u8,
                });
            }
        }

        let mut pairs = Vec::new();
        for row in 0..side {
            for col in 0..side {
                let here = row * side + col;
                if col < self.grid_size {
                    pairs.push((here, here + 1));
                }
                if row < self.grid_size {
                    pairs.push((here, here + side));
                }
                if row < self.grid_size && col < self.grid_size && rng.random::<f64>() > 0.5 {
                    pairs.push((here, here + side + 1));
                }
            }
        }

        let edge_width = digits(pairs.len());
        let edges: Vec<EdgeRecord> = pairs
            .iter()
            .enumerate()
            .map(|(position, &(a, b))| {
                let (a, b) = (&nodes[a], &nodes[b]);
                let length = haversine_distance(a.position(), b.position()).round().max(1.0);
                let crime = u32::from(a.crime_risk_score) + u32::from(b.crime_risk_score);
                EdgeRecord {
                    id: format!("e{:0width$}", position + 1, width = edge_width),
                    from: a.id.clone(),
                    to: b.id.clone(),
                    length_m: length,
                    avg_lighting: Some(mean_lighting(a.lighting_score, b.lighting_score)),
                    incident_count: (crime + 10) / 20,
                    street: STREET_NAMES[position % STREET_NAMES.len()].to_string(),
                }
            })
            .collect();

        debug!(
            seed = self.seed,
            nodes = nodes.len(),
            edges = edges.len(),
            incidents = incidents.len(),
            "generated fixture graph"
        );

        GraphDocument { nodes, edges }
    }
}

fn scatter_incidents(rng: &mut StdRng) -> Vec<Incident> {
    let mut incidents = Vec::new();
    for hotspot in &HOTSPOTS {
        let lng_scale = KM_PER_DEGREE * hotspot.center.lat.to_radians().cos();
        for _ in 0..hotspot.incidents {
            let angle = rng.random::<f64>() * 2.0 * PI;
            let radius = rng.random::<f64>() * hotspot.spread_km;
            let weight = INCIDENT_WEIGHTS[rng.random_range(0..INCIDENT_WEIGHTS.len())];
            incidents.push(Incident {
                position: Coordinate::new(
                    hotspot.center.lat + radius * angle.cos() / KM_PER_DEGREE,
                    hotspot.center.lng + radius * angle.sin() / lng_scale,
                ),
                weight,
            });
        }
    }
    incidents
}

/// District label by position thresholds.
pub fn district_for(position: Coordinate) -> &'static str {
    if position.lat < 49.740 {
        "Plzeň 3"
    } else if position.lng < 13.365 {
        "Plzeň 2"
    } else if position.lat > 49.755 {
        "Plzeň 4"
    } else {
        "Plzeň 1"
    }
}

/// Equirectangular distance in km, optionally shrinking longitude by latitude.
fn planar_km(a: Coordinate, b: Coordinate, scale_longitude: bool) -> f64 {
    let dlat = (a.lat - b.lat) * KM_PER_DEGREE;
    let mut dlng = (a.lng - b.lng) * KM_PER_DEGREE;
    if scale_longitude {
        dlng *= a.lat.to_radians().cos();
    }
    (dlat * dlat + dlng * dlng).sqrt()
}

fn digits(count: usize) -> usize {
    count.to_string().len().max(3)
}
