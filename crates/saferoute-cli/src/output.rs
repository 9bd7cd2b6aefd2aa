//! Output formatting for route, nearest-node and statistics results.
//!
//! Human formats go through the library renderers where one exists; the CLI
//! adds the colored safety badge and tabular layouts on top.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;
use serde_json::json;

use saferoute_lib::{
    format_distance, Coordinate, DistrictStats, NodeId, RouteRenderMode, RouteSummary,
};

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain human-readable text.
    #[default]
    Text,
    /// Markdown-flavoured text.
    Rich,
    /// Pretty-printed JSON.
    Json,
    /// GeoJSON feature.
    Geojson,
}

/// Result of a nearest-node lookup as shown to the user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NearestReport {
    pub query: Coordinate,
    pub node: NodeId,
    pub position: Coordinate,
    pub distance_m: f64,
    pub district: String,
    pub lighting_score: u8,
    pub crime_risk_score: u8,
}

/// Write a route summary in the requested format.
pub fn render_route<W: Write>(
    out: &mut W,
    summary: &RouteSummary,
    format: OutputFormat,
    palette: &ColorPalette,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(
                out,
                "{} {} {} {}/100",
                palette.safety_tag(summary.safety_level),
                summary.safety_level.label().to_uppercase(),
                palette.reset,
                summary.safety_score
            )?;
            write!(out, "{}", summary.render(RouteRenderMode::PlainText))?;
            if summary.dark_distance_m > 0.0 {
                writeln!(
                    out,
                    "{}Route includes {} of dark streets.{}",
                    palette.red,
                    format_distance(summary.dark_distance_m),
                    palette.reset
                )?;
            }
            Ok(())
        }
        OutputFormat::Rich => write!(out, "{}", summary.render(RouteRenderMode::RichText)),
        OutputFormat::Json => write_json(out, summary),
        OutputFormat::Geojson => write_json(out, &summary.to_geojson()),
    }
}

/// Write a nearest-node lookup in the requested format.
pub fn render_nearest<W: Write>(
    out: &mut W,
    report: &NearestReport,
    format: OutputFormat,
    palette: &ColorPalette,
) -> io::Result<()> {
    match format {
        OutputFormat::Text | OutputFormat::Rich => {
            writeln!(
                out,
                "Nearest node: {}{}{} ({} away)",
                palette.white_bold,
                report.node,
                palette.reset,
                format_distance(report.distance_m)
            )?;
            writeln!(out, "Position: {}", report.position)?;
            writeln!(out, "District: {}", report.district)?;
            writeln!(
                out,
                "{}Lighting {}/100, crime risk {}/100{}",
                palette.gray, report.lighting_score, report.crime_risk_score, palette.reset
            )
        }
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Geojson => write_json(
            out,
            &json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [report.position.lng, report.position.lat],
                },
                "properties": {
                    "node": report.node,
                    "distance_m": report.distance_m,
                    "district": report.district,
                    "lighting_score": report.lighting_score,
                    "crime_risk_score": report.crime_risk_score,
                },
            }),
        ),
    }
}

/// Write per-district statistics. GeoJSON has no natural shape for these
/// and falls back to JSON.
pub fn render_stats<W: Write>(
    out: &mut W,
    stats: &[DistrictStats],
    format: OutputFormat,
    palette: &ColorPalette,
) -> io::Result<()> {
    match format {
        OutputFormat::Text | OutputFormat::Rich => {
            writeln!(
                out,
                "{}{:<16} {:>6} {:>9} {:>11} {:>6} {:>10}{}",
                palette.gray,
                "District",
                "Nodes",
                "Lighting",
                "Crime risk",
                "Edges",
                "Incidents",
                palette.reset
            )?;
            for row in stats {
                writeln!(
                    out,
                    "{:<16} {:>6} {:>9.1} {:>11.1} {:>6} {:>10}",
                    row.district,
                    row.nodes,
                    row.mean_lighting,
                    row.mean_crime_risk,
                    row.edges,
                    row.incidents
                )?;
            }
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Geojson => write_json(out, &stats),
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}
