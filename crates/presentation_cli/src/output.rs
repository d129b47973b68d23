//! Console rendering of service results

use domain::Coordinate;
use location_services::{Candidate, DEFAULT_CATEGORIES, Directions};

/// Geocoding result: candidates as JSON, or a "nothing found" line
pub fn geocode_report(query: &str, candidates: &[Candidate]) -> Result<String, serde_json::Error> {
    if candidates.is_empty() {
        return Ok(format!("Nothing found for {query}"));
    }
    serde_json::to_string_pretty(candidates)
}

/// Place search result: one block per named place
pub fn places_report(categories: &[String], near: Option<Coordinate>, places: &[Candidate]) -> String {
    if places.is_empty() {
        let location = near.unwrap_or_else(Coordinate::washington_dc);
        let categories = if categories.is_empty() {
            DEFAULT_CATEGORIES.join(",")
        } else {
            categories.join(",")
        };
        return format!("Nothing found near {location} matching {categories}");
    }

    places
        .iter()
        .filter(|p| p.place_name.is_some())
        .map(|p| format!("{}\n\n", p.format_detail()))
        .collect()
}

/// Directions result: summary JSON, step count and each instruction
pub fn directions_report(directions: &Directions) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string(&directions.summary)?;
    out.push('\n');
    out.push_str(&format!("{} direction steps\n", directions.steps.len()));
    for text in directions.instructions() {
        out.push_str(text);
        out.push('\n');
    }
    Ok(out)
}
