//! The server's vertex-list text format: `"x1,y1 x2,y2 x3,y3"`.

use tracing::warn;

/// Format vertices as a space-separated list of `x,y` pairs
pub fn format_points(points: &[[f64; 2]]) -> String {
    points
        .iter()
        .map(|[x, y]| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a vertex list. Malformed and non-finite pairs are skipped.
pub fn parse_points(text: &str) -> Vec<[f64; 2]> {
    text.split_whitespace()
        .filter_map(|pair| {
            let parsed = pair
                .split_once(',')
                .and_then(|(x, y)| {
                    Some([x.trim().parse::<f64>().ok()?, y.trim().parse::<f64>().ok()?])
                })
                .filter(|[x, y]| x.is_finite() && y.is_finite());
            if parsed.is_none() {
                warn!("Skipping malformed point '{}'", pair);
            }
            parsed
        })
        .collect()
}

/// Serde adapter storing vertex lists in the text format
pub mod serde_points {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(points: &[[f64; 2]], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_points(points))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<[f64; 2]>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Ok(super::parse_points(&text))
    }
}
