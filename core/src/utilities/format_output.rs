use crate::utilities::structs::Point;

pub fn format_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn format_centroid(centroid: &[f64]) -> String {
    centroid
        .iter()
        .map(|v| format!("{v:.4}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Seed indices in selection order on the first line, then one line per
/// centroid with 4 decimals per coordinate. Every line ends with `\n`.
pub fn format_output(indices: &[usize], centroids: &[Point]) -> String {
    let mut out = format_indices(indices);
    out.push('\n');
    for c in centroids {
        out.push_str(&format_centroid(c));
        out.push('\n');
    }
    out
}
