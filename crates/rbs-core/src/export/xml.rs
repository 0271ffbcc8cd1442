//! XML generation utilities shared by the URDF and SDF writers

use glam::DVec3;

/// Format a float in a locale-independent, round-trippable way
///
/// Uses the shortest representation that parses back to the same value and
/// always carries a decimal point or exponent (`1.0`, `0.25`, `1e-7`).
/// Negative zero is written as `0.0`.
pub fn format_float(value: f64) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }
    format!("{:?}", value)
}

/// Format a vector as three space-separated floats
pub fn format_vec3(v: DVec3) -> String {
    format!(
        "{} {} {}",
        format_float(v.x),
        format_float(v.y),
        format_float(v.z)
    )
}

pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Push one line of output at the given indentation
pub fn push_line(out: &mut String, indent: usize, line: &str) {
    for _ in 0..indent {
        out.push(' ');
    }
    out.push_str(line);
    out.push('\n');
}

/// Push `<tag>value</tag>` at the given indentation
pub fn push_element(out: &mut String, indent: usize, tag: &str, value: &str) {
    push_line(out, indent, &format!("<{tag}>{value}</{tag}>"));
}
