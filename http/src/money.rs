//! Minor-units display formatting. Integer arithmetic only.

/// Render a minor-unit amount as dollars: `150` becomes `$1.50`.
pub fn format_usd(minor: u64) -> String {
    format!("${}.{:02}", minor / 100, minor % 100)
}
