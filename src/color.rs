// ============================================================================
// COLOR STRINGS — "rgba(r, g, b, a)" cells used by pixel grids
// ============================================================================

/// Fully transparent cell, used for padding.
pub const TRANSPARENT: &str = "rgba(0, 0, 0, 0)";

/// Format channel bytes as a grid cell. Alpha is the raw byte, not 0–1.
pub fn format_rgba(px: [u8; 4]) -> String {
    format!("rgba({}, {}, {}, {})", px[0], px[1], px[2], px[3])
}

/// Parse an `rgba(...)` or `rgb(...)` cell back into channel bytes.
///
/// Alpha is read as a byte (`0..=255`). Hand-authored sprites sometimes use
/// CSS-style fractional alpha; a value containing `.` is taken as `0.0..=1.0`
/// and scaled to a byte.
pub fn parse_rgba(s: &str) -> Option<[u8; 4]> {
    let s = s.trim();
    let (body, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
        (rest, true)
    } else if let Some(rest) = s.strip_prefix("rgb(") {
        (rest, false)
    } else {
        return None;
    };
    let body = body.strip_suffix(')')?;

    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let expected = if has_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let r = parts[0].parse::<u8>().ok()?;
    let g = parts[1].parse::<u8>().ok()?;
    let b = parts[2].parse::<u8>().ok()?;
    let a = if has_alpha { parse_alpha(parts[3])? } else { 255 };
    Some([r, g, b, a])
}

fn parse_alpha(s: &str) -> Option<u8> {
    if s.contains('.') {
        let f = s.parse::<f32>().ok()?;
        if !(0.0..=1.0).contains(&f) {
            return None;
        }
        Some((f * 255.0).round() as u8)
    } else {
        s.parse::<u8>().ok()
    }
}

/// Parse a cell for display. Anything unreadable draws as transparent.
pub fn cell_rgba(s: &str) -> [u8; 4] {
    parse_rgba(s).unwrap_or([0, 0, 0, 0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_matches_grid_convention() {
        assert_eq!(format_rgba([1, 22, 255, 0]), "rgba(1, 22, 255, 0)");
        assert_eq!(format_rgba([0, 0, 0, 0]), TRANSPARENT);
    }

    #[test]
    fn parse_reads_back_formatted_cells() {
        let px = [12, 34, 56, 78];
        assert_eq!(parse_rgba(&format_rgba(px)), Some(px));
    }

    #[test]
    fn parse_tolerates_whitespace_and_rgb() {
        assert_eq!(parse_rgba("  rgba(1,2 ,3,  4) "), Some([1, 2, 3, 4]));
        assert_eq!(parse_rgba("rgb(9, 8, 7)"), Some([9, 8, 7, 255]));
    }

    #[test]
    fn fractional_alpha_is_scaled() {
        assert_eq!(parse_rgba("rgba(0, 0, 0, 0.5)"), Some([0, 0, 0, 128]));
        assert_eq!(parse_rgba("rgba(0, 0, 0, 1.0)"), Some([0, 0, 0, 255]));
        assert_eq!(parse_rgba("rgba(0, 0, 0, 1.5)"), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_rgba("#ff0000"), None);
        assert_eq!(parse_rgba("rgba(1, 2, 3)"), None);
        assert_eq!(parse_rgba("rgba(256, 0, 0, 0)"), None);
        assert_eq!(parse_rgba("rgba(1, 2, 3, 4"), None);
        assert_eq!(cell_rgba("nope"), [0, 0, 0, 0]);
    }
}
