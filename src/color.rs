//! Hex color helpers and the preset palette for new connection types.

use rand::Rng;

/// Preset palette cycled through when creating connection types. Chosen to be
/// visually distinct before the random fallback kicks in.
pub const PRESET_PALETTE: [&str; 15] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFBE0B", "#FB5607",
    "#8338EC", "#3A86FF", "#06D6A0", "#118AB2", "#073B4C",
    "#EF476F", "#FFD166", "#073B4C", "#118AB2", "#06D6A0",
];

/// Parse a `#rrggbb` (or `#rgb`) string into RGB components.
pub fn parse_hex(val: &str) -> Option<(u8, u8, u8)> {
    let hex = val.trim().strip_prefix('#')?;
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let d = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v << 4 | v);
            Some((d(0)?, d(1)?, d(2)?))
        }
        _ => None,
    }
}

/// Format RGB components as `#rrggbb`.
pub fn format_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Pick a color for a new connection type: the first palette entry not
/// already used (case-insensitive), or a random 24-bit color once the
/// palette is exhausted.
pub fn color_for(existing: &[String]) -> String {
    let used: Vec<String> = existing.iter().map(|c| c.to_ascii_lowercase()).collect();
    for preset in PRESET_PALETTE {
        if !used.contains(&preset.to_ascii_lowercase()) {
            return preset.to_string();
        }
    }
    let v: u32 = rand::thread_rng().gen_range(0..0x100_0000);
    format!("#{v:06x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_six_digit() {
        assert_eq!(parse_hex("#ff0080"), Some((255, 0, 128)));
        assert_eq!(parse_hex("  #FF0080 "), Some((255, 0, 128)));
    }

    #[test]
    fn parse_three_digit() {
        assert_eq!(parse_hex("#f08"), Some((0xff, 0x00, 0x88)));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!(parse_hex("ff0080"), None);
        assert_eq!(parse_hex("#ff008"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn format_roundtrip() {
        assert_eq!(format_hex(255, 0, 128), "#ff0080");
        assert_eq!(parse_hex(&format_hex(1, 2, 3)), Some((1, 2, 3)));
    }

    #[test]
    fn color_for_picks_first_unused() {
        // All but one palette entry taken: the remaining one must come back.
        let mut existing: Vec<String> = PRESET_PALETTE.iter().map(|c| c.to_string()).collect();
        existing.retain(|c| c != "#45B7D1");
        assert_eq!(color_for(&existing), "#45B7D1");
    }

    #[test]
    fn color_for_is_case_insensitive() {
        let existing = vec!["#ff6b6b".to_string()];
        assert_eq!(color_for(&existing), "#4ECDC4");
    }

    #[test]
    fn color_for_exhausted_palette_yields_valid_hex() {
        let existing: Vec<String> = PRESET_PALETTE.iter().map(|c| c.to_string()).collect();
        for _ in 0..16 {
            let c = color_for(&existing);
            assert_eq!(c.len(), 7);
            assert!(parse_hex(&c).is_some(), "not a valid hex color: {c}");
        }
    }
}
