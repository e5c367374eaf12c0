/// Named colors accepted for text watermarks.
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("white", (255, 255, 255)),
    ("black", (0, 0, 0)),
    ("red", (255, 0, 0)),
    ("green", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("gray", (128, 128, 128)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("pink", (255, 192, 203)),
];

const WHITE: (u8, u8, u8) = (255, 255, 255);

/// Resolve a color name or hex string to an RGB triple.
///
/// Accepts `#RGB` and `#RRGGBB` hex codes or one of the named colors,
/// case-insensitively. Anything unrecognized resolves to white.
pub fn resolve_color(spec: &str) -> (u8, u8, u8) {
    let spec = spec.trim().to_lowercase();

    if spec.is_ascii() && spec.starts_with('#') && (spec.len() == 4 || spec.len() == 7) {
        if let Some(rgb) = parse_hex(&spec) {
            return rgb;
        }
    }

    named_color(&spec).unwrap_or(WHITE)
}

fn named_color(name: &str) -> Option<(u8, u8, u8)> {
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, rgb)| *rgb)
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = &hex[1..];
    match digits.len() {
        3 => {
            // #RGB shorthand: each nibble duplicated, 0xF -> 0xFF
            let r = u8::from_str_radix(&digits[0..1], 16).ok()?;
            let g = u8::from_str_radix(&digits[1..2], 16).ok()?;
            let b = u8::from_str_radix(&digits[2..3], 16).ok()?;
            Some((r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_rrggbb() {
        assert_eq!(resolve_color("#FF0000"), (255, 0, 0));
        assert_eq!(resolve_color("#00ff00"), (0, 255, 0));
        assert_eq!(resolve_color("#0000FF"), (0, 0, 255));
        assert_eq!(resolve_color("#123456"), (0x12, 0x34, 0x56));
    }

    #[test]
    fn test_hex_shorthand_matches_full_form() {
        assert_eq!(resolve_color("#F00"), resolve_color("#FF0000"));
        assert_eq!(resolve_color("#F00"), (255, 0, 0));
        assert_eq!(resolve_color("#abc"), (170, 187, 204));
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(resolve_color("black"), (0, 0, 0));
        assert_eq!(resolve_color("orange"), (255, 165, 0));
        assert_eq!(resolve_color("Pink"), (255, 192, 203));
        assert_eq!(resolve_color("MAGENTA"), (255, 0, 255));
    }

    #[test]
    fn test_unknown_name_is_white() {
        assert_eq!(resolve_color("chartreuse"), (255, 255, 255));
        assert_eq!(resolve_color(""), (255, 255, 255));
    }

    #[test]
    fn test_invalid_hex_falls_back() {
        // Bad hex digits fall through to name lookup, then white
        assert_eq!(resolve_color("#GGGGGG"), (255, 255, 255));
        assert_eq!(resolve_color("#ZZZ"), (255, 255, 255));
        // Wrong length is not treated as hex at all
        assert_eq!(resolve_color("#FF00"), (255, 255, 255));
    }

    #[test]
    fn test_non_ascii_input_is_white() {
        assert_eq!(resolve_color("#héx"), (255, 255, 255));
    }
}
