//! Rating plate selection and SVG badge rendering
//!
//! Pure formatting: a rating number maps to a plate artwork tier, and the
//! badge is the plate image with the rating digits overlaid in a fixed
//! monospace layout.

/// Rating thresholds for plate tiers, lowest first
const LEVELS: [u32; 10] = [1000, 2000, 4000, 7000, 10000, 12000, 13000, 14000, 14500, 15000];

/// Pick the two-digit plate artwork id for a rating.
///
/// Below the first threshold is "01", at or above the last is "11", and
/// each band in between maps to "02".."10".
pub fn plate_id(rating: u32) -> String {
    match LEVELS.iter().position(|&threshold| rating < threshold) {
        Some(0) => "01".to_string(),
        Some(band) => format!("{:02}", band + 1),
        None => "11".to_string(),
    }
}

/// Render the badge SVG: plate artwork with the rating digits overlaid.
///
/// `plate` is the href of the plate image for the rating's tier. Digits
/// are right-aligned on the plate; the layout constants match the plate
/// artwork dimensions (664x130).
pub fn rating_svg(rating: u32, plate: &str) -> String {
    let digits = rating.to_string();
    let start_x = 5 - digits.len() as i32 - 1;

    let mut text = String::new();
    for (i, digit) in digits.chars().enumerate() {
        let x = 321.0 + f64::from(start_x + i as i32 + 1) * 52.4;
        text.push_str(&format!(
            r##"
    <text
      x="{x}"
      y="87"
      font-family="ui-monospace, Monaco, 'JetBrains Mono Variable', 'JetBrains Mono', Monospaced, monospace, sans-serif"
      font-size="58"
      fill="#FCD41B">
      {digit}
    </text>"##
        ));
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 664 130" width="100%" height="auto" style="max-width: 664px;">
  <image href="{plate}" x="0" y="0" width="664" height="130"/>{text}
</svg>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_id_below_first_threshold() {
        assert_eq!(plate_id(0), "01");
        assert_eq!(plate_id(999), "01");
    }

    #[test]
    fn test_plate_id_band_boundaries() {
        assert_eq!(plate_id(1000), "02");
        assert_eq!(plate_id(1999), "02");
        assert_eq!(plate_id(2000), "03");
        assert_eq!(plate_id(7000), "05");
        assert_eq!(plate_id(12000), "07");
        assert_eq!(plate_id(14499), "09");
        assert_eq!(plate_id(14500), "10");
        assert_eq!(plate_id(14999), "10");
    }

    #[test]
    fn test_plate_id_at_and_above_top_threshold() {
        assert_eq!(plate_id(15000), "11");
        assert_eq!(plate_id(20000), "11");
    }

    #[test]
    fn test_svg_embeds_plate_and_digits() {
        let svg = rating_svg(12345, "https://example.com/plates/07.png");
        assert!(svg.contains(r#"href="https://example.com/plates/07.png""#));
        for digit in ["1", "2", "3", "4", "5"] {
            assert!(svg.contains(&format!("\n      {digit}\n")));
        }
        assert!(svg.contains(r##"fill="#FCD41B""##));
    }

    #[test]
    fn test_svg_digit_layout_is_right_aligned() {
        // Five digits: start_x = -1, so the first digit sits at x = 321.
        let svg = rating_svg(12345, "plate.png");
        assert!(svg.contains(r#"x="321""#));
        assert!(svg.contains(r#"x="373.4""#));

        // One digit: start_x = 3, so the digit sits at x = 321 + 4 * 52.4.
        let svg = rating_svg(7, "plate.png");
        assert!(svg.contains(r#"x="530.6""#));
    }
}
