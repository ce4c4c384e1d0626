//! Angle units found in horizon measurements, and sexagesimal angle parsing.

use std::f64::consts::PI;

/// Unit an angle value is recorded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AngleUnit {
    /// 360 per full turn.
    Degrees,
    /// 2π per full turn.
    Radians,
    /// 400 per full turn ("new degrees", found on theodolites).
    Gradians,
}

impl AngleUnit {
    /// All units, in the order list modes enumerate them.
    pub const ALL: [AngleUnit; 3] = [AngleUnit::Degrees, AngleUnit::Radians, AngleUnit::Gradians];

    /// Convert a value in this unit to radians.
    #[must_use]
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Degrees => value * PI / 180.0,
            AngleUnit::Radians => value,
            AngleUnit::Gradians => value * PI / 200.0,
        }
    }

    /// Convert radians to a value in this unit.
    #[must_use]
    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            AngleUnit::Degrees => radians * 180.0 / PI,
            AngleUnit::Radians => radians,
            AngleUnit::Gradians => radians * 200.0 / PI,
        }
    }

    /// A right angle expressed in this unit (90°, π/2, 100 grad).
    #[must_use]
    pub fn quarter_turn(self) -> f64 {
        match self {
            AngleUnit::Degrees => 90.0,
            AngleUnit::Radians => PI / 2.0,
            AngleUnit::Gradians => 100.0,
        }
    }
}

/// Parse a latitude/longitude style angle into decimal degrees.
///
/// Accepts plain decimals (`"-12.5"`), and sexagesimal forms using `d`, `°`,
/// `'`, `m`, `"` or `s` separators (`"+48d12'30\""`, `"48°12'30\"N"`). A trailing
/// `S` or `W` (or a leading `-`) makes the result negative. Returns `None`
/// for empty or unparseable input.
pub fn parse_dec_angle(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = trimmed.parse::<f64>() {
        return Some(value);
    }

    let mut body = trimmed;
    let mut negative = false;

    if let Some(last) = body.chars().last() {
        match last.to_ascii_uppercase() {
            'S' | 'W' => {
                negative = true;
                body = &body[..body.len() - last.len_utf8()];
            }
            'N' | 'E' => {
                body = &body[..body.len() - last.len_utf8()];
            }
            _ => {}
        }
    }

    let body = body.trim();
    let body = if let Some(rest) = body.strip_prefix('-') {
        negative = !negative;
        rest
    } else {
        body.strip_prefix('+').unwrap_or(body)
    };

    let mut parts = [0.0f64; 3];
    let mut index = 0;
    let mut current = String::new();

    for ch in body.chars() {
        match ch {
            '0'..='9' | '.' => current.push(ch),
            'd' | 'D' | '°' | '\'' | 'm' | 'M' | '"' | 's' | 'S' | ' ' | ':' => {
                if current.is_empty() {
                    continue;
                }
                if index >= parts.len() {
                    return None;
                }
                parts[index] = current.parse().ok()?;
                current.clear();
                index += 1;
            }
            _ => return None,
        }
    }
    if !current.is_empty() {
        if index >= parts.len() {
            return None;
        }
        parts[index] = current.parse().ok()?;
        index += 1;
    }
    if index == 0 {
        return None;
    }

    let degrees = parts[0] + parts[1] / 60.0 + parts[2] / 3600.0;
    Some(if negative { -degrees } else { degrees })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_quarter_turn_is_right_angle_in_every_unit() {
        for unit in AngleUnit::ALL {
            let rad = unit.to_radians(unit.quarter_turn());
            assert!((rad - PI / 2.0).abs() < EPSILON, "{unit:?}");
        }
    }

    #[test]
    fn test_gradians_conversion() {
        assert!((AngleUnit::Gradians.to_radians(200.0) - PI).abs() < EPSILON);
        assert!((AngleUnit::Gradians.from_radians(PI) - 200.0).abs() < EPSILON);
    }

    #[test]
    fn test_from_radians_inverts_to_radians() {
        for unit in AngleUnit::ALL {
            let back = unit.from_radians(unit.to_radians(37.25));
            assert!((back - 37.25).abs() < 1e-9);
        }
    }

    #[test]
    fn test_parse_plain_decimal() {
        assert_eq!(parse_dec_angle("-12.5"), Some(-12.5));
        assert_eq!(parse_dec_angle(" 48 "), Some(48.0));
    }

    #[test]
    fn test_parse_sexagesimal_with_hemisphere() {
        let north = parse_dec_angle("48d12'36\"N").unwrap();
        assert!((north - 48.21).abs() < 1e-9);

        let west = parse_dec_angle("16°22'30\"W").unwrap();
        assert!((west + 16.375).abs() < 1e-9);
    }

    #[test]
    fn test_parse_signed_sexagesimal() {
        let value = parse_dec_angle("-33d30'").unwrap();
        assert!((value + 33.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_dec_angle(""), None);
        assert_eq!(parse_dec_angle("north"), None);
        assert_eq!(parse_dec_angle("1d2m3s4"), None);
    }
}
