//! Number formatting for attribute values
//!
//! Floats use the shortest representation that reads back to the same `f32`,
//! always with a decimal point or exponent (`0.0`, `-2.0`, `1e-7`).

pub(crate) fn format_float(v: f32) -> String {
    format!("{:?}", v)
}

/// Join floats with `separator`
pub(crate) fn join_floats(values: &[f32], separator: &str) -> String {
    values
        .iter()
        .map(|&v| format_float(v))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Space-separated vector (`"x y z"`), used for vertex data and extents
pub(crate) fn space_separated(values: &[f32]) -> String {
    join_floats(values, " ")
}

/// Comma-separated vector (`"x, y, z"`), used for bone transforms
pub(crate) fn comma_separated(values: &[f32]) -> String {
    join_floats(values, ", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(-2.0), "-2.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(0.1), "0.1");
    }

    #[test]
    fn test_separators() {
        assert_eq!(space_separated(&[1.0, -1.5, 0.0]), "1.0 -1.5 0.0");
        assert_eq!(comma_separated(&[0.0, 0.0, 0.0, 1.0]), "0.0, 0.0, 0.0, 1.0");
        assert_eq!(space_separated(&[]), "");
    }

    #[test]
    fn test_round_trip() {
        for v in [0.1f32, 1.0 / 3.0, 123456.79, -0.000123, f32::MIN_POSITIVE] {
            let parsed: f32 = format_float(v).parse().unwrap();
            assert_eq!(parsed, v);
        }
    }
}
