//! Unit conversion utilities.
//!
//! DrawingML stores lengths in English Metric Units and font sizes in
//! hundredths of a point.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_PT: i64 = 12_700;

/// Font size attribute units (`sz`) per point.
pub const CENTIPOINTS_PER_PT: i32 = 100;

#[inline]
pub fn pt_to_emu_f64(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64) as i64
}

#[inline]
pub fn emu_to_pt_f64(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_PT as f64
}

#[inline]
pub fn emu_to_inches(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_INCH as f64
}

#[inline]
pub fn emu_to_cm(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_CM as f64
}

/// Largest `sz` value DrawingML allows (4000pt).
pub const MAX_CENTIPOINTS: i64 = 400_000;

/// Whole points from a `sz` attribute value. Fractions are truncated and
/// out-of-range values are clamped to `0..=MAX_CENTIPOINTS`.
#[inline]
pub fn centipoints_to_pt(sz: i64) -> i32 {
    (sz.clamp(0, MAX_CENTIPOINTS) / CENTIPOINTS_PER_PT as i64) as i32
}

#[inline]
pub fn pt_to_centipoints(pt: i32) -> i64 {
    pt as i64 * CENTIPOINTS_PER_PT as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emu_point_conversions() {
        assert_eq!(pt_to_emu_f64(72.0), EMUS_PER_INCH);
        assert!((emu_to_pt_f64(EMUS_PER_INCH) - 72.0).abs() < f64::EPSILON);
        assert!((emu_to_inches(EMUS_PER_INCH * 10) - 10.0).abs() < f64::EPSILON);
        assert!((emu_to_cm(EMUS_PER_CM) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_centipoints() {
        assert_eq!(centipoints_to_pt(4400), 44);
        assert_eq!(centipoints_to_pt(1050), 10);
        assert_eq!(centipoints_to_pt(1099), 10);
        assert_eq!(centipoints_to_pt(i64::MAX), 4000);
        assert_eq!(centipoints_to_pt(-500), 0);
        assert_eq!(pt_to_centipoints(18), 1800);
    }
}
