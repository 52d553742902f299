//! # Pitch Geometry
//!
//! Pitch thirds, attacking-direction aware zones and pitch-space position
//! resolution.
//!
//! Position resolution is an ordered attempt list: the first
//! [`PositionSource`] that yields a point wins, and exhausting the list is a
//! regular `None` outcome rather than an error.

use crate::config::{AttackingDirection, PitchConfig};
use crate::types::{PitchPoint, Positioned};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Maps camera-adjusted pixel positions to pitch metres.
///
/// Returns `None` when the transform cannot be applied (no calibration for
/// this view, point outside the calibrated polygon, ...).
pub trait ViewTransform: Send + Sync {
    fn transform(&self, points: &[PitchPoint]) -> Option<Vec<PitchPoint>>;
}

/// A transform that never resolves; only precomputed positions are used.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransform;

impl ViewTransform for NoTransform {
    fn transform(&self, _points: &[PitchPoint]) -> Option<Vec<PitchPoint>> {
        None
    }
}

/// Planar homography from image pixels to pitch metres.
///
/// The matrix is supplied by the caller (estimating it from court keypoints
/// is done upstream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    matrix: Matrix3<f32>,
}

impl Homography {
    pub fn new(matrix: Matrix3<f32>) -> Self {
        Self { matrix }
    }

    /// Row-major 3x3 coefficients.
    #[rustfmt::skip]
    pub fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self::new(Matrix3::new(
            rows[0][0], rows[0][1], rows[0][2],
            rows[1][0], rows[1][1], rows[1][2],
            rows[2][0], rows[2][1], rows[2][2],
        ))
    }

    fn apply(&self, p: &PitchPoint) -> Option<PitchPoint> {
        let v = self.matrix * Vector3::new(p.x, p.y, 1.0);
        if v.z.abs() < f32::EPSILON {
            return None;
        }
        let out = PitchPoint::new(v.x / v.z, v.y / v.z);
        (out.x.is_finite() && out.y.is_finite()).then_some(out)
    }
}

impl ViewTransform for Homography {
    fn transform(&self, points: &[PitchPoint]) -> Option<Vec<PitchPoint>> {
        points.iter().map(|p| self.apply(p)).collect()
    }
}

/// Where a pitch-space position may come from, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    /// Precomputed `position_transformed`
    Transformed,
    /// `position_adjusted` run through the [`ViewTransform`]
    AdjustedViaTransform,
}

/// Default resolution order.
pub const POSITION_SOURCES: [PositionSource; 2] =
    [PositionSource::Transformed, PositionSource::AdjustedViaTransform];

/// Resolve a pitch-space position by trying each source in order.
pub fn resolve_position<R: Positioned + ?Sized>(
    record: &R,
    transform: &dyn ViewTransform,
) -> Option<PitchPoint> {
    POSITION_SOURCES
        .iter()
        .find_map(|source| try_source(*source, record, transform))
}

fn try_source<R: Positioned + ?Sized>(
    source: PositionSource,
    record: &R,
    transform: &dyn ViewTransform,
) -> Option<PitchPoint> {
    match source {
        PositionSource::Transformed => record.transformed().filter(is_finite),
        PositionSource::AdjustedViaTransform => {
            let adjusted = record.adjusted().filter(is_finite)?;
            transform
                .transform(&[adjusted])
                .and_then(|points| points.into_iter().next())
                .filter(is_finite)
        }
    }
}

fn is_finite(p: &PitchPoint) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Team-relative third of the pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    Defensive,
    Midfield,
    Attacking,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Defensive, Zone::Midfield, Zone::Attacking];

    pub fn index(self) -> usize {
        match self {
            Zone::Defensive => 0,
            Zone::Midfield => 1,
            Zone::Attacking => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Zone::Defensive => "Defensive",
            Zone::Midfield => "Midfield",
            Zone::Attacking => "Attacking",
        }
    }
}

/// Zone of pitch x-coordinate `x` for a team attacking in `direction`.
///
/// Boundaries are exact thirds of the pitch length; a point on the lower
/// boundary belongs to the upper third.
pub fn zone_for(x: f32, direction: AttackingDirection, pitch: &PitchConfig) -> Zone {
    let third = pitch.third();
    match direction {
        AttackingDirection::Right => {
            if x < third {
                Zone::Defensive
            } else if x < 2.0 * third {
                Zone::Midfield
            } else {
                Zone::Attacking
            }
        }
        AttackingDirection::Left => {
            if x > 2.0 * third {
                Zone::Defensive
            } else if x > third {
                Zone::Midfield
            } else {
                Zone::Attacking
            }
        }
    }
}

/// x-coordinate where a team's final third begins.
pub fn final_third_boundary(direction: AttackingDirection, pitch: &PitchConfig) -> f32 {
    match direction {
        AttackingDirection::Right => 2.0 / 3.0 * pitch.length_m,
        AttackingDirection::Left => 1.0 / 3.0 * pitch.length_m,
    }
}

/// Strictly inside the final third (the boundary itself is outside).
pub fn in_final_third(x: f32, direction: AttackingDirection, pitch: &PitchConfig) -> bool {
    let boundary = final_third_boundary(direction, pitch);
    match direction {
        AttackingDirection::Right => x > boundary,
        AttackingDirection::Left => x < boundary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BallRecord;

    struct Offset(f32);

    impl ViewTransform for Offset {
        fn transform(&self, points: &[PitchPoint]) -> Option<Vec<PitchPoint>> {
            Some(points.iter().map(|p| PitchPoint::new(p.x + self.0, p.y)).collect())
        }
    }

    #[test]
    fn test_final_third_boundaries() {
        let pitch = PitchConfig::default();
        assert!((final_third_boundary(AttackingDirection::Right, &pitch) - 70.0).abs() < 1e-4);
        assert!((final_third_boundary(AttackingDirection::Left, &pitch) - 35.0).abs() < 1e-4);

        assert!(in_final_third(75.0, AttackingDirection::Right, &pitch));
        assert!(!in_final_third(40.0, AttackingDirection::Right, &pitch));
        assert!(in_final_third(20.0, AttackingDirection::Left, &pitch));
        assert!(!in_final_third(75.0, AttackingDirection::Left, &pitch));
    }

    #[test]
    fn test_zone_flips_with_direction() {
        let pitch = PitchConfig::default();
        assert_eq!(zone_for(10.0, AttackingDirection::Right, &pitch), Zone::Defensive);
        assert_eq!(zone_for(50.0, AttackingDirection::Right, &pitch), Zone::Midfield);
        assert_eq!(zone_for(95.0, AttackingDirection::Right, &pitch), Zone::Attacking);

        assert_eq!(zone_for(10.0, AttackingDirection::Left, &pitch), Zone::Attacking);
        assert_eq!(zone_for(50.0, AttackingDirection::Left, &pitch), Zone::Midfield);
        assert_eq!(zone_for(95.0, AttackingDirection::Left, &pitch), Zone::Defensive);
    }

    #[test]
    fn test_resolution_prefers_transformed() {
        let ball = BallRecord {
            position_transformed: Some(PitchPoint::new(30.0, 20.0)),
            position_adjusted: Some(PitchPoint::new(500.0, 300.0)),
            ..Default::default()
        };
        let p = resolve_position(&ball, &Offset(1.0)).unwrap();
        assert_eq!(p, PitchPoint::new(30.0, 20.0));
    }

    #[test]
    fn test_resolution_falls_back_to_transform() {
        let ball = BallRecord {
            position_adjusted: Some(PitchPoint::new(10.0, 5.0)),
            ..Default::default()
        };
        let p = resolve_position(&ball, &Offset(2.5)).unwrap();
        assert_eq!(p, PitchPoint::new(12.5, 5.0));

        // no transform available
        assert!(resolve_position(&ball, &NoTransform).is_none());
    }

    #[test]
    fn test_resolution_gives_up() {
        let ball = BallRecord::default();
        assert!(resolve_position(&ball, &Offset(1.0)).is_none());

        let nan_ball = BallRecord {
            position_transformed: Some(PitchPoint::new(f32::NAN, 1.0)),
            ..Default::default()
        };
        assert!(resolve_position(&nan_ball, &NoTransform).is_none());
    }

    #[test]
    fn test_homography_scale() {
        // pixels -> metres at 0.1 m/px
        let h = Homography::from_rows([[0.1, 0.0, 0.0], [0.0, 0.1, 0.0], [0.0, 0.0, 1.0]]);
        let out = h.transform(&[PitchPoint::new(400.0, 200.0)]).unwrap();
        assert!((out[0].x - 40.0).abs() < 1e-4);
        assert!((out[0].y - 20.0).abs() < 1e-4);

        let degenerate = Homography::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);
        assert!(degenerate.transform(&[PitchPoint::new(1.0, 1.0)]).is_none());
    }
}
