//! Spherical Lambert Conformal Conic projection.
//!
//! Output is in units of the sphere radius; callers rescale to scene units
//! with a separate uniform fit before building geometry.

use std::f64::consts::FRAC_PI_4;

use super::{GeoPosition, Vec2};

/// Reference parameters, all in degrees.
///
/// Standard parallels equal to each other or to ±90° are singular and are not
/// sanitized.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LccParams {
    pub standard_parallel_1: f64,
    pub standard_parallel_2: f64,
    pub origin_lat: f64,
    pub central_meridian: f64,
}

impl LccParams {
    /// Secant cone through 30°N and 40°N, origin at 36°N 136°E.
    pub const JAPAN: Self = Self {
        standard_parallel_1: 30.0,
        standard_parallel_2: 40.0,
        origin_lat: 36.0,
        central_meridian: 136.0,
    };
}

impl Default for LccParams {
    fn default() -> Self {
        Self::JAPAN
    }
}

/// Projection with the cone constants precomputed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LambertConformalConic {
    params: LccParams,
    /// Cone constant.
    n: f64,
    /// Scale constant.
    f: f64,
    /// Radius of the origin parallel.
    rho0: f64,
    lambda0: f64,
}

impl LambertConformalConic {
    pub fn new(params: LccParams) -> Self {
        let phi1 = params.standard_parallel_1.to_radians();
        let phi2 = params.standard_parallel_2.to_radians();
        let phi0 = params.origin_lat.to_radians();

        let n = (phi1.cos() / phi2.cos()).ln()
            / (conformal_term(phi2) / conformal_term(phi1)).ln();
        let f = phi1.cos() * conformal_term(phi1).powf(n) / n;
        let rho0 = f / conformal_term(phi0).powf(n);

        Self {
            params,
            n,
            f,
            rho0,
            lambda0: params.central_meridian.to_radians(),
        }
    }

    pub fn japan() -> Self {
        Self::new(LccParams::JAPAN)
    }

    pub fn params(&self) -> LccParams {
        self.params
    }

    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    /// Forward projection of a latitude/longitude pair in degrees.
    pub fn project(&self, lat_deg: f64, lon_deg: f64) -> Vec2 {
        let rho = self.f / conformal_term(lat_deg.to_radians()).powf(self.n);
        let theta = self.n * (lon_deg.to_radians() - self.lambda0);
        Vec2::new(rho * theta.sin(), self.rho0 - rho * theta.cos())
    }

    pub fn project_position(&self, position: GeoPosition) -> Vec2 {
        self.project(position.lat_deg, position.lon_deg)
    }
}

impl Default for LambertConformalConic {
    fn default() -> Self {
        Self::japan()
    }
}

/// One-shot form of [`LambertConformalConic::project`].
pub fn project(lat_deg: f64, lon_deg: f64, params: LccParams) -> Vec2 {
    LambertConformalConic::new(params).project(lat_deg, lon_deg)
}

/// tan(π/4 + φ/2)
fn conformal_term(phi: f64) -> f64 {
    (FRAC_PI_4 + phi / 2.0).tan()
}
