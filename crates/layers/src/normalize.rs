//! Fits projected outlines into a fixed span centered on the origin.

use formats::FeatureCollection;
use foundation::bounds::Aabb2;
use foundation::math::{GeoPosition, LambertConformalConic, Vec2};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("no projectable points in the feature collection")]
    Empty,
    #[error("projected bounds have zero span (x {span_x}, y {span_y})")]
    DegenerateBounds { span_x: f64, span_y: f64 },
}

/// Uniform scale plus offset: `(p + offset) * scale`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapFit {
    pub scale: f64,
    pub offset: Vec2,
    /// Bounds of the raw projected points.
    pub bounds: Aabb2,
}

impl MapFit {
    /// Non-finite points are ignored.
    pub fn from_points<I>(points: I, target_span: f64) -> Result<Self, NormalizeError>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut bounds = Aabb2::empty();
        for p in points.into_iter().filter(|p| p.is_finite()) {
            bounds.include(p);
        }
        if bounds.is_empty() {
            return Err(NormalizeError::Empty);
        }

        let span = bounds.span();
        let max_span = span.x.max(span.y);
        if !(max_span > 0.0) {
            return Err(NormalizeError::DegenerateBounds {
                span_x: span.x,
                span_y: span.y,
            });
        }

        let center = bounds.center();
        Ok(Self {
            scale: target_span / max_span,
            offset: Vec2::new(-center.x, -center.y),
            bounds,
        })
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        (p + self.offset) * self.scale
    }
}

/// Projection followed by the shared fit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundsNormalizer {
    projection: LambertConformalConic,
    target_span: f64,
}

impl BoundsNormalizer {
    pub fn new(projection: LambertConformalConic, target_span: f64) -> Self {
        Self {
            projection,
            target_span,
        }
    }

    pub fn target_span(&self) -> f64 {
        self.target_span
    }

    pub fn project(&self, position: GeoPosition) -> Vec2 {
        self.projection.project_position(position)
    }

    /// First pass: bounds over every ring of every feature.
    pub fn fit(&self, collection: &FeatureCollection) -> Result<MapFit, NormalizeError> {
        let points = collection
            .features
            .iter()
            .flat_map(|f| f.geometry.polygons())
            .flat_map(|p| p.positions())
            .map(|pos| self.project(pos));
        let fit = MapFit::from_points(points, self.target_span)?;
        tracing::debug!(
            min_x = fit.bounds.min[0],
            min_y = fit.bounds.min[1],
            max_x = fit.bounds.max[0],
            max_y = fit.bounds.max[1],
            scale = fit.scale,
            "fitted map bounds"
        );
        Ok(fit)
    }

    /// Second pass: one position into the fitted frame.
    pub fn normalize(&self, fit: &MapFit, position: GeoPosition) -> Vec2 {
        fit.apply(self.project(position))
    }
}
