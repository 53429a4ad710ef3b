//! Extrusion of fitted prefecture outlines into capped prisms.

use earcutr::earcut;
use formats::{Feature, GeometryIssue, Polygon, SkipReason};
use foundation::math::{Vec2, Vec3};
use scene::components::{ExtrudedSolid, Mesh, Outline, SolidLabel, signed_area};

use crate::normalize::{BoundsNormalizer, MapFit};
use crate::symbology::Encoded;

const DUPLICATE_EPS: f64 = 1e-9;
/// Wall creases sharper than this get a vertical edge line.
const CREASE_ANGLE_DEG: f64 = 1.0;

/// Builds solids for features in the frame described by one [`MapFit`].
#[derive(Debug, Copy, Clone)]
pub struct FeatureExtruder<'a> {
    normalizer: &'a BoundsNormalizer,
    fit: &'a MapFit,
}

impl<'a> FeatureExtruder<'a> {
    pub fn new(normalizer: &'a BoundsNormalizer, fit: &'a MapFit) -> Self {
        Self { normalizer, fit }
    }

    /// One solid per usable polygon; every solid shares `encoded`'s color and
    /// depth. Unusable polygons are returned as issues.
    pub fn build_feature_meshes(
        &self,
        feature: &Feature,
        label: &SolidLabel,
        encoded: &Encoded,
    ) -> (Vec<ExtrudedSolid>, Vec<GeometryIssue>) {
        let mut solids = Vec::new();
        let mut issues = Vec::new();

        for (polygon_index, polygon) in feature.geometry.polygons().iter().enumerate() {
            let built = self
                .outline(polygon)
                .and_then(|outline| extrude(outline, encoded.depth));
            match built {
                Ok((outline, mesh, edges)) => solids.push(ExtrudedSolid {
                    outline,
                    depth: encoded.depth,
                    color: encoded.color,
                    mesh,
                    edges,
                    label: label.clone(),
                }),
                Err(reason) => {
                    tracing::warn!(
                        feature = feature.index,
                        polygon = polygon_index,
                        name = %label.name,
                        %reason,
                        "skipping polygon"
                    );
                    issues.push(GeometryIssue {
                        feature: feature.index,
                        polygon: Some(polygon_index),
                        reason,
                    });
                }
            }
        }

        (solids, issues)
    }

    /// Projects and fits every ring, then cleans and orients them.
    pub fn outline(&self, polygon: &Polygon) -> Result<Outline, SkipReason> {
        let mut rings = polygon.rings.iter().map(|ring| {
            ring.iter()
                .map(|pos| self.normalizer.normalize(self.fit, *pos))
                .collect::<Vec<_>>()
        });

        let Some(exterior) = rings.next() else {
            return Err(SkipReason::EmptyPolygon);
        };
        let mut exterior = clean_ring(exterior);
        if exterior.len() < 3 || signed_area(&exterior) == 0.0 {
            return Err(SkipReason::DegenerateRing { ring: 0 });
        }
        if signed_area(&exterior) < 0.0 {
            exterior.reverse();
        }

        let mut holes = Vec::new();
        for (i, hole) in rings.enumerate() {
            let mut hole = clean_ring(hole);
            if hole.len() < 3 || signed_area(&hole) == 0.0 {
                tracing::debug!(ring = i + 1, "dropping degenerate hole");
                continue;
            }
            if signed_area(&hole) > 0.0 {
                hole.reverse();
            }
            holes.push(hole);
        }

        Ok(Outline::new(exterior, holes))
    }
}

/// Drops non-finite points, consecutive duplicates and the closing point.
fn clean_ring(points: Vec<Vec2>) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(points.len());
    for p in points.into_iter().filter(|p| p.is_finite()) {
        if out.last().is_some_and(|last| same_point(*last, p)) {
            continue;
        }
        out.push(p);
    }
    while out.len() > 1 && same_point(out[0], out[out.len() - 1]) {
        out.pop();
    }
    out
}

fn same_point(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < DUPLICATE_EPS && (a.y - b.y).abs() < DUPLICATE_EPS
}

type Extruded = (Outline, Mesh, Vec<[Vec3; 2]>);

/// Sweeps `outline` from z = 0 to z = `depth`: top and bottom caps, flat
/// walls and an edge wireframe. Expects a counter-clockwise exterior and
/// clockwise holes.
pub fn extrude(outline: Outline, depth: f64) -> Result<Extruded, SkipReason> {
    let cap = triangulate(&outline)?;
    let ring_points: Vec<Vec2> = outline.rings().flatten().copied().collect();

    let mut mesh = Mesh::default();
    let up = Vec3::new(0.0, 0.0, 1.0);
    let down = Vec3::new(0.0, 0.0, -1.0);

    let top: Vec<u32> = ring_points
        .iter()
        .map(|p| mesh.push_vertex(p.extend(depth), up))
        .collect();
    for t in &cap {
        mesh.push_triangle(top[t[0]], top[t[1]], top[t[2]]);
    }

    let bottom: Vec<u32> = ring_points
        .iter()
        .map(|p| mesh.push_vertex(p.extend(0.0), down))
        .collect();
    for t in &cap {
        mesh.push_triangle(bottom[t[0]], bottom[t[2]], bottom[t[1]]);
    }

    let mut edges = Vec::new();
    for ring in outline.rings() {
        push_walls(&mut mesh, ring, depth);
        push_ring_edges(&mut edges, ring, depth);
    }

    Ok((outline, mesh, edges))
}

/// Cap triangles as indices into the flattened rings, counter-clockwise.
fn triangulate(outline: &Outline) -> Result<Vec<[usize; 3]>, SkipReason> {
    let mut coords = Vec::new();
    let mut hole_indices = Vec::new();
    let mut points = Vec::new();
    for (i, ring) in outline.rings().enumerate() {
        if i > 0 {
            hole_indices.push(points.len());
        }
        for p in ring {
            coords.push(p.x);
            coords.push(p.y);
            points.push(*p);
        }
    }

    let indices = earcut(&coords, &hole_indices, 2)
        .map_err(|e| SkipReason::Triangulation(format!("{e:?}")))?;
    if indices.is_empty() {
        return Err(SkipReason::Triangulation("no triangles".to_string()));
    }

    Ok(indices
        .chunks_exact(3)
        .map(|t| {
            let (a, b, c) = (points[t[0]], points[t[1]], points[t[2]]);
            if (b - a).perp_dot(c - a) < 0.0 {
                [t[0], t[2], t[1]]
            } else {
                [t[0], t[1], t[2]]
            }
        })
        .collect())
}

/// One flat-shaded quad per ring segment, normal to the right of travel.
fn push_walls(mesh: &mut Mesh, ring: &[Vec2], depth: f64) {
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        let d = b - *a;
        let normal = Vec3::new(d.y, -d.x, 0.0).normalize();

        let a0 = mesh.push_vertex(a.extend(0.0), normal);
        let b0 = mesh.push_vertex(b.extend(0.0), normal);
        let b1 = mesh.push_vertex(b.extend(depth), normal);
        let a1 = mesh.push_vertex(a.extend(depth), normal);
        mesh.push_triangle(a0, b0, b1);
        mesh.push_triangle(a0, b1, a1);
    }
}

fn push_ring_edges(edges: &mut Vec<[Vec3; 2]>, ring: &[Vec2], depth: f64) {
    let n = ring.len();
    let cos_limit = CREASE_ANGLE_DEG.to_radians().cos();
    for (i, p) in ring.iter().enumerate() {
        let next = ring[(i + 1) % n];
        let prev = ring[(i + n - 1) % n];
        edges.push([p.extend(0.0), next.extend(0.0)]);
        edges.push([p.extend(depth), next.extend(depth)]);

        let d_in = *p - prev;
        let d_out = next - *p;
        let lens = d_in.length() * d_out.length();
        if lens > 0.0 && d_in.dot(d_out) / lens < cos_limit {
            edges.push([p.extend(0.0), p.extend(depth)]);
        }
    }
}
