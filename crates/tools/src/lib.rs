//! Headless inspection and export of the prefecture map.

use std::fmt::Write as _;
use std::io::{self, Write};

use layers::{ChoroplethBuild, ChoroplethConfig, LabelsConfig, LabelsLayer};
use scene::{SceneGroup, ViewConfig};
use serde::{Deserialize, Serialize};

/// `--config` file contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub choropleth: ChoroplethConfig,
    pub view: ViewConfig,
}

impl ToolConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// One line per feature followed by the build totals.
pub fn format_report(build: &ChoroplethBuild) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<10} {:>12} {:>7} {:>6} {:>6}  note",
        "#", "name", "value", "depth", "hue", "solids"
    );
    for s in &build.report.summaries {
        let note = if s.solids == 0 {
            "no geometry"
        } else if !s.matched {
            "no statistic"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:<4} {:<10} {:>12} {:>7.2} {:>6.1} {:>6}  {}",
            s.feature,
            s.display_name,
            s.value,
            s.encoded.depth,
            s.encoded.hue_deg,
            s.solids,
            note
        );
    }

    let r = &build.report;
    let _ = writeln!(
        out,
        "\n{} features, {} solids, max value {}, scale {:.6}",
        r.features,
        r.solids,
        build.encoder.max_value(),
        build.fit.scale
    );
    if !r.unmatched.is_empty() {
        let _ = writeln!(out, "without statistics: {}", r.unmatched.join(", "));
    }
    for issue in &r.skipped {
        let _ = writeln!(out, "skipped: {issue}");
    }

    let labels = LabelsLayer::new(2, LabelsConfig::default()).extract(&build.group);
    for label in &labels.labels {
        let p = label.local_position;
        let _ = writeln!(out, "label {} at ({:.2}, {:.2}, {:.2})", label.text, p.x, p.y, p.z);
    }
    out
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ObjOptions {
    pub edges: bool,
}

impl Default for ObjOptions {
    fn default() -> Self {
        Self { edges: true }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ObjStats {
    pub vertices: usize,
    pub faces: usize,
    pub lines: usize,
}

/// Writes the group in world space as Wavefront OBJ, one object per solid.
///
/// Vertex colors follow the common `v x y z r g b` extension, sRGB in 0..1.
pub fn write_obj<W: Write>(
    group: &SceneGroup,
    edge_color: [f32; 3],
    options: ObjOptions,
    mut out: W,
) -> io::Result<ObjStats> {
    let mut stats = ObjStats::default();
    let rotation = group.transform.rotation;

    writeln!(out, "# prefecture map")?;
    for node in group.nodes() {
        for (i, solid) in node.solids.iter().enumerate() {
            writeln!(out, "o {}_{i}", node.label.name)?;
            let base = stats.vertices + 1;
            let [r, g, b] = solid.color;

            for (p, n) in solid.mesh.positions.iter().zip(&solid.mesh.normals) {
                let w = group.transform.apply(*p);
                let wn = rotation.rotate(*n);
                writeln!(out, "v {} {} {} {r} {g} {b}", w.x, w.y, w.z)?;
                writeln!(out, "vn {} {} {}", wn.x, wn.y, wn.z)?;
            }
            stats.vertices += solid.mesh.positions.len();

            for tri in solid.mesh.indices.chunks_exact(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| base + i as usize);
                writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
                stats.faces += 1;
            }

            if options.edges && !solid.edges.is_empty() {
                let [er, eg, eb] = edge_color;
                for [p0, p1] in &solid.edges {
                    for p in [p0, p1] {
                        let w = group.transform.apply(*p);
                        writeln!(out, "v {} {} {} {er} {eg} {eb}", w.x, w.y, w.z)?;
                    }
                    let a = stats.vertices + 1;
                    writeln!(out, "l {a} {}", a + 1)?;
                    stats.vertices += 2;
                    stats.lines += 1;
                }
            }
        }
    }
    Ok(stats)
}
