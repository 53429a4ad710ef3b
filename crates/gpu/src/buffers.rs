use scene::SceneGroup;

/// Interleaved cap/wall vertex. Color is linear RGB.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SolidVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

/// Group-local geometry for every solid, ready for upload.
///
/// Positions stay in group space; the group transform travels as the model
/// matrix so rotating the map never re-uploads vertices.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SceneBuffers {
    pub solid_vertices: Vec<SolidVertex>,
    pub solid_indices: Vec<u32>,
    /// Line list: two vertices per edge.
    pub line_vertices: Vec<LineVertex>,
}

impl SceneBuffers {
    pub fn from_group(group: &SceneGroup) -> Self {
        let mut out = Self::default();
        for solid in group.solids() {
            let base = out.solid_vertices.len() as u32;
            let color = solid.color.map(srgb_to_linear);
            out.solid_vertices.extend(
                solid
                    .mesh
                    .positions
                    .iter()
                    .zip(&solid.mesh.normals)
                    .map(|(p, n)| SolidVertex {
                        position: p.to_f32(),
                        normal: n.to_f32(),
                        color,
                    }),
            );
            out.solid_indices
                .extend(solid.mesh.indices.iter().map(|i| base + i));
            for [a, b] in &solid.edges {
                out.line_vertices.push(LineVertex { position: a.to_f32() });
                out.line_vertices.push(LineVertex { position: b.to_f32() });
            }
        }
        out
    }

    pub fn index_count(&self) -> u32 {
        self.solid_indices.len() as u32
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.line_vertices.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.solid_indices.is_empty()
    }
}

/// sRGB transfer function decode, per channel.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
