use foundation::math::{Mat4, Vec3};
use scene::{Camera, SceneGroup};

use crate::buffers::{SceneBuffers, srgb_to_linear};

/// Scene lights. Colors are sRGB.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lighting {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
    /// The light shines from here toward the origin.
    pub directional_position: Vec3,
    pub background: [f32; 3],
}

impl Default for Lighting {
    fn default() -> Self {
        let grey = 0x40 as f32 / 255.0;
        Self {
            ambient_color: [grey; 3],
            ambient_intensity: 1.4,
            directional_color: [1.0; 3],
            directional_intensity: 1.0,
            directional_position: Vec3::new(200.0, 400.0, 150.0),
            background: [0.0; 3],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            metalness: 0.1,
            roughness: 0.6,
        }
    }
}

/// Uniform block shared by the solid and edge pipelines.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub view_proj: Mat4,
    pub model: Mat4,
    /// xyz: camera position.
    pub eye: [f32; 4],
    /// xyz: unit vector toward the light.
    pub light_dir: [f32; 4],
    /// rgb: linear light color times intensity.
    pub light_color: [f32; 4],
    pub ambient: [f32; 4],
    pub edge_color: [f32; 4],
    /// x: metalness, y: roughness.
    pub material: [f32; 4],
}

/// Everything one frame needs besides the uploaded buffers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderFrame {
    pub globals: Globals,
    /// Linear RGBA.
    pub clear_color: [f64; 4],
    pub solid_index_count: u32,
    pub line_vertex_count: u32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Renderer {
    pub lighting: Lighting,
    pub material: Material,
    /// sRGB.
    pub edge_color: [f32; 3],
}

impl Renderer {
    pub fn new(edge_color: [f32; 3]) -> Self {
        Self {
            lighting: Lighting::default(),
            material: Material::default(),
            edge_color,
        }
    }

    pub fn frame(&self, camera: &Camera, group: &SceneGroup, buffers: &SceneBuffers) -> RenderFrame {
        let l = &self.lighting;
        let light_dir = l.directional_position.normalize();
        let eye = camera.eye();
        let [ar, ag, ab] = l.ambient_color.map(|c| srgb_to_linear(c) * l.ambient_intensity);
        let [lr, lg, lb] = l
            .directional_color
            .map(|c| srgb_to_linear(c) * l.directional_intensity);
        let [er, eg, eb] = self.edge_color.map(srgb_to_linear);
        let [br, bg, bb] = l.background.map(srgb_to_linear);

        RenderFrame {
            globals: Globals {
                view_proj: camera.view_proj(),
                model: group.transform.matrix(),
                eye: [eye.x as f32, eye.y as f32, eye.z as f32, 1.0],
                light_dir: [light_dir.x as f32, light_dir.y as f32, light_dir.z as f32, 0.0],
                light_color: [lr, lg, lb, 1.0],
                ambient: [ar, ag, ab, 1.0],
                edge_color: [er, eg, eb, 1.0],
                material: [self.material.metalness, self.material.roughness, 0.0, 0.0],
            },
            clear_color: [br as f64, bg as f64, bb as f64, 1.0],
            solid_index_count: buffers.index_count(),
            line_vertex_count: buffers.line_vertex_count(),
        }
    }
}
