//! Per-mount view state, independent of the DOM and the GPU.

use formats::{FeatureCollection, StatTable};
use gpu::{RenderFrame, Renderer, SceneBuffers};
use layers::{ChoroplethBuild, ChoroplethConfig, ChoroplethLayer, NormalizeError, label_text};
use runtime::{Frame, FrameClock, InputEvent, InputQueue};
use scene::{Camera, InteractionController, ViewConfig, pick_ray};

/// What the host must do after a frame step.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub frame: Frame,
    pub render: RenderFrame,
    /// New drawing buffer size when the viewport changed this frame.
    pub resized: Option<(u32, u32)>,
    /// Text for the feature under an idle pointer.
    pub tooltip: Option<String>,
}

pub struct Session {
    pub build: ChoroplethBuild,
    pub buffers: SceneBuffers,
    pub input: InputQueue,
    controller: InteractionController,
    camera: Camera,
    renderer: Renderer,
    clock: FrameClock,
    viewport: [f64; 2],
    hover_px: Option<[f64; 2]>,
}

impl Session {
    pub fn new(
        collection: &FeatureCollection,
        stats: &StatTable,
        choropleth: ChoroplethConfig,
        view: &ViewConfig,
        viewport: [f64; 2],
    ) -> Result<Self, NormalizeError> {
        let layer = ChoroplethLayer::new(1, choropleth);
        let build = layer.build(collection, stats, view)?;
        let buffers = SceneBuffers::from_group(&build.group);

        let mut camera = Camera::from_config(&view.camera);
        camera.set_viewport(viewport[0], viewport[1]);

        Ok(Self {
            build,
            buffers,
            input: InputQueue::new(),
            controller: InteractionController::new(view),
            camera,
            renderer: Renderer::new(layer.config.edge_rgb()),
            clock: FrameClock::default(),
            viewport,
            hover_px: None,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Applies every queued event, then snapshots the view for drawing.
    pub fn step(&mut self, now_ms: f64) -> FrameOutput {
        let mut resized = None;
        for event in self.input.drain() {
            match event {
                InputEvent::Resize { width, height } => {
                    if width > 0.0 && height > 0.0 {
                        self.viewport = [width, height];
                        self.camera.set_viewport(width, height);
                        resized = Some((width.round() as u32, height.round() as u32));
                    }
                }
                InputEvent::PointerMove { x, y } => {
                    self.hover_px = Some([x, y]);
                    self.controller.handle(&event);
                }
                _ => {
                    self.controller.handle(&event);
                }
            }
        }

        let state = self.controller.state();
        self.build.group.transform.rotation = state.rotation;
        self.camera.set_zoom(state.zoom);

        let tooltip = if self.controller.is_dragging() {
            None
        } else {
            self.hover_px.and_then(|px| self.tooltip_at(px))
        };

        FrameOutput {
            frame: self.clock.tick(now_ms),
            render: self.renderer.frame(&self.camera, &self.build.group, &self.buffers),
            resized,
            tooltip,
        }
    }

    fn tooltip_at(&self, px: [f64; 2]) -> Option<String> {
        let (nx, ny) = Camera::ndc_from_pixels(px[0], px[1], self.viewport[0], self.viewport[1]);
        let ray = self.camera.ray_through_ndc(nx, ny);
        let hit = pick_ray(&self.build.group, &ray)?;
        Some(label_text(&hit.node.display_name, hit.node.label.value))
    }

    pub fn summary(&self) -> String {
        let r = &self.build.report;
        format!(
            "{} prefectures, {} solids, {} without statistics, {} skipped",
            r.features,
            r.solids,
            r.unmatched.len(),
            r.skipped.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use formats::{FeatureCollection, StatTable};
    use layers::ChoroplethConfig;
    use runtime::InputEvent;
    use scene::ViewConfig;

    const TOKYO: &str = r#"{ "type": "FeatureCollection", "features": [
        { "type": "Feature", "properties": { "pref": "東京都" },
          "geometry": { "type": "Polygon", "coordinates": [[
            [139.0, 35.5], [140.0, 35.5], [140.0, 36.0], [139.0, 36.0], [139.0, 35.5]
          ]] } }
    ] }"#;

    fn session(view: ViewConfig) -> Session {
        let fc = FeatureCollection::from_geojson_str(TOKYO).expect("fixture");
        Session::new(
            &fc,
            &StatTable::japan_defaults(),
            ChoroplethConfig::default(),
            &view,
            [1280.0, 720.0],
        )
        .expect("session")
    }

    #[test]
    fn drag_between_frames_is_applied_before_drawing() {
        let mut s = session(ViewConfig::default());
        let before = s.build.group.transform.matrix();

        s.input.push(InputEvent::PointerDown { x: 100.0, y: 100.0 });
        s.input.push(InputEvent::PointerMove { x: 150.0, y: 130.0 });
        let out = s.step(16.0);

        assert!(s.controller().is_dragging());
        assert_ne!(out.render.globals.model, before);
        assert_eq!(out.render.globals.model, s.build.group.transform.matrix());
        assert_eq!(out.tooltip, None);
    }

    #[test]
    fn resize_updates_camera_and_reports_new_size() {
        let mut s = session(ViewConfig::default());
        s.input.push(InputEvent::Resize {
            width: 800.0,
            height: 400.0,
        });
        let out = s.step(16.0);
        assert_eq!(out.resized, Some((800, 400)));
        assert_eq!(s.camera().aspect(), 2.0);

        let out = s.step(32.0);
        assert_eq!(out.resized, None);
        assert_eq!(out.frame.index, 1);
    }

    #[test]
    fn hovering_the_map_center_names_the_prefecture() {
        let view = ViewConfig {
            initial_rotation: [0.0, 0.0, 0.0],
            ..ViewConfig::default()
        };
        let mut s = session(view);
        let mut camera_cfg = scene::CameraConfig::default();
        camera_cfg.eye = [0.0, 0.0, 700.0];
        s.camera = scene::Camera::from_config(&camera_cfg);
        s.camera.set_viewport(1280.0, 720.0);

        s.input.push(InputEvent::PointerMove { x: 640.0, y: 360.0 });
        let out = s.step(16.0);
        assert_eq!(out.tooltip.as_deref(), Some("東京都: 738946"));

        s.input.push(InputEvent::PointerMove { x: 2.0, y: 2.0 });
        assert_eq!(s.step(32.0).tooltip, None);
    }

    #[test]
    fn summary_counts_build() {
        let s = session(ViewConfig::default());
        assert_eq!(s.summary(), "1 prefectures, 1 solids, 0 without statistics, 0 skipped");
    }
}
