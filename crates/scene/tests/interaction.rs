use runtime::{InputEvent, InputQueue};
use scene::{Camera, InteractionController, ViewConfig};

fn assert_close(a: f64, b: f64, eps: f64) {
    let diff = (a - b).abs();
    assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
}

#[test]
fn drag_rotates_by_pixel_delta() {
    let mut c = InteractionController::new(&ViewConfig::default());
    c.on_pointer_down(100.0, 100.0);
    c.on_pointer_move(150.0, 130.0);

    let r = c.state().rotation;
    assert_close(r.y, -0.4 + 0.25, 1e-12);
    assert_close(r.x, -0.8 + 0.15, 1e-12);
    assert_eq!(r.z, -0.5);
}

#[test]
fn moves_after_release_are_ignored() {
    let mut c = InteractionController::new(&ViewConfig::default());
    c.on_pointer_down(0.0, 0.0);
    c.on_pointer_move(10.0, 0.0);
    c.on_pointer_up();
    let before = c.state();

    assert!(!c.on_pointer_move(500.0, 500.0));
    assert_eq!(c.state(), before);
}

#[test]
fn queued_events_drive_controller_and_camera() {
    let mut queue = InputQueue::new();
    queue.push(InputEvent::PointerDown { x: 10.0, y: 10.0 });
    queue.push(InputEvent::PointerMove { x: 30.0, y: 10.0 });
    queue.push(InputEvent::PointerUp);
    queue.push(InputEvent::Wheel { delta_y: 100.0 });
    queue.push(InputEvent::Resize {
        width: 1000.0,
        height: 500.0,
    });

    let cfg = ViewConfig::default();
    let mut c = InteractionController::new(&cfg);
    let mut camera = Camera::from_config(&cfg.camera);
    for event in queue.drain() {
        c.handle(&event);
        if let InputEvent::Resize { width, height } = event {
            camera.set_viewport(width, height);
        }
    }
    camera.set_zoom(c.state().zoom);

    assert!(!c.is_dragging());
    assert_close(c.state().rotation.y, -0.4 + 0.1, 1e-12);
    assert_close(camera.eye().z, 735.0, 1e-9);
    assert_eq!(camera.aspect(), 2.0);
}
