//! Perspective camera, its GPU uniform and a mouse driven orbit controller.
//!
//! The controller follows the usual orbit-control conventions: the left button
//! rotates the eye around the target, the middle button and the wheel dolly
//! towards it and the right button pans both in screen space. Input only
//! accumulates deltas; [`CameraController::update`] applies them once per
//! frame.

use std::f32::consts::{PI, TAU};

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3, Zero};
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Keeps the polar angle away from the poles where the view matrix flips.
const POLAR_EPS: f32 = 0.000001;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<E: Into<Point3<f32>>, T: Into<Point3<f32>>>(eye: E, target: T) -> Self {
        Self {
            eye: eye.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn distance(&self) -> f32 {
        (self.eye - self.target).magnitude()
    }

    /// Camera space right and up axes expressed in world space.
    fn screen_axes(&self) -> (Vector3<f32>, Vector3<f32>) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        (right, right.cross(forward))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn fovy(&self) -> Rad<f32> {
        self.fovy
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

// We need this for Rust to store our data correctly for the shaders
#[repr(C)]
// This is so we can store this in a buffer
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.eye.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.view_proj.into()
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Drag {
    Rotate,
    Dolly,
    Pan,
}

#[derive(Debug)]
pub struct CameraController {
    rotate_speed: f32,
    zoom_speed: f32,
    pan_speed: f32,
    min_distance: f32,
    max_distance: f32,
    viewport_height: f32,
    drag: Option<(MouseButton, Drag)>,
    cursor: Option<PhysicalPosition<f64>>,
    // pending changes, consumed by `update`
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_pixels: (f32, f32),
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32, pan_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            viewport_height: 1.0,
            drag: None,
            cursor: None,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_pixels: (0.0, 0.0),
        }
    }

    /// NaN bounds are dropped and swapped bounds are put back in order, so
    /// `update` can always clamp.
    pub fn with_distance_limits(mut self, min_distance: f32, max_distance: f32) -> Self {
        let min_distance = if min_distance.is_nan() { 0.0 } else { min_distance.max(0.0) };
        let max_distance = if max_distance.is_nan() { f32::INFINITY } else { max_distance.max(0.0) };
        if min_distance > max_distance {
            log::warn!(
                "camera distance limits {} > {} are swapped",
                min_distance,
                max_distance
            );
            self.min_distance = max_distance;
            self.max_distance = min_distance;
        } else {
            self.min_distance = min_distance;
            self.max_distance = max_distance;
        }
        self
    }

    pub fn resize(&mut self, height: u32) {
        if height > 0 {
            self.viewport_height = height as f32;
        }
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    /// Turn the eye around the target by a drag of `dx`, `dy` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.theta_delta -= TAU * dx / self.viewport_height * self.rotate_speed;
        self.phi_delta -= TAU * dy / self.viewport_height * self.rotate_speed;
    }

    /// Positive steps move the eye closer, negative ones away.
    pub fn dolly(&mut self, steps: f32) {
        self.scale *= self.zoom_scale().powf(steps);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan_pixels.0 += dx * self.pan_speed;
        self.pan_pixels.1 += dy * self.pan_speed;
    }

    /// Returns whether the event was consumed by the controller.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let drag = match button {
                    MouseButton::Left => Drag::Rotate,
                    MouseButton::Middle => Drag::Dolly,
                    MouseButton::Right => Drag::Pan,
                    _ => return false,
                };
                match state {
                    ElementState::Pressed => self.drag = Some((*button, drag)),
                    ElementState::Released => {
                        if matches!(self.drag, Some((held, _)) if held == *button) {
                            self.drag = None;
                        }
                    }
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let previous = self.cursor.replace(*position);
                let (Some((_, drag)), Some(previous)) = (self.drag, previous) else {
                    return false;
                };
                let dx = (position.x - previous.x) as f32;
                let dy = (position.y - previous.y) as f32;
                match drag {
                    Drag::Rotate => self.rotate(dx, dy),
                    // one step per move event, the direction decides in or out
                    Drag::Dolly if dy > 0.0 => self.dolly(-1.0),
                    Drag::Dolly if dy < 0.0 => self.dolly(1.0),
                    Drag::Dolly => (),
                    Drag::Pan => self.pan(dx, dy),
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                if scroll != 0.0 {
                    self.dolly(scroll.signum());
                }
                true
            }
            _ => false,
        }
    }

    /**
     * Apply the accumulated input to `camera` and reset it.
     *
     * The eye is expressed in spherical coordinates around the target
     * (theta around +Y measured from +Z, phi from +Y), the deltas are added,
     * phi is kept inside `(POLAR_EPS, PI - POLAR_EPS)` and the distance inside
     * the configured limits.
     */
    pub fn update(&mut self, camera: &mut Camera, projection: &Projection) {
        let offset = camera.eye - camera.target;
        let radius = offset.magnitude();

        if self.pan_pixels != (0.0, 0.0) {
            let (right, up) = camera.screen_axes();
            let target_distance = radius * (projection.fovy().0 / 2.0).tan();
            let left = 2.0 * self.pan_pixels.0 * target_distance / self.viewport_height;
            let upward = 2.0 * self.pan_pixels.1 * target_distance / self.viewport_height;
            camera.target += -right * left + up * upward;
        }

        let (theta, phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };
        let theta = theta + self.theta_delta;
        let phi = (phi + self.phi_delta).clamp(POLAR_EPS, PI - POLAR_EPS);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.eye = camera.target + offset;

        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
        self.pan_pixels = (0.0, 0.0);
    }

    pub fn is_idle(&self) -> bool {
        self.theta_delta.is_zero()
            && self.phi_delta.is_zero()
            && self.scale == 1.0
            && self.pan_pixels == (0.0, 0.0)
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(
        device: &wgpu::Device,
        camera: Camera,
        controller: CameraController,
        projection: &Projection,
    ) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            controller,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Apply pending orbit input and upload the new view projection.
    pub fn update(&mut self, queue: &wgpu::Queue, projection: &Projection) {
        self.controller.update(&mut self.camera, projection);
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
