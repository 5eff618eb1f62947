use wgpu::util::DeviceExt;

/// The clock shared by every animated material.
#[derive(Debug)]
pub struct TimeResources {
    pub uniform: TimeUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TimeUniform {
    /// Milliseconds since the render loop started, times the time scale.
    pub t: f32,
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: [f32; 3],
}

impl TimeUniform {
    pub fn new(t: f32) -> Self {
        Self {
            t,
            _padding: [0.0; 3],
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, time_uniform: TimeUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Time Buffer"),
        contents: bytemuck::cast_slice(&[time_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some("time_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    time_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: time_buffer.as_entire_binding(),
        }],
        label: Some("time_bind_group"),
    })
}

impl TimeResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = TimeUniform::default();
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Set the clock to `elapsed` scaled by `time_scale` and upload it.
    pub fn update(&mut self, queue: &wgpu::Queue, elapsed: instant::Duration, time_scale: f32) {
        self.uniform.t = scaled_millis(elapsed, time_scale);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

/// The value written to the clock uniform. Kept in f64 until the end so long
/// sessions do not lose sub-millisecond precision earlier than necessary.
pub fn scaled_millis(elapsed: instant::Duration, time_scale: f32) -> f32 {
    (elapsed.as_secs_f64() * 1000.0 * time_scale as f64) as f32
}
