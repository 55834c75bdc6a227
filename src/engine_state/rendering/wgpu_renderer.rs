//! # WGPU Chunk Renderer
//!
//! Backs every chunk handle with its own vertex and index buffer on a `wgpu`
//! device. Camera, light and target-block data live in one shared uniform
//! bind group that is rewritten at most once per frame.
//!
//! The renderer records which chunks were drawn; [`WgpuChunkRenderer::encode`]
//! replays those draws into a render pass whose pipeline the caller has bound.

use std::collections::HashMap;

use cgmath::Point3;
use log::{debug, warn};
use thiserror::Error;
use wgpu::{util::DeviceExt, BindGroup, BindGroupLayout, Buffer, Device, Queue};

use crate::engine_state::camera_state::camera::{Camera, CameraUniform};

use super::{meshing::Mesh, ChunkRenderer, GpuHandle, Light, LightUniform, TargetBlock};

const CAMERA_BUFFER_NAME: &str = "camera_buffer";
const LIGHT_BUFFER_NAME: &str = "light_buffer";
const TARGET_BUFFER_NAME: &str = "target_block_buffer";
const FRAME_BIND_GROUP: &str = "frame_bind_group";
const FRAME_BIND_GROUP_LAYOUT: &str = "frame_bind_group_layout";

/// Failure to acquire a GPU device.
#[derive(Debug, Error)]
pub enum GpuInitError {
    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Highlighted block as the shader sees it; `w` is 1 when a target is set.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct TargetUniform {
    position: [i32; 4],
}

impl TargetUniform {
    fn from_target(target: Option<&TargetBlock>) -> Self {
        match target {
            Some(target) => TargetUniform {
                position: [target.position.x, target.position.y, target.position.z, 1],
            },
            None => TargetUniform { position: [0; 4] },
        }
    }
}

/// GPU buffers of one chunk. `None` until the first non-empty upload.
struct ChunkBuffers {
    origin: Point3<i32>,
    geometry: Option<(Buffer, Buffer)>,
    index_count: u32,
}

/// A draw recorded for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub handle: GpuHandle,
    pub index_count: u32,
}

pub struct WgpuChunkRenderer {
    device: Device,
    queue: Queue,
    next_handle: u64,
    chunks: HashMap<GpuHandle, ChunkBuffers>,
    uniform_buffers: HashMap<&'static str, Buffer>,
    frame_bind_group: BindGroup,
    frame_bind_group_layout: BindGroupLayout,
    draw_calls: Vec<DrawCall>,
    uniforms_written: bool,
}

impl WgpuChunkRenderer {
    /// Creates a renderer on an existing device.
    pub fn new(device: Device, queue: Queue) -> Self {
        let mut uniform_buffers = HashMap::new();
        uniform_buffers.insert(
            CAMERA_BUFFER_NAME,
            Self::uniform_buffer(&device, CAMERA_BUFFER_NAME, &[CameraUniform::new()]),
        );
        uniform_buffers.insert(
            LIGHT_BUFFER_NAME,
            Self::uniform_buffer(
                &device,
                LIGHT_BUFFER_NAME,
                &[LightUniform::from(&Light::default())],
            ),
        );
        uniform_buffers.insert(
            TARGET_BUFFER_NAME,
            Self::uniform_buffer(&device, TARGET_BUFFER_NAME, &[TargetUniform::from_target(None)]),
        );

        let (frame_bind_group, frame_bind_group_layout) =
            Self::generate_frame_bindgroups(&device, &uniform_buffers);

        WgpuChunkRenderer {
            device,
            queue,
            next_handle: 0,
            chunks: HashMap::new(),
            uniform_buffers,
            frame_bind_group,
            frame_bind_group_layout,
            draw_calls: Vec::new(),
            uniforms_written: false,
        }
    }

    /// Opens a device without a presentation surface.
    pub async fn headless() -> Result<Self, GpuInitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            flags: wgpu::InstanceFlags::empty(),
            backend_options: wgpu::BackendOptions::from_env_or_default(),
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;
        debug!("using graphics adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self::new(device, queue))
    }

    /// Layout of bind group 0: camera, light and target block uniforms.
    pub fn frame_bind_group_layout(&self) -> &BindGroupLayout {
        &self.frame_bind_group_layout
    }

    /// Draws recorded since the last `begin_frame`.
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Number of live chunk handles.
    pub fn live_count(&self) -> usize {
        self.chunks.len()
    }

    /// Replays this frame's draws into `pass`.
    ///
    /// The caller binds a pipeline built with [`super::Vertex::desc`] and
    /// [`Self::frame_bind_group_layout`] before calling.
    pub fn encode(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        for call in &self.draw_calls {
            let Some((vertex_buffer, index_buffer)) = self
                .chunks
                .get(&call.handle)
                .and_then(|chunk| chunk.geometry.as_ref())
            else {
                continue;
            };
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..call.index_count, 0, 0..1);
        }
    }

    fn uniform_buffer<T: bytemuck::Pod>(device: &Device, label: &str, contents: &[T]) -> Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(contents),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn generate_frame_bindgroups(
        device: &Device,
        uniform_buffers: &HashMap<&'static str, Buffer>,
    ) -> (BindGroup, BindGroupLayout) {
        let names = [CAMERA_BUFFER_NAME, LIGHT_BUFFER_NAME, TARGET_BUFFER_NAME];

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = (0..names.len() as u32)
            .map(|binding| wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            })
            .collect();

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &layout_entries,
                label: Some(FRAME_BIND_GROUP_LAYOUT),
            });

        let entries: Vec<wgpu::BindGroupEntry> = names
            .iter()
            .enumerate()
            .map(|(binding, name)| wgpu::BindGroupEntry {
                binding: binding as u32,
                resource: uniform_buffers[name].as_entire_binding(),
            })
            .collect();

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_bind_group_layout,
            entries: &entries,
            label: Some(FRAME_BIND_GROUP),
        });

        (frame_bind_group, frame_bind_group_layout)
    }

    fn write_uniform<T: bytemuck::Pod>(&self, name: &'static str, value: &T) {
        if let Some(buffer) = self.uniform_buffers.get(name) {
            self.queue
                .write_buffer(buffer, 0, bytemuck::cast_slice(std::slice::from_ref(value)));
        }
    }
}

impl ChunkRenderer for WgpuChunkRenderer {
    fn create(&mut self, origin: Point3<i32>) -> GpuHandle {
        let handle = GpuHandle(self.next_handle);
        self.next_handle += 1;
        self.chunks.insert(
            handle,
            ChunkBuffers {
                origin,
                geometry: None,
                index_count: 0,
            },
        );
        handle
    }

    fn upload(&mut self, handle: GpuHandle, mesh: &Mesh) {
        let Some(chunk) = self.chunks.get_mut(&handle) else {
            warn!("upload to unknown gpu handle {:?}", handle);
            return;
        };

        chunk.index_count = mesh.indices.len() as u32;
        if mesh.is_empty() {
            chunk.geometry = None;
            return;
        }

        let label = format!(
            "chunk {} {} {}",
            chunk.origin.x, chunk.origin.y, chunk.origin.z
        );
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        chunk.geometry = Some((vertex_buffer, index_buffer));
    }

    fn release(&mut self, handle: GpuHandle) {
        match self.chunks.remove(&handle) {
            Some(ChunkBuffers {
                geometry: Some((vertex_buffer, index_buffer)),
                ..
            }) => {
                vertex_buffer.destroy();
                index_buffer.destroy();
            }
            Some(_) => {}
            None => warn!("release of unknown gpu handle {:?}", handle),
        }
    }

    fn draw(
        &mut self,
        handle: GpuHandle,
        target: Option<&TargetBlock>,
        camera: &Camera,
        light: &Light,
    ) {
        let Some(chunk) = self.chunks.get(&handle) else {
            warn!("draw of unknown gpu handle {:?}", handle);
            return;
        };
        let index_count = chunk.index_count;

        if !self.uniforms_written {
            let mut camera_uniform = CameraUniform::new();
            camera_uniform.update_view_proj_and_pos(camera);
            self.write_uniform(CAMERA_BUFFER_NAME, &camera_uniform);
            self.write_uniform(LIGHT_BUFFER_NAME, &LightUniform::from(light));
            self.write_uniform(TARGET_BUFFER_NAME, &TargetUniform::from_target(None));
            self.uniforms_written = true;
        }
        if target.is_some() {
            self.write_uniform(TARGET_BUFFER_NAME, &TargetUniform::from_target(target));
        }

        if index_count > 0 {
            self.draw_calls.push(DrawCall {
                handle,
                index_count,
            });
        }
    }

    fn begin_frame(&mut self) {
        self.draw_calls.clear();
        self.uniforms_written = false;
    }
}
