use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};
use rayon::prelude::*;
use spiralsim_simulation::config::GalaxyConfig;
use spiralsim_simulation::render::{star_outline, DrawCommand, Layer, Renderer, Shape};
use std::cmp::Ordering;
use std::mem::size_of;
use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    include_wgsl, vertex_attr_array, Backends, BlendState, Buffer, BufferDescriptor, BufferUsages,
    Color, ColorTargetState, ColorWrites, CommandEncoderDescriptor, Device, DeviceDescriptor,
    Features, FragmentState, IndexFormat, Instance, Limits, LoadOp, Operations,
    PipelineLayoutDescriptor, PowerPreference, PresentMode, PrimitiveState, PushConstantRange,
    Queue, RenderPass, RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline,
    RenderPipelineDescriptor, RequestAdapterOptions, ShaderStages, Surface, SurfaceConfiguration,
    SurfaceError, TextureUsages, TextureViewDescriptor, VertexAttribute, VertexBufferLayout,
    VertexState, VertexStepMode,
};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyboardInput, MouseScrollDelta, VirtualKeyCode, WindowEvent};
use winit::window::Window;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    position: [f32; 2],
}

impl Vertex {
    pub const ATTRIBS: &'static [VertexAttribute] = &vertex_attr_array![0 => Float32x2];
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct RenderInstance {
    position: [f32; 2],
    color: [f32; 4],
    radius: f32,
}

impl RenderInstance {
    pub const ATTRIBS: &'static [VertexAttribute] =
        &vertex_attr_array![1 => Float32x2, 2 => Float32x4, 3 => Float32];
}

impl From<&DrawCommand> for RenderInstance {
    fn from(command: &DrawCommand) -> Self {
        let channel = |c: u8| c as f32 / 255.0;
        let color = &command.color;
        Self {
            position: [command.position.x, command.position.y],
            color: [
                channel(color.color.red),
                channel(color.color.green),
                channel(color.color.blue),
                channel(color.alpha),
            ],
            radius: command.size,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Zeroable, bytemuck::Pod)]
pub struct PushConstants {
    inv_aspect: f32,
    /// Half of the visible height in world units.
    render_scale: f32,
    /// World position shown at the center of the window.
    pos: [f32; 2],
}

/// A triangle fan drawn once per instance.
pub struct Mesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,

    instance_buffer: Buffer,
    capacity: usize,
    instances: Vec<RenderInstance>,
}

impl Mesh {
    fn new(device: &Device, rim: &[[f32; 2]], capacity: usize) -> Self {
        let vertices: Vec<_> = std::iter::once([0.0; 2])
            .chain(rim.iter().copied())
            .map(|position| Vertex { position })
            .collect();
        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: None,
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        });

        let rim_len = rim.len() as u16;
        let indices: Vec<u16> = (0..rim_len)
            .flat_map(|i| [0, 1 + i, 1 + (i + 1) % rim_len])
            .collect();
        let index_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: None,
            contents: bytemuck::cast_slice(&indices),
            usage: BufferUsages::INDEX,
        });

        let instance_buffer = device.create_buffer(&BufferDescriptor {
            label: None,
            size: (capacity.max(1) * size_of::<RenderInstance>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            instance_buffer,
            capacity,
            instances: Vec::with_capacity(capacity),
        }
    }

    fn fill(&mut self, commands: &[DrawCommand]) {
        let commands = &commands[..commands.len().min(self.capacity)];
        self.instances.clear();
        self.instances
            .par_extend(commands.par_iter().map(RenderInstance::from));
    }

    fn upload(&self, queue: &Queue) {
        if !self.instances.is_empty() {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&self.instances),
            );
        }
    }

    fn draw<'a>(&'a self, render_pass: &mut RenderPass<'a>) {
        if self.instances.is_empty() {
            return;
        }
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.index_count, 0, 0..self.instances.len() as u32);
    }
}

pub struct State {
    pub size: PhysicalSize<u32>,
    pub surface: Surface,
    pub config: SurfaceConfiguration,
    pub device: Device,
    pub queue: Queue,

    pub render_pipeline: RenderPipeline,

    pub points: Mesh,
    pub sparkles: Mesh,

    pub push_constants: PushConstants,
    home: PushConstants,

    overlay: Option<String>,
    overlay_changed: bool,
}

impl State {
    const VERTEX_COUNT: usize = 12;

    pub async fn new(window: &Window, galaxy: &GalaxyConfig) -> Result<Self> {
        let size = window.inner_size();

        let instance = Instance::new(Backends::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or_else(|| anyhow!("no compatible graphics adapter found"))?;
        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: None,
                    features: Features::PUSH_CONSTANTS,
                    limits: Limits {
                        max_push_constant_size: size_of::<PushConstants>() as u32,
                        ..Default::default()
                    },
                },
                None,
            )
            .await?;

        let format = surface
            .get_supported_formats(&adapter)
            .first()
            .copied()
            .ok_or_else(|| anyhow!("surface is incompatible with the adapter"))?;
        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: PresentMode::Fifo,
        };

        surface.configure(&device, &config);

        let shader = device.create_shader_module(include_wgsl!("shaders/galaxy.wgsl"));

        let rp_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[],
            push_constant_ranges: &[PushConstantRange {
                stages: ShaderStages::VERTEX,
                range: 0..size_of::<PushConstants>() as u32,
            }],
        });
        let render_pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: None,
            layout: Some(&rp_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[
                    VertexBufferLayout {
                        array_stride: size_of::<Vertex>() as u64,
                        step_mode: VertexStepMode::Vertex,
                        attributes: Vertex::ATTRIBS,
                    },
                    VertexBufferLayout {
                        array_stride: size_of::<RenderInstance>() as u64,
                        step_mode: VertexStepMode::Instance,
                        attributes: RenderInstance::ATTRIBS,
                    },
                ],
            },
            // the y flip in the shader reverses the winding, so nothing is culled
            primitive: PrimitiveState::default(),
            depth_stencil: None,
            multisample: Default::default(),
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(ColorTargetState {
                    format: config.format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        let circle: Vec<_> = (0..Self::VERTEX_COUNT)
            .map(|i| i as f32 / Self::VERTEX_COUNT as f32 * std::f32::consts::TAU)
            .map(|a| [a.cos(), a.sin()])
            .collect();
        let points = Mesh::new(&device, &circle, galaxy.count as usize);

        let star: Vec<_> = star_outline(galaxy.sparkles.points, 1.0, Shape::STAR_INNER_RATIO)
            .iter()
            .map(|corner| [corner.x, corner.y])
            .collect();
        let sparkles = Mesh::new(&device, &star, galaxy.sparkles.max_active);

        let home = PushConstants {
            inv_aspect: size.height as f32 / size.width as f32,
            render_scale: size.height as f32 / 2.0,
            pos: [galaxy.center.x, galaxy.center.y],
        };

        Ok(Self {
            size,
            surface,
            config,
            device,
            queue,

            render_pipeline,

            points,
            sparkles,

            push_constants: home,
            home,

            overlay: None,
            overlay_changed: false,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = self.size.width;
            self.config.height = self.size.height;

            self.push_constants.inv_aspect = self.config.height as f32 / self.config.width as f32;
            self.home.inv_aspect = self.push_constants.inv_aspect;

            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn input(&mut self, event: &WindowEvent) -> bool {
        const STEP: f32 = 0.25;

        let step = STEP * self.push_constants.render_scale;
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(key),
                        ..
                    },
                ..
            } => match key {
                VirtualKeyCode::W | VirtualKeyCode::Up => self.push_constants.pos[1] -= step,
                VirtualKeyCode::A | VirtualKeyCode::Left => self.push_constants.pos[0] -= step,
                VirtualKeyCode::S | VirtualKeyCode::Down => self.push_constants.pos[1] += step,
                VirtualKeyCode::D | VirtualKeyCode::Right => self.push_constants.pos[0] += step,
                VirtualKeyCode::Return => self.push_constants = self.home,
                _ => return false,
            },
            WindowEvent::MouseWheel {
                delta: MouseScrollDelta::LineDelta(_, y),
                ..
            } => match y.total_cmp(&0.0) {
                Ordering::Greater => self.push_constants.render_scale *= 0.8,
                Ordering::Less => self.push_constants.render_scale *= 1.25,
                _ => return false,
            },
            _ => return false,
        }
        true
    }

    /// The overlay text if it changed since the last call.
    pub fn take_overlay(&mut self) -> Option<&str> {
        if std::mem::take(&mut self.overlay_changed) {
            self.overlay.as_deref()
        } else {
            None
        }
    }

    pub fn render(&mut self) -> Result<(), SurfaceError> {
        let current_texture = self.surface.get_current_texture()?;
        let view = current_texture
            .texture
            .create_view(&TextureViewDescriptor::default());

        let mut command_encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor::default());
        {
            let mut render_pass = command_encoder.begin_render_pass(&RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_push_constants(
                ShaderStages::VERTEX,
                0,
                bytemuck::bytes_of(&self.push_constants),
            );
            self.points.draw(&mut render_pass);
            self.sparkles.draw(&mut render_pass);
        }

        self.points.upload(&self.queue);
        self.sparkles.upload(&self.queue);
        self.queue.submit(Some(command_encoder.finish()));

        current_texture.present();
        Ok(())
    }
}

impl Renderer for State {
    type Error = SurfaceError;

    fn clear(&mut self) {
        self.points.instances.clear();
        self.sparkles.instances.clear();
    }

    fn draw(&mut self, layer: Layer, commands: &[DrawCommand]) {
        match layer {
            Layer::Points => self.points.fill(commands),
            Layer::Sparkles => self.sparkles.fill(commands),
        }
    }

    fn draw_text(&mut self, text: &str) {
        if self.overlay.as_deref() != Some(text) {
            self.overlay = Some(text.to_owned());
            self.overlay_changed = true;
        }
    }

    fn display(&mut self) -> Result<(), SurfaceError> {
        self.render()
    }
}
