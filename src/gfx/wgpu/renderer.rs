//! wgpu 渲染器实现
//!
//! 本模块实现了基于 wgpu 的渲染器，包括：
//! - 渲染管线创建（实体两套：剔除背面 / 不剔除；线框一套）
//! - 资源管理（Uniform 缓冲、每个材质一个纹理绑定组、深度缓冲）
//! - 每帧绘制：实体通道 + 可选的线框叠加
//!
//! 开启背面剔除时，背面不会消失，而是改用线框画出，实体只画正面。

use bytemuck::{Pod, Zeroable};
use tracing::{debug, info, warn};

use crate::core::error::{GraphicsError, Result};
use crate::core::{Config, Matrix4, ViewerState};
use crate::geometry::bounds::BoundingBox;
use crate::geometry::material::Materials;
use crate::geometry::vertex::DrawVertex;
use crate::gfx::backend::GpuDevice;
use crate::gfx::wgpu::backend::{GpuTexture, WgpuBackend};
use crate::renderer::draw_object::DrawObject;
use crate::renderer::texture::{DecodedImage, TextureCache};

/// 线框颜色
const WIRE_COLOR: [f32; 4] = [0.0, 0.0, 0.4, 1.0];

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Uniform Buffer Object - MVP 矩阵和线框颜色
///
/// 必须使用 #[repr(C)] 保证内存布局与着色器一致。
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct UniformBufferObject {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    wire_color: [f32; 4],
}

impl UniformBufferObject {
    fn new(model: &Matrix4, view: &Matrix4, projection: &Matrix4) -> Self {
        Self {
            model: *model.as_ref(),
            view: *view.as_ref(),
            projection: *projection.as_ref(),
            wire_color: WIRE_COLOR,
        }
    }
}

/// wgpu 渲染器
pub struct Renderer {
    gfx: WgpuBackend,

    // 渲染管线
    solid_pipeline: wgpu::RenderPipeline,
    solid_cull_pipeline: wgpu::RenderPipeline,
    wire_pipeline: Option<wgpu::RenderPipeline>,
    /// 剔除模式下把背面画成线框
    back_line_pipeline: Option<wgpu::RenderPipeline>,

    // 资源
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    /// 按材质 ID 索引的纹理绑定组
    material_bind_groups: Vec<wgpu::BindGroup>,
    depth_view: wgpu::TextureView,

    // 场景
    draw_objects: Vec<DrawObject<wgpu::Buffer>>,
    bounds: BoundingBox,
    clear_color: wgpu::Color,

    /// 白色占位纹理，需要和绑定组活得一样久
    _white_texture: GpuTexture,
}

impl Renderer {
    /// 创建渲染器
    ///
    /// `draw_objects` 和 `textures` 必须是用同一个 `gfx` 创建的。
    pub fn new(
        gfx: WgpuBackend,
        config: &Config,
        draw_objects: Vec<DrawObject<wgpu::Buffer>>,
        materials: &Materials,
        textures: &TextureCache<GpuTexture>,
        bounds: BoundingBox,
    ) -> Result<Self> {
        info!("Creating wgpu renderer");

        // 1. 加载着色器模块
        debug!("Loading shaders");
        let shader_source = include_str!("../../renderer/shaders/viewer.wgsl");
        let shader_module = gfx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Viewer Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        // 2. 创建 Uniform Buffer
        debug!("Creating uniform buffer");
        let uniform_buffer = gfx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size: std::mem::size_of::<UniformBufferObject>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // 3. 创建 Bind Group Layout
        debug!("Creating bind group layouts");
        let uniform_layout = gfx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
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
        });

        let texture_layout = gfx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // 4. 创建 Bind Group
        let uniform_bind_group = gfx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // 线性过滤
        let sampler = gfx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Diffuse Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let white_texture = gfx.create_texture_2d("White Texture", &DecodedImage::white());

        let material_bind_groups = materials
            .iter()
            .enumerate()
            .map(|(id, material)| {
                let view = material
                    .texture_name()
                    .and_then(|name| textures.get(name))
                    .map_or(&white_texture.view, |t| &t.view);

                gfx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("Material Bind Group [{}]", id)),
                    layout: &texture_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&sampler),
                        },
                    ],
                })
            })
            .collect();

        // 5. 创建渲染管线布局
        let pipeline_layout = gfx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        // 6. 创建深度纹理
        debug!("Creating depth texture");
        let depth_view =
            create_depth_view(&gfx.device, gfx.surface_config.width, gfx.surface_config.height);

        // 7. 创建渲染管线
        debug!("Creating render pipelines");
        let format = gfx.surface_config.format;
        let solid_pipeline =
            create_pipeline(&gfx.device, &pipeline_layout, &shader_module, format, PipelineKind::Solid);
        let solid_cull_pipeline = create_pipeline(
            &gfx.device,
            &pipeline_layout,
            &shader_module,
            format,
            PipelineKind::SolidCulled,
        );
        let (wire_pipeline, back_line_pipeline) = if gfx.supports_wireframe() {
            let line_pipeline =
                |kind| create_pipeline(&gfx.device, &pipeline_layout, &shader_module, format, kind);
            (
                Some(line_pipeline(PipelineKind::Wire)),
                Some(line_pipeline(PipelineKind::BackLines)),
            )
        } else {
            debug!("Skipping line pipelines");
            (None, None)
        };

        let [r, g, b, a] = config.graphics.clear_color;
        let clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        };

        info!(
            objects = draw_objects.len(),
            materials = materials.len(),
            textures = textures.len(),
            "wgpu renderer created successfully"
        );

        Ok(Self {
            gfx,
            solid_pipeline,
            solid_cull_pipeline,
            wire_pipeline,
            back_line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            material_bind_groups,
            depth_view,
            draw_objects,
            bounds,
            clear_color,
            _white_texture: white_texture,
        })
    }

    /// 绘制一帧
    pub fn draw(&mut self, state: &ViewerState) -> Result<()> {
        // 1. 获取交换链纹理
        let output = match self.gfx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = (self.gfx.surface_config.width, self.gfx.surface_config.height);
                self.gfx.reconfigure_surface(width, height);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface acquire timed out, skipping frame");
                return Ok(());
            }
            Err(e) => {
                return Err(GraphicsError::SwapchainError(format!(
                    "Failed to acquire next image: {}",
                    e
                ))
                .into())
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        // 2. 更新 MVP 矩阵
        let ubo = UniformBufferObject::new(
            &state.model_matrix(&self.bounds),
            &state.view_matrix(),
            &state.projection_matrix(),
        );
        self.gfx.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[ubo]));

        // 3. 创建命令编码器
        let mut encoder = self.gfx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        // 4. 渲染通道
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            // 实体通道
            let solid = if state.cull_face {
                &self.solid_cull_pipeline
            } else {
                &self.solid_pipeline
            };
            render_pass.set_pipeline(solid);
            draw_all(&mut render_pass, &self.draw_objects, &self.material_bind_groups);

            // 背面线框
            if let (true, Some(back_lines)) = (state.cull_face, &self.back_line_pipeline) {
                render_pass.set_pipeline(back_lines);
                draw_all(&mut render_pass, &self.draw_objects, &self.material_bind_groups);
            }

            // 线框叠加
            if let (true, Some(wire)) = (state.show_wire, &self.wire_pipeline) {
                render_pass.set_pipeline(wire);
                draw_all(&mut render_pass, &self.draw_objects, &self.material_bind_groups);
            }
        }

        // 5. 提交命令
        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// 处理窗口大小调整
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            debug!("Resizing to {}x{}", width, height);

            // 重新配置表面
            self.gfx.reconfigure_surface(width, height);

            // 重建深度纹理
            self.depth_view = create_depth_view(&self.gfx.device, width, height);
        }
    }

    /// 请求重绘
    pub fn request_redraw(&self) {
        self.gfx.window().request_redraw();
    }

    /// 获取窗口引用
    pub fn window(&self) -> &winit::window::Window {
        self.gfx.window()
    }
}

/// 用当前管线绘制所有非空对象
fn draw_all<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    objects: &'a [DrawObject<wgpu::Buffer>],
    material_bind_groups: &'a [wgpu::BindGroup],
) {
    for object in objects {
        let Some(buffer) = &object.buffer else {
            continue;
        };
        render_pass.set_bind_group(1, &material_bind_groups[object.material_id], &[]);
        render_pass.set_vertex_buffer(0, buffer.slice(..));
        render_pass.draw(0..object.vertex_count(), 0..1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineKind {
    Solid,
    SolidCulled,
    Wire,
    BackLines,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    kind: PipelineKind,
) -> wgpu::RenderPipeline {
    let (label, fragment_entry, cull_mode, polygon_mode) = match kind {
        PipelineKind::Solid => ("Solid Pipeline", "fs_main", None, wgpu::PolygonMode::Fill),
        PipelineKind::SolidCulled => (
            "Solid Culled Pipeline",
            "fs_main",
            Some(wgpu::Face::Back),
            wgpu::PolygonMode::Fill,
        ),
        PipelineKind::Wire => ("Wire Pipeline", "fs_wire", None, wgpu::PolygonMode::Line),
        PipelineKind::BackLines => (
            "Back Lines Pipeline",
            "fs_main",
            Some(wgpu::Face::Front),
            wgpu::PolygonMode::Line,
        ),
    };

    // 实体向后偏移一点，让线框能画在表面上
    let (depth_compare, bias) = match kind {
        PipelineKind::Wire | PipelineKind::BackLines => {
            (wgpu::CompareFunction::LessEqual, wgpu::DepthBiasState::default())
        }
        _ => (
            wgpu::CompareFunction::Less,
            wgpu::DepthBiasState {
                constant: 1,
                slope_scale: 1.0,
                clamp: 0.0,
            },
        ),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[DrawVertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: fragment_entry,
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias,
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

/// 视图持有纹理的引用，不需要单独保存纹理
fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
