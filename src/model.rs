use crate::heightfield::Heightfield;
use anyhow::Result;
use wgpu::util::DeviceExt;

pub mod texture {
    use super::*;
    use image::GenericImageView;

    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<(wgpu::Texture, wgpu::TextureView, wgpu::Sampler)> {
        let img = image::load_from_memory(bytes)?;
        let rgba = img.to_rgba8();
        let dimensions = img.dimensions();

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: dimensions.0,
                    height: dimensions.1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok((texture, view, sampler))
    }

    /// Decodes an image down to its 8-bit luma buffer plus dimensions,
    /// row-major, one byte per sample.
    pub fn luma_from_bytes(bytes: &[u8]) -> Result<(Vec<u8>, usize, usize)> {
        let img = image::load_from_memory(bytes)?;
        let luma = img.to_luma8();
        let (width, height) = luma.dimensions();
        Ok((luma.into_raw(), width as usize, height as usize))
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl SceneVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const fn vertex(x: f32, y: f32, z: f32, u: f32, v: f32) -> SceneVertex {
    SceneVertex {
        position: [x, y, z],
        tex_coords: [u, v],
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    pub fn from_matrix(model: glam::Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        const ATTRIBS: [wgpu::VertexAttribute; 4] =
            wgpu::vertex_attr_array![5 => Float32x4, 6 => Float32x4, 7 => Float32x4, 8 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBS,
        }
    }
}

/// One skybox face: interior-facing quad plus the image mapped onto it.
pub struct SkyFace {
    pub name: &'static str,
    pub image: &'static [u8],
    pub vertices: [SceneVertex; 6],
}

pub const SKYBOX_FACES: [SkyFace; 6] = [
    SkyFace {
        name: "sky_front",
        image: include_bytes!("../res/sky_front.png"),
        vertices: [
            vertex(-1.0, -1.0, -1.0, 1.0, 0.0),
            vertex(1.0, -1.0, -1.0, 0.0, 0.0),
            vertex(1.0, 1.0, -1.0, 0.0, 1.0),
            vertex(1.0, 1.0, -1.0, 0.0, 1.0),
            vertex(-1.0, 1.0, -1.0, 1.0, 1.0),
            vertex(-1.0, -1.0, -1.0, 1.0, 0.0),
        ],
    },
    SkyFace {
        name: "sky_back",
        image: include_bytes!("../res/sky_back.png"),
        vertices: [
            vertex(-1.0, -1.0, 1.0, 0.0, 0.0),
            vertex(1.0, -1.0, 1.0, 1.0, 0.0),
            vertex(1.0, 1.0, 1.0, 1.0, 1.0),
            vertex(-1.0, -1.0, 1.0, 0.0, 0.0),
            vertex(-1.0, 1.0, 1.0, 0.0, 1.0),
            vertex(1.0, 1.0, 1.0, 1.0, 1.0),
        ],
    },
    SkyFace {
        name: "sky_left",
        image: include_bytes!("../res/sky_left.png"),
        vertices: [
            vertex(-1.0, 1.0, -1.0, 0.0, 1.0),
            vertex(-1.0, -1.0, -1.0, 0.0, 0.0),
            vertex(-1.0, -1.0, 1.0, 1.0, 0.0),
            vertex(-1.0, 1.0, -1.0, 0.0, 1.0),
            vertex(-1.0, 1.0, 1.0, 1.0, 1.0),
            vertex(-1.0, -1.0, 1.0, 1.0, 0.0),
        ],
    },
    SkyFace {
        name: "sky_right",
        image: include_bytes!("../res/sky_right.png"),
        vertices: [
            vertex(1.0, 1.0, -1.0, 1.0, 1.0),
            vertex(1.0, -1.0, -1.0, 1.0, 0.0),
            vertex(1.0, 1.0, 1.0, 0.0, 1.0),
            vertex(1.0, -1.0, -1.0, 1.0, 0.0),
            vertex(1.0, -1.0, 1.0, 0.0, 0.0),
            vertex(1.0, 1.0, 1.0, 0.0, 1.0),
        ],
    },
    SkyFace {
        name: "sky_top",
        image: include_bytes!("../res/sky_top.png"),
        vertices: [
            vertex(-1.0, 1.0, -1.0, 1.0, 1.0),
            vertex(-1.0, 1.0, 1.0, 0.0, 1.0),
            vertex(1.0, 1.0, -1.0, 1.0, 0.0),
            vertex(1.0, 1.0, -1.0, 1.0, 0.0),
            vertex(1.0, 1.0, 1.0, 0.0, 0.0),
            vertex(-1.0, 1.0, 1.0, 0.0, 1.0),
        ],
    },
    SkyFace {
        name: "sky_bottom",
        image: include_bytes!("../res/sky_bottom.png"),
        vertices: [
            vertex(-1.0, -1.0, -1.0, 1.0, 0.0),
            vertex(1.0, -1.0, -1.0, 1.0, 1.0),
            vertex(-1.0, -1.0, 1.0, 0.0, 0.0),
            vertex(-1.0, -1.0, 1.0, 0.0, 0.0),
            vertex(1.0, -1.0, 1.0, 0.0, 1.0),
            vertex(1.0, -1.0, -1.0, 1.0, 1.0),
        ],
    },
];

/// Unit cube as a non-indexed triangle list, one quad per face.
pub const CUBE_VERTICES: [SceneVertex; 36] = [
    vertex(-0.5, -0.5, -0.5, 0.0, 0.0),
    vertex(0.5, -0.5, -0.5, 1.0, 0.0),
    vertex(0.5, 0.5, -0.5, 1.0, 1.0),
    vertex(0.5, 0.5, -0.5, 1.0, 1.0),
    vertex(-0.5, 0.5, -0.5, 0.0, 1.0),
    vertex(-0.5, -0.5, -0.5, 0.0, 0.0),
    vertex(-0.5, -0.5, 0.5, 0.0, 0.0),
    vertex(0.5, -0.5, 0.5, 1.0, 0.0),
    vertex(0.5, 0.5, 0.5, 1.0, 1.0),
    vertex(0.5, 0.5, 0.5, 1.0, 1.0),
    vertex(-0.5, 0.5, 0.5, 0.0, 1.0),
    vertex(-0.5, -0.5, 0.5, 0.0, 0.0),
    vertex(-0.5, 0.5, 0.5, 1.0, 0.0),
    vertex(-0.5, 0.5, -0.5, 1.0, 1.0),
    vertex(-0.5, -0.5, -0.5, 0.0, 1.0),
    vertex(-0.5, -0.5, -0.5, 0.0, 1.0),
    vertex(-0.5, -0.5, 0.5, 0.0, 0.0),
    vertex(-0.5, 0.5, 0.5, 1.0, 0.0),
    vertex(0.5, 0.5, 0.5, 1.0, 0.0),
    vertex(0.5, 0.5, -0.5, 1.0, 1.0),
    vertex(0.5, -0.5, -0.5, 0.0, 1.0),
    vertex(0.5, -0.5, -0.5, 0.0, 1.0),
    vertex(0.5, -0.5, 0.5, 0.0, 0.0),
    vertex(0.5, 0.5, 0.5, 1.0, 0.0),
    vertex(-0.5, -0.5, -0.5, 0.0, 1.0),
    vertex(0.5, -0.5, -0.5, 1.0, 1.0),
    vertex(0.5, -0.5, 0.5, 1.0, 0.0),
    vertex(0.5, -0.5, 0.5, 1.0, 0.0),
    vertex(-0.5, -0.5, 0.5, 0.0, 0.0),
    vertex(-0.5, -0.5, -0.5, 0.0, 1.0),
    vertex(-0.5, 0.5, -0.5, 0.0, 1.0),
    vertex(0.5, 0.5, -0.5, 1.0, 1.0),
    vertex(0.5, 0.5, 0.5, 1.0, 0.0),
    vertex(0.5, 0.5, 0.5, 1.0, 0.0),
    vertex(-0.5, 0.5, 0.5, 0.0, 0.0),
    vertex(-0.5, 0.5, -0.5, 0.0, 1.0),
];

pub struct Material {
    pub name: String,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        name: &str,
    ) -> Self {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some(name),
        });
        Self {
            name: name.to_string(),
            bind_group,
        }
    }
}

pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub num_vertices: u32,
    pub material_index: usize,
}

pub trait Drawable<'a> {
    fn draw_model(&mut self, model: &'a Model, instance_buffer: &'a wgpu::Buffer, instances: u32);
}

impl<'a, 'b> Drawable<'a> for wgpu::RenderPass<'b>
where
    'a: 'b,
{
    fn draw_model(&mut self, model: &'a Model, instance_buffer: &'a wgpu::Buffer, instances: u32) {
        self.set_vertex_buffer(1, instance_buffer.slice(..));
        for mesh in &model.meshes {
            let material = &model.materials[mesh.material_index];
            self.set_bind_group(1, &material.bind_group, &[]);
            self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            self.draw(0..mesh.num_vertices, 0..instances);
        }
    }
}

pub struct Model {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

impl Model {
    /// Uploads the heightfield triangle stream with a ground albedo.
    pub fn from_heightfield(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        field: &Heightfield,
        material_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self> {
        let stream = field.triangle_stream();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Vertex Buffer"),
            contents: bytemuck::cast_slice(&stream),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let mesh = Mesh {
            name: "terrain".to_string(),
            vertex_buffer,
            num_vertices: field.triangle_vertex_count() as u32,
            material_index: 0,
        };

        let ground_bytes = include_bytes!("../res/ground.png");
        let (_texture, view, sampler) =
            texture::from_bytes(device, queue, ground_bytes, "ground.png")?;
        let material = Material::new(device, material_bind_group_layout, &view, &sampler, "ground");

        Ok(Self {
            meshes: vec![mesh],
            materials: vec![material],
        })
    }

    /// Builds the six-face enclosure, one mesh and one material per face.
    pub fn skybox(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self> {
        let mut meshes = Vec::with_capacity(SKYBOX_FACES.len());
        let mut materials = Vec::with_capacity(SKYBOX_FACES.len());
        for (index, face) in SKYBOX_FACES.iter().enumerate() {
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(face.name),
                contents: bytemuck::cast_slice(&face.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            meshes.push(Mesh {
                name: face.name.to_string(),
                vertex_buffer,
                num_vertices: face.vertices.len() as u32,
                material_index: index,
            });

            let (_texture, view, sampler) =
                texture::from_bytes(device, queue, face.image, face.name)?;
            materials.push(Material::new(
                device,
                material_bind_group_layout,
                &view,
                &sampler,
                face.name,
            ));
        }
        Ok(Self { meshes, materials })
    }

    /// Textured unit cube shared by every instance of the cube group.
    pub fn cube(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self> {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let mesh = Mesh {
            name: "cube".to_string(),
            vertex_buffer,
            num_vertices: CUBE_VERTICES.len() as u32,
            material_index: 0,
        };

        let crate_bytes = include_bytes!("../res/container.png");
        let (_texture, view, sampler) =
            texture::from_bytes(device, queue, crate_bytes, "container.png")?;
        let material =
            Material::new(device, material_bind_group_layout, &view, &sampler, "container");

        Ok(Self {
            meshes: vec![mesh],
            materials: vec![material],
        })
    }
}
