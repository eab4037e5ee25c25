//---------------------------------------------------------------------------
// softraster - a CPU software 3D rasterizer.
//
// Vector/Matrix algebra, color packing for Mono1/Rgb24/Rgba32 buffers,
// homogeneous-space clipping, a perspective-correct scanline rasterizer
// behind a programmable vertex/fragment shader contract, 2D primitives,
// sprite blitting, OBJ loading, and a threaded frame-buffer ring (Surface)
// for pipelining frame production across worker threads.
//---------------------------------------------------------------------------

pub mod clip;
pub mod color;
pub mod container;
pub mod draw2d;
pub mod error;
pub mod font;
pub mod framebuffer;
pub mod matrix;
pub mod mesh;
pub mod objloader;
pub mod raster;
pub mod sprite;
pub mod surface;
pub mod texture;
pub mod vector;

pub use color::{Color, ColorProfile, PixelFormat};
pub use error::RasterError;
pub use font::{Font, DEFAULT_FONT};
pub use framebuffer::{DepthBuffer, FrameBuffer};
pub use matrix::Matrix;
pub use mesh::{Camera, DirectionalLight, Face, Mesh, Vertex};
pub use raster::TriShaderData;
pub use sprite::Sprite;
pub use surface::{Graphics, Surface, SurfaceConfig};
pub use texture::Texture;
pub use vector::Vector;
