//! WebGPU rendering module
//!
//! Scenes turn game state into screen-space triangles; the pipeline uploads
//! and draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Frame, Hud, Scene};
pub use vertex::Vertex;
