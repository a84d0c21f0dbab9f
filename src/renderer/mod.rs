//! WebGPU rendering module
//!
//! The scene is flattened into a colored triangle list each frame.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, scene_to_ndc, screen_to_scene};
pub use scene::build_scene;
pub use vertex::Vertex;
