//! WebGPU rendering module
//!
//! Instanced unlit sphere rasterization with linear fog and a ground grid.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
