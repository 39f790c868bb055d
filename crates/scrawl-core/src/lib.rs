//! Scrawl Core Types and Definitions
//!
//! This crate provides the value types shared by the reconstruction engine
//! and the renderer:
//!
//! - **Cells**: Character-grid coordinates ([`cell::Cell`])
//! - **Geometry**: Pixel-space points, bounds and cell metrics ([`geometry`] module)
//! - **Colors**: CSS colours and colour-code conversion ([`color::Color`])
//! - **Shapes**: Recovered polygons and polylines ([`shape`] module)
//! - **Diagram**: Shapes plus text labels ([`diagram::Diagram`])
//! - **Strokes**: Outline styling for rendering ([`stroke`] module)

pub mod cell;
pub mod color;
pub mod diagram;
pub mod geometry;
pub mod shape;
pub mod stroke;
