//! Canvas model, controller and replay renderer for the shared drawing board.
//!
//! This crate compiles both natively and to WebAssembly. It owns everything
//! that happens between a pointer event and pixels: translating DOM pointer
//! positions into canvas coordinates, building the pending stroke, the
//! controller's `Idle → Drawing → Submitting → Refreshing` state machine, the
//! per-session stroke registry, and redrawing the whole history. Network
//! persistence lives in the `client` crate; this crate only emits
//! [`engine::Action::Submit`] and accepts [`doc::StrokeBatch`]es back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Browser `Engine` and testable [`engine::EngineCore`] |
//! | [`doc`] | Stroke type, wire encoding, and the session registry |
//! | [`viewport`] | Client-to-canvas coordinate transform |
//! | [`input`] | Pen, author filter, and the controller state machine |
//! | [`render`] | Replay planning and author derivation |
//! | [`surface`] | The `Surface` drawing seam and its Canvas2D implementation |
//! | [`svg`] | SVG text surface |
//! | [`consts`] | Canvas size, pen limits, opacities |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod input;
pub mod render;
pub mod surface;
pub mod svg;
pub mod viewport;
