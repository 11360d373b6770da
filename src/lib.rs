//! Interactive solar-system viewer.
//!
//! The keyboard camera controls in [`controls`] are independent of the GPU and
//! operate on any [`controls::CameraRig`]; [`renderer`] supplies the orbit
//! camera and draws the [`scene`].

pub mod catalog;
pub mod controls;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod ui;
