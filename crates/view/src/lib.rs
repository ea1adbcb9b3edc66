//! Per-route view lifecycle for the Atlas viewer.
//!
//! A [`ViewController`] is built for every navigation from a [`MatchedRoute`].
//! The host awaits [`ViewController::hiding`] on the outgoing controller, then
//! [`ViewController::showing`] and [`ViewController::init_scene`] on the incoming
//! one. [`Navigator`] performs that sequence.

pub mod controller;
pub mod error;
pub mod host;
pub mod navigator;
pub mod route;
pub mod world;

#[cfg(test)]
mod testing;

pub use controller::*;
pub use error::*;
pub use host::*;
pub use navigator::*;
pub use route::*;
pub use world::*;
