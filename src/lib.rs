//! Compiles vector scenes into PDC, the draw command container read by
//! small embedded displays.
//!
//! The core (colors, coordinates, commands and the binary container) is
//! `no_std`. Walking SVG documents and assembling frame sets from the file
//! system need the default `std` feature.

#![no_std]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod color;
pub mod coords;
pub mod command;
pub mod error;
pub mod format;
pub mod options;

#[cfg(feature = "std")]
pub mod scene;
#[cfg(feature = "std")]
pub mod walker;
#[cfg(feature = "std")]
pub mod svg;
#[cfg(feature = "std")]
pub mod assembler;


pub type Float = f32;
pub type Couple = vek::vec::Vec2<Float>;
pub type Point = vek::vec::Vec2<i16>;
pub const C_ZERO: Couple = Couple::new(0.0, 0.0);

#[doc(inline)]
pub use {
    command::Command,
    command::Style,
    error::ElementError,
    format::Frame,
    format::Image,
    format::Sequence,
    options::Options,
};

#[cfg(feature = "std")]
#[doc(inline)]
pub use {
    assembler::Job,
    error::SourceError,
    scene::Element,
    walker::walk,
};
