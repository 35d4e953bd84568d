//! Data models for Expofloor

mod booking;
mod exhibition;
mod geometry;
mod hall;
mod space;
mod stall;

pub use booking::*;
pub use exhibition::*;
pub use geometry::*;
pub use hall::*;
pub use space::*;
pub use stall::*;
