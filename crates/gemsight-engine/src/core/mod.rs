pub use self::{color::*, geometry::*, grid::*};

pub(crate) mod color;
pub(crate) mod geometry;
pub(crate) mod grid;
