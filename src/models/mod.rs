//! Domain types shared across storage, scoring, and the API surface.

pub mod assessment;
pub mod draft;
pub mod enums;
pub mod intake;
pub mod recommendation;

pub use assessment::*;
pub use draft::*;
pub use enums::*;
pub use intake::*;
pub use recommendation::*;
