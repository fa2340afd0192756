pub mod drafts;
pub mod autosave;
pub mod submit;

pub use drafts::*;
pub use autosave::*;
pub use submit::*;
