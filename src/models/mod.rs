mod content;
mod group;
mod outcome;

pub use content::*;
pub use group::*;
pub use outcome::*;
