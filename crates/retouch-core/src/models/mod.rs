//! Wire models shared between the API crate and the services.

mod media;
mod transformations;

pub use media::*;
pub use transformations::*;
