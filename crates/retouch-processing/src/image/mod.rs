//! Image processing module
//!
//! Pixel-level operations built on the `image`/`imageproc` crates, and the
//! transformer that chains them in the service's fixed order.

pub mod filters;
pub mod orientation;
pub mod resize;
pub mod transformer;

pub use filters::ImageFilters;
pub use orientation::ImageOrientation;
pub use resize::ImageResize;
pub use transformer::ImageTransformer;
