pub mod data;
pub mod f64;
pub mod io;
pub mod resize;
pub mod traits;

pub use self::data::ImageData;
pub use self::f64::ImageF64;
pub use self::resize::{resize_plane, Interpolation};
pub use self::traits::{ImageView, ImageViewMut};
