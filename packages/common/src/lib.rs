pub mod image;
pub mod storage;

pub use image::ImageFormat;
