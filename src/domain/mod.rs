pub mod device;
pub mod image;
