pub mod gallery;
pub mod signing;
