pub mod images_api;
