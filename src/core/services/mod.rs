pub mod classifier;
pub mod diff_service;
pub mod engine;
pub mod naming;
pub mod pre_image;
pub mod record_builder;
