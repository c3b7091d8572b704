pub mod history_config;
pub mod track_options;
