pub mod json_sink;
pub mod memory_sink;
