pub mod actor;
pub mod diff;
pub mod document;
pub mod mutation;
pub mod record;
