pub mod path;
pub mod status;
