pub mod source;

pub use source::StopSource;
