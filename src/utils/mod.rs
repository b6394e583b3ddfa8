pub mod text;

pub use text::sanitize_file_stem;
