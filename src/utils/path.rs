use std::path::{Path, PathBuf};

pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

const OUTPUT_SUFFIX: &str = "_gradient";

/// `<stem>_gradient<suffix>` beside the original.
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let name = match input.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext),
        None => format!("{}{}", stem, OUTPUT_SUFFIX),
    };
    input.with_file_name(name)
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Whether the file looks like one we wrote ourselves.
pub fn is_rendered_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| stem.ends_with(OUTPUT_SUFFIX))
        .unwrap_or(false)
}
