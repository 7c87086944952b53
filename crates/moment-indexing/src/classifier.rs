//! File classification by extension.

/// Extensions (lower case) of the files that get indexed.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "png", "jpeg", "gif"];

/// Outcome of classifying a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Indexable,
    Skip,
}

/// Classify a file name by the text after its last `.`.
pub fn classify(file_name: &str) -> Classification {
    if is_indexable(file_name) {
        Classification::Indexable
    } else {
        Classification::Skip
    }
}

/// True if the lower-cased extension is an image extension.
///
/// Names without a `.` are never indexable.
pub fn is_indexable(file_name: &str) -> bool {
    let Some(dot) = file_name.rfind('.') else {
        return false;
    };
    let extension = file_name[dot + 1..].to_lowercase();
    IMAGE_EXTENSIONS.contains(&extension.as_str())
}
