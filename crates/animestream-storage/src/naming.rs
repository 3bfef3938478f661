//! Naming rules for stored uploads.

use std::path::{Component, Path};

use chrono::{DateTime, Utc};

/// Stem of a generated upload name: `{field}-{unix_millis}`.
///
/// Characters outside `[A-Za-z0-9_-]` in the field name become `_`.
pub fn upload_stem(field: &str, at: DateTime<Utc>) -> String {
    let mut field: String = field
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if field.is_empty() {
        field.push_str("file");
    }
    format!("{field}-{}", at.timestamp_millis())
}

/// Lower-cased extension of the client's filename, with its leading dot.
///
/// Empty when there is no usable extension.
pub fn upload_extension(original_filename: Option<&str>) -> String {
    let Some(name) = original_filename else {
        return String::new();
    };
    // Client names may use either separator.
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match Path::new(base).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => String::new(),
    }
}

/// Whether `path` is a plain relative path that stays inside its root.
pub fn is_safe_relative_path(path: &str) -> bool {
    if path.is_empty() || path.contains('\\') || path.contains('\0') {
        return false;
    }
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}
