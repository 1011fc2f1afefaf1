//! Test utilities for docstencil
//!
//! This crate provides shared fixtures and helpers used across the docstencil workspace.

use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// Keeping test scratch space in one gitignored location makes stray
/// files easy to spot and clean up.
///
/// # Returns
///
/// A `TempDir` at `.tmp/<random-name>` relative to the project root,
/// removed automatically on drop.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or either
/// directory cannot be created.
///
/// # Examples
///
/// ```rust
/// use docstencil_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("picture.png");
/// std::fs::write(&file_path, b"not really a png").unwrap();
/// // Cleanup happens automatically when temp is dropped
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    let workspace_root = std::env::current_dir().expect("Failed to get current directory");

    let tmp_base = workspace_root.join(".tmp");

    // Ensure .tmp/ exists
    std::fs::create_dir_all(&tmp_base).expect("Failed to create .tmp directory");

    // Create unique subdirectory within .tmp/
    TempDir::new_in(&tmp_base).expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
///
/// Use this variant when you need proper error handling instead of panics.
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Customer record with nested fields, a list and scalars of every shape.
///
/// Mirrors the kind of payload an invoicing integration would feed the engine.
pub const CUSTOMER_JSON: &str = r#"{
  "name": "Antonia Rivera",
  "address": { "street": "Elm street", "number": 23, "city": "Novigrad" },
  "phones": ["555-0100", "555-0199"],
  "balance": 1234.5,
  "vip": true,
  "note": null
}"#;

/// Flags and numbers for conditional tests.
pub const CONDITION_FLAGS_JSON: &str = r#"{
  "enabled1": false,
  "enabled2": true,
  "enabled3": "true",
  "count": 1,
  "threshold": 5
}"#;

/// Two-level repeating structure: regions, each with a list of streets.
pub const REGIONS_JSON: &str = r#"{
  "company": "Aurora Logistics",
  "regions": [
    { "name": "North", "streets": ["Harbor way", "Mill road"] },
    { "name": "South", "streets": ["Vine lane", "Quarry pass"] }
  ]
}"#;

/// A few recognizable bytes standing in for image data.
///
/// Tests only care that the exact bytes land in the picture control, so a
/// real encoded image is unnecessary.
pub const PIXEL_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Writes `PIXEL_BYTES` into `dir` under `name` and returns the full path as a string.
///
/// # Panics
///
/// Panics if the file cannot be written or the path is not valid UTF-8.
pub fn write_pixel_file(dir: &std::path::Path, name: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, PIXEL_BYTES).expect("Failed to write pixel fixture");
    path.to_str()
        .expect("Fixture path should be valid UTF-8")
        .to_string()
}
