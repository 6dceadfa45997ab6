//! Seeder class and file naming.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::SeedError;

/// A bare PHP class name. Bytes above 0x7f are legal in PHP identifiers.
static CLASS_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*$")
        .expect("class name pattern is valid")
});

/// Uppercases the first character, leaving the rest untouched.
fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derives the seeder class name: `<prefix><TableName>Table<suffix>Seeder`.
///
/// The table name is split on `_` and each word gets an uppercase first letter,
/// so `user_roles` becomes `UserRoles`.
pub fn class_name(table: &str, prefix: Option<&str>, suffix: Option<&str>) -> String {
    let base: String = table.split('_').map(upper_first).collect();
    format!(
        "{}{}Table{}Seeder",
        prefix.unwrap_or_default(),
        base,
        suffix.unwrap_or_default()
    )
}

/// Rejects names that would not parse as a PHP class or could leave the seed directory.
pub fn validate_class_name(class: &str) -> Result<(), SeedError> {
    if CLASS_NAME.is_match(class) {
        Ok(())
    } else {
        Err(SeedError::InvalidClassName(class.to_string()))
    }
}

/// Path of the seeder file for `class` inside `seed_dir`.
pub fn seed_file_path(seed_dir: &Path, class: &str) -> PathBuf {
    seed_dir.join(format!("{class}.php"))
}

/// Name and location of a generated seeder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub class_name: String,
    pub path: PathBuf,
}

impl GeneratedArtifact {
    /// Fails with [`SeedError::InvalidClassName`] when the table name, prefix
    /// or suffix do not combine into a valid class name.
    pub fn resolve(
        seed_dir: &Path,
        table: &str,
        prefix: Option<&str>,
        suffix: Option<&str>,
    ) -> Result<Self, SeedError> {
        let class_name = class_name(table, prefix, suffix);
        validate_class_name(&class_name)?;
        let path = seed_file_path(seed_dir, &class_name);
        Ok(Self { class_name, path })
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
