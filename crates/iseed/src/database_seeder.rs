//! Maintenance of the project's `DatabaseSeeder.php`.
//!
//! Generated seeders are registered as `$this->call(<Class>::class);` lines,
//! either between the `#iseed_start` / `#iseed_end` markers or, without
//! markers, at the end of `run()`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, info};

use crate::errors::SeedError;
use crate::export::INDENT;

pub const DATABASE_SEEDER_FILE: &str = "DatabaseSeeder.php";
pub const SECTION_START: &str = "#iseed_start";
pub const SECTION_END: &str = "#iseed_end";

static MARKED_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(#iseed_start.+?)(#iseed_end)").expect("section pattern is valid")
});

static RUN_BODY_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(run\(\).+?)\}").expect("run body pattern is valid")
});

fn call_line(class: &str) -> String {
    format!("$this->call({class}::class);")
}

fn has_marked_section(content: &str) -> bool {
    match (content.find(SECTION_START), content.find(SECTION_END)) {
        (Some(start), Some(end)) => start < end,
        _ => false,
    }
}

/// Adds a call to `class` unless one is already present.
pub fn register_call(content: &str, class: &str) -> String {
    if content.contains(&format!("$this->call({class}::class)")) {
        return content.to_string();
    }

    let call = call_line(class);
    if has_marked_section(content) {
        MARKED_SECTION
            .replacen(content, 1, |caps: &Captures| {
                format!("{}{call}\n{INDENT}{INDENT}{}", &caps[1], &caps[2])
            })
            .into_owned()
    } else {
        RUN_BODY_END
            .replacen(content, 1, |caps: &Captures| {
                format!("{}{INDENT}{call}\n{INDENT}}}", &caps[1])
            })
            .into_owned()
    }
}

/// Drops every line between the section markers, keeping the markers.
pub fn clean_section(content: &str) -> String {
    if !has_marked_section(content) {
        return content.to_string();
    }

    let mut inside = false;
    let mut kept = Vec::new();
    for line in content.split('\n') {
        if line.contains(SECTION_START) {
            inside = true;
            kept.push(line);
        } else if line.contains(SECTION_END) {
            inside = false;
            kept.push(line);
        } else if !inside {
            kept.push(line);
        }
    }
    kept.join("\n")
}

/// `DatabaseSeeder.php` inside a seed directory.
#[derive(Debug, Clone)]
pub struct DatabaseSeeder {
    path: PathBuf,
}

impl DatabaseSeeder {
    pub fn new(seed_dir: &Path) -> Self {
        Self {
            path: seed_dir.join(DATABASE_SEEDER_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read(&self) -> Result<String, SeedError> {
        std::fs::read_to_string(&self.path).map_err(|e| SeedError::io(&self.path, e))
    }

    fn write(&self, content: &str) -> Result<(), SeedError> {
        std::fs::write(&self.path, content).map_err(|e| SeedError::io(&self.path, e))
    }

    /// Registers `class` in the run method. Returns whether the file changed.
    pub fn register(&self, class: &str) -> Result<bool, SeedError> {
        let content = self.read()?;
        let updated = register_call(&content, class);
        if updated == content {
            debug!("{class} already registered in {}", self.path.display());
            return Ok(false);
        }
        self.write(&updated)?;
        info!("Registered {class} in {}", self.path.display());
        Ok(true)
    }

    /// Empties the generated section. Returns whether the file changed.
    pub fn clean(&self) -> Result<bool, SeedError> {
        let content = self.read()?;
        let cleaned = clean_section(&content);
        if cleaned == content {
            return Ok(false);
        }
        self.write(&cleaned)?;
        info!("Cleaned generated section of {}", self.path.display());
        Ok(true)
    }
}
