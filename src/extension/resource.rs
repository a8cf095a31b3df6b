//! Schema resource lookup
//!
//! A [`ResourceLocator`] resolves a resource name (e.g. `/schema.graphqls`) relative to
//! its own root. Directories on disk and compiled-in text are both supported.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

/// Source of named schema resources
pub trait ResourceLocator {
    /// Open the resource for reading
    ///
    /// A missing resource is reported as [`io::ErrorKind::NotFound`].
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>>;
}

fn not_found(name: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("resource {} not found", name),
    )
}

fn trim_root(name: &str) -> &str {
    name.trim_start_matches('/')
}

/// Resource names are always relative to the locator root, a leading `/` included.
/// Names that step outside the root (`..`) are reported as missing.
fn relative_name(name: &str) -> io::Result<&str> {
    let relative = trim_root(name);
    let escapes = Path::new(relative)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(not_found(name));
    }
    Ok(relative)
}

impl ResourceLocator for Path {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let path = self.join(relative_name(name)?);
        match File::open(&path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(not_found(name)),
            Err(e) => Err(e),
        }
    }
}

impl ResourceLocator for PathBuf {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        self.as_path().open(name)
    }
}

impl<L: ResourceLocator + ?Sized> ResourceLocator for &L {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(name)
    }
}

/// Resources compiled into the binary, typically with `include_str!`
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    resources: HashMap<String, &'static str>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, contents: &'static str) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: &str, contents: &'static str) {
        self.resources
            .insert(trim_root(name).to_string(), contents);
    }
}

impl ResourceLocator for EmbeddedResources {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        self.resources
            .get(relative_name(name)?)
            .map(|contents| Box::new(contents.as_bytes()) as Box<dyn Read + '_>)
            .ok_or_else(|| not_found(name))
    }
}
