//! Named filters: resolving a filter name to a color grid.
//!
//! The pipeline only needs [`FilterRegistry::resolve`]. [`FilterLibrary`]
//! is the in-process implementation, filled from `.cube` files, JSON
//! manifests or grids built in code.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};
use crate::transform::lut::ColorGrid;

/// Reserved name that always selects bypass.
pub const BYPASS_FILTER: &str = "None";

/// A filter offered by the camera UI: internal name and display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterInfo {
    pub name: &'static str,
    pub label: &'static str,
}

/// The stock filter catalog, in menu order.
pub const BUILTIN_FILTERS: &[FilterInfo] = &[
    FilterInfo { name: BYPASS_FILTER, label: "None" },
    FilterInfo { name: "Blue Architecture", label: "Blue Arch" },
    FilterInfo { name: "HardBoost", label: "Hard Boost" },
    FilterInfo { name: "LongBeachMorning", label: "Morning" },
    FilterInfo { name: "LushGreen", label: "Lush Green" },
    FilterInfo { name: "MagicHour", label: "Magic Hour" },
    FilterInfo { name: "NaturalBoost", label: "Natural" },
    FilterInfo { name: "OrangeAndBlue", label: "Orange/Blue" },
    FilterInfo { name: "SoftBlackAndWhite", label: "B&W Soft" },
    FilterInfo { name: "Waves", label: "Waves" },
    FilterInfo { name: "BlueHour", label: "Blue Hour" },
    FilterInfo { name: "ColdChrome", label: "Cold Chrome" },
    FilterInfo { name: "CrispAutumn", label: "Autumn" },
    FilterInfo { name: "DarkAndSomber", label: "Somber" },
];

/// What a filter name resolves to.
#[derive(Debug, Clone, Default)]
pub enum FilterSelection {
    /// Colors pass through unchanged.
    #[default]
    Bypass,
    /// Colors are graded through a shared grid.
    Grid(Arc<ColorGrid>),
}

impl FilterSelection {
    pub fn grid(&self) -> Option<&ColorGrid> {
        match self {
            Self::Bypass => None,
            Self::Grid(grid) => Some(&**grid),
        }
    }
}

/// Resolves filter names for the control plane.
pub trait FilterRegistry {
    /// The selection for `name`, or `None` when the name is not known.
    fn resolve(&self, name: &str) -> Option<FilterSelection>;
}

/// One entry of a filter manifest file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    /// `.cube` path, relative to the manifest's directory unless absolute.
    pub path: String,
}

/// A JSON list of filters to load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterManifest {
    pub filters: Vec<ManifestEntry>,
}

struct LibraryEntry {
    label: String,
    grid: Arc<ColorGrid>,
}

/// Thread-safe map from filter names to grids.
#[derive(Default)]
pub struct FilterLibrary {
    entries: RwLock<HashMap<String, LibraryEntry>>,
}

impl FilterLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `grid` under `name`, replacing any previous grid.
    pub fn register(&self, name: &str, label: &str, grid: ColorGrid) -> FilterResult<Arc<ColorGrid>> {
        if name == BYPASS_FILTER {
            return Err(FilterError::ReservedName(name.to_string()));
        }
        let grid = Arc::new(grid);
        let previous = self.entries.write().insert(
            name.to_string(),
            LibraryEntry {
                label: label.to_string(),
                grid: Arc::clone(&grid),
            },
        );
        if previous.is_some() {
            tracing::debug!(filter = name, "replaced filter");
        }
        Ok(grid)
    }

    /// Remove `name`. Frames already holding its grid keep using it.
    pub fn unregister(&self, name: &str) -> FilterResult<()> {
        self.entries
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        name == BYPASS_FILTER || self.entries.read().contains_key(name)
    }

    /// Registered names, sorted. The bypass name is not included.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Display label for `name`.
    pub fn label(&self, name: &str) -> Option<String> {
        if name == BYPASS_FILTER {
            return Some(BYPASS_FILTER.to_string());
        }
        self.entries.read().get(name).map(|e| e.label.clone())
    }

    /// Load a `.cube` file and register it under `name`.
    ///
    /// The label comes from the built-in catalog when `name` is listed there.
    pub fn load_cube(&self, name: &str, path: &Path) -> FilterResult<Arc<ColorGrid>> {
        self.load_labeled(name, builtin_label(name).unwrap_or(name), path)
    }

    fn load_labeled(&self, name: &str, label: &str, path: &Path) -> FilterResult<Arc<ColorGrid>> {
        let grid = ColorGrid::load_cube(path).map_err(|source| FilterError::Asset {
            name: name.to_string(),
            source,
        })?;
        tracing::info!(filter = name, path = %path.display(), "loaded filter");
        self.register(name, label, grid)
    }

    /// Load every filter listed in a JSON manifest. Returns how many were
    /// registered; stops at the first failure.
    pub fn load_manifest(&self, path: &Path) -> FilterResult<usize> {
        let text = fs::read_to_string(path).map_err(|source| FilterError::ManifestIo {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: FilterManifest =
            serde_json::from_str(&text).map_err(|source| FilterError::ManifestFormat {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for entry in &manifest.filters {
            let label = entry
                .label
                .as_deref()
                .or_else(|| builtin_label(&entry.name))
                .unwrap_or(&entry.name);
            self.load_labeled(&entry.name, label, &base.join(&entry.path))?;
        }
        Ok(manifest.filters.len())
    }
}

impl FilterRegistry for FilterLibrary {
    fn resolve(&self, name: &str) -> Option<FilterSelection> {
        if name == BYPASS_FILTER {
            return Some(FilterSelection::Bypass);
        }
        self.entries
            .read()
            .get(name)
            .map(|e| FilterSelection::Grid(Arc::clone(&e.grid)))
    }
}

impl<T: FilterRegistry + ?Sized> FilterRegistry for Arc<T> {
    fn resolve(&self, name: &str) -> Option<FilterSelection> {
        (**self).resolve(name)
    }
}

/// Display label of a built-in filter.
pub fn builtin_label(name: &str) -> Option<&'static str> {
    BUILTIN_FILTERS.iter().find(|f| f.name == name).map(|f| f.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bypass_always_resolves() {
        let library = FilterLibrary::new();
        assert!(matches!(library.resolve(BYPASS_FILTER), Some(FilterSelection::Bypass)));
        assert!(library.contains(BYPASS_FILTER));
        assert!(library.resolve("Waves").is_none());
    }

    #[test]
    fn test_bypass_name_is_reserved() {
        let library = FilterLibrary::new();
        let err = library.register(BYPASS_FILTER, "x", ColorGrid::identity()).unwrap_err();
        assert!(matches!(err, FilterError::ReservedName(_)));
    }

    #[test]
    fn test_register_and_resolve_share_grid() {
        let library = FilterLibrary::new();
        let grid = library.register("Waves", "Waves", ColorGrid::identity()).unwrap();
        let Some(FilterSelection::Grid(resolved)) = library.resolve("Waves") else {
            panic!("expected a grid");
        };
        assert!(Arc::ptr_eq(&grid, &resolved));
        assert_eq!(library.names(), vec!["Waves".to_string()]);
    }

    #[test]
    fn test_unregister() {
        let library = FilterLibrary::new();
        library.register("A", "A", ColorGrid::identity()).unwrap();
        library.unregister("A").unwrap();
        assert!(!library.contains("A"));
        assert!(matches!(library.unregister("A"), Err(FilterError::UnknownFilter(_))));
    }

    #[test]
    fn test_builtin_catalog() {
        assert_eq!(BUILTIN_FILTERS.len(), 14);
        assert_eq!(BUILTIN_FILTERS[0].name, BYPASS_FILTER);
        assert_eq!(builtin_label("SoftBlackAndWhite"), Some("B&W Soft"));
        assert_eq!(builtin_label("Unlisted"), None);
    }

    #[test]
    fn test_load_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let grid = ColorGrid::from_fn(|[r, g, b]| [b, g, r]);
        grid.save_cube(&dir.path().join("swap.cube"), None).unwrap();
        ColorGrid::identity()
            .save_cube(&dir.path().join("waves.cube"), None)
            .unwrap();

        let manifest = r#"{
            "filters": [
                { "name": "Swap", "label": "Swap R/B", "path": "swap.cube" },
                { "name": "Waves", "path": "waves.cube" }
            ]
        }"#;
        let manifest_path = dir.path().join("filters.json");
        fs::write(&manifest_path, manifest).unwrap();

        let library = FilterLibrary::new();
        assert_eq!(library.load_manifest(&manifest_path).unwrap(), 2);
        assert_eq!(library.label("Swap").as_deref(), Some("Swap R/B"));
        assert_eq!(library.label("Waves").as_deref(), Some("Waves"));
        assert_eq!(library.names(), vec!["Swap".to_string(), "Waves".to_string()]);
    }

    #[test]
    fn test_manifest_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("filters.json");
        fs::write(&manifest_path, r#"{"filters":[{"name":"Gone","path":"gone.cube"}]}"#).unwrap();
        let err = FilterLibrary::new().load_manifest(&manifest_path).unwrap_err();
        assert!(matches!(err, FilterError::Asset { .. }));
    }

    #[test]
    fn test_manifest_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("filters.json");
        fs::write(&manifest_path, "{ not json").unwrap();
        let err = FilterLibrary::new().load_manifest(&manifest_path).unwrap_err();
        assert!(matches!(err, FilterError::ManifestFormat { .. }));
    }
}
