use serde::{Deserialize, Serialize};

use super::errors::{EngineError, EngineResult};

/// Class indices are stored as `u8`, so a palette can never hold more.
pub const MAX_CLASSES: usize = 256;

/// Stable index of a palette class.
///
/// Only a `Palette` hands these out, so every `ClassId` in circulation is
/// valid for the palette the engine was built with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u8);

impl ClassId {
    /// First palette entry; also where unknown identifiers end up.
    pub const FIRST: ClassId = ClassId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn raw(self) -> u8 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub rgb: [u8; 3],
}

impl PaletteEntry {
    pub fn new(name: &str, rgb: [u8; 3]) -> Self {
        Self { name: name.to_string(), rgb }
    }
}

/// Fixed set of particle classes. Built once at startup, never remapped.
#[derive(Clone, Debug)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

#[derive(Serialize)]
struct PaletteManifest<'a> {
    format_version: u32,
    classes: Vec<PaletteManifestClass<'a>>,
}

#[derive(Serialize)]
struct PaletteManifestClass<'a> {
    id: u8,
    name: &'a str,
    rgb: [u8; 3],
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> EngineResult<Self> {
        if entries.is_empty() {
            return Err(EngineError::InvalidConfig("palette must not be empty".to_string()));
        }
        if entries.len() > MAX_CLASSES {
            return Err(EngineError::InvalidConfig(format!(
                "palette has {} classes, at most {} fit u8 ids",
                entries.len(),
                MAX_CLASSES
            )));
        }
        Ok(Self { entries })
    }

    pub fn default_entries() -> Vec<PaletteEntry> {
        vec![
            PaletteEntry::new("Red", [255, 64, 64]),
            PaletteEntry::new("Orange", [255, 150, 40]),
            PaletteEntry::new("Yellow", [255, 230, 60]),
            PaletteEntry::new("Green", [70, 230, 100]),
            PaletteEntry::new("Blue", [60, 130, 255]),
            PaletteEntry::new("Purple", [180, 90, 255]),
        ]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed palette.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn entry(&self, class: ClassId) -> &PaletteEntry {
        &self.entries[class.index()]
    }

    /// All classes in palette order.
    pub fn ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.entries.len()).map(|i| ClassId(i as u8))
    }

    pub fn try_resolve(&self, raw: u32) -> Option<ClassId> {
        if (raw as usize) < self.entries.len() {
            Some(ClassId(raw as u8))
        } else {
            None
        }
    }

    /// Map a host-supplied identifier to a class; unknown ids become the first entry.
    pub fn resolve(&self, raw: u32) -> ClassId {
        self.try_resolve(raw).unwrap_or(ClassId::FIRST)
    }

    pub fn id_by_name(&self, name: &str) -> Option<ClassId> {
        self.entries
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
            .map(|i| ClassId(i as u8))
    }

    /// Flat `[r, g, b, r, g, b, ...]` in `0..=1` for shader uniforms.
    pub fn rgb_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.entries.len() * 3);
        for e in &self.entries {
            out.extend(e.rgb.iter().map(|&c| c as f32 / 255.0));
        }
        out
    }

    pub fn manifest_json(&self) -> String {
        let out = PaletteManifest {
            format_version: 1,
            classes: self
                .entries
                .iter()
                .enumerate()
                .map(|(i, e)| PaletteManifestClass { id: i as u8, name: &e.name, rgb: e.rgb })
                .collect(),
        };
        serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self { entries: Self::default_entries() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_resolve_to_first_class() {
        let palette = Palette::default();
        assert_eq!(palette.resolve(4), palette.id_by_name("blue").unwrap());
        assert_eq!(palette.resolve(6), ClassId::FIRST);
        assert_eq!(palette.resolve(u32::MAX), ClassId::FIRST);
        assert_eq!(palette.try_resolve(6), None);
    }

    #[test]
    fn rejects_empty_and_oversized_palettes() {
        assert!(Palette::new(Vec::new()).is_err());
        let big = (0..257).map(|i| PaletteEntry::new(&i.to_string(), [0, 0, 0])).collect();
        assert!(Palette::new(big).is_err());
        let full = (0..256).map(|i| PaletteEntry::new(&i.to_string(), [0, 0, 0])).collect();
        assert_eq!(Palette::new(full).unwrap().len(), 256);
    }

    #[test]
    fn rgb_flat_is_normalized() {
        let palette = Palette::new(vec![PaletteEntry::new("White", [255, 0, 51])]).unwrap();
        assert_eq!(palette.rgb_flat(), vec![1.0, 0.0, 0.2]);
    }

    #[test]
    fn manifest_lists_classes_in_order() {
        let json = Palette::default().manifest_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["format_version"], 1);
        assert_eq!(value["classes"][4]["name"], "Blue");
        assert_eq!(value["classes"].as_array().unwrap().len(), 6);
    }
}
