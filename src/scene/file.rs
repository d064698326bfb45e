use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::{Rgba8, Vec2};
use crate::foundation::error::{FrostError, FrostResult};
use crate::pipeline::config::CaptureConfig;
use crate::render::buffer::PixelBuffer;
use crate::scene::tree::{NodeId, NodeKind, SurfaceTree};

/// JSON description of a root surface, its layers and the one blur layer on top of them.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub background: Option<Rgba8>,
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
    pub blur: BlurSpec,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSpec {
    pub id: String,
    /// Id of an earlier layer. Defaults to the root surface.
    #[serde(default)]
    pub parent: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub fill: Option<Rgba8>,
    /// Image path, relative to the scene file.
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub opacity: Option<f32>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlurSpec {
    pub id: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub config: CaptureConfig,
}

/// A scene file turned into a live tree.
#[derive(Clone, Debug)]
pub struct LoadedScene {
    pub tree: SurfaceTree,
    pub blur_node: NodeId,
    pub config: CaptureConfig,
    /// Node of every named layer, the blur layer included.
    pub ids: BTreeMap<String, NodeId>,
}

impl SceneFile {
    pub fn from_reader<R: std::io::Read>(r: R) -> FrostResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| FrostError::validation(format!("parse scene JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> FrostResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FrostError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Build the tree. Image paths resolve against `base_dir`.
    pub fn build(&self, base_dir: &Path) -> FrostResult<LoadedScene> {
        if self.width == 0 || self.height == 0 {
            return Err(FrostError::validation(format!(
                "scene surface must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        self.blur.config.validate()?;

        let mut tree = SurfaceTree::new(self.width, self.height, self.background);
        let mut ids = BTreeMap::new();

        for layer in &self.layers {
            let parent = lookup_parent(&tree, &ids, layer.parent.as_deref())?;
            let kind = match (&layer.fill, &layer.image) {
                (Some(_), Some(_)) => {
                    return Err(FrostError::validation(format!(
                        "layer '{}' sets both fill and image",
                        layer.id
                    )));
                }
                (_, Some(rel)) => NodeKind::Image(load_image(&base_dir.join(rel))?),
                (fill, None) => NodeKind::Group { fill: *fill },
            };
            let node = tree.add_node(
                parent,
                kind,
                Vec2::new(layer.x, layer.y),
                layer.width,
                layer.height,
            )?;
            if let Some(opacity) = layer.opacity {
                if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
                    return Err(FrostError::validation(format!(
                        "layer '{}' opacity must be in [0, 1], got {opacity}",
                        layer.id
                    )));
                }
                tree.set_opacity(node, opacity)?;
            }
            insert_id(&mut ids, &layer.id, node)?;
        }

        let parent = lookup_parent(&tree, &ids, self.blur.parent.as_deref())?;
        let blur_node = tree.add_group(
            parent,
            Vec2::new(self.blur.x, self.blur.y),
            self.blur.width,
            self.blur.height,
        )?;
        tree.set_opacity(blur_node, self.blur.config.resting_opacity())?;
        insert_id(&mut ids, &self.blur.id, blur_node)?;

        Ok(LoadedScene {
            tree,
            blur_node,
            config: self.blur.config,
            ids,
        })
    }
}

impl LoadedScene {
    /// Load and build a scene file; image paths are relative to the file's directory.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> FrostResult<Self> {
        let path = path.as_ref();
        let scene = SceneFile::from_path(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        scene.build(base)
    }

    /// Parse and build scene JSON held in memory.
    pub fn from_json(json: &str, base_dir: &Path) -> FrostResult<Self> {
        SceneFile::from_reader(json.as_bytes())?.build(base_dir)
    }

    pub fn node(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }
}

fn lookup_parent(
    tree: &SurfaceTree,
    ids: &BTreeMap<String, NodeId>,
    parent: Option<&str>,
) -> FrostResult<NodeId> {
    match parent {
        None => Ok(tree.root()),
        Some(name) => ids
            .get(name)
            .copied()
            .ok_or_else(|| FrostError::validation(format!("unknown parent layer '{name}'"))),
    }
}

fn insert_id(ids: &mut BTreeMap<String, NodeId>, id: &str, node: NodeId) -> FrostResult<()> {
    if ids.insert(id.to_owned(), node).is_some() {
        return Err(FrostError::validation(format!("duplicate layer id '{id}'")));
    }
    Ok(())
}

fn load_image(path: &Path) -> FrostResult<PixelBuffer> {
    let img = image::open(path)
        .with_context(|| format!("decode image '{}'", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    PixelBuffer::from_straight_rgba8(width, height, img.as_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/file.rs"]
mod tests;
