//! Manifest parsing and build orchestration
//!
//! Parses placeholders.toml and encodes every listed GLB.

use anyhow::{Context, Result, bail};
use glb_encoder::{Material, MeshInput, write_glb};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub meshes: BTreeMap<String, MeshEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public/models")
}

/// Literal mesh tables and the files they are written to
#[derive(Debug, Deserialize)]
pub struct MeshEntry {
    /// Output file names; `<name>.glb` when empty
    #[serde(default)]
    pub files: Vec<PathBuf>,
    pub positions: Vec<f32>,
    #[serde(default)]
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    #[serde(default)]
    pub material: Option<MaterialEntry>,
}

/// Material overrides; missing fields use the placeholder material
#[derive(Debug, Deserialize)]
pub struct MaterialEntry {
    #[serde(default = "default_base_color")]
    pub base_color: [f32; 4],
    #[serde(default = "default_metallic")]
    pub metallic: f32,
    #[serde(default = "default_roughness")]
    pub roughness: f32,
}

fn default_base_color() -> [f32; 4] {
    Material::PLACEHOLDER.base_color
}

fn default_metallic() -> f32 {
    Material::PLACEHOLDER.metallic
}

fn default_roughness() -> f32 {
    Material::PLACEHOLDER.roughness
}

impl From<&MaterialEntry> for Material {
    fn from(entry: &MaterialEntry) -> Self {
        Material::new(entry.base_color, entry.metallic, entry.roughness)
    }
}

impl MeshEntry {
    /// Encoder input borrowing this entry's tables
    pub fn input<'a>(&'a self, name: &'a str) -> MeshInput<'a> {
        let input = MeshInput::new(name, &self.positions, &self.indices).with_normals(&self.normals);
        match &self.material {
            Some(material) => input.with_material(material.into()),
            None => input,
        }
    }

    pub fn output_files(&self, name: &str) -> Vec<PathBuf> {
        if self.files.is_empty() {
            vec![PathBuf::from(format!("{name}.glb"))]
        } else {
            self.files.clone()
        }
    }
}

/// A GLB written by [`build_all`]
#[derive(Debug, Clone)]
pub struct BuiltFile {
    pub mesh: String,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Load and parse manifest
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    parse_manifest(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))
}

pub fn parse_manifest(content: &str) -> Result<Manifest> {
    Ok(toml::from_str(content)?)
}

/// Validate every mesh and check that no two meshes write the same file
pub fn validate(manifest: &Manifest) -> Result<()> {
    if manifest.meshes.is_empty() {
        tracing::warn!("Manifest lists no meshes");
    }

    let mut owners: HashMap<PathBuf, &str> = HashMap::new();
    for (name, entry) in &manifest.meshes {
        entry
            .input(name)
            .validate()
            .with_context(|| format!("Invalid mesh '{}'", name))?;

        for file in entry.output_files(name) {
            let inside_output_dir = file.components().next().is_some()
                && file.components().all(|c| matches!(c, Component::Normal(_)));
            if !inside_output_dir {
                bail!(
                    "Output {:?} of mesh '{}' must be a relative path inside the output directory",
                    file,
                    name
                );
            }
            if let Some(other) = owners.insert(file.clone(), name) {
                bail!(
                    "Output {:?} is listed by both '{}' and '{}'",
                    file,
                    other,
                    name
                );
            }
        }

        tracing::debug!(
            mesh = %name,
            vertices = entry.positions.len() / 3,
            triangles = entry.indices.len() / 3,
            "mesh ok"
        );
    }

    Ok(())
}

/// Encode every file in the manifest
///
/// Creates the output directory first, then encodes files in parallel.
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<Vec<BuiltFile>> {
    validate(manifest)?;

    let output_dir = output_override.unwrap_or(&manifest.output.dir);
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let jobs: Vec<(&str, &MeshEntry, PathBuf)> = manifest
        .meshes
        .iter()
        .flat_map(|(name, entry)| {
            entry
                .output_files(name)
                .into_iter()
                .map(move |file| (name.as_str(), entry, output_dir.join(file)))
        })
        .collect();

    jobs.par_iter()
        .map(|(name, entry, path)| -> Result<BuiltFile> {
            let bytes = write_glb(&entry.input(name), path)
                .with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Generated: {} ({} bytes)", path.display(), bytes);
            Ok(BuiltFile {
                mesh: name.to_string(),
                path: path.clone(),
                bytes,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TRIANGLE_MANIFEST: &str = r#"
        [meshes.triangle]
        positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        indices = [0, 1, 2]
    "#;

    #[test]
    fn test_defaults() {
        let manifest = parse_manifest(TRIANGLE_MANIFEST).unwrap();
        assert_eq!(manifest.output.dir, PathBuf::from("public/models"));

        let entry = &manifest.meshes["triangle"];
        assert!(entry.normals.is_empty());
        assert!(entry.material.is_none());
        assert_eq!(
            entry.output_files("triangle"),
            vec![PathBuf::from("triangle.glb")]
        );
    }

    #[test]
    fn test_partial_material_uses_placeholder_fields() {
        let manifest = parse_manifest(
            r#"
            [meshes.red]
            positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
            indices = [0, 1, 2]
            material = { base_color = [1.0, 0.0, 0.0, 1.0] }
            "#,
        )
        .unwrap();

        let material = Material::from(manifest.meshes["red"].material.as_ref().unwrap());
        assert_eq!(material.base_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(material.metallic, Material::PLACEHOLDER.metallic);
        assert_eq!(material.roughness, Material::PLACEHOLDER.roughness);
    }

    #[test]
    fn test_validate_names_bad_mesh() {
        let manifest = parse_manifest(
            r#"
            [meshes.broken]
            positions = [0.0, 0.0, 0.0]
            indices = [0, 0, 70000]
            "#,
        )
        .unwrap();

        let err = validate(&manifest).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid mesh 'broken'"));
        assert!(err.downcast_ref::<glb_encoder::EncodeError>().is_some());
    }

    #[test]
    fn test_validate_rejects_duplicate_outputs() {
        let manifest = parse_manifest(
            r#"
            [meshes.a]
            files = ["same.glb"]
            positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
            indices = [0, 1, 2]

            [meshes.b]
            files = ["same.glb"]
            positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
            indices = [0, 1, 2]
            "#,
        )
        .unwrap();

        let err = validate(&manifest).unwrap_err();
        assert!(err.to_string().contains("same.glb"));
    }

    #[test]
    fn test_validate_rejects_escaping_outputs() {
        for file in ["../escape.glb", "/tmp/absolute.glb", "nested/../../up.glb", "./"] {
            let manifest = parse_manifest(&format!(
                r#"
                [meshes.a]
                files = [{:?}]
                positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
                indices = [0, 1, 2]
                "#,
                file
            ))
            .unwrap();

            let err = validate(&manifest).unwrap_err();
            assert!(
                err.to_string().contains("relative path inside the output directory"),
                "{file}: {err}"
            );
        }
    }

    #[test]
    fn test_build_all_writes_nothing_outside_output_dir() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("models");
        let manifest = parse_manifest(
            r#"
            [meshes.a]
            files = ["../escape.glb"]
            positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
            indices = [0, 1, 2]
            "#,
        )
        .unwrap();

        assert!(build_all(&manifest, Some(&output)).is_err());
        assert!(!dir.path().join("escape.glb").exists());
        assert!(!output.exists());
    }

    #[test]
    fn test_build_all_creates_output_dir() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("nested").join("models");
        let manifest = parse_manifest(TRIANGLE_MANIFEST).unwrap();

        let built = build_all(&manifest, Some(&output)).unwrap();

        assert_eq!(built.len(), 1);
        assert_eq!(built[0].mesh, "triangle");
        assert_eq!(built[0].path, output.join("triangle.glb"));
        let on_disk = fs::metadata(&built[0].path).unwrap().len();
        assert_eq!(on_disk, built[0].bytes as u64);
    }

    #[test]
    fn test_build_all_writes_nothing_for_invalid_manifest() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("models");
        let manifest = parse_manifest(
            r#"
            [meshes.broken]
            positions = [0.0, 0.0]
            indices = [0, 1, 2]
            "#,
        )
        .unwrap();

        assert!(build_all(&manifest, Some(&output)).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_load_manifest_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_manifest(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read manifest"));
    }
}
