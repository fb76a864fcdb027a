//! Resource Paths
//!
//! Everything the labyrinth loads from disk, relative to the working
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AssetError;

pub const PHONG_SHADER: &str = "resources/shaders/phong.wgsl";
pub const LAMP_SHADER: &str = "resources/shaders/lamp.wgsl";

pub const CUBE_MESH: &str = "resources/objects/cube_triangles_vnt.obj";
pub const ORNAMENT_MESH: &str = "resources/objects/ornament_tri_vnt.obj";

pub const TEXTURE_DIR: &str = "resources/textures";
pub const BOX_TEXTURE: &str = "resources/textures/box_rgb888.png";
pub const HEIGHTMAP: &str = "resources/textures/heights.png";
pub const TERRAIN_ATLAS: &str = "resources/textures/tex_256.png";

pub const JUMP_SOUND: &str = "resources/audio/jump_male.wav";

/// Files in the texture directory that are not wall textures.
const NOT_WALLS: [&str; 2] = ["heights.png", "tex_256.png"];

/// Every decodable image in `dir` except the heightmap and terrain atlas,
/// sorted by file name.
pub fn wall_texture_paths(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, AssetError> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| AssetError::io(dir, e))? {
        let entry = entry.map_err(|e| AssetError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let excluded = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| NOT_WALLS.contains(&n));
        if excluded {
            continue;
        }
        if image::ImageFormat::from_path(&path).is_err() {
            log::debug!("Skipping non-image {}", path.display());
            continue;
        }
        paths.push(path);
    }

    if paths.is_empty() {
        return Err(AssetError::EmptyTexturePool(dir.to_path_buf()));
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("labyrinth_assets_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_wall_pool_skips_terrain_images() {
        let dir = scratch_dir("pool");
        for name in ["heights.png", "tex_256.png", "b_wall.png", "a_wall.jpg", "notes.txt"] {
            fs::write(dir.join(name), b"").unwrap();
        }
        fs::create_dir(dir.join("nested.png")).unwrap();

        let paths = wall_texture_paths(&dir).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["a_wall.jpg", "b_wall.png"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_pool_is_an_error() {
        let dir = scratch_dir("empty");
        fs::write(dir.join("heights.png"), b"").unwrap();
        assert!(matches!(
            wall_texture_paths(&dir),
            Err(AssetError::EmptyTexturePool(_))
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let dir = std::env::temp_dir().join("labyrinth_assets_does_not_exist");
        assert!(matches!(wall_texture_paths(&dir), Err(AssetError::Io { .. })));
    }

    #[test]
    fn test_shipped_resources_exist() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        for path in [PHONG_SHADER, LAMP_SHADER, CUBE_MESH, ORNAMENT_MESH, BOX_TEXTURE, HEIGHTMAP, TERRAIN_ATLAS, JUMP_SOUND] {
            assert!(root.join(path).is_file(), "{path} missing");
        }
        assert!(wall_texture_paths(root.join(TEXTURE_DIR)).unwrap().len() >= 2);
    }
}
