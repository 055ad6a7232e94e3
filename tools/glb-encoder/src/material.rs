//! Flat PBR material attached to a placeholder mesh

use gltf_json as json;

/// Metallic-roughness material without textures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGBA base color
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
}

impl Material {
    /// Light grey-blue, slightly metallic
    pub const PLACEHOLDER: Self = Self {
        base_color: [0.8, 0.8, 0.9, 1.0],
        metallic: 0.3,
        roughness: 0.7,
    };

    pub fn new(base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            base_color,
            metallic,
            roughness,
        }
    }

    pub(crate) fn to_json(self) -> json::Material {
        json::Material {
            pbr_metallic_roughness: json::material::PbrMetallicRoughness {
                base_color_factor: json::material::PbrBaseColorFactor(self.base_color),
                metallic_factor: json::material::StrengthFactor(self.metallic),
                roughness_factor: json::material::StrengthFactor(self.roughness),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_json_factors() {
        let material = Material::new([1.0, 0.0, 0.0, 1.0], 0.25, 0.5).to_json();
        let pbr = &material.pbr_metallic_roughness;
        assert_eq!(pbr.base_color_factor.0, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(pbr.metallic_factor.0, 0.25);
        assert_eq!(pbr.roughness_factor.0, 0.5);
        assert!(pbr.base_color_texture.is_none());
    }

    #[test]
    fn test_default_is_placeholder() {
        assert_eq!(Material::default(), Material::PLACEHOLDER);
    }
}
