use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    #[default]
    F32,
    U8,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Sphere,
    Torus,
    Gyroid,
    Noise,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct VolumeCfg {
    pub dims: [usize; 3],
    pub pitch: [f32; 3],
    pub sample: SampleKind,
    /// Field values in `[-quantize_range, quantize_range]` map onto `0..=255` for `u8`.
    pub quantize_range: f32,
}

impl Default for VolumeCfg {
    fn default() -> Self {
        Self {
            dims: [48, 48, 48],
            pitch: [1.0, 1.0, 1.0],
            sample: SampleKind::F32,
            quantize_range: 8.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldCfg {
    pub kind: FieldKind,
    pub radius: f32,
    pub minor_radius: f32,
    pub period: f32,
    pub seed: i32,
    pub frequency: f32,
    pub amplitude: f32,
}

impl Default for FieldCfg {
    fn default() -> Self {
        Self {
            kind: FieldKind::Sphere,
            radius: 16.0,
            minor_radius: 5.0,
            period: 16.0,
            seed: 1337,
            frequency: 0.06,
            amplitude: 4.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct RoiCfg {
    pub min: [i64; 3],
    pub max: [i64; 3],
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractCfg {
    pub threshold: f32,
    pub slabs: usize,
    /// Worker threads for slab extraction; 0 keeps the global rayon pool.
    pub threads: usize,
    pub roi: Option<RoiCfg>,
    /// Serial runs stop between slices once this many milliseconds have passed.
    pub budget_ms: Option<u64>,
}

impl Default for ExtractCfg {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            slabs: 1,
            threads: 0,
            roi: None,
            budget_ms: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Scene {
    pub volume: VolumeCfg,
    pub field: FieldCfg,
    pub extract: ExtractCfg,
}

/// Command-line values that take precedence over the scene file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub dims: Option<[usize; 3]>,
    pub pitch: Option<[f32; 3]>,
    pub sample: Option<SampleKind>,
    pub field: Option<FieldKind>,
    pub threshold: Option<f32>,
    pub slabs: Option<usize>,
    pub threads: Option<usize>,
    pub roi: Option<RoiCfg>,
}

impl Scene {
    pub fn apply(&mut self, o: &Overrides) {
        if let Some(v) = o.dims {
            self.volume.dims = v;
        }
        if let Some(v) = o.pitch {
            self.volume.pitch = v;
        }
        if let Some(v) = o.sample {
            self.volume.sample = v;
        }
        if let Some(v) = o.field {
            self.field.kind = v;
        }
        if let Some(v) = o.threshold {
            self.extract.threshold = v;
        }
        if let Some(v) = o.slabs {
            self.extract.slabs = v;
        }
        if let Some(v) = o.threads {
            self.extract.threads = v;
        }
        if o.roi.is_some() {
            self.extract.roi = o.roi;
        }
    }
}

pub fn load_scene_from_path(path: &Path) -> Result<Scene, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let scene: Scene = toml::from_str(&s)?;
    Ok(scene)
}

/// Scene file (or defaults when `path` is `None`) with `overrides` applied.
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Scene, Box<dyn Error>> {
    let mut scene = match path {
        Some(p) => load_scene_from_path(p)?,
        None => Scene::default(),
    };
    scene.apply(overrides);
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let scene: Scene = toml::from_str("").unwrap();
        assert_eq!(scene, Scene::default());
        assert_eq!(scene.volume.dims, [48, 48, 48]);
        assert_eq!(scene.extract.slabs, 1);
    }

    #[test]
    fn parses_every_section() {
        let src = r#"
            [volume]
            dims = [16, 24, 32]
            pitch = [0.5, 1.0, 2.0]
            sample = "u8"

            [field]
            kind = "torus"
            radius = 6.0

            [extract]
            threshold = 0.25
            slabs = 4
            roi = { min = [0, 0, 0], max = [7, 7, 7] }
        "#;
        let scene: Scene = toml::from_str(src).unwrap();
        assert_eq!(scene.volume.dims, [16, 24, 32]);
        assert_eq!(scene.volume.sample, SampleKind::U8);
        assert_eq!(scene.volume.quantize_range, 8.0);
        assert_eq!(scene.field.kind, FieldKind::Torus);
        assert_eq!(scene.field.radius, 6.0);
        assert_eq!(scene.field.minor_radius, 5.0);
        assert_eq!(scene.extract.slabs, 4);
        assert_eq!(
            scene.extract.roi,
            Some(RoiCfg {
                min: [0, 0, 0],
                max: [7, 7, 7]
            })
        );
    }

    #[test]
    fn unknown_field_kind_is_rejected() {
        let err = toml::from_str::<Scene>("[field]\nkind = \"cube\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut scene: Scene = toml::from_str("[extract]\nthreshold = 2.0\nslabs = 3\n").unwrap();
        scene.apply(&Overrides {
            threshold: Some(-1.0),
            dims: Some([8, 8, 8]),
            ..Overrides::default()
        });
        assert_eq!(scene.extract.threshold, -1.0);
        assert_eq!(scene.extract.slabs, 3);
        assert_eq!(scene.volume.dims, [8, 8, 8]);
        assert_eq!(scene.extract.roi, None);
    }
}
