use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Built-in deck shipped with the binary.
const BUILTIN_DECK: &str = include_str!("../assets/slides.yaml");

/// Still image used when a record has no image of its own.
pub const FALLBACK_IMAGE: &str = "img/fallback.jpg";

/// Resume asset used when the deck file does not name one.
pub const DEFAULT_RESUME: &str = "img/resume.png";

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no slides found in {0}")]
    Empty(PathBuf),
}

/// One project slide. Field names also accept the legacy web names
/// (`slideTitle`, `modalImg`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(alias = "slideTitle")]
    pub title: String,

    #[serde(default, alias = "slideDescription")]
    pub description: String,

    #[serde(default, alias = "slideTags")]
    pub tags: Vec<String>,

    #[serde(default, rename = "video", alias = "slideVideo")]
    pub video_path: String,

    #[serde(default, rename = "image", alias = "modalImg")]
    pub image_path: String,

    #[serde(
        default,
        rename = "thumb",
        alias = "modalThumb",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumb_path: Option<String>,

    #[serde(
        default,
        rename = "download",
        alias = "modalDownload",
        skip_serializing_if = "Option::is_none"
    )]
    pub download_path: Option<String>,

    #[serde(default, alias = "modalSrcset", skip_serializing_if = "Option::is_none")]
    pub srcset: Option<String>,
}

impl SlideRecord {
    /// Full-resolution still, or the shared fallback image.
    pub fn image(&self) -> &str {
        if self.image_path.is_empty() {
            FALLBACK_IMAGE
        } else {
            &self.image_path
        }
    }

    /// Low-resolution placeholder; defaults to the full image.
    pub fn thumb(&self) -> &str {
        match self.thumb_path.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => self.image(),
        }
    }

    /// Asset offered by the download button; defaults to the full image.
    pub fn download(&self) -> &str {
        match self.download_path.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => self.image(),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "project image"
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeckSource {
    Deck {
        #[serde(default)]
        resume: Option<String>,
        slides: Vec<SlideRecord>,
    },
    List(Vec<SlideRecord>),
}

/// A resolved asset location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetRef {
    Local(PathBuf),
    Remote(String),
}

impl AssetRef {
    /// Last path segment, used as the suggested download filename.
    pub fn file_name(&self) -> String {
        let name = match self {
            Self::Local(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            Self::Remote(u) => u
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
        };
        if name.is_empty() {
            "download".to_string()
        } else {
            name
        }
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        let (_, ext) = name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }

    /// A string usable with the platform URL opener.
    pub fn to_url(&self) -> String {
        match self {
            Self::Local(p) => url::Url::from_file_path(p)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| p.display().to_string()),
            Self::Remote(u) => u.clone(),
        }
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(p) => write!(f, "{}", p.display()),
            Self::Remote(u) => write!(f, "{u}"),
        }
    }
}

/// Static, ordered list of slide records. Loaded once.
#[derive(Debug, Clone)]
pub struct Registry {
    records: Vec<SlideRecord>,
    base: PathBuf,
    resume: Option<String>,
    source: Option<PathBuf>,
}

impl Registry {
    pub fn builtin() -> Result<Self, RegistryError> {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_yaml(BUILTIN_DECK, Path::new("<builtin>"), base)
    }

    /// Load a deck from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();

        let is_json = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let mut registry = if is_json {
            let source: DeckSource =
                serde_json::from_str(&contents).map_err(|source| RegistryError::Json {
                    path: path.to_path_buf(),
                    source,
                })?;
            Self::from_source(source, path, base)?
        } else {
            Self::from_yaml(&contents, path, base)?
        };
        registry.source = Some(path.to_path_buf());
        Ok(registry)
    }

    /// Load `path` when given, otherwise the built-in deck.
    pub fn open(path: Option<&Path>) -> Result<Self, RegistryError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    pub fn from_yaml(contents: &str, origin: &Path, base: PathBuf) -> Result<Self, RegistryError> {
        let source: DeckSource =
            serde_yaml::from_str(contents).map_err(|source| RegistryError::Yaml {
                path: origin.to_path_buf(),
                source,
            })?;
        Self::from_source(source, origin, base)
    }

    fn from_source(
        source: DeckSource,
        origin: &Path,
        base: PathBuf,
    ) -> Result<Self, RegistryError> {
        let (resume, records) = match source {
            DeckSource::Deck { resume, slides } => (resume, slides),
            DeckSource::List(slides) => (None, slides),
        };
        if records.is_empty() {
            return Err(RegistryError::Empty(origin.to_path_buf()));
        }
        Ok(Self {
            records,
            base,
            resume,
            source: None,
        })
    }

    #[cfg(test)]
    pub fn from_records(records: Vec<SlideRecord>) -> Self {
        Self {
            records,
            base: PathBuf::from("."),
            resume: None,
            source: None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[SlideRecord] {
        &self.records
    }

    /// Record at a 1-based slide index.
    pub fn get(&self, index: usize) -> Option<&SlideRecord> {
        index.checked_sub(1).and_then(|i| self.records.get(i))
    }

    /// Record addressed by a call-to-action's zero-based source index.
    pub fn by_source_index(&self, source_index: usize) -> Option<&SlideRecord> {
        self.records.get(source_index)
    }

    /// File the registry was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn resume(&self) -> AssetRef {
        self.to_abs(self.resume.as_deref().unwrap_or(DEFAULT_RESUME))
    }

    /// Resolve an asset path against the deck's directory. URLs pass through.
    pub fn to_abs(&self, path: &str) -> AssetRef {
        if let Ok(parsed) = url::Url::parse(path) {
            match parsed.scheme() {
                "http" | "https" => return AssetRef::Remote(parsed.to_string()),
                "file" => {
                    if let Ok(p) = parsed.to_file_path() {
                        return AssetRef::Local(p);
                    }
                }
                _ => {}
            }
        }
        let trimmed = path.trim_start_matches("./");
        let candidate = Path::new(trimmed);
        if candidate.is_absolute() {
            AssetRef::Local(candidate.to_path_buf())
        } else {
            AssetRef::Local(self.base.join(candidate))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_deck_loads() {
        let registry = Registry::builtin().expect("builtin deck parses");
        assert_eq!(registry.len(), 6);
        let toner = registry.get(3).unwrap();
        assert_eq!(toner.slug.as_deref(), Some("toner"));
        assert_eq!(toner.title, "Coral Refresh Toner");
        assert!(registry.get(0).is_none());
        assert!(registry.get(7).is_none());
    }

    #[test]
    fn test_builtin_assets_resolve_against_working_dir() {
        let registry = Registry::builtin().unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            registry.resume(),
            AssetRef::Local(cwd.join("img/resume.png"))
        );
    }

    #[test]
    fn test_legacy_field_names() {
        let yaml = r#"
- slug: toner
  slideTitle: Coral Refresh Toner
  slideDescription: Fresh.
  slideTags: [scroll wheel]
  slideVideo: ./projects_img/slide_video3.mp4
  modalImg: ./projects_img/project_toner.png
  modalSrcset: "a.webp 1x, b.webp 2x"
"#;
        let registry =
            Registry::from_yaml(yaml, Path::new("legacy.yaml"), PathBuf::from("/deck")).unwrap();
        let rec = registry.get(1).unwrap();
        assert_eq!(rec.title, "Coral Refresh Toner");
        assert_eq!(rec.tags, vec!["scroll wheel".to_string()]);
        assert_eq!(rec.image_path, "./projects_img/project_toner.png");
        assert_eq!(rec.srcset.as_deref(), Some("a.webp 1x, b.webp 2x"));
    }

    #[test]
    fn test_record_defaults() {
        let rec = SlideRecord {
            title: "A".into(),
            image_path: "img/a.png".into(),
            ..Default::default()
        };
        assert_eq!(rec.thumb(), "img/a.png");
        assert_eq!(rec.download(), "img/a.png");

        let bare = SlideRecord::default();
        assert_eq!(bare.image(), FALLBACK_IMAGE);
        assert_eq!(bare.display_title(), "project image");
    }

    #[test]
    fn test_empty_deck_is_an_error() {
        let err = Registry::from_yaml("slides: []", Path::new("x.yaml"), PathBuf::from("."));
        assert!(matches!(err, Err(RegistryError::Empty(_))));
    }

    #[test]
    fn test_to_abs() {
        let registry = Registry {
            records: vec![SlideRecord::default()],
            base: PathBuf::from("/srv/site"),
            resume: None,
            source: None,
        };
        assert_eq!(
            registry.to_abs("./projects_img/a.mp4"),
            AssetRef::Local(PathBuf::from("/srv/site/projects_img/a.mp4"))
        );
        assert_eq!(
            registry.to_abs("https://cdn.example.com/a.png"),
            AssetRef::Remote("https://cdn.example.com/a.png".into())
        );
        assert_eq!(
            registry.resume(),
            AssetRef::Local(PathBuf::from("/srv/site/img/resume.png"))
        );
    }

    #[test]
    fn test_asset_file_name_and_extension() {
        let remote = AssetRef::Remote("https://x.test/img/Shot.PNG?v=2".into());
        assert_eq!(remote.file_name(), "Shot.PNG");
        assert_eq!(remote.extension().as_deref(), Some("png"));

        let local = AssetRef::Local(PathBuf::from("/a/b/clip.mp4"));
        assert_eq!(local.file_name(), "clip.mp4");
        assert_eq!(local.extension().as_deref(), Some("mp4"));

        let bare = AssetRef::Remote("https://x.test/".into());
        assert_eq!(bare.file_name(), "download");
        assert_eq!(bare.extension(), None);
    }
}
