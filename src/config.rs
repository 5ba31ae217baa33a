use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The rendering strategy for a build run, selected once in the project
/// file rather than threaded through every call as a flag.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Wrap each posting in the page template as standalone HTML.
    Standalone,

    /// Emit front-matter-annotated content for a static-site generator.
    FrontMatter,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Standalone
    }
}

#[derive(Deserialize)]
struct Heading(String);
impl Default for Heading {
    fn default() -> Self {
        Heading(String::from("h1"))
    }
}

#[derive(Deserialize)]
struct Project {
    #[serde(default)]
    pub mode: Mode,

    #[serde(default)]
    pub heading: Heading,

    #[serde(default)]
    pub published_marker: Option<String>,

    #[serde(default)]
    pub template: Option<PathBuf>,
}

/// Configuration for one export run. The destination root and the source
/// document's location belong to the orchestrator; the config carries only
/// what the core needs.
pub struct Config {
    /// The rendering strategy.
    pub mode: Mode,

    /// The heading tag that delimits postings.
    pub heading: String,

    /// When set, only headings containing this marker token become postings.
    pub published_marker: Option<String>,

    /// The page template path (standalone mode only). Relative paths are
    /// resolved against the project file's directory.
    pub template_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from a `postex.yaml` project file.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = std::fs::File::open(path).map_err(|e| {
            anyhow!("opening project file `{}`: {}", path.display(), e)
        })?;
        let project: Project = serde_yaml::from_reader(file)?;
        let project_root = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Config::from_project(project, project_root))
    }

    /// Parses configuration from project-file text; `project_root` anchors
    /// relative template paths.
    pub fn from_yaml(text: &str, project_root: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_str(text)?;
        Ok(Config::from_project(project, project_root))
    }

    fn from_project(project: Project, project_root: &Path) -> Config {
        Config {
            mode: project.mode,
            heading: project.heading.0,
            published_marker: project.published_marker,
            template_path: project
                .template
                .map(|relpath| project_root.join(relpath)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_yaml_defaults() -> Result<()> {
        let config = Config::from_yaml("{}", Path::new("."))?;
        assert_eq!(config.mode, Mode::Standalone);
        assert_eq!(config.heading, "h1");
        assert_eq!(config.published_marker, None);
        assert_eq!(config.template_path, None);
        Ok(())
    }

    #[test]
    fn test_from_yaml() -> Result<()> {
        let config = Config::from_yaml(
            "mode: front-matter\n\
             heading: h2\n\
             published_marker: '[published]'\n\
             template: theme/page.html\n",
            Path::new("/project"),
        )?;
        assert_eq!(config.mode, Mode::FrontMatter);
        assert_eq!(config.heading, "h2");
        assert_eq!(config.published_marker.as_deref(), Some("[published]"));
        assert_eq!(
            config.template_path,
            Some(PathBuf::from("/project/theme/page.html")),
        );
        Ok(())
    }
}
