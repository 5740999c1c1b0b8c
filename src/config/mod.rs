//! Pipeline configuration management for `assetpipe.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── serve      # [serve]
//! │   └── templates  # [templates]
//! ├── types/         # ConfigError, ConfigDiagnostics
//! ├── util           # Upward config file search
//! └── mod.rs         # PipelineConfig (this file)
//! ```
//!
//! # Keys
//!
//! | Key                | Purpose                                        |
//! |--------------------|------------------------------------------------|
//! | `debug`            | Split uncombined assets, skip `?` filters      |
//! | `prefix`           | URL prefix of written and served assets        |
//! | `input_dir`        | Base directory of asset sources                |
//! | `output_dir`       | Where `dump` writes                            |
//! | `cache_dir`        | Filtered-content cache (absent = no cache)     |
//! | `twig_functions`   | Asset functions recognised in templates        |
//! | `java/ruby/node`   | Default interpreter binaries                   |
//! | `node_paths`       | Default `NODE_PATH` entries                    |
//! | `[filters.<name>]` | Filter options                                 |
//! | `[assets.<name>]`  | Static formulas                                |
//! | `[templates]`      | Template discovery                             |
//! | `[serve]`          | Development server                             |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{ServeConfig, TemplatesConfig};
pub use types::{ConfigDiagnostics, ConfigError};

use crate::{
    asset::Formula,
    cli::{Cli, Commands},
    filter::FilterFactory,
    log,
    template::TemplateFunction,
    utils::path::{expand_dir, normalize_path},
};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing assetpipe.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are resolved against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub debug: bool,
    pub prefix: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub cache_dir: Option<PathBuf>,

    #[serde(alias = "template_functions")]
    pub twig_functions: BTreeMap<String, TemplateFunction>,

    pub java: String,
    pub ruby: String,
    pub node: String,
    pub node_paths: Vec<String>,

    /// Filter name → options; any value shape is accepted.
    pub filters: Map<String, Value>,

    pub assets: BTreeMap<String, Formula>,

    pub templates: TemplatesConfig,
    pub serve: ServeConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            debug: false,
            prefix: "/".to_string(),
            input_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            cache_dir: None,
            twig_functions: BTreeMap::new(),
            java: "/usr/bin/java".to_string(),
            ruby: "/usr/bin/ruby".to_string(),
            node: "/usr/bin/node".to_string(),
            node_paths: Vec::new(),
            filters: Map::new(),
            assets: BTreeMap::new(),
            templates: TemplatesConfig::default(),
            serve: ServeConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file; its directory becomes
    /// the root relative paths are resolved against.
    pub fn load(cli: &Cli) -> Result<Self> {
        let Some(config_path) = find_config_file(&cli.config) else {
            bail!(ConfigError::Validation(format!(
                "config file '{}' not found",
                cli.config.display()
            )));
        };

        let mut config = Self::from_path(&config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = normalize_path(&config_path);
        config.finalize(&normalize_path(&root));
        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // finalization
    // ========================================================================

    /// Resolve directories against `root` and fill formula defaults.
    pub fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();

        self.input_dir = Self::resolve_dir(&self.input_dir, root);
        self.output_dir = Self::resolve_dir(&self.output_dir, root);
        self.cache_dir = self.cache_dir.take().map(|dir| Self::resolve_dir(&dir, root));
        for dirs in self.templates.paths.values_mut() {
            for dir in dirs.iter_mut() {
                *dir = Self::resolve_dir(dir, root);
            }
        }

        // Static assets are bundled unless they opt out
        for formula in self.assets.values_mut() {
            formula.options.combine.get_or_insert(true);
        }
    }

    fn resolve_dir(dir: &Path, root: &Path) -> PathBuf {
        normalize_path(&expand_dir(&dir.to_string_lossy(), root))
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        // `--no-debug` is applied to the pipeline, not here
        if let Commands::Serve {
            interface, port, ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Filter factory over the interpreter values every filter may fall back to.
    pub fn filter_factory(&self) -> FilterFactory {
        FilterFactory::with_binaries(
            &self.java,
            &self.node,
            &self.ruby,
            &self.node_paths,
            self.cache_dir.as_deref(),
        )
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        for (key, value) in [("java", &self.java), ("ruby", &self.ruby), ("node", &self.node)] {
            if value.trim().is_empty() {
                diag.error(key, "interpreter path must not be empty");
            }
        }

        if self.prefix.contains("://") {
            diag.error_with_hint(
                "prefix",
                format!("`{}` is a URL, expected a path", self.prefix),
                "use a path such as \"/static/\"",
            );
        }

        if !self.input_dir.is_dir() {
            diag.warn(
                "input_dir",
                format!("`{}` does not exist", self.input_dir.display()),
            );
        }

        for (name, formula) in &self.assets {
            if formula.inputs.is_empty() {
                diag.error(format!("assets.{name}.inputs"), "asset has no inputs");
            }
            for filter in &formula.filters {
                let filter = filter.trim_start_matches('?');
                if !self.filters.contains_key(filter) {
                    diag.error_with_hint(
                        format!("assets.{name}.filters"),
                        format!("filter `{filter}` is not configured"),
                        format!("add a [filters.{filter}] section"),
                    );
                }
            }
        }

        if self.templates.enable && self.templates.paths.is_empty() {
            diag.warn("templates.paths", "template discovery is enabled without search paths");
        }

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PipelineConfig {
    let (parsed, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
