//! Asset pipeline.
//!
//! Composes the filter manager, asset factory, asset manager, writer and
//! cache from a [`PipelineConfig`], and exposes the operations the commands
//! use.
//!
//! ```text
//! formula ──▶ AssetFactory ──▶ Asset ──▶ normalize ──▶ output ─┬─▶ AssetWriter (write)
//!              (filters, prefix)                               └─▶ RouteTable  (serve)
//! ```
//!
//! In debug mode an uncombined asset is output once per leaf, so each source
//! file can be inspected on its own; otherwise the bundle is output once.

mod routes;

pub use routes::{RouteContent, RouteTable};

use crate::{
    asset::{Asset, AssetError, AssetFactory, AssetManager, AssetWriter, PrefixWorker},
    cache::{CachedAsset, FilesystemCache},
    config::{PipelineConfig, TemplatesConfig},
    debug,
    filter::FilterManager,
    template::{FormulaLoader, discover},
    utils::mime::MimeTable,
};
use parking_lot::RwLock;
use std::{
    fs,
    path::Path,
    sync::Arc,
};

pub struct Pipeline {
    factory: AssetFactory,
    manager: AssetManager,
    writer: AssetWriter,
    cache: Option<Arc<FilesystemCache>>,
    loader: Option<FormulaLoader>,
    templates: TemplatesConfig,
    mime: Arc<MimeTable>,
    routes: RwLock<RouteTable>,
}

impl Pipeline {
    /// Build the pipeline.
    ///
    /// Every configured filter is resolved here, so an unknown filter name or
    /// a missing required option fails before any asset is touched.
    pub fn new(config: &PipelineConfig, mime: Arc<MimeTable>) -> Result<Self, AssetError> {
        let filter_factory = config.filter_factory();
        let filters = Arc::new(FilterManager::from_config(&filter_factory, &config.filters)?);

        let mut factory = AssetFactory::new(&config.input_dir, filters, config.debug);
        factory.add_worker(Box::new(PrefixWorker::new(&config.prefix)));

        let mut manager = AssetManager::new();
        for (name, formula) in &config.assets {
            manager.set_formula(name, formula.clone());
        }

        let loader = config
            .templates
            .enable
            .then(|| FormulaLoader::new(config.twig_functions.clone()));

        Ok(Self {
            factory,
            manager,
            writer: AssetWriter::new(&config.output_dir),
            cache: config
                .cache_dir
                .as_ref()
                .map(|dir| Arc::new(FilesystemCache::new(dir))),
            loader,
            templates: config.templates.clone(),
            mime,
            routes: RwLock::new(RouteTable::default()),
        })
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn is_debug(&self) -> bool {
        self.factory.is_debug()
    }

    /// Override debug mode for this invocation.
    pub fn set_debug(&mut self, debug: bool) {
        self.factory.set_debug(debug);
    }

    pub fn output_dir(&self) -> &Path {
        self.writer.dir()
    }

    pub fn mime(&self) -> &MimeTable {
        &self.mime
    }

    pub fn manager(&self) -> &AssetManager {
        &self.manager
    }

    /// Create the asset `name` with the current debug state.
    pub fn asset(&self, name: &str) -> Result<Asset, AssetError> {
        self.manager.get(name, &self.factory)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Strip the leading `/` from target paths, members included.
    pub fn normalize(asset: &mut Asset) {
        if let Some(target) = asset.target_path()
            && target.starts_with('/')
        {
            let trimmed = target.trim_start_matches('/').to_string();
            asset.set_target_path(Some(trimmed));
        }
        for member in asset.members_mut() {
            Self::normalize(member);
        }
    }

    /// Write `asset` under the output directory, or register a route for it.
    ///
    /// `callback` runs after each file written, never for routes or for an
    /// asset without a target.
    pub fn output(
        &self,
        mut asset: Asset,
        write: bool,
        callback: &mut dyn FnMut(&Asset),
    ) -> Result<(), AssetError> {
        Self::normalize(&mut asset);

        if write {
            if self.writer.write(&asset)?.is_some() {
                callback(&asset);
            }
            return Ok(());
        }

        let Some(target) = asset.resolved_target_path() else {
            return Ok(());
        };
        let content = match &self.cache {
            Some(cache) => RouteContent::Cached(CachedAsset::new(asset, cache.clone())),
            None => RouteContent::Plain(asset),
        };
        let path = self.routes.write().insert(&target, content);
        debug!("pipeline"; "route {}", path);
        Ok(())
    }

    /// Output every known asset.
    ///
    /// Templates are scanned first when discovery is enabled. An asset is
    /// output whole when it is combined or debug is off, and leaf by leaf
    /// otherwise.
    pub fn dump(&mut self, write: bool, callback: &mut dyn FnMut(&Asset)) -> Result<(), AssetError> {
        if self.loader.is_some() {
            self.load_templates()?;
        }

        for name in self.manager.names() {
            let asset = self.asset(&name)?;
            if self.is_split(&name) {
                for leaf in asset.leaves() {
                    self.output(leaf, write, &mut *callback)?;
                }
            } else {
                self.output(asset, write, &mut *callback)?;
            }
        }
        Ok(())
    }

    /// Whether `name` is output per leaf under the current debug state.
    fn is_split(&self, name: &str) -> bool {
        let Some(formula) = self.manager.formula(name) else {
            return false;
        };
        let debug = formula.options.debug.unwrap_or_else(|| self.is_debug());
        let combine = formula.options.combine.unwrap_or(false);
        debug && !combine
    }

    /// Replace template formulas with the ones currently on disk.
    fn load_templates(&mut self) -> Result<(), AssetError> {
        let Some(loader) = &self.loader else {
            return Ok(());
        };
        let mut formulas = Vec::new();
        for resource in discover(&self.templates.paths, &self.templates.extension) {
            let source =
                fs::read_to_string(&resource.path).map_err(|e| AssetError::Io(resource.path.clone(), e))?;
            let found = loader.load(&source);
            debug!("pipeline"; "{}: {} formula(s)", resource.name, found.len());
            formulas.extend(found);
        }
        self.manager.clear_discovered();
        self.manager.add_formulas(formulas);
        Ok(())
    }

    // ========================================================================
    // Serving
    // ========================================================================

    /// Registered route paths, sorted.
    pub fn routes(&self) -> Vec<String> {
        self.routes.read().paths()
    }

    /// Filtered content and content type for `path`, if it is a route.
    pub fn render(&self, path: &str) -> Option<Result<(Vec<u8>, &'static str), AssetError>> {
        let content = self.routes.read().get(path).cloned()?;
        let mime = self.mime.content_type(path);
        Some(content.load().map(|body| (body, mime)))
    }

    /// URLs the asset `name` is reachable at: one per leaf when split.
    pub fn urls(&self, name: &str) -> Result<Vec<String>, AssetError> {
        let asset = self.asset(name)?;
        let assets = if self.is_split(name) {
            asset.leaves()
        } else {
            vec![asset]
        };
        Ok(assets
            .iter()
            .filter_map(Asset::resolved_target_path)
            .map(|target| format!("/{}", target.trim_start_matches('/')))
            .collect())
    }
}
