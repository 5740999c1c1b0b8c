//! A filter resolved from the registry, ready to transform content.

use super::{
    Filter, FilterContext, FilterError, FilterKind,
    builtin::{css, minify},
    table::{Builtin, Flag, FilterSpec, Io, NodeModule, Program, Runtime},
};
use crate::{
    debug,
    utils::{
        exec::{Cmd, FilterRule},
        hash::KeyHasher,
    },
};
use serde_json::{Value, json};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Known noise on filter stderr.
static FILTER_NOISE: FilterRule = FilterRule::new(&["DEPRECATION WARNING", "(node:", "npm WARN"]);

/// Registry entry plus the values read for its params and settings.
#[derive(Debug, Clone)]
pub struct ConfiguredFilter {
    name: String,
    spec: &'static FilterSpec,
    params: Vec<(&'static str, Value)>,
    settings: Vec<(&'static str, Value)>,
}

impl ConfiguredFilter {
    pub(super) fn new(
        name: &str,
        spec: &'static FilterSpec,
        params: Vec<(&'static str, Value)>,
        settings: Vec<(&'static str, Value)>,
    ) -> Self {
        Self {
            name: name.to_string(),
            spec,
            params,
            settings,
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.spec.kind
    }

    /// Constructor argument by key (`bin`, `node`, `jar`, ...).
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Stored setting by field name.
    pub fn setting(&self, field: &str) -> Option<&Value> {
        self.settings.iter().find(|(k, _)| *k == field).map(|(_, v)| v)
    }

    /// Settings in application order.
    pub fn settings(&self) -> &[(&'static str, Value)] {
        &self.settings
    }

    /// Program and leading arguments for external filters.
    ///
    /// `None` for filters that run in-process.
    pub fn command(&self) -> Option<Vec<String>> {
        match self.spec.runtime {
            Runtime::External { program, base, flags, .. } => {
                let mut argv = self.program(program);
                argv.extend(base.iter().map(|s| s.to_string()));
                argv.extend(self.arguments(flags));
                Some(argv)
            }
            Runtime::Node(_) => Some(vec![self.string_param("node")?.to_string()]),
            Runtime::Builtin(_) | Runtime::Passthrough => None,
        }
    }

    fn program(&self, program: Program) -> Vec<String> {
        match program {
            Program::Bin => {
                let mut argv = Vec::with_capacity(2);
                if let Some(interpreter) = self
                    .string_param("node")
                    .or_else(|| self.string_param("ruby"))
                    .filter(|s| !s.is_empty())
                {
                    argv.push(interpreter.to_string());
                }
                argv.extend(self.string_param("bin").map(str::to_string));
                argv
            }
            Program::Jar => {
                let java = self.string_param("java").unwrap_or("java");
                let mut argv = vec![java.to_string(), "-jar".to_string()];
                argv.extend(self.string_param("jar").map(str::to_string));
                argv
            }
        }
    }

    fn string_param(&self, key: &str) -> Option<&str> {
        self.param(key).and_then(Value::as_str)
    }

    /// Arguments derived from settings through the flag table.
    fn arguments(&self, flags: &[Flag]) -> Vec<String> {
        let mut args = Vec::new();
        for flag in flags {
            match *flag {
                Flag::Switch(field, name) => {
                    if self.setting(field).is_some_and(is_truthy) {
                        args.push(name.to_string());
                    }
                }
                Flag::Unless(field, name) => {
                    if self.setting(field) == Some(&Value::Bool(false)) {
                        args.push(name.to_string());
                    }
                }
                Flag::Value(field, name) => {
                    if let Some(value) = self.setting(field).and_then(scalar) {
                        args.push(name.to_string());
                        args.push(value);
                    }
                }
                Flag::Attached(field, name) => {
                    if let Some(value) = self.setting(field).and_then(scalar) {
                        args.push(format!("{name}{value}"));
                    }
                }
                Flag::Each(field, name) => {
                    for item in self.list(field) {
                        args.push(name.to_string());
                        args.push(item);
                    }
                }
                Flag::Joined(field, name, sep) => {
                    let items = self.list(field);
                    if !items.is_empty() {
                        args.push(name.to_string());
                        args.push(items.join(sep));
                    }
                }
            }
        }
        args
    }

    fn list(&self, field: &str) -> Vec<String> {
        match self.setting(field) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar).collect(),
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(k, v)| scalar(v).map(|v| format!("{k}={v}")))
                .collect(),
            Some(value) => scalar(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    fn timeout(&self) -> Option<Duration> {
        let secs = self.setting("timeout")?.as_f64()?;
        // Out-of-range values mean no limit
        (secs > 0.0).then(|| Duration::try_from_secs_f64(secs).ok()).flatten()
    }

    /// `NODE_PATH` assembled from the filter's node paths.
    fn node_env(&self) -> Vec<(String, String)> {
        let paths = self
            .param("node_paths")
            .or_else(|| self.setting("node_paths"))
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();
        if paths.is_empty() {
            return Vec::new();
        }
        match std::env::join_paths(paths) {
            Ok(joined) => vec![("NODE_PATH".to_string(), joined.to_string_lossy().to_string())],
            Err(_) => Vec::new(),
        }
    }

    fn fail(&self, message: impl Into<String>) -> FilterError {
        FilterError::failed(&self.name, message)
    }

    // ========================================================================
    // Runtimes
    // ========================================================================

    fn run_builtin(&self, builtin: Builtin, content: Vec<u8>, ctx: &FilterContext<'_>) -> Result<Vec<u8>, FilterError> {
        let text = String::from_utf8(content).map_err(|_| self.fail("content is not valid UTF-8"))?;
        let out = match builtin {
            Builtin::MinifyJs => {
                minify::minify_js(&text).ok_or_else(|| self.fail("could not parse JavaScript"))?
            }
            Builtin::MinifyCss => {
                minify::minify_css(&text).ok_or_else(|| self.fail("could not parse CSS"))?
            }
            Builtin::CssRewrite => match (ctx.source_path, ctx.target_path) {
                (Some(source), Some(target)) => css::rewrite_urls(&text, source, target),
                _ => text,
            },
            Builtin::CssCacheBusting => match self.setting("version").and_then(scalar) {
                Some(version) if !version.is_empty() => {
                    let format = self
                        .setting("format")
                        .and_then(Value::as_str)
                        .unwrap_or("%s?%s");
                    css::bust_urls(&text, &version, format)
                }
                _ => text,
            },
        };
        Ok(out.into_bytes())
    }

    fn run_external(&self, io: Io, content: Vec<u8>, ctx: &FilterContext<'_>) -> Result<Vec<u8>, FilterError> {
        let argv = self.command().unwrap_or_default();
        if argv.is_empty() {
            return Err(self.fail("no program configured"));
        }
        let mut cmd = Cmd::from_slice(&argv)
            .envs(self.node_env())
            .timeout(self.timeout())
            .filter(&FILTER_NOISE);
        if let Some(dir) = source_dir(ctx) {
            cmd = cmd.cwd(dir);
        }

        if io == Io::Stdio {
            let output = cmd.stdin(content).run().map_err(|e| self.fail(format!("{e:#}")))?;
            return Ok(output.stdout);
        }

        let scratch = tempfile::Builder::new()
            .prefix("assetpipe")
            .tempdir()
            .map_err(|e| self.fail(format!("cannot create scratch dir: {e}")))?;
        let input = scratch.path().join(format!("input{}", extension(ctx)));
        fs::write(&input, &content).map_err(|e| self.fail(format!("cannot write scratch file: {e}")))?;

        match io {
            Io::InputFile | Io::Stdio => {
                let output = cmd
                    .arg(input.as_os_str())
                    .run()
                    .map_err(|e| self.fail(format!("{e:#}")))?;
                Ok(output.stdout)
            }
            Io::InPlace => {
                cmd.arg(input.as_os_str())
                    .run()
                    .map_err(|e| self.fail(format!("{e:#}")))?;
                fs::read(&input).map_err(|e| self.fail(format!("cannot read result: {e}")))
            }
            Io::OutputFlag(flag) => {
                let target = scratch.path().join("output.js");
                cmd.arg(flag)
                    .arg(target.as_os_str())
                    .arg(input.as_os_str())
                    .run()
                    .map_err(|e| self.fail(format!("{e:#}")))?;
                fs::read(&target).map_err(|e| self.fail(format!("cannot read result: {e}")))
            }
        }
    }

    fn run_node(&self, module: NodeModule, content: Vec<u8>, ctx: &FilterContext<'_>) -> Result<Vec<u8>, FilterError> {
        let node = self
            .string_param("node")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| self.fail("no node binary configured"))?;
        let script = self.node_script(module, ctx);

        let mut cmd = Cmd::new(node)
            .args(["-e", script.as_str()])
            .envs(self.node_env())
            .timeout(self.timeout())
            .filter(&FILTER_NOISE)
            .stdin(content);
        if let Some(dir) = source_dir(ctx) {
            cmd = cmd.cwd(dir);
        }
        let output = cmd.run().map_err(|e| self.fail(format!("{e:#}")))?;
        Ok(output.stdout)
    }

    /// Script reading stdin, rendering it with the module, writing stdout.
    fn node_script(&self, module: NodeModule, ctx: &FilterContext<'_>) -> String {
        let mut paths: Vec<Value> = match self.setting("load_paths") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        if let Some(dir) = source_dir(ctx) {
            paths.push(json!(dir.to_string_lossy()));
        }
        let mut options = json!({ "paths": paths });
        if let Some(source) = ctx.source_path {
            options["filename"] = json!(source);
        }
        if let Some(compress) = self.setting("compress").filter(|v| !v.is_null()) {
            options["compress"] = json!(is_truthy(compress));
        }

        let render = match module {
            NodeModule::Less => {
                "require('less').render(input, options, function (e, out) { done(e, out && out.css); });"
                    .to_string()
            }
            NodeModule::Stylus => {
                let nib = if self.setting("use_nib").is_some_and(is_truthy) {
                    ".use(require('nib')()).import('nib')"
                } else {
                    ""
                };
                format!("require('stylus')(input, options){nib}.render(done);")
            }
        };

        format!(
            "var options = {options};\n\
             var input = '';\n\
             function done(e, css) {{ if (e) {{ process.stderr.write(String(e.message || e) + '\\n'); process.exit(2); }} process.stdout.write(css); }}\n\
             process.stdin.setEncoding('utf8');\n\
             process.stdin.on('data', function (chunk) {{ input += chunk; }});\n\
             process.stdin.on('end', function () {{ {render} }});\n"
        )
    }
}

impl Filter for ConfiguredFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, content: Vec<u8>, ctx: &FilterContext<'_>) -> Result<Vec<u8>, FilterError> {
        match self.spec.runtime {
            Runtime::Builtin(builtin) => self.run_builtin(builtin, content, ctx),
            Runtime::External { io, .. } => self.run_external(io, content, ctx),
            Runtime::Node(module) => self.run_node(module, content, ctx),
            Runtime::Passthrough => {
                debug!("filter"; "`{}` has no native implementation, content passed through", self.name);
                Ok(content)
            }
        }
    }

    fn fingerprint(&self) -> String {
        let mut hasher = KeyHasher::new().field(&self.name).field(self.kind().name());
        for (key, value) in self.params.iter().chain(&self.settings) {
            hasher = hasher.field(key).field(&value.to_string());
        }
        hasher.finish()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Strings and numbers as argument text.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn source_dir(ctx: &FilterContext<'_>) -> Option<PathBuf> {
    let root = ctx.source_root?;
    let dir = match ctx.source_path.and_then(|p| Path::new(p).parent()) {
        Some(parent) => root.join(parent),
        None => root.to_path_buf(),
    };
    dir.is_dir().then_some(dir)
}

/// Extension of the source, with its dot, for scratch files.
fn extension(ctx: &FilterContext<'_>) -> String {
    ctx.source_path
        .and_then(|p| Path::new(p).extension())
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterFactory;

    fn factory() -> FilterFactory {
        FilterFactory::with_binaries("/usr/bin/java", "/usr/bin/node", "/usr/bin/ruby", &[], None)
    }

    fn resolve(name: &str, options: Value) -> ConfiguredFilter {
        factory().resolve(name, &options).unwrap()
    }

    #[test]
    fn test_sass_command() {
        let filter = resolve("sass", json!({ "style": "compressed", "load_paths": ["a", "b"] }));
        let argv = filter.command().unwrap();
        assert_eq!(&argv[..3], ["/usr/bin/ruby", "/usr/bin/sass", "--stdin"]);
        let joined = argv.join(" ");
        assert!(joined.contains("--style compressed"));
        assert!(joined.contains("--load-path a --load-path b"));
        assert!(!joined.contains("--compass"));
    }

    #[test]
    fn test_scss_without_interpreter() {
        let filter = resolve("scss", json!({ "ruby": null, "bin": "/opt/sass" }));
        let argv = filter.command().unwrap();
        assert_eq!(&argv[..3], ["/opt/sass", "--stdin", "--scss"]);
    }

    #[test]
    fn test_jar_command() {
        let filter = resolve("yui_css", json!({ "jar": "/opt/yui.jar", "linebreak": 80 }));
        let argv = filter.command().unwrap();
        assert_eq!(&argv[..3], ["/usr/bin/java", "-jar", "/opt/yui.jar"]);
        let joined = argv.join(" ");
        assert!(joined.contains("--type css"));
        assert!(joined.contains("--charset utf8"));
        assert!(joined.contains("--line-break 80"));
    }

    #[test]
    fn test_inverted_and_attached_flags() {
        let filter = resolve("uglifyjs", json!({}));
        assert!(filter.command().unwrap().contains(&"--no-mangle".to_string()));

        let filter = resolve("optipng", json!({ "level": 7 }));
        assert!(filter.command().unwrap().contains(&"-o7".to_string()));
    }

    #[test]
    fn test_joined_flag() {
        let filter = resolve("autoprefixer", json!({ "browsers": ["> 1%", "last 2 versions"] }));
        let argv = filter.command().unwrap();
        assert_eq!(argv, ["/usr/bin/autoprefixer", "--browsers", "> 1%,last 2 versions"]);
    }

    #[test]
    fn test_builtin_has_no_command() {
        assert!(resolve("cssrewrite", json!({})).command().is_none());
        assert!(resolve("lessphp", json!({})).command().is_none());
        assert_eq!(resolve("less", json!({})).command().unwrap(), ["/usr/bin/node"]);
    }

    #[test]
    fn test_timeout() {
        assert_eq!(resolve("coffee", json!({})).timeout(), None);
        assert_eq!(
            resolve("coffee", json!({ "timeout": 5 })).timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_out_of_range_timeout_is_unbounded() {
        let filter = resolve("sass", json!({ "bin": "/bin/cat", "ruby": null, "timeout": 1e300 }));
        assert_eq!(filter.timeout(), None);
        // Runs the program instead of aborting on the duration
        let _ = filter.apply(b"a{}".to_vec(), &FilterContext::default());

        assert_eq!(resolve("sass", json!({ "timeout": -1 })).timeout(), None);
    }

    #[test]
    fn test_node_env() {
        let factory = FilterFactory::with_binaries("java", "node", "ruby", &["/opt/a".to_string()], None);
        let filter = factory.resolve("less", &json!({})).unwrap();
        assert_eq!(filter.node_env(), vec![("NODE_PATH".to_string(), "/opt/a".to_string())]);
        assert!(resolve("coffee", json!({})).node_env().is_empty());
    }

    #[test]
    fn test_passthrough_keeps_content() {
        let filter = resolve("scssphp", json!({}));
        let out = filter.apply(b"$a: 1;".to_vec(), &FilterContext::default()).unwrap();
        assert_eq!(out, b"$a: 1;");
    }

    #[test]
    fn test_cssrewrite_apply() {
        let filter = resolve("cssrewrite", json!({}));
        let ctx = FilterContext {
            source_root: None,
            source_path: Some("css/app.css"),
            target_path: Some("app.css"),
        };
        let out = filter.apply(b"a{background:url(img/x.png)}".to_vec(), &ctx).unwrap();
        assert_eq!(out, b"a{background:url(css/img/x.png)}");
    }

    #[test]
    fn test_cache_busting_apply() {
        let ctx = FilterContext::default();
        let css = b"a{background:url(x.png)}".to_vec();

        let unversioned = resolve("csscachebusting", json!({}));
        assert_eq!(unversioned.apply(css.clone(), &ctx).unwrap(), css);

        let versioned = resolve("csscachebusting", json!({ "version": 7 }));
        assert_eq!(versioned.apply(css, &ctx).unwrap(), b"a{background:url(x.png?7)}");
    }

    #[test]
    fn test_minify_apply() {
        let filter = resolve("cssmin", json!({}));
        let out = filter
            .apply(b"body {\n  margin: 0px;\n}\n".to_vec(), &FilterContext::default())
            .unwrap();
        assert_eq!(out, b"body{margin:0}");

        let filter = resolve("jsmin", json!({}));
        let err = filter.apply(b"function (".to_vec(), &FilterContext::default()).unwrap_err();
        assert!(matches!(err, FilterError::Failed { .. }));
    }

    #[test]
    fn test_missing_program_fails_at_apply() {
        let filter = resolve("coffee", json!({ "bin": "/nonexistent/coffee", "node": "" }));
        let err = filter.apply(b"x = 1".to_vec(), &FilterContext::default()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_node_script_options() {
        let filter = resolve("stylus", json!({ "compress": true, "nib": true }));
        let script = filter.node_script(NodeModule::Stylus, &FilterContext::default());
        assert!(script.contains("\"compress\":true"));
        assert!(script.contains("require('nib')"));
    }

    #[test]
    fn test_fingerprint_tracks_options() {
        let a = resolve("sass", json!({}));
        let b = resolve("sass", json!({ "style": "compressed" }));
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), resolve("sass", json!({})).fingerprint());
    }
}
