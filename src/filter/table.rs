//! Declarative filter registry.
//!
//! One [`FilterSpec`] per [`FilterKind`], in the same order as
//! [`FilterKind::ALL`]. A spec lists:
//!
//! - `params`: constructor arguments (binary paths, interpreter, jar)
//! - `settings`: optional setters applied in order, each with its default
//! - `runtime`: how the configured filter transforms content
//!
//! The factory interprets these tables; nothing here runs a process.

use super::FilterKind;

// ============================================================================
// Table vocabulary
// ============================================================================

/// Pipeline-wide values filters fall back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shared {
    Java,
    Node,
    Ruby,
    NodePaths,
    CacheDir,
}

impl Shared {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Node => "node",
            Self::Ruby => "ruby",
            Self::NodePaths => "node_paths",
            Self::CacheDir => "cache_dir",
        }
    }
}

/// Default for an absent option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Required,
    Null,
    Bool(bool),
    Str(&'static str),
    EmptyList,
    Shared(Shared),
}

/// One option read from the filter's configuration.
#[derive(Debug, Clone, Copy)]
pub struct Setting {
    /// Key looked up in the configuration mapping.
    pub key: &'static str,
    /// Name the value is stored under on the configured filter.
    pub field: &'static str,
    pub default: DefaultValue,
}

const fn opt(key: &'static str, default: DefaultValue) -> Setting {
    Setting {
        key,
        field: key,
        default,
    }
}

const fn renamed(key: &'static str, field: &'static str, default: DefaultValue) -> Setting {
    Setting {
        key,
        field,
        default,
    }
}

/// How the program is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    /// `bin`, preceded by the `node`/`ruby` param when one is declared.
    Bin,
    /// `java -jar <jar>`.
    Jar,
}

/// How content reaches the program and comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Io {
    /// stdin → stdout.
    Stdio,
    /// Temp input file as last argument → stdout.
    InputFile,
    /// Temp file optimised in place, read back afterwards.
    InPlace,
    /// Temp input file as last argument, output written to the file named
    /// after this flag.
    OutputFlag(&'static str),
}

/// Mapping from a stored setting to command-line arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// Truthy → `flag`.
    Switch(&'static str, &'static str),
    /// Exactly `false` → `flag`.
    Unless(&'static str, &'static str),
    /// String or number → `flag value`.
    Value(&'static str, &'static str),
    /// String or number → `flagvalue`.
    Attached(&'static str, &'static str),
    /// List → `flag item` per item.
    Each(&'static str, &'static str),
    /// List → `flag a<sep>b`.
    Joined(&'static str, &'static str, &'static str),
}

/// Node modules driven through a generated script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeModule {
    Less,
    Stylus,
}

/// Transformations implemented in-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    MinifyJs,
    MinifyCss,
    CssRewrite,
    CssCacheBusting,
}

/// What applying the filter does.
#[derive(Debug, Clone, Copy)]
pub enum Runtime {
    External {
        program: Program,
        io: Io,
        base: &'static [&'static str],
        flags: &'static [Flag],
    },
    Node(NodeModule),
    Builtin(Builtin),
    /// Backed by a library with no native counterpart: content unchanged.
    Passthrough,
}

/// Registry entry.
#[derive(Debug)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub params: &'static [Setting],
    pub settings: &'static [Setting],
    pub runtime: Runtime,
}

/// Registry entry for `kind`.
pub fn lookup(kind: FilterKind) -> &'static FilterSpec {
    &TABLE[kind as usize]
}

// ============================================================================
// Shared fragments
// ============================================================================

use DefaultValue::{Bool, EmptyList, Null, Required, Str};
use Flag::{Attached, Each, Joined, Switch, Unless, Value};

const TIMEOUT: Setting = opt("timeout", Null);
const NODE_PATHS: Setting = opt("node_paths", DefaultValue::Shared(Shared::NodePaths));
const NODE: Setting = opt("node", DefaultValue::Shared(Shared::Node));
const RUBY: Setting = opt("ruby", DefaultValue::Shared(Shared::Ruby));
const JAR: &[Setting] = &[opt("jar", Required), opt("java", DefaultValue::Shared(Shared::Java))];
const NO_SETTINGS: &[Setting] = &[];

const fn bin(path: &'static str) -> Setting {
    opt("bin", Str(path))
}

const fn external(program: Program, io: Io, base: &'static [&'static str], flags: &'static [Flag]) -> Runtime {
    Runtime::External {
        program,
        io,
        base,
        flags,
    }
}

const CLOSURE_SETTINGS: &[Setting] = &[
    TIMEOUT,
    opt("compilation_level", Null),
    renamed("language_in", "language", Null),
    opt("formatting", Null),
    opt("warning_level", Null),
];

const CLOSURE_FLAGS: &[Flag] = &[
    Value("compilation_level", "--compilation_level"),
    Value("language", "--language_in"),
    Value("formatting", "--formatting"),
    Value("warning_level", "--warning_level"),
];

const SASS_SETTINGS: &[Setting] = &[
    TIMEOUT,
    opt("style", Null),
    opt("compass", Null),
    opt("load_paths", EmptyList),
    opt("cache_location", DefaultValue::Shared(Shared::CacheDir)),
    renamed("enable_sourcemaps", "source_map", Null),
    opt("precision", Null),
];

const SASS_FLAGS: &[Flag] = &[
    Value("style", "--style"),
    Switch("compass", "--compass"),
    Each("load_paths", "--load-path"),
    Value("cache_location", "--cache-location"),
    Value("precision", "--precision"),
];

// ============================================================================
// The table
// ============================================================================

static TABLE: [FilterSpec; 42] = [
    FilterSpec {
        kind: FilterKind::Autoprefixer,
        params: &[bin("/usr/bin/autoprefixer")],
        settings: &[TIMEOUT, NODE_PATHS, opt("browsers", EmptyList)],
        runtime: external(Program::Bin, Io::Stdio, &[], &[Joined("browsers", "--browsers", ",")]),
    },
    FilterSpec {
        kind: FilterKind::CleanCss,
        params: &[bin("/usr/bin/cleancss"), NODE],
        settings: &[
            NODE_PATHS,
            opt("keep_line_breaks", Bool(false)),
            opt("remove_special_comments", Bool(false)),
            opt("only_keep_first_special_comment", Bool(true)),
            renamed("set_semantic_merging", "semantic_merging", Bool(false)),
            opt("root_path", Null),
            opt("skip_import", Bool(true)),
            TIMEOUT,
            opt("skip_rebase", Bool(true)),
            opt("skip_restructuring", Bool(true)),
            opt("skip_shorthand_compacting", Bool(true)),
            opt("source_map", Bool(false)),
            opt("source_map_inline_sources", Bool(false)),
            opt("skip_advanced", Bool(true)),
            opt("skip_aggresive_merging", Bool(true)),
            opt("skip_import_from", Null),
            opt("media_merging", Bool(true)),
            opt("rounding_precision", Null),
            opt("compatibility", Bool(false)),
            opt("debug", Bool(false)),
        ],
        runtime: external(
            Program::Bin,
            Io::Stdio,
            &[],
            &[
                Switch("keep_line_breaks", "--keep-line-breaks"),
                Switch("remove_special_comments", "--s0"),
                Switch("only_keep_first_special_comment", "--s1"),
                Switch("semantic_merging", "--semantic-merging"),
                Value("root_path", "--root"),
                Switch("skip_import", "--skip-import"),
                Switch("skip_rebase", "--skip-rebase"),
                Switch("skip_restructuring", "--skip-restructuring"),
                Switch("skip_shorthand_compacting", "--skip-shorthand-compacting"),
                Switch("source_map", "--source-map"),
                Switch("source_map_inline_sources", "--source-map-inline-sources"),
                Switch("skip_advanced", "--skip-advanced"),
                Switch("skip_aggresive_merging", "--skip-aggressive-merging"),
                Value("skip_import_from", "--skip-import-from"),
                Unless("media_merging", "--skip-media-merging"),
                Value("rounding_precision", "--rounding-precision"),
                Value("compatibility", "--compatibility"),
                Switch("debug", "--debug"),
            ],
        ),
    },
    FilterSpec {
        kind: FilterKind::ClosureApi,
        params: NO_SETTINGS,
        settings: CLOSURE_SETTINGS,
        runtime: Runtime::Passthrough,
    },
    FilterSpec {
        kind: FilterKind::ClosureJar,
        params: JAR,
        settings: CLOSURE_SETTINGS,
        runtime: external(Program::Jar, Io::Stdio, &[], CLOSURE_FLAGS),
    },
    FilterSpec {
        kind: FilterKind::Coffee,
        params: &[bin("/usr/bin/coffee"), NODE],
        settings: &[TIMEOUT, NODE_PATHS, opt("bare", Null), opt("no_header", Null)],
        runtime: external(
            Program::Bin,
            Io::Stdio,
            &["--compile", "--stdio", "--print"],
            &[Switch("bare", "--bare"), Switch("no_header", "--no-header")],
        ),
    },
    FilterSpec {
        kind: FilterKind::Compass,
        params: &[bin("/usr/bin/compass"), RUBY],
        settings: &[
            opt("scss", Null),
            opt("unix_newlines", Null),
            opt("no_cache", Null),
            opt("force", Null),
            opt("quiet", Null),
            TIMEOUT,
            renamed("debug", "debug_info", Bool(false)),
            opt("boring", Bool(true)),
            opt("no_line_comments", Bool(false)),
            opt("style", Null),
            opt("images_dir", Null),
            opt("fonts_dir", Null),
            opt("relative_assets", Bool(false)),
            opt("javascripts_dir", Null),
            opt("http_path", Null),
            opt("http_images_path", Null),
            opt("http_fonts_path", Null),
            opt("http_generated_images_path", Null),
            opt("generated_images_path", Null),
            opt("http_javascripts_path", Null),
            opt("plugins", EmptyList),
            opt("load_paths", EmptyList),
            opt("home_env", Bool(true)),
            opt("cache_location", Null),
        ],
        runtime: external(
            Program::Bin,
            Io::InputFile,
            &["compile", "--stdout"],
            &[
                Switch("unix_newlines", "--unix-newlines"),
                Switch("no_cache", "--no-cache"),
                Switch("force", "--force"),
                Switch("quiet", "--quiet"),
                Switch("debug_info", "--debug-info"),
                Switch("boring", "--boring"),
                Switch("no_line_comments", "--no-line-comments"),
                Value("style", "--output-style"),
                Value("images_dir", "--images-dir"),
                Value("fonts_dir", "--fonts-dir"),
                Switch("relative_assets", "--relative-assets"),
                Value("javascripts_dir", "--javascripts-dir"),
                Value("http_path", "--http-path"),
                Value("http_images_path", "--http-images-path"),
                Value("http_fonts_path", "--http-fonts-path"),
                Value("http_generated_images_path", "--http-generated-images-path"),
                Value("generated_images_path", "--generated-images-path"),
                Value("http_javascripts_path", "--http-javascripts-path"),
                Each("plugins", "--require"),
                Each("load_paths", "--load"),
                Value("cache_location", "--cache-dir"),
            ],
        ),
    },
    FilterSpec {
        kind: FilterKind::CssCacheBusting,
        params: NO_SETTINGS,
        settings: &[opt("version", Null), opt("format", Str("%s?%s"))],
        runtime: Runtime::Builtin(Builtin::CssCacheBusting),
    },
    FilterSpec {
        kind: FilterKind::CssEmbed,
        params: JAR,
        settings: &[
            TIMEOUT,
            opt("charset", Str("utf8")),
            opt("mhtml", Bool(false)),
            opt("mhtml_root", Null),
            opt("root", Null),
            opt("skip_missing", Bool(false)),
            opt("max_uri_length", Null),
            opt("max_image_size", Null),
        ],
        runtime: external(
            Program::Jar,
            Io::InputFile,
            &[],
            &[
                Value("charset", "--charset"),
                Switch("mhtml", "--mhtml"),
                Value("mhtml_root", "--mhtmlroot"),
                Value("root", "--root"),
                Switch("skip_missing", "--skip-missing"),
                Value("max_uri_length", "--max-uri-length"),
                Value("max_image_size", "--max-image-size"),
            ],
        ),
    },
    FilterSpec {
        kind: FilterKind::CssImport,
        params: NO_SETTINGS,
        settings: NO_SETTINGS,
        runtime: Runtime::Passthrough,
    },
    FilterSpec {
        kind: FilterKind::CssMin,
        params: NO_SETTINGS,
        settings: &[opt("filters", EmptyList), opt("plugins", EmptyList)],
        runtime: Runtime::Builtin(Builtin::MinifyCss),
    },
    FilterSpec {
        kind: FilterKind::CssRewrite,
        params: NO_SETTINGS,
        settings: NO_SETTINGS,
        runtime: Runtime::Builtin(Builtin::CssRewrite),
    },
    FilterSpec {
        kind: FilterKind::Dart,
        params: &[bin("/usr/bin/dart2js")],
        settings: &[TIMEOUT],
        runtime: external(Program::Bin, Io::OutputFlag("-o"), &[], &[]),
    },
    FilterSpec {
        kind: FilterKind::EmberPrecompile,
        params: &[bin("/usr/bin/ember-precompile"), NODE],
        settings: &[TIMEOUT, NODE_PATHS],
        runtime: external(Program::Bin, Io::OutputFlag("-f"), &[], &[]),
    },
    FilterSpec {
        kind: FilterKind::Gss,
        params: JAR,
        settings: &[
            TIMEOUT,
            opt("allow_unrecognized_functions", Null),
            opt("allowed_non_standard_functions", Null),
            opt("copyright_notice", Null),
            opt("define", Null),
            opt("gss_function_map_provider", Null),
            opt("input_orientation", Null),
            opt("output_orientation", Null),
            opt("pretty_print", Null),
        ],
        runtime: external(
            Program::Jar,
            Io::InputFile,
            &[],
            &[
                Switch("allow_unrecognized_functions", "--allow-unrecognized-functions"),
                Each("allowed_non_standard_functions", "--allowed-non-standard-function"),
                Value("copyright_notice", "--copyright-notice"),
                Each("define", "--define"),
                Value("gss_function_map_provider", "--gss-function-map-provider"),
                Value("input_orientation", "--input-orientation"),
                Value("output_orientation", "--output-orientation"),
                Switch("pretty_print", "--pretty-print"),
            ],
        ),
    },
    FilterSpec {
        kind: FilterKind::Handlebars,
        params: &[bin("/usr/bin/handlebars"), NODE],
        settings: &[TIMEOUT, NODE_PATHS, opt("minimize", Bool(false)), opt("simple", Bool(false))],
        runtime: external(
            Program::Bin,
            Io::OutputFlag("-f"),
            &[],
            &[Switch("minimize", "--min"), Switch("simple", "--simple")],
        ),
    },
    FilterSpec {
        kind: FilterKind::Jpegoptim,
        params: &[bin("/usr/bin/jpegoptim")],
        settings: &[TIMEOUT, opt("strip_all", Bool(false)), opt("max", Null)],
        runtime: external(
            Program::Bin,
            Io::InPlace,
            &[],
            &[Switch("strip_all", "--strip-all"), Attached("max", "--max=")],
        ),
    },
    FilterSpec {
        kind: FilterKind::Jpegtran,
        params: &[bin("/usr/bin/jpegtran")],
        settings: &[
            TIMEOUT,
            opt("copy", Null),
            opt("optimize", Bool(false)),
            opt("progressive", Bool(false)),
            opt("restart", Null),
        ],
        runtime: external(
            Program::Bin,
            Io::Stdio,
            &[],
            &[
                Value("copy", "-copy"),
                Switch("optimize", "-optimize"),
                Switch("progressive", "-progressive"),
                Value("restart", "-restart"),
            ],
        ),
    },
    FilterSpec {
        kind: FilterKind::JsMin,
        params: NO_SETTINGS,
        settings: NO_SETTINGS,
        runtime: Runtime::Builtin(Builtin::MinifyJs),
    },
    FilterSpec {
        kind: FilterKind::JsMinPlus,
        params: NO_SETTINGS,
        settings: NO_SETTINGS,
        runtime: Runtime::Builtin(Builtin::MinifyJs),
    },
    FilterSpec {
        kind: FilterKind::JSqueeze,
        params: NO_SETTINGS,
        settings: &[
            opt("single_line", Bool(true)),
            opt("keep_important_comments", Bool(true)),
            opt("special_var_rx", Bool(false)),
        ],
        runtime: Runtime::Builtin(Builtin::MinifyJs),
    },
    FilterSpec {
        kind: FilterKind::Less,
        params: &[NODE, NODE_PATHS],
        settings: &[TIMEOUT, opt("compress", Null), opt("load_paths", EmptyList)],
        runtime: Runtime::Node(NodeModule::Less),
    },
    FilterSpec {
        kind: FilterKind::Lessphp,
        params: NO_SETTINGS,
        settings: &[
            opt("presets", EmptyList),
            renamed("paths", "load_paths", EmptyList),
            opt("formatter", Null),
            opt("preserve_comments", Null),
        ],
        runtime: Runtime::Passthrough,
    },
    FilterSpec {
        kind: FilterKind::MinifyCssCompressor,
        params: NO_SETTINGS,
        settings: NO_SETTINGS,
        runtime: Runtime::Builtin(Builtin::MinifyCss),
    },
    FilterSpec {
        kind: FilterKind::OptiPng,
        params: &[bin("/usr/bin/optipng")],
        settings: &[TIMEOUT, opt("level", Null)],
        runtime: external(Program::Bin, Io::InPlace, &["-quiet"], &[Attached("level", "-o")]),
    },
    FilterSpec {
        kind: FilterKind::Packager,
        params: &[opt("packages", EmptyList)],
        settings: NO_SETTINGS,
        runtime: Runtime::Passthrough,
    },
    FilterSpec {
        kind: FilterKind::Packer,
        params: NO_SETTINGS,
        settings: &[
            opt("fast_decode", Bool(true)),
            opt("special_chars", Bool(false)),
            opt("encoding", Str("None")),
        ],
        runtime: Runtime::Builtin(Builtin::MinifyJs),
    },
    FilterSpec {
        kind: FilterKind::PhpCssEmbed,
        params: NO_SETTINGS,
        settings: NO_SETTINGS,
        runtime: Runtime::Passthrough,
    },
    FilterSpec {
        kind: FilterKind::Pngout,
        params: &[bin("/usr/bin/pngout")],
        settings: &[
            TIMEOUT,
            opt("color", Null),
            opt("filter", Null),
            opt("strategy", Null),
            opt("block_split_threshold", Null),
        ],
        runtime: external(
            Program::Bin,
            Io::InPlace,
            &["-y", "-q"],
            &[
                Attached("color", "-c"),
                Attached("filter", "-f"),
                Attached("strategy", "-s"),
                Attached("block_split_threshold", "-b"),
            ],
        ),
    },
    FilterSpec {
        kind: FilterKind::ReactJsx,
        params: &[bin("/usr/bin/jsx"), NODE],
        settings: NO_SETTINGS,
        runtime: external(Program::Bin, Io::Stdio, &[], &[]),
    },
    FilterSpec {
        kind: FilterKind::Roole,
        params: &[bin("/usr/bin/roole"), NODE],
        settings: &[TIMEOUT, NODE_PATHS],
        runtime: external(Program::Bin, Io::Stdio, &["--print"], &[]),
    },
    FilterSpec {
        kind: FilterKind::Sass,
        params: &[bin("/usr/bin/sass"), RUBY],
        settings: SASS_SETTINGS,
        runtime: external(Program::Bin, Io::Stdio, &["--stdin"], SASS_FLAGS),
    },
    FilterSpec {
        kind: FilterKind::Scss,
        params: &[bin("/usr/bin/sass"), RUBY],
        settings: SASS_SETTINGS,
        runtime: external(Program::Bin, Io::Stdio, &["--stdin", "--scss"], SASS_FLAGS),
    },
    FilterSpec {
        kind: FilterKind::Sassphp,
        params: NO_SETTINGS,
        settings: &[opt("output_style", Null), opt("include_paths", EmptyList)],
        runtime: Runtime::Passthrough,
    },
    FilterSpec {
        kind: FilterKind::Scssphp,
        params: NO_SETTINGS,
        settings: &[
            opt("compass", Bool(false)),
            opt("import_paths", EmptyList),
            opt("variables", EmptyList),
            opt("formatter", Null),
        ],
        runtime: Runtime::Passthrough,
    },
    FilterSpec {
        kind: FilterKind::Sprockets,
        params: &[opt("lib", Null), RUBY],
        settings: &[TIMEOUT, opt("asset_root", Null)],
        runtime: Runtime::Passthrough,
    },
    FilterSpec {
        kind: FilterKind::Stylus,
        params: &[NODE, NODE_PATHS],
        settings: &[TIMEOUT, opt("compress", Null), renamed("nib", "use_nib", Null)],
        runtime: Runtime::Node(NodeModule::Stylus),
    },
    FilterSpec {
        kind: FilterKind::TypeScript,
        params: &[bin("/usr/bin/tsc"), NODE],
        settings: &[TIMEOUT, NODE_PATHS],
        runtime: external(Program::Bin, Io::OutputFlag("--out"), &[], &[]),
    },
    FilterSpec {
        kind: FilterKind::UglifyCss,
        params: &[bin("/usr/bin/uglifycss"), NODE],
        settings: &[
            TIMEOUT,
            NODE_PATHS,
            opt("expand_vars", Bool(false)),
            opt("ugly_comments", Bool(false)),
            opt("cute_comments", Bool(false)),
        ],
        runtime: external(
            Program::Bin,
            Io::InputFile,
            &[],
            &[
                Switch("expand_vars", "--expand-vars"),
                Switch("ugly_comments", "--ugly-comments"),
                Switch("cute_comments", "--cute-comments"),
            ],
        ),
    },
    FilterSpec {
        kind: FilterKind::UglifyJs,
        params: &[bin("/usr/bin/uglifyjs"), NODE],
        settings: &[
            TIMEOUT,
            NODE_PATHS,
            opt("beautify", Bool(false)),
            opt("no_copyright", Bool(false)),
            opt("unsafe", Bool(false)),
            opt("mangle", Bool(false)),
            opt("defines", EmptyList),
        ],
        runtime: external(
            Program::Bin,
            Io::InputFile,
            &[],
            &[
                Switch("beautify", "--beautify"),
                Switch("no_copyright", "--no-copyright"),
                Switch("unsafe", "--unsafe"),
                Unless("mangle", "--no-mangle"),
                Each("defines", "--define"),
            ],
        ),
    },
    FilterSpec {
        kind: FilterKind::UglifyJs2,
        params: &[bin("/usr/bin/uglifyjs"), NODE],
        settings: &[
            TIMEOUT,
            NODE_PATHS,
            opt("compress", Bool(false)),
            opt("beautify", Bool(false)),
            opt("mangle", Bool(false)),
            opt("screw_ie8", Bool(false)),
            opt("comments", Bool(false)),
            opt("wrap", Bool(false)),
            opt("defines", EmptyList),
        ],
        runtime: external(
            Program::Bin,
            Io::InputFile,
            &[],
            &[
                Switch("compress", "--compress"),
                Switch("beautify", "--beautify"),
                Switch("mangle", "--mangle"),
                Switch("screw_ie8", "--screw-ie8"),
                Switch("comments", "--comments"),
                Value("wrap", "--wrap"),
                Joined("defines", "--define", ","),
            ],
        ),
    },
    FilterSpec {
        kind: FilterKind::YuiCss,
        params: JAR,
        settings: &[opt("charset", Str("utf8")), TIMEOUT, opt("stacksize", Null), opt("linebreak", Null)],
        runtime: external(
            Program::Jar,
            Io::InputFile,
            &["--type", "css"],
            &[Value("charset", "--charset"), Value("linebreak", "--line-break")],
        ),
    },
    FilterSpec {
        kind: FilterKind::YuiJs,
        params: JAR,
        settings: &[
            opt("charset", Str("utf8")),
            TIMEOUT,
            opt("stacksize", Null),
            opt("nomunge", Null),
            opt("preserve_semi", Null),
            opt("disable_optimizations", Null),
            opt("linebreak", Null),
        ],
        runtime: external(
            Program::Jar,
            Io::InputFile,
            &["--type", "js"],
            &[
                Value("charset", "--charset"),
                Switch("nomunge", "--nomunge"),
                Switch("preserve_semi", "--preserve-semi"),
                Switch("disable_optimizations", "--disable-optimizations"),
                Value("linebreak", "--line-break"),
            ],
        ),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_kinds() {
        for (index, kind) in FilterKind::ALL.into_iter().enumerate() {
            assert_eq!(TABLE[index].kind, kind, "entry {index}");
            assert_eq!(lookup(kind).kind, kind);
        }
    }

    #[test]
    fn test_flags_reference_declared_settings() {
        for spec in &TABLE {
            let Runtime::External { flags, .. } = spec.runtime else {
                continue;
            };
            for flag in flags {
                let field = match *flag {
                    Switch(f, _) | Unless(f, _) | Value(f, _) | Attached(f, _) | Each(f, _) => f,
                    Joined(f, _, _) => f,
                };
                assert!(
                    spec.settings.iter().any(|s| s.field == field),
                    "{}: flag references unknown field `{field}`",
                    spec.kind
                );
            }
        }
    }

    #[test]
    fn test_external_bin_filters_declare_bin() {
        for spec in &TABLE {
            if let Runtime::External { program, .. } = spec.runtime {
                let wanted = match program {
                    Program::Bin => "bin",
                    Program::Jar => "jar",
                };
                assert!(
                    spec.params.iter().any(|p| p.key == wanted),
                    "{} lacks `{wanted}`",
                    spec.kind
                );
            }
        }
    }

    #[test]
    fn test_jar_filters_require_jar() {
        let jar_kinds = [
            FilterKind::ClosureJar,
            FilterKind::CssEmbed,
            FilterKind::Gss,
            FilterKind::YuiCss,
            FilterKind::YuiJs,
        ];
        for kind in jar_kinds {
            let jar = lookup(kind).params.iter().find(|p| p.key == "jar").unwrap();
            assert_eq!(jar.default, Required);
        }
    }

    #[test]
    fn test_documented_defaults() {
        let sass = lookup(FilterKind::Sass);
        assert_eq!(sass.params[0].default, Str("/usr/bin/sass"));
        assert_eq!(lookup(FilterKind::Scss).params[0].default, Str("/usr/bin/sass"));

        let busting = lookup(FilterKind::CssCacheBusting);
        assert_eq!(busting.settings[1].default, Str("%s?%s"));

        let packer = lookup(FilterKind::Packer);
        assert_eq!(packer.settings[2].default, Str("None"));
    }
}
