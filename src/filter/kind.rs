//! Closed set of filter kinds.

use std::fmt;

/// Every filter the registry knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKind {
    Autoprefixer,
    CleanCss,
    ClosureApi,
    ClosureJar,
    Coffee,
    Compass,
    CssCacheBusting,
    CssEmbed,
    CssImport,
    CssMin,
    CssRewrite,
    Dart,
    EmberPrecompile,
    Gss,
    Handlebars,
    Jpegoptim,
    Jpegtran,
    JsMin,
    JsMinPlus,
    JSqueeze,
    Less,
    Lessphp,
    MinifyCssCompressor,
    OptiPng,
    Packager,
    Packer,
    PhpCssEmbed,
    Pngout,
    ReactJsx,
    Roole,
    Sass,
    Scss,
    Sassphp,
    Scssphp,
    Sprockets,
    Stylus,
    TypeScript,
    UglifyCss,
    UglifyJs,
    UglifyJs2,
    YuiCss,
    YuiJs,
}

impl FilterKind {
    pub const ALL: [FilterKind; 42] = [
        Self::Autoprefixer,
        Self::CleanCss,
        Self::ClosureApi,
        Self::ClosureJar,
        Self::Coffee,
        Self::Compass,
        Self::CssCacheBusting,
        Self::CssEmbed,
        Self::CssImport,
        Self::CssMin,
        Self::CssRewrite,
        Self::Dart,
        Self::EmberPrecompile,
        Self::Gss,
        Self::Handlebars,
        Self::Jpegoptim,
        Self::Jpegtran,
        Self::JsMin,
        Self::JsMinPlus,
        Self::JSqueeze,
        Self::Less,
        Self::Lessphp,
        Self::MinifyCssCompressor,
        Self::OptiPng,
        Self::Packager,
        Self::Packer,
        Self::PhpCssEmbed,
        Self::Pngout,
        Self::ReactJsx,
        Self::Roole,
        Self::Sass,
        Self::Scss,
        Self::Sassphp,
        Self::Scssphp,
        Self::Sprockets,
        Self::Stylus,
        Self::TypeScript,
        Self::UglifyCss,
        Self::UglifyJs,
        Self::UglifyJs2,
        Self::YuiCss,
        Self::YuiJs,
    ];

    /// Configuration name of the kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Autoprefixer => "autoprefixer",
            Self::CleanCss => "cleancss",
            Self::ClosureApi => "closure_api",
            Self::ClosureJar => "closure_jar",
            Self::Coffee => "coffee",
            Self::Compass => "compass",
            Self::CssCacheBusting => "csscachebusting",
            Self::CssEmbed => "cssembed",
            Self::CssImport => "cssimport",
            Self::CssMin => "cssmin",
            Self::CssRewrite => "cssrewrite",
            Self::Dart => "dart",
            Self::EmberPrecompile => "emberprecompile",
            Self::Gss => "gss",
            Self::Handlebars => "handlebars",
            Self::Jpegoptim => "jpegoptim",
            Self::Jpegtran => "jpegtran",
            Self::JsMin => "jsmin",
            Self::JsMinPlus => "jsminplus",
            Self::JSqueeze => "jsqueeze",
            Self::Less => "less",
            Self::Lessphp => "lessphp",
            Self::MinifyCssCompressor => "minifycsscompressor",
            Self::OptiPng => "optipng",
            Self::Packager => "packager",
            Self::Packer => "packer",
            Self::PhpCssEmbed => "phpcssembed",
            Self::Pngout => "pngout",
            Self::ReactJsx => "reactjsx",
            Self::Roole => "roole",
            Self::Sass => "sass",
            Self::Scss => "scss",
            Self::Sassphp => "sassphp",
            Self::Scssphp => "scssphp",
            Self::Sprockets => "sprockets",
            Self::Stylus => "stylus",
            Self::TypeScript => "typescript",
            Self::UglifyCss => "uglifycss",
            Self::UglifyJs => "uglifyjs",
            Self::UglifyJs2 => "uglifyjs2",
            Self::YuiCss => "yui_css",
            Self::YuiJs => "yui_js",
        }
    }

    /// Look up a kind by name, ignoring one leading underscore.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix('_').unwrap_or(name);
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_names_unique() {
        let names: FxHashSet<_> = FilterKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), FilterKind::ALL.len());
    }

    #[test]
    fn test_from_name_roundtrips() {
        for kind in FilterKind::ALL {
            assert_eq!(FilterKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_single_underscore_stripped() {
        assert_eq!(FilterKind::from_name("_sass"), Some(FilterKind::Sass));
        assert_eq!(FilterKind::from_name("__sass"), None);
        assert_eq!(FilterKind::from_name("yui_js"), Some(FilterKind::YuiJs));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(FilterKind::from_name("sassy"), None);
        assert_eq!(FilterKind::from_name(""), None);
    }
}
