//! Template copying and manifest rendering
//!
//! Static templates are copied byte for byte. Manifests go through two
//! line-oriented passes: `{{placeholder}}` substitution and a rewrite of the
//! `name`/`description` keys under `[project]`. Neither pass parses TOML;
//! lines they do not recognize pass through untouched.
//!
//! The default template set is compiled into the binary. A directory on disk
//! replaces it wholesale.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};
use crate::paths;
use crate::project::ProjectSpec;

/// Copied into every project
pub const COMMON_STATIC_FILES: &[&str] = &["LICENSE", ".gitignore", ".editorconfig", ".flake8"];

/// Tool sections shared by every variant
pub const BASE_MANIFEST: &str = "pyproject.base.toml";

/// Setuptools manifest with `{{project_name}}`/`{{description}}` placeholders
pub const SETUPTOOLS_MANIFEST: &str = "pyproject.setuptools.toml";

/// Section whose keys get rewritten
const PROJECT_SECTION: &str = "project";

const BUNDLED: &[(&str, &[u8])] = &[
    ("LICENSE", include_bytes!("../../resources/templates/LICENSE")),
    (".gitignore", include_bytes!("../../resources/templates/.gitignore")),
    (".editorconfig", include_bytes!("../../resources/templates/.editorconfig")),
    (".flake8", include_bytes!("../../resources/templates/.flake8")),
    ("poetry.toml", include_bytes!("../../resources/templates/poetry.toml")),
    (
        BASE_MANIFEST,
        include_bytes!("../../resources/templates/pyproject.base.toml"),
    ),
    (
        SETUPTOOLS_MANIFEST,
        include_bytes!("../../resources/templates/pyproject.setuptools.toml"),
    ),
];

/// Where template files come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The set compiled into the binary
    Bundled,
    /// A directory of template files
    Dir(PathBuf),
}

impl TemplateSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::Dir(dir.into())
    }

    /// Pick the template source: explicit (flag or env), configured, user
    /// override if present, bundled.
    pub fn resolve(explicit: Option<&Path>, configured: Option<&Path>) -> Self {
        match paths::resolve_templates_dir(explicit, configured) {
            Some(dir) => Self::Dir(dir),
            None => Self::Bundled,
        }
    }

    /// Raw bytes of one template
    pub fn bytes(&self, name: &str) -> Result<Cow<'static, [u8]>> {
        match self {
            Self::Bundled => BUNDLED
                .iter()
                .find(|(file, _)| *file == name)
                .map(|(_, bytes)| Cow::Borrowed(*bytes))
                .ok_or_else(|| {
                    ScaffoldError::io("read bundled template", name)(io::ErrorKind::NotFound.into())
                }),
            Self::Dir(dir) => {
                let path = dir.join(name);
                fs::read(&path)
                    .map(Cow::Owned)
                    .map_err(ScaffoldError::io("read template", &path))
            }
        }
    }

    pub fn read(&self, name: &str) -> Result<String> {
        let bytes = self.bytes(name)?;
        String::from_utf8(bytes.into_owned()).map_err(|e| {
            ScaffoldError::io("decode template", name)(io::Error::new(io::ErrorKind::InvalidData, e))
        })
    }

    fn contains(&self, name: &str) -> bool {
        match self {
            Self::Bundled => BUNDLED.iter().any(|(file, _)| *file == name),
            Self::Dir(dir) => dir.join(name).is_file(),
        }
    }

    /// Names from `wanted` that are not present
    pub fn missing<'n>(&self, wanted: &[&'n str]) -> Vec<&'n str> {
        wanted
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }

    /// Copy each named template verbatim into `dest`.
    pub fn copy_static_files(&self, names: &[&str], dest: &Path) -> Result<()> {
        for name in names {
            let bytes = self.bytes(name)?;
            let to = dest.join(name);
            fs::write(&to, &bytes).map_err(ScaffoldError::io("write", &to))?;
            tracing::debug!(template = %name, "copied");
        }
        Ok(())
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => write!(f, "bundled"),
            Self::Dir(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Replace every `{{key}}` occurrence with its value.
pub fn render_placeholders(text: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(text.to_string(), |acc, (key, value)| acc.replace(key, value))
}

/// Rewrite `name =` and `description =` lines inside `[project]`.
///
/// Only those two keys, and only in that exact section, are touched. The
/// new values are emitted as quoted TOML strings. Line endings and every
/// other line are preserved byte for byte.
pub fn rewrite_project_keys(text: &str, name: &str, description: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut section = String::new();

    for line in text.split_inclusive('\n') {
        if let Some(header) = section_header(line) {
            section = header.to_string();
        }

        let body = line.trim_end_matches(['\n', '\r']);
        let ending = &line[body.len()..];

        let replacement = if section == PROJECT_SECTION {
            if is_key_assignment(body, "name") {
                Some(("name", name))
            } else if is_key_assignment(body, "description") {
                Some(("description", description))
            } else {
                None
            }
        } else {
            None
        };

        match replacement {
            Some((key, value)) => {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(&toml_string(value));
                out.push_str(ending);
            }
            None => out.push_str(line),
        }
    }

    out
}

/// Render a manifest template for a project: placeholders, then key rewrite.
///
/// Placeholder values are escaped for a TOML basic string, so a value can
/// never break out of the quotes the template puts around it.
pub fn render_manifest(source: &TemplateSource, template: &str, spec: &ProjectSpec) -> Result<String> {
    let raw = source.read(template)?;
    let name = escape_basic(spec.name());
    let description = escape_basic(spec.description());
    let rendered = render_placeholders(
        &raw,
        &[("{{project_name}}", &name), ("{{description}}", &description)],
    );
    Ok(rewrite_project_keys(&rendered, spec.name(), spec.description()))
}

/// Append `base` after `existing`, dropping base sections `existing` already has.
///
/// Lines before the first header in `base` are always kept.
pub fn append_remaining(existing: &str, base: &str) -> String {
    let present: HashSet<String> = existing
        .lines()
        .filter_map(section_header)
        .map(str::to_string)
        .collect();

    let mut out = existing.to_string();
    if !out.is_empty() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }

    let mut skipping = false;
    for line in base.split_inclusive('\n') {
        if let Some(header) = section_header(line) {
            skipping = present.contains(header);
            if skipping {
                tracing::debug!(section = %header, "manifest already has section, skipping");
            }
        }
        if !skipping {
            out.push_str(line);
        }
    }

    out
}

/// Append the base template to the manifest already in the project root.
pub fn append_base_manifest(source: &TemplateSource, root: &Path) -> Result<()> {
    let manifest = root.join(paths::MANIFEST_FILE);
    let existing = fs::read_to_string(&manifest).map_err(ScaffoldError::io("read", &manifest))?;
    let base = source.read(BASE_MANIFEST)?;
    fs::write(&manifest, append_remaining(&existing, &base))
        .map_err(ScaffoldError::io("write", &manifest))
}

/// Write `README.md` with a heading and the description, if any.
pub fn write_readme(spec: &ProjectSpec) -> Result<()> {
    let path = spec.root().join(paths::README_FILE);
    fs::write(&path, readme_content(spec)).map_err(ScaffoldError::io("write", &path))
}

pub fn readme_content(spec: &ProjectSpec) -> String {
    let mut content = format!("# {}\n", spec.name());
    if !spec.description().is_empty() {
        content.push_str(spec.description());
        content.push('\n');
    }
    content
}

/// `[section]` or `[[section]]` name, if this line is a header
fn section_header(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if line.starts_with('[') && trimmed.ends_with(']') {
        Some(trimmed.trim_matches(['[', ']']).trim())
    } else {
        None
    }
}

/// `key *=` at the start of the line
fn is_key_assignment(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .map(|rest| rest.trim_start_matches(' ').starts_with('='))
        .unwrap_or(false)
}

/// Always a single-line basic string
fn toml_string(value: &str) -> String {
    format!("\"{}\"", escape_basic(value))
}

/// Escape for the inside of a TOML basic string
fn escape_basic(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::NewProject;
    use tempfile::TempDir;

    const TEMPLATE: &str = "\
[build-system]
requires = [\"setuptools>=61\"]
name = \"not-this-one\"

[project]
name = \"placeholder\"
version = \"0.1.0\"
description =   \"old\"
names = \"untouched\"
  name = \"indented stays\"

[tool.black]
name = \"also not this\"
description = \"nor this\"
";

    fn spec(name: &str, description: &str) -> ProjectSpec {
        ProjectSpec::new(NewProject {
            name: name.to_string(),
            root: Some("/tmp/sprout-test".into()),
            description: description.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_rewrite_only_touches_project_keys() {
        let out = rewrite_project_keys(TEMPLATE, "demo-app", "hello");

        let expected = TEMPLATE
            .replace("name = \"placeholder\"", "name = \"demo-app\"")
            .replace("description =   \"old\"", "description = \"hello\"");
        assert_eq!(out, expected);

        let changed: Vec<_> = TEMPLATE
            .lines()
            .zip(out.lines())
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(changed.len(), 2);
    }

    #[test]
    fn test_rewrite_preserves_crlf_and_missing_final_newline() {
        let text = "[project]\r\nname = \"x\"\r\ndescription = \"y\"";
        let out = rewrite_project_keys(text, "a", "b");
        assert_eq!(out, "[project]\r\nname = \"a\"\r\ndescription = \"b\"");
    }

    #[test]
    fn test_rewrite_escapes_quotes() {
        let out = rewrite_project_keys("[project]\ndescription = \"\"\n", "a", "say \"hi\"");
        let parsed: toml::Value = toml::from_str(&out).unwrap();
        assert_eq!(parsed["project"]["description"].as_str(), Some("say \"hi\""));
    }

    #[test]
    fn test_placeholders() {
        let out = render_placeholders(
            "name = \"{{project_name}}\"\n# {{project_name}}: {{description}}\n",
            &[("{{project_name}}", "my-lib"), ("{{description}}", "A test")],
        );
        assert_eq!(out, "name = \"my-lib\"\n# my-lib: A test\n");
    }

    #[test]
    fn test_append_remaining_skips_existing_sections() {
        let existing = "[project]\nname = \"x\"\n\n[tool.black]\nline-length = 100";
        let base = "# shared\n[tool.black]\nline-length = 88\n\n[tool.isort]\nprofile = \"black\"\n";

        let out = append_remaining(existing, base);
        assert_eq!(
            out,
            "[project]\nname = \"x\"\n\n[tool.black]\nline-length = 100\n\n# shared\n[tool.isort]\nprofile = \"black\"\n"
        );
        toml::from_str::<toml::Value>(&out).unwrap();
    }

    #[test]
    fn test_readme() {
        assert_eq!(readme_content(&spec("my-lib", "A test")), "# my-lib\nA test\n");
        assert_eq!(readme_content(&spec("my-lib", "")), "# my-lib\n");
    }

    #[test]
    fn test_copy_static_is_byte_exact() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let bytes = b"line one\r\n\xe2\x9c\x93 no trailing newline";
        fs::write(src.path().join("LICENSE"), bytes).unwrap();

        let source = TemplateSource::new(src.path());
        source.copy_static_files(&["LICENSE"], dest.path()).unwrap();
        assert_eq!(fs::read(dest.path().join("LICENSE")).unwrap(), bytes);
    }

    #[test]
    fn test_copy_missing_template_names_source_path() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = TemplateSource::new(src.path());

        let err = source.copy_static_files(&[".flake8"], dest.path()).unwrap_err();
        match err {
            ScaffoldError::Io { path, .. } => assert_eq!(path, src.path().join(".flake8")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(source.missing(&[".flake8", "LICENSE"]), vec![".flake8", "LICENSE"]);
    }

    #[test]
    fn test_bundled_setuptools_manifest_renders_to_valid_toml() {
        let source = TemplateSource::Bundled;
        let rendered = render_manifest(&source, SETUPTOOLS_MANIFEST, &spec("my-lib", "A test")).unwrap();
        let full = append_remaining(&rendered, &source.read(BASE_MANIFEST).unwrap());

        let parsed: toml::Value = toml::from_str(&full).unwrap();
        assert_eq!(parsed["project"]["name"].as_str(), Some("my-lib"));
        assert_eq!(parsed["project"]["description"].as_str(), Some("A test"));
        assert!(!full.contains("{{"));
    }

    #[test]
    fn test_multiline_and_quoted_descriptions_stay_valid_toml() {
        for description in ["first\nsecond", "say \"hi\"", "back\\slash\r\n\ttab", "'''"] {
            let rendered = render_manifest(
                &TemplateSource::Bundled,
                SETUPTOOLS_MANIFEST,
                &spec("my-lib", description),
            )
            .unwrap();

            let parsed: toml::Value = toml::from_str(&rendered)
                .unwrap_or_else(|e| panic!("{description:?} broke the manifest: {e}"));
            assert_eq!(parsed["project"]["description"].as_str(), Some(description));
            assert_eq!(parsed["project"]["name"].as_str(), Some("my-lib"));
        }
    }

    #[test]
    fn test_keys_are_always_basic_strings() {
        assert_eq!(toml_string("a'b"), "\"a'b\"");
        assert_eq!(toml_string("x\ny"), "\"x\\ny\"");
        assert_eq!(toml_string("\u{1}"), "\"\\u0001\"");
    }

    #[test]
    fn test_bundled_copy_needs_no_files_on_disk() {
        let dest = TempDir::new().unwrap();

        TemplateSource::Bundled
            .copy_static_files(COMMON_STATIC_FILES, dest.path())
            .unwrap();

        for name in COMMON_STATIC_FILES {
            let copied = fs::read(dest.path().join(name)).unwrap();
            assert!(!copied.is_empty(), "{name} is empty");
            assert_eq!(copied, TemplateSource::Bundled.bytes(name).unwrap().as_ref());
        }
    }

    #[test]
    fn test_bundled_set_covers_every_plan() {
        use crate::project::BuildSystemKind;
        use crate::scaffold::{plan_for, required_templates};

        for kind in [BuildSystemKind::Setuptools, BuildSystemKind::Poetry] {
            let wanted = required_templates(&plan_for(kind, true));
            assert!(TemplateSource::Bundled.missing(&wanted).is_empty(), "{kind}");
        }
        assert!(matches!(
            TemplateSource::Bundled.read("nope.toml"),
            Err(ScaffoldError::Io { .. })
        ));
    }

    #[test]
    fn test_resolve_prefers_explicit_dir() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            TemplateSource::resolve(Some(dir.path()), None),
            TemplateSource::Dir(dir.path().to_path_buf())
        );
        assert_eq!(
            TemplateSource::new(dir.path()).to_string(),
            dir.path().display().to_string()
        );
        assert_eq!(TemplateSource::Bundled.to_string(), "bundled");
    }
}
