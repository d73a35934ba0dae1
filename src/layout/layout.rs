use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};

use handlebars::Handlebars;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use serde::Serialize;
use snafu::prelude::*;
use tracing::debug;

use crate::{
    ext::ResolvedPathExt,
    filesystem::{TreeDescriptor, TreeError, TreeNode},
    layout::AppName,
};

const MICROSERVICE_LAYOUT: &str = include_str!("templates/microservice.yaml");

/// YAML text describing a project tree.
///
/// Mapping values become directories, string values become files with that
/// content, and null values become empty files. Names and contents are
/// Handlebars templates rendered with `app_name` when the layout is assembled.
#[derive(Debug, Clone)]
pub struct Layout {
    origin: String,
    text: Cow<'static, str>,
}

impl Layout {
    pub fn built_in() -> Self {
        Layout {
            origin: "built-in microservice layout".to_string(),
            text: Cow::Borrowed(MICROSERVICE_LAYOUT),
        }
    }

    pub fn read(path: &Path) -> Result<Self, LayoutError> {
        debug!("Reading layout file: {}", path.resolved_display());
        let text = fs::read_to_string(path).context(ReadSnafu {
            path: path.to_path_buf(),
        })?;
        Ok(Layout {
            origin: path.resolved_display(),
            text: Cow::Owned(text),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Builds the tree descriptor for `app_name`.
    pub fn assemble(&self, app_name: &AppName) -> Result<TreeDescriptor, LayoutError> {
        let documents = Yaml::load_from_str(&self.text).context(ParseSnafu)?;
        let top_level = match documents.first() {
            Some(Yaml::Mapping(mapping)) => mapping,
            Some(_) => return TopLevelNotMapSnafu.fail(),
            None => return EmptyLayoutSnafu.fail(),
        };

        let assembler = Assembler::new(app_name);
        let mut descriptor = TreeDescriptor::new();
        for (key, value) in top_level {
            let name = assembler.entry_name(key, Path::new(""))?;
            let node = assembler.node(value, &PathBuf::from(&name))?;
            descriptor
                .try_insert(name.clone(), node)
                .context(InvalidEntrySnafu { path: name })?;
        }

        ensure!(!descriptor.is_empty(), EmptyLayoutSnafu);
        Ok(descriptor)
    }
}

#[derive(Debug, Serialize)]
struct TemplateContext<'a> {
    app_name: &'a str,
}

struct Assembler<'a> {
    renderer: Handlebars<'static>,
    context: TemplateContext<'a>,
}

impl<'a> Assembler<'a> {
    fn new(app_name: &'a AppName) -> Self {
        let mut renderer = Handlebars::new();
        // Unknown placeholders are errors, and contents are not HTML
        renderer.set_strict_mode(true);
        renderer.register_escape_fn(handlebars::no_escape);

        Self {
            renderer,
            context: TemplateContext {
                app_name: app_name.as_str(),
            },
        }
    }

    fn render(&self, template: &str, path: &Path) -> Result<String, LayoutError> {
        self.renderer
            .render_template(template, &self.context)
            .context(RenderSnafu {
                path: path.display().to_string(),
            })
    }

    fn entry_name(&self, key: &Yaml, parent: &Path) -> Result<String, LayoutError> {
        match key {
            Yaml::Value(Scalar::String(name)) => self.render(name, &parent.join(&**name)),
            other => NonStringKeySnafu {
                parent: parent.display().to_string(),
                key: format!("{:?}", other),
            }
            .fail(),
        }
    }

    fn node(&self, value: &Yaml, path: &Path) -> Result<TreeNode, LayoutError> {
        match value {
            Yaml::Mapping(children) => self.directory(children, path),
            Yaml::Value(Scalar::String(contents)) => {
                Ok(TreeNode::file(self.render(contents, path)?))
            }
            Yaml::Value(Scalar::Null) => Ok(TreeNode::empty_file()),
            other => UnsupportedValueSnafu {
                path: path.display().to_string(),
                kind: describe(other),
            }
            .fail(),
        }
    }

    fn directory(
        &self,
        children: &LinkedHashMap<Yaml, Yaml>,
        path: &Path,
    ) -> Result<TreeNode, LayoutError> {
        let mut directory = TreeNode::directory();
        for (key, value) in children {
            let name = self.entry_name(key, path)?;
            let child_path = path.join(&name);
            let node = self.node(value, &child_path)?;
            directory
                .try_insert(name, node)
                .context(InvalidEntrySnafu {
                    path: child_path.display().to_string(),
                })?;
        }
        Ok(directory)
    }
}

fn describe(value: &Yaml) -> &'static str {
    match value {
        Yaml::Sequence(_) => "a sequence",
        Yaml::Value(Scalar::Boolean(_)) => "a boolean",
        Yaml::Value(Scalar::Integer(_)) => "an integer",
        _ => "a non-string value",
    }
}

#[derive(Debug, Snafu)]
pub enum LayoutError {
    #[snafu(display("Failed to read the layout file: {}", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the layout"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Layout defines no entries"))]
    EmptyLayoutError,
    #[snafu(display("Top level of the layout should be a map"))]
    TopLevelNotMapError,
    #[snafu(display("Entry names must be strings, found {} under '{}'", key, parent))]
    NonStringKeyError { parent: String, key: String },
    #[snafu(display(
        "'{}' is {}; expected a map (directory), a string or null (file)",
        path,
        kind
    ))]
    UnsupportedValueError { path: String, kind: &'static str },
    #[snafu(display("Failed to render the template for '{}'", path))]
    RenderError {
        path: String,
        source: handlebars::RenderError,
    },
    #[snafu(display("Invalid entry '{}'", path))]
    InvalidEntryError { path: String, source: TreeError },
}
