//! Batch conversion of whole template directories.
//!
//! Parsing Django templates is the host's job; a [`TemplateLoader`] hands
//! over the parsed tree for each template name. [`convert_templates`] walks
//! the loader's template directories, mirrors the directory layout under the
//! output directory and writes one converted file per matching template.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::ast::Node;
use crate::errors::{ConvertError, Result};
use crate::sink::{IoSink, OutputSink, SharedOutput};
use crate::writer::Writer;

/// File suffixes converted when the caller does not pick any.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".html", ".txt"];

// ============================================================================
// LOADERS
// ============================================================================

/// Source of parsed templates.
pub trait TemplateLoader {
    /// Directories searched for templates, in lookup order.
    fn template_dirs(&self) -> &[PathBuf];

    /// Returns the parsed tree for `name`, a `/`-separated path relative to
    /// one of the template directories.
    fn load(&self, name: &str) -> Result<Vec<Node>>;
}

/// Loads trees serialised as JSON, one `<name>.json` file per template under
/// a dump directory that mirrors the template directories.
#[derive(Debug, Clone)]
pub struct JsonTreeLoader {
    template_dirs: Vec<PathBuf>,
    dump_dir: PathBuf,
}

impl JsonTreeLoader {
    pub fn new(template_dirs: Vec<PathBuf>, dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dirs,
            dump_dir: dump_dir.into(),
        }
    }
}

impl TemplateLoader for JsonTreeLoader {
    fn template_dirs(&self) -> &[PathBuf] {
        &self.template_dirs
    }

    fn load(&self, name: &str) -> Result<Vec<Node>> {
        let path = self.dump_dir.join(format!("{name}.json"));
        read_tree(&path).map_err(|err| match err {
            ConvertError::Load { message, .. } => ConvertError::load(name, message),
            other => other,
        })
    }
}

/// Reads one serialised node list from disk.
pub fn read_tree(path: &Path) -> Result<Vec<Node>> {
    let text = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| ConvertError::load(&path.display().to_string(), e))
}

// ============================================================================
// DISCOVERY
// ============================================================================

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let file_name = file_name.to_lowercase();
    extensions
        .iter()
        .any(|ext| file_name.ends_with(&ext.as_ref().to_lowercase()))
}

fn template_name(relative: &Path) -> String {
    relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Collects matching templates keyed by name. When two directories provide
/// the same name the earlier directory wins, as in Django's loader.
fn discover<S: AsRef<str>>(dirs: &[PathBuf], extensions: &[S]) -> Result<BTreeMap<String, PathBuf>> {
    let mut found = BTreeMap::new();
    for dir in dirs {
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|source| ConvertError::Walk {
                path: dir.clone(),
                source,
            })?;
            if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let name = template_name(relative);
            if found.contains_key(&name) {
                debug!(template = %name, dir = %dir.display(), "shadowed by an earlier directory");
                continue;
            }
            found.insert(name, relative.to_path_buf());
        }
    }
    Ok(found)
}

// ============================================================================
// CONVERSION
// ============================================================================

/// Converts `nodes` into the file at `path`, restoring the writer's previous
/// output stream afterwards.
pub fn convert_file(writer: &mut Writer, nodes: &[Node], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| ConvertError::io(path, e))?;
    let sink = Rc::new(RefCell::new(IoSink::new(BufWriter::new(file))));
    let shared: Rc<RefCell<dyn OutputSink>> = sink.clone();
    let previous = writer.replace_stream(SharedOutput(shared));
    writer.body(nodes);
    writer.replace_stream(previous);
    let finished = sink.borrow_mut().finish();
    finished.map_err(|e| ConvertError::io(path, e))
}

/// Converts every template under the loader's directories whose file name
/// ends in one of `extensions` (case-insensitive). `callback` receives each
/// relative path before its file is written; without one the path is printed
/// to stdout. Returns the written output paths in processing order.
pub fn convert_templates<S: AsRef<str>>(
    loader: &dyn TemplateLoader,
    output_dir: &Path,
    extensions: &[S],
    writer: &mut Writer,
    mut callback: Option<&mut dyn FnMut(&Path)>,
) -> Result<Vec<PathBuf>> {
    let templates = discover(loader.template_dirs(), extensions)?;
    let mut written = Vec::with_capacity(templates.len());

    for (name, relative) in templates {
        let target = output_dir.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;
        }
        match callback.as_deref_mut() {
            Some(callback) => callback(relative.as_path()),
            None => println!("{}", relative.display()),
        }

        let nodes = loader.load(&name)?;
        convert_file(writer, &nodes, &target)?;
        info!(template = %name, output = %target.display(), "converted");
        written.push(target);
    }
    Ok(written)
}
