// Directory conversion through the JSON tree loader.

use std::fs;
use std::path::{Path, PathBuf};

use dj2jinja::batch::{convert_templates, JsonTreeLoader, TemplateLoader, DEFAULT_EXTENSIONS};
use dj2jinja::sink::OutputBuffer;
use dj2jinja::{ConvertError, Writer};
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            root: TempDir::new().unwrap(),
        };
        let templates = fixture.templates();
        write(&templates.join("index.html"), "{{ title }}");
        write(&templates.join("shop/cart.HTML"), "{% for i in items %}{% endfor %}");
        write(&templates.join("shop/style.css"), "body {}");

        let dumps = fixture.dumps();
        write(
            &dumps.join("index.html.json"),
            r#"[{"type": "variable", "expr": {"var": {"lookup": "title"}}}]"#,
        );
        write(
            &dumps.join("shop/cart.HTML.json"),
            r#"[{"type": "for", "loop_vars": ["i"], "sequence": {"var": {"lookup": "items"}}}]"#,
        );
        fixture
    }

    fn templates(&self) -> PathBuf {
        self.root.path().join("templates")
    }

    fn dumps(&self) -> PathBuf {
        self.root.path().join("dumps")
    }

    fn output(&self) -> PathBuf {
        self.root.path().join("out")
    }

    fn loader(&self) -> JsonTreeLoader {
        JsonTreeLoader::new(vec![self.templates()], self.dumps())
    }
}

fn quiet_writer() -> Writer {
    Writer::default().with_error_stream(OutputBuffer::new().shared())
}

#[test]
fn converts_matching_templates_into_mirrored_tree() {
    let fixture = Fixture::new();
    let mut writer = quiet_writer();
    let mut seen = Vec::new();
    let mut callback = |path: &Path| seen.push(path.to_path_buf());

    let written = convert_templates(
        &fixture.loader(),
        &fixture.output(),
        DEFAULT_EXTENSIONS,
        &mut writer,
        Some(&mut callback),
    )
    .unwrap();

    assert_eq!(
        seen,
        vec![PathBuf::from("index.html"), Path::new("shop").join("cart.HTML")]
    );
    assert_eq!(written.len(), 2);
    assert_eq!(
        fs::read_to_string(fixture.output().join("index.html")).unwrap(),
        "{{ title|e }}"
    );
    assert_eq!(
        fs::read_to_string(fixture.output().join("shop").join("cart.HTML")).unwrap(),
        "{% for i in items %}{% endfor %}"
    );
    assert!(!fixture.output().join("shop").join("style.css").exists());
}

#[test]
fn writer_stream_is_restored_after_batch() {
    let fixture = Fixture::new();
    let out = OutputBuffer::new();
    let mut writer = quiet_writer().with_stream(out.shared());
    let mut callback = |_: &Path| {};

    convert_templates(
        &fixture.loader(),
        &fixture.output(),
        &[".html"],
        &mut writer,
        Some(&mut callback),
    )
    .unwrap();

    assert_eq!(out.contents(), "");
    writer.body(&[dj2jinja::ast::Node::text("after")]);
    assert_eq!(out.contents(), "after");
}

#[test]
fn missing_dump_is_an_io_error() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.dumps().join("index.html.json")).unwrap();
    let mut writer = quiet_writer();
    let mut callback = |_: &Path| {};

    let err = convert_templates(
        &fixture.loader(),
        &fixture.output(),
        DEFAULT_EXTENSIONS,
        &mut writer,
        Some(&mut callback),
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::Io { .. }), "{err:?}");
}

#[test]
fn malformed_dump_names_the_template() {
    let fixture = Fixture::new();
    write(&fixture.dumps().join("index.html.json"), "{ not json");
    let err = fixture.loader().load("index.html").unwrap_err();
    match err {
        ConvertError::Load { name, .. } => assert_eq!(name, "index.html"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_template_directory_is_a_walk_error() {
    let fixture = Fixture::new();
    let loader = JsonTreeLoader::new(vec![fixture.root.path().join("nope")], fixture.dumps());
    let mut writer = quiet_writer();
    let mut callback = |_: &Path| {};

    let err = convert_templates(
        &loader,
        &fixture.output(),
        DEFAULT_EXTENSIONS,
        &mut writer,
        Some(&mut callback),
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::Walk { .. }), "{err:?}");
}
