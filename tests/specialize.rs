//! End-to-end specialization of the template fixtures
//!
//! Fixtures under `tests/fixtures/` are installed into temporary GOROOT and
//! module cache layouts so the loader runs exactly as it would on a real
//! Go installation.

use std::fs;
use std::path::{Path, PathBuf};

use go_specialize::parser::lexer::{lex, TokenKind};
use go_specialize::parser::visit::{walk_expr_mut, walk_token_trees_mut};
use go_specialize::parser::{parse_file, Expr, Tt, VisitMut, Walk};
use go_specialize::{
    generate, generate_from_path, GenerateConfig, GenerateError, LoaderError, TemplateKind,
    TemplateLocator,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn install(root: &Path, relative: &str, source: &Path) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("Should have a parent")).unwrap();
    fs::copy(source, path).unwrap();
}

/// A GOROOT with the four standard-library templates and an empty module cache
fn goroot() -> (TempDir, GenerateConfig) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("go");
    install(&root, "src/sync/map.go", &fixture("map.go"));
    install(&root, "src/container/list/list.go", &fixture("list.go"));
    install(&root, "src/container/ring/ring.go", &fixture("ring.go"));
    install(&root, "src/container/heap/heap.go", &fixture("heap.go"));
    let cache = dir.path().join("gopath/pkg/mod/golang.org/x");
    fs::create_dir_all(&cache).unwrap();

    let config = GenerateConfig::new()
        .with_package("cache")
        .with_locator(TemplateLocator::new(root, cache));
    (dir, config)
}

/// Count `interface{}` and `any` placeholders left in code
#[derive(Default)]
struct Placeholders(usize);

impl VisitMut for Placeholders {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if expr.is_placeholder() {
            self.0 += 1;
        }
        walk_expr_mut(self, expr);
    }

    fn visit_token_trees_mut(&mut self, items: &mut Vec<Tt>) {
        self.0 += items
            .iter()
            .filter(|tt| matches!(tt, Tt::Token(t) if t.is_ident("any")))
            .count();
        walk_token_trees_mut(self, items);
    }
}

fn assert_specialized(out: &str) {
    let mut file = parse_file(out).expect("Output should parse");
    let mut placeholders = Placeholders::default();
    file.walk_mut(&mut placeholders);
    assert_eq!(placeholders.0, 0, "placeholders left in:\n{}", out);
}

/// Identifier tokens of `out` that are not selector fields
fn idents(out: &str) -> Vec<String> {
    let tokens = lex(out).expect("Output should lex").tokens;
    let mut after_dot = false;
    let mut names = vec![];
    for token in tokens {
        if token.kind == TokenKind::Ident && !after_dot {
            names.push(token.text.clone());
        }
        after_dot = token.kind == TokenKind::Dot;
    }
    names
}

#[test]
fn test_sync_map() {
    let (_dir, config) = goroot();
    let out = generate(TemplateKind::SyncMap, "UserCache", "map[string]int", &config).unwrap();

    assert_specialized(&out);
    assert!(out.contains("package cache"));
    assert!(out.contains("type UserCache struct {\n\tmu sync.Mutex\n"));
    assert!(out.contains("func (m *UserCache) Load(key string) (value int, ok bool) {"));
    assert!(out.contains("func (m *UserCache) Store(key string, value int) {"));
    assert!(out.contains(
        "func (m *UserCache) LoadOrStore(key string, value int) (actual int, loaded bool) {"
    ));
    assert!(out.contains("func (m *UserCache) Range(f func(key string, value int) bool) {"));
    assert!(out.contains("func (m *UserCache) Delete(key string) {"));
    assert!(out.contains("func (e *entryUserCache) tryStore(i *int) bool {"));
    assert!(out.contains("func (e *entryUserCache) storeLocked(i *int) {"));
    assert!(out.contains("m.dirty = make(map[string]*entryUserCache, len(read.m))"));
    assert!(out.contains("\"unsafe\"\n)\n\nimport \"sync\"\n"));
}

#[test]
fn test_sync_map_renames_are_total() {
    let (_dir, config) = goroot();
    let out = generate(TemplateKind::SyncMap, "UserCache", "map[string]int", &config).unwrap();
    let names = idents(&out);

    for old in ["Map", "entry", "readOnly", "expunged", "newEntry"] {
        assert!(!names.iter().any(|n| n == old), "`{}` left in output", old);
    }
    for new in ["UserCache", "entryUserCache", "readOnlyUserCache", "expungedUserCache", "newEntryUserCache"] {
        assert!(names.iter().any(|n| n == new), "`{}` missing from output", new);
    }
    // Untargeted identifiers and selectors are left alone.
    assert!(out.contains("atomic.LoadPointer(&e.p)"));
    assert!(out.contains("m.read.Load().(readOnlyUserCache)"));
    assert!(out.contains("func (e *entryUserCache) delete() (hadValue bool) {"));
}

#[test]
fn test_sync_map_nil_returns() {
    let (_dir, config) = goroot();
    let out = generate(TemplateKind::SyncMap, "UserCache", "map[string]int", &config).unwrap();

    assert!(!out.contains("return nil"));
    assert_eq!(out.matches("return value, false").count(), 2);
    assert_eq!(out.matches("return actual, false, false").count(), 2);
    // `nil` outside return statements is kept.
    assert!(out.contains("if p == nil || p == expungedUserCache {"));
    assert!(out.contains("m.dirty = nil"));
}

#[test]
fn test_sync_map_equal_key_and_value() {
    let (_dir, config) = goroot();
    let out = generate(TemplateKind::SyncMap, "Counts", "map[int]int", &config).unwrap();

    assert_specialized(&out);
    assert!(out.contains("func (m *Counts) Store(key, value int) {"));
    assert!(out.contains("func (m *Counts) LoadOrStore(key, value int) (actual int, loaded bool) {"));
    assert!(out.contains("func (m *Counts) Range(f func(key, value int) bool) {"));
}

#[test]
fn test_container_list() {
    let (_dir, config) = goroot();
    let out = generate(TemplateKind::ContainerList, "job", "*Job", &config).unwrap();

    assert_specialized(&out);
    assert!(out.contains("type JobElement struct {"));
    assert!(out.contains("\tValue *Job\n"));
    assert!(out.contains("type JobList struct {"));
    assert!(out.contains("func NewJob() *JobList { return new(JobList).Init() }"));
    assert!(out.contains("func (l *JobList) PushBack(v *Job) *JobElement {"));
    assert!(out.contains("func (l *JobList) PushFront(v *Job) *JobElement {"));
    assert!(out.contains("func (l *JobList) InsertBefore(v *Job, mark *JobElement) *JobElement {"));
    assert!(out.contains("func (l *JobList) Remove(e *JobElement) *Job {"));
    assert!(out.contains("func (l *JobList) insertValue(v *Job, at *JobElement) *JobElement {"));
    assert!(out.contains("return l.insert(&JobElement{Value: v}, at)"));
    // Functions without hooks keep their `nil` returns.
    assert!(out.contains("\t\treturn nil\n"));
}

#[test]
fn test_container_ring() {
    let (_dir, config) = goroot();
    let out = generate(TemplateKind::ContainerRing, "name", "string", &config).unwrap();

    assert_specialized(&out);
    assert!(out.contains("type NameRing struct {\n\tnext, prev *NameRing\n\tValue      string // for use by client"));
    assert!(out.contains("func (r *NameRing) Do(f func(string)) {"));
    assert!(out.contains("func New(n int) *NameRing {"));
    assert!(out.contains("p.next = &NameRing{prev: p}"));
}

#[test]
fn test_container_heap() {
    let (_dir, config) = goroot();
    let out = generate(TemplateKind::ContainerHeap, "ignored", "Task", &config).unwrap();

    assert_specialized(&out);
    assert!(out.contains("type TaskInterface interface {\n\tsort.Interface\n"));
    assert!(out.contains("\tPush(x Task) // add x as element Len()\n"));
    assert!(out.contains("\tPop() Task   // remove and return element Len() - 1.\n"));
    assert!(out.contains("func Push(h TaskInterface, x Task) {"));
    assert!(out.contains("func Pop(h TaskInterface) Task {"));
    assert!(out.contains("func Remove(h TaskInterface, i int) Task {"));
    assert!(out.contains("func down(h TaskInterface, i0, n int) bool {"));
    assert!(!idents(&out).iter().any(|n| n == "Interface"));
}

#[test]
fn test_heap_contract_name_drops_pointer_and_package() {
    let (_dir, config) = goroot();
    let out = generate(TemplateKind::ContainerHeap, "ignored", "*tasks.Task", &config).unwrap();
    assert!(out.contains("func Push(h TaskInterface, x *tasks.Task) {"));
}

/// A module cache with an old broken singleflight and a newer working one
fn module_cache(config: GenerateConfig, dir: &TempDir) -> GenerateConfig {
    let cache = dir.path().join("gopath/pkg/mod/golang.org/x");
    install(
        &cache,
        "sync@v0.0.0-20190423024810-112230192c58/singleflight/singleflight.go",
        &fixture("singleflight.go"),
    );
    let broken = cache.join("sync@v0.0.0-20181108010431-42b317875d0f/singleflight");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("singleflight.go"), "package singleflight\n\nfunc (\n").unwrap();
    fs::create_dir_all(cache.join("sync@latest")).unwrap();
    config
}

#[test]
fn test_singleflight_uses_highest_installed_version() {
    let (dir, config) = goroot();
    let config = module_cache(config, &dir);
    let out = generate(TemplateKind::Singleflight, "Fetch", "map[string]Response", &config).unwrap();

    assert_specialized(&out);
    assert!(out.contains("type Fetch struct {"));
    assert!(out.contains("type callFetch struct {"));
    assert!(out.contains("type ResultFetch struct {"));
    assert!(out.contains("\tm  map[string]*callFetch // lazily initialized\n"));
    assert!(out.contains(
        "func (g *Fetch) Do(key string, fn func() (Response, error)) (v Response, err error, shared bool) {"
    ));
    assert!(out.contains("ch <- ResultFetch{c.val, c.err, c.dups > 0}"));
    assert!(out.contains("import \"golang.org/x/sync/singleflight\""));
}

#[test]
fn test_singleflight_typed_key() {
    let (dir, config) = goroot();
    let config = module_cache(config, &dir);
    let out = generate(TemplateKind::Singleflight, "Fetch", "map[UserID]*User", &config).unwrap();

    assert!(out.contains("func (g *Fetch) Forget(key UserID) {"));
    assert!(out.contains("func (g *Fetch) doCall(c *callFetch, key UserID, fn func() (*User, error)) {"));
    assert_eq!(out.matches("make(map[UserID]*callFetch)").count(), 2);
}

#[test]
fn test_singleflight_pinned_version() {
    let (dir, config) = goroot();
    let config = module_cache(config, &dir).with_version("v0.0.0-20181108010431-42b317875d0f");
    let err = generate(TemplateKind::Singleflight, "Fetch", "map[string]int", &config).unwrap_err();
    match err {
        GenerateError::Parse { path, .. } => {
            assert!(path.to_string_lossy().contains("42b317875d0f"));
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_singleflight_not_installed() {
    let (_dir, config) = goroot();
    let err = generate(TemplateKind::Singleflight, "Fetch", "map[string]int", &config).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Loader(LoaderError::DependencyNotInstalled { .. })
    ));
}

#[test]
fn test_unsupported_template_kind() {
    let err = "container/tree".parse::<TemplateKind>().unwrap_err();
    assert!(matches!(err, LoaderError::UnsupportedTemplate { ref kind } if kind == "container/tree"));
}

#[test]
fn test_missing_goroot_template() {
    let dir = tempfile::tempdir().unwrap();
    let config = GenerateConfig::new()
        .with_locator(TemplateLocator::new(dir.path(), dir.path().join("x")));
    let err = generate(TemplateKind::ContainerRing, "r", "int", &config).unwrap_err();
    assert!(matches!(err, GenerateError::Loader(LoaderError::TemplateNotFound { .. })));
}

#[test]
fn test_generate_from_path_keeps_template_package() {
    let out = generate_from_path(
        TemplateKind::ContainerRing,
        "name",
        "string",
        &fixture("ring.go"),
        &GenerateConfig::new(),
    )
    .unwrap();
    assert!(out.contains("\npackage ring\n"));
}

#[test]
fn test_block_comments_survive_specialization() {
    let out = generate_from_path(
        TemplateKind::ContainerRing,
        "name",
        "string",
        &fixture("ring_comments.go"),
        &GenerateConfig::new(),
    )
    .unwrap();

    assert_specialized(&out);
    assert!(out.contains("/*\nPackage ring implements operations on circular lists.\n*/\npackage ring\n"));
    assert!(out.contains("\tValue      string /* for use by client; untouched by this library */\n"));
    assert!(out.contains("func (r *NameRing) Do(f func(string /* value */)) {"));
    assert!(out.contains("\tr.next = r /* self */\n"));
}

#[test]
fn test_any_placeholders() {
    let out = generate_from_path(
        TemplateKind::ContainerList,
        "job",
        "*Job",
        &fixture("list_any.go"),
        &GenerateConfig::new().with_package("jobs"),
    )
    .unwrap();

    assert_specialized(&out);
    assert!(out.contains("\tValue *Job\n"));
    assert!(out.contains("func (l *JobList) PushBack(v *Job) *JobElement {"));
    assert!(out.contains("func (l *JobList) InsertAfter(v *Job, mark *JobElement) *JobElement {"));
    assert!(out.contains("func (l *JobList) Remove(e *JobElement) *Job {"));
    assert!(!idents(&out).iter().any(|n| n == "any"));
}

#[test]
fn test_invalid_type_expression() {
    let (_dir, config) = goroot();
    let err = generate(TemplateKind::ContainerList, "job", "map[string", &config).unwrap_err();
    assert!(matches!(err, GenerateError::TypeExpr { ref expr, .. } if expr == "map[string"));
    assert!(err.to_string().contains("`map[string`"));
}

#[test]
fn test_every_kind_reparses() {
    let (dir, config) = goroot();
    let config = module_cache(config, &dir);
    for kind in TemplateKind::ALL {
        let expr = match kind {
            TemplateKind::SyncMap | TemplateKind::Singleflight => "map[Key]*pkg.Value",
            _ => "[]byte",
        };
        let out = generate(kind, "Thing", expr, &config).unwrap();
        assert_specialized(&out);
    }
}
