// src/config/model.rs

use serde::Deserialize;

/// Fully resolved configuration as parsed from the substituted base document.
///
/// ```toml
/// [project]
/// name = "acme-site"
/// template = "templates/base.html"
///
/// [styles]
/// src = "resources/scss/**/*.scss"
/// dest = "dist/css"
///
/// [[watch.binding]]
/// patterns = ["resources/scss/**/*.scss"]
/// tasks = ["styles"]
/// ```
///
/// All sections are optional and have reasonable defaults. The value is
/// built once at startup and shared read-only; nothing mutates it after
/// the resolver returns.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Project metadata and injection target from `[project]`.
    #[serde(default)]
    pub project: ProjectSection,

    /// Root directories from `[paths]`.
    #[serde(default)]
    pub paths: PathsSection,

    /// Stylesheet sources/destination from `[styles]`.
    #[serde(default)]
    pub styles: AssetSection,

    /// Script sources/destination from `[scripts]`.
    #[serde(default)]
    pub scripts: ScriptsSection,

    /// Image sources/destination from `[images]`.
    #[serde(default)]
    pub images: AssetSection,

    /// Style-guide source folder and output folder from `[styleguide]`.
    #[serde(default)]
    pub styleguide: AssetSection,

    /// External command templates per transform from `[tools]`.
    #[serde(default)]
    pub tools: ToolsSection,

    /// Command lists for the admin shell tasks from `[shell]`.
    #[serde(default)]
    pub shell: ShellSection,

    /// Watch bindings and debounce settle window from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,

    /// Live-reload collaborator config from `[live_reload]`.
    #[serde(default)]
    pub live_reload: LiveReloadSection,

    /// Desktop notification toggle from `[notifications]`.
    #[serde(default)]
    pub notifications: NotificationsSection,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectSection {
    /// Project name, used by command templates.
    #[serde(default)]
    pub name: String,

    /// Main bundle identifier within the project.
    #[serde(default)]
    pub bundle: String,

    /// Template file that built asset references are injected into.
    #[serde(default)]
    pub template: String,

    /// Directory the rewritten template is written to.
    #[serde(default)]
    pub template_dest: String,
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Source root for front-end resources.
    #[serde(default = "default_resources_path")]
    pub resources: String,

    /// Output root for built assets.
    #[serde(default = "default_dist_path")]
    pub dist: String,

    /// Package-manager dependency directory.
    #[serde(default = "default_vendor_path")]
    pub vendor: String,
}

fn default_resources_path() -> String {
    "resources".to_string()
}

fn default_dist_path() -> String {
    "dist".to_string()
}

fn default_vendor_path() -> String {
    "vendor".to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            resources: default_resources_path(),
            dist: default_dist_path(),
            vendor: default_vendor_path(),
        }
    }
}

/// Generic source glob + destination pair, used by `[styles]`, `[images]`
/// and `[styleguide]`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AssetSection {
    #[serde(default)]
    pub src: String,

    #[serde(default)]
    pub dest: String,
}

/// `[scripts]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScriptsSection {
    /// Application script globs fed to the linter.
    #[serde(default)]
    pub app: Vec<String>,

    /// Files bundled into the page footer script, in order.
    #[serde(default)]
    pub bundle: Vec<String>,

    /// Destination directory for built scripts.
    #[serde(default)]
    pub dest: String,
}

/// `[tools]` section: one external command template per transform.
///
/// Templates may use `{src}`, `{dest}`, `{target}` and `{assets}` slots,
/// filled literally at invocation time. A transform whose template is
/// missing fails when its task runs, not at startup, so partial configs
/// can still drive the tasks they do describe.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ToolsSection {
    /// Stylesheet compile + postprocess + minify.
    #[serde(default)]
    pub styles: Option<String>,

    /// Script linter; reports findings on its own output.
    #[serde(default)]
    pub lint: Option<String>,

    /// Development script build (unminified copy/concat).
    #[serde(default)]
    pub scripts_dev: Option<String>,

    /// Production script bundle + minify.
    #[serde(default)]
    pub scripts_prod: Option<String>,

    /// Image optimizer; skips files unchanged since last output.
    #[serde(default)]
    pub images: Option<String>,

    /// Style-guide generator run over the styleguide source folder.
    #[serde(default)]
    pub styleguide: Option<String>,

    /// Asset-reference injection into a template file.
    #[serde(default)]
    pub inject: Option<String>,

    /// Live-reload sink, invoked with `{path}` per changed file.
    #[serde(default)]
    pub reload: Option<String>,

    /// Desktop notifier, invoked with `{title}` and `{message}`.
    #[serde(default)]
    pub notify: Option<String>,
}

/// `[shell]` section: command lists for the admin tasks. Each list runs
/// sequentially to completion or fails the owning task.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ShellSection {
    #[serde(default)]
    pub cache_clear: Vec<String>,

    #[serde(default)]
    pub migrate: Vec<String>,

    #[serde(default)]
    pub fix_perms: Vec<String>,

    #[serde(default)]
    pub maintenance: Vec<String>,

    #[serde(default)]
    pub restart_server: Vec<String>,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Default settle window in milliseconds; rapid events for the same
    /// binding inside this window collapse into a single trigger.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// All `[[watch.binding]]` entries.
    #[serde(default, rename = "binding")]
    pub bindings: Vec<WatchBindingSection>,
}

fn default_settle_ms() -> u64 {
    250
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            bindings: Vec::new(),
        }
    }
}

/// One `[[watch.binding]]` entry: file patterns bound to the tasks they
/// trigger on change.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchBindingSection {
    /// Glob patterns, relative to the project root.
    pub patterns: Vec<String>,

    /// Task names triggered when a matching path changes.
    pub tasks: Vec<String>,

    /// Per-binding settle override in milliseconds.
    #[serde(default)]
    pub settle_ms: Option<u64>,
}

/// `[live_reload]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LiveReloadSection {
    #[serde(default)]
    pub enabled: bool,

    /// Paths matching these globs are pushed to the reload sink.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// `[notifications]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsSection {
    /// Whether task failures also raise a desktop notification.
    #[serde(default = "default_desktop")]
    pub desktop: bool,
}

fn default_desktop() -> bool {
    true
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self {
            desktop: default_desktop(),
        }
    }
}
