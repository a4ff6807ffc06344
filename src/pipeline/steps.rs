// src/pipeline/steps.rs

//! Concrete task actions.
//!
//! Every transform is an opaque external command built from a `[tools]`
//! template; this module only assembles the command line and maps the exit
//! status. `clean` is the one in-process step (a directory removal needs no
//! external tool). Actions capture the shared config and stay inert until
//! the scheduler invokes them.

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::config::model::Config;
use crate::exec::shell::{fill_template, run_step, run_steps};
use crate::task::TaskAction;

fn tool_command(template: &Option<String>, name: &str) -> Result<String> {
    template
        .clone()
        .ok_or_else(|| anyhow!("no [tools].{name} command configured"))
}

async fn remove_tree(path: &str) -> Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing directory '{path}'")),
    }
}

async fn remove_file(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing file {path:?}")),
    }
}

/// Remove the dist tree and the previously injected template copy.
pub fn clean(cfg: &Arc<Config>) -> impl TaskAction + use<> {
    let cfg = Arc::clone(cfg);
    move || {
        let cfg = Arc::clone(&cfg);
        async move { clean_impl(cfg).await }
    }
}

async fn clean_impl(cfg: Arc<Config>) -> Result<()> {
    remove_tree(&cfg.paths.dist).await?;

    if !cfg.project.template_dest.is_empty() {
        if let Some(file_name) = Path::new(&cfg.project.template).file_name() {
            let injected = Path::new(&cfg.project.template_dest).join(file_name);
            remove_file(&injected).await?;
        }
    }

    debug!(dist = %cfg.paths.dist, "clean finished");
    Ok(())
}

/// Stylesheet compile + postprocess + minify.
pub fn styles(cfg: &Arc<Config>) -> impl TaskAction + use<> {
    let cfg = Arc::clone(cfg);
    move || {
        let cfg = Arc::clone(&cfg);
        async move {
            let template = tool_command(&cfg.tools.styles, "styles")?;
            let cmd = fill_template(
                &template,
                &[("src", &cfg.styles.src), ("dest", &cfg.styles.dest)],
            );
            run_step("styles", &cmd).await
        }
    }
}

/// Script linting. The linter reports findings on its own output and this
/// task never fails the pipeline; a non-zero lint exit is logged at warn.
pub fn lint(cfg: &Arc<Config>) -> impl TaskAction + use<> {
    let cfg = Arc::clone(cfg);
    move || {
        let cfg = Arc::clone(&cfg);
        async move { lint_impl(cfg).await }
    }
}

async fn lint_impl(cfg: Arc<Config>) -> Result<()> {
    let Some(template) = cfg.tools.lint.clone() else {
        debug!("no [tools].lint command configured; skipping");
        return Ok(());
    };

    let src = cfg.scripts.app.join(" ");
    let cmd = fill_template(&template, &[("src", &src)]);
    if let Err(err) = run_step("lint", &cmd).await {
        warn!(error = %format!("{err:#}"), "lint reported findings");
    }
    Ok(())
}

/// Development script build: unminified copy/concat of the bundle files.
pub fn scripts_dev(cfg: &Arc<Config>) -> impl TaskAction + use<> {
    let cfg = Arc::clone(cfg);
    move || {
        let cfg = Arc::clone(&cfg);
        async move {
            let template = tool_command(&cfg.tools.scripts_dev, "scripts_dev")?;
            let src = cfg.scripts.bundle.join(" ");
            let cmd = fill_template(&template, &[("src", &src), ("dest", &cfg.scripts.dest)]);
            run_step("scripts-dev", &cmd).await
        }
    }
}

/// Production script bundle + minify.
pub fn scripts_prod(cfg: &Arc<Config>) -> impl TaskAction + use<> {
    let cfg = Arc::clone(cfg);
    move || {
        let cfg = Arc::clone(&cfg);
        async move {
            let template = tool_command(&cfg.tools.scripts_prod, "scripts_prod")?;
            let src = cfg.scripts.bundle.join(" ");
            let cmd = fill_template(&template, &[("src", &src), ("dest", &cfg.scripts.dest)]);
            run_step("scripts-prod", &cmd).await
        }
    }
}

/// Rewrite the project template with references to the built scripts.
pub fn inject(cfg: &Arc<Config>, task_name: &'static str) -> impl TaskAction + use<> {
    let cfg = Arc::clone(cfg);
    move || {
        let cfg = Arc::clone(&cfg);
        async move {
            let template = tool_command(&cfg.tools.inject, "inject")?;
            let cmd = fill_template(
                &template,
                &[
                    ("target", &cfg.project.template),
                    ("assets", &cfg.scripts.dest),
                    ("dest", &cfg.project.template_dest),
                ],
            );
            run_step(task_name, &cmd).await
        }
    }
}

/// Image optimization; the tool itself skips files unchanged since the
/// last output.
pub fn images(cfg: &Arc<Config>) -> impl TaskAction + use<> {
    let cfg = Arc::clone(cfg);
    move || {
        let cfg = Arc::clone(&cfg);
        async move {
            let template = tool_command(&cfg.tools.images, "images")?;
            let cmd = fill_template(
                &template,
                &[("src", &cfg.images.src), ("dest", &cfg.images.dest)],
            );
            run_step("images", &cmd).await
        }
    }
}

/// Run the style-guide generator over the styleguide source folder.
pub fn styleguide(cfg: &Arc<Config>) -> impl TaskAction + use<> {
    let cfg = Arc::clone(cfg);
    move || {
        let cfg = Arc::clone(&cfg);
        async move {
            let template = tool_command(&cfg.tools.styleguide, "styleguide")?;
            let cmd = fill_template(
                &template,
                &[("src", &cfg.styleguide.src), ("dest", &cfg.styleguide.dest)],
            );
            run_step("styleguide", &cmd).await
        }
    }
}

/// Inject built script references into the generated style-guide pages.
pub fn styleguide_assets(cfg: &Arc<Config>, task_name: &'static str) -> impl TaskAction + use<> {
    let cfg = Arc::clone(cfg);
    move || {
        let cfg = Arc::clone(&cfg);
        async move {
            let template = tool_command(&cfg.tools.inject, "inject")?;
            let cmd = fill_template(
                &template,
                &[
                    ("target", &cfg.styleguide.dest),
                    ("assets", &cfg.scripts.dest),
                    ("dest", &cfg.styleguide.dest),
                ],
            );
            run_step(task_name, &cmd).await
        }
    }
}

/// Run an admin command list sequentially to completion or fail.
pub fn shell_task(name: &'static str, commands: Vec<String>) -> impl TaskAction + use<> {
    move || {
        let commands = commands.clone();
        async move { run_steps(name, &commands).await }
    }
}
