//! Integration tests for the scaffolding pipeline
//!
//! These tests drive complete runs with a fake command runner that simulates
//! create-vite by writing a starter tree into a temporary directory.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::collections::VecDeque;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use vitewind_core::{
    CommandOutput, CommandRunner, Error, Invocation, Pipeline, Prompter, Reporter, Result,
    Session, SettingsLoader, StdioMode, Step,
};

const VITE_CONFIG: &str = "import { defineConfig } from 'vite'
import react from '@vitejs/plugin-react'

// https://vite.dev/config/
export default defineConfig({
  plugins: [react()],
})
";

const INDEX_CSS: &str = ":root {\n  font-family: system-ui;\n}\n";
const TAILWIND_CSS: &str = "@import \"tailwindcss\";\n";

/// Fake runner that records invocations and simulates create-vite
#[derive(Default)]
struct FakeRunner {
    invocations: Mutex<Vec<Invocation>>,
    /// Index of the invocation that exits with code 1
    fail_at: Option<usize>,
    /// Skip writing vite.config.js when scaffolding
    without_build_config: bool,
    /// Skip creating src/ and its stylesheets when scaffolding
    without_src: bool,
    /// Pretend the generator succeeded without creating anything
    create_nothing: bool,
    /// Pretend the package manager is not installed
    unavailable: bool,
}

impl FakeRunner {
    fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    fn scaffold(&self, invocation: &Invocation) {
        let project = invocation.cwd.join(&invocation.args[2]);
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("package.json"), "{}").unwrap();
        if !self.without_src {
            fs::create_dir(project.join("src")).unwrap();
            fs::write(project.join("src/index.css"), INDEX_CSS).unwrap();
            fs::write(project.join("src/App.css"), "#root { margin: 0 auto; }\n").unwrap();
        }
        if !self.without_build_config {
            fs::write(project.join("vite.config.js"), VITE_CONFIG).unwrap();
        }
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let index = {
            let mut invocations = self.invocations.lock().unwrap();
            invocations.push(invocation.clone());
            invocations.len() - 1
        };

        if self.fail_at == Some(index) {
            return Ok(CommandOutput {
                code: Some(1),
                stderr: "npm error code ERESOLVE\n".to_string(),
            });
        }

        if invocation.args[0] == "create" && !self.create_nothing {
            self.scaffold(invocation);
        }

        Ok(CommandOutput {
            code: Some(0),
            stderr: String::new(),
        })
    }

    fn ensure_available(&self, program: &str) -> Result<()> {
        if self.unavailable {
            Err(Error::command_not_found(program))
        } else {
            Ok(())
        }
    }
}

/// Reporter that records every event as a string
#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix(prefix).map(str::to_string))
            .collect()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn step(&self, step: Step) {
        self.record(format!("step:{}", step.number()));
    }
    fn start(&self, message: &str) {
        self.record(format!("start:{}", message));
    }
    fn succeed(&self, message: &str) {
        self.record(format!("succeed:{}", message));
    }
    fn fail(&self, message: &str) {
        self.record(format!("fail:{}", message));
    }
    fn warn(&self, message: &str) {
        self.record(format!("warn:{}", message));
    }
    fn info(&self, message: &str) {
        self.record(format!("info:{}", message));
    }
}

struct ScriptedPrompter(VecDeque<String>);

impl ScriptedPrompter {
    fn new(answers: &[&str]) -> Self {
        Self(answers.iter().map(|a| a.to_string()).collect())
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, _question: &str) -> Result<String> {
        self.0
            .pop_front()
            .ok_or_else(|| Error::prompt("input closed"))
    }
}

struct Fixture {
    _temp: TempDir,
    base: Utf8PathBuf,
    runner: Arc<FakeRunner>,
    reporter: Arc<RecordingReporter>,
    pipeline: Pipeline,
}

fn fixture(runner: FakeRunner) -> Fixture {
    let temp = TempDir::new().unwrap();
    let base = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();
    let runner = Arc::new(runner);
    let reporter = Arc::new(RecordingReporter::default());
    let settings = SettingsLoader::without_user_config().load().unwrap();
    let pipeline = Pipeline::new(
        settings,
        base.clone(),
        runner.clone(),
        reporter.clone(),
    )
    .unwrap();

    Fixture {
        _temp: temp,
        base,
        runner,
        reporter,
        pipeline,
    }
}

fn args(invocation: &Invocation) -> Vec<&str> {
    invocation.args.iter().map(String::as_str).collect()
}

#[tokio::test]
async fn test_full_run_creates_configured_project() {
    let fx = fixture(FakeRunner::default());
    let mut prompter = ScriptedPrompter::new(&["", "  ", "demo"]);

    let outcome = fx.pipeline.run(&mut prompter).await.unwrap();

    assert_eq!(outcome.session.project_name(), "demo");
    assert!(outcome.warnings.is_empty());

    let project = fx.base.join("demo");
    assert_eq!(outcome.session.project_path(), project.as_path());

    // Generation, dependency install, framework install
    let invocations = fx.runner.invocations();
    assert_eq!(invocations.len(), 3);
    assert_eq!(invocations[0].program, "npm");
    assert_eq!(
        args(&invocations[0]),
        vec!["create", "vite@latest", "demo", "--", "--template", "react"]
    );
    assert_eq!(invocations[0].cwd, fx.base);
    assert_eq!(invocations[0].stdio, StdioMode::Inherit);
    assert_eq!(args(&invocations[1]), vec!["install"]);
    assert_eq!(invocations[1].cwd, project);
    assert_eq!(invocations[1].stdio, StdioMode::Captured);
    assert_eq!(
        args(&invocations[2]),
        vec!["install", "tailwindcss", "@tailwindcss/vite"]
    );
    assert_eq!(invocations[2].cwd, project);

    // Config patch
    let config = fs::read_to_string(project.join("vite.config.js")).unwrap();
    assert!(config.contains(
        "import react from '@vitejs/plugin-react'\nimport tailwindcss from '@tailwindcss/vite'\n"
    ));
    assert!(config.contains("plugins: [tailwindcss(), react()]"));
    assert!(config.contains("// https://vite.dev/config/"));

    // CSS overwrites
    for css in ["src/index.css", "src/App.css"] {
        assert_eq!(fs::read_to_string(project.join(css)).unwrap(), TAILWIND_CSS);
    }

    // Numbered steps in order, then next-step instructions
    assert_eq!(
        fx.reporter.with_prefix("step:"),
        vec!["1", "2", "3", "4", "5", "6"]
    );
    let info = fx.reporter.with_prefix("info:");
    assert!(info.contains(&"  cd demo".to_string()));
    assert!(info.contains(&"  npm run dev".to_string()));
    assert!(fx.reporter.with_prefix("warn:").is_empty());
}

#[tokio::test]
async fn test_failed_install_aborts_before_patching() {
    let fx = fixture(FakeRunner {
        fail_at: Some(1),
        ..Default::default()
    });
    let mut prompter = ScriptedPrompter::new(&["demo"]);

    let err = fx.pipeline.run(&mut prompter).await.unwrap_err();

    match err {
        Error::ProcessFailed { command, code, .. } => {
            assert_eq!(command, "npm install");
            assert_eq!(code, Some(1));
        }
        other => panic!("Expected ProcessFailed, got {:?}", other),
    }

    // Framework install never attempted
    assert_eq!(fx.runner.invocations().len(), 2);

    // Generated project is left as-is
    let project = fx.base.join("demo");
    assert!(project.is_dir());
    assert_eq!(
        fs::read_to_string(project.join("vite.config.js")).unwrap(),
        VITE_CONFIG
    );
    assert_eq!(
        fs::read_to_string(project.join("src/index.css")).unwrap(),
        INDEX_CSS
    );

    assert_eq!(fx.reporter.with_prefix("step:"), vec!["1", "2"]);
    assert_eq!(fx.reporter.with_prefix("fail:"), vec!["npm install failed"]);
}

#[tokio::test]
async fn test_failed_framework_install_aborts_before_patching() {
    let fx = fixture(FakeRunner {
        fail_at: Some(2),
        ..Default::default()
    });
    let session = Session::new("demo", &fx.base).unwrap();

    let err = fx.pipeline.run_session(session).await.unwrap_err();

    match err {
        Error::ProcessFailed { command, code, .. } => {
            assert_eq!(command, "npm install tailwindcss @tailwindcss/vite");
            assert_eq!(code, Some(1));
        }
        other => panic!("Expected ProcessFailed, got {:?}", other),
    }
    assert_eq!(fx.runner.invocations().len(), 3);

    // Neither the config nor the stylesheets were touched
    let project = fx.base.join("demo");
    assert_eq!(
        fs::read_to_string(project.join("vite.config.js")).unwrap(),
        VITE_CONFIG
    );
    assert_eq!(
        fs::read_to_string(project.join("src/index.css")).unwrap(),
        INDEX_CSS
    );

    assert_eq!(fx.reporter.with_prefix("step:"), vec!["1", "2", "3"]);
    assert!(fx.reporter.with_prefix("warn:").is_empty());
}

#[tokio::test]
async fn test_failed_generation_is_fatal() {
    let fx = fixture(FakeRunner {
        fail_at: Some(0),
        ..Default::default()
    });
    let session = Session::new("demo", &fx.base).unwrap();

    let err = fx.pipeline.run_session(session).await.unwrap_err();

    assert!(matches!(err, Error::ProcessFailed { .. }));
    assert_eq!(fx.runner.invocations().len(), 1);
}

#[tokio::test]
async fn test_generator_without_output_is_fatal() {
    let fx = fixture(FakeRunner {
        create_nothing: true,
        ..Default::default()
    });
    let session = Session::new("demo", &fx.base).unwrap();

    let err = fx.pipeline.run_session(session).await.unwrap_err();

    assert!(matches!(err, Error::ProjectNotCreated { .. }));
    assert_eq!(fx.runner.invocations().len(), 1);
}

#[tokio::test]
async fn test_missing_package_manager_is_fatal() {
    let fx = fixture(FakeRunner {
        unavailable: true,
        ..Default::default()
    });
    let session = Session::new("demo", &fx.base).unwrap();

    let err = fx.pipeline.run_session(session).await.unwrap_err();

    assert!(matches!(err, Error::CommandNotFound { .. }));
    assert!(fx.runner.invocations().is_empty());
}

#[tokio::test]
async fn test_missing_build_config_only_warns() {
    let fx = fixture(FakeRunner {
        without_build_config: true,
        ..Default::default()
    });
    let session = Session::new("demo", &fx.base).unwrap();

    let outcome = fx.pipeline.run_session(session).await.unwrap();

    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("manually"));
    assert_eq!(fx.reporter.with_prefix("warn:"), outcome.warnings);

    // Later steps still ran
    let project = fx.base.join("demo");
    assert_eq!(
        fs::read_to_string(project.join("src/index.css")).unwrap(),
        TAILWIND_CSS
    );
    assert_eq!(
        fx.reporter.with_prefix("step:"),
        vec!["1", "2", "3", "4", "5", "6"]
    );
}

#[tokio::test]
async fn test_unwritable_css_only_warns() {
    let fx = fixture(FakeRunner::default());
    let session = Session::new("demo", &fx.base).unwrap();
    fx.pipeline.scaffold(&session).await.unwrap();

    // A directory where a stylesheet should be makes that write fail
    let project = session.project_path();
    fs::remove_file(project.join("src/App.css")).unwrap();
    fs::create_dir(project.join("src/App.css")).unwrap();

    let err = fx.pipeline.write_css_entrypoints(&session).await.unwrap_err();
    assert!(matches!(err, Error::CssWrite { .. }));

    // The independent write still happened
    assert_eq!(
        fs::read_to_string(project.join("src/index.css")).unwrap(),
        TAILWIND_CSS
    );
}

#[tokio::test]
async fn test_css_failure_in_run_only_warns() {
    let fx = fixture(FakeRunner {
        without_src: true,
        ..Default::default()
    });
    let session = Session::new("demo", &fx.base).unwrap();

    let outcome = fx.pipeline.run_session(session).await.unwrap();

    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].starts_with("Writing CSS entrypoints"));
    assert!(outcome.warnings[0].contains("manually"));
    assert_eq!(fx.reporter.with_prefix("warn:"), outcome.warnings);

    // The config patch before it and the instructions after it still ran
    let project = fx.base.join("demo");
    let config = fs::read_to_string(project.join("vite.config.js")).unwrap();
    assert!(config.contains("plugins: [tailwindcss(), react()]"));
    assert_eq!(
        fx.reporter.with_prefix("step:"),
        vec!["1", "2", "3", "4", "5", "6"]
    );
    assert!(fx
        .reporter
        .with_prefix("info:")
        .contains(&"  cd demo".to_string()));
}

#[tokio::test]
async fn test_patch_build_config_twice_is_stable() {
    let fx = fixture(FakeRunner::default());
    let session = Session::new("demo", &fx.base).unwrap();
    fx.pipeline.scaffold(&session).await.unwrap();

    let first = fx.pipeline.patch_build_config(&session).await.unwrap();
    let after_first = fs::read_to_string(session.project_path().join("vite.config.js")).unwrap();
    let second = fx.pipeline.patch_build_config(&session).await.unwrap();
    let after_second = fs::read_to_string(session.project_path().join("vite.config.js")).unwrap();

    assert!(first.changed());
    assert!(!second.changed());
    assert_eq!(after_first, after_second);
    assert!(fx
        .reporter
        .events()
        .contains(&"succeed:vite.config.js already configured".to_string()));
}

#[tokio::test]
async fn test_css_entrypoints_are_overwritten_not_appended() {
    let fx = fixture(FakeRunner::default());
    let session = Session::new("demo", &fx.base).unwrap();
    fx.pipeline.scaffold(&session).await.unwrap();

    fx.pipeline.write_css_entrypoints(&session).await.unwrap();
    fx.pipeline.write_css_entrypoints(&session).await.unwrap();

    for css in ["src/index.css", "src/App.css"] {
        assert_eq!(
            fs::read_to_string(session.project_path().join(css)).unwrap(),
            TAILWIND_CSS
        );
    }
}

#[tokio::test]
async fn test_prompt_failure_runs_nothing() {
    let fx = fixture(FakeRunner::default());
    let mut prompter = ScriptedPrompter::new(&[""]);

    let err = fx.pipeline.run(&mut prompter).await.unwrap_err();

    assert!(matches!(err, Error::Prompt(_)));
    assert!(fx.runner.invocations().is_empty());
    assert!(fx.reporter.events().is_empty());
}
