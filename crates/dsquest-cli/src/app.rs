//! Application state: curriculum, progress, runner and the current route.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use dsquest_core::model::{Curriculum, LessonRef};
use dsquest_core::parser::{load_curriculum, CurriculumSource};
use dsquest_core::progress::ProgressStore;
use dsquest_core::repository::KvProgressRepository;
use dsquest_core::router::{Route, RouteTable};
use dsquest_core::runner::{CodeRunner, RunReport};
use dsquest_core::store::FileStore;
use dsquest_core::traits::CodeExecutionEngine;
use dsquest_core::CurriculumError;
use dsquest_report::views::{self, LessonPage};
use dsquest_runner::PythonEngine;

use crate::config::QuestConfig;

/// Where rendered views go.
pub trait Screen {
    /// Replace the current view.
    fn show(&mut self, text: &str);

    /// Show a transient status line, such as the lesson loading notice.
    fn status(&mut self, text: &str);
}

/// Views on stdout, status lines on stderr.
pub struct Terminal;

impl Screen for Terminal {
    fn show(&mut self, text: &str) {
        println!("{}", text.trim_end());
    }

    fn status(&mut self, text: &str) {
        eprintln!("{text}");
    }
}

/// Outcome of `check`: the run report plus whether XP was newly awarded.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub report: RunReport,
    pub newly_completed: bool,
}

pub struct QuestApp {
    source: CurriculumSource,
    store: ProgressStore,
    runner: CodeRunner,
    routes: RouteTable,
    route: Route,
}

impl QuestApp {
    pub fn new(source: CurriculumSource, store: ProgressStore, runner: CodeRunner) -> Self {
        Self {
            source,
            store,
            runner,
            routes: RouteTable::standard(),
            route: Route::Home,
        }
    }

    /// Load the curriculum and open the progress file named by `config`.
    pub fn from_config(config: &QuestConfig) -> Result<Self> {
        let curriculum_path = config.curriculum_path();
        let source = load_curriculum(&curriculum_path)
            .context("failed to load curriculum (run `dsquest init` to create one)")?;
        tracing::debug!(
            "loaded {} chapters from {}",
            source.curriculum.chapters.len(),
            curriculum_path.display()
        );

        let kv = Arc::new(FileStore::new(config.store_path()));
        tracing::debug!("progress file: {}", kv.path().display());
        let store = ProgressStore::new(Arc::new(KvProgressRepository::new(kv)));

        let engine: Arc<dyn CodeExecutionEngine> = Arc::new(
            PythonEngine::new(&config.python)
                .with_timeout(Duration::from_secs(config.run_timeout_secs))
                .with_packages(config.preload_packages.clone()),
        );

        Ok(Self::new(source, store, CodeRunner::new(engine)))
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.source.curriculum
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Resolve a fragment and make it the current route.
    pub fn navigate(&mut self, fragment: &str) -> &Route {
        self.route = self.routes.resolve(fragment);
        tracing::debug!("routed {fragment:?} to {}", self.route);
        &self.route
    }

    pub fn lesson(&self, id: &str) -> Result<LessonRef<'_>, CurriculumError> {
        self.curriculum()
            .lesson(id)
            .ok_or_else(|| CurriculumError::LessonNotFound(id.to_string()))
    }

    /// Render the current route.
    ///
    /// The lesson view first shows a loading notice, then fetches its
    /// Markdown. A failed fetch is an error for that view.
    pub async fn render(&self, screen: &mut dyn Screen) -> Result<()> {
        let progress = self.store.get_progress()?;
        let curriculum = self.curriculum();
        let nav = views::render_nav(self.route.nav_tab());

        let body = match &self.route {
            Route::Home => views::render_home(curriculum, &progress),
            Route::Dashboard => views::render_dashboard(curriculum, &progress),
            Route::Profile => views::render_profile(curriculum, &progress),
            Route::About => views::render_about(),
            Route::Chapter(id) => views::render_chapter(curriculum, &progress, id),
            Route::Lesson(id) => match curriculum.lesson(id) {
                None => format!("{}\n", views::LESSON_NOT_FOUND),
                Some(found) => {
                    screen.status(views::LOADING_LESSON);
                    let markdown = self.source.fetch_lesson_text(found.lesson).await?;
                    let page = LessonPage {
                        chapter: found.chapter,
                        lesson: found.lesson,
                        markdown,
                        code: self.store.current_code(found.lesson)?,
                        completed: progress.is_completed(&found.lesson.id),
                        neighbors: curriculum.neighbors(id),
                    };
                    views::render_lesson(&page)
                }
            },
        };

        screen.show(&format!("{nav}\n\n{body}"));
        Ok(())
    }

    /// Run a lesson's current code against its checks without recording
    /// completion.
    pub async fn run_lesson(&self, id: &str) -> Result<RunReport> {
        let found = self.lesson(id)?;
        let code = self.store.current_code(found.lesson)?;
        self.runner.run(&code, &found.lesson.tests).await
    }

    /// Run a lesson's current code and record completion when it passes.
    pub async fn check_lesson(&self, id: &str) -> Result<CheckResult> {
        let found = self.lesson(id)?;
        let code = self.store.current_code(found.lesson)?;
        let report = self.runner.run(&code, &found.lesson.tests).await?;

        let newly_completed = if report.ok {
            self.store.set_completed(&found.lesson.id, found.lesson.xp)?
        } else {
            false
        };
        Ok(CheckResult {
            report,
            newly_completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsquest_core::store::MemoryStore;
    use dsquest_runner::ScriptedEngine;
    use std::collections::HashMap;

    const CURRICULUM: &str = r#"{
      "chapters": [
        {"id": "py", "emoji": "🐍", "title": "Python Basics", "blurb": "Start here",
         "lessons": [
           {"id": "py-01", "title": "Hello", "xp": 50, "md": "lessons/py-01.md",
            "starter": "print('Hello')",
            "tests": [{"type": "stdout_equals", "expected": "Hello"}]},
           {"id": "py-02", "title": "Missing", "xp": 10, "md": "lessons/none.md"}
         ]}
      ]
    }"#;

    #[derive(Default)]
    struct Recorder {
        shown: Vec<String>,
        statuses: Vec<String>,
    }

    impl Screen for Recorder {
        fn show(&mut self, text: &str) {
            self.shown.push(text.to_string());
        }

        fn status(&mut self, text: &str) {
            self.statuses.push(text.to_string());
        }
    }

    fn app(dir: &std::path::Path, engine: ScriptedEngine) -> QuestApp {
        std::fs::create_dir_all(dir.join("lessons")).unwrap();
        std::fs::write(dir.join("lessons/py-01.md"), "# Hello\n\nPrint a greeting.\n").unwrap();
        let curriculum: Curriculum = serde_json::from_str(CURRICULUM).unwrap();
        let source = CurriculumSource::new(curriculum, dir);
        let repo = KvProgressRepository::new(Arc::new(MemoryStore::new()));
        let store = ProgressStore::new(Arc::new(repo));
        QuestApp::new(source, store, CodeRunner::new(Arc::new(engine)))
    }

    fn hello_engine() -> ScriptedEngine {
        let mut responses = HashMap::new();
        responses.insert("print('Hello')".to_string(), "Hello\n".to_string());
        ScriptedEngine::new(responses)
    }

    #[tokio::test]
    async fn unknown_fragment_renders_home() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), hello_engine());
        assert_eq!(app.navigate("#/nonsense"), &Route::Home);

        let mut screen = Recorder::default();
        app.render(&mut screen).await.unwrap();
        assert!(screen.shown[0].contains("Player Stats"));
        assert!(screen.shown[0].contains("[home]"));
    }

    #[tokio::test]
    async fn lesson_view_shows_loading_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), hello_engine());
        app.navigate("#/lesson/py-01");

        let mut screen = Recorder::default();
        app.render(&mut screen).await.unwrap();
        assert_eq!(screen.statuses, vec!["Loading lesson…".to_string()]);
        assert!(screen.shown[0].contains("Print a greeting."));
        assert!(screen.shown[0].contains("print('Hello')"));
    }

    #[tokio::test]
    async fn missing_markdown_fails_the_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), hello_engine());
        app.navigate("#/lesson/py-02");

        let mut screen = Recorder::default();
        let err = app.render(&mut screen).await.unwrap_err();
        assert!(err.to_string().contains("failed to fetch"));
        assert!(screen.shown.is_empty());
    }

    #[tokio::test]
    async fn unknown_lesson_renders_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), hello_engine());
        app.navigate("#/lesson/zzz");

        let mut screen = Recorder::default();
        app.render(&mut screen).await.unwrap();
        assert!(screen.shown[0].contains("Lesson not found."));
        assert!(screen.statuses.is_empty());
    }

    #[tokio::test]
    async fn check_awards_xp_once() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path(), hello_engine());

        let first = app.check_lesson("py-01").await.unwrap();
        assert!(first.report.ok);
        assert!(first.newly_completed);

        let second = app.check_lesson("py-01").await.unwrap();
        assert!(second.report.ok);
        assert!(!second.newly_completed);
        assert_eq!(app.store().get_progress().unwrap().xp, 50);
    }

    #[tokio::test]
    async fn run_does_not_record_completion() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path(), hello_engine());

        let report = app.run_lesson("py-01").await.unwrap();
        assert!(report.ok);
        assert!(!app.store().is_completed("py-01").unwrap());
    }

    #[tokio::test]
    async fn failing_check_keeps_lesson_open() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path(), hello_engine());
        app.store().save_code("py-01", "print('Bye')").unwrap();

        let result = app.check_lesson("py-01").await.unwrap();
        assert!(!result.report.ok);
        assert!(result.report.message.starts_with("Expected exact output:"));
        assert_eq!(app.store().get_progress().unwrap().xp, 0);
    }

    #[tokio::test]
    async fn unknown_lesson_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path(), hello_engine());
        let err = app.run_lesson("nope").await.unwrap_err();
        assert!(err.to_string().contains("lesson not found: nope"));
    }
}
