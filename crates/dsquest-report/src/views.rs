//! Text renderers for the routed views.
//!
//! Every function here is pure: it takes the curriculum and a progress
//! snapshot and returns the text to print.

use std::fmt::Write;

use comfy_table::{Cell, Table};

use dsquest_core::model::{Chapter, Curriculum, Lesson, Neighbors};
use dsquest_core::progress::ProgressRecord;
use dsquest_core::router::{NavTab, Route};
use dsquest_core::runner::RunReport;

pub const LOADING_LESSON: &str = "Loading lesson…";
pub const CHAPTER_NOT_FOUND: &str = "Chapter not found.";
pub const LESSON_NOT_FOUND: &str = "Lesson not found.";

const BAR_WIDTH: usize = 20;

/// `[########------------]` for a percentage.
pub fn progress_bar(pct: u32) -> String {
    let filled = (pct.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Top navigation with the active tab marked.
pub fn render_nav(active: NavTab) -> String {
    let tabs = [
        (NavTab::Home, Route::Home),
        (NavTab::Dashboard, Route::Dashboard),
        (NavTab::Profile, Route::Profile),
        (NavTab::About, Route::About),
    ];
    tabs.iter()
        .map(|(tab, route)| {
            if *tab == active {
                format!("[{tab}]")
            } else {
                format!(" {tab} ({route}) ")
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn stats_block(progress: &ProgressRecord) -> String {
    format!(
        "Level: {}\nTotal XP: {}\nLessons Completed: {}",
        progress.level(),
        progress.xp,
        progress.completed_count()
    )
}

fn lesson_tag(progress: &ProgressRecord, lesson: &Lesson) -> String {
    if progress.is_completed(&lesson.id) {
        "✅ Completed".to_string()
    } else {
        format!("+{} XP", lesson.xp)
    }
}

/// Home: the hero, player stats and one tile per chapter.
pub fn render_home(curriculum: &Curriculum, progress: &ProgressRecord) -> String {
    let mut out = String::new();
    out.push_str("Your Data Science adventure — in the terminal.\n");
    out.push_str("Learn like a game: small lessons ➜ code challenges ➜ XP ➜ bosses.\n");
    out.push_str("Your progress is saved locally on this machine.\n\n");
    out.push_str("Continue: #/dashboard    Reset progress: dsquest reset --yes\n\n");

    let _ = writeln!(out, "Player Stats\n{}\n", stats_block(progress));
    out.push_str("Tip: export all your lesson code as a ZIP with `dsquest export` and commit it to GitHub.\n\n");

    let mut table = Table::new();
    table.set_header(vec!["Chapter", "Progress", "", "Open"]);
    for chapter in &curriculum.chapters {
        let comp = progress.chapter_completion(chapter);
        table.add_row(vec![
            Cell::new(format!("{} {}\n{}", chapter.emoji, chapter.title, chapter.blurb)),
            Cell::new(format!("{}/{} • {}%", comp.done, comp.total, comp.pct)),
            Cell::new(progress_bar(comp.pct)),
            Cell::new(Route::Chapter(chapter.id.clone()).fragment()),
        ]);
    }
    let _ = writeln!(out, "{table}");
    out
}

/// Dashboard: the next lesson to do and a "Continue" target per chapter.
pub fn render_dashboard(curriculum: &Curriculum, progress: &ProgressRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Continue    [Level {} • {} XP]", progress.level(), progress.xp);

    match progress.next_up(curriculum) {
        Some(next) => {
            let _ = writeln!(
                out,
                "Next up: {} {}\n  {}\n  Start: {}",
                next.chapter.emoji,
                next.lesson.title,
                next.chapter.title,
                Route::Lesson(next.lesson.id.clone()).fragment()
            );
        }
        None => out.push_str("Next up: nothing yet — the curriculum has no lessons.\n"),
    }

    out.push_str("\nYour XP, completions and code are stored in the local progress file.\n");
    out.push_str("Use `dsquest export` to download your code as a ZIP.\n\n");

    let mut table = Table::new();
    table.set_header(vec!["Chapter", "%", "", "Continue", "Open chapter"]);
    for chapter in &curriculum.chapters {
        let comp = progress.chapter_completion(chapter);
        let cont = progress
            .chapter_continue(chapter)
            .map(|l| Route::Lesson(l.id.clone()).fragment())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(format!("{} {}", chapter.emoji, chapter.title)),
            Cell::new(format!("{}%", comp.pct)),
            Cell::new(progress_bar(comp.pct)),
            Cell::new(cont),
            Cell::new(Route::Chapter(chapter.id.clone()).fragment()),
        ]);
    }
    let _ = writeln!(out, "{table}");
    out
}

/// Profile: stats, export hint and earned badges.
pub fn render_profile(curriculum: &Curriculum, progress: &ProgressRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Profile\n{}\n", stats_block(progress));
    out.push_str("Export all code (ZIP): dsquest export\n");
    out.push_str("Reset progress:        dsquest reset --yes\n\n");

    let badges = progress.badges(curriculum);
    let _ = writeln!(out, "Badges ({})", badges.len());
    if badges.is_empty() {
        out.push_str("No badges yet — clear a chapter to earn your first.\n");
    } else {
        for badge in &badges {
            let _ = writeln!(out, "  • {badge}");
        }
    }
    out
}

pub fn render_about() -> String {
    let mut out = String::from("About\n\n");
    out.push_str("A Codédex-style learning game for the terminal. It uses:\n");
    out.push_str("  • Markdown lessons (lessons/*.md)\n");
    out.push_str("  • A JSON curriculum (curriculum.json)\n");
    out.push_str("  • A local Python interpreter to run lesson code\n");
    out.push_str("  • A local progress file for XP and saved code\n\n");
    out.push_str("Extend it by editing curriculum.json (add quests, items, bosses, gates).\n");
    out
}

/// One chapter with its lessons, or the not-found view.
pub fn render_chapter(curriculum: &Curriculum, progress: &ProgressRecord, id: &str) -> String {
    let Some(chapter) = curriculum.chapter(id) else {
        return format!("{CHAPTER_NOT_FOUND}\n");
    };
    render_chapter_page(chapter, progress)
}

fn render_chapter_page(chapter: &Chapter, progress: &ProgressRecord) -> String {
    let comp = progress.chapter_completion(chapter);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}    [{}/{} • {}%]",
        chapter.emoji, chapter.title, comp.done, comp.total, comp.pct
    );
    let _ = writeln!(out, "{}\n{}\n", chapter.blurb, progress_bar(comp.pct));
    let _ = writeln!(out, "← Back to Map: {}    Continue: {}\n", Route::Home, Route::Dashboard);

    let mut table = Table::new();
    table.set_header(vec!["#", "Lesson", "Status", "Open"]);
    for (i, lesson) in chapter.lessons.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&lesson.title),
            Cell::new(lesson_tag(progress, lesson)),
            Cell::new(Route::Lesson(lesson.id.clone()).fragment()),
        ]);
    }
    let _ = writeln!(out, "{table}");
    out
}

/// Everything the lesson view needs once its Markdown has been fetched.
#[derive(Debug, Clone)]
pub struct LessonPage<'a> {
    pub chapter: &'a Chapter,
    pub lesson: &'a Lesson,
    pub markdown: String,
    pub code: String,
    pub completed: bool,
    pub neighbors: Neighbors<'a>,
}

/// The lesson view: Markdown verbatim, navigation, then the current code.
pub fn render_lesson(page: &LessonPage<'_>) -> String {
    let lesson = page.lesson;
    let tag = if page.completed {
        "✅ Completed".to_string()
    } else {
        format!("+{} XP", lesson.xp)
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} {}    [{tag}]\n", page.chapter.emoji, lesson.title);
    out.push_str(page.markdown.trim_end());
    out.push_str("\n\n");

    let mut nav = vec![format!(
        "← Chapter: {}",
        Route::Chapter(page.chapter.id.clone())
    )];
    if let Some(prev) = page.neighbors.prev {
        nav.push(format!("← Prev: {}", Route::Lesson(prev.id.clone())));
    }
    if let Some(next) = page.neighbors.next {
        nav.push(format!("Next →: {}", Route::Lesson(next.id.clone())));
    }
    let _ = writeln!(out, "{}\n", nav.join("    "));

    out.push_str("── Python ──\n");
    out.push_str(&page.code);
    if !page.code.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("────────────\n\n");
    let _ = writeln!(
        out,
        "Write code, run it with `dsquest run {id}`, then `dsquest check {id}` to earn XP.",
        id = lesson.id
    );
    out
}

/// Captured program output as shown in the terminal pane.
pub fn render_terminal(output: &str) -> String {
    format!("── Terminal ──\n{}\n──────────────", output.trim_end())
}

/// Summary after `run`: checks are evaluated but completion is not recorded.
pub fn render_run_summary(report: &RunReport) -> String {
    if report.ok {
        "Run finished ✅ (use `check` to record completion.)".to_string()
    } else {
        format!(
            "Run finished — output didn't match the checks yet.\n\n{}",
            report.message
        )
    }
}

/// Summary after `check`. `newly_completed` is false when the lesson was
/// already done before this run.
pub fn render_check_summary(report: &RunReport, lesson: &Lesson, newly_completed: bool) -> String {
    if !report.ok {
        return format!("Not yet.\n{}", report.message);
    }
    if newly_completed {
        format!("✅ Passed! You earned {} XP.", lesson.xp)
    } else {
        "✅ Passed! (already completed, no XP awarded)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRICULUM: &str = r#"{
      "chapters": [
        {"id": "py", "emoji": "🐍", "title": "Python Basics", "blurb": "Start here",
         "lessons": [
           {"id": "py-01", "title": "Hello", "xp": 200, "md": "l1.md", "starter": "print('hi')"},
           {"id": "py-02", "title": "Lists", "xp": 150, "md": "l2.md"}
         ]},
        {"id": "pd", "emoji": "🐼", "title": "Pandas", "blurb": "DataFrames",
         "lessons": [{"id": "pd-01", "title": "Series", "xp": 100, "md": "l3.md"}]},
        {"id": "soon", "emoji": "🚧", "title": "Coming Soon", "blurb": "", "lessons": []}
      ]
    }"#;

    fn curriculum() -> Curriculum {
        serde_json::from_str(CURRICULUM).unwrap()
    }

    fn progress(done: &[&str], xp: u64) -> ProgressRecord {
        let mut p = ProgressRecord::default();
        for id in done {
            p.completed.insert(id.to_string(), true);
        }
        p.xp = xp;
        p
    }

    #[test]
    fn progress_bar_widths() {
        assert_eq!(progress_bar(0), format!("[{}]", "-".repeat(20)));
        assert_eq!(progress_bar(50), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(progress_bar(100), format!("[{}]", "#".repeat(20)));
    }

    #[test]
    fn nav_marks_active_tab() {
        let nav = render_nav(NavTab::Profile);
        assert!(nav.contains("[profile]"));
        assert!(nav.contains("home (#/)"));
    }

    #[test]
    fn home_shows_stats_and_tiles() {
        let text = render_home(&curriculum(), &progress(&["py-01"], 200));
        assert!(text.contains("Level: 3"));
        assert!(text.contains("Lessons Completed: 1"));
        assert!(text.contains("1/2 • 50%"));
        assert!(text.contains("0/0 • 0%"));
        assert!(text.contains("#/chapter/pd"));
    }

    #[test]
    fn dashboard_points_at_first_incomplete_lesson() {
        let text = render_dashboard(&curriculum(), &progress(&["py-01"], 200));
        assert!(text.contains("Level 3 • 200 XP"));
        assert!(text.contains("Next up: 🐍 Lists"));
        assert!(text.contains("Start: #/lesson/py-02"));
    }

    #[test]
    fn profile_lists_badges() {
        let text = render_profile(&curriculum(), &progress(&["py-01", "py-02"], 350));
        assert!(text.contains("Badges (2)"));
        assert!(text.contains("🐍 Python Basics — Cleared"));
        assert!(text.contains("🏅 XP Milestone — 300+"));
        assert!(!text.contains("Coming Soon — Cleared"));

        let empty = render_profile(&curriculum(), &ProgressRecord::default());
        assert!(empty.contains("No badges yet"));
    }

    #[test]
    fn chapter_view_and_not_found() {
        let text = render_chapter(&curriculum(), &progress(&["py-01"], 200), "py");
        assert!(text.contains("✅ Completed"));
        assert!(text.contains("+150 XP"));
        assert!(text.contains("#/lesson/py-02"));

        assert_eq!(
            render_chapter(&curriculum(), &ProgressRecord::default(), "nope"),
            "Chapter not found.\n"
        );
    }

    #[test]
    fn lesson_view_shows_markdown_and_code() {
        let c = curriculum();
        let found = c.lesson("py-02").unwrap();
        let page = LessonPage {
            chapter: found.chapter,
            lesson: found.lesson,
            markdown: "# Lists\n\nUse `[]`.\n".into(),
            code: "xs = [1, 2]".into(),
            completed: false,
            neighbors: c.neighbors("py-02"),
        };
        let text = render_lesson(&page);
        assert!(text.starts_with("🐍 Lists    [+150 XP]"));
        assert!(text.contains("# Lists\n\nUse `[]`."));
        assert!(text.contains("← Prev: #/lesson/py-01"));
        assert!(text.contains("Next →: #/lesson/pd-01"));
        assert!(text.contains("xs = [1, 2]\n"));
    }

    #[test]
    fn check_summaries() {
        let c = curriculum();
        let lesson = c.lesson("py-01").unwrap().lesson;
        let passed = RunReport {
            ok: true,
            output: "hi\n".into(),
            message: "All checks passed".into(),
            faulted: false,
        };
        assert_eq!(
            render_check_summary(&passed, lesson, true),
            "✅ Passed! You earned 200 XP."
        );
        assert!(render_check_summary(&passed, lesson, false).contains("already completed"));

        let failed = RunReport {
            ok: false,
            output: "ho\n".into(),
            message: "Expected exact output:\nhi\n\nGot:\nho".into(),
            faulted: false,
        };
        assert!(render_check_summary(&failed, lesson, false).starts_with("Not yet.\nExpected"));
        assert!(render_run_summary(&failed).contains("didn't match"));
    }
}
