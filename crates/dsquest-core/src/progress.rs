//! Progress bookkeeping: completions, XP, levels and badges.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{Chapter, Curriculum, Lesson, LessonRef};
use crate::repository::ProgressRepository;

/// XP needed per level.
pub const XP_PER_LEVEL: u64 = 100;

/// XP milestones that award a badge.
pub const XP_MILESTONES: [u64; 2] = [300, 600];

/// Persisted completion state.
///
/// `xp` only grows, except through an explicit reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(default)]
    pub completed: BTreeMap<String, bool>,
    #[serde(default)]
    pub xp: u64,
}

impl ProgressRecord {
    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed.get(lesson_id).copied().unwrap_or(false)
    }

    /// Number of completed lessons.
    pub fn completed_count(&self) -> usize {
        self.completed.values().filter(|done| **done).count()
    }

    pub fn level(&self) -> u64 {
        level_from_xp(self.xp)
    }

    /// Mark a lesson completed, awarding XP only the first time.
    pub fn complete(&mut self, lesson_id: &str, xp_award: u64) -> bool {
        if self.is_completed(lesson_id) {
            return false;
        }
        self.completed.insert(lesson_id.to_string(), true);
        self.xp = self.xp.saturating_add(xp_award);
        true
    }

    pub fn chapter_completion(&self, chapter: &Chapter) -> ChapterCompletion {
        let total = chapter.lessons.len();
        let done = chapter
            .lessons
            .iter()
            .filter(|l| self.is_completed(&l.id))
            .count();
        ChapterCompletion::new(done, total)
    }

    /// First lesson not yet completed, or the very last lesson when all are.
    pub fn next_up<'a>(&self, curriculum: &'a Curriculum) -> Option<LessonRef<'a>> {
        curriculum
            .lessons()
            .find(|r| !self.is_completed(&r.lesson.id))
            .or_else(|| curriculum.lessons().last())
    }

    /// Where "Continue" leads inside one chapter.
    pub fn chapter_continue<'a>(&self, chapter: &'a Chapter) -> Option<&'a Lesson> {
        chapter
            .lessons
            .iter()
            .find(|l| !self.is_completed(&l.id))
            .or_else(|| chapter.lessons.last())
    }

    /// Badges earned so far, in display order.
    pub fn badges(&self, curriculum: &Curriculum) -> Vec<Badge> {
        let mut badges: Vec<Badge> = curriculum
            .chapters
            .iter()
            .filter(|ch| self.chapter_completion(ch).is_cleared())
            .map(|ch| Badge::ChapterCleared {
                emoji: ch.emoji.clone(),
                title: ch.title.clone(),
            })
            .collect();
        badges.extend(
            XP_MILESTONES
                .iter()
                .filter(|m| self.xp >= **m)
                .map(|m| Badge::XpMilestone(*m)),
        );
        badges
    }
}

/// `floor(xp / 100) + 1`.
pub fn level_from_xp(xp: u64) -> u64 {
    xp / XP_PER_LEVEL + 1
}

/// Completion summary of one chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterCompletion {
    pub done: usize,
    pub total: usize,
    /// Rounded percentage, 0 for an empty chapter.
    pub pct: u32,
}

impl ChapterCompletion {
    pub fn new(done: usize, total: usize) -> Self {
        let pct = if total == 0 {
            0
        } else {
            (done as f64 / total as f64 * 100.0).round() as u32
        };
        Self { done, total, pct }
    }

    /// Every lesson done. An empty chapter is never cleared.
    pub fn is_cleared(&self) -> bool {
        self.total > 0 && self.done == self.total
    }
}

/// A badge shown on the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    ChapterCleared { emoji: String, title: String },
    XpMilestone(u64),
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Badge::ChapterCleared { emoji, title } => write!(f, "{emoji} {title} — Cleared"),
            Badge::XpMilestone(300) => write!(f, "🏅 XP Milestone — 300+"),
            Badge::XpMilestone(xp) => write!(f, "🏆 XP Milestone — {xp}+"),
        }
    }
}

/// Progress and saved-code operations over a repository.
#[derive(Clone)]
pub struct ProgressStore {
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressStore {
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self { repo }
    }

    /// The current record; the default when nothing (or garbage) is stored.
    pub fn get_progress(&self) -> Result<ProgressRecord, StoreError> {
        Ok(self.repo.get_progress()?.unwrap_or_default())
    }

    /// Mark a lesson completed and persist. Returns `false` if it already was.
    pub fn set_completed(&self, lesson_id: &str, xp_award: u64) -> Result<bool, StoreError> {
        let mut record = self.get_progress()?;
        if !record.complete(lesson_id, xp_award) {
            tracing::debug!("lesson {lesson_id} already completed, no XP awarded");
            return Ok(false);
        }
        self.repo.set_progress(&record)?;
        tracing::info!(
            "lesson {lesson_id} completed (+{xp_award} XP, total {})",
            record.xp
        );
        Ok(true)
    }

    pub fn is_completed(&self, lesson_id: &str) -> Result<bool, StoreError> {
        Ok(self.get_progress()?.is_completed(lesson_id))
    }

    /// Saved code for a lesson, or `fallback` when none (or an empty string)
    /// was saved.
    pub fn get_saved_code(&self, lesson_id: &str, fallback: &str) -> Result<String, StoreError> {
        Ok(self
            .repo
            .get_code(lesson_id)?
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| fallback.to_string()))
    }

    /// Current code for a lesson: saved text or its starter.
    pub fn current_code(&self, lesson: &Lesson) -> Result<String, StoreError> {
        self.get_saved_code(&lesson.id, &lesson.starter)
    }

    pub fn save_code(&self, lesson_id: &str, code: &str) -> Result<(), StoreError> {
        self.repo.set_code(lesson_id, code)
    }

    /// Overwrite a lesson's saved code with its starter.
    pub fn reset_code(&self, lesson: &Lesson) -> Result<(), StoreError> {
        self.repo.set_code(&lesson.id, &lesson.starter)
    }

    /// Clear completions, XP and saved code for every lesson in `curriculum`.
    pub fn reset_all(&self, curriculum: &Curriculum) -> Result<(), StoreError> {
        for r in curriculum.lessons() {
            self.repo.delete_code(&r.lesson.id)?;
        }
        self.repo.set_progress(&ProgressRecord::default())?;
        tracing::info!("progress reset for {} lessons", curriculum.lesson_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample;
    use crate::repository::KvProgressRepository;
    use crate::store::{KeyValueStore, MemoryStore};

    fn store() -> (Arc<MemoryStore>, ProgressStore) {
        let kv = Arc::new(MemoryStore::new());
        let repo = Arc::new(KvProgressRepository::new(kv.clone()));
        (kv, ProgressStore::new(repo))
    }

    #[test]
    fn level_formula() {
        assert_eq!(level_from_xp(0), 1);
        assert_eq!(level_from_xp(99), 1);
        assert_eq!(level_from_xp(100), 2);
        assert_eq!(level_from_xp(250), 3);
    }

    #[test]
    fn default_when_absent() {
        let (_, store) = store();
        assert_eq!(store.get_progress().unwrap(), ProgressRecord::default());
    }

    #[test]
    fn default_when_corrupt() {
        let (kv, store) = store();
        kv.set("progress", "]]]").unwrap();
        let p = store.get_progress().unwrap();
        assert!(p.completed.is_empty());
        assert_eq!(p.xp, 0);
    }

    #[test]
    fn completion_is_idempotent() {
        let (_, store) = store();
        assert!(store.set_completed("l1", 50).unwrap());
        assert!(!store.set_completed("l1", 50).unwrap());
        let p = store.get_progress().unwrap();
        assert_eq!(p.xp, 50);
        assert_eq!(p.completed_count(), 1);
        assert!(store.is_completed("l1").unwrap());
    }

    #[test]
    fn saved_code_falls_back() {
        let (_, store) = store();
        assert_eq!(store.get_saved_code("l1", "starter").unwrap(), "starter");
        store.save_code("l1", "mine").unwrap();
        assert_eq!(store.get_saved_code("l1", "starter").unwrap(), "mine");
    }

    #[test]
    fn empty_saved_code_falls_back_to_starter() {
        let (kv, store) = store();
        store.save_code("l1", "").unwrap();
        assert_eq!(kv.get("code_l1").unwrap().as_deref(), Some(""));
        assert_eq!(store.get_saved_code("l1", "starter").unwrap(), "starter");
    }

    #[test]
    fn reset_code_restores_starter() {
        let (_, store) = store();
        let c = sample();
        let lesson = c.lesson("l1").unwrap().lesson;
        store.save_code("l1", "broken").unwrap();
        store.reset_code(lesson).unwrap();
        assert_eq!(store.current_code(lesson).unwrap(), "print('hi')");
    }

    #[test]
    fn reset_all_clears_everything() {
        let (kv, store) = store();
        let c = sample();
        store.set_completed("l1", 50).unwrap();
        store.set_completed("l3", 100).unwrap();
        store.save_code("l1", "a").unwrap();
        store.save_code("l2", "b").unwrap();
        store.save_code("l3", "c").unwrap();

        store.reset_all(&c).unwrap();

        assert_eq!(store.get_progress().unwrap(), ProgressRecord::default());
        for id in ["l1", "l2", "l3"] {
            assert!(kv.get(&format!("code_{id}")).unwrap().is_none());
        }
    }

    #[test]
    fn chapter_completion_rounds() {
        let c = sample();
        let mut p = ProgressRecord::default();
        p.complete("l1", 0);
        let comp = p.chapter_completion(&c.chapters[0]);
        assert_eq!((comp.done, comp.total, comp.pct), (1, 2, 50));
        assert!(!comp.is_cleared());

        assert_eq!(ChapterCompletion::new(1, 3).pct, 33);
        assert_eq!(ChapterCompletion::new(2, 3).pct, 67);
        assert_eq!(ChapterCompletion::new(0, 0).pct, 0);
        assert!(!ChapterCompletion::new(0, 0).is_cleared());
    }

    #[test]
    fn next_up_and_chapter_continue() {
        let c = sample();
        let mut p = ProgressRecord::default();
        assert_eq!(p.next_up(&c).unwrap().lesson.id, "l1");
        p.complete("l1", 0);
        assert_eq!(p.next_up(&c).unwrap().lesson.id, "l2");
        p.complete("l2", 0);
        p.complete("l3", 0);
        assert_eq!(p.next_up(&c).unwrap().lesson.id, "l3");
        assert_eq!(p.chapter_continue(&c.chapters[0]).unwrap().id, "l2");
    }

    #[test]
    fn badges_for_cleared_chapters_and_milestones() {
        let c = sample();
        let mut p = ProgressRecord::default();
        assert!(p.badges(&c).is_empty());

        p.complete("l3", 650);
        let badges = p.badges(&c);
        assert_eq!(badges.len(), 3);
        assert_eq!(badges[0].to_string(), "🐼 Pandas — Cleared");
        assert_eq!(badges[1].to_string(), "🏅 XP Milestone — 300+");
        assert_eq!(badges[2].to_string(), "🏆 XP Milestone — 600+");
    }
}
