use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::poems::{Poem, PoemCatalog};
use crate::progress::ProgressTracker;
use crate::storage::KeyValueStore;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ExamOption {
    pub id: usize,
    pub src: String,
    pub is_correct: bool,
}

impl ExamOption {
    pub fn letter(&self) -> char {
        char::from(b'A' + (self.id % 26) as u8)
    }

    /// Image URL for a load attempt. Retries carry a `retry` query
    /// parameter so the browser refetches instead of reusing the failure.
    pub fn src_for_attempt(&self, attempt: u32) -> String {
        if attempt == 0 {
            return self.src.clone();
        }
        let sep = if self.src.contains('?') { '&' } else { '?' };
        format!("{}{}retry={}", self.src, sep, attempt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("poem {0} does not exist")]
    UnknownPoem(u32),

    #[error("poem {0} has no image to build a quiz from")]
    NoImage(u32),

    #[error("poem {0} is already punched in for this visit")]
    AlreadyPunchedIn(u32),
}

pub const MAX_DISTRACTORS: usize = 3;

/// One correct option (the poem's own image) plus up to `distractors`
/// images of other poems, in random order. `distractors` is held to
/// `1..=MAX_DISTRACTORS` whatever the page config asks for.
pub fn build_exam_options<R: Rng + ?Sized>(
    catalog: &PoemCatalog,
    poem_id: u32,
    distractors: usize,
    rng: &mut R,
) -> Result<Vec<ExamOption>, QuizError> {
    let poem = catalog.get(poem_id).ok_or(QuizError::UnknownPoem(poem_id))?;
    let correct = poem.image().ok_or(QuizError::NoImage(poem_id))?;

    let distractors = distractors.clamp(1, MAX_DISTRACTORS);
    let pool = catalog.distractor_pool(poem_id);
    let mut images: Vec<(&str, bool)> = pool
        .choose_multiple(rng, distractors)
        .filter_map(|other| other.image().map(|src| (src, false)))
        .collect();
    images.push((correct, true));
    images.shuffle(rng);

    Ok(images
        .into_iter()
        .enumerate()
        .map(|(id, (src, is_correct))| ExamOption {
            id,
            src: src.to_string(),
            is_correct,
        })
        .collect())
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Reading,
    Examining,
    /// Punched in; the completed display state.
    Success,
    /// Share overlay open on top of `Success`.
    Sharing,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Selection {
    Correct { newly_completed: bool },
    Wrong,
    Ignored,
}

#[derive(Clone, PartialEq, Debug)]
pub struct PunchInSession {
    poem_id: u32,
    last_id: u32,
    phase: Phase,
    options: Vec<ExamOption>,
    success_dialog: bool,
    wrong_attempts: u32,
}

impl PunchInSession {
    pub fn new(catalog: &PoemCatalog, poem_id: u32) -> Self {
        let last_id = catalog.last_id();
        Self {
            poem_id: poem_id.clamp(1, last_id),
            last_id,
            phase: Phase::Reading,
            options: Vec::new(),
            success_dialog: false,
            wrong_attempts: 0,
        }
    }

    pub fn poem_id(&self) -> u32 {
        self.poem_id
    }

    pub fn poem<'a>(&self, catalog: &'a PoemCatalog) -> &'a Poem {
        catalog.get(self.poem_id).unwrap_or_else(|| catalog.first())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn options(&self) -> &[ExamOption] {
        &self.options
    }

    pub fn punched_in(&self) -> bool {
        matches!(self.phase, Phase::Success | Phase::Sharing)
    }

    pub fn success_dialog_visible(&self) -> bool {
        self.success_dialog
    }

    pub fn wrong_attempts(&self) -> u32 {
        self.wrong_attempts
    }

    pub fn has_previous(&self) -> bool {
        self.poem_id > 1
    }

    pub fn has_next(&self) -> bool {
        self.poem_id < self.last_id
    }

    pub fn can_start_exam(&self, catalog: &PoemCatalog) -> bool {
        !self.punched_in() && self.poem(catalog).has_image()
    }

    /// Enter the exam. Options are built once per poem and kept across
    /// leaving and re-entering the exam.
    pub fn start_exam<R: Rng + ?Sized>(
        &mut self,
        catalog: &PoemCatalog,
        distractors: usize,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        match self.phase {
            Phase::Examining => return Ok(()),
            Phase::Success | Phase::Sharing => {
                return Err(QuizError::AlreadyPunchedIn(self.poem_id));
            }
            Phase::Reading => {}
        }
        if self.options.is_empty() {
            self.options = build_exam_options(catalog, self.poem_id, distractors, rng)?;
        }
        log::debug!(
            "exam for poem {} with {} options",
            self.poem_id,
            self.options.len()
        );
        self.phase = Phase::Examining;
        Ok(())
    }

    pub fn leave_exam(&mut self) {
        if self.phase == Phase::Examining {
            self.phase = Phase::Reading;
        }
    }

    pub fn select<S: KeyValueStore>(
        &mut self,
        option_id: usize,
        progress: &mut ProgressTracker<S>,
    ) -> Selection {
        if self.phase != Phase::Examining {
            return Selection::Ignored;
        }
        let Some(option) = self.options.iter().find(|o| o.id == option_id) else {
            return Selection::Ignored;
        };
        if !option.is_correct {
            self.wrong_attempts += 1;
            return Selection::Wrong;
        }
        let newly_completed = progress.mark_complete(self.poem_id);
        self.phase = Phase::Success;
        self.success_dialog = true;
        Selection::Correct { newly_completed }
    }

    pub fn dismiss_success_dialog(&mut self) {
        self.success_dialog = false;
    }

    pub fn open_share(&mut self) -> bool {
        if self.phase != Phase::Success {
            return false;
        }
        self.phase = Phase::Sharing;
        true
    }

    pub fn close_share(&mut self) {
        if self.phase == Phase::Sharing {
            self.phase = Phase::Success;
        }
    }

    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.go_to(self.poem_id - 1);
        true
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.go_to(self.poem_id + 1);
        true
    }

    fn go_to(&mut self, poem_id: u32) {
        self.poem_id = poem_id;
        self.phase = Phase::Reading;
        self.options.clear();
        self.success_dialog = false;
        self.wrong_attempts = 0;
    }
}

pub fn share_title(poem: &Poem) -> String {
    format!("[小小诗人] 《{}》", poem.title)
}

pub fn share_description(poem: &Poem) -> String {
    format!("宝贝今天背会了《{}》，学习进度已同步！", poem.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::poems::fixtures::catalog;
    use crate::storage::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;
    use std::collections::HashSet;

    const KEY: &str = "completedPoems";

    fn tracker() -> ProgressTracker<MemoryStore> {
        ProgressTracker::load(MemoryStore::new(), KEY)
    }

    fn correct_id(session: &PunchInSession) -> usize {
        session.options().iter().find(|o| o.is_correct).unwrap().id
    }

    fn wrong_id(session: &PunchInSession) -> usize {
        session.options().iter().find(|o| !o.is_correct).unwrap().id
    }

    #[test]
    fn options_have_one_correct_and_up_to_three_distractors() {
        let catalog = catalog(10, &[4]);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for poem_id in [1, 2, 3, 5, 10] {
                let options = build_exam_options(&catalog, poem_id, 3, &mut rng).unwrap();
                let correct: Vec<_> = options.iter().filter(|o| o.is_correct).collect();
                assert_eq!(correct.len(), 1);
                assert_eq!(correct[0].src, format!("/images/poems/{}.jpg", poem_id));
                assert_eq!(options.len(), 4);

                let ids: HashSet<_> = options.iter().map(|o| o.id).collect();
                assert_eq!(ids.len(), options.len());
                let srcs: HashSet<_> = options.iter().map(|o| o.src.as_str()).collect();
                assert_eq!(srcs.len(), options.len());
                assert!(!srcs.contains("/images/poems/4.jpg"));
            }
        }
    }

    #[rstest]
    #[case(r#"{ "distractorCount": 0 }"#, 1)]
    #[case(r#"{ "distractorCount": 1 }"#, 1)]
    #[case(r#"{ "distractorCount": 8 }"#, 3)]
    #[case(r#"{ "distractorCount": 1000 }"#, 3)]
    fn configured_distractor_count_is_held_in_range(#[case] raw: &str, #[case] wrong: usize) {
        let config = AppConfig::from_json(raw).unwrap();
        let catalog = catalog(10, &[]);
        let mut rng = StdRng::seed_from_u64(3);
        let options =
            build_exam_options(&catalog, 1, config.distractor_count, &mut rng).unwrap();
        assert_eq!(options.iter().filter(|o| o.is_correct).count(), 1);
        assert_eq!(options.iter().filter(|o| !o.is_correct).count(), wrong);
        assert!(options.len() <= MAX_DISTRACTORS + 1);
    }

    #[rstest]
    #[case("/images/poems/1.svg", 0, "/images/poems/1.svg")]
    #[case("/images/poems/1.svg", 2, "/images/poems/1.svg?retry=2")]
    #[case("https://cdn.example/p.svg?v=3", 1, "https://cdn.example/p.svg?v=3&retry=1")]
    fn retried_image_urls_bust_the_cache(
        #[case] src: &str,
        #[case] attempt: u32,
        #[case] expected: &str,
    ) {
        let option = ExamOption {
            id: 0,
            src: src.into(),
            is_correct: false,
        };
        assert_eq!(option.src_for_attempt(attempt), expected);
    }

    #[test]
    fn small_pool_uses_every_available_distractor() {
        let catalog = catalog(4, &[3, 4]);
        let mut rng = StdRng::seed_from_u64(7);
        let options = build_exam_options(&catalog, 1, 3, &mut rng).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options.iter().filter(|o| !o.is_correct).count(), 1);
    }

    #[test]
    fn correct_option_position_varies() {
        let catalog = catalog(8, &[]);
        let positions: HashSet<usize> = (0..40)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let options = build_exam_options(&catalog, 2, 3, &mut rng).unwrap();
                options.iter().position(|o| o.is_correct).unwrap()
            })
            .collect();
        assert!(positions.len() > 1);
    }

    #[test]
    fn poem_without_image_cannot_start() {
        let catalog = catalog(5, &[2]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            build_exam_options(&catalog, 2, 3, &mut rng),
            Err(QuizError::NoImage(2))
        );

        let mut session = PunchInSession::new(&catalog, 2);
        assert!(!session.can_start_exam(&catalog));
        assert_eq!(
            session.start_exam(&catalog, 3, &mut rng),
            Err(QuizError::NoImage(2))
        );
        assert_eq!(session.phase(), Phase::Reading);
        assert!(session.options().is_empty());
    }

    #[test]
    fn wrong_answers_keep_examining() {
        let catalog = catalog(5, &[]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut progress = tracker();
        let mut session = PunchInSession::new(&catalog, 1);
        session.start_exam(&catalog, 3, &mut rng).unwrap();

        let wrong = wrong_id(&session);
        for _ in 0..5 {
            assert_eq!(session.select(wrong, &mut progress), Selection::Wrong);
        }
        assert_eq!(session.phase(), Phase::Examining);
        assert_eq!(session.wrong_attempts(), 5);
        assert!(!progress.is_complete(1));

        let correct = correct_id(&session);
        assert_eq!(
            session.select(correct, &mut progress),
            Selection::Correct {
                newly_completed: true
            }
        );
        assert_eq!(session.phase(), Phase::Success);
        assert!(session.punched_in());
        assert!(session.success_dialog_visible());
        assert!(progress.is_complete(1));
    }

    #[test]
    fn repeat_completion_is_idempotent() {
        let catalog = catalog(3, &[]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut progress = tracker();

        for _ in 0..3 {
            let mut session = PunchInSession::new(&catalog, 2);
            session.start_exam(&catalog, 3, &mut rng).unwrap();
            let correct = correct_id(&session);
            session.select(correct, &mut progress);
        }
        assert_eq!(progress.completed().iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn selection_outside_exam_or_unknown_is_ignored() {
        let catalog = catalog(3, &[]);
        let mut rng = StdRng::seed_from_u64(5);
        let mut progress = tracker();
        let mut session = PunchInSession::new(&catalog, 1);

        assert_eq!(session.select(0, &mut progress), Selection::Ignored);
        session.start_exam(&catalog, 3, &mut rng).unwrap();
        assert_eq!(session.select(99, &mut progress), Selection::Ignored);
        assert_eq!(session.phase(), Phase::Examining);
    }

    #[test]
    fn leaving_and_reentering_keeps_options() {
        let catalog = catalog(6, &[]);
        let mut rng = StdRng::seed_from_u64(9);
        let mut session = PunchInSession::new(&catalog, 3);
        session.start_exam(&catalog, 3, &mut rng).unwrap();
        let first = session.options().to_vec();

        session.leave_exam();
        assert_eq!(session.phase(), Phase::Reading);
        session.start_exam(&catalog, 3, &mut rng).unwrap();
        assert_eq!(session.options(), first.as_slice());
    }

    #[test]
    fn navigation_is_clamped_and_resets_display_state() {
        let catalog = catalog(3, &[]);
        let mut rng = StdRng::seed_from_u64(2);
        let mut progress = tracker();

        let mut session = PunchInSession::new(&catalog, 1);
        assert!(!session.previous());
        assert_eq!(session.poem_id(), 1);

        session.start_exam(&catalog, 3, &mut rng).unwrap();
        let correct = correct_id(&session);
        session.select(correct, &mut progress);
        assert!(session.punched_in());

        assert!(session.next());
        assert_eq!(session.poem_id(), 2);
        assert_eq!(session.phase(), Phase::Reading);
        assert!(!session.punched_in());
        assert!(!session.success_dialog_visible());
        assert!(session.options().is_empty());
        assert!(progress.is_complete(1));

        assert!(session.next());
        assert!(!session.next());
        assert_eq!(session.poem_id(), 3);
    }

    #[test]
    fn share_only_after_success() {
        let catalog = catalog(3, &[]);
        let mut rng = StdRng::seed_from_u64(4);
        let mut progress = tracker();
        let mut session = PunchInSession::new(&catalog, 2);

        assert!(!session.open_share());
        session.start_exam(&catalog, 3, &mut rng).unwrap();
        assert!(!session.open_share());

        let correct = correct_id(&session);
        session.select(correct, &mut progress);
        session.dismiss_success_dialog();
        assert!(session.open_share());
        assert_eq!(session.phase(), Phase::Sharing);

        session.close_share();
        assert_eq!(session.phase(), Phase::Success);
        assert_eq!(
            session.start_exam(&catalog, 3, &mut rng),
            Err(QuizError::AlreadyPunchedIn(2))
        );
        assert_eq!(progress.completed().len(), 1);
    }

    #[test]
    fn completed_history_does_not_gate_reexamining() {
        let catalog = catalog(3, &[]);
        let mut rng = StdRng::seed_from_u64(6);
        let mut progress = tracker();
        progress.mark_complete(1);

        let mut session = PunchInSession::new(&catalog, 1);
        assert!(session.can_start_exam(&catalog));
        session.start_exam(&catalog, 3, &mut rng).unwrap();
        let correct = correct_id(&session);
        assert_eq!(
            session.select(correct, &mut progress),
            Selection::Correct {
                newly_completed: false
            }
        );
    }

    #[test]
    fn share_text_uses_title() {
        let catalog = catalog(1, &[]);
        let poem = catalog.first();
        assert_eq!(share_title(poem), "[小小诗人] 《诗1》");
        assert_eq!(share_description(poem), "宝贝今天背会了《诗1》，学习进度已同步！");
    }

    #[test]
    fn option_letters() {
        let option = ExamOption {
            id: 2,
            src: String::new(),
            is_correct: false,
        };
        assert_eq!(option.letter(), 'C');
    }
}
