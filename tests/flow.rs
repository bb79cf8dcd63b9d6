//! End-to-end flows over the in-memory store: what a child does in one
//! visit, and what the next visit sees.

use little_poet::clock::FixedClock;
use little_poet::route::Route;
use little_poet::storage::MemoryStore;
use little_poet::{
    AppConfig, Phase, PoemCatalog, ProgressStats, ProgressTracker, PunchInSession, Selection,
    Theme, ThemeController, ThemeMode,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn punch_in(
    catalog: &PoemCatalog,
    poem_id: u32,
    tracker: &mut ProgressTracker<MemoryStore>,
    rng: &mut StdRng,
) -> Selection {
    let config = AppConfig::default();
    let mut session = PunchInSession::new(catalog, poem_id);
    session
        .start_exam(catalog, config.distractor_count, rng)
        .expect("poem has an image");
    let correct = session
        .options()
        .iter()
        .find(|option| option.is_correct)
        .map(|option| option.id)
        .expect("one option is correct");
    let outcome = session.select(correct, tracker);
    assert_eq!(session.phase(), Phase::Success);
    outcome
}

#[test]
fn completion_survives_a_reload_and_moves_the_home_target() {
    let catalog = PoemCatalog::bundled().unwrap();
    let config = AppConfig::default();
    let store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(42);

    // No query parameter lands on the first poem
    let route = Route::parse("/punch-in", None, &catalog);
    assert_eq!(route, Route::PunchIn(1));

    let mut tracker = ProgressTracker::load(store.clone(), config.completed_poems_key.clone());
    assert_eq!(catalog.first_uncompleted(tracker.completed()), 1);
    assert_eq!(
        punch_in(&catalog, 1, &mut tracker, &mut rng),
        Selection::Correct {
            newly_completed: true
        }
    );

    // Fresh session on the same storage
    let reloaded = ProgressTracker::load(store.clone(), config.completed_poems_key.clone());
    assert!(reloaded.is_complete(1));
    assert_eq!(reloaded.completed().len(), 1);
    assert_eq!(catalog.first_uncompleted(reloaded.completed()), 2);

    let stats = ProgressStats::compute(&catalog, reloaded.completed());
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.remaining, catalog.len() - 1);
    assert_eq!(stats.next_target, 2);
}

#[test]
fn punching_in_twice_keeps_one_entry() {
    let catalog = PoemCatalog::bundled().unwrap();
    let store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(7);
    let mut tracker = ProgressTracker::load(store.clone(), "completedPoems");

    punch_in(&catalog, 3, &mut tracker, &mut rng);
    assert_eq!(
        punch_in(&catalog, 3, &mut tracker, &mut rng),
        Selection::Correct {
            newly_completed: false
        }
    );

    let reloaded = ProgressTracker::load(store, "completedPoems");
    assert_eq!(reloaded.completed().iter().collect::<Vec<_>>(), vec![3]);
}

#[test]
fn home_target_wraps_to_the_first_poem_once_everything_is_done() {
    let catalog = PoemCatalog::bundled().unwrap();
    let store = MemoryStore::new();
    let mut tracker = ProgressTracker::load(store.clone(), "completedPoems");
    for poem in catalog.iter() {
        tracker.mark_complete(poem.id);
    }

    let reloaded = ProgressTracker::load(store, "completedPoems");
    assert_eq!(catalog.first_uncompleted(reloaded.completed()), 1);
    let stats = ProgressStats::compute(&catalog, reloaded.completed());
    assert_eq!(stats.percent, 100);
    assert_eq!(stats.remaining, 0);
}

#[test]
fn poems_without_pictures_cannot_be_examined() {
    let catalog = PoemCatalog::bundled().unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    for poem in catalog.iter().filter(|poem| !poem.has_image()) {
        let mut session = PunchInSession::new(&catalog, poem.id);
        assert!(!session.can_start_exam(&catalog));
        assert!(session.start_exam(&catalog, 3, &mut rng).is_err());
        assert_eq!(session.phase(), Phase::Reading);
        assert!(session.options().is_empty());
    }
}

#[test]
fn theme_choice_survives_a_reload() {
    let config = AppConfig::default();
    let store = MemoryStore::new();
    let clock = FixedClock::at(10);

    let mut controller =
        ThemeController::load(store.clone(), clock.clone(), config.theme_mode_key.clone());
    assert_eq!(controller.mode(), ThemeMode::Auto);
    assert_eq!(controller.theme(), Theme::Childlike);
    assert_eq!(controller.toggle_mode(), ThemeMode::Day);
    assert_eq!(controller.toggle_mode(), ThemeMode::Night);

    let reloaded = ThemeController::load(store, clock, config.theme_mode_key);
    assert_eq!(reloaded.mode(), ThemeMode::Night);
    assert_eq!(reloaded.theme(), Theme::Tech);
}
