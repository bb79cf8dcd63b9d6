//! Little Poet (小小诗人): classical-poetry practice for kids.
//!
//! The state machines (theme selection, punch-in quiz, progress) are plain
//! Rust over small ports for storage, time and randomness; `views` wires
//! them into a Yew single-page app.

pub mod clock;
pub mod config;
pub mod error;
pub mod player;
pub mod poems;
pub mod progress;
pub mod quiz;
pub mod route;
pub mod share;
pub mod storage;
pub mod theme;
pub mod views;

pub use config::AppConfig;
pub use error::AppError;
pub use poems::{Poem, PoemCatalog};
pub use progress::{CompletedPoems, ProgressStats, ProgressTracker};
pub use quiz::{ExamOption, Phase, PunchInSession, QuizError, Selection};
pub use theme::{Theme, ThemeController, ThemeMode, ThemeState};
