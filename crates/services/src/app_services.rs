use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::progression::{GameContent, GameLoopService, ShuffleSource};

/// Assembles app-facing services from a storage backend.
#[derive(Clone)]
pub struct AppServices {
    game_loop: Arc<GameLoopService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// built-in route is malformed.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        shuffle: ShuffleSource,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, shuffle).await
    }

    /// Build services over an existing storage aggregate.
    ///
    /// The question pool is read once here; a failed or empty read falls
    /// back to the sentinel pool rather than failing start-up.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Content` if the built-in route is malformed.
    pub async fn from_storage(
        storage: &Storage,
        clock: Clock,
        shuffle: ShuffleSource,
    ) -> Result<Self, AppServicesError> {
        let loaded = storage.questions.list_questions().await;
        let content = GameContent::from_loaded(loaded)?;
        tracing::info!(
            questions = content.pool().len(),
            stations = content.route().len(),
            degraded = content.pool().is_degraded(),
            "game content loaded"
        );

        let game_loop = GameLoopService::new(
            clock,
            Arc::new(content),
            Arc::clone(&storage.sessions),
        )
        .with_shuffle(shuffle);

        Ok(Self {
            game_loop: Arc::new(game_loop),
        })
    }

    #[must_use]
    pub fn game_loop(&self) -> Arc<GameLoopService> {
        Arc::clone(&self.game_loop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::content::sample_questions;
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn from_storage_reads_question_pool() {
        let repo = InMemoryRepository::with_questions(sample_questions().unwrap());
        let storage = Storage {
            sessions: Arc::new(repo.clone()),
            questions: Arc::new(repo),
        };
        let services =
            AppServices::from_storage(&storage, Clock::fixed(fixed_now()), ShuffleSource::Seeded(3))
                .await
                .unwrap();
        let game_loop = services.game_loop();
        assert_eq!(game_loop.content().pool().len(), 12);
        assert!(!game_loop.content().pool().is_degraded());
    }

    #[tokio::test]
    async fn empty_store_degrades_to_sentinel() {
        let storage = Storage::in_memory();
        let services =
            AppServices::from_storage(&storage, Clock::fixed(fixed_now()), ShuffleSource::Thread)
                .await
                .unwrap();
        assert!(services.game_loop().content().pool().is_degraded());
    }
}
