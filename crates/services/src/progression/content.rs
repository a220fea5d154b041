use quiz_core::content::{default_landmarks, default_route};
use quiz_core::model::{LandmarkCatalog, Question, QuestionPool, RouteTable};
use quiz_core::progression::{GameConfig, ProgressionController};

/// Read-only game data shared by every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameContent {
    pool: QuestionPool,
    route: RouteTable,
    landmarks: LandmarkCatalog,
}

impl GameContent {
    #[must_use]
    pub fn new(pool: QuestionPool, route: RouteTable, landmarks: LandmarkCatalog) -> Self {
        Self {
            pool,
            route,
            landmarks,
        }
    }

    /// Built-in route and landmarks around the given pool.
    ///
    /// # Errors
    ///
    /// Returns `quiz_core::Error` if the built-in route or landmarks are malformed.
    pub fn with_default_route(pool: QuestionPool) -> Result<Self, quiz_core::Error> {
        let route = default_route()?;
        let landmarks = default_landmarks(&route)?;
        Ok(Self::new(pool, route, landmarks))
    }

    /// Built-in route from a question loader result.
    ///
    /// A failed or empty load yields the single-question sentinel pool.
    ///
    /// # Errors
    ///
    /// See [`GameContent::with_default_route`].
    pub fn from_loaded<E: std::fmt::Display>(
        loaded: Result<Vec<Question>, E>,
    ) -> Result<Self, quiz_core::Error> {
        match &loaded {
            Err(err) => tracing::warn!(error = %err, "question load failed, using sentinel pool"),
            Ok(questions) if questions.is_empty() => {
                tracing::warn!("question pool is empty, using sentinel pool");
            }
            Ok(_) => {}
        }
        Self::with_default_route(QuestionPool::load_or_sentinel(loaded))
    }

    #[must_use]
    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    #[must_use]
    pub fn route(&self) -> &RouteTable {
        &self.route
    }

    #[must_use]
    pub fn landmarks(&self) -> &LandmarkCatalog {
        &self.landmarks
    }

    #[must_use]
    pub fn controller(&self, config: GameConfig) -> ProgressionController<'_> {
        ProgressionController::new(&self.pool, &self.route, &self.landmarks, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::content::sample_questions;

    #[test]
    fn failed_load_degrades_pool() {
        let content = GameContent::from_loaded::<String>(Err("disk on fire".into())).unwrap();
        assert!(content.pool().is_degraded());
        assert_eq!(content.pool().len(), 1);

        let content = GameContent::from_loaded::<String>(Ok(Vec::new())).unwrap();
        assert!(content.pool().is_degraded());
    }

    #[test]
    fn loaded_questions_are_kept_in_order() {
        let questions = sample_questions().unwrap();
        let content = GameContent::from_loaded::<String>(Ok(questions.clone())).unwrap();
        assert!(!content.pool().is_degraded());
        let ids: Vec<_> = content.pool().iter().map(|q| q.id().to_owned()).collect();
        let expected: Vec<_> = questions.iter().map(|q| q.id().to_owned()).collect();
        assert_eq!(ids, expected);
        assert_eq!(content.route().name(0), "Tokyo");
    }
}
