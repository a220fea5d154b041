use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use quiz_core::deck::QuestionDeck;
use quiz_core::model::{Phase, SessionKey, SessionRecord, TravelMode};
use quiz_core::progression::{Answer, GameConfig, ProgressionController};
use storage::repository::SessionStore;

use super::content::GameContent;
use super::view::PlayView;
use crate::Clock;
use crate::error::{GameError, ProgressionError};

/// Where deck shuffles draw their randomness from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShuffleSource {
    /// Thread-local OS-seeded generator.
    #[default]
    Thread,
    /// Fixed seed: every playthrough gets the same deck order.
    Seeded(u64),
}

impl ShuffleSource {
    #[must_use]
    pub fn deck(self, pool_size: usize) -> QuestionDeck {
        match self {
            ShuffleSource::Thread => QuestionDeck::shuffled(pool_size, &mut rand::rng()),
            ShuffleSource::Seeded(seed) => {
                QuestionDeck::shuffled(pool_size, &mut StdRng::seed_from_u64(seed))
            }
        }
    }
}

type SessionLocks = HashMap<SessionKey, Arc<Mutex<()>>>;

/// Store-backed game loop.
///
/// Each call loads the session record, applies one transition and saves it
/// back. Calls for the same key run one at a time.
#[derive(Clone)]
pub struct GameLoopService {
    clock: Clock,
    shuffle: ShuffleSource,
    config: GameConfig,
    content: Arc<GameContent>,
    sessions: Arc<dyn SessionStore>,
    locks: Arc<Mutex<SessionLocks>>,
}

impl GameLoopService {
    #[must_use]
    pub fn new(clock: Clock, content: Arc<GameContent>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            clock,
            shuffle: ShuffleSource::default(),
            config: GameConfig::default(),
            content,
            sessions,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: ShuffleSource) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn content(&self) -> &GameContent {
        &self.content
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Start a new playthrough, discarding any game in progress.
    ///
    /// # Errors
    ///
    /// Returns `GameError` for storage failures or a route with no next stop.
    pub async fn start(&self, key: &SessionKey, mode: TravelMode) -> Result<PlayView, GameError> {
        self.serialized(key, self.start_locked(key, mode)).await
    }

    async fn start_locked(
        &self,
        key: &SessionKey,
        mode: TravelMode,
    ) -> Result<PlayView, GameError> {
        let mut record = self.load(key).await?;
        let deck = self.shuffle.deck(self.content.pool().len());
        let state = self
            .controller()
            .start_with_deck(&mut record, mode, deck, self.clock.now())?;
        info!(
            session = key.as_str(),
            %mode,
            leg_size = state.leg_size(),
            "game started"
        );
        self.save_and_view(key, &record).await
    }

    /// Judge an answer to the current question.
    ///
    /// With no game in progress the menu is returned instead.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Progression` for a wrong-phase call or an option the
    /// question does not offer, `GameError::Storage` for store failures.
    pub async fn answer(&self, key: &SessionKey, answer: Answer) -> Result<PlayView, GameError> {
        self.transition(key, "answer", |controller, record, now| {
            let judgement = controller.submit_answer(record, answer, now)?;
            debug!(
                session = key.as_str(),
                question = %judgement.question,
                correct = judgement.correct,
                landmark = ?judgement.collected_landmark,
                "answer judged"
            );
            Ok(())
        })
        .await
    }

    /// Leave the judgement screen.
    ///
    /// # Errors
    ///
    /// See [`GameLoopService::answer`].
    pub async fn acknowledge(&self, key: &SessionKey) -> Result<PlayView, GameError> {
        self.transition(key, "acknowledge", |controller, record, now| {
            let phase = controller.acknowledge(record, now)?;
            log_phase(key, phase);
            Ok(())
        })
        .await
    }

    /// Depart from the station just reached.
    ///
    /// # Errors
    ///
    /// See [`GameLoopService::answer`].
    pub async fn depart(&self, key: &SessionKey) -> Result<PlayView, GameError> {
        self.transition(key, "depart", |controller, record, now| {
            let phase = controller.depart(record, now)?;
            if phase == Phase::InLeg {
                if let Some(state) = record.progress.as_ref() {
                    debug!(
                        session = key.as_str(),
                        leg = state.leg_number(),
                        dealt = state.leg().len(),
                        "leg dealt"
                    );
                }
            }
            log_phase(key, phase);
            Ok(())
        })
        .await
    }

    /// Drop the game in progress; collected landmarks stay.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` for store failures.
    pub async fn return_to_menu(&self, key: &SessionKey) -> Result<PlayView, GameError> {
        self.serialized(key, self.return_to_menu_locked(key)).await
    }

    async fn return_to_menu_locked(&self, key: &SessionKey) -> Result<PlayView, GameError> {
        let mut record = self.load(key).await?;
        record.return_to_menu();
        info!(
            session = key.as_str(),
            landmarks = record.collected_landmarks.len(),
            "returned to menu"
        );
        self.save_and_view(key, &record).await
    }

    /// Current view without changing anything.
    ///
    /// # Errors
    ///
    /// Returns `GameError` for store failures or an inconsistent record.
    pub async fn view(&self, key: &SessionKey) -> Result<PlayView, GameError> {
        let record = self.load(key).await?;
        Ok(PlayView::build(&self.content, &record)?)
    }

    /// Forget the session entirely, landmarks included.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` for store failures.
    pub async fn forget(&self, key: &SessionKey) -> Result<(), GameError> {
        self.serialized(key, async {
            self.sessions.delete(key).await?;
            Ok::<(), GameError>(())
        })
        .await
    }

    fn controller(&self) -> ProgressionController<'_> {
        self.content.controller(self.config)
    }

    async fn transition<F>(
        &self,
        key: &SessionKey,
        action: &'static str,
        apply: F,
    ) -> Result<PlayView, GameError>
    where
        F: FnOnce(
            &ProgressionController<'_>,
            &mut SessionRecord,
            DateTime<Utc>,
        ) -> Result<(), ProgressionError>,
    {
        self.serialized(key, self.transition_locked(key, action, apply)).await
    }

    async fn transition_locked<F>(
        &self,
        key: &SessionKey,
        action: &'static str,
        apply: F,
    ) -> Result<PlayView, GameError>
    where
        F: FnOnce(
            &ProgressionController<'_>,
            &mut SessionRecord,
            DateTime<Utc>,
        ) -> Result<(), ProgressionError>,
    {
        let mut record = self.load(key).await?;
        if record.is_at_menu() {
            warn!(session = key.as_str(), action, "no game in progress, showing menu");
            return Ok(PlayView::menu(&self.content, &record));
        }

        apply(&self.controller(), &mut record, self.clock.now())?;
        self.save_and_view(key, &record).await
    }

    async fn load(&self, key: &SessionKey) -> Result<SessionRecord, GameError> {
        Ok(self.sessions.load(key).await?.unwrap_or_default())
    }

    async fn save_and_view(
        &self,
        key: &SessionKey,
        record: &SessionRecord,
    ) -> Result<PlayView, GameError> {
        self.sessions.save(key, record).await?;
        Ok(PlayView::build(&self.content, record)?)
    }

    /// Run `work` while holding the lock for `key`.
    async fn serialized<T>(&self, key: &SessionKey, work: impl Future<Output = T>) -> T {
        let lock = self.session_lock(key).await;
        let result = {
            let _guard = lock.lock().await;
            work.await
        };
        self.release_lock(key, lock).await;
        result
    }

    async fn session_lock(&self, key: &SessionKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(key.clone()).or_default())
    }

    /// Drop the map entry once no other request holds or waits on it.
    ///
    /// Handles are only cloned under the map lock, so the count cannot grow
    /// while it is checked here.
    async fn release_lock(&self, key: &SessionKey, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        let only_map_and_us = Arc::strong_count(&lock) == 2;
        if only_map_and_us && locks.get(key).is_some_and(|held| Arc::ptr_eq(held, &lock)) {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    async fn tracked_locks(&self) -> usize {
        self.locks.lock().await.len()
    }
}

fn log_phase(key: &SessionKey, phase: Phase) {
    match phase {
        Phase::Goal => info!(session = key.as_str(), "goal reached"),
        Phase::StationArrival => debug!(session = key.as_str(), "arrived at station"),
        Phase::InLeg | Phase::LegJudgement => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionPool;
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn service(shuffle: ShuffleSource) -> GameLoopService {
        let content = GameContent::from_loaded::<String>(Err("unavailable".into())).unwrap();
        GameLoopService::new(
            Clock::fixed(fixed_now()),
            Arc::new(content),
            Arc::new(InMemoryRepository::new()),
        )
        .with_shuffle(shuffle)
    }

    #[tokio::test]
    async fn forget_keeps_lock_shared_with_waiting_requests() {
        let svc = service(ShuffleSource::Seeded(1));
        let key = SessionKey::new("alice").unwrap();
        svc.start(&key, TravelMode::Normal).await.unwrap();

        let waiting = svc.session_lock(&key).await;
        svc.forget(&key).await.unwrap();
        let later = svc.session_lock(&key).await;
        assert!(Arc::ptr_eq(&waiting, &later));

        let _held = waiting.lock().await;
        assert!(later.try_lock().is_err());
    }

    #[tokio::test]
    async fn finished_requests_release_their_locks() {
        let svc = service(ShuffleSource::Seeded(1));
        for n in 0..50 {
            let key = SessionKey::new(format!("player-{n}")).unwrap();
            svc.start(&key, TravelMode::Normal).await.unwrap();
            svc.view(&key).await.unwrap();
            svc.return_to_menu(&key).await.unwrap();
        }
        assert_eq!(svc.tracked_locks().await, 0);
    }

    #[tokio::test]
    async fn failed_transition_releases_its_lock() {
        let svc = service(ShuffleSource::Seeded(1));
        let key = SessionKey::new("alice").unwrap();
        svc.start(&key, TravelMode::Normal).await.unwrap();
        assert!(svc.depart(&key).await.is_err());
        assert_eq!(svc.tracked_locks().await, 0);
    }

    #[test]
    fn seeded_shuffle_is_repeatable() {
        let a = ShuffleSource::Seeded(42).deck(20);
        let b = ShuffleSource::Seeded(42).deck(20);
        assert_eq!(a, b);
        assert_eq!(ShuffleSource::Thread.deck(20).remaining(), 20);
    }

    #[tokio::test]
    async fn missing_state_yields_menu() {
        let svc = service(ShuffleSource::Seeded(1));
        let key = SessionKey::new("nobody").unwrap();
        let answer = Answer {
            choice: 1,
            client_speed: quiz_core::speed::Speed::new(50),
            landmark_acquired: false,
        };
        assert!(matches!(svc.answer(&key, answer).await.unwrap(), PlayView::Menu(_)));
        assert!(matches!(svc.acknowledge(&key).await.unwrap(), PlayView::Menu(_)));
        assert!(matches!(svc.depart(&key).await.unwrap(), PlayView::Menu(_)));
        assert!(matches!(svc.view(&key).await.unwrap(), PlayView::Menu(_)));
    }

    #[tokio::test]
    async fn degraded_pool_runs_single_question_legs() {
        let svc = service(ShuffleSource::Seeded(1));
        assert_eq!(svc.content().pool(), &QuestionPool::sentinel());
        let key = SessionKey::new("alice").unwrap();

        let PlayView::InLeg(leg) = svc.start(&key, TravelMode::Normal).await.unwrap() else {
            panic!("expected in-leg view");
        };
        assert_eq!(leg.leg_len, 1);
        assert_eq!(leg.question.id, "load-failure");
    }

    #[tokio::test]
    async fn wrong_phase_is_rejected_without_saving() {
        let svc = service(ShuffleSource::Seeded(1));
        let key = SessionKey::new("alice").unwrap();
        svc.start(&key, TravelMode::Normal).await.unwrap();

        let err = svc.depart(&key).await.unwrap_err();
        assert!(matches!(
            err,
            GameError::Progression(ProgressionError::InvalidTransition { .. })
        ));
        assert_eq!(svc.view(&key).await.unwrap().phase(), Some(Phase::InLeg));
    }
}
