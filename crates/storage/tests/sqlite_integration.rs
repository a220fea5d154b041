use std::collections::BTreeSet;

use quiz_core::content::{default_landmarks, default_route, sample_questions};
use quiz_core::model::{QuestionPool, SessionKey, SessionRecord, TravelMode};
use quiz_core::progression::{Answer, GameConfig, ProgressionController};
use quiz_core::speed::Speed;
use quiz_core::time::fixed_now;
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::repository::{QuestionRepository, SessionStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_questions_roundtrip_in_order() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_questions?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let questions = sample_questions().unwrap();
    repo.replace_questions(&questions).await.unwrap();

    let fetched = repo.list_questions().await.unwrap();
    assert_eq!(fetched, questions);

    repo.replace_questions(&questions[..2]).await.unwrap();
    let fetched = repo.list_questions().await.unwrap();
    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].id(), questions[0].id());
}

#[tokio::test]
async fn sqlite_session_roundtrip_preserves_progress() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_sessions?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let pool = QuestionPool::new(sample_questions().unwrap()).unwrap();
    let route = default_route().unwrap();
    let landmarks = default_landmarks(&route).unwrap();
    let controller = ProgressionController::new(&pool, &route, &landmarks, GameConfig::default());

    let key = SessionKey::new("alice").unwrap();
    let mut record = SessionRecord::new();
    let mut rng = StdRng::seed_from_u64(7);
    controller
        .start(&mut record, TravelMode::Normal, fixed_now(), &mut rng)
        .unwrap();
    let question = controller
        .current_question(record.progress.as_ref().unwrap())
        .unwrap();
    let answer = Answer {
        choice: question.answer_index(),
        client_speed: Speed::new(80),
        landmark_acquired: true,
    };
    controller
        .submit_answer(&mut record, answer, fixed_now())
        .unwrap();

    repo.save(&key, &record).await.unwrap();
    let loaded = repo.load(&key).await.unwrap().expect("stored record");
    assert_eq!(loaded, record);
    assert_eq!(loaded.collected_landmarks, BTreeSet::from([0]));

    record.return_to_menu();
    repo.save(&key, &record).await.unwrap();
    let loaded = repo.load(&key).await.unwrap().expect("stored record");
    assert!(loaded.is_at_menu());
    assert!(loaded.has_collected(0));
}

#[tokio::test]
async fn sqlite_missing_and_deleted_sessions_load_as_none() {
    let storage = Storage::sqlite("sqlite:file:memdb_missing?mode=memory&cache=shared")
        .await
        .expect("storage");
    let key = SessionKey::new("bob").unwrap();
    assert!(storage.sessions.load(&key).await.unwrap().is_none());

    storage
        .sessions
        .save(&key, &SessionRecord::new())
        .await
        .unwrap();
    assert!(storage.sessions.load(&key).await.unwrap().is_some());

    storage.sessions.delete(&key).await.unwrap();
    assert!(storage.sessions.load(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
    assert!(repo.list_questions().await.unwrap().is_empty());
}
