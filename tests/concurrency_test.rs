mod helpers;

use std::thread;

use chrono::Utc;
use helpers::{views_by_id, words_with_views};
use rusqlite::TransactionBehavior;
use spindle::db;
use spindle::material::repository;
use spindle::material::schedule::BatchScheduler;
use spindle::material::service::MaterialService;

const REVIEWS_PER_HANDLE: u32 = 25;

#[test]
fn concurrent_reviews_are_all_counted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("material.db");
    // A small category is reviewed whole, so every review counts every item.
    let scheduler = BatchScheduler::new(5, 1000, 3).unwrap();

    let mut setup = db::open_database(&path).unwrap();
    let (merged, _) = MaterialService::with_scheduler(&mut setup, scheduler)
        .sync(vec![words_with_views("shared", &[0, 0, 0])])
        .unwrap();
    let id = merged[0].id;

    // Open every handle up front so schema setup does not race.
    let handles: Vec<_> = (0..2).map(|_| db::open_database(&path).unwrap()).collect();
    let workers: Vec<_> = handles
        .into_iter()
        .map(|mut conn| {
            thread::spawn(move || {
                let mut service = MaterialService::with_scheduler(&mut conn, scheduler);
                for _ in 0..REVIEWS_PER_HANDLE {
                    service.review(id, Utc::now()).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let stored = repository::load_category(&setup, id).unwrap();
    assert_eq!(views_by_id(&stored), vec![2 * REVIEWS_PER_HANDLE; 3]);
}

#[test]
fn review_waits_for_an_open_writer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("material.db");
    let scheduler = BatchScheduler::new(5, 1000, 3).unwrap();

    let mut first = db::open_database(&path).unwrap();
    let (merged, _) = MaterialService::with_scheduler(&mut first, scheduler)
        .sync(vec![words_with_views("shared", &[0, 0, 0])])
        .unwrap();
    let id = merged[0].id;

    let mut second = db::open_database(&path).unwrap();
    second
        .busy_timeout(std::time::Duration::from_millis(50))
        .unwrap();

    // While another handle holds the write lock, a review cannot read-then-write.
    let lock = first
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .unwrap();
    let blocked = MaterialService::with_scheduler(&mut second, scheduler).review(id, Utc::now());
    assert!(blocked.is_err());
    lock.rollback().unwrap();

    let stored = repository::load_category(&first, id).unwrap();
    assert_eq!(views_by_id(&stored), vec![0; 3]);

    MaterialService::with_scheduler(&mut second, scheduler)
        .review(id, Utc::now())
        .unwrap();
    let stored = repository::load_category(&first, id).unwrap();
    assert_eq!(views_by_id(&stored), vec![1; 3]);
}
