//! Integration tests for playlists vertical slice
//!
//! Tests playlist operations including:
//! - CRUD with user ownership
//! - Ownership isolation (foreign playlists look missing)
//! - Append/remove ordering and position compaction
//! - Concurrent membership edits
//! - Hydrated detail and stats

mod test_helpers;

use cadence_core::types::*;
use cadence_storage::{playlists, StorageError};
use test_helpers::*;

#[tokio::test]
async fn test_create_and_get_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;

    let playlist = playlists::create(
        pool,
        &alice.id,
        CreatePlaylist {
            name: "Road Trip".to_string(),
            description: Some("Long drives".to_string()),
        },
    )
    .await
    .expect("Failed to create playlist");

    assert_eq!(playlist.owner_id, alice.id);
    assert!(playlist.song_ids.is_empty());

    let retrieved = playlists::get_by_id(pool, &playlist.id, &alice.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(retrieved.name, "Road Trip");
    assert_eq!(retrieved.description.as_deref(), Some("Long drives"));
    assert!(retrieved.song_ids.is_empty());
}

#[tokio::test]
async fn test_ownership_isolation() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let bob = create_test_user(pool, "bob").await;
    let song = create_test_song(pool, "track").await;
    let playlist = create_test_playlist(pool, &alice.id, "Private").await;

    assert!(playlists::get_by_id(pool, &playlist.id, &bob.id)
        .await
        .unwrap()
        .is_none());
    assert!(playlists::get_detail(pool, &playlist.id, &bob.id)
        .await
        .unwrap()
        .is_none());

    let update = UpdatePlaylist {
        name: Some("Hijacked".to_string()),
        description: None,
    };
    assert!(playlists::update(pool, &playlist.id, &bob.id, update)
        .await
        .unwrap()
        .is_none());

    assert!(playlists::add_song(pool, &playlist.id, &bob.id, &song.id)
        .await
        .unwrap()
        .is_none());
    assert!(playlists::remove_song(pool, &playlist.id, &bob.id, &song.id)
        .await
        .unwrap()
        .is_none());
    assert!(playlists::stats(pool, &playlist.id, &bob.id)
        .await
        .unwrap()
        .is_none());
    assert!(!playlists::delete(pool, &playlist.id, &bob.id).await.unwrap());

    // Untouched for the owner
    let still_there = playlists::get_by_id(pool, &playlist.id, &alice.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still_there.name, "Private");
    assert!(still_there.song_ids.is_empty());

    let bobs = playlists::list(pool, &bob.id, PageRequest::default(), None)
        .await
        .unwrap();
    assert_eq!(bobs.pagination.total, 0);
}

#[tokio::test]
async fn test_update_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let playlist = playlists::create(
        pool,
        &alice.id,
        CreatePlaylist {
            name: "Before".to_string(),
            description: Some("keep me".to_string()),
        },
    )
    .await
    .unwrap();

    let renamed = playlists::update(
        pool,
        &playlist.id,
        &alice.id,
        UpdatePlaylist {
            name: Some("After".to_string()),
            description: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.name, "After");
    assert_eq!(renamed.description.as_deref(), Some("keep me"));
    assert!(renamed.updated_at >= playlist.updated_at);

    let cleared = playlists::update(
        pool,
        &playlist.id,
        &alice.id,
        UpdatePlaylist {
            name: None,
            description: Some(String::new()),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.name, "After");
    assert!(cleared.description.is_none());
}

#[tokio::test]
async fn test_delete_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let song = create_test_song(pool, "track").await;
    let playlist = create_test_playlist(pool, &alice.id, "Doomed").await;
    playlists::add_song(pool, &playlist.id, &alice.id, &song.id)
        .await
        .unwrap();

    assert!(playlists::delete(pool, &playlist.id, &alice.id).await.unwrap());
    assert!(!playlists::delete(pool, &playlist.id, &alice.id).await.unwrap());
    assert!(playlists::get_by_id(pool, &playlist.id, &alice.id)
        .await
        .unwrap()
        .is_none());

    let memberships: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlist_songs")
        .fetch_one(pool)
        .await
        .unwrap();
    assert_eq!(memberships, 0);
}

#[tokio::test]
async fn test_create_for_deleted_owner_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let ghost = create_test_user(pool, "ghost").await;
    assert!(cadence_storage::users::delete(pool, &ghost.id).await.unwrap());

    let result = playlists::create(
        pool,
        &ghost.id,
        CreatePlaylist {
            name: "Orphan".to_string(),
            description: None,
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(StorageError::NotFound { ref entity, .. }) if entity == "User"
    ));
}

#[tokio::test]
async fn test_add_song_appends_in_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let a = create_test_song(pool, "a").await;
    let b = create_test_song(pool, "b").await;
    let playlist = create_test_playlist(pool, &alice.id, "Mix").await;

    playlists::add_song(pool, &playlist.id, &alice.id, &a.id)
        .await
        .unwrap()
        .unwrap();
    let after = playlists::add_song(pool, &playlist.id, &alice.id, &b.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(after.song_ids, vec![a.id, b.id]);
}

#[tokio::test]
async fn test_add_duplicate_song_conflicts() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let song = create_test_song(pool, "track").await;
    let playlist = create_test_playlist(pool, &alice.id, "Mix").await;

    playlists::add_song(pool, &playlist.id, &alice.id, &song.id)
        .await
        .unwrap();
    let second = playlists::add_song(pool, &playlist.id, &alice.id, &song.id).await;

    match second {
        Err(StorageError::Conflict(msg)) => assert_eq!(msg, "Song already exists in playlist"),
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(stored_song_ids(pool, &playlist).await, vec![song.id]);
}

#[tokio::test]
async fn test_add_missing_song_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let song = create_test_song(pool, "track").await;
    let playlist = create_test_playlist(pool, &alice.id, "Mix").await;
    playlists::add_song(pool, &playlist.id, &alice.id, &song.id)
        .await
        .unwrap();

    let result =
        playlists::add_song(pool, &playlist.id, &alice.id, &SongId::new("no-such-song")).await;

    assert!(matches!(result, Err(StorageError::NotFound { .. })));
    assert_eq!(stored_song_ids(pool, &playlist).await, vec![song.id]);
}

#[tokio::test]
async fn test_remove_song_twice_is_noop() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let a = create_test_song(pool, "a").await;
    let b = create_test_song(pool, "b").await;
    let c = create_test_song(pool, "c").await;
    let playlist = create_test_playlist(pool, &alice.id, "Mix").await;
    for song in [&a, &b, &c] {
        playlists::add_song(pool, &playlist.id, &alice.id, &song.id)
            .await
            .unwrap();
    }

    let first = playlists::remove_song(pool, &playlist.id, &alice.id, &b.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.song_ids, vec![a.id.clone(), c.id.clone()]);

    let second = playlists::remove_song(pool, &playlist.id, &alice.id, &b.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.song_ids, first.song_ids);
}

#[tokio::test]
async fn test_readded_song_goes_to_end() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let a = create_test_song(pool, "a").await;
    let b = create_test_song(pool, "b").await;
    let c = create_test_song(pool, "c").await;
    let playlist = create_test_playlist(pool, &alice.id, "Mix").await;
    for song in [&a, &b, &c] {
        playlists::add_song(pool, &playlist.id, &alice.id, &song.id)
            .await
            .unwrap();
    }

    playlists::remove_song(pool, &playlist.id, &alice.id, &a.id)
        .await
        .unwrap();
    let readded = playlists::add_song(pool, &playlist.id, &alice.id, &a.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(readded.song_ids, vec![b.id, c.id, a.id]);
}

#[tokio::test]
async fn test_concurrent_adds_keep_every_song() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool().clone();

    let alice = create_test_user(&pool, "alice").await;
    let playlist = create_test_playlist(&pool, &alice.id, "Party").await;

    let mut expected = Vec::new();
    for i in 0..10 {
        expected.push(create_test_song(&pool, &format!("song{i}")).await.id);
    }

    let mut handles = Vec::new();
    for song_id in expected.clone() {
        let pool = pool.clone();
        let playlist_id = playlist.id.clone();
        let owner = alice.id.clone();
        handles.push(tokio::spawn(async move {
            playlists::add_song(&pool, &playlist_id, &owner, &song_id).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut stored = stored_song_ids(&pool, &playlist).await;
    assert_eq!(stored.len(), 10);
    stored.sort();
    expected.sort();
    assert_eq!(stored, expected);

    let positions: Vec<i64> = sqlx::query_scalar(
        "SELECT position FROM playlist_songs WHERE playlist_id = ? ORDER BY position",
    )
    .bind(&playlist.id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(positions, (0..10).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_list_paginates_newest_first() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    for i in 0..25 {
        create_test_playlist(pool, &alice.id, &format!("Playlist {i:02}")).await;
    }

    let first = playlists::list(pool, &alice.id, PageRequest::new(Some(1), Some(20), 100), None)
        .await
        .unwrap();
    assert_eq!(first.items.len(), 20);
    assert_eq!(first.pagination.total, 25);
    assert_eq!(first.pagination.total_pages, 2);
    assert_eq!(first.items[0].name, "Playlist 24");

    let second = playlists::list(pool, &alice.id, PageRequest::new(Some(2), Some(20), 100), None)
        .await
        .unwrap();
    assert_eq!(second.items.len(), 5);
    assert_eq!(second.items[4].name, "Playlist 00");
}

#[tokio::test]
async fn test_list_search_and_song_ids() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let song = create_test_song(pool, "track").await;
    let gym = create_test_playlist(pool, &alice.id, "Gym Bangers").await;
    create_test_playlist(pool, &alice.id, "Sleep").await;
    playlists::create(
        pool,
        &alice.id,
        CreatePlaylist {
            name: "Morning".to_string(),
            description: Some("before the GYM".to_string()),
        },
    )
    .await
    .unwrap();
    playlists::add_song(pool, &gym.id, &alice.id, &song.id)
        .await
        .unwrap();

    let hits = playlists::list(pool, &alice.id, PageRequest::default(), Some("gym"))
        .await
        .unwrap();
    assert_eq!(hits.pagination.total, 2);

    // The add bumped Gym Bangers to the top
    assert_eq!(hits.items[0].id, gym.id);
    assert_eq!(hits.items[0].song_ids, vec![song.id]);
    assert!(hits.items[1].song_ids.is_empty());
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let summer = create_test_playlist(pool, &alice.id, "Été Hits").await;
    create_test_playlist(pool, &alice.id, "Winter").await;

    for query in ["Été", "été", "ÉTÉ", "hits"] {
        let hits = playlists::list(pool, &alice.id, PageRequest::default(), Some(query))
            .await
            .unwrap();
        assert_eq!(hits.pagination.total, 1, "query {query:?}");
        assert_eq!(hits.items[0].id, summer.id);
    }

    // Renaming refreshes what search sees
    playlists::update(
        pool,
        &summer.id,
        &alice.id,
        UpdatePlaylist {
            name: Some("Œuvres".to_string()),
            description: Some("Ζεστό καλοκαίρι".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();

    let stale = playlists::list(pool, &alice.id, PageRequest::default(), Some("été"))
        .await
        .unwrap();
    assert_eq!(stale.pagination.total, 0);

    for query in ["œuvres", "ŒUVRES", "ΖΕΣΤΌ"] {
        let hits = playlists::list(pool, &alice.id, PageRequest::default(), Some(query))
            .await
            .unwrap();
        assert_eq!(hits.pagination.total, 1, "query {query:?}");
    }
}

#[tokio::test]
async fn test_detail_and_stats() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let playlist = create_test_playlist(pool, &alice.id, "Long").await;

    let (short, _) = cadence_storage::songs::create_if_absent(pool, new_song("short", 200_000))
        .await
        .unwrap();
    let (long, _) = cadence_storage::songs::create_if_absent(pool, new_song("long", 3_500_000))
        .await
        .unwrap();
    for song in [&short, &long] {
        playlists::add_song(pool, &playlist.id, &alice.id, &song.id)
            .await
            .unwrap();
    }

    let detail = playlists::get_detail(pool, &playlist.id, &alice.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.owner.username, "alice");
    assert_eq!(
        detail.songs.iter().map(|s| s.id.clone()).collect::<Vec<_>>(),
        vec![short.id, long.id]
    );

    let stats = playlists::stats(pool, &playlist.id, &alice.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stats.song_count, 2);
    assert_eq!(stats.total_duration_ms, 3_700_000);
    assert_eq!(stats.total_duration_formatted, "1h 1m");
}
