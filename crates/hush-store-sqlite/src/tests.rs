//! Integration tests for `SqliteStore` against an in-memory database.

use hush_core::{
  entity::{NewPoll, NewPost, PostOrder, VoteChoice},
  nickname,
  store::FeedStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn poll(question: &str, a: &str, b: &str) -> NewPoll {
  NewPoll {
    question: question.into(),
    option_a: a.into(),
    option_b: b.into(),
  }
}

// ─── Posts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_post_starts_with_zero_likes() {
  let s = store().await;

  let post = s.create_post(NewPost::new("Hello")).await.unwrap();
  assert_eq!(post.content, "Hello");
  assert_eq!(post.likes, 0);

  let fetched = s.get_post(post.id).await.unwrap().unwrap();
  assert_eq!(fetched, post);
}

#[tokio::test]
async fn post_ids_increase() {
  let s = store().await;
  let a = s.create_post(NewPost::new("a")).await.unwrap();
  let b = s.create_post(NewPost::new("b")).await.unwrap();
  s.delete_post(b.id).await.unwrap();
  let c = s.create_post(NewPost::new("c")).await.unwrap();

  assert!(a.id < b.id);
  assert!(b.id < c.id, "ids must not be reused after a delete");
}

#[tokio::test]
async fn create_post_rejects_blank_content() {
  let s = store().await;
  let err = s.create_post(NewPost::new("   ")).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(hush_core::Error::Empty { field: "content" })
  ));
  assert!(s.list_posts(PostOrder::Newest).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_post_keeps_supplied_username() {
  let s = store().await;
  let post = s
    .create_post(NewPost::new("hi").with_username("Silent_Mind"))
    .await
    .unwrap();
  assert_eq!(post.username, "Silent_Mind");
}

#[tokio::test]
async fn create_post_assigns_pool_nickname() {
  let s = store().await;
  let post = s
    .create_post(NewPost::new("hi").with_username(""))
    .await
    .unwrap();
  let (adj, noun) = post.username.split_once('_').unwrap();
  assert!(nickname::ADJECTIVES.contains(&adj));
  assert!(nickname::NOUNS.contains(&noun));
}

#[tokio::test]
async fn hello_world_scenario() {
  let s = store().await;
  let hello = s.create_post(NewPost::new("Hello")).await.unwrap();
  let world = s.create_post(NewPost::new("World")).await.unwrap();

  let contents: Vec<_> = s
    .list_posts(PostOrder::Newest)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.content)
    .collect();
  assert_eq!(contents, ["World", "Hello"]);

  assert!(s.increment_like(world.id).await.unwrap());
  assert!(s.increment_like(world.id).await.unwrap());

  assert_eq!(s.get_post(world.id).await.unwrap().unwrap().likes, 2);
  assert_eq!(s.get_post(hello.id).await.unwrap().unwrap().likes, 0);
}

#[tokio::test]
async fn increment_like_n_times() {
  let s = store().await;
  let post = s.create_post(NewPost::new("counted")).await.unwrap();
  for _ in 0..25 {
    s.increment_like(post.id).await.unwrap();
  }
  assert_eq!(s.get_post(post.id).await.unwrap().unwrap().likes, 25);
}

#[tokio::test]
async fn concurrent_likes_are_not_lost() {
  let s = store().await;
  let id = s.create_post(NewPost::new("busy")).await.unwrap().id;

  let mut handles = Vec::new();
  for _ in 0..40 {
    let s = s.clone();
    handles.push(tokio::spawn(async move { s.increment_like(id).await }));
  }
  for h in handles {
    assert!(h.await.unwrap().unwrap());
  }

  assert_eq!(s.get_post(id).await.unwrap().unwrap().likes, 40);
}

#[tokio::test]
async fn increment_like_missing_post_is_noop() {
  let s = store().await;
  assert!(!s.increment_like(9999).await.unwrap());
  assert!(s.get_post(9999).await.unwrap().is_none());
  assert!(s.list_posts(PostOrder::Newest).await.unwrap().is_empty());
}

#[tokio::test]
async fn shuffled_listing_is_a_permutation() {
  let s = store().await;
  for i in 0..10 {
    s.create_post(NewPost::new(format!("post {i}"))).await.unwrap();
  }

  let mut newest: Vec<_> = s
    .list_posts(PostOrder::Newest)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.id)
    .collect();
  let mut shuffled: Vec<_> = s
    .list_posts(PostOrder::Shuffled)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.id)
    .collect();

  newest.sort_unstable();
  shuffled.sort_unstable();
  assert_eq!(newest, shuffled);
}

#[tokio::test]
async fn search_matches_substring_newest_first() {
  let s = store().await;
  s.create_post(NewPost::new("rust is fun")).await.unwrap();
  s.create_post(NewPost::new("nothing here")).await.unwrap();
  s.create_post(NewPost::new("more Rust please")).await.unwrap();

  let hits: Vec<_> = s
    .search_posts("rust".into())
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.content)
    .collect();
  assert_eq!(hits, ["more Rust please", "rust is fun"]);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  s.create_post(NewPost::new("100% sure")).await.unwrap();
  s.create_post(NewPost::new("100 percent")).await.unwrap();

  let hits = s.search_posts("0%".into()).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].content, "100% sure");

  assert!(s.search_posts("_".into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn random_post_on_empty_and_populated() {
  let s = store().await;
  assert!(s.random_post().await.unwrap().is_none());

  let a = s.create_post(NewPost::new("a")).await.unwrap();
  let b = s.create_post(NewPost::new("b")).await.unwrap();
  for _ in 0..10 {
    let picked = s.random_post().await.unwrap().unwrap();
    assert!(picked.id == a.id || picked.id == b.id);
  }
}

// ─── Delete / comments ───────────────────────────────────────────────────────

#[tokio::test]
async fn delete_post_cascades_to_comments() {
  let s = store().await;
  let keep = s.create_post(NewPost::new("keep")).await.unwrap();
  let doomed = s.create_post(NewPost::new("doomed")).await.unwrap();
  s.add_comment(doomed.id, "first".into()).await.unwrap().unwrap();
  s.add_comment(doomed.id, "second".into()).await.unwrap().unwrap();
  s.add_comment(keep.id, "stays".into()).await.unwrap().unwrap();

  assert!(s.delete_post(doomed.id).await.unwrap());

  let ids: Vec<_> = s
    .list_posts(PostOrder::Newest)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.id)
    .collect();
  assert_eq!(ids, [keep.id]);
  assert!(s.list_comments(doomed.id).await.unwrap().is_empty());
  assert_eq!(s.list_comments(keep.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_post_is_idempotent() {
  let s = store().await;
  let post = s.create_post(NewPost::new("once")).await.unwrap();
  assert!(s.delete_post(post.id).await.unwrap());
  assert!(!s.delete_post(post.id).await.unwrap());
  assert!(!s.delete_post(12345).await.unwrap());
}

#[tokio::test]
async fn comments_list_oldest_first() {
  let s = store().await;
  let post = s.create_post(NewPost::new("thread")).await.unwrap();
  let first = s.add_comment(post.id, "first".into()).await.unwrap().unwrap();
  let second = s.add_comment(post.id, "second".into()).await.unwrap().unwrap();

  assert_eq!(first.post_id, post.id);
  let comments = s.list_comments(post.id).await.unwrap();
  assert_eq!(comments, [first, second]);
}

#[tokio::test]
async fn comment_on_missing_post_is_none() {
  let s = store().await;
  assert!(s.add_comment(42, "hello?".into()).await.unwrap().is_none());
  assert!(s.list_comments(42).await.unwrap().is_empty());
}

#[tokio::test]
async fn comment_after_delete_is_none() {
  let s = store().await;
  let post = s.create_post(NewPost::new("gone soon")).await.unwrap();
  assert!(s.delete_post(post.id).await.unwrap());
  assert!(s.add_comment(post.id, "too late".into()).await.unwrap().is_none());
  assert!(s.snapshot().await.unwrap().posts.is_empty());
}

#[tokio::test]
async fn comment_rejects_blank_content() {
  let s = store().await;
  let post = s.create_post(NewPost::new("thread")).await.unwrap();
  let err = s.add_comment(post.id, "".into()).await.unwrap_err();
  assert!(matches!(err, Error::Core(hush_core::Error::Empty { .. })));
}

// ─── Polls ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn votes_accumulate_independently_of_order() {
  let s = store().await;
  let p = s.add_poll(poll("Cats or dogs?", "Cats", "Dogs")).await.unwrap();
  assert_eq!((p.votes_a, p.votes_b), (0, 0));

  let sequence = [
    VoteChoice::B,
    VoteChoice::A,
    VoteChoice::B,
    VoteChoice::B,
    VoteChoice::A,
  ];
  for choice in sequence {
    assert!(s.cast_vote(p.id, choice).await.unwrap());
  }

  let p = s.get_poll(p.id).await.unwrap().unwrap();
  assert_eq!(p.votes_a, 2);
  assert_eq!(p.votes_b, 3);
  assert_eq!(p.total_votes(), 5);
}

#[tokio::test]
async fn vote_by_literal_option_text() {
  let s = store().await;
  let p = s.add_poll(poll("Tea?", "Yes", "No")).await.unwrap();
  let choice = p.choice_for("No").unwrap();
  s.cast_vote(p.id, choice).await.unwrap();

  let p = s.get_poll(p.id).await.unwrap().unwrap();
  assert_eq!((p.votes_a, p.votes_b), (0, 1));
}

#[tokio::test]
async fn vote_on_missing_poll_is_noop() {
  let s = store().await;
  assert!(!s.cast_vote(7, VoteChoice::A).await.unwrap());
  assert!(s.list_polls().await.unwrap().is_empty());
}

#[tokio::test]
async fn add_poll_validates_fields() {
  let s = store().await;
  assert!(matches!(
    s.add_poll(poll("", "a", "b")).await.unwrap_err(),
    Error::Core(hush_core::Error::Empty { field: "question" })
  ));
  assert!(matches!(
    s.add_poll(poll("q", "a", " ")).await.unwrap_err(),
    Error::Core(hush_core::Error::Empty { field: "option_b" })
  ));
  assert!(matches!(
    s.add_poll(poll("q", "same", "same")).await.unwrap_err(),
    Error::Core(hush_core::Error::DuplicateOptions)
  ));
}

#[tokio::test]
async fn polls_list_newest_first() {
  let s = store().await;
  let first = s.add_poll(poll("one?", "a", "b")).await.unwrap();
  let second = s.add_poll(poll("two?", "a", "b")).await.unwrap();
  let ids: Vec<_> = s.list_polls().await.unwrap().into_iter().map(|p| p.id).collect();
  assert_eq!(ids, [second.id, first.id]);
}

// ─── Confessions & mystery messages ──────────────────────────────────────────

#[tokio::test]
async fn confessions_list_newest_first() {
  let s = store().await;
  s.add_confession("I ate the last cookie".into()).await.unwrap();
  s.add_confession("I never read the docs".into()).await.unwrap();

  let contents: Vec<_> = s
    .list_confessions()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.content)
    .collect();
  assert_eq!(contents, ["I never read the docs", "I ate the last cookie"]);
}

#[tokio::test]
async fn random_confession_returns_inserted_row() {
  let s = store().await;
  assert!(s.random_confession().await.unwrap().is_none());
  let c = s.add_confession("only one".into()).await.unwrap();
  assert_eq!(s.random_confession().await.unwrap(), Some(c));
}

#[tokio::test]
async fn random_mystery_on_empty_table_is_none() {
  let s = store().await;
  assert!(s.get_random_mystery().await.unwrap().is_none());
}

#[tokio::test]
async fn random_mystery_returns_an_inserted_row() {
  let s = store().await;
  let mut inserted = Vec::new();
  for text in ["look up", "check the fridge", "it was you"] {
    inserted.push(s.add_mystery_message(text.into()).await.unwrap());
  }

  for _ in 0..20 {
    let m = s.get_random_mystery().await.unwrap().unwrap();
    assert!(inserted.contains(&m), "unexpected row {m:?}");
  }
}

#[tokio::test]
async fn mystery_rejects_blank_content() {
  let s = store().await;
  assert!(s.add_mystery_message("\n".into()).await.is_err());
  assert!(s.get_random_mystery().await.unwrap().is_none());
}

// ─── Questions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn question_starts_unanswered_then_answered() {
  let s = store().await;
  let q = s.add_question("Is anyone out there?".into()).await.unwrap();
  assert!(!q.is_answered());

  assert!(s.answer_question(q.id, "Yes.".into()).await.unwrap());
  let questions = s.list_questions().await.unwrap();
  assert_eq!(questions[0].answer.as_deref(), Some("Yes."));
}

#[tokio::test]
async fn answering_again_overwrites() {
  let s = store().await;
  let q = s.add_question("Best editor?".into()).await.unwrap();
  s.answer_question(q.id, "vim".into()).await.unwrap();
  s.answer_question(q.id, "emacs".into()).await.unwrap();

  let questions = s.list_questions().await.unwrap();
  assert_eq!(questions[0].answer.as_deref(), Some("emacs"));
}

#[tokio::test]
async fn answer_missing_question_is_noop() {
  let s = store().await;
  assert!(!s.answer_question(3, "nobody asked".into()).await.unwrap());
}

#[tokio::test]
async fn answer_rejects_blank_text() {
  let s = store().await;
  let q = s.add_question("?".into()).await.unwrap();
  assert!(s.answer_question(q.id, " ".into()).await.is_err());
  assert!(s.list_questions().await.unwrap()[0].answer.is_none());
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_reflects_every_table() {
  let s = store().await;
  let older = s.create_post(NewPost::new("older")).await.unwrap();
  let newer = s.create_post(NewPost::new("newer")).await.unwrap();
  s.add_comment(older.id, "reply".into()).await.unwrap().unwrap();
  s.add_poll(poll("q?", "a", "b")).await.unwrap();
  s.add_confession("secret".into()).await.unwrap();
  s.add_question("why?".into()).await.unwrap();
  s.add_mystery_message("hidden".into()).await.unwrap();

  let view = s.snapshot().await.unwrap();
  let ids: Vec<_> = view.posts.iter().map(|t| t.post.id).collect();
  assert_eq!(ids, [newer.id, older.id]);
  assert!(view.posts[0].comments.is_empty());
  assert_eq!(view.posts[1].comments.len(), 1);
  assert_eq!(view.posts[1].comments[0].content, "reply");
  assert_eq!(view.polls.len(), 1);
  assert_eq!(view.confessions.len(), 1);
  assert_eq!(view.questions.len(), 1);
}

#[tokio::test]
async fn snapshot_of_empty_store() {
  let s = store().await;
  let view = s.snapshot().await.unwrap();
  assert!(view.posts.is_empty());
  assert!(view.polls.is_empty());
  assert!(view.confessions.is_empty());
  assert!(view.questions.is_empty());
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn file_store_persists_across_reopen() {
  let dir = std::env::temp_dir().join(format!("hush-store-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("feed.db");
  let _ = std::fs::remove_file(&path);

  let s = SqliteStore::open(&path).await.unwrap();
  let post = s.create_post(NewPost::new("durable")).await.unwrap();
  s.increment_like(post.id).await.unwrap();
  s.close().await.unwrap();

  let s = SqliteStore::open(&path).await.unwrap();
  let reopened = s.get_post(post.id).await.unwrap().unwrap();
  assert_eq!(reopened.content, "durable");
  assert_eq!(reopened.likes, 1);
  s.close().await.unwrap();

  let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn equal_timestamps_order_by_id() {
  let dir = std::env::temp_dir().join(format!("hush-store-ties-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("feed.db");
  let _ = std::fs::remove_file(&path);

  let s = SqliteStore::open(&path).await.unwrap();
  let a = s.create_post(NewPost::new("a")).await.unwrap();
  let b = s.create_post(NewPost::new("b")).await.unwrap();
  let c = s.create_post(NewPost::new("c")).await.unwrap();
  let x = s.add_comment(a.id, "x".into()).await.unwrap().unwrap();
  let y = s.add_comment(a.id, "y".into()).await.unwrap().unwrap();
  s.close().await.unwrap();

  // Pin every row to the same instant.
  {
    let raw = rusqlite::Connection::open(&path).unwrap();
    let at = "2024-01-01T00:00:00.000000Z";
    raw.execute("UPDATE posts SET created_at = ?1", [at]).unwrap();
    raw.execute("UPDATE comments SET created_at = ?1", [at]).unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let ids: Vec<_> = s
    .list_posts(PostOrder::Newest)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.id)
    .collect();
  assert_eq!(ids, [c.id, b.id, a.id]);

  let comment_ids: Vec<_> = s
    .list_comments(a.id)
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.id)
    .collect();
  assert_eq!(comment_ids, [x.id, y.id]);

  let view = s.snapshot().await.unwrap();
  let ids: Vec<_> = view.posts.iter().map(|t| t.post.id).collect();
  assert_eq!(ids, [c.id, b.id, a.id]);
  let thread: Vec<_> = view.posts[2].comments.iter().map(|c| c.id).collect();
  assert_eq!(thread, [x.id, y.id]);
  s.close().await.unwrap();

  let _ = std::fs::remove_dir_all(&dir);
}
