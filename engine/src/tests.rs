//! Session-level tests: checkpoint flows against a real sandbox filesystem.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use waypoint_types::{EditStatus, EditToolKind, FileEdit, TurnId};

use crate::generation::GenerationControl;
use crate::{ChatSession, NoopGeneration, RealFs, SessionEvent, WorkspaceFs};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("waypoint_engine=debug")
        .with_test_writer()
        .try_init();
}

fn sandbox_session() -> (tempfile::TempDir, ChatSession) {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = ChatSession::new(Arc::new(RealFs), Arc::new(NoopGeneration));
    (dir, session)
}

/// Counts cancel signals so tests can assert restore stops generation.
#[derive(Debug, Default)]
struct CountingGeneration {
    cancels: AtomicUsize,
}

impl GenerationControl for CountingGeneration {
    fn cancel_active(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

/// Three turns editing three distinct files; returns (paths, turn ids).
fn seed_three_turns(
    session: &mut ChatSession,
    root: &std::path::Path,
) -> (Vec<PathBuf>, Vec<TurnId>) {
    let fs = RealFs;
    let a = root.join("a.txt");
    let b = root.join("b.txt");
    let c = root.join("c.txt");
    fs.write(&a, "a0").expect("seed a");
    fs.write(&b, "b0").expect("seed b");
    fs.write(&c, "c0").expect("seed c");

    let t1 = session.push_user_turn("edit a");
    session
        .apply_insert_or_replace(t1, &a, "a1")
        .expect("edit a");
    let t2 = session.push_assistant_turn("edit b");
    session
        .apply_insert_or_replace(t2, &b, "b1")
        .expect("edit b");
    let t3 = session.push_assistant_turn("edit c");
    session
        .apply_insert_or_replace(t3, &c, "c1")
        .expect("edit c");

    (vec![a, b, c], vec![t1, t2, t3])
}

#[test]
fn restore_reverts_everything_after_the_target() {
    let (dir, mut session) = sandbox_session();
    let (paths, turns) = seed_three_turns(&mut session, dir.path());
    let fs = RealFs;

    let report = session.restore_checkpoint(turns[0]).expect("known turn");
    assert!(report.is_clean());

    // A stays at its post-T1 content; B and C are back to baseline.
    assert_eq!(fs.read_to_string(&paths[0]).expect("a"), "a1");
    assert_eq!(fs.read_to_string(&paths[1]).expect("b"), "b0");
    assert_eq!(fs.read_to_string(&paths[2]).expect("c"), "c0");
    assert_eq!(session.pending_checkpoint(), Some(turns[0]));
}

#[test]
fn undo_checkpoint_reapplies_and_rebuilds_the_ledger() {
    let (dir, mut session) = sandbox_session();
    let (paths, turns) = seed_three_turns(&mut session, dir.path());
    let fs = RealFs;

    session.restore_checkpoint(turns[0]).expect("restore");
    let report = session.undo_checkpoint().expect("was restored");
    assert!(report.is_clean());

    assert_eq!(fs.read_to_string(&paths[1]).expect("b"), "b1");
    assert_eq!(fs.read_to_string(&paths[2]).expect("c"), "c1");
    assert_eq!(session.pending_checkpoint(), None);

    // The ledger reflects exactly the last suspended turn's edits (T3: c).
    let snapshot = session.ledger().snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].path(), paths[2].as_path());
    assert_eq!(snapshot[0].modified_content(), "c1");
}

#[test]
fn undo_checkpoint_without_restore_is_none() {
    let (_dir, mut session) = sandbox_session();
    assert!(session.undo_checkpoint().is_none());
}

#[test]
fn first_seen_wins_across_overlapping_edits() {
    let (dir, mut session) = sandbox_session();
    let fs = RealFs;
    let a = dir.path().join("a.txt");
    fs.write(&a, "base").expect("seed");

    let t1 = session.push_user_turn("anchor");
    let t2 = session.push_assistant_turn("first edit");
    session
        .apply_insert_or_replace(t2, &a, "after-t2")
        .expect("t2 edit");
    let t3 = session.push_assistant_turn("second edit");
    session
        .apply_insert_or_replace(t3, &a, "after-t3")
        .expect("t3 edit");

    // Revert to before T2: the earliest snapshot's baseline wins.
    session.restore_checkpoint(t1).expect("restore");
    assert_eq!(fs.read_to_string(&a).expect("a"), "base");

    // Redo: the latest snapshot's modification wins.
    session.undo_checkpoint().expect("undo");
    assert_eq!(fs.read_to_string(&a).expect("a"), "after-t3");
}

#[test]
fn restore_reentry_is_idempotent() {
    let (dir, mut session) = sandbox_session();
    let (paths, turns) = seed_three_turns(&mut session, dir.path());
    let fs = RealFs;

    session.restore_checkpoint(turns[0]).expect("first");
    let second = session.restore_checkpoint(turns[0]).expect("second");
    assert!(second.is_clean());
    assert_eq!(fs.read_to_string(&paths[1]).expect("b"), "b0");
    assert_eq!(session.pending_checkpoint(), Some(turns[0]));
}

#[test]
fn restore_unknown_turn_is_none() {
    let (_dir, mut session) = sandbox_session();
    assert!(session.restore_checkpoint(TurnId::new(42)).is_none());
}

#[test]
fn restore_reverts_created_files_by_deleting_them() {
    let (dir, mut session) = sandbox_session();
    let fs = RealFs;
    let fresh = dir.path().join("fresh.txt");

    let t1 = session.push_user_turn("anchor");
    let t2 = session.push_assistant_turn("create");
    session
        .apply_create_file(t2, &fresh, "brand new")
        .expect("create");
    assert!(fs.exists(&fresh));

    session.restore_checkpoint(t1).expect("restore");
    assert!(!fs.exists(&fresh));

    session.undo_checkpoint().expect("undo");
    assert_eq!(fs.read_to_string(&fresh).expect("read"), "brand new");
}

#[test]
fn restore_rebuilds_ledger_from_the_target_turn() {
    let (dir, mut session) = sandbox_session();
    let (paths, turns) = seed_three_turns(&mut session, dir.path());

    session.restore_checkpoint(turns[0]).expect("restore");

    // Only T1's own edit remains in the working set.
    let snapshot = session.ledger().snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].path(), paths[0].as_path());
}

#[test]
fn restore_cancels_active_generation() {
    init_tracing();
    let generation = Arc::new(CountingGeneration::default());
    let mut session =
        ChatSession::new(Arc::new(RealFs), Arc::clone(&generation) as Arc<dyn GenerationControl>);

    let t1 = session.push_user_turn("anchor");
    session.push_assistant_turn("wip");

    session.restore_checkpoint(t1).expect("restore");
    assert_eq!(generation.cancels.load(Ordering::SeqCst), 1);
}

#[test]
fn draft_round_trips_through_restore_and_undo() {
    let (dir, mut session) = sandbox_session();
    let fs = RealFs;
    let a = dir.path().join("a.txt");
    fs.write(&a, "base").expect("seed");

    let t1 = session.push_user_turn("anchor");
    let t2 = session.push_user_turn("please edit a");
    session
        .apply_insert_or_replace(t2, &a, "edited")
        .expect("edit");

    session.set_draft("half-typed message");
    session.restore_checkpoint(t1).expect("restore");

    // The first suspended user message is offered for re-editing.
    assert_eq!(session.draft(), "please edit a");

    session.undo_checkpoint().expect("undo");
    assert_eq!(session.draft(), "half-typed message");
}

#[test]
fn discard_checkpoint_truncates_history_without_touching_disk() {
    let (dir, mut session) = sandbox_session();
    let (paths, turns) = seed_three_turns(&mut session, dir.path());
    let fs = RealFs;

    session.restore_checkpoint(turns[0]).expect("restore");
    let removed = session.discard_checkpoint();

    assert_eq!(removed, 2);
    assert_eq!(session.store().len(), 1);
    assert_eq!(session.pending_checkpoint(), None);
    // Disk still shows the reverted state; discard never writes.
    assert_eq!(fs.read_to_string(&paths[1]).expect("b"), "b0");
}

#[test]
fn new_user_turn_commits_a_pending_checkpoint() {
    let (dir, mut session) = sandbox_session();
    let (_paths, turns) = seed_three_turns(&mut session, dir.path());

    session.restore_checkpoint(turns[0]).expect("restore");
    session.push_user_turn("moving on");

    assert_eq!(session.pending_checkpoint(), None);
    // T2 and T3 are gone; the anchor and the new turn remain.
    assert_eq!(session.store().len(), 2);
}

#[test]
fn session_edits_merge_in_the_ledger_but_snapshot_per_turn() {
    let (dir, mut session) = sandbox_session();
    let fs = RealFs;
    let a = dir.path().join("a.txt");
    fs.write(&a, "base").expect("seed");

    let t1 = session.push_user_turn("edit twice");
    session
        .apply_insert_or_replace(t1, &a, "v1")
        .expect("first");
    session
        .apply_insert_or_replace(t1, &a, "v2")
        .expect("second");

    // Ledger: one merged record holding the session baseline.
    let entry = session.ledger().get(&a).expect("entry");
    assert_eq!(entry.original_content(), "base");
    assert_eq!(entry.modified_content(), "v2");

    // Turn: two immutable snapshots, each with its own pre-edit content.
    let snapshots = session.store().get(t1).expect("turn").file_edits();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].original_content(), "base");
    assert_eq!(snapshots[1].original_content(), "v1");
}

#[test]
fn undo_edit_updates_disk_and_status() {
    let (dir, mut session) = sandbox_session();
    let fs = RealFs;
    let b = dir.path().join("b.txt");
    fs.write(&b, "foo").expect("seed");

    let t1 = session.push_user_turn("edit b");
    session
        .apply_insert_or_replace(t1, &b, "bar")
        .expect("edit");

    session.undo_edit(&b).expect("undo");
    assert_eq!(fs.read_to_string(&b).expect("read"), "foo");
    assert_eq!(
        session.ledger().get(&b).expect("entry").status(),
        EditStatus::Undone
    );
}

#[test]
fn create_file_conflict_leaves_ledger_unaffected() {
    let (dir, mut session) = sandbox_session();
    let fs = RealFs;
    let taken = dir.path().join("taken.txt");
    fs.write(&taken, "occupied").expect("seed");

    let t1 = session.push_user_turn("create");
    let err = session.apply_create_file(t1, &taken, "new");
    assert!(err.is_err());
    assert!(session.ledger().is_empty());
    assert_eq!(fs.read_to_string(&taken).expect("read"), "occupied");
}

#[test]
fn record_edit_tracks_bookkeeping_only_kinds() {
    let (_dir, mut session) = sandbox_session();

    let t1 = session.push_user_turn("external tool ran");
    session.record_edit(
        t1,
        FileEdit::new("/elsewhere.txt", "before", "after", EditToolKind::Other),
    );

    assert_eq!(session.ledger().len(), 1);
    assert_eq!(
        session.store().get(t1).expect("turn").file_edits().len(),
        1
    );
}

#[test]
fn observers_see_ledger_and_checkpoint_events() {
    let (dir, mut session) = sandbox_session();
    let fs = RealFs;
    let a = dir.path().join("a.txt");
    fs.write(&a, "base").expect("seed");

    let mut rx = session.subscribe();

    let t1 = session.push_user_turn("edit");
    session
        .apply_insert_or_replace(t1, &a, "new")
        .expect("edit");

    match rx.try_recv().expect("ledger event") {
        SessionEvent::LedgerChanged(snapshot) => {
            assert_eq!(snapshot.len(), 1);
            assert_eq!(snapshot[0].path(), a.as_path());
        }
        other => panic!("expected LedgerChanged, got {other:?}"),
    }

    session.restore_checkpoint(t1).expect("restore");

    // Restore emits a ledger rebuild followed by the cursor move.
    let mut saw_checkpoint = None;
    while let Ok(event) = rx.try_recv() {
        if let SessionEvent::CheckpointChanged(target) = event {
            saw_checkpoint = Some(target);
        }
    }
    assert_eq!(saw_checkpoint, Some(Some(t1)));
}
