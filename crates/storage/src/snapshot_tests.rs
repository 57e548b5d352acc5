use super::*;
use crate::migration::MigrationRegistry;
use tempfile::tempdir;

#[test]
fn write_then_load_round_trips_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.bin");
    let checkpointer = Checkpointer::new(&path);

    let mut state = MaterializedState::default();
    state
        .apply(&crate::state::StoreOp::CreateSession {
            id: pushpals_core::SessionId::from("dev".to_string()),
            at_epoch_ms: 1,
        })
        .unwrap();

    checkpointer.write(&state, 7).unwrap();

    let loaded = checkpointer
        .load(&MigrationRegistry::new())
        .unwrap()
        .unwrap();
    assert_eq!(loaded.seq, 7);
    assert_eq!(loaded.version, CURRENT_SNAPSHOT_VERSION);
    assert_eq!(loaded.state.sessions.len(), 1);
}

#[test]
fn missing_snapshot_file_loads_as_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.bin");
    let checkpointer = Checkpointer::new(&path);
    assert!(checkpointer.load(&MigrationRegistry::new()).unwrap().is_none());
}

#[test]
fn corrupted_checksum_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.bin");
    let checkpointer = Checkpointer::new(&path);
    checkpointer.write(&MaterializedState::default(), 1).unwrap();

    let mut bytes = std::fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    std::fs::write(&path, bytes).unwrap();

    let err = checkpointer.load(&MigrationRegistry::new());
    assert!(err.is_err());
}

#[test]
fn rewriting_rotates_previous_snapshot_to_bak() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.bin");
    let checkpointer = Checkpointer::new(&path);

    checkpointer.write(&MaterializedState::default(), 1).unwrap();
    checkpointer.write(&MaterializedState::default(), 2).unwrap();

    assert!(path.with_extension("bak").exists());
}
