use crate::fixtures::*;
use keyunlock_core::domain::{Passphrase, Protection, UnlockAttemptResult, UnlockEngine};
use keyunlock_core::foundation::ErrorCode;
use keyunlock_core::infrastructure::keys::InMemoryKeyMaterialProvider;
use std::sync::Arc;

fn engine() -> UnlockEngine {
    UnlockEngine::new(Arc::new(InMemoryKeyMaterialProvider::new()))
}

#[test]
fn unlock_engine_when_master_opens_then_unlocks_position_zero_in_one_attempt() {
    let ring = KeyRingFixture::default().build();
    let run = engine().run(&ring, &Passphrase::from(TEST_PASSPHRASE)).expect("run");

    assert_eq!(run.attempts, 1);
    let UnlockAttemptResult::Unlocked(unlocked) = run.result else {
        panic!("expected unlocked result");
    };
    assert_eq!(unlocked.sub_key.position, 0);
    assert_eq!(unlocked.sub_key.key_id, TEST_MASTER_ID);
    assert_eq!(unlocked.key.expose_secret(), TEST_MASTER_SECRET);
}

#[test]
fn unlock_engine_when_master_is_stub_then_falls_through_to_position_one() {
    let ring = KeyRingFixture::offline_master().build();
    let run = engine().run(&ring, &Passphrase::from(TEST_PASSPHRASE)).expect("run");

    assert_eq!(run.attempts, 2);
    let UnlockAttemptResult::Unlocked(unlocked) = run.result else {
        panic!("expected unlocked result");
    };
    assert_eq!(unlocked.sub_key.key_id, TEST_SIGN_ID);
    assert_eq!(unlocked.key.expose_secret(), TEST_SIGN_SECRET);
}

#[test]
fn unlock_engine_when_passphrase_wrong_then_stops_after_master() {
    let ring = KeyRingFixture::default().build();
    let run = engine().run(&ring, &Passphrase::from(TEST_WRONG_PASSPHRASE)).expect("run");

    assert!(matches!(run.result, UnlockAttemptResult::WrongPassphrase));
    assert_eq!(run.attempts, 1);
}

#[test]
fn unlock_engine_when_only_subkey_passphrase_given_then_master_rejects_it() {
    let ring = KeyRingFixture::default().sign(sealed(TEST_SIGN_SECRET, "subkey-only")).build();
    let run = engine().run(&ring, &Passphrase::from("subkey-only")).expect("run");

    assert!(matches!(run.result, UnlockAttemptResult::WrongPassphrase));
    assert_eq!(run.attempts, 1);
}

#[test]
fn unlock_engine_when_master_and_first_subkey_are_stubs_then_no_usable_key() {
    let ring = KeyRingFixture::offline_master().sign(stub(TEST_PASSPHRASE)).build();
    let run = engine().run(&ring, &Passphrase::from(TEST_PASSPHRASE)).expect("run");

    assert!(matches!(run.result, UnlockAttemptResult::NoUsableKey));
    assert_eq!(run.attempts, 2);
}

#[test]
fn unlock_engine_never_exceeds_ring_length() {
    let ring = KeyRingFixture::offline_master().build();
    for passphrase in [TEST_PASSPHRASE, TEST_WRONG_PASSPHRASE, ""] {
        let run = engine().run(&ring, &Passphrase::from(passphrase)).expect("run");
        assert!(run.attempts <= ring.len());
    }
}

#[test]
fn unlock_engine_when_material_unprotected_then_any_passphrase_unlocks() {
    let ring = KeyRingFixture::fully_unprotected().build();
    let result = engine().try_unlock(&ring, &Passphrase::from("whatever")).expect("unlock");
    assert!(result.is_unlocked());
}

#[test]
fn unlock_engine_when_blob_corrupt_then_reports_malformed_material() {
    let ring = KeyRingFixture::default().master(Protection::Passphrase { sealed: b"not a blob".to_vec() }).build();
    let err = engine().try_unlock(&ring, &Passphrase::from(TEST_PASSPHRASE)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MalformedKeyMaterial);
}
