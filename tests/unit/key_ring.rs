use crate::fixtures::*;
use keyunlock_core::domain::{KeyId, KeyRing, KeyUsage};
use keyunlock_core::foundation::ErrorCode;

#[test]
fn key_ring_exposes_master_and_positions() {
    let ring = KeyRingFixture::default().build();

    assert_eq!(ring.len(), 3);
    assert_eq!(ring.master_key_id(), TEST_MASTER_ID);
    assert!(ring.master().is_master());
    assert_eq!(ring.find(TEST_ENCRYPT_ID).map(|k| k.position()), Some(2));
    assert_eq!(ring.find(TEST_SIGN_ID).map(|k| k.usage()), Some(KeyUsage::Sign));
    assert!(ring.contains(TEST_SIGN_ID));
    assert!(!ring.contains(TEST_UNKNOWN_ID));
    assert_eq!(ring.key_ids().collect::<Vec<_>>(), all_ids().to_vec());
}

#[test]
fn key_ring_requires_passphrase_if_any_subkey_is_sealed() {
    assert!(KeyRingFixture::default().build().requires_passphrase());
    assert!(!KeyRingFixture::fully_unprotected().build().requires_passphrase());
    assert!(KeyRingFixture::fully_unprotected().encrypt(stub(TEST_PASSPHRASE)).build().requires_passphrase());
}

#[test]
fn key_ring_builder_rejects_sentinels_and_duplicates() {
    let err = KeyRing::builder(KeyId::Symmetric, unprotected(b"x")).build().unwrap_err();
    assert_eq!(err.code(), ErrorCode::MalformedKeyMaterial);

    let err = KeyRing::builder(TEST_MASTER_ID, unprotected(b"x"))
        .sub_key(TEST_MASTER_ID, KeyUsage::Sign, unprotected(b"y"))
        .build()
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::MalformedKeyMaterial);
}

#[test]
fn key_id_raw_mapping_reserves_sentinels() {
    assert_eq!(KeyId::from_raw(0), KeyId::None);
    assert_eq!(KeyId::from_raw(u64::MAX), KeyId::Symmetric);
    assert_eq!(KeyId::from(7u64).raw(), 7);
    assert!(!KeyId::None.is_cacheable());
    assert!(KeyId::Symmetric.is_cacheable());
}
