#![allow(dead_code)]

use keyunlock_core::domain::KeyId;
use keyunlock_core::infrastructure::keys::Argon2Params;

pub const TEST_PASSPHRASE: &str = "correct horse battery staple";
pub const TEST_WRONG_PASSPHRASE: &str = "incorrect horse";

pub const TEST_MASTER_ID: KeyId = KeyId::Key(0x1111_2222_3333_4444);
pub const TEST_SIGN_ID: KeyId = KeyId::Key(0x1111_2222_3333_5555);
pub const TEST_ENCRYPT_ID: KeyId = KeyId::Key(0x1111_2222_3333_6666);
pub const TEST_UNKNOWN_ID: KeyId = KeyId::Key(0xdead_beef);

pub const TEST_MASTER_SECRET: &[u8] = b"master-private-key-material";
pub const TEST_SIGN_SECRET: &[u8] = b"signing-subkey-private-material";
pub const TEST_ENCRYPT_SECRET: &[u8] = b"encryption-subkey-private-material";

/// Cheap Argon2 parameters so sealing stays fast in tests.
pub const TEST_KDF: Argon2Params = Argon2Params { m_cost: 8, t_cost: 1, p_cost: 1 };
