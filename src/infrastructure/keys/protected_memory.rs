//! Passphrase storage with best-effort mlock, zeroized on drop.

use crate::domain::Passphrase;
use secrecy::{ExposeSecret, SecretVec};
use std::fmt;

pub struct ProtectedSecret {
    inner: SecretVec<u8>,
    #[cfg(target_family = "unix")]
    mlocked: bool,
}

impl ProtectedSecret {
    pub fn new(data: Vec<u8>) -> Self {
        let inner = SecretVec::new(data);
        #[cfg(target_family = "unix")]
        let mlocked = Self::try_mlock(&inner);
        Self {
            inner,
            #[cfg(target_family = "unix")]
            mlocked,
        }
    }

    pub fn from_passphrase(passphrase: &Passphrase) -> Self {
        Self::new(passphrase.expose_secret().as_bytes().to_vec())
    }

    /// Copy the stored bytes back out as a passphrase.
    pub fn to_passphrase(&self) -> Passphrase {
        Passphrase::new(String::from_utf8_lossy(self.inner.expose_secret()).into_owned())
    }

    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(target_family = "unix")]
    pub fn is_mlocked(&self) -> bool {
        self.mlocked
    }

    #[cfg(not(target_family = "unix"))]
    pub fn is_mlocked(&self) -> bool {
        false
    }

    #[cfg(target_family = "unix")]
    fn try_mlock(secret: &SecretVec<u8>) -> bool {
        let slice = secret.expose_secret();
        if slice.is_empty() {
            return false;
        }
        let result = unsafe { libc::mlock(slice.as_ptr() as *const libc::c_void, slice.len()) };
        if result != 0 {
            log::debug!("mlock of cached secret failed (may require elevated privileges)");
            false
        } else {
            true
        }
    }
}

impl Drop for ProtectedSecret {
    fn drop(&mut self) {
        // The SecretVec zeroizes itself when dropped right after this.
        #[cfg(target_family = "unix")]
        if self.mlocked {
            let slice = self.inner.expose_secret();
            unsafe {
                libc::munlock(slice.as_ptr() as *const libc::c_void, slice.len());
            }
        }
    }
}

impl fmt::Debug for ProtectedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtectedSecret").field("len", &self.len()).field("mlocked", &self.is_mlocked()).finish()
    }
}
