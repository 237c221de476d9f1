//! Panic-safe cleanup of intermediate secret buffers.

use zeroize::Zeroize;

/// Zeroizes the wrapped buffer on drop unless ownership is taken out first.
pub struct SecretPanicGuard<T: Zeroize + Default> {
    secret: T,
}

impl<T: Zeroize + Default> SecretPanicGuard<T> {
    pub fn new(secret: T) -> Self {
        Self { secret }
    }

    pub fn get(&self) -> &T {
        &self.secret
    }

    /// Move the secret out; the guard is left holding an empty value.
    pub fn take(mut self) -> T {
        std::mem::take(&mut self.secret)
    }
}

impl<T: Zeroize + Default> Drop for SecretPanicGuard<T> {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}
