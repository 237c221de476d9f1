mod key_ring;
mod passphrase_cache;
mod unlock_engine;
