use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;

use crate::settings::TOKEN_LENGTH;

/// Source of short opaque tokens used where a real cluster emits node ids,
/// host names and build hashes.
pub trait TokenGenerator: Send + Sync {
    /// A fresh 8-character lowercase hexadecimal token
    fn new_token(&self) -> String;
}

/// Tokens drawn from the thread-local RNG.
///
/// 32 random bits per token; collisions inside a single response are
/// negligible for any realistic cluster size.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn new_token(&self) -> String {
        format!("{:0width$x}", rand::rng().random::<u32>(), width = TOKEN_LENGTH)
    }
}

/// Deterministic tokens `00000001`, `00000002`, ... for reproducible payloads.
#[derive(Debug, Default)]
pub struct SequentialTokenGenerator {
    next: AtomicU32,
}

impl SequentialTokenGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: u32) -> Self {
        Self {
            next: AtomicU32::new(start.wrapping_sub(1)),
        }
    }
}

impl TokenGenerator for SequentialTokenGenerator {
    fn new_token(&self) -> String {
        let value = self.next.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        format!("{:0width$x}", value, width = TOKEN_LENGTH)
    }
}

impl<G: TokenGenerator + ?Sized> TokenGenerator for &G {
    fn new_token(&self) -> String {
        (**self).new_token()
    }
}

/// Use the supplied value when it is non-empty, otherwise synthesize one.
pub fn resolve_token<G: TokenGenerator + ?Sized>(supplied: Option<&str>, generator: &G) -> String {
    match supplied {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => generator.new_token(),
    }
}
