//! In-process fakes for service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{NewVote, PostId, UserId, Vote, VoteId, VoteValue};
use crate::error::RepoError;
use crate::ports::{
    Cache, CacheError, MessageHandler, PubSub, PubSubError, VoteRepository,
};

/// Vote store that does not enforce the unique pair, so tests can seed duplicates.
#[derive(Default)]
pub struct FakeVoteRepository {
    rows: Mutex<Vec<Vote>>,
    next_id: AtomicUsize,
    writes: AtomicUsize,
    lists: AtomicUsize,
    failure: Mutex<Option<String>>,
}

impl FakeVoteRepository {
    pub fn seed(&self, vote: NewVote) -> Vote {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as VoteId + 1;
        let vote = vote.with_id(id);
        self.rows.lock().unwrap().push(vote.clone());
        vote
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn write_calls(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), RepoError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(RepoError::Query(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl VoteRepository for FakeVoteRepository {
    async fn find_for_user(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<Vec<Vote>, RepoError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.post_id == post_id && v.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Vote>, RepoError> {
        self.check()?;
        self.lists.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, vote: NewVote) -> Result<Vote, RepoError> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(self.seed(vote))
    }

    async fn update_value(&self, id: VoteId, value: VoteValue) -> Result<(), RepoError> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|v| v.id == id).ok_or(RepoError::NotFound)?;
        row.value = value;
        Ok(())
    }

    async fn delete(&self, id: VoteId) -> Result<(), RepoError> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|v| v.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// Cache without expiry.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }
}

/// Pub/sub that records published messages and never delivers them.
#[derive(Default)]
pub struct RecordingPubSub {
    published: Mutex<Vec<(String, String)>>,
}

impl RecordingPubSub {
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl PubSub for RecordingPubSub {
    async fn publish(&self, channel: &str, message: &str) -> Result<(), PubSubError> {
        self.published
            .lock()
            .unwrap()
            .push((channel.to_string(), message.to_string()));
        Ok(())
    }

    async fn subscribe(&self, _channel: &str, _handler: MessageHandler) -> Result<(), PubSubError> {
        Ok(())
    }

    async fn unsubscribe(&self, _channel: &str) -> Result<(), PubSubError> {
        Ok(())
    }
}

/// Cache whose writes and deletes always fail; reads miss.
#[derive(Default)]
pub struct FailingCache;

#[async_trait]
impl Cache for FailingCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> Result<(), CacheError> {
        Err(CacheError::Connection("cache offline".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Connection("cache offline".to_string()))
    }

    async fn exists(&self, _key: &str) -> bool {
        false
    }
}

/// Pub/sub whose every call fails.
#[derive(Default)]
pub struct FailingPubSub;

#[async_trait]
impl PubSub for FailingPubSub {
    async fn publish(&self, _channel: &str, _message: &str) -> Result<(), PubSubError> {
        Err(PubSubError::Connection("broker offline".to_string()))
    }

    async fn subscribe(&self, _channel: &str, _handler: MessageHandler) -> Result<(), PubSubError> {
        Err(PubSubError::Connection("broker offline".to_string()))
    }

    async fn unsubscribe(&self, _channel: &str) -> Result<(), PubSubError> {
        Err(PubSubError::Connection("broker offline".to_string()))
    }
}
