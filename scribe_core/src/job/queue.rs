use std::collections::VecDeque;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tokio::sync::Mutex;

use crate::error::ScribeResult;

/// FIFO of job ids waiting for a worker.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn push(&self, job_id: &str) -> ScribeResult<()>;

    async fn pop(&self) -> ScribeResult<Option<String>>;

    async fn len(&self) -> ScribeResult<usize>;

    async fn ping(&self) -> ScribeResult<()>;
}

/// Redis list, LPUSH on submit and RPOP in the workers.
#[derive(Clone)]
pub struct RedisQueue {
    connection: MultiplexedConnection,
    name: String,
}

impl RedisQueue {
    pub async fn connect(redis_url: &str, name: &str) -> ScribeResult<Self> {
        let client = Client::open(redis_url)?;
        let connection = client.get_multiplexed_async_connection().await?;

        log::info!("Connected to Redis queue '{}'", name);

        Ok(Self {
            connection,
            name: name.to_string(),
        })
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl JobQueue for RedisQueue {
    async fn push(&self, job_id: &str) -> ScribeResult<()> {
        let mut connection = self.connection.clone();
        let _: () = connection.lpush(&self.name, job_id).await?;
        Ok(())
    }

    async fn pop(&self) -> ScribeResult<Option<String>> {
        let mut connection = self.connection.clone();
        let job_id = connection
            .rpop::<_, Option<String>>(&self.name, None)
            .await?;
        Ok(job_id)
    }

    async fn len(&self) -> ScribeResult<usize> {
        let mut connection = self.connection.clone();
        let len: usize = connection.llen(&self.name).await?;
        Ok(len)
    }

    async fn ping(&self) -> ScribeResult<()> {
        let mut connection = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut connection).await?;
        Ok(())
    }
}

/// In-process queue for tests and one-shot runs.
#[derive(Default)]
pub struct MemoryQueue {
    items: Mutex<VecDeque<String>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn push(&self, job_id: &str) -> ScribeResult<()> {
        self.items.lock().await.push_back(job_id.to_string());
        Ok(())
    }

    async fn pop(&self) -> ScribeResult<Option<String>> {
        Ok(self.items.lock().await.pop_front())
    }

    async fn len(&self) -> ScribeResult<usize> {
        Ok(self.items.lock().await.len())
    }

    async fn ping(&self) -> ScribeResult<()> {
        Ok(())
    }
}
