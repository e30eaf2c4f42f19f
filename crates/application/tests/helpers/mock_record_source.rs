#![allow(dead_code)]

use async_trait::async_trait;
use dnscoord_application::ports::{ARecord, QueryError, RecordSource};
use dnscoord_domain::{DnsName, Nameserver};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

type Key = (String, String);
type Response = Result<Vec<ARecord>, QueryError>;

/// Programmable record source. Each (record, nameserver) pair holds a queue
/// of responses; the last one is sticky so constant answers and retry
/// sequences both work. Unprogrammed pairs answer host-not-found.
pub struct MockRecordSource {
    responses: Mutex<HashMap<Key, VecDeque<Response>>>,
    calls: Mutex<HashMap<Key, usize>>,
}

impl MockRecordSource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn answer(&self, record: &str, nameserver: &str, addrs: &[(&str, u32)]) {
        let records = addrs
            .iter()
            .map(|(a, ttl)| ARecord::new(a.parse().unwrap(), *ttl))
            .collect();
        self.push(record, nameserver, Ok(records));
    }

    pub fn fail(&self, record: &str, nameserver: &str, error: QueryError) {
        self.push(record, nameserver, Err(error));
    }

    pub fn push(&self, record: &str, nameserver: &str, response: Response) {
        self.responses
            .lock()
            .unwrap()
            .entry((record.to_string(), nameserver.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn call_count(&self, record: &str, nameserver: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&(record.to_string(), nameserver.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

impl Default for MockRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSource for MockRecordSource {
    async fn query_a(
        &self,
        name: &DnsName,
        nameserver: &Nameserver,
    ) -> Result<Vec<ARecord>, QueryError> {
        let key = (name.to_string(), nameserver.hostname.to_string());
        *self.calls.lock().unwrap().entry(key.clone()).or_insert(0) += 1;

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Err(QueryError::HostNotFound)),
            Some(queue) => queue.front().cloned().unwrap_or(Err(QueryError::HostNotFound)),
            None => Err(QueryError::HostNotFound),
        }
    }
}
