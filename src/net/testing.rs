//! Scripted [`HttpClient`] for unit tests

use super::{HttpClient, HttpResponse, NetError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use url::Url;

type Reply = Result<HttpResponse, NetError>;

/// Answers requests from per-prefix reply queues. The last reply of a queue
/// repeats forever; unknown URLs get a 404.
#[derive(Default)]
pub struct FakeHttp {
    routes: Mutex<Vec<(String, VecDeque<Reply>)>>,
    requests: Mutex<Vec<(Url, Vec<(String, String)>)>>,
    posts: Mutex<Vec<(Url, serde_json::Value)>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, prefix: &str, replies: Vec<Reply>) -> Self {
        self.routes
            .lock()
            .push((prefix.to_string(), replies.into_iter().collect()));
        self
    }

    pub fn requests(&self) -> Vec<(Url, Vec<(String, String)>)> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|(url, _)| url.as_str().starts_with(prefix))
            .count()
    }

    pub fn posts(&self) -> Vec<(Url, serde_json::Value)> {
        self.posts.lock().clone()
    }

    fn reply(&self, url: &Url) -> Reply {
        let mut routes = self.routes.lock();
        let Some((_, queue)) = routes
            .iter_mut()
            .find(|(prefix, _)| url.as_str().starts_with(prefix.as_str()))
        else {
            return Ok(HttpResponse::new(404, "not found"));
        };

        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
        }
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn get(&self, url: &Url, headers: &[(String, String)]) -> Result<HttpResponse, NetError> {
        self.requests.lock().push((url.clone(), headers.to_vec()));
        self.reply(url)
    }

    async fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, NetError> {
        self.posts.lock().push((url.clone(), body.clone()));
        self.reply(url)
    }
}
