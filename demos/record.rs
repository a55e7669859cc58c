//! A worked example of a [`ttl_lru_cache::CacheValue`] implementation.
//!
//! The cache crate is deliberately agnostic to what it stores; this models
//! the kind of record a course-catalog service might cache, with fields
//! drawn from a real caching example built on top of a similar LRU+TTL
//! design.

use serde::{Deserialize, Serialize};
use ttl_lru_cache::{Cache, CacheValue};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CourseRecord {
    pub id: i64,
    pub faculty: String,
    pub course: String,
    pub title: String,
    pub description: String,
    pub telegram_group_link: String,
    pub votes_count: u32,
    pub user_id: i64,
}

impl CacheValue for CourseRecord {
    fn size_estimate(&self) -> usize {
        self.faculty.len()
            + self.course.len()
            + self.title.len()
            + self.description.len()
            + self.telegram_group_link.len()
            + std::mem::size_of::<i64>() * 2
            + std::mem::size_of::<u32>()
    }
}

fn main() {
    let cache = Cache::<CourseRecord>::new(1_000);

    let record = CourseRecord {
        id: 1,
        faculty: "Computer Science".to_string(),
        course: "Algorithms".to_string(),
        title: "Graph Theory".to_string(),
        description: "Introduction to graph algorithms".to_string(),
        telegram_group_link: "t.me/graph_theory".to_string(),
        votes_count: 10,
        user_id: 12345,
    };

    cache.put(record.id, record);

    if let Some(found) = cache.get(1) {
        println!("retrieved: {}", found.title);
    }

    let metrics = cache.metrics();
    println!("avg read time: {} ns", metrics.avg_read_time_ns);
    println!("memory usage: {} bytes", metrics.memory_bytes);

    let path = std::env::temp_dir().join("ttl_lru_cache_demo.json");
    cache.save(&path).expect("snapshot write should succeed");
    println!("wrote snapshot to {}", path.display());
}
