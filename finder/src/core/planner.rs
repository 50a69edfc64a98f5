//! Keyword-driven query planning
//!
//! The planner cycles the keyword list in order, one query per keyword per
//! pass. Each pass covers the next window of result pages, so a second pass
//! continues where the first one stopped. Keywords whose results ran out are
//! dropped from later passes.

use std::fmt;

/// One planned search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub keyword: String,
    /// Position of the keyword in the configured list
    pub slot: usize,
    /// Zero-based pass number
    pub pass: u32,
    pub first_page: u32,
    pub last_page: u32,
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' (pass {}, pages {}-{})",
            self.keyword,
            self.pass + 1,
            self.first_page,
            self.last_page
        )
    }
}

#[derive(Debug, Clone)]
pub struct QueryPlanner {
    keywords: Vec<String>,
    exhausted: Vec<bool>,
    target_count: usize,
    max_passes: u32,
    pages_per_query: u32,
    pass: u32,
    cursor: usize,
}

impl QueryPlanner {
    pub fn new(keywords: Vec<String>, target_count: usize, max_passes: u32, pages_per_query: u32) -> Self {
        let exhausted = vec![false; keywords.len()];
        Self {
            keywords,
            exhausted,
            target_count,
            max_passes,
            pages_per_query: pages_per_query.max(1),
            pass: 0,
            cursor: 0,
        }
    }

    /// Next query to run, or `None` once the target is met or sources ran out
    pub fn next_query(&mut self, accepted: usize) -> Option<Query> {
        if accepted >= self.target_count {
            return None;
        }

        loop {
            if self.pass >= self.max_passes || self.is_exhausted() {
                return None;
            }
            if self.cursor >= self.keywords.len() {
                self.cursor = 0;
                self.pass += 1;
                continue;
            }

            let slot = self.cursor;
            self.cursor += 1;
            if self.exhausted[slot] {
                continue;
            }

            return Some(Query {
                keyword: self.keywords[slot].clone(),
                slot,
                pass: self.pass,
                first_page: self.pass * self.pages_per_query + 1,
                last_page: (self.pass + 1) * self.pages_per_query,
            });
        }
    }

    /// The query's keyword has no further result pages
    pub fn mark_exhausted(&mut self, query: &Query) {
        if let Some(flag) = self.exhausted.get_mut(query.slot) {
            *flag = true;
        }
    }

    /// True when no keyword can yield further pages
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.iter().all(|done| *done)
    }

    pub fn current_pass(&self) -> u32 {
        self.pass
    }
}
