//! Course slug generation.

use std::collections::HashMap;

/// Derive a short slug from a course title: the first character of every
/// space-separated token, kept only when it is a letter or a digit.
pub fn course_slug(title: &str) -> String {
    title
        .split(' ')
        .filter_map(|token| token.chars().next())
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Per-run slug dedupe.
///
/// The first course producing a slug gets it bare; every later collision
/// appends the number of courses seen with that slug so far, so three
/// colliding titles come out as `ABC`, `ABC1`, `ABC2`. The counter is scoped
/// to one grouping run; runs stay independent and reproducible.
#[derive(Debug, Default)]
pub struct SlugCounter {
    seen: HashMap<String, u32>,
}

impl SlugCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for `title`, suffixed if the bare slug was already handed out.
    pub fn assign(&mut self, title: &str) -> String {
        let slug = course_slug(title);
        match self.seen.get_mut(&slug) {
            Some(count) => {
                let suffixed = format!("{slug}{count}");
                *count += 1;
                suffixed
            }
            None => {
                self.seen.insert(slug.clone(), 1);
                slug
            }
        }
    }
}
