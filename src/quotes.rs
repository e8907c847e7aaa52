use rand::Rng;

/// The fixed quote collection. Entries are immutable; a quote has no
/// identity beyond its text and is picked by uniform random index.
#[derive(Debug, Clone)]
pub struct Quotes {
    entries: Vec<String>,
}

impl Quotes {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn random(&self) -> Option<&str> {
        self.random_with(&mut rand::thread_rng())
    }

    pub fn random_with(&self, rng: &mut impl Rng) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.entries.len());
        Some(&self.entries[index])
    }
}
