use crate::config::list_file;
use crate::error::{WelcomerError, WelcomerResult};
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::fmt;

/// Placeholder replaced with the player name when rendering a welcome template
pub const PLACEHOLDER: &str = "%s";

pub const DEFAULT_WELCOME_MESSAGES: [&str; 3] =
    ["%s welcome!", "Hey %s, nice to see you!", "Welcome %s!"];

pub const DEFAULT_SELF_MESSAGES: [&str; 12] = [
    "Hello everyone!",
    "Hope you're all having a great time!",
    "Happy to be here with you guys!",
    "Let's have a fun block game session!",
    "Greetings from me!",
    "wow I'm here!",
    "I arrived!",
    "I m here!",
    "I made it!",
    "wow I joined",
    "There I am.",
    "Oh, look, it's me!",
];

const WELCOME_HEADER: [&str; 2] = ["# Welcomer messages", "# %s replaced with player name"];

const SELF_HEADER: [&str; 3] = [
    "# Self-greet messages",
    "# One message per line",
    "# If this file is empty, fallback messages will be used.",
];

/// Which message pool a bank holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    /// Templates for greeting other players
    Welcome,
    /// First-person templates for the local user's own join
    SelfGreet,
}

impl PoolKind {
    pub fn defaults(self) -> &'static [&'static str] {
        match self {
            PoolKind::Welcome => &DEFAULT_WELCOME_MESSAGES,
            PoolKind::SelfGreet => &DEFAULT_SELF_MESSAGES,
        }
    }

    fn header(self) -> &'static [&'static str] {
        match self {
            PoolKind::Welcome => &WELCOME_HEADER,
            PoolKind::SelfGreet => &SELF_HEADER,
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::Welcome => f.write_str("welcome"),
            PoolKind::SelfGreet => f.write_str("self-greet"),
        }
    }
}

#[derive(Debug, Default)]
struct BankInner {
    pool: Vec<String>,
    queue: VecDeque<String>,
}

/// A pool of message templates with a shuffled draw queue.
///
/// Every template in the pool is drawn exactly once before any repeats: the
/// queue is a full shuffle of the pool and is only refilled once it is empty.
/// The pool and the queue sit behind one lock, so a draw never observes a
/// half-refilled queue.
#[derive(Debug)]
pub struct MessageBank {
    kind: PoolKind,
    path: Utf8PathBuf,
    inner: Mutex<BankInner>,
}

impl MessageBank {
    /// Load a bank from its backing file.
    ///
    /// If the file is missing or has no usable lines, the built-in defaults for
    /// `kind` are used and written back with a comment header. I/O failures are
    /// logged and the defaults are kept in memory.
    pub fn load(path: impl Into<Utf8PathBuf>, kind: PoolKind) -> Self {
        let path = path.into();
        let pool = read_or_seed(&path, kind);
        tracing::info!("Loaded {} {} messages from {}", pool.len(), kind, path);

        Self {
            kind,
            path,
            inner: Mutex::new(BankInner {
                pool,
                queue: VecDeque::new(),
            }),
        }
    }

    /// Build a bank from in-memory templates without touching the file
    pub fn from_templates(
        path: impl Into<Utf8PathBuf>,
        kind: PoolKind,
        templates: Vec<String>,
    ) -> Self {
        Self {
            kind,
            path: path.into(),
            inner: Mutex::new(BankInner {
                pool: templates,
                queue: VecDeque::new(),
            }),
        }
    }

    /// Re-read the backing file, replacing the pool.
    ///
    /// The live queue is discarded so the next draw reshuffles the new pool.
    /// Returns the new pool size.
    pub fn reload(&self) -> usize {
        let pool = read_or_seed(&self.path, self.kind);
        let count = pool.len();

        let mut inner = self.inner.lock();
        inner.pool = pool;
        inner.queue.clear();
        drop(inner);

        tracing::info!("Reloaded {} {} messages from {}", count, self.kind, self.path);
        count
    }

    /// Take the next template, reshuffling the pool into the queue when it runs dry.
    ///
    /// Returns `None` only when the pool itself is empty.
    pub fn draw(&self) -> Option<String> {
        let mut inner = self.inner.lock();

        if inner.queue.is_empty() {
            if inner.pool.is_empty() {
                tracing::debug!("{} pool is empty, cannot refill queue", self.kind);
                return None;
            }
            let mut shuffled = inner.pool.clone();
            shuffled.shuffle(&mut rand::thread_rng());
            inner.queue.extend(shuffled);
            tracing::debug!("{} queue refilled with {} messages", self.kind, inner.queue.len());
        }

        inner.queue.pop_front()
    }

    /// Like [`draw`](Self::draw) but as a `Result` for callers that propagate errors
    pub fn try_draw(&self) -> WelcomerResult<String> {
        self.draw().ok_or(WelcomerError::EmptyPool)
    }

    /// Add a template to the pool, the live queue and the backing file.
    ///
    /// Returns `Ok(false)` for blank input. On a file error the template has
    /// still been added in memory.
    pub fn add(&self, template: &str) -> WelcomerResult<bool> {
        let template = template.trim();
        if template.is_empty() {
            return Ok(false);
        }

        {
            let mut inner = self.inner.lock();
            inner.pool.push(template.to_string());
            inner.queue.push_back(template.to_string());
        }

        list_file::append_entry(&self.path, template)?;
        tracing::info!("Added new {} message: {}", self.kind, template);
        Ok(true)
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn pool_len(&self) -> usize {
        self.inner.lock().pool.len()
    }

    /// Number of templates left before the next reshuffle
    pub fn queued(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Copy of the current pool in file order
    pub fn templates(&self) -> Vec<String> {
        self.inner.lock().pool.clone()
    }
}

fn read_or_seed(path: &Utf8Path, kind: PoolKind) -> Vec<String> {
    match list_file::read_entries(path) {
        Ok(Some(entries)) if !entries.is_empty() => return entries,
        Ok(_) => {
            tracing::debug!("No usable {} messages in {}, seeding defaults", kind, path);
        }
        Err(e) => {
            // Leave an unreadable file alone
            tracing::error!("Failed to load {} messages: {}", kind, e);
            return defaults(kind);
        }
    }

    let seeded = defaults(kind);
    if let Err(e) = list_file::write_entries(path, kind.header(), &seeded) {
        tracing::error!("Failed to write default {} messages: {}", kind, e);
    }
    seeded
}

fn defaults(kind: PoolKind) -> Vec<String> {
    kind.defaults().iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn temp_path(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_missing_file_seeds_defaults() {
        let dir = TempDir::new().unwrap();
        let path = temp_path(&dir, "config/welcomer_messages.txt");

        let bank = MessageBank::load(&path, PoolKind::Welcome);

        assert_eq!(bank.pool_len(), 3);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Welcomer messages\n"));
        assert!(content.contains("Hey %s, nice to see you!"));
    }

    #[test]
    fn test_empty_file_seeds_defaults() {
        let dir = TempDir::new().unwrap();
        let path = temp_path(&dir, "self.txt");
        fs::write(&path, "# only comments\n\n").unwrap();

        let bank = MessageBank::load(&path, PoolKind::SelfGreet);

        assert_eq!(bank.pool_len(), DEFAULT_SELF_MESSAGES.len());
        assert!(fs::read_to_string(&path).unwrap().contains("Oh, look, it's me!"));
    }

    #[test]
    fn test_existing_file_is_used() {
        let dir = TempDir::new().unwrap();
        let path = temp_path(&dir, "messages.txt");
        fs::write(&path, "# header\nHi %s!\n  Yo %s  \n").unwrap();

        let bank = MessageBank::load(&path, PoolKind::Welcome);

        assert_eq!(bank.templates(), vec!["Hi %s!", "Yo %s"]);
    }

    #[test]
    fn test_full_cycle_has_no_repeats() {
        let templates: Vec<String> = (0..10).map(|i| format!("msg {}", i)).collect();
        let bank = MessageBank::from_templates("unused.txt", PoolKind::Welcome, templates.clone());

        let drawn: HashSet<String> = (0..10).map(|_| bank.draw().unwrap()).collect();

        assert_eq!(drawn, templates.into_iter().collect());
        assert_eq!(bank.queued(), 0);
    }

    #[test]
    fn test_empty_pool_draws_none() {
        let bank = MessageBank::from_templates("unused.txt", PoolKind::Welcome, Vec::new());
        assert!(bank.draw().is_none());
        assert!(matches!(bank.try_draw(), Err(WelcomerError::EmptyPool)));
    }

    #[test]
    fn test_add_enqueues_immediately() {
        let dir = TempDir::new().unwrap();
        let path = temp_path(&dir, "messages.txt");
        fs::write(&path, "Hi %s!\n").unwrap();
        let bank = MessageBank::load(&path, PoolKind::Welcome);

        // Drain the one-template cycle so the queue is empty
        assert_eq!(bank.draw().unwrap(), "Hi %s!");
        assert_eq!(bank.queued(), 0);

        assert!(bank.add("Welcome back %s").unwrap());

        assert_eq!(bank.pool_len(), 2);
        assert_eq!(bank.draw().unwrap(), "Welcome back %s");
        assert!(fs::read_to_string(&path).unwrap().ends_with("Welcome back %s\n"));
    }

    #[test]
    fn test_add_blank_is_ignored() {
        let bank = MessageBank::from_templates("unused.txt", PoolKind::Welcome, Vec::new());
        assert!(!bank.add("   ").unwrap());
        assert_eq!(bank.pool_len(), 0);
    }

    #[test]
    fn test_reload_replaces_pool_and_queue() {
        let dir = TempDir::new().unwrap();
        let path = temp_path(&dir, "messages.txt");
        fs::write(&path, "A %s\nB %s\n").unwrap();
        let bank = MessageBank::load(&path, PoolKind::Welcome);
        bank.draw();
        assert_eq!(bank.queued(), 1);

        fs::write(&path, "C %s\n").unwrap();
        assert_eq!(bank.reload(), 1);

        assert_eq!(bank.queued(), 0);
        assert_eq!(bank.draw().unwrap(), "C %s");
    }
}
