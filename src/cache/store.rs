use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::{Condvar, Mutex};

use crate::cache::fingerprint::Fingerprint;
use crate::foundation::error::{MemeError, MemeResult};
use crate::meme::Meme;

type Outcome = Result<PathBuf, MemeError>;

struct Flight {
    outcome: Mutex<Option<Outcome>>,
    ready: Condvar,
}

impl Flight {
    fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    fn publish(&self, outcome: Outcome) {
        let mut slot = self.outcome.lock();
        *slot = Some(outcome);
        self.ready.notify_all();
    }

    fn wait(&self) -> Outcome {
        let mut slot = self.outcome.lock();
        loop {
            if let Some(outcome) = slot.as_ref() {
                return match outcome {
                    Ok(path) => Ok(path.clone()),
                    Err(e) => Err(e.to_shared()),
                };
            }
            self.ready.wait(&mut slot);
        }
    }
}

/// Clears the registry entry when the leader finishes, and wakes waiters even if it unwinds.
struct Leader<'a> {
    cache: &'a FingerprintCache,
    fp: Fingerprint,
    flight: Arc<Flight>,
    published: bool,
}

impl Leader<'_> {
    fn finish(mut self, outcome: &Outcome) {
        let shared = match outcome {
            Ok(path) => Ok(path.clone()),
            Err(e) => Err(e.to_shared()),
        };
        self.cache.in_flight.lock().remove(&self.fp);
        self.flight.publish(shared);
        self.published = true;
    }
}

impl Drop for Leader<'_> {
    fn drop(&mut self) {
        if self.published {
            return;
        }
        self.cache.in_flight.lock().remove(&self.fp);
        self.flight
            .publish(Err(MemeError::render("meme generation was abandoned")));
    }
}

/// Disk store of generated memes addressed by request fingerprint.
///
/// Concurrent requests for the same fingerprint run the generator once; the others wait for
/// its outcome. Artifacts become visible only once completely written.
pub struct FingerprintCache {
    output_dir: PathBuf,
    in_flight: Mutex<HashMap<Fingerprint, Arc<Flight>>>,
    generations: AtomicUsize,
    temp_seq: AtomicU64,
}

impl FingerprintCache {
    /// Store rooted at `output_dir`; the directory is created on first write.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            in_flight: Mutex::new(HashMap::new()),
            generations: AtomicUsize::new(0),
            temp_seq: AtomicU64::new(0),
        }
    }

    /// Directory holding the artifacts.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the artifact for `fp` lives, whether or not it exists yet.
    pub fn artifact_path(&self, fp: &Fingerprint) -> PathBuf {
        self.output_dir.join(format!("{fp}.gif"))
    }

    /// Return `true` when the artifact for `fp` is already stored.
    pub fn contains(&self, fp: &Fingerprint) -> bool {
        self.artifact_path(fp).is_file()
    }

    /// Number of times a generator has been run by this cache.
    pub fn generations(&self) -> usize {
        self.generations.load(Ordering::SeqCst)
    }

    /// Path of the artifact for `fp`, running `generate` once if it does not exist yet.
    ///
    /// `generate` must return a meme whose frames are final; the cache only encodes it.
    #[tracing::instrument(skip(self, fp, generate), fields(fingerprint = %fp))]
    pub fn get_or_generate<F>(&self, fp: Fingerprint, generate: F) -> MemeResult<PathBuf>
    where
        F: FnOnce() -> MemeResult<Meme>,
    {
        let path = self.artifact_path(&fp);
        if path.is_file() {
            tracing::debug!("cache hit");
            return Ok(path);
        }

        let (flight, leading) = {
            let mut registry = self.in_flight.lock();
            match registry.get(&fp) {
                Some(flight) => (flight.clone(), false),
                None => {
                    let flight = Arc::new(Flight::new());
                    registry.insert(fp, flight.clone());
                    (flight, true)
                }
            }
        };

        if !leading {
            tracing::debug!("joining in-flight generation");
            return flight.wait();
        }

        let leader = Leader {
            cache: self,
            fp,
            flight,
            published: false,
        };
        let outcome = self.lead(&path, generate);
        leader.finish(&outcome);
        outcome
    }

    fn lead<F>(&self, path: &Path, generate: F) -> MemeResult<PathBuf>
    where
        F: FnOnce() -> MemeResult<Meme>,
    {
        if path.is_file() {
            tracing::debug!("artifact appeared while acquiring the flight");
            return Ok(path.to_path_buf());
        }

        self.generations.fetch_add(1, Ordering::SeqCst);
        let meme = generate()?;
        self.publish(path, &meme)?;
        tracing::info!(path = %path.display(), frames = meme.animation().len(), "stored meme");
        Ok(path.to_path_buf())
    }

    fn publish(&self, path: &Path, meme: &Meme) -> MemeResult<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            MemeError::store(format!(
                "failed to create '{}': {e}",
                self.output_dir.display()
            ))
        })?;

        let tmp = self.temp_path(path);
        let written = meme.save(&tmp).and_then(|()| {
            std::fs::rename(&tmp, path).map_err(|e| {
                MemeError::store(format!("failed to publish '{}': {e}", path.display()))
            })
        });
        if written.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        written
    }

    fn temp_path(&self, path: &Path) -> PathBuf {
        let seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir
            .join(format!(".{stem}.{}.{seq}.tmp", std::process::id()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/store.rs"]
mod tests;
