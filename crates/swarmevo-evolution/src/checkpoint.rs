//! Durable weight checkpoints.
//!
//! Once per generation, after evaluation and before reproduction, the
//! generation's best weight vector is written to
//! `save_dir/gen_{generation:04}_best_weights.json`. Each generation gets
//! its own file and no file is ever rewritten, so an interrupted run
//! always leaves a consistent, loadable trail behind.
//!
//! The file is human-inspectable JSON. `weights` is the reload payload;
//! `generation`, `fitness`, and `saved_at` are advisory metadata kept for
//! the humans comparing runs.

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::genetic::GenerationStats;

/// One persisted weight vector with advisory metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightCheckpoint {
    /// Generation the weights were best in.
    pub generation: usize,
    /// Fitness the weights scored in that generation.
    pub fitness: f32,
    /// The weight vector itself; the only field reloading depends on.
    pub weights: Vec<f32>,
    /// Wall-clock write time.
    pub saved_at: DateTime<Utc>,
}

impl WeightCheckpoint {
    /// Loads a checkpoint from a file written by [`Checkpointer::save`].
    ///
    /// Fails loudly on a missing or malformed file, or on an empty weight
    /// vector — a load never silently substitutes defaults.
    pub fn load<P>(path: P) -> Result<Self, CheckpointLoadError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path.as_ref()).map_err(CheckpointLoadError::Io)?;
        let checkpoint: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(CheckpointLoadError::Json)?;
        if checkpoint.weights.is_empty() {
            return Err(CheckpointLoadError::EmptyWeights);
        }
        Ok(checkpoint)
    }
}

/// A checkpoint file could not be loaded.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CheckpointLoadError {
    #[display("failed to read checkpoint file: {_0}")]
    Io(io::Error),
    #[display("failed to parse checkpoint JSON: {_0}")]
    Json(serde_json::Error),
    #[display("checkpoint contains an empty weight vector")]
    EmptyWeights,
}

/// A checkpoint file could not be written.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CheckpointWriteError {
    #[display("failed to create checkpoint directory {}: {error}", path.display())]
    CreateDir {
        path: PathBuf,
        #[error(source)]
        error: io::Error,
    },
    #[display("failed to write checkpoint file {}: {error}", path.display())]
    Write {
        path: PathBuf,
        #[error(source)]
        error: io::Error,
    },
    #[display("failed to serialize checkpoint {}: {error}", path.display())]
    Serialize {
        path: PathBuf,
        #[error(source)]
        error: serde_json::Error,
    },
}

/// Writes per-generation best-weight checkpoints into one directory.
#[derive(Debug, Clone)]
pub struct Checkpointer {
    save_dir: PathBuf,
}

impl Checkpointer {
    #[must_use]
    pub fn new<P>(save_dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            save_dir: save_dir.into(),
        }
    }

    #[must_use]
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// File name for a generation's checkpoint: fixed-width, zero-padded,
    /// so lexicographic listing equals generation order.
    #[must_use]
    pub fn file_name(generation: usize) -> String {
        format!("gen_{generation:04}_best_weights.json")
    }

    /// Path the checkpoint for `generation` is (or will be) written to.
    #[must_use]
    pub fn checkpoint_path(&self, generation: usize) -> PathBuf {
        self.save_dir.join(Self::file_name(generation))
    }

    /// Persists a generation's best weights, creating the save directory
    /// if needed. Returns the path written.
    ///
    /// The write is blocking; when this returns `Ok`, the file is flushed
    /// and the loop may move on to reproduction.
    pub fn save(&self, stats: &GenerationStats) -> Result<PathBuf, CheckpointWriteError> {
        fs::create_dir_all(&self.save_dir).map_err(|error| CheckpointWriteError::CreateDir {
            path: self.save_dir.clone(),
            error,
        })?;

        let path = self.checkpoint_path(stats.generation);
        let checkpoint = WeightCheckpoint {
            generation: stats.generation,
            fitness: stats.max_fitness,
            weights: stats.best_weights.clone(),
            saved_at: Utc::now(),
        };

        let file = File::create(&path).map_err(|error| CheckpointWriteError::Write {
            path: path.clone(),
            error,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &checkpoint).map_err(|error| {
            CheckpointWriteError::Serialize {
                path: path.clone(),
                error,
            }
        })?;
        writeln!(writer)
            .and_then(|()| writer.flush())
            .map_err(|error| CheckpointWriteError::Write {
                path: path.clone(),
                error,
            })?;

        Ok(path)
    }
}
