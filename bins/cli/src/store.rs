//! JSON file store standing in for the document store.
//!
//! Each trip lives in `{dir}/{trip_id}.json` as one complete snapshot.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tripsplit_core::trip::{SnapshotSource, TripSnapshot};
use tripsplit_shared::AppError;
use tripsplit_shared::types::TripId;

/// Snapshot file errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No file for this trip.
    #[error("Trip {0} not found")]
    NotFound(TripId),

    /// The file holds a different trip than its name says.
    #[error("File for trip {expected} holds trip {found}")]
    WrongTrip {
        /// Trip named by the file.
        expected: TripId,
        /// Trip found inside.
        found: TripId,
    },

    /// Reading or writing failed.
    #[error("Trip file {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not a valid snapshot.
    #[error("Trip file {path} is not valid: {source}")]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound(err.to_string()),
            StoreError::WrongTrip { .. } | StoreError::Json { .. } => {
                Self::DataIntegrity(err.to_string())
            }
            StoreError::Io { .. } => Self::Internal(err.to_string()),
        }
    }
}

/// Directory of trip snapshot files.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    dir: PathBuf,
}

impl JsonSnapshotStore {
    /// Opens a store rooted at `dir`; the directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, trip_id: TripId) -> PathBuf {
        self.dir.join(format!("{trip_id}.json"))
    }

    /// Writes a snapshot, replacing the trip's file atomically.
    pub fn save(&self, snapshot: &TripSnapshot) -> Result<(), StoreError> {
        let path = self.path_for(snapshot.trip.id);
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let temp_path = path.with_extension("json.tmp");
        write_pretty(&temp_path, snapshot)?;

        fs::rename(&temp_path, &path).map_err(|source| {
            let _ = fs::remove_file(&temp_path);
            StoreError::Io {
                path: path.clone(),
                source,
            }
        })?;

        tracing::debug!(trip_id = %snapshot.trip.id, path = %path.display(), "Saved trip snapshot");
        Ok(())
    }
}

fn write_pretty(path: &Path, snapshot: &TripSnapshot) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)?;
    writer.get_ref().sync_all().map_err(io_err)
}

impl SnapshotSource for JsonSnapshotStore {
    type Error = StoreError;

    fn load_snapshot(&self, trip_id: TripId) -> Result<TripSnapshot, StoreError> {
        let path = self.path_for(trip_id);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(trip_id));
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let snapshot: TripSnapshot = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;

        if snapshot.trip.id != trip_id {
            return Err(StoreError::WrongTrip {
                expected: trip_id,
                found: snapshot.trip.id,
            });
        }
        Ok(snapshot)
    }
}
