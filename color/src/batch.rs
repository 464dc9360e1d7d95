//! Repaints a single image or a whole directory with a palette.
//!
//! Files are processed one by one. After every attempted file a progress
//! event is emitted, a failed file is reported and skipped. Cancellation
//! is checked between files only, so a cancelled batch still finishes
//! the file it is working on.

use {
    crate::{color::Color, palette::Palette, tools},
    std::{
        fs, io,
        path::{Path, PathBuf},
        sync::{
            atomic::{AtomicBool, Ordering},
            mpsc::{self, Receiver},
            Arc,
        },
        thread::{self, JoinHandle},
    },
    thiserror::Error,
    tracing::{info, warn},
};

/// Prefix of the output file names.
pub const OUTPUT_PREFIX: &str = "simplified_";

/// One batch run.
#[derive(Clone, Debug)]
pub struct Job {
    /// An image file or a directory of images.
    pub input: PathBuf,
    pub outdir: PathBuf,
    pub palette: Vec<Color>,
}

/// Cooperative cancellation flag shared with the worker.
#[derive(Clone, Debug, Default)]
pub struct Cancel(Arc<AtomicBool>);

impl Cancel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the batch to stop before the next file.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Processed { file: String, output: PathBuf },
    Failed { file: String, error: String },
    /// Percent of the enumerated files attempted so far.
    Progress(u8),
    Finished(Report),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Number of files found before processing.
    pub total: usize,
    pub processed: Vec<PathBuf>,
    /// File names with error messages.
    pub failed: Vec<(String, String)>,
    pub cancelled: bool,
}

/// Lists the images of the batch input.
///
/// A file is taken as is regardless of its extension. A directory
/// yields its files with known image extensions sorted by name.
///
/// # Errors
/// See [`Error`] for details.
pub fn inputs(path: &Path) -> Result<Vec<PathBuf>, Error> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_owned()));
    }

    if !path.is_dir() {
        return Ok(vec![path.to_owned()]);
    }

    let enumerate_err = |err| Error::Enumerate {
        path: path.to_owned(),
        err,
    };

    let mut files = vec![];
    for entry in fs::read_dir(path).map_err(enumerate_err)? {
        let path = entry.map_err(enumerate_err)?.path();
        if path.is_file() && im::is_supported(&path) {
            files.push(path);
        }
    }

    files.sort_unstable();
    Ok(files)
}

/// Runs the batch on the current thread.
///
/// # Errors
/// Returns an error if the batch can't be started. Failures of
/// single files are reported as [events](Event::Failed) instead.
pub fn run<F>(job: &Job, cancel: &Cancel, notify: F) -> Result<Report, Error>
where
    F: FnMut(Event),
{
    let Prepared { files, palette } = prepare(job)?;
    Ok(process(&files, &job.outdir, &palette, cancel, notify))
}

/// Runs the batch on a background thread.
///
/// The palette and the input are checked before the thread starts.
///
/// # Errors
/// Returns an error if the batch can't be started.
pub fn spawn(job: Job) -> Result<Handle, Error> {
    let Prepared { files, palette } = prepare(&job)?;
    let cancel = Cancel::new();
    let (tx, events) = mpsc::channel();
    let worker = {
        let cancel = cancel.clone();
        thread::spawn(move || {
            process(&files, &job.outdir, &palette, &cancel, |event| {
                // the receiver may be gone, the batch still runs to the end
                _ = tx.send(event);
            })
        })
    };

    Ok(Handle {
        events,
        cancel,
        worker,
    })
}

/// A batch running in the background.
pub struct Handle {
    events: Receiver<Event>,
    cancel: Cancel,
    worker: JoinHandle<Report>,
}

impl Handle {
    /// Events in file order, the channel closes after [`Event::Finished`].
    #[must_use]
    pub fn events(&self) -> &Receiver<Event> {
        &self.events
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns the cancellation flag of the batch to be shared with
    /// other threads, e.g. a signal handler.
    #[must_use]
    pub fn cancel_token(&self) -> Cancel {
        self.cancel.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the batch to end.
    ///
    /// # Errors
    /// Returns [`Error::Panicked`] if the worker panicked.
    pub fn join(self) -> Result<Report, Error> {
        self.worker.join().map_err(|_| Error::Panicked)
    }
}

/// Allows one batch at a time.
///
/// A batch stays active until its completion is acknowledged
/// with [`finish`](Self::finish).
#[derive(Default)]
pub struct Runner {
    active: Option<Handle>,
}

impl Runner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new batch.
    ///
    /// # Errors
    /// Returns [`Error::Busy`] if another batch is active.
    pub fn start(&mut self, job: Job) -> Result<&Handle, Error> {
        if self.active.is_some() {
            return Err(Error::Busy);
        }

        Ok(self.active.insert(spawn(job)?))
    }

    #[must_use]
    pub fn active(&self) -> Option<&Handle> {
        self.active.as_ref()
    }

    /// Waits for the active batch and releases the runner.
    pub fn finish(&mut self) -> Option<Result<Report, Error>> {
        self.active.take().map(Handle::join)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("no valid colors in the palette")]
    NoValidColors,

    #[error("input {0:?} doesn't exist")]
    InputNotFound(PathBuf),

    #[error("failed to read directory {path:?}: {err}")]
    Enumerate { path: PathBuf, err: io::Error },

    #[error("failed to create output directory {path:?}: {err}")]
    OutDir { path: PathBuf, err: io::Error },

    #[error("another batch is running")]
    Busy,

    #[error("the batch worker panicked")]
    Panicked,
}

struct Prepared {
    files: Vec<PathBuf>,
    palette: Palette,
}

fn prepare(job: &Job) -> Result<Prepared, Error> {
    let palette = Palette::new(&job.palette).ok_or(Error::NoValidColors)?;
    let files = inputs(&job.input)?;
    fs::create_dir_all(&job.outdir).map_err(|err| Error::OutDir {
        path: job.outdir.clone(),
        err,
    })?;

    Ok(Prepared { files, palette })
}

fn process<F>(
    files: &[PathBuf],
    outdir: &Path,
    palette: &Palette,
    cancel: &Cancel,
    mut notify: F,
) -> Report
where
    F: FnMut(Event),
{
    let total = files.len();
    let mut report = Report {
        total,
        ..Report::default()
    };

    if files.is_empty() {
        warn!("no input images found");
    }

    for (idx, path) in files.iter().enumerate() {
        if cancel.is_cancelled() {
            info!("batch cancelled after {idx} of {total} files");
            report.cancelled = true;
            break;
        }

        let file = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );

        let output = outdir.join(format!("{OUTPUT_PREFIX}{file}"));
        match repaint_file(path, &output, palette) {
            Ok(()) => {
                info!("write image to file {output:?}");
                report.processed.push(output.clone());
                notify(Event::Processed { file, output });
            }
            Err(err) => {
                warn!("failed to process {file}: {err}");
                let error = err.to_string();
                report.failed.push((file.clone(), error.clone()));
                notify(Event::Failed { file, error });
            }
        }

        notify(Event::Progress(((idx + 1) * 100 / total) as u8));
    }

    notify(Event::Finished(report.clone()));
    report
}

/// Repaints one file with a fresh copy of the palette, so resolved
/// colors are kept only while the image is processed.
fn repaint_file(path: &Path, output: &Path, palette: &Palette) -> Result<(), im::Error> {
    let mut palette = palette.clone();
    let im = im::decode(path)?;
    im::encode(&tools::repaint_with(&im, &mut palette), output)
}
