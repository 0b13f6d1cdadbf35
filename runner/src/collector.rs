use crate::config::{ConfigErrors, InputConfig};
use globset::GlobMatcher;
use ignore::{DirEntry, WalkBuilder};
use itertools::Itertools;
use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

#[derive(Debug)]
/// All possible collector variants
/// These should be initialized from `Collector::load`
pub enum Collector {
    /// files named explicitly, taken as they are
    Files { paths: VecDeque<PathBuf> },
    /// files found below directories, filtered by the input glob
    Glob { paths: VecDeque<PathBuf> },
    Grouped { collectors: Vec<Collector> },
}

impl Collector {
    /// Collect result files for every configured path, keeping the order of the paths
    pub fn load(config: &InputConfig) -> Result<Self, ConfigErrors> {
        let glob = config.compile_glob()?;
        debug!("Filtering with glob: {glob:?}");

        let collector = config
            .paths
            .iter()
            .map(PathBuf::from)
            .map(|path| {
                if path.is_file() {
                    Self::Files {
                        paths: VecDeque::from([path]),
                    }
                } else {
                    Self::walk(&path, &glob)
                }
            })
            .fold(
                Self::Grouped {
                    collectors: Vec::new(),
                },
                Self::join,
            );

        Ok(collector)
    }

    fn walk(directory: &Path, glob: &GlobMatcher) -> Self {
        let found = WalkBuilder::new(directory)
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Failed to search for benchmark results: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().map_or(false, |kind| kind.is_file()))
            .map(DirEntry::into_path)
            .filter(|path| glob.is_match(path))
            .sorted()
            .collect::<VecDeque<_>>();

        debug!(directory = ?directory, files = found.len(), "Collected result files");

        Self::Glob { paths: found }
    }

    /// join multiple collectors into a single grouped collector
    /// this will if possible reuse existing grouped collectors
    pub fn join(self, other: Self) -> Self {
        match self {
            Self::Grouped { mut collectors } => {
                match other {
                    Self::Grouped {
                        collectors: other_collectors,
                    } => {
                        collectors.extend(other_collectors);
                    }
                    non_grouped => {
                        collectors.push(non_grouped);
                    }
                };

                Self::Grouped { collectors }
            }
            non_grouped => match other {
                Self::Grouped { mut collectors } => {
                    collectors.insert(0, non_grouped);

                    Self::Grouped { collectors }
                }
                other_non_grouped => Self::Grouped {
                    collectors: vec![non_grouped, other_non_grouped],
                },
            },
        }
    }
}

impl Iterator for Collector {
    type Item = PathBuf;

    /// return accurate size for underlying iterator
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Files { paths } | Self::Glob { paths } => (paths.len(), Some(paths.len())),
            Self::Grouped { collectors } => {
                let len = collectors
                    .iter()
                    .fold(0, |acc, collector| acc + collector.size_hint().0);

                (len, Some(len))
            }
        }
    }

    /// return the next result file, in the order the inputs were given
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Files { paths } | Self::Glob { paths } => paths.pop_front(),
            Self::Grouped { collectors } => {
                for collector in collectors {
                    let next = collector.next();

                    if next.is_some() {
                        return next;
                    }
                }

                None
            }
        }
    }
}
