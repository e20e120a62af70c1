use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info, trace};

use crate::domain::{Message, TVConfig, TVError};
use crate::filter::FilterSpec;
use crate::loader;
use crate::paths;
use crate::store::TableStore;
use crate::table::Table;

#[derive(Debug, PartialEq)]
pub enum Status {
    EMPTY,
    READY,
    FILTERED,
}

/// Files known to the model, in the order they were added.
///
/// Adding a path whose file name is already listed replaces the stored path
/// but keeps the single list entry.
#[derive(Debug, Default)]
pub struct FileList {
    names: Vec<String>,
    paths: HashMap<String, PathBuf>,
}

impl FileList {
    pub fn add(&mut self, path: PathBuf) -> String {
        let name = paths::file_name(&path);
        if !self.paths.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.paths.insert(name.clone(), path);
        name
    }

    pub fn resolve(&self, name: &str) -> Option<&Path> {
        self.paths.get(name).map(PathBuf::as_path)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub struct Model {
    config: TVConfig,
    pub status: Status,
    files: FileList,
    store: TableStore,
    current_file: Option<String>,
    status_message: String,
}

impl Model {
    pub fn init(config: &TVConfig) -> Self {
        Self {
            config: config.clone(),
            status: Status::EMPTY,
            files: FileList::default(),
            store: TableStore::new(),
            current_file: None,
            status_message: "Started tv!".to_string(),
        }
    }

    /// Apply one message. Failures are recorded as the status message and
    /// returned; the loaded table and its view stay as they were.
    pub fn update(&mut self, message: Message) -> Result<(), TVError> {
        trace!("Update: {:?}", message);
        let result = match message {
            Message::DropFiles(raw) => self.drop_files(&raw),
            Message::AddFile(path) => {
                self.add_file(path);
                Ok(())
            }
            Message::Open(name) => self.open(&name),
            Message::Search(entry) => self.search(&entry),
            Message::FilterColumns(spec) => self.filter(FilterSpec::Columns(spec)),
            Message::Reset => {
                self.reset();
                Ok(())
            }
        };
        if let Err(e) = &result {
            error!("{e}");
            self.set_status_message(e.to_string());
        }
        result
    }

    pub fn view(&self) -> &Table {
        self.store.view()
    }

    pub fn files(&self) -> &FileList {
        &self.files
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    // -------------------- Message handling functions ---------------------- //

    fn drop_files(&mut self, raw: &str) -> Result<(), TVError> {
        let dropped = paths::parse_path_list(raw)?;
        let before = self.files.len();
        for path in dropped.into_iter().map(PathBuf::from) {
            if paths::has_extension(&path, &self.config.extensions) {
                self.add_file(path);
            } else {
                debug!("Skipping dropped path {}", path.display());
            }
        }
        let added = self.files.len() - before;
        self.set_status_message(format!("Added {added} files"));
        Ok(())
    }

    fn add_file(&mut self, path: PathBuf) {
        let name = self.files.add(path);
        trace!("File list entry {name}");
    }

    fn open(&mut self, name: &str) -> Result<(), TVError> {
        let path = self
            .files
            .resolve(name)
            .ok_or_else(|| TVError::UnknownFile(name.to_string()))?
            .to_path_buf();

        let start_time = Instant::now();
        let table = loader::load_table(&path)?;
        let data_loading_duration = start_time.elapsed().as_millis();

        let nrows = table.nrows();
        self.store.load_table(table);
        self.current_file = Some(name.to_string());
        self.status = Status::READY;
        info!("Opened {name} from {}", path.display());
        self.set_status_message(format!(
            "Loaded '{name}' ({nrows} rows) in {data_loading_duration}ms"
        ));
        Ok(())
    }

    // An empty entry means "show everything" and never reaches the term filter.
    fn search(&mut self, entry: &str) -> Result<(), TVError> {
        if entry.is_empty() {
            self.reset();
            return Ok(());
        }
        self.filter(FilterSpec::Term(entry.to_string()))
    }

    fn filter(&mut self, spec: FilterSpec) -> Result<(), TVError> {
        let view = spec.apply(self.store.source())?;
        let total = self.store.source().nrows();
        self.set_status_message(format!("Found {} of {} rows", view.nrows(), total));
        self.store.apply_view(view);
        self.sync_status();
        Ok(())
    }

    // Nothing loaded stays EMPTY whatever the filters do.
    fn sync_status(&mut self) {
        if self.current_file.is_none() {
            return;
        }
        self.status = if self.store.is_filtered() {
            Status::FILTERED
        } else {
            Status::READY
        };
    }

    fn reset(&mut self) {
        self.store.reset();
        self.sync_status();
        self.set_status_message(format!("Showing all {} rows", self.store.view().nrows()));
    }
}
