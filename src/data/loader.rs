use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;

use super::model::{is_blank, Reference, Verse, VerseDataset};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be produced. No partial dataset is ever returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("fetching {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("malformed CSV in {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },
    #[error("{origin} has no {field} column (looked for {candidates:?}, found {found:?})")]
    MissingColumn {
        origin: String,
        field: Field,
        candidates: Vec<String>,
        found: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Sources and column layout
// ---------------------------------------------------------------------------

/// Where the sheet lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    /// HTTP(S) endpoint serving CSV, e.g. a published spreadsheet export.
    Url(String),
}

impl DataSource {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(s.to_string())
        } else {
            DataSource::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(p) => write!(f, "{}", p.display()),
            DataSource::Url(u) => write!(f, "{u}"),
        }
    }
}

/// The logical columns every sheet must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Category,
    Topic,
    Reference,
    Arabic,
    Translation,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Category,
        Field::Topic,
        Field::Reference,
        Field::Arabic,
        Field::Translation,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Category => "category",
            Field::Topic => "topic",
            Field::Reference => "reference",
            Field::Arabic => "arabic",
            Field::Translation => "translation",
        };
        f.write_str(name)
    }
}

/// Candidate header names per logical column. The first candidate present in
/// the (trimmed) header row wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub category: Vec<String>,
    pub topic: Vec<String>,
    pub reference: Vec<String>,
    pub arabic: Vec<String>,
    pub translation: Vec<String>,
    /// Optional free-text column.
    pub notes: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }
        Self {
            category: names(&["Main Category", "Category"]),
            topic: names(&["Topic", "Theme"]),
            reference: names(&["SurahName:AyatNumber", "Surah:Ayat"]),
            arabic: names(&["Ayat in Arabic", "Arabic"]),
            translation: names(&["Bangla Translation", "Translation"]),
            notes: names(&["Sample Verses", "Notes"]),
        }
    }
}

impl ColumnMapping {
    pub fn candidates(&self, field: Field) -> &[String] {
        match field {
            Field::Category => &self.category,
            Field::Topic => &self.topic,
            Field::Reference => &self.reference,
            Field::Arabic => &self.arabic,
            Field::Translation => &self.translation,
        }
    }
}

/// Everything the loader needs besides the source itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub columns: ColumnMapping,
    /// Rows with any of these fields blank are dropped.
    pub required_fields: Vec<Field>,
    pub http_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            required_fields: Vec::new(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

fn find_header(headers: &[String], candidates: &[String]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|c| headers.iter().position(|h| h == c.trim()))
}

/// Header positions of the logical columns.
struct ResolvedColumns {
    required: [usize; 5],
    notes: Option<usize>,
}

impl ResolvedColumns {
    fn resolve(
        headers: &[String],
        mapping: &ColumnMapping,
        origin: &str,
    ) -> Result<Self, LoadError> {
        let mut required = [0usize; 5];
        for (slot, field) in required.iter_mut().zip(Field::ALL) {
            let candidates = mapping.candidates(field);
            *slot = find_header(headers, candidates).ok_or_else(|| LoadError::MissingColumn {
                origin: origin.to_string(),
                field,
                candidates: candidates.to_vec(),
                found: headers.to_vec(),
            })?;
        }
        Ok(Self {
            required,
            notes: find_header(headers, &mapping.notes),
        })
    }

    fn index(&self, field: Field) -> usize {
        self.required[field as usize]
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the dataset from a local file or a URL.
pub fn load(source: &DataSource, config: &LoaderConfig) -> Result<VerseDataset, LoadError> {
    match source {
        DataSource::File(path) => {
            let file = File::open(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            load_from_reader(BufReader::new(file), &path.display().to_string(), config)
        }
        DataSource::Url(url) => {
            let body = fetch(url, config.http_timeout)?;
            load_from_reader(body.as_bytes(), url, config)
        }
    }
}

fn fetch(url: &str, timeout: Duration) -> Result<String, LoadError> {
    let http_err = |source: reqwest::Error| LoadError::Http {
        url: url.to_string(),
        source,
    };
    log::info!("Fetching {url}");
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(http_err)?;
    client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(http_err)
}

/// Parse CSV with a header row into a [`VerseDataset`].
///
/// `origin` only labels errors and log lines.
pub fn load_from_reader<R: Read>(
    reader: R,
    origin: &str,
    config: &LoaderConfig,
) -> Result<VerseDataset, LoadError> {
    let csv_err = |source: csv::Error| LoadError::Csv {
        origin: origin.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let columns = ResolvedColumns::resolve(&headers, &config.columns, origin)?;

    let mut verses = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        if let Some(field) = config
            .required_fields
            .iter()
            .find(|f| is_blank(cell(columns.index(**f))))
        {
            log::debug!("{origin}: dropping row {row_no}, blank {field}");
            dropped += 1;
            continue;
        }

        verses.push(Verse {
            main_category: cell(columns.index(Field::Category)).to_string(),
            topic: cell(columns.index(Field::Topic)).to_string(),
            reference: Reference::parse(cell(columns.index(Field::Reference))),
            arabic: cell(columns.index(Field::Arabic)).to_string(),
            translation: cell(columns.index(Field::Translation)).to_string(),
            notes: columns.notes.map(|idx| cell(idx).to_string()),
        });
    }

    log::info!("Loaded {} verses from {origin} ({dropped} incomplete rows dropped)", verses.len());
    if verses.is_empty() {
        log::warn!("{origin} contains no usable rows");
    }

    Ok(VerseDataset::from_verses(verses, origin))
}

// ---------------------------------------------------------------------------
// Load-once cache
// ---------------------------------------------------------------------------

/// Loads the dataset on first use and keeps it for the rest of the process.
///
/// Failures are not cached: the next [`CachedLoader::get`] tries again, but
/// nothing retries on its own.
#[derive(Debug)]
pub struct CachedLoader {
    source: DataSource,
    config: LoaderConfig,
    cell: OnceCell<Arc<VerseDataset>>,
}

impl CachedLoader {
    pub fn new(source: DataSource, config: LoaderConfig) -> Self {
        Self {
            source,
            config,
            cell: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn get(&self) -> Result<Arc<VerseDataset>, LoadError> {
        self.cell
            .get_or_try_init(|| load(&self.source, &self.config).map(Arc::new))
            .cloned()
    }

    /// Drop the cached dataset and load again.
    pub fn reload(&mut self) -> Result<Arc<VerseDataset>, LoadError> {
        self.cell = OnceCell::new();
        self.get()
    }

    /// Point the loader at a different source. Nothing is read until `get`.
    pub fn set_source(&mut self, source: DataSource) {
        self.source = source;
        self.cell = OnceCell::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    const SHEET: &str = "\
 Main Category ,Topic,SurahName:AyatNumber , Ayat in Arabic,Bangla Translation
Faith,Patience,Al-Baqarah:153,يَا أَيُّهَا الَّذِينَ آمَنُوا اسْتَعِينُوا,হে মুমিনগণ
Ethics,Honesty,Al-Isra:35,وَأَوْفُوا الْكَيْلَ,মাপে পূর্ণ দাও
Faith,,Al-Fatiha:1,بِسْمِ اللَّهِ,
";

    fn parse(text: &str, config: &LoaderConfig) -> Result<VerseDataset, LoadError> {
        load_from_reader(text.as_bytes(), "test", config)
    }

    #[test]
    fn trims_headers_and_reads_rows() {
        let ds = parse(SHEET, &LoaderConfig::default()).unwrap();
        assert_eq!(ds.len(), 3);
        let first = &ds.verses[0];
        assert_eq!(first.main_category, "Faith");
        assert_eq!(first.topic, "Patience");
        assert_eq!(first.reference.to_string(), "Al-Baqarah:153");
        assert_eq!(first.translation, "হে মুমিনগণ");
        assert_eq!(first.notes, None);
        assert_eq!(ds.verses[2].translation, "");
        assert_eq!(ds.source, "test");
    }

    #[test]
    fn missing_category_column_is_an_error() {
        let text = "Topic,Surah:Ayat,Arabic,Translation\nPatience,2:153,x,y\n";
        match parse(text, &LoaderConfig::default()) {
            Err(LoadError::MissingColumn { field, found, .. }) => {
                assert_eq!(field, Field::Category);
                assert_eq!(found.len(), 4);
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_missing_columns() {
        assert!(matches!(
            parse("", &LoaderConfig::default()),
            Err(LoadError::MissingColumn { .. })
        ));
    }

    #[test]
    fn alternative_names_and_notes_resolve() {
        let text = "Category,Theme,Surah:Ayat,Arabic,Translation,Notes\n\
                    Faith,Patience,2:153,x,y,seek help\n";
        let ds = parse(text, &LoaderConfig::default()).unwrap();
        let v = &ds.verses[0];
        assert_eq!(v.main_category, "Faith");
        assert_eq!(v.reference, Reference::Numeric { surah: 2, ayat: 153 });
        assert_eq!(v.notes.as_deref(), Some("seek help"));
    }

    #[test]
    fn custom_mapping() {
        let text = "Group,Subject,Ref,AR,BN\nFaith,Patience,2:153,x,y\n";
        let config = LoaderConfig {
            columns: ColumnMapping {
                category: vec!["Group".into()],
                topic: vec!["Subject".into()],
                reference: vec!["Ref".into()],
                arabic: vec!["AR".into()],
                translation: vec!["BN".into()],
                notes: Vec::new(),
            },
            ..LoaderConfig::default()
        };
        assert_eq!(parse(text, &config).unwrap().verses[0].topic, "Patience");
    }

    #[test]
    fn drops_rows_with_blank_required_fields() {
        let config = LoaderConfig {
            required_fields: vec![Field::Topic, Field::Translation],
            ..LoaderConfig::default()
        };
        let ds = parse(SHEET, &config).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.verses.iter().all(|v| !v.topic.is_empty()));
    }

    #[test]
    fn short_rows_read_as_empty() {
        let text = "Main Category,Topic,Surah:Ayat,Arabic,Translation\nFaith,Patience,2:153\n";
        let ds = parse(text, &LoaderConfig::default()).unwrap();
        assert_eq!(ds.verses[0].arabic, "");
        assert_eq!(ds.verses[0].translation, "");
    }

    #[test]
    fn duplicate_rows_kept() {
        let text = "Main Category,Topic,Surah:Ayat,Arabic,Translation\n\
                    Faith,Patience,2:153,x,y\nFaith,Patience,2:153,x,y\n";
        assert_eq!(parse(text, &LoaderConfig::default()).unwrap().len(), 2);
    }

    #[test]
    fn source_parsing() {
        assert_eq!(
            DataSource::parse("https://example.com/pub?output=csv"),
            DataSource::Url("https://example.com/pub?output=csv".into())
        );
        assert_eq!(
            DataSource::parse("data/verses.csv"),
            DataSource::File(PathBuf::from("data/verses.csv"))
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = DataSource::File(PathBuf::from("/definitely/not/here.csv"));
        assert!(matches!(
            load(&source, &LoaderConfig::default()),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn unreachable_url_is_http_error() {
        let config = LoaderConfig {
            http_timeout: Duration::from_secs(2),
            ..LoaderConfig::default()
        };
        let source = DataSource::Url("http://127.0.0.1:9/sheet.csv".into());
        assert!(matches!(load(&source, &config), Err(LoadError::Http { .. })));
    }

    /// Answer a single request on a loopback port with a canned response.
    fn serve_once(status: &str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/csv; charset=utf-8\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/sheet.csv")
    }

    #[test]
    fn url_loads_like_a_file() {
        let url = serve_once("200 OK", SHEET);
        let ds = load(&DataSource::Url(url.clone()), &LoaderConfig::default()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.verses[0].main_category, "Faith");
        assert_eq!(ds.verses[1].topic, "Honesty");
        assert_eq!(ds.verses[1].reference.to_string(), "Al-Isra:35");
        assert_eq!(ds.source, url);
    }

    #[test]
    fn error_status_is_http_error() {
        let url = serve_once("404 Not Found", "not here");
        match load(&DataSource::Url(url.clone()), &LoaderConfig::default()) {
            Err(LoadError::Http { url: failed, source }) => {
                assert_eq!(failed, url);
                assert_eq!(source.status(), Some(reqwest::StatusCode::NOT_FOUND));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn cache_loads_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SHEET.as_bytes()).unwrap();
        let path = file.path().to_path_buf();

        let mut loader = CachedLoader::new(DataSource::File(path), LoaderConfig::default());
        assert!(loader.cell.get().is_none());
        let first = loader.get().unwrap();
        assert!(loader.cell.get().is_some());

        // The source disappearing does not matter once cached.
        drop(file);
        let second = loader.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // An explicit reload goes back to the source.
        assert!(matches!(loader.reload(), Err(LoadError::Io { .. })));
        assert!(loader.cell.get().is_none());
    }

    #[test]
    fn failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let loader = CachedLoader::new(DataSource::File(path.clone()), LoaderConfig::default());
        assert!(loader.get().is_err());

        std::fs::write(&path, SHEET).unwrap();
        assert_eq!(loader.get().unwrap().len(), 3);
    }
}
