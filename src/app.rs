use std::io::Write;
use std::time::{Duration, Instant};

use roxmltree::Document;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chemont::ChemontLookup;
use crate::config::{DEFAULT_PROGRESS_INTERVAL, ResolvedConfig};
use crate::error::HmdbError;
use crate::fs_util;
use crate::ontology::{self, SerializeOptions, TermTable};
use crate::record::{ExtractionWarning, RecordStream};
use crate::turtle::{StatementSink, TurtleWriter};

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    pub serialize: SerializeOptions,
    pub progress_interval: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            serialize: SerializeOptions::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertSummary {
    pub records: usize,
    pub statements: usize,
    pub terms: usize,
    pub unresolved_classifications: usize,
    pub malformed_dates: usize,
    pub converted_at: String,
}

pub struct Converter {
    lookup: Option<ChemontLookup>,
    options: ConvertOptions,
}

impl Converter {
    pub fn new(lookup: Option<ChemontLookup>, options: ConvertOptions) -> Self {
        Self { lookup, options }
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self, HmdbError> {
        let lookup = match &config.chemont {
            Some(path) => {
                let lookup = fs_util::load_chemont(path)?;
                info!(path = %path, labels = lookup.len(), "loaded ChemOnt lookup");
                Some(lookup)
            }
            None => {
                info!("no ChemOnt file given, skipping chemical classification");
                None
            }
        };
        let options = ConvertOptions {
            serialize: SerializeOptions {
                include_root_links: config.include_root_links,
            },
            progress_interval: config.progress_interval,
        };
        Ok(Self::new(lookup, options))
    }

    /// Prefix header, every record, then the folded term table.
    pub fn convert_to_turtle<W: Write>(
        &self,
        xml: &str,
        out: W,
        sink: &dyn ProgressSink,
    ) -> Result<ConvertSummary, HmdbError> {
        let mut writer = TurtleWriter::new(out);
        writer.write_prefixes()?;
        let summary = self.convert_str(xml, &mut writer, sink)?;
        writer.flush()?;
        Ok(summary)
    }

    pub fn convert_str<S>(
        &self,
        xml: &str,
        out: &mut S,
        sink: &dyn ProgressSink,
    ) -> Result<ConvertSummary, HmdbError>
    where
        S: StatementSink + ?Sized,
    {
        let start = Instant::now();
        let document = Document::parse(xml).map_err(|err| HmdbError::XmlParse(err.to_string()))?;
        sink.event(ProgressEvent {
            message: "phase=Parse; document loaded".to_string(),
            elapsed: Some(start.elapsed()),
        });
        self.convert_document(&document, out, sink)
    }

    /// Records are written as soon as each one is extracted; a failing record
    /// aborts the run after everything before it was emitted.
    pub fn convert_document<S>(
        &self,
        document: &Document<'_>,
        out: &mut S,
        sink: &dyn ProgressSink,
    ) -> Result<ConvertSummary, HmdbError>
    where
        S: StatementSink + ?Sized,
    {
        let start = Instant::now();
        let mut table = TermTable::new();
        let mut summary = ConvertSummary {
            records: 0,
            statements: 0,
            terms: 0,
            unresolved_classifications: 0,
            malformed_dates: 0,
            converted_at: String::new(),
        };

        for record in RecordStream::new(document) {
            let extracted = record.extract(self.lookup.as_ref())?;
            debug!(
                accession = %extracted.accession,
                statements = extracted.statements.len(),
                "record extracted"
            );
            for warning in &extracted.warnings {
                warn!(accession = %extracted.accession, "{warning}");
                match warning {
                    ExtractionWarning::UnresolvedClassification { .. } => {
                        summary.unresolved_classifications += 1
                    }
                    ExtractionWarning::MalformedDate { .. } => summary.malformed_dates += 1,
                }
            }
            for statement in &extracted.statements {
                out.emit(statement)?;
            }
            summary.statements += extracted.statements.len();

            if let Some(fragment) = record.ontology() {
                ontology::fold_fragment(&mut table, fragment);
            }

            summary.records += 1;
            if summary.records % self.options.progress_interval.max(1) == 0 {
                sink.event(ProgressEvent {
                    message: format!(
                        "phase=Records; {} records, {} terms",
                        summary.records,
                        table.len()
                    ),
                    elapsed: Some(start.elapsed()),
                });
            }
        }

        sink.event(ProgressEvent {
            message: format!("phase=Ontology; writing {} terms", table.len()),
            elapsed: Some(start.elapsed()),
        });
        summary.statements += table.serialize(out, &self.options.serialize)?;
        summary.terms = table.len();
        summary.converted_at = chrono::Utc::now().to_rfc3339();

        info!(
            records = summary.records,
            statements = summary.statements,
            terms = summary.terms,
            "conversion finished"
        );
        Ok(summary)
    }
}
