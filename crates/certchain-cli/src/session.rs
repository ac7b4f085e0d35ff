use std::io::Write;

use clap::error::ErrorKind;
use clap::Parser;
use serde_json::json;
use tracing::debug;

use certchain_ledger::{
    InMemoryLedger, LedgerError, LedgerReader, LedgerWriter, ProjectionBuilder, Query, QueryMode,
};
use certchain_types::{fields, Record, RecordId, TypeError};

use crate::cli::{split_line, IssueArgs, OutputFormat, SessionCommand, SessionLine, VerifyArgs};
use crate::config::CliConfig;
use crate::render;

/// Whether the session keeps reading commands.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One interactive session owning its own ledger.
pub struct Session {
    ledger: InMemoryLedger,
    format: OutputFormat,
    query_mode: QueryMode,
    immediate: bool,
}

impl Session {
    pub fn new(config: CliConfig) -> anyhow::Result<Self> {
        Ok(Self {
            ledger: InMemoryLedger::new(config.ledger)?,
            format: config.format,
            query_mode: config.query_mode,
            immediate: config.immediate,
        })
    }

    #[cfg(test)]
    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    /// Parse and run one line of input.
    pub fn execute_line(&mut self, line: &str, out: &mut impl Write) -> anyhow::Result<Flow> {
        let words = match split_line(line) {
            Ok(words) => words,
            Err(message) => {
                render::warning(out, &message)?;
                return Ok(Flow::Continue);
            }
        };
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        match SessionLine::try_parse_from(words) {
            Ok(parsed) => self.execute(parsed.command, out),
            Err(err) => {
                let is_help = matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                );
                if self.format == OutputFormat::Json && !is_help {
                    let message = err.render().to_string();
                    render::json(out, &json!({ "error": message.trim_end() }))?;
                } else {
                    write!(out, "{}", err.render())?;
                }
                Ok(Flow::Continue)
            }
        }
    }

    /// Run one command. Recoverable ledger and input errors are reported
    /// to `out` and the session continues.
    pub fn execute(&mut self, command: SessionCommand, out: &mut impl Write) -> anyhow::Result<Flow> {
        debug!(?command, "session command");
        let result = match command {
            SessionCommand::Quit => return Ok(Flow::Quit),
            SessionCommand::Issue(args) => self.issue(args, out),
            SessionCommand::Mine => self.mine(out),
            SessionCommand::Verify(args) => self.verify(args, out),
            SessionCommand::Pending => self.pending(out),
            SessionCommand::Chain => self.chain(out),
            SessionCommand::Show(args) => self.show(args.index, out),
            SessionCommand::Records => self.records(out),
            SessionCommand::Status => self.status(out),
            SessionCommand::Export => self.export(out),
        };

        match result {
            Ok(()) => Ok(Flow::Continue),
            Err(err) => {
                if matches!(
                    err.downcast_ref::<LedgerError>(),
                    Some(LedgerError::EmptyCollector)
                ) {
                    self.report_notice("No certificates to mine yet.", out)?;
                    return Ok(Flow::Continue);
                }

                let message = if let Some(e) = err.downcast_ref::<LedgerError>() {
                    e.to_string()
                } else if let Some(e) = err.downcast_ref::<TypeError>() {
                    e.to_string()
                } else {
                    return Err(err);
                };
                match self.format {
                    OutputFormat::Text => render::warning(out, &message)?,
                    OutputFormat::Json => render::json(out, &json!({ "error": message }))?,
                }
                Ok(Flow::Continue)
            }
        }
    }

    fn report_notice(&self, message: &str, out: &mut impl Write) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => render::notice(out, message),
            OutputFormat::Json => render::json(out, &json!({ "notice": message })),
        }
    }

    fn issue(&self, args: IssueArgs, out: &mut impl Write) -> anyhow::Result<()> {
        let config = self.ledger.config();
        let mut record = Record::new();
        if let Some(student) = args.student {
            record.insert(config.name_field.clone(), student);
        }
        if let Some(course) = args.course {
            record.insert(config.course_field.clone(), course);
        }
        let named = [
            (fields::INSTITUTION, args.institution),
            (fields::ISSUE_DATE, args.issue_date),
            (fields::CATEGORY, args.category),
            (fields::REMARKS, args.remarks),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                record.insert(key, value);
            }
        }
        for assignment in &args.fields {
            record.insert_assignment(assignment)?;
        }
        if let Some(id) = args.id {
            record = record.with_id(RecordId::new(id));
        } else if args.generate_id {
            record = record.with_id(RecordId::generate());
        }

        if args.now || self.immediate {
            let block = self.ledger.seal_record(record)?;
            return match self.format {
                OutputFormat::Text => render::mined(out, &block),
                OutputFormat::Json => render::json(out, &block),
            };
        }

        let stored = self.ledger.add_record(record)?;
        match self.format {
            OutputFormat::Text => render::issued(
                out,
                &stored,
                &self.ledger.config().name_field,
                self.ledger.pending_count()?,
            ),
            OutputFormat::Json => render::json(out, &stored),
        }
    }

    fn mine(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let tail = self.ledger.head()?.hash();
        let block = self.ledger.seal_after(tail)?;
        match self.format {
            OutputFormat::Text => render::mined(out, &block),
            OutputFormat::Json => render::json(out, &block),
        }
    }

    fn verify(&self, args: VerifyArgs, out: &mut impl Write) -> anyhow::Result<()> {
        let mode = args.mode.map(QueryMode::from).unwrap_or(self.query_mode);
        let query = Query::for_mode(mode, &args.term, args.course.as_deref(), self.ledger.config())?;

        if args.all {
            let hits = self.ledger.find_all(&query)?;
            return match self.format {
                OutputFormat::Json => render::json(out, &hits),
                OutputFormat::Text if hits.is_empty() => render::not_found(out),
                OutputFormat::Text => hits.iter().try_for_each(|hit| render::hit(out, hit)),
            };
        }

        let hit = self.ledger.find_by_identity(&query)?;
        match (self.format, &hit) {
            (OutputFormat::Json, _) => render::json(out, &hit),
            (OutputFormat::Text, Some(hit)) => render::hit(out, hit),
            (OutputFormat::Text, None) => render::not_found(out),
        }
    }

    fn pending(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let records = self.ledger.pending()?;
        match self.format {
            OutputFormat::Text => render::pending(out, &records),
            OutputFormat::Json => render::json(out, &records),
        }
    }

    fn chain(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let blocks = self.ledger.blocks()?;
        match self.format {
            OutputFormat::Text => blocks.iter().try_for_each(|block| render::block(out, block)),
            OutputFormat::Json => render::json(out, &blocks),
        }
    }

    fn show(&self, index: u64, out: &mut impl Write) -> anyhow::Result<()> {
        let block = self.ledger.block(index)?;
        match (self.format, &block) {
            (OutputFormat::Json, _) => render::json(out, &block),
            (OutputFormat::Text, Some(block)) => render::block(out, block),
            (OutputFormat::Text, None) => render::warning(out, &format!("No block #{index}.")),
        }
    }

    fn export(&self, out: &mut impl Write) -> anyhow::Result<()> {
        render::json(out, &self.ledger.blocks()?)
    }

    fn records(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let rows = ProjectionBuilder::record_listing(&self.ledger)?;
        match self.format {
            OutputFormat::Text => render::listing(out, &rows),
            OutputFormat::Json => render::json(out, &rows),
        }
    }

    fn status(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let summary = ProjectionBuilder::summary(&self.ledger)?;
        match self.format {
            OutputFormat::Text => render::summary(out, &summary),
            OutputFormat::Json => render::json(out, &summary),
        }
    }
}
