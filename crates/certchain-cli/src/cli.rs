use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use certchain_ledger::QueryMode;

#[derive(Parser)]
#[command(
    name = "certchain",
    about = "Certchain — tamper-evident student certificate ledger",
    long_about = "Starts an interactive session with its own in-memory ledger. \
                  Commands are read line by line from standard input; type `help` for a list.",
    version
)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (overrides the config file)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Default search mode for `verify` (overrides the config file)
    #[arg(long)]
    pub query_mode: Option<QueryModeArg>,

    /// Seal each issued certificate into its own block right away
    #[arg(long)]
    pub immediate: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum QueryModeArg {
    Name,
    NameCourse,
    Id,
}

impl From<QueryModeArg> for QueryMode {
    fn from(arg: QueryModeArg) -> Self {
        match arg {
            QueryModeArg::Name => QueryMode::Name,
            QueryModeArg::NameCourse => QueryMode::NameAndCourse,
            QueryModeArg::Id => QueryMode::RecordId,
        }
    }
}

/// One line typed into the session.
#[derive(Parser, Debug)]
#[command(
    name = "certchain",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Issue a certificate (added to the pending list)
    Issue(IssueArgs),
    /// Seal all pending certificates into a new block
    Mine,
    /// Look up a certificate in sealed blocks
    Verify(VerifyArgs),
    /// List certificates waiting to be mined
    Pending,
    /// Show every block in the chain
    Chain,
    /// Show a single block by its index
    Show(ShowArgs),
    /// List every sealed certificate with its block
    Records,
    /// Show chain length, record counts and head hash
    Status,
    /// Print the whole chain as JSON
    Export,
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Args, Debug)]
pub struct IssueArgs {
    #[arg(long)]
    pub student: Option<String>,
    #[arg(long)]
    pub course: Option<String>,
    #[arg(long)]
    pub institution: Option<String>,
    #[arg(long)]
    pub issue_date: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub remarks: Option<String>,
    /// Extra field as key=value (repeatable)
    #[arg(short, long = "field")]
    pub fields: Vec<String>,
    /// Caller-supplied certificate identifier
    #[arg(long, conflicts_with = "generate_id")]
    pub id: Option<String>,
    /// Attach a generated identifier
    #[arg(long)]
    pub generate_id: bool,
    /// Seal this certificate immediately in its own block
    #[arg(long)]
    pub now: bool,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Student name, or certificate id with `--mode id`
    pub term: String,
    #[arg(long)]
    pub course: Option<String>,
    #[arg(long)]
    pub mode: Option<QueryModeArg>,
    /// Report every match instead of the first
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub index: u64,
}

/// Split a session line into words, honouring single and double quotes.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_words() {
        assert_eq!(split_line("  mine  ").unwrap(), vec!["mine"]);
        assert!(split_line("   ").unwrap().is_empty());
    }

    #[test]
    fn split_keeps_quoted_spaces() {
        assert_eq!(
            split_line(r#"issue --student "Ana Maria" --course 'Quantum Physics'"#).unwrap(),
            vec!["issue", "--student", "Ana Maria", "--course", "Quantum Physics"]
        );
    }

    #[test]
    fn split_allows_empty_quoted_word() {
        assert_eq!(split_line(r#"verify """#).unwrap(), vec!["verify", ""]);
    }

    #[test]
    fn split_rejects_unterminated_quote() {
        assert!(split_line(r#"issue --student "Ana"#).is_err());
    }

    #[test]
    fn session_line_parses_issue() {
        let line = SessionLine::try_parse_from(
            split_line("issue --student Ana --course Physics -f remarks=honours --now").unwrap(),
        )
        .unwrap();
        match line.command {
            SessionCommand::Issue(args) => {
                assert_eq!(args.student.as_deref(), Some("Ana"));
                assert_eq!(args.fields, vec!["remarks=honours"]);
                assert!(args.now);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn session_line_parses_verify_mode() {
        let line =
            SessionLine::try_parse_from(split_line("verify ana --mode name-course --course physics").unwrap())
                .unwrap();
        match line.command {
            SessionCommand::Verify(args) => {
                assert_eq!(args.mode, Some(QueryModeArg::NameCourse));
                assert_eq!(QueryMode::from(args.mode.unwrap()), QueryMode::NameAndCourse);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn id_and_generate_id_conflict() {
        assert!(SessionLine::try_parse_from(["issue", "--id", "C-1", "--generate-id"]).is_err());
    }

    #[test]
    fn exit_is_an_alias_for_quit() {
        let line = SessionLine::try_parse_from(["exit"]).unwrap();
        assert!(matches!(line.command, SessionCommand::Quit));
    }
}
