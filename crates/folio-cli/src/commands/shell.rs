//! Interactive draft editing.
//!
//! The loop multiplexes two event sources on one task: lines from stdin and
//! the completion of the analysis currently in flight. Draft edits keep
//! working while a request runs; its settlement is applied whenever it lands.

use std::sync::Arc;

use folio_core::{
    AnalysisError, AnalysisSession, DraftCommand, DraftStore, FormField, SessionState,
    Settlement, ValuationService,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

const HELP: &str = "\
Commands:
  set <field> <value>          edit the form (fields: ticker, quantity, cost_basis)
  add                          add the form as a holding
  add <ticker> <qty> <cost>    fill the form and add it in one step
  remove <index>               remove a holding by position
  list                         show draft holdings
  form                         show the form
  analyze                      submit the holdings for analysis
  status                       show the analysis state
  show                         render the last successful analysis
  help                         show this text
  quit                         leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Set { field: FormField, value: String },
    Add,
    AddInline { ticker: String, quantity: String, cost_basis: String },
    Remove { index: usize },
    List,
    Form,
    Analyze,
    Status,
    Show,
    Help,
    Quit,
    Empty,
}

/// Parse one input line. Errors are user-facing messages.
fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ShellCommand::Empty);
    };
    let rest: Vec<&str> = words.collect();

    match (verb.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("set", [field, value @ ..]) => {
            let field = field
                .parse::<FormField>()
                .map_err(|_| format!("unknown field '{field}' (ticker, quantity, cost_basis)"))?;
            Ok(ShellCommand::Set {
                field,
                value: value.join(" "),
            })
        }
        ("add", []) => Ok(ShellCommand::Add),
        ("add", [ticker, quantity, cost_basis]) => Ok(ShellCommand::AddInline {
            ticker: (*ticker).to_string(),
            quantity: (*quantity).to_string(),
            cost_basis: (*cost_basis).to_string(),
        }),
        ("remove", [index]) => index
            .parse()
            .map(|index| ShellCommand::Remove { index })
            .map_err(|_| format!("'{index}' is not a holding index")),
        ("list", []) => Ok(ShellCommand::List),
        ("form", []) => Ok(ShellCommand::Form),
        ("analyze", []) => Ok(ShellCommand::Analyze),
        ("status", []) => Ok(ShellCommand::Status),
        ("show", []) => Ok(ShellCommand::Show),
        ("help", []) => Ok(ShellCommand::Help),
        ("quit" | "exit", []) => Ok(ShellCommand::Quit),
        _ => Err(format!("unrecognized command '{}'; type 'help'", line.trim())),
    }
}

struct InFlight {
    sequence: u64,
    handle: JoinHandle<Settlement>,
}

struct Shell {
    service: Arc<ValuationService>,
    draft: DraftStore,
    session: AnalysisSession,
    in_flight: Option<InFlight>,
    format: OutputFormat,
    pretty: bool,
}

pub async fn run(
    service: Arc<ValuationService>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let mut shell = Shell {
        service,
        draft: DraftStore::new(),
        session: AnalysisSession::new(),
        in_flight: None,
        format,
        pretty,
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "folio shell, endpoint {}. Type 'help' for commands.",
        shell.service.endpoint()
    );

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => shell.execute(command)?,
                    Err(message) => println!("{message}"),
                }
            }
            (sequence, settlement) = wait_settlement(&mut shell.in_flight) => {
                shell.in_flight = None;
                shell.settle(sequence, settlement)?;
            }
        }
    }

    if let Some(in_flight) = shell.in_flight.take() {
        debug!(sequence = in_flight.sequence, "abandoning in-flight analysis");
        in_flight.handle.abort();
    }
    Ok(())
}

/// Resolves when the in-flight task finishes; never resolves when idle.
async fn wait_settlement(in_flight: &mut Option<InFlight>) -> (u64, Settlement) {
    match in_flight {
        Some(in_flight) => {
            let settlement = match (&mut in_flight.handle).await {
                Ok(settlement) => settlement,
                Err(error) => Err(AnalysisError::transport(format!(
                    "analysis task ended unexpectedly: {error}"
                ))),
            };
            (in_flight.sequence, settlement)
        }
        None => std::future::pending().await,
    }
}

impl Shell {
    fn execute(&mut self, command: ShellCommand) -> Result<(), CliError> {
        match command {
            ShellCommand::Set { field, value } => {
                self.draft.apply(DraftCommand::SetFormField { field, value })?;
            }
            ShellCommand::Add => self.add(),
            ShellCommand::AddInline {
                ticker,
                quantity,
                cost_basis,
            } => {
                self.draft.set_form_field(FormField::Ticker, ticker);
                self.draft.set_form_field(FormField::Quantity, quantity);
                self.draft.set_form_field(FormField::CostBasis, cost_basis);
                self.add();
            }
            ShellCommand::Remove { index } => match self.draft.remove_holding(index) {
                Some(removed) => println!("removed {}", removed.ticker),
                None => println!("no holding at index {index}"),
            },
            ShellCommand::List => print!("{}", output::format_holdings(self.draft.holdings())),
            ShellCommand::Form => {
                for field in FormField::ALL {
                    println!("  {field}: {}", self.draft.form().get(field));
                }
            }
            ShellCommand::Analyze => self.start_analysis(),
            ShellCommand::Status => println!("{}", output::format_state(self.session.state())),
            ShellCommand::Show => match self.session.view_model() {
                Some(view) => output::render_view(&view, self.format, self.pretty)?,
                None => println!("{}", output::format_state(self.session.state())),
            },
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit | ShellCommand::Empty => {}
        }
        Ok(())
    }

    fn add(&mut self) {
        match self.draft.add_holding() {
            Ok(holding) => println!(
                "added {} ({} @ {})",
                holding.ticker, holding.quantity, holding.cost_basis
            ),
            Err(error) => println!("{error}"),
        }
    }

    fn start_analysis(&mut self) {
        let pending = match self.session.begin(self.draft.snapshot()) {
            Ok(pending) => pending,
            Err(error) => {
                println!("{error}");
                return;
            }
        };

        let sequence = pending.sequence();
        let service = Arc::clone(&self.service);
        let request = pending.into_request();
        let handle = tokio::spawn(async move { service.analyze(&request).await });

        self.in_flight = Some(InFlight { sequence, handle });
        println!("analyzing {} holding(s)...", self.draft.holdings().len());
    }

    fn settle(&mut self, sequence: u64, settlement: Settlement) -> Result<(), CliError> {
        if !self.session.settle(sequence, settlement) {
            return Ok(());
        }
        match self.session.state() {
            SessionState::Succeeded(_) => {
                println!("{}", output::format_state(self.session.state()));
                if let Some(view) = self.session.view_model() {
                    output::render_view(&view, self.format, self.pretty)?;
                }
            }
            state => println!("{}", output::format_state(state)),
        }
        Ok(())
    }
}
