use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use invoice_desk::config::{self, Config};
use invoice_desk::invoice_gen::{self, PandocExporter, PdfExporter};
use invoice_desk::ui::invoice_form::{
    handle_input, render_invoice_form, InvoiceFormAction, InvoiceFormState,
};
use invoice_desk::{api, telemetry};

#[derive(Parser)]
#[command(name = "invoice_desk", version, about = "Invoice records API and invoice form")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the invoice and province HTTP API
    Serve,
    /// Fill in an invoice in the terminal and export it to PDF
    Form,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;

    match cli.command {
        Command::Serve => {
            telemetry::init_stdout(&config.log_level)?;
            api::serve(&config).await
        }
        Command::Form => {
            telemetry::init_file(&config.log_level, &config.log_file)?;
            run_form(&config)
        }
    }
}

fn run_form(config: &Config) -> Result<()> {
    let exporter = PandocExporter::new(&config.pdf_output_dir)?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = InvoiceFormState::new(&config.institution_name);

    // Run the main app loop
    let result = run_app(&mut terminal, &mut state, &exporter);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = &result {
        tracing::error!(error = %err, "invoice form stopped");
        println!("Error: {}", err);
    }

    result
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut InvoiceFormState,
    exporter: &dyn PdfExporter,
) -> Result<()> {
    loop {
        terminal.draw(|f| render_invoice_form(f, state))?;

        match handle_input(state)? {
            Some(InvoiceFormAction::Quit) => break,
            Some(InvoiceFormAction::Submit) => {
                // Export blocks the loop until the renderer exits
                let outcome = invoice_gen::submit(state.form(), exporter);
                state.show_outcome(&outcome);
            }
            None => {}
        }
    }

    Ok(())
}
