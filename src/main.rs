//! kadmin CLI - admin console for a knowledge base REST backend.

use std::io::{self, BufRead, Read, Write};
use std::process;

use clap::Parser;
use kadmin::api::{HttpKnowledgeApi, UploadRequest};
use kadmin::cli::{Cli, Commands, ConfigCommands, KnowledgeArgs, UploadCommands};
use kadmin::commands::{self, Output};
use kadmin::config::{ConfigOverrides, OutputFormat, ResolvedConfig, resolve_config};
use kadmin::logging;
use kadmin::models::KnowledgeDraft;

fn main() {
    let cli = Cli::parse();

    let mut overrides = ConfigOverrides::new();
    overrides.server = cli.server.clone();
    overrides.config_path = cli.config.clone();
    if cli.human_readable {
        overrides.output_format = Some(OutputFormat::Human);
    }

    let config = match resolve_config(&overrides) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e, cli.human_readable),
    };
    let human = *config.output_format() == OutputFormat::Human;

    let target = cli.command.log_target(config.log_dir());
    let _log_guard = match logging::init_logging(&target) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    if let Err(e) = run_command(cli.command, &config, human) {
        exit_with_error(&e, human);
    }
}

fn exit_with_error(e: &kadmin::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}

fn run_command(command: Commands, config: &ResolvedConfig, human: bool) -> kadmin::Result<()> {
    if let Commands::Config {
        command: ConfigCommands::Show,
    } = command
    {
        output(&commands::config_show(config), human);
        return Ok(());
    }

    let api = HttpKnowledgeApi::new(config.server(), config.timeout())?;
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        match command {
            Commands::List => output(&commands::list(&api).await?, human),
            Commands::Show { id } => output(&commands::show(&api, &id).await?, human),
            Commands::Add { fields } => {
                let draft = read_draft(fields)?;
                output(&commands::add(&api, &draft).await?, human)
            }
            Commands::Update { id, fields } => {
                let draft = read_draft(fields)?;
                output(&commands::update(&api, &id, &draft).await?, human)
            }
            Commands::Delete { id, yes } => {
                if yes || confirm_delete(&id)? {
                    output(&commands::delete(&api, &id).await?, human)
                } else {
                    output(&commands::DeleteAborted::new(&id), human)
                }
            }
            Commands::Upload { command } => {
                let request = upload_request(command);
                output(&commands::upload(&api, &request).await?, human)
            }
            #[cfg(feature = "tui")]
            Commands::Tui => kadmin::tui::run_tui(api).await?,
            Commands::Config { .. } => {}
        }
        Ok::<(), kadmin::Error>(())
    })
}

/// Build a request body from flags; `--content -` reads stdin.
fn read_draft(fields: KnowledgeArgs) -> kadmin::Result<KnowledgeDraft> {
    let content = if fields.content == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fields.content
    };
    if fields.title.is_empty() || content.is_empty() {
        return Err(kadmin::Error::InvalidInput(
            "title and content must not be empty".to_string(),
        ));
    }
    Ok(KnowledgeDraft::from_input(
        &fields.title,
        &content,
        fields.source.as_deref().unwrap_or(""),
    ))
}

/// Ask on stderr, read the answer from stdin.
fn confirm_delete(id: &str) -> kadmin::Result<bool> {
    eprint!("{}", commands::delete_prompt(id));
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(commands::is_confirmation(&answer))
}

fn upload_request(command: UploadCommands) -> UploadRequest {
    match command {
        UploadCommands::Txt {
            file,
            title,
            source,
        } => UploadRequest::Text {
            file,
            title,
            source,
        },
        UploadCommands::Csv {
            file,
            title_column,
            content_column,
        } => UploadRequest::Csv {
            file,
            title_column,
            content_column,
        },
        UploadCommands::Json {
            file,
            title_field,
            content_field,
        } => UploadRequest::Json {
            file,
            title_field,
            content_field,
        },
    }
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
