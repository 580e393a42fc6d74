use clap::Parser;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tryout::utils::error::ErrorSeverity;
use tryout::utils::{logger, validation::Validate};
use tryout::{
    parse_command, CliConfig, Command, LogFormat, Session, Shell, ShellOutput, SimulatedProvider,
    TomlConfig, TryoutError,
};

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report(e: &TryoutError) {
    tracing::warn!(
        "{} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

fn fail_startup(e: &TryoutError) -> ! {
    tracing::error!("❌ Configuration validation failed: {}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e.severity()).max(1));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 設定檔先載入，日誌格式可能由它決定
    let toml = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(mut config) => {
                config.apply_overrides(&cli);
                Some(config)
            }
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let verbose = toml.as_ref().map_or(cli.verbose, |c| c.verbose());
    let json_logs = toml
        .as_ref()
        .map_or(cli.log_format == LogFormat::Json, |c| c.json_logs());
    if json_logs {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting tryout");
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        fail_startup(&e);
    }
    if let Some(Err(e)) = toml.as_ref().map(|c| c.validate()) {
        fail_startup(&e);
    }

    let provider = match &toml {
        Some(config) => SimulatedProvider::from_config(config),
        None => SimulatedProvider::from_config(&cli),
    };
    let app_name = toml.as_ref().map_or("TryOut", |c| c.app_name());
    let shell = Shell::new(Session::new(provider));

    println!("💲 {} - Manage all your subscriptions in one place", app_name);

    match &cli.email {
        Some(email) => {
            println!("Discovering subscriptions...");
            match shell.execute(Command::Login(email.clone())).await {
                Ok(ShellOutput::Print(text)) => println!("{}", text),
                Ok(ShellOutput::Exit) => return Ok(()),
                Err(e) => report(&e),
            }
        }
        None => println!("Type `login <email>` to discover your subscriptions, `help` for all commands."),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                report(&e);
                continue;
            }
        };
        if matches!(command, Command::Login(_)) {
            println!("Discovering subscriptions...");
        }

        match shell.execute(command).await {
            Ok(ShellOutput::Print(text)) => println!("{}", text),
            Ok(ShellOutput::Exit) => break,
            Err(e) => report(&e),
        }
    }

    tracing::info!("Session ended");
    Ok(())
}
