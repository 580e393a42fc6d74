use crate::app::forms::AddSubscriptionForm;
use crate::app::view;
use crate::core::session::{CancelOutcome, Session};
use crate::core::{Result, SubscriptionId, SubscriptionProvider};
use crate::utils::error::TryoutError;

pub const HELP: &str = "\
Commands:
  login <email>                                   discover your subscriptions
  list                                            show subscriptions
  summary                                         show count and monthly cost
  add <name> | <provider> | <price> | <date> [| <currency> [| <cycle>]]
                                                  add a subscription (date: YYYY-MM-DD)
  cancel <id> | cancel #<number>                  cancel by id, or by position in `list`
  export                                          print the session as JSON
  logout                                          end the session
  help                                            show this help
  quit                                            exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login(String),
    List,
    Summary,
    Add(AddSubscriptionForm),
    Cancel(String),
    Export,
    Logout,
    Help,
    Quit,
}

fn usage(message: &str) -> TryoutError {
    TryoutError::ValidationError {
        message: message.to_string(),
    }
}

fn parse_add(args: &str) -> Result<AddSubscriptionForm> {
    let fields: Vec<&str> = args.split('|').map(str::trim).collect();
    if fields.len() < 4 || fields.len() > 6 {
        return Err(usage(
            "Usage: add <name> | <provider> | <price> | <date> [| <currency> [| <cycle>]]",
        ));
    }

    let mut form = AddSubscriptionForm {
        name: fields[0].to_string(),
        provider: fields[1].to_string(),
        price: fields[2].to_string(),
        next_billing_date: fields[3].to_string(),
        ..AddSubscriptionForm::default()
    };
    if let Some(currency) = fields.get(4) {
        form.currency = currency.to_string();
    }
    if let Some(cycle) = fields.get(5) {
        form.billing_cycle = cycle.to_string();
    }
    Ok(form)
}

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "login" if !rest.is_empty() => Ok(Command::Login(rest.to_string())),
        "login" => Err(usage("Usage: login <email>")),
        "list" | "ls" => Ok(Command::List),
        "summary" | "total" => Ok(Command::Summary),
        "add" => parse_add(rest).map(Command::Add),
        "cancel" if !rest.is_empty() => Ok(Command::Cancel(rest.to_string())),
        "cancel" => Err(usage("Usage: cancel <id> or cancel #<number>")),
        "export" => Ok(Command::Export),
        "logout" => Ok(Command::Logout),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err(usage("Type `help` for a list of commands")),
        other => Err(usage(&format!(
            "Unknown command '{}'. Type `help` for a list of commands",
            other
        ))),
    }
}

/// What the front end should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellOutput {
    Print(String),
    Exit,
}

pub struct Shell<P: SubscriptionProvider> {
    session: Session<P>,
}

impl<P: SubscriptionProvider> Shell<P> {
    pub fn new(session: Session<P>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    /// `#n` 是清單編號（從 1 開始），其他一律當作 id
    async fn resolve(&self, target: &str) -> Result<crate::core::Subscription> {
        let subscriptions = self.session.subscriptions().await;
        let found = match target.strip_prefix('#') {
            Some(number) => number
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| subscriptions.get(i)),
            None => {
                let id = SubscriptionId::new(target);
                subscriptions.iter().find(|s| s.id == id)
            }
        };

        found
            .cloned()
            .ok_or_else(|| usage(&format!("No subscription matches '{}'", target)))
    }

    pub async fn execute(&self, command: Command) -> Result<ShellOutput> {
        let text = match command {
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(ShellOutput::Exit),
            Command::Login(email) => {
                self.session.login(&email).await?;
                view::render_session(&self.session.snapshot().await)
            }
            Command::List => {
                if !self.session.is_logged_in().await {
                    return Err(TryoutError::NotLoggedIn);
                }
                view::render_list(&self.session.subscriptions().await)
            }
            Command::Summary => {
                if !self.session.is_logged_in().await {
                    return Err(TryoutError::NotLoggedIn);
                }
                view::render_summary(&self.session.summary().await)
            }
            Command::Add(form) => {
                let created = self.session.add(form.into_new_subscription()?).await?;
                format!(
                    "Added {} ({} {} {})\n{}",
                    created.name,
                    created.price,
                    created.currency,
                    created.billing_cycle.period_label(),
                    view::render_summary(&self.session.summary().await)
                )
            }
            Command::Cancel(target) => {
                if !self.session.is_logged_in().await {
                    return Err(TryoutError::NotLoggedIn);
                }
                let subscription = self.resolve(&target).await?;
                match self.session.cancel(&subscription).await? {
                    CancelOutcome::Cancelled => format!(
                        "Cancelled {}\n{}",
                        subscription.name,
                        view::render_summary(&self.session.summary().await)
                    ),
                    CancelOutcome::NotCancellable => format!(
                        "{} cannot be cancelled from here: {}",
                        subscription.name,
                        view::render_cancel_action(&subscription)
                    ),
                    CancelOutcome::AlreadyRemoved => {
                        format!("{} is already cancelled", subscription.name)
                    }
                    CancelOutcome::InProgress => {
                        format!("Cancellation of {} is in progress", subscription.name)
                    }
                }
            }
            Command::Export => serde_json::to_string_pretty(&self.session.snapshot().await)?,
            Command::Logout => {
                self.session.logout().await?;
                "Logged out".to_string()
            }
        };
        Ok(ShellOutput::Print(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::providers::{default_seed, SimulatedProvider};
    use tokio_test::{assert_err, assert_ok};

    fn shell() -> Shell<SimulatedProvider> {
        Shell::new(Session::new(SimulatedProvider::instant()))
    }

    fn printed(output: ShellOutput) -> String {
        match output {
            ShellOutput::Print(text) => text,
            ShellOutput::Exit => panic!("unexpected exit"),
        }
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("list").unwrap(), Command::List);
        assert_eq!(parse_command("  TOTAL ").unwrap(), Command::Summary);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(
            parse_command("login me@example.com").unwrap(),
            Command::Login("me@example.com".to_string())
        );
        assert_eq!(
            parse_command("cancel 2").unwrap(),
            Command::Cancel("2".to_string())
        );
        assert_err!(parse_command("login"));
        assert_err!(parse_command(""));
        assert_err!(parse_command("frobnicate"));
    }

    #[test]
    fn test_parse_add_with_defaults_and_overrides() {
        let Command::Add(form) =
            parse_command("add Google One | Google LLC | 1.99 | 2024-04-01").unwrap()
        else {
            panic!("expected add");
        };
        assert_eq!(form.name, "Google One");
        assert_eq!(form.currency, "USD");
        assert_eq!(form.billing_cycle, "monthly");

        let Command::Add(form) =
            parse_command("add Times | NYT | 120 | 2024-09-01 | GBP | yearly").unwrap()
        else {
            panic!("expected add");
        };
        assert_eq!(form.currency, "GBP");
        assert_eq!(form.billing_cycle, "yearly");

        assert_err!(parse_command("add only | three | fields"));
    }

    #[tokio::test]
    async fn test_commands_require_login() {
        let shell = shell();
        assert!(matches!(
            shell.execute(Command::List).await,
            Err(TryoutError::NotLoggedIn)
        ));
        assert!(matches!(
            shell.execute(Command::Cancel("1".to_string())).await,
            Err(TryoutError::NotLoggedIn)
        ));
    }

    #[tokio::test]
    async fn test_login_add_cancel_flow() {
        let shell = shell();

        let text = printed(assert_ok!(
            shell
                .execute(parse_command("login me@example.com").unwrap())
                .await
        ));
        assert!(text.contains("Your Subscriptions (me@example.com)"));
        assert!(text.contains("Monthly Cost: $17.98"));

        let text = printed(assert_ok!(
            shell
                .execute(parse_command("add Annual | Acme | 12 | 2024-12-01 | USD | yearly").unwrap())
                .await
        ));
        assert!(text.contains("Monthly Cost: $18.98"));

        // Netflix 只有外部連結
        let text = printed(assert_ok!(shell.execute(Command::Cancel("1".to_string())).await));
        assert!(text.contains("cannot be cancelled from here"));

        let text = printed(assert_ok!(shell.execute(Command::Cancel("2".to_string())).await));
        assert!(text.contains("Cancelled Google One"));
        assert!(text.contains("Total Subscriptions: 2"));
        assert!(text.contains("Monthly Cost: $16.99"));

        assert_err!(shell.execute(Command::Cancel("9".to_string())).await);
    }

    #[tokio::test]
    async fn test_cancel_by_id_and_by_list_number() {
        // id 與清單順序刻意錯開
        let mut seed = default_seed();
        seed[0].id = SubscriptionId::new("2");
        seed[1].id = SubscriptionId::new("1");
        let shell = Shell::new(Session::new(SimulatedProvider::instant().with_seed(seed)));
        shell.session().login("me@example.com").await.unwrap();

        let text = printed(assert_ok!(shell.execute(Command::Cancel("#1".to_string())).await));
        assert!(text.contains("Netflix cannot be cancelled from here"));

        let text = printed(assert_ok!(shell.execute(Command::Cancel("1".to_string())).await));
        assert!(text.contains("Cancelled Google One"));

        assert_err!(shell.execute(Command::Cancel("#2".to_string())).await);
        assert_err!(shell.execute(Command::Cancel("#0".to_string())).await);
    }

    #[tokio::test]
    async fn test_export_is_json() {
        let shell = shell();
        shell.session().login("me@example.com").await.unwrap();

        let text = printed(shell.execute(Command::Export).await.unwrap());
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["phase"], "logged_in");
        assert_eq!(json["isLoggedIn"], true);
        assert_eq!(json["subscriptions"].as_array().unwrap().len(), 2);
        assert_eq!(json["summary"]["totalSubscriptions"], 2);
    }

    #[tokio::test]
    async fn test_quit_and_logout() {
        let shell = shell();
        shell.session().login("me@example.com").await.unwrap();
        assert_eq!(
            printed(shell.execute(Command::Logout).await.unwrap()),
            "Logged out"
        );
        assert!(!shell.session().is_logged_in().await);
        assert_eq!(shell.execute(Command::Quit).await.unwrap(), ShellOutput::Exit);
    }
}
